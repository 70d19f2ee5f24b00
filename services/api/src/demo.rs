use crate::infra::InMemoryFunnelBackend;
use clap::Args;
use fire_funnel::error::AppError;
use fire_funnel::workflows::funnel::channel::CITY_OPTIONS;
use fire_funnel::workflows::funnel::quiz::{
    AGE_SLIDER, MONTHLY_EXPENSE_SLIDER, RETIREMENT_AGE_SLIDER,
};
use fire_funnel::workflows::funnel::validation::effective_rules;
use fire_funnel::workflows::funnel::{
    format_abbreviated_currency, format_abbreviated_yearly_amount, resolve_channel, with_rupee,
    CodeType, FieldName, FunnelService, LeadForm, QuizAnswers, QuizField, ResultView,
    ValidationRule,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct ChannelArgs {
    /// Referral identifier, e.g. agency, pnb or social_media. Omit for the default form.
    #[arg(long = "ref")]
    pub(crate) referral: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct FormatArgs {
    /// Amount in rupees
    #[arg(allow_hyphen_values = true)]
    pub(crate) amount: f64,
    /// Use the yearly-investment format (tops out at lakhs, "Lacs" suffix)
    #[arg(long)]
    pub(crate) yearly: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Referral identifier the demo visitor arrives with
    #[arg(long = "ref")]
    pub(crate) referral: Option<String>,
    /// Visitor name shown on the results page
    #[arg(long, default_value = "Asha Verma")]
    pub(crate) name: String,
    /// Current age (18-80)
    #[arg(long, default_value_t = AGE_SLIDER.default)]
    pub(crate) age: u32,
    /// Planned retirement age (40-80)
    #[arg(long, default_value_t = RETIREMENT_AGE_SLIDER.default)]
    pub(crate) retirement_age: u32,
    /// Monthly expense in rupees, snapped to steps of 5,000
    #[arg(long, default_value_t = MONTHLY_EXPENSE_SLIDER.default)]
    pub(crate) monthly_expense: u32,
    /// Submit the employee code instead of the business code on the agency channel
    #[arg(long)]
    pub(crate) employee_code: bool,
}

pub(crate) fn run_channel(args: ChannelArgs) -> Result<(), AppError> {
    let config = resolve_channel(args.referral.as_deref());

    match config.key {
        Some(key) => println!("Channel: {key}"),
        None => println!(
            "Channel: default ({})",
            args.referral.as_deref().unwrap_or("no referral")
        ),
    }

    let fields: Vec<&str> = config.fields.iter().map(|field| field.wire_name()).collect();
    println!("Fields: {}", fields.join(", "));
    if config.exclusive_codes {
        println!("Agency toggle: businessCode (default) or employeeCode");
    }

    println!("Rules:");
    for (field, rule) in effective_rules(&config) {
        match rule {
            ValidationRule::ExactLength { length } => {
                println!("  - {field}: exactly {length} characters")
            }
            ValidationRule::AllowedValues { values } => {
                println!("  - {field}: one of {}", values.join(", "))
            }
        }
    }

    if config.includes(FieldName::City) {
        println!("City options: {}", config.city_options().join(", "));
    }
    Ok(())
}

pub(crate) fn run_format(args: FormatArgs) -> Result<(), AppError> {
    let formatted = if args.yearly {
        format_abbreviated_yearly_amount(Some(args.amount))
    } else {
        format_abbreviated_currency(Some(args.amount))
    };
    println!("{}", with_rupee(&formatted));
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        referral,
        name,
        age,
        retirement_age,
        monthly_expense,
        employee_code,
    } = args;

    let backend = Arc::new(InMemoryFunnelBackend::default());
    let service = FunnelService::new(backend.clone());

    println!("FIRE funnel demo");
    let mut form = LeadForm::new(referral.as_deref());
    if employee_code {
        form.select_code_type(CodeType::EmployeeCode);
    }
    let selected = form.selected_type();
    let city = form
        .config()
        .allowed_cities()
        .and_then(|cities| cities.first().copied())
        .unwrap_or(CITY_OPTIONS[6]);

    let active: Vec<FieldName> = form.config().active_fields(selected).collect();
    for field in active {
        match field {
            FieldName::Name => form.set_field(field, name.as_str()),
            FieldName::Mobile => form.set_field(field, "9876543210"),
            FieldName::BusinessCode => form.set_field(field, "12345678"),
            FieldName::EmployeeCode => form.set_field(field, "1234567"),
            FieldName::City => form.set_field(field, city),
            FieldName::Consent => form.set_consent(true),
        }
    }

    let lead = match form.submit(backend.as_ref()).await {
        Ok(advance) => advance,
        Err(err) => {
            println!("  Lead rejected: {err}");
            for (field, message) in form.errors().iter() {
                println!("    - {field}: {message}");
            }
            return Ok(());
        }
    };
    println!(
        "- Lead {} captured via {} -> {}",
        lead.id,
        form.config().key.unwrap_or("default form"),
        lead.next
    );
    println!("  Backend now holds {} lead(s)", backend.lead_count());

    let mut answers = QuizAnswers::default();
    answers.set(QuizField::Age, age);
    answers.set(QuizField::RetirementAge, retirement_age);
    answers.set(QuizField::MonthlyExpense, monthly_expense);
    println!("- Quiz answers:");
    for field in QuizField::ALL {
        println!(
            "    {} {}",
            field.question(),
            field.display(answers.get(field))
        );
    }

    let quiz = service.submit_quiz(&lead.id, answers).await?;
    println!("- Quiz recorded -> {}", quiz.next);

    let view = service.results(&quiz.id).await?;
    render_results(&view);
    Ok(())
}

fn render_results(view: &ResultView) {
    println!("\nDear {},", view.name);
    println!(
        "Your FIRE goal is achievable with a corpus of {}",
        view.corpus_display
    );
    println!("Suggested yearly investment: {}", view.yearly_investment_display);
    println!("Recommended plans:");
    for plan in &view.plans {
        match plan.image {
            Some(image) => println!("  - {} ({image})", plan.name),
            None => println!("  - {}", plan.name),
        }
    }
    println!("Document Reference: {}", view.document_reference);
}
