//! Indian-numbering display helpers for amounts returned by the backend.

pub const RUPEE: &str = "₹";
pub const ZERO_DISPLAY: &str = "0";

const CRORE: f64 = 10_000_000.0;
const LAKH: f64 = 100_000.0;
const THOUSAND: f64 = 1_000.0;

#[derive(Debug, Clone, Copy)]
struct Tier {
    threshold: f64,
    suffix: &'static str,
}

const CURRENCY_TIERS: &[Tier] = &[
    Tier {
        threshold: CRORE,
        suffix: " Cr",
    },
    Tier {
        threshold: LAKH,
        suffix: " L",
    },
    Tier {
        threshold: THOUSAND,
        suffix: "K",
    },
];

const YEARLY_TIERS: &[Tier] = &[
    Tier {
        threshold: LAKH,
        suffix: " Lacs",
    },
    Tier {
        threshold: THOUSAND,
        suffix: "K",
    },
];

/// Abbreviates an amount into crore, lakh or thousand units with one decimal place.
///
/// Missing, zero, NaN and infinite amounts render as `"0"`.
pub fn format_abbreviated_currency(amount: Option<f64>) -> String {
    abbreviate(amount, CURRENCY_TIERS)
}

/// Like [`format_abbreviated_currency`] but tops out at lakhs, spelled "Lacs".
pub fn format_abbreviated_yearly_amount(amount: Option<f64>) -> String {
    abbreviate(amount, YEARLY_TIERS)
}

/// Prefixes a formatted amount with the rupee sign, keeping any minus sign in front.
pub fn with_rupee(formatted: &str) -> String {
    match formatted.strip_prefix('-') {
        Some(magnitude) => format!("-{RUPEE}{magnitude}"),
        None => format!("{RUPEE}{formatted}"),
    }
}

/// Abbreviated currency with the rupee sign, e.g. `"₹2.5 L"`.
pub fn format_rupees(amount: Option<f64>) -> String {
    with_rupee(&format_abbreviated_currency(amount))
}

/// Groups the integer digits with commas, e.g. `50000` -> `"50,000"`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

fn abbreviate(amount: Option<f64>, tiers: &[Tier]) -> String {
    let amount = match amount {
        Some(value) if value.is_finite() && value != 0.0 => value,
        _ => return ZERO_DISPLAY.to_string(),
    };

    let magnitude = amount.abs();
    let body = match tiers.iter().find(|tier| magnitude >= tier.threshold) {
        Some(tier) => format!("{:.1}{}", round_to_tenths(magnitude / tier.threshold), tier.suffix),
        None => format!("{:.0}", magnitude.round()),
    };

    if amount.is_sign_negative() && body != ZERO_DISPLAY {
        format!("-{body}")
    } else {
        body
    }
}

/// `f64::round` already rounds half away from zero; scaling keeps one decimal.
fn round_to_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
