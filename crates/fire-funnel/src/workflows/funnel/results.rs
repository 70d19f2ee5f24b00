use serde::Serialize;

use super::backend::Recommendation;
use super::format::{format_abbreviated_yearly_amount, format_rupees, with_rupee};

const DOCUMENT_REFERENCE_PREFIX: &str = "AD-F/2025-26";

const PLAN_ARTWORK: &[(&str, &str)] = &[
    ("CENTURY", "/images/recommendation/CENTURY.png"),
    ("MGFP", "/images/recommendation/FUTURE.png"),
    ("GAIN", "/images/recommendation/GAIN.png"),
    ("HYBRID", "/images/recommendation/HYBRID.png"),
];

/// Artwork path for a recommended plan, if one ships with the funnel.
pub fn plan_artwork(plan: &str) -> Option<&'static str> {
    PLAN_ARTWORK
        .iter()
        .find(|(name, _)| *name == plan)
        .map(|(_, image)| *image)
}

/// Disclosure code printed in the results footer.
pub fn document_code(channel: Option<&str>) -> u16 {
    match channel {
        Some("agency") => 445,
        Some("jkb") | Some("kbl") => 443,
        _ => 444,
    }
}

pub fn document_reference(channel: Option<&str>) -> String {
    format!("{DOCUMENT_REFERENCE_PREFIX}/{}", document_code(channel))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanCard {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<&'static str>,
}

/// What the results step shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultView {
    pub name: String,
    pub corpus_display: String,
    pub yearly_investment_display: String,
    pub plans: Vec<PlanCard>,
    pub document_reference: String,
}

impl ResultView {
    /// `None` when the backend had no user for the identifier.
    pub fn from_recommendation(recommendation: Recommendation) -> Option<Self> {
        let Recommendation {
            user,
            recommended_plan,
        } = recommendation;
        let user = user?;

        let plans = recommended_plan
            .into_iter()
            .map(|name| PlanCard {
                image: plan_artwork(&name),
                name,
            })
            .collect();

        Some(Self {
            corpus_display: format_rupees(user.retirement_corpus),
            yearly_investment_display: with_rupee(&format_abbreviated_yearly_amount(
                user.yearly_investment,
            )),
            document_reference: document_reference(user.channel.as_deref()),
            name: user.name,
            plans,
        })
    }
}
