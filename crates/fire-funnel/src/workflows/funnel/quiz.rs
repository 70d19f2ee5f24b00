use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::format::{group_thousands, RUPEE};

/// Bounds of one quiz slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SliderSpec {
    pub min: u32,
    pub max: u32,
    pub step: u32,
    pub default: u32,
}

impl SliderSpec {
    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub fn is_aligned(&self, value: u32) -> bool {
        value
            .checked_sub(self.min)
            .is_some_and(|offset| offset % self.step == 0)
    }

    /// Clamps into range and rounds to the nearest step (ties go up).
    pub fn snap(&self, value: u32) -> u32 {
        let clamped = value.clamp(self.min, self.max);
        let offset = clamped - self.min;
        let steps = (offset + self.step / 2) / self.step;
        (self.min + steps * self.step).min(self.max)
    }

    /// Share of the track left of the thumb, 0.0 to 100.0.
    pub fn fill_percent(&self, value: u32) -> f64 {
        if self.max == self.min {
            return 100.0;
        }
        let value = value.clamp(self.min, self.max);
        f64::from(value - self.min) / f64::from(self.max - self.min) * 100.0
    }
}

pub const AGE_SLIDER: SliderSpec = SliderSpec {
    min: 18,
    max: 80,
    step: 1,
    default: 25,
};

pub const RETIREMENT_AGE_SLIDER: SliderSpec = SliderSpec {
    min: 40,
    max: 80,
    step: 1,
    default: 60,
};

pub const MONTHLY_EXPENSE_SLIDER: SliderSpec = SliderSpec {
    min: 10_000,
    max: 200_000,
    step: 5_000,
    default: 50_000,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuizField {
    Age,
    RetirementAge,
    MonthlyExpense,
}

impl QuizField {
    pub const ALL: [QuizField; 3] = [
        QuizField::Age,
        QuizField::RetirementAge,
        QuizField::MonthlyExpense,
    ];

    pub const fn slider(self) -> SliderSpec {
        match self {
            QuizField::Age => AGE_SLIDER,
            QuizField::RetirementAge => RETIREMENT_AGE_SLIDER,
            QuizField::MonthlyExpense => MONTHLY_EXPENSE_SLIDER,
        }
    }

    pub const fn question(self) -> &'static str {
        match self {
            QuizField::Age => "1. Your current age (years)?",
            QuizField::RetirementAge => "2. Your planned retirement age (years)?",
            QuizField::MonthlyExpense => "3. Your monthly expense?",
        }
    }

    const fn label(self) -> &'static str {
        match self {
            QuizField::Age => "Age",
            QuizField::RetirementAge => "Retirement age",
            QuizField::MonthlyExpense => "Monthly expense",
        }
    }

    /// Slider readout: plain years for ages, grouped rupees for the expense.
    pub fn display(self, value: u32) -> String {
        match self {
            QuizField::MonthlyExpense => format!("{RUPEE}{}", group_thousands(u64::from(value))),
            QuizField::Age | QuizField::RetirementAge => value.to_string(),
        }
    }
}

/// Body posted to `add-quiz`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswers {
    pub age: u32,
    pub retirement_age: u32,
    pub monthly_expense: u32,
}

impl Default for QuizAnswers {
    fn default() -> Self {
        Self {
            age: AGE_SLIDER.default,
            retirement_age: RETIREMENT_AGE_SLIDER.default,
            monthly_expense: MONTHLY_EXPENSE_SLIDER.default,
        }
    }
}

impl QuizAnswers {
    pub fn new(age: u32, retirement_age: u32, monthly_expense: u32) -> Result<Self, QuizErrors> {
        let answers = Self {
            age,
            retirement_age,
            monthly_expense,
        };
        answers.validate()?;
        Ok(answers)
    }

    pub fn get(&self, field: QuizField) -> u32 {
        match field {
            QuizField::Age => self.age,
            QuizField::RetirementAge => self.retirement_age,
            QuizField::MonthlyExpense => self.monthly_expense,
        }
    }

    /// Moves a slider; the value is snapped onto the slider's track.
    pub fn set(&mut self, field: QuizField, value: u32) {
        let snapped = field.slider().snap(value);
        match field {
            QuizField::Age => self.age = snapped,
            QuizField::RetirementAge => self.retirement_age = snapped,
            QuizField::MonthlyExpense => self.monthly_expense = snapped,
        }
    }

    /// Answers arriving over the wire must sit on their slider tracks.
    pub fn validate(&self) -> Result<(), QuizErrors> {
        let mut errors = BTreeMap::new();
        for field in QuizField::ALL {
            let slider = field.slider();
            let value = self.get(field);
            if !slider.contains(value) {
                errors.insert(
                    field,
                    format!(
                        "{} must be between {} and {}",
                        field.label(),
                        group_thousands(u64::from(slider.min)),
                        group_thousands(u64::from(slider.max))
                    ),
                );
            } else if !slider.is_aligned(value) {
                errors.insert(
                    field,
                    format!(
                        "{} must move in steps of {}",
                        field.label(),
                        group_thousands(u64::from(slider.step))
                    ),
                );
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(QuizErrors(errors))
        }
    }
}

/// Per-slider messages for answers that fall off their track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QuizErrors(pub BTreeMap<QuizField, String>);

impl QuizErrors {
    pub fn get(&self, field: QuizField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }
}

impl fmt::Display for QuizErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.values().map(String::as_str).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for QuizErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_initial_slider_positions() {
        let answers = QuizAnswers::default();
        assert_eq!(answers.age, 25);
        assert_eq!(answers.retirement_age, 60);
        assert_eq!(answers.monthly_expense, 50_000);
        assert!(answers.validate().is_ok());
    }

    #[test]
    fn snap_clamps_and_rounds_to_step() {
        assert_eq!(MONTHLY_EXPENSE_SLIDER.snap(52_400), 50_000);
        assert_eq!(MONTHLY_EXPENSE_SLIDER.snap(52_500), 55_000);
        assert_eq!(MONTHLY_EXPENSE_SLIDER.snap(5_000), 10_000);
        assert_eq!(MONTHLY_EXPENSE_SLIDER.snap(900_000), 200_000);
        assert_eq!(AGE_SLIDER.snap(12), 18);
    }

    #[test]
    fn set_keeps_answers_on_track() {
        let mut answers = QuizAnswers::default();
        answers.set(QuizField::RetirementAge, 95);
        answers.set(QuizField::MonthlyExpense, 61_000);
        assert_eq!(answers.retirement_age, 80);
        assert_eq!(answers.monthly_expense, 60_000);
    }

    #[test]
    fn validate_reports_each_bad_slider() {
        let errors = QuizAnswers::new(17, 60, 12_345).expect_err("answers are off track");
        assert_eq!(errors.get(QuizField::Age), Some("Age must be between 18 and 80"));
        assert_eq!(
            errors.get(QuizField::MonthlyExpense),
            Some("Monthly expense must move in steps of 5,000")
        );
        assert!(errors.get(QuizField::RetirementAge).is_none());
    }

    #[test]
    fn display_and_fill_follow_slider() {
        assert_eq!(QuizField::MonthlyExpense.display(50_000), "₹50,000");
        assert_eq!(QuizField::Age.display(25), "25");
        assert_eq!(RETIREMENT_AGE_SLIDER.fill_percent(60), 50.0);
        assert_eq!(AGE_SLIDER.fill_percent(0), 0.0);
    }
}
