//! Declarative description of every applicant field and the rule it must pass.
//!
//! Rules are pure: they map the raw text of a candidate value to either its
//! parsed form or the message shown under the input. There is no cross-field
//! validation.

use super::domain::{
    ChoiceOption, EmploymentStatus, FieldError, FieldName, PaymentHistory, Province,
};

pub const REQUIRED: &str = "Required";
pub const NOT_A_NUMBER: &str = "Must be a number";
pub const NOT_WHOLE: &str = "Must be a whole number";

/// Inclusive numeric bound paired with the message raised when it is crossed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub value: f64,
    pub message: &'static str,
}

const fn bound(value: f64, message: &'static str) -> Bound {
    Bound { value, message }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberShape {
    Decimal,
    Whole,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldRule {
    Text {
        max_len: usize,
        too_long: &'static str,
    },
    Number {
        shape: NumberShape,
        min: Bound,
        max: Bound,
    },
    Choice {
        options: &'static [ChoiceOption],
        invalid: &'static str,
    },
}

/// Parsed form of a value that passed its rule.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Choice(&'static str),
}

impl FieldRule {
    /// Check order matters: the first failing test supplies the message.
    ///
    /// Surrounding whitespace only counts as blank for the required check and
    /// is ignored when parsing numbers. Text and choices are taken verbatim.
    pub fn check(&self, raw: &str) -> Result<FieldValue, &'static str> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(REQUIRED);
        }

        match *self {
            FieldRule::Text { max_len, too_long } => {
                if raw.chars().count() > max_len {
                    Err(too_long)
                } else {
                    Ok(FieldValue::Text(raw.to_string()))
                }
            }
            FieldRule::Number { shape, min, max } => {
                let value = trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .ok_or(NOT_A_NUMBER)?;
                if shape == NumberShape::Whole && value.fract() != 0.0 {
                    return Err(NOT_WHOLE);
                }
                if value < min.value {
                    return Err(min.message);
                }
                if value > max.value {
                    return Err(max.message);
                }
                Ok(FieldValue::Number(value))
            }
            FieldRule::Choice { options, invalid } => options
                .iter()
                .find(|option| option.value == raw)
                .map(|option| FieldValue::Choice(option.value))
                .ok_or(invalid),
        }
    }

    /// One-line human summary of what the rule accepts.
    pub fn describe(&self) -> String {
        match self {
            FieldRule::Text { max_len, .. } => format!("text, at most {max_len} characters"),
            FieldRule::Number { shape, min, max } => {
                let kind = match shape {
                    NumberShape::Decimal => "number",
                    NumberShape::Whole => "whole number",
                };
                format!("{kind} from {} to {}", min.value, max.value)
            }
            FieldRule::Choice { options, .. } => {
                let codes: Vec<&str> = options.iter().map(|option| option.value).collect();
                format!("one of {}", codes.join(", "))
            }
        }
    }

    pub fn options(&self) -> &'static [ChoiceOption] {
        match self {
            FieldRule::Choice { options, .. } => options,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: FieldName,
    pub rule: FieldRule,
}

impl FieldSpec {
    pub const fn label(&self) -> &'static str {
        self.name.label()
    }
}

const fn decimal(name: FieldName, min: Bound, max: Bound) -> FieldSpec {
    FieldSpec {
        name,
        rule: FieldRule::Number {
            shape: NumberShape::Decimal,
            min,
            max,
        },
    }
}

const fn whole(name: FieldName, min: Bound, max: Bound) -> FieldSpec {
    FieldSpec {
        name,
        rule: FieldRule::Number {
            shape: NumberShape::Whole,
            min,
            max,
        },
    }
}

const fn choice(
    name: FieldName,
    options: &'static [ChoiceOption],
    invalid: &'static str,
) -> FieldSpec {
    FieldSpec {
        name,
        rule: FieldRule::Choice { options, invalid },
    }
}

static STANDARD_FIELDS: [FieldSpec; FieldName::COUNT] = [
    FieldSpec {
        name: FieldName::ApplicantId,
        rule: FieldRule::Text {
            max_len: 50,
            too_long: "Must be 50 characters or less",
        },
    },
    decimal(
        FieldName::AnnualIncome,
        bound(20_000.0, "Must be at least $20,000"),
        bound(200_000.0, "Must be at most $200,000"),
    ),
    decimal(
        FieldName::SelfReportedDebt,
        bound(0.0, "Must be at least $0"),
        bound(10_000.0, "Must be at most $10,000"),
    ),
    decimal(
        FieldName::SelfReportedExpenses,
        bound(0.0, "Must be at least $0"),
        bound(10_000.0, "Must be at most $10,000"),
    ),
    decimal(
        FieldName::RequestedAmount,
        bound(1_000.0, "Must be at least $1,000"),
        bound(50_000.0, "Must be at most $50,000"),
    ),
    whole(
        FieldName::Age,
        bound(19.0, "Must be at least 19 years old"),
        bound(100.0, "Must be at most 100 years old"),
    ),
    choice(FieldName::Province, Province::OPTIONS, "Invalid province"),
    choice(
        FieldName::EmploymentStatus,
        EmploymentStatus::OPTIONS,
        "Invalid employment status",
    ),
    whole(
        FieldName::MonthsEmployed,
        bound(0.0, "Must be at least 0"),
        bound(600.0, "Must be at most 600"),
    ),
    whole(
        FieldName::CreditScore,
        bound(300.0, "Must be at least 300"),
        bound(900.0, "Must be at most 900"),
    ),
    decimal(
        FieldName::TotalCreditLimit,
        bound(0.0, "Must be at least $0"),
        bound(50_000.0, "Must be at most $50,000"),
    ),
    decimal(
        FieldName::CreditUtilization,
        bound(0.0, "Must be at least 0%"),
        bound(100.0, "Must be at most 100%"),
    ),
    whole(
        FieldName::NumOpenAccounts,
        bound(0.0, "Must be at least 0"),
        bound(20.0, "Must be at most 20"),
    ),
    whole(
        FieldName::NumCreditInquiries,
        bound(0.0, "Must be at least 0"),
        bound(10.0, "Must be at most 10"),
    ),
    choice(
        FieldName::PaymentHistory,
        PaymentHistory::OPTIONS,
        "Invalid payment history",
    ),
    decimal(
        FieldName::MonthlyExpenses,
        bound(0.0, "Must be at least $0"),
        bound(10_000.0, "Must be at most $10,000"),
    ),
];

/// Ordered field list the step controller walks through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldCatalog {
    specs: &'static [FieldSpec],
}

impl Default for FieldCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl FieldCatalog {
    pub fn standard() -> Self {
        Self {
            specs: &STANDARD_FIELDS,
        }
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn specs(&self) -> &'static [FieldSpec] {
        self.specs
    }

    pub fn at(&self, index: usize) -> Option<&'static FieldSpec> {
        self.specs.get(index)
    }

    pub fn spec(&self, field: FieldName) -> Option<&'static FieldSpec> {
        self.specs.iter().find(|spec| spec.name == field)
    }

    pub fn validate(&self, field: FieldName, raw: &str) -> Result<FieldValue, FieldError> {
        let spec = self.spec(field).ok_or_else(|| FieldError {
            field,
            message: REQUIRED.to_string(),
        })?;
        spec.rule.check(raw).map_err(|message| FieldError {
            field,
            message: message.to_string(),
        })
    }
}
