use serde::{Deserialize, Serialize};

/// Keys of the applicant record, in the order the form visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    ApplicantId,
    AnnualIncome,
    SelfReportedDebt,
    SelfReportedExpenses,
    RequestedAmount,
    Age,
    Province,
    EmploymentStatus,
    MonthsEmployed,
    CreditScore,
    TotalCreditLimit,
    CreditUtilization,
    NumOpenAccounts,
    NumCreditInquiries,
    PaymentHistory,
    MonthlyExpenses,
}

impl FieldName {
    pub const COUNT: usize = 16;

    pub const fn ordered() -> [Self; Self::COUNT] {
        [
            Self::ApplicantId,
            Self::AnnualIncome,
            Self::SelfReportedDebt,
            Self::SelfReportedExpenses,
            Self::RequestedAmount,
            Self::Age,
            Self::Province,
            Self::EmploymentStatus,
            Self::MonthsEmployed,
            Self::CreditScore,
            Self::TotalCreditLimit,
            Self::CreditUtilization,
            Self::NumOpenAccounts,
            Self::NumCreditInquiries,
            Self::PaymentHistory,
            Self::MonthlyExpenses,
        ]
    }

    /// Wire key used in the JSON body and in CSV headers.
    pub const fn key(self) -> &'static str {
        match self {
            Self::ApplicantId => "applicant_id",
            Self::AnnualIncome => "annual_income",
            Self::SelfReportedDebt => "self_reported_debt",
            Self::SelfReportedExpenses => "self_reported_expenses",
            Self::RequestedAmount => "requested_amount",
            Self::Age => "age",
            Self::Province => "province",
            Self::EmploymentStatus => "employment_status",
            Self::MonthsEmployed => "months_employed",
            Self::CreditScore => "credit_score",
            Self::TotalCreditLimit => "total_credit_limit",
            Self::CreditUtilization => "credit_utilization",
            Self::NumOpenAccounts => "num_open_accounts",
            Self::NumCreditInquiries => "num_credit_inquiries",
            Self::PaymentHistory => "payment_history",
            Self::MonthlyExpenses => "monthly_expenses",
        }
    }

    /// Heading shown above the input for this step.
    pub const fn label(self) -> &'static str {
        match self {
            Self::ApplicantId => "APPLICANT ID",
            Self::AnnualIncome => "ANNUAL INCOME",
            Self::SelfReportedDebt => "SELF REPORTED DEBT",
            Self::SelfReportedExpenses => "SELF REPORTED EXPENSES",
            Self::RequestedAmount => "REQUESTED AMOUNT",
            Self::Age => "AGE",
            Self::Province => "PROVINCE",
            Self::EmploymentStatus => "EMPLOYMENT STATUS",
            Self::MonthsEmployed => "MONTHS EMPLOYED",
            Self::CreditScore => "CREDIT SCORE",
            Self::TotalCreditLimit => "TOTAL CREDIT LIMIT",
            Self::CreditUtilization => "CREDIT UTILIZATION",
            Self::NumOpenAccounts => "NUM OPEN ACCOUNTS",
            Self::NumCreditInquiries => "NUM CREDIT INQUIRIES",
            Self::PaymentHistory => "PAYMENT HISTORY",
            Self::MonthlyExpenses => "MONTHLY EXPENSES",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ordered().into_iter().find(|field| field.key() == key)
    }
}

/// A selectable value for an enumerated field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChoiceOption {
    pub value: &'static str,
    pub label: &'static str,
}

macro_rules! closed_set {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => ($code:literal, $label:literal)),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $code)] $variant),+
        }

        impl $name {
            pub const OPTIONS: &'static [ChoiceOption] = &[
                $(ChoiceOption { value: $code, label: $label }),+
            ];

            pub const fn code(self) -> &'static str {
                match self {
                    $(Self::$variant => $code),+
                }
            }

            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            pub fn from_code(code: &str) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

closed_set! {
    /// Canadian province or territory of residence.
    Province {
        Ontario => ("ON", "Ontario"),
        BritishColumbia => ("BC", "British Columbia"),
        Alberta => ("AB", "Alberta"),
        Quebec => ("QC", "Quebec"),
        Manitoba => ("MB", "Manitoba"),
        Saskatchewan => ("SK", "Saskatchewan"),
        NovaScotia => ("NS", "Nova Scotia"),
        NewBrunswick => ("NB", "New Brunswick"),
        NewfoundlandAndLabrador => ("NL", "Newfoundland and Labrador"),
        PrinceEdwardIsland => ("PE", "Prince Edward Island"),
        Yukon => ("YT", "Yukon"),
        NorthwestTerritories => ("NT", "Northwest Territories"),
        Nunavut => ("NU", "Nunavut"),
    }
}

closed_set! {
    EmploymentStatus {
        FullTime => ("Full-time", "Full-time"),
        PartTime => ("Part-time", "Part-time"),
        Unemployed => ("Unemployed", "Unemployed"),
    }
}

closed_set! {
    /// Worst delinquency bucket reported on the applicant's payment history.
    PaymentHistory {
        OnTime => ("On Time", "On Time"),
        LateUnder30 => ("Late <30", "Late <30 days"),
        Late30To60 => ("Late 30-60", "Late 30-60 days"),
        LateOver60 => ("Late >60", "Late >60 days"),
    }
}

/// The sixteen-field applicant record sent to the decision service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationData {
    pub applicant_id: String,
    pub annual_income: f64,
    pub self_reported_debt: f64,
    pub self_reported_expenses: f64,
    pub requested_amount: f64,
    pub age: u32,
    pub province: Province,
    pub employment_status: EmploymentStatus,
    pub months_employed: u32,
    pub credit_score: u32,
    pub total_credit_limit: f64,
    pub credit_utilization: f64,
    pub num_open_accounts: u32,
    pub num_credit_inquiries: u32,
    pub payment_history: PaymentHistory,
    pub monthly_expenses: f64,
}

impl Default for ApplicationData {
    fn default() -> Self {
        Self {
            applicant_id: "APP00016".to_string(),
            annual_income: 60_000.0,
            self_reported_debt: 1_000.0,
            self_reported_expenses: 2_000.0,
            requested_amount: 10_000.0,
            age: 35,
            province: Province::Ontario,
            employment_status: EmploymentStatus::FullTime,
            months_employed: 24,
            credit_score: 700,
            total_credit_limit: 15_000.0,
            credit_utilization: 30.0,
            num_open_accounts: 3,
            num_credit_inquiries: 1,
            payment_history: PaymentHistory::OnTime,
            monthly_expenses: 2_500.0,
        }
    }
}

impl ApplicationData {
    /// Text form of a field as it would appear in the form input.
    pub fn display_value(&self, field: FieldName) -> String {
        match field {
            FieldName::ApplicantId => self.applicant_id.clone(),
            FieldName::AnnualIncome => self.annual_income.to_string(),
            FieldName::SelfReportedDebt => self.self_reported_debt.to_string(),
            FieldName::SelfReportedExpenses => self.self_reported_expenses.to_string(),
            FieldName::RequestedAmount => self.requested_amount.to_string(),
            FieldName::Age => self.age.to_string(),
            FieldName::Province => self.province.code().to_string(),
            FieldName::EmploymentStatus => self.employment_status.code().to_string(),
            FieldName::MonthsEmployed => self.months_employed.to_string(),
            FieldName::CreditScore => self.credit_score.to_string(),
            FieldName::TotalCreditLimit => self.total_credit_limit.to_string(),
            FieldName::CreditUtilization => self.credit_utilization.to_string(),
            FieldName::NumOpenAccounts => self.num_open_accounts.to_string(),
            FieldName::NumCreditInquiries => self.num_credit_inquiries.to_string(),
            FieldName::PaymentHistory => self.payment_history.code().to_string(),
            FieldName::MonthlyExpenses => self.monthly_expenses.to_string(),
        }
    }
}

/// A single field that failed its rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: FieldName,
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field.key(), self.message)
    }
}

/// Every failing field of a record, in form order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, thiserror::Error)]
#[error("{} field(s) failed validation: {}", .errors.len(), summarize(.errors))]
pub struct ValidationReport {
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn message_for(&self, field: FieldName) -> Option<&str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
