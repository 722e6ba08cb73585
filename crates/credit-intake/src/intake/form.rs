use std::collections::BTreeMap;

use super::catalog::{FieldCatalog, FieldRule, FieldValue, REQUIRED};
use super::domain::{
    ApplicationData, ChoiceOption, EmploymentStatus, FieldError, FieldName, PaymentHistory,
    Province, ValidationReport,
};

/// Raw text of every field, exactly as entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDraft {
    values: BTreeMap<FieldName, String>,
}

impl Default for FormDraft {
    fn default() -> Self {
        Self::from_application(&ApplicationData::default())
    }
}

impl FormDraft {
    pub fn from_application(application: &ApplicationData) -> Self {
        let values = FieldName::ordered()
            .into_iter()
            .map(|field| (field, application.display_value(field)))
            .collect();
        Self { values }
    }

    /// Draft with every field blank.
    pub fn blank() -> Self {
        let values = FieldName::ordered()
            .into_iter()
            .map(|field| (field, String::new()))
            .collect();
        Self { values }
    }

    pub fn get(&self, field: FieldName) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: FieldName, raw: impl Into<String>) {
        self.values.insert(field, raw.into());
    }

    /// Runs every rule and builds the typed record when all of them pass.
    pub fn validate(&self, catalog: &FieldCatalog) -> Result<ApplicationData, ValidationReport> {
        let mut parsed = BTreeMap::new();
        let mut report = ValidationReport::default();

        for spec in catalog.specs() {
            match catalog.validate(spec.name, self.get(spec.name)) {
                Ok(value) => {
                    parsed.insert(spec.name, value);
                }
                Err(error) => report.errors.push(error),
            }
        }

        if !report.is_clean() {
            return Err(report);
        }

        Parsed {
            catalog,
            values: &parsed,
        }
        .into_application()
        .map_err(|error| ValidationReport {
            errors: vec![error],
        })
    }
}

struct Parsed<'a> {
    catalog: &'a FieldCatalog,
    values: &'a BTreeMap<FieldName, FieldValue>,
}

impl Parsed<'_> {
    fn into_application(self) -> Result<ApplicationData, FieldError> {
        Ok(ApplicationData {
            applicant_id: self.text(FieldName::ApplicantId)?,
            annual_income: self.number(FieldName::AnnualIncome)?,
            self_reported_debt: self.number(FieldName::SelfReportedDebt)?,
            self_reported_expenses: self.number(FieldName::SelfReportedExpenses)?,
            requested_amount: self.number(FieldName::RequestedAmount)?,
            age: self.whole(FieldName::Age)?,
            province: self.choice(FieldName::Province, Province::from_code)?,
            employment_status: self
                .choice(FieldName::EmploymentStatus, EmploymentStatus::from_code)?,
            months_employed: self.whole(FieldName::MonthsEmployed)?,
            credit_score: self.whole(FieldName::CreditScore)?,
            total_credit_limit: self.number(FieldName::TotalCreditLimit)?,
            credit_utilization: self.number(FieldName::CreditUtilization)?,
            num_open_accounts: self.whole(FieldName::NumOpenAccounts)?,
            num_credit_inquiries: self.whole(FieldName::NumCreditInquiries)?,
            payment_history: self.choice(FieldName::PaymentHistory, PaymentHistory::from_code)?,
            monthly_expenses: self.number(FieldName::MonthlyExpenses)?,
        })
    }

    fn missing(&self, field: FieldName) -> FieldError {
        let message = match self.catalog.spec(field).map(|spec| spec.rule) {
            Some(FieldRule::Choice { invalid, .. }) => invalid,
            _ => REQUIRED,
        };
        FieldError {
            field,
            message: message.to_string(),
        }
    }

    fn text(&self, field: FieldName) -> Result<String, FieldError> {
        match self.values.get(&field) {
            Some(FieldValue::Text(value)) => Ok(value.clone()),
            _ => Err(self.missing(field)),
        }
    }

    fn number(&self, field: FieldName) -> Result<f64, FieldError> {
        match self.values.get(&field) {
            Some(FieldValue::Number(value)) => Ok(*value),
            _ => Err(self.missing(field)),
        }
    }

    fn whole(&self, field: FieldName) -> Result<u32, FieldError> {
        let value = self.number(field)?;
        if value < 0.0 || value > f64::from(u32::MAX) {
            return Err(self.missing(field));
        }
        Ok(value as u32)
    }

    fn choice<T>(&self, field: FieldName, parse: fn(&str) -> Option<T>) -> Result<T, FieldError> {
        match self.values.get(&field) {
            Some(FieldValue::Choice(code)) => parse(code).ok_or_else(|| self.missing(field)),
            _ => Err(self.missing(field)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldStatus {
    pub touched: bool,
    pub error: Option<String>,
}

/// Per-field touched and error flags for one form session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationState {
    fields: BTreeMap<FieldName, FieldStatus>,
}

impl ValidationState {
    /// Untouched state with every field's error computed from the draft.
    pub fn fresh(catalog: &FieldCatalog, draft: &FormDraft) -> Self {
        let mut state = Self::default();
        for spec in catalog.specs() {
            let error = catalog.validate(spec.name, draft.get(spec.name)).err();
            state.record(spec.name, error.map(|error| error.message));
        }
        state
    }

    pub fn record(&mut self, field: FieldName, error: Option<String>) {
        self.fields.entry(field).or_default().error = error;
    }

    pub fn touch(&mut self, field: FieldName) {
        self.fields.entry(field).or_default().touched = true;
    }

    pub fn status(&self, field: FieldName) -> Option<&FieldStatus> {
        self.fields.get(&field)
    }

    pub fn error(&self, field: FieldName) -> Option<&str> {
        self.fields
            .get(&field)
            .and_then(|status| status.error.as_deref())
    }

    /// Error shown inline: only once the field has been touched.
    pub fn visible_error(&self, field: FieldName) -> Option<&str> {
        self.fields
            .get(&field)
            .filter(|status| status.touched)
            .and_then(|status| status.error.as_deref())
    }

    pub fn is_clean(&self) -> bool {
        self.fields.values().all(|status| status.error.is_none())
    }
}

/// Index over the ordered field list, clamped to `0..len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepController {
    index: usize,
    len: usize,
}

impl StepController {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn last_index(&self) -> usize {
        self.len.saturating_sub(1)
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index == self.last_index()
    }

    /// Moves forward when the current field is valid. Returns whether the index changed.
    pub fn advance(&mut self, current_valid: bool) -> bool {
        if !current_valid {
            return false;
        }
        let next = (self.index + 1).min(self.last_index());
        let moved = next != self.index;
        self.index = next;
        moved
    }

    pub fn retreat(&mut self) -> bool {
        let previous = self.index.saturating_sub(1);
        let moved = previous != self.index;
        self.index = previous;
        moved
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Advanced { to: FieldName },
    Blocked { field: FieldName, message: String },
    AtLastStep,
}

/// Everything needed to render the current step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepView<'a> {
    pub index: usize,
    pub total: usize,
    pub field: FieldName,
    pub label: &'static str,
    pub value: &'a str,
    pub options: &'static [ChoiceOption],
    pub error: Option<&'a str>,
    pub is_first: bool,
    pub is_last: bool,
}

/// Draft values, their validation flags, and the step position of one form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    catalog: FieldCatalog,
    draft: FormDraft,
    validation: ValidationState,
    steps: StepController,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new(FieldCatalog::standard(), FormDraft::default())
    }
}

impl FormState {
    pub fn new(catalog: FieldCatalog, draft: FormDraft) -> Self {
        let validation = ValidationState::fresh(&catalog, &draft);
        let steps = StepController::new(catalog.len());
        Self {
            catalog,
            draft,
            validation,
            steps,
        }
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn validation(&self) -> &ValidationState {
        &self.validation
    }

    pub fn steps(&self) -> StepController {
        self.steps
    }

    pub fn current(&self) -> FieldName {
        self.catalog
            .at(self.steps.index())
            .map(|spec| spec.name)
            .unwrap_or(FieldName::ApplicantId)
    }

    pub fn set_value(&mut self, field: FieldName, raw: impl Into<String>) {
        let raw = raw.into();
        let error = self.catalog.validate(field, &raw).err();
        self.draft.set(field, raw);
        self.validation.record(field, error.map(|error| error.message));
    }

    pub fn set_current(&mut self, raw: impl Into<String>) {
        let field = self.current();
        self.set_value(field, raw);
    }

    pub fn touch(&mut self, field: FieldName) {
        self.validation.touch(field);
    }

    /// Touches the current field so its message shows, then advances if it passes.
    pub fn next(&mut self) -> StepOutcome {
        let field = self.current();
        self.validation.touch(field);

        if let Some(message) = self.validation.error(field) {
            tracing::debug!(field = field.key(), message, "step advance blocked");
            return StepOutcome::Blocked {
                field,
                message: message.to_string(),
            };
        }

        if self.steps.advance(true) {
            StepOutcome::Advanced { to: self.current() }
        } else {
            StepOutcome::AtLastStep
        }
    }

    pub fn back(&mut self) -> bool {
        self.steps.retreat()
    }

    pub fn step_view(&self) -> StepView<'_> {
        let field = self.current();
        let spec = self.catalog.spec(field);
        StepView {
            index: self.steps.index(),
            total: self.steps.len(),
            field,
            label: field.label(),
            value: self.draft.get(field),
            options: spec.map(|spec| spec.rule.options()).unwrap_or(&[]),
            error: self.validation.visible_error(field),
            is_first: self.steps.is_first(),
            is_last: self.steps.is_last(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validation.is_clean()
    }

    pub fn completed(&self) -> Result<ApplicationData, ValidationReport> {
        self.draft.validate(&self.catalog)
    }

    /// Back to the first step with fresh flags; entered values are kept.
    pub fn restart(&mut self) {
        self.steps.reset();
        self.validation = ValidationState::fresh(&self.catalog, &self.draft);
    }
}
