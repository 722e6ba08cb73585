//! Credit-line applicant intake: field catalog, step-by-step form, decision
//! service submission, and the session state that ties them together.

pub mod catalog;
pub mod domain;
pub mod form;
pub mod records;
pub mod session;
pub mod submission;

#[cfg(test)]
mod tests;

pub use catalog::{FieldCatalog, FieldRule, FieldSpec, FieldValue};
pub use domain::{
    ApplicationData, ChoiceOption, EmploymentStatus, FieldError, FieldName, PaymentHistory,
    Province, ValidationReport,
};
pub use form::{FormDraft, FormState, StepController, StepOutcome, StepView, ValidationState};
pub use records::{RecordCheck, RecordFormat, RecordImportError};
pub use session::{
    DecisionRecord, Dispatched, Effect, IntakeSession, Screen, SessionAction, SessionState,
    SessionView, SubmitAttempt,
};
pub use submission::{DecisionClient, DecisionResult, HttpDecisionClient, SubmissionError};
