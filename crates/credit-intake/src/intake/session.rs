//! Top-level intake state and the single update function that drives it.
//!
//! Every transition consumes the previous [`SessionState`] and yields the next
//! one, optionally with an [`Effect`] for the driver to run. Rendering decisions
//! are derived from the state through [`SessionState::view`].

use chrono::{DateTime, Utc};

use super::catalog::FieldCatalog;
use super::domain::{ApplicationData, FieldName};
use super::form::{FormDraft, FormState, StepOutcome};
use super::submission::{DecisionClient, DecisionResult, SubmissionError};

/// A stored decision and when it arrived.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionRecord {
    pub result: DecisionResult,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug)]
pub enum SessionAction {
    SetValue { field: FieldName, raw: String },
    Touch(FieldName),
    Next,
    Back,
    SubmitRequested,
    SubmissionSucceeded {
        result: DecisionResult,
        received_at: DateTime<Utc>,
    },
    SubmissionFailed(SubmissionError),
    DismissError,
    Reset,
}

/// Work the driver must perform after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Submit(ApplicationData),
}

#[derive(Debug)]
pub struct Transition {
    pub state: SessionState,
    pub effect: Option<Effect>,
    pub step: Option<StepOutcome>,
}

impl Transition {
    fn to(state: SessionState) -> Self {
        Self {
            state,
            effect: None,
            step: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Screen<'a> {
    Form,
    Result(&'a DecisionRecord),
}

/// What to render: the main screen plus an optional error overlay on top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionView<'a> {
    pub screen: Screen<'a>,
    pub overlay: Option<&'a str>,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    form: FormState,
    result: Option<DecisionRecord>,
    error: Option<String>,
    loading: bool,
}

impl SessionState {
    pub fn new(catalog: FieldCatalog, draft: FormDraft) -> Self {
        Self {
            form: FormState::new(catalog, draft),
            result: None,
            error: None,
            loading: false,
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn result(&self) -> Option<&DecisionRecord> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Submission is reachable only from the last step of a fully valid form.
    pub fn can_submit(&self) -> bool {
        !self.loading && self.form.steps().is_last() && self.form.is_valid()
    }

    pub fn view(&self) -> SessionView<'_> {
        let screen = match &self.result {
            Some(record) => Screen::Result(record),
            None => Screen::Form,
        };
        SessionView {
            screen,
            overlay: self.error.as_deref(),
            loading: self.loading,
        }
    }

    pub fn reduce(mut self, action: SessionAction) -> Transition {
        match action {
            SessionAction::SetValue { field, raw } => {
                self.form.set_value(field, raw);
                Transition::to(self)
            }
            SessionAction::Touch(field) => {
                self.form.touch(field);
                Transition::to(self)
            }
            SessionAction::Next => {
                let outcome = self.form.next();
                Transition {
                    state: self,
                    effect: None,
                    step: Some(outcome),
                }
            }
            SessionAction::Back => {
                self.form.back();
                Transition::to(self)
            }
            SessionAction::SubmitRequested => self.request_submission(),
            SessionAction::SubmissionSucceeded { .. } | SessionAction::SubmissionFailed(_)
                if !self.loading =>
            {
                tracing::warn!("submission completed with no request in flight; ignoring");
                Transition::to(self)
            }
            SessionAction::SubmissionSucceeded {
                result,
                received_at,
            } => {
                self.loading = false;
                self.result = Some(DecisionRecord {
                    result,
                    received_at,
                });
                Transition::to(self)
            }
            SessionAction::SubmissionFailed(error) => {
                self.loading = false;
                self.error = Some(error.message().to_string());
                Transition::to(self)
            }
            SessionAction::DismissError => {
                self.error = None;
                Transition::to(self)
            }
            SessionAction::Reset => {
                self.result = None;
                self.error = None;
                self.form.restart();
                Transition::to(self)
            }
        }
    }

    fn request_submission(mut self) -> Transition {
        if self.loading {
            tracing::warn!("submission already in flight; ignoring request");
            return Transition::to(self);
        }
        if !self.form.steps().is_last() {
            tracing::debug!(
                step = self.form.steps().index(),
                "submit requested before the last step"
            );
            return Transition::to(self);
        }

        let current = self.form.current();
        self.form.touch(current);
        let application = match self.form.completed() {
            Ok(application) => application,
            Err(report) => {
                tracing::debug!(%report, "submit requested with invalid fields");
                return Transition::to(self);
            }
        };

        self.loading = true;
        self.error = None;
        Transition {
            state: self,
            effect: Some(Effect::Submit(application)),
            step: None,
        }
    }
}

/// Outcome of [`IntakeSession::dispatch`], without the state it already stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatched {
    pub effect: Option<Effect>,
    pub step: Option<StepOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAttempt {
    /// The guard rejected the request; nothing was sent.
    Ignored,
    Decided,
    Failed(SubmissionError),
}

/// Owns the session state and runs the effects its transitions request.
pub struct IntakeSession<C> {
    state: SessionState,
    client: C,
}

impl<C: DecisionClient> IntakeSession<C> {
    pub fn new(client: C, state: SessionState) -> Self {
        Self { state, client }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Applies one action. Effects are returned, not run.
    pub fn dispatch(&mut self, action: SessionAction) -> Dispatched {
        let current = std::mem::take(&mut self.state);
        let Transition {
            state,
            effect,
            step,
        } = current.reduce(action);
        self.state = state;
        Dispatched { effect, step }
    }

    /// Requests submission and, when the guard allows it, performs the call.
    pub async fn submit(&mut self) -> SubmitAttempt {
        let Dispatched { effect, .. } = self.dispatch(SessionAction::SubmitRequested);
        let Some(Effect::Submit(application)) = effect else {
            return SubmitAttempt::Ignored;
        };

        match self.client.submit(&application).await {
            Ok(result) => {
                self.dispatch(SessionAction::SubmissionSucceeded {
                    result,
                    received_at: Utc::now(),
                });
                SubmitAttempt::Decided
            }
            Err(error) => {
                self.dispatch(SessionAction::SubmissionFailed(error.clone()));
                SubmitAttempt::Failed(error)
            }
        }
    }
}
