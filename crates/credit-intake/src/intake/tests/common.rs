use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::intake::domain::{ApplicationData, FieldName};
use crate::intake::form::{FormState, StepOutcome};
use crate::intake::session::{SessionAction, SessionState};
use crate::intake::submission::{DecisionClient, DecisionResult, SubmissionError};

pub(super) fn walk_to(form: &mut FormState, field: FieldName) {
    while form.current() != field {
        match form.next() {
            StepOutcome::Advanced { .. } => {}
            other => panic!("could not reach {field:?}: {other:?}"),
        }
    }
}

pub(super) fn session_at_last_step() -> SessionState {
    let mut state = SessionState::default();
    for _ in 0..FieldName::COUNT - 1 {
        state = state.reduce(SessionAction::Next).state;
    }
    assert!(state.form().steps().is_last());
    state
}

#[derive(Clone, Default)]
pub(super) struct StubClient {
    responses: Arc<Mutex<VecDeque<Result<DecisionResult, SubmissionError>>>>,
    calls: Arc<Mutex<Vec<ApplicationData>>>,
}

impl StubClient {
    pub(super) fn responding(response: Result<DecisionResult, SubmissionError>) -> Self {
        let client = Self::default();
        client
            .responses
            .lock()
            .expect("responses mutex poisoned")
            .push_back(response);
        client
    }

    pub(super) fn calls(&self) -> Vec<ApplicationData> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }
}

#[async_trait]
impl DecisionClient for StubClient {
    async fn submit(
        &self,
        application: &ApplicationData,
    ) -> Result<DecisionResult, SubmissionError> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push(application.clone());
        self.responses
            .lock()
            .expect("responses mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| {
                Err(SubmissionError::Transport {
                    message: "no stubbed response".to_string(),
                })
            })
    }
}
