use chrono::{TimeZone, Utc};
use serde_json::json;

use super::common::{session_at_last_step, StubClient};
use crate::intake::domain::{ApplicationData, FieldName};
use crate::intake::session::{
    Effect, IntakeSession, Screen, SessionAction, SessionState, SubmitAttempt,
};
use crate::intake::submission::{DecisionResult, SubmissionError};

fn approved() -> DecisionResult {
    DecisionResult(json!({ "decision": "approved" }))
}

fn rejected() -> SubmissionError {
    SubmissionError::Rejected {
        status: 400,
        message: "annual_income too low".to_string(),
    }
}

#[test]
fn submit_at_last_step_emits_default_record() {
    let transition = session_at_last_step().reduce(SessionAction::SubmitRequested);

    assert_eq!(
        transition.effect,
        Some(Effect::Submit(ApplicationData::default()))
    );
    assert!(transition.state.is_loading());
    assert_eq!(transition.state.view().overlay, None);
}

#[test]
fn submit_before_last_step_is_ignored() {
    let state = SessionState::default().reduce(SessionAction::Next).state;
    let transition = state.clone().reduce(SessionAction::SubmitRequested);

    assert_eq!(transition.effect, None);
    assert_eq!(transition.state, state);
}

#[test]
fn concurrent_submit_is_rejected_while_loading() {
    let loading = session_at_last_step()
        .reduce(SessionAction::SubmitRequested)
        .state;
    let second = loading.clone().reduce(SessionAction::SubmitRequested);

    assert_eq!(second.effect, None);
    assert_eq!(second.state, loading);
    assert!(!second.state.can_submit());
}

#[test]
fn submit_with_invalid_field_is_ignored_and_shows_message() {
    let state = session_at_last_step().reduce(SessionAction::SetValue {
        field: FieldName::MonthlyExpenses,
        raw: "20000".to_string(),
    });
    let transition = state.state.reduce(SessionAction::SubmitRequested);

    assert_eq!(transition.effect, None);
    assert!(!transition.state.is_loading());
    assert_eq!(
        transition.state.form().step_view().error,
        Some("Must be at most $10,000")
    );
}

#[test]
fn success_switches_to_result_view() {
    let received_at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    let state = session_at_last_step()
        .reduce(SessionAction::SubmitRequested)
        .state
        .reduce(SessionAction::SubmissionSucceeded {
            result: approved(),
            received_at,
        })
        .state;

    assert!(!state.is_loading());
    match state.view().screen {
        Screen::Result(record) => {
            assert_eq!(record.result.payload(), &json!({ "decision": "approved" }));
            assert_eq!(record.received_at, received_at);
        }
        Screen::Form => panic!("expected result view"),
    }
    assert_eq!(state.view().overlay, None);
}

#[test]
fn rejection_shows_overlay_and_preserves_values() {
    let before = session_at_last_step();
    let state = before
        .clone()
        .reduce(SessionAction::SubmitRequested)
        .state
        .reduce(SessionAction::SubmissionFailed(rejected()))
        .state;

    let view = state.view();
    assert_eq!(view.overlay, Some("annual_income too low"));
    assert_eq!(view.screen, Screen::Form);
    assert!(!view.loading);
    assert_eq!(state.form().draft(), before.form().draft());
}

#[test]
fn dismissing_the_overlay_allows_resubmission() {
    let state = session_at_last_step()
        .reduce(SessionAction::SetValue {
            field: FieldName::MonthlyExpenses,
            raw: "3100".to_string(),
        })
        .state
        .reduce(SessionAction::SubmitRequested)
        .state
        .reduce(SessionAction::SubmissionFailed(rejected()))
        .state
        .reduce(SessionAction::DismissError)
        .state;

    assert_eq!(state.error(), None);
    assert_eq!(state.form().draft().get(FieldName::MonthlyExpenses), "3100");

    let retry = state.reduce(SessionAction::SubmitRequested);
    assert!(matches!(retry.effect, Some(Effect::Submit(_))));
}

fn decided_then_rejected(state: SessionState) -> SessionState {
    state
        .reduce(SessionAction::SubmitRequested)
        .state
        .reduce(SessionAction::SubmissionSucceeded {
            result: approved(),
            received_at: Utc::now(),
        })
        .state
        .reduce(SessionAction::SubmitRequested)
        .state
        .reduce(SessionAction::SubmissionFailed(rejected()))
        .state
}

#[test]
fn completion_without_request_in_flight_is_ignored() {
    let idle = session_at_last_step();

    let late_success = idle.clone().reduce(SessionAction::SubmissionSucceeded {
        result: approved(),
        received_at: Utc::now(),
    });
    assert_eq!(late_success.state, idle);

    let late_failure = idle.clone().reduce(SessionAction::SubmissionFailed(rejected()));
    assert_eq!(late_failure.state, idle);
    assert_eq!(late_failure.state.view().overlay, None);
}

#[test]
fn completion_after_reset_does_not_restore_result() {
    let reset = session_at_last_step()
        .reduce(SessionAction::SubmitRequested)
        .state
        .reduce(SessionAction::SubmissionSucceeded {
            result: approved(),
            received_at: Utc::now(),
        })
        .state
        .reduce(SessionAction::Reset)
        .state;

    let state = reset
        .reduce(SessionAction::SubmissionSucceeded {
            result: approved(),
            received_at: Utc::now(),
        })
        .state
        .reduce(SessionAction::SubmissionFailed(rejected()))
        .state;

    assert_eq!(state.result(), None);
    assert_eq!(state.error(), None);
    assert_eq!(state.view().screen, Screen::Form);
}

#[test]
fn overlay_is_independent_of_result() {
    let state = decided_then_rejected(session_at_last_step());

    let view = state.view();
    assert!(matches!(view.screen, Screen::Result(_)));
    assert_eq!(view.overlay, Some("annual_income too low"));
}

#[test]
fn reset_clears_result_and_error_but_keeps_values() {
    let edited = session_at_last_step()
        .reduce(SessionAction::SetValue {
            field: FieldName::MonthlyExpenses,
            raw: "4000".to_string(),
        })
        .state;
    let state = decided_then_rejected(edited)
        .reduce(SessionAction::Reset)
        .state;

    assert_eq!(state.result(), None);
    assert_eq!(state.error(), None);
    assert_eq!(state.view().screen, Screen::Form);
    assert_eq!(state.form().steps().index(), 0);
    assert_eq!(state.form().draft().get(FieldName::MonthlyExpenses), "4000");
}

#[tokio::test]
async fn session_driver_stores_decision() {
    let client = StubClient::responding(Ok(approved()));
    let mut session = IntakeSession::new(client.clone(), session_at_last_step());

    assert_eq!(session.submit().await, SubmitAttempt::Decided);

    assert_eq!(client.calls(), vec![ApplicationData::default()]);
    assert!(!session.state().is_loading());
    assert!(matches!(session.state().view().screen, Screen::Result(_)));
}

#[tokio::test]
async fn session_driver_clears_loading_after_transport_failure() {
    let failure = SubmissionError::Transport {
        message: "error sending request for url (http://127.0.0.1:9/api/predict/)".to_string(),
    };
    let client = StubClient::responding(Err(failure.clone()));
    let mut session = IntakeSession::new(client.clone(), session_at_last_step());

    assert_eq!(session.submit().await, SubmitAttempt::Failed(failure.clone()));

    assert!(!session.state().is_loading());
    assert_eq!(session.state().view().overlay, Some(failure.message()));
    assert_eq!(client.calls().len(), 1);
}

#[tokio::test]
async fn session_driver_skips_client_when_guard_rejects() {
    let client = StubClient::default();
    let mut session = IntakeSession::new(client.clone(), SessionState::default());

    assert_eq!(session.submit().await, SubmitAttempt::Ignored);
    assert!(client.calls().is_empty());
}
