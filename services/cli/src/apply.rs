use std::io;
use std::path::PathBuf;

use clap::Args;
use credit_intake::config::AppConfig;
use credit_intake::error::AppError;
use credit_intake::intake::records::load_drafts;
use credit_intake::intake::{
    DecisionClient, FieldCatalog, FormDraft, HttpDecisionClient, IntakeSession, SessionAction,
    SessionState, StepOutcome, SubmitAttempt,
};
use tracing::{info, warn};

use crate::present;
use crate::prompt::{Prompter, StepInput, TerminalPrompter};

#[derive(Args, Debug, Default)]
pub(crate) struct ApplyArgs {
    /// Prefill the form from a JSON or CSV applicant record (first record is used)
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
    /// Submit the prefilled values without prompting
    #[arg(long)]
    pub(crate) defaults: bool,
}

pub(crate) async fn run_apply(args: ApplyArgs, config: &AppConfig) -> Result<(), AppError> {
    let draft = match &args.input {
        Some(path) => initial_draft(path)?,
        None => FormDraft::default(),
    };

    let client = HttpDecisionClient::new(&config.decision)?;
    info!(endpoint = client.endpoint(), "decision service configured");
    let state = SessionState::new(FieldCatalog::standard(), draft);
    let mut session = IntakeSession::new(client, state);

    if args.defaults {
        submit_unattended(&mut session).await
    } else {
        drive(&mut session, &mut TerminalPrompter).await?;
        Ok(())
    }
}

fn initial_draft(path: &std::path::Path) -> Result<FormDraft, AppError> {
    let mut drafts = load_drafts(path)?;
    if drafts.len() > 1 {
        warn!(
            records = drafts.len(),
            path = %path.display(),
            "input holds several records; using the first"
        );
    }
    if drafts.is_empty() {
        warn!(path = %path.display(), "input holds no records; starting from defaults");
        return Ok(FormDraft::default());
    }
    Ok(drafts.swap_remove(0))
}

/// Steps through every field without prompting, then submits once.
pub(crate) async fn submit_unattended<C: DecisionClient>(
    session: &mut IntakeSession<C>,
) -> Result<(), AppError> {
    while !session.state().form().steps().is_last() {
        if let Some(StepOutcome::Blocked { field, message }) =
            session.dispatch(SessionAction::Next).step
        {
            println!("{}: {}", field.label(), message);
            return Err(AppError::InvalidRecords {
                rejected: 1,
                total: 1,
            });
        }
    }

    match session.submit().await {
        SubmitAttempt::Decided => {
            if let Some(record) = session.state().result() {
                println!("{}", present::decision(record));
            }
            Ok(())
        }
        SubmitAttempt::Failed(err) => Err(AppError::Submission(err)),
        SubmitAttempt::Ignored => {
            if let Err(report) = session.state().form().completed() {
                println!("{}", present::report(&report));
            }
            Err(AppError::InvalidRecords {
                rejected: 1,
                total: 1,
            })
        }
    }
}

/// Interactive loop: one field per prompt, then the result view or the error overlay.
pub(crate) async fn drive<C, P>(session: &mut IntakeSession<C>, prompter: &mut P) -> io::Result<()>
where
    C: DecisionClient,
    P: Prompter,
{
    loop {
        if let Some(message) = session.state().error().map(str::to_owned) {
            prompter.notice(&present::overlay(&message));
            prompter.confirm("Close", true)?;
            session.dispatch(SessionAction::DismissError);
            continue;
        }

        if let Some(record) = session.state().result() {
            prompter.notice(&present::decision(record));
            if prompter.confirm("Start a new application?", false)? {
                session.dispatch(SessionAction::Reset);
                continue;
            }
            return Ok(());
        }

        let input = {
            let view = session.state().form().step_view();
            prompter.notice(&present::step(&view));
            prompter.value(&view)?
        };

        let raw = match input {
            StepInput::Quit => return Ok(()),
            StepInput::Back => {
                session.dispatch(SessionAction::Back);
                continue;
            }
            StepInput::Value(raw) => raw,
        };

        let field = session.state().form().current();
        session.dispatch(SessionAction::SetValue { field, raw });

        if !session.state().form().steps().is_last() {
            session.dispatch(SessionAction::Next);
            continue;
        }

        session.dispatch(SessionAction::Touch(field));
        if !session.state().can_submit() {
            if let Err(report) = session.state().form().completed() {
                if report.message_for(field).is_none() {
                    prompter.notice(&present::report(&report));
                }
            }
            continue;
        }

        if prompter.confirm("Submit application?", true)? {
            prompter.notice("Processing...");
            session.submit().await;
        }
    }
}
