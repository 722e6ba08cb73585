use crate::apply::{run_apply, ApplyArgs};
use crate::fields::run_fields;
use crate::validate::{run_validate, ValidateArgs};
use clap::{Parser, Subcommand};
use credit_intake::config::{AppConfig, DecisionServiceConfig};
use credit_intake::error::AppError;
use credit_intake::telemetry;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "credit-intake",
    about = "Collect a credit-line application step by step and request a decision",
    version
)]
struct Cli {
    /// Override the configured decision service base URL
    #[arg(long, global = true)]
    service_url: Option<String>,
    /// Abort the decision request after this many seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Walk through the application form and submit it (default command)
    Apply(ApplyArgs),
    /// List every application field with its accepted values
    Fields,
    /// Check applicant records from a JSON or CSV file against the field rules
    Validate(ValidateArgs),
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;

    if let Some(url) = cli.service_url {
        let timeout = config.decision.timeout;
        config.decision = DecisionServiceConfig::new(url)?;
        config.decision.timeout = timeout;
    }
    if let Some(secs) = cli.timeout_secs {
        config.decision = config.decision.with_timeout_secs(secs)?;
    }

    telemetry::init(&config.telemetry)?;
    debug!(?config.environment, service = %config.decision.base_url, "configuration loaded");

    let command = cli
        .command
        .unwrap_or_else(|| Command::Apply(ApplyArgs::default()));

    match command {
        Command::Apply(args) => run_apply(args, &config).await,
        Command::Fields => run_fields(),
        Command::Validate(args) => run_validate(args),
    }
}
