use std::env;
use std::fmt;
use std::time::Duration;

use crate::intake::submission::PREDICT_PATH;

/// Distinguishes runtime behavior for different stages of deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the intake client.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub decision: DecisionServiceConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let base_url = env::var("DECISION_SERVICE_URL")
            .unwrap_or_else(|_| DecisionServiceConfig::DEFAULT_BASE_URL.to_string());
        let mut decision = DecisionServiceConfig::new(base_url)?;

        if let Ok(raw) = env::var("DECISION_TIMEOUT_SECS") {
            decision.timeout = Some(parse_timeout(&raw)?);
        }

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());

        Ok(Self {
            environment,
            decision,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Where and how to reach the decision service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionServiceConfig {
    pub base_url: String,
    /// `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
}

impl DecisionServiceConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://127.0.0.1:8000";

    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let base_url = base_url.into();
        let parsed = reqwest::Url::parse(base_url.trim()).map_err(|err| {
            ConfigError::InvalidServiceUrl {
                value: base_url.clone(),
                reason: err.to_string(),
            }
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidServiceUrl {
                value: base_url,
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(ConfigError::InvalidServiceUrl {
                value: base_url,
                reason: "query strings and fragments are not allowed".to_string(),
            });
        }

        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            timeout: None,
        })
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Result<Self, ConfigError> {
        if secs == 0 {
            return Err(ConfigError::InvalidTimeout {
                value: secs.to_string(),
            });
        }
        self.timeout = Some(Duration::from_secs(secs));
        Ok(self)
    }

    pub fn predict_url(&self) -> String {
        format!("{}{}", self.base_url, PREDICT_PATH)
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout {
            value: raw.to_string(),
        }),
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidServiceUrl { value: String, reason: String },
    InvalidTimeout { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidServiceUrl { value, reason } => write!(
                f,
                "DECISION_SERVICE_URL must be an http(s) URL, got '{value}' ({reason})"
            ),
            ConfigError::InvalidTimeout { value } => write!(
                f,
                "DECISION_TIMEOUT_SECS must be a positive number of seconds, got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
