use axum::http::StatusCode;
use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

/// Default transport timeout for provider calls, in seconds.
const DEFAULT_GEMINI_TIMEOUT_SECONDS: u64 = 120;

/// The only frontend origin allowed unless configured otherwise.
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

#[derive(Debug, Clone)]
pub struct GuideConfig {
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub gemini: GeminiSettings,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Prod,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" | "test" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            other => Err(format!("Unknown ENVIRONMENT '{}', expected dev or prod", other)),
        }
    }
}

/// Provider endpoint and credentials, immutable after startup.
#[derive(Debug, Clone)]
pub struct GeminiSettings {
    /// Base URL; the API key is appended as the `key` query parameter.
    pub url: String,
    pub api_key: Secret<String>,
    pub timeout_seconds: u64,
    pub error_status: ErrorStatusPolicy,
}

/// How relay failures are reported to the caller.
///
/// The body is always the failure's descriptive text; only the status differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorStatusPolicy {
    /// `200 OK`, so the frontend can show the text without special handling.
    #[default]
    Compatible,
    /// `502 Bad Gateway` for any provider-side failure.
    Strict,
}

impl ErrorStatusPolicy {
    /// Status returned alongside a relay failure's text.
    pub fn failure_status(&self) -> StatusCode {
        match self {
            ErrorStatusPolicy::Compatible => StatusCode::OK,
            ErrorStatusPolicy::Strict => StatusCode::BAD_GATEWAY,
        }
    }
}

impl FromStr for ErrorStatusPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compatible" => Ok(ErrorStatusPolicy::Compatible),
            "strict" => Ok(ErrorStatusPolicy::Strict),
            other => Err(format!(
                "Unknown GEMINI_ERROR_STATUS '{}', expected compatible or strict",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
}

impl GuideConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        let environment = env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "dev".to_string())
            .parse::<Environment>()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;
        let is_prod = environment == Environment::Prod;

        let timeout_seconds = get_env(
            "GEMINI_TIMEOUT_SECONDS",
            Some(&DEFAULT_GEMINI_TIMEOUT_SECONDS.to_string()),
            is_prod,
        )?
        .parse::<u64>()
        .map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("GEMINI_TIMEOUT_SECONDS is invalid: {}", e))
        })?;

        let error_status = get_env("GEMINI_ERROR_STATUS", Some("compatible"), is_prod)?
            .parse::<ErrorStatusPolicy>()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        Ok(GuideConfig {
            common: common_config,
            environment,
            service_name: get_env("SERVICE_NAME", Some("guide-service"), is_prod)?,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            gemini: GeminiSettings {
                url: get_env("GEMINI_URL", None, is_prod)?,
                api_key: Secret::new(get_env("GEMINI_API_KEY", None, is_prod)?),
                timeout_seconds,
                error_status,
            },
            security: SecurityConfig {
                allowed_origins: parse_origins(&get_env(
                    "CORS_ALLOWED_ORIGINS",
                    Some(DEFAULT_ALLOWED_ORIGIN),
                    is_prod,
                )?),
            },
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
