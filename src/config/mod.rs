use crate::triage::config::{token_set, AdvisoryPolicy, ClassificationConfig, ClassificationMode};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub classification: ClassificationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = match env::var("APP_LOG_FORMAT") {
            Ok(raw) => LogFormat::parse(&raw).ok_or(ConfigError::InvalidValue {
                variable: "APP_LOG_FORMAT",
                value: raw,
            })?,
            Err(_) => LogFormat::Compact,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                format: log_format,
            },
            classification: load_classification()?,
        })
    }
}

fn load_classification() -> Result<ClassificationConfig, ConfigError> {
    let mut config = ClassificationConfig::default();

    if let Some(raw) = read_var("TRIAGE_MODE") {
        config.mode = ClassificationMode::parse(&raw).ok_or(ConfigError::InvalidValue {
            variable: "TRIAGE_MODE",
            value: raw,
        })?;
    }
    if let Some(raw) = read_var("TRIAGE_ADVISORY_POLICY") {
        config.advisory_policy = AdvisoryPolicy::parse(&raw).ok_or(ConfigError::InvalidValue {
            variable: "TRIAGE_ADVISORY_POLICY",
            value: raw,
        })?;
    }
    if let Some(flag) = read_flag("TRIAGE_ALLOW_MISSING_SALARY")? {
        config.allow_missing_salary = flag;
    }
    if let Some(flag) = read_flag("TRIAGE_ALLOW_NEAR_MIN_SALARY")? {
        config.allow_near_min_salary = flag;
    }
    if let Some(flag) = read_flag("TRIAGE_STRICT_AGE_POLICY")? {
        config.strict_age_policy = flag;
    }
    if let Some(raw) = read_var("TRIAGE_MAX_POST_AGE_DAYS") {
        config.max_post_age_days = raw
            .trim()
            .parse::<u32>()
            .map(i64::from)
            .map_err(|_| ConfigError::InvalidValue {
                variable: "TRIAGE_MAX_POST_AGE_DAYS",
                value: raw,
            })?;
    }
    if let Some(raw) = read_var("TRIAGE_ALLOWED_CITIES") {
        config.allowed_cities = token_set(raw.split(','));
    }
    if let Some(raw) = read_var("TRIAGE_ALLOWED_STATES") {
        config.allowed_states = token_set(raw.split(','));
    }
    if let Some(raw) = read_var("TRIAGE_ALLOWED_COUNTRIES") {
        config.allowed_countries = token_set(raw.split(','));
    }

    Ok(config)
}

fn read_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn read_flag(name: &'static str) -> Result<Option<bool>, ConfigError> {
    let Some(raw) = read_var(name) else {
        return Ok(None);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::InvalidValue {
            variable: name,
            value: raw,
        }),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Log output layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidValue { variable: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidValue { variable, value } => {
                write!(f, "{variable} has unsupported value '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidValue { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
