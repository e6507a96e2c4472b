use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use chrono_tz::Tz;

use crate::harvest::locale::Locale;

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
    pub display: DisplayConfig,
    pub deployment: DeploymentConfig,
    pub seed_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("SASKATOON_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("SASKATOON_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("SASKATOON_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("SASKATOON_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            display: DisplayConfig::from_env()?,
            deployment: DeploymentConfig::from_env()?,
            seed_path: optional_var("SASKATOON_SEED_PATH").map(PathBuf::from),
        })
    }
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Time zone and default language used when rendering views.
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    pub time_zone: Tz,
    pub default_locale: Locale,
}

impl DisplayConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw_zone = optional_var("SASKATOON_TIME_ZONE").unwrap_or_else(|| "UTC".to_string());
        let time_zone = raw_zone
            .parse::<Tz>()
            .map_err(|_| ConfigError::InvalidTimeZone { value: raw_zone })?;

        let raw_locale = optional_var("SASKATOON_LANGUAGE").unwrap_or_else(|| "fr".to_string());
        let default_locale = Locale::from_code(&raw_locale)
            .ok_or(ConfigError::UnsupportedLanguage { value: raw_locale })?;

        Ok(Self {
            time_zone,
            default_locale,
        })
    }
}

/// Deployment settings handed to the external framework untouched.
#[derive(Debug, Clone)]
pub struct DeploymentConfig {
    pub allowed_hosts: Vec<String>,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub email: EmailConfig,
}

impl DeploymentConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let mut allowed_hosts = vec!["localhost".to_string(), "127.0.0.1".to_string()];
        allowed_hosts.extend(optional_var("SASKATOON_SERVER_IP"));
        allowed_hosts.extend(optional_var("SASKATOON_DOMAIN_NAME"));

        let database = DatabaseConfig {
            engine: optional_var("SASKATOON_DB_ENGINE"),
            name: optional_var("SASKATOON_DB_NAME"),
            user: optional_var("SASKATOON_DB_USER"),
            password: optional_var("SASKATOON_DB_PASSWORD"),
            host: optional_var("SASKATOON_DB_HOST"),
            port: optional_var("SASKATOON_DB_PORT"),
        };

        let cache = CacheConfig {
            backend: optional_var("SASKATOON_CACHE_BACKEND"),
            location: optional_var("SASKATOON_CACHE_LOCATION"),
        };

        let port = optional_var("SASKATOON_EMAIL_PORT")
            .map(|value| value.parse::<u16>())
            .transpose()
            .map_err(|_| ConfigError::InvalidEmailPort)?;
        let use_tls = optional_var("SASKATOON_EMAIL_USE_TLS")
            .map(|value| matches!(value.to_ascii_lowercase().as_str(), "yes" | "true" | "1"))
            .unwrap_or(false);

        let email = EmailConfig {
            backend: optional_var("SASKATOON_EMAIL_BACKEND"),
            host: optional_var("SASKATOON_EMAIL_HOST"),
            port,
            use_tls,
            host_user: optional_var("SASKATOON_EMAIL_HOST_USER"),
            host_password: optional_var("SASKATOON_EMAIL_HOST_PASSWORD"),
            from: optional_var("SASKATOON_EMAIL_FROM"),
        };

        Ok(Self {
            allowed_hosts,
            database,
            cache,
            email,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct DatabaseConfig {
    pub engine: Option<String>,
    pub name: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CacheConfig {
    pub backend: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct EmailConfig {
    pub backend: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub use_tls: bool,
    pub host_user: Option<String>,
    pub host_password: Option<String>,
    pub from: Option<String>,
}

impl EmailConfig {
    /// Delivery errors are swallowed when no SMTP host is configured.
    pub fn fail_silently(&self) -> bool {
        self.host.is_none()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTimeZone { value: String },
    UnsupportedLanguage { value: String },
    InvalidEmailPort,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "SASKATOON_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "SASKATOON_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTimeZone { value } => {
                write!(f, "SASKATOON_TIME_ZONE '{}' is not a known IANA zone", value)
            }
            ConfigError::UnsupportedLanguage { value } => {
                write!(f, "SASKATOON_LANGUAGE '{}' must be one of fr, en", value)
            }
            ConfigError::InvalidEmailPort => write!(f, "SASKATOON_EMAIL_PORT must be a valid u16"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidTimeZone { .. }
            | ConfigError::UnsupportedLanguage { .. }
            | ConfigError::InvalidEmailPort => None,
        }
    }
}
