use std::collections::HashMap;
use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Deployment stage the service runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Settings for the matching service and the CLI.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub catalog: CatalogConfig,
}

impl AppConfig {
    /// Reads `.env` when present, then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let environment = read("APP_ENV")
            .map(|value| AppEnvironment::parse(&value))
            .unwrap_or(AppEnvironment::Development);

        let port = match read("APP_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { value: raw })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            environment,
            server: ServerConfig {
                host: read("APP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port,
            },
            telemetry: TelemetryConfig {
                log_level: read("APP_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            },
            catalog: CatalogConfig {
                path: read("LENDER_CATALOG_PATH").map(PathBuf::from),
            },
        })
    }

    /// Convenience for tests and embedding: configuration from a fixed set of pairs.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let values: HashMap<&str, &str> = pairs.into_iter().collect();
        Self::from_lookup(|key| values.get(key).map(|value| value.to_string()))
    }
}

/// HTTP listener binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            self.host
                .parse::<IpAddr>()
                .map_err(|source| ConfigError::InvalidHost {
                    value: self.host.clone(),
                    source,
                })?
        };

        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the lender catalog comes from. `None` selects the bundled data set.
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort {
        value: String,
    },
    InvalidHost {
        value: String,
        source: std::net::AddrParseError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort { value } => {
                write!(f, "APP_PORT '{value}' is not a port number between 0 and 65535")
            }
            ConfigError::InvalidHost { value, .. } => {
                write!(f, "APP_HOST '{value}' is not an IP address or 'localhost'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort { .. } => None,
            ConfigError::InvalidHost { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = AppConfig::from_lookup(|_| None).expect("defaults are valid");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.catalog.path.is_none());
    }

    #[test]
    fn localhost_resolves_to_loopback() {
        let config = AppConfig::from_pairs([("APP_HOST", "localhost"), ("APP_PORT", "8081")])
            .expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 8081));
    }

    #[test]
    fn invalid_port_and_host_name_the_value() {
        match AppConfig::from_pairs([("APP_PORT", "eighty")]) {
            Err(ConfigError::InvalidPort { value }) => assert_eq!(value, "eighty"),
            other => panic!("expected invalid port, got {other:?}"),
        }

        let config = AppConfig::from_pairs([("APP_HOST", "example.internal")]).expect("loads");
        let error = config.server.socket_addr().expect_err("hostnames are not resolved");
        assert!(error.to_string().contains("example.internal"));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = AppConfig::from_pairs([("LENDER_CATALOG_PATH", "  "), ("APP_PORT", "")])
            .expect("config loads");
        assert!(config.catalog.path.is_none());
        assert_eq!(config.server.port, DEFAULT_PORT);

        let config = AppConfig::from_pairs([("LENDER_CATALOG_PATH", "/etc/lenders.csv")])
            .expect("config loads");
        assert_eq!(config.catalog.path, Some(PathBuf::from("/etc/lenders.csv")));
    }

    #[test]
    fn environment_aliases_are_recognised() {
        assert_eq!(AppEnvironment::parse("PROD"), AppEnvironment::Production);
        assert_eq!(AppEnvironment::parse(" ci "), AppEnvironment::Test);
        assert_eq!(AppEnvironment::parse("staging"), AppEnvironment::Development);
    }

    #[test]
    fn load_reads_process_environment() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        env::set_var("APP_ENV", "production");
        env::set_var("APP_LOG_LEVEL", "warn");
        let config = AppConfig::load().expect("config loads");
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");

        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.telemetry.log_level, "warn");
    }
}
