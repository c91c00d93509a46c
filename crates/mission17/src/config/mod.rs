use crate::workflows::submissions::{RewardConfig, SpotCheckConfig};
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
    pub spot_check: SpotCheckConfig,
    pub rewards: RewardConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "5001".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let spot_check = load_spot_check()?;

        let mission_points = match env::var("MISSION_POINTS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidMissionPoints)?,
            Err(_) => RewardConfig::default().mission_points,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            spot_check,
            rewards: RewardConfig { mission_points },
        })
    }
}

fn load_spot_check() -> Result<SpotCheckConfig, ConfigError> {
    let defaults = SpotCheckConfig::default();

    let high_confidence_threshold = match env::var("SPOT_CHECK_THRESHOLD") {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| ConfigError::InvalidThreshold)?,
        Err(_) => defaults.high_confidence_threshold,
    };
    if !high_confidence_threshold.is_finite() || !(0.0..=100.0).contains(&high_confidence_threshold)
    {
        return Err(ConfigError::InvalidThreshold);
    }

    let spot_check_rate = match env::var("SPOT_CHECK_RATE") {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| ConfigError::InvalidSpotCheckRate)?,
        Err(_) => defaults.spot_check_rate,
    };
    if !(0.0..=1.0).contains(&spot_check_rate) {
        return Err(ConfigError::InvalidSpotCheckRate);
    }

    Ok(SpotCheckConfig {
        high_confidence_threshold,
        spot_check_rate,
    })
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidThreshold,
    InvalidSpotCheckRate,
    InvalidMissionPoints,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidThreshold => {
                write!(f, "SPOT_CHECK_THRESHOLD must be a number between 0 and 100")
            }
            ConfigError::InvalidSpotCheckRate => {
                write!(f, "SPOT_CHECK_RATE must be a number between 0 and 1")
            }
            ConfigError::InvalidMissionPoints => {
                write!(f, "MISSION_POINTS must be a non-negative integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidThreshold
            | ConfigError::InvalidSpotCheckRate
            | ConfigError::InvalidMissionPoints => None,
        }
    }
}
