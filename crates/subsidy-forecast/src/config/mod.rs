use crate::workflows::forecast::ForecastConfig;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

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
    pub data: DataConfig,
    pub forecast: ForecastConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            data: DataConfig::from_env()?,
            forecast: forecast_from_env()?,
        })
    }
}

fn forecast_from_env() -> Result<ForecastConfig, ConfigError> {
    let mut forecast = ForecastConfig::default();

    if let Ok(value) = env::var("FORECAST_ATTENDANCE_THRESHOLD") {
        forecast.attendance_threshold = value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|threshold| (0.0..=1.0).contains(threshold))
            .ok_or(ConfigError::InvalidThreshold { value })?;
    }

    if let Ok(value) = env::var("FORECAST_CAP_ATTENDANCE") {
        forecast.cap_attendance = parse_bool(&value).ok_or(ConfigError::InvalidFlag {
            name: "FORECAST_CAP_ATTENDANCE",
            value,
        })?;
    }

    Ok(forecast)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the CLI looks for the monthly exports when no paths are given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataConfig {
    pub data_dir: PathBuf,
    pub attendance_file: String,
    pub payment_file: String,
    /// Banner lines above the header row of the payment export.
    pub payment_skip_rows: usize,
}

impl DataConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let data_dir = env::var("FORECAST_DATA_DIR").unwrap_or_else(|_| "data".to_string());
        let attendance_file =
            env::var("FORECAST_ATTENDANCE_FILE").unwrap_or_else(|_| "attendance.csv".to_string());
        let payment_file =
            env::var("FORECAST_PAYMENT_FILE").unwrap_or_else(|_| "payment.csv".to_string());
        let payment_skip_rows = match env::var("FORECAST_PAYMENT_SKIP_ROWS") {
            Ok(value) => value
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidSkipRows { value })?,
            Err(_) => 1,
        };

        Ok(Self {
            data_dir: PathBuf::from(data_dir),
            attendance_file,
            payment_file,
            payment_skip_rows,
        })
    }

    pub fn attendance_path(&self) -> PathBuf {
        self.data_dir.join(&self.attendance_file)
    }

    pub fn payment_path(&self) -> PathBuf {
        self.data_dir.join(&self.payment_file)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidThreshold { value: String },
    InvalidFlag { name: &'static str, value: String },
    InvalidSkipRows { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidThreshold { value } => write!(
                f,
                "FORECAST_ATTENDANCE_THRESHOLD must be a number between 0 and 1, got '{}'",
                value
            ),
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{} must be true or false, got '{}'", name, value)
            }
            ConfigError::InvalidSkipRows { value } => write!(
                f,
                "FORECAST_PAYMENT_SKIP_ROWS must be a non-negative integer, got '{}'",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidThreshold { .. }
            | ConfigError::InvalidFlag { .. }
            | ConfigError::InvalidSkipRows { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "FORECAST_DATA_DIR",
            "FORECAST_ATTENDANCE_FILE",
            "FORECAST_PAYMENT_FILE",
            "FORECAST_PAYMENT_SKIP_ROWS",
            "FORECAST_ATTENDANCE_THRESHOLD",
            "FORECAST_CAP_ATTENDANCE",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.data.attendance_path(), PathBuf::from("data/attendance.csv"));
        assert_eq!(config.data.payment_path(), PathBuf::from("data/payment.csv"));
        assert_eq!(config.data.payment_skip_rows, 1);
        assert_eq!(config.forecast, ForecastConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn forecast_overrides_are_read_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("FORECAST_ATTENDANCE_THRESHOLD", "0.795");
        env::set_var("FORECAST_CAP_ATTENDANCE", "off");
        env::set_var("FORECAST_PAYMENT_SKIP_ROWS", "0");
        env::set_var("FORECAST_DATA_DIR", "/srv/exports");
        let config = AppConfig::load().expect("config loads");
        assert!((config.forecast.attendance_threshold - 0.795).abs() < f64::EPSILON);
        assert!(!config.forecast.cap_attendance);
        assert_eq!(config.data.payment_skip_rows, 0);
        assert_eq!(
            config.data.attendance_path(),
            PathBuf::from("/srv/exports/attendance.csv")
        );
        reset_env();
    }

    #[test]
    fn rejects_out_of_range_threshold_and_bad_flags() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("FORECAST_ATTENDANCE_THRESHOLD", "1.5");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidThreshold { .. })
        ));

        reset_env();
        env::set_var("FORECAST_CAP_ATTENDANCE", "sometimes");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidFlag {
                name: "FORECAST_CAP_ATTENDANCE",
                ..
            })
        ));

        reset_env();
        env::set_var("FORECAST_PAYMENT_SKIP_ROWS", "-1");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidSkipRows { .. })
        ));
        reset_env();
    }
}
