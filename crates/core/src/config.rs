use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::dashboard::DEFAULT_LOW_STOCK_THRESHOLD;

pub const CONFIG_FILE_CANDIDATES: [&str; 2] = ["stockdesk.toml", "config/stockdesk.toml"];

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub auth: AuthConfig,
    pub inventory: InventoryConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug, Default)]
pub struct AuthConfig {
    pub email: Option<String>,
    pub password: Option<SecretString>,
}

#[derive(Clone, Debug)]
pub struct InventoryConfig {
    pub low_stock_threshold: u32,
    pub alert_poll_interval_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub api_base_url: Option<String>,
    pub api_timeout_secs: Option<u64>,
    pub auth_email: Option<String>,
    pub auth_password: Option<String>,
    pub low_stock_threshold: Option<u32>,
    pub alert_poll_interval_secs: Option<u64>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig { base_url: "http://localhost:8000/api".to_string(), timeout_secs: 15 },
            auth: AuthConfig::default(),
            inventory: InventoryConfig {
                low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
                alert_poll_interval_secs: 30,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AuthConfig {
    pub fn credentials(&self) -> Option<(&str, &SecretString)> {
        match (&self.email, &self.password) {
            (Some(email), Some(password)) => Some((email.as_str(), password)),
            _ => None,
        }
    }
}

impl InventoryConfig {
    pub fn alert_poll_interval(&self) -> Duration {
        Duration::from_secs(self.alert_poll_interval_secs)
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_CANDIDATES[0]));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(api) = patch.api {
            if let Some(base_url) = api.base_url {
                self.api.base_url = base_url;
            }
            if let Some(timeout_secs) = api.timeout_secs {
                self.api.timeout_secs = timeout_secs;
            }
        }

        if let Some(auth) = patch.auth {
            if let Some(email) = auth.email {
                self.auth.email = Some(email);
            }
            if let Some(password) = auth.password {
                self.auth.password = Some(secret_value(password));
            }
        }

        if let Some(inventory) = patch.inventory {
            if let Some(threshold) = inventory.low_stock_threshold {
                self.inventory.low_stock_threshold = threshold;
            }
            if let Some(interval) = inventory.alert_poll_interval_secs {
                self.inventory.alert_poll_interval_secs = interval;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("STOCKDESK_API_BASE_URL") {
            self.api.base_url = value;
        }
        if let Some(value) = read_env("STOCKDESK_API_TIMEOUT_SECS") {
            self.api.timeout_secs = parse_u64("STOCKDESK_API_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("STOCKDESK_AUTH_EMAIL") {
            self.auth.email = Some(value);
        }
        if let Some(value) = read_env("STOCKDESK_AUTH_PASSWORD") {
            self.auth.password = Some(secret_value(value));
        }

        if let Some(value) = read_env("STOCKDESK_INVENTORY_LOW_STOCK_THRESHOLD") {
            self.inventory.low_stock_threshold =
                parse_u32("STOCKDESK_INVENTORY_LOW_STOCK_THRESHOLD", &value)?;
        }
        if let Some(value) = read_env("STOCKDESK_INVENTORY_ALERT_POLL_INTERVAL_SECS") {
            self.inventory.alert_poll_interval_secs =
                parse_u64("STOCKDESK_INVENTORY_ALERT_POLL_INTERVAL_SECS", &value)?;
        }

        let log_level =
            read_env("STOCKDESK_LOGGING_LEVEL").or_else(|| read_env("STOCKDESK_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("STOCKDESK_LOGGING_FORMAT").or_else(|| read_env("STOCKDESK_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(base_url) = overrides.api_base_url {
            self.api.base_url = base_url;
        }
        if let Some(timeout_secs) = overrides.api_timeout_secs {
            self.api.timeout_secs = timeout_secs;
        }
        if let Some(email) = overrides.auth_email {
            self.auth.email = Some(email);
        }
        if let Some(password) = overrides.auth_password {
            self.auth.password = Some(secret_value(password));
        }
        if let Some(threshold) = overrides.low_stock_threshold {
            self.inventory.low_stock_threshold = threshold;
        }
        if let Some(interval) = overrides.alert_poll_interval_secs {
            self.inventory.alert_poll_interval_secs = interval;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_api(&self.api)?;
        validate_auth(&self.auth)?;
        validate_inventory(&self.inventory)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    CONFIG_FILE_CANDIDATES.into_iter().map(PathBuf::from).find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_api(api: &ApiConfig) -> Result<(), ConfigError> {
    let base_url = api.base_url.trim();
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::Validation(
            "api.base_url must start with http:// or https://".to_string(),
        ));
    }

    if api.timeout_secs == 0 || api.timeout_secs > 300 {
        return Err(ConfigError::Validation("api.timeout_secs must be in range 1..=300".to_string()));
    }

    Ok(())
}

fn validate_auth(auth: &AuthConfig) -> Result<(), ConfigError> {
    if auth.email.as_ref().is_some_and(|email| !email.contains('@')) {
        return Err(ConfigError::Validation("auth.email must be an email address".to_string()));
    }

    let has_password =
        auth.password.as_ref().is_some_and(|value| !value.expose_secret().trim().is_empty());
    if has_password && auth.email.is_none() {
        return Err(ConfigError::Validation(
            "auth.password is set but auth.email is missing".to_string(),
        ));
    }

    Ok(())
}

fn validate_inventory(inventory: &InventoryConfig) -> Result<(), ConfigError> {
    if inventory.low_stock_threshold == 0 {
        return Err(ConfigError::Validation(
            "inventory.low_stock_threshold must be greater than zero".to_string(),
        ));
    }

    if inventory.alert_poll_interval_secs == 0 || inventory.alert_poll_interval_secs > 3600 {
        return Err(ConfigError::Validation(
            "inventory.alert_poll_interval_secs must be in range 1..=3600".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    api: Option<ApiPatch>,
    auth: Option<AuthPatch>,
    inventory: Option<InventoryPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiPatch {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct AuthPatch {
    email: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct InventoryPatch {
    low_stock_threshold: Option<u32>,
    alert_poll_interval_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
