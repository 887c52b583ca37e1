use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use stockdesk_core::config::{AppConfig, LoadOptions, CONFIG_FILE_CANDIDATES};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    render(&config, detect_config_path().as_deref())
}

/// Lists every effective setting with the layer it came from. Secrets are
/// never printed.
pub fn render(config: &AppConfig, config_file_path: Option<&Path>) -> String {
    let config_file_doc = load_config_file_doc(config_file_path);
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path)
    };

    let password = if config.auth.password.is_some() { "<redacted>" } else { "<unset>" };
    let entries: [(&str, String, &[&str]); 8] = [
        ("api.base_url", config.api.base_url.clone(), &["STOCKDESK_API_BASE_URL"]),
        ("api.timeout_secs", config.api.timeout_secs.to_string(), &["STOCKDESK_API_TIMEOUT_SECS"]),
        (
            "auth.email",
            config.auth.email.clone().unwrap_or_else(|| "<unset>".to_string()),
            &["STOCKDESK_AUTH_EMAIL"],
        ),
        ("auth.password", password.to_string(), &["STOCKDESK_AUTH_PASSWORD"]),
        (
            "inventory.low_stock_threshold",
            config.inventory.low_stock_threshold.to_string(),
            &["STOCKDESK_INVENTORY_LOW_STOCK_THRESHOLD"],
        ),
        (
            "inventory.alert_poll_interval_secs",
            config.inventory.alert_poll_interval_secs.to_string(),
            &["STOCKDESK_INVENTORY_ALERT_POLL_INTERVAL_SECS"],
        ),
        (
            "logging.level",
            config.logging.level.clone(),
            &["STOCKDESK_LOGGING_LEVEL", "STOCKDESK_LOG_LEVEL"],
        ),
        (
            "logging.format",
            format!("{:?}", config.logging.format).to_lowercase(),
            &["STOCKDESK_LOGGING_FORMAT", "STOCKDESK_LOG_FORMAT"],
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    lines.extend(
        entries
            .iter()
            .map(|&(key, ref value, env_keys)| render_line(key, value, source(key, env_keys))),
    );
    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    CONFIG_FILE_CANDIDATES.into_iter().map(PathBuf::from).find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if config_file_doc.is_some_and(|doc| contains_path(doc, key_path)) {
        let file_path = config_file_path
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "config file".to_string());
        return format!("file ({file_path})");
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    key_path.split('.').try_fold(root, |current, key| current.get(key)).is_some()
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
