pub mod alerts;
pub mod ask;
pub mod clients;
pub mod config;
pub mod products;
pub mod summary;
pub mod transactions;

use serde::Serialize;
use stockdesk_client::{ApiClient, ClientError, SessionContext};
use stockdesk_core::config::{AppConfig, LoadOptions};
use tracing::warn;

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_RUNTIME: u8 = 3;
pub const EXIT_AUTH: u8 = 4;
pub const EXIT_API: u8 = 5;
pub const EXIT_INPUT: u8 = 6;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn from_client_error(command: &str, error: &ClientError) -> Self {
        let exit_code = match error {
            ClientError::Unauthenticated | ClientError::Unauthorized(_) | ClientError::Forbidden => {
                EXIT_AUTH
            }
            ClientError::Invalid(_) | ClientError::Rejected(_) => EXIT_INPUT,
            ClientError::Config(_) => EXIT_CONFIG,
            _ => EXIT_API,
        };
        warn!(
            event_name = "cli.command.failed",
            command,
            error_class = error.class(),
            error = %error,
            "command failed"
        );
        Self::failure(command, error.class(), error.to_string(), exit_code)
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

pub fn load_config(command: &str) -> Result<AppConfig, CommandResult> {
    AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            EXIT_CONFIG,
        )
    })
}

pub fn runtime(command: &str) -> Result<tokio::runtime::Runtime, CommandResult> {
    tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(|error| {
        CommandResult::failure(
            command,
            "runtime_init",
            format!("failed to initialize async runtime: {error}"),
            EXIT_RUNTIME,
        )
    })
}

/// Logs in with the configured credentials.
pub async fn connect(command: &str, config: &AppConfig) -> Result<SessionContext, CommandResult> {
    let Some((email, password)) = config.auth.credentials() else {
        return Err(CommandResult::failure(
            command,
            "unauthenticated",
            "set STOCKDESK_AUTH_EMAIL and STOCKDESK_AUTH_PASSWORD (or [auth] in stockdesk.toml)",
            EXIT_AUTH,
        ));
    };

    let api = ApiClient::new(&config.api)
        .map_err(|error| CommandResult::from_client_error(command, &error))?;
    let mut context = SessionContext::new(api);
    context
        .login(email, password)
        .await
        .map_err(|error| CommandResult::from_client_error(command, &error))?;
    Ok(context)
}

/// Loads config, logs in, then runs `operation` on a fresh runtime.
pub fn with_session<F, Fut>(command: &str, operation: F) -> CommandResult
where
    F: FnOnce(AppConfig, SessionContext) -> Fut,
    Fut: std::future::Future<Output = CommandResult>,
{
    let config = match load_config(command) {
        Ok(config) => config,
        Err(result) => return result,
    };
    let runtime = match runtime(command) {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    runtime.block_on(async {
        match connect(command, &config).await {
            Ok(context) => operation(config, context).await,
            Err(result) => result,
        }
    })
}
