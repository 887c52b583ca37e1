use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use stockdesk_core::domain::user::User;
use tracing::info;

use crate::api::{ApiClient, Auth};
use crate::error::ClientError;

#[derive(Clone, Debug, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_owned()
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// An authenticated operator.
#[derive(Clone, Debug)]
pub struct Session {
    pub token: SecretString,
    pub user: User,
    pub started_at: DateTime<Utc>,
}

/// Owns the current login, if any, and hands out API clients scoped to it.
#[derive(Clone, Debug)]
pub struct SessionContext {
    api: ApiClient,
    session: Option<Session>,
}

impl SessionContext {
    pub fn new(api: ApiClient) -> Self {
        Self { api: api.without_token(), session: None }
    }

    pub async fn login(&mut self, email: &str, password: &SecretString) -> Result<&User, ClientError> {
        let request = LoginRequest { email: email.trim(), password: password.expose_secret() };
        let response: LoginResponse =
            self.api.post_json("/auth/login", &request, Auth::Optional).await?;

        info!(
            event_name = "client.session.login",
            user_id = %response.user.id,
            role = ?response.user.role,
            "session established"
        );

        let session = Session {
            token: SecretString::from(response.access_token),
            user: response.user,
            started_at: Utc::now(),
        };
        Ok(&self.session.insert(session).user)
    }

    pub fn logout(&mut self) {
        if let Some(session) = self.session.take() {
            info!(
                event_name = "client.session.logout",
                user_id = %session.user.id,
                "session cleared"
            );
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.as_ref().map(|session| &session.user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.current_user().is_some_and(User::is_admin)
    }

    /// Client carrying the session's bearer token. Without a session, every
    /// authenticated call on the returned client fails with
    /// [`ClientError::Unauthenticated`] before any request is sent.
    pub fn api(&self) -> ApiClient {
        match &self.session {
            Some(session) => self.api.with_token(session.token.clone()),
            None => self.api.clone(),
        }
    }

    pub fn require_admin(&self) -> Result<&User, ClientError> {
        let user = self.current_user().ok_or(ClientError::Unauthenticated)?;
        if user.is_admin() {
            Ok(user)
        } else {
            Err(ClientError::Forbidden)
        }
    }

    /// Reloads the session user from `/auth/me`.
    pub async fn refresh_user(&mut self) -> Result<&User, ClientError> {
        let user = self.api().current_user().await?;
        let session = self.session.as_mut().ok_or(ClientError::Unauthenticated)?;
        session.user = user;
        Ok(&session.user)
    }
}

#[cfg(test)]
mod tests {
    use stockdesk_core::config::ApiConfig;

    use super::SessionContext;
    use crate::api::ApiClient;
    use crate::error::ClientError;

    fn context() -> SessionContext {
        let config = ApiConfig { base_url: "http://127.0.0.1:9/api".to_owned(), timeout_secs: 1 };
        SessionContext::new(ApiClient::new(&config).expect("client"))
    }

    #[test]
    fn fresh_context_is_anonymous() {
        let context = context();
        assert!(!context.is_authenticated());
        assert!(!context.is_admin());
        assert!(context.current_user().is_none());
        assert!(!context.api().has_token());
    }

    #[test]
    fn require_admin_without_session_is_unauthenticated() {
        let context = context();
        assert_eq!(context.require_admin().err(), Some(ClientError::Unauthenticated));
    }

    #[tokio::test]
    async fn anonymous_calls_fail_before_sending() {
        let context = context();
        let result = context.api().list_users().await;
        assert_eq!(result.err(), Some(ClientError::Unauthenticated));
    }

    #[test]
    fn logout_without_session_is_a_no_op() {
        let mut context = context();
        context.logout();
        assert!(!context.is_authenticated());
    }
}
