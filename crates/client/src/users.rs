use stockdesk_core::domain::user::{NewUser, User, UserId};
use stockdesk_core::errors::DomainError;
use tracing::info;

use crate::api::{ApiClient, Auth};
use crate::error::ClientError;

impl ApiClient {
    /// Registration is open; no session is needed.
    pub async fn register(&self, new_user: &NewUser) -> Result<User, ClientError> {
        if !new_user.email.contains('@') {
            return Err(DomainError::invalid("email", "must be an email address").into());
        }
        if new_user.name.trim().is_empty() {
            return Err(DomainError::invalid("name", "is required").into());
        }
        if new_user.password.is_empty() {
            return Err(DomainError::invalid("password", "is required").into());
        }

        let user: User = self.post_json("/auth/register", new_user, Auth::Optional).await?;
        info!(
            event_name = "client.users.registered",
            user_id = %user.id,
            role = ?user.role,
            "user registered"
        );
        Ok(user)
    }

    pub async fn current_user(&self) -> Result<User, ClientError> {
        self.get_json("/auth/me").await
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        self.get_json("/users").await
    }

    pub async fn list_clients(&self) -> Result<Vec<User>, ClientError> {
        let users = self.list_users().await?;
        Ok(users.into_iter().filter(User::is_client).collect())
    }

    pub async fn delete_user(&self, id: &UserId) -> Result<(), ClientError> {
        self.delete(&format!("/users/{id}")).await?;
        info!(event_name = "client.users.deleted", user_id = %id, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use stockdesk_core::config::ApiConfig;
    use stockdesk_core::domain::user::{NewUser, Role};

    use crate::api::ApiClient;
    use crate::error::ClientError;

    #[tokio::test]
    async fn register_rejects_malformed_fields_locally() {
        let config = ApiConfig { base_url: "http://127.0.0.1:9/api".to_owned(), timeout_secs: 1 };
        let api = ApiClient::new(&config).expect("client");
        let new_user = NewUser {
            email: "acme.example.com".to_owned(),
            name: "Acme".to_owned(),
            role: Role::Client,
            company: Some("Acme Corp".to_owned()),
            password: "hunter22".to_owned(),
        };

        assert!(matches!(api.register(&new_user).await, Err(ClientError::Invalid(_))));

        let unnamed =
            NewUser { email: "ops@acme.test".to_owned(), name: "  ".to_owned(), ..new_user };
        assert!(matches!(api.register(&unnamed).await, Err(ClientError::Invalid(_))));
    }
}
