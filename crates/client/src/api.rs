use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use stockdesk_core::config::ApiConfig;
use tracing::{debug, warn};

use crate::error::ClientError;

/// JSON-over-HTTP access to the inventory API.
///
/// Cloning is cheap; clones share the underlying connection pool. A client
/// built with [`ApiClient::with_token`] sends `Authorization: Bearer <token>`
/// on every request.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<SecretString>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Auth {
    Required,
    Optional,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|error| ClientError::Config(error.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn with_token(&self, token: SecretString) -> Self {
        Self { http: self.http.clone(), base_url: self.base_url.clone(), token: Some(token) }
    }

    pub fn without_token(&self) -> Self {
        Self { http: self.http.clone(), base_url: self.base_url.clone(), token: None }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) async fn get_json<T>(&self, path: &str) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let request = self.request(Method::GET, path, Auth::Required)?;
        let response = self.send(request, &Method::GET, path).await?;
        decode(response).await
    }

    pub(crate) async fn post_json<B, T>(
        &self,
        path: &str,
        body: &B,
        auth: Auth,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, path, auth)?.json(body);
        let response = self.send(request, &Method::POST, path).await?;
        decode(response).await
    }

    pub(crate) async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::PUT, path, Auth::Required)?.json(body);
        let response = self.send(request, &Method::PUT, path).await?;
        decode(response).await
    }

    pub(crate) async fn put_empty(&self, path: &str) -> Result<(), ClientError> {
        let request = self.request(Method::PUT, path, Auth::Required)?;
        self.send(request, &Method::PUT, path).await?;
        Ok(())
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let request = self.request(Method::DELETE, path, Auth::Required)?;
        self.send(request, &Method::DELETE, path).await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str, auth: Auth) -> Result<RequestBuilder, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.http.request(method, url);

        match (&self.token, auth) {
            (Some(token), _) => Ok(builder.bearer_auth(token.expose_secret())),
            (None, Auth::Optional) => Ok(builder),
            (None, Auth::Required) => Err(ClientError::Unauthenticated),
        }
    }

    async fn send(
        &self,
        request: RequestBuilder,
        method: &Method,
        path: &str,
    ) -> Result<Response, ClientError> {
        let response = request.send().await.map_err(|error| {
            warn!(
                event_name = "client.http.transport_error",
                method = %method,
                path,
                error = %error,
                "inventory api request failed"
            );
            ClientError::Network(error.to_string())
        })?;

        let status = response.status();
        debug!(
            event_name = "client.http.response",
            method = %method,
            path,
            status = status.as_u16(),
            "inventory api responded"
        );

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = status_error(status, error_detail(&body));
        warn!(
            event_name = "client.http.error_status",
            method = %method,
            path,
            status = status.as_u16(),
            error_class = error.class(),
            "inventory api returned an error status"
        );
        Err(error)
    }
}

async fn decode<T>(response: Response) -> Result<T, ClientError>
where
    T: DeserializeOwned,
{
    response.json::<T>().await.map_err(|error| ClientError::Decode(error.to_string()))
}

fn status_error(status: StatusCode, detail: String) -> ClientError {
    match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized(detail),
        StatusCode::FORBIDDEN => ClientError::Forbidden,
        StatusCode::NOT_FOUND => ClientError::NotFound(detail),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ClientError::Rejected(detail),
        other => ClientError::Api { status: other.as_u16(), detail },
    }
}

/// Pulls `detail` out of an error body, falling back to the raw text.
pub(crate) fn error_detail(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("detail") {
            Some(Value::String(detail)) => detail.clone(),
            Some(other) => other.to_string(),
            None => body.trim().to_string(),
        },
        _ => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use stockdesk_core::config::ApiConfig;

    use super::{error_detail, status_error, ApiClient, Auth};
    use crate::error::ClientError;

    fn config(base_url: &str) -> ApiConfig {
        ApiConfig { base_url: base_url.to_string(), timeout_secs: 5 }
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new(&config("http://localhost:8000/api/")).expect("client");
        assert_eq!(client.base_url(), "http://localhost:8000/api");
    }

    #[test]
    fn required_auth_without_token_fails_before_sending() {
        let client = ApiClient::new(&config("http://localhost:8000/api")).expect("client");
        let result = client.request(reqwest::Method::GET, "/products", Auth::Required);
        assert!(matches!(result, Err(ClientError::Unauthenticated)));
        assert!(client.request(reqwest::Method::POST, "/auth/login", Auth::Optional).is_ok());
    }

    #[test]
    fn with_token_marks_client_authenticated() {
        let client = ApiClient::new(&config("http://localhost:8000/api")).expect("client");
        let authed = client.with_token("token-1".to_string().into());
        assert!(authed.has_token());
        assert!(!authed.without_token().has_token());
    }

    #[test]
    fn error_detail_prefers_detail_field() {
        assert_eq!(error_detail(r#"{"detail":"Product not found"}"#), "Product not found");
        assert_eq!(error_detail("plain failure\n"), "plain failure");
        assert_eq!(error_detail(r#"{"detail":[{"loc":["body","stock"]}]}"#), r#"[{"loc":["body","stock"]}]"#);
    }

    #[test]
    fn status_codes_map_to_error_kinds() {
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, "Product not found".to_owned()),
            ClientError::NotFound(ref detail) if detail == "Product not found"
        ));
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, "Invalid credentials".to_owned()),
            ClientError::Unauthorized(_)
        ));
        assert!(matches!(
            status_error(StatusCode::UNPROCESSABLE_ENTITY, String::new()),
            ClientError::Rejected(_)
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, String::new()),
            ClientError::Api { status: 502, .. }
        ));
    }
}
