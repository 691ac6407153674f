//! HTTP implementation of the cleaning-service API client
//!
//! Thin reqwest wrapper: no retries, no backoff, no per-request timeout
//! beyond the transport defaults. Callers own error presentation.

use super::{
    ApiError, Assignment, CleaningApi, CleaningRequest, ListScope, LoginResponse, NewRequest,
    RegisterUser, RequestStatus, StaffMember,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

#[derive(Debug)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpApi {
    /// Create a client against `base_url` (e.g. `http://localhost:8082`).
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        // Validate early so a bad config fails at startup, not per call.
        let parsed = Url::parse(base_url)
            .map_err(|e| ApiError::Validation(format!("invalid API base url '{base_url}': {e}")))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Attach the bearer token used for every non-public endpoint.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Add `Authorization: Bearer <token>` when a token is present.
    /// Login/register must not go through here.
    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = builder.send().await.map_err(ApiError::from_network_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ApiError::from_http_status(status, error_text));
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.authed(self.client.get(self.endpoint(path)))).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Other(anyhow::anyhow!("Failed to parse response from {path}: {e}")))
    }

    /// POST with an empty body to a command endpoint returning plain text.
    async fn post_command(&self, path: &str) -> Result<String, ApiError> {
        let response = self
            .send(self.authed(self.client.post(self.endpoint(path))))
            .await?;
        response.text().await.map_err(ApiError::from_network_error)
    }
}

#[async_trait]
impl CleaningApi for HttpApi {
    fn name(&self) -> &str {
        "http"
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = serde_json::json!({ "email": email, "password": password });
        // Deliberately unauthenticated: the token comes from this call.
        let response = self
            .send(self.client.post(self.endpoint("/api/auth/login")).json(&body))
            .await?;
        response
            .json::<LoginResponse>()
            .await
            .map_err(|e| ApiError::Other(anyhow::anyhow!("Failed to parse login response: {e}")))
    }

    async fn register(&self, user: &RegisterUser) -> Result<String, ApiError> {
        let response = self
            .send(self.client.post(self.endpoint("/api/user/register")).json(user))
            .await?;
        response.text().await.map_err(ApiError::from_network_error)
    }

    async fn create(&self, request: &NewRequest) -> Result<String, ApiError> {
        // The server acks with plain text and never returns the created
        // entity, so the assigned id is only visible on the next list.
        let response = self
            .send(self.authed(self.client.post(self.endpoint("/api/requests")).json(request)))
            .await?;
        response.text().await.map_err(ApiError::from_network_error)
    }

    async fn list(&self, scope: ListScope) -> Result<Vec<CleaningRequest>, ApiError> {
        let path = match scope {
            ListScope::All => "/api/requests".to_string(),
            ListScope::Pending => "/api/requests/pending".to_string(),
            ListScope::ByStaffEmail(email) => format!("/api/requests/staff/{}", email),
            ListScope::ByUser(user_id) => format!("/api/requests/user/{}", user_id),
        };
        self.get_json(&path).await
    }

    async fn approve(&self, id: i64) -> Result<String, ApiError> {
        self.post_command(&format!("/api/requests/{}/approve", id)).await
    }

    async fn reject(&self, id: i64) -> Result<String, ApiError> {
        self.post_command(&format!("/api/requests/{}/reject", id)).await
    }

    async fn update_status(&self, id: i64, status: &RequestStatus) -> Result<(), ApiError> {
        let body = serde_json::json!({ "status": status });
        self.send(
            self.authed(
                self.client
                    .put(self.endpoint(&format!("/api/requests/update-status/{}", id)))
                    .json(&body),
            ),
        )
        .await?;
        Ok(())
    }

    async fn assign(&self, id: i64, assignment: &Assignment) -> Result<(), ApiError> {
        self.send(
            self.authed(
                self.client
                    .put(self.endpoint(&format!("/api/requests/{}/assign", id)))
                    .json(assignment),
            ),
        )
        .await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.send(self.authed(self.client.delete(self.endpoint(&format!("/api/requests/{}", id)))))
            .await?;
        Ok(())
    }

    async fn stats(&self) -> Result<serde_json::Value, ApiError> {
        self.get_json("/api/requests/stats").await
    }

    async fn list_staff(&self) -> Result<Vec<StaffMember>, ApiError> {
        self.get_json("/api/staff/all").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let api = HttpApi::new("http://localhost:8082/").unwrap();
        assert_eq!(api.endpoint("/api/requests"), "http://localhost:8082/api/requests");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let err = HttpApi::new("not a url").unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
