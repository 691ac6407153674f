//! Request-access layer: typed clients for the cleaning-service API

mod error;
mod http;
mod types;

// In-memory simulator (feature-gated)
#[cfg(feature = "test-sim")]
pub mod sim;
#[cfg(feature = "test-sim")]
pub use sim::SimApi;

pub use error::ApiError;
pub use http::HttpApi;
pub use types::*;

use crate::config::Config;
use crate::session::Session;
use async_trait::async_trait;
use std::sync::Arc;

/// Trait for cleaning-service API backends
///
/// One production implementation (`HttpApi`) and one in-memory
/// simulator (`SimApi`, behind the `test-sim` feature). Every operation
/// surfaces failure as a tagged [`ApiError`]; none retry internally.
#[async_trait]
pub trait CleaningApi: Send + Sync {
    /// Get the backend name
    fn name(&self) -> &str;

    /// Exchange credentials for a token. Never carries a bearer token.
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError>;

    /// Create an account. Never carries a bearer token.
    async fn register(&self, user: &RegisterUser) -> Result<String, ApiError>;

    /// Submit a new request. The response is an opaque ack string; the
    /// server does not echo the created entity back.
    async fn create(&self, request: &NewRequest) -> Result<String, ApiError>;

    /// Fetch a list view. Order is server-defined.
    async fn list(&self, scope: ListScope) -> Result<Vec<CleaningRequest>, ApiError>;

    /// Approve command endpoint, text ack.
    async fn approve(&self, id: i64) -> Result<String, ApiError>;

    /// Reject command endpoint, text ack.
    async fn reject(&self, id: i64) -> Result<String, ApiError>;

    /// Generic status update for everything that is not approve/reject.
    async fn update_status(&self, id: i64, status: &RequestStatus) -> Result<(), ApiError>;

    /// Set the assignment fields of a request.
    async fn assign(&self, id: i64, assignment: &Assignment) -> Result<(), ApiError>;

    /// Delete a request. Not tied to any workflow guard.
    async fn delete(&self, id: i64) -> Result<(), ApiError>;

    /// Dashboard counters as an opaque JSON object.
    async fn stats(&self) -> Result<serde_json::Value, ApiError>;

    /// Staff directory for the admin assignment view.
    async fn list_staff(&self) -> Result<Vec<StaffMember>, ApiError>;
}

/// Create the production API client from config and session state.
///
/// The bearer token, when present, is attached to every call except
/// login/register (those endpoints reject circular auth).
pub fn connect(config: &Config, session: &Session) -> Result<Arc<dyn CleaningApi>, ApiError> {
    let api = HttpApi::new(&config.api.base_url)?.with_token(session.token.clone());
    Ok(Arc::new(api))
}
