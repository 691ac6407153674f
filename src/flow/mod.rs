//! Request-flow client
//!
//! Coordinates submission, refresh, and status mutation against the
//! access layer. The one policy enforced here: after any mutation the
//! caller gets a fresh server read, never an optimistic local patch,
//! so the rendered state always reflects the last confirmed fetch.

mod poller;

pub use poller::{SeqGate, Watcher};

use crate::api::{ApiError, Assignment, CleaningApi, CleaningRequest, ListScope, NewRequest, RequestStatus};
use crate::session::{Role, Session};
use crate::validate;
use std::sync::Arc;

/// Role-aware coordinator over a [`CleaningApi`] backend.
pub struct Flow {
    api: Arc<dyn CleaningApi>,
    session: Session,
}

impl Flow {
    pub fn new(api: Arc<dyn CleaningApi>, session: Session) -> Self {
        Self { api, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn api(&self) -> &Arc<dyn CleaningApi> {
        &self.api
    }

    /// Submit a new request.
    ///
    /// Validation runs first; an invalid form never reaches the wire.
    /// The requester's id is derived from the session token (0 when the
    /// claim is missing, matching the server's lenient contract). The
    /// returned string is the server's opaque ack.
    pub async fn submit(&self, mut form: NewRequest) -> Result<String, ApiError> {
        validate::validate_new_request(&form)?;
        if form.user_id.is_none() {
            form.user_id = Some(self.session.user_id().unwrap_or(0));
        }
        self.api.create(&form).await
    }

    /// Fetch a list view. Pure read, no caching.
    pub async fn refresh(&self, scope: ListScope) -> Result<Vec<CleaningRequest>, ApiError> {
        self.api.list(scope).await
    }

    /// Request a status change.
    ///
    /// The server exposes two command endpoints (approve/reject) and a
    /// generic PATCH for everything else; this is the single place that
    /// knows the dispatch. No transition is guarded client-side - the
    /// server rejects illegal ones.
    pub async fn transition(&self, id: i64, target: &RequestStatus) -> Result<(), ApiError> {
        match target {
            RequestStatus::Approved => {
                self.api.approve(id).await?;
            }
            RequestStatus::Rejected => {
                self.api.reject(id).await?;
            }
            other => {
                self.api.update_status(id, other).await?;
            }
        }
        Ok(())
    }

    /// Mutate then full re-fetch: the extra round trip buys a view that
    /// can never diverge from the server.
    pub async fn transition_refreshed(
        &self,
        id: i64,
        target: &RequestStatus,
        scope: ListScope,
    ) -> Result<Vec<CleaningRequest>, ApiError> {
        self.transition(id, target).await?;
        self.refresh(scope).await
    }

    /// Hand a request to a staff member. Empty name or email is a
    /// validation error and produces no network call.
    pub async fn assign(
        &self,
        id: i64,
        staff_name: &str,
        staff_email: &str,
    ) -> Result<(), ApiError> {
        validate::validate_assignment(staff_name, staff_email)?;
        let assignment = Assignment {
            assigned_to: staff_name.trim().to_string(),
            email: staff_email.trim().to_string(),
        };
        self.api.assign(id, &assignment).await
    }

    pub async fn assign_refreshed(
        &self,
        id: i64,
        staff_name: &str,
        staff_email: &str,
        scope: ListScope,
    ) -> Result<Vec<CleaningRequest>, ApiError> {
        self.assign(id, staff_name, staff_email).await?;
        self.refresh(scope).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.api.delete(id).await
    }

    /// The list scope a dashboard should show for the session's role:
    /// admins see everything, staff their assignments, users their own
    /// submissions. No role at all falls back to the user view.
    pub fn default_scope(&self) -> ListScope {
        match self.session.role() {
            Some(Role::Admin) => ListScope::All,
            Some(Role::Staff) => {
                let email = self
                    .session
                    .staff
                    .as_ref()
                    .and_then(|s| s.email.clone())
                    .or_else(|| self.session.email.clone())
                    .unwrap_or_default();
                ListScope::ByStaffEmail(email)
            }
            Some(Role::User) | None => ListScope::ByUser(self.session.user_id().unwrap_or(0)),
        }
    }
}
