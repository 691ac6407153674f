//! In-memory cleaning-service simulator for tests
//!
//! Implements [`CleaningApi`] against a concurrent in-memory store. No
//! network, no credentials beyond the seeded accounts. Every call is
//! recorded so tests can assert which operations did (or did not)
//! reach the API, and list calls can be slowed down to exercise the
//! poll-sequencing behavior.

#![allow(dead_code)]

use super::{
    ApiError, Assignment, CleaningApi, CleaningRequest, ListScope, LoginResponse, NewRequest,
    RegisterUser, RequestStatus, SelectedStaff, StaffMember,
};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
struct SimAccount {
    password: String,
    name: String,
    role: String,
    user_id: i64,
}

/// In-memory API double with call recording.
pub struct SimApi {
    accounts: DashMap<String, SimAccount>,
    requests: DashMap<i64, CleaningRequest>,
    staff: Mutex<Vec<StaffMember>>,
    next_id: AtomicI64,
    /// Ordered log of operations, e.g. `create`, `list:all`, `approve:3`.
    calls: Mutex<Vec<String>>,
    /// Exact payloads that reached `create`.
    created: Mutex<Vec<NewRequest>>,
    /// Artificial latency applied to each `list` call.
    list_delay: Mutex<Option<Duration>>,
}

impl SimApi {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            requests: DashMap::new(),
            staff: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            calls: Mutex::new(Vec::new()),
            created: Mutex::new(Vec::new()),
            list_delay: Mutex::new(None),
        }
    }

    /// Seed a login account. The minted token is JWT-shaped so the
    /// session layer can decode its `userId` claim.
    pub fn with_account(
        self,
        email: &str,
        password: &str,
        name: &str,
        role: &str,
        user_id: i64,
    ) -> Self {
        self.accounts.insert(
            email.to_string(),
            SimAccount {
                password: password.to_string(),
                name: name.to_string(),
                role: role.to_string(),
                user_id,
            },
        );
        self
    }

    pub fn with_staff(self, name: &str, email: &str) -> Self {
        self.staff.lock().unwrap().push(StaffMember {
            name: name.to_string(),
            email: email.to_string(),
            role: Some("STAFF".to_string()),
            assigned: false,
            joined_date: None,
        });
        self
    }

    /// Slow every list call down, to simulate a laggy server.
    pub fn with_list_delay(self, delay: Duration) -> Self {
        *self.list_delay.lock().unwrap() = Some(delay);
        self
    }

    /// Insert a request directly, bypassing `create`. Returns the id.
    pub fn seed_request(&self, new: NewRequest, status: RequestStatus) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.requests.insert(id, materialize(id, &new, status));
        id
    }

    /// All recorded operations, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Payloads that reached `create`, in call order.
    pub fn created(&self) -> Vec<NewRequest> {
        self.created.lock().unwrap().clone()
    }

    pub fn request(&self, id: i64) -> Option<CleaningRequest> {
        self.requests.get(&id).map(|r| r.clone())
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn mint_token(account: &SimAccount) -> String {
        let header = URL_SAFE_NO_PAD.encode(b"{\"alg\":\"none\"}");
        let payload = URL_SAFE_NO_PAD.encode(
            serde_json::json!({ "userId": account.user_id, "role": account.role }).to_string(),
        );
        format!("{}.{}.sim", header, payload)
    }
}

impl Default for SimApi {
    fn default() -> Self {
        Self::new()
    }
}

fn materialize(id: i64, new: &NewRequest, status: RequestStatus) -> CleaningRequest {
    CleaningRequest {
        id,
        user_id: new.user_id,
        name: new.name.clone(),
        email: new.email.clone(),
        phone: new.phone.clone(),
        room_no: new.room_no.clone(),
        address: new.address.clone(),
        location_url: new.location_url.clone(),
        service_type: new.service_type.clone(),
        status: Some(status),
        assigned_to: None,
        staff_email: None,
        selected_staff: None,
        created_at: Some(chrono::Utc::now().to_rfc3339()),
    }
}

#[async_trait]
impl CleaningApi for SimApi {
    fn name(&self) -> &str {
        "sim"
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        self.record(format!("login:{}", email));
        let account = self
            .accounts
            .get(email)
            .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;
        if account.password != password {
            return Err(ApiError::Unauthorized("Invalid email or password".to_string()));
        }
        Ok(LoginResponse {
            token: Self::mint_token(&account),
            email: Some(email.to_string()),
            name: Some(account.name.clone()),
            role: Some(account.role.clone()),
            joined_date: Some("2024-01-01".to_string()),
            assigned: false,
        })
    }

    async fn register(&self, user: &RegisterUser) -> Result<String, ApiError> {
        self.record(format!("register:{}", user.email));
        if self.accounts.contains_key(&user.email) {
            return Err(ApiError::BadRequest("Email already registered".to_string()));
        }
        let user_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.accounts.insert(
            user.email.clone(),
            SimAccount {
                password: user.password.clone(),
                name: user.name.clone(),
                role: "USER".to_string(),
                user_id,
            },
        );
        Ok("User registered successfully".to_string())
    }

    async fn create(&self, request: &NewRequest) -> Result<String, ApiError> {
        self.record("create");
        self.created.lock().unwrap().push(request.clone());
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.requests
            .insert(id, materialize(id, request, RequestStatus::Pending));
        // Text ack only; the created id is not echoed back.
        Ok("Request submitted successfully".to_string())
    }

    async fn list(&self, scope: ListScope) -> Result<Vec<CleaningRequest>, ApiError> {
        self.record(format!("list:{}", scope));
        let list_delay = *self.list_delay.lock().unwrap();
        if let Some(delay) = list_delay {
            tokio::time::sleep(delay).await;
        }
        let mut rows: Vec<CleaningRequest> = self
            .requests
            .iter()
            .map(|entry| entry.value().clone())
            .filter(|r| match &scope {
                ListScope::All => true,
                ListScope::Pending => r.status == Some(RequestStatus::Pending),
                ListScope::ByStaffEmail(email) => r.staff_email.as_deref() == Some(email.as_str()),
                ListScope::ByUser(user_id) => r.user_id == Some(*user_id),
            })
            .collect();
        rows.sort_by_key(|r| r.id);
        Ok(rows)
    }

    async fn approve(&self, id: i64) -> Result<String, ApiError> {
        self.record(format!("approve:{}", id));
        let mut entry = self
            .requests
            .get_mut(&id)
            .ok_or_else(|| ApiError::BadRequest(format!("No request with id {}", id)))?;
        entry.status = Some(RequestStatus::Approved);
        Ok("Request approved".to_string())
    }

    async fn reject(&self, id: i64) -> Result<String, ApiError> {
        self.record(format!("reject:{}", id));
        let mut entry = self
            .requests
            .get_mut(&id)
            .ok_or_else(|| ApiError::BadRequest(format!("No request with id {}", id)))?;
        entry.status = Some(RequestStatus::Rejected);
        Ok("Request rejected".to_string())
    }

    async fn update_status(&self, id: i64, status: &RequestStatus) -> Result<(), ApiError> {
        self.record(format!("update-status:{}:{}", id, status));
        let mut entry = self
            .requests
            .get_mut(&id)
            .ok_or_else(|| ApiError::BadRequest(format!("No request with id {}", id)))?;
        entry.status = Some(status.clone());
        Ok(())
    }

    async fn assign(&self, id: i64, assignment: &Assignment) -> Result<(), ApiError> {
        self.record(format!("assign:{}", id));
        let mut entry = self
            .requests
            .get_mut(&id)
            .ok_or_else(|| ApiError::BadRequest(format!("No request with id {}", id)))?;
        entry.assigned_to = Some(assignment.assigned_to.clone());
        entry.staff_email = Some(assignment.email.clone());
        entry.selected_staff = Some(SelectedStaff {
            name: assignment.assigned_to.clone(),
            email: assignment.email.clone(),
        });
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.record(format!("delete:{}", id));
        self.requests
            .remove(&id)
            .ok_or_else(|| ApiError::BadRequest(format!("No request with id {}", id)))?;
        Ok(())
    }

    async fn stats(&self) -> Result<serde_json::Value, ApiError> {
        self.record("stats");
        let total = self.requests.len();
        let count = |status: RequestStatus| {
            self.requests
                .iter()
                .filter(|r| r.status == Some(status.clone()))
                .count()
        };
        Ok(serde_json::json!({
            "total": total,
            "pending": count(RequestStatus::Pending),
            "approved": count(RequestStatus::Approved),
            "rejected": count(RequestStatus::Rejected),
        }))
    }

    async fn list_staff(&self) -> Result<Vec<StaffMember>, ApiError> {
        self.record("staff");
        Ok(self.staff.lock().unwrap().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewRequest {
        NewRequest {
            user_id: Some(1),
            name: "A".to_string(),
            email: "a@b.com".to_string(),
            phone: "1234567890".to_string(),
            room_no: "101".to_string(),
            address: "x".to_string(),
            location_url: None,
            service_type: "deep-clean".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let sim = SimApi::new();
        sim.create(&sample()).await.unwrap();
        let rows = sim.list(ListScope::All).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, Some(RequestStatus::Pending));
        assert_eq!(sim.calls(), vec!["create", "list:all"]);
    }

    #[tokio::test]
    async fn test_login_token_carries_user_id() {
        let sim = SimApi::new().with_account("a@b.com", "secret", "A", "USER", 7);
        let resp = sim.login("a@b.com", "secret").await.unwrap();
        assert_eq!(crate::session::decode_user_id(&resp.token), Some(7));
    }

    #[tokio::test]
    async fn test_login_rejects_bad_password() {
        let sim = SimApi::new().with_account("a@b.com", "secret", "A", "USER", 7);
        let err = sim.login("a@b.com", "wrong").await.unwrap_err();
        assert!(err.is_auth());
    }

    #[tokio::test]
    async fn test_scope_filters() {
        let sim = SimApi::new();
        let mine = sim.seed_request(sample(), RequestStatus::Pending);
        let other = NewRequest {
            user_id: Some(2),
            ..sample()
        };
        sim.seed_request(other, RequestStatus::Approved);

        let pending = sim.list(ListScope::Pending).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, mine);

        let by_user = sim.list(ListScope::ByUser(2)).await.unwrap();
        assert_eq!(by_user.len(), 1);
    }
}
