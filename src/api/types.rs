//! Wire types for the cleaning-service API
//!
//! Field names follow the server's camelCase JSON contract. Everything
//! the server may omit is an `Option` so a sparse row never fails the
//! whole list deserialization.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a cleaning request.
///
/// `Other` absorbs statuses this client does not know about so a newer
/// server cannot break list rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
    Other(String),
}

impl RequestStatus {
    pub fn as_str(&self) -> &str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Approved => "APPROVED",
            RequestStatus::Rejected => "REJECTED",
            RequestStatus::Completed => "COMPLETED",
            RequestStatus::Other(s) => s.as_str(),
        }
    }

    /// Parse a user-supplied status name (case-insensitive).
    pub fn parse(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => RequestStatus::Pending,
            "APPROVED" => RequestStatus::Approved,
            "REJECTED" => RequestStatus::Rejected,
            "COMPLETED" => RequestStatus::Completed,
            other => RequestStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for RequestStatus {
    fn from(s: String) -> Self {
        RequestStatus::parse(&s)
    }
}

impl From<RequestStatus> for String {
    fn from(status: RequestStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Staff reference embedded in a request row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedStaff {
    pub name: String,
    pub email: String,
}

/// One cleaning job request as the server returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleaningRequest {
    /// Server-assigned identity, immutable once created.
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub room_no: String,
    pub address: String,
    #[serde(default)]
    pub location_url: Option<String>,
    pub service_type: String,
    #[serde(default)]
    pub status: Option<RequestStatus>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub staff_email: Option<String>,
    #[serde(default)]
    pub selected_staff: Option<SelectedStaff>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl CleaningRequest {
    /// Assignment is an implicit sub-state: present staff fields mean
    /// the request has been handed to someone.
    pub fn is_assigned(&self) -> bool {
        self.assigned_to.as_deref().is_some_and(|s| !s.is_empty())
            || self.staff_email.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// Payload for creating a new request (client -> server).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub room_no: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_url: Option<String>,
    pub service_type: String,
}

/// Staff-assignment payload; the server expects `{assignedTo, email}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    #[serde(rename = "assignedTo")]
    pub assigned_to: String,
    pub email: String,
}

/// Successful login response from `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub joined_date: Option<String>,
    #[serde(default)]
    pub assigned: bool,
}

/// Account-creation payload for `POST /api/user/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// A staff directory entry from `GET /api/staff/all`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub assigned: bool,
    #[serde(default)]
    pub joined_date: Option<String>,
}

/// Which read endpoint a list call maps to. Order of the returned
/// sequence is server-defined; the client does not re-sort on fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    All,
    Pending,
    ByStaffEmail(String),
    ByUser(i64),
}

impl fmt::Display for ListScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListScope::All => write!(f, "all"),
            ListScope::Pending => write!(f, "pending"),
            ListScope::ByStaffEmail(email) => write!(f, "staff:{}", email),
            ListScope::ByUser(id) => write!(f, "user:{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        let json = "\"APPROVED\"";
        let status: RequestStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status, RequestStatus::Approved);
        assert_eq!(serde_json::to_string(&status).unwrap(), json);
    }

    #[test]
    fn test_unknown_status_is_other() {
        let status: RequestStatus = serde_json::from_str("\"ESCALATED\"").unwrap();
        assert_eq!(status, RequestStatus::Other("ESCALATED".to_string()));
        assert_eq!(status.as_str(), "ESCALATED");
    }

    #[test]
    fn test_request_deserializes_sparse_row() {
        // Server rows often omit assignment and timestamp fields.
        let json = r#"{
            "id": 4,
            "name": "A",
            "email": "a@b.com",
            "phone": "1234567890",
            "roomNo": "101",
            "address": "x",
            "serviceType": "deep-clean",
            "status": "PENDING"
        }"#;
        let req: CleaningRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.id, 4);
        assert_eq!(req.status, Some(RequestStatus::Pending));
        assert!(!req.is_assigned());
    }

    #[test]
    fn test_assigned_substate() {
        let json = r#"{
            "id": 9,
            "name": "A",
            "email": "a@b.com",
            "phone": "1234567890",
            "roomNo": "101",
            "address": "x",
            "serviceType": "deep-clean",
            "assignedTo": "Sonal Patil",
            "staffEmail": "sonal@example.com"
        }"#;
        let req: CleaningRequest = serde_json::from_str(json).unwrap();
        assert!(req.is_assigned());
        assert!(req.status.is_none());
    }

    #[test]
    fn test_new_request_wire_shape() {
        let req = NewRequest {
            user_id: Some(1),
            name: "A".to_string(),
            email: "a@b.com".to_string(),
            phone: "1234567890".to_string(),
            room_no: "101".to_string(),
            address: "x".to_string(),
            location_url: None,
            service_type: "deep-clean".to_string(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["userId"], 1);
        assert_eq!(value["roomNo"], "101");
        assert_eq!(value["serviceType"], "deep-clean");
        // Optional url is omitted, not null
        assert!(value.get("locationUrl").is_none());
    }

    #[test]
    fn test_assignment_wire_shape() {
        let a = Assignment {
            assigned_to: "Sonal Patil".to_string(),
            email: "sonal@example.com".to_string(),
        };
        let value = serde_json::to_value(&a).unwrap();
        assert_eq!(value["assignedTo"], "Sonal Patil");
        assert_eq!(value["email"], "sonal@example.com");
    }
}
