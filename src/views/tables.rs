//! Terminal table rendering for the role-scoped views

use crate::api::{CleaningRequest, StaffMember};
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct RequestRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Room")]
    room: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Assigned To")]
    assigned_to: String,
    #[tabled(rename = "Created")]
    created: String,
}

/// Render a request list the way the server returned it.
pub fn requests_table(requests: &[CleaningRequest]) -> String {
    if requests.is_empty() {
        return "No requests found.".to_string();
    }
    let rows: Vec<RequestRow> = requests
        .iter()
        .map(|r| RequestRow {
            id: r.id,
            status: r
                .status
                .as_ref()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
            name: r.name.clone(),
            service: r.service_type.clone(),
            room: r.room_no.clone(),
            address: r.address.clone(),
            assigned_to: r.assigned_to.clone().unwrap_or_else(|| "-".to_string()),
            created: r.created_at.clone().unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

#[derive(Tabled)]
struct StaffRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Assigned")]
    assigned: String,
    #[tabled(rename = "Joined")]
    joined: String,
}

pub fn staff_table(staff: &[StaffMember]) -> String {
    if staff.is_empty() {
        return "No staff found.".to_string();
    }
    let rows: Vec<StaffRow> = staff
        .iter()
        .map(|s| StaffRow {
            name: s.name.clone(),
            email: s.email.clone(),
            assigned: if s.assigned { "yes" } else { "no" }.to_string(),
            joined: s.joined_date.clone().unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Render the stats endpoint's JSON object as metric/value pairs.
/// The counter set is server-defined, so keys are rendered as-is.
pub fn stats_table(stats: &serde_json::Value) -> String {
    let rows: Vec<MetricRow> = match stats.as_object() {
        Some(map) => map
            .iter()
            .map(|(k, v)| MetricRow {
                metric: k.clone(),
                value: match v {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                },
            })
            .collect(),
        None => vec![MetricRow {
            metric: "stats".to_string(),
            value: stats.to_string(),
        }],
    };

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}
