//! CLI command runners for the role-scoped views
//!
//! Each runner is one user interaction: it talks to the flow layer,
//! prints the outcome, and logs a diagnostic on failure. Failures are
//! returned to `main` for the exit code; nothing is retried here.

use super::tables;
use crate::api::{self, ListScope, NewRequest, RegisterUser, RequestStatus};
use crate::config::Config;
use crate::flow::{Flow, Watcher};
use crate::session::{Role, Session, SessionStore};
use crate::validate;
use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

/// Load config and session, and build a flow over the HTTP backend.
fn open_flow() -> Result<(Config, SessionStore, Flow)> {
    let config = Config::load()?;
    let store = SessionStore::open_default()?;
    let session = store.load();
    let api = api::connect(&config, &session)?;
    Ok((config, store, Flow::new(api, session)))
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read input")?;
    Ok(line.trim_end().to_string())
}

/// Exchange credentials for a token and persist the session.
pub async fn run_login(email: &str, password: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let store = SessionStore::open_default()?;

    let password = match password {
        Some(p) => p,
        None => prompt("Password: ")?,
    };
    validate::validate_credentials(email, &password)?;

    // Login itself runs without a token.
    let api = api::connect(&config, &Session::default())?;
    let response = match api.login(email, &password).await {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Login failed for {}: {}", email, e);
            return Err(e.into());
        }
    };

    let session = Session::from_login(&response);
    store.save(&session)?;

    let who = session.display_name.clone().unwrap_or_else(|| email.to_string());
    let role = session.role.clone().unwrap_or_else(|| "unknown role".to_string());
    println!("✅ Logged in as {} ({})", who.bold(), role);
    Ok(())
}

pub async fn run_register(name: &str, email: &str, password: Option<String>) -> Result<()> {
    let config = Config::load()?;

    let password = match password {
        Some(p) => p,
        None => prompt("Password: ")?,
    };
    validate::validate_credentials(email, &password)?;

    let api = api::connect(&config, &Session::default())?;
    let user = RegisterUser {
        name: name.to_string(),
        email: email.to_string(),
        password,
    };
    match api.register(&user).await {
        Ok(ack) => {
            println!("✅ {}", if ack.is_empty() { "Registered".to_string() } else { ack });
            println!("You can now log in: sweep login {}", email);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Registration failed for {}: {}", email, e);
            Err(e.into())
        }
    }
}

/// Clear the persisted session. Always succeeds, even when nothing was
/// stored.
pub fn run_logout() -> Result<()> {
    let store = SessionStore::open_default()?;
    store.clear()?;
    println!("Logged out.");
    Ok(())
}

/// Pure read of the persisted session; never fails.
pub fn run_whoami() -> Result<()> {
    let store = SessionStore::open_default()?;
    let session = store.load();

    if !session.is_logged_in() {
        println!("Not logged in.");
        return Ok(());
    }

    println!("{}", "=== SWEEP SESSION ===".bold().cyan());
    println!("Name:  {}", session.display_name.as_deref().unwrap_or("-"));
    println!("Email: {}", session.email.as_deref().unwrap_or("-"));
    println!("Role:  {}", session.role.as_deref().unwrap_or("-"));
    if let Some(user_id) = session.user_id() {
        println!("User id: {}", user_id);
    }
    if let Some(staff) = &session.staff {
        println!(
            "Staff profile: {} <{}>, assigned: {}",
            staff.name.as_deref().unwrap_or("-"),
            staff.email.as_deref().unwrap_or("-"),
            if staff.assigned { "yes" } else { "no" }
        );
    }
    Ok(())
}

/// Submit a new cleaning request.
pub async fn run_submit(form: NewRequest) -> Result<()> {
    let (_config, _store, flow) = open_flow()?;

    match flow.submit(form).await {
        Ok(ack) => {
            println!(
                "✅ {}",
                if ack.trim().is_empty() { "Request sent successfully".to_string() } else { ack }
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Failed to submit request: {}", e);
            Err(e.into())
        }
    }
}

/// Resolve a `--scope` argument against the session.
fn resolve_scope(scope: &str, session: &Session) -> Result<ListScope> {
    match scope {
        "all" => Ok(ListScope::All),
        "pending" => Ok(ListScope::Pending),
        "mine" => Ok(ListScope::ByUser(session.user_id().unwrap_or(0))),
        "staff" => {
            let email = session
                .staff
                .as_ref()
                .and_then(|s| s.email.clone())
                .or_else(|| session.email.clone())
                .context("No staff email in session; log in as staff first")?;
            Ok(ListScope::ByStaffEmail(email))
        }
        other => anyhow::bail!("Unknown scope '{}'. Use all, pending, mine, or staff", other),
    }
}

pub async fn run_list(scope: &str) -> Result<()> {
    let (_config, _store, flow) = open_flow()?;
    let scope = resolve_scope(scope, flow.session())?;

    match flow.refresh(scope).await {
        Ok(requests) => {
            println!("{}", tables::requests_table(&requests));
            Ok(())
        }
        Err(e) => {
            tracing::error!("Failed to load requests: {}", e);
            Err(e.into())
        }
    }
}

/// Approve, reject, or set an arbitrary status, then show the
/// re-fetched list so the output is the confirmed server state.
pub async fn run_transition(id: i64, target: RequestStatus) -> Result<()> {
    let (_config, _store, flow) = open_flow()?;

    match flow.transition_refreshed(id, &target, ListScope::All).await {
        Ok(requests) => {
            println!("✅ Request {} -> {}", id, target);
            println!("{}", tables::requests_table(&requests));
            Ok(())
        }
        Err(e) => {
            tracing::error!("Failed to set request {} to {}: {}", id, target, e);
            Err(e.into())
        }
    }
}

pub async fn run_assign(id: i64, staff_name: &str, staff_email: &str) -> Result<()> {
    let (_config, _store, flow) = open_flow()?;

    match flow
        .assign_refreshed(id, staff_name, staff_email, ListScope::All)
        .await
    {
        Ok(requests) => {
            println!("✅ Staff assigned to request {}", id);
            println!("{}", tables::requests_table(&requests));
            Ok(())
        }
        Err(e) => {
            tracing::error!("Failed to assign staff to request {}: {}", id, e);
            Err(e.into())
        }
    }
}

pub async fn run_delete(id: i64) -> Result<()> {
    let (_config, _store, flow) = open_flow()?;

    match flow.delete(id).await {
        Ok(()) => {
            println!("Deleted request {}", id);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Failed to delete request {}: {}", id, e);
            Err(e.into())
        }
    }
}

pub async fn run_staff() -> Result<()> {
    let (_config, _store, flow) = open_flow()?;

    match flow.api().list_staff().await {
        Ok(staff) => {
            println!("{}", tables::staff_table(&staff));
            Ok(())
        }
        Err(e) => {
            tracing::error!("Failed to load staff directory: {}", e);
            Err(e.into())
        }
    }
}

pub async fn run_stats() -> Result<()> {
    let (_config, _store, flow) = open_flow()?;

    match flow.api().stats().await {
        Ok(stats) => {
            println!("{}", "=== SWEEP REQUEST STATS ===".bold().cyan());
            println!("{}", tables::stats_table(&stats));
            Ok(())
        }
        Err(e) => {
            tracing::error!("Failed to load stats: {}", e);
            Err(e.into())
        }
    }
}

/// One-shot role-scoped dashboard: admins see everything with pending
/// rows first, staff their assignments, users their own requests.
pub async fn run_dashboard() -> Result<()> {
    let (_config, _store, flow) = open_flow()?;

    let role = flow.session().role();
    let scope = flow.default_scope();
    let mut requests = match flow.refresh(scope).await {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to load dashboard: {}", e);
            return Err(e.into());
        }
    };

    let banner = match role {
        Some(Role::Admin) => "=== SWEEP DASHBOARD (ADMIN) ===",
        Some(Role::Staff) => "=== SWEEP DASHBOARD (STAFF) ===",
        _ => "=== SWEEP DASHBOARD ===",
    };
    println!("{}", banner.bold().cyan());

    if role == Some(Role::Admin) {
        // Pending rows are the actionable ones; float them to the top.
        requests.sort_by_key(|r| r.status != Some(RequestStatus::Pending));
    }
    println!("{}", tables::requests_table(&requests));
    Ok(())
}

/// Recurring dashboard: re-fetches on an interval until ctrl-c.
pub async fn run_watch(interval_override: Option<u64>) -> Result<()> {
    let (config, _store, flow) = open_flow()?;

    let interval = Duration::from_secs(interval_override.unwrap_or(config.watch.interval_secs));
    let scope = flow.default_scope();
    println!(
        "Watching {} every {}s (ctrl-c to stop)",
        scope,
        interval.as_secs()
    );

    let watcher = Watcher::new(Arc::clone(flow.api()), scope, interval);
    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    watcher
        .run(
            |requests| {
                println!();
                println!(
                    "{} {}",
                    "refreshed".bold().cyan(),
                    chrono::Local::now().format("%H:%M:%S")
                );
                println!("{}", tables::requests_table(&requests));
            },
            shutdown,
        )
        .await?;

    println!("Stopped watching.");
    Ok(())
}
