//! sweep: CLI client for the Sweep cleaning-service API
//!
//! This library provides:
//! - A typed API client for the remote cleaning-service REST API
//! - A persisted session (token/role) surviving between invocations
//! - The request flow: submit, refresh, status transitions, assignment
//! - Role-scoped terminal views and a sequenced polling dashboard
//! - An in-memory API simulator for tests (feature `test-sim`)

pub mod api;
pub mod config;
pub mod flow;
pub mod session;
pub mod validate;
pub mod views;

pub use api::{ApiError, CleaningApi, HttpApi};
pub use config::Config;
pub use flow::{Flow, SeqGate, Watcher};
pub use session::{Role, Session, SessionStore};
