//! Persisted client-side session: token, role, and profile context
//!
//! The session is a single JSON document on disk with one schema,
//! written with owner-only permissions. It is the only source of truth
//! for "who is logged in" - no server round trip happens on startup.
//! Every field is optional so a partial document (token present, role
//! absent) loads without error; readers must cope.

use crate::api::LoginResponse;
use anyhow::{Context, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const SESSION_FILE: &str = "session.json";
const ENV_DATA_DIR: &str = "SWEEP_DATA_DIR";

/// Role of the logged-in account, parsed leniently from the server's
/// role string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Staff,
    Admin,
}

impl Role {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "USER" => Some(Role::User),
            "STAFF" => Some(Role::Staff),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Staff => "STAFF",
            Role::Admin => "ADMIN",
        }
    }
}

/// Staff-profile blob persisted alongside the auth fields for staff
/// accounts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaffInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub assigned: bool,
    #[serde(default)]
    pub joined_date: Option<String>,
}

/// The persisted session document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    pub token: Option<String>,
    pub role: Option<String>,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub staff: Option<StaffInfo>,
}

impl Session {
    /// Build a session document from a successful login response.
    pub fn from_login(response: &LoginResponse) -> Self {
        let role = response.role.clone();
        let staff = if role.as_deref().and_then(Role::parse) == Some(Role::Staff) {
            Some(StaffInfo {
                name: response.name.clone(),
                email: response.email.clone(),
                role: role.clone(),
                assigned: response.assigned,
                joined_date: response.joined_date.clone(),
            })
        } else {
            None
        };
        Self {
            token: Some(response.token.clone()),
            role,
            email: response.email.clone(),
            display_name: response.name.clone(),
            staff,
        }
    }

    /// Presence of a token is the login criterion, matching the server
    /// contract where no session check happens on load.
    pub fn is_logged_in(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().and_then(Role::parse)
    }

    /// The numeric user id carried in the token's JWT payload, if any.
    pub fn user_id(&self) -> Option<i64> {
        self.token.as_deref().and_then(decode_user_id)
    }
}

/// Decode the `userId` claim from a JWT without verifying it.
///
/// The client has no key material; the server remains the authority.
/// Any malformed token yields `None`, never an error.
pub fn decode_user_id(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    claims.get("userId")?.as_i64()
}

/// File-backed store for the session document.
///
/// Passed by reference to whatever needs auth context; nothing in the
/// crate reads ambient global state.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store rooted at an explicit directory (tests use a tempdir).
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(SESSION_FILE),
        }
    }

    /// Store at the default location: `$SWEEP_DATA_DIR` when set,
    /// otherwise the platform data directory.
    pub fn open_default() -> Result<Self> {
        if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
            return Ok(Self::new(Path::new(&dir)));
        }
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "sweep") {
            Ok(Self::new(proj_dirs.data_dir()))
        } else {
            // Last resort when no home directory is resolvable
            let fallback = dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".sweep");
            Ok(Self::new(&fallback))
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted session. Missing or unreadable files load as
    /// the empty session; login reads must never fail.
    pub fn load(&self) -> Session {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(session) => session,
                Err(e) => {
                    tracing::warn!("Ignoring corrupt session file {}: {}", self.path.display(), e);
                    Session::default()
                }
            },
            Err(_) => Session::default(),
        }
    }

    /// Persist the session with owner-only permissions.
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(session)?)
            .with_context(|| format!("Failed to write session to {}", self.path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&self.path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&self.path, perms)?;
        }

        tracing::debug!("Saved session to {}", self.path.display());
        Ok(())
    }

    /// Clear all persisted session state. Idempotent: clearing an
    /// already-empty store succeeds.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to remove {}", self.path.display()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn login_response(role: &str) -> LoginResponse {
        LoginResponse {
            token: "h.p.s".to_string(),
            email: Some("a@b.com".to_string()),
            name: Some("A".to_string()),
            role: Some(role.to_string()),
            joined_date: Some("2024-01-01".to_string()),
            assigned: true,
        }
    }

    #[test]
    fn test_save_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = SessionStore::new(tmp.path());

        let session = Session::from_login(&login_response("ADMIN"));
        store.save(&session).unwrap();

        let loaded = store.load();
        assert!(loaded.is_logged_in());
        assert_eq!(loaded.role(), Some(Role::Admin));
        assert_eq!(loaded.email.as_deref(), Some("a@b.com"));
        assert!(loaded.staff.is_none());
    }

    #[test]
    fn test_staff_login_keeps_profile_blob() {
        let session = Session::from_login(&login_response("STAFF"));
        let staff = session.staff.expect("staff blob");
        assert_eq!(staff.email.as_deref(), Some("a@b.com"));
        assert!(staff.assigned);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let store = SessionStore::new(tmp.path());
        store.save(&Session::from_login(&login_response("USER"))).unwrap();

        store.clear().unwrap();
        assert!(!store.load().is_logged_in());

        // Second clear on an already-empty store must also succeed.
        store.clear().unwrap();
        assert!(!store.load().is_logged_in());
    }

    #[test]
    fn test_partial_document_tolerated() {
        let tmp = TempDir::new().unwrap();
        let store = SessionStore::new(tmp.path());
        // Token present, role absent - a representable partial state.
        std::fs::write(store.path(), r#"{"token":"abc"}"#).unwrap();

        let session = store.load();
        assert!(session.is_logged_in());
        assert!(session.role().is_none());
    }

    #[test]
    fn test_corrupt_document_loads_empty() {
        let tmp = TempDir::new().unwrap();
        let store = SessionStore::new(tmp.path());
        std::fs::write(store.path(), "not json at all").unwrap();
        assert!(!store.load().is_logged_in());
    }

    #[test]
    fn test_decode_user_id() {
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;
        use base64::Engine;
        let payload = URL_SAFE_NO_PAD.encode(r#"{"userId":42,"sub":"a@b.com"}"#);
        let token = format!("header.{}.sig", payload);
        assert_eq!(decode_user_id(&token), Some(42));

        assert_eq!(decode_user_id("garbage"), None);
        assert_eq!(decode_user_id("a.b.c"), None);
        assert_eq!(decode_user_id(""), None);
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse(" STAFF "), Some(Role::Staff));
        assert_eq!(Role::parse("superuser"), None);
    }
}
