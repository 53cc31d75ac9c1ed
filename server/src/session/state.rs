use crate::capabilities::Capabilities;
use serde::Serialize;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Session ID: 32-character lowercase hex string (128-bit unique source)
pub type SessionId = String;

const SESSION_ID_LENGTH: usize = 32;

/// Generate a session ID unique within the process lifetime.
pub fn generate_session_id() -> SessionId {
    Uuid::new_v4().simple().to_string()
}

/// Check that a string has the shape of a session ID.
pub fn validate_session_id(id: &str) -> bool {
    id.len() == SESSION_ID_LENGTH
        && id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
}

/// The single active session. Exists only between a successful create and the
/// matching delete (explicit or timer-driven).
#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub id: SessionId,
    /// Validator-amended capabilities, stored verbatim.
    pub capabilities: Capabilities,
    /// Derived once at creation from the `newCommandTimeout` capability
    /// (seconds). `None` means no inactivity timer is ever armed.
    pub new_command_timeout: Option<Duration>,
    pub started_at: u64,
}

impl ActiveSession {
    pub fn new(capabilities: Capabilities) -> Self {
        // Values outside Duration's range are treated as absent rather than
        // panicking; the validator rejects them before they reach this point.
        let new_command_timeout = capabilities
            .new_command_timeout_secs()
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok());

        Self {
            id: generate_session_id(),
            capabilities,
            new_command_timeout,
            started_at: now_millis(),
        }
    }

    pub fn entry(&self) -> SessionEntry {
        SessionEntry {
            id: self.id.clone(),
            capabilities: self.capabilities.clone(),
        }
    }
}

/// Wire-facing description of a session, as returned by the list operation.
#[derive(Debug, Clone, Serialize)]
pub struct SessionEntry {
    pub id: SessionId,
    pub capabilities: Capabilities,
}

/// Get current timestamp in milliseconds
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
