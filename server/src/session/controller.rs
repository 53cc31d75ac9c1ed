use crate::capabilities::{BasicValidator, Capabilities, CapabilityError, CapabilityValidator};
use crate::session::state::{ActiveSession, SessionEntry, SessionId, now_millis};
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Session lifecycle errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Cannot create a new session while one is in progress")]
    AlreadyActive,

    #[error(transparent)]
    InvalidCapabilities(#[from] CapabilityError),
}

/// Owns the singleton session and its inactivity timer.
///
/// All operations serialize through one async mutex, held across the
/// validator call in `create_session` so nothing can slip between validation
/// success and the state commit. At most one session exists at a time; a
/// second create is rejected, never queued.
pub struct SessionController {
    state: Arc<Mutex<ControllerState>>,
    validator: Arc<dyn CapabilityValidator>,
}

struct ControllerState {
    session: Option<ActiveSession>,
    /// Bumped on every create and delete. An armed timer captures the value
    /// at arm time and re-checks it before expiring the session, so a stale
    /// timer from an earlier lifecycle can never touch a newer session.
    generation: u64,
    /// Pending single-shot inactivity timer. Always aborted and cleared
    /// before the session record itself is cleared.
    idle_timer: Option<JoinHandle<()>>,
}

impl ControllerState {
    /// The one deletion path, shared by explicit deletes and timer expiry.
    fn delete(&mut self) {
        if let Some(timer) = self.idle_timer.take() {
            timer.abort();
        }
        self.generation += 1;
        if let Some(session) = self.session.take() {
            counter!("autodriver_sessions_deleted_total").increment(1);
            info!(
                "Session {} deleted after {} ms",
                session.id,
                now_millis().saturating_sub(session.started_at)
            );
        }
    }
}

impl SessionController {
    pub fn new() -> Self {
        Self::with_validator(Arc::new(BasicValidator::new()))
    }

    pub fn with_validator(validator: Arc<dyn CapabilityValidator>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ControllerState {
                session: None,
                generation: 0,
                idle_timer: None,
            })),
            validator,
        }
    }

    /// Create the session.
    ///
    /// Fails with `AlreadyActive` if one exists, or `InvalidCapabilities` if
    /// the validator rejects the input; neither failure mutates anything.
    /// The returned capabilities include any validator amendments. The
    /// inactivity timer is not armed here; the command layer arms it via
    /// `reset_inactivity_timer` once it starts observing traffic.
    pub async fn create_session(
        &self,
        caps: Capabilities,
    ) -> Result<(SessionId, Capabilities), SessionError> {
        let mut state = self.state.lock().await;

        if state.session.is_some() {
            return Err(SessionError::AlreadyActive);
        }

        // Validation suspends while the lock is held: no other operation can
        // interleave between a successful validation and the commit below.
        let validated = self.validator.validate(caps).await?;

        let session = ActiveSession::new(validated);
        let id = session.id.clone();
        let effective = session.capabilities.clone();

        state.session = Some(session);
        state.generation += 1;

        counter!("autodriver_sessions_created_total").increment(1);
        info!("Session created with session id: {}", id);

        Ok((id, effective))
    }

    /// List active sessions: empty, or exactly one entry.
    pub async fn get_sessions(&self) -> Vec<SessionEntry> {
        let state = self.state.lock().await;
        state.session.iter().map(ActiveSession::entry).collect()
    }

    /// Capabilities of the active session, or `None` when idle. Idle is not
    /// an error at this layer; the protocol binding decides how to surface it.
    pub async fn get_session(&self) -> Option<Capabilities> {
        let state = self.state.lock().await;
        state.session.as_ref().map(|s| s.capabilities.clone())
    }

    /// Tear down the session. Idempotent; a no-op when idle. The timer is
    /// cancelled first, then all session-scoped fields are cleared together.
    pub async fn delete_session(&self) {
        let mut state = self.state.lock().await;
        state.delete();
    }

    /// (Re)arm the inactivity timer for the active session.
    ///
    /// Called by the command layer after each served command. A no-op when
    /// idle or when the session carries no `newCommandTimeout`. On expiry the
    /// timer runs the same deletion path as `delete_session`, guarded by a
    /// generation check against the session having been replaced meanwhile.
    pub async fn reset_inactivity_timer(&self) {
        let mut state = self.state.lock().await;

        let Some(session) = &state.session else {
            return;
        };
        let Some(timeout) = session.new_command_timeout else {
            return;
        };
        let session_id = session.id.clone();

        if let Some(timer) = state.idle_timer.take() {
            timer.abort();
        }

        let generation = state.generation;
        let shared = Arc::clone(&self.state);
        state.idle_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            let mut state = shared.lock().await;
            if state.generation != generation {
                debug!("Stale inactivity timer for session {} ignored", session_id);
                return;
            }
            counter!("autodriver_sessions_expired_total").increment(1);
            warn!(
                "Session {} expired after {:?} without a command",
                session_id, timeout
            );
            state.delete();
        }));
    }

    /// Derived inactivity timeout of the active session, if any.
    pub async fn new_command_timeout(&self) -> Option<Duration> {
        let state = self.state.lock().await;
        state.session.as_ref().and_then(|s| s.new_command_timeout)
    }

    /// Whether a session is currently active.
    pub async fn has_active_session(&self) -> bool {
        let state = self.state.lock().await;
        state.session.is_some()
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}
