pub mod controller;
pub mod state;

pub use controller::{SessionController, SessionError};
pub use state::{ActiveSession, SessionEntry, SessionId, generate_session_id};
