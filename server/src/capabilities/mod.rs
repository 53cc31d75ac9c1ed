//! Client capabilities: the opaque configuration map a client submits when
//! requesting a session, plus the validator that vets it.

pub mod validator;

pub use validator::{AcceptAllValidator, BasicValidator, CapabilityError, CapabilityValidator};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Capability key carrying the inactivity timeout, in seconds.
pub const NEW_COMMAND_TIMEOUT_CAP: &str = "newCommandTimeout";

/// An opaque key-value map describing the desired session environment.
///
/// The server does not interpret most keys; they pass through validation and
/// are stored verbatim on the active session. The one key the session layer
/// reads is `newCommandTimeout`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capabilities(pub Map<String, Value>);

impl Capabilities {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The `newCommandTimeout` capability as seconds, if present and numeric.
    ///
    /// Non-numeric values yield `None` here; the validator rejects them
    /// before a session is ever created, so by the time the session layer
    /// asks, present implies numeric.
    pub fn new_command_timeout_secs(&self) -> Option<f64> {
        self.0.get(NEW_COMMAND_TIMEOUT_CAP).and_then(Value::as_f64)
    }
}

impl From<Map<String, Value>> for Capabilities {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Capabilities {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
