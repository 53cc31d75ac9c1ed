//! Capability validation, performed once before a session is created.

use async_trait::async_trait;
use thiserror::Error;

use super::{Capabilities, NEW_COMMAND_TIMEOUT_CAP};

/// Upper bound on `newCommandTimeout`: one year, in seconds. Values above
/// this are client mistakes, and they must never reach the duration
/// conversion in the session layer.
pub const MAX_NEW_COMMAND_TIMEOUT_SECS: f64 = 60.0 * 60.0 * 24.0 * 365.0;

/// Validation failure, carrying a diagnostic naming the offending capability.
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("Invalid capabilities: {0}")]
    Invalid(String),
}

/// Vets raw client capabilities before session creation.
///
/// Implementations may amend the map (defaulting, normalization); the amended
/// copy is what the session stores and returns to the client. Must be
/// side-effect free: a rejected call leaves no trace anywhere.
#[async_trait]
pub trait CapabilityValidator: Send + Sync {
    async fn validate(&self, caps: Capabilities) -> Result<Capabilities, CapabilityError>;
}

/// Default validator: structural checks plus server-configured defaults.
///
/// Rejects null-valued capabilities and a non-numeric or negative
/// `newCommandTimeout`. Merges `defaults` for keys the client did not supply.
#[derive(Debug, Default)]
pub struct BasicValidator {
    defaults: Capabilities,
}

impl BasicValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: Capabilities) -> Self {
        Self { defaults }
    }
}

#[async_trait]
impl CapabilityValidator for BasicValidator {
    async fn validate(&self, mut caps: Capabilities) -> Result<Capabilities, CapabilityError> {
        for (key, value) in &caps.0 {
            if value.is_null() {
                return Err(CapabilityError::Invalid(format!(
                    "capability '{key}' must not be null"
                )));
            }
        }

        if let Some(value) = caps.get(NEW_COMMAND_TIMEOUT_CAP) {
            let secs = value.as_f64().ok_or_else(|| {
                CapabilityError::Invalid(format!(
                    "capability '{NEW_COMMAND_TIMEOUT_CAP}' must be a number, got {value}"
                ))
            })?;
            if !secs.is_finite() || secs < 0.0 {
                return Err(CapabilityError::Invalid(format!(
                    "capability '{NEW_COMMAND_TIMEOUT_CAP}' must be a non-negative number, got {secs}"
                )));
            }
            if secs > MAX_NEW_COMMAND_TIMEOUT_SECS {
                return Err(CapabilityError::Invalid(format!(
                    "capability '{NEW_COMMAND_TIMEOUT_CAP}' must not exceed \
                     {MAX_NEW_COMMAND_TIMEOUT_SECS} seconds, got {secs}"
                )));
            }
        }

        for (key, value) in &self.defaults.0 {
            if !caps.contains_key(key) {
                caps.insert(key.clone(), value.clone());
            }
        }

        Ok(caps)
    }
}

/// Validator that accepts everything unchanged. Useful in tests and for
/// deployments that delegate vetting to an upstream gateway.
#[derive(Debug, Default)]
pub struct AcceptAllValidator;

#[async_trait]
impl CapabilityValidator for AcceptAllValidator {
    async fn validate(&self, caps: Capabilities) -> Result<Capabilities, CapabilityError> {
        Ok(caps)
    }
}

#[cfg(test)]
fn caps_from_json(value: serde_json::Value) -> Capabilities {
    serde_json::from_value(value).unwrap()
}
