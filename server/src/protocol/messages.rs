use crate::capabilities::Capabilities;
use serde::{Deserialize, Serialize};

/// Body of `POST /session`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub capabilities: Capabilities,
}

/// Response to a successful `POST /session`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub capabilities: Capabilities,
}
