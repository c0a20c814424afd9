/// Request and result shapes for key generation.
use serde::{Deserialize, Serialize};

use crate::quantum::devices::DEFAULT_DEVICE;
use crate::quantum::visual::VisualProperties;

/// Processing method reported by the local engine.
pub const LOCAL_SIMULATION: &str = "Local Simulation";
/// Processing method assumed for remote results that do not name one.
pub const REMOTE_HARDWARE: &str = "AWS Braket";

/// Inbound key-generation request. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyGenerationRequest {
    pub device: String,
    #[serde(alias = "message")]
    pub sentiment: String,
    pub timeframe: String,
    #[serde(alias = "session_id", alias = "name")]
    pub session_id: String,
    pub use_real_device: bool,
}

impl Default for KeyGenerationRequest {
    fn default() -> Self {
        Self {
            device: DEFAULT_DEVICE.to_string(),
            sentiment: String::new(),
            timeframe: String::new(),
            session_id: "anonymous".to_string(),
            use_real_device: false,
        }
    }
}

impl KeyGenerationRequest {
    pub fn new(device: impl Into<String>, sentiment: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            sentiment: sentiment.into(),
            session_id: session_id.into(),
            ..Self::default()
        }
    }

    /// Context string bound into the signature: the sentiment, suffixed with
    /// `:timeframe` when a timeframe is present.
    pub fn context(&self) -> String {
        if self.timeframe.is_empty() {
            self.sentiment.clone()
        } else {
            format!("{}:{}", self.sentiment, self.timeframe)
        }
    }
}

/// Outcome of a key generation, local or remote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyGenerationResult {
    pub success: bool,
    #[serde(rename = "async")]
    pub is_async: bool,
    pub quantum_id: String,
    pub public_key: String,
    pub signature: String,
    pub job_id: String,
    pub device: String,
    pub device_name: String,
    /// Catalog device type; absent for devices outside the catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    /// Qubits in the quantum number register.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub register_qubits: Option<u32>,
    pub processing_method: String,
    pub algorithm: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantum_number: Option<u64>,
    #[serde(default)]
    pub entanglement_data: Vec<f64>,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual_properties: Option<VisualProperties>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<String>,
    /// Remote job state for asynchronous submissions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_status: Option<String>,
    /// Why the remote path was abandoned, when it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}
