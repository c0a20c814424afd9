/// Decoding of remote invocation responses.
///
/// The remote collaborator answers with an envelope:
///
/// ```text
/// {"statusCode": 200, "body": "{\"success\": true, ...}"}
/// ```
///
/// `body` may be a JSON string or an inline object. A response without
/// `statusCode` is taken as the body itself (direct invocation).
use serde::Deserialize;
use serde_json::Value;

use crate::crypto::lwe::ALGORITHM;
use crate::error::{Result, SigwallError};
use crate::model::{KeyGenerationRequest, KeyGenerationResult, REMOTE_HARDWARE};
use crate::quantum::devices;
use crate::quantum::visual::VisualProperties;

/// Generation body reported by the remote side.
///
/// Accepts both snake_case and camelCase field names.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RemoteBody {
    success: bool,
    error: Option<String>,
    #[serde(rename = "async")]
    is_async: bool,
    #[serde(alias = "quantumId")]
    quantum_id: Option<Value>,
    #[serde(alias = "quantumNumber")]
    quantum_number: Option<u64>,
    #[serde(alias = "entanglementData")]
    entanglement_data: Option<Vec<f64>>,
    #[serde(alias = "publicKey")]
    public_key: Option<String>,
    signature: Option<String>,
    algorithm: Option<String>,
    #[serde(alias = "deviceId")]
    device_id: Option<String>,
    device: Option<String>,
    #[serde(alias = "deviceName")]
    device_name: Option<String>,
    #[serde(alias = "deviceType")]
    device_type: Option<String>,
    #[serde(alias = "visualProperties")]
    visual_properties: Option<VisualProperties>,
    #[serde(alias = "processingMethod")]
    processing_method: Option<String>,
    #[serde(alias = "jobId")]
    job_id: Option<String>,
    timestamp: Option<String>,
    #[serde(alias = "transactionId")]
    transaction_id: Option<String>,
    #[serde(alias = "blockHash")]
    block_hash: Option<String>,
    status: Option<String>,
}

/// Unwrap the envelope and map a successful body onto a result.
///
/// Errors are `RemoteFailure` for status ≥ 400 or `success: false`, and
/// `MalformedPayload` for anything that cannot be read as a usable body.
pub fn decode(raw: &[u8], request: &KeyGenerationRequest) -> Result<KeyGenerationResult> {
    let outer: Value = serde_json::from_slice(raw)
        .map_err(|e| SigwallError::MalformedPayload(format!("envelope is not JSON: {e}")))?;

    let body = unwrap_envelope(outer)?;
    let body: RemoteBody = serde_json::from_value(body)
        .map_err(|e| SigwallError::MalformedPayload(format!("unreadable body: {e}")))?;

    if !body.success {
        return Err(SigwallError::RemoteFailure(
            body.error
                .unwrap_or_else(|| "remote reported an unsuccessful generation".into()),
        ));
    }

    into_result(body, request)
}

fn unwrap_envelope(outer: Value) -> Result<Value> {
    let Value::Object(mut map) = outer else {
        return Err(SigwallError::MalformedPayload(
            "envelope is not an object".into(),
        ));
    };

    // Function errors come back without a status code.
    if let Some(message) = map.get("errorMessage").and_then(Value::as_str) {
        return Err(SigwallError::RemoteFailure(message.to_string()));
    }

    let Some(status) = map.get("statusCode") else {
        return Ok(Value::Object(map));
    };
    let status = status.as_u64().ok_or_else(|| {
        SigwallError::MalformedPayload("statusCode is not an integer".into())
    })?;

    let body = match map.remove("body") {
        Some(Value::String(text)) => serde_json::from_str(&text).map_err(|e| {
            SigwallError::MalformedPayload(format!("body is not JSON: {e}"))
        })?,
        Some(inline @ Value::Object(_)) => inline,
        Some(_) | None if status >= 400 => Value::Null,
        Some(_) => {
            return Err(SigwallError::MalformedPayload(
                "body is neither a string nor an object".into(),
            ))
        }
        None => return Err(SigwallError::MalformedPayload("envelope has no body".into())),
    };

    if status >= 400 {
        let detail = body
            .get("error")
            .and_then(Value::as_str)
            .map(|e| format!(": {e}"))
            .unwrap_or_default();
        return Err(SigwallError::RemoteFailure(format!(
            "remote job submission returned status {status}{detail}"
        )));
    }

    Ok(body)
}

fn into_result(body: RemoteBody, request: &KeyGenerationRequest) -> Result<KeyGenerationResult> {
    let public_key = non_empty(body.public_key).ok_or_else(|| {
        SigwallError::MalformedPayload("successful body has no public key".into())
    })?;
    let signature = non_empty(body.signature).ok_or_else(|| {
        SigwallError::MalformedPayload("successful body has no signature".into())
    })?;

    let device = body
        .device_id
        .or(body.device)
        .unwrap_or_else(|| request.device.clone());
    let catalog = devices::lookup(&device);
    let device_name = body
        .device_name
        .unwrap_or_else(|| catalog.map_or_else(|| device.clone(), |d| d.name.to_string()));
    let device_type = body
        .device_type
        .or_else(|| catalog.map(|d| d.kind.as_str().to_string()));
    let quantum_id = match body.quantum_id {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };

    Ok(KeyGenerationResult {
        success: true,
        is_async: body.is_async,
        quantum_id,
        public_key,
        signature,
        job_id: body.job_id.unwrap_or_default(),
        device,
        device_name,
        device_type,
        register_qubits: Some(devices::register_width(catalog)),
        processing_method: body
            .processing_method
            .unwrap_or_else(|| REMOTE_HARDWARE.to_string()),
        algorithm: body.algorithm.unwrap_or_else(|| ALGORITHM.to_string()),
        quantum_number: body.quantum_number,
        entanglement_data: body.entanglement_data.unwrap_or_default(),
        timestamp: body
            .timestamp
            .unwrap_or_else(|| chrono::Utc::now().to_rfc3339()),
        visual_properties: body.visual_properties,
        transaction_id: body.transaction_id,
        block_hash: body.block_hash,
        job_status: body.status,
        fallback_reason: None,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
