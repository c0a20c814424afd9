/// Remote dispatch with guaranteed local fallback.
///
/// One request makes at most one remote attempt, bounded by a hard timeout.
/// Every way that attempt can go wrong ends in the local engine:
///
/// ```text
/// ATTEMPTING_REMOTE ──ok + well-formed──▶ Remote(result)
///        │
///        └─timeout / transport / reported / malformed──▶ LocalFallback { result, reason }
/// ```
///
/// Only a failing entropy source in the local engine reaches the caller.
pub mod envelope;
pub mod http;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::engine::LocalEngine;
use crate::error::{Result, SigwallError};
use crate::model::{KeyGenerationRequest, KeyGenerationResult};

/// Default bound on the remote attempt.
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(60);

/// Payload sent to the remote quantum-hardware collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationPayload {
    pub device: String,
    pub sentiment: String,
    pub timeframe: String,
    pub session_id: String,
    pub use_real_device: bool,
}

impl From<&KeyGenerationRequest> for InvocationPayload {
    fn from(req: &KeyGenerationRequest) -> Self {
        Self {
            device: req.device.clone(),
            sentiment: req.sentiment.clone(),
            timeframe: req.timeframe.clone(),
            session_id: req.session_id.clone(),
            use_real_device: req.use_real_device,
        }
    }
}

/// Remote quantum-hardware invocation.
///
/// Implementations return the raw response envelope; decoding and the
/// success decision belong to the dispatcher. Dropping the returned future
/// must abort the in-flight call.
#[async_trait]
pub trait QuantumInvoker: Send + Sync {
    /// Human-readable name of this invoker.
    fn name(&self) -> &str;

    /// Perform one invocation and return the raw response bytes.
    async fn invoke(&self, payload: &InvocationPayload) -> Result<Vec<u8>>;
}

/// Why the remote path was abandoned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// No remote invoker is configured.
    NotConfigured,
    /// The remote call did not finish within the timeout.
    Timeout(Duration),
    /// The call itself failed.
    Transport(String),
    /// The remote side reported an unsuccessful generation.
    RemoteReported(String),
    /// The response could not be read as a usable result.
    Malformed(String),
}

impl FallbackReason {
    fn from_error(err: SigwallError) -> Self {
        match err {
            SigwallError::RemoteFailure(msg) => Self::RemoteReported(msg),
            SigwallError::MalformedPayload(msg) => Self::Malformed(msg),
            other => Self::Transport(other.to_string()),
        }
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "remote not configured"),
            Self::Timeout(d) => write!(f, "remote timed out after {}s", d.as_secs()),
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
            Self::RemoteReported(msg) => write!(f, "remote failure: {msg}"),
            Self::Malformed(msg) => write!(f, "malformed payload: {msg}"),
        }
    }
}

/// Terminal state of one dispatch.
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    Remote(KeyGenerationResult),
    LocalFallback {
        result: KeyGenerationResult,
        reason: FallbackReason,
    },
}

impl DispatchOutcome {
    pub fn result(&self) -> &KeyGenerationResult {
        match self {
            Self::Remote(result) | Self::LocalFallback { result, .. } => result,
        }
    }

    pub fn into_result(self) -> KeyGenerationResult {
        match self {
            Self::Remote(result) | Self::LocalFallback { result, .. } => result,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::LocalFallback { .. })
    }
}

/// Dispatch and fallback controller.
#[derive(Clone)]
pub struct Dispatcher {
    engine: LocalEngine,
    invoker: Option<Arc<dyn QuantumInvoker>>,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(engine: LocalEngine, invoker: Option<Arc<dyn QuantumInvoker>>, timeout: Duration) -> Self {
        Self {
            engine,
            invoker,
            timeout,
        }
    }

    /// Dispatcher that always computes locally.
    pub fn local_only() -> Self {
        Self::new(LocalEngine::default(), None, DEFAULT_REMOTE_TIMEOUT)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Name of the configured remote invoker, if any.
    pub fn remote_name(&self) -> Option<&str> {
        self.invoker.as_deref().map(|invoker| invoker.name())
    }

    /// Run one request to a terminal state.
    pub async fn dispatch(&self, request: &KeyGenerationRequest) -> Result<DispatchOutcome> {
        let reason = match self.attempt_remote(request).await {
            Ok(result) => {
                info!(device = %request.device, job_id = %result.job_id, "Remote generation succeeded");
                return Ok(DispatchOutcome::Remote(result));
            }
            Err(reason) => reason,
        };

        warn!(device = %request.device, reason = %reason, "Falling back to local engine");
        let engine = self.engine.clone();
        let owned = request.clone();
        // Matrix expansion is CPU-bound; keep it off the async workers.
        let mut result = tokio::task::spawn_blocking(move || engine.generate(&owned))
            .await
            .map_err(|e| SigwallError::Task(e.to_string()))??;
        result.fallback_reason = Some(reason.to_string());
        Ok(DispatchOutcome::LocalFallback { result, reason })
    }

    /// Run one request and return only its result.
    pub async fn generate(&self, request: &KeyGenerationRequest) -> Result<KeyGenerationResult> {
        Ok(self.dispatch(request).await?.into_result())
    }

    async fn attempt_remote(
        &self,
        request: &KeyGenerationRequest,
    ) -> std::result::Result<KeyGenerationResult, FallbackReason> {
        let Some(invoker) = self.invoker.as_ref() else {
            return Err(FallbackReason::NotConfigured);
        };

        let payload = InvocationPayload::from(request);
        info!(invoker = %invoker.name(), device = %payload.device, "Invoking remote quantum service");

        // Dropping the timed-out future cancels the in-flight call.
        let raw = match tokio::time::timeout(self.timeout, invoker.invoke(&payload)).await {
            Err(_) => return Err(FallbackReason::Timeout(self.timeout)),
            Ok(Err(e)) => return Err(FallbackReason::from_error(e)),
            Ok(Ok(raw)) => raw,
        };

        envelope::decode(&raw, request).map_err(FallbackReason::from_error)
    }
}
