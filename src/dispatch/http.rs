/// Remote invoker over HTTP.
///
/// Posts the invocation payload as JSON to a function endpoint and returns
/// the raw envelope. Uses a shared `reqwest::Client`; the dispatcher's
/// timeout cancels a request by dropping its future.
use async_trait::async_trait;
use reqwest::Client;

use super::{InvocationPayload, QuantumInvoker};
use crate::config::RemoteConfig;
use crate::error::{Result, SigwallError};

pub struct HttpInvoker {
    client: Client,
    config: RemoteConfig,
}

impl HttpInvoker {
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl QuantumInvoker for HttpInvoker {
    fn name(&self) -> &str {
        "HTTP"
    }

    async fn invoke(&self, payload: &InvocationPayload) -> Result<Vec<u8>> {
        let mut request = self.client.post(&self.config.endpoint_url).json(payload);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| SigwallError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SigwallError::Transport(format!(
                "remote endpoint returned {status}: {body}"
            )));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| SigwallError::Transport(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}
