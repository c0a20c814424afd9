/// Service configuration.
use std::time::Duration;

use crate::dispatch::DEFAULT_REMOTE_TIMEOUT;
use crate::error::{Result, SigwallError};

/// Connection settings for the remote quantum-hardware service.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Invocation endpoint (e.g., "https://xyz.lambda-url.us-east-1.on.aws/").
    pub endpoint_url: String,
    /// Optional bearer token sent with each invocation.
    pub api_key: Option<String>,
}

/// Top-level configuration for the API server and dispatcher.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Remote service; `None` means every request is computed locally.
    pub remote: Option<RemoteConfig>,
    /// Hard bound on one remote attempt.
    pub remote_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            remote: None,
            remote_timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }
}

impl ServiceConfig {
    /// Assemble and check configuration from raw settings.
    pub fn from_parts(
        bind_addr: String,
        remote_url: Option<String>,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self> {
        if timeout_secs == 0 {
            return Err(SigwallError::Config(
                "remote timeout must be at least one second".into(),
            ));
        }

        let remote = match remote_url.map(|u| u.trim().to_string()) {
            Some(url) if url.is_empty() => None,
            Some(url) => {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(SigwallError::Config(format!(
                        "remote URL must be http(s): {url}"
                    )));
                }
                Some(RemoteConfig {
                    endpoint_url: url,
                    api_key: api_key.filter(|k| !k.is_empty()),
                })
            }
            None => None,
        };

        Ok(Self {
            bind_addr,
            remote,
            remote_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
