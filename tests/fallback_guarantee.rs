//! End-to-end checks of the dispatcher's fallback guarantee through the
//! public API.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use sigwall::crypto::keys::PublicKey;
use sigwall::crypto::lwe::{M, N, Q};
use sigwall::crypto::sampler::SecureRng;
use sigwall::crypto::sign::signature_is_well_formed;
use sigwall::dispatch::{DispatchOutcome, Dispatcher, FallbackReason, InvocationPayload, QuantumInvoker};
use sigwall::engine::LocalEngine;
use sigwall::error::{Result, SigwallError};
use sigwall::model::{KeyGenerationRequest, KeyGenerationResult, LOCAL_SIMULATION};

enum Remote {
    Hang,
    TransportError,
    Envelope(serde_json::Value),
    Raw(&'static [u8]),
}

#[async_trait]
impl QuantumInvoker for Remote {
    fn name(&self) -> &str {
        "test-remote"
    }

    async fn invoke(&self, _payload: &InvocationPayload) -> Result<Vec<u8>> {
        match self {
            Remote::Hang => std::future::pending().await,
            Remote::TransportError => Err(SigwallError::Transport("reset by peer".into())),
            Remote::Envelope(v) => Ok(serde_json::to_vec(v).unwrap()),
            Remote::Raw(bytes) => Ok(bytes.to_vec()),
        }
    }
}

fn dispatcher(remote: Remote) -> Dispatcher {
    Dispatcher::new(
        LocalEngine::default(),
        Some(Arc::new(remote)),
        Duration::from_secs(60),
    )
}

fn scenario_request() -> KeyGenerationRequest {
    KeyGenerationRequest::new("aws_sv1", "hope", "s1")
}

fn assert_valid_local(result: &KeyGenerationResult) {
    assert!(result.success);
    assert_eq!(result.processing_method, LOCAL_SIMULATION);
    let pk = PublicKey::decode(&result.public_key).unwrap();
    assert_eq!((pk.q, pk.n, pk.m), (Q, N, M));
    assert_eq!(pk.b.len(), M);
    assert!(pk.b.iter().all(|&v| v < Q));
    assert!(signature_is_well_formed(&result.signature));
}

#[tokio::test(start_paused = true)]
async fn timeout_scenario_returns_local_result() {
    let result = dispatcher(Remote::Hang)
        .generate(&scenario_request())
        .await
        .unwrap();
    assert_eq!(result.device, "aws_sv1");
    assert_valid_local(&result);
}

#[tokio::test]
async fn every_failure_mode_falls_back() {
    let failures = vec![
        Remote::TransportError,
        Remote::Envelope(json!({
            "statusCode": 200,
            "body": json!({"success": false, "error": "device offline"}).to_string()
        })),
        Remote::Envelope(json!({
            "statusCode": 500,
            "body": json!({"success": true, "public_key": "x", "signature": "y"}).to_string()
        })),
        Remote::Envelope(json!({"statusCode": 200, "body": "{truncated"})),
        Remote::Raw(b"\x00\x01 not json"),
    ];

    for remote in failures {
        let outcome = dispatcher(remote).dispatch(&scenario_request()).await.unwrap();
        assert!(outcome.is_fallback());
        assert_valid_local(outcome.result());
    }
}

#[tokio::test]
async fn remote_success_is_returned_as_is() {
    let remote = Remote::Envelope(json!({
        "statusCode": 200,
        "body": json!({
            "success": true,
            "quantum_id": "0.1250",
            "public_key": "cmVtb3RlLXBr",
            "signature": "cmVtb3RlLXNpZw==",
            "device_id": "aws_sv1",
            "device_name": "AWS SV1 Simulator",
            "processing_method": "AWS Braket",
            "job_id": "QJ-2026-0100"
        }).to_string()
    }));

    match dispatcher(remote).dispatch(&scenario_request()).await.unwrap() {
        DispatchOutcome::Remote(result) => {
            assert_eq!(result.public_key, "cmVtb3RlLXBr");
            assert_eq!(result.quantum_id, "0.1250");
            assert!(result.fallback_reason.is_none());
        }
        DispatchOutcome::LocalFallback { reason, .. } => panic!("unexpected fallback: {reason}"),
    }
}

#[tokio::test]
async fn repeated_requests_are_independent() {
    let dispatcher = Dispatcher::local_only();
    let request = scenario_request();
    let a = dispatcher.generate(&request).await.unwrap();
    let b = dispatcher.generate(&request).await.unwrap();
    assert_ne!(a.quantum_id, b.quantum_id);
    assert_ne!(a.public_key, b.public_key);
}

#[tokio::test]
async fn concurrent_requests_do_not_interfere() {
    let dispatcher = Arc::new(Dispatcher::local_only());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move {
                let req = KeyGenerationRequest::new("local_simulator", "calm", format!("s{i}"));
                dispatcher.generate(&req).await
            })
        })
        .collect();

    for handle in handles {
        let result = handle.await.unwrap().unwrap();
        assert_valid_local(&result);
    }
}

#[tokio::test]
async fn not_configured_reason_is_reported() {
    let outcome = Dispatcher::local_only()
        .dispatch(&scenario_request())
        .await
        .unwrap();
    match outcome {
        DispatchOutcome::LocalFallback { result, reason } => {
            assert_eq!(reason, FallbackReason::NotConfigured);
            assert_eq!(result.fallback_reason.as_deref(), Some("remote not configured"));
        }
        DispatchOutcome::Remote(_) => panic!("no remote was configured"),
    }
}

struct ExhaustedRng;

impl rand::RngCore for ExhaustedRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0);
    }

    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        Err(rand::Error::new("device entropy exhausted"))
    }
}

impl rand::CryptoRng for ExhaustedRng {}

#[tokio::test]
async fn entropy_failure_is_explicit_after_remote_failure() {
    let engine = LocalEngine::default()
        .with_entropy(|| -> Box<dyn SecureRng> { Box::new(ExhaustedRng) });
    let dispatcher = Dispatcher::new(
        engine,
        Some(Arc::new(Remote::TransportError)),
        Duration::from_secs(60),
    );

    let err = dispatcher.generate(&scenario_request()).await.unwrap_err();
    assert!(matches!(err, SigwallError::Entropy(_)));
    assert!(err.to_string().contains("device entropy exhausted"));
}
