/// Local key-generation engine.
///
/// Runs the full pipeline with no I/O beyond the entropy source:
/// 1. Simulate the quantum task (quantum number + Bell distribution)
/// 2. Build seed material from the quantum number, request context and
///    fresh randomness
/// 3. Generate the toy LWE key pair
/// 4. Derive the hash-chain signature
/// 5. Attach bookkeeping identifiers and display hints
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use tracing::{debug, info};

use crate::crypto::hash::{sha256, sha256_hex};
use crate::crypto::lwe::{self, LweParams};
use crate::crypto::sampler::{try_fill, try_u32, SecureRng};
use crate::crypto::sign;
use crate::error::Result;
use crate::model::{KeyGenerationRequest, KeyGenerationResult, LOCAL_SIMULATION};
use crate::quantum::visual::VisualProperties;
use crate::quantum::{self, devices};

/// Opens the entropy source for one generation.
pub type EntropySource = Arc<dyn Fn() -> Box<dyn SecureRng> + Send + Sync>;

/// Local engine. Holds no mutable state; one instance serves any number of
/// concurrent requests.
#[derive(Clone)]
pub struct LocalEngine {
    params: LweParams,
    entropy: EntropySource,
}

impl Default for LocalEngine {
    fn default() -> Self {
        Self::new(LweParams::default())
    }
}

impl fmt::Debug for LocalEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalEngine")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl LocalEngine {
    /// Engine drawing from the operating-system entropy source.
    pub fn new(params: LweParams) -> Self {
        Self {
            params,
            entropy: Arc::new(|| Box::new(OsRng) as Box<dyn SecureRng>),
        }
    }

    /// Replace the entropy source consulted by [`LocalEngine::generate`].
    pub fn with_entropy<F>(mut self, source: F) -> Self
    where
        F: Fn() -> Box<dyn SecureRng> + Send + Sync + 'static,
    {
        self.entropy = Arc::new(source);
        self
    }

    /// Generate with the engine's entropy source.
    pub fn generate(&self, request: &KeyGenerationRequest) -> Result<KeyGenerationResult> {
        let mut rng = (self.entropy)();
        self.generate_with_rng(request, &mut *rng)
    }

    /// Generate with a caller-supplied entropy source.
    ///
    /// Fails only when `rng` cannot produce bytes.
    pub fn generate_with_rng<R: RngCore + CryptoRng + ?Sized>(
        &self,
        request: &KeyGenerationRequest,
        rng: &mut R,
    ) -> Result<KeyGenerationResult> {
        let device = devices::lookup(&request.device);
        let device_name = device.map_or(request.device.as_str(), |d| d.name);
        let now = Utc::now();
        let timestamp = now.to_rfc3339();
        let context = request.context();

        let sample = quantum::local_sample(device, rng)?;
        let quantum_number = sample.quantum_number;
        debug!(device = %request.device, quantum_number, "Local quantum sample drawn");

        let context_digest = sha256(
            format!(
                "{}|{}|{}|{}",
                request.session_id, context, request.device, timestamp
            )
            .as_bytes(),
        );
        let material = lwe::seed_material(u128::from(quantum_number), &context_digest, rng)?;
        let keypair = lwe::generate_keypair(self.params, &material, rng)?;
        let encoded = keypair.encode()?;

        let signature = sign::sign(
            &request.session_id,
            &context,
            u64::from(quantum_number),
            &request.device,
            &encoded.private_key,
        );

        let quantum_id = derive_quantum_id(quantum_number, &now, rng)?;
        let job_id = format!("QJ-{}-{:04}", now.year(), try_u32(rng)? % 9999);
        let transaction_id =
            sha256_hex(format!("{}{}{}", request.session_id, context, timestamp).as_bytes())[..16]
                .to_string();
        let block_hash = sha256_hex(format!("{transaction_id}{signature}").as_bytes());
        let visual = VisualProperties::derive(
            u64::from(quantum_number),
            &sample.entanglement_data,
            &request.device,
            device,
        );

        info!(
            device = %request.device,
            job_id = %job_id,
            quantum_id = %quantum_id,
            "Generated key pair locally"
        );

        Ok(KeyGenerationResult {
            success: true,
            is_async: false,
            quantum_id,
            public_key: encoded.public_key,
            signature,
            job_id,
            device: request.device.clone(),
            device_name: device_name.to_string(),
            device_type: device.map(|d| d.kind.as_str().to_string()),
            register_qubits: Some(devices::register_width(device)),
            processing_method: LOCAL_SIMULATION.to_string(),
            algorithm: encoded.algorithm.to_string(),
            quantum_number: Some(u64::from(quantum_number)),
            entanglement_data: sample.entanglement_data.to_vec(),
            timestamp,
            visual_properties: Some(visual),
            transaction_id: Some(transaction_id),
            block_hash: Some(block_hash),
            job_status: None,
            fallback_reason: None,
        })
    }
}

/// Mix the quantum number with the clock and fresh bytes into a decimal
/// identifier in `[0, 1)`.
fn derive_quantum_id<R: RngCore + ?Sized>(
    quantum_number: u32,
    now: &DateTime<Utc>,
    rng: &mut R,
) -> Result<String> {
    let mut fresh = [0u8; 16];
    try_fill(rng, &mut fresh)?;

    let mut input = Vec::with_capacity(4 + 8 + fresh.len());
    input.extend_from_slice(&quantum_number.to_be_bytes());
    input.extend_from_slice(&now.timestamp_nanos_opt().unwrap_or_default().to_be_bytes());
    input.extend_from_slice(&fresh);

    let digest = sha256(&input);
    let mut word = [0u8; 8];
    word.copy_from_slice(&digest[..8]);
    Ok(unit_decimal(u64::from_be_bytes(word) >> 11))
}

/// Ten decimals of `mantissa / 2^53`, truncated so the result stays below 1.
fn unit_decimal(mantissa: u64) -> String {
    let digits = (u128::from(mantissa) * 10_000_000_000) >> 53;
    format!("0.{digits:010}")
}
