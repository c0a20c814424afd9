/// Local stand-ins for quantum measurements.
///
/// When no quantum hardware answers, the service still needs a quantum
/// number to seed key generation and a Bell-state distribution to report.
/// Both are drawn here from the entropy source the engine supplies.
pub mod devices;
pub mod visual;

use rand::RngCore;
use serde::Serialize;

use crate::crypto::sampler::try_u32;
use crate::error::Result;

use devices::QuantumDevice;

/// Quantum numbers are drawn from `[0, QUANTUM_NUMBER_RANGE)`.
pub const QUANTUM_NUMBER_RANGE: u32 = 1000;

/// Ideal |Φ+⟩ distribution `[P(00), P(01), P(10), P(11)]`.
pub const IDEAL_BELL: [f64; 4] = [0.5, 0.0, 0.0, 0.5];

const BELL_NOISE_MIN: f64 = 0.02;
const BELL_NOISE_SPAN: f64 = 0.06;

/// Output of one (real or simulated) quantum task.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantumSample {
    pub quantum_number: u32,
    pub entanglement_data: [f64; 4],
}

/// Simulate the combined random-number and Bell-state task locally.
///
/// Devices without Bell-state support report the ideal distribution.
pub fn local_sample<R: RngCore + ?Sized>(
    device: Option<&QuantumDevice>,
    rng: &mut R,
) -> Result<QuantumSample> {
    let quantum_number = try_u32(rng)? % QUANTUM_NUMBER_RANGE;

    let supports_bell = device.map_or(true, |d| d.supports_bell_states);
    let entanglement_data = if supports_bell {
        let unit = f64::from(try_u32(rng)?) / (f64::from(u32::MAX) + 1.0);
        noisy_bell(BELL_NOISE_MIN + unit * BELL_NOISE_SPAN)
    } else {
        IDEAL_BELL
    };

    Ok(QuantumSample {
        quantum_number,
        entanglement_data,
    })
}

/// Bell distribution with `noise` moved from the correlated outcomes into
/// the anti-correlated ones.
pub fn noisy_bell(noise: f64) -> [f64; 4] {
    [0.5 - noise / 2.0, noise / 4.0, noise / 4.0, 0.5 - noise / 2.0]
}
