/// Display hints for a generated signature.
///
/// The signature wall renders each result as a pulsing dot; its colour,
/// position and size are derived from the quantum number and the Bell
/// distribution so that two results rarely look alike.
use serde::{Deserialize, Serialize};

use super::devices::QuantumDevice;

/// Golden angle in degrees, spreads consecutive numbers around the hue wheel.
const GOLDEN_ANGLE: f64 = 137.5;

/// Hue offset per device vendor, matched as a substring of the device id.
const VENDOR_HUE_SHIFTS: &[(&str, f64)] = &[
    ("ionq", 60.0),
    ("iqm", 120.0),
    ("quera", 180.0),
    ("rigetti", 240.0),
    ("aws", 300.0),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualProperties {
    /// CSS `hsl(...)` colour.
    pub color: String,
    #[serde(alias = "position_x")]
    pub position_x: f64,
    #[serde(alias = "position_y")]
    pub position_y: f64,
    #[serde(alias = "pulse_speed")]
    pub pulse_speed: u32,
    #[serde(alias = "size_factor")]
    pub size_factor: f64,
    /// Device type, or `unknown` when the device is not in the catalog.
    #[serde(alias = "device_indicator")]
    pub device_indicator: String,
}

impl VisualProperties {
    pub fn derive(
        quantum_number: u64,
        entanglement: &[f64],
        device_id: &str,
        device: Option<&QuantumDevice>,
    ) -> Self {
        let n = quantum_number as f64;
        let hue = vendor_shift((n * GOLDEN_ANGLE) % 360.0, device_id);

        let saturation = 70.0 + entanglement.iter().sum::<f64>() * 30.0;
        let lightness = 45.0 + entanglement.first().map_or(0.0, |p| p * 20.0);
        let size_factor = 0.8 + entanglement.get(3).map_or(0.2, |p| p * 0.4);

        Self {
            color: format!("hsl({hue:.1}, {saturation:.1}%, {lightness:.1}%)"),
            position_x: 10.0 + (n * GOLDEN_ANGLE) % 80.0,
            position_y: 10.0 + (n * 61.8) % 80.0,
            pulse_speed: 2 + (quantum_number % 3) as u32,
            size_factor,
            device_indicator: device.map_or("unknown", |d| d.kind.as_str()).to_string(),
        }
    }
}

fn vendor_shift(hue: f64, device_id: &str) -> f64 {
    VENDOR_HUE_SHIFTS
        .iter()
        .find(|(vendor, _)| device_id.contains(vendor))
        .map_or(hue, |(_, shift)| (hue + shift) % 360.0)
}
