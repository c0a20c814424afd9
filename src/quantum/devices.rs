/// Catalog of quantum devices the service can target.
///
/// Managed simulators answer in seconds and may run remotely; QPUs queue for
/// minutes to hours, so a synchronous request only ever simulates them.
use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Device family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Simulator,
    ManagedSimulator,
    Qpu,
}

impl DeviceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simulator => "simulator",
            Self::ManagedSimulator => "managed_simulator",
            Self::Qpu => "qpu",
        }
    }
}

impl FromStr for DeviceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simulator" => Ok(Self::Simulator),
            "managed_simulator" => Ok(Self::ManagedSimulator),
            "qpu" => Ok(Self::Qpu),
            other => Err(format!(
                "unknown device type '{other}' (expected simulator, managed_simulator or qpu)"
            )),
        }
    }
}

/// Static description of one device.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantumDevice {
    pub id: &'static str,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: DeviceKind,
    pub arn: &'static str,
    pub region: &'static str,
    pub max_qubits: u32,
    pub supports_bell_states: bool,
    pub async_required: bool,
    pub cost_per_task: f64,
    pub cost_per_shot: f64,
    pub typical_runtime: &'static str,
}

impl QuantumDevice {
    /// Local devices are reachable from every region.
    pub fn is_local(&self) -> bool {
        self.region == "local"
    }

    pub fn serves_region(&self, region: &str) -> bool {
        self.region == region || self.is_local()
    }

    /// Qubits used for the quantum number register.
    pub fn register_qubits(&self) -> u32 {
        self.max_qubits.min(REGISTER_QUBITS)
    }
}

/// Device id used when a request names none.
pub const DEFAULT_DEVICE: &str = "local_simulator";

/// Register width for the quantum number; also assumed for unknown devices.
pub const REGISTER_QUBITS: u32 = 8;

/// Register width for an optional catalog entry.
pub fn register_width(device: Option<&QuantumDevice>) -> u32 {
    device.map_or(REGISTER_QUBITS, QuantumDevice::register_qubits)
}

static DEVICES: &[QuantumDevice] = &[
    QuantumDevice {
        id: "local_simulator",
        name: "Local Simulator",
        kind: DeviceKind::Simulator,
        arn: "local://simulator",
        region: "local",
        max_qubits: 34,
        supports_bell_states: true,
        async_required: false,
        cost_per_task: 0.0,
        cost_per_shot: 0.0,
        typical_runtime: "< 1 second",
    },
    QuantumDevice {
        id: "aws_sv1",
        name: "AWS SV1 Simulator",
        kind: DeviceKind::ManagedSimulator,
        arn: "arn:aws:braket:::device/quantum-simulator/amazon/sv1",
        region: "us-east-1",
        max_qubits: 34,
        supports_bell_states: true,
        async_required: true,
        cost_per_task: 0.0,
        cost_per_shot: 0.0,
        typical_runtime: "1-5 seconds",
    },
    QuantumDevice {
        id: "aws_dm1",
        name: "AWS DM1 Simulator",
        kind: DeviceKind::ManagedSimulator,
        arn: "arn:aws:braket:::device/quantum-simulator/amazon/dm1",
        region: "us-east-1",
        max_qubits: 17,
        supports_bell_states: true,
        async_required: true,
        cost_per_task: 0.0,
        cost_per_shot: 0.0,
        typical_runtime: "1-5 seconds",
    },
    QuantumDevice {
        id: "aws_tn1",
        name: "AWS TN1 Simulator",
        kind: DeviceKind::ManagedSimulator,
        arn: "arn:aws:braket:::device/quantum-simulator/amazon/tn1",
        region: "us-east-1",
        max_qubits: 50,
        supports_bell_states: true,
        async_required: true,
        cost_per_task: 0.0,
        cost_per_shot: 0.0,
        typical_runtime: "1-10 seconds",
    },
    QuantumDevice {
        id: "ionq_aria",
        name: "IonQ Aria",
        kind: DeviceKind::Qpu,
        arn: "arn:aws:braket:us-east-1::device/qpu/ionq/Aria-1",
        region: "us-east-1",
        max_qubits: 25,
        supports_bell_states: true,
        async_required: true,
        cost_per_task: 0.3,
        cost_per_shot: 0.01,
        typical_runtime: "5-30 minutes",
    },
    QuantumDevice {
        id: "ionq_forte",
        name: "IonQ Forte Enterprise",
        kind: DeviceKind::Qpu,
        arn: "arn:aws:braket:us-east-1::device/qpu/ionq/Forte-Enterprise-1",
        region: "us-east-1",
        max_qubits: 32,
        supports_bell_states: true,
        async_required: true,
        cost_per_task: 0.3,
        cost_per_shot: 0.01,
        typical_runtime: "5-30 minutes",
    },
    QuantumDevice {
        id: "iqm_garnet",
        name: "IQM Garnet",
        kind: DeviceKind::Qpu,
        arn: "arn:aws:braket:eu-north-1::device/qpu/iqm/Garnet",
        region: "eu-north-1",
        max_qubits: 20,
        supports_bell_states: true,
        async_required: true,
        cost_per_task: 0.3,
        cost_per_shot: 0.00145,
        typical_runtime: "10-45 minutes",
    },
    QuantumDevice {
        id: "aqt_ibex_q1",
        name: "AQT IBEX Q1",
        kind: DeviceKind::Qpu,
        arn: "arn:aws:braket:eu-central-1::device/qpu/aqt/IBEX-Q1",
        region: "eu-central-1",
        max_qubits: 12,
        supports_bell_states: true,
        async_required: true,
        cost_per_task: 0.3,
        cost_per_shot: 0.01,
        typical_runtime: "5-30 minutes",
    },
    QuantumDevice {
        id: "iqm_emerald",
        name: "IQM Emerald",
        kind: DeviceKind::Qpu,
        arn: "arn:aws:braket:eu-north-1::device/qpu/iqm/Emerald",
        region: "eu-north-1",
        max_qubits: 54,
        supports_bell_states: true,
        async_required: true,
        cost_per_task: 0.3,
        cost_per_shot: 0.00145,
        typical_runtime: "10-45 minutes",
    },
    QuantumDevice {
        id: "quera_aquila",
        name: "QuEra Aquila",
        kind: DeviceKind::Qpu,
        arn: "arn:aws:braket:us-east-1::device/qpu/quera/Aquila",
        region: "us-east-1",
        max_qubits: 256,
        supports_bell_states: false,
        async_required: true,
        cost_per_task: 0.3,
        cost_per_shot: 0.01,
        typical_runtime: "15-60 minutes",
    },
    QuantumDevice {
        id: "rigetti_ankaa3",
        name: "Rigetti Ankaa-3",
        kind: DeviceKind::Qpu,
        arn: "arn:aws:braket:us-west-1::device/qpu/rigetti/Ankaa-3",
        region: "us-west-1",
        max_qubits: 84,
        supports_bell_states: true,
        async_required: true,
        cost_per_task: 0.3,
        cost_per_shot: 0.00035,
        typical_runtime: "5-20 minutes",
    },
];

/// All devices in catalog order.
pub fn all() -> &'static [QuantumDevice] {
    DEVICES
}

pub fn lookup(id: &str) -> Option<&'static QuantumDevice> {
    DEVICES.iter().find(|d| d.id == id)
}

/// Catalog query. Unset criteria match every device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceFilter {
    #[serde(rename = "type")]
    pub kind: Option<DeviceKind>,
    /// Local devices match every region.
    pub region: Option<String>,
    /// Only devices that can prepare Bell states.
    pub bell_states: bool,
}

impl DeviceFilter {
    pub fn matches(&self, device: &QuantumDevice) -> bool {
        self.kind.map_or(true, |kind| device.kind == kind)
            && self
                .region
                .as_deref()
                .map_or(true, |region| device.serves_region(region))
            && (!self.bell_states || device.supports_bell_states)
    }
}

/// Devices matching `filter`, in catalog order.
pub fn filter(filter: &DeviceFilter) -> Vec<&'static QuantumDevice> {
    all().iter().filter(|d| filter.matches(d)).collect()
}

/// Cost breakdown for running `shots` on one device, in USD.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    pub device_id: &'static str,
    pub shots: u32,
    pub task_cost: f64,
    pub shot_cost: f64,
    pub total_cost: f64,
    pub currency: &'static str,
}

pub fn estimate_cost(id: &str, shots: u32) -> Option<CostEstimate> {
    let device = lookup(id)?;
    let shot_cost = device.cost_per_shot * f64::from(shots);
    Some(CostEstimate {
        device_id: device.id,
        shots,
        task_cost: device.cost_per_task,
        shot_cost,
        total_cost: device.cost_per_task + shot_cost,
        currency: "USD",
    })
}

/// Device ids grouped by kind and by region.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub total_devices: usize,
    pub by_type: BTreeMap<&'static str, Vec<&'static str>>,
    pub by_region: BTreeMap<&'static str, Vec<&'static str>>,
}

pub fn status_summary() -> StatusSummary {
    let mut by_type: BTreeMap<&'static str, Vec<&'static str>> = BTreeMap::new();
    let mut by_region: BTreeMap<&'static str, Vec<&'static str>> = BTreeMap::new();
    for device in DEVICES {
        by_type.entry(device.kind.as_str()).or_default().push(device.id);
        by_region.entry(device.region).or_default().push(device.id);
    }
    StatusSummary {
        total_devices: DEVICES.len(),
        by_type,
        by_region,
    }
}
