//! Core types for WIRE metrics.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Index of a node in a [`Network`](super::Network) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One of the four W.I.R.E. quantities tracked per node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Power in watts
    Watts,
    /// Current in amperes
    Current,
    /// Resistance in ohms
    Resistance,
    /// EMF (voltage drop) in volts
    Voltage,
}

impl Metric {
    /// All metrics in W, I, R, E order.
    pub const ALL: [Metric; 4] = [
        Metric::Watts,
        Metric::Current,
        Metric::Resistance,
        Metric::Voltage,
    ];

    /// Unit symbol used in reports.
    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Watts => "W",
            Metric::Current => "A",
            Metric::Resistance => "Ω",
            Metric::Voltage => "V",
        }
    }

    /// Single-letter WIRE column heading.
    pub fn letter(&self) -> char {
        match self {
            Metric::Watts => 'W',
            Metric::Current => 'I',
            Metric::Resistance => 'R',
            Metric::Voltage => 'E',
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::Watts => "watts",
            Metric::Current => "current",
            Metric::Resistance => "resistance",
            Metric::Voltage => "voltage",
        };
        f.write_str(name)
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "w" | "watts" | "power" | "p" => Ok(Metric::Watts),
            "i" | "current" | "amps" => Ok(Metric::Current),
            "r" | "resistance" | "ohms" => Ok(Metric::Resistance),
            "e" | "v" | "voltage" | "emf" | "volts" => Ok(Metric::Voltage),
            _ => Err(format!("unknown metric '{}'", s)),
        }
    }
}

/// A partial set of W.I.R.E. values. `None` means "not known yet".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watts: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resistance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voltage: Option<f64>,
}

impl WireMetrics {
    /// Create an empty metrics record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a resistance.
    pub fn with_resistance(mut self, ohms: f64) -> Self {
        self.resistance = Some(ohms);
        self
    }

    /// Set a voltage.
    pub fn with_voltage(mut self, volts: f64) -> Self {
        self.voltage = Some(volts);
        self
    }

    /// Set a current.
    pub fn with_current(mut self, amps: f64) -> Self {
        self.current = Some(amps);
        self
    }

    /// Set a power.
    pub fn with_watts(mut self, watts: f64) -> Self {
        self.watts = Some(watts);
        self
    }

    /// Get a single field.
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Watts => self.watts,
            Metric::Current => self.current,
            Metric::Resistance => self.resistance,
            Metric::Voltage => self.voltage,
        }
    }

    /// Mutable access to a single field.
    pub fn slot_mut(&mut self, metric: Metric) -> &mut Option<f64> {
        match metric {
            Metric::Watts => &mut self.watts,
            Metric::Current => &mut self.current,
            Metric::Resistance => &mut self.resistance,
            Metric::Voltage => &mut self.voltage,
        }
    }

    /// Check whether a field is known.
    pub fn is_known(&self, metric: Metric) -> bool {
        self.get(metric).is_some()
    }

    /// Check whether all four fields are known.
    pub fn is_complete(&self) -> bool {
        Metric::ALL.iter().all(|m| self.is_known(*m))
    }

    /// Number of known fields.
    pub fn known_count(&self) -> usize {
        Metric::ALL.iter().filter(|m| self.is_known(**m)).count()
    }

    /// Iterate over the known fields in W, I, R, E order.
    pub fn known(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL
            .iter()
            .filter_map(move |m| self.get(*m).map(|v| (*m, v)))
    }
}
