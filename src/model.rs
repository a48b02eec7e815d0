//! Domain model for accessory status aggregation and reconciliation

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SkylightError;

/// Highest valid target position. Positions run 0 (closed) to 100 (open).
pub const MAX_POSITION: u8 = 100;

/// Environment measurements aggregated across all sensor-capable
/// accessories. Last writer wins per metric; values are not averaged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SensorReading {
    /// Temperature in Fahrenheit
    pub temperature_f: f64,
    /// Relative humidity percentage
    pub relative_humidity: f64,
    /// Carbon dioxide level in ppm
    pub co2_ppm: f64,
}

/// Identifies a window device as a window or a blind covering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    Window,
    Blind,
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowKind::Window => write!(f, "window"),
            WindowKind::Blind => write!(f, "blind"),
        }
    }
}

impl FromStr for WindowKind {
    type Err = SkylightError;

    /// Any prefix of "window" or "blind" resolves by its first letter.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('w') => Ok(WindowKind::Window),
            Some('b') => Ok(WindowKind::Blind),
            _ => Err(SkylightError::invalid_input(format!(
                "unknown window kind: {s}"
            ))),
        }
    }
}

/// Identity and current position of one window or blind.
///
/// The kind is fixed at extraction time from the service type that
/// produced the entry and never changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowInfo {
    /// Accessory handle on the bridge
    pub accessory_id: u64,
    /// Stable hardware identity
    pub serial_number: String,
    /// Device-reported type label (service name)
    pub type_label: String,
    /// Window or blind
    pub kind: WindowKind,
    /// Current position, 0-100
    pub current_position: u8,
    /// Target position, 0-100
    pub target_position: u8,
    /// Instance id of the target-position characteristic to write
    pub target_position_iid: u64,
    /// Mapping attached by serial lookup at extraction time, if any
    pub mapping: Option<WindowMapping>,
}

impl WindowInfo {
    /// Mapped friendly name if set, serial number otherwise.
    pub fn friendly_name(&self) -> &str {
        match &self.mapping {
            Some(mapping) if !mapping.name.is_empty() => &mapping.name,
            _ => &self.serial_number,
        }
    }

    /// Mapped short code if set, device type label otherwise.
    pub fn code(&self) -> &str {
        match &self.mapping {
            Some(mapping) if !mapping.code.is_empty() => &mapping.code,
            _ => &self.type_label,
        }
    }
}

/// Maps a window serial number to a friendly name and short code.
///
/// Owned by configuration storage; extraction only consults a
/// lookup-by-serial view built fresh on each pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowMapping {
    pub serial_number: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: String,
}

/// Environment readings plus the selected windows of one status read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Status {
    pub reading: SensorReading,
    pub windows: Vec<WindowInfo>,
}

/// Outcome of a request to change window positions.
///
/// `modified` holds windows a write was issued for, `unmodified` those
/// already at the requested target.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetStatus {
    pub modified: Vec<WindowInfo>,
    pub unmodified: Vec<WindowInfo>,
}

impl SetStatus {
    /// Number of windows matched by the set request
    pub fn total(&self) -> usize {
        self.modified.len() + self.unmodified.len()
    }
}
