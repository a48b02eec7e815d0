//! Accessory client boundary: the transport trait and the raw wire model
//!
//! The pairing and session layers live outside this crate; everything
//! here treats the bridge as an opaque source of accessory records and
//! sink of characteristic writes.

pub mod http_client;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Service type tags understood by the extractor (HAP short UUIDs)
pub mod service_type {
    pub const ACCESSORY_INFORMATION: &str = "3E";
    pub const TEMPERATURE_SENSOR: &str = "8A";
    pub const HUMIDITY_SENSOR: &str = "82";
    pub const CARBON_DIOXIDE_SENSOR: &str = "97";
    pub const WINDOW: &str = "8B";
    pub const WINDOW_COVERING: &str = "8C";
}

/// Characteristic type tags read or written by this crate
pub mod characteristic_type {
    pub const NAME: &str = "23";
    pub const SERIAL_NUMBER: &str = "30";
    pub const CURRENT_TEMPERATURE: &str = "11";
    pub const CURRENT_RELATIVE_HUMIDITY: &str = "10";
    pub const CARBON_DIOXIDE_LEVEL: &str = "93";
    pub const CURRENT_POSITION: &str = "6D";
    pub const TARGET_POSITION: &str = "7C";
}

/// One paired accessory with its nested services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAccessory {
    /// Accessory id on the bridge
    pub aid: u64,
    pub services: Vec<RawService>,
}

/// A service grouping related characteristics under a type tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawService {
    pub iid: u64,
    #[serde(rename = "type")]
    pub service_type: String,
    pub characteristics: Vec<RawCharacteristic>,
}

/// A single readable or writable value on a service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCharacteristic {
    pub iid: u64,
    #[serde(rename = "type")]
    pub characteristic_type: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl RawAccessory {
    /// First service carrying the given type tag
    pub fn service_of_type(&self, tag: &str) -> Option<&RawService> {
        self.services.iter().find(|s| s.service_type == tag)
    }

    /// Serial number from the accessory-information service
    pub fn serial_number(&self) -> Option<&str> {
        self.service_of_type(service_type::ACCESSORY_INFORMATION)?
            .characteristic_of_type(characteristic_type::SERIAL_NUMBER)?
            .as_str()
    }
}

impl RawService {
    /// First characteristic carrying the given type tag
    pub fn characteristic_of_type(&self, tag: &str) -> Option<&RawCharacteristic> {
        self.characteristics
            .iter()
            .find(|c| c.characteristic_type == tag)
    }
}

impl RawCharacteristic {
    pub fn as_f64(&self) -> Option<f64> {
        self.value.as_f64()
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }

    /// Numeric value coerced into the 0-100 position range
    pub fn as_position(&self) -> Option<u8> {
        self.as_f64().map(|v| v.clamp(0.0, 100.0) as u8)
    }
}

/// One entry of a batched characteristic write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteEntry {
    /// Accessory id the characteristic belongs to
    pub aid: u64,
    /// Instance id of the characteristic to write
    pub iid: u64,
    pub value: serde_json::Value,
}

/// Transport-level view of a paired accessory bridge.
///
/// Implementations own timeouts and session handling; callers get no
/// retry behavior from this crate, failures surface immediately.
#[async_trait]
pub trait AccessoryClient: Send + Sync {
    /// List every paired accessory with nested services and characteristics
    async fn accessories(&self) -> Result<Vec<RawAccessory>>;

    /// Write a batch of characteristic values in a single round trip
    async fn write_characteristics(&self, writes: Vec<WriteEntry>) -> Result<()>;
}
