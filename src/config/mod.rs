//! Controller profile configuration
//!
//! A profile holds the controller identity, its accessory pairings and
//! the window mappings, stored as TOML under the user config directory.
//! Identity and pairing keys are opaque to this crate; they are checked
//! as hex and handed to whatever establishes the bridge session.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::{Result, SkylightError};
use crate::model::WindowMapping;

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

/// A paired accessory bridge reachable over IP
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessoryPairing {
    /// Profile-local name of the pairing
    pub name: String,
    /// Accessory device id
    pub device_id: String,
    /// Accessory long-term public key, hex encoded
    pub public_key: String,
    /// Bridge endpoint, e.g. "http://192.168.1.40:5001/"
    pub address: Url,
}

/// One controller profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Controller device id
    pub device_id: String,
    /// Controller long-term public key, hex encoded
    pub public_key: String,
    /// Controller long-term private key, hex encoded
    pub private_key: String,
    /// Request timeout for bridge calls
    #[serde(with = "humantime_serde", default = "default_timeout")]
    pub timeout: Duration,
    #[serde(default)]
    pub pairings: Vec<AccessoryPairing>,
    #[serde(default)]
    pub window_mappings: Vec<WindowMapping>,
}

impl ControllerConfig {
    /// Validate profile contents before use or persistence
    pub fn validate(&self) -> Result<()> {
        if self.device_id.is_empty() {
            return Err(SkylightError::config("controller device_id must be set"));
        }

        for (field, key) in [
            ("public_key", &self.public_key),
            ("private_key", &self.private_key),
        ] {
            hex::decode(key).map_err(|e| {
                SkylightError::config(format!("controller {field} is not valid hex: {e}"))
            })?;
        }

        if self.timeout.is_zero() {
            return Err(SkylightError::config("timeout must be non-zero"));
        }

        for pairing in &self.pairings {
            if pairing.name.is_empty() {
                return Err(SkylightError::config("pairing name must be set"));
            }
            if pairing.device_id.is_empty() {
                return Err(SkylightError::config(format!(
                    "pairing {} has no device_id",
                    pairing.name
                )));
            }
            hex::decode(&pairing.public_key).map_err(|e| {
                SkylightError::config(format!(
                    "pairing {} public_key is not valid hex: {e}",
                    pairing.name
                ))
            })?;
        }

        Ok(())
    }

    /// Pairing by name; an empty name selects the first configured
    pub fn pairing(&self, name: &str) -> Option<&AccessoryPairing> {
        self.pairings
            .iter()
            .find(|pairing| name.is_empty() || pairing.name == name)
    }

    /// Set name and code for a serial, adding a mapping if none exists
    pub fn upsert_mapping(&mut self, serial: &str, name: &str, code: &str) {
        if let Some(mapping) = self
            .window_mappings
            .iter_mut()
            .find(|m| m.serial_number == serial)
        {
            mapping.name = name.to_string();
            mapping.code = code.to_string();
            return;
        }

        self.window_mappings.push(WindowMapping {
            serial_number: serial.to_string(),
            name: name.to_string(),
            code: code.to_string(),
        });
    }

    /// Take identity and pairings from another profile, keeping the
    /// window mappings of this one
    pub fn merge_identity(&mut self, other: &ControllerConfig) {
        self.device_id = other.device_id.clone();
        self.public_key = other.public_key.clone();
        self.private_key = other.private_key.clone();
        self.pairings = other.pairings.clone();
    }
}

/// Default directory holding controller profiles
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("skylight"))
}

/// File path of a named profile
pub fn profile_path(dir: &Path, profile: &str) -> PathBuf {
    dir.join(format!("{profile}.toml"))
}

/// Load and validate a profile
pub fn load(dir: &Path, profile: &str) -> Result<ControllerConfig> {
    let path = profile_path(dir, profile);
    load_file(&path)
}

/// Load and validate a profile from an explicit file path
pub fn load_file(path: &Path) -> Result<ControllerConfig> {
    let raw = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SkylightError::not_found(format!("no profile at {}", path.display()))
        } else {
            SkylightError::Io(e)
        }
    })?;

    let config: ControllerConfig = toml::from_str(&raw)
        .map_err(|e| SkylightError::config(format!("parse {}: {e}", path.display())))?;
    config.validate()?;

    debug!(path = %path.display(), pairings = config.pairings.len(), "profile loaded");
    Ok(config)
}

/// Persist a profile. Without `overwrite`, an existing file is an error.
pub fn save(dir: &Path, profile: &str, config: &ControllerConfig, overwrite: bool) -> Result<()> {
    config.validate()?;

    fs::create_dir_all(dir)?;

    let path = profile_path(dir, profile);
    if !overwrite && path.exists() {
        return Err(SkylightError::config(format!(
            "profile already exists at {}",
            path.display()
        )));
    }

    let raw = toml::to_string_pretty(config)
        .map_err(|e| SkylightError::config(format!("serialize profile: {e}")))?;
    fs::write(&path, raw)?;

    debug!(path = %path.display(), "profile saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ControllerConfig {
        ControllerConfig {
            device_id: "11:22:33:44:55:66".to_string(),
            public_key: "ab".repeat(32),
            private_key: "cd".repeat(64),
            timeout: Duration::from_secs(10),
            pairings: vec![AccessoryPairing {
                name: "gateway".to_string(),
                device_id: "aa:bb:cc:dd:ee:ff".to_string(),
                public_key: "ef".repeat(32),
                address: "http://192.168.1.40:5001/".parse().unwrap(),
            }],
            window_mappings: vec![WindowMapping {
                serial_number: "A1".to_string(),
                name: "Living Room".to_string(),
                code: "liv".to_string(),
            }],
        }
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config();

        save(dir.path(), "default", &config, false).unwrap();
        let loaded = load(dir.path(), "default").unwrap();

        assert_eq!(loaded.device_id, config.device_id);
        assert_eq!(loaded.timeout, config.timeout);
        assert_eq!(loaded.pairings.len(), 1);
        assert_eq!(loaded.pairings[0].address.as_str(), "http://192.168.1.40:5001/");
        assert_eq!(loaded.window_mappings, config.window_mappings);
    }

    #[test]
    fn save_refuses_to_clobber_without_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config();

        save(dir.path(), "default", &config, false).unwrap();
        assert!(matches!(
            save(dir.path(), "default", &config, false),
            Err(SkylightError::Config(_))
        ));
        save(dir.path(), "default", &config, true).unwrap();
    }

    #[test]
    fn load_missing_profile_is_not_found() {
        let dir = tempfile::tempdir().unwrap();

        assert!(matches!(
            load(dir.path(), "missing"),
            Err(SkylightError::NotFound(_))
        ));
    }

    #[test]
    fn validate_rejects_bad_keys_and_timeout() {
        let mut config = test_config();
        config.public_key = "not hex".to_string();
        assert!(config.validate().is_err());

        let mut config = test_config();
        config.timeout = Duration::ZERO;
        assert!(config.validate().is_err());

        let mut config = test_config();
        config.pairings[0].public_key = "zz".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn upsert_mapping_updates_or_appends() {
        let mut config = test_config();

        config.upsert_mapping("A1", "Lounge", "lng");
        assert_eq!(config.window_mappings.len(), 1);
        assert_eq!(config.window_mappings[0].name, "Lounge");

        config.upsert_mapping("B2", "Bedroom", "bed");
        assert_eq!(config.window_mappings.len(), 2);
        assert_eq!(config.window_mappings[1].code, "bed");
    }

    #[test]
    fn pairing_lookup_defaults_to_first() {
        let config = test_config();

        assert_eq!(config.pairing("").unwrap().name, "gateway");
        assert_eq!(config.pairing("gateway").unwrap().name, "gateway");
        assert!(config.pairing("other").is_none());
    }

    #[test]
    fn merge_identity_keeps_mappings() {
        let mut config = test_config();
        let mut other = test_config();
        other.device_id = "77:88:99:aa:bb:cc".to_string();
        other.window_mappings.clear();

        config.merge_identity(&other);

        assert_eq!(config.device_id, "77:88:99:aa:bb:cc");
        assert_eq!(config.window_mappings.len(), 1);
    }
}
