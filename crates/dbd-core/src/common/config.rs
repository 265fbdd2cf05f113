//! JSON configuration file for a bench setup.
//!
//! Every section is optional; missing fields fall back to the lab defaults so a
//! config only needs to list what differs from the standard reactor.

use crate::domain::{DbdError, DbdResult, ReactorParameters};
use crate::model::VoltageSweep;
use crate::sensors::cloud::CloudSettings;
use crate::sensors::serial::SerialSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReactorConfig {
    pub reactor: ReactorParameters,
    pub sweep: VoltageSweep,
    pub cloud: Option<CloudSettings>,
    pub serial: Option<SerialSettings>,
}

impl ReactorConfig {
    pub fn from_json_str(content: &str) -> DbdResult<Self> {
        serde_json::from_str(content).map_err(|source| {
            DbdError::input_validation(
                "INPUT.CONFIG_PARSE",
                format!("failed to parse reactor config: {source}"),
            )
        })
    }

    pub fn load(path: &Path) -> DbdResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| {
            DbdError::io_system(
                "IO.CONFIG_READ",
                format!(
                    "failed to read reactor config '{}': {}",
                    path.display(),
                    source
                ),
            )
        })?;
        let config = Self::from_json_str(&content)?;
        config.reactor.validate()?;
        tracing::debug!(path = %path.display(), "loaded reactor config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::ReactorConfig;
    use crate::domain::{CapacitanceModel, ReactorParameters};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn empty_document_yields_lab_defaults() {
        let config = ReactorConfig::from_json_str("{}").expect("empty config should parse");
        assert_eq!(config.reactor, ReactorParameters::default());
        assert!(config.cloud.is_none());
        assert!(config.serial.is_none());
        assert_eq!(config.sweep.points, 100);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = ReactorConfig::from_json_str(
            r#"
            {
              "reactor": {
                "operating": { "peak_voltage_kv": 28.0 },
                "geometry": { "reactor_count": 4 },
                "capacitance": { "kind": "coaxial" }
              },
              "serial": { "port": "/dev/ttyUSB0" }
            }
            "#,
        )
        .expect("partial config should parse");

        assert_eq!(config.reactor.operating.peak_voltage_kv, 28.0);
        assert_eq!(config.reactor.operating.frequency_hz, 15_000.0);
        assert_eq!(config.reactor.geometry.reactor_count, 4);
        assert_eq!(config.reactor.geometry.gap_mm, 3.0);
        assert_eq!(config.reactor.capacitance, CapacitanceModel::Coaxial);
        let serial = config.serial.expect("serial section should be present");
        assert_eq!(serial.port, "/dev/ttyUSB0");
        assert_eq!(serial.baud_rate, 9600);
    }

    #[test]
    fn unknown_top_level_keys_are_rejected() {
        let error = ReactorConfig::from_json_str(r#"{ "reactors": {} }"#)
            .expect_err("typo should be reported");
        assert_eq!(error.placeholder(), "INPUT.CONFIG_PARSE");
    }

    #[test]
    fn load_validates_reactor_section() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("reactor.json");
        fs::write(&path, r#"{ "reactor": { "geometry": { "gap_mm": -2.0 } } }"#)
            .expect("config should be written");

        let error = ReactorConfig::load(&path).expect_err("negative gap should fail");
        assert_eq!(error.placeholder(), "INPUT.GAP");

        let missing = ReactorConfig::load(&temp.path().join("missing.json"))
            .expect_err("missing file should fail");
        assert_eq!(missing.placeholder(), "IO.CONFIG_READ");
    }
}
