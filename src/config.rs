use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Display;

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    SerializeError(String),
    InvalidEntry(String),
    MissingEntry(String),
    Other(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&match self {
            ConfigError::SerializeError(msg) => format!("serialize/parse error: {}", msg),
            ConfigError::InvalidEntry(msg) => format!("invalid config entry: {}", msg),
            ConfigError::MissingEntry(msg) => format!("missing config entry: {}", msg),
            ConfigError::Other(msg) => format!("config error: {}", msg),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct MuxConfig {
    pub device_address: u8,
    pub bus_id: u8,
}

impl Default for MuxConfig {
    fn default() -> Self {
        MuxConfig {
            device_address: crate::mux::DEFAULT_I2C_ADDR,
            bus_id: 1,
        }
    }
}

impl MuxConfig {
    pub fn new(device_address: u8, bus_id: u8) -> Self {
        Self {
            device_address,
            bus_id,
        }
    }

    pub fn from_value(data: Value) -> Result<Self, ConfigError> {
        let config: MuxConfig = match serde_json::from_value(data) {
            Ok(c) => c,
            Err(e) => {
                return Err(ConfigError::SerializeError(format!(
                    "failed to deserialize mux config data: {}",
                    e
                )));
            }
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.device_address > 0x7F {
            return Err(ConfigError::InvalidEntry(format!(
                "invalid mux config: 0x{:02X} is not a 7-bit I2C address",
                self.device_address
            )));
        }

        Ok(())
    }
}
