//! # Format Constants Configuration
//!
//! The wire format fixes three numeric constants: the reserved "no data"
//! sentinel and the scale/offset transform applied to every stored sample.
//! Current tilesets use the identity transform, but the pair is a deliberate
//! extension point, so the constants load from a `fourwings-format.toml`
//! file when one is present and fall back to the format defaults otherwise.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Wire-format constants applied during decoding.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FormatConfig {
    /// Raw value reserved to mean "no sample" (2^32 - 1)
    pub no_data_value: u64,
    /// Multiplier applied to every raw sample
    pub scale: f64,
    /// Addend applied after scaling
    pub offset: f64,
}

impl Default for FormatConfig {
    fn default() -> Self {
        FormatConfig {
            no_data_value: 4_294_967_295,
            scale: 1.0,
            offset: 0.0,
        }
    }
}

impl FormatConfig {
    /// Load format constants from `fourwings-format.toml`
    /// Falls back to the wire-format defaults if the file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path("fourwings-format.toml")
    }

    /// Load format constants from the specified path
    /// Falls back to the wire-format defaults if the file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<FormatConfig>(&contents) {
                Ok(config) => {
                    info!(
                        "loaded format config: sentinel={}, scale={}, offset={}",
                        config.no_data_value, config.scale, config.offset
                    );
                    config
                }
                Err(e) => {
                    warn!("invalid format config file: {e}; using wire-format defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Save the constants to the given path as TOML.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}
