//! Synthesis configuration (`fsmc.toml`)
//!
//! Every field has a default, so an empty file is a valid configuration:
//!
//! ```toml
//! [synthesis]
//! module_name = "fsm"
//! parallel = true
//! verify = true
//!
//! [naming]
//! clock = "clk"
//! input_prefix = "in"
//! output_prefix = "out"
//! state_prefix = "state"
//! ```

use fsmc_netlist::NetNames;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Default configuration file name
pub const CONFIG_FILE: &str = "fsmc.toml";

/// Errors loading or writing a configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// I/O error reading the configuration file
    #[error("I/O error: {0}")]
    Io(String),

    /// TOML parsing error
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// Naming section would produce clashing or illegal net names
    #[error("Invalid [naming] section: {0}")]
    Naming(String),

    /// TOML serialization error
    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),
}

/// Top-level synthesis configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    pub synthesis: SynthesisOptions,
    /// Pin and register naming
    pub naming: NetNames,
}

/// Pipeline switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisOptions {
    /// Name of the generated module / netlist
    pub module_name: String,
    /// Solve per-bit minimization problems on the rayon pool
    pub parallel: bool,
    /// Check every minimized expression against its truth-table column
    pub verify: bool,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            module_name: "fsm".to_string(),
            parallel: true,
            verify: true,
        }
    }
}

impl SynthConfig {
    /// Load a configuration from a TOML file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
        contents.parse()
    }

    /// Check settings that parse fine but cannot be synthesized
    pub fn check(&self) -> Result<(), ConfigError> {
        self.naming
            .check()
            .map_err(|e| ConfigError::Naming(e.to_string()))
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Single-threaded configuration for reproducible timing
    pub fn serial() -> Self {
        let mut config = Self::default();
        config.synthesis.parallel = false;
        config
    }

    pub fn with_module_name(mut self, name: impl Into<String>) -> Self {
        self.synthesis.module_name = name.into();
        self
    }
}

impl FromStr for SynthConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Self = toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.check()?;
        Ok(config)
    }
}
