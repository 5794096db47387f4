//! REPL configuration.
//!
//! Every field has a default, so an empty TOML document is a valid config and
//! a file only needs to name the keys it overrides:
//!
//! ```toml
//! start_command = "js"
//! end_sentinel = "exit"
//!
//! [limits]
//! memory_limit = 33554432
//!
//! [reserved_global]
//! name = "Skyrim"
//! value = "Hello from Skyrim!"
//! ```

use std::{fs, path::Path};

use serde::Deserialize;

use crate::error::ConfigError;

/// Default memory ceiling for one engine runtime (16 MiB).
pub const DEFAULT_MEMORY_LIMIT: usize = 16 * 1024 * 1024;
/// Default maximum native stack the engine may use (512 KiB).
pub const DEFAULT_MAX_STACK_SIZE: usize = 512 * 1024;

/// Resource ceilings applied to every engine runtime.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineLimits {
    /// Maximum bytes the runtime may allocate.
    pub memory_limit: usize,
    /// Maximum native stack in bytes before the engine throws a stack overflow.
    pub max_stack_size: usize,
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self {
            memory_limit: DEFAULT_MEMORY_LIMIT,
            max_stack_size: DEFAULT_MAX_STACK_SIZE,
        }
    }
}

/// The one global name that materializes as a fixed value instead of `undefined`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReservedGlobal {
    pub name: String,
    pub value: String,
}

impl Default for ReservedGlobal {
    fn default() -> Self {
        Self {
            name: "Skyrim".to_owned(),
            value: "Hello from Skyrim!".to_owned(),
        }
    }
}

/// Console tokens, output formatting, and engine settings for the REPL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReplConfig {
    /// Command registered with the host that activates the REPL.
    pub start_command: String,
    /// Line that ends the session while active.
    pub end_sentinel: String,
    /// The host's own quit command, passed through untouched while active.
    pub quit_sentinel: String,
    /// Prefix printed before a rendered result.
    pub result_prefix: String,
    /// Prefix used when echoing input lines.
    pub input_prompt: String,
    /// Whether non-blank input lines are echoed back to the console.
    pub echo_input: bool,
    pub limits: EngineLimits,
    pub reserved_global: ReservedGlobal,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            start_command: "js".to_owned(),
            end_sentinel: "exit".to_owned(),
            quit_sentinel: "qqq".to_owned(),
            result_prefix: "=> ".to_owned(),
            input_prompt: "js> ".to_owned(),
            echo_input: true,
            limits: EngineLimits::default(),
            reserved_global: ReservedGlobal::default(),
        }
    }
}

impl ReplConfig {
    /// Parses a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml_edit::de::from_str(text)?)
    }

    /// Reads and parses a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Banner printed when a session starts.
    #[must_use]
    pub fn prompt_banner(&self) -> String {
        format!(
            "JavaScript REPL started. Enter two blank lines to run the code, `{}` to leave.",
            self.end_sentinel
        )
    }
}
