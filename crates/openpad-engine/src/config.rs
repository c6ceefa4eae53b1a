//! Engine configuration.
//!
//! Stored as JSON; every field is optional and falls back to its default.
//!
//! ```json
//! { "dedupe": true, "stick_deadzone": 2500, "nx_player_slot": 2 }
//! ```

use crate::error::{EngineError, EngineResult};
use openpad_controller::DEFAULT_STICK_DEADZONE;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Environment variable that overrides [`EngineConfig::dedupe`].
pub const DEDUPE_ENV: &str = "OPENPAD_DEDUPE";

/// Smallest read buffer that holds every supported input report.
pub const MIN_READ_BUFFER_LEN: usize = 64;

/// Number of player LEDs on a Switch controller.
pub const NX_PLAYER_SLOTS: u8 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound for a blocking output write, enforced by the transport.
    pub write_timeout_ms: u64,
    /// Size of the buffer used for each input report read.
    pub read_buffer_len: usize,
    /// Drop events that repeat the previous state of the same controller.
    pub dedupe: bool,
    /// Stick dead zone applied when deduplicating.
    pub stick_deadzone: u16,
    /// Switch player LED to light, 1 to 4; 0 leaves all off.
    pub nx_player_slot: u8,
    /// DualShock 4 lightbar colour.
    pub ps4_led: [u8; 3],
    /// DualSense lightbar colour.
    pub ps5_led: [u8; 3],
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            write_timeout_ms: 1000,
            read_buffer_len: 256,
            dedupe: false,
            stick_deadzone: DEFAULT_STICK_DEADZONE,
            nx_player_slot: 1,
            ps4_led: openpad_hid_ps4_protocol::DEFAULT_LIGHTBAR,
            ps5_led: openpad_hid_ps5_protocol::DEFAULT_LIGHTBAR,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ConfigParse`] for malformed JSON and
    /// [`EngineError::InvalidConfig`] for out-of-range values.
    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or does not hold a valid
    /// configuration.
    pub fn load(path: &Path) -> EngineResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&content)?;
        debug!("Loaded engine config from {:?}", path);
        Ok(config)
    }

    /// Serializes the configuration as indented JSON.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ConfigParse`] if serialization fails.
    pub fn to_json_pretty(&self) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> EngineResult<()> {
        if self.read_buffer_len < MIN_READ_BUFFER_LEN {
            return Err(EngineError::InvalidConfig(format!(
                "read_buffer_len must be at least {MIN_READ_BUFFER_LEN}, got {}",
                self.read_buffer_len
            )));
        }
        if self.write_timeout_ms == 0 {
            return Err(EngineError::InvalidConfig(
                "write_timeout_ms must be non-zero".into(),
            ));
        }
        if self.nx_player_slot > NX_PLAYER_SLOTS {
            return Err(EngineError::InvalidConfig(format!(
                "nx_player_slot must be 0..={NX_PLAYER_SLOTS}, got {}",
                self.nx_player_slot
            )));
        }
        Ok(())
    }

    /// Applies [`DEDUPE_ENV`] from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if the variable is set to
    /// something other than a boolean.
    pub fn with_env_overrides(self) -> EngineResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`EngineConfig::with_env_overrides`].
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> EngineResult<Self> {
        if let Some(raw) = lookup(DEDUPE_ENV) {
            self.dedupe = parse_flag(&raw).ok_or_else(|| {
                EngineError::InvalidConfig(format!("{DEDUPE_ENV} must be a boolean, got {raw:?}"))
            })?;
            debug!("{} override: dedupe = {}", DEDUPE_ENV, self.dedupe);
        }
        Ok(self)
    }

    /// Player LED bitmask for Switch controllers.
    pub fn nx_player_lights(&self) -> u8 {
        match self.nx_player_slot {
            0 => 0,
            slot => 1 << (slot.min(NX_PLAYER_SLOTS) - 1),
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
