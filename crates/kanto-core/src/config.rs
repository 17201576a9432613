//! Configuration loading and typed config structures for the session
//! coordinator.
//!
//! The canonical configuration lives in `kanto-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror
//! the YAML structure, and provides a loader that reads and validates
//! the file. Every field has a default, so a missing file or an empty
//! document yields a fully usable configuration.

use std::path::Path;
use std::time::Duration;

use kanto_types::{Mode, PolicyKind};
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level coordinator configuration.
///
/// Mirrors the structure of `kanto-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct KantoConfig {
    /// Session identity and reproducibility settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Background loop cadence and frame bookkeeping.
    #[serde(default)]
    pub loops: LoopConfig,

    /// Policy slot assignments and control mode.
    #[serde(default)]
    pub controls: ControlsConfig,

    /// Demonstration driver settings.
    #[serde(default)]
    pub driver: DriverConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl KantoConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `KANTO_ROM_PATH` overrides `session.rom_path`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.session.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.session.apply_env_overrides();
        Ok(config)
    }
}

/// Session identity configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionConfig {
    /// Human-readable session name.
    #[serde(default = "default_session_name")]
    pub name: String,

    /// Path handed to the emulator backend at install time.
    #[serde(default = "default_rom_path")]
    pub rom_path: String,

    /// Random seed for policy reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl SessionConfig {
    /// Apply environment variable overrides to this section.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("KANTO_ROM_PATH") {
            self.rom_path = val;
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name: default_session_name(),
            rom_path: default_rom_path(),
            seed: default_seed(),
        }
    }
}

/// Background loop configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoopConfig {
    /// Real-time milliseconds between simulation iterations.
    #[serde(default = "default_sim_interval_ms")]
    pub sim_interval_ms: u64,

    /// Frames advanced per simulation iteration.
    #[serde(default = "default_frames_per_iteration")]
    pub frames_per_iteration: u64,

    /// State refresh cadence: a fresh snapshot is broadcast whenever the
    /// frame counter is a multiple of this.
    #[serde(default = "default_state_refresh_frames")]
    pub state_refresh_frames: u64,

    /// Real-time milliseconds between screenshot broadcasts.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,

    /// Frames ticked between consecutive steps of an action sequence.
    #[serde(default = "default_sequence_delay_frames")]
    pub sequence_delay_frames: u64,
}

impl LoopConfig {
    /// Simulation iteration interval as a [`Duration`].
    pub const fn sim_interval(&self) -> Duration {
        Duration::from_millis(self.sim_interval_ms)
    }

    /// Screenshot broadcast interval as a [`Duration`].
    pub const fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            sim_interval_ms: default_sim_interval_ms(),
            frames_per_iteration: default_frames_per_iteration(),
            state_refresh_frames: default_state_refresh_frames(),
            frame_interval_ms: default_frame_interval_ms(),
            sequence_delay_frames: default_sequence_delay_frames(),
        }
    }
}

/// Policy slot and mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ControlsConfig {
    /// Policy for the player slot.
    #[serde(default = "default_player_policy")]
    pub player: PolicyKind,

    /// Policy for the pokemon slot.
    #[serde(default = "default_pokemon_policy")]
    pub pokemon: PolicyKind,

    /// How decisions are divided between the slots.
    #[serde(default = "default_mode")]
    pub mode: Mode,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            player: default_player_policy(),
            pokemon: default_pokemon_policy(),
            mode: default_mode(),
        }
    }
}

/// Demonstration driver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DriverConfig {
    /// How many decision steps the driver runs before stopping.
    #[serde(default = "default_driver_steps")]
    pub steps: u32,

    /// Real-time milliseconds between driver steps.
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,
}

impl DriverConfig {
    /// Delay between driver steps as a [`Duration`].
    pub const fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            steps: default_driver_steps(),
            step_delay_ms: default_step_delay_ms(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_session_name() -> String {
    "kanto-session".to_owned()
}

fn default_rom_path() -> String {
    "roms/kanto.gb".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_sim_interval_ms() -> u64 {
    33
}

const fn default_frames_per_iteration() -> u64 {
    2
}

const fn default_state_refresh_frames() -> u64 {
    30
}

const fn default_frame_interval_ms() -> u64 {
    1000
}

const fn default_sequence_delay_frames() -> u64 {
    10
}

const fn default_player_policy() -> PolicyKind {
    PolicyKind::Scout
}

const fn default_pokemon_policy() -> PolicyKind {
    PolicyKind::Strategist
}

const fn default_mode() -> Mode {
    Mode::Dual
}

const fn default_driver_steps() -> u32 {
    40
}

const fn default_step_delay_ms() -> u64 {
    250
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = KantoConfig::default();
        assert_eq!(config.session.seed, 42);
        assert_eq!(config.loops.sim_interval_ms, 33);
        assert_eq!(config.loops.frames_per_iteration, 2);
        assert_eq!(config.loops.state_refresh_frames, 30);
        assert_eq!(config.controls.player, PolicyKind::Scout);
        assert_eq!(config.controls.pokemon, PolicyKind::Strategist);
        assert_eq!(config.controls.mode, Mode::Dual);
        assert_eq!(config.driver.steps, 40);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
session:
  name: "Test Session"
  rom_path: "test/rom.gb"
  seed: 123

loops:
  sim_interval_ms: 16
  frames_per_iteration: 4
  state_refresh_frames: 60
  frame_interval_ms: 500
  sequence_delay_frames: 5

controls:
  player: strategist
  pokemon: scout
  mode: single

driver:
  steps: 10
  step_delay_ms: 50

logging:
  level: "debug"
"#;

        let config = KantoConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_else(KantoConfig::default);

        assert_eq!(config.session.name, "Test Session");
        assert_eq!(config.session.seed, 123);
        assert_eq!(config.loops.frames_per_iteration, 4);
        assert_eq!(config.loops.frame_interval_ms, 500);
        assert_eq!(config.controls.player, PolicyKind::Strategist);
        assert_eq!(config.controls.mode, Mode::Single);
        assert_eq!(config.driver.steps, 10);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = "session:\n  seed: 7\n";
        let config = KantoConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_else(KantoConfig::default);

        // Seed is overridden
        assert_eq!(config.session.seed, 7);
        // Everything else uses defaults
        assert_eq!(config.loops.sim_interval_ms, 33);
        assert_eq!(config.controls.mode, Mode::Dual);
    }

    #[test]
    fn parse_empty_yaml() {
        let config = KantoConfig::parse("");
        assert!(config.is_ok());
    }

    #[test]
    fn unknown_policy_label_is_rejected() {
        let yaml = "controls:\n  player: oracle\n";
        assert!(KantoConfig::parse(yaml).is_err());
    }

    #[test]
    fn interval_helpers_convert_milliseconds() {
        let loops = LoopConfig::default();
        assert_eq!(loops.sim_interval(), Duration::from_millis(33));
        assert_eq!(loops.frame_interval(), Duration::from_secs(1));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("kanto-config.yaml");
        if path.exists() {
            let config = KantoConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
