//! Configuration management for mixfix-player
//!
//! Loads and saves player configuration from a YAML file.
//! Default location: ~/.config/mixfix-player/config.yaml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use mixfix_core::DEFAULT_BLOCK_COUNT;
use mixfix_widgets::WaveformConfig;

/// Player configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Audio settings
    pub audio: AudioConfig,
    /// Display settings
    pub display: DisplayConfig,
}

/// Audio output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Master gain applied at startup, in [0, 1]
    pub master_volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            master_volume: 1.0, // Full gain until the user pulls it down
        }
    }
}

/// Waveform and status display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Amplitude blocks computed per track waveform
    pub envelope_blocks: usize,
    /// Waveform canvas width in logical pixels
    pub waveform_width: f32,
    /// Waveform canvas height in logical pixels
    pub waveform_height: f32,
    /// Columns used for the terminal waveform strip
    pub strip_columns: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            envelope_blocks: DEFAULT_BLOCK_COUNT,
            waveform_width: 800.0, // Full-width strip on a typical window
            waveform_height: 100.0,
            strip_columns: 64,
        }
    }
}

impl DisplayConfig {
    /// Geometry handed to the waveform renderer
    pub fn waveform_config(&self) -> WaveformConfig {
        WaveformConfig {
            width: self.waveform_width,
            height: self.waveform_height,
            ..WaveformConfig::default()
        }
    }
}

/// Get the default config file path
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mixfix-player")
        .join("config.yaml")
}

/// Load configuration from the given path, falling back to defaults
pub fn load_config(path: &Path) -> PlayerConfig {
    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str::<PlayerConfig>(&contents) {
            Ok(config) => {
                log::info!(
                    "Loaded config from {:?} (master volume {:.2}, {} envelope blocks)",
                    path,
                    config.audio.master_volume,
                    config.display.envelope_blocks
                );
                config
            }
            Err(e) => {
                log::warn!("Failed to parse config {:?}: {} - using defaults", path, e);
                PlayerConfig::default()
            }
        },
        Err(_) => {
            log::info!("No config file at {:?} - using defaults", path);
            PlayerConfig::default()
        }
    }
}

/// Save configuration to the given path, creating directories as needed
pub fn save_config(config: &PlayerConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {:?}", parent))?;
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config")?;
    std::fs::write(path, yaml).with_context(|| format!("Failed to write config to {:?}", path))?;

    log::info!("Saved config to {:?}", path);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
