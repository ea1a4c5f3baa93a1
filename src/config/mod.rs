//! Overlay Configuration
//!
//! User settings for the on-screen display and transport controls, stored in
//! TOML format.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Overlay settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// On-screen message settings
    pub messages: MessageSettings,
    /// Transport control settings
    pub transport: TransportSettings,
}

/// On-screen message display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSettings {
    /// Draw messages at all (expiry still runs while drawing is disabled)
    pub enabled: bool,
    /// Pixels to the left of the first message
    pub left_margin: f32,
    /// Pixels above the first message
    pub top_margin: f32,
    /// Pixels between subsequent messages
    pub padding: f32,
    /// Fade-out window before a message expires, in milliseconds
    pub fade_window_ms: u32,
}

impl Default for MessageSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            left_margin: 10.0,
            top_margin: 10.0,
            padding: 4.0,
            fade_window_ms: 1024,
        }
    }
}

/// Transport control settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportSettings {
    /// Playback rate used to convert frame numbers to time labels
    pub fps: u32,
    /// Frames moved by the step back/forward buttons
    pub step_frames: i32,
    /// Frames moved by the jump back/forward buttons
    pub jump_frames: i32,
    /// Volume restored on un-mute when no previous volume was recorded
    pub default_unmute_volume: i32,
    /// Idle time before the controls start fading, in milliseconds
    pub idle_grace_ms: u32,
    /// Fade-out duration once fading starts, in milliseconds
    pub idle_fade_ms: u32,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            fps: 60,
            step_frames: 300,
            jump_frames: 1200,
            default_unmute_volume: 30,
            idle_grace_ms: 1000,
            idle_fade_ms: 1000,
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<OverlayConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: OverlayConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &OverlayConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
