//! playback-overlay - on-screen messages and transport controls for
//! frame-based playback applications
//!
//! The host render loop owns the graphics context and the playback/audio
//! engines; this crate draws on top of it: a thread-safe store of transient
//! status messages with per-message expiry, and an interactive transport
//! surface (seek bar, step/jump buttons, volume control, help panel) whose
//! commands come back to the host as [`TransportEvent`]s.

pub mod config;
pub mod overlay;
pub mod shared;

pub use config::{load_config, save_config, OverlayConfig};
pub use overlay::messages::{MessageKind, MessageStore};
pub use overlay::{Overlay, OverlayError, TransportEvent};
pub use shared::clock::{Clock, ManualClock, MonotonicClock};
pub use shared::playback::{PlaybackStatus, TARGET_FRAME_UNSET};
