//! State shared between the overlay and its collaborators
//!
//! This module provides the clock abstraction the overlay runs off and the
//! playback engine state it reads and mutates.

pub mod clock;
pub mod playback;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use playback::{format_frame_time, PlaybackStatus, TARGET_FRAME_UNSET};
