//! Playback engine state shared with the overlay.
//!
//! The host's playback engine owns this state; the overlay reads it for
//! layout and labels, and writes `target_frame` when the user requests a
//! seek. Access is render-thread-only by contract.

/// Sentinel target frame meaning "no pending seek request".
pub const TARGET_FRAME_UNSET: i32 = i32::MAX;

/// Snapshot of the playback engine's frame position state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackStatus {
    /// Frame currently being presented.
    pub current_frame: i32,
    /// Requested seek destination, or [`TARGET_FRAME_UNSET`].
    pub target_frame: i32,
    /// First seekable frame of the loaded recording.
    pub first_frame: i32,
    /// Last frame of the loaded recording.
    pub last_frame: i32,
}

impl PlaybackStatus {
    pub fn new(first_frame: i32, last_frame: i32) -> Self {
        Self {
            current_frame: first_frame,
            target_frame: TARGET_FRAME_UNSET,
            first_frame,
            last_frame,
        }
    }

    /// Whether a seek has been requested and not yet performed.
    pub fn has_pending_seek(&self) -> bool {
        self.target_frame != TARGET_FRAME_UNSET
    }

    /// Frame the progress indicator should show: the pending target while a
    /// seek is in flight, otherwise the current frame.
    pub fn display_frame(&self) -> i32 {
        if self.has_pending_seek() {
            self.target_frame
        } else {
            self.current_frame
        }
    }

    /// Whether the host has loaded a recording with a usable frame range.
    pub fn is_initialized(&self) -> bool {
        self.last_frame > self.first_frame
    }
}

/// Format a frame number as a `MM:SS` position string, clamped at zero.
pub fn format_frame_time(frame: i32, first_frame: i32, fps: u32) -> String {
    let elapsed = frame.saturating_sub(first_frame).max(0) as u32;
    let secs = elapsed / fps.max(1);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
