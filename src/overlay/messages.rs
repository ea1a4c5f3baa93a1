//! Thread-safe store of transient on-screen messages.
//!
//! Producer threads add messages under a category; the render thread sweeps
//! the store once per frame, dropping expired entries and collecting the
//! survivors into a draw list with a fade factor near expiry.

use std::collections::BTreeMap;
use std::sync::Arc;

use egui::Color32;
use parking_lot::Mutex;

use crate::shared::clock::Clock;

/// Default fade-out window: a message fades over its last 1024 ms of life.
pub const FADE_WINDOW_MS: u32 = 1024;

/// Category tag for a message.
///
/// Every category except [`MessageKind::Typeless`] holds at most one live
/// message at a time; adding under it replaces the previous message.
/// `Typeless` messages accumulate independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MessageKind {
    /// Seek progress and completion notices.
    SeekStatus,
    /// Volume level readout.
    VolumeLevel,
    /// General playback information (loaded file, playback rate).
    PlaybackInfo,
    /// Uncategorized; multiple may be live at once.
    Typeless,
}

/// Standard message durations, in milliseconds.
pub mod duration {
    pub const VERY_SHORT: u32 = 500;
    pub const SHORT: u32 = 2_000;
    pub const NORMAL: u32 = 5_000;
    pub const VERY_LONG: u32 = 10_000;
}

/// Standard message colors.
pub mod color {
    use egui::Color32;

    pub const CYAN: Color32 = Color32::from_rgb(0, 255, 255);
    pub const GREEN: Color32 = Color32::from_rgb(0, 255, 0);
    pub const RED: Color32 = Color32::from_rgb(255, 0, 0);
    pub const YELLOW: Color32 = Color32::from_rgb(255, 255, 48);
}

#[derive(Debug)]
struct Message {
    text: String,
    expires_at_ms: u64,
    color: Color32,
}

/// A message ready to draw this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDraw {
    pub text: String,
    pub color: Color32,
    /// Fade factor in `(0.0, 1.0]`; 1.0 until the fade window is entered.
    pub alpha: f32,
}

/// Thread-safe container of transient messages keyed by category.
///
/// `add_typed_message`, `add_message` and `clear_messages` may be called from
/// any thread. [`MessageStore::sweep`] runs on the render thread only, once
/// per frame. Every operation holds the same exclusive lock around the whole
/// container access, so none observes a partially updated store.
pub struct MessageStore {
    messages: Mutex<BTreeMap<MessageKind, Vec<Message>>>,
    clock: Arc<dyn Clock>,
    fade_window_ms: u32,
}

impl MessageStore {
    pub fn new(clock: Arc<dyn Clock>, fade_window_ms: u32) -> Self {
        Self {
            messages: Mutex::new(BTreeMap::new()),
            clock,
            fade_window_ms: fade_window_ms.max(1),
        }
    }

    /// Add a message under `kind`, replacing any live message in that
    /// category. Adding under [`MessageKind::Typeless`] never replaces.
    pub fn add_typed_message(
        &self,
        kind: MessageKind,
        text: impl Into<String>,
        duration_ms: u32,
        color: Color32,
    ) {
        let expires_at_ms = self.clock.now_ms() + u64::from(duration_ms);
        let mut messages = self.messages.lock();
        let slot = messages.entry(kind).or_default();
        if kind != MessageKind::Typeless {
            slot.clear();
        }
        slot.push(Message {
            text: text.into(),
            expires_at_ms,
            color,
        });
    }

    /// Add an uncategorized message; previously added ones stay live.
    pub fn add_message(&self, text: impl Into<String>, duration_ms: u32, color: Color32) {
        self.add_typed_message(MessageKind::Typeless, text, duration_ms, color);
    }

    /// Drop every message immediately.
    pub fn clear_messages(&self) {
        self.messages.lock().clear();
    }

    /// Per-frame sweep: remove expired messages and return the draw list for
    /// the survivors, in category order then insertion order.
    ///
    /// Render-thread-only by contract. The whole pass holds the store lock
    /// once; removal and emission happen in the same traversal.
    pub fn sweep(&self) -> Vec<MessageDraw> {
        let now = self.clock.now_ms();
        let fade_window = self.fade_window_ms as f32;
        let mut draws = Vec::new();

        let mut messages = self.messages.lock();
        messages.retain(|_, slot| {
            slot.retain(|msg| match msg.expires_at_ms.checked_sub(now) {
                Some(time_left) if time_left > 0 => {
                    let alpha = (time_left as f32 / fade_window).min(1.0);
                    draws.push(MessageDraw {
                        text: msg.text.clone(),
                        color: msg.color,
                        alpha,
                    });
                    true
                }
                _ => false,
            });
            !slot.is_empty()
        });

        draws
    }

    /// Number of live messages (expired-but-unswept entries included).
    pub fn len(&self) -> usize {
        self.messages.lock().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::clock::ManualClock;

    fn store() -> (Arc<ManualClock>, MessageStore) {
        let clock = Arc::new(ManualClock::new(0));
        let store = MessageStore::new(clock.clone(), FADE_WINDOW_MS);
        (clock, store)
    }

    #[test]
    fn test_message_lives_until_duration_elapses() {
        let (clock, store) = store();
        store.add_message("saved", 2000, color::GREEN);

        clock.set(1999);
        assert_eq!(store.sweep().len(), 1);

        // Present strictly before add_time + duration, absent at and after.
        clock.set(2000);
        assert!(store.sweep().is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_typed_message_replaces_previous_in_category() {
        let (clock, store) = store();
        store.add_typed_message(MessageKind::VolumeLevel, "Volume: 40%", 5000, color::CYAN);
        clock.set(100);
        store.add_typed_message(MessageKind::VolumeLevel, "Volume: 45%", 5000, color::CYAN);

        let draws = store.sweep();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].text, "Volume: 45%");
    }

    #[test]
    fn test_typeless_messages_accumulate() {
        let (_clock, store) = store();
        store.add_message("first", 5000, color::YELLOW);
        store.add_message("second", 5000, color::YELLOW);

        let draws = store.sweep();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].text, "first");
        assert_eq!(draws[1].text, "second");
    }

    #[test]
    fn test_distinct_categories_coexist() {
        let (_clock, store) = store();
        store.add_typed_message(MessageKind::SeekStatus, "Seeking...", 5000, color::RED);
        store.add_typed_message(MessageKind::VolumeLevel, "Volume: 80%", 5000, color::CYAN);
        store.add_message("typeless", 5000, color::YELLOW);

        assert_eq!(store.sweep().len(), 3);
    }

    #[test]
    fn test_clear_messages_empties_store() {
        let (_clock, store) = store();
        store.add_message("a", 5000, color::GREEN);
        store.add_typed_message(MessageKind::SeekStatus, "b", 5000, color::GREEN);

        store.clear_messages();
        assert!(store.sweep().is_empty());
    }

    #[test]
    fn test_fade_alpha_near_expiry() {
        let (clock, store) = store();
        store.add_message("fading", 2000, color::GREEN);

        // Well before the fade window: fully opaque.
        clock.set(500);
        assert!((store.sweep()[0].alpha - 1.0).abs() < f32::EPSILON);

        // 512 ms of life left: halfway through the 1024 ms window.
        clock.set(2000 - 512);
        let alpha = store.sweep()[0].alpha;
        assert!((alpha - 0.5).abs() < 0.01, "alpha = {alpha}");
    }

    #[test]
    fn test_sweep_removes_only_expired() {
        let (clock, store) = store();
        store.add_message("short", 1000, color::GREEN);
        store.add_message("long", 10_000, color::GREEN);

        clock.set(5000);
        let draws = store.sweep();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].text, "long");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_adds_from_multiple_threads() {
        let (_clock, store) = store();
        std::thread::scope(|s| {
            for worker in 0..4 {
                let store = &store;
                s.spawn(move || {
                    for i in 0..50 {
                        store.add_message(format!("{worker}:{i}"), 60_000, color::GREEN);
                    }
                });
            }
        });
        assert_eq!(store.len(), 200);
    }
}
