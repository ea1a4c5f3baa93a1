//! Pointer idle tracking and per-widget drag state.
//!
//! Both types live on the render thread and are updated exactly once per
//! frame; mutating them from any other thread is a programming error, not a
//! runtime-handled condition.

use egui::Pos2;

/// Drag-in-progress state for a single interactive control.
///
/// One instance per widget; the widget's per-frame tick is the only mutator.
#[derive(Debug, Default, Clone, Copy)]
pub struct DragState {
    held: bool,
}

/// Outcome of a per-frame [`DragState::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTransition {
    /// Held state unchanged this frame.
    None,
    /// Pointer pressed while hovering: the drag begins.
    Began,
    /// Primary button released: the drag ends. Commit point for
    /// release-commit widgets.
    Released,
}

impl DragState {
    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Advance the held-state machine one frame.
    ///
    /// A widget becomes held when the primary button goes down while the
    /// pointer hovers its interactive region, stays held while the button
    /// stays down even if the pointer leaves the region, and releases when
    /// the button does.
    pub fn update(
        &mut self,
        hovered: bool,
        primary_down: bool,
        primary_pressed: bool,
    ) -> DragTransition {
        if self.held {
            if primary_down {
                DragTransition::None
            } else {
                self.held = false;
                DragTransition::Released
            }
        } else if hovered && primary_pressed {
            self.held = true;
            DragTransition::Began
        } else {
            DragTransition::None
        }
    }
}

/// Pointer idle tracking driving the transport surface fade-out.
///
/// Any pointer movement counts as activity. The first `grace_ms` of idling
/// are not penalized; after that the surface alpha ramps down over `fade_ms`
/// to a floor just above zero, so the controls stay hit-testable while
/// invisible.
#[derive(Debug)]
pub struct IdleTracker {
    last_activity_ms: u64,
    last_pointer: Pos2,
    grace_ms: u32,
    fade_ms: u32,
}

/// Alpha floor: never fully invisible-but-interactive.
const ALPHA_FLOOR: f32 = 0.0001;

impl IdleTracker {
    pub fn new(grace_ms: u32, fade_ms: u32) -> Self {
        Self {
            last_activity_ms: 0,
            last_pointer: Pos2::ZERO,
            grace_ms,
            fade_ms: fade_ms.max(1),
        }
    }

    /// Record this frame's pointer position; movement resets the idle timer.
    pub fn note_pointer(&mut self, now_ms: u64, pointer: Pos2) {
        if pointer != self.last_pointer {
            self.last_activity_ms = now_ms;
        }
        self.last_pointer = pointer;
    }

    fn effective_idle_ms(&self, now_ms: u64) -> u64 {
        now_ms
            .saturating_sub(self.last_activity_ms)
            .saturating_sub(u64::from(self.grace_ms))
    }

    /// Opacity of the whole transport surface.
    ///
    /// `focused` (help panel open, or any control hovered or held) pins the
    /// surface fully opaque regardless of idle time.
    pub fn surface_alpha(&self, now_ms: u64, focused: bool) -> f32 {
        if focused {
            return 1.0;
        }
        let faded = self.effective_idle_ms(now_ms) as f32 / self.fade_ms as f32;
        (1.0 - faded).max(ALPHA_FLOOR)
    }
}
