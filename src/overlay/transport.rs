//! Transport control surface drawn over the video during playback.
//!
//! One tick per rendered frame: layout is re-derived from the window rect,
//! the pointer is hit-tested against the seek bar, volume bar and buttons,
//! and the commands the user issued this frame come back as
//! [`TransportEvent`]s for the host to apply.

use egui::{pos2, Align2, Color32, FontId, Painter, Pos2, Rect};
use tracing::debug;

use crate::config::TransportSettings;
use crate::overlay::interaction::IdleTracker;
use crate::overlay::widgets::{overlay_button, PointerInput, SeekBar, VolumeBar};
use crate::overlay::OverlayError;
use crate::shared::playback::{format_frame_time, PlaybackStatus};

/// One-shot commands emitted by the control surface for the host to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportEvent {
    /// `PlaybackStatus::target_frame` was set; perform the seek.
    SeekRequested,
    /// The shared volume changed to this level (0-100).
    VolumeChanged(i32),
    /// The user asked to toggle fullscreen.
    FullscreenToggled,
}

pub const BUTTON_SIZE: f32 = 54.0;

const GLYPH_JUMP_BACK: &str = "⏮";
const GLYPH_STEP_BACK: &str = "⏪";
const GLYPH_STEP_FORWARD: &str = "⏩";
const GLYPH_JUMP_FORWARD: &str = "⏭";
const GLYPH_VOLUME_ON: &str = "🔊";
const GLYPH_VOLUME_OFF: &str = "🔇";
const GLYPH_HELP: &str = "❓";
const GLYPH_FULLSCREEN: &str = "⛶";

/// Per-frame layout of the control surface, derived from the window rect.
/// Nothing here is cached between frames.
#[derive(Debug)]
struct TransportLayout {
    /// Bottom strip whose horizontal span maps onto the frame range.
    seek_track: Rect,
    /// Pointer-sensitive band above the drawn track line.
    seek_hover: Rect,
    jump_back: Rect,
    step_back: Rect,
    step_forward: Rect,
    jump_forward: Rect,
    mute: Rect,
    volume: Rect,
    help: Rect,
    fullscreen: Rect,
    time_text: Pos2,
    /// Vertical extent of the hover tooltip band above the button row.
    tooltip_top: f32,
    tooltip_bottom: f32,
    right_edge: f32,
}

impl TransportLayout {
    fn new(screen: Rect) -> Self {
        let left = screen.left();
        let right = screen.right();
        let bottom = screen.bottom();

        let button = |x: f32| {
            Rect::from_min_size(
                pos2(x, bottom - 62.0),
                egui::vec2(BUTTON_SIZE, BUTTON_SIZE),
            )
        };

        Self {
            seek_track: Rect::from_min_max(pos2(left, bottom - 70.0), screen.max),
            seek_hover: Rect::from_min_max(
                pos2(left + 5.0, bottom - 95.0),
                pos2(right - 5.0, bottom - 70.0),
            ),
            jump_back: button(left),
            step_back: button(left + BUTTON_SIZE),
            step_forward: button(left + BUTTON_SIZE * 2.0),
            jump_forward: button(left + BUTTON_SIZE * 3.0),
            mute: button(left + BUTTON_SIZE * 4.0),
            volume: Rect::from_min_max(
                pos2(left + BUTTON_SIZE * 5.0, bottom - 50.0),
                pos2(left + BUTTON_SIZE * 5.0 + 80.0, bottom - 32.0),
            ),
            help: button(right - BUTTON_SIZE * 2.0),
            fullscreen: button(right - BUTTON_SIZE),
            time_text: pos2(left + 380.0, bottom - 50.0),
            tooltip_top: bottom - 150.0,
            tooltip_bottom: bottom - 96.0,
            right_edge: right,
        }
    }

    /// Whether the pointer is over any interactive control this frame.
    fn hovers_any(&self, pointer: Option<Pos2>) -> bool {
        let Some(p) = pointer else {
            return false;
        };
        [
            self.seek_hover,
            self.jump_back,
            self.step_back,
            self.step_forward,
            self.jump_forward,
            self.mute,
            self.volume,
            self.help,
            self.fullscreen,
        ]
        .iter()
        .any(|rect| rect.contains(p))
    }
}

/// Interactive transport control surface: seek bar, step/jump buttons,
/// volume control, help panel.
pub struct TransportControls {
    settings: TransportSettings,
    seek_bar: SeekBar,
    volume_bar: VolumeBar,
    idle: IdleTracker,
    show_help: bool,
    /// Seek bar scratch value: mirrors the engine position until a drag takes
    /// over, then holds the drag position until release commits it.
    seek_frame: i32,
    /// Last nonzero volume, restored on un-mute. Zero means none recorded.
    prev_volume: i32,
}

impl TransportControls {
    pub fn new(settings: TransportSettings) -> Self {
        let idle = IdleTracker::new(settings.idle_grace_ms, settings.idle_fade_ms);
        Self {
            settings,
            seek_bar: SeekBar::default(),
            volume_bar: VolumeBar::default(),
            idle,
            show_help: false,
            seek_frame: 0,
            prev_volume: 0,
        }
    }

    /// Tick and paint the control surface for this frame.
    ///
    /// Render-thread-only; call exactly once per frame while in playback
    /// mode. `playback` and `volume` are owned by the playback/audio engines;
    /// they are mutated in place and the corresponding [`TransportEvent`]s
    /// tell the host what to apply.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        now_ms: u64,
        playback: &mut PlaybackStatus,
        volume: &mut i32,
    ) -> Result<Vec<TransportEvent>, OverlayError> {
        if !playback.is_initialized() {
            return Err(OverlayError::PlaybackNotInitialized {
                last_frame: playback.last_frame,
            });
        }

        let screen = ctx.screen_rect();
        let layout = TransportLayout::new(screen);
        let input = PointerInput::from_ctx(ctx);
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("transport-controls"),
        ));

        if let Some(pos) = input.pos {
            self.idle.note_pointer(now_ms, pos);
        }
        let focused = self.show_help
            || self.seek_bar.is_held()
            || self.volume_bar.is_held()
            || layout.hovers_any(input.pos);
        let alpha = self.idle.surface_alpha(now_ms, focused);

        let mut events = Vec::new();

        // Seek bar. Outside a drag it tracks the engine position (or the
        // in-flight target while a seek settles).
        if !self.seek_bar.is_held() {
            self.seek_frame = playback.display_frame();
        }
        let seek = self.seek_bar.show(
            &painter,
            screen,
            layout.seek_track,
            layout.seek_hover,
            &input,
            &mut self.seek_frame,
            playback.first_frame,
            playback.last_frame,
            playback.first_frame,
            self.settings.fps,
            alpha,
        );
        if seek.released {
            playback.target_frame = self.seek_frame;
            events.push(TransportEvent::SeekRequested);
            debug!(target_frame = self.seek_frame, "seek bar released");
        }

        // Step/jump buttons, left to right.
        let step = self.settings.step_frames;
        let jump = self.settings.jump_frames;
        let step_secs = step / self.settings.fps.max(1) as i32;
        let jump_secs = jump / self.settings.fps.max(1) as i32;
        let seek_buttons = [
            (layout.jump_back, GLYPH_JUMP_BACK, -jump, "Jump Back (Shift + Left Arrow)"),
            (layout.step_back, GLYPH_STEP_BACK, -step, "Step Back (Left Arrow)"),
            (layout.step_forward, GLYPH_STEP_FORWARD, step, "Step Forward (Right Arrow)"),
            (layout.jump_forward, GLYPH_JUMP_FORWARD, jump, "Jump Forward (Shift + Right Arrow)"),
        ];
        for (rect, glyph, offset, label) in seek_buttons {
            let response = overlay_button(&painter, rect, glyph, &input, alpha);
            if response.pressed {
                offset_seek(playback, offset, &mut events);
            }
            if response.hovered {
                self.tooltip(&painter, &layout, rect.min.x, label);
            }
        }

        // Mute toggle with last-nonzero-volume memory.
        let mute_glyph = if *volume == 0 {
            GLYPH_VOLUME_OFF
        } else {
            GLYPH_VOLUME_ON
        };
        if overlay_button(&painter, layout.mute, mute_glyph, &input, alpha).pressed {
            if *volume == 0 {
                *volume = if self.prev_volume == 0 {
                    self.settings.default_unmute_volume
                } else {
                    self.prev_volume
                };
            } else {
                self.prev_volume = *volume;
                *volume = 0;
            }
            events.push(TransportEvent::VolumeChanged(*volume));
            debug!(volume = *volume, "mute toggled");
        }

        // Volume bar: continuous commit.
        let vol = self
            .volume_bar
            .show(&painter, layout.volume, &input, volume, 0, 100, alpha);
        if vol.changed {
            events.push(TransportEvent::VolumeChanged(*volume));
        }

        // Help toggle and panel.
        let help = overlay_button(&painter, layout.help, GLYPH_HELP, &input, alpha);
        if help.pressed {
            self.show_help = !self.show_help;
        }
        if self.show_help {
            self.help_panel(&painter, screen, step_secs, jump_secs, alpha);
        }
        if help.hovered {
            self.tooltip(&painter, &layout, layout.help.min.x, "View Help");
        }

        // Fullscreen.
        let fullscreen = overlay_button(&painter, layout.fullscreen, GLYPH_FULLSCREEN, &input, alpha);
        if fullscreen.pressed {
            events.push(TransportEvent::FullscreenToggled);
        }
        if fullscreen.hovered {
            self.tooltip(
                &painter,
                &layout,
                layout.fullscreen.min.x,
                "Toggle Fullscreen (Alt + Enter)",
            );
        }

        // Position readout: current / total.
        let position = format_frame_time(
            playback.current_frame,
            playback.first_frame,
            self.settings.fps,
        );
        let total = format_frame_time(
            playback.last_frame,
            playback.first_frame,
            self.settings.fps,
        );
        painter.text(
            layout.time_text,
            Align2::LEFT_TOP,
            format!("{position} / {total}"),
            FontId::proportional(14.0),
            Color32::WHITE.gamma_multiply(alpha),
        );

        Ok(events)
    }

    /// Label box above the button row naming the hovered action, pulled back
    /// inside the window for the right-aligned buttons.
    fn tooltip(&self, painter: &Painter, layout: &TransportLayout, anchor_x: f32, text: &str) {
        let x = anchor_x.clamp(5.0, (layout.right_edge - 405.0).max(5.0));
        let rect = Rect::from_min_max(
            pos2(x, layout.tooltip_top),
            pos2(x + 400.0, layout.tooltip_bottom),
        );
        painter.rect_filled(rect, 0.0, Color32::from_black_alpha(230));
        painter.text(
            rect.min + egui::vec2(10.0, 10.0),
            Align2::LEFT_TOP,
            text,
            FontId::proportional(14.0),
            Color32::WHITE,
        );
    }

    fn help_panel(
        &self,
        painter: &Painter,
        screen: Rect,
        step_secs: i32,
        jump_secs: i32,
        alpha: f32,
    ) {
        let right = screen.right();
        let bottom = screen.bottom();
        let rect = Rect::from_min_max(
            pos2(right - 600.0, bottom - 416.0),
            pos2(right - 50.0, bottom - 96.0),
        );
        painter.rect_filled(
            rect,
            0.0,
            Color32::from_black_alpha((204.0 * alpha) as u8),
        );

        let lines = [
            "Play/Pause: Spacebar".to_string(),
            format!("Step Back ({step_secs}s): Left Arrow"),
            format!("Step Forward ({step_secs}s): Right Arrow"),
            format!("Jump Back ({jump_secs}s): Shift + Left Arrow"),
            format!("Jump Forward ({jump_secs}s): Shift + Right Arrow"),
            "Frame Advance: Period".to_string(),
            "Big jumps may take several seconds.".to_string(),
        ];
        for (i, line) in lines.iter().enumerate() {
            painter.text(
                pos2(rect.min.x + 20.0, rect.min.y + 30.0 + i as f32 * 40.0),
                Align2::LEFT_TOP,
                line,
                FontId::proportional(14.0),
                Color32::WHITE,
            );
        }
    }
}

/// Shared one-shot seek path for the step/jump buttons: ignored while a seek
/// is already pending, otherwise sets the target and requests the seek
/// immediately.
fn offset_seek(playback: &mut PlaybackStatus, offset: i32, events: &mut Vec<TransportEvent>) {
    if playback.has_pending_seek() {
        return;
    }
    playback.target_frame = playback.current_frame + offset;
    events.push(TransportEvent::SeekRequested);
    debug!(
        target_frame = playback.target_frame,
        offset, "transport button seek"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TransportSettings;
    use crate::shared::playback::TARGET_FRAME_UNSET;
    use egui::{vec2, Event, Modifiers, PointerButton, RawInput};

    const WIDTH: f32 = 800.0;
    const HEIGHT: f32 = 600.0;

    struct Harness {
        ctx: egui::Context,
        controls: TransportControls,
        playback: PlaybackStatus,
        volume: i32,
        now_ms: u64,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                ctx: egui::Context::default(),
                controls: TransportControls::new(TransportSettings::default()),
                playback: PlaybackStatus::new(0, 1000),
                volume: 80,
                now_ms: 0,
            }
        }

        /// Run one frame with the given input events; returns the transport
        /// events the surface emitted.
        fn frame(&mut self, events: Vec<Event>) -> Vec<TransportEvent> {
            let raw = RawInput {
                screen_rect: Some(Rect::from_min_size(Pos2::ZERO, vec2(WIDTH, HEIGHT))),
                events,
                ..Default::default()
            };
            self.now_ms += 16;
            let mut out = Vec::new();
            let controls = &mut self.controls;
            let playback = &mut self.playback;
            let volume = &mut self.volume;
            let now_ms = self.now_ms;
            let _ = self.ctx.run(raw, |ctx| {
                out = controls.show(ctx, now_ms, playback, volume).unwrap();
            });
            out
        }

        fn move_to(&mut self, pos: Pos2) -> Vec<TransportEvent> {
            self.frame(vec![Event::PointerMoved(pos)])
        }

        fn press_at(&mut self, pos: Pos2) -> Vec<TransportEvent> {
            self.frame(vec![
                Event::PointerMoved(pos),
                Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed: true,
                    modifiers: Modifiers::default(),
                },
            ])
        }

        fn release_at(&mut self, pos: Pos2) -> Vec<TransportEvent> {
            self.frame(vec![Event::PointerButton {
                pos,
                button: PointerButton::Primary,
                pressed: false,
                modifiers: Modifiers::default(),
            }])
        }

        fn click(&mut self, pos: Pos2) -> Vec<TransportEvent> {
            let pressed = self.press_at(pos);
            let released = self.release_at(pos);
            assert!(released.is_empty(), "release emitted {released:?}");
            pressed
        }
    }

    // Layout landmarks for an 800x600 window.
    fn seek_band(x: f32) -> Pos2 {
        pos2(x, HEIGHT - 85.0)
    }
    fn step_forward_button() -> Pos2 {
        pos2(BUTTON_SIZE * 2.5, HEIGHT - 35.0)
    }
    fn mute_button() -> Pos2 {
        pos2(BUTTON_SIZE * 4.5, HEIGHT - 35.0)
    }
    fn volume_bar_at(t: f32) -> Pos2 {
        pos2(BUTTON_SIZE * 5.0 + 80.0 * t, HEIGHT - 41.0)
    }

    #[test]
    fn test_uninitialized_playback_fails_fast() {
        let mut harness = Harness::new();
        harness.playback = PlaybackStatus::new(0, 0);

        let raw = RawInput {
            screen_rect: Some(Rect::from_min_size(Pos2::ZERO, vec2(WIDTH, HEIGHT))),
            ..Default::default()
        };
        let controls = &mut harness.controls;
        let playback = &mut harness.playback;
        let volume = &mut harness.volume;
        let _ = harness.ctx.run(raw, |ctx| {
            let result = controls.show(ctx, 0, playback, volume);
            assert!(matches!(
                result,
                Err(OverlayError::PlaybackNotInitialized { .. })
            ));
        });
    }

    #[test]
    fn test_seek_drag_commits_once_on_release() {
        let mut harness = Harness::new();
        harness.playback.current_frame = 100;

        // Hover, press at 40% of the width, drag to 20%.
        assert!(harness.move_to(seek_band(320.0)).is_empty());
        assert!(harness.press_at(seek_band(320.0)).is_empty());
        assert!(harness.move_to(seek_band(160.0)).is_empty());

        let events = harness.release_at(seek_band(160.0));
        assert_eq!(events, vec![TransportEvent::SeekRequested]);
        assert_eq!(harness.playback.target_frame, 200);

        // Nothing further once the drag is over.
        assert!(harness.move_to(seek_band(400.0)).is_empty());
    }

    #[test]
    fn test_seek_drag_beyond_bounds_clamps() {
        let mut harness = Harness::new();

        harness.press_at(seek_band(400.0));
        // Drag far left of the window; t clamps to 0.
        harness.move_to(pos2(-200.0, 300.0));
        let events = harness.release_at(pos2(-200.0, 300.0));
        assert_eq!(events, vec![TransportEvent::SeekRequested]);
        assert_eq!(harness.playback.target_frame, 0);
    }

    #[test]
    fn test_seek_value_does_not_move_without_button() {
        let mut harness = Harness::new();
        harness.playback.current_frame = 500;

        // Hovering alone must not touch the target.
        harness.move_to(seek_band(100.0));
        assert_eq!(harness.playback.target_frame, TARGET_FRAME_UNSET);
    }

    #[test]
    fn test_step_forward_button_seeks_immediately() {
        let mut harness = Harness::new();
        harness.playback.current_frame = 100;

        let events = harness.click(step_forward_button());
        assert_eq!(events, vec![TransportEvent::SeekRequested]);
        assert_eq!(harness.playback.target_frame, 400);
    }

    #[test]
    fn test_buttons_ignored_while_seek_pending() {
        let mut harness = Harness::new();
        harness.playback.current_frame = 100;
        harness.playback.target_frame = 700;

        let events = harness.click(step_forward_button());
        assert!(events.is_empty());
        assert_eq!(harness.playback.target_frame, 700);
    }

    #[test]
    fn test_volume_drag_commits_continuously_but_once_per_change() {
        let mut harness = Harness::new();

        let events = harness.press_at(volume_bar_at(0.5));
        assert_eq!(events, vec![TransportEvent::VolumeChanged(50)]);
        assert_eq!(harness.volume, 50);

        // Same position, button still down: no new event.
        assert!(harness.move_to(volume_bar_at(0.5)).is_empty());

        // New position: exactly one more event.
        let events = harness.move_to(volume_bar_at(0.75));
        assert_eq!(events, vec![TransportEvent::VolumeChanged(75)]);

        assert!(harness.release_at(volume_bar_at(0.75)).is_empty());
    }

    #[test]
    fn test_volume_drag_outside_bar_clamps() {
        let mut harness = Harness::new();

        harness.press_at(volume_bar_at(0.5));
        // Drag right past the end of the bar.
        let events = harness.move_to(pos2(WIDTH, HEIGHT - 41.0));
        assert_eq!(events, vec![TransportEvent::VolumeChanged(100)]);
        harness.release_at(pos2(WIDTH, HEIGHT - 41.0));
        assert_eq!(harness.volume, 100);
    }

    #[test]
    fn test_mute_toggle_remembers_volume() {
        let mut harness = Harness::new();
        harness.volume = 45;

        let events = harness.click(mute_button());
        assert_eq!(events, vec![TransportEvent::VolumeChanged(0)]);
        assert_eq!(harness.volume, 0);

        let events = harness.click(mute_button());
        assert_eq!(events, vec![TransportEvent::VolumeChanged(45)]);
        assert_eq!(harness.volume, 45);
    }

    #[test]
    fn test_unmute_without_memory_uses_default() {
        let mut harness = Harness::new();
        harness.volume = 0;

        let events = harness.click(mute_button());
        assert_eq!(events, vec![TransportEvent::VolumeChanged(30)]);
        assert_eq!(harness.volume, 30);
    }

    #[test]
    fn test_fullscreen_button_emits_toggle() {
        let mut harness = Harness::new();
        let events = harness.click(pos2(WIDTH - BUTTON_SIZE * 0.5, HEIGHT - 35.0));
        assert_eq!(events, vec![TransportEvent::FullscreenToggled]);
    }

    #[test]
    fn test_help_button_toggles_panel_without_events() {
        let mut harness = Harness::new();
        let help_pos = pos2(WIDTH - BUTTON_SIZE * 1.5, HEIGHT - 35.0);

        assert!(harness.click(help_pos).is_empty());
        assert!(harness.controls.show_help);

        assert!(harness.click(help_pos).is_empty());
        assert!(!harness.controls.show_help);
    }
}
