//! Overlay Presentation Layer
//!
//! Transient on-screen messages and the playback transport control surface,
//! drawn directly over the host's rendered frames. The host render loop owns
//! the graphics context and calls in once per frame: [`Overlay::draw_messages`]
//! every frame, [`Overlay::draw_transport_controls`] while in playback mode.
//!
//! Both draw calls are render-thread-only. The message store handle returned
//! by [`Overlay::messages`] may be used from any thread.

pub mod interaction;
pub mod messages;
pub mod transport;
pub mod widgets;

use std::sync::Arc;

use egui::{FontId, RichText};
use thiserror::Error;
use tracing::info;

use crate::config::OverlayConfig;
use crate::shared::clock::{Clock, MonotonicClock};
use crate::shared::playback::PlaybackStatus;
use messages::MessageStore;
use transport::TransportControls;

pub use transport::TransportEvent;

/// Errors surfaced by the overlay's per-frame entry points.
#[derive(Debug, Error)]
pub enum OverlayError {
    /// The transport controls were drawn before the host initialized the
    /// shared playback status.
    #[error("playback status not initialized (last_frame = {last_frame})")]
    PlaybackNotInitialized { last_frame: i32 },
}

/// The overlay layer: message store, transport controls, and the clock they
/// share.
pub struct Overlay {
    config: OverlayConfig,
    store: Arc<MessageStore>,
    transport: TransportControls,
    clock: Arc<dyn Clock>,
}

impl Overlay {
    /// Create an overlay running off real (monotonic) time.
    pub fn new(config: OverlayConfig) -> Self {
        Self::with_clock(config, Arc::new(MonotonicClock::new()))
    }

    /// Create an overlay running off the supplied clock. Hosts that slave
    /// overlay time to media time pass their own [`Clock`] here.
    pub fn with_clock(config: OverlayConfig, clock: Arc<dyn Clock>) -> Self {
        info!("overlay created");
        Self {
            store: Arc::new(MessageStore::new(
                clock.clone(),
                config.messages.fade_window_ms,
            )),
            transport: TransportControls::new(config.transport.clone()),
            config,
            clock,
        }
    }

    /// Cloneable handle for posting messages from any thread.
    pub fn messages(&self) -> Arc<MessageStore> {
        self.store.clone()
    }

    /// Sweep expired messages and paint the survivors, stacked from the
    /// top-left margin.
    ///
    /// Render-thread-only; call exactly once per frame. The expiry sweep runs
    /// even while message drawing is disabled in the config.
    pub fn draw_messages(&self, ctx: &egui::Context) {
        let draws = self.store.sweep();
        if !self.config.messages.enabled || draws.is_empty() {
            return;
        }

        let settings = &self.config.messages;
        let origin =
            ctx.screen_rect().min + egui::vec2(settings.left_margin, settings.top_margin);

        egui::Area::new(egui::Id::new("osd-messages"))
            .fixed_pos(origin)
            .order(egui::Order::Foreground)
            .interactable(false)
            .show(ctx, |ui| {
                ui.spacing_mut().item_spacing.y = settings.padding;
                for draw in &draws {
                    egui::Frame::none()
                        .fill(egui::Color32::from_black_alpha(166).gamma_multiply(draw.alpha))
                        .rounding(egui::Rounding::same(4.0))
                        .inner_margin(egui::Margin::same(4.0))
                        .show(ui, |ui| {
                            ui.label(
                                RichText::new(&draw.text)
                                    .color(draw.color.gamma_multiply(draw.alpha))
                                    .font(FontId::proportional(14.0)),
                            );
                        });
                }
            });
    }

    /// Tick and paint the transport control surface, returning the commands
    /// the user issued this frame.
    ///
    /// Render-thread-only; call exactly once per frame while in playback
    /// mode. Returns [`OverlayError::PlaybackNotInitialized`] when `playback`
    /// has no usable frame range yet.
    pub fn draw_transport_controls(
        &mut self,
        ctx: &egui::Context,
        playback: &mut PlaybackStatus,
        volume: &mut i32,
    ) -> Result<Vec<TransportEvent>, OverlayError> {
        self.transport
            .show(ctx, self.clock.now_ms(), playback, volume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::messages::{color, MessageKind};
    use crate::shared::clock::ManualClock;
    use egui::{vec2, Pos2, RawInput, Rect};

    fn run_frame(ctx: &egui::Context, overlay: &Overlay) {
        let raw = RawInput {
            screen_rect: Some(Rect::from_min_size(Pos2::ZERO, vec2(800.0, 600.0))),
            ..Default::default()
        };
        let _ = ctx.run(raw, |ctx| overlay.draw_messages(ctx));
    }

    #[test]
    fn test_draw_messages_sweeps_expired() {
        let clock = Arc::new(ManualClock::new(0));
        let overlay = Overlay::with_clock(OverlayConfig::default(), clock.clone());
        let ctx = egui::Context::default();

        let store = overlay.messages();
        store.add_message("hello", 2000, color::GREEN);
        store.add_typed_message(MessageKind::SeekStatus, "Seeking...", 2000, color::RED);

        run_frame(&ctx, &overlay);
        assert_eq!(store.len(), 2);

        clock.set(3000);
        run_frame(&ctx, &overlay);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_sweep_runs_while_drawing_disabled() {
        let clock = Arc::new(ManualClock::new(0));
        let mut config = OverlayConfig::default();
        config.messages.enabled = false;
        let overlay = Overlay::with_clock(config, clock.clone());
        let ctx = egui::Context::default();

        overlay.messages().add_message("hidden", 1000, color::GREEN);
        clock.set(1000);
        run_frame(&ctx, &overlay);
        assert!(overlay.messages().is_empty());
    }

    #[test]
    fn test_clear_then_draw_emits_nothing() {
        let clock = Arc::new(ManualClock::new(0));
        let overlay = Overlay::with_clock(OverlayConfig::default(), clock);
        let store = overlay.messages();

        store.add_message("a", 60_000, color::GREEN);
        store.add_typed_message(MessageKind::VolumeLevel, "b", 60_000, color::CYAN);
        store.clear_messages();

        assert!(store.sweep().is_empty());
    }
}
