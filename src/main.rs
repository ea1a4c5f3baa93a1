//! Demo host for the playback overlay
//!
//! A fake playback engine (a frame counter advancing in real time, with a
//! short artificial seek latency) rendered with eframe, with the overlay
//! drawn on top. Exercises messages, the seek bar, the transport buttons and
//! the volume control end to end.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use eframe::egui;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use playback_overlay::overlay::messages::{color, duration, MessageKind};
use playback_overlay::{
    load_config, Overlay, OverlayConfig, PlaybackStatus, TransportEvent, TARGET_FRAME_UNSET,
};

/// Demo host for the playback overlay
#[derive(Parser, Debug)]
#[command(name = "playback-overlay")]
#[command(about = "Fake playback engine with the transport overlay drawn on top")]
struct Args {
    /// Length of the fake recording, in seconds
    #[arg(long, default_value = "120")]
    seconds: u32,

    /// Playback rate in frames per second
    #[arg(long, default_value = "60")]
    fps: u32,

    /// Path to a TOML config file (defaults to the user config dir)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = load_or_create_config(args.config.as_deref());
    config.transport.fps = args.fps;

    let app = DemoApp::new(config, &args);

    info!(
        seconds = args.seconds,
        fps = args.fps,
        "starting playback overlay demo"
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([960.0, 540.0]),
        ..Default::default()
    };
    eframe::run_native(
        "playback-overlay demo",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))?;

    Ok(())
}

/// Load configuration from an explicit path or the user config dir, falling
/// back to defaults.
fn load_or_create_config(path: Option<&Path>) -> OverlayConfig {
    let resolved = path.map(PathBuf::from).or_else(|| {
        directories::ProjectDirs::from("", "", "playback-overlay")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    });

    if let Some(config_path) = resolved {
        if config_path.exists() {
            match load_config(&config_path) {
                Ok(config) => {
                    info!("loaded configuration from {:?}", config_path);
                    return config;
                }
                Err(e) => warn!("failed to load {:?}: {e}", config_path),
            }
        }
    }
    info!("using default configuration");
    OverlayConfig::default()
}

/// Frames of artificial latency before an in-flight seek "lands".
const SEEK_LATENCY_FRAMES: u32 = 12;

struct DemoApp {
    overlay: Overlay,
    playback: PlaybackStatus,
    volume: i32,
    fullscreen: bool,
    seek_latency: u32,
}

impl DemoApp {
    fn new(config: OverlayConfig, args: &Args) -> Self {
        let last_frame = (args.seconds.saturating_mul(args.fps)) as i32;
        let overlay = Overlay::new(config);

        // Demo producer: another thread posting messages through the shared
        // store handle, the way an engine thread would.
        let store = overlay.messages();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_secs(1));
            store.add_typed_message(
                MessageKind::PlaybackInfo,
                "Playback started",
                duration::NORMAL,
                color::GREEN,
            );
            std::thread::sleep(Duration::from_secs(2));
            store.add_message(
                "Drag the bottom bar to seek; the ? button shows shortcuts",
                duration::VERY_LONG,
                color::YELLOW,
            );
        });

        Self {
            overlay,
            playback: PlaybackStatus::new(0, last_frame),
            volume: 80,
            fullscreen: false,
            seek_latency: 0,
        }
    }

    /// Advance the fake engine by one rendered frame.
    fn step_engine(&mut self) {
        if self.playback.has_pending_seek() {
            if self.seek_latency > 0 {
                self.seek_latency -= 1;
                return;
            }
            self.playback.current_frame = self
                .playback
                .target_frame
                .clamp(self.playback.first_frame, self.playback.last_frame);
            self.playback.target_frame = TARGET_FRAME_UNSET;
            self.overlay.messages().add_typed_message(
                MessageKind::SeekStatus,
                "Seek complete",
                duration::SHORT,
                color::GREEN,
            );
        } else if self.playback.current_frame < self.playback.last_frame {
            self.playback.current_frame += 1;
        }
    }

    fn apply(&mut self, ctx: &egui::Context, event: TransportEvent) {
        match event {
            TransportEvent::SeekRequested => {
                self.seek_latency = SEEK_LATENCY_FRAMES;
                info!(target = self.playback.target_frame, "seek requested");
                self.overlay.messages().add_typed_message(
                    MessageKind::SeekStatus,
                    "Seeking...",
                    duration::VERY_LONG,
                    color::RED,
                );
            }
            TransportEvent::VolumeChanged(level) => {
                self.overlay.messages().add_typed_message(
                    MessageKind::VolumeLevel,
                    format!("Volume: {level}%"),
                    duration::SHORT,
                    color::CYAN,
                );
            }
            TransportEvent::FullscreenToggled => {
                self.fullscreen = !self.fullscreen;
                ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(self.fullscreen));
            }
        }
    }
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.step_engine();

        // The "video": a frame counter on a dark background.
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::from_gray(18)))
            .show(ctx, |ui| {
                let center = ui.max_rect().center();
                ui.painter().text(
                    center,
                    egui::Align2::CENTER_CENTER,
                    format!("frame {}", self.playback.current_frame),
                    egui::FontId::monospace(48.0),
                    egui::Color32::from_gray(90),
                );
            });

        self.overlay.draw_messages(ctx);
        match self
            .overlay
            .draw_transport_controls(ctx, &mut self.playback, &mut self.volume)
        {
            Ok(events) => {
                for event in events {
                    self.apply(ctx, event);
                }
            }
            Err(e) => warn!("transport controls unavailable: {e}"),
        }

        ctx.request_repaint();
    }
}
