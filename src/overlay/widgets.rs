//! Custom egui widgets for the transport surface
//!
//! Direct-manipulation controls painted straight onto a layer painter: the
//! seek bar, the volume bar, and the bare-glyph overlay buttons. Hit-testing
//! is done explicitly against per-frame layout rects rather than through
//! egui's widget interaction, so the interactive region of a control can
//! differ from what it draws (the seek bar's hover band sits above its
//! track line).

use egui::{pos2, Align2, Color32, FontId, Painter, Pos2, Rect, Stroke};

use crate::overlay::interaction::{DragState, DragTransition};
use crate::shared::playback::format_frame_time;

/// Slider orientation. Vertical sliders invert `t` so "up" maps to larger
/// values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderAxis {
    Horizontal,
    Vertical,
}

/// Value-mapping curve along a slider's axis.
///
/// `Power` applies a nonlinear ramp over non-negative ranges. No shipped
/// control uses it; every call site passes `Linear`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SliderCurve {
    Linear,
    Power(f32),
}

/// Map a normalized position `t` to an integer value in `[v_min, v_max]`,
/// rounded to nearest.
pub fn slider_value(t: f32, v_min: i32, v_max: i32, curve: SliderCurve) -> i32 {
    let t = t.clamp(0.0, 1.0);
    match curve {
        SliderCurve::Linear => lerp_i32(v_min, v_max, t),
        SliderCurve::Power(power) => {
            let a = t.powf(power);
            lerp_i32(v_min.max(0), v_max, a)
        }
    }
}

/// Inverse of [`slider_value`]: the normalized grab position for `value`.
pub fn slider_ratio(value: i32, v_min: i32, v_max: i32, curve: SliderCurve) -> f32 {
    if v_min == v_max {
        return 0.0;
    }
    match curve {
        SliderCurve::Linear => {
            (value.saturating_sub(v_min) as f32 / (v_max - v_min) as f32).clamp(0.0, 1.0)
        }
        SliderCurve::Power(power) => {
            let lo = v_min.max(0);
            let a = (value.saturating_sub(lo) as f32 / (v_max - lo) as f32).clamp(0.0, 1.0);
            a.powf(1.0 / power)
        }
    }
}

fn lerp_i32(lo: i32, hi: i32, t: f32) -> i32 {
    (lo as f32 + (hi as f32 - lo as f32) * t).round() as i32
}

fn lerp_f32(lo: f32, hi: f32, t: f32) -> f32 {
    lo + (hi - lo) * t
}

/// Normalized pointer position along `axis` within `[span_min, span_max]`,
/// clamped to `[0, 1]` and inverted for the vertical axis.
pub(crate) fn pointer_t(axis: SliderAxis, span_min: f32, span_max: f32, pointer: f32) -> f32 {
    let size = span_max - span_min;
    let mut t = if size > 0.0 {
        ((pointer - span_min) / size).clamp(0.0, 1.0)
    } else {
        0.0
    };
    if axis == SliderAxis::Vertical {
        t = 1.0 - t;
    }
    t
}

/// Per-frame pointer snapshot, read once from the egui context.
#[derive(Debug, Clone, Copy)]
pub struct PointerInput {
    pub pos: Option<Pos2>,
    pub primary_down: bool,
    pub primary_pressed: bool,
}

impl PointerInput {
    pub fn from_ctx(ctx: &egui::Context) -> Self {
        ctx.input(|i| Self {
            pos: i.pointer.latest_pos(),
            primary_down: i.pointer.primary_down(),
            primary_pressed: i.pointer.primary_pressed(),
        })
    }

    pub fn hovers(&self, rect: Rect) -> bool {
        self.pos.is_some_and(|p| rect.contains(p))
    }
}

const TRACK_STROKE: f32 = 8.0;
const GRAB_RADIUS: f32 = 12.0;
const SEEK_COLOR: Color32 = Color32::from_rgb(0, 255, 0);

/// Playback position scrubber spanning the bottom of the window.
///
/// While dragged it only updates the shared frame value for visual feedback;
/// the single seek commit happens at drag release (the caller reads
/// [`SeekBarResponse::released`]).
#[derive(Debug, Default)]
pub struct SeekBar {
    drag: DragState,
}

/// Frame result of a seek bar tick.
#[derive(Debug, Clone, Copy)]
pub struct SeekBarResponse {
    pub hovered: bool,
    pub held: bool,
    /// The drag ended this frame: commit the shared value as the seek target.
    pub released: bool,
}

impl SeekBar {
    pub fn is_held(&self) -> bool {
        self.drag.is_held()
    }

    /// Per-frame tick and paint.
    ///
    /// `track` is the bar's full-width bottom strip whose horizontal span
    /// maps onto `[v_min, v_max]`; `hover_region` is the wider band above the
    /// drawn line that accepts the pointer. `value` is the externally owned
    /// target frame, mutated only while the primary button is down.
    #[allow(clippy::too_many_arguments)]
    pub fn show(
        &mut self,
        painter: &Painter,
        screen: Rect,
        track: Rect,
        hover_region: Rect,
        input: &PointerInput,
        value: &mut i32,
        v_min: i32,
        v_max: i32,
        first_frame: i32,
        fps: u32,
        surface_alpha: f32,
    ) -> SeekBarResponse {
        let hovered = input.hovers(hover_region);
        let was_held = self.drag.is_held();

        // Prospective value under the pointer, used for the preview line and
        // time label even before the button goes down.
        let mut preview_value = *value;
        if hovered || was_held {
            if let Some(pos) = input.pos {
                let t = pointer_t(SliderAxis::Horizontal, track.min.x, track.max.x, pos.x);
                preview_value = slider_value(t, v_min, v_max, SliderCurve::Linear);
                if input.primary_down && preview_value != *value {
                    *value = preview_value;
                }
            }
        }

        let transition = self
            .drag
            .update(hovered, input.primary_down, input.primary_pressed);
        let held = self.drag.is_held();

        let preview_x = lerp_f32(
            track.min.x,
            track.max.x,
            slider_ratio(preview_value, v_min, v_max, SliderCurve::Linear),
        );
        let current_x = lerp_f32(
            track.min.x,
            track.max.x,
            slider_ratio(*value, v_min, v_max, SliderCurve::Linear),
        );
        let line_y = track.min.y - 4.0;

        // Darken the whole frame while scrubbing.
        if held {
            painter.rect_filled(screen, 0.0, Color32::from_black_alpha(153));
        }

        // Bottom panel backdrop.
        painter.rect_filled(
            track,
            0.0,
            Color32::from_black_alpha((191.0 * surface_alpha) as u8),
        );

        // Grey background line.
        painter.line_segment(
            [pos2(track.min.x, line_y), pos2(track.max.x, line_y)],
            Stroke::new(
                TRACK_STROKE,
                Color32::WHITE.gamma_multiply(0.5 * surface_alpha),
            ),
        );

        // Whiter, more opaque line up to the hovered position.
        if hovered && !held {
            painter.line_segment(
                [pos2(track.min.x, line_y), pos2(preview_x, line_y)],
                Stroke::new(TRACK_STROKE, Color32::WHITE.gamma_multiply(surface_alpha)),
            );
        }

        // Floating time label near the hovered/dragged position.
        if hovered || held {
            painter.text(
                pos2(preview_x, track.min.y - 30.0),
                Align2::CENTER_BOTTOM,
                format_frame_time(preview_value, first_frame, fps),
                FontId::proportional(14.0),
                Color32::WHITE,
            );
        }

        if held {
            // Colored line and circular grab handle at the drag position.
            painter.line_segment(
                [pos2(track.min.x, line_y), pos2(preview_x, line_y)],
                Stroke::new(TRACK_STROKE, SEEK_COLOR),
            );
            painter.circle_filled(pos2(preview_x, track.min.y - 2.0), GRAB_RADIUS, SEEK_COLOR);
        } else {
            // Progress line up to the current value.
            painter.line_segment(
                [pos2(track.min.x, line_y), pos2(current_x, line_y)],
                Stroke::new(TRACK_STROKE, SEEK_COLOR.gamma_multiply(surface_alpha)),
            );
        }

        SeekBarResponse {
            hovered,
            held,
            released: transition == DragTransition::Released,
        }
    }
}

/// Volume slider with continuous commit: every accepted change is reported
/// the frame it happens.
#[derive(Debug, Default)]
pub struct VolumeBar {
    drag: DragState,
}

/// Frame result of a volume bar tick.
#[derive(Debug, Clone, Copy)]
pub struct VolumeBarResponse {
    pub hovered: bool,
    pub held: bool,
    /// The shared value changed this frame.
    pub changed: bool,
}

impl VolumeBar {
    pub fn is_held(&self) -> bool {
        self.drag.is_held()
    }

    /// Per-frame tick and paint. The interactive region is `bb` itself.
    pub fn show(
        &mut self,
        painter: &Painter,
        bb: Rect,
        input: &PointerInput,
        value: &mut i32,
        v_min: i32,
        v_max: i32,
        surface_alpha: f32,
    ) -> VolumeBarResponse {
        let hovered = input.hovers(bb);
        let was_held = self.drag.is_held();

        let mut changed = false;
        if hovered || was_held {
            if let Some(pos) = input.pos {
                let t = pointer_t(SliderAxis::Horizontal, bb.min.x, bb.max.x, pos.x);
                let new_value = slider_value(t, v_min, v_max, SliderCurve::Linear);
                if input.primary_down && new_value != *value {
                    *value = new_value;
                    changed = true;
                }
            }
        }

        self.drag
            .update(hovered, input.primary_down, input.primary_pressed);
        let held = self.drag.is_held();

        let grab_x = lerp_f32(
            bb.min.x,
            bb.max.x,
            slider_ratio(*value, v_min, v_max, SliderCurve::Linear),
        );
        let line_y = bb.max.y - 5.0;

        // Grey background line.
        painter.line_segment(
            [pos2(bb.min.x, line_y), pos2(bb.max.x, line_y)],
            Stroke::new(
                TRACK_STROKE,
                Color32::WHITE.gamma_multiply(0.5 * surface_alpha),
            ),
        );

        // Filled portion up to the current value.
        painter.line_segment(
            [pos2(bb.min.x, line_y), pos2(grab_x, line_y)],
            Stroke::new(TRACK_STROKE, Color32::WHITE.gamma_multiply(surface_alpha)),
        );

        if held {
            painter.circle_filled(
                pos2(grab_x, line_y),
                GRAB_RADIUS,
                Color32::WHITE.gamma_multiply(surface_alpha),
            );
        }

        VolumeBarResponse {
            hovered,
            held,
            changed,
        }
    }
}

/// Frame result of an overlay button.
#[derive(Debug, Clone, Copy)]
pub struct ButtonResponse {
    pub hovered: bool,
    pub pressed: bool,
}

/// Transparent hit-test button drawn as a bare glyph.
///
/// Fires on primary press while hovered. The glyph renders at full surface
/// alpha when hovered and dimmed otherwise.
pub fn overlay_button(
    painter: &Painter,
    rect: Rect,
    glyph: &str,
    input: &PointerInput,
    surface_alpha: f32,
) -> ButtonResponse {
    let hovered = input.hovers(rect);
    let pressed = hovered && input.primary_pressed;

    let base = Color32::from_gray(230);
    let color = if hovered {
        base.gamma_multiply(surface_alpha)
    } else {
        base.gamma_multiply(0.6 * surface_alpha)
    };
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        glyph,
        FontId::proportional(28.0),
        color,
    );

    ButtonResponse { hovered, pressed }
}
