use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, StrokeKind, Vec2};

use crate::view::NodeFill;

pub(super) const EDGE_COLOR: Color32 = Color32::from_rgb(0x99, 0x99, 0x99);
pub(super) const EDGE_OPACITY: f32 = 0.6;
pub(super) const SEARCH_RING_COLOR: Color32 = Color32::from_rgb(103, 196, 255);

pub(super) fn fill_color(fill: NodeFill) -> Color32 {
    let [r, g, b] = fill.rgb();
    Color32::from_rgb(r, g, b)
}

/// Scales alpha by a tween opacity in `[0, 1]`.
pub(super) fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    color.gamma_multiply(opacity.clamp(0.0, 1.0))
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_premultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        color.a(),
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::BLACK);
    painter.rect_stroke(
        rect,
        0.0,
        Stroke::new(1.0, Color32::GRAY),
        StrokeKind::Inside,
    );
}

/// The canvas keeps simulation coordinates: its top-left corner is the origin.
pub(super) fn canvas_to_screen(rect: Rect, point: Vec2) -> Pos2 {
    rect.min + point
}

pub(super) fn screen_to_canvas(rect: Rect, screen: Pos2) -> Vec2 {
    screen - rect.min
}
