//! Fixed-order compositing of the release strip.
//!
//! Order is strip, portrait circle, text shadow, text. Every stage is source-over against the
//! accumulated canvas.

use crate::assets::PremulImage;
use crate::composite::{fill_rows, paint_coverage, paste_over};
use crate::foundation::core::Rgba8;
use crate::geometry::StripGeometry;
use crate::layout::GroupLayout;

/// Colors and shadow offset of the strip and label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SplashStyle {
    pub strip_color: Rgba8,
    pub text_color: Rgba8,
    pub shadow_color: Rgba8,
    pub shadow_offset: (i64, i64),
}

impl Default for SplashStyle {
    fn default() -> Self {
        Self {
            strip_color: Rgba8::new(0, 0, 0, 120),
            text_color: Rgba8::new(255, 220, 120, 255),
            shadow_color: Rgba8::new(0, 0, 0, 180),
            shadow_offset: (2, 2),
        }
    }
}

pub fn paint_strip(canvas: &mut PremulImage, geom: &StripGeometry, style: &SplashStyle) {
    fill_rows(
        canvas,
        geom.strip_top,
        geom.strip_height,
        style.strip_color.premul(),
    );
}

pub fn paint_portrait(canvas: &mut PremulImage, circle: &PremulImage, layout: &GroupLayout) {
    paste_over(canvas, circle, layout.x_start, layout.circle_y);
}

pub fn paint_shadow(
    canvas: &mut PremulImage,
    label: &image::GrayImage,
    layout: &GroupLayout,
    style: &SplashStyle,
) {
    let (dx, dy) = style.shadow_offset;
    paint_coverage(
        canvas,
        label,
        style.shadow_color.premul(),
        layout.text_x + dx,
        layout.text_y + dy,
    );
}

pub fn paint_label(
    canvas: &mut PremulImage,
    label: &image::GrayImage,
    layout: &GroupLayout,
    style: &SplashStyle,
) {
    paint_coverage(
        canvas,
        label,
        style.text_color.premul(),
        layout.text_x,
        layout.text_y,
    );
}

/// Run all four stages in order.
pub fn render_strip(
    canvas: &mut PremulImage,
    geom: &StripGeometry,
    layout: &GroupLayout,
    circle: &PremulImage,
    label: &image::GrayImage,
    style: &SplashStyle,
) {
    paint_strip(canvas, geom, style);
    paint_portrait(canvas, circle, layout);
    paint_shadow(canvas, label, layout, style);
    paint_label(canvas, label, layout, style);
}
