use avenger_common::types::{GradientStop, StrokeCap, StrokeJoin};
use avenger_geometry::PathSink;
use avenger_image::RgbaImage;
use avenger_text::types::TextAlign;

/// Fill or stroke source with gradients resolved to surface coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum SurfacePaint {
    Color(String),
    LinearGradient {
        start: [f64; 2],
        end: [f64; 2],
        stops: Vec<GradientStop>,
    },
}

/// Immediate-mode 2-D drawing context, modeled on the HTML canvas API.
///
/// Angles are in radians. Paths accumulate through the [`PathSink`]
/// methods until `begin_path` resets them.
pub trait DrawingSurface: PathSink {
    fn fill(&mut self);
    fn stroke(&mut self);
    /// Intersect the clip region with the current path
    fn clip(&mut self);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f64, y: f64);
    fn rotate(&mut self, angle: f64);

    fn set_fill_style(&mut self, paint: SurfacePaint);
    fn set_stroke_style(&mut self, paint: SurfacePaint);
    fn set_global_alpha(&mut self, alpha: f64);
    fn set_line_width(&mut self, width: f64);
    fn set_line_cap(&mut self, cap: StrokeCap);
    fn set_line_join(&mut self, join: StrokeJoin);
    fn set_miter_limit(&mut self, limit: f64);
    fn set_line_dash(&mut self, dash: &[f64]);
    fn set_line_dash_offset(&mut self, offset: f64);

    /// CSS font shorthand, as built by `FontSpec::to_css`
    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: TextAlign);
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
    fn stroke_text(&mut self, text: &str, x: f64, y: f64);
    /// Width of `text` in the current font
    fn measure_text(&mut self, text: &str) -> f64;

    fn draw_image(&mut self, image: &RgbaImage, x: f64, y: f64, width: f64, height: f64);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
}
