//! `tiny-skia` implementation of the drawing surface.
//!
//! Path coordinates are mapped to device pixels as they are added, like the
//! HTML canvas, so a transform change between building and painting a path
//! does not move it.

use avenger_common::canvas::CanvasDimensions;
use avenger_common::types::{GradientStop, StrokeCap, StrokeJoin};
use avenger_geometry::sink::circular_arc_to_beziers;
use avenger_geometry::PathSink;
use avenger_image::RgbaImage;
use avenger_scenegraph::surface::{DrawingSurface, SurfacePaint};
use avenger_text::types::TextAlign;
use avenger_text::{CssFont, TextMetrics};
use tiny_skia::{
    BlendMode, Color, ColorU8, FillRule, FilterQuality, LineCap, LineJoin, LinearGradient, Mask,
    Paint, Path, PathBuilder, Pixmap, PixmapPaint, Point, Shader, SpreadMode, Stroke, StrokeDash,
    Transform,
};

use crate::error::AvengerCanvasError;
use crate::surface::CanvasSurface;

const DEFAULT_MITER_LIMIT: f64 = 10.0;

#[derive(Debug, Clone, Copy)]
enum PathCommand {
    MoveTo(f32, f32),
    LineTo(f32, f32),
    QuadTo(f32, f32, f32, f32),
    CubicTo(f32, f32, f32, f32, f32, f32),
    Close,
}

#[derive(Clone)]
struct DrawState {
    transform: Transform,
    fill: SurfacePaint,
    stroke: SurfacePaint,
    alpha: f64,
    line_width: f64,
    line_cap: StrokeCap,
    line_join: StrokeJoin,
    miter_limit: f64,
    dash: Vec<f64>,
    dash_offset: f64,
    font: CssFont,
    text_align: TextAlign,
    clip: Option<Mask>,
}

impl DrawState {
    fn new(transform: Transform) -> Self {
        Self {
            transform,
            fill: SurfacePaint::Color("#000".to_string()),
            stroke: SurfacePaint::Color("#000".to_string()),
            alpha: 1.0,
            line_width: 1.0,
            line_cap: StrokeCap::Butt,
            line_join: StrokeJoin::Miter,
            miter_limit: DEFAULT_MITER_LIMIT,
            dash: Vec::new(),
            dash_offset: 0.0,
            font: CssFont::default(),
            text_align: TextAlign::Left,
            clip: None,
        }
    }
}

/// Raster surface backed by a `tiny_skia::Pixmap`
pub struct PixmapSurface {
    pixmap: Pixmap,
    dimensions: CanvasDimensions,
    state: DrawState,
    stack: Vec<DrawState>,
    path: Vec<PathCommand>,
    current: Option<(f32, f32)>,
    text_metrics: TextMetrics,
}

impl PixmapSurface {
    pub fn new(dimensions: CanvasDimensions) -> Result<Self, AvengerCanvasError> {
        let pixmap = make_pixmap(&dimensions)?;
        Ok(Self {
            pixmap,
            dimensions,
            state: DrawState::new(base_transform(&dimensions)),
            stack: Vec::new(),
            path: Vec::new(),
            current: None,
            text_metrics: default_text_metrics(),
        })
    }

    pub fn with_text_metrics(mut self, text_metrics: TextMetrics) -> Self {
        self.text_metrics = text_metrics;
        self
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Unpremultiplied RGBA of the pixel at `(x, y)`
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Copy of the surface as an unpremultiplied image
    pub fn to_image(&self) -> Option<image::RgbaImage> {
        let data: Vec<u8> = self
            .pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        image::RgbaImage::from_raw(self.pixmap.width(), self.pixmap.height(), data)
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, AvengerCanvasError> {
        self.pixmap
            .encode_png()
            .map_err(|err| AvengerCanvasError::PngEncodingError(err.to_string()))
    }

    fn map(&self, x: f64, y: f64) -> (f32, f32) {
        let t = &self.state.transform;
        let (x, y) = (x as f32, y as f32);
        (t.sx * x + t.kx * y + t.tx, t.ky * x + t.sy * y + t.ty)
    }

    /// Uniform scale of the current transform, applied to line widths
    fn scale_factor(&self) -> f64 {
        let t = &self.state.transform;
        ((t.sx * t.sy - t.kx * t.ky).abs() as f64).sqrt()
    }

    fn push(&mut self, command: PathCommand) {
        self.path.push(command);
    }

    fn build_path(&self) -> Option<Path> {
        let mut builder = PathBuilder::new();
        for command in &self.path {
            match *command {
                PathCommand::MoveTo(x, y) => builder.move_to(x, y),
                PathCommand::LineTo(x, y) => builder.line_to(x, y),
                PathCommand::QuadTo(x1, y1, x, y) => builder.quad_to(x1, y1, x, y),
                PathCommand::CubicTo(x1, y1, x2, y2, x, y) => builder.cubic_to(x1, y1, x2, y2, x, y),
                PathCommand::Close => builder.close(),
            }
        }
        builder.finish()
    }

    fn color(&self, css: &str, alpha: f64) -> Option<Color> {
        match csscolorparser::parse(css) {
            Ok(color) => {
                let [r, g, b, a] = color.to_rgba8();
                let mut color = Color::from_rgba8(r, g, b, a);
                color.apply_opacity(alpha as f32);
                Some(color)
            }
            Err(err) => {
                tracing::warn!("unable to parse color {css:?}: {err}");
                None
            }
        }
    }

    fn paint(&self, source: &SurfacePaint) -> Option<Paint<'static>> {
        let alpha = self.state.alpha;
        let shader = match source {
            SurfacePaint::Color(css) => Shader::SolidColor(self.color(css, alpha)?),
            SurfacePaint::LinearGradient { start, end, stops } => {
                self.gradient_shader(*start, *end, stops, alpha)?
            }
        };
        Some(Paint {
            shader,
            anti_alias: true,
            ..Default::default()
        })
    }

    fn gradient_shader(
        &self,
        start: [f64; 2],
        end: [f64; 2],
        stops: &[GradientStop],
        alpha: f64,
    ) -> Option<Shader<'static>> {
        // Degenerate gradients paint with the last stop color
        let fallback = stops
            .last()
            .and_then(|stop| self.color(&stop.color, alpha));
        let stops: Vec<tiny_skia::GradientStop> = stops
            .iter()
            .filter_map(|stop| {
                let color = self.color(&stop.color, alpha)?;
                Some(tiny_skia::GradientStop::new(stop.offset as f32, color))
            })
            .collect();
        LinearGradient::new(
            Point::from_xy(start[0] as f32, start[1] as f32),
            Point::from_xy(end[0] as f32, end[1] as f32),
            stops,
            SpreadMode::Pad,
            self.state.transform,
        )
        .or_else(|| fallback.map(Shader::SolidColor))
    }

    fn stroke_style(&self) -> Stroke {
        let scale = self.scale_factor();
        let mut stroke = Stroke {
            width: (self.state.line_width * scale) as f32,
            miter_limit: self.state.miter_limit as f32,
            line_cap: match self.state.line_cap {
                StrokeCap::Butt => LineCap::Butt,
                StrokeCap::Round => LineCap::Round,
                StrokeCap::Square => LineCap::Square,
            },
            line_join: match self.state.line_join {
                StrokeJoin::Miter => LineJoin::Miter,
                StrokeJoin::Round => LineJoin::Round,
                StrokeJoin::Bevel => LineJoin::Bevel,
            },
            dash: None,
        };
        if !self.state.dash.is_empty() {
            // Odd dash lists repeat to an even length
            let mut dash: Vec<f32> = self.state.dash.iter().map(|d| (d * scale) as f32).collect();
            if dash.len() % 2 == 1 {
                dash.extend(dash.clone());
            }
            stroke.dash = StrokeDash::new(dash, (self.state.dash_offset * scale) as f32);
        }
        stroke
    }

    /// Device-space rectangle path for `fill_rect` and `clear_rect`
    fn rect_path(&self, x: f64, y: f64, w: f64, h: f64) -> Option<Path> {
        let mut builder = PathBuilder::new();
        let corners = [(x, y), (x + w, y), (x + w, y + h), (x, y + h)];
        for (i, (cx, cy)) in corners.iter().enumerate() {
            let (px, py) = self.map(*cx, *cy);
            if i == 0 {
                builder.move_to(px, py);
            } else {
                builder.line_to(px, py);
            }
        }
        builder.close();
        builder.finish()
    }

    fn image_pixmap(image: &RgbaImage) -> Option<Pixmap> {
        let mut pixmap = Pixmap::new(image.width, image.height)?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.data.chunks_exact(4)) {
            *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
        }
        Some(pixmap)
    }

    #[cfg(feature = "cosmic-text")]
    fn draw_text(&mut self, text: &str, x: f64, y: f64, source: &SurfacePaint) {
        use avenger_text::measurement::cosmic::{make_cosmic_text_buffer, FONT_SYSTEM, SWASH_CACHE};
        use avenger_text::measurement::TextMeasurementConfig;
        use std::sync::PoisonError;

        let css = match source {
            SurfacePaint::Color(css) => css.as_str(),
            SurfacePaint::LinearGradient { stops, .. } => match stops.first() {
                Some(stop) => stop.color.as_str(),
                None => return,
            },
        };
        let Some(color) = self.color(css, self.state.alpha) else {
            return;
        };

        let font = self.state.font.clone();
        let config = TextMeasurementConfig {
            text,
            font: &font.family,
            font_size: font.size,
            font_weight: &font.weight,
            font_style: &font.style,
        };
        let mut font_system = FONT_SYSTEM.lock().unwrap_or_else(PoisonError::into_inner);
        let mut cache = SWASH_CACHE.lock().unwrap_or_else(PoisonError::into_inner);
        let buffer = make_cosmic_text_buffer(&config, &mut font_system);
        let Some(run) = buffer.layout_runs().next() else {
            return;
        };
        let line_y = run.line_y as f64;
        let width = run.line_w as f64;
        let height = (run.line_height as f64).ceil().max(1.0);

        let Some(mut glyphs) = Pixmap::new(width.ceil().max(1.0) as u32, height as u32) else {
            return;
        };
        let (gw, gh) = (glyphs.width() as i32, glyphs.height() as i32);
        let pixels = glyphs.pixels_mut();
        buffer.draw(
            &mut font_system,
            &mut cache,
            cosmic_text::Color::rgba(255, 255, 255, 255),
            |px, py, w, h, coverage| {
                for dy in 0..h as i32 {
                    for dx in 0..w as i32 {
                        let (cx, cy) = (px + dx, py + dy);
                        if cx < 0 || cy < 0 || cx >= gw || cy >= gh {
                            continue;
                        }
                        let mut c = color;
                        c.apply_opacity(coverage.a() as f32 / 255.0);
                        pixels[(cy * gw + cx) as usize] = c.premultiply().to_color_u8();
                    }
                }
            },
        );

        let left = x + self.state.text_align.offset(width);
        let transform = self
            .state
            .transform
            .pre_translate(left as f32, (y - line_y) as f32);
        self.pixmap.draw_pixmap(
            0,
            0,
            glyphs.as_ref(),
            &PixmapPaint::default(),
            transform,
            self.state.clip.as_ref(),
        );
    }

    #[cfg(not(feature = "cosmic-text"))]
    fn draw_text(&mut self, text: &str, _x: f64, _y: f64, _source: &SurfacePaint) {
        tracing::trace!("skipping text {text:?}, glyph rendering needs the cosmic-text feature");
    }
}

fn default_text_metrics() -> TextMetrics {
    #[cfg(feature = "cosmic-text")]
    {
        TextMetrics::exact()
    }
    #[cfg(not(feature = "cosmic-text"))]
    {
        TextMetrics::estimate()
    }
}

fn make_pixmap(dimensions: &CanvasDimensions) -> Result<Pixmap, AvengerCanvasError> {
    let width = dimensions.to_physical_width();
    let height = dimensions.to_physical_height();
    Pixmap::new(width, height).ok_or(AvengerCanvasError::InvalidDimensions(width, height))
}

/// Device transform: scale by the pixel ratio after shifting by the origin
fn base_transform(dimensions: &CanvasDimensions) -> Transform {
    let scale = dimensions.scale as f32;
    Transform::from_row(
        scale,
        0.0,
        0.0,
        scale,
        scale * dimensions.origin[0] as f32,
        scale * dimensions.origin[1] as f32,
    )
}

impl CanvasSurface for PixmapSurface {
    fn resize(&mut self, dimensions: CanvasDimensions) -> Result<(), AvengerCanvasError> {
        self.pixmap = make_pixmap(&dimensions)?;
        self.dimensions = dimensions;
        self.state = DrawState::new(base_transform(&dimensions));
        self.stack.clear();
        self.path.clear();
        self.current = None;
        Ok(())
    }

    fn dimensions(&self) -> CanvasDimensions {
        self.dimensions
    }
}

impl PathSink for PixmapSurface {
    fn begin_path(&mut self) {
        self.path.clear();
        self.current = None;
    }

    fn move_to(&mut self, x: f64, y: f64) {
        let (px, py) = self.map(x, y);
        self.push(PathCommand::MoveTo(px, py));
        self.current = Some((px, py));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        if self.current.is_none() {
            self.move_to(x, y);
            return;
        }
        let (px, py) = self.map(x, y);
        self.push(PathCommand::LineTo(px, py));
        self.current = Some((px, py));
    }

    fn quadratic_curve_to(&mut self, x1: f64, y1: f64, x: f64, y: f64) {
        if self.current.is_none() {
            self.move_to(x1, y1);
        }
        let (c1x, c1y) = self.map(x1, y1);
        let (px, py) = self.map(x, y);
        self.push(PathCommand::QuadTo(c1x, c1y, px, py));
        self.current = Some((px, py));
    }

    fn bezier_curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        if self.current.is_none() {
            self.move_to(x1, y1);
        }
        let (c1x, c1y) = self.map(x1, y1);
        let (c2x, c2y) = self.map(x2, y2);
        let (px, py) = self.map(x, y);
        self.push(PathCommand::CubicTo(c1x, c1y, c2x, c2y, px, py));
        self.current = Some((px, py));
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.move_to(x, y);
        self.line_to(x + w, y);
        self.line_to(x + w, y + h);
        self.line_to(x, y + h);
        self.close_path();
    }

    fn arc(&mut self, x: f64, y: f64, r: f64, a0: f64, a1: f64, ccw: bool) {
        self.line_to(x + r * a0.cos(), y + r * a0.sin());
        circular_arc_to_beziers(x, y, r, a0, a1, ccw, |[x1, y1, x2, y2, x3, y3]| {
            self.bezier_curve_to(x1, y1, x2, y2, x3, y3);
        });
    }

    fn close_path(&mut self) {
        if self.current.is_some() {
            self.push(PathCommand::Close);
        }
    }
}

impl DrawingSurface for PixmapSurface {
    fn fill(&mut self) {
        let (Some(path), Some(paint)) = (self.build_path(), self.paint(&self.state.fill)) else {
            return;
        };
        self.pixmap.fill_path(
            &path,
            &paint,
            FillRule::Winding,
            Transform::identity(),
            self.state.clip.as_ref(),
        );
    }

    fn stroke(&mut self) {
        let (Some(path), Some(paint)) = (self.build_path(), self.paint(&self.state.stroke)) else {
            return;
        };
        let stroke = self.stroke_style();
        self.pixmap.stroke_path(
            &path,
            &paint,
            &stroke,
            Transform::identity(),
            self.state.clip.as_ref(),
        );
    }

    fn clip(&mut self) {
        let Some(path) = self.build_path() else {
            // Clipping to an empty path hides everything
            self.state.clip = Mask::new(self.pixmap.width(), self.pixmap.height());
            return;
        };
        match &mut self.state.clip {
            Some(mask) => mask.intersect_path(&path, FillRule::Winding, true, Transform::identity()),
            None => {
                if let Some(mut mask) = Mask::new(self.pixmap.width(), self.pixmap.height()) {
                    mask.fill_path(&path, FillRule::Winding, true, Transform::identity());
                    self.state.clip = Some(mask);
                }
            }
        }
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.state.transform = self.state.transform.pre_translate(x as f32, y as f32);
    }

    fn rotate(&mut self, angle: f64) {
        self.state.transform = self.state.transform.pre_rotate(angle.to_degrees() as f32);
    }

    fn set_fill_style(&mut self, paint: SurfacePaint) {
        self.state.fill = paint;
    }

    fn set_stroke_style(&mut self, paint: SurfacePaint) {
        self.state.stroke = paint;
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    fn set_line_width(&mut self, width: f64) {
        self.state.line_width = width;
    }

    fn set_line_cap(&mut self, cap: StrokeCap) {
        self.state.line_cap = cap;
    }

    fn set_line_join(&mut self, join: StrokeJoin) {
        self.state.line_join = join;
    }

    fn set_miter_limit(&mut self, limit: f64) {
        self.state.miter_limit = limit;
    }

    fn set_line_dash(&mut self, dash: &[f64]) {
        self.state.dash = dash.to_vec();
    }

    fn set_line_dash_offset(&mut self, offset: f64) {
        self.state.dash_offset = offset;
    }

    fn set_font(&mut self, font: &str) {
        if let Some(font) = CssFont::parse(font) {
            self.state.font = font;
        }
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.state.text_align = align;
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let paint = self.state.fill.clone();
        self.draw_text(text, x, y, &paint);
    }

    fn stroke_text(&mut self, text: &str, x: f64, y: f64) {
        let paint = self.state.stroke.clone();
        self.draw_text(text, x, y, &paint);
    }

    fn measure_text(&mut self, text: &str) -> f64 {
        self.text_metrics.width(&self.state.font.spec(), text)
    }

    fn draw_image(&mut self, image: &RgbaImage, x: f64, y: f64, width: f64, height: f64) {
        if image.width == 0 || image.height == 0 {
            return;
        }
        let Some(source) = Self::image_pixmap(image) else {
            return;
        };
        let transform = self
            .state
            .transform
            .pre_translate(x as f32, y as f32)
            .pre_scale(
                (width / image.width as f64) as f32,
                (height / image.height as f64) as f32,
            );
        let paint = PixmapPaint {
            opacity: self.state.alpha as f32,
            blend_mode: BlendMode::SourceOver,
            quality: FilterQuality::Bilinear,
        };
        self.pixmap
            .draw_pixmap(0, 0, source.as_ref(), &paint, transform, self.state.clip.as_ref());
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let (Some(path), Some(paint)) = (self.rect_path(x, y, width, height), self.paint(&self.state.fill))
        else {
            return;
        };
        self.pixmap.fill_path(
            &path,
            &paint,
            FillRule::Winding,
            Transform::identity(),
            self.state.clip.as_ref(),
        );
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let Some(path) = self.rect_path(x, y, width, height) else {
            return;
        };
        let paint = Paint {
            blend_mode: BlendMode::Clear,
            anti_alias: false,
            ..Default::default()
        };
        self.pixmap.fill_path(
            &path,
            &paint,
            FillRule::Winding,
            Transform::identity(),
            self.state.clip.as_ref(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avenger_common::types::GradientStop;

    fn surface(width: f64, height: f64) -> PixmapSurface {
        PixmapSurface::new(CanvasDimensions::new(width, height)).unwrap()
    }

    #[test]
    fn test_fill_rect_with_css_color() {
        let mut s = surface(10.0, 10.0);
        s.set_fill_style(SurfacePaint::Color("rgb(255, 0, 0)".to_string()));
        s.fill_rect(0.0, 0.0, 5.0, 5.0);
        assert_eq!(s.pixel(2, 2), Some([255, 0, 0, 255]));
        assert_eq!(s.pixel(7, 7), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_path_is_fixed_when_added() {
        let mut s = surface(20.0, 20.0);
        s.translate(10.0, 10.0);
        s.begin_path();
        s.rect(0.0, 0.0, 5.0, 5.0);
        s.translate(-10.0, -10.0);
        s.set_fill_style(SurfacePaint::Color("blue".to_string()));
        s.fill();
        assert_eq!(s.pixel(12, 12), Some([0, 0, 255, 255]));
        assert_eq!(s.pixel(2, 2), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_clip_restricts_fill() {
        let mut s = surface(10.0, 10.0);
        s.save();
        s.begin_path();
        s.rect(0.0, 0.0, 4.0, 10.0);
        s.clip();
        s.set_fill_style(SurfacePaint::Color("#00ff00".to_string()));
        s.fill_rect(0.0, 0.0, 10.0, 10.0);
        s.restore();
        assert_eq!(s.pixel(1, 5), Some([0, 255, 0, 255]));
        assert_eq!(s.pixel(8, 5), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_global_alpha_and_clear() {
        let mut s = surface(4.0, 4.0);
        s.set_fill_style(SurfacePaint::Color("white".to_string()));
        s.set_global_alpha(0.5);
        s.fill_rect(0.0, 0.0, 4.0, 4.0);
        let [_, _, _, a] = s.pixel(1, 1).unwrap();
        assert!((127..=128).contains(&a));
        s.clear_rect(0.0, 0.0, 2.0, 4.0);
        assert_eq!(s.pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_gradient_fill_varies_along_axis() {
        let mut s = surface(100.0, 1.0);
        s.set_fill_style(SurfacePaint::LinearGradient {
            start: [0.0, 0.0],
            end: [100.0, 0.0],
            stops: vec![
                GradientStop {
                    offset: 0.0,
                    color: "black".to_string(),
                },
                GradientStop {
                    offset: 1.0,
                    color: "white".to_string(),
                },
            ],
        });
        s.fill_rect(0.0, 0.0, 100.0, 1.0);
        let left = s.pixel(2, 0).unwrap();
        let right = s.pixel(97, 0).unwrap();
        assert!(left[0] < 20);
        assert!(right[0] > 230);
    }

    #[test]
    fn test_pixel_ratio_scales_output() {
        let s = PixmapSurface::new(CanvasDimensions::new(10.0, 5.0).with_scale(2.0)).unwrap();
        assert_eq!(s.pixmap().width(), 20);
        assert_eq!(s.pixmap().height(), 10);
        assert!(PixmapSurface::new(CanvasDimensions::new(0.0, 5.0)).is_err());
    }

    #[test]
    fn test_draw_image_scales_to_box() {
        let mut s = surface(10.0, 10.0);
        let image = RgbaImage {
            width: 1,
            height: 1,
            data: vec![255, 0, 0, 255],
        };
        s.draw_image(&image, 2.0, 2.0, 4.0, 4.0);
        assert_eq!(s.pixel(4, 4), Some([255, 0, 0, 255]));
        assert_eq!(s.pixel(8, 8), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_png_export() {
        let s = surface(3.0, 2.0);
        let png = s.encode_png().unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.width(), 3);
        assert_eq!(decoded.height(), 2);
        assert_eq!(s.to_image().unwrap().dimensions(), (3, 2));
    }
}
