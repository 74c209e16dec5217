//! Fill and stroke setup for immediate-mode drawing.

use avenger_common::types::Paint;
use avenger_geometry::Bounds;

use crate::props::ItemProps;
use crate::surface::{DrawingSurface, SurfacePaint};

const DEFAULT_MITER_LIMIT: f64 = 10.0;

/// Resolve a paint against the bounds of the painted item. Gradient
/// coordinates are fractions of those bounds.
pub fn resolve_paint(paint: &Paint, bounds: &Bounds) -> SurfacePaint {
    match paint {
        Paint::Color(color) => SurfacePaint::Color(color.clone()),
        Paint::Gradient(gradient) => {
            let (x0, y0, w, h) = if bounds.empty() {
                (0.0, 0.0, 0.0, 0.0)
            } else {
                (bounds.x1, bounds.y1, bounds.width(), bounds.height())
            };
            SurfacePaint::LinearGradient {
                start: [x0 + gradient.x1 * w, y0 + gradient.y1 * h],
                end: [x0 + gradient.x2 * w, y0 + gradient.y2 * h],
                stops: gradient.stops.clone(),
            }
        }
    }
}

/// Prepare the surface to fill the item. Returns `false` when the fill is
/// fully transparent.
pub fn fill<S: DrawingSurface>(surface: &mut S, props: &ItemProps, bounds: &Bounds, opacity: f64) -> bool {
    let Some(paint) = &props.fill else {
        return false;
    };
    let opacity = opacity * props.fill_opacity.unwrap_or(1.0);
    if opacity > 0.0 {
        surface.set_global_alpha(opacity);
        surface.set_fill_style(resolve_paint(paint, bounds));
        true
    } else {
        false
    }
}

/// Prepare the surface to stroke the item. Returns `false` when the stroke
/// has no width or is fully transparent.
pub fn stroke<S: DrawingSurface>(surface: &mut S, props: &ItemProps, bounds: &Bounds, opacity: f64) -> bool {
    let Some(paint) = &props.stroke else {
        return false;
    };
    let line_width = props.stroke_width();
    if line_width <= 0.0 {
        return false;
    }
    let opacity = opacity * props.stroke_opacity.unwrap_or(1.0);
    if opacity <= 0.0 {
        return false;
    }
    surface.set_global_alpha(opacity);
    surface.set_stroke_style(resolve_paint(paint, bounds));
    surface.set_line_width(line_width);
    surface.set_line_cap(props.stroke_cap.unwrap_or_default());
    surface.set_line_join(props.stroke_join.unwrap_or_default());
    surface.set_miter_limit(props.stroke_miter_limit.unwrap_or(DEFAULT_MITER_LIMIT));
    let dash = props.stroke_dash.as_ref().map(|d| d.to_vec()).unwrap_or_default();
    surface.set_line_dash(&dash);
    surface.set_line_dash_offset(props.stroke_dash_offset.unwrap_or(0.0));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use avenger_common::types::Gradient;

    #[test]
    fn test_gradient_resolves_against_bounds() {
        let gradient = Gradient::linear([0.0, 0.0], [1.0, 0.5]).with_stop(0.0, "red");
        let bounds = Bounds::from_coords(10.0, 20.0, 110.0, 60.0);
        match resolve_paint(&Paint::Gradient(gradient), &bounds) {
            SurfacePaint::LinearGradient { start, end, stops } => {
                assert_eq!(start, [10.0, 20.0]);
                assert_eq!(end, [110.0, 40.0]);
                assert_eq!(stops.len(), 1);
            }
            other => panic!("unexpected paint {other:?}"),
        }
    }

    #[test]
    fn test_color_passes_through() {
        let paint = resolve_paint(&Paint::color("steelblue"), &Bounds::new());
        assert_eq!(paint, SurfacePaint::Color("steelblue".to_string()));
    }
}
