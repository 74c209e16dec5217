use std::collections::HashMap;
use std::f64::consts::TAU;
use std::sync::{Arc, Mutex, PoisonError};

use lazy_static::lazy_static;

use crate::path::{parse_path_uncached, render_path, PathSegment};
use crate::sink::PathSink;

lazy_static! {
    static ref CUSTOM_SYMBOLS: Mutex<HashMap<String, Arc<[PathSegment]>>> =
        Mutex::new(HashMap::new());
}

pub(crate) fn clear_symbol_cache() {
    CUSTOM_SYMBOLS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clear();
}

/// Symbol shape drawn centered on the origin.
///
/// Built-in shapes are defined for a unit size and scaled by `√size`, so that
/// `size` is the symbol area in square pixels.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SymbolShape {
    #[default]
    Circle,
    Cross,
    Diamond,
    Square,
    TriangleUp,
    TriangleDown,
    TriangleLeft,
    TriangleRight,
    Triangle,
    Arrow,
    Wedge,
    /// SVG path data, replayed at a scale of `√size / 2`
    Custom(Arc<[PathSegment]>),
}

impl SymbolShape {
    /// Resolve a shape name, treating anything outside the built-in catalog
    /// as path data. Custom paths are parsed once per distinct string.
    pub fn from_name(shape: &str) -> SymbolShape {
        match shape.to_ascii_lowercase().as_str() {
            "circle" => SymbolShape::Circle,
            "cross" => SymbolShape::Cross,
            "diamond" => SymbolShape::Diamond,
            "square" => SymbolShape::Square,
            "triangle-up" => SymbolShape::TriangleUp,
            "triangle-down" => SymbolShape::TriangleDown,
            "triangle-left" => SymbolShape::TriangleLeft,
            "triangle-right" => SymbolShape::TriangleRight,
            "triangle" => SymbolShape::Triangle,
            "arrow" => SymbolShape::Arrow,
            "wedge" => SymbolShape::Wedge,
            _ => SymbolShape::Custom(custom_symbol(shape)),
        }
    }

    pub fn draw(&self, sink: &mut dyn PathSink, size: f64) {
        let w = size.max(0.0).sqrt();
        let r = w / 2.0;
        let sqrt3 = 3.0f64.sqrt();
        let tan30 = (30.0f64).to_radians().tan();

        match self {
            SymbolShape::Circle => {
                sink.move_to(r, 0.0);
                sink.arc(0.0, 0.0, r, 0.0, TAU, false);
            }
            SymbolShape::Cross => {
                let s = r / 2.5;
                polygon(
                    sink,
                    &[
                        (-r, -s),
                        (-r, s),
                        (-s, s),
                        (-s, r),
                        (s, r),
                        (s, s),
                        (r, s),
                        (r, -s),
                        (s, -s),
                        (s, -r),
                        (-s, -r),
                        (-s, -s),
                    ],
                );
            }
            SymbolShape::Diamond => {
                polygon(sink, &[(-r, 0.0), (0.0, -r), (r, 0.0), (0.0, r)]);
            }
            SymbolShape::Square => {
                sink.rect(-r, -r, w, w);
            }
            SymbolShape::TriangleUp => {
                let h = r * sqrt3 / 2.0;
                polygon(sink, &[(0.0, -h), (-r, h), (r, h)]);
            }
            SymbolShape::TriangleDown => {
                let h = r * sqrt3 / 2.0;
                polygon(sink, &[(0.0, h), (-r, -h), (r, -h)]);
            }
            SymbolShape::TriangleRight => {
                let h = r * sqrt3 / 2.0;
                polygon(sink, &[(h, 0.0), (-h, -r), (-h, r)]);
            }
            SymbolShape::TriangleLeft => {
                let h = r * sqrt3 / 2.0;
                polygon(sink, &[(-h, 0.0), (h, -r), (h, r)]);
            }
            SymbolShape::Triangle => {
                let h = r * sqrt3 / 2.0;
                let o = h - r * tan30;
                polygon(sink, &[(0.0, -h - o), (-r, h - o), (r, h - o)]);
            }
            SymbolShape::Arrow => {
                let s = r / 7.0;
                let t = r / 2.5;
                let v = r / 8.0;
                polygon(
                    sink,
                    &[
                        (-s, r),
                        (s, r),
                        (s, -v),
                        (t, -v),
                        (0.0, -r),
                        (-t, -v),
                        (-s, -v),
                    ],
                );
            }
            SymbolShape::Wedge => {
                let h = r * sqrt3 / 2.0;
                let o = h - r * tan30;
                let b = r / 4.0;
                polygon(sink, &[(0.0, -h - o), (-b, h - o), (b, h - o)]);
            }
            SymbolShape::Custom(segments) => {
                render_path(sink, segments, 0.0, 0.0, r);
            }
        }
    }
}

fn polygon(sink: &mut dyn PathSink, points: &[(f64, f64)]) {
    let mut iter = points.iter();
    if let Some((x, y)) = iter.next() {
        sink.move_to(*x, *y);
    }
    for (x, y) in iter {
        sink.line_to(*x, *y);
    }
    sink.close_path();
}

fn custom_symbol(path: &str) -> Arc<[PathSegment]> {
    let mut cache = CUSTOM_SYMBOLS
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    cache
        .entry(path.to_string())
        .or_insert_with(|| parse_path_uncached(path).into())
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::Bounds;
    use crate::sink::{BoundsSink, PathStringBuilder};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    fn symbol_bounds(shape: &str, size: f64) -> Bounds {
        let mut bounds = Bounds::new();
        SymbolShape::from_name(shape).draw(&mut BoundsSink::new(&mut bounds), size);
        bounds
    }

    #[rstest(
        shape,
        case("circle"),
        case("square"),
        case("diamond"),
        case("cross"),
        case("triangle-up"),
        case("triangle-left")
    )]
    fn test_builtin_symbols_scale_with_sqrt_size(shape: &str) {
        let small = symbol_bounds(shape, 25.0);
        let large = symbol_bounds(shape, 100.0);
        assert_approx_eq!(f64, large.width(), 2.0 * small.width(), epsilon = 1e-9);
        assert_approx_eq!(f64, large.height(), 2.0 * small.height(), epsilon = 1e-9);
    }

    #[test]
    fn test_square_has_requested_area() {
        let b = symbol_bounds("square", 64.0);
        assert_eq!(b, Bounds::from_coords(-4.0, -4.0, 4.0, 4.0));
    }

    #[test]
    fn test_circle_bounds() {
        let b = symbol_bounds("circle", 100.0);
        assert_approx_eq!(f64, b.x1, -5.0, epsilon = 1e-12);
        assert_approx_eq!(f64, b.y2, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_names_are_case_insensitive() {
        assert_eq!(SymbolShape::from_name("Diamond"), SymbolShape::Diamond);
    }

    #[test]
    fn test_custom_symbol_is_scaled_and_cached() {
        let a = SymbolShape::from_name("M-1,-1L1,1");
        let b = SymbolShape::from_name("M-1,-1L1,1");
        match (&a, &b) {
            (SymbolShape::Custom(x), SymbolShape::Custom(y)) => assert!(Arc::ptr_eq(x, y)),
            _ => panic!("expected custom symbols"),
        }

        let mut sink = PathStringBuilder::new();
        a.draw(&mut sink, 16.0);
        assert_eq!(sink.finish().as_deref(), Some("M-2,-2L2,2"));
    }
}
