//! Point-in-fill and point-on-stroke tests against recorded paths.

use geo::{Distance, Euclidean};
use geo_types::{Coord, Geometry, LineString, MultiLineString, Point};
use lyon_path::iterator::PathIterator;
use lyon_path::math::point;
use lyon_path::path::Builder;
use lyon_path::{FillRule, Path, PathEvent};

use crate::sink::{circular_arc_to_beziers, PathSink};

const TOLERANCE: f32 = 0.05;

/// A [`PathSink`] that records commands into a `lyon_path::Path`
pub struct PathRecorder {
    builder: Builder,
    // Current point while a subpath is open
    current: Option<(f64, f64)>,
}

impl Default for PathRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl PathRecorder {
    pub fn new() -> Self {
        Self {
            builder: Path::builder(),
            current: None,
        }
    }

    pub fn build(mut self) -> Path {
        if self.current.take().is_some() {
            self.builder.end(false);
        }
        self.builder.build()
    }

    fn ensure_open(&mut self, x: f64, y: f64) {
        if self.current.is_none() {
            self.move_to(x, y);
        }
    }
}

impl PathSink for PathRecorder {
    fn move_to(&mut self, x: f64, y: f64) {
        if self.current.is_some() {
            self.builder.end(false);
        }
        self.builder.begin(point(x as f32, y as f32));
        self.current = Some((x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        if self.current.is_none() {
            self.move_to(x, y);
            return;
        }
        self.builder.line_to(point(x as f32, y as f32));
        self.current = Some((x, y));
    }

    fn quadratic_curve_to(&mut self, x1: f64, y1: f64, x: f64, y: f64) {
        self.ensure_open(x1, y1);
        self.builder
            .quadratic_bezier_to(point(x1 as f32, y1 as f32), point(x as f32, y as f32));
        self.current = Some((x, y));
    }

    fn bezier_curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        self.ensure_open(x1, y1);
        self.builder.cubic_bezier_to(
            point(x1 as f32, y1 as f32),
            point(x2 as f32, y2 as f32),
            point(x as f32, y as f32),
        );
        self.current = Some((x, y));
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.move_to(x, y);
        self.line_to(x + w, y);
        self.line_to(x + w, y + h);
        self.line_to(x, y + h);
        self.close_path();
    }

    fn arc(&mut self, x: f64, y: f64, r: f64, a0: f64, a1: f64, ccw: bool) {
        let x0 = x + r * a0.cos();
        let y0 = y + r * a0.sin();
        self.line_to(x0, y0);
        circular_arc_to_beziers(x, y, r, a0, a1, ccw, |[x1, y1, x2, y2, x3, y3]| {
            self.bezier_curve_to(x1, y1, x2, y2, x3, y3);
        });
    }

    fn close_path(&mut self) {
        if self.current.take().is_some() {
            self.builder.end(true);
        }
    }
}

/// Whether `(x, y)` lies inside the filled path (non-zero winding)
pub fn fill_contains(path: &Path, x: f64, y: f64) -> bool {
    lyon_algorithms::hit_test::hit_test_path(
        &point(x as f32, y as f32),
        path.iter(),
        FillRule::NonZero,
        TOLERANCE,
    )
}

/// Whether `(x, y)` lies within `line_width / 2` of the path outline
pub fn stroke_contains(path: &Path, x: f64, y: f64, line_width: f64) -> bool {
    let Some(outline) = flatten_outline(path) else {
        return false;
    };
    let geometry = Geometry::MultiLineString(outline);
    Euclidean::distance(&geometry, &Point::new(x, y)) <= line_width / 2.0
}

/// Flatten the path into one line string per subpath, closing closed subpaths
fn flatten_outline(path: &Path) -> Option<MultiLineString<f64>> {
    let mut lines: Vec<LineString<f64>> = Vec::new();
    let mut current: Vec<Coord<f64>> = Vec::new();

    for evt in path.iter().flattened(TOLERANCE) {
        match evt {
            PathEvent::Begin { at } => {
                if !current.is_empty() {
                    lines.push(LineString::new(std::mem::take(&mut current)));
                }
                current.push(Coord {
                    x: at.x as f64,
                    y: at.y as f64,
                });
            }
            PathEvent::Line { to, .. } => {
                current.push(Coord {
                    x: to.x as f64,
                    y: to.y as f64,
                });
            }
            PathEvent::End { first, close, .. } => {
                if close {
                    current.push(Coord {
                        x: first.x as f64,
                        y: first.y as f64,
                    });
                }
                if current.len() == 1 {
                    // Degenerate subpath still counts as a point
                    current.push(current[0]);
                }
                lines.push(LineString::new(std::mem::take(&mut current)));
            }
            _ => {}
        }
    }
    if !current.is_empty() {
        lines.push(LineString::new(current));
    }

    if lines.is_empty() {
        None
    } else {
        Some(MultiLineString(lines))
    }
}
