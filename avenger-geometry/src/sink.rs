use std::f64::consts::{PI, TAU};

use avenger_common::format::fmt_num;

use crate::bounds::Bounds;

/// Receiver of path construction commands.
///
/// This is the path half of the drawing-surface contract. Shape generators,
/// the path mini-language interpreter and symbol builders all write into a
/// `PathSink`, so the same code paints, measures, hit-tests and serializes.
pub trait PathSink {
    fn begin_path(&mut self) {}

    fn move_to(&mut self, x: f64, y: f64);

    fn line_to(&mut self, x: f64, y: f64);

    fn quadratic_curve_to(&mut self, x1: f64, y1: f64, x: f64, y: f64);

    fn bezier_curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64);

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64);

    /// Circular arc centered on `(x, y)` from angle `a0` to `a1` (radians),
    /// counter-clockwise when `ccw` is set. Connects from the current point
    /// with a straight line like the canvas `arc` operation.
    fn arc(&mut self, x: f64, y: f64, r: f64, a0: f64, a1: f64, ccw: bool);

    fn close_path(&mut self);
}

const CIRCLE_THRESHOLD: f64 = TAU - 1e-8;

/// A sink that grows a [`Bounds`] to cover every point it is given
#[derive(Debug)]
pub struct BoundsSink<'a> {
    bounds: &'a mut Bounds,
}

impl<'a> BoundsSink<'a> {
    pub fn new(bounds: &'a mut Bounds) -> Self {
        Self { bounds }
    }
}

impl PathSink for BoundsSink<'_> {
    fn move_to(&mut self, x: f64, y: f64) {
        self.bounds.add(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.bounds.add(x, y);
    }

    fn quadratic_curve_to(&mut self, x1: f64, y1: f64, x: f64, y: f64) {
        self.bounds.add(x1, y1);
        self.bounds.add(x, y);
    }

    fn bezier_curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        self.bounds.add(x1, y1);
        self.bounds.add(x2, y2);
        self.bounds.add(x, y);
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.bounds.add(x, y);
        self.bounds.add(x + w, y + h);
    }

    fn arc(&mut self, cx: f64, cy: f64, r: f64, a0: f64, a1: f64, ccw: bool) {
        if (a1 - a0).abs() > CIRCLE_THRESHOLD {
            self.bounds.add(cx - r, cy - r);
            self.bounds.add(cx + r, cy + r);
            return;
        }

        let mut xmin = f64::INFINITY;
        let mut xmax = f64::NEG_INFINITY;
        let mut ymin = f64::INFINITY;
        let mut ymax = f64::NEG_INFINITY;
        let mut update = |a: f64| {
            let x = r * a.cos();
            let y = r * a.sin();
            xmin = xmin.min(x);
            xmax = xmax.max(x);
            ymin = ymin.min(y);
            ymax = ymax.max(y);
        };

        // Endpoints plus the quadrant-aligned angles inside the span
        update(a0);
        update(a1);

        if a1 != a0 {
            let half_pi = PI / 2.0;
            let mut sa = a0 % TAU;
            if sa < 0.0 {
                sa += TAU;
            }
            let mut ea = a1 % TAU;
            if ea < 0.0 {
                ea += TAU;
            }
            let mut ccw = ccw;
            if ea < sa {
                ccw = !ccw;
                std::mem::swap(&mut sa, &mut ea);
            }

            if ccw {
                ea -= TAU;
                let mut s = sa - (sa % half_pi);
                let mut i = 0;
                while i < 3 && s > ea {
                    update(s);
                    i += 1;
                    s -= half_pi;
                }
            } else {
                let mut s = sa - (sa % half_pi) + half_pi;
                let mut i = 0;
                while i < 3 && s < ea {
                    update(s);
                    i += 1;
                    s += half_pi;
                }
            }
        }

        self.bounds.add(cx + xmin, cy + ymin);
        self.bounds.add(cx + xmax, cy + ymax);
    }

    fn close_path(&mut self) {}
}

const EPSILON: f64 = 1e-6;
const TAU_EPSILON: f64 = TAU - EPSILON;

/// A sink that serializes commands as SVG path data
#[derive(Debug, Clone, Default)]
pub struct PathStringBuilder {
    out: String,
    start: Option<(f64, f64)>,
    current: Option<(f64, f64)>,
}

impl PathStringBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The accumulated path data, or `None` when nothing was written
    pub fn finish(self) -> Option<String> {
        if self.out.is_empty() {
            None
        } else {
            Some(self.out)
        }
    }

    fn push_coords(&mut self, values: &[f64]) {
        for (i, v) in values.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.out.push_str(&fmt_num(*v));
        }
    }
}

impl PathSink for PathStringBuilder {
    fn move_to(&mut self, x: f64, y: f64) {
        self.out.push('M');
        self.push_coords(&[x, y]);
        self.start = Some((x, y));
        self.current = Some((x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.out.push('L');
        self.push_coords(&[x, y]);
        self.current = Some((x, y));
    }

    fn quadratic_curve_to(&mut self, x1: f64, y1: f64, x: f64, y: f64) {
        self.out.push('Q');
        self.push_coords(&[x1, y1, x, y]);
        self.current = Some((x, y));
    }

    fn bezier_curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        self.out.push('C');
        self.push_coords(&[x1, y1, x2, y2, x, y]);
        self.current = Some((x, y));
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.out.push('M');
        self.push_coords(&[x, y]);
        self.out.push('h');
        self.out.push_str(&fmt_num(w));
        self.out.push('v');
        self.out.push_str(&fmt_num(h));
        self.out.push('h');
        self.out.push_str(&fmt_num(-w));
        self.out.push('Z');
        self.start = Some((x, y));
        self.current = Some((x, y));
    }

    fn arc(&mut self, x: f64, y: f64, r: f64, a0: f64, a1: f64, ccw: bool) {
        if r < 0.0 {
            return;
        }
        let dx = r * a0.cos();
        let dy = r * a0.sin();
        let x0 = x + dx;
        let y0 = y + dy;
        let cw = if ccw { 0.0 } else { 1.0 };
        let mut da = if ccw { a0 - a1 } else { a1 - a0 };

        match self.current {
            None => {
                self.out.push('M');
                self.push_coords(&[x0, y0]);
            }
            Some((cx, cy)) if (cx - x0).abs() > EPSILON || (cy - y0).abs() > EPSILON => {
                self.out.push('L');
                self.push_coords(&[x0, y0]);
            }
            _ => {}
        }
        self.current = Some((x0, y0));

        if r == 0.0 {
            return;
        }

        if da < 0.0 {
            da = da % TAU + TAU;
        }

        if da > TAU_EPSILON {
            // Full circle as two half arcs
            self.out.push('A');
            self.push_coords(&[r, r, 0.0, 1.0, cw, x - dx, y - dy]);
            self.out.push('A');
            self.push_coords(&[r, r, 0.0, 1.0, cw, x0, y0]);
        } else if da > EPSILON {
            let large = if da >= PI { 1.0 } else { 0.0 };
            let x1 = x + r * a1.cos();
            let y1 = y + r * a1.sin();
            self.out.push('A');
            self.push_coords(&[r, r, 0.0, large, cw, x1, y1]);
            self.current = Some((x1, y1));
        }
    }

    fn close_path(&mut self) {
        if self.current.is_some() {
            self.current = self.start;
            self.out.push('Z');
        }
    }
}

/// Replay a canvas-style circular arc as cubic bezier segments of at most a
/// quarter turn each. Used by sinks that only understand bezier curves.
pub fn circular_arc_to_beziers<F>(
    x: f64,
    y: f64,
    r: f64,
    a0: f64,
    a1: f64,
    ccw: bool,
    mut emit: F,
) where
    F: FnMut([f64; 6]),
{
    let sweep = canvas_arc_sweep(a0, a1, ccw);
    if sweep == 0.0 || r <= 0.0 {
        return;
    }
    let segments = (sweep.abs() / (PI / 2.0)).ceil().max(1.0) as usize;
    let step = sweep / segments as f64;
    let k = 4.0 / 3.0 * (step / 4.0).tan();

    let mut theta = a0;
    for _ in 0..segments {
        let (s0, c0) = theta.sin_cos();
        let (s1, c1) = (theta + step).sin_cos();
        emit([
            x + r * (c0 - k * s0),
            y + r * (s0 + k * c0),
            x + r * (c1 + k * s1),
            y + r * (s1 - k * c1),
            x + r * c1,
            y + r * s1,
        ]);
        theta += step;
    }
}

/// Signed sweep of a canvas arc, clamped to a full turn
pub fn canvas_arc_sweep(a0: f64, a1: f64, ccw: bool) -> f64 {
    if ccw {
        let da = a0 - a1;
        if da >= TAU {
            -TAU
        } else {
            -da.rem_euclid(TAU)
        }
    } else {
        let da = a1 - a0;
        if da >= TAU {
            TAU
        } else {
            da.rem_euclid(TAU)
        }
    }
}
