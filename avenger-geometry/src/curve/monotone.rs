use super::{Curve, LineState};
use crate::sink::PathSink;

fn sign(x: f64) -> f64 {
    if x < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Cubic Hermite spline that preserves monotonicity in y (Steffen's method).
///
/// The `y` variant preserves monotonicity in x by swapping coordinates on
/// the way in and on the way out.
#[derive(Debug, Clone)]
pub struct Monotone {
    reflect: bool,
    line: LineState,
    point: u8,
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    t0: f64,
}

impl Monotone {
    fn new(reflect: bool) -> Self {
        Self {
            reflect,
            line: LineState::default(),
            point: 0,
            x0: f64::NAN,
            y0: f64::NAN,
            x1: f64::NAN,
            y1: f64::NAN,
            t0: f64::NAN,
        }
    }

    /// Monotone in x, for vertically oriented lines and areas
    pub fn x() -> Self {
        Self::new(false)
    }

    /// Monotone in y, for horizontally oriented lines and areas
    pub fn y() -> Self {
        Self::new(true)
    }

    fn out(&self, x: f64, y: f64) -> (f64, f64) {
        if self.reflect {
            (y, x)
        } else {
            (x, y)
        }
    }

    /// Slope at `(x1, y1)` given the next point, or 0 at an extremum
    fn slope3(&self, x2: f64, y2: f64) -> f64 {
        let h0 = self.x1 - self.x0;
        let h1 = x2 - self.x1;
        let d0 = if h0 != 0.0 { h0 } else if h1 < 0.0 { -0.0 } else { 0.0 };
        let d1 = if h1 != 0.0 { h1 } else if h0 < 0.0 { -0.0 } else { 0.0 };
        let s0 = (self.y1 - self.y0) / d0;
        let s1 = (y2 - self.y1) / d1;
        let p = (s0 * h1 + s1 * h0) / (h0 + h1);
        let (a, b, c) = (s0.abs(), s1.abs(), 0.5 * p.abs());
        if a.is_nan() || b.is_nan() || c.is_nan() {
            return 0.0;
        }
        let t = (sign(s0) + sign(s1)) * a.min(b).min(c);
        if t.is_nan() {
            0.0
        } else {
            t
        }
    }

    /// One-sided slope at the end of the line
    fn slope2(&self, t: f64) -> f64 {
        let h = self.x1 - self.x0;
        if h != 0.0 {
            (3.0 * (self.y1 - self.y0) / h - t) / 2.0
        } else {
            t
        }
    }

    fn hermite(&self, sink: &mut dyn PathSink, t0: f64, t1: f64) {
        let dx = (self.x1 - self.x0) / 3.0;
        let (c1x, c1y) = self.out(self.x0 + dx, self.y0 + dx * t0);
        let (c2x, c2y) = self.out(self.x1 - dx, self.y1 - dx * t1);
        let (x, y) = self.out(self.x1, self.y1);
        sink.bezier_curve_to(c1x, c1y, c2x, c2y, x, y);
    }
}

impl Curve for Monotone {
    fn area_start(&mut self) {
        self.line.area_start();
    }

    fn area_end(&mut self) {
        self.line.area_end();
    }

    fn line_start(&mut self) {
        self.x0 = f64::NAN;
        self.y0 = f64::NAN;
        self.x1 = f64::NAN;
        self.y1 = f64::NAN;
        self.t0 = f64::NAN;
        self.point = 0;
    }

    fn line_end(&mut self, sink: &mut dyn PathSink) {
        match self.point {
            2 => {
                let (x, y) = self.out(self.x1, self.y1);
                sink.line_to(x, y);
            }
            3 => self.hermite(sink, self.t0, self.slope2(self.t0)),
            _ => {}
        }
        if self.line.should_close(self.point == 1) {
            sink.close_path();
        }
        self.line.toggle();
    }

    fn point(&mut self, sink: &mut dyn PathSink, x: f64, y: f64) {
        let (x, y) = if self.reflect { (y, x) } else { (x, y) };
        let mut t1 = f64::NAN;

        // Coincident points carry no slope information
        if x == self.x1 && y == self.y1 {
            return;
        }

        match self.point {
            0 => {
                self.point = 1;
                let (ox, oy) = self.out(x, y);
                self.line.move_or_line(sink, ox, oy);
            }
            1 => self.point = 2,
            2 => {
                self.point = 3;
                t1 = self.slope3(x, y);
                self.hermite(sink, self.slope2(t1), t1);
            }
            _ => {
                t1 = self.slope3(x, y);
                self.hermite(sink, self.t0, t1);
            }
        }

        self.x0 = self.x1;
        self.x1 = x;
        self.y0 = self.y1;
        self.y1 = y;
        self.t0 = t1;
    }
}
