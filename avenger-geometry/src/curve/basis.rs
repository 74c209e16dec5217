use super::{Curve, LineState};
use crate::sink::PathSink;

/// Sliding window of the last two input points
#[derive(Debug, Clone, Copy)]
struct Window {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            x0: f64::NAN,
            y0: f64::NAN,
            x1: f64::NAN,
            y1: f64::NAN,
        }
    }
}

impl Window {
    fn shift(&mut self, x: f64, y: f64) {
        self.x0 = self.x1;
        self.x1 = x;
        self.y0 = self.y1;
        self.y1 = y;
    }

    /// Emit the B-spline segment ending between `(x1, y1)` and `(x, y)`
    fn bezier(&self, sink: &mut dyn PathSink, x: f64, y: f64) {
        sink.bezier_curve_to(
            (2.0 * self.x0 + self.x1) / 3.0,
            (2.0 * self.y0 + self.y1) / 3.0,
            (self.x0 + 2.0 * self.x1) / 3.0,
            (self.y0 + 2.0 * self.y1) / 3.0,
            (self.x0 + 4.0 * self.x1 + x) / 6.0,
            (self.y0 + 4.0 * self.y1 + y) / 6.0,
        );
    }
}

/// Cubic B-spline clamped to the first and last points
#[derive(Debug, Clone, Default)]
pub struct Basis {
    line: LineState,
    point: u8,
    w: Window,
}

impl Basis {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Curve for Basis {
    fn area_start(&mut self) {
        self.line.area_start();
    }

    fn area_end(&mut self) {
        self.line.area_end();
    }

    fn line_start(&mut self) {
        self.w = Window::default();
        self.point = 0;
    }

    fn line_end(&mut self, sink: &mut dyn PathSink) {
        match self.point {
            3 => {
                self.w.bezier(sink, self.w.x1, self.w.y1);
                sink.line_to(self.w.x1, self.w.y1);
            }
            2 => sink.line_to(self.w.x1, self.w.y1),
            _ => {}
        }
        if self.line.should_close(self.point == 1) {
            sink.close_path();
        }
        self.line.toggle();
    }

    fn point(&mut self, sink: &mut dyn PathSink, x: f64, y: f64) {
        match self.point {
            0 => {
                self.point = 1;
                self.line.move_or_line(sink, x, y);
            }
            1 => self.point = 2,
            2 => {
                self.point = 3;
                sink.line_to(
                    (5.0 * self.w.x0 + self.w.x1) / 6.0,
                    (5.0 * self.w.y0 + self.w.y1) / 6.0,
                );
                self.w.bezier(sink, x, y);
            }
            _ => self.w.bezier(sink, x, y),
        }
        self.w.shift(x, y);
    }
}

/// Closed cubic B-spline
#[derive(Debug, Clone)]
pub struct BasisClosed {
    point: u8,
    w: Window,
    // First three points, replayed when the line ends
    head: [(f64, f64); 3],
}

impl Default for BasisClosed {
    fn default() -> Self {
        Self {
            point: 0,
            w: Window::default(),
            head: [(f64::NAN, f64::NAN); 3],
        }
    }
}

impl BasisClosed {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Curve for BasisClosed {
    fn line_start(&mut self) {
        *self = Self::default();
    }

    fn line_end(&mut self, sink: &mut dyn PathSink) {
        let [(x2, y2), (x3, y3), (x4, y4)] = self.head;
        match self.point {
            1 => {
                sink.move_to(x2, y2);
                sink.close_path();
            }
            2 => {
                sink.move_to((x2 + 2.0 * x3) / 3.0, (y2 + 2.0 * y3) / 3.0);
                sink.line_to((x3 + 2.0 * x2) / 3.0, (y3 + 2.0 * y2) / 3.0);
                sink.close_path();
            }
            3 => {
                self.point(sink, x2, y2);
                self.point(sink, x3, y3);
                self.point(sink, x4, y4);
            }
            _ => {}
        }
    }

    fn point(&mut self, sink: &mut dyn PathSink, x: f64, y: f64) {
        match self.point {
            0 => {
                self.point = 1;
                self.head[0] = (x, y);
            }
            1 => {
                self.point = 2;
                self.head[1] = (x, y);
            }
            2 => {
                self.point = 3;
                self.head[2] = (x, y);
                sink.move_to(
                    (self.w.x0 + 4.0 * self.w.x1 + x) / 6.0,
                    (self.w.y0 + 4.0 * self.w.y1 + y) / 6.0,
                );
            }
            _ => self.w.bezier(sink, x, y),
        }
        self.w.shift(x, y);
    }
}

/// Cubic B-spline that does not pass through its end points
#[derive(Debug, Clone, Default)]
pub struct BasisOpen {
    line: LineState,
    point: u8,
    w: Window,
}

impl BasisOpen {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Curve for BasisOpen {
    fn area_start(&mut self) {
        self.line.area_start();
    }

    fn area_end(&mut self) {
        self.line.area_end();
    }

    fn line_start(&mut self) {
        self.w = Window::default();
        self.point = 0;
    }

    fn line_end(&mut self, sink: &mut dyn PathSink) {
        if self.line.should_close(self.point == 3) {
            sink.close_path();
        }
        self.line.toggle();
    }

    fn point(&mut self, sink: &mut dyn PathSink, x: f64, y: f64) {
        match self.point {
            0 => self.point = 1,
            1 => self.point = 2,
            2 => {
                self.point = 3;
                let x0 = (self.w.x0 + 4.0 * self.w.x1 + x) / 6.0;
                let y0 = (self.w.y0 + 4.0 * self.w.y1 + y) / 6.0;
                self.line.move_or_line(sink, x0, y0);
            }
            _ => {
                self.point = 4;
                self.w.bezier(sink, x, y);
            }
        }
        self.w.shift(x, y);
    }
}

/// B-spline straightened toward the chord between the end points by `beta`
#[derive(Debug, Clone)]
pub struct Bundle {
    beta: f64,
    basis: Basis,
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Bundle {
    pub fn new(beta: f64) -> Self {
        Self {
            beta,
            basis: Basis::new(),
            xs: Vec::new(),
            ys: Vec::new(),
        }
    }
}

impl Curve for Bundle {
    fn area_start(&mut self) {
        self.basis.area_start();
    }

    fn area_end(&mut self) {
        self.basis.area_end();
    }

    fn line_start(&mut self) {
        self.xs.clear();
        self.ys.clear();
        self.basis.line_start();
    }

    fn line_end(&mut self, sink: &mut dyn PathSink) {
        let xs = std::mem::take(&mut self.xs);
        let ys = std::mem::take(&mut self.ys);
        if xs.len() > 1 {
            let j = xs.len() - 1;
            let (x0, y0) = (xs[0], ys[0]);
            let dx = xs[j] - x0;
            let dy = ys[j] - y0;
            for i in 0..=j {
                let t = i as f64 / j as f64;
                self.basis.point(
                    sink,
                    self.beta * xs[i] + (1.0 - self.beta) * (x0 + t * dx),
                    self.beta * ys[i] + (1.0 - self.beta) * (y0 + t * dy),
                );
            }
        }
        self.basis.line_end(sink);
    }

    fn point(&mut self, _sink: &mut dyn PathSink, x: f64, y: f64) {
        self.xs.push(x);
        self.ys.push(y);
    }
}
