use super::{Curve, LineState};
use crate::sink::PathSink;

const EPSILON: f64 = 1e-12;

/// How tangents at interior points are derived
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tangents {
    /// Cardinal spline with `k = (1 - tension) / 6`
    Cardinal(f64),
    /// Catmull-Rom spline parameterized by `alpha` (0.5 is centripetal)
    CatmullRom(f64),
}

/// Last three input points plus the chord lengths used by Catmull-Rom
#[derive(Debug, Clone, Copy)]
struct Knots {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    l01_a: f64,
    l12_a: f64,
    l23_a: f64,
    l01_2a: f64,
    l12_2a: f64,
    l23_2a: f64,
}

impl Default for Knots {
    fn default() -> Self {
        Self {
            x0: f64::NAN,
            y0: f64::NAN,
            x1: f64::NAN,
            y1: f64::NAN,
            x2: f64::NAN,
            y2: f64::NAN,
            l01_a: 0.0,
            l12_a: 0.0,
            l23_a: 0.0,
            l01_2a: 0.0,
            l12_2a: 0.0,
            l23_2a: 0.0,
        }
    }
}

impl Knots {
    /// Record the chord length from the last point to `(x, y)`
    fn measure(&mut self, tangents: Tangents, x: f64, y: f64) {
        if let Tangents::CatmullRom(alpha) = tangents {
            let x23 = self.x2 - x;
            let y23 = self.y2 - y;
            self.l23_2a = (x23 * x23 + y23 * y23).powf(alpha);
            self.l23_a = self.l23_2a.sqrt();
        }
    }

    fn shift(&mut self, x: f64, y: f64) {
        self.l01_a = self.l12_a;
        self.l12_a = self.l23_a;
        self.l01_2a = self.l12_2a;
        self.l12_2a = self.l23_2a;
        self.x0 = self.x1;
        self.x1 = self.x2;
        self.x2 = x;
        self.y0 = self.y1;
        self.y1 = self.y2;
        self.y2 = y;
    }

    /// Emit the segment from `(x1, y1)` to `(x2, y2)` given the next point
    fn bezier(&self, tangents: Tangents, sink: &mut dyn PathSink, x: f64, y: f64) {
        match tangents {
            Tangents::Cardinal(tension) => {
                let k = (1.0 - tension) / 6.0;
                sink.bezier_curve_to(
                    self.x1 + k * (self.x2 - self.x0),
                    self.y1 + k * (self.y2 - self.y0),
                    self.x2 + k * (self.x1 - x),
                    self.y2 + k * (self.y1 - y),
                    self.x2,
                    self.y2,
                );
            }
            Tangents::CatmullRom(_) => {
                let (mut x1, mut y1, mut x2, mut y2) = (self.x1, self.y1, self.x2, self.y2);
                if self.l01_a > EPSILON {
                    let a = 2.0 * self.l01_2a
                        + 3.0 * self.l01_a * self.l12_a
                        + self.l12_2a;
                    let n = 3.0 * self.l01_a * (self.l01_a + self.l12_a);
                    x1 = (x1 * a - self.x0 * self.l12_2a + self.x2 * self.l01_2a) / n;
                    y1 = (y1 * a - self.y0 * self.l12_2a + self.y2 * self.l01_2a) / n;
                }
                if self.l23_a > EPSILON {
                    let b = 2.0 * self.l23_2a
                        + 3.0 * self.l23_a * self.l12_a
                        + self.l12_2a;
                    let m = 3.0 * self.l23_a * (self.l23_a + self.l12_a);
                    x2 = (x2 * b + self.x1 * self.l23_2a - x * self.l12_2a) / m;
                    y2 = (y2 * b + self.y1 * self.l23_2a - y * self.l12_2a) / m;
                }
                sink.bezier_curve_to(x1, y1, x2, y2, self.x2, self.y2);
            }
        }
    }
}

/// Interpolating spline through every point
#[derive(Debug, Clone)]
pub struct Spline {
    tangents: Tangents,
    line: LineState,
    point: u8,
    k: Knots,
}

impl Spline {
    pub fn new(tangents: Tangents) -> Self {
        Self {
            tangents,
            line: LineState::default(),
            point: 0,
            k: Knots::default(),
        }
    }

    pub fn cardinal(tension: f64) -> Self {
        Self::new(Tangents::Cardinal(tension))
    }

    pub fn catmull_rom(alpha: f64) -> Self {
        Self::new(Tangents::CatmullRom(alpha))
    }
}

impl Curve for Spline {
    fn area_start(&mut self) {
        self.line.area_start();
    }

    fn area_end(&mut self) {
        self.line.area_end();
    }

    fn line_start(&mut self) {
        self.k = Knots::default();
        self.point = 0;
    }

    fn line_end(&mut self, sink: &mut dyn PathSink) {
        match self.point {
            2 => sink.line_to(self.k.x2, self.k.y2),
            3 => match self.tangents {
                Tangents::Cardinal(_) => {
                    let (x, y) = (self.k.x1, self.k.y1);
                    self.k.bezier(self.tangents, sink, x, y);
                }
                Tangents::CatmullRom(_) => {
                    let (x, y) = (self.k.x2, self.k.y2);
                    self.point(sink, x, y);
                }
            },
            _ => {}
        }
        if self.line.should_close(self.point == 1) {
            sink.close_path();
        }
        self.line.toggle();
    }

    fn point(&mut self, sink: &mut dyn PathSink, x: f64, y: f64) {
        if self.point > 0 {
            self.k.measure(self.tangents, x, y);
        }
        match self.point {
            0 => {
                self.point = 1;
                self.line.move_or_line(sink, x, y);
            }
            1 => {
                self.point = 2;
                // The first segment has no incoming tangent
                self.k.x1 = x;
                self.k.y1 = y;
            }
            _ => {
                self.point = 3;
                self.k.bezier(self.tangents, sink, x, y);
            }
        }
        self.k.shift(x, y);
    }
}

/// Spline that skips the first and last segments
#[derive(Debug, Clone)]
pub struct SplineOpen {
    tangents: Tangents,
    line: LineState,
    point: u8,
    k: Knots,
}

impl SplineOpen {
    pub fn new(tangents: Tangents) -> Self {
        Self {
            tangents,
            line: LineState::default(),
            point: 0,
            k: Knots::default(),
        }
    }

    pub fn cardinal(tension: f64) -> Self {
        Self::new(Tangents::Cardinal(tension))
    }

    pub fn catmull_rom(alpha: f64) -> Self {
        Self::new(Tangents::CatmullRom(alpha))
    }
}

impl Curve for SplineOpen {
    fn area_start(&mut self) {
        self.line.area_start();
    }

    fn area_end(&mut self) {
        self.line.area_end();
    }

    fn line_start(&mut self) {
        self.k = Knots::default();
        self.point = 0;
    }

    fn line_end(&mut self, sink: &mut dyn PathSink) {
        if self.line.should_close(self.point == 3) {
            sink.close_path();
        }
        self.line.toggle();
    }

    fn point(&mut self, sink: &mut dyn PathSink, x: f64, y: f64) {
        if self.point > 0 {
            self.k.measure(self.tangents, x, y);
        }
        match self.point {
            0 => self.point = 1,
            1 => self.point = 2,
            2 => {
                self.point = 3;
                self.line.move_or_line(sink, self.k.x2, self.k.y2);
            }
            _ => {
                self.point = 4;
                self.k.bezier(self.tangents, sink, x, y);
            }
        }
        self.k.shift(x, y);
    }
}

/// Spline closed into a loop through every point
#[derive(Debug, Clone)]
pub struct SplineClosed {
    tangents: Tangents,
    point: u8,
    k: Knots,
    head: [(f64, f64); 3],
}

impl SplineClosed {
    pub fn new(tangents: Tangents) -> Self {
        Self {
            tangents,
            point: 0,
            k: Knots::default(),
            head: [(f64::NAN, f64::NAN); 3],
        }
    }

    pub fn cardinal(tension: f64) -> Self {
        Self::new(Tangents::Cardinal(tension))
    }

    pub fn catmull_rom(alpha: f64) -> Self {
        Self::new(Tangents::CatmullRom(alpha))
    }
}

impl Curve for SplineClosed {
    fn line_start(&mut self) {
        self.k = Knots::default();
        self.head = [(f64::NAN, f64::NAN); 3];
        self.point = 0;
    }

    fn line_end(&mut self, sink: &mut dyn PathSink) {
        let [(x3, y3), (x4, y4), (x5, y5)] = self.head;
        match self.point {
            1 => {
                sink.move_to(x3, y3);
                sink.close_path();
            }
            2 => {
                sink.line_to(x3, y3);
                sink.close_path();
            }
            3 => {
                self.point(sink, x3, y3);
                self.point(sink, x4, y4);
                self.point(sink, x5, y5);
            }
            _ => {}
        }
    }

    fn point(&mut self, sink: &mut dyn PathSink, x: f64, y: f64) {
        if self.point > 0 {
            self.k.measure(self.tangents, x, y);
        }
        match self.point {
            0 => {
                self.point = 1;
                self.head[0] = (x, y);
            }
            1 => {
                self.point = 2;
                self.head[1] = (x, y);
                sink.move_to(x, y);
            }
            2 => {
                self.point = 3;
                self.head[2] = (x, y);
            }
            _ => self.k.bezier(self.tangents, sink, x, y),
        }
        self.k.shift(x, y);
    }
}
