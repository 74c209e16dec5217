use super::{Curve, LineState};
use crate::sink::PathSink;

/// Straight segments between consecutive points
#[derive(Debug, Clone, Default)]
pub struct Linear {
    line: LineState,
    point: u8,
}

impl Linear {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Curve for Linear {
    fn area_start(&mut self) {
        self.line.area_start();
    }

    fn area_end(&mut self) {
        self.line.area_end();
    }

    fn line_start(&mut self) {
        self.point = 0;
    }

    fn line_end(&mut self, sink: &mut dyn PathSink) {
        if self.line.should_close(self.point == 1) {
            sink.close_path();
        }
        self.line.toggle();
    }

    fn point(&mut self, sink: &mut dyn PathSink, x: f64, y: f64) {
        if self.point == 0 {
            self.point = 1;
            self.line.move_or_line(sink, x, y);
        } else {
            self.point = 2;
            sink.line_to(x, y);
        }
    }
}

/// Straight segments, closed back to the first point
#[derive(Debug, Clone, Default)]
pub struct LinearClosed {
    started: bool,
}

impl LinearClosed {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Curve for LinearClosed {
    fn line_start(&mut self) {
        self.started = false;
    }

    fn line_end(&mut self, sink: &mut dyn PathSink) {
        if self.started {
            sink.close_path();
        }
    }

    fn point(&mut self, sink: &mut dyn PathSink, x: f64, y: f64) {
        if self.started {
            sink.line_to(x, y);
        } else {
            self.started = true;
            sink.move_to(x, y);
        }
    }
}

/// Piecewise constant steps.
///
/// `t` places the vertical change between two points: 0 at the first point
/// (step-before), 1 at the second (step-after), 0.5 halfway (step).
#[derive(Debug, Clone)]
pub struct Step {
    t: f64,
    line: LineState,
    point: u8,
    x: f64,
    y: f64,
}

impl Step {
    pub fn new(t: f64) -> Self {
        Self {
            t,
            line: LineState::default(),
            point: 0,
            x: f64::NAN,
            y: f64::NAN,
        }
    }
}

impl Curve for Step {
    fn area_start(&mut self) {
        self.line.area_start();
    }

    fn area_end(&mut self) {
        self.line.area_end();
    }

    fn line_start(&mut self) {
        self.x = f64::NAN;
        self.y = f64::NAN;
        self.point = 0;
    }

    fn line_end(&mut self, sink: &mut dyn PathSink) {
        if 0.0 < self.t && self.t < 1.0 && self.point == 2 {
            sink.line_to(self.x, self.y);
        }
        if self.line.should_close(self.point == 1) {
            sink.close_path();
        }
        if self.line.in_area() {
            // The baseline runs backwards, so the step position mirrors
            self.t = 1.0 - self.t;
            self.line.toggle();
        }
    }

    fn point(&mut self, sink: &mut dyn PathSink, x: f64, y: f64) {
        if self.point == 0 {
            self.point = 1;
            self.line.move_or_line(sink, x, y);
        } else {
            self.point = 2;
            if self.t <= 0.0 {
                sink.line_to(self.x, y);
                sink.line_to(x, y);
            } else {
                let x1 = self.x * (1.0 - self.t) + x * self.t;
                sink.line_to(x1, self.y);
                sink.line_to(x1, y);
            }
        }
        self.x = x;
        self.y = y;
    }
}
