use super::{Curve, LineState};
use crate::sink::PathSink;

/// Natural cubic spline with zero second derivative at both ends
#[derive(Debug, Clone, Default)]
pub struct Natural {
    line: LineState,
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Natural {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Solve the tridiagonal system for the two bezier control points of each
/// segment along one axis
fn control_points(x: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = x.len() - 1;
    let mut a = vec![0.0; n];
    let mut b = vec![0.0; n];
    let mut r = vec![0.0; n];

    a[0] = 0.0;
    b[0] = 2.0;
    r[0] = x[0] + 2.0 * x[1];
    for i in 1..n.saturating_sub(1) {
        a[i] = 1.0;
        b[i] = 4.0;
        r[i] = 4.0 * x[i] + 2.0 * x[i + 1];
    }
    a[n - 1] = 2.0;
    b[n - 1] = 7.0;
    r[n - 1] = 8.0 * x[n - 1] + x[n];

    for i in 1..n {
        let m = a[i] / b[i - 1];
        b[i] -= m;
        r[i] -= m * r[i - 1];
    }
    a[n - 1] = r[n - 1] / b[n - 1];
    for i in (0..n.saturating_sub(1)).rev() {
        a[i] = (r[i] - a[i + 1]) / b[i];
    }
    b[n - 1] = (x[n] + a[n - 1]) / 2.0;
    for i in 0..n.saturating_sub(1) {
        b[i] = 2.0 * x[i + 1] - a[i + 1];
    }
    (a, b)
}

impl Curve for Natural {
    fn area_start(&mut self) {
        self.line.area_start();
    }

    fn area_end(&mut self) {
        self.line.area_end();
    }

    fn line_start(&mut self) {
        self.xs.clear();
        self.ys.clear();
    }

    fn line_end(&mut self, sink: &mut dyn PathSink) {
        let xs = std::mem::take(&mut self.xs);
        let ys = std::mem::take(&mut self.ys);
        let n = xs.len();

        if n > 0 {
            self.line.move_or_line(sink, xs[0], ys[0]);
            if n == 2 {
                sink.line_to(xs[1], ys[1]);
            } else if n > 2 {
                let (px0, px1) = control_points(&xs);
                let (py0, py1) = control_points(&ys);
                for i in 1..n {
                    sink.bezier_curve_to(px0[i - 1], py0[i - 1], px1[i - 1], py1[i - 1], xs[i], ys[i]);
                }
            }
        }

        if self.line.should_close(n == 1) {
            sink.close_path();
        }
        self.line.toggle();
    }

    fn point(&mut self, _sink: &mut dyn PathSink, x: f64, y: f64) {
        self.xs.push(x);
        self.ys.push(y);
    }
}
