use crate::curve::Curve;
use crate::sink::PathSink;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePoint {
    pub x: f64,
    pub y: f64,
    pub defined: bool,
}

impl LinePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            defined: true,
        }
    }
}

/// Sample of an area: the top line passes through `(x1, y1)` and the
/// baseline through `(x0, y0)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaPoint {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub defined: bool,
}

impl AreaPoint {
    /// Vertical area spanning `y1` (top) to `y0` (baseline) at `x`
    pub fn vertical(x: f64, y1: f64, y0: f64) -> Self {
        Self {
            x0: x,
            y0,
            x1: x,
            y1,
            defined: true,
        }
    }

    /// Horizontal area spanning `x1` to `x0` at `y`
    pub fn horizontal(y: f64, x1: f64, x0: f64) -> Self {
        Self {
            x0,
            y0: y,
            x1,
            y1: y,
            defined: true,
        }
    }
}

/// Feed each maximal run of defined points to `curve` as a separate line
pub fn line(sink: &mut dyn PathSink, curve: &mut dyn Curve, points: &[LinePoint]) {
    let mut in_run = false;
    for p in points {
        if p.defined != in_run {
            in_run = p.defined;
            if in_run {
                curve.line_start();
            } else {
                curve.line_end(sink);
            }
        }
        if in_run {
            curve.point(sink, p.x, p.y);
        }
    }
    if in_run {
        curve.line_end(sink);
    }
}

/// Feed each maximal run of defined points to `curve` as a closed area:
/// the top line forward, then the baseline in reverse.
pub fn area(sink: &mut dyn PathSink, curve: &mut dyn Curve, points: &[AreaPoint]) {
    let mut run_start: Option<usize> = None;

    for (i, p) in points.iter().enumerate() {
        match (run_start, p.defined) {
            (None, true) => {
                run_start = Some(i);
                curve.area_start();
                curve.line_start();
            }
            (Some(start), false) => {
                finish_area(sink, curve, &points[start..i]);
                run_start = None;
            }
            _ => {}
        }
        if p.defined {
            curve.point(sink, p.x1, p.y1);
        }
    }
    if let Some(start) = run_start {
        finish_area(sink, curve, &points[start..]);
    }
}

fn finish_area(sink: &mut dyn PathSink, curve: &mut dyn Curve, run: &[AreaPoint]) {
    curve.line_end(sink);
    curve.line_start();
    for p in run.iter().rev() {
        curve.point(sink, p.x0, p.y0);
    }
    curve.line_end(sink);
    curve.area_end();
}
