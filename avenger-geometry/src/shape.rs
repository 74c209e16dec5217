use std::f64::consts::{PI, TAU};

use crate::sink::PathSink;

/// Rectangle with optional rounded corners.
///
/// A corner radius of zero or less draws a plain rectangle, otherwise each
/// corner is a quadratic curve through the box corner.
pub fn rounded_rect(sink: &mut dyn PathSink, x: f64, y: f64, w: f64, h: f64, cr: f64) {
    if cr <= 0.0 || cr.is_nan() {
        sink.rect(x, y, w, h);
        return;
    }

    let x2 = x + w;
    let y2 = y + h;
    sink.move_to(x + cr, y);
    sink.line_to(x2 - cr, y);
    sink.quadratic_curve_to(x2, y, x2, y + cr);
    sink.line_to(x2, y2 - cr);
    sink.quadratic_curve_to(x2, y2, x2 - cr, y2);
    sink.line_to(x + cr, y2);
    sink.quadratic_curve_to(x, y2, x, y2 - cr);
    sink.line_to(x, y + cr);
    sink.quadratic_curve_to(x, y, x + cr, y);
    sink.close_path();
}

/// A sample of a trail: center position, width and whether it is defined
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub defined: bool,
}

impl TrailPoint {
    pub fn new(x: f64, y: f64, width: f64) -> Self {
        Self {
            x,
            y,
            width,
            defined: true,
        }
    }
}

/// Variable-width ribbon through a sequence of samples.
///
/// Undefined samples split the sequence into runs. Within a run every pair of
/// consecutive samples becomes a closed quad with round ends, so joints are
/// rounded. A pair of coincident samples draws a circle instead.
pub fn trail(sink: &mut dyn PathSink, points: &[TrailPoint]) {
    // Previous sample in the current run as (x, y, radius)
    let mut prev: Option<(f64, f64, f64)> = None;

    for p in points {
        if !p.defined {
            prev = None;
            continue;
        }
        let r2 = p.width / 2.0;
        if let Some((x1, y1, r1)) = prev {
            trail_segment(sink, x1, y1, r1, p.x, p.y, r2);
        }
        prev = Some((p.x, p.y, r2));
    }
}

fn trail_segment(sink: &mut dyn PathSink, x1: f64, y1: f64, r1: f64, x2: f64, y2: f64, r2: f64) {
    let ux = y1 - y2;
    let uy = x2 - x1;

    if ux != 0.0 || uy != 0.0 {
        // Unit normal of the segment
        let ud = (ux * ux + uy * uy).sqrt();
        let ux = ux / ud;
        let uy = uy / ud;
        let rx = ux * r1;
        let ry = uy * r1;
        let t = uy.atan2(ux);

        sink.move_to(x1 - rx, y1 - ry);
        sink.line_to(x2 - ux * r2, y2 - uy * r2);
        sink.arc(x2, y2, r2, t - PI, t, false);
        sink.line_to(x1 + rx, y1 + ry);
        sink.arc(x1, y1, r1, t, t + PI, false);
    } else {
        sink.arc(x2, y2, r2, 0.0, TAU, false);
    }
    sink.close_path();
}
