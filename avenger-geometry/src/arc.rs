//! Conversion of SVG elliptical arcs (endpoint parameterization) into cubic
//! bezier segments.

use std::collections::HashMap;
use std::f64::consts::PI;
use std::sync::{Arc, Mutex, PoisonError};

use lazy_static::lazy_static;
use ordered_float::OrderedFloat;

use crate::sink::PathSink;

/// One elliptical arc span of at most a quarter turn, in center parameterization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSegment {
    pub cx: f64,
    pub cy: f64,
    pub th0: f64,
    pub th1: f64,
    pub rx: f64,
    pub ry: f64,
    pub sin_th: f64,
    pub cos_th: f64,
}

impl ArcSegment {
    fn key(&self) -> [OrderedFloat<f64>; 8] {
        [
            self.cx, self.cy, self.th0, self.th1, self.rx, self.ry, self.sin_th, self.cos_th,
        ]
        .map(OrderedFloat)
    }
}

type SegmentKey = [OrderedFloat<f64>; 9];

lazy_static! {
    static ref SEGMENT_CACHE: Mutex<HashMap<SegmentKey, Arc<[ArcSegment]>>> =
        Mutex::new(HashMap::new());
    static ref BEZIER_CACHE: Mutex<HashMap<[OrderedFloat<f64>; 8], [f64; 6]>> =
        Mutex::new(HashMap::new());
}

pub(crate) fn clear_arc_caches() {
    SEGMENT_CACHE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clear();
    BEZIER_CACHE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clear();
}

/// Split the arc from `(ox, oy)` to `(x, y)` into segments of at most 90°.
///
/// `rotate_x` is in degrees. Radii that are too small to span the endpoints
/// are scaled up as required by the SVG arc implementation notes.
#[allow(clippy::too_many_arguments)]
pub fn arc_segments(
    x: f64,
    y: f64,
    rx: f64,
    ry: f64,
    large: bool,
    sweep: bool,
    rotate_x: f64,
    ox: f64,
    oy: f64,
) -> Arc<[ArcSegment]> {
    let key: SegmentKey = [
        x,
        y,
        rx,
        ry,
        f64::from(u8::from(large)),
        f64::from(u8::from(sweep)),
        rotate_x,
        ox,
        oy,
    ]
    .map(OrderedFloat);

    if let Some(cached) = SEGMENT_CACHE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
    {
        return cached.clone();
    }

    let th = rotate_x * (PI / 180.0);
    let (sin_th, cos_th) = th.sin_cos();
    let mut rx = rx.abs();
    let mut ry = ry.abs();
    let px = cos_th * (ox - x) * 0.5 + sin_th * (oy - y) * 0.5;
    let py = cos_th * (oy - y) * 0.5 - sin_th * (ox - x) * 0.5;
    let mut pl = (px * px) / (rx * rx) + (py * py) / (ry * ry);
    if pl > 1.0 {
        pl = pl.sqrt();
        rx *= pl;
        ry *= pl;
    }

    let a00 = cos_th / rx;
    let a01 = sin_th / rx;
    let a10 = -sin_th / ry;
    let a11 = cos_th / ry;
    let x0 = a00 * ox + a01 * oy;
    let y0 = a10 * ox + a11 * oy;
    let x1 = a00 * x + a01 * y;
    let y1 = a10 * x + a11 * y;

    let d = (x1 - x0) * (x1 - x0) + (y1 - y0) * (y1 - y0);
    let sfactor_sq = (1.0 / d - 0.25).max(0.0);
    let mut sfactor = sfactor_sq.sqrt();
    if sweep == large {
        sfactor = -sfactor;
    }
    let xc = 0.5 * (x0 + x1) - sfactor * (y1 - y0);
    let yc = 0.5 * (y0 + y1) + sfactor * (x1 - x0);

    let th0 = (y0 - yc).atan2(x0 - xc);
    let th1 = (y1 - yc).atan2(x1 - xc);

    let mut th_arc = th1 - th0;
    if th_arc < 0.0 && sweep {
        th_arc += 2.0 * PI;
    } else if th_arc > 0.0 && !sweep {
        th_arc -= 2.0 * PI;
    }

    let segs = (th_arc / (PI * 0.5 + 0.001)).abs().ceil() as usize;
    let result: Arc<[ArcSegment]> = (0..segs)
        .map(|i| ArcSegment {
            cx: xc,
            cy: yc,
            th0: th0 + i as f64 * th_arc / segs as f64,
            th1: th0 + (i + 1) as f64 * th_arc / segs as f64,
            rx,
            ry,
            sin_th,
            cos_th,
        })
        .collect();

    SEGMENT_CACHE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(key, result.clone());
    result
}

/// Cubic bezier control points `[x1, y1, x2, y2, x, y]` approximating one segment
pub fn segment_bezier(segment: &ArcSegment) -> [f64; 6] {
    let key = segment.key();
    if let Some(cached) = BEZIER_CACHE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
    {
        return *cached;
    }

    let ArcSegment {
        cx,
        cy,
        th0,
        th1,
        rx,
        ry,
        sin_th,
        cos_th,
    } = *segment;

    let a00 = cos_th * rx;
    let a01 = -sin_th * ry;
    let a10 = sin_th * rx;
    let a11 = cos_th * ry;

    let (sin_th0, cos_th0) = th0.sin_cos();
    let (sin_th1, cos_th1) = th1.sin_cos();

    let th_half = 0.5 * (th1 - th0);
    let sin_th_h2 = (th_half * 0.5).sin();
    let t = (8.0 / 3.0) * sin_th_h2 * sin_th_h2 / th_half.sin();
    let x1 = cx + cos_th0 - t * sin_th0;
    let y1 = cy + sin_th0 + t * cos_th0;
    let x3 = cx + cos_th1;
    let y3 = cy + sin_th1;
    let x2 = x3 + t * sin_th1;
    let y2 = y3 - t * cos_th1;

    let result = [
        a00 * x1 + a01 * y1,
        a10 * x1 + a11 * y1,
        a00 * x2 + a01 * y2,
        a10 * x2 + a11 * y2,
        a00 * x3 + a01 * y3,
        a10 * x3 + a11 * y3,
    ];
    BEZIER_CACHE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(key, result);
    result
}

/// Draw an SVG arc command from the current point `(x, y)`.
///
/// `coords` holds `[rx, ry, rotation, large_arc, sweep, end_x, end_y]`.
pub fn draw_arc(sink: &mut dyn PathSink, x: f64, y: f64, coords: [f64; 7]) {
    let [rx, ry, rotation, large, sweep, ex, ey] = coords;

    // Coincident endpoints omit the arc, zero radii degrade to a line
    if ex == x && ey == y {
        return;
    }
    if rx == 0.0 || ry == 0.0 {
        sink.line_to(ex, ey);
        return;
    }

    let segments = arc_segments(ex, ey, rx, ry, large != 0.0, sweep != 0.0, rotation, x, y);
    for segment in segments.iter() {
        let [x1, y1, x2, y2, x3, y3] = segment_bezier(segment);
        sink.bezier_curve_to(x1, y1, x2, y2, x3, y3);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn test_semicircle_splits_into_two_segments() {
        let segments = arc_segments(10.0, 0.0, 5.0, 5.0, false, true, 0.0, 0.0, 0.0);
        assert_eq!(segments.len(), 2);
        let last = segment_bezier(&segments[1]);
        assert_approx_eq!(f64, last[4], 10.0, epsilon = 1e-9);
        assert_approx_eq!(f64, last[5], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_segments_are_cached() {
        let a = arc_segments(3.0, 4.0, 5.0, 5.0, true, false, 15.0, 0.0, 0.0);
        let b = arc_segments(3.0, 4.0, 5.0, 5.0, true, false, 15.0, 0.0, 0.0);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_quarter_arc_control_points() {
        // Quarter circle of radius 1 from (1, 0) to (0, 1)
        let segments = arc_segments(0.0, 1.0, 1.0, 1.0, false, true, 0.0, 1.0, 0.0);
        assert_eq!(segments.len(), 1);
        let b = segment_bezier(&segments[0]);
        let k = 4.0 / 3.0 * (std::f64::consts::PI / 8.0).tan();
        assert_approx_eq!(f64, b[0], 1.0, epsilon = 1e-9);
        assert_approx_eq!(f64, b[1], k, epsilon = 1e-9);
        assert_approx_eq!(f64, b[2], k, epsilon = 1e-9);
        assert_approx_eq!(f64, b[3], 1.0, epsilon = 1e-9);
    }
}
