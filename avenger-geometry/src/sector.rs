use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::sink::PathSink;

const EPSILON: f64 = 1e-12;

/// Annular sector centered on the origin.
///
/// Angles are in radians, measured clockwise from twelve o'clock.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ArcSector {
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub pad_angle: f64,
    pub corner_radius: f64,
}

struct CornerTangent {
    cx: f64,
    cy: f64,
    x01: f64,
    y01: f64,
    x11: f64,
    y11: f64,
}

fn safe_acos(x: f64) -> f64 {
    if x > 1.0 {
        0.0
    } else if x < -1.0 {
        PI
    } else {
        x.acos()
    }
}

fn safe_asin(x: f64) -> f64 {
    if x >= 1.0 {
        FRAC_PI_2
    } else if x <= -1.0 {
        -FRAC_PI_2
    } else {
        x.asin()
    }
}

#[allow(clippy::too_many_arguments)]
fn intersect(
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    x3: f64,
    y3: f64,
) -> Option<(f64, f64)> {
    let x10 = x1 - x0;
    let y10 = y1 - y0;
    let x32 = x3 - x2;
    let y32 = y3 - y2;
    let t = y32 * x10 - x32 * y10;
    if t * t < EPSILON {
        return None;
    }
    let t = (x32 * (y0 - y2) - y32 * (x0 - x2)) / t;
    Some((x0 + t * x10, y0 + t * y10))
}

/// Center and tangent points of a corner circle of radius `rc` that is tangent
/// to the ring of radius `r1` and to the radial line through the two points.
fn corner_tangents(x0: f64, y0: f64, x1: f64, y1: f64, r1: f64, rc: f64, cw: bool) -> CornerTangent {
    let x01 = x0 - x1;
    let y01 = y0 - y1;
    let lo = if cw { rc } else { -rc } / (x01 * x01 + y01 * y01).sqrt();
    let ox = lo * y01;
    let oy = -lo * x01;
    let x11 = x0 + ox;
    let y11 = y0 + oy;
    let x10 = x1 + ox;
    let y10 = y1 + oy;
    let x00 = (x11 + x10) / 2.0;
    let y00 = (y11 + y10) / 2.0;
    let dx = x10 - x11;
    let dy = y10 - y11;
    let d2 = dx * dx + dy * dy;
    let r = r1 - rc;
    let big_d = x11 * y10 - x10 * y11;
    let d = if dy < 0.0 { -1.0 } else { 1.0 } * (r * r * d2 - big_d * big_d).max(0.0).sqrt();
    let mut cx0 = (big_d * dy - dx * d) / d2;
    let mut cy0 = (-big_d * dx - dy * d) / d2;
    let cx1 = (big_d * dy + dx * d) / d2;
    let cy1 = (-big_d * dx + dy * d) / d2;
    let dx0 = cx0 - x00;
    let dy0 = cy0 - y00;
    let dx1 = cx1 - x00;
    let dy1 = cy1 - y00;

    // Pick the intersection closer to the segment midpoint
    if dx0 * dx0 + dy0 * dy0 > dx1 * dx1 + dy1 * dy1 {
        cx0 = cx1;
        cy0 = cy1;
    }

    CornerTangent {
        cx: cx0,
        cy: cy0,
        x01: -ox,
        y01: -oy,
        x11: cx0 * (r1 / r - 1.0),
        y11: cy0 * (r1 / r - 1.0),
    }
}

impl ArcSector {
    pub fn draw(&self, sink: &mut dyn PathSink) {
        let mut r0 = self.inner_radius;
        let mut r1 = self.outer_radius;
        let a0 = self.start_angle - FRAC_PI_2;
        let a1 = self.end_angle - FRAC_PI_2;
        let da = (a1 - a0).abs();
        let cw = a1 > a0;

        if r1 < r0 {
            std::mem::swap(&mut r0, &mut r1);
        }

        if !(r1 > EPSILON) {
            // A point
            sink.move_to(0.0, 0.0);
        } else if da > TAU - EPSILON {
            // A circle or annulus
            sink.move_to(r1 * a0.cos(), r1 * a0.sin());
            sink.arc(0.0, 0.0, r1, a0, a1, !cw);
            if r0 > EPSILON {
                sink.move_to(r0 * a1.cos(), r0 * a1.sin());
                sink.arc(0.0, 0.0, r0, a1, a0, cw);
            }
        } else {
            self.draw_sector(sink, r0, r1, a0, a1, da, cw);
        }

        sink.close_path();
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_sector(
        &self,
        sink: &mut dyn PathSink,
        r0: f64,
        r1: f64,
        a0: f64,
        a1: f64,
        da: f64,
        cw: bool,
    ) {
        let mut a01 = a0;
        let mut a11 = a1;
        let mut a00 = a0;
        let mut a10 = a1;
        let mut da0 = da;
        let mut da1 = da;
        let ap = self.pad_angle / 2.0;
        let rp = if ap > EPSILON {
            (r0 * r0 + r1 * r1).sqrt()
        } else {
            0.0
        };
        let rc = ((r1 - r0).abs() / 2.0).min(self.corner_radius);
        let mut rc0 = rc;
        let mut rc1 = rc;

        if rp > EPSILON {
            let mut p0 = safe_asin(rp / r0 * ap.sin());
            let mut p1 = safe_asin(rp / r1 * ap.sin());
            da0 -= p0 * 2.0;
            if da0 > EPSILON {
                p0 *= if cw { 1.0 } else { -1.0 };
                a00 += p0;
                a10 -= p0;
            } else {
                da0 = 0.0;
                a00 = (a0 + a1) / 2.0;
                a10 = a00;
            }
            da1 -= p1 * 2.0;
            if da1 > EPSILON {
                p1 *= if cw { 1.0 } else { -1.0 };
                a01 += p1;
                a11 -= p1;
            } else {
                da1 = 0.0;
                a01 = (a0 + a1) / 2.0;
                a11 = a01;
            }
        }

        let x01 = r1 * a01.cos();
        let y01 = r1 * a01.sin();
        let x10 = r0 * a10.cos();
        let y10 = r0 * a10.sin();
        let x11 = r1 * a11.cos();
        let y11 = r1 * a11.sin();
        let x00 = r0 * a00.cos();
        let y00 = r0 * a00.sin();

        // Restrict the corner radius according to the sector angle
        if rc > EPSILON && da < PI {
            let oc = if da0 > EPSILON {
                intersect(x01, y01, x00, y00, x11, y11, x10, y10)
            } else {
                Some((x10, y10))
            };
            if let Some((ocx, ocy)) = oc {
                let ax = x01 - ocx;
                let ay = y01 - ocy;
                let bx = x11 - ocx;
                let by = y11 - ocy;
                let kc = 1.0
                    / (safe_acos(
                        (ax * bx + ay * by)
                            / ((ax * ax + ay * ay).sqrt() * (bx * bx + by * by).sqrt()),
                    ) / 2.0)
                        .sin();
                let lc = (ocx * ocx + ocy * ocy).sqrt();
                rc0 = rc.min((r0 - lc) / (kc - 1.0));
                rc1 = rc.min((r1 - lc) / (kc + 1.0));
            }
        }

        // Outer ring
        if !(da1 > EPSILON) {
            sink.move_to(x01, y01);
        } else if rc1 > EPSILON {
            let t0 = corner_tangents(x00, y00, x01, y01, r1, rc1, cw);
            let t1 = corner_tangents(x11, y11, x10, y10, r1, rc1, cw);

            sink.move_to(t0.cx + t0.x01, t0.cy + t0.y01);

            if rc1 < rc {
                // Corners have merged
                sink.arc(
                    t0.cx,
                    t0.cy,
                    rc1,
                    t0.y01.atan2(t0.x01),
                    t1.y01.atan2(t1.x01),
                    !cw,
                );
            } else {
                sink.arc(
                    t0.cx,
                    t0.cy,
                    rc1,
                    t0.y01.atan2(t0.x01),
                    t0.y11.atan2(t0.x11),
                    !cw,
                );
                sink.arc(
                    0.0,
                    0.0,
                    r1,
                    (t0.cy + t0.y11).atan2(t0.cx + t0.x11),
                    (t1.cy + t1.y11).atan2(t1.cx + t1.x11),
                    !cw,
                );
                sink.arc(
                    t1.cx,
                    t1.cy,
                    rc1,
                    t1.y11.atan2(t1.x11),
                    t1.y01.atan2(t1.x01),
                    !cw,
                );
            }
        } else {
            sink.move_to(x01, y01);
            sink.arc(0.0, 0.0, r1, a01, a11, !cw);
        }

        // Inner ring, or the center point of a pie slice
        if !(r0 > EPSILON) || !(da0 > EPSILON) {
            sink.line_to(x10, y10);
        } else if rc0 > EPSILON {
            let t0 = corner_tangents(x10, y10, x11, y11, r0, -rc0, cw);
            let t1 = corner_tangents(x01, y01, x00, y00, r0, -rc0, cw);

            sink.line_to(t0.cx + t0.x01, t0.cy + t0.y01);

            if rc0 < rc {
                sink.arc(
                    t0.cx,
                    t0.cy,
                    rc0,
                    t0.y01.atan2(t0.x01),
                    t1.y01.atan2(t1.x01),
                    !cw,
                );
            } else {
                sink.arc(
                    t0.cx,
                    t0.cy,
                    rc0,
                    t0.y01.atan2(t0.x01),
                    t0.y11.atan2(t0.x11),
                    !cw,
                );
                sink.arc(
                    0.0,
                    0.0,
                    r0,
                    (t0.cy + t0.y11).atan2(t0.cx + t0.x11),
                    (t1.cy + t1.y11).atan2(t1.cx + t1.x11),
                    cw,
                );
                sink.arc(
                    t1.cx,
                    t1.cy,
                    rc0,
                    t1.y11.atan2(t1.x11),
                    t1.y01.atan2(t1.x01),
                    !cw,
                );
            }
        } else {
            sink.arc(0.0, 0.0, r0, a10, a00, cw);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::Bounds;
    use crate::sink::{BoundsSink, PathStringBuilder};
    use float_cmp::assert_approx_eq;

    fn sector_bounds(sector: &ArcSector) -> Bounds {
        let mut bounds = Bounds::new();
        sector.draw(&mut BoundsSink::new(&mut bounds));
        bounds
    }

    #[test]
    fn test_zero_radius_is_point() {
        let mut sink = PathStringBuilder::new();
        ArcSector::default().draw(&mut sink);
        assert_eq!(sink.finish().as_deref(), Some("M0,0Z"));
    }

    #[test]
    fn test_full_circle_bounds() {
        let sector = ArcSector {
            outer_radius: 10.0,
            end_angle: TAU,
            ..Default::default()
        };
        assert_eq!(sector_bounds(&sector), Bounds::from_coords(-10.0, -10.0, 10.0, 10.0));
    }

    #[test]
    fn test_quarter_pie_bounds() {
        // Twelve o'clock to three o'clock
        let sector = ArcSector {
            outer_radius: 10.0,
            end_angle: FRAC_PI_2,
            ..Default::default()
        };
        let b = sector_bounds(&sector);
        assert_approx_eq!(f64, b.x1, 0.0, epsilon = 1e-9);
        assert_approx_eq!(f64, b.y1, -10.0, epsilon = 1e-9);
        assert_approx_eq!(f64, b.x2, 10.0, epsilon = 1e-9);
        assert_approx_eq!(f64, b.y2, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pie_slice_path() {
        let sector = ArcSector {
            outer_radius: 10.0,
            end_angle: FRAC_PI_2,
            ..Default::default()
        };
        let mut sink = PathStringBuilder::new();
        sector.draw(&mut sink);
        let path = sink.finish().unwrap();
        assert!(path.starts_with('M'));
        assert!(path.ends_with(",-10A10,10,0,0,1,10,0L0,0Z"));
    }

    #[test]
    fn test_swapped_radii_and_corner_radius_stay_finite() {
        let sector = ArcSector {
            inner_radius: 20.0,
            outer_radius: 5.0,
            start_angle: 0.2,
            end_angle: 1.4,
            pad_angle: 0.05,
            corner_radius: 3.0,
        };
        let b = sector_bounds(&sector);
        assert!(!b.empty());
        assert!(b.x1.is_finite() && b.y1.is_finite() && b.x2.is_finite() && b.y2.is_finite());
        assert!(b.x2 <= 20.0 + 1e-9);
    }
}
