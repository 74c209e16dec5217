//! Interpolation curves for line and area generators.
//!
//! A curve receives a stream of points between `line_start` and `line_end`
//! and writes path commands into a [`PathSink`]. Area generators bracket the
//! top line and the reversed baseline with `area_start` / `area_end` so the
//! two lines join into one closed outline.

mod basis;
mod cardinal;
mod linear;
mod monotone;
mod natural;

pub use basis::{Basis, BasisClosed, BasisOpen, Bundle};
pub use cardinal::{Spline, SplineClosed, SplineOpen, Tangents};
pub use linear::{Linear, LinearClosed, Step};
pub use monotone::Monotone;
pub use natural::Natural;

use avenger_common::types::AreaOrientation;

use crate::sink::PathSink;

pub trait Curve {
    fn area_start(&mut self) {}

    fn area_end(&mut self) {}

    fn line_start(&mut self);

    fn line_end(&mut self, sink: &mut dyn PathSink);

    fn point(&mut self, sink: &mut dyn PathSink, x: f64, y: f64);
}

/// Tracks whether a curve is drawing a standalone line or one of the two
/// lines of an area.
///
/// Outside an area there is no line index. Inside an area the top line is
/// line 0 and the baseline is line 1; the baseline continues the outline with
/// a `line_to` instead of a `move_to` and closes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct LineState(Option<bool>);

impl LineState {
    pub(crate) fn area_start(&mut self) {
        self.0 = Some(false);
    }

    pub(crate) fn area_end(&mut self) {
        self.0 = None;
    }

    /// True while drawing the second line of an area
    pub(crate) fn continuing(&self) -> bool {
        self.0 == Some(true)
    }

    pub(crate) fn in_area(&self) -> bool {
        self.0.is_some()
    }

    /// Close the path when drawing a baseline, or for a standalone line
    /// when `degenerate` holds
    pub(crate) fn should_close(&self, degenerate: bool) -> bool {
        self.continuing() || (self.0.is_none() && degenerate)
    }

    pub(crate) fn toggle(&mut self) {
        if let Some(b) = self.0 {
            self.0 = Some(!b);
        }
    }

    pub(crate) fn move_or_line(&self, sink: &mut dyn PathSink, x: f64, y: f64) {
        if self.continuing() {
            sink.line_to(x, y);
        } else {
            sink.move_to(x, y);
        }
    }
}

/// Build the curve registered under `name`.
///
/// `tension` overrides the curve parameter for bundle (beta), cardinal
/// (tension) and catmull-rom (alpha). Monotone interpolation is monotone in
/// x for vertical orientation and in y for horizontal orientation. Unknown
/// names fall back to linear.
pub fn curve_for(name: &str, orientation: AreaOrientation, tension: Option<f64>) -> Box<dyn Curve> {
    match name {
        "basis" => Box::new(Basis::new()),
        "basis-closed" => Box::new(BasisClosed::new()),
        "basis-open" => Box::new(BasisOpen::new()),
        "bundle" => {
            let beta = tension.unwrap_or(0.85);
            if beta == 1.0 {
                Box::new(Basis::new())
            } else {
                Box::new(Bundle::new(beta))
            }
        }
        "cardinal" => Box::new(Spline::cardinal(tension.unwrap_or(0.0))),
        "cardinal-open" => Box::new(SplineOpen::cardinal(tension.unwrap_or(0.0))),
        "cardinal-closed" => Box::new(SplineClosed::cardinal(tension.unwrap_or(0.0))),
        "catmull-rom" => match tension.unwrap_or(0.5) {
            alpha if alpha == 0.0 => Box::new(Spline::cardinal(0.0)),
            alpha => Box::new(Spline::catmull_rom(alpha)),
        },
        "catmull-rom-open" => match tension.unwrap_or(0.5) {
            alpha if alpha == 0.0 => Box::new(SplineOpen::cardinal(0.0)),
            alpha => Box::new(SplineOpen::catmull_rom(alpha)),
        },
        "catmull-rom-closed" => match tension.unwrap_or(0.5) {
            alpha if alpha == 0.0 => Box::new(SplineClosed::cardinal(0.0)),
            alpha => Box::new(SplineClosed::catmull_rom(alpha)),
        },
        "linear-closed" => Box::new(LinearClosed::new()),
        "monotone" => match orientation {
            AreaOrientation::Vertical => Box::new(Monotone::x()),
            AreaOrientation::Horizontal => Box::new(Monotone::y()),
        },
        "natural" => Box::new(Natural::new()),
        "step" => Box::new(Step::new(0.5)),
        "step-after" => Box::new(Step::new(1.0)),
        "step-before" => Box::new(Step::new(0.0)),
        _ => Box::new(Linear::new()),
    }
}
