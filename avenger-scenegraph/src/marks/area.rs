use avenger_common::types::AreaOrientation;
use avenger_geometry::line::{area, AreaPoint};
use avenger_geometry::{Bounds, PathSink};

use super::nested_path::{self, curve};
use super::AttributeSink;
use crate::props::ItemProps;
use crate::scene::{ItemId, MarkId, Scene};
use crate::surface::DrawingSurface;

/// Vertical areas span `y` to `y + height` at each `x`; horizontal areas
/// span `x` to `x + width` at each `y`
pub fn shape(sink: &mut dyn PathSink, items: &[&ItemProps]) {
    let Some(first) = items.first() else {
        return;
    };
    let orient = first.orient.unwrap_or_default();
    let points: Vec<AreaPoint> = items
        .iter()
        .map(|p| {
            let point = match orient {
                AreaOrientation::Vertical => AreaPoint::vertical(p.x(), p.y(), p.y() + p.height()),
                AreaOrientation::Horizontal => {
                    AreaPoint::horizontal(p.y(), p.x(), p.x() + p.width())
                }
            };
            AreaPoint {
                defined: p.is_defined(),
                ..point
            }
        })
        .collect();
    area(sink, curve(first).as_mut(), &points);
}

pub fn attr(emit: &mut dyn AttributeSink, scene: &Scene, mark: MarkId) {
    nested_path::attr(emit, scene, mark, shape);
}

pub fn draw<S: DrawingSurface>(surface: &mut S, scene: &Scene, mark: MarkId, clip: Option<&Bounds>) {
    nested_path::draw(surface, scene, mark, clip, shape);
}

pub fn pick(scene: &Scene, mark: MarkId, gx: f64, gy: f64) -> Option<ItemId> {
    nested_path::pick(scene, mark, gx, gy, shape)
}
