use avenger_geometry::line::{line, LinePoint};
use avenger_geometry::{Bounds, PathSink};

use super::nested_path::{self, curve};
use super::AttributeSink;
use crate::props::ItemProps;
use crate::scene::{ItemId, MarkId, Scene};
use crate::surface::DrawingSurface;

pub fn shape(sink: &mut dyn PathSink, items: &[&ItemProps]) {
    let Some(first) = items.first() else {
        return;
    };
    let points: Vec<LinePoint> = items
        .iter()
        .map(|p| LinePoint {
            defined: p.is_defined(),
            ..LinePoint::new(p.x(), p.y())
        })
        .collect();
    line(sink, curve(first).as_mut(), &points);
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
