use avenger_geometry::path::render_path;
use avenger_geometry::{Bounds, PathSink};

use super::{draw_all, item_path, pick_items, AttributeSink};
use crate::scene::{ItemId, MarkId, Scene};
use crate::surface::DrawingSurface;

/// Mark-level shape generator when one is set, otherwise the item `path`
/// replayed around the origin
pub fn shape(sink: &mut dyn PathSink, scene: &Scene, item: ItemId) {
    let it = scene.item(item);
    if let Some(generator) = &scene.mark(it.mark).shape {
        generator.draw(sink, &it.props);
    } else if let Some(path) = &it.props.path {
        render_path(sink, &scene.path_segments(item, path), 0.0, 0.0, 1.0);
    }
}

pub fn attr(emit: &mut dyn AttributeSink, scene: &Scene, item: ItemId) {
    item_path::attr(emit, &scene.item(item).props, |sink| shape(sink, scene, item));
}

pub fn bound(scene: &Scene, item: ItemId) -> Bounds {
    item_path::bound(&scene.item(item).props, |sink| shape(sink, scene, item))
}

pub fn draw<S: DrawingSurface>(surface: &mut S, scene: &Scene, mark: MarkId, clip: Option<&Bounds>) {
    draw_all(surface, scene, mark, clip, |s, id| {
        item_path::draw(s, &scene.item(id).props, |sink| shape(sink, scene, id));
        false
    });
}

pub fn pick(scene: &Scene, mark: MarkId, gx: f64, gy: f64) -> Option<ItemId> {
    pick_items(scene, mark, gx, gy, |id| {
        item_path::hit(&scene.item(id).props, gx, gy, |sink| shape(sink, scene, id))
    })
}
