use avenger_geometry::path::render_path;
use avenger_geometry::{Bounds, BoundsSink, PathSink};

use super::{bound_stroke, draw_all, hit_path, pick_items, translate_item, AttributeSink};
use crate::props::ItemProps;
use crate::scene::{ItemId, MarkId, Scene};
use crate::surface::DrawingSurface;

/// Replay the item's path offset by `(x, y)`. Returns `true` when the item
/// has no path.
fn render(sink: &mut dyn PathSink, scene: &Scene, item: ItemId) -> bool {
    let props = &scene.item(item).props;
    let Some(path) = &props.path else {
        return true;
    };
    let segments = scene.path_segments(item, path);
    render_path(sink, &segments, props.x(), props.y(), 1.0);
    false
}

pub fn attr(emit: &mut dyn AttributeSink, props: &ItemProps) {
    emit.attr("transform", Some(translate_item(props)));
    emit.attr("d", props.path.clone());
}

pub fn bound(scene: &Scene, item: ItemId) -> Bounds {
    let mut bounds = Bounds::new();
    let missing = render(&mut BoundsSink::new(&mut bounds), scene, item);
    if missing {
        bounds.set(0.0, 0.0, 0.0, 0.0);
    } else {
        bound_stroke(&mut bounds, &scene.item(item).props);
    }
    bounds
}

pub fn draw<S: DrawingSurface>(surface: &mut S, scene: &Scene, mark: MarkId, clip: Option<&Bounds>) {
    draw_all(surface, scene, mark, clip, |s, id| {
        s.begin_path();
        render(s, scene, id)
    });
}

pub fn pick(scene: &Scene, mark: MarkId, gx: f64, gy: f64) -> Option<ItemId> {
    pick_items(scene, mark, gx, gy, |id| {
        hit_path(&scene.item(id).props, gx, gy, |recorder| render(recorder, scene, id))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marks::MarkType;
    use crate::scene::MarkDef;

    #[test]
    fn test_missing_path_bounds_to_origin() {
        let mut scene = Scene::new();
        let root = scene.root_group().unwrap();
        let mark = scene.add_mark(root, MarkDef::new(MarkType::Path)).unwrap();
        let empty = scene.add_item(mark, ItemProps::default()).unwrap();
        assert_eq!(bound(&scene, empty), Bounds::from_coords(0.0, 0.0, 0.0, 0.0));

        let item = scene
            .add_item(
                mark,
                ItemProps {
                    x: Some(10.0),
                    path: Some("M0,0h5v5".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(bound(&scene, item), Bounds::from_coords(10.0, 0.0, 15.0, 5.0));
    }
}
