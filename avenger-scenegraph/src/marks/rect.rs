use avenger_geometry::shape::rounded_rect;
use avenger_geometry::{Bounds, PathSink, PathStringBuilder};

use super::{bound_stroke, draw_all, hit_path, pick_items, AttributeSink};
use crate::props::ItemProps;
use crate::scene::{ItemId, MarkId, Scene};
use crate::surface::DrawingSurface;

/// Rounded rectangle of the item, placed at `origin` instead of `(x, y)`
/// when given
pub fn rectangle(sink: &mut dyn PathSink, props: &ItemProps, origin: Option<(f64, f64)>) {
    let (x, y) = origin.unwrap_or((props.x(), props.y()));
    rounded_rect(
        sink,
        x,
        y,
        props.width(),
        props.height(),
        props.corner_radius.unwrap_or(0.0),
    );
}

pub fn attr(emit: &mut dyn AttributeSink, props: &ItemProps) {
    let mut builder = PathStringBuilder::new();
    rectangle(&mut builder, props, None);
    emit.attr("d", builder.finish());
}

pub fn bound(props: &ItemProps) -> Bounds {
    let (x, y) = (props.x(), props.y());
    let mut bounds = Bounds::from_coords(x, y, x + props.width(), y + props.height());
    bound_stroke(&mut bounds, props);
    bounds
}

pub fn draw<S: DrawingSurface>(surface: &mut S, scene: &Scene, mark: MarkId, clip: Option<&Bounds>) {
    draw_all(surface, scene, mark, clip, |s, id| {
        s.begin_path();
        rectangle(s, &scene.item(id).props, None);
        false
    });
}

pub fn pick(scene: &Scene, mark: MarkId, gx: f64, gy: f64) -> Option<ItemId> {
    pick_items(scene, mark, gx, gy, |id| {
        let props = &scene.item(id).props;
        hit_path(props, gx, gy, |recorder| {
            rectangle(recorder, props, None);
            false
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_uses_absolute_position() {
        let props = ItemProps {
            x: Some(1.0),
            y: Some(2.0),
            width: Some(3.0),
            height: Some(4.0),
            ..Default::default()
        };
        let mut attrs: Vec<(String, Option<String>)> = Vec::new();
        attr(&mut attrs, &props);
        assert_eq!(attrs, vec![("d".to_string(), Some("M1,2h3v4h-3Z".to_string()))]);
    }

    #[test]
    fn test_bounds_without_visible_stroke() {
        let props = ItemProps {
            x: Some(10.0),
            width: Some(-5.0),
            height: Some(5.0),
            stroke: Some("black".into()),
            opacity: Some(0.0),
            ..Default::default()
        };
        // Negative width swaps the corners, a transparent stroke adds no pad
        assert_eq!(bound(&props), Bounds::from_coords(5.0, 0.0, 10.0, 5.0));
    }
}
