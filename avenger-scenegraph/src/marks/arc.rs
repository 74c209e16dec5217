use avenger_geometry::sector::ArcSector;
use avenger_geometry::{Bounds, PathSink};

use super::{draw_all, item_path, pick_items, AttributeSink};
use crate::props::ItemProps;
use crate::scene::{ItemId, MarkId, Scene};
use crate::surface::DrawingSurface;

pub fn sector(props: &ItemProps) -> ArcSector {
    ArcSector {
        inner_radius: props.inner_radius.unwrap_or(0.0),
        outer_radius: props.outer_radius.unwrap_or(0.0),
        start_angle: props.start_angle.unwrap_or(0.0),
        end_angle: props.end_angle.unwrap_or(0.0),
        pad_angle: props.pad_angle.unwrap_or(0.0),
        corner_radius: props.corner_radius.unwrap_or(0.0),
    }
}

pub fn shape(sink: &mut dyn PathSink, props: &ItemProps) {
    sector(props).draw(sink);
}

pub fn attr(emit: &mut dyn AttributeSink, props: &ItemProps) {
    item_path::attr(emit, props, |sink| shape(sink, props));
}

pub fn bound(props: &ItemProps) -> Bounds {
    item_path::bound(props, |sink| shape(sink, props))
}

pub fn draw<S: DrawingSurface>(surface: &mut S, scene: &Scene, mark: MarkId, clip: Option<&Bounds>) {
    draw_all(surface, scene, mark, clip, |s, id: ItemId| {
        let props = &scene.item(id).props;
        item_path::draw(s, props, |sink| shape(sink, props));
        false
    });
}

pub fn pick(scene: &Scene, mark: MarkId, gx: f64, gy: f64) -> Option<ItemId> {
    pick_items(scene, mark, gx, gy, |id| {
        let props = &scene.item(id).props;
        item_path::hit(props, gx, gy, |sink| shape(sink, props))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, TAU};

    fn pie(start: f64, end: f64) -> ItemProps {
        ItemProps {
            x: Some(50.0),
            y: Some(50.0),
            outer_radius: Some(10.0),
            start_angle: Some(start),
            end_angle: Some(end),
            fill: Some("red".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_full_circle_bounds_are_translated() {
        let b = bound(&pie(0.0, TAU));
        assert!((b.x1 - 40.0).abs() < 1e-9);
        assert!((b.y2 - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_attr_translates_and_emits_path() {
        let mut attrs: Vec<(String, Option<String>)> = Vec::new();
        attr(&mut attrs, &pie(0.0, FRAC_PI_2));
        assert_eq!(attrs[0], ("transform".to_string(), Some("translate(50,50)".to_string())));
        assert_eq!(attrs[1].0, "d");
        assert!(attrs[1].1.as_deref().unwrap().ends_with("A10,10,0,0,1,10,0L0,0Z"));
    }
}
