use avenger_geometry::{Bounds, PathSink};
use avenger_common::format::fmt_num;
use avenger_geometry::hit::{stroke_contains, PathRecorder};

use super::{bound_stroke, pick_items, translate_item, AttributeSink};
use crate::props::ItemProps;
use crate::scene::{ItemId, MarkId, Scene};
use crate::style::stroke;
use crate::surface::DrawingSurface;

fn end_point(props: &ItemProps) -> (f64, f64) {
    (props.x2.unwrap_or(props.x()), props.y2.unwrap_or(props.y()))
}

pub fn attr(emit: &mut dyn AttributeSink, props: &ItemProps) {
    emit.attr("transform", Some(translate_item(props)));
    let x2 = props.x2.map(|x2| x2 - props.x()).unwrap_or(0.0);
    let y2 = props.y2.map(|y2| y2 - props.y()).unwrap_or(0.0);
    emit.attr("x2", Some(fmt_num(x2)));
    emit.attr("y2", Some(fmt_num(y2)));
}

pub fn bound(props: &ItemProps) -> Bounds {
    let (x2, y2) = end_point(props);
    let mut bounds = Bounds::from_coords(props.x(), props.y(), x2, y2);
    bound_stroke(&mut bounds, props);
    bounds
}

fn line_path(sink: &mut dyn PathSink, props: &ItemProps) {
    let (x2, y2) = end_point(props);
    sink.begin_path();
    sink.move_to(props.x(), props.y());
    sink.line_to(x2, y2);
}

/// Rules paint only a stroke
pub fn draw<S: DrawingSurface>(surface: &mut S, scene: &Scene, mark: MarkId, clip: Option<&Bounds>) {
    scene.visit_items(mark, |id| {
        let item = scene.item(id);
        if clip.map_or(false, |b| !b.intersects(&item.bounds)) {
            return;
        }
        let opacity = item.props.opacity();
        if opacity != 0.0 && stroke(surface, &item.props, &item.bounds, opacity) {
            line_path(surface, &item.props);
            surface.stroke();
        }
    });
}

fn hit(props: &ItemProps, gx: f64, gy: f64) -> bool {
    let visible = props.stroke.is_some()
        && props.stroke_width() > 0.0
        && props.stroke_opacity.unwrap_or(1.0) > 0.0;
    if !visible {
        return false;
    }
    let mut recorder = PathRecorder::new();
    line_path(&mut recorder, props);
    stroke_contains(&recorder.build(), gx, gy, props.stroke_width())
}

pub fn pick(scene: &Scene, mark: MarkId, gx: f64, gy: f64) -> Option<ItemId> {
    pick_items(scene, mark, gx, gy, |id| hit(&scene.item(id).props, gx, gy))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> ItemProps {
        ItemProps {
            x: Some(10.0),
            y: Some(10.0),
            x2: Some(30.0),
            stroke: Some("black".into()),
            stroke_width: Some(2.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_attr_relative_end_point() {
        let mut attrs: Vec<(String, Option<String>)> = Vec::new();
        attr(&mut attrs, &rule());
        assert_eq!(attrs[1], ("x2".to_string(), Some("20".to_string())));
        assert_eq!(attrs[2], ("y2".to_string(), Some("0".to_string())));
    }

    #[test]
    fn test_stroke_hit() {
        assert!(hit(&rule(), 20.0, 10.5));
        assert!(!hit(&rule(), 20.0, 12.5));
        let unstroked = ItemProps {
            stroke: None,
            ..rule()
        };
        assert!(!hit(&unstroked, 20.0, 10.0));
    }
}
