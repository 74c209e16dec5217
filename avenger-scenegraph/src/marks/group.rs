use avenger_geometry::{Bounds, PathStringBuilder};

use super::rect::rectangle;
use super::{bound_stroke, translate_item, AttributeSink, MarkType};
use crate::draw::draw_mark;
use crate::props::ItemProps;
use crate::scene::{ItemId, MarkId, Scene};
use crate::style::{fill, stroke};
use crate::surface::DrawingSurface;

/// Inset of a stroked background so a one pixel stroke lands on pixel centers
pub const STROKE_OFFSET: f64 = 0.5;

fn background_offset(props: &ItemProps) -> f64 {
    if props.stroke.is_some() {
        STROKE_OFFSET
    } else {
        0.0
    }
}

pub fn attr(emit: &mut dyn AttributeSink, props: &ItemProps) {
    emit.attr("transform", Some(translate_item(props)));
}

/// Attributes of the background path of a group item
pub fn background(emit: &mut dyn AttributeSink, props: &ItemProps) {
    let offset = background_offset(props);
    let mut builder = PathStringBuilder::new();
    rectangle(&mut builder, props, Some((offset, offset)));
    emit.attr("class", Some("background".to_string()));
    emit.attr("d", builder.finish());
}

/// Attributes of the foreground container. `clip_url` is the clip path
/// reference assigned by the renderer when the group clips.
pub fn foreground(emit: &mut dyn AttributeSink, clip_url: Option<String>) {
    emit.attr("clip-path", clip_url);
}

/// Whether the group item clips its content
pub fn clips(scene: &Scene, item: ItemId) -> bool {
    scene.item(item).props.clips()
}

pub fn bound(scene: &Scene, item: ItemId) -> Bounds {
    let group = scene.item(item);
    let props = &group.props;
    let clip = props.clips();
    let mut bounds = Bounds::new();

    if !clip {
        for mark in &group.items {
            if let Some(m) = scene.try_mark(*mark) {
                bounds.union(&m.bounds);
            }
        }
    }

    let (w, h) = (props.width(), props.height());
    if clip || w != 0.0 || h != 0.0 {
        bounds.add(0.0, 0.0).add(w, h);
        bound_stroke(&mut bounds, props);
    }

    bounds.translate(props.x(), props.y());
    bounds
}

pub fn draw<S: DrawingSurface>(surface: &mut S, scene: &Scene, mark: MarkId, clip: Option<&Bounds>) {
    scene.visit_items(mark, |id| {
        let group = scene.item(id);
        let props = &group.props;
        let (gx, gy) = (props.x(), props.y());

        surface.save();
        surface.translate(gx, gy);

        if props.fill.is_some() || props.stroke.is_some() {
            let opacity = props.opacity();
            if opacity > 0.0 {
                let offset = background_offset(props);
                surface.begin_path();
                rectangle(surface, props, Some((offset, offset)));
                if props.fill.is_some() && fill(surface, props, &group.bounds, opacity) {
                    surface.fill();
                }
                if props.stroke.is_some() && stroke(surface, props, &group.bounds, opacity) {
                    surface.stroke();
                }
            }
        }

        if props.clips() {
            surface.begin_path();
            surface.rect(0.0, 0.0, props.width(), props.height());
            surface.clip();
        }

        let local = clip.map(|b| {
            let mut b = *b;
            b.translate(-gx, -gy);
            b
        });
        scene.visit_marks(id, |child| {
            draw_mark(surface, scene, child, local.as_ref());
        });

        surface.restore();
    });
}

/// Child marks are considered when interactive (groups always are) and
/// their bounds contain the local point
fn pick_mark(scene: &Scene, mark: MarkId, x: f64, y: f64) -> bool {
    let m = scene.mark(mark);
    (m.interactive || m.marktype == MarkType::Group) && m.bounds.contains(x, y)
}

pub fn pick(scene: &Scene, mark: MarkId, gx: f64, gy: f64) -> Option<ItemId> {
    let m = scene.mark(mark);
    if !m.bounds.contains(gx, gy) {
        return None;
    }
    let interactive = m.interactive;

    scene.pick_visit_items(mark, |id| {
        let group = scene.item(id);
        if !group.bounds.contains(gx, gy) {
            return None;
        }
        let props = &group.props;
        let dx = gx - props.x();
        let dy = gy - props.y();

        let hit = scene.pick_visit_marks(id, |child| {
            if pick_mark(scene, child, dx, dy) {
                scene.pick(child, dx, dy)
            } else {
                None
            }
        });
        if hit.is_some() {
            return hit;
        }

        let background = interactive
            && (props.fill.is_some() || props.stroke.is_some())
            && props.width.is_some_and(|w| dx >= 0.0 && dx <= w)
            && props.height.is_some_and(|h| dy >= 0.0 && dy <= h);
        background.then_some(id)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MarkDef;

    fn group_scene(clip: bool) -> (Scene, ItemId) {
        let mut scene = Scene::new();
        let root = scene.root_group().unwrap();
        let groups = scene
            .add_mark(root, MarkDef::new(MarkType::Group))
            .unwrap();
        let group = scene
            .add_item(
                groups,
                ItemProps {
                    x: Some(10.0),
                    y: Some(20.0),
                    width: Some(50.0),
                    height: Some(40.0),
                    fill: Some("white".into()),
                    clip: clip.then_some(true),
                    ..Default::default()
                },
            )
            .unwrap();
        let rects = scene.add_mark(group, MarkDef::new(MarkType::Rect)).unwrap();
        scene
            .add_item(
                rects,
                ItemProps {
                    x: Some(40.0),
                    y: Some(30.0),
                    width: Some(100.0),
                    height: Some(10.0),
                    fill: Some("red".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        scene.bound_all();
        (scene, group)
    }

    #[test]
    fn test_bounds_union_children_unless_clipped() {
        let (scene, group) = group_scene(false);
        assert_eq!(scene.item(group).bounds, Bounds::from_coords(10.0, 20.0, 150.0, 60.0));

        let (scene, group) = group_scene(true);
        assert_eq!(scene.item(group).bounds, Bounds::from_coords(10.0, 20.0, 60.0, 60.0));
    }

    #[test]
    fn test_background_attr_offsets_when_stroked() {
        let props = ItemProps {
            width: Some(10.0),
            height: Some(10.0),
            stroke: Some("black".into()),
            ..Default::default()
        };
        let mut attrs: Vec<(String, Option<String>)> = Vec::new();
        background(&mut attrs, &props);
        assert_eq!(attrs[0], ("class".to_string(), Some("background".to_string())));
        assert_eq!(attrs[1], ("d".to_string(), Some("M0.5,0.5h10v10h-10Z".to_string())));
    }

    #[test]
    fn test_pick_child_then_background() {
        let (scene, group) = group_scene(false);
        let root = scene.root();
        // Inside the child rect, in root coordinates
        let hit = scene.pick(root, 60.0, 55.0).unwrap();
        assert_eq!(scene.mark(scene.item_mark(hit)).marktype, MarkType::Rect);
        // Inside the group background only
        assert_eq!(scene.pick(root, 15.0, 25.0), Some(group));
        // Outside everything
        assert_eq!(scene.pick(root, 5.0, 5.0), None);
    }

    #[test]
    fn test_clipped_group_hides_overflowing_children() {
        let (scene, group) = group_scene(true);
        let root = scene.root();
        // Child rect visible part, inside the clip box
        let hit = scene.pick(root, 55.0, 55.0).unwrap();
        assert_eq!(scene.mark(scene.item_mark(hit)).marktype, MarkType::Rect);
        // Child rect overflow, outside the clip box
        assert_eq!(scene.pick(root, 100.0, 55.0), None);
        assert!(clips(&scene, group));
    }
}
