//! The twelve mark types and the operations every type provides: emit
//! retained-mode attributes, compute bounds, draw to an immediate-mode
//! surface and pick the item under a point.

pub mod arc;
pub mod area;
pub mod group;
pub mod image;
pub mod line;
pub mod path;
pub mod rect;
pub mod rule;
pub mod shape;
pub mod symbol;
pub mod text;
pub mod trail;

use avenger_common::format::fmt_num;
use avenger_geometry::hit::{fill_contains, stroke_contains, PathRecorder};
use avenger_geometry::{Bounds, BoundsSink, PathSink};
use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr, VariantNames};

use crate::props::ItemProps;
use crate::scene::{ItemId, MarkId, Scene};
use crate::style::{fill, stroke};
use crate::surface::DrawingSurface;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    VariantNames,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MarkType {
    Arc,
    Area,
    Group,
    Image,
    Line,
    Path,
    Rect,
    Rule,
    Shape,
    Symbol,
    Text,
    Trail,
}

impl MarkType {
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// SVG element used for each item
    pub fn tag(&self) -> &'static str {
        match self {
            MarkType::Group => "g",
            MarkType::Image => "image",
            MarkType::Rule => "line",
            MarkType::Text => "text",
            _ => "path",
        }
    }

    /// Nested types render all items of a mark as one element
    pub fn nested(&self) -> bool {
        matches!(self, MarkType::Area | MarkType::Line | MarkType::Trail)
    }

    /// Emit the geometry attributes of `item`. Styles are handled by the
    /// renderers. Nested types describe the whole mark through its first item.
    pub fn attr(&self, emit: &mut dyn AttributeSink, scene: &Scene, item: ItemId) {
        let props = &scene.item(item).props;
        match self {
            MarkType::Arc => arc::attr(emit, props),
            MarkType::Area => area::attr(emit, scene, scene.item_mark(item)),
            MarkType::Group => group::attr(emit, props),
            MarkType::Image => image::attr(emit, scene.item(item)),
            MarkType::Line => line::attr(emit, scene, scene.item_mark(item)),
            MarkType::Path => path::attr(emit, props),
            MarkType::Rect => rect::attr(emit, props),
            MarkType::Rule => rule::attr(emit, props),
            MarkType::Shape => shape::attr(emit, scene, item),
            MarkType::Symbol => symbol::attr(emit, props),
            MarkType::Text => text::attr(emit, props),
            MarkType::Trail => trail::attr(emit, scene, scene.item_mark(item)),
        }
    }

    /// Bounds of one item of a non-nested type, in the coordinates of the
    /// enclosing group
    pub fn bound_item(&self, scene: &Scene, item: ItemId) -> Bounds {
        let props = &scene.item(item).props;
        match self {
            MarkType::Arc => arc::bound(props),
            MarkType::Group => group::bound(scene, item),
            MarkType::Image => image::bound(scene.item(item)),
            MarkType::Path => path::bound(scene, item),
            MarkType::Rect => rect::bound(props),
            MarkType::Rule => rule::bound(props),
            MarkType::Shape => shape::bound(scene, item),
            MarkType::Symbol => symbol::bound(props),
            MarkType::Text => text::bound(props, scene.text_metrics(), false),
            MarkType::Area | MarkType::Line | MarkType::Trail => {
                self.bound_nested(scene, scene.item_mark(item))
            }
        }
    }

    /// Bounds of all items of a nested type
    pub fn bound_nested(&self, scene: &Scene, mark: MarkId) -> Bounds {
        let items = item_props(scene, mark);
        let mut bounds = Bounds::new();
        let Some(first) = items.first() else {
            return bounds;
        };
        match self {
            MarkType::Area => area::shape(&mut BoundsSink::new(&mut bounds), &items),
            MarkType::Line => line::shape(&mut BoundsSink::new(&mut bounds), &items),
            MarkType::Trail => trail::shape(&mut BoundsSink::new(&mut bounds), &items),
            _ => return bounds,
        }
        bound_stroke(&mut bounds, first);
        bounds
    }

    /// Paint the items of `mark`, skipping those outside `clip` when given
    pub fn draw<S: DrawingSurface>(&self, surface: &mut S, scene: &Scene, mark: MarkId, clip: Option<&Bounds>) {
        match self {
            MarkType::Arc => arc::draw(surface, scene, mark, clip),
            MarkType::Area => area::draw(surface, scene, mark, clip),
            MarkType::Group => group::draw(surface, scene, mark, clip),
            MarkType::Image => image::draw(surface, scene, mark, clip),
            MarkType::Line => line::draw(surface, scene, mark, clip),
            MarkType::Path => path::draw(surface, scene, mark, clip),
            MarkType::Rect => rect::draw(surface, scene, mark, clip),
            MarkType::Rule => rule::draw(surface, scene, mark, clip),
            MarkType::Shape => shape::draw(surface, scene, mark, clip),
            MarkType::Symbol => symbol::draw(surface, scene, mark, clip),
            MarkType::Text => text::draw(surface, scene, mark, clip),
            MarkType::Trail => trail::draw(surface, scene, mark, clip),
        }
    }

    /// Topmost item of `mark` under the point `(gx, gy)`, given in the
    /// coordinates of the enclosing group
    pub fn pick(&self, scene: &Scene, mark: MarkId, gx: f64, gy: f64) -> Option<ItemId> {
        match self {
            MarkType::Arc => arc::pick(scene, mark, gx, gy),
            MarkType::Area => area::pick(scene, mark, gx, gy),
            MarkType::Group => group::pick(scene, mark, gx, gy),
            MarkType::Image => pick_items(scene, mark, gx, gy, |_| true),
            MarkType::Line => line::pick(scene, mark, gx, gy),
            MarkType::Path => path::pick(scene, mark, gx, gy),
            MarkType::Rect => rect::pick(scene, mark, gx, gy),
            MarkType::Rule => rule::pick(scene, mark, gx, gy),
            MarkType::Shape => shape::pick(scene, mark, gx, gy),
            MarkType::Symbol => symbol::pick(scene, mark, gx, gy),
            MarkType::Text => text::pick(scene, mark, gx, gy),
            MarkType::Trail => trail::pick(scene, mark, gx, gy),
        }
    }
}

/// Receiver of retained-mode attributes; `None` removes the attribute
pub trait AttributeSink {
    fn attr(&mut self, name: &str, value: Option<String>);
}

impl AttributeSink for Vec<(String, Option<String>)> {
    fn attr(&mut self, name: &str, value: Option<String>) {
        self.push((name.to_string(), value));
    }
}

pub(crate) fn translate(x: f64, y: f64) -> String {
    format!("translate({},{})", fmt_num(x), fmt_num(y))
}

pub(crate) fn translate_item(props: &ItemProps) -> String {
    translate(props.x(), props.y())
}

/// Pad `bounds` for a visible stroke
pub(crate) fn bound_stroke(bounds: &mut Bounds, props: &ItemProps) {
    if props.has_visible_stroke() {
        bounds.expand(props.stroke_width().max(1.0));
    }
}

/// Props of every item of a mark, in array order
pub(crate) fn item_props(scene: &Scene, mark: MarkId) -> Vec<&ItemProps> {
    scene
        .mark(mark)
        .items
        .iter()
        .map(|id| &scene.item(*id).props)
        .collect()
}

/// Forwards to another sink with every coordinate offset by `(dx, dy)`
pub(crate) struct Translated<'a> {
    pub sink: &'a mut dyn PathSink,
    pub dx: f64,
    pub dy: f64,
}

impl PathSink for Translated<'_> {
    fn begin_path(&mut self) {
        self.sink.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.sink.move_to(x + self.dx, y + self.dy);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.sink.line_to(x + self.dx, y + self.dy);
    }

    fn quadratic_curve_to(&mut self, x1: f64, y1: f64, x: f64, y: f64) {
        self.sink
            .quadratic_curve_to(x1 + self.dx, y1 + self.dy, x + self.dx, y + self.dy);
    }

    fn bezier_curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        self.sink.bezier_curve_to(
            x1 + self.dx,
            y1 + self.dy,
            x2 + self.dx,
            y2 + self.dy,
            x + self.dx,
            y + self.dy,
        );
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.sink.rect(x + self.dx, y + self.dy, w, h);
    }

    fn arc(&mut self, x: f64, y: f64, r: f64, a0: f64, a1: f64, ccw: bool) {
        self.sink.arc(x + self.dx, y + self.dy, r, a0, a1, ccw);
    }

    fn close_path(&mut self) {
        self.sink.close_path();
    }
}

/// Fill then stroke the current path of one item. `path` builds the path
/// and returns `true` when there is nothing to paint.
pub(crate) fn draw_path<S, F>(surface: &mut S, props: &ItemProps, bounds: &Bounds, path: F)
where
    S: DrawingSurface,
    F: FnOnce(&mut S) -> bool,
{
    let opacity = props.opacity();
    if opacity == 0.0 {
        return;
    }
    if path(surface) {
        return;
    }
    if props.fill.is_some() && fill(surface, props, bounds, opacity) {
        surface.fill();
    }
    if props.stroke.is_some() && stroke(surface, props, bounds, opacity) {
        surface.stroke();
    }
}

/// Draw every item of a mark as its own path
pub(crate) fn draw_all<S, F>(surface: &mut S, scene: &Scene, mark: MarkId, clip: Option<&Bounds>, mut path: F)
where
    S: DrawingSurface,
    F: FnMut(&mut S, ItemId) -> bool,
{
    scene.visit_items(mark, |id| {
        let item = scene.item(id);
        if clip.map_or(true, |b| b.intersects(&item.bounds)) {
            draw_path(surface, &item.props, &item.bounds, |s| path(s, id));
        }
    });
}

/// Draw all items of a nested mark as one path styled by the first item
pub(crate) fn draw_one<S, F>(surface: &mut S, scene: &Scene, mark: MarkId, clip: Option<&Bounds>, path: F)
where
    S: DrawingSurface,
    F: FnOnce(&mut S, &[&ItemProps]),
{
    let m = scene.mark(mark);
    let items = item_props(scene, mark);
    let Some(first) = items.first() else {
        return;
    };
    if clip.map_or(false, |b| !b.intersects(&m.bounds)) {
        return;
    }
    draw_path(surface, first, &m.bounds, |s| {
        s.begin_path();
        path(s, &items);
        false
    });
}

/// Bounds-then-`test` picking over the items of a mark, front to back
pub(crate) fn pick_items<F>(scene: &Scene, mark: MarkId, gx: f64, gy: f64, test: F) -> Option<ItemId>
where
    F: Fn(ItemId) -> bool,
{
    scene.pick_visit_items(mark, |id| {
        let item = scene.item(id);
        if !item.bounds.contains(gx, gy) {
            return None;
        }
        test(id).then_some(id)
    })
}

/// Precise hit test of a path against its fill (when filled) and its
/// stroke outline (when stroked). `path` returns `true` for no geometry.
pub(crate) fn hit_path<F>(props: &ItemProps, gx: f64, gy: f64, path: F) -> bool
where
    F: FnOnce(&mut PathRecorder) -> bool,
{
    let mut recorder = PathRecorder::new();
    if path(&mut recorder) {
        return false;
    }
    let path = recorder.build();
    (props.fill.is_some() && fill_contains(&path, gx, gy))
        || (props.stroke.is_some() && stroke_contains(&path, gx, gy, props.stroke_width()))
}

/// Picking for nested types: the mark bounds gate a precise test of the
/// combined path, and a hit reports the first item
pub(crate) fn pick_nested<F>(scene: &Scene, mark: MarkId, gx: f64, gy: f64, shape: F) -> Option<ItemId>
where
    F: FnOnce(&mut dyn PathSink, &[&ItemProps]),
{
    let m = scene.mark(mark);
    let first = *m.items.first()?;
    if !m.bounds.contains(gx, gy) {
        return None;
    }
    let items = item_props(scene, mark);
    hit_path(items[0], gx, gy, |recorder| {
        let sink: &mut dyn PathSink = recorder;
        shape(sink, &items);
        false
    })
    .then_some(first)
}

/// Geometry of a single item drawn around the origin and placed with a
/// translation to `(x, y)`, shared by arc, shape and symbol marks.
pub(crate) mod item_path {
    use super::*;
    use avenger_geometry::PathStringBuilder;

    pub(crate) fn attr<F>(emit: &mut dyn AttributeSink, props: &ItemProps, shape: F)
    where
        F: FnOnce(&mut dyn PathSink),
    {
        let mut builder = PathStringBuilder::new();
        let sink: &mut dyn PathSink = &mut builder;
        shape(sink);
        emit.attr("transform", Some(translate_item(props)));
        emit.attr("d", builder.finish());
    }

    pub(crate) fn bound<F>(props: &ItemProps, shape: F) -> Bounds
    where
        F: FnOnce(&mut dyn PathSink),
    {
        let mut bounds = Bounds::new();
        {
            let mut sink = BoundsSink::new(&mut bounds);
            let sink: &mut dyn PathSink = &mut sink;
            shape(sink);
        }
        bound_stroke(&mut bounds, props);
        bounds.translate(props.x(), props.y());
        bounds
    }

    pub(crate) fn draw<S, F>(surface: &mut S, props: &ItemProps, shape: F)
    where
        S: DrawingSurface,
        F: FnOnce(&mut dyn PathSink),
    {
        let (x, y) = (props.x(), props.y());
        surface.translate(x, y);
        surface.begin_path();
        let sink: &mut dyn PathSink = &mut *surface;
        shape(sink);
        surface.translate(-x, -y);
    }

    pub(crate) fn hit<F>(props: &ItemProps, gx: f64, gy: f64, shape: F) -> bool
    where
        F: FnOnce(&mut dyn PathSink),
    {
        hit_path(props, gx, gy, |recorder| {
            let mut translated = Translated {
                sink: recorder,
                dx: props.x(),
                dy: props.y(),
            };
            let sink: &mut dyn PathSink = &mut translated;
            shape(sink);
            false
        })
    }
}

/// One path through every item of a mark, shared by area, line and trail
/// marks. The first item carries the style.
pub(crate) mod nested_path {
    use super::*;
    use avenger_geometry::curve::{curve_for, Curve};
    use avenger_geometry::PathStringBuilder;

    pub(crate) type Shape = fn(&mut dyn PathSink, &[&ItemProps]);

    /// Curve named by the item's `interpolate`, linear when unset
    pub(crate) fn curve(props: &ItemProps) -> Box<dyn Curve> {
        curve_for(
            props.interpolate.as_deref().unwrap_or("linear"),
            props.orient.unwrap_or_default(),
            props.tension,
        )
    }

    pub(crate) fn attr(emit: &mut dyn AttributeSink, scene: &Scene, mark: MarkId, shape: Shape) {
        let items = item_props(scene, mark);
        if items.is_empty() {
            return;
        }
        let mut builder = PathStringBuilder::new();
        shape(&mut builder, &items);
        emit.attr("d", builder.finish());
    }

    pub(crate) fn draw<S: DrawingSurface>(
        surface: &mut S,
        scene: &Scene,
        mark: MarkId,
        clip: Option<&Bounds>,
        shape: Shape,
    ) {
        draw_one(surface, scene, mark, clip, |s, items| {
            let sink: &mut dyn PathSink = s;
            shape(sink, items);
        });
    }

    pub(crate) fn pick(scene: &Scene, mark: MarkId, gx: f64, gy: f64, shape: Shape) -> Option<ItemId> {
        pick_nested(scene, mark, gx, gy, |sink, items| shape(sink, items))
    }
}
