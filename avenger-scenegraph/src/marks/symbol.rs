use avenger_geometry::symbol::SymbolShape;
use avenger_geometry::{Bounds, PathSink};

use super::{draw_all, item_path, pick_items, AttributeSink};
use crate::props::ItemProps;
use crate::scene::{ItemId, MarkId, Scene};
use crate::surface::DrawingSurface;

/// Symbol area in square pixels when `size` is unset
pub const DEFAULT_SYMBOL_SIZE: f64 = 64.0;

pub fn shape(sink: &mut dyn PathSink, props: &ItemProps) {
    let symbol = SymbolShape::from_name(props.shape.as_deref().unwrap_or("circle"));
    symbol.draw(sink, props.size.unwrap_or(DEFAULT_SYMBOL_SIZE));
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
