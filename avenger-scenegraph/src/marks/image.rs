use avenger_common::format::fmt_num;
use avenger_common::types::{ImageAlign, ImageBaseline};
use avenger_geometry::Bounds;

use super::{translate, AttributeSink};
use crate::scene::{Item, MarkId, Scene};
use crate::surface::DrawingSurface;

/// Placed extent `(x, y, w, h)` of an image item. Missing dimensions come
/// from the loaded image, and unloaded images measure 0x0.
pub fn placement(item: &Item) -> (f64, f64, f64, f64) {
    let props = &item.props;
    let image = item.image.as_ref();
    let w = props.width.or_else(|| image.map(|i| i.width())).unwrap_or(0.0);
    let h = props.height.or_else(|| image.map(|i| i.height())).unwrap_or(0.0);
    let align: ImageAlign = props.align.map(Into::into).unwrap_or_default();
    let baseline: ImageBaseline = props.baseline.map(Into::into).unwrap_or_default();
    (
        props.x() - align.offset(w),
        props.y() - baseline.offset(h),
        w,
        h,
    )
}

/// Whether the item's image is missing or was loaded for another url
pub fn needs_load(item: &Item) -> bool {
    match (&item.image, &item.props.url) {
        (_, None) => false,
        (None, Some(_)) => true,
        (Some(handle), Some(url)) => handle.url.as_deref() != Some(url.as_str()),
    }
}

pub fn attr(emit: &mut dyn AttributeSink, item: &Item) {
    let (x, y, w, h) = placement(item);
    let href = item
        .image
        .as_ref()
        .and_then(|i| i.url.clone())
        .or_else(|| item.props.url.clone())
        .unwrap_or_default();
    let aspect = if item.props.aspect == Some(false) {
        "none"
    } else {
        "xMidYMid"
    };
    emit.attr("xlink:href", Some(href));
    emit.attr("transform", Some(translate(x, y)));
    emit.attr("width", Some(fmt_num(w)));
    emit.attr("height", Some(fmt_num(h)));
    emit.attr("preserveAspectRatio", Some(aspect.to_string()));
}

pub fn bound(item: &Item) -> Bounds {
    let (x, y, w, h) = placement(item);
    Bounds::from_coords(x, y, x + w, y + h)
}

/// Shrink the placed box to the image's aspect ratio, centered
fn letterbox(item: &Item, (mut x, mut y, mut w, mut h): (f64, f64, f64, f64)) -> (f64, f64, f64, f64) {
    let Some(image) = &item.image else {
        return (x, y, w, h);
    };
    let ar0 = image.width() / image.height();
    let ar1 = item.props.width() / item.props.height();
    if ar0.is_finite() && ar1.is_finite() && !ar0.is_nan() && !ar1.is_nan() && ar0 != ar1 {
        if ar1 < ar0 {
            let t = w / ar0;
            y += (h - t) / 2.0;
            h = t;
        } else {
            let t = h * ar0;
            x += (w - t) / 2.0;
            w = t;
        }
    }
    (x, y, w, h)
}

pub fn draw<S: DrawingSurface>(surface: &mut S, scene: &Scene, mark: MarkId, clip: Option<&Bounds>) {
    scene.visit_items(mark, |id| {
        let item = scene.item(id);
        if clip.map_or(false, |b| !b.intersects(&item.bounds)) {
            return;
        }
        let mut placed = placement(item);
        if item.props.aspect != Some(false) {
            placed = letterbox(item, placed);
        }
        let Some(image) = item.image.as_ref().and_then(|i| i.image.as_ref()) else {
            return;
        };
        let (x, y, w, h) = placed;
        surface.set_global_alpha(item.props.opacity());
        surface.draw_image(image, x, y, w, h);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marks::MarkType;
    use crate::props::ItemProps;
    use crate::scene::MarkDef;
    use avenger_image::{ImageHandle, RgbaImage};
    use avenger_text::types::{TextAlign, TextBaseline};

    fn image_item(props: ItemProps, image: Option<ImageHandle>) -> (Scene, crate::scene::ItemId) {
        let mut scene = Scene::new();
        let root = scene.root_group().unwrap();
        let mark = scene.add_mark(root, MarkDef::new(MarkType::Image)).unwrap();
        let item = scene.add_item(mark, props).unwrap();
        if let Some(image) = image {
            scene.set_image(item, image).unwrap();
        }
        (scene, item)
    }

    fn handle(width: u32, height: u32) -> ImageHandle {
        ImageHandle::loaded(
            "data:image/png;base64,",
            RgbaImage {
                width,
                height,
                data: vec![0; (width * height * 4) as usize],
            },
        )
    }

    #[test]
    fn test_unloaded_image_is_empty() {
        let (scene, item) = image_item(
            ItemProps {
                x: Some(5.0),
                url: Some("missing.png".to_string()),
                ..Default::default()
            },
            None,
        );
        assert!(needs_load(scene.item(item)));
        assert_eq!(bound(scene.item(item)), Bounds::from_coords(5.0, 0.0, 5.0, 0.0));
    }

    #[test]
    fn test_alignment_uses_loaded_size() {
        let (scene, item) = image_item(
            ItemProps {
                x: Some(50.0),
                y: Some(50.0),
                align: Some(TextAlign::Center),
                baseline: Some(TextBaseline::Bottom),
                ..Default::default()
            },
            Some(handle(20, 10)),
        );
        assert_eq!(bound(scene.item(item)), Bounds::from_coords(40.0, 40.0, 60.0, 50.0));
    }

    #[test]
    fn test_letterbox_keeps_aspect_ratio() {
        let (scene, item) = image_item(
            ItemProps {
                width: Some(100.0),
                height: Some(100.0),
                ..Default::default()
            },
            Some(handle(20, 10)),
        );
        let placed = letterbox(scene.item(item), placement(scene.item(item)));
        assert_eq!(placed, (0.0, 25.0, 100.0, 50.0));
    }
}
