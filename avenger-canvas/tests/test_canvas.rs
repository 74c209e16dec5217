use std::io::Cursor;

use avenger_canvas::{CanvasConfig, CanvasRenderer, PixmapSurface};
use avenger_common::canvas::CanvasDimensions;
use avenger_common::types::Paint;
use avenger_scenegraph::{ItemId, ItemProps, MarkDef, MarkType, Scene};
use base64::prelude::{Engine, BASE64_STANDARD};
use futures::executor::block_on;
use rstest::rstest;

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];
const WHITE: [u8; 4] = [255, 255, 255, 255];

fn rect(x: f64, y: f64, w: f64, h: f64, fill: &str) -> ItemProps {
    ItemProps {
        x: Some(x),
        y: Some(y),
        width: Some(w),
        height: Some(h),
        fill: Some(Paint::color(fill)),
        ..Default::default()
    }
}

/// Two red rects side by side on a 20x10 canvas
fn two_rects() -> (Scene, ItemId, ItemId) {
    let mut scene = Scene::new();
    let root = scene.root_group().unwrap();
    let mark = scene.add_mark(root, MarkDef::new(MarkType::Rect)).unwrap();
    let a = scene.add_item(mark, rect(0.0, 0.0, 4.0, 10.0, "red")).unwrap();
    let b = scene.add_item(mark, rect(12.0, 0.0, 8.0, 10.0, "red")).unwrap();
    scene.bound_all();
    (scene, a, b)
}

fn renderer(width: f64, height: f64, background: Option<&str>) -> CanvasRenderer<PixmapSurface> {
    let surface = PixmapSurface::new(CanvasDimensions::new(width, height)).unwrap();
    let config = CanvasConfig {
        background: background.map(str::to_string),
        ..Default::default()
    };
    CanvasRenderer::new(surface, config)
}

#[test]
fn test_full_render_paints_background_and_marks() {
    let (scene, _, _) = two_rects();
    let mut r = renderer(20.0, 10.0, Some("white"));
    r.render(&scene);
    assert_eq!(r.surface().pixel(1, 5), Some(RED));
    assert_eq!(r.surface().pixel(8, 5), Some(WHITE));
    assert_eq!(r.surface().pixel(15, 5), Some(RED));
}

#[test]
fn test_dirty_render_repaints_only_dirty_region() {
    let (mut scene, a, b) = two_rects();
    let mut r = renderer(20.0, 10.0, Some("white"));
    r.render(&scene);

    scene.props_mut(a).unwrap().fill = Some(Paint::color("blue"));
    scene.props_mut(b).unwrap().fill = Some(Paint::color("blue"));
    r.dirty(&scene, a);
    assert!(!r.dirty_bounds().empty());
    r.render(&scene);

    assert_eq!(r.surface().pixel(1, 5), Some(BLUE));
    // b was not marked dirty, so it keeps its old color
    assert_eq!(r.surface().pixel(15, 5), Some(RED));
    assert!(r.dirty_bounds().empty());

    r.redraw_all();
    r.render(&scene);
    assert_eq!(r.surface().pixel(15, 5), Some(BLUE));
}

#[test]
fn test_moved_item_clears_old_position() {
    let (mut scene, a, _) = two_rects();
    let mut r = renderer(20.0, 10.0, None);
    r.render(&scene);

    // Mark both the old and new footprint dirty
    r.dirty(&scene, a);
    scene.props_mut(a).unwrap().x = Some(5.0);
    scene.rebound(a);
    r.dirty(&scene, a);
    r.render(&scene);

    assert_eq!(r.surface().pixel(1, 5), Some([0, 0, 0, 0]));
    assert_eq!(r.surface().pixel(6, 5), Some(RED));
}

#[test]
fn test_dirty_translates_through_groups() {
    let mut scene = Scene::new();
    let root = scene.root_group().unwrap();
    let groups = scene.add_mark(root, MarkDef::new(MarkType::Group)).unwrap();
    let group = scene
        .add_item(
            groups,
            ItemProps {
                x: Some(10.0),
                y: Some(5.0),
                ..Default::default()
            },
        )
        .unwrap();
    let rects = scene.add_mark(group, MarkDef::new(MarkType::Rect)).unwrap();
    let item = scene.add_item(rects, rect(1.0, 2.0, 3.0, 4.0, "red")).unwrap();
    scene.bound_all();

    let mut r = renderer(20.0, 20.0, None);
    r.dirty(&scene, item);
    let b = r.dirty_bounds();
    assert_eq!((b.x1, b.y1, b.x2, b.y2), (11.0, 7.0, 14.0, 11.0));
}

#[rstest]
#[case(1.0, 20, 10)]
#[case(2.0, 40, 20)]
fn test_resize_uses_pixel_ratio(#[case] ratio: f64, #[case] width: u32, #[case] height: u32) {
    let surface = PixmapSurface::new(CanvasDimensions::new(1.0, 1.0)).unwrap();
    let config = CanvasConfig {
        pixel_ratio: ratio,
        ..Default::default()
    };
    let mut r = CanvasRenderer::new(surface, config);
    r.resize(20.0, 10.0, [0.0, 0.0]).unwrap();
    assert_eq!(r.surface().pixmap().width(), width);
    assert_eq!(r.surface().pixmap().height(), height);
}

#[test]
fn test_origin_offsets_drawing() {
    let (scene, _, _) = two_rects();
    let mut r = renderer(30.0, 10.0, None);
    r.resize(30.0, 10.0, [10.0, 0.0]).unwrap();
    r.render(&scene);
    assert_eq!(r.surface().pixel(5, 5), Some([0, 0, 0, 0]));
    assert_eq!(r.surface().pixel(11, 5), Some(RED));
}

#[test]
fn test_render_async_draws_loaded_images() {
    let png = {
        let img = image::RgbaImage::from_pixel(4, 2, image::Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    };
    let url = format!("data:image/png;base64,{}", BASE64_STANDARD.encode(png));

    let mut scene = Scene::new();
    let root = scene.root_group().unwrap();
    let mark = scene.add_mark(root, MarkDef::new(MarkType::Image)).unwrap();
    let item = scene
        .add_item(
            mark,
            ItemProps {
                x: Some(2.0),
                y: Some(2.0),
                url: Some(url),
                ..Default::default()
            },
        )
        .unwrap();
    scene.bound_all();

    let mut r = renderer(10.0, 10.0, None);
    block_on(r.render_async(&mut scene)).unwrap();

    assert!(scene.item(item).image.as_ref().unwrap().is_loaded());
    assert_eq!(r.surface().pixel(3, 3), Some(RED));
    assert_eq!(r.surface().pixel(8, 8), Some([0, 0, 0, 0]));
    assert_eq!(r.loader().pending(), 0);
}

#[test]
fn test_png_export_of_rendered_scene() {
    let (scene, _, _) = two_rects();
    let mut r = renderer(20.0, 10.0, Some("#fff"));
    r.render(&scene);
    let png = r.surface().encode_png().unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.get_pixel(1, 1).0, RED);
    assert_eq!(decoded.get_pixel(8, 1).0, WHITE);
}

#[test]
fn test_config_from_json() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let config: CanvasConfig =
        serde_json::from_str(r##"{"background": "#fff", "pixelRatio": 2}"##).unwrap();
    assert_eq!(config.background.as_deref(), Some("#fff"));
    assert_eq!(config.pixel_ratio, 2.0);

    let config: CanvasConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, CanvasConfig::default());
}
