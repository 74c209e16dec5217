use avenger_common::types::{StrokeCap, StrokeJoin};
use avenger_geometry::{Bounds, PathSink};
use avenger_image::RgbaImage;
use avenger_scenegraph::marks::MarkType;
use avenger_scenegraph::surface::{DrawingSurface, SurfacePaint};
use avenger_scenegraph::{ItemProps, MarkDef, Scene};
use avenger_text::types::TextAlign;

/// Surface that records the calls relevant to these tests
#[derive(Default)]
struct RecordingSurface {
    calls: Vec<String>,
    fill: Option<SurfacePaint>,
}

impl PathSink for RecordingSurface {
    fn begin_path(&mut self) {
        self.calls.push("begin".to_string());
    }
    fn move_to(&mut self, x: f64, y: f64) {
        self.calls.push(format!("M{x},{y}"));
    }
    fn line_to(&mut self, x: f64, y: f64) {
        self.calls.push(format!("L{x},{y}"));
    }
    fn quadratic_curve_to(&mut self, _x1: f64, _y1: f64, x: f64, y: f64) {
        self.calls.push(format!("Q{x},{y}"));
    }
    fn bezier_curve_to(&mut self, _x1: f64, _y1: f64, _x2: f64, _y2: f64, x: f64, y: f64) {
        self.calls.push(format!("C{x},{y}"));
    }
    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.calls.push(format!("rect({x},{y},{w},{h})"));
    }
    fn arc(&mut self, x: f64, y: f64, r: f64, _a0: f64, _a1: f64, _ccw: bool) {
        self.calls.push(format!("arc({x},{y},{r})"));
    }
    fn close_path(&mut self) {
        self.calls.push("Z".to_string());
    }
}

impl DrawingSurface for RecordingSurface {
    fn fill(&mut self) {
        let color = match &self.fill {
            Some(SurfacePaint::Color(c)) => c.clone(),
            _ => "gradient".to_string(),
        };
        self.calls.push(format!("fill:{color}"));
    }
    fn stroke(&mut self) {
        self.calls.push("stroke".to_string());
    }
    fn clip(&mut self) {
        self.calls.push("clip".to_string());
    }
    fn save(&mut self) {
        self.calls.push("save".to_string());
    }
    fn restore(&mut self) {
        self.calls.push("restore".to_string());
    }
    fn translate(&mut self, x: f64, y: f64) {
        self.calls.push(format!("translate({x},{y})"));
    }
    fn rotate(&mut self, _angle: f64) {
        self.calls.push("rotate".to_string());
    }
    fn set_fill_style(&mut self, paint: SurfacePaint) {
        self.fill = Some(paint);
    }
    fn set_stroke_style(&mut self, _paint: SurfacePaint) {}
    fn set_global_alpha(&mut self, _alpha: f64) {}
    fn set_line_width(&mut self, _width: f64) {}
    fn set_line_cap(&mut self, _cap: StrokeCap) {}
    fn set_line_join(&mut self, _join: StrokeJoin) {}
    fn set_miter_limit(&mut self, _limit: f64) {}
    fn set_line_dash(&mut self, _dash: &[f64]) {}
    fn set_line_dash_offset(&mut self, _offset: f64) {}
    fn set_font(&mut self, font: &str) {
        self.calls.push(format!("font:{font}"));
    }
    fn set_text_align(&mut self, _align: TextAlign) {}
    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.calls.push(format!("text:{text}@{x},{y}"));
    }
    fn stroke_text(&mut self, _text: &str, _x: f64, _y: f64) {}
    fn measure_text(&mut self, text: &str) -> f64 {
        text.chars().count() as f64
    }
    fn draw_image(&mut self, _image: &RgbaImage, x: f64, y: f64, w: f64, h: f64) {
        self.calls.push(format!("image({x},{y},{w},{h})"));
    }
    fn fill_rect(&mut self, _x: f64, _y: f64, _w: f64, _h: f64) {}
    fn clear_rect(&mut self, _x: f64, _y: f64, _w: f64, _h: f64) {}
}

fn rect(x: f64, fill: &str, zindex: Option<i32>) -> ItemProps {
    ItemProps {
        x: Some(x),
        y: Some(0.0),
        width: Some(10.0),
        height: Some(10.0),
        fill: Some(fill.into()),
        zindex,
        ..Default::default()
    }
}

fn fills(surface: &RecordingSurface) -> Vec<&str> {
    surface
        .calls
        .iter()
        .filter_map(|c| c.strip_prefix("fill:"))
        .collect()
}

#[test]
fn test_draw_follows_zorder() {
    let mut scene = Scene::new();
    let root = scene.root_group().unwrap();
    let mark = scene.add_mark(root, MarkDef::new(MarkType::Rect)).unwrap();
    scene
        .set_items(
            mark,
            vec![
                rect(0.0, "a", None),
                rect(20.0, "b", Some(2)),
                rect(40.0, "c", None),
                rect(60.0, "d", Some(1)),
            ],
        )
        .unwrap();
    scene.bound_all();

    let mut surface = RecordingSurface::default();
    scene.draw(&mut surface, None);
    assert_eq!(fills(&surface), vec!["a", "c", "d", "b"]);
}

#[test]
fn test_draw_skips_items_outside_clip() {
    let mut scene = Scene::new();
    let root = scene.root_group().unwrap();
    let mark = scene.add_mark(root, MarkDef::new(MarkType::Rect)).unwrap();
    scene
        .set_items(mark, vec![rect(0.0, "a", None), rect(100.0, "b", None)])
        .unwrap();
    scene.bound_all();

    let mut surface = RecordingSurface::default();
    scene.draw(&mut surface, Some(&Bounds::from_coords(95.0, 0.0, 120.0, 20.0)));
    assert_eq!(fills(&surface), vec!["b"]);
}

#[test]
fn test_group_translates_and_clips() {
    let mut scene = Scene::new();
    let root = scene.root_group().unwrap();
    let groups = scene.add_mark(root, MarkDef::new(MarkType::Group)).unwrap();
    let group = scene
        .add_item(
            groups,
            ItemProps {
                x: Some(5.0),
                y: Some(7.0),
                width: Some(30.0),
                height: Some(20.0),
                clip: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
    let rects = scene.add_mark(group, MarkDef::new(MarkType::Rect)).unwrap();
    scene.add_item(rects, rect(0.0, "inner", None)).unwrap();
    scene.bound_all();

    let mut surface = RecordingSurface::default();
    scene.draw(&mut surface, None);
    let calls = surface.calls.join(" ");
    assert!(calls.contains("translate(5,7) begin rect(0,0,30,20) clip"));
    assert!(calls.contains("fill:inner"));
    assert!(calls.ends_with("restore restore"));
}

#[test]
fn test_clipping_mark_clips_to_parent_group_for_every_type() {
    let mut scene = Scene::new();
    let root = scene.root_group().unwrap();
    {
        let mut props = scene.props_mut(root).unwrap();
        props.width = Some(40.0);
        props.height = Some(25.0);
    }
    let groups = scene
        .add_mark(root, MarkDef::new(MarkType::Group).with_clip(true))
        .unwrap();
    scene
        .add_item(
            groups,
            ItemProps {
                x: Some(5.0),
                ..Default::default()
            },
        )
        .unwrap();
    scene.bound_all();

    let mut surface = RecordingSurface::default();
    scene.draw(&mut surface, None);
    let calls = surface.calls.join(" ");
    assert!(calls.starts_with("save translate(0,0) "));
    assert!(calls.contains("save begin rect(0,0,40,25) clip save translate(5,0)"));
}

#[test]
fn test_nested_line_draws_one_path() {
    let mut scene = Scene::new();
    let root = scene.root_group().unwrap();
    let mark = scene.add_mark(root, MarkDef::new(MarkType::Line)).unwrap();
    scene
        .set_items(
            mark,
            (0..3)
                .map(|i| ItemProps {
                    x: Some(i as f64 * 10.0),
                    y: Some(0.0),
                    stroke: Some("black".into()),
                    ..Default::default()
                })
                .collect(),
        )
        .unwrap();
    scene.bound_all();

    let mut surface = RecordingSurface::default();
    scene.draw(&mut surface, None);
    let strokes = surface.calls.iter().filter(|c| *c == "stroke").count();
    assert_eq!(strokes, 1);
    assert!(surface.calls.join(" ").contains("M0,0 L10,0 L20,0 stroke"));
}

#[test]
fn test_text_draw_uses_font_and_baseline() {
    let mut scene = Scene::new();
    let root = scene.root_group().unwrap();
    let mark = scene.add_mark(root, MarkDef::new(MarkType::Text)).unwrap();
    scene
        .add_item(
            mark,
            ItemProps {
                x: Some(10.0),
                y: Some(20.0),
                text: Some("hi".to_string()),
                font_size: Some(10.0),
                baseline: Some(avenger_text::types::TextBaseline::Top),
                fill: Some("black".into()),
                ..Default::default()
            },
        )
        .unwrap();
    scene.bound_all();

    let mut surface = RecordingSurface::default();
    scene.draw(&mut surface, None);
    assert!(surface.calls.contains(&"font:10px sans-serif".to_string()));
    assert!(surface.calls.contains(&"text:hi@10,29".to_string()));
}
