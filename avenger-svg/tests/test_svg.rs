use avenger_common::types::{Gradient, Paint};
use avenger_image::ResourceLoader;
use avenger_scenegraph::scene::ZOrder;
use avenger_scenegraph::{ItemId, ItemProps, MarkDef, MarkId, MarkType, Scene};
use avenger_svg::{RetainedSurface, SvgConfig, SvgDocument, SvgRenderer, SvgStringRenderer};
use futures::executor::block_on;
use rstest::rstest;

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

fn two_rects() -> (Scene, MarkId, ItemId, ItemId) {
    let mut scene = Scene::new();
    let root = scene.root_group().unwrap();
    let mark = scene.add_mark(root, MarkDef::new(MarkType::Rect)).unwrap();
    let a = scene.add_item(mark, rect(0.0, 0.0, 4.0, 10.0, "red")).unwrap();
    let b = scene.add_item(mark, rect(12.0, 0.0, 8.0, 10.0, "red")).unwrap();
    scene.bound_all();
    (scene, mark, a, b)
}

fn renderer(config: SvgConfig) -> SvgRenderer<SvgDocument> {
    let mut r = SvgRenderer::new(SvgDocument::new(), config);
    r.resize(20.0, 10.0, [0.0, 0.0]);
    r
}

#[test]
fn test_initial_render_builds_tree() {
    let (scene, _, a, b) = two_rects();
    let mut r = renderer(SvgConfig::default());
    r.render(&scene);

    let doc = r.document();
    let svg = r.svg_node();
    assert_eq!(doc.attribute(svg, "class").unwrap(), Some("marks"));
    assert_eq!(doc.attribute(svg, "viewBox").unwrap(), Some("0 0 20 10"));
    assert_eq!(
        doc.attribute(r.root_node(), "transform").unwrap(),
        Some("translate(0,0)")
    );

    // Root group background plus the two rects
    assert_eq!(doc.find_all("path").len(), 3);
    let node_a = r.node_for_item(&scene, a).unwrap();
    let node_b = r.node_for_item(&scene, b).unwrap();
    assert_eq!(doc.attribute(node_a, "d").unwrap(), Some("M0,0h4v10h-4Z"));
    assert_eq!(doc.style(node_b, "fill").unwrap(), Some("red"));
    assert_eq!(doc.previous_sibling(node_b), Some(node_a));

    let markup = r.svg();
    assert!(markup.starts_with(r#"<svg class="marks" width="20" height="10""#));
    assert!(markup.contains(r#"<g class="mark-rect">"#));
}

#[test]
fn test_rerender_without_changes_is_free() {
    let (scene, _, _, _) = two_rects();
    let mut r = renderer(SvgConfig::default());
    r.render(&scene);

    r.document_mut().reset_mutations();
    r.render(&scene);
    let counts = r.document().mutations();
    assert_eq!(counts.structural, 0);
    assert_eq!(counts.attributes, 0);
}

#[test]
fn test_dirty_item_updates_only_its_element() {
    let (mut scene, _, a, b) = two_rects();
    let mut r = renderer(SvgConfig::default());
    r.render(&scene);
    let node_a = r.node_for_item(&scene, a).unwrap();

    scene.props_mut(a).unwrap().fill = Some(Paint::color("blue"));
    r.document_mut().reset_mutations();
    r.dirty(a);
    r.dirty(a);
    r.render(&scene);

    let counts = r.document().mutations();
    assert_eq!(counts.structural, 0);
    assert_eq!(counts.attributes, 1);
    assert_eq!(r.node_for_item(&scene, a), Some(node_a));
    assert_eq!(r.document().style(node_a, "fill").unwrap(), Some("blue"));
    let node_b = r.node_for_item(&scene, b).unwrap();
    assert_eq!(r.document().style(node_b, "fill").unwrap(), Some("red"));
}

#[test]
fn test_style_edit_skips_structural_pass() {
    let (mut scene, mark, a, _) = two_rects();
    let mut r = renderer(SvgConfig::default());
    r.render(&scene);
    assert!(r.stats().structural);

    scene.props_mut(a).unwrap().fill = Some(Paint::color("blue"));
    assert!(matches!(scene.mark(mark).zorder(), ZOrder::Clean(_)));
    r.dirty(a);
    r.render(&scene);
    assert!(!r.stats().structural);
    let node_a = r.node_for_item(&scene, a).unwrap();
    assert_eq!(r.document().style(node_a, "fill").unwrap(), Some("blue"));
}

#[test]
fn test_nested_style_edit_skips_structural_pass() {
    let mut scene = Scene::new();
    let root = scene.root_group().unwrap();
    let line = scene.add_mark(root, MarkDef::new(MarkType::Line)).unwrap();
    let points = scene
        .set_items(
            line,
            (0..3)
                .map(|i| ItemProps {
                    x: Some(i as f64 * 5.0),
                    y: Some(0.0),
                    stroke: Some(Paint::color("black")),
                    ..Default::default()
                })
                .collect(),
        )
        .unwrap();
    scene.bound_all();
    let mut r = renderer(SvgConfig::default());
    r.render(&scene);

    scene.props_mut(points[0]).unwrap().stroke = Some(Paint::color("red"));
    r.dirty(points[0]);
    r.render(&scene);
    assert!(!r.stats().structural);
    let node = r.node_for_item(&scene, points[1]).unwrap();
    assert_eq!(r.document().style(node, "stroke").unwrap(), Some("red"));
}

#[test]
fn test_zindex_edit_reorders_elements() {
    let (mut scene, _, a, b) = two_rects();
    let mut r = renderer(SvgConfig::default());
    r.render(&scene);

    scene.set_item_zindex(a, 1).unwrap();
    r.dirty(a);
    r.render(&scene);
    assert!(r.stats().structural);
    let node_a = r.node_for_item(&scene, a).unwrap();
    let node_b = r.node_for_item(&scene, b).unwrap();
    assert_eq!(r.document().previous_sibling(node_a), Some(node_b));
}

#[test]
fn test_replaced_items_release_bookkeeping() {
    let (mut scene, mark, _, _) = two_rects();
    let mut r = renderer(SvgConfig::default());
    r.render(&scene);

    let mut first = None;
    let mut stale = Vec::new();
    for round in 0..20 {
        let items = scene
            .set_items(
                mark,
                (0..5)
                    .map(|i| rect(i as f64 * 4.0, 0.0, 2.0, 2.0, "red"))
                    .collect(),
            )
            .unwrap();
        for id in &items {
            r.dirty(*id);
        }
        r.render(&scene);
        scene.purge();

        let stats = r.stats();
        assert_eq!(stats.generations, 0);
        match first {
            None => first = Some(stats),
            Some(expected) => assert_eq!(stats, expected, "round {round}"),
        }
        stale.push(r.node_for_item(&scene, items[0]).unwrap());
    }

    // Root group background plus the five current rects
    assert_eq!(r.document().find_all("path").len(), 6);
    let current = stale.pop().unwrap();
    assert!(stale.iter().all(|node| r.item_for_node(*node).is_none()));
    assert!(r.item_for_node(current).is_some());
}

#[test]
fn test_entering_item_is_inserted() {
    let (mut scene, mark, a, _) = two_rects();
    let mut r = renderer(SvgConfig::default());
    r.render(&scene);

    let c = scene.add_item(mark, rect(5.0, 0.0, 2.0, 2.0, "green")).unwrap();
    r.dirty(c);
    r.render(&scene);

    assert_eq!(r.document().find_all("path").len(), 4);
    let node_c = r.node_for_item(&scene, c).unwrap();
    assert!(r.document().is_attached(node_c));
    assert_eq!(r.document().style(node_c, "fill").unwrap(), Some("green"));
    // Existing elements keep their identity
    assert!(r.document().is_attached(r.node_for_item(&scene, a).unwrap()));
}

#[test]
fn test_exiting_item_is_removed() {
    let (mut scene, _, a, b) = two_rects();
    let mut r = renderer(SvgConfig::default());
    r.render(&scene);
    let node_b = r.node_for_item(&scene, b).unwrap();

    scene.remove_item(b).unwrap();
    r.dirty(b);
    r.render(&scene);

    assert!(!r.document().is_attached(node_b));
    assert_eq!(r.node_for_item(&scene, b), None);
    assert_eq!(r.document().find_all("path").len(), 2);
    assert!(r.document().is_attached(r.node_for_item(&scene, a).unwrap()));
}

#[test]
fn test_item_for_node_maps_group_parts() {
    let (scene, _, a, _) = two_rects();
    let mut r = renderer(SvgConfig::default());
    r.render(&scene);

    let node_a = r.node_for_item(&scene, a).unwrap();
    assert_eq!(r.item_for_node(node_a), Some(a));

    let group = scene.root_group().unwrap();
    let group_node = r.node_for_item(&scene, group).unwrap();
    let background = r.document().child(group_node, 0).unwrap();
    let foreground = r.document().child(group_node, 1).unwrap();
    assert_eq!(
        r.document().attribute(background, "class").unwrap(),
        Some("background")
    );
    assert_eq!(r.item_for_node(background), Some(group));
    assert_eq!(r.item_for_node(foreground), Some(group));
    assert_eq!(r.item_for_node(r.root_node()), None);
}

#[test]
fn test_clipping_group_defines_clip_path() {
    let mut scene = Scene::new();
    let root = scene.root_group().unwrap();
    let groups = scene.add_mark(root, MarkDef::new(MarkType::Group)).unwrap();
    let group = scene
        .add_item(
            groups,
            ItemProps {
                width: Some(10.0),
                height: Some(5.0),
                clip: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
    let inner = scene.add_mark(group, MarkDef::new(MarkType::Rect)).unwrap();
    scene.add_item(inner, rect(0.0, 0.0, 20.0, 20.0, "red")).unwrap();
    scene.bound_all();

    let mut r = renderer(SvgConfig::default());
    r.render(&scene);

    let doc = r.document();
    let clips = doc.find_all("clipPath");
    assert_eq!(clips.len(), 1);
    let id = doc.attribute(clips[0], "id").unwrap().unwrap().to_string();
    let rect_node = doc.child(clips[0], 0).unwrap();
    assert_eq!(doc.attribute(rect_node, "width").unwrap(), Some("10"));
    assert_eq!(doc.attribute(rect_node, "height").unwrap(), Some("5"));

    let group_node = r.node_for_item(&scene, group).unwrap();
    let foreground = doc.child(group_node, 1).unwrap();
    assert_eq!(
        doc.attribute(foreground, "clip-path").unwrap(),
        Some(format!("url(#{id})").as_str())
    );
    // defs come first in the svg element
    assert_eq!(doc.child(r.svg_node(), 0), doc.find_all("defs").first().copied());
}

#[test]
fn test_unreferenced_gradient_is_pruned() {
    let (mut scene, _, a, _) = two_rects();
    let gradient = Gradient {
        id: "fade".to_string(),
        ..Gradient::default()
    }
    .with_stop(0.0, "white")
    .with_stop(1.0, "red");
    scene.props_mut(a).unwrap().fill = Some(Paint::Gradient(gradient));

    let mut r = renderer(SvgConfig::default());
    r.render(&scene);
    let gradients = r.document().find_all("linearGradient");
    assert_eq!(gradients.len(), 1);
    assert_eq!(
        r.document().attribute(gradients[0], "id").unwrap(),
        Some("fade")
    );
    assert_eq!(r.document().children(gradients[0]).unwrap().len(), 2);
    let node_a = r.node_for_item(&scene, a).unwrap();
    assert_eq!(r.document().style(node_a, "fill").unwrap(), Some("url(#fade)"));

    scene.props_mut(a).unwrap().fill = Some(Paint::color("red"));
    r.dirty(a);
    r.render(&scene);
    assert!(r.document().find_all("linearGradient").is_empty());
    assert!(r.document().find_all("defs").is_empty());
}

#[rstest]
#[case(Some("white"), 2)]
#[case(None, 1)]
fn test_background_rect(#[case] background: Option<&str>, #[case] children: usize) {
    let (scene, _, _, _) = two_rects();
    let mut r = renderer(SvgConfig {
        background: background.map(str::to_string),
        ..Default::default()
    });
    r.render(&scene);
    let svg = r.svg_node();
    assert_eq!(r.document().child_count(svg), children);
    if background.is_some() {
        let rect = r.document().child(svg, 0).unwrap();
        assert_eq!(r.document().style(rect, "fill").unwrap(), Some("white"));
        assert_eq!(r.document().attribute(rect, "width").unwrap(), Some("20"));
    }

    r.set_background(None);
    assert_eq!(r.document().child_count(svg), 1);
}

#[test]
fn test_text_content_and_fonts() {
    let mut scene = Scene::new();
    let root = scene.root_group().unwrap();
    let mark = scene.add_mark(root, MarkDef::new(MarkType::Text)).unwrap();
    let item = scene
        .add_item(
            mark,
            ItemProps {
                text: Some("hello".into()),
                font_size: Some(14.0),
                ..Default::default()
            },
        )
        .unwrap();
    scene.bound_all();

    let mut r = renderer(SvgConfig::default());
    r.render(&scene);
    let node = r.node_for_item(&scene, item).unwrap();
    let doc = r.document();
    assert_eq!(doc.tag(node), Some("text"));
    assert_eq!(doc.text(node).unwrap(), Some("hello"));
    assert_eq!(doc.style(node, "font-size").unwrap(), Some("14px"));
    assert_eq!(doc.attribute(node, "text-anchor").unwrap(), Some("start"));
}

#[rstest]
#[case(Some(true), true)]
#[case(None, false)]
fn test_string_renderer_group_item_clip(#[case] clip: Option<bool>, #[case] clipped: bool) {
    let mut scene = Scene::new();
    let root = scene.root_group().unwrap();
    let groups = scene.add_mark(root, MarkDef::new(MarkType::Group)).unwrap();
    let group = scene
        .add_item(
            groups,
            ItemProps {
                width: Some(10.0),
                height: Some(5.0),
                clip,
                ..Default::default()
            },
        )
        .unwrap();
    let inner = scene.add_mark(group, MarkDef::new(MarkType::Rect)).unwrap();
    scene.add_item(inner, rect(0.0, 0.0, 20.0, 20.0, "red")).unwrap();
    scene.bound_all();

    let mut r = SvgStringRenderer::default();
    r.resize(20.0, 20.0, [0.0, 0.0]);
    r.render(&scene);
    let svg = r.svg();
    assert_eq!(svg.contains(r#"<g clip-path="url(#clip"#), clipped);
    assert_eq!(svg.contains(r#"<rect x="0" y="0" width="10" height="5">"#), clipped);
}

#[test]
fn test_string_renderer_structure() {
    let mut scene = Scene::new();
    let root = scene.root_group().unwrap();
    let mark = scene
        .add_mark(
            root,
            MarkDef {
                interactive: false,
                role: Some("axis-label".to_string()),
                ..MarkDef::new(MarkType::Text)
            },
        )
        .unwrap();
    scene
        .add_item(
            mark,
            ItemProps {
                text: Some("a < b & c".into()),
                ..Default::default()
            },
        )
        .unwrap();
    scene.bound_all();

    let mut r = SvgStringRenderer::new(SvgConfig {
        background: Some("white".to_string()),
        ..Default::default()
    });
    r.resize(100.0, 50.0, [5.0, 5.0]);
    r.render(&scene);
    let svg = r.svg();

    assert!(svg.starts_with(
        r#"<svg class="marks" width="100" height="50" viewBox="0 0 100 50" version="1.1" xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">"#
    ));
    assert!(svg.contains(r#"<rect width="100" height="50" style="fill: white;"></rect>"#));
    assert!(svg.contains(r#"<g transform="translate(5,5)">"#));
    assert!(svg.contains(r#"<g class="mark-text role-axis-label" style="pointer-events: none;">"#));
    assert!(svg.contains("a &lt; b &amp; c</text>"));
    assert!(svg.contains(r#"<path class="background""#));
    assert!(svg.ends_with("</g></svg>"));
}

#[test]
fn test_string_renderer_wraps_sanitized_links() {
    let (mut scene, _, a, b) = two_rects();
    scene.props_mut(a).unwrap().href = Some("https://example.com".to_string());
    scene.props_mut(b).unwrap().href = Some("javascript:alert(1)".to_string());

    let loader = ResourceLoader::new().with_link_target("_blank");
    let mut r = SvgStringRenderer::with_loader(SvgConfig::default(), loader);
    r.resize(20.0, 10.0, [0.0, 0.0]);
    block_on(r.render_async(&mut scene)).unwrap();
    let svg = r.svg();

    assert!(svg.contains(
        r#"<a xlink:href="https://example.com" target="_blank" rel="noopener"><path"#
    ));
    assert_eq!(svg.matches("<a ").count(), 1);
    assert_eq!(r.loader().pending(), 0);
}

#[test]
fn test_string_renderer_gradient_defs() {
    let (mut scene, _, a, _) = two_rects();
    let gradient = Gradient {
        id: "fade".to_string(),
        ..Gradient::default()
    }
    .with_stop(0.0, "white")
    .with_stop(1.0, "red");
    scene.props_mut(a).unwrap().fill = Some(Paint::Gradient(gradient));

    let mut r = SvgStringRenderer::default();
    r.resize(20.0, 10.0, [0.0, 0.0]);
    r.render(&scene);
    let svg = r.svg();
    let defs = svg.find("<defs>").unwrap();
    let root = svg.find(r#"<g transform="#).unwrap();
    assert!(defs < root);
    assert!(svg.contains(r#"<linearGradient id="fade""#));
    assert!(svg.contains("fill: url(#fade);"));

    scene.props_mut(a).unwrap().fill = None;
    r.render(&scene);
    assert!(!r.svg().contains("<defs>"));
}
