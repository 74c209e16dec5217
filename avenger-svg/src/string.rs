//! SVG serialization of a whole scene to markup text.

use std::collections::HashMap;

use avenger_common::format::fmt_num;
use avenger_image::{ResourceLoader, SanitizedUrl};
use avenger_scenegraph::marks::{group, text};
use avenger_scenegraph::renderer::{apply_images, RendererBase};
use avenger_scenegraph::{ItemId, MarkId, MarkType, Scene};
use futures::future::join_all;

use crate::config::SvgConfig;
use crate::defs::{ClipOwner, Defs};
use crate::error::AvengerSvgError;
use crate::markup::{
    close_tag, css_class, escape_attr, escape_text, open_tag, root_attributes, root_transform,
};
use crate::style::{item_styles, style_attribute, text_styles};

#[derive(Debug, Clone, Default)]
struct Text {
    head: String,
    defs: String,
    root: String,
    body: String,
    foot: String,
}

/// Renders the full scene to an SVG document string on every pass
pub struct SvgStringRenderer {
    base: RendererBase,
    config: SvgConfig,
    text: Text,
    defs: Defs,
    /// Sanitized `href` values, `None` for links that failed sanitization
    hrefs: HashMap<String, Option<SanitizedUrl>>,
}

impl Default for SvgStringRenderer {
    fn default() -> Self {
        Self::new(SvgConfig::default())
    }
}

impl SvgStringRenderer {
    pub fn new(config: SvgConfig) -> Self {
        Self::with_loader(config, ResourceLoader::new())
    }

    pub fn with_loader(config: SvgConfig, loader: ResourceLoader) -> Self {
        let mut base = RendererBase::new(loader);
        base.set_background(config.background.clone());
        let mut renderer = Self {
            base,
            config,
            text: Text::default(),
            defs: Defs::default(),
            hrefs: HashMap::new(),
        };
        renderer.resize(0.0, 0.0, [0.0, 0.0]);
        renderer
    }

    pub fn loader(&self) -> &ResourceLoader {
        self.base.loader()
    }

    pub fn resize(&mut self, width: f64, height: f64, origin: [f64; 2]) {
        self.base.resize(width, height, origin);
        let attrs = root_attributes(&self.config.class_name, width, height);
        let mut head = open_tag("svg", attrs.into_iter().map(|(k, v)| (k, Some(v))), None);
        if let Some(background) = self.base.background() {
            head += &open_tag(
                "rect",
                [
                    ("width", Some(fmt_num(width))),
                    ("height", Some(fmt_num(height))),
                ],
                Some(&format!("style=\"fill: {};\"", escape_attr(background))),
            );
            head += &close_tag("rect");
        }
        self.text.head = head;
        self.text.root = open_tag("g", [("transform", Some(root_transform(origin)))], None);
        self.text.foot = close_tag("g") + &close_tag("svg");
    }

    pub fn set_background(&mut self, background: Option<String>) {
        self.config.background = background.clone();
        self.base.set_background(background);
        let (w, h, origin) = (self.base.width(), self.base.height(), self.base.origin());
        self.resize(w, h, origin);
    }

    #[tracing::instrument(skip_all)]
    pub fn render(&mut self, scene: &Scene) {
        self.defs.reset();
        self.text.body = self.mark(scene, scene.root());
        self.text.defs = self.defs.markup();
    }

    /// Load images and sanitize links before rendering
    pub async fn render_async(&mut self, scene: &mut Scene) -> Result<(), AvengerSvgError> {
        let images = self.base.load_images(scene).await;
        apply_images(scene, images)?;
        self.resolve_links(scene).await;
        self.render(scene);
        Ok(())
    }

    /// Sanitize the `href` of every item not seen before
    pub async fn resolve_links(&mut self, scene: &Scene) {
        let mut pending: Vec<String> = Vec::new();
        for mark in scene.marks() {
            for item in &scene.mark(mark).items {
                if let Some(href) = &scene.item(*item).props.href {
                    if !self.hrefs.contains_key(href) && !pending.contains(href) {
                        pending.push(href.clone());
                    }
                }
            }
        }
        let loader = self.base.loader();
        let results = join_all(pending.iter().map(|href| loader.sanitize_url(href))).await;
        self.hrefs.extend(pending.into_iter().zip(results));
    }

    /// The complete document: head, defs, root group, body and foot
    pub fn svg(&self) -> String {
        let t = &self.text;
        format!("{}{}{}{}{}", t.head, t.defs, t.root, t.body, t.foot)
    }

    /// `<a>` attributes for an item link that was sanitized
    fn href(&self, scene: &Scene, item: ItemId) -> Option<Vec<(&'static str, Option<String>)>> {
        let href = scene.item(item).props.href.as_ref()?;
        let url = self.hrefs.get(href)?.as_ref()?;
        Some(vec![
            ("xlink:href", Some(url.href.clone())),
            ("target", url.target.clone()),
            ("rel", url.rel.clone()),
        ])
    }

    fn mark(&mut self, scene: &Scene, mark_id: MarkId) -> String {
        let mark = scene.mark(mark_id);
        let tag = mark.marktype.tag();
        let is_group = mark.marktype == MarkType::Group;
        let style = (!is_group && !mark.interactive).then_some(r#"style="pointer-events: none;""#);
        let clip = match (mark.clip, mark.group) {
            (true, Some(g)) => {
                let props = &scene.item(g).props;
                Some(
                    self.defs
                        .clip_url(ClipOwner::Mark(mark_id), props.width(), props.height()),
                )
            }
            _ => None,
        };

        let mut s = open_tag(
            "g",
            [("class", Some(css_class(mark))), ("clip-path", clip)],
            style,
        );

        let items: Vec<ItemId> = if mark.marktype.nested() {
            mark.items.first().copied().into_iter().collect()
        } else {
            scene.item_order(mark_id)
        };
        for item in items {
            s += &self.item(scene, item, tag);
        }
        s + &close_tag("g")
    }

    fn item(&mut self, scene: &Scene, item: ItemId, tag: &str) -> String {
        let it = scene.item(item);
        let mark = scene.mark(it.mark);
        let href = self.href(scene, item);

        let mut s = String::new();
        if let Some(href) = &href {
            s += &open_tag("a", href.iter().cloned(), None);
        }

        let mut attrs: Vec<(String, Option<String>)> = Vec::new();
        mark.marktype.attr(&mut attrs, scene, item);
        let style = if mark.marktype == MarkType::Group {
            None
        } else {
            let mut entries: Vec<(&'static str, Option<String>)> = Vec::new();
            if mark.marktype == MarkType::Text {
                entries.extend(text_styles(&it.props));
            }
            entries.extend(item_styles(&it.props, &mut self.defs));
            style_attribute(entries).map(|st| format!("style=\"{}\"", escape_attr(&st)))
        };
        s += &open_tag(
            tag,
            attrs.iter().map(|(k, v)| (k.as_str(), v.clone())),
            style.as_deref(),
        );

        match mark.marktype {
            MarkType::Text => {
                s += &escape_text(&text::text_value(&it.props, scene.text_metrics()));
            }
            MarkType::Group => {
                let mut bg: Vec<(String, Option<String>)> = Vec::new();
                group::background(&mut bg, &it.props);
                let mut entries: Vec<(&'static str, Option<String>)> = Vec::new();
                if !mark.interactive {
                    entries.push(("pointer-events", Some("none".to_string())));
                }
                entries.extend(item_styles(&it.props, &mut self.defs));
                let bg_style =
                    style_attribute(entries).map(|st| format!("style=\"{}\"", escape_attr(&st)));
                s += &open_tag(
                    "path",
                    bg.iter().map(|(k, v)| (k.as_str(), v.clone())),
                    bg_style.as_deref(),
                );
                s += &close_tag("path");

                let clip = group::clips(scene, item).then(|| {
                    self.defs
                        .clip_url(ClipOwner::Item(item), it.props.width(), it.props.height())
                });
                let mut fg: Vec<(String, Option<String>)> = Vec::new();
                group::foreground(&mut fg, clip);
                s += &open_tag("g", fg.iter().map(|(k, v)| (k.as_str(), v.clone())), None);
                let mut marks = Vec::new();
                scene.visit_marks(item, |m| marks.push(m));
                for m in marks {
                    s += &self.mark(scene, m);
                }
                s += &close_tag("g");
            }
            _ => {}
        }

        s += &close_tag(tag);
        if href.is_some() {
            s += &close_tag("a");
        }
        s
    }
}
