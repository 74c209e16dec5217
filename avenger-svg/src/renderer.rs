//! Incremental SVG reconciler.
//!
//! Scene items are bound to elements of a [`RetainedSurface`] through side
//! tables. Each render only revisits the subtrees reported dirty since the
//! previous one, and every attribute write is checked against the last value
//! applied to that element.

use std::collections::{HashMap, HashSet};
use std::mem;

use avenger_common::format::fmt_num;
use avenger_image::ResourceLoader;
use avenger_scenegraph::marks::{group, text, AttributeSink};
use avenger_scenegraph::renderer::{apply_images, RendererBase};
use avenger_scenegraph::{ItemId, MarkId, MarkType, Scene};

use crate::config::SvgConfig;
use crate::defs::{clip_rect_attributes, gradient_attributes, url_ref, ClipOwner, Defs};
use crate::document::{dom_child, dom_clear, NodeId, RetainedSurface};
use crate::error::AvengerSvgError;
use crate::markup::{css_class, root_attributes, root_transform};
use crate::style::{item_styles, text_styles};

/// Element bound to part of the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Binding {
    /// Container `g` of a mark
    Mark(MarkId),
    /// Element of one item
    Item(ItemId),
    /// Single element holding every item of a line, area or trail mark
    Nested(MarkId),
}

type Values = HashMap<String, Option<String>>;

/// Bookkeeping of the last render, for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Whether the render walked the tree instead of only patching items
    pub structural: bool,
    /// Scene parts bound to an element
    pub bound_nodes: usize,
    /// Elements mapped back to an item
    pub owned_nodes: usize,
    /// Elements with cached attribute values
    pub cached_nodes: usize,
    /// Marks with a recorded z-order revision
    pub tracked_marks: usize,
    /// Generation entries kept across renders
    pub generations: usize,
}

/// Diff-based renderer writing into a retained element tree
pub struct SvgRenderer<D: RetainedSurface> {
    base: RendererBase,
    config: SvgConfig,
    doc: D,
    svg: NodeId,
    root: NodeId,
    background: Option<NodeId>,
    defs_el: Option<NodeId>,
    defs: Defs,

    dirty_id: u64,
    dirty: Vec<ItemId>,
    dirty_all: bool,
    item_gen: HashMap<ItemId, u64>,
    mark_gen: HashMap<MarkId, u64>,
    item_update: HashMap<ItemId, u64>,
    /// Z-order revision of each mark when its container was last drawn
    mark_zrev: HashMap<MarkId, u64>,
    structural: bool,

    nodes: HashMap<Binding, NodeId>,
    owners: HashMap<NodeId, ItemId>,
    values: HashMap<NodeId, Values>,
}

impl<D: RetainedSurface> SvgRenderer<D> {
    pub fn new(doc: D, config: SvgConfig) -> Self {
        Self::with_loader(doc, config, ResourceLoader::new())
    }

    pub fn with_loader(mut doc: D, config: SvgConfig, loader: ResourceLoader) -> Self {
        let container = doc.container();
        let svg = dom_child(&mut doc, container, 0, "svg");
        dom_clear(&mut doc, container, 1);
        doc.set_attribute(svg, "class", Some(&config.class_name));
        let root = dom_child(&mut doc, svg, 0, "g");
        dom_clear(&mut doc, svg, 1);

        let mut base = RendererBase::new(loader);
        base.set_background(config.background.clone());
        let mut renderer = Self {
            base,
            config,
            doc,
            svg,
            root,
            background: None,
            defs_el: None,
            defs: Defs::default(),
            dirty_id: 1,
            dirty: Vec::new(),
            dirty_all: true,
            item_gen: HashMap::new(),
            mark_gen: HashMap::new(),
            item_update: HashMap::new(),
            mark_zrev: HashMap::new(),
            structural: false,
            nodes: HashMap::new(),
            owners: HashMap::new(),
            values: HashMap::new(),
        };
        renderer.update_background();
        renderer
    }

    pub fn document(&self) -> &D {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.doc
    }

    pub fn into_document(self) -> D {
        self.doc
    }

    /// The `svg` element
    pub fn svg_node(&self) -> NodeId {
        self.svg
    }

    /// The `g` element holding the scene, translated by the origin
    pub fn root_node(&self) -> NodeId {
        self.root
    }

    pub fn loader(&self) -> &ResourceLoader {
        self.base.loader()
    }

    pub fn config(&self) -> &SvgConfig {
        &self.config
    }

    /// Current generation, incremented after every render
    pub fn dirty_id(&self) -> u64 {
        self.dirty_id
    }

    pub fn stats(&self) -> RenderStats {
        RenderStats {
            structural: self.structural,
            bound_nodes: self.nodes.len(),
            owned_nodes: self.owners.len(),
            cached_nodes: self.values.len(),
            tracked_marks: self.mark_zrev.len(),
            generations: self.item_gen.len() + self.mark_gen.len() + self.item_update.len(),
        }
    }

    /// Scene item rendered by `node`. Group backgrounds and foregrounds map
    /// to their group item.
    pub fn item_for_node(&self, node: NodeId) -> Option<ItemId> {
        self.owners.get(&node).copied()
    }

    /// Element of `item`, the shared element for line, area and trail items
    pub fn node_for_item(&self, scene: &Scene, item: ItemId) -> Option<NodeId> {
        let mark = scene.try_item(item)?.mark;
        if scene.try_mark(mark)?.marktype.nested() {
            self.nodes.get(&Binding::Nested(mark)).copied()
        } else {
            self.nodes.get(&Binding::Item(item)).copied()
        }
    }

    pub fn resize(&mut self, width: f64, height: f64, origin: [f64; 2]) {
        self.base.resize(width, height, origin);
        for (name, value) in root_attributes(&self.config.class_name, width, height) {
            self.doc.set_attribute(self.svg, name, Some(&value));
        }
        self.doc
            .set_attribute(self.root, "transform", Some(&root_transform(origin)));
        self.update_background();
        self.dirty.clear();
    }

    pub fn background(&self) -> Option<&str> {
        self.base.background()
    }

    pub fn set_background(&mut self, background: Option<String>) {
        self.config.background = background.clone();
        self.base.set_background(background);
        self.update_background();
    }

    fn update_background(&mut self) {
        match self.base.background().map(str::to_string) {
            Some(color) => {
                let rect = match self.background {
                    Some(rect) => rect,
                    None => {
                        let rect = self.doc.create_element("rect");
                        self.background = Some(rect);
                        rect
                    }
                };
                if self.doc.next_sibling(rect) != Some(self.root) {
                    self.doc.insert_before(self.svg, rect, Some(self.root));
                }
                let (w, h) = (fmt_num(self.base.width()), fmt_num(self.base.height()));
                self.doc.set_attribute(rect, "width", Some(&w));
                self.doc.set_attribute(rect, "height", Some(&h));
                self.doc.set_style(rect, "fill", Some(&color));
            }
            None => {
                if let Some(rect) = self.background.take() {
                    self.doc.remove_child(self.svg, rect);
                }
            }
        }
    }

    /// Report `item` as changed. Repeated reports within one generation are
    /// ignored.
    pub fn dirty(&mut self, item: ItemId) {
        if self.item_gen.get(&item) != Some(&self.dirty_id) {
            self.item_gen.insert(item, self.dirty_id);
            self.dirty.push(item);
        }
    }

    /// Drop all bindings so the next render rebuilds every element
    pub fn reset(&mut self) {
        dom_clear(&mut self.doc, self.root, 0);
        self.nodes.clear();
        self.owners.clear();
        self.values.clear();
        self.mark_zrev.clear();
        self.dirty.clear();
        self.clear_generations();
        self.defs.reset();
    }

    /// Generation entries only matter within the render that wrote them
    fn clear_generations(&mut self) {
        self.item_gen.clear();
        self.mark_gen.clear();
        self.item_update.clear();
    }

    #[tracing::instrument(skip_all)]
    pub fn render(&mut self, scene: &Scene) {
        self.structural = self.dirty_check(scene);
        if self.structural {
            if self.dirty_all {
                self.defs.reset();
            }
            let root = self.root;
            self.draw(scene, root, scene.root(), None);
            self.truncate(root, 1);
        }
        self.update_defs();
        self.dirty.clear();
        self.clear_generations();
        self.dirty_id += 1;
        tracing::trace!("render stats: {:?}", self.stats());
    }

    /// Render, wait for images the scene references, then render the items
    /// whose images arrived
    pub async fn render_async(&mut self, scene: &mut Scene) -> Result<(), AvengerSvgError> {
        self.render(scene);
        let images = self.base.load_images(scene).await;
        let loaded: Vec<ItemId> = images.iter().map(|(id, _)| *id).collect();
        if apply_images(scene, images)? {
            for id in loaded {
                self.dirty(id);
            }
            self.render(scene);
        }
        Ok(())
    }

    /// Serialized `svg` element
    pub fn svg(&self) -> String {
        self.doc.markup(self.svg)
    }

    fn is_mark_dirty(&self, mark: MarkId) -> bool {
        self.dirty_all
            || !self.nodes.contains_key(&Binding::Mark(mark))
            || self.mark_gen.get(&mark) == Some(&self.dirty_id)
    }

    fn is_item_dirty(&self, binding: Binding, item: ItemId) -> bool {
        self.dirty_all
            || !self.nodes.contains_key(&binding)
            || self.item_gen.get(&item) == Some(&self.dirty_id)
    }

    /// Classify reported items and patch updated elements in place. Returns
    /// whether a structural pass is needed.
    fn dirty_check(&mut self, scene: &Scene) -> bool {
        self.dirty_all = true;
        if self.dirty.is_empty() {
            return true;
        }

        self.dirty_id += 1;
        let id = self.dirty_id;

        for item in mem::take(&mut self.dirty) {
            let Some(it) = scene.try_item(item) else {
                // Purged from the scene
                if let Some(node) = self.nodes.get(&Binding::Item(item)).copied() {
                    self.detach(node);
                }
                continue;
            };
            let mark_id = it.mark;
            let Some(mark) = scene.try_mark(mark_id) else {
                continue;
            };
            let nested = mark.marktype.nested();

            if self.zdirty(mark_id, mark.zrevision()) && self.mark_gen.get(&mark_id) != Some(&id) {
                self.dirty_all = false;
                self.mark_gen.insert(mark_id, id);
                self.dirty_parents(scene, mark.group, id);
            }

            if it.exit {
                if nested {
                    match (mark.items.first(), self.nodes.get(&Binding::Nested(mark_id)).copied()) {
                        (Some(first), Some(node)) => self.update(scene, node, *first),
                        (None, Some(node)) => self.detach(node),
                        _ => {}
                    }
                } else if let Some(node) = self.nodes.get(&Binding::Item(item)).copied() {
                    self.detach(node);
                }
                continue;
            }

            let (binding, target) = if nested {
                match mark.items.first() {
                    Some(first) => (Binding::Nested(mark_id), *first),
                    None => continue,
                }
            } else {
                (Binding::Item(item), item)
            };
            if self.item_update.get(&target) == Some(&id) {
                continue;
            }

            match self.nodes.get(&binding).copied() {
                Some(node) if self.doc.is_attached(node) => self.update(scene, node, target),
                _ => {
                    // ENTER: rebuild the chain of ancestors down to the item
                    self.dirty_all = false;
                    self.dirty_parents(scene, Some(target), id);
                }
            }
            self.item_update.insert(target, id);
        }
        !self.dirty_all
    }

    fn dirty_parents(&mut self, scene: &Scene, item: Option<ItemId>, id: u64) {
        let mut current = item;
        while let Some(item) = current {
            if self.item_gen.get(&item) == Some(&id) {
                return;
            }
            self.item_gen.insert(item, id);
            let Some(mark) = scene.try_item(item).map(|it| it.mark) else {
                return;
            };
            if self.mark_gen.get(&mark) == Some(&id) {
                return;
            }
            self.mark_gen.insert(mark, id);
            current = scene.try_mark(mark).and_then(|m| m.group);
        }
    }

    /// Whether the z-order of `mark` changed since its container was drawn
    fn zdirty(&self, mark: MarkId, revision: u64) -> bool {
        self.mark_zrev.get(&mark).is_some_and(|drawn| *drawn != revision)
    }

    /// Remove `node` from the tree and forget its subtree
    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.doc.parent(node) {
            self.doc.remove_child(parent, node);
        }
        self.forget(node);
    }

    /// Remove every child of `el` from `index` on, forgetting their subtrees
    fn truncate(&mut self, el: NodeId, index: usize) {
        while let Some(child) = self.doc.child(el, index) {
            self.doc.remove_child(el, child);
            self.forget(child);
        }
    }

    /// Drop the side-table entries of `node` and its descendants
    fn forget(&mut self, node: NodeId) {
        let mut removed = HashSet::new();
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            removed.insert(n);
            stack.extend((0..self.doc.child_count(n)).filter_map(|i| self.doc.child(n, i)));
        }
        for n in &removed {
            self.owners.remove(n);
            self.values.remove(n);
        }

        let mut unbound = Vec::new();
        self.nodes.retain(|binding, n| {
            let keep = !removed.contains(n);
            if !keep {
                unbound.push(*binding);
            }
            keep
        });
        for binding in unbound {
            match binding {
                Binding::Mark(mark) => {
                    self.mark_zrev.remove(&mark);
                    self.defs.forget(ClipOwner::Mark(mark));
                }
                Binding::Item(item) => self.defs.forget(ClipOwner::Item(item)),
                Binding::Nested(_) => {}
            }
        }
    }

    /// Place the container of `mark` after `prev` within `el` and bring its
    /// dirty items up to date. Clean marks are left untouched.
    fn draw(&mut self, scene: &Scene, el: NodeId, mark_id: MarkId, prev: Option<NodeId>) -> NodeId {
        if !self.is_mark_dirty(mark_id) {
            if let Some(node) = self.nodes.get(&Binding::Mark(mark_id)) {
                return *node;
            }
        }
        let mark = scene.mark(mark_id);
        let is_group = mark.marktype == MarkType::Group;

        let parent = self.bind(el, prev, Binding::Mark(mark_id), "g", None);
        self.emit(parent, "class", Some(css_class(mark)));
        let events = (!is_group && !mark.interactive).then(|| "none".to_string());
        self.set_style(parent, "pointer-events", events);
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
        self.emit(parent, "clip-path", clip);
        self.mark_zrev.insert(mark_id, mark.zrevision());

        let tag = mark.marktype.tag();
        let items: Vec<(Binding, ItemId)> = if mark.marktype.nested() {
            mark.items
                .first()
                .map(|first| (Binding::Nested(mark_id), *first))
                .into_iter()
                .collect()
        } else {
            scene
                .item_order(mark_id)
                .into_iter()
                .map(|id| (Binding::Item(id), id))
                .collect()
        };

        let mut sibling = None;
        let count = items.len();
        for (binding, item) in items {
            let dirty = self.is_item_dirty(binding, item);
            let node = self.bind(parent, sibling, binding, tag, Some(item));
            if dirty {
                self.update(scene, node, item);
                if is_group {
                    self.recurse(scene, node, item);
                }
            }
            sibling = Some(node);
        }
        self.truncate(parent, count);
        parent
    }

    /// Draw the child marks of a group item into its foreground element
    fn recurse(&mut self, scene: &Scene, node: NodeId, group: ItemId) {
        let Some(fg) = self.doc.child(node, 1) else {
            return;
        };
        let mut marks = Vec::new();
        scene.visit_marks(group, |m| marks.push(m));
        let mut prev = None;
        for mark in &marks {
            prev = Some(self.draw(scene, fg, *mark, prev));
        }
        self.truncate(fg, marks.len());
    }

    /// Element bound to `binding`, created when missing and moved to just
    /// after `sibling` when out of place
    fn bind(
        &mut self,
        el: NodeId,
        sibling: Option<NodeId>,
        binding: Binding,
        tag: &str,
        item: Option<ItemId>,
    ) -> NodeId {
        let (node, created) = match self.nodes.get(&binding) {
            Some(node) => (*node, false),
            None => {
                let node = self.doc.create_element(tag);
                self.nodes.insert(binding, node);
                if let Some(item) = item {
                    self.owners.insert(node, item);
                    if tag == "g" {
                        let bg = self.doc.create_element("path");
                        self.doc.set_attribute(bg, "class", Some("background"));
                        self.doc.append_child(node, bg);
                        self.owners.insert(bg, item);
                        let fg = self.doc.create_element("g");
                        self.doc.append_child(node, fg);
                        self.owners.insert(fg, item);
                    }
                }
                (node, true)
            }
        };
        if created || self.doc.parent(node) != Some(el) || self.doc.previous_sibling(node) != sibling {
            let before = match sibling {
                Some(s) => self.doc.next_sibling(s),
                None => self.doc.child(el, 0),
            };
            self.doc.insert_before(el, node, before);
        }
        node
    }

    /// Apply the attributes and styles of `item` to `node`
    fn update(&mut self, scene: &Scene, node: NodeId, item: ItemId) {
        let it = scene.item(item);
        let mark = scene.mark(it.mark);
        if mark.marktype.nested() {
            self.owners.insert(node, item);
        }
        let mut attrs = Collected::default();
        mark.marktype.attr(&mut attrs, scene, item);
        for (name, value) in attrs.0 {
            self.emit(node, &name, value);
        }

        let mut style_node = node;
        match mark.marktype {
            MarkType::Group => {
                if let (Some(bg), Some(fg)) = (self.doc.child(node, 0), self.doc.child(node, 1)) {
                    let clip = group::clips(scene, item).then(|| {
                        self.defs.clip_url(
                            ClipOwner::Item(item),
                            it.props.width(),
                            it.props.height(),
                        )
                    });
                    let mut fg_attrs = Collected::default();
                    group::foreground(&mut fg_attrs, clip);
                    for (name, value) in fg_attrs.0 {
                        self.emit(fg, &name, value);
                    }

                    let mut bg_attrs = Collected::default();
                    group::background(&mut bg_attrs, &it.props);
                    for (name, value) in bg_attrs.0 {
                        self.emit(bg, &name, value);
                    }
                    let events = (!mark.interactive).then(|| "none".to_string());
                    self.set_style(bg, "pointer-events", events);
                    style_node = bg;
                }
            }
            MarkType::Text => {
                let value = text::text_value(&it.props, scene.text_metrics());
                let cache = self.values.entry(node).or_default();
                if cache.get("#text") != Some(&Some(value.clone())) {
                    self.doc.set_text(node, &value);
                    cache.insert("#text".to_string(), Some(value));
                }
                for (name, value) in text_styles(&it.props) {
                    self.set_style(node, name, value);
                }
            }
            _ => {}
        }

        for (name, value) in item_styles(&it.props, &mut self.defs) {
            self.set_style(style_node, name, value);
        }
    }

    fn emit(&mut self, node: NodeId, name: &str, value: Option<String>) {
        let cache = self.values.entry(node).or_default();
        if cache.get(name) == Some(&value) {
            return;
        }
        self.doc.set_attribute(node, name, value.as_deref());
        cache.insert(name.to_string(), value);
    }

    fn set_style(&mut self, node: NodeId, name: &str, value: Option<String>) {
        let key = format!("style:{name}");
        let cache = self.values.entry(node).or_default();
        if cache.get(&key) == Some(&value) {
            return;
        }
        self.doc.set_style(node, name, value.as_deref());
        cache.insert(key, value);
    }

    /// Ids referenced through `url(#id)` by attached elements
    fn referenced_ids(&self) -> HashSet<String> {
        self.values
            .iter()
            .filter(|(node, _)| self.doc.is_attached(**node))
            .flat_map(|(_, values)| values.values())
            .filter_map(|v| v.as_deref().and_then(url_ref).map(str::to_string))
            .collect()
    }

    /// Rebuild the `defs` element from the definitions still in use
    fn update_defs(&mut self) {
        let referenced = self.referenced_ids();
        self.defs.retain_referenced(&referenced);

        let mut index = 0;
        let defs = mem::take(&mut self.defs);
        for (id, gradient) in &defs.gradients {
            let el = self.defs_element();
            let node = dom_child(&mut self.doc, el, index, "linearGradient");
            for (name, value) in gradient_attributes(id, gradient) {
                self.doc.set_attribute(node, name, value.as_deref());
            }
            for (i, stop) in gradient.stops.iter().enumerate() {
                let s = dom_child(&mut self.doc, node, i, "stop");
                self.doc.set_attribute(s, "offset", Some(&fmt_num(stop.offset)));
                self.doc.set_attribute(s, "stop-color", Some(&stop.color));
            }
            dom_clear(&mut self.doc, node, gradient.stops.len());
            index += 1;
        }
        for (id, clip) in &defs.clipping {
            let el = self.defs_element();
            let node = dom_child(&mut self.doc, el, index, "clipPath");
            self.doc.set_attribute(node, "id", Some(id));
            let rect = dom_child(&mut self.doc, node, 0, "rect");
            for (name, value) in clip_rect_attributes(clip) {
                self.doc.set_attribute(rect, name, value.as_deref());
            }
            index += 1;
        }
        self.defs = defs;

        if let Some(el) = self.defs_el {
            if index == 0 {
                self.doc.remove_child(self.svg, el);
                self.defs_el = None;
            } else {
                dom_clear(&mut self.doc, el, index);
            }
        }
    }

    fn defs_element(&mut self) -> NodeId {
        match self.defs_el {
            Some(el) => el,
            None => {
                let svg = self.svg;
                let el = dom_child(&mut self.doc, svg, 0, "defs");
                self.defs_el = Some(el);
                el
            }
        }
    }
}

/// Attribute writes collected in emission order
#[derive(Default)]
struct Collected(Vec<(String, Option<String>)>);

impl AttributeSink for Collected {
    fn attr(&mut self, name: &str, value: Option<String>) {
        self.0.push((name.to_string(), value));
    }
}
