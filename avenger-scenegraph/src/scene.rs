//! Arena-backed scene model: marks own items, group items own child marks.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use avenger_geometry::path::{parse_path_uncached, PathSegment};
use avenger_geometry::{Bounds, PathSink};
use avenger_image::ImageHandle;
use avenger_text::TextMetrics;

use crate::error::AvengerSceneGraphError;
use crate::marks::MarkType;
use crate::props::ItemProps;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub(crate) usize);

impl MarkId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl ItemId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Cached visit order of the entries with a nonzero z-index
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ZOrder {
    #[default]
    Dirty,
    /// Indices into the owning list, sorted by `(zindex, index)`
    Clean(Arc<[usize]>),
}

/// Z-order cache with interior mutability so traversal can resort lazily
/// while the scene is only borrowed. `revision` counts invalidations, so
/// renderers can tell whether the order changed since they last drew.
#[derive(Debug, Default)]
pub struct ZOrderCache {
    order: RefCell<ZOrder>,
    revision: Cell<u64>,
}

impl Clone for ZOrderCache {
    fn clone(&self) -> Self {
        Self {
            order: RefCell::new(self.order.borrow().clone()),
            revision: self.revision.clone(),
        }
    }
}

impl ZOrderCache {
    pub fn state(&self) -> ZOrder {
        self.order.borrow().clone()
    }

    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    pub fn invalidate(&self) {
        *self.order.borrow_mut() = ZOrder::Dirty;
        self.revision.set(self.revision.get() + 1);
    }

    /// Sorted nonzero-z indices, resorting if the cache is dirty
    pub fn sorted<F>(&self, len: usize, zindex: F) -> Arc<[usize]>
    where
        F: Fn(usize) -> i32,
    {
        if let ZOrder::Clean(sorted) = &*self.order.borrow() {
            return sorted.clone();
        }
        let mut zitems: Vec<usize> = (0..len).filter(|i| zindex(*i) != 0).collect();
        zitems.sort_by_key(|i| (zindex(*i), *i));
        let sorted: Arc<[usize]> = zitems.into();
        *self.order.borrow_mut() = ZOrder::Clean(sorted.clone());
        sorted
    }
}

/// Generates the geometry of `shape` mark items
pub trait ShapeGenerator: fmt::Debug {
    fn draw(&self, sink: &mut dyn PathSink, props: &ItemProps);
}

/// Per-item parse cache for the `path` field, keyed by the literal string
#[derive(Debug, Default, Clone)]
pub struct PathCache(RefCell<Option<(String, Arc<[PathSegment]>)>>);

impl PathCache {
    pub fn segments(&self, path: &str) -> Arc<[PathSegment]> {
        if let Some((key, segments)) = &*self.0.borrow() {
            if key == path {
                return segments.clone();
            }
        }
        let segments: Arc<[PathSegment]> = parse_path_uncached(path).into();
        *self.0.borrow_mut() = Some((path.to_string(), segments.clone()));
        segments
    }
}

/// Write access to an item's fields, returned by [`Scene::props_mut`]
pub struct PropsMut<'a> {
    props: &'a mut ItemProps,
    zorder: &'a ZOrderCache,
    zindex: Option<i32>,
}

impl Deref for PropsMut<'_> {
    type Target = ItemProps;

    fn deref(&self) -> &ItemProps {
        &*self.props
    }
}

impl DerefMut for PropsMut<'_> {
    fn deref_mut(&mut self) -> &mut ItemProps {
        &mut *self.props
    }
}

impl Drop for PropsMut<'_> {
    fn drop(&mut self) {
        if self.props.zindex != self.zindex {
            self.zorder.invalidate();
        }
    }
}

#[derive(Debug, Clone)]
pub struct Item {
    pub mark: MarkId,
    pub props: ItemProps,
    pub bounds: Bounds,
    /// Child marks, for group items
    pub items: Vec<MarkId>,
    pub exit: bool,
    pub image: Option<ImageHandle>,
    pub(crate) zorder: ZOrderCache,
    pub(crate) path_cache: PathCache,
}

impl Item {
    fn new(mark: MarkId, props: ItemProps) -> Self {
        Self {
            mark,
            props,
            bounds: Bounds::new(),
            items: Vec::new(),
            exit: false,
            image: None,
            zorder: Default::default(),
            path_cache: Default::default(),
        }
    }

    pub fn zorder(&self) -> ZOrder {
        self.zorder.state()
    }

    /// Number of times the z-order of this entry's children was invalidated
    pub fn zrevision(&self) -> u64 {
        self.zorder.revision()
    }
}

/// Definition of a new mark, before it is attached to a group
#[derive(Debug, Clone)]
pub struct MarkDef {
    pub marktype: MarkType,
    pub name: Option<String>,
    pub role: Option<String>,
    pub clip: bool,
    pub interactive: bool,
    pub zindex: i32,
}

impl MarkDef {
    pub fn new(marktype: MarkType) -> Self {
        Self {
            marktype,
            name: None,
            role: None,
            clip: false,
            interactive: true,
            zindex: 0,
        }
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_role<S: Into<String>>(mut self, role: S) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_clip(mut self, clip: bool) -> Self {
        self.clip = clip;
        self
    }

    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn with_zindex(mut self, zindex: i32) -> Self {
        self.zindex = zindex;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Mark {
    pub marktype: MarkType,
    pub name: Option<String>,
    pub role: Option<String>,
    pub clip: bool,
    pub interactive: bool,
    pub zindex: i32,
    /// Owning group item, `None` for the root mark
    pub group: Option<ItemId>,
    pub items: Vec<ItemId>,
    pub bounds: Bounds,
    pub shape: Option<Arc<dyn ShapeGenerator>>,
    pub(crate) zorder: ZOrderCache,
}

impl Mark {
    fn new(def: MarkDef, group: Option<ItemId>) -> Self {
        Self {
            marktype: def.marktype,
            name: def.name,
            role: def.role,
            clip: def.clip,
            interactive: def.interactive,
            zindex: def.zindex,
            group,
            items: Vec::new(),
            bounds: Bounds::new(),
            shape: None,
            zorder: Default::default(),
        }
    }

    pub fn zorder(&self) -> ZOrder {
        self.zorder.state()
    }

    /// Number of times the z-order of this entry's children was invalidated
    pub fn zrevision(&self) -> u64 {
        self.zorder.revision()
    }
}

/// A scene graph rooted at a `group` mark named `root`.
#[derive(Debug, Clone)]
pub struct Scene {
    marks: Vec<Option<Mark>>,
    items: Vec<Option<Item>>,
    root: MarkId,
    text_metrics: TextMetrics,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Root group mark with a single empty group item
    pub fn new() -> Self {
        let root = Mark::new(
            MarkDef::new(MarkType::Group)
                .with_name("root")
                .with_role("frame"),
            None,
        );
        let mut scene = Self {
            marks: vec![Some(root)],
            items: Vec::new(),
            root: MarkId(0),
            text_metrics: TextMetrics::default(),
        };
        scene.push_item(MarkId(0), ItemProps::default());
        scene
    }

    pub(crate) fn empty_root(def: MarkDef) -> Self {
        Self {
            marks: vec![Some(Mark::new(def, None))],
            items: Vec::new(),
            root: MarkId(0),
            text_metrics: TextMetrics::default(),
        }
    }

    pub fn with_text_metrics(mut self, text_metrics: TextMetrics) -> Self {
        self.text_metrics = text_metrics;
        self
    }

    pub fn text_metrics(&self) -> &TextMetrics {
        &self.text_metrics
    }

    pub fn set_text_metrics(&mut self, text_metrics: TextMetrics) {
        self.text_metrics = text_metrics;
    }

    pub fn root(&self) -> MarkId {
        self.root
    }

    /// First item of the root mark
    pub fn root_group(&self) -> Option<ItemId> {
        self.mark(self.root).items.first().copied()
    }

    pub fn try_mark(&self, id: MarkId) -> Option<&Mark> {
        self.marks.get(id.0).and_then(Option::as_ref)
    }

    pub fn try_item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id.0).and_then(Option::as_ref)
    }

    /// Panics on a purged or foreign id
    pub fn mark(&self, id: MarkId) -> &Mark {
        match self.try_mark(id) {
            Some(mark) => mark,
            None => panic!("no mark with id {id:?}"),
        }
    }

    /// Panics on a purged or foreign id
    pub fn item(&self, id: ItemId) -> &Item {
        match self.try_item(id) {
            Some(item) => item,
            None => panic!("no item with id {id:?}"),
        }
    }

    pub fn mark_mut(&mut self, id: MarkId) -> Result<&mut Mark, AvengerSceneGraphError> {
        self.marks
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(AvengerSceneGraphError::UnknownMark(id))
    }

    pub fn item_mut(&mut self, id: ItemId) -> Result<&mut Item, AvengerSceneGraphError> {
        self.items
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(AvengerSceneGraphError::UnknownItem(id))
    }

    /// Mutable access to an item's fields. The owning mark's z-order is
    /// invalidated when the guard drops with a different `zindex`.
    pub fn props_mut(&mut self, id: ItemId) -> Result<PropsMut<'_>, AvengerSceneGraphError> {
        let item = self
            .items
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(AvengerSceneGraphError::UnknownItem(id))?;
        let mark = item.mark;
        let zorder = &self
            .marks
            .get(mark.0)
            .and_then(Option::as_ref)
            .ok_or(AvengerSceneGraphError::UnknownMark(mark))?
            .zorder;
        Ok(PropsMut {
            zindex: item.props.zindex,
            props: &mut item.props,
            zorder,
        })
    }

    pub fn set_item_zindex(&mut self, id: ItemId, zindex: i32) -> Result<(), AvengerSceneGraphError> {
        self.props_mut(id)?.zindex = Some(zindex);
        Ok(())
    }

    pub fn set_mark_zindex(&mut self, id: MarkId, zindex: i32) -> Result<(), AvengerSceneGraphError> {
        let mark = self.mark_mut(id)?;
        mark.zindex = zindex;
        if let Some(group) = mark.group {
            self.item_mut(group)?.zorder.invalidate();
        }
        Ok(())
    }

    pub fn set_shape_generator(
        &mut self,
        id: MarkId,
        shape: Arc<dyn ShapeGenerator>,
    ) -> Result<(), AvengerSceneGraphError> {
        self.mark_mut(id)?.shape = Some(shape);
        Ok(())
    }

    /// Owning mark of an item
    pub fn item_mark(&self, id: ItemId) -> MarkId {
        self.item(id).mark
    }

    /// Group item that owns a mark, `None` for the root
    pub fn mark_group(&self, id: MarkId) -> Option<ItemId> {
        self.mark(id).group
    }

    /// Group item that contains `item`, skipping the item's own mark
    pub fn parent_group(&self, id: ItemId) -> Option<ItemId> {
        self.mark_group(self.item_mark(id))
    }

    fn push_item(&mut self, mark: MarkId, props: ItemProps) -> ItemId {
        let id = ItemId(self.items.len());
        self.items.push(Some(Item::new(mark, props)));
        if let Some(Some(m)) = self.marks.get_mut(mark.0) {
            m.items.push(id);
            m.zorder.invalidate();
        }
        id
    }

    /// Append a new item to a mark
    pub fn add_item(&mut self, mark: MarkId, props: ItemProps) -> Result<ItemId, AvengerSceneGraphError> {
        self.mark_mut(mark)?;
        Ok(self.push_item(mark, props))
    }

    /// Replace a mark's item array. Previous items are flagged `exit` and
    /// stay in the arena until [`Scene::purge`].
    pub fn set_items(
        &mut self,
        mark: MarkId,
        items: Vec<ItemProps>,
    ) -> Result<Vec<ItemId>, AvengerSceneGraphError> {
        let previous = std::mem::take(&mut self.mark_mut(mark)?.items);
        for id in previous {
            self.flag_exit(id);
        }
        Ok(items
            .into_iter()
            .map(|props| self.push_item(mark, props))
            .collect())
    }

    /// Remove an item from its mark, flagging it `exit`
    pub fn remove_item(&mut self, id: ItemId) -> Result<(), AvengerSceneGraphError> {
        let mark_id = self.item_mut(id)?.mark;
        let mark = self.mark_mut(mark_id)?;
        mark.items.retain(|i| *i != id);
        mark.zorder.invalidate();
        self.flag_exit(id);
        Ok(())
    }

    fn flag_exit(&mut self, id: ItemId) {
        let children = match self.items.get_mut(id.0).and_then(Option::as_mut) {
            Some(item) => {
                item.exit = true;
                item.items.clone()
            }
            None => return,
        };
        // Child marks go with their group
        for mark in children {
            let items = self.try_mark(mark).map(|m| m.items.clone()).unwrap_or_default();
            for child in items {
                self.flag_exit(child);
            }
        }
    }

    /// Attach a new mark to a group item at `index`, replacing the mark
    /// already there, or appending when `index` is past the end.
    pub fn insert_mark(
        &mut self,
        group: ItemId,
        def: MarkDef,
        index: Option<usize>,
    ) -> Result<MarkId, AvengerSceneGraphError> {
        let group_mark = self.item_mut(group)?.mark;
        if self.mark(group_mark).marktype != MarkType::Group {
            return Err(AvengerSceneGraphError::NotAGroup(group));
        }
        let id = MarkId(self.marks.len());
        self.marks.push(Some(Mark::new(def, Some(group))));

        let previous = {
            let item = self.item_mut(group)?;
            item.zorder.invalidate();
            match index {
                Some(i) if i < item.items.len() => Some(std::mem::replace(&mut item.items[i], id)),
                _ => {
                    item.items.push(id);
                    None
                }
            }
        };
        if let Some(previous) = previous {
            let items = self.mark(previous).items.clone();
            for child in items {
                self.flag_exit(child);
            }
        }
        Ok(id)
    }

    pub fn add_mark(&mut self, group: ItemId, def: MarkDef) -> Result<MarkId, AvengerSceneGraphError> {
        self.insert_mark(group, def, None)
    }

    pub(crate) fn add_root_item(&mut self, props: ItemProps) -> ItemId {
        self.push_item(self.root, props)
    }

    /// Set a loaded (or placeholder) image on an image item
    pub fn set_image(&mut self, id: ItemId, image: ImageHandle) -> Result<(), AvengerSceneGraphError> {
        self.item_mut(id)?.image = Some(image);
        Ok(())
    }

    /// Free exited items and the marks they owned
    pub fn purge(&mut self) {
        let exited: Vec<usize> = self
            .items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| item.as_ref().filter(|it| it.exit).map(|_| i))
            .collect();
        for i in exited {
            if let Some(item) = self.items[i].take() {
                for mark in item.items {
                    if let Some(slot) = self.marks.get_mut(mark.0) {
                        *slot = None;
                    }
                }
            }
        }
        // Marks replaced by insert_mark no longer have a group referencing them
        let orphaned: Vec<usize> = self
            .marks
            .iter()
            .enumerate()
            .filter_map(|(i, mark)| {
                let group = mark.as_ref()?.group?;
                let attached = self
                    .try_item(group)
                    .map(|g| g.items.contains(&MarkId(i)))
                    .unwrap_or(false);
                (!attached).then_some(i)
            })
            .collect();
        for i in orphaned {
            self.marks[i] = None;
        }
    }

    /// Sum of the `x`/`y` offsets of every group item enclosing `id`
    pub fn group_offset(&self, id: ItemId) -> (f64, f64) {
        let (mut x, mut y) = (0.0, 0.0);
        let mut group = self.try_item(id).and_then(|item| self.try_mark(item.mark)?.group);
        while let Some(g) = group {
            let Some(item) = self.try_item(g) else {
                break;
            };
            x += item.props.x();
            y += item.props.y();
            group = self.try_mark(item.mark).and_then(|m| m.group);
        }
        (x, y)
    }

    /// Every live mark id reachable from the root, depth first
    pub fn marks(&self) -> Vec<MarkId> {
        let mut out = Vec::new();
        self.collect_marks(self.root, &mut out);
        out
    }

    fn collect_marks(&self, mark: MarkId, out: &mut Vec<MarkId>) {
        out.push(mark);
        for item in &self.mark(mark).items {
            for child in &self.item(*item).items {
                self.collect_marks(*child, out);
            }
        }
    }

    pub fn is_live_item(&self, id: ItemId) -> bool {
        self.try_item(id).map(|item| !item.exit).unwrap_or(false)
    }

    pub(crate) fn path_segments(&self, id: ItemId, path: &str) -> Arc<[PathSegment]> {
        self.item(id).path_cache.segments(path)
    }
}
