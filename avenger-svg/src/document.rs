//! Retained element tree the reconciler writes into.

use indexmap::IndexMap;

use crate::error::AvengerSvgError;
use crate::markup::{close_tag, escape_attr, escape_text, style_text};

/// Stable handle of an element. Handles stay valid after the element is
/// detached, so a removed element can be inserted again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// DOM-like tree of elements with persistent node identity
pub trait RetainedSurface {
    /// Node the renderer attaches its `svg` element to
    fn container(&self) -> NodeId;
    fn create_element(&mut self, tag: &str) -> NodeId;
    fn tag(&self, node: NodeId) -> Option<&str>;
    fn parent(&self, node: NodeId) -> Option<NodeId>;
    fn child(&self, node: NodeId, index: usize) -> Option<NodeId>;
    fn child_count(&self, node: NodeId) -> usize;
    fn previous_sibling(&self, node: NodeId) -> Option<NodeId>;
    fn next_sibling(&self, node: NodeId) -> Option<NodeId>;

    /// Move `child` into `parent` just before `before`, or to the end when
    /// `before` is `None`
    fn insert_before(&mut self, parent: NodeId, child: NodeId, before: Option<NodeId>);

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(parent, child, None);
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId);

    /// Set an attribute, removing it when `value` is `None`
    fn set_attribute(&mut self, node: NodeId, name: &str, value: Option<&str>);

    /// Set an inline style property, removing it when `value` is `None`
    fn set_style(&mut self, node: NodeId, name: &str, value: Option<&str>);

    fn set_text(&mut self, node: NodeId, text: &str);

    /// Whether `node` is connected to the container
    fn is_attached(&self, node: NodeId) -> bool;

    /// Serialized markup of `node` and its subtree
    fn markup(&self, node: NodeId) -> String;
}

/// Child `index` of `el`, replaced by a new `tag` element when missing or of
/// another tag
pub fn dom_child<D: RetainedSurface + ?Sized>(doc: &mut D, el: NodeId, index: usize, tag: &str) -> NodeId {
    let existing = doc.child(el, index);
    if let Some(node) = existing {
        if doc.tag(node).is_some_and(|t| t.eq_ignore_ascii_case(tag)) {
            return node;
        }
    }
    let node = doc.create_element(tag);
    doc.insert_before(el, node, existing);
    node
}

/// Remove every child of `el` from `index` on
pub fn dom_clear<D: RetainedSurface + ?Sized>(doc: &mut D, el: NodeId, index: usize) {
    while let Some(child) = doc.child(el, index) {
        doc.remove_child(el, child);
    }
}

/// Number of tree edits applied to an [`SvgDocument`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationCounts {
    /// Insertions, moves and removals
    pub structural: usize,
    /// Attribute, style and text changes
    pub attributes: usize,
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: IndexMap<String, String>,
    styles: IndexMap<String, String>,
    text: Option<String>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            parent: None,
            children: Vec::new(),
            attributes: IndexMap::new(),
            styles: IndexMap::new(),
            text: None,
        }
    }
}

/// In-memory [`RetainedSurface`]. Writes that leave a value unchanged are
/// not counted as mutations.
#[derive(Debug, Clone)]
pub struct SvgDocument {
    nodes: Vec<Element>,
    mutations: MutationCounts,
}

impl Default for SvgDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgDocument {
    pub fn new() -> Self {
        Self {
            nodes: vec![Element::new("#document")],
            mutations: MutationCounts::default(),
        }
    }

    pub fn mutations(&self) -> MutationCounts {
        self.mutations
    }

    pub fn reset_mutations(&mut self) {
        self.mutations = MutationCounts::default();
    }

    fn element(&self, node: NodeId) -> Result<&Element, AvengerSvgError> {
        self.nodes.get(node.0).ok_or(AvengerSvgError::UnknownNode(node))
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Result<Option<&str>, AvengerSvgError> {
        Ok(self.element(node)?.attributes.get(name).map(String::as_str))
    }

    pub fn style(&self, node: NodeId, name: &str) -> Result<Option<&str>, AvengerSvgError> {
        Ok(self.element(node)?.styles.get(name).map(String::as_str))
    }

    pub fn text(&self, node: NodeId) -> Result<Option<&str>, AvengerSvgError> {
        Ok(self.element(node)?.text.as_deref())
    }

    pub fn children(&self, node: NodeId) -> Result<&[NodeId], AvengerSvgError> {
        Ok(&self.element(node)?.children)
    }

    /// Attached elements with `tag`, in document order
    pub fn find_all(&self, tag: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect(self.container(), tag, &mut out);
        out
    }

    fn collect(&self, node: NodeId, tag: &str, out: &mut Vec<NodeId>) {
        let Some(el) = self.nodes.get(node.0) else {
            return;
        };
        if el.tag == tag {
            out.push(node);
        }
        for child in &el.children {
            self.collect(*child, tag, out);
        }
    }

    fn detach(&mut self, child: NodeId) {
        let Some(parent) = self.nodes.get(child.0).and_then(|el| el.parent) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.retain(|c| *c != child);
        }
        if let Some(el) = self.nodes.get_mut(child.0) {
            el.parent = None;
        }
    }

    fn write_markup(&self, node: NodeId, out: &mut String) {
        let Some(el) = self.nodes.get(node.0) else {
            return;
        };
        out.push('<');
        out.push_str(&el.tag);
        for (name, value) in &el.attributes {
            out.push_str(&format!(" {name}=\"{}\"", escape_attr(value)));
        }
        if !el.styles.is_empty() {
            let style = style_text(el.styles.iter().map(|(k, v)| (k.as_str(), v.as_str())));
            out.push_str(&format!(" style=\"{}\"", escape_attr(&style)));
        }
        out.push('>');
        if let Some(text) = &el.text {
            out.push_str(&escape_text(text));
        }
        for child in &el.children {
            self.write_markup(*child, out);
        }
        out.push_str(&close_tag(&el.tag));
    }
}

impl RetainedSurface for SvgDocument {
    fn container(&self) -> NodeId {
        NodeId(0)
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.push(Element::new(tag));
        NodeId(self.nodes.len() - 1)
    }

    fn tag(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.0).map(|el| el.tag.as_str())
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0)?.parent
    }

    fn child(&self, node: NodeId, index: usize) -> Option<NodeId> {
        self.nodes.get(node.0)?.children.get(index).copied()
    }

    fn child_count(&self, node: NodeId) -> usize {
        self.nodes.get(node.0).map_or(0, |el| el.children.len())
    }

    fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        let siblings = &self.nodes.get(self.parent(node)?.0)?.children;
        let i = siblings.iter().position(|c| *c == node)?;
        i.checked_sub(1).map(|i| siblings[i])
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let siblings = &self.nodes.get(self.parent(node)?.0)?.children;
        let i = siblings.iter().position(|c| *c == node)?;
        siblings.get(i + 1).copied()
    }

    fn insert_before(&mut self, parent: NodeId, child: NodeId, before: Option<NodeId>) {
        if before == Some(child) || parent.0 >= self.nodes.len() || child.0 >= self.nodes.len() {
            return;
        }
        if self.parent(child) == Some(parent) && self.next_sibling(child) == before {
            return;
        }
        self.detach(child);
        let children = &mut self.nodes[parent.0].children;
        let index = before
            .and_then(|b| children.iter().position(|c| *c == b))
            .unwrap_or(children.len());
        children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
        self.mutations.structural += 1;
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if self.parent(child) == Some(parent) {
            self.detach(child);
            self.mutations.structural += 1;
        }
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: Option<&str>) {
        let Some(el) = self.nodes.get_mut(node.0) else {
            return;
        };
        let changed = match value {
            Some(value) => el.attributes.insert(name.to_string(), value.to_string()).as_deref() != Some(value),
            None => el.attributes.shift_remove(name).is_some(),
        };
        if changed {
            self.mutations.attributes += 1;
        }
    }

    fn set_style(&mut self, node: NodeId, name: &str, value: Option<&str>) {
        let Some(el) = self.nodes.get_mut(node.0) else {
            return;
        };
        let changed = match value {
            Some(value) => el.styles.insert(name.to_string(), value.to_string()).as_deref() != Some(value),
            None => el.styles.shift_remove(name).is_some(),
        };
        if changed {
            self.mutations.attributes += 1;
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        let Some(el) = self.nodes.get_mut(node.0) else {
            return;
        };
        if el.text.as_deref() != Some(text) {
            el.text = Some(text.to_string());
            self.mutations.attributes += 1;
        }
    }

    fn is_attached(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == self.container() {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    fn markup(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(node, &mut out);
        out
    }
}
