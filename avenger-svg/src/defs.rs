//! Gradient and clip path definitions referenced by rendered elements.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use avenger_common::format::fmt_num;
use avenger_common::types::Gradient;
use avenger_scenegraph::{ItemId, MarkId};
use indexmap::IndexMap;

use crate::markup::{close_tag, open_tag};

static CLIP_ID: AtomicUsize = AtomicUsize::new(1);

/// Restart clip path ids at `clip1`
pub fn reset_svg_clip_ids() {
    CLIP_ID.store(1, Ordering::SeqCst);
}

fn next_clip_id() -> String {
    format!("clip{}", CLIP_ID.fetch_add(1, Ordering::SeqCst))
}

/// Element clipped to a rectangle: a clipping mark or a clipping group item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipOwner {
    Mark(MarkId),
    Item(ItemId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRect {
    pub width: f64,
    pub height: f64,
}

/// Definitions collected while rendering, keyed by id in insertion order
#[derive(Debug, Clone, Default)]
pub struct Defs {
    pub gradients: IndexMap<String, Gradient>,
    pub clipping: IndexMap<String, ClipRect>,
    clip_ids: HashMap<ClipOwner, String>,
}

impl Defs {
    /// Drop the collected definitions. Clip ids stay assigned to their owners.
    pub fn reset(&mut self) {
        self.gradients.clear();
        self.clipping.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.gradients.is_empty() && self.clipping.is_empty()
    }

    /// Record `gradient` and return its `url(#id)` reference
    pub fn gradient_url(&mut self, gradient: &Gradient) -> String {
        self.gradients.insert(gradient.id.clone(), gradient.clone());
        format!("url(#{})", gradient.id)
    }

    /// Record a clip rectangle for `owner` and return its `url(#clipN)`
    /// reference. Owners keep their id across renders.
    pub fn clip_url(&mut self, owner: ClipOwner, width: f64, height: f64) -> String {
        let id = self
            .clip_ids
            .entry(owner)
            .or_insert_with(next_clip_id)
            .clone();
        self.clipping.insert(id.clone(), ClipRect { width, height });
        format!("url(#{id})")
    }

    /// Release the clip id of an owner that left the document
    pub fn forget(&mut self, owner: ClipOwner) {
        self.clip_ids.remove(&owner);
    }

    /// Keep only the definitions whose id is in `referenced`
    pub fn retain_referenced(&mut self, referenced: &HashSet<String>) {
        self.gradients.retain(|id, _| referenced.contains(id));
        self.clipping.retain(|id, _| referenced.contains(id));
    }

    /// `<defs>` block, empty when there is nothing to define
    pub fn markup(&self) -> String {
        let mut defs = String::new();
        for (id, gradient) in &self.gradients {
            defs += &open_tag("linearGradient", gradient_attributes(id, gradient), None);
            for stop in &gradient.stops {
                defs += &open_tag(
                    "stop",
                    [
                        ("offset", Some(fmt_num(stop.offset))),
                        ("stop-color", Some(stop.color.clone())),
                    ],
                    None,
                );
                defs += &close_tag("stop");
            }
            defs += &close_tag("linearGradient");
        }
        for (id, clip) in &self.clipping {
            defs += &open_tag("clipPath", [("id", Some(id.clone()))], None);
            defs += &open_tag("rect", clip_rect_attributes(clip), None);
            defs += &close_tag("rect");
            defs += &close_tag("clipPath");
        }
        if defs.is_empty() {
            defs
        } else {
            format!("<defs>{defs}</defs>")
        }
    }
}

pub(crate) fn gradient_attributes(id: &str, gradient: &Gradient) -> [(&'static str, Option<String>); 5] {
    [
        ("id", Some(id.to_string())),
        ("x1", Some(fmt_num(gradient.x1))),
        ("x2", Some(fmt_num(gradient.x2))),
        ("y1", Some(fmt_num(gradient.y1))),
        ("y2", Some(fmt_num(gradient.y2))),
    ]
}

pub(crate) fn clip_rect_attributes(clip: &ClipRect) -> [(&'static str, Option<String>); 4] {
    [
        ("x", Some("0".to_string())),
        ("y", Some("0".to_string())),
        ("width", Some(fmt_num(clip.width))),
        ("height", Some(fmt_num(clip.height))),
    ]
}

/// Id referenced by a `url(#id)` value
pub(crate) fn url_ref(value: &str) -> Option<&str> {
    value.strip_prefix("url(#")?.strip_suffix(')')
}
