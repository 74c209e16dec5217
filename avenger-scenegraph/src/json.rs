//! Scene (de)serialization restricted to the item field whitelist, and a
//! tolerant structural comparison of serialized scenes.

use avenger_geometry::path::{parse_path_uncached, PathSegment};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AvengerSceneGraphError;
use crate::marks::MarkType;
use crate::props::ItemProps;
use crate::scene::{ItemId, MarkDef, MarkId, Scene};

/// Numbers closer than this compare equal in [`scene_equal`]
pub const TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkJson {
    pub marktype: MarkType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default = "default_interactive")]
    pub interactive: bool,
    #[serde(default)]
    pub clip: bool,
    #[serde(default)]
    pub items: Vec<ItemJson>,
    #[serde(default)]
    pub zindex: i32,
}

fn default_interactive() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemJson {
    #[serde(flatten)]
    pub props: ItemProps,
    /// Child marks, present on group items only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<MarkJson>>,
}

impl MarkJson {
    fn def(&self) -> MarkDef {
        MarkDef {
            marktype: self.marktype,
            name: self.name.clone(),
            role: self.role.clone(),
            clip: self.clip,
            interactive: self.interactive,
            zindex: self.zindex,
        }
    }
}

impl Scene {
    fn mark_json(&self, id: MarkId) -> MarkJson {
        let mark = self.mark(id);
        MarkJson {
            marktype: mark.marktype,
            name: mark.name.clone(),
            role: mark.role.clone(),
            interactive: mark.interactive,
            clip: mark.clip,
            items: mark.items.iter().map(|item| self.item_json(*item)).collect(),
            zindex: mark.zindex,
        }
    }

    fn item_json(&self, id: ItemId) -> ItemJson {
        let item = self.item(id);
        let is_group = self.mark(item.mark).marktype == MarkType::Group;
        ItemJson {
            props: item.props.clone(),
            items: is_group.then(|| item.items.iter().map(|m| self.mark_json(*m)).collect()),
        }
    }

    /// Serializable tree rooted at the root mark
    pub fn to_mark_json(&self) -> MarkJson {
        self.mark_json(self.root())
    }

    pub fn to_json_value(&self) -> Result<Value, AvengerSceneGraphError> {
        Ok(serde_json::to_value(self.to_mark_json())?)
    }

    /// Serialize the scene, pretty printed when `pretty`
    pub fn to_json(&self, pretty: bool) -> Result<String, AvengerSceneGraphError> {
        let json = self.to_mark_json();
        Ok(if pretty {
            serde_json::to_string_pretty(&json)?
        } else {
            serde_json::to_string(&json)?
        })
    }

    /// Build a scene from a serialized tree and compute all bounds
    pub fn from_mark_json(json: MarkJson) -> Result<Self, AvengerSceneGraphError> {
        let mut scene = Scene::empty_root(json.def());
        let is_group = json.marktype == MarkType::Group;
        for item in json.items {
            let id = scene.add_root_item(item.props);
            if is_group {
                scene.hydrate_children(id, item.items.unwrap_or_default())?;
            }
        }
        scene.bound_all();
        Ok(scene)
    }

    fn hydrate_children(&mut self, group: ItemId, marks: Vec<MarkJson>) -> Result<(), AvengerSceneGraphError> {
        for mark in marks {
            let id = self.add_mark(group, mark.def())?;
            let is_group = mark.marktype == MarkType::Group;
            for item in mark.items {
                let item_id = self.add_item(id, item.props)?;
                if is_group {
                    self.hydrate_children(item_id, item.items.unwrap_or_default())?;
                }
            }
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, AvengerSceneGraphError> {
        Self::from_mark_json(serde_json::from_str(json)?)
    }

    pub fn from_json_value(json: Value) -> Result<Self, AvengerSceneGraphError> {
        Self::from_mark_json(serde_json::from_value(json)?)
    }

    /// Whether two scenes serialize to equal trees under [`scene_equal`]
    pub fn equivalent(&self, other: &Scene) -> Result<bool, AvengerSceneGraphError> {
        Ok(scene_equal(&self.to_json_value()?, &other.to_json_value()?))
    }
}

/// Structural equality of serialized scenes. Numbers match within
/// [`TOLERANCE`], `path` strings match when their parsed segments do, and
/// objects must have the same key sets.
pub fn scene_equal(a: &Value, b: &Value) -> bool {
    value_equal(a, b, None)
}

fn value_equal(a: &Value, b: &Value, key: Option<&str>) -> bool {
    if a == b {
        return true;
    }
    match (a, b) {
        (Value::String(a), Value::String(b)) if key == Some("path") => path_equal(a, b),
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => (a - b).abs() <= TOLERANCE,
            _ => false,
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| value_equal(a, b, None))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter().all(|(k, va)| {
                    b.get(k)
                        .map(|vb| value_equal(va, vb, Some(k.as_str())))
                        .unwrap_or(false)
                })
        }
        _ => false,
    }
}

/// Compare two path strings by their parsed segments
pub fn path_equal(a: &str, b: &str) -> bool {
    let a = parse_path_uncached(a);
    let b = parse_path_uncached(b);
    a.len() == b.len() && a.iter().zip(&b).all(|(a, b)| segment_equal(a, b))
}

fn segment_equal(a: &PathSegment, b: &PathSegment) -> bool {
    a.command == b.command
        && a.args.len() == b.args.len()
        && a.args
            .iter()
            .zip(&b.args)
            .all(|(a, b)| (a - b).abs() <= TOLERANCE)
}
