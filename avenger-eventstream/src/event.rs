use avenger_scenegraph::ItemId;
use serde::{Deserialize, Serialize};

/// Mouse button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifiersState {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Raw input event, positioned relative to the rendering surface
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub position: [f64; 2],
    pub button: Option<MouseButton>,
    pub modifiers: ModifiersState,
    /// Touch points that changed, for touch events
    pub touches: Vec<[f64; 2]>,
}

impl PointerEvent {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            position: [x, y],
            ..Default::default()
        }
    }

    pub fn touch(x: f64, y: f64) -> Self {
        Self {
            position: [x, y],
            touches: vec![[x, y]],
            ..Default::default()
        }
    }
}

/// Event delivered to registered handlers
#[derive(Debug, Clone, PartialEq)]
pub struct SceneEvent<'a> {
    /// Type the event was fired as, e.g. `mouseover` for a pointer move
    /// that entered a new item
    pub event_type: &'a str,
    pub event: &'a PointerEvent,
    /// Item the event applies to
    pub item: Option<ItemId>,
}
