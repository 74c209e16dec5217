//! Pointer event state machine for immediate-mode surfaces, where event
//! targets are found by picking the scene.

use avenger_image::ResourceLoader;
use avenger_scenegraph::{ItemId, Scene};

use crate::error::AvengerEventStreamError;
use crate::event::{PointerEvent, SceneEvent};
use crate::handler::{HandlerBase, HandlerDelegate, HandlerId};

/// Event types a canvas host forwards to [`CanvasHandler::handle`]
pub const CANVAS_EVENTS: [&str; 18] = [
    "keydown",
    "keypress",
    "keyup",
    "dragenter",
    "dragleave",
    "dragover",
    "mousedown",
    "mouseup",
    "mousemove",
    "mouseout",
    "mouseover",
    "click",
    "dblclick",
    "wheel",
    "mousewheel",
    "touchstart",
    "touchmove",
    "touchend",
];

/// Tracks the item under the pointer and turns raw moves into
/// `over`/`move`/`out` sequences
pub struct CanvasHandler {
    base: HandlerBase,
    active: Option<ItemId>,
    down: Option<ItemId>,
    touch: Option<ItemId>,
    first: bool,
}

impl Default for CanvasHandler {
    fn default() -> Self {
        Self::new(ResourceLoader::new())
    }
}

impl CanvasHandler {
    pub fn new(loader: ResourceLoader) -> Self {
        Self {
            base: HandlerBase::new(loader),
            active: None,
            down: None,
            touch: None,
            first: true,
        }
    }

    /// Set the scene origin within the surface
    pub fn initialize(&mut self, origin: [f64; 2]) -> &mut Self {
        self.base.set_origin(origin);
        self
    }

    pub fn origin(&self) -> [f64; 2] {
        self.base.origin()
    }

    pub fn set_delegate(&mut self, delegate: Box<dyn HandlerDelegate>) {
        self.base.set_delegate(delegate);
    }

    pub fn on<F>(&mut self, event_type: &str, handler: F) -> HandlerId
    where
        F: Fn(&SceneEvent) + 'static,
    {
        self.base.on(event_type, handler)
    }

    pub fn off(&mut self, event_type: &str, id: Option<HandlerId>) {
        self.base.off(event_type, id);
    }

    pub fn handlers(&self, event_type: &str) -> Vec<HandlerId> {
        self.base.handlers(event_type)
    }

    pub fn all_handlers(&self) -> Vec<HandlerId> {
        self.base.all_handlers()
    }

    /// Item under the pointer, if any
    pub fn active(&self) -> Option<ItemId> {
        self.active
    }

    /// Item picked by the current touch, if any
    pub fn touch(&self) -> Option<ItemId> {
        self.touch
    }

    /// Route a host event to its state transition, or fire it directly
    pub fn handle(
        &mut self,
        scene: &Scene,
        event_type: &str,
        event: &PointerEvent,
    ) -> Result<(), AvengerEventStreamError> {
        match event_type {
            "mousemove" => self.mouse_move(scene, event),
            "dragover" => self.drag_over(scene, event),
            "mouseout" => self.mouse_out(scene, event),
            "dragleave" => self.drag_leave(scene, event),
            "mousedown" => self.mouse_down(scene, event),
            "click" => self.click(scene, event),
            "touchstart" => return self.touch_start(scene, event),
            "touchmove" => self.touch_move(scene, event),
            "touchend" => self.touch_end(scene, event),
            "DOMMouseScroll" => self.fire(scene, "mousewheel", event, false),
            _ => self.fire(scene, event_type, event, false),
        }
        Ok(())
    }

    pub fn mouse_move(&mut self, scene: &Scene, event: &PointerEvent) {
        self.moved(scene, event, "mousemove", "mouseover", "mouseout");
    }

    pub fn drag_over(&mut self, scene: &Scene, event: &PointerEvent) {
        self.moved(scene, event, "dragover", "dragenter", "dragleave");
    }

    pub fn mouse_out(&mut self, scene: &Scene, event: &PointerEvent) {
        self.fire(scene, "mouseout", event, false);
        self.active = None;
    }

    pub fn drag_leave(&mut self, scene: &Scene, event: &PointerEvent) {
        self.fire(scene, "dragleave", event, false);
        self.active = None;
    }

    pub fn mouse_down(&mut self, scene: &Scene, event: &PointerEvent) {
        self.down = self.active;
        self.fire(scene, "mousedown", event, false);
    }

    /// Fire `click` only when the pointer is over the item it went down on
    pub fn click(&mut self, scene: &Scene, event: &PointerEvent) {
        if self.down == self.active {
            self.fire(scene, "click", event, false);
            self.down = None;
        }
    }

    pub fn touch_start(
        &mut self,
        scene: &Scene,
        event: &PointerEvent,
    ) -> Result<(), AvengerEventStreamError> {
        let [x, y] = event
            .touches
            .first()
            .copied()
            .ok_or_else(|| AvengerEventStreamError::MissingTouch("touchstart".to_string()))?;
        self.touch = self.pick(scene, x, y);

        if self.first {
            self.active = self.touch;
            self.first = false;
        }
        self.fire(scene, "touchstart", event, true);
        Ok(())
    }

    pub fn touch_move(&mut self, scene: &Scene, event: &PointerEvent) {
        self.fire(scene, "touchmove", event, true);
    }

    pub fn touch_end(&mut self, scene: &Scene, event: &PointerEvent) {
        self.fire(scene, "touchend", event, true);
        self.touch = None;
    }

    /// Run link and tooltip effects, then the handlers for `event_type`,
    /// with the active item (the touched item when `touch` is set)
    pub fn fire(&self, scene: &Scene, event_type: &str, event: &PointerEvent, touch: bool) {
        let item = if touch { self.touch } else { self.active };
        tracing::trace!("fire {event_type} on {item:?}");
        self.base.handle_item_effects(scene, event_type, event, item);
        self.base.invoke(event_type, event, item);
    }

    fn moved(&mut self, scene: &Scene, event: &PointerEvent, on_move: &str, over: &str, out: &str) {
        let [x, y] = event.position;
        let picked = self.pick(scene, x, y);
        if picked != self.active {
            // An active item removed from the scene gets no out event
            let removed = self
                .active
                .is_some_and(|id| scene.try_item(id).map_or(true, |it| it.exit));
            if !removed {
                self.fire(scene, out, event, false);
            }
            self.active = picked;
            self.fire(scene, over, event, false);
        }
        self.fire(scene, on_move, event, false);
    }

    /// Item under a surface position
    fn pick(&self, scene: &Scene, x: f64, y: f64) -> Option<ItemId> {
        let [ox, oy] = self.base.origin();
        scene.pick_point(x - ox, y - oy)
    }
}
