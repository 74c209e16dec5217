//! Event handling for retained SVG output. The host delivers events already
//! targeted at document nodes, so no picking or pointer state is needed.

use avenger_image::ResourceLoader;
use avenger_scenegraph::{ItemId, Scene};
use avenger_svg::{NodeId, RetainedSurface, SvgRenderer};

use crate::event::{PointerEvent, SceneEvent};
use crate::handler::{event_name, HandlerBase, HandlerDelegate, HandlerId};

pub struct SvgHandler {
    base: HandlerBase,
}

impl Default for SvgHandler {
    fn default() -> Self {
        Self::new(ResourceLoader::new())
    }
}

impl SvgHandler {
    pub fn new(loader: ResourceLoader) -> Self {
        Self {
            base: HandlerBase::new(loader),
        }
    }

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

    /// Scene item rendered by `target`
    pub fn target_item<D: RetainedSurface>(
        &self,
        renderer: &SvgRenderer<D>,
        target: NodeId,
    ) -> Option<ItemId> {
        renderer.item_for_node(target)
    }

    /// Dispatch an event the host delivered to `target`. Returns the item
    /// the event was resolved to.
    pub fn handle<D: RetainedSurface>(
        &self,
        renderer: &SvgRenderer<D>,
        scene: &Scene,
        event_type: &str,
        target: NodeId,
        event: &PointerEvent,
    ) -> Option<ItemId> {
        let event_type = event_name(event_type);
        let item = self.target_item(renderer, target);
        self.base.handle_item_effects(scene, event_type, event, item);
        self.base.invoke(event_type, event, item);
        item
    }
}
