//! Handler registry and link/tooltip delegation shared by the canvas and
//! SVG event handlers.

use std::sync::Arc;

use avenger_image::{ResourceLoader, SanitizedUrl};
use avenger_scenegraph::{ItemId, Scene};
use indexmap::IndexMap;

use crate::event::{PointerEvent, SceneEvent};

/// Id returned by `on`, used to remove a single handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(usize);

pub type HandlerFn = Arc<dyn Fn(&SceneEvent)>;

/// Host side effects of pointer events on linked or annotated items
pub trait HandlerDelegate {
    /// Follow a sanitized hyperlink of a clicked item
    fn open_link(&self, _url: &SanitizedUrl, _event: &PointerEvent) {}

    /// Show `text` as the tooltip, or clear it when `None`
    fn set_tooltip(&self, _text: Option<&str>) {}
}

/// Delegate that ignores links and tooltips
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDelegate;

impl HandlerDelegate for NoopDelegate {}

#[derive(Clone)]
struct Registration {
    id: HandlerId,
    /// Type as registered, including any `.suffix`
    event_type: String,
    handler: HandlerFn,
}

/// Event type without its `.suffix`
pub fn event_name(event_type: &str) -> &str {
    match event_type.find('.') {
        Some(i) => &event_type[..i],
        None => event_type,
    }
}

pub struct HandlerBase {
    origin: [f64; 2],
    handlers: IndexMap<String, Vec<Registration>>,
    next_id: usize,
    loader: ResourceLoader,
    delegate: Box<dyn HandlerDelegate>,
}

impl Default for HandlerBase {
    fn default() -> Self {
        Self::new(ResourceLoader::new())
    }
}

impl HandlerBase {
    pub fn new(loader: ResourceLoader) -> Self {
        Self {
            origin: [0.0, 0.0],
            handlers: IndexMap::new(),
            next_id: 0,
            loader,
            delegate: Box::new(NoopDelegate),
        }
    }

    pub fn origin(&self) -> [f64; 2] {
        self.origin
    }

    pub fn set_origin(&mut self, origin: [f64; 2]) {
        self.origin = origin;
    }

    pub fn loader(&self) -> &ResourceLoader {
        &self.loader
    }

    pub fn set_delegate(&mut self, delegate: Box<dyn HandlerDelegate>) {
        self.delegate = delegate;
    }

    /// Register `handler` for `event_type`. Types of the form `type.suffix`
    /// are invoked for `type` events.
    pub fn on<F>(&mut self, event_type: &str, handler: F) -> HandlerId
    where
        F: Fn(&SceneEvent) + 'static,
    {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.handlers
            .entry(event_name(event_type).to_string())
            .or_default()
            .push(Registration {
                id,
                event_type: event_type.to_string(),
                handler: Arc::new(handler),
            });
        id
    }

    /// Remove the handlers registered with exactly `event_type`, or only the
    /// one with `id` when given
    pub fn off(&mut self, event_type: &str, id: Option<HandlerId>) {
        let Some(list) = self.handlers.get_mut(event_name(event_type)) else {
            return;
        };
        list.retain(|r| r.event_type != event_type || id.is_some_and(|id| r.id != id));
    }

    /// Handlers invoked for `event_type`, in registration order
    pub fn handlers(&self, event_type: &str) -> Vec<HandlerId> {
        self.handlers
            .get(event_name(event_type))
            .map(|list| list.iter().map(|r| r.id).collect())
            .unwrap_or_default()
    }

    /// Every registered handler
    pub fn all_handlers(&self) -> Vec<HandlerId> {
        self.handlers
            .values()
            .flat_map(|list| list.iter().map(|r| r.id))
            .collect()
    }

    /// Run the link and tooltip side effects of `event_type` on `item`
    pub fn handle_item_effects(
        &self,
        scene: &Scene,
        event_type: &str,
        event: &PointerEvent,
        item: Option<ItemId>,
    ) {
        let Some(props) = item.and_then(|id| scene.try_item(id)).map(|it| &it.props) else {
            return;
        };
        match event_type {
            "click" => {
                if let Some(href) = &props.href {
                    self.handle_href(href, event);
                }
            }
            "mouseover" | "mouseout" => {
                if let Some(tooltip) = &props.tooltip {
                    let text = (event_type == "mouseover").then_some(tooltip.as_str());
                    self.delegate.set_tooltip(text);
                }
            }
            _ => {}
        }
    }

    fn handle_href(&self, href: &str, event: &PointerEvent) {
        match self.loader.sanitize(href) {
            Ok(url) => self.delegate.open_link(&url, event),
            Err(err) => tracing::debug!("link not followed: {err}"),
        }
    }

    /// Invoke the handlers registered for `event_type` with `item`
    pub fn invoke(&self, event_type: &str, event: &PointerEvent, item: Option<ItemId>) {
        let Some(list) = self.handlers.get(event_type) else {
            return;
        };
        let scene_event = SceneEvent {
            event_type,
            event,
            item,
        };
        for registration in list {
            (registration.handler)(&scene_event);
        }
    }
}
