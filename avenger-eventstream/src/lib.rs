pub mod canvas;
pub mod error;
pub mod event;
pub mod handler;
pub mod svg;

pub use canvas::CanvasHandler;
pub use error::AvengerEventStreamError;
pub use event::{ModifiersState, MouseButton, PointerEvent, SceneEvent};
pub use handler::{HandlerDelegate, HandlerId, NoopDelegate};
pub use svg::SvgHandler;
