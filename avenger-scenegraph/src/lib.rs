pub mod bound;
pub mod draw;
pub mod error;
pub mod json;
pub mod marks;
pub mod pick;
pub mod props;
pub mod renderer;
pub mod scene;
pub mod style;
pub mod surface;
pub mod visit;

pub use error::AvengerSceneGraphError;
pub use json::scene_equal;
pub use marks::MarkType;
pub use props::ItemProps;
pub use renderer::RendererBase;
pub use scene::{Item, ItemId, Mark, MarkDef, MarkId, PropsMut, Scene};
pub use surface::{DrawingSurface, SurfacePaint};
