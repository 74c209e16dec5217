pub mod config;
pub mod defs;
pub mod document;
pub mod error;
pub mod markup;
pub mod renderer;
pub mod string;
pub mod style;

pub use config::SvgConfig;
pub use defs::reset_svg_clip_ids;
pub use document::{MutationCounts, NodeId, RetainedSurface, SvgDocument};
pub use error::AvengerSvgError;
pub use renderer::{RenderStats, SvgRenderer};
pub use string::SvgStringRenderer;
