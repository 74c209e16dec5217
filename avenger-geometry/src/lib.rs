pub mod arc;
pub mod bounds;
pub mod curve;
pub mod hit;
pub mod line;
pub mod path;
pub mod sector;
pub mod shape;
pub mod sink;
pub mod symbol;

pub use bounds::Bounds;
pub use geo_types;
pub use lyon_path;
pub use sink::{BoundsSink, PathSink, PathStringBuilder};

/// Clear the process-wide path, arc segment, bezier and custom symbol caches
pub fn reset_caches() {
    path::clear_path_cache();
    arc::clear_arc_caches();
    symbol::clear_symbol_cache();
}
