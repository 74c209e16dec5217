use avenger_geometry::shape::{trail, TrailPoint};
use avenger_geometry::{Bounds, PathSink};

use super::nested_path;
use super::AttributeSink;
use crate::props::ItemProps;
use crate::scene::{ItemId, MarkId, Scene};
use crate::surface::DrawingSurface;

/// Trail width at an item, 1 when `size` is unset
const DEFAULT_TRAIL_SIZE: f64 = 1.0;

pub fn shape(sink: &mut dyn PathSink, items: &[&ItemProps]) {
    let points: Vec<TrailPoint> = items
        .iter()
        .map(|p| TrailPoint {
            defined: p.is_defined(),
            ..TrailPoint::new(p.x(), p.y(), p.size.unwrap_or(DEFAULT_TRAIL_SIZE))
        })
        .collect();
    trail(sink, &points);
}

pub fn attr(emit: &mut dyn AttributeSink, scene: &Scene, mark: MarkId) {
    nested_path::attr(emit, scene, mark, shape);
}

pub fn draw<S: DrawingSurface>(surface: &mut S, scene: &Scene, mark: MarkId, clip: Option<&Bounds>) {
    nested_path::draw(surface, scene, mark, clip, shape);
}

pub fn pick(scene: &Scene, mark: MarkId, gx: f64, gy: f64) -> Option<ItemId> {
    nested_path::pick(scene, mark, gx, gy, shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use avenger_geometry::BoundsSink;
    use float_cmp::assert_approx_eq;

    #[test]
    fn test_trail_bounds_follow_width() {
        let items = [
            ItemProps {
                x: Some(0.0),
                y: Some(0.0),
                size: Some(4.0),
                ..Default::default()
            },
            ItemProps {
                x: Some(10.0),
                y: Some(0.0),
                size: Some(4.0),
                ..Default::default()
            },
        ];
        let refs: Vec<&ItemProps> = items.iter().collect();
        let mut bounds = Bounds::new();
        shape(&mut BoundsSink::new(&mut bounds), &refs);
        assert_approx_eq!(f64, bounds.y1, -2.0, epsilon = 1e-6);
        assert_approx_eq!(f64, bounds.y2, 2.0, epsilon = 1e-6);
        assert!(bounds.x1 <= 0.0 && bounds.x2 >= 10.0);
    }
}
