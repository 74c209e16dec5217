use avenger_geometry::Bounds;

use crate::scene::{MarkId, Scene};
use crate::surface::DrawingSurface;

/// Draw one mark. A clipping mark is clipped to the width and height of its
/// group. `clip` restricts drawing to items whose bounds intersect it, given in the
/// coordinates of the mark's group.
pub fn draw_mark<S: DrawingSurface>(surface: &mut S, scene: &Scene, mark: MarkId, clip: Option<&Bounds>) {
    let m = scene.mark(mark);
    let clip_group = m
        .group
        .filter(|_| m.clip)
        .map(|g| &scene.item(g).props);
    if let Some(group) = clip_group {
        surface.save();
        surface.begin_path();
        surface.rect(0.0, 0.0, group.width(), group.height());
        surface.clip();
    }
    m.marktype.draw(surface, scene, mark, clip);
    if clip_group.is_some() {
        surface.restore();
    }
}

impl Scene {
    /// Draw the whole scene starting at the root mark
    pub fn draw<S: DrawingSurface>(&self, surface: &mut S, clip: Option<&Bounds>) {
        draw_mark(surface, self, self.root(), clip);
    }
}
