use crate::scene::{ItemId, MarkId, Scene};

impl Scene {
    /// Topmost item of `mark` under `(x, y)`, given in the coordinates of
    /// the mark's group
    pub fn pick(&self, mark: MarkId, x: f64, y: f64) -> Option<ItemId> {
        self.mark(mark).marktype.pick(self, mark, x, y)
    }

    /// Topmost item of the whole scene under a point in root coordinates
    pub fn pick_point(&self, x: f64, y: f64) -> Option<ItemId> {
        self.pick(self.root(), x, y)
    }
}
