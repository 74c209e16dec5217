//! Bottom-up recomputation of the cached item and mark bounds.

use avenger_geometry::Bounds;

use crate::scene::{ItemId, MarkId, Scene};

impl Scene {
    /// Recompute and cache the bounds of one item from its fields. Group
    /// items use the cached bounds of their child marks.
    pub fn bound_item(&mut self, id: ItemId) -> Bounds {
        let marktype = self.mark(self.item_mark(id)).marktype;
        let bounds = marktype.bound_item(self, id);
        if let Ok(item) = self.item_mut(id) {
            item.bounds = bounds;
        }
        bounds
    }

    /// Recompute and cache the bounds of a mark and its items. Child marks
    /// of group items must already be bounded.
    pub fn bound_mark(&mut self, id: MarkId) -> Bounds {
        let marktype = self.mark(id).marktype;
        let items = self.mark(id).items.clone();
        let bounds = if marktype.nested() {
            let bounds = marktype.bound_nested(self, id);
            for item in &items {
                if let Ok(item) = self.item_mut(*item) {
                    item.bounds = bounds;
                }
            }
            bounds
        } else {
            let mut bounds = Bounds::new();
            for item in &items {
                bounds.union(&self.bound_item(*item));
            }
            bounds
        };
        if let Ok(mark) = self.mark_mut(id) {
            mark.bounds = bounds;
        }
        bounds
    }

    /// Recompute every cached bounds in the scene, children before parents
    pub fn bound_all(&mut self) -> Bounds {
        self.bound_recursive(self.root())
    }

    fn bound_recursive(&mut self, mark: MarkId) -> Bounds {
        let children: Vec<MarkId> = self
            .mark(mark)
            .items
            .iter()
            .flat_map(|item| self.item(*item).items.clone())
            .collect();
        for child in children {
            self.bound_recursive(child);
        }
        self.bound_mark(mark)
    }

    /// Recompute the bounds of an item's mark and of every enclosing group,
    /// after the item's fields changed
    pub fn rebound(&mut self, id: ItemId) {
        let mut mark = Some(self.item_mark(id));
        while let Some(m) = mark {
            self.bound_mark(m);
            mark = self.mark_group(m).map(|g| self.item_mark(g));
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::marks::MarkType;
    use crate::props::ItemProps;
    use crate::scene::{MarkDef, Scene};
    use avenger_geometry::Bounds;

    #[test]
    fn test_bound_all_is_bottom_up() {
        let mut scene = Scene::new();
        let root = scene.root_group().unwrap();
        let groups = scene.add_mark(root, MarkDef::new(MarkType::Group)).unwrap();
        let group = scene
            .add_item(
                groups,
                ItemProps {
                    x: Some(100.0),
                    y: Some(50.0),
                    ..Default::default()
                },
            )
            .unwrap();
        let rects = scene.add_mark(group, MarkDef::new(MarkType::Rect)).unwrap();
        let rect = scene
            .add_item(
                rects,
                ItemProps {
                    x: Some(1.0),
                    y: Some(2.0),
                    width: Some(3.0),
                    height: Some(4.0),
                    ..Default::default()
                },
            )
            .unwrap();

        let bounds = scene.bound_all();
        assert_eq!(scene.item(rect).bounds, Bounds::from_coords(1.0, 2.0, 4.0, 6.0));
        assert_eq!(scene.item(group).bounds, Bounds::from_coords(101.0, 52.0, 104.0, 56.0));
        assert_eq!(bounds, Bounds::from_coords(101.0, 52.0, 104.0, 56.0));
    }

    #[test]
    fn test_nested_items_share_mark_bounds() {
        let mut scene = Scene::new();
        let root = scene.root_group().unwrap();
        let mark = scene.add_mark(root, MarkDef::new(MarkType::Line)).unwrap();
        let items = scene
            .set_items(
                mark,
                vec![
                    ItemProps {
                        x: Some(0.0),
                        y: Some(0.0),
                        ..Default::default()
                    },
                    ItemProps {
                        x: Some(10.0),
                        y: Some(20.0),
                        ..Default::default()
                    },
                ],
            )
            .unwrap();
        scene.bound_all();
        let expected = Bounds::from_coords(0.0, 0.0, 10.0, 20.0);
        assert_eq!(scene.mark(mark).bounds, expected);
        assert!(items.iter().all(|id| scene.item(*id).bounds == expected));
    }

    #[test]
    fn test_rebound_propagates_to_ancestors() {
        let mut scene = Scene::new();
        let root = scene.root_group().unwrap();
        let mark = scene.add_mark(root, MarkDef::new(MarkType::Symbol)).unwrap();
        let item = scene.add_item(mark, ItemProps::default()).unwrap();
        scene.bound_all();
        scene.props_mut(item).unwrap().x = Some(100.0);
        scene.rebound(item);
        assert!(scene.item(root).bounds.contains(100.0, 0.0));
    }
}
