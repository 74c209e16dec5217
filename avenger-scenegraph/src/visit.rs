//! Z-ordered traversal of a mark's items and of a group item's child marks.
//!
//! Entries with a zero z-index are visited first in their original order,
//! followed by the nonzero entries sorted by `(zindex, index)`. Picking walks
//! the same order back to front.

use crate::scene::{ItemId, MarkId, Scene, ZOrderCache};

fn visit_ordered<I, Z, V>(ids: &[I], cache: &ZOrderCache, zindex: Z, mut visitor: V)
where
    I: Copy,
    Z: Fn(usize) -> i32,
    V: FnMut(I),
{
    let sorted = cache.sorted(ids.len(), &zindex);
    if sorted.is_empty() {
        ids.iter().for_each(|id| visitor(*id));
        return;
    }
    for (i, id) in ids.iter().enumerate() {
        if zindex(i) == 0 {
            visitor(*id);
        }
    }
    for i in sorted.iter() {
        visitor(ids[*i]);
    }
}

fn pick_visit_ordered<I, Z, V, T>(ids: &[I], cache: &ZOrderCache, zindex: Z, mut visitor: V) -> Option<T>
where
    I: Copy,
    Z: Fn(usize) -> i32,
    V: FnMut(I) -> Option<T>,
{
    let sorted = cache.sorted(ids.len(), &zindex);
    if sorted.is_empty() {
        return ids.iter().rev().find_map(|id| visitor(*id));
    }
    if let Some(hit) = sorted.iter().rev().find_map(|i| visitor(ids[*i])) {
        return Some(hit);
    }
    ids.iter()
        .enumerate()
        .rev()
        .filter(|(i, _)| zindex(*i) == 0)
        .find_map(|(_, id)| visitor(*id))
}

impl Scene {
    fn item_zindex(&self, id: ItemId) -> i32 {
        self.try_item(id).and_then(|item| item.props.zindex).unwrap_or(0)
    }

    fn mark_zindex(&self, id: MarkId) -> i32 {
        self.try_mark(id).map(|mark| mark.zindex).unwrap_or(0)
    }

    /// Visit the items of a mark in drawing order
    pub fn visit_items<V: FnMut(ItemId)>(&self, mark: MarkId, visitor: V) {
        let mark = self.mark(mark);
        let items = &mark.items;
        visit_ordered(items, &mark.zorder, |i| self.item_zindex(items[i]), visitor);
    }

    /// Visit the items of a mark front to back, stopping at the first hit
    pub fn pick_visit_items<T, V: FnMut(ItemId) -> Option<T>>(&self, mark: MarkId, visitor: V) -> Option<T> {
        let mark = self.mark(mark);
        let items = &mark.items;
        pick_visit_ordered(items, &mark.zorder, |i| self.item_zindex(items[i]), visitor)
    }

    /// Visit the child marks of a group item in drawing order
    pub fn visit_marks<V: FnMut(MarkId)>(&self, group: ItemId, visitor: V) {
        let group = self.item(group);
        let marks = &group.items;
        visit_ordered(marks, &group.zorder, |i| self.mark_zindex(marks[i]), visitor);
    }

    /// Visit the child marks of a group item front to back, stopping at the
    /// first hit
    pub fn pick_visit_marks<T, V: FnMut(MarkId) -> Option<T>>(&self, group: ItemId, visitor: V) -> Option<T> {
        let group = self.item(group);
        let marks = &group.items;
        pick_visit_ordered(marks, &group.zorder, |i| self.mark_zindex(marks[i]), visitor)
    }

    /// Drawing order of a mark's items
    pub fn item_order(&self, mark: MarkId) -> Vec<ItemId> {
        let mut order = Vec::new();
        self.visit_items(mark, |id| order.push(id));
        order
    }
}

#[cfg(test)]
mod tests {
    use crate::marks::MarkType;
    use crate::props::ItemProps;
    use crate::scene::{MarkDef, Scene, ZOrder};

    fn scene_with_zindices(z: &[i32]) -> (Scene, crate::scene::MarkId, Vec<crate::scene::ItemId>) {
        let mut scene = Scene::new();
        let root = scene.root_group().unwrap();
        let mark = scene.add_mark(root, MarkDef::new(MarkType::Symbol)).unwrap();
        let items = scene
            .set_items(
                mark,
                z.iter()
                    .map(|z| ItemProps {
                        zindex: Some(*z),
                        ..Default::default()
                    })
                    .collect(),
            )
            .unwrap();
        (scene, mark, items)
    }

    #[test]
    fn test_visit_zero_items_first_then_sorted() {
        let (scene, mark, items) = scene_with_zindices(&[0, 2, 0, 1]);
        let order = scene.item_order(mark);
        assert_eq!(order, vec![items[0], items[2], items[3], items[1]]);
        assert!(matches!(scene.mark(mark).zorder(), ZOrder::Clean(_)));
    }

    #[test]
    fn test_pick_visit_walks_back_to_front() {
        let (scene, mark, items) = scene_with_zindices(&[0, 2, 0, 1]);
        let mut seen = Vec::new();
        let hit: Option<()> = scene.pick_visit_items(mark, |id| {
            seen.push(id);
            None
        });
        assert!(hit.is_none());
        assert_eq!(seen, vec![items[1], items[3], items[2], items[0]]);
    }

    #[test]
    fn test_pick_visit_without_zindex_is_reverse_order() {
        let (scene, mark, items) = scene_with_zindices(&[0, 0, 0]);
        let first = scene.pick_visit_items(mark, Some);
        assert_eq!(first, Some(items[2]));
    }

    #[test]
    fn test_resort_after_zindex_change() {
        let (mut scene, mark, items) = scene_with_zindices(&[0, 2, 0, 1]);
        let _ = scene.item_order(mark);
        scene.set_item_zindex(items[1], 0).unwrap();
        assert_eq!(scene.mark(mark).zorder(), ZOrder::Dirty);
        assert_eq!(scene.item_order(mark), vec![items[0], items[1], items[2], items[3]]);
    }

    #[test]
    fn test_child_marks_use_mark_zindex() {
        let mut scene = Scene::new();
        let root = scene.root_group().unwrap();
        let a = scene
            .add_mark(root, MarkDef::new(MarkType::Rect).with_zindex(1))
            .unwrap();
        let b = scene.add_mark(root, MarkDef::new(MarkType::Rect)).unwrap();
        let mut order = Vec::new();
        scene.visit_marks(root, |m| order.push(m));
        assert_eq!(order, vec![b, a]);
    }
}
