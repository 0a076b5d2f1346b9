//! # Component Storage
//!
//! Pre-allocated, dense component storage.
//!
//! The storage uses a dense array strategy:
//! - All component slots are pre-allocated at creation
//! - Each cell carries a "present" flag next to its data
//! - Access is O(1) via slot index

use super::component::{
    Animation, BoundingBox, ChunkData, Component, ComponentKind, Damage, EntityState,
    GridPosition, Health, Input, Sprite, Transform,
};

/// Pre-allocated storage for a single component type.
///
/// Removing a component only clears its flag; the data stays in place until
/// the next insert overwrites it.
pub struct ComponentStorage<C: Component> {
    /// The dense array of components.
    data: Box<[C]>,
    /// Whether the cell at the same index holds a live component.
    present: Box<[bool]>,
}

impl<C: Component> ComponentStorage<C> {
    /// Creates new component storage with the specified capacity.
    ///
    /// All slots are initialized to the component's default value.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");

        let data = (0..capacity).map(|_| C::default()).collect();
        let present = vec![false; capacity].into_boxed_slice();

        Self { data, present }
    }

    /// Returns the capacity of this storage.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Whether slot `index` holds a component.
    #[inline]
    #[must_use]
    pub fn is_present(&self, index: usize) -> bool {
        self.present.get(index).copied().unwrap_or(false)
    }

    /// Gets a component by slot index, if present.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&C> {
        if self.is_present(index) {
            self.data.get(index)
        } else {
            None
        }
    }

    /// Gets a mutable component by slot index, if present.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut C> {
        if self.is_present(index) {
            self.data.get_mut(index)
        } else {
            None
        }
    }

    /// Writes `component` into slot `index` and marks it present.
    ///
    /// Returns `None` if index was out of bounds.
    #[inline]
    pub fn insert(&mut self, index: usize, component: C) -> Option<&mut C> {
        let slot = self.data.get_mut(index)?;
        *slot = component;
        self.present[index] = true;
        Some(slot)
    }

    /// Clears the present flag. Returns whether a component was present.
    #[inline]
    pub fn remove(&mut self, index: usize) -> bool {
        match self.present.get_mut(index) {
            Some(flag) => std::mem::replace(flag, false),
            None => false,
        }
    }

    /// Iterates over present components with their slot indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &C)> {
        self.data
            .iter()
            .zip(self.present.iter())
            .enumerate()
            .filter_map(|(index, (c, &present))| present.then_some((index, c)))
    }
}

/// One column per component kind, all sharing the pool's slot indexing.
pub struct ComponentColumns {
    pub(crate) transforms: ComponentStorage<Transform>,
    pub(crate) grid_positions: ComponentStorage<GridPosition>,
    pub(crate) inputs: ComponentStorage<Input>,
    pub(crate) bounding_boxes: ComponentStorage<BoundingBox>,
    pub(crate) sprites: ComponentStorage<Sprite>,
    pub(crate) animations: ComponentStorage<Animation>,
    pub(crate) states: ComponentStorage<EntityState>,
    pub(crate) healths: ComponentStorage<Health>,
    pub(crate) damages: ComponentStorage<Damage>,
    pub(crate) chunks: ComponentStorage<ChunkData>,
}

impl ComponentColumns {
    /// Allocates every column at `capacity`.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            transforms: ComponentStorage::new(capacity),
            grid_positions: ComponentStorage::new(capacity),
            inputs: ComponentStorage::new(capacity),
            bounding_boxes: ComponentStorage::new(capacity),
            sprites: ComponentStorage::new(capacity),
            animations: ComponentStorage::new(capacity),
            states: ComponentStorage::new(capacity),
            healths: ComponentStorage::new(capacity),
            damages: ComponentStorage::new(capacity),
            chunks: ComponentStorage::new(capacity),
        }
    }

    /// Whether slot `index` holds a component of `kind`.
    #[must_use]
    pub fn is_present(&self, kind: ComponentKind, index: usize) -> bool {
        match kind {
            ComponentKind::Transform => self.transforms.is_present(index),
            ComponentKind::GridPosition => self.grid_positions.is_present(index),
            ComponentKind::Input => self.inputs.is_present(index),
            ComponentKind::BoundingBox => self.bounding_boxes.is_present(index),
            ComponentKind::Sprite => self.sprites.is_present(index),
            ComponentKind::Animation => self.animations.is_present(index),
            ComponentKind::State => self.states.is_present(index),
            ComponentKind::Health => self.healths.is_present(index),
            ComponentKind::Damage => self.damages.is_present(index),
            ComponentKind::ChunkData => self.chunks.is_present(index),
        }
    }

    /// Clears every present flag of slot `index`.
    pub fn clear_slot(&mut self, index: usize) {
        self.transforms.remove(index);
        self.grid_positions.remove(index);
        self.inputs.remove(index);
        self.bounding_boxes.remove(index);
        self.sprites.remove(index);
        self.animations.remove(index);
        self.states.remove(index);
        self.healths.remove(index);
        self.damages.remove(index);
        self.chunks.remove(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;

    #[test]
    fn test_storage_creation() {
        let storage: ComponentStorage<Transform> = ComponentStorage::new(1000);
        assert_eq!(storage.capacity(), 1000);
        assert!(!storage.is_present(0));
    }

    #[test]
    fn test_storage_insert_get() {
        let mut storage: ComponentStorage<Transform> = ComponentStorage::new(100);

        let t = Transform::at(Vec2::new(1.0, 2.0));
        assert!(storage.get(50).is_none());
        assert!(storage.insert(50, t).is_some());
        assert_eq!(storage.get(50), Some(&t));
    }

    #[test]
    fn test_remove_keeps_data_but_hides_it() {
        let mut storage: ComponentStorage<Health> = ComponentStorage::new(4);
        storage.insert(1, Health::new(7));

        assert!(storage.remove(1));
        assert!(!storage.remove(1));
        assert!(storage.get(1).is_none());
        assert_eq!(storage.data[1], Health::new(7));
    }

    #[test]
    fn test_storage_bounds() {
        let mut storage: ComponentStorage<Damage> = ComponentStorage::new(100);
        assert!(storage.insert(100, Damage::default()).is_none());
        assert!(storage.get(100).is_none());
        assert!(!storage.remove(100));
    }

    #[test]
    fn test_columns_clear_slot() {
        let mut columns = ComponentColumns::new(8);
        columns.transforms.insert(3, Transform::default());
        columns.chunks.insert(3, ChunkData::default());

        assert!(columns.is_present(ComponentKind::Transform, 3));
        assert!(columns.is_present(ComponentKind::ChunkData, 3));

        columns.clear_slot(3);
        for kind in ComponentKind::ALL {
            assert!(!columns.is_present(kind, 3));
        }
    }
}
