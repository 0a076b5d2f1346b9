//! # Component Pool
//!
//! The central container for every entity slot and component column.
//! Pre-allocates all memory at creation time.
//!
//! ```text
//! slot:        0      1      2      3   ...
//! active:    [ T ] [ F ] [ T ] [ F ]
//! generation:[ 0 ] [ 2 ] [ 0 ] [ 1 ]
//! tag/name:  [...] [...] [...] [...]
//! Transform: [P|d] [-|d] [P|d] [-|d]     P = present flag set
//! ...one column per ComponentKind...
//! free stack: [3, 1]  (top = next slot handed out)
//! ```
//!
//! A slot is either on the free stack (inactive) or active, never both.

use tracing::warn;

use super::component::{Component, ComponentKind};
use super::entity::Entity;
use super::storage::ComponentColumns;
use crate::error::{PoolError, PoolResult};

/// Fixed-capacity columnar storage for every entity in the world.
///
/// # Capacity
///
/// The pool has a fixed capacity set at creation. Exhausting it is an
/// error, not a trigger to grow.
///
/// # Example
///
/// ```rust
/// use isovox_core::{ComponentPool, Transform, Vec2};
///
/// let mut pool = ComponentPool::new(8);
/// let player = pool.add_entity("player", "hero").unwrap();
/// pool.add(player, Transform::at(Vec2::new(4.0, 2.0))).unwrap();
///
/// assert!(pool.has::<Transform>(player));
/// assert!(pool.destroy(player));
/// assert!(!pool.is_active(player));
/// ```
pub struct ComponentPool {
    /// Liveness per slot.
    active: Box<[bool]>,
    /// Generation per slot, bumped on destroy.
    generations: Box<[u32]>,
    /// Category tag per slot.
    tags: Box<[String]>,
    /// Debug name per slot.
    names: Box<[String]>,
    /// Free slot stack.
    free: Vec<u32>,
    /// Component columns.
    columns: ComponentColumns,
    /// Number of active slots.
    active_count: usize,
}

impl ComponentPool {
    /// Creates a pool with `capacity` slots, all free.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero or exceeds `u32::MAX`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");
        assert!(
            capacity <= u32::MAX as usize,
            "Capacity cannot exceed u32::MAX"
        );

        Self {
            active: vec![false; capacity].into_boxed_slice(),
            generations: vec![0; capacity].into_boxed_slice(),
            tags: vec![String::new(); capacity].into_boxed_slice(),
            names: vec![String::new(); capacity].into_boxed_slice(),
            // Reversed so slot 0 is handed out first
            free: (0..capacity as u32).rev().collect(),
            columns: ComponentColumns::new(capacity),
            active_count: 0,
        }
    }

    /// Returns the maximum capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.active.len()
    }

    /// Returns the number of active slots.
    #[inline]
    #[must_use]
    pub const fn active_count(&self) -> usize {
        self.active_count
    }

    /// Returns the number of free slots.
    #[inline]
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Allocates a slot, tags it and returns its handle.
    ///
    /// All component flags of the slot are cleared; the tag and name strings
    /// reuse the slot's previous buffers.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Exhausted`] when no slot is free.
    pub fn add_entity(&mut self, tag: &str, name: &str) -> PoolResult<Entity> {
        let Some(index) = self.free.pop() else {
            warn!(capacity = self.capacity(), tag, name, "component pool exhausted");
            return Err(PoolError::Exhausted {
                capacity: self.capacity(),
            });
        };

        let idx = index as usize;
        self.columns.clear_slot(idx);

        self.tags[idx].clear();
        self.tags[idx].push_str(tag);
        self.names[idx].clear();
        self.names[idx].push_str(name);

        self.active[idx] = true;
        self.active_count += 1;

        Ok(Entity::new(index, self.generations[idx]))
    }

    /// Frees the entity's slot for reuse.
    ///
    /// Entities referenced from this one's components (a chunk's tiles, for
    /// instance) are left alone; the caller owns that cascade.
    ///
    /// # Returns
    ///
    /// `true` if the entity was destroyed, `false` if it was already dead
    /// or the handle was stale.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        if !self.is_active(entity) {
            return false;
        }

        let idx = entity.index() as usize;
        self.active[idx] = false;
        // Invalidate every outstanding handle to this slot
        self.generations[idx] = self.generations[idx].wrapping_add(1);
        self.active_count -= 1;
        self.free.push(entity.index());

        true
    }

    /// Checks whether the handle names a live entity.
    #[inline]
    #[must_use]
    pub fn is_active(&self, entity: Entity) -> bool {
        if entity.is_null() {
            return false;
        }

        let idx = entity.index() as usize;
        self.active.get(idx).copied().unwrap_or(false)
            && self.generations[idx] == entity.generation()
    }

    /// Returns the live handle currently occupying slot `index`.
    #[must_use]
    pub fn entity_at(&self, index: u32) -> Option<Entity> {
        let idx = index as usize;
        if self.active.get(idx).copied().unwrap_or(false) {
            Some(Entity::new(index, self.generations[idx]))
        } else {
            None
        }
    }

    /// Category tag of a live entity.
    #[must_use]
    pub fn tag(&self, entity: Entity) -> Option<&str> {
        self.is_active(entity)
            .then(|| self.tags[entity.index() as usize].as_str())
    }

    /// Debug name of a live entity.
    #[must_use]
    pub fn name(&self, entity: Entity) -> Option<&str> {
        self.is_active(entity)
            .then(|| self.names[entity.index() as usize].as_str())
    }

    /// Whether a live entity has component `C`.
    #[inline]
    #[must_use]
    pub fn has<C: Component>(&self, entity: Entity) -> bool {
        self.has_kind(entity, C::KIND)
    }

    /// Whether a live entity has a component of `kind`.
    #[must_use]
    pub fn has_kind(&self, entity: Entity, kind: ComponentKind) -> bool {
        self.is_active(entity) && self.columns.is_present(kind, entity.index() as usize)
    }

    /// Reads component `C` of a live entity.
    #[inline]
    #[must_use]
    pub fn get<C: Component>(&self, entity: Entity) -> Option<&C> {
        if !self.is_active(entity) {
            return None;
        }
        C::column(&self.columns).get(entity.index() as usize)
    }

    /// Mutates component `C` of a live entity.
    #[inline]
    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        if !self.is_active(entity) {
            return None;
        }
        C::column_mut(&mut self.columns).get_mut(entity.index() as usize)
    }

    /// Writes `component` into the entity's cell and marks it present.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::StaleEntity`] if the handle is not live.
    pub fn add<C: Component>(&mut self, entity: Entity, component: C) -> PoolResult<&mut C> {
        let stale = PoolError::StaleEntity {
            index: entity.index(),
            generation: entity.generation(),
        };
        if !self.is_active(entity) {
            return Err(stale);
        }
        C::column_mut(&mut self.columns)
            .insert(entity.index() as usize, component)
            .ok_or(stale)
    }

    /// Clears the present flag of `C`. The data is left as-is.
    pub fn remove<C: Component>(&mut self, entity: Entity) -> bool {
        if !self.is_active(entity) {
            return false;
        }
        C::column_mut(&mut self.columns).remove(entity.index() as usize)
    }

    /// Slots currently on the free stack, top first.
    pub fn free_slots(&self) -> impl Iterator<Item = u32> + '_ {
        self.free.iter().rev().copied()
    }

    /// Handles of every live entity, in slot order.
    pub fn iter_active(&self) -> impl Iterator<Item = Entity> + '_ {
        (0..self.active.len()).filter_map(|idx| {
            self.active[idx].then(|| Entity::new(idx as u32, self.generations[idx]))
        })
    }
}
