//! # Entity Handles
//!
//! Entities are lightweight identifiers consisting of:
//! - An index into the pool's component columns
//! - A generation counter for safe reuse
//!
//! A handle never owns anything. Every operation forwards to the
//! [`ComponentPool`] passed in, which alone decides when a slot is free.

use super::component::Component;
use super::pool::ComponentPool;
use crate::error::PoolResult;

/// Handle to a pool slot.
///
/// The ID is split into two parts:
/// - Lower 32 bits: Slot index
/// - Upper 32 bits: Generation of the slot when the handle was issued
///
/// Two handles are equal when they name the same slot in the same
/// generation. Once the slot is destroyed the handle goes stale and every
/// forwarding call reports it as inactive.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Entity(u64);

impl Entity {
    /// Null/invalid entity.
    pub const NULL: Self = Self(u64::MAX);

    /// Creates a handle from index and generation.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Returns the slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Returns the generation.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Checks if this handle is null.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }

    /// Whether the slot is still assigned to this entity.
    #[inline]
    #[must_use]
    pub fn is_active(self, pool: &ComponentPool) -> bool {
        pool.is_active(self)
    }

    /// Returns the slot to the pool. Does not touch referenced entities.
    #[inline]
    pub fn destroy(self, pool: &mut ComponentPool) -> bool {
        pool.destroy(self)
    }

    /// Category tag, `None` when stale.
    #[inline]
    #[must_use]
    pub fn tag(self, pool: &ComponentPool) -> Option<&str> {
        pool.tag(self)
    }

    /// Debug name, `None` when stale.
    #[inline]
    #[must_use]
    pub fn name(self, pool: &ComponentPool) -> Option<&str> {
        pool.name(self)
    }

    /// Whether the entity has component `C`.
    #[inline]
    #[must_use]
    pub fn has<C: Component>(self, pool: &ComponentPool) -> bool {
        pool.has::<C>(self)
    }

    /// Reads component `C`.
    #[inline]
    #[must_use]
    pub fn get<C: Component>(self, pool: &ComponentPool) -> Option<&C> {
        pool.get::<C>(self)
    }

    /// Mutates component `C`.
    #[inline]
    pub fn get_mut<C: Component>(self, pool: &mut ComponentPool) -> Option<&mut C> {
        pool.get_mut::<C>(self)
    }

    /// Attaches `component`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::StaleEntity`](crate::PoolError::StaleEntity) if
    /// the handle no longer names a live entity.
    #[inline]
    pub fn add<C: Component>(self, pool: &mut ComponentPool, component: C) -> PoolResult<&mut C> {
        pool.add(self, component)
    }

    /// Detaches component `C`. Returns whether it was present.
    #[inline]
    pub fn remove<C: Component>(self, pool: &mut ComponentPool) -> bool {
        pool.remove::<C>(self)
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::NULL
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_null() {
            write!(f, "Entity(null)")
        } else {
            write!(f, "Entity({}v{})", self.index(), self.generation())
        }
    }
}
