//! # Entity Component Storage
//!
//! A fixed-capacity pool of entity slots with one dense column per
//! component kind.
//!
//! ## Design Philosophy
//!
//! - All storage is pre-allocated when the world is created
//! - Components live in dense arrays indexed by slot
//! - Handles are slot indices with generation counters
//! - The component set is closed; typed access never goes through a vtable

mod component;
mod directory;
mod entity;
mod pool;
mod storage;

pub use component::{
    Animation, BoundingBox, ChunkData, Component, ComponentKind, Damage, EntityState,
    GridPosition, Health, Input, Sprite, TextureRect, Transform, Vertex,
};
pub use directory::{CommitReport, EntityDirectory, TAG_CHUNK, TAG_PLAYER, TAG_TILE};
pub use entity::Entity;
pub use pool::ComponentPool;
pub use storage::{ComponentColumns, ComponentStorage};
