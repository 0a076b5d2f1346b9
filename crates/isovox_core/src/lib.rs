//! # ISOVOX Core
//!
//! Fixed-capacity entity storage for an isometric voxel-tile world:
//! - Every component kind lives in its own dense column, one cell per slot
//! - Slots are recycled through a free-slot stack, never reallocated
//! - Handles carry a generation so a recycled slot is never silently aliased
//!
//! ## Architecture Rules
//!
//! 1. **Size the pool up front** - running out of slots is a hard error
//! 2. **Pass the pool explicitly** - there is no process-wide instance
//! 3. **Commit once per step** - the directory is the single source of truth
//!    for which handles systems iterate over
//!
//! ## Example
//!
//! ```rust
//! use isovox_core::{ComponentPool, EntityDirectory, GridPosition, Grid3D};
//!
//! let mut pool = ComponentPool::new(16);
//! let mut directory = EntityDirectory::new();
//!
//! let tile = directory.add_entity(&mut pool, "tile", "sand").unwrap();
//! tile.add(&mut pool, GridPosition::new(Grid3D::new(1, 2, 3))).unwrap();
//! directory.commit(&pool);
//!
//! assert_eq!(directory.by_tag("tile"), &[tile]);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod ecs;
pub mod error;
pub mod grid;
pub mod math;

pub use ecs::{
    Animation, BoundingBox, ChunkData, CommitReport, Component, ComponentColumns, ComponentKind,
    ComponentPool, ComponentStorage, Damage, Entity, EntityDirectory, EntityState, GridPosition, Health, Input,
    Sprite, TextureRect, Transform, Vertex, TAG_CHUNK, TAG_PLAYER, TAG_TILE,
};
pub use error::{PoolError, PoolResult};
pub use grid::Grid3D;
pub use math::Vec2;
