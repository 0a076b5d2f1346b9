//! # ISOVOX Procedural Generation
//!
//! Terrain for an isometric voxel-tile world, streamed in cubic chunks
//! around a moving observer.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: the same seed always produces the same height map
//! 2. **Chunked**: tiles are created and destroyed a whole chunk at a time
//! 3. **Lazy geometry**: only chunks flagged dirty are rebuilt
//!
//! ## Core Components
//!
//! - [`noise`]: white noise, smooth noise and octave blending
//! - [`HeightMap`]: integer column heights derived from the noise field
//! - [`ChunkManager`]: spawns and despawns chunks, owns the tile index
//! - [`geometry`]: triangle lists with diagonal-occlusion culling
//!
//! ## Example
//!
//! ```rust
//! use isovox_core::{ComponentPool, EntityDirectory, Grid3D};
//! use isovox_procedural::{ChunkManager, HeightMap, WorldConfig, WorldSeed};
//!
//! let config = WorldConfig { load_radius: 0, ..WorldConfig::default() };
//! let mut pool = ComponentPool::new(config.pool_capacity());
//! let mut directory = EntityDirectory::new();
//! let height_map = HeightMap::generate(32, 32, 4, 40, WorldSeed::new(7));
//!
//! let mut chunks = ChunkManager::new(config);
//! let report = chunks
//!     .update(Grid3D::new(3, 3, 20), &mut pool, &mut directory, &height_map)
//!     .unwrap();
//! directory.commit(&pool);
//! chunks.rebuild_dirty(&mut pool);
//!
//! assert_eq!(report.spawned, 1);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod chunk;
pub mod config;
pub mod geometry;
pub mod height_map;
pub mod isometric;
pub mod noise;
pub mod streaming;

pub use chunk::HeightBand;
pub use config::{BandTextures, ConfigError, ConfigResult, WorldConfig};
pub use geometry::build_geometry;
pub use height_map::HeightMap;
pub use isometric::{grid_to_isometric, isometric_to_grid, pick_cell};
pub use noise::{perlin_noise, smooth_noise, white_noise, NoiseGrid, WorldSeed};
pub use streaming::{ChunkManager, StreamingReport};
