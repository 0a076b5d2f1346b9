//! # Chunk Streaming
//!
//! Keeps the cube of chunks within `load_radius` of the observer loaded.
//!
//! ## Per-step flow
//!
//! ```text
//! observer tile ──► observer chunk ──► desired cube
//!                                        │
//!            loaded chunks outside ◄─────┤
//!            the cube: despawn           │
//!                                        ▼
//!                         missing chunks: spawn (dirty)
//! ```
//!
//! A chunk is either absent or loaded. Spawning and despawning both
//! complete inside a single call, so no half-built chunk is ever visible.
//! Geometry is rebuilt separately by [`ChunkManager::rebuild_dirty`], and
//! only for chunks whose dirty flag is set.

use std::collections::HashMap;

use isovox_core::{
    ChunkData, ComponentPool, Entity, EntityDirectory, EntityState, Grid3D, GridPosition,
    PoolResult, Sprite, Transform, TAG_CHUNK, TAG_TILE,
};
use tracing::{debug, info, trace};

use crate::chunk::{chunk_address, chunk_origin, chunks_within, column_span, HeightBand};
use crate::config::WorldConfig;
use crate::geometry::build_geometry;
use crate::height_map::HeightMap;
use crate::isometric::grid_to_isometric;

/// What one [`ChunkManager::update`] changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamingReport {
    /// Chunks spawned.
    pub spawned: usize,
    /// Chunks despawned.
    pub despawned: usize,
    /// Tiles created by the spawned chunks.
    pub tiles_spawned: usize,
    /// Tiles destroyed with the despawned chunks.
    pub tiles_despawned: usize,
}

impl StreamingReport {
    /// True when the loaded set did not change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.spawned == 0 && self.despawned == 0
    }
}

/// Owner of the chunk index and the world tile index.
///
/// The manager never stores component data itself; chunk and tile state
/// lives in the [`ComponentPool`] passed to every call.
#[derive(Debug)]
pub struct ChunkManager {
    config: WorldConfig,
    /// Loaded chunks by chunk address.
    chunks: HashMap<Grid3D, Entity>,
    /// Tiles of every loaded chunk by tile address.
    tiles: HashMap<Grid3D, Entity>,
    /// Chunk the observer stood in at the last update.
    observer_chunk: Option<Grid3D>,
}

impl ChunkManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new(config: WorldConfig) -> Self {
        Self {
            config,
            chunks: HashMap::new(),
            tiles: HashMap::new(),
            observer_chunk: None,
        }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Chunk address containing tile `tile`.
    #[must_use]
    pub const fn chunk_address(&self, tile: Grid3D) -> Grid3D {
        chunk_address(tile, self.config.chunk_extent())
    }

    /// Chunk the observer was in at the last update.
    #[must_use]
    pub const fn observer_chunk(&self) -> Option<Grid3D> {
        self.observer_chunk
    }

    /// Whether the chunk at `address` is loaded.
    #[must_use]
    pub fn is_loaded(&self, address: Grid3D) -> bool {
        self.chunks.contains_key(&address)
    }

    /// Chunk entity at `address`.
    #[must_use]
    pub fn chunk(&self, address: Grid3D) -> Option<Entity> {
        self.chunks.get(&address).copied()
    }

    /// Tile entity at `grid`, in any loaded chunk.
    #[must_use]
    pub fn tile_at(&self, grid: Grid3D) -> Option<Entity> {
        self.tiles.get(&grid).copied()
    }

    /// Loaded chunk addresses with their entities, in no particular order.
    pub fn loaded_chunks(&self) -> impl Iterator<Item = (Grid3D, Entity)> + '_ {
        self.chunks.iter().map(|(&address, &entity)| (address, entity))
    }

    /// Number of loaded chunks.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of tiles across every loaded chunk.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Streams chunks around the observer standing on tile `observer`.
    ///
    /// Out-of-range chunks are despawned before missing ones are spawned so
    /// that the pool never holds more than one full cube of chunks.
    ///
    /// # Errors
    ///
    /// Propagates [`PoolError::Exhausted`](isovox_core::PoolError) from a
    /// spawn. Chunks spawned earlier in the same call stay loaded; the
    /// failing chunk leaves nothing behind.
    pub fn update(
        &mut self,
        observer: Grid3D,
        pool: &mut ComponentPool,
        directory: &mut EntityDirectory,
        height_map: &HeightMap,
    ) -> PoolResult<StreamingReport> {
        let center = self.chunk_address(observer);
        let radius = self.config.load_radius;
        self.observer_chunk = Some(center);

        let mut report = StreamingReport::default();

        let mut stale: Vec<Grid3D> = self
            .chunks
            .keys()
            .copied()
            .filter(|address| address.chebyshev(center) > radius)
            .collect();
        stale.sort_unstable();
        for address in stale {
            if let Some(tiles) = self.despawn_chunk(address, pool) {
                report.despawned += 1;
                report.tiles_despawned += tiles;
            }
        }

        for address in chunks_within(center, radius) {
            if self.chunks.contains_key(&address) {
                continue;
            }
            let tiles = self.spawn_chunk(address, pool, directory, height_map)?;
            report.spawned += 1;
            report.tiles_spawned += tiles;
        }

        if !report.is_empty() {
            info!(
                center_x = center.x,
                center_y = center.y,
                center_z = center.z,
                spawned = report.spawned,
                despawned = report.despawned,
                loaded = self.chunks.len(),
                tiles = self.tiles.len(),
                "chunk streaming"
            );
        }
        Ok(report)
    }

    /// Spawns the chunk at `address` and all of its tiles. Returns the tile
    /// count.
    ///
    /// The chunk is marked dirty. Tiles are ordered by `(z, y, x)` so the
    /// built geometry draws bottom layers first.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Exhausted`](isovox_core::PoolError) if the pool
    /// runs out; every handle created for this chunk is destroyed again.
    pub fn spawn_chunk(
        &mut self,
        address: Grid3D,
        pool: &mut ComponentPool,
        directory: &mut EntityDirectory,
        height_map: &HeightMap,
    ) -> PoolResult<usize> {
        let mut created: Vec<(Grid3D, Entity)> = Vec::new();
        match self.populate_chunk(address, pool, directory, height_map, &mut created) {
            Ok(chunk) => {
                created.sort_unstable_by_key(|&(grid, _)| grid);
                let tiles: Vec<Entity> = created.iter().map(|&(_, tile)| tile).collect();
                let count = tiles.len();

                pool.add(
                    chunk,
                    ChunkData {
                        tiles,
                        dirty: true,
                        geometry: Vec::new(),
                    },
                )?;
                self.tiles.extend(created);
                self.chunks.insert(address, chunk);
                self.mark_lower_neighbours_dirty(address, pool);

                debug!(x = address.x, y = address.y, z = address.z, tiles = count, "chunk spawned");
                Ok(count)
            }
            Err(err) => {
                for (_, tile) in created {
                    pool.destroy(tile);
                }
                Err(err)
            }
        }
    }

    fn populate_chunk(
        &self,
        address: Grid3D,
        pool: &mut ComponentPool,
        directory: &mut EntityDirectory,
        height_map: &HeightMap,
        created: &mut Vec<(Grid3D, Entity)>,
    ) -> PoolResult<Entity> {
        let chunk = directory.add_entity(pool, TAG_CHUNK, "chunk")?;
        match self.fill_chunk(chunk, address, pool, directory, height_map, created) {
            Ok(()) => Ok(chunk),
            Err(err) => {
                pool.destroy(chunk);
                Err(err)
            }
        }
    }

    fn fill_chunk(
        &self,
        chunk: Entity,
        address: Grid3D,
        pool: &mut ComponentPool,
        directory: &mut EntityDirectory,
        height_map: &HeightMap,
        created: &mut Vec<(Grid3D, Entity)>,
    ) -> PoolResult<()> {
        let size = self.config.chunk_extent();
        let origin = chunk_origin(address, size);

        pool.add(chunk, GridPosition::new(address))?;
        pool.add(chunk, Transform::at(grid_to_isometric(origin, self.config.cell())))?;

        for x in origin.x..origin.x + size.x {
            for y in origin.y..origin.y + size.y {
                let column_height = height_map.height_at(x, y);
                let span = column_span(origin.z, size.z, self.config.water_level, column_height);
                for z in span {
                    let grid = Grid3D::new(x, y, z);
                    let tile = self.spawn_tile(grid, pool, directory)?;
                    created.push((grid, tile));
                }
            }
        }
        Ok(())
    }

    fn spawn_tile(
        &self,
        grid: Grid3D,
        pool: &mut ComponentPool,
        directory: &mut EntityDirectory,
    ) -> PoolResult<Entity> {
        let config = &self.config;
        let band = HeightBand::classify(
            grid.z,
            config.water_level,
            config.grass_level,
            config.snow_level,
        );

        let tile = directory.add_entity(pool, TAG_TILE, band.name())?;
        pool.add(tile, GridPosition::new(grid))?;
        pool.add(tile, Transform::at(grid_to_isometric(grid, config.cell())))?;
        pool.add(
            tile,
            Sprite::new(config.tile_texture.as_str(), config.textures.rect(band)),
        )?;
        pool.add(tile, EntityState::Unselected)?;
        Ok(tile)
    }

    /// Destroys every tile of the chunk at `address`, then the chunk itself.
    ///
    /// Returns the number of tiles destroyed, or `None` if the chunk was not
    /// loaded. The directory drops the handles at its next commit.
    pub fn despawn_chunk(&mut self, address: Grid3D, pool: &mut ComponentPool) -> Option<usize> {
        let chunk = self.chunks.remove(&address)?;

        let tiles = pool
            .get_mut::<ChunkData>(chunk)
            .map(|data| std::mem::take(&mut data.tiles))
            .unwrap_or_default();

        for &tile in &tiles {
            if let Some(grid) = pool.get::<GridPosition>(tile) {
                self.tiles.remove(&grid.grid);
            }
            pool.destroy(tile);
        }
        pool.destroy(chunk);
        self.mark_lower_neighbours_dirty(address, pool);

        debug!(x = address.x, y = address.y, z = address.z, tiles = tiles.len(), "chunk despawned");
        Some(tiles.len())
    }

    /// Destroys the single tile at `grid` and marks its chunk dirty, along
    /// with the chunk of the tile it was occluding.
    ///
    /// Returns whether a tile was there.
    pub fn remove_tile(&mut self, grid: Grid3D, pool: &mut ComponentPool) -> bool {
        let Some(tile) = self.tiles.remove(&grid) else {
            return false;
        };
        pool.destroy(tile);

        let address = self.chunk_address(grid);
        if let Some(data) = self
            .chunks
            .get(&address)
            .and_then(|&chunk| pool.get_mut::<ChunkData>(chunk))
        {
            data.tiles.retain(|&t| t != tile);
            data.dirty = true;
        }
        self.mark_dirty(grid - Grid3D::ONE, pool);
        true
    }

    /// Flags the chunk containing tile `grid` for a geometry rebuild.
    pub fn mark_dirty(&self, grid: Grid3D, pool: &mut ComponentPool) -> bool {
        self.mark_chunk_dirty(self.chunk_address(grid), pool)
    }

    /// Flags the chunks whose tiles can be occluded by tiles of the chunk at
    /// `address`: the seven at `address - {0,1}^3`, excluding itself.
    fn mark_lower_neighbours_dirty(&self, address: Grid3D, pool: &mut ComponentPool) {
        for dz in 0..=1 {
            for dy in 0..=1 {
                for dx in 0..=1 {
                    let offset = Grid3D::new(dx, dy, dz);
                    if offset != Grid3D::ZERO {
                        self.mark_chunk_dirty(address - offset, pool);
                    }
                }
            }
        }
    }

    fn mark_chunk_dirty(&self, address: Grid3D, pool: &mut ComponentPool) -> bool {
        match self
            .chunks
            .get(&address)
            .and_then(|&chunk| pool.get_mut::<ChunkData>(chunk))
        {
            Some(data) => {
                data.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Rebuilds geometry for every dirty chunk and clears the flags.
    ///
    /// Returns how many chunks were rebuilt. Clean chunks are not touched.
    pub fn rebuild_dirty(&self, pool: &mut ComponentPool) -> usize {
        let cell = self.config.cell();
        let mut rebuilt = 0;

        for (&address, &chunk) in &self.chunks {
            let tiles = match pool.get_mut::<ChunkData>(chunk) {
                Some(data) if data.dirty => std::mem::take(&mut data.tiles),
                _ => continue,
            };

            let geometry = build_geometry(&tiles, pool, cell, |g| self.tiles.contains_key(&g));

            if let Some(data) = pool.get_mut::<ChunkData>(chunk) {
                trace!(
                    x = address.x,
                    y = address.y,
                    z = address.z,
                    vertices = geometry.len(),
                    "chunk geometry rebuilt"
                );
                data.tiles = tiles;
                data.geometry = geometry;
                data.dirty = false;
                rebuilt += 1;
            }
        }
        rebuilt
    }
}
