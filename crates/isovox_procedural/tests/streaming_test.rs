//! # Chunk Streaming Integration Tests
//!
//! Drives the manager the way a play step does: update, commit, rebuild.

use isovox_core::{ChunkData, ComponentPool, EntityDirectory, Grid3D, GridPosition, TAG_CHUNK, TAG_TILE};
use isovox_procedural::geometry::VERTICES_PER_TILE;
use isovox_procedural::{build_geometry, ChunkManager, HeightMap, WorldConfig, WorldSeed};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn config(chunk_size: [i32; 3], load_radius: i32, water_level: i32) -> WorldConfig {
    WorldConfig {
        chunk_size,
        load_radius,
        water_level,
        grass_level: water_level + 4,
        snow_level: water_level + 12,
        reserved_slots: 0,
        ..WorldConfig::default()
    }
}

struct World {
    pool: ComponentPool,
    directory: EntityDirectory,
    chunks: ChunkManager,
    height_map: HeightMap,
}

impl World {
    fn new(config: WorldConfig, height_map: HeightMap) -> Self {
        Self {
            pool: ComponentPool::new(config.pool_capacity()),
            directory: EntityDirectory::new(),
            chunks: ChunkManager::new(config),
            height_map,
        }
    }

    fn step(&mut self, observer: Grid3D) -> isovox_procedural::StreamingReport {
        let report = self
            .chunks
            .update(observer, &mut self.pool, &mut self.directory, &self.height_map)
            .unwrap();
        self.directory.commit(&self.pool);
        self.chunks.rebuild_dirty(&mut self.pool);
        report
    }
}

#[test]
fn test_radius_zero_spawns_one_chunk_of_eight_columns() {
    let mut world = World::new(config([2, 2, 2], 0, 0), HeightMap::flat(8, 8, 5));
    let report = world.step(Grid3D::new(1, 0, 1));

    assert_eq!(report.spawned, 1);
    assert_eq!(world.chunks.chunk_count(), 1);
    // 2x2 columns, 2 deep: all 8 candidates are solid
    assert_eq!(report.tiles_spawned, 8);
    assert_eq!(world.directory.tagged(TAG_CHUNK).len(), 1);
    assert_eq!(world.directory.tagged(TAG_TILE).len(), 8);
}

#[test]
fn test_candidates_bounded_by_water_and_height() {
    // Water at 1 removes the bottom layer; the column at (1, 1) is too low
    let height_map = HeightMap::from_fn(2, 2, |x, y| if (x, y) == (1, 1) { 0 } else { 1 });
    let mut world = World::new(config([2, 2, 2], 0, 1), height_map);
    let report = world.step(Grid3D::ZERO);

    assert_eq!(report.tiles_spawned, 3);
    for z in [0, 1] {
        assert!(world.chunks.tile_at(Grid3D::new(1, 1, z)).is_none());
    }
    assert!(world.chunks.tile_at(Grid3D::new(0, 0, 0)).is_none());
    assert!(world.chunks.tile_at(Grid3D::new(0, 0, 1)).is_some());
}

#[test]
fn test_column_spans_water_level_to_height() {
    // One column per chunk, nine deep: chunk z = 2 covers 18..=26
    let mut world = World::new(config([1, 1, 9], 0, 20), HeightMap::flat(4, 4, 25));
    let report = world.step(Grid3D::new(0, 0, 20));

    assert_eq!(world.chunks.observer_chunk(), Some(Grid3D::new(0, 0, 2)));
    assert_eq!(report.tiles_spawned, 6);
    for z in 18..=26 {
        let expected = (20..=25).contains(&z);
        assert_eq!(world.chunks.tile_at(Grid3D::new(0, 0, z)).is_some(), expected, "z = {z}");
    }
}

#[test]
fn test_spawn_then_despawn_restores_pool() {
    let mut world = World::new(config([4, 4, 4], 0, 0), HeightMap::flat(16, 16, 3));
    let before = world.pool.active_count();

    let tiles = world
        .chunks
        .spawn_chunk(Grid3D::ZERO, &mut world.pool, &mut world.directory, &world.height_map)
        .unwrap();
    assert_eq!(tiles, 64);
    assert_eq!(world.chunks.tile_count(), 64);

    assert_eq!(world.chunks.despawn_chunk(Grid3D::ZERO, &mut world.pool), Some(64));
    assert_eq!(world.chunks.tile_count(), 0);
    assert_eq!(world.pool.active_count(), before);

    world.directory.commit(&world.pool);
    assert!(world.directory.is_empty());
}

#[test]
fn test_moving_away_despawns_old_chunk() {
    let mut world = World::new(config([4, 4, 4], 0, 0), HeightMap::flat(16, 16, 3));
    world.step(Grid3D::ZERO);
    let old_tiles: Vec<Grid3D> = (0..4)
        .flat_map(|x| (0..4).flat_map(move |y| (0..4).map(move |z| Grid3D::new(x, y, z))))
        .collect();

    // Chunk (0, 0, 5) lies above every column, so it spawns with no tiles
    let report = world.step(Grid3D::new(0, 0, 20));
    assert_eq!(report.despawned, 1);
    assert_eq!(report.tiles_despawned, 64);
    assert_eq!(report.spawned, 1);
    assert_eq!(report.tiles_spawned, 0);

    for grid in old_tiles {
        assert!(world.chunks.tile_at(grid).is_none());
    }
    assert_eq!(world.pool.active_count(), 1);
    assert_eq!(world.directory.len(), 1);
}

#[test]
fn test_diagonal_neighbour_culled_in_built_geometry() {
    let height_map = HeightMap::from_fn(2, 2, |x, y| if (x, y) == (1, 1) { 1 } else { 0 });
    let mut world = World::new(config([2, 2, 2], 0, 0), height_map);
    world.step(Grid3D::ZERO);

    // (0,0,0) is covered by (1,1,1); the other four tiles stay visible
    assert_eq!(world.chunks.tile_count(), 5);
    let chunk = world.chunks.chunk(Grid3D::ZERO).unwrap();
    let data = world.pool.get::<ChunkData>(chunk).unwrap();
    assert!(!data.dirty);
    assert_eq!(data.geometry.len(), 4 * VERTICES_PER_TILE);
}

/// One-tile chunks where the column at (1, 1) is one tile taller, so tile
/// (1, 1, 1) in chunk (1, 1, 1) covers tile (0, 0, 0) in chunk (0, 0, 0).
fn occluder_world() -> World {
    let height_map = HeightMap::from_fn(8, 8, |x, y| if (x, y) == (1, 1) { 1 } else { 0 });
    World::new(config([1, 1, 1], 1, 0), height_map)
}

fn origin_vertices(world: &World) -> usize {
    let chunk = world.chunks.chunk(Grid3D::ZERO).unwrap();
    let data = world.pool.get::<ChunkData>(chunk).unwrap();
    assert!(!data.dirty);
    data.geometry.len()
}

#[test]
fn test_despawned_occluder_uncovers_neighbour_chunk() {
    let mut world = occluder_world();
    world.step(Grid3D::ZERO);
    assert!(world.chunks.is_loaded(Grid3D::ONE));
    assert_eq!(origin_vertices(&world), 0);

    // Chunk (1, 1, 1) falls out of range, chunk (0, 0, 0) stays
    world.step(Grid3D::splat(-1));
    assert!(!world.chunks.is_loaded(Grid3D::ONE));
    assert_eq!(origin_vertices(&world), VERTICES_PER_TILE);
}

#[test]
fn test_spawned_occluder_covers_neighbour_chunk() {
    let mut world = occluder_world();
    world.step(Grid3D::splat(-1));
    assert_eq!(origin_vertices(&world), VERTICES_PER_TILE);

    world.step(Grid3D::ZERO);
    assert!(world.chunks.is_loaded(Grid3D::ONE));
    assert_eq!(origin_vertices(&world), 0);
}

#[test]
fn test_removed_occluder_uncovers_tile_in_other_chunk() {
    let mut world = occluder_world();
    world.step(Grid3D::ZERO);
    assert_eq!(origin_vertices(&world), 0);

    assert!(world.chunks.remove_tile(Grid3D::ONE, &mut world.pool));
    world.chunks.rebuild_dirty(&mut world.pool);
    assert_eq!(origin_vertices(&world), VERTICES_PER_TILE);
}

#[test]
fn test_clean_chunks_are_not_rebuilt() {
    let mut world = World::new(config([2, 2, 2], 1, 0), HeightMap::flat(8, 8, 1));
    world.step(Grid3D::ZERO);

    // Nothing moved, nothing changed
    world.step(Grid3D::ZERO);
    assert_eq!(world.chunks.rebuild_dirty(&mut world.pool), 0);

    assert!(world.chunks.mark_dirty(Grid3D::new(1, 1, 1), &mut world.pool));
    assert_eq!(world.chunks.rebuild_dirty(&mut world.pool), 1);
}

#[test]
fn test_random_walk_keeps_indices_consistent() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xC0FFEE);
    let height_map = HeightMap::generate(32, 32, 4, 12, WorldSeed::new(5));
    let mut world = World::new(config([4, 4, 4], 1, 2), height_map);
    let mut observer = Grid3D::new(0, 0, 4);
    let cell = world.chunks.config().cell();

    for _ in 0..60 {
        observer += Grid3D::new(rng.gen_range(-3..=3), rng.gen_range(-3..=3), rng.gen_range(-1..=1));
        world.step(observer);

        let center = world.chunks.observer_chunk().unwrap();
        assert_eq!(world.chunks.chunk_count(), 27);
        for (address, chunk) in world.chunks.loaded_chunks() {
            assert!(address.chebyshev(center) <= 1);
            assert!(world.pool.is_active(chunk));
            let data = world.pool.get::<ChunkData>(chunk).unwrap();
            assert!(!data.dirty);
            let fresh = build_geometry(&data.tiles, &world.pool, cell, |g| {
                world.chunks.tile_at(g).is_some()
            });
            assert_eq!(data.geometry, fresh, "stale geometry in chunk {address:?}");
            for &tile in &data.tiles {
                let grid = world.pool.get::<GridPosition>(tile).unwrap().grid;
                assert_eq!(world.chunks.tile_at(grid), Some(tile));
                assert_eq!(world.chunks.chunk_address(grid), address);
            }
        }

        // Directory and pool agree after commit
        assert_eq!(world.directory.len(), world.pool.active_count());
        assert_eq!(world.directory.tagged(TAG_TILE).len(), world.chunks.tile_count());
        assert_eq!(world.directory.tagged(TAG_CHUNK).len(), 27);
    }
}

#[test]
fn test_shipped_config_parses() {
    let config = WorldConfig::from_toml_str(include_str!("../../../config/world.toml")).unwrap();
    assert_eq!(config, WorldConfig::default());
}
