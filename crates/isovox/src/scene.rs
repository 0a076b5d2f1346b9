//! # Play Scene
//!
//! One [`PlayScene::update`] runs the whole simulation step to completion:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ (input already applied through handle_action)                │
//! │ 1. stream chunks around the player's tile                    │
//! │ 2. commit the directory                                      │
//! │ 3. rebuild geometry of dirty chunks                          │
//! │ 4. movement, then collision                                  │
//! │ 5. animation (expired one-shots are destroyed)               │
//! │ 6. player tile, pointer selection, camera follow             │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`PlayScene::render`] then submits the frame. Nothing in a step suspends
//! or runs on another thread; the host's frame loop is the only scheduler.

use isovox_core::{
    Animation, BoundingBox, ChunkData, CommitReport, ComponentPool, Damage, Entity,
    EntityDirectory, EntityState, Grid3D, GridPosition, Health, Input, Sprite, TextureRect,
    Transform, Vec2, TAG_PLAYER,
};
use isovox_procedural::geometry::push_quad;
use isovox_procedural::{
    grid_to_isometric, pick_cell, ChunkManager, HeightMap, StreamingReport, WorldConfig,
    WorldSeed,
};
use tracing::{debug, info};

use crate::camera::Camera;
use crate::error::SceneResult;
use crate::input::{apply_movement, movement_direction, Action, ActionPhase};
use crate::physics::{get_overlap, get_previous_overlap, resolve};
use crate::services::{AssetProvider, Color, RenderSurface};

/// Render-space distance the player covers per step at full input.
pub const PLAYER_SPEED: f32 = 1.0;
/// Hit points the player starts with.
pub const PLAYER_HEALTH: i32 = 100;
/// Texture name of the player sprite strip.
pub const PLAYER_TEXTURE: &str = "player";
/// Font used for the stats line.
pub const HUD_FONT: &str = "hud";
/// Frame clear colour.
pub const CLEAR_COLOR: Color = Color::rgb(204, 226, 225);
/// How far the selected tile is raised when drawn.
pub const SELECTED_LIFT: f32 = 4.0;

/// What one [`PlayScene::update`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Chunk streaming changes.
    pub streaming: StreamingReport,
    /// Directory commit counts.
    pub commit: CommitReport,
    /// Chunks whose geometry was rebuilt.
    pub rebuilt: usize,
    /// Collisions that moved an entity.
    pub collisions: usize,
    /// Entities destroyed this step (ended animations, zero health).
    pub destroyed: usize,
}

/// The isometric play scene.
///
/// Owns the pool, the directory, the chunk manager and the height map, and
/// passes them explicitly to every system.
pub struct PlayScene {
    pool: ComponentPool,
    directory: EntityDirectory,
    chunks: ChunkManager,
    height_map: HeightMap,
    seed: WorldSeed,
    player: Entity,
    pointer: Vec2,
    camera: Camera,
    selected: Option<Entity>,
    player_died: bool,
    exit_requested: bool,
    frame: u64,
}

impl PlayScene {
    /// Creates a scene from `config`, time-seeded unless the config fixes a
    /// seed.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Config`](crate::SceneError::Config) if the
    /// configuration is invalid.
    pub fn new(config: WorldConfig) -> SceneResult<Self> {
        let seed = config.seed.map_or_else(WorldSeed::from_time, WorldSeed::new);
        Self::with_seed(config, seed)
    }

    /// Creates a scene whose terrain is generated from `seed`.
    ///
    /// # Errors
    ///
    /// As [`new`](Self::new), plus
    /// [`SceneError::Pool`](crate::SceneError::Pool) if the player cannot
    /// be spawned.
    pub fn with_seed(config: WorldConfig, seed: WorldSeed) -> SceneResult<Self> {
        config.validate()?;
        let height_map = HeightMap::generate(
            config.world_width,
            config.world_height,
            config.octave_count,
            config.max_column_height,
            seed,
        );
        Self::with_height_map(config, height_map, seed)
    }

    /// Creates a scene over a prepared height map.
    ///
    /// # Errors
    ///
    /// As [`with_seed`](Self::with_seed).
    pub fn with_height_map(
        config: WorldConfig,
        height_map: HeightMap,
        seed: WorldSeed,
    ) -> SceneResult<Self> {
        config.validate()?;

        let mut pool = ComponentPool::new(config.pool_capacity());
        let mut directory = EntityDirectory::new();
        let player = spawn_player(&mut pool, &mut directory, &config, &height_map)?;
        directory.commit(&pool);

        let start = pool.get::<Transform>(player).map_or(Vec2::ZERO, |t| t.pos);
        info!(
            seed = seed.value(),
            capacity = pool.capacity(),
            load_radius = config.load_radius,
            "play scene created"
        );

        Ok(Self {
            pool,
            directory,
            chunks: ChunkManager::new(config),
            height_map,
            seed,
            player,
            pointer: start,
            camera: Camera::new(start),
            selected: None,
            player_died: false,
            exit_requested: false,
            frame: 0,
        })
    }

    /// Seed the terrain was generated from.
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// The component pool.
    #[must_use]
    pub const fn pool(&self) -> &ComponentPool {
        &self.pool
    }

    /// The component pool, for hosts attaching their own components.
    pub fn pool_mut(&mut self) -> &mut ComponentPool {
        &mut self.pool
    }

    /// The entity directory as of the last commit.
    #[must_use]
    pub const fn directory(&self) -> &EntityDirectory {
        &self.directory
    }

    /// The chunk manager.
    #[must_use]
    pub const fn chunks(&self) -> &ChunkManager {
        &self.chunks
    }

    /// The height map.
    #[must_use]
    pub const fn height_map(&self) -> &HeightMap {
        &self.height_map
    }

    /// The controlled entity.
    #[must_use]
    pub const fn player(&self) -> Entity {
        self.player
    }

    /// The camera.
    #[must_use]
    pub const fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Last pointer position, in render space.
    #[must_use]
    pub const fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Tile currently under the pointer.
    #[must_use]
    pub const fn selected_tile(&self) -> Option<Entity> {
        self.selected
    }

    /// Whether the player's health reached zero.
    #[must_use]
    pub const fn player_died(&self) -> bool {
        self.player_died
    }

    /// Whether the host should leave the scene.
    #[must_use]
    pub const fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Steps run so far.
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Tile the player stands on.
    #[must_use]
    pub fn player_tile(&self) -> Grid3D {
        self.pool
            .get::<GridPosition>(self.player)
            .map_or(Grid3D::ZERO, |g| g.grid)
    }

    /// Creates an entity that becomes visible to systems at the next
    /// commit.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Pool`](crate::SceneError::Pool) if the pool is
    /// exhausted.
    pub fn spawn_entity(&mut self, tag: &str, name: &str) -> SceneResult<Entity> {
        Ok(self.directory.add_entity(&mut self.pool, tag, name)?)
    }

    /// The single input handler.
    pub fn handle_action(&mut self, action: Action, phase: ActionPhase) {
        if let Some(input) = self.pool.get_mut::<Input>(self.player) {
            if apply_movement(input, action, phase) {
                return;
            }
        }
        if phase != ActionPhase::Start {
            return;
        }

        match action {
            Action::PointerClick(pos) | Action::PointerMove(pos) => self.pointer = pos,
            Action::Scroll(delta) => self.camera.scroll(delta),
            Action::Escape => self.exit_requested = true,
            _ => {}
        }
    }

    /// Runs one simulation step.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Pool`](crate::SceneError::Pool) when chunk
    /// streaming exhausts the pool.
    pub fn update(&mut self) -> SceneResult<StepReport> {
        let mut report = StepReport::default();

        let observer = self.player_tile();
        report.streaming =
            self.chunks
                .update(observer, &mut self.pool, &mut self.directory, &self.height_map)?;
        report.commit = self.directory.commit(&self.pool);
        report.rebuilt = self.chunks.rebuild_dirty(&mut self.pool);

        self.movement();
        let (collisions, killed) = self.collision();
        report.collisions = collisions;
        report.destroyed = killed + self.animation();

        self.locate_player();
        self.select();
        if let Some(transform) = self.pool.get::<Transform>(self.player) {
            self.camera.follow(transform.pos);
        }

        self.frame += 1;
        Ok(report)
    }

    /// Runs [`update`](Self::update) then [`render`](Self::render).
    ///
    /// # Errors
    ///
    /// As [`update`](Self::update).
    pub fn step(
        &mut self,
        assets: &impl AssetProvider,
        surface: &mut impl RenderSurface,
    ) -> SceneResult<StepReport> {
        let report = self.update()?;
        self.render(assets, surface);
        Ok(report)
    }

    fn movement(&mut self) {
        if let Some(input) = self.pool.get::<Input>(self.player).copied() {
            let velocity = movement_direction(&input) * PLAYER_SPEED;
            if let Some(transform) = self.pool.get_mut::<Transform>(self.player) {
                transform.velocity = velocity;
            }
            if let Some(state) = self.pool.get_mut::<EntityState>(self.player) {
                *state = if velocity.is_zero() {
                    EntityState::Idle
                } else {
                    EntityState::Running
                };
            }
        }

        for &entity in self.directory.all() {
            if let Some(transform) = self.pool.get_mut::<Transform>(entity) {
                transform.prev_pos = transform.pos;
                transform.pos += transform.velocity;
            }
        }
    }

    /// Returns (resolved collisions, entities killed by contact damage).
    fn collision(&mut self) -> (usize, usize) {
        let bodies: Vec<Entity> = self
            .directory
            .all()
            .iter()
            .copied()
            .filter(|&e| self.pool.has::<BoundingBox>(e) && self.pool.has::<Transform>(e))
            .collect();

        let mut resolved = 0;
        let mut killed = 0;
        for &a in &bodies {
            for &b in &bodies {
                if a == b || !self.pool.is_active(a) || !self.pool.is_active(b) {
                    continue;
                }
                let Some(overlap) = get_overlap(&self.pool, a, b) else {
                    continue;
                };
                if overlap.x <= 0.0 || overlap.y <= 0.0 {
                    continue;
                }

                let previous = get_previous_overlap(&self.pool, a, b).unwrap_or(Vec2::ZERO);
                let other_pos = self.pool.get::<Transform>(b).map_or(Vec2::ZERO, |t| t.pos);
                if let Some(transform) = self.pool.get_mut::<Transform>(a) {
                    if resolve(transform, other_pos, overlap, previous) {
                        resolved += 1;
                    }
                }

                if self.apply_contact_damage(a, b) {
                    killed += 1;
                }
            }
        }
        (resolved, killed)
    }

    /// Damages `target` by `source`'s [`Damage`]. Returns whether an entity
    /// was destroyed.
    fn apply_contact_damage(&mut self, target: Entity, source: Entity) -> bool {
        let Some(damage) = self.pool.get::<Damage>(source).copied() else {
            return false;
        };
        let Some(health) = self.pool.get_mut::<Health>(target) else {
            return false;
        };
        if !health.apply(damage) {
            return false;
        }

        if target == self.player {
            if !self.player_died {
                info!(frame = self.frame, "player died");
            }
            self.player_died = true;
            self.exit_requested = true;
            false
        } else {
            self.pool.destroy(target)
        }
    }

    fn animation(&mut self) -> usize {
        let mut expired = Vec::new();
        for &entity in self.directory.all() {
            if let Some(animation) = self.pool.get_mut::<Animation>(entity) {
                animation.update();
                if animation.has_ended() && entity != self.player {
                    expired.push(entity);
                }
            }
        }
        expired
            .into_iter()
            .filter(|&entity| self.pool.destroy(entity))
            .count()
    }

    /// Re-derives the player's tile from its render-space position.
    ///
    /// When the tile's elevation changes the transform is shifted by the
    /// same lift, so the position keeps projecting onto the same cell.
    #[allow(clippy::cast_precision_loss)]
    fn locate_player(&mut self) {
        let Some(pos) = self.pool.get::<Transform>(self.player).map(|t| t.pos) else {
            return;
        };
        let config = self.chunks.config();
        let cell = config.cell();
        let z = self.player_tile().z;
        let picked = pick_cell(pos, z, cell);
        let surface = self
            .height_map
            .height_at(picked.x, picked.y)
            .max(config.water_level);

        if let Some(grid) = self.pool.get_mut::<GridPosition>(self.player) {
            grid.grid = Grid3D::new(picked.x, picked.y, surface);
        }
        if surface != z {
            let lift = Vec2::new(0.0, (z - surface) as f32 * cell.y / 2.0);
            if let Some(transform) = self.pool.get_mut::<Transform>(self.player) {
                transform.pos += lift;
                transform.prev_pos += lift;
            }
        }
    }

    /// Marks the topmost tile under the pointer as selected.
    fn select(&mut self) {
        let config = self.chunks.config();
        let cell = config.cell();
        let bottom = config.water_level;
        let top = self.height_map.highest().max(bottom);

        let hit = (bottom..=top)
            .rev()
            .find_map(|z| self.chunks.tile_at(pick_cell(self.pointer, z, cell)));

        if hit == self.selected {
            return;
        }
        if let Some(old) = self.selected {
            if let Some(state) = self.pool.get_mut::<EntityState>(old) {
                *state = EntityState::Unselected;
            }
        }
        if let Some(new) = hit {
            if let Some(state) = self.pool.get_mut::<EntityState>(new) {
                *state = EntityState::Selected;
            }
        }
        self.selected = hit;
    }

    /// Submits the current frame.
    ///
    /// Chunks are drawn in `(z, y, x)` address order, then the raised
    /// selected tile, then the player and a stats line. Missing assets skip
    /// their submissions.
    pub fn render(&self, assets: &impl AssetProvider, surface: &mut impl RenderSurface) {
        let config = self.chunks.config();
        let cell = config.cell();

        surface.clear(CLEAR_COLOR);
        surface.set_view_center(self.camera.center);
        surface.set_view_zoom(self.camera.zoom());

        if let Some(texture) = assets.texture(&config.tile_texture) {
            let mut loaded: Vec<(Grid3D, Entity)> = self.chunks.loaded_chunks().collect();
            loaded.sort_unstable_by_key(|&(address, _)| address);
            for (_, chunk) in loaded {
                if let Some(data) = self.pool.get::<ChunkData>(chunk) {
                    if !data.geometry.is_empty() {
                        surface.submit_triangles(&data.geometry, texture);
                    }
                }
            }

            if let Some(tile) = self.selected {
                if let (Some(transform), Some(sprite)) = (
                    self.pool.get::<Transform>(tile),
                    self.pool.get::<Sprite>(tile),
                ) {
                    let mut quad = Vec::with_capacity(6);
                    let lifted = transform.pos - Vec2::new(0.0, SELECTED_LIFT);
                    push_quad(&mut quad, lifted, cell, sprite);
                    surface.submit_triangles(&quad, texture);
                }
            }
        } else {
            debug!(texture = %config.tile_texture, "tile texture not loaded");
        }

        if let (Some(transform), Some(sprite)) = (
            self.pool.get::<Transform>(self.player),
            self.pool.get::<Sprite>(self.player),
        ) {
            if let Some(texture) = assets.texture(&sprite.texture) {
                let frame = self
                    .pool
                    .get::<Animation>(self.player)
                    .map_or(0, |a| a.current_frame);
                let sprite = animation_frame(sprite, frame);
                let mut quad = Vec::with_capacity(6);
                push_quad(&mut quad, transform.pos, cell, &sprite);
                surface.submit_triangles(&quad, texture);
            }
        }

        if let Some(font) = assets.font(HUD_FONT) {
            let stats = format!(
                "chunks {} tiles {} entities {}",
                self.chunks.chunk_count(),
                self.chunks.tile_count(),
                self.directory.len()
            );
            surface.submit_text(font, &stats, self.camera.center);
        }
    }
}

/// The sprite shifted to frame `frame` of a horizontal strip.
#[allow(clippy::cast_precision_loss)]
fn animation_frame(sprite: &Sprite, frame: u32) -> Sprite {
    let mut rect = sprite.rect;
    rect.left += rect.width * frame as f32;
    Sprite::new(sprite.texture.as_str(), rect)
}

fn spawn_player(
    pool: &mut ComponentPool,
    directory: &mut EntityDirectory,
    config: &WorldConfig,
    height_map: &HeightMap,
) -> SceneResult<Entity> {
    let cell = config.cell();
    let surface = height_map.height_at(0, 0).max(config.water_level);
    let grid = Grid3D::new(0, 0, surface);

    let player = directory.add_entity(pool, TAG_PLAYER, "hero")?;
    pool.add(player, Transform::at(grid_to_isometric(grid, cell)))?;
    pool.add(player, GridPosition::new(grid))?;
    pool.add(player, Input::default())?;
    pool.add(player, BoundingBox::new(cell / 2.0))?;
    pool.add(
        player,
        Sprite::new(PLAYER_TEXTURE, TextureRect::new(0.0, 0.0, cell.x, cell.y)),
    )?;
    pool.add(player, Animation::new(4, 8, true))?;
    pool.add(player, EntityState::Idle)?;
    pool.add(player, Health::new(PLAYER_HEALTH))?;
    Ok(player)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_scene() -> PlayScene {
        let config = WorldConfig {
            chunk_size: [4, 4, 4],
            load_radius: 1,
            water_level: 2,
            grass_level: 3,
            snow_level: 6,
            ..WorldConfig::default()
        };
        PlayScene::with_height_map(config, HeightMap::flat(16, 16, 3), WorldSeed::new(1))
            .unwrap()
    }

    #[test]
    fn test_player_spawns_on_surface() {
        let scene = flat_scene();
        assert_eq!(scene.player_tile(), Grid3D::new(0, 0, 3));
        assert_eq!(scene.directory().tagged(TAG_PLAYER), &[scene.player()]);
        assert_eq!(scene.pool().get::<EntityState>(scene.player()), Some(&EntityState::Idle));
    }

    #[test]
    fn test_movement_sets_running_and_moves() {
        let mut scene = flat_scene();
        scene.update().unwrap();
        let start = scene.pool().get::<Transform>(scene.player()).unwrap().pos;

        scene.handle_action(Action::Right, ActionPhase::Start);
        scene.update().unwrap();
        let moved = scene.pool().get::<Transform>(scene.player()).unwrap();
        assert_eq!(moved.pos, start + Vec2::new(PLAYER_SPEED, 0.0));
        assert_eq!(moved.prev_pos, start);
        assert_eq!(
            scene.pool().get::<EntityState>(scene.player()),
            Some(&EntityState::Running)
        );

        scene.handle_action(Action::Right, ActionPhase::End);
        scene.update().unwrap();
        assert_eq!(
            scene.pool().get::<EntityState>(scene.player()),
            Some(&EntityState::Idle)
        );
    }

    #[test]
    fn test_escape_requests_exit() {
        let mut scene = flat_scene();
        scene.handle_action(Action::Escape, ActionPhase::End);
        assert!(!scene.exit_requested());
        scene.handle_action(Action::Escape, ActionPhase::Start);
        assert!(scene.exit_requested());
    }

    #[test]
    fn test_animation_frame_shifts_rect() {
        let sprite = Sprite::new("player", TextureRect::new(0.0, 0.0, 32.0, 32.0));
        assert_eq!(animation_frame(&sprite, 2).rect.left, 64.0);
    }
}
