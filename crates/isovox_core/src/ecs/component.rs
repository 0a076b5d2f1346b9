//! # Component System
//!
//! The component set is closed and known at compile time. Every kind has a
//! [`ComponentKind`] tag and its own dense column in the pool; the
//! [`Component`] trait selects that column statically, so typed access stays
//! O(1) with no dynamic dispatch.

use bytemuck::{Pod, Zeroable};

use super::entity::Entity;
use super::storage::{ComponentColumns, ComponentStorage};
use crate::grid::Grid3D;
use crate::math::Vec2;

/// Every component kind the pool stores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// [`Transform`]
    Transform,
    /// [`GridPosition`]
    GridPosition,
    /// [`Input`]
    Input,
    /// [`BoundingBox`]
    BoundingBox,
    /// [`Sprite`]
    Sprite,
    /// [`Animation`]
    Animation,
    /// [`EntityState`]
    State,
    /// [`Health`]
    Health,
    /// [`Damage`]
    Damage,
    /// [`ChunkData`]
    ChunkData,
}

impl ComponentKind {
    /// Number of component kinds.
    pub const COUNT: usize = 10;

    /// All kinds, in column order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Transform,
        Self::GridPosition,
        Self::Input,
        Self::BoundingBox,
        Self::Sprite,
        Self::Animation,
        Self::State,
        Self::Health,
        Self::Damage,
        Self::ChunkData,
    ];
}

/// Marker trait for pool components.
///
/// Implementors name their [`ComponentKind`] and the column that holds them.
/// `Default` is required because every column is filled up front.
pub trait Component: Default + 'static {
    /// The kind tag of this component.
    const KIND: ComponentKind;

    /// The column storing this component.
    fn column(columns: &ComponentColumns) -> &ComponentStorage<Self>;

    /// The column storing this component, mutably.
    fn column_mut(columns: &mut ComponentColumns) -> &mut ComponentStorage<Self>;
}

macro_rules! impl_component {
    ($ty:ty, $kind:ident, $field:ident) => {
        impl Component for $ty {
            const KIND: ComponentKind = ComponentKind::$kind;

            #[inline]
            fn column(columns: &ComponentColumns) -> &ComponentStorage<Self> {
                &columns.$field
            }

            #[inline]
            fn column_mut(columns: &mut ComponentColumns) -> &mut ComponentStorage<Self> {
                &mut columns.$field
            }
        }
    };
}

/// Render-space placement and motion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Current position.
    pub pos: Vec2,
    /// Position before the last movement step.
    pub prev_pos: Vec2,
    /// Displacement applied per step.
    pub velocity: Vec2,
    /// Draw scale.
    pub scale: Vec2,
}

impl Transform {
    /// Creates a stationary transform at `pos`.
    #[must_use]
    pub const fn at(pos: Vec2) -> Self {
        Self {
            pos,
            prev_pos: pos,
            velocity: Vec2::ZERO,
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::at(Vec2::ZERO)
    }
}

/// Discrete grid address of a tile or chunk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GridPosition {
    /// The address.
    pub grid: Grid3D,
}

impl GridPosition {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(grid: Grid3D) -> Self {
        Self { grid }
    }
}

/// Pressed/released state of the controlled entity's movement actions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Input {
    /// Move up.
    pub up: bool,
    /// Move down.
    pub down: bool,
    /// Move left.
    pub left: bool,
    /// Move right.
    pub right: bool,
    /// Move forward (same screen direction as up).
    pub forward: bool,
}

/// Axis-aligned collision box centred on the transform position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundingBox {
    /// Full extent.
    pub size: Vec2,
    /// Half extent.
    pub half_size: Vec2,
}

impl BoundingBox {
    /// Creates a box of the given size.
    #[must_use]
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            half_size: size / 2.0,
        }
    }
}

/// A sub-rectangle of a texture, in texels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct TextureRect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl TextureRect {
    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Width and height.
    #[must_use]
    pub const fn size(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Corners in the order top-left, top-right, bottom-right, bottom-left.
    #[must_use]
    pub fn corners(self) -> [Vec2; 4] {
        let right = self.left + self.width;
        let bottom = self.top + self.height;
        [
            Vec2::new(self.left, self.top),
            Vec2::new(right, self.top),
            Vec2::new(right, bottom),
            Vec2::new(self.left, bottom),
        ]
    }
}

/// A named texture plus the sub-rectangle to draw.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sprite {
    /// Texture name, resolved by the asset provider at render time.
    pub texture: String,
    /// Region of the texture.
    pub rect: TextureRect,
}

impl Sprite {
    /// Creates a new sprite.
    #[must_use]
    pub fn new(texture: impl Into<String>, rect: TextureRect) -> Self {
        Self {
            texture: texture.into(),
            rect,
        }
    }
}

/// Frame-stepped animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Animation {
    /// Number of frames in the strip.
    pub frame_count: u32,
    /// Steps per frame.
    pub speed: u32,
    /// Frame currently shown.
    pub current_frame: u32,
    /// Steps since the animation started.
    pub elapsed: u32,
    /// Loop when the last frame is reached.
    pub repeat: bool,
}

impl Animation {
    /// Creates a new animation.
    #[must_use]
    pub const fn new(frame_count: u32, speed: u32, repeat: bool) -> Self {
        Self {
            frame_count,
            speed,
            current_frame: 0,
            elapsed: 0,
            repeat,
        }
    }

    /// Advances by one step.
    pub fn update(&mut self) {
        self.elapsed = self.elapsed.saturating_add(1);
        let frame = self.elapsed / self.speed.max(1);
        self.current_frame = if self.repeat {
            frame % self.frame_count.max(1)
        } else {
            frame.min(self.frame_count.saturating_sub(1))
        };
    }

    /// True once a non-repeating animation has played its last frame.
    #[must_use]
    pub const fn has_ended(&self) -> bool {
        !self.repeat && self.elapsed / if self.speed == 0 { 1 } else { self.speed } >= self.frame_count
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::new(1, 1, true)
    }
}

/// Coarse behavioural state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EntityState {
    /// Not moving.
    #[default]
    Idle,
    /// Moving this step.
    Running,
    /// Tile under the pointer.
    Selected,
    /// Tile not under the pointer.
    Unselected,
}

/// Hit points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Health {
    /// Remaining.
    pub current: i32,
    /// Maximum.
    pub max: i32,
}

impl Health {
    /// Full health.
    #[must_use]
    pub const fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    /// Applies damage; returns true when health reached zero.
    pub fn apply(&mut self, damage: Damage) -> bool {
        self.current = (self.current - damage.amount).max(0);
        self.current == 0
    }
}

/// Damage dealt on contact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Damage {
    /// Hit points removed.
    pub amount: i32,
}

/// One vertex of a textured triangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    /// Render-space position.
    pub position: [f32; 2],
    /// Texel coordinates.
    pub tex_coords: [f32; 2],
}

impl Vertex {
    /// Creates a vertex.
    #[must_use]
    pub const fn new(position: Vec2, tex_coords: Vec2) -> Self {
        Self {
            position: position.to_array(),
            tex_coords: tex_coords.to_array(),
        }
    }
}

/// Streaming state carried by a chunk entity.
///
/// The chunk owns its tiles for lifecycle purposes: despawning the chunk
/// destroys every handle in `tiles`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkData {
    /// Tile entities belonging to this chunk.
    pub tiles: Vec<Entity>,
    /// Tile set changed since `geometry` was last built.
    pub dirty: bool,
    /// Triangle list, three vertices per triangle.
    pub geometry: Vec<Vertex>,
}

impl_component!(Transform, Transform, transforms);
impl_component!(GridPosition, GridPosition, grid_positions);
impl_component!(Input, Input, inputs);
impl_component!(BoundingBox, BoundingBox, bounding_boxes);
impl_component!(Sprite, Sprite, sprites);
impl_component!(Animation, Animation, animations);
impl_component!(EntityState, State, states);
impl_component!(Health, Health, healths);
impl_component!(Damage, Damage, damages);
impl_component!(ChunkData, ChunkData, chunks);
