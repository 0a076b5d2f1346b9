//! # ISOVOX
//!
//! An isometric voxel-tile play scene: a player walks over procedurally
//! generated terrain that streams in and out in chunks around it.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   Action    ┌─────────────────────────────────────┐
//! │     host     │ ──────────► │              PlayScene              │
//! │ (window, GPU │             │  ComponentPool   EntityDirectory    │
//! │  and assets) │ ◄────────── │  ChunkManager    HeightMap  Camera  │
//! └──────────────┘  triangles  └─────────────────────────────────────┘
//!                   and text
//! ```
//!
//! The host owns the frame loop. It feeds [`Action`]s to
//! [`PlayScene::handle_action`], then calls [`PlayScene::step`] with its
//! [`AssetProvider`] and [`RenderSurface`] implementations.
//!
//! ## Example
//!
//! ```rust
//! use isovox::{Action, ActionPhase, PlayScene};
//! use isovox::procedural::{WorldConfig, WorldSeed};
//!
//! let config = WorldConfig { load_radius: 0, ..WorldConfig::default() };
//! let mut scene = PlayScene::with_seed(config, WorldSeed::new(42)).unwrap();
//!
//! scene.handle_action(Action::Right, ActionPhase::Start);
//! let report = scene.update().unwrap();
//! assert_eq!(report.streaming.spawned, 1);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod camera;
pub mod error;
pub mod input;
pub mod physics;
pub mod scene;
pub mod services;

pub use isovox_core as core;
pub use isovox_procedural as procedural;

pub use camera::Camera;
pub use error::{SceneError, SceneResult};
pub use input::{Action, ActionPhase};
pub use physics::Aabb;
pub use scene::{PlayScene, StepReport, PLAYER_SPEED};
pub use services::{AssetProvider, Color, FontHandle, RenderSurface, TextureHandle};
