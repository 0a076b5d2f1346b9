//! # Scene Error Types

use isovox_core::PoolError;
use isovox_procedural::ConfigError;
use thiserror::Error;

/// Errors that can stop the play scene.
#[derive(Error, Debug)]
pub enum SceneError {
    /// The component pool ran out of slots or was handed a stale handle.
    #[error("entity storage: {0}")]
    Pool(#[from] PoolError),

    /// The world configuration could not be used.
    #[error("world configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;
