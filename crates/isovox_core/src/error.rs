//! # Pool Error Types
//!
//! All errors that can occur while allocating or mutating pool slots.

use thiserror::Error;

/// Errors that can occur in the component pool.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// Every slot is active. The pool is sized once and never grows.
    #[error("component pool exhausted: all {capacity} slots are active")]
    Exhausted {
        /// Fixed capacity of the pool.
        capacity: usize,
    },

    /// The handle refers to a slot that was destroyed or recycled since.
    #[error("stale entity handle: slot {index} generation {generation}")]
    StaleEntity {
        /// Slot index carried by the handle.
        index: u32,
        /// Generation carried by the handle.
        generation: u32,
    },
}

/// Result type for pool operations.
pub type PoolResult<T> = Result<T, PoolError>;
