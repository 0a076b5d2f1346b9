//! # World Configuration
//!
//! Loaded once at startup from TOML. Every field has a default, so an empty
//! file is a valid configuration.
//!
//! ```toml
//! chunk_size = [8, 8, 8]
//! load_radius = 1
//! water_level = 20
//!
//! [textures]
//! water = [0.0, 0.0, 32.0, 32.0]
//! ```

use std::path::Path;

use isovox_core::{Grid3D, TextureRect, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chunk::HeightBand;

/// Errors raised while loading a [`WorldConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Parsed, but the values are inconsistent.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Texture sub-rectangles (`[left, top, width, height]`) per height band.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandTextures {
    /// Tiles at the water level.
    pub water: [f32; 4],
    /// Tiles between water and grass.
    pub ground: [f32; 4],
    /// Tiles between grass and snow.
    pub grass: [f32; 4],
    /// Tiles at or above the snow level.
    pub snow: [f32; 4],
}

impl BandTextures {
    /// Rectangle for `band`.
    #[must_use]
    pub fn rect(&self, band: HeightBand) -> TextureRect {
        let [left, top, width, height] = match band {
            HeightBand::Water => self.water,
            HeightBand::Ground => self.ground,
            HeightBand::Grass => self.grass,
            HeightBand::Snow => self.snow,
        };
        TextureRect::new(left, top, width, height)
    }
}

impl Default for BandTextures {
    fn default() -> Self {
        Self {
            water: [0.0, 0.0, 32.0, 32.0],
            ground: [32.0, 0.0, 32.0, 32.0],
            grass: [64.0, 0.0, 32.0, 32.0],
            snow: [96.0, 0.0, 32.0, 32.0],
        }
    }
}

/// Terrain generation and streaming parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Chunk extent in tiles along x, y, z.
    pub chunk_size: [i32; 3],
    /// Chebyshev radius, in chunks, kept loaded around the observer.
    pub load_radius: i32,
    /// Height map extent along x.
    pub world_width: usize,
    /// Height map extent along y.
    pub world_height: usize,
    /// Smooth-noise layers blended into the height field.
    pub octave_count: u32,
    /// Height of a column whose noise sample is 1.0.
    pub max_column_height: i32,
    /// Lowest tile elevation; also the water band.
    pub water_level: i32,
    /// First elevation drawn as grass.
    pub grass_level: i32,
    /// First elevation drawn as snow.
    pub snow_level: i32,
    /// Size of one tile cell in render space.
    pub cell_size: [f32; 2],
    /// Texture sampled by every tile.
    pub tile_texture: String,
    /// Sub-rectangles of `tile_texture` per band.
    pub textures: BandTextures,
    /// Fixed seed; the world is time-seeded when absent.
    pub seed: Option<u64>,
    /// Pool slots kept for entities that are not terrain.
    pub reserved_slots: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_size: [8, 8, 8],
            load_radius: 1,
            world_width: 128,
            world_height: 128,
            octave_count: 5,
            max_column_height: 40,
            water_level: 20,
            grass_level: 24,
            snow_level: 32,
            cell_size: [32.0, 32.0],
            tile_texture: "tiles".to_owned(),
            textures: BandTextures::default(),
            seed: None,
            reserved_slots: 16,
        }
    }
}

impl WorldConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] when [`validate`](Self::validate) fails.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Checks the values are usable together.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.chunk_size.iter().any(|&s| s <= 0) {
            return Err(ConfigError::Invalid(format!(
                "chunk_size must be positive, got {:?}",
                self.chunk_size
            )));
        }
        if self.load_radius < 0 {
            return Err(ConfigError::Invalid(format!(
                "load_radius must not be negative, got {}",
                self.load_radius
            )));
        }
        if self.world_width == 0 || self.world_height == 0 {
            return Err(ConfigError::Invalid(
                "world_width and world_height must be positive".to_string(),
            ));
        }
        if self.octave_count == 0 {
            return Err(ConfigError::Invalid(
                "octave_count must be at least 1".to_string(),
            ));
        }
        if self.max_column_height <= 0 {
            return Err(ConfigError::Invalid(format!(
                "max_column_height must be positive, got {}",
                self.max_column_height
            )));
        }
        if !(self.water_level <= self.grass_level && self.grass_level <= self.snow_level) {
            return Err(ConfigError::Invalid(format!(
                "bands must be ordered water <= grass <= snow, got {} / {} / {}",
                self.water_level, self.grass_level, self.snow_level
            )));
        }
        if self.cell_size.iter().any(|&s| s <= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "cell_size must be positive, got {:?}",
                self.cell_size
            )));
        }
        let diameter = 2 * i64::from(self.load_radius) + 1;
        if self
            .chunk_size
            .iter()
            .any(|&s| i64::from(s) * diameter > i64::from(i32::MAX))
        {
            return Err(ConfigError::Invalid(format!(
                "loaded extent overflows i32: chunk_size {:?}, load_radius {}",
                self.chunk_size, self.load_radius
            )));
        }
        if self.checked_pool_capacity().is_none() {
            return Err(ConfigError::Invalid(format!(
                "pool capacity exceeds u32::MAX: chunk_size {:?}, load_radius {}, reserved_slots {}",
                self.chunk_size, self.load_radius, self.reserved_slots
            )));
        }
        Ok(())
    }

    /// Chunk extent as a grid coordinate.
    #[must_use]
    pub const fn chunk_extent(&self) -> Grid3D {
        Grid3D::new(self.chunk_size[0], self.chunk_size[1], self.chunk_size[2])
    }

    /// Tile cell size in render space.
    #[must_use]
    pub const fn cell(&self) -> Vec2 {
        Vec2::new(self.cell_size[0], self.cell_size[1])
    }

    /// Number of chunks in the loaded cube, `(2r + 1)^3`, saturating.
    #[must_use]
    pub fn loaded_chunk_count(&self) -> usize {
        self.checked_chunk_count().unwrap_or(usize::MAX)
    }

    /// Pool slots needed for a fully loaded cube of chunks plus the reserve.
    ///
    /// Saturates at `u32::MAX`; [`validate`](Self::validate) rejects
    /// configurations that reach it.
    #[must_use]
    pub fn pool_capacity(&self) -> usize {
        self.checked_pool_capacity().unwrap_or(u32::MAX as usize)
    }

    /// [`pool_capacity`](Self::pool_capacity), or `None` if it overflows
    /// or exceeds `u32::MAX`.
    #[must_use]
    pub fn checked_pool_capacity(&self) -> Option<usize> {
        let volume = self
            .chunk_size
            .iter()
            .try_fold(1usize, |acc, &s| acc.checked_mul(usize::try_from(s).ok()?))?;
        let chunks = self.checked_chunk_count()?;
        let capacity = volume
            .checked_mul(chunks)?
            .checked_add(chunks)?
            .checked_add(self.reserved_slots)?;
        (capacity <= u32::MAX as usize).then_some(capacity)
    }

    fn checked_chunk_count(&self) -> Option<usize> {
        let radius = usize::try_from(self.load_radius).ok()?;
        radius.checked_mul(2)?.checked_add(1)?.checked_pow(3)
    }
}
