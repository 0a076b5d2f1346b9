//! # Height Map
//!
//! Integer column heights derived once from the noise field at world
//! generation time and read-only afterwards.

use tracing::info;

use crate::noise::{perlin_noise, white_noise, NoiseGrid, WorldSeed};

/// Surface elevation per `(x, y)` column.
///
/// Lookups outside the generated area wrap around, matching the toroidal
/// noise it was built from, so the world streams without edges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeightMap {
    width: usize,
    height: usize,
    heights: Vec<i32>,
}

impl HeightMap {
    /// `height(x, y) = round(noise(x, y) * max_column_height)`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn from_noise(noise: &NoiseGrid, max_column_height: i32) -> Self {
        let scale = max_column_height as f32;
        Self {
            width: noise.width(),
            height: noise.height(),
            heights: noise
                .values()
                .iter()
                .map(|v| (v * scale).round() as i32)
                .collect(),
        }
    }

    /// Runs the full pipeline: seeded white noise, octave blend, scaling.
    #[must_use]
    pub fn generate(
        width: usize,
        height: usize,
        octave_count: u32,
        max_column_height: i32,
        seed: WorldSeed,
    ) -> Self {
        let base = white_noise(width, height, seed);
        let map = Self::from_noise(&perlin_noise(&base, octave_count), max_column_height);
        info!(
            seed = seed.value(),
            width,
            height,
            octave_count,
            highest = map.highest(),
            "height map generated"
        );
        map
    }

    /// A map with the same height everywhere.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn flat(width: usize, height: usize, column_height: i32) -> Self {
        Self::from_fn(width, height, |_, _| column_height)
    }

    /// A map built from a per-column function.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> i32) -> Self {
        assert!(width > 0 && height > 0, "Height map must not be empty");
        let mut heights = Vec::with_capacity(width * height);
        for x in 0..width {
            for y in 0..height {
                heights.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            heights,
        }
    }

    /// Width of the generated area.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height of the generated area.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Column height at world column `(x, y)`, wrapping.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn height_at(&self, x: i32, y: i32) -> i32 {
        let x = i64::from(x).rem_euclid(self.width as i64) as usize;
        let y = i64::from(y).rem_euclid(self.height as i64) as usize;
        self.heights[x * self.height + y]
    }

    /// Tallest column.
    #[must_use]
    pub fn highest(&self) -> i32 {
        self.heights.iter().copied().max().unwrap_or(0)
    }
}
