//! # Value Noise
//!
//! Layered white-noise interpolation, the classic "smooth noise + octave
//! blend" recipe:
//!
//! 1. [`white_noise`] fills a grid with independent uniform samples
//! 2. [`smooth_noise`] samples that grid at a stride of `2^octave` and
//!    bilinearly interpolates between the sample corners
//! 3. [`perlin_noise`] blends the smooth layers, coarsest first, with a
//!    persistence of 0.5 and normalises by the total weight
//!
//! Despite the name of step 3 this is value noise, not gradient noise.
//!
//! ## Determinism Guarantee
//!
//! Every function here is pure given its inputs. Only
//! [`WorldSeed::from_time`] reads the clock, and it is meant for the single
//! top-level world creation entry point.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Amplitude decay between successive octaves.
pub const PERSISTENCE: f32 = 0.5;

/// World seed for deterministic generation.
///
/// All procedural generation derives from this seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Seeds from the wall clock. Non-reproducible.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_time() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos() as u64);
        Self(nanos)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives a sub-seed for a specific purpose.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        let mut hash = self.0;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(0x1505_0000_C0FF_EE00)
    }
}

/// A dense 2D field of samples, indexed `(x, y)` with `x` outermost.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseGrid {
    width: usize,
    height: usize,
    values: Vec<f32>,
}

impl NoiseGrid {
    /// Creates a grid with every cell set to `value`.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn filled(width: usize, height: usize, value: f32) -> Self {
        assert!(width > 0 && height > 0, "Noise grid must not be empty");
        Self {
            width,
            height,
            values: vec![value; width * height],
        }
    }

    /// Creates a grid from a per-cell function.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut grid = Self::filled(width, height, 0.0);
        for x in 0..width {
            for y in 0..height {
                grid.values[x * height + y] = f(x, y);
            }
        }
        grid
    }

    /// Width (extent along x).
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height (extent along y).
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Sample at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of range.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        assert!(x < self.width && y < self.height, "Noise sample out of range");
        self.values[x * self.height + y]
    }

    /// All samples, x-major.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

/// Independent uniform samples in `[0, 1)`, reproducible from `seed`.
#[must_use]
pub fn white_noise(width: usize, height: usize, seed: WorldSeed) -> NoiseGrid {
    let mut rng = ChaCha8Rng::seed_from_u64(seed.value());
    NoiseGrid::from_fn(width, height, |_, _| rng.gen::<f32>())
}

/// White noise seeded from the clock. Returns the seed so the world can be
/// regenerated later.
#[must_use]
pub fn white_noise_time_seeded(width: usize, height: usize) -> (NoiseGrid, WorldSeed) {
    let seed = WorldSeed::from_time();
    (white_noise(width, height, seed), seed)
}

#[inline]
fn interpolate(x0: f32, x1: f32, alpha: f32) -> f32 {
    x0 * (1.0 - alpha) + alpha * x1
}

/// Samples `base` every `2^octave` cells and bilinearly fills the gaps.
///
/// The far sample wraps around the grid edge, so the output tiles
/// seamlessly.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn smooth_noise(base: &NoiseGrid, octave: u32) -> NoiseGrid {
    let (width, height) = (base.width(), base.height());
    let period = 1usize.checked_shl(octave).unwrap_or(usize::MAX);
    let frequency = 1.0 / period as f32;

    NoiseGrid::from_fn(width, height, |i, j| {
        let i0 = (i / period) * period;
        let i1 = (i0 + period % width) % width;
        let horizontal = (i - i0) as f32 * frequency;

        let j0 = (j / period) * period;
        let j1 = (j0 + period % height) % height;
        let vertical = (j - j0) as f32 * frequency;

        let top = interpolate(base.get(i0, j0), base.get(i1, j0), horizontal);
        let bottom = interpolate(base.get(i0, j1), base.get(i1, j1), horizontal);
        interpolate(top, bottom, vertical)
    })
}

/// Blends `octave_count` smooth layers of `base`, coarsest layer weighted
/// highest, normalised back into the input range.
///
/// An `octave_count` of zero is treated as one.
#[must_use]
pub fn perlin_noise(base: &NoiseGrid, octave_count: u32) -> NoiseGrid {
    let octave_count = octave_count.max(1);
    let layers: Vec<NoiseGrid> = (0..octave_count).map(|k| smooth_noise(base, k)).collect();

    let mut blended = NoiseGrid::filled(base.width(), base.height(), 0.0);
    let mut amplitude = 1.0;
    let mut total_amplitude = 0.0;

    for layer in layers.iter().rev() {
        amplitude *= PERSISTENCE;
        total_amplitude += amplitude;
        for (out, sample) in blended.values.iter_mut().zip(layer.values()) {
            *out += sample * amplitude;
        }
    }

    for value in &mut blended.values {
        *value /= total_amplitude;
    }
    blended
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_white_noise_determinism() {
        let a = white_noise(16, 8, WorldSeed::new(12345));
        let b = white_noise(16, 8, WorldSeed::new(12345));
        assert_eq!(a, b, "Same seed must give the same field");

        let c = white_noise(16, 8, WorldSeed::new(54321));
        assert_ne!(a, c, "Different seeds should give different fields");
    }

    #[test]
    fn test_white_noise_range() {
        let noise = white_noise(64, 64, WorldSeed::new(42));
        assert!(noise.values().iter().all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn test_smooth_noise_constant_base() {
        let base = NoiseGrid::filled(4, 4, 0.5);
        for octave in 0..5 {
            let smooth = smooth_noise(&base, octave);
            for v in smooth.values() {
                assert!((v - 0.5).abs() < 1e-6, "octave {octave} gave {v}");
            }
        }
    }

    #[test]
    fn test_smooth_noise_octave_zero_is_identity() {
        let base = white_noise(8, 8, WorldSeed::new(7));
        assert_eq!(smooth_noise(&base, 0), base);
    }

    #[test]
    fn test_smooth_noise_interpolates_between_samples() {
        // Ramp along x: 0, 1, 2, 3 repeated on each row
        #[allow(clippy::cast_precision_loss)]
        let base = NoiseGrid::from_fn(4, 2, |x, _| x as f32);
        let smooth = smooth_noise(&base, 1);

        assert_eq!(smooth.get(0, 0), 0.0);
        assert_eq!(smooth.get(1, 0), 1.0); // halfway between 0 and 2
        assert_eq!(smooth.get(2, 0), 2.0);
        assert_eq!(smooth.get(3, 0), 1.0); // halfway between 2 and the wrapped 0
    }

    #[test]
    fn test_smooth_noise_is_pure() {
        let base = white_noise(32, 32, WorldSeed::new(99));
        assert_eq!(smooth_noise(&base, 3), smooth_noise(&base, 3));
    }

    #[test]
    fn test_perlin_noise_range() {
        let base = white_noise(64, 48, WorldSeed::new(2024));
        for octaves in 1..8 {
            let noise = perlin_noise(&base, octaves);
            for v in noise.values() {
                assert!((0.0..=1.0).contains(v), "{octaves} octaves gave {v}");
            }
        }
    }

    #[test]
    fn test_perlin_single_octave_equals_base() {
        let base = white_noise(8, 8, WorldSeed::new(3));
        let noise = perlin_noise(&base, 1);
        for (a, b) in noise.values().iter().zip(base.values()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_seed_derivation() {
        let base = WorldSeed::new(42);
        assert_ne!(base.derive(1), base.derive(2));
        assert_eq!(base.derive(1), base.derive(1));
        assert_ne!(base.derive(1), base);
    }
}
