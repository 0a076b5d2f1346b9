//! # Chunk Layout
//!
//! A chunk is a cube of `chunk_size` tiles addressed by its chunk
//! coordinate. These helpers cover the pure parts of chunk population:
//! where a chunk sits, which tiles a column contributes, and how a tile's
//! elevation picks its texture band.

use std::ops::RangeInclusive;

use isovox_core::Grid3D;

/// Texture band a tile falls in, by elevation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeightBand {
    /// At the water level.
    Water,
    /// Shoreline up to the grass level.
    Ground,
    /// Grass up to the snow level.
    Grass,
    /// Snow caps.
    Snow,
}

impl HeightBand {
    /// Bands the elevation `z` against the three thresholds.
    #[must_use]
    pub const fn classify(z: i32, water_level: i32, grass_level: i32, snow_level: i32) -> Self {
        if z <= water_level {
            Self::Water
        } else if z < grass_level {
            Self::Ground
        } else if z < snow_level {
            Self::Grass
        } else {
            Self::Snow
        }
    }

    /// Lower-case name, used as the tile's debug name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Water => "water",
            Self::Ground => "ground",
            Self::Grass => "grass",
            Self::Snow => "snow",
        }
    }
}

/// First tile address of the chunk at `address`.
#[inline]
#[must_use]
pub const fn chunk_origin(address: Grid3D, chunk_size: Grid3D) -> Grid3D {
    address.scale(chunk_size)
}

/// Chunk address containing `tile`, flooring for negative coordinates.
#[inline]
#[must_use]
pub const fn chunk_address(tile: Grid3D, chunk_size: Grid3D) -> Grid3D {
    tile.div_euclid(chunk_size)
}

/// Elevations a column contributes inside a chunk.
///
/// The chunk covers `z_start..z_start + depth`; the column is solid from
/// `water_level` up to `column_height`. The result is their intersection
/// and may be empty.
#[must_use]
pub fn column_span(
    z_start: i32,
    depth: i32,
    water_level: i32,
    column_height: i32,
) -> RangeInclusive<i32> {
    let low = z_start.max(water_level);
    let high = (z_start + depth - 1).min(column_height);
    low..=high
}

/// Every address in the cube of `radius` chunks around `center`.
pub fn chunks_within(center: Grid3D, radius: i32) -> impl Iterator<Item = Grid3D> {
    let r = radius.max(0);
    (-r..=r).flat_map(move |dz| {
        (-r..=r).flat_map(move |dy| (-r..=r).map(move |dx| center + Grid3D::new(dx, dy, dz)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_bands() {
        let band = |z| HeightBand::classify(z, 20, 24, 32);
        assert_eq!(band(20), HeightBand::Water);
        assert_eq!(band(21), HeightBand::Ground);
        assert_eq!(band(23), HeightBand::Ground);
        assert_eq!(band(24), HeightBand::Grass);
        assert_eq!(band(31), HeightBand::Grass);
        assert_eq!(band(32), HeightBand::Snow);
        assert_eq!(band(60), HeightBand::Snow);
    }

    #[test]
    fn test_column_span_clamps_both_ends() {
        // Chunk covers z 18..=26, column height 25, water 20
        let span = column_span(18, 9, 20, 25);
        assert_eq!(span, 20..=25);
        assert_eq!(span.count(), 6);
    }

    #[test]
    fn test_column_below_water_contributes_nothing() {
        assert_eq!(column_span(16, 8, 20, 12).count(), 0);
        // Chunk entirely above the column
        assert_eq!(column_span(32, 8, 20, 25).count(), 0);
        // Chunk entirely below the water level
        assert_eq!(column_span(8, 8, 20, 25).count(), 0);
    }

    #[test]
    fn test_chunk_address_floors() {
        let size = Grid3D::new(8, 8, 8);
        assert_eq!(chunk_address(Grid3D::new(7, 8, 0), size), Grid3D::new(0, 1, 0));
        assert_eq!(chunk_address(Grid3D::new(-1, -8, -9), size), Grid3D::new(-1, -1, -2));
        assert_eq!(chunk_origin(Grid3D::new(-1, 2, 3), size), Grid3D::new(-8, 16, 24));
    }

    #[test]
    fn test_chunks_within_radius() {
        assert_eq!(chunks_within(Grid3D::ZERO, 0).collect::<Vec<_>>(), vec![Grid3D::ZERO]);

        let center = Grid3D::new(4, -2, 1);
        let cube: Vec<_> = chunks_within(center, 1).collect();
        assert_eq!(cube.len(), 27);
        assert!(cube.iter().all(|c| c.chebyshev(center) <= 1));
    }
}
