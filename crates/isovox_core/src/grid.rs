//! # Grid Coordinates
//!
//! A discrete 3D address used both for tiles and for chunks.
//! A chunk address is a tile address floor-divided by the chunk size.

use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Div, Sub};

use bytemuck::{Pod, Zeroable};

/// Integer grid coordinate.
///
/// Ordered by `(z, y, x)` so that sorted tile sets draw bottom layer first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Grid3D {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
    /// Z coordinate (elevation).
    pub z: i32,
}

impl Grid3D {
    /// Origin.
    pub const ZERO: Self = Self::new(0, 0, 0);

    /// Unit step along every axis.
    pub const ONE: Self = Self::new(1, 1, 1);

    /// Creates a new grid coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Creates a coordinate with the same value on every axis.
    #[inline]
    #[must_use]
    pub const fn splat(v: i32) -> Self {
        Self::new(v, v, v)
    }

    /// Product of the three fields.
    #[inline]
    #[must_use]
    pub const fn volume(self) -> i32 {
        self.x * self.y * self.z
    }

    /// Component-wise product.
    #[inline]
    #[must_use]
    pub const fn scale(self, other: Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }

    /// Component-wise flooring division.
    ///
    /// Unlike `/`, negative coordinates round towards negative infinity,
    /// which is what chunk addressing needs: tile `-1` lives in chunk `-1`.
    #[inline]
    #[must_use]
    pub const fn div_euclid(self, size: Self) -> Self {
        Self::new(
            self.x.div_euclid(size.x),
            self.y.div_euclid(size.y),
            self.z.div_euclid(size.z),
        )
    }

    /// Squared euclidean distance.
    #[inline]
    #[must_use]
    pub const fn distance_squared(self, other: Self) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        let dz = (self.z - other.z) as i64;
        dx * dx + dy * dy + dz * dz
    }

    /// Euclidean distance.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn distance(self, other: Self) -> f32 {
        (self.distance_squared(other) as f64).sqrt() as f32
    }

    /// Chebyshev (chessboard) distance: the largest per-axis difference.
    #[inline]
    #[must_use]
    pub fn chebyshev(self, other: Self) -> i32 {
        (self.x - other.x)
            .abs()
            .max((self.y - other.y).abs())
            .max((self.z - other.z).abs())
    }
}

impl Ord for Grid3D {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.z, self.y, self.x).cmp(&(other.z, other.y, other.x))
    }
}

impl PartialOrd for Grid3D {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add for Grid3D {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl AddAssign for Grid3D {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl Sub for Grid3D {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

/// Truncating division on every axis.
impl Div<i32> for Grid3D {
    type Output = Self;

    #[inline]
    fn div(self, rhs: i32) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl From<(i32, i32, i32)> for Grid3D {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}
