//! # Isometric Projection
//!
//! Grid addresses map onto the render plane through two basis vectors:
//!
//! ```text
//! i = ( w/2, h/4)     one step along grid x
//! j = (-w/2, h/4)     one step along grid y
//! ```
//!
//! Each step up in z lifts the point by `h/2`. The whole picture is shifted
//! down half a cell so the anchor sits on the tile's top face.

use isovox_core::{Grid3D, Vec2};
use tracing::warn;

#[inline]
fn basis(cell: Vec2) -> (Vec2, Vec2) {
    (
        Vec2::new(cell.x / 2.0, cell.y / 4.0),
        Vec2::new(-cell.x / 2.0, cell.y / 4.0),
    )
}

/// Render-space anchor of a grid address.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn grid_to_isometric(grid: Grid3D, cell: Vec2) -> Vec2 {
    let (i, j) = basis(cell);
    i * grid.x as f32 + j * grid.y as f32 - Vec2::new(0.0, grid.z as f32 * cell.y / 2.0)
        + Vec2::new(0.0, cell.y / 2.0)
}

/// Inverse of [`grid_to_isometric`] for a known elevation `z`.
///
/// Returns fractional grid `(x, y)`. A degenerate cell size (zero
/// determinant) yields the zero vector and logs a warning.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn isometric_to_grid(iso: Vec2, z: i32, cell: Vec2) -> Vec2 {
    let (i, j) = basis(cell);
    let (a, b) = (i.x, j.x);
    let (c, d) = (i.y, j.y);

    let det = a * d - b * c;
    if det == 0.0 {
        warn!(cell_x = cell.x, cell_y = cell.y, "isometric basis is degenerate");
        return Vec2::ZERO;
    }

    let x = iso.x;
    let y = iso.y + z as f32 * cell.y / 2.0 - cell.y / 2.0;

    let inv = 1.0 / det;
    Vec2::new(inv * (d * x - b * y), inv * (-c * x + a * y))
}

/// The grid cell under `iso` at elevation `z`.
///
/// Each cell owns the diamond centred on its anchor, so the fractional
/// coordinates are rounded rather than truncated.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn pick_cell(iso: Vec2, z: i32, cell: Vec2) -> Grid3D {
    let grid = isometric_to_grid(iso, z, cell);
    Grid3D::new(grid.x.round() as i32, grid.y.round() as i32, z)
}
