//! # Geometry Builder
//!
//! Turns a chunk's tiles into a flat triangle list, two triangles per
//! visible tile.
//!
//! A tile is culled when another tile sits at `pos + (1, 1, 1)`: in the
//! isometric view that neighbour covers it completely. This is a cheap
//! approximation, not exact visibility.

use isovox_core::{ComponentPool, Entity, Grid3D, GridPosition, Sprite, Transform, Vec2, Vertex};

/// Vertices emitted per visible tile.
pub const VERTICES_PER_TILE: usize = 6;

/// Whether the tile at `grid` is hidden behind the tile diagonally above.
#[inline]
#[must_use]
pub fn is_occluded(grid: Grid3D, is_occupied: impl Fn(Grid3D) -> bool) -> bool {
    is_occupied(grid + Grid3D::ONE)
}

/// Appends the quad of one tile to `out`.
///
/// The quad's top-left corner is `anchor - cell / 2`; its extent and texel
/// coordinates both come from the sprite rectangle.
pub fn push_quad(out: &mut Vec<Vertex>, anchor: Vec2, cell: Vec2, sprite: &Sprite) {
    let top_left = anchor - cell / 2.0;
    let size = sprite.rect.size();

    let tl = top_left;
    let tr = top_left + Vec2::new(size.x, 0.0);
    let br = top_left + size;
    let bl = top_left + Vec2::new(0.0, size.y);
    let [uv_tl, uv_tr, uv_br, uv_bl] = sprite.rect.corners();

    out.extend_from_slice(&[
        Vertex::new(tl, uv_tl),
        Vertex::new(tr, uv_tr),
        Vertex::new(br, uv_br),
        Vertex::new(tl, uv_tl),
        Vertex::new(br, uv_br),
        Vertex::new(bl, uv_bl),
    ]);
}

/// Builds the triangle list for `tiles`, in tile order.
///
/// Tiles that are stale or lack a grid position, transform or sprite are
/// skipped. `is_occupied` answers whether any tile, in any chunk, exists at
/// an address.
#[must_use]
pub fn build_geometry(
    tiles: &[Entity],
    pool: &ComponentPool,
    cell: Vec2,
    is_occupied: impl Fn(Grid3D) -> bool,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(tiles.len() * VERTICES_PER_TILE);

    for &tile in tiles {
        let (Some(grid), Some(transform), Some(sprite)) = (
            pool.get::<GridPosition>(tile),
            pool.get::<Transform>(tile),
            pool.get::<Sprite>(tile),
        ) else {
            continue;
        };

        if is_occluded(grid.grid, &is_occupied) {
            continue;
        }
        push_quad(&mut vertices, transform.pos, cell, sprite);
    }

    vertices
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use isovox_core::TextureRect;

    use super::*;

    const CELL: Vec2 = Vec2::new(32.0, 32.0);

    fn spawn_tile(pool: &mut ComponentPool, grid: Grid3D, anchor: Vec2) -> Entity {
        let tile = pool.add_entity("tile", "t").unwrap();
        pool.add(tile, GridPosition::new(grid)).unwrap();
        pool.add(tile, Transform::at(anchor)).unwrap();
        pool.add(tile, Sprite::new("tiles", TextureRect::new(32.0, 0.0, 32.0, 32.0)))
            .unwrap();
        tile
    }

    #[test]
    fn test_single_quad_layout() {
        let mut pool = ComponentPool::new(4);
        let tile = spawn_tile(&mut pool, Grid3D::ZERO, Vec2::new(100.0, 50.0));

        let vertices = build_geometry(&[tile], &pool, CELL, |_| false);
        assert_eq!(vertices.len(), VERTICES_PER_TILE);

        assert_eq!(vertices[0].position, [84.0, 34.0]);
        assert_eq!(vertices[1].position, [116.0, 34.0]);
        assert_eq!(vertices[2].position, [116.0, 66.0]);
        assert_eq!(vertices[5].position, [84.0, 66.0]);

        assert_eq!(vertices[0].tex_coords, [32.0, 0.0]);
        assert_eq!(vertices[2].tex_coords, [64.0, 32.0]);
        assert_eq!(vertices[3], vertices[0]);
        assert_eq!(vertices[4], vertices[2]);
    }

    #[test]
    fn test_diagonal_neighbour_culls_tile() {
        let mut pool = ComponentPool::new(4);
        let low = spawn_tile(&mut pool, Grid3D::ZERO, Vec2::ZERO);
        let high = spawn_tile(&mut pool, Grid3D::ONE, Vec2::new(0.0, 16.0));
        let occupied: HashSet<Grid3D> = [Grid3D::ZERO, Grid3D::ONE].into_iter().collect();

        let vertices = build_geometry(&[low, high], &pool, CELL, |g| occupied.contains(&g));
        // Only the upper tile survives
        assert_eq!(vertices.len(), VERTICES_PER_TILE);
        assert_eq!(vertices[0].position, [-16.0, 0.0]);
    }

    #[test]
    fn test_stale_tiles_are_skipped() {
        let mut pool = ComponentPool::new(4);
        let gone = spawn_tile(&mut pool, Grid3D::ZERO, Vec2::ZERO);
        pool.destroy(gone);

        assert!(build_geometry(&[gone], &pool, CELL, |_| false).is_empty());
    }
}
