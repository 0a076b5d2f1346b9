//! # Collision
//!
//! Axis-aligned overlap between entities that carry both a
//! [`Transform`] and a [`BoundingBox`], and the push-out rule that uses the
//! previous step's overlap to pick the resolution axis.

use isovox_core::{BoundingBox, ComponentPool, Entity, Transform, Vec2};

/// Axis-aligned box in render space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec2,
    /// Maximum corner.
    pub max: Vec2,
}

impl Aabb {
    /// Creates a box centred on `center`.
    #[must_use]
    pub fn from_center(center: Vec2, half_size: Vec2) -> Self {
        Self {
            min: center - half_size,
            max: center + half_size,
        }
    }

    /// Overlap per axis. Positive = overlap, negative = gap.
    #[must_use]
    pub fn overlap(&self, other: &Self) -> Vec2 {
        Vec2::new(
            self.max.x.min(other.max.x) - self.min.x.max(other.min.x),
            self.max.y.min(other.max.y) - self.min.y.max(other.min.y),
        )
    }

    /// Whether the boxes overlap on both axes.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        let o = self.overlap(other);
        o.x > 0.0 && o.y > 0.0
    }
}

fn boxes(pool: &ComponentPool, a: Entity, b: Entity) -> Option<(Transform, Vec2, Transform, Vec2)> {
    let at = *pool.get::<Transform>(a)?;
    let ab = pool.get::<BoundingBox>(a)?.half_size;
    let bt = *pool.get::<Transform>(b)?;
    let bb = pool.get::<BoundingBox>(b)?.half_size;
    Some((at, ab, bt, bb))
}

/// Current overlap of `a` and `b`, or `None` if either lacks a transform
/// or a bounding box.
#[must_use]
pub fn get_overlap(pool: &ComponentPool, a: Entity, b: Entity) -> Option<Vec2> {
    let (at, ah, bt, bh) = boxes(pool, a, b)?;
    Some(Aabb::from_center(at.pos, ah).overlap(&Aabb::from_center(bt.pos, bh)))
}

/// Overlap of `a` and `b` at their positions before the last movement.
#[must_use]
pub fn get_previous_overlap(pool: &ComponentPool, a: Entity, b: Entity) -> Option<Vec2> {
    let (at, ah, bt, bh) = boxes(pool, a, b)?;
    Some(Aabb::from_center(at.prev_pos, ah).overlap(&Aabb::from_center(bt.prev_pos, bh)))
}

/// Pushes `mover` out of `other`.
///
/// If the two already overlapped horizontally last step, the contact is
/// vertical and the mover is pushed along y; if they overlapped vertically,
/// along x. A diagonal entry (no previous overlap on either axis) is left
/// alone. Returns whether the mover was moved.
pub fn resolve(mover: &mut Transform, other_pos: Vec2, overlap: Vec2, previous: Vec2) -> bool {
    if previous.x > 0.0 {
        mover.velocity.y = 0.0;
        if mover.prev_pos.y < other_pos.y {
            mover.pos.y -= overlap.y;
        } else {
            mover.pos.y += overlap.y;
        }
        true
    } else if previous.y > 0.0 {
        mover.velocity.x = 0.0;
        if mover.prev_pos.x < other_pos.x {
            mover.pos.x -= overlap.x;
        } else {
            mover.pos.x += overlap.x;
        }
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(pool: &mut ComponentPool, prev: Vec2, pos: Vec2, size: f32) -> Entity {
        let e = pool.add_entity("body", "b").unwrap();
        let t = pool.add(e, Transform::at(pos)).unwrap();
        t.prev_pos = prev;
        pool.add(e, BoundingBox::new(Vec2::new(size, size))).unwrap();
        e
    }

    #[test]
    fn test_overlap_and_gap() {
        let a = Aabb::from_center(Vec2::ZERO, Vec2::new(2.0, 2.0));
        let b = Aabb::from_center(Vec2::new(3.0, 1.0), Vec2::new(2.0, 2.0));
        assert_eq!(a.overlap(&b), Vec2::new(1.0, 3.0));
        assert!(a.intersects(&b));

        let far = Aabb::from_center(Vec2::new(10.0, 0.0), Vec2::new(2.0, 2.0));
        assert!(a.overlap(&far).x < 0.0);
        assert!(!a.intersects(&far));
    }

    #[test]
    fn test_landing_from_above_resolves_along_y() {
        let mut pool = ComponentPool::new(4);
        // Mover came straight down onto the wall
        let mover = body(&mut pool, Vec2::new(0.0, -5.0), Vec2::new(0.0, -3.0), 4.0);
        let wall = body(&mut pool, Vec2::ZERO, Vec2::ZERO, 4.0);

        let overlap = get_overlap(&pool, mover, wall).unwrap();
        let previous = get_previous_overlap(&pool, mover, wall).unwrap();
        assert_eq!(overlap, Vec2::new(4.0, 1.0));
        assert!(previous.x > 0.0 && previous.y <= 0.0);

        let t = pool.get_mut::<Transform>(mover).unwrap();
        assert!(resolve(t, Vec2::ZERO, overlap, previous));
        assert_eq!(t.pos, Vec2::new(0.0, -4.0));
        assert_eq!(t.velocity.y, 0.0);
    }

    #[test]
    fn test_side_hit_resolves_along_x() {
        let mut pool = ComponentPool::new(4);
        let mover = body(&mut pool, Vec2::new(6.0, 0.0), Vec2::new(3.0, 0.0), 4.0);
        let wall = body(&mut pool, Vec2::ZERO, Vec2::ZERO, 4.0);

        let overlap = get_overlap(&pool, mover, wall).unwrap();
        let previous = get_previous_overlap(&pool, mover, wall).unwrap();

        let t = pool.get_mut::<Transform>(mover).unwrap();
        assert!(resolve(t, Vec2::ZERO, overlap, previous));
        assert_eq!(t.pos, Vec2::new(4.0, 0.0));
    }

    #[test]
    fn test_missing_box_means_no_overlap() {
        let mut pool = ComponentPool::new(4);
        let a = body(&mut pool, Vec2::ZERO, Vec2::ZERO, 4.0);
        let ghost = pool.add_entity("tile", "t").unwrap();
        pool.add(ghost, Transform::default()).unwrap();
        assert!(get_overlap(&pool, a, ghost).is_none());
    }
}
