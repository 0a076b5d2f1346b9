//! # Entity Directory
//!
//! The authoritative enumeration of live handles.
//!
//! New handles wait in a pending buffer until [`EntityDirectory::commit`];
//! destroyed handles are not removed eagerly but filtered out at commit time
//! by asking the pool. Systems therefore see a stable list for a whole step.

use std::collections::HashMap;

use tracing::debug;

use super::entity::Entity;
use super::pool::ComponentPool;
use crate::error::PoolResult;

/// Tag of the controlled player entity.
pub const TAG_PLAYER: &str = "player";
/// Tag of terrain tiles.
pub const TAG_TILE: &str = "tile";
/// Tag of streaming chunks.
pub const TAG_CHUNK: &str = "chunk";

/// Counts from one [`EntityDirectory::commit`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommitReport {
    /// Pending handles appended to the master list.
    pub added: usize,
    /// Dead handles dropped from the master list.
    pub removed: usize,
}

/// Master list of live handles plus a tag index.
#[derive(Debug, Default)]
pub struct EntityDirectory {
    /// Every committed handle, in insertion order.
    entities: Vec<Entity>,
    /// Handles created since the last commit.
    pending: Vec<Entity>,
    /// Committed handles grouped by tag, insertion order per bucket.
    by_tag: HashMap<String, Vec<Entity>>,
}

impl EntityDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates an entity in `pool` and buffers it for the next commit.
    ///
    /// # Errors
    ///
    /// Propagates [`PoolError::Exhausted`](crate::PoolError::Exhausted).
    pub fn add_entity(
        &mut self,
        pool: &mut ComponentPool,
        tag: &str,
        name: &str,
    ) -> PoolResult<Entity> {
        let entity = pool.add_entity(tag, name)?;
        self.pending.push(entity);
        Ok(entity)
    }

    /// Applies pending additions, then drops every handle the pool no
    /// longer considers active.
    ///
    /// Idempotent when nothing changed since the previous call.
    pub fn commit(&mut self, pool: &ComponentPool) -> CommitReport {
        let mut added = 0;
        for entity in self.pending.drain(..) {
            // Created and destroyed within the same step
            let Some(tag) = pool.tag(entity) else {
                continue;
            };
            self.entities.push(entity);
            self.by_tag.entry(tag.to_owned()).or_default().push(entity);
            added += 1;
        }

        let before = self.entities.len();
        self.entities.retain(|&e| pool.is_active(e));
        let removed = before - self.entities.len();
        for bucket in self.by_tag.values_mut() {
            bucket.retain(|&e| pool.is_active(e));
        }

        let report = CommitReport { added, removed };
        if added > 0 || removed > 0 {
            debug!(added, removed, live = self.entities.len(), "directory commit");
        }
        report
    }

    /// Every committed live handle.
    #[must_use]
    pub fn all(&self) -> &[Entity] {
        &self.entities
    }

    /// Committed live handles carrying `tag`. The bucket is created empty on
    /// first reference.
    pub fn by_tag(&mut self, tag: &str) -> &[Entity] {
        if !self.by_tag.contains_key(tag) {
            self.by_tag.insert(tag.to_owned(), Vec::new());
        }
        &self.by_tag[tag]
    }

    /// Like [`by_tag`](Self::by_tag) without creating a bucket.
    #[must_use]
    pub fn tagged(&self, tag: &str) -> &[Entity] {
        self.by_tag.get(tag).map_or(&[], Vec::as_slice)
    }

    /// Tags that have a bucket.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.by_tag.keys().map(String::as_str)
    }

    /// Handles waiting for the next commit.
    #[must_use]
    pub fn pending(&self) -> &[Entity] {
        &self.pending
    }

    /// Number of committed handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True when no handle is committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_invisible_until_commit() {
        let mut pool = ComponentPool::new(8);
        let mut dir = EntityDirectory::new();

        let tile = dir.add_entity(&mut pool, TAG_TILE, "t").unwrap();
        assert!(dir.all().is_empty());
        assert_eq!(dir.pending(), &[tile]);

        let report = dir.commit(&pool);
        assert_eq!(report, CommitReport { added: 1, removed: 0 });
        assert_eq!(dir.all(), &[tile]);
        assert_eq!(dir.by_tag(TAG_TILE), &[tile]);
        assert!(dir.pending().is_empty());
    }

    #[test]
    fn test_commit_filters_dead_handles() {
        let mut pool = ComponentPool::new(8);
        let mut dir = EntityDirectory::new();

        let a = dir.add_entity(&mut pool, TAG_TILE, "a").unwrap();
        let b = dir.add_entity(&mut pool, TAG_TILE, "b").unwrap();
        let c = dir.add_entity(&mut pool, TAG_CHUNK, "c").unwrap();
        dir.commit(&pool);

        pool.destroy(b);
        // Lazy removal: still listed until the next commit
        assert_eq!(dir.all(), &[a, b, c]);

        let report = dir.commit(&pool);
        assert_eq!(report, CommitReport { added: 0, removed: 1 });
        assert_eq!(dir.all(), &[a, c]);
        assert_eq!(dir.by_tag(TAG_TILE), &[a]);
        assert_eq!(dir.by_tag(TAG_CHUNK), &[c]);
    }

    #[test]
    fn test_commit_is_idempotent() {
        let mut pool = ComponentPool::new(4);
        let mut dir = EntityDirectory::new();
        dir.add_entity(&mut pool, TAG_PLAYER, "p").unwrap();

        dir.commit(&pool);
        let snapshot = dir.all().to_vec();
        assert_eq!(dir.commit(&pool), CommitReport::default());
        assert_eq!(dir.all(), snapshot.as_slice());
    }

    #[test]
    fn test_destroyed_before_commit_never_listed() {
        let mut pool = ComponentPool::new(4);
        let mut dir = EntityDirectory::new();
        let ghost = dir.add_entity(&mut pool, TAG_TILE, "ghost").unwrap();
        pool.destroy(ghost);

        dir.commit(&pool);
        assert!(dir.all().is_empty());
        assert!(dir.tagged(TAG_TILE).is_empty());
    }

    #[test]
    fn test_by_tag_creates_empty_bucket() {
        let mut dir = EntityDirectory::new();
        assert!(dir.tagged("enemy").is_empty());
        assert_eq!(dir.tags().count(), 0);
        assert!(dir.by_tag("enemy").is_empty());
        assert_eq!(dir.tags().collect::<Vec<_>>(), vec!["enemy"]);
    }
}
