//! The column store shared by the main thread and the streaming worker.
//!
//! The map itself sits behind one `RwLock` that is held only long enough to
//! look up, insert or remove a handle. Columns are reached through their own
//! `MtResource`, so generating one column never blocks access to the others.
//! Iteration goes through [`ChunkMap::snapshot`], which copies out the handles,
//! so inserting while another thread iterates is safe.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::core::MtResource;
use crate::engine_state::voxels::chunk::ColumnPosition;

pub struct ChunkMap<C: Send + Sync> {
    columns: RwLock<HashMap<ColumnPosition, MtResource<C>>>,
}

impl<C: Send + Sync> ChunkMap<C> {
    pub fn new() -> Self {
        ChunkMap {
            columns: RwLock::new(HashMap::new()),
        }
    }

    pub fn exists_at(&self, position: ColumnPosition) -> bool {
        self.columns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&position)
    }

    pub fn get(&self, position: ColumnPosition) -> Option<MtResource<C>> {
        self.columns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&position)
            .cloned()
    }

    /// Returns the column at `position`, creating it with `create` if absent.
    ///
    /// `create` runs under the store's write lock and must not touch the store.
    pub fn get_or_insert_with(
        &self,
        position: ColumnPosition,
        create: impl FnOnce() -> C,
    ) -> MtResource<C> {
        if let Some(column) = self.get(position) {
            return column;
        }
        self.columns
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(position)
            .or_insert_with(|| MtResource::new(create()))
            .clone()
    }

    /// Removes a column. Returns `false` if there was none.
    pub fn delete_chunk(&self, position: ColumnPosition) -> bool {
        self.columns
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&position)
            .is_some()
    }

    /// Handles to every loaded column, in no particular order.
    pub fn snapshot(&self) -> Vec<MtResource<C>> {
        self.columns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.columns.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<C: Send + Sync> Default for ChunkMap<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point2;

    #[test]
    fn test_get_or_insert_creates_once() {
        let map = ChunkMap::new();
        let position = Point2::new(1, -1);

        let first = map.get_or_insert_with(position, || 5);
        let second = map.get_or_insert_with(position, || 9);

        assert!(first.ptr_eq(&second));
        assert_eq!(*second.get(), 5);
        assert_eq!(map.len(), 1);
        assert!(map.exists_at(position));
    }

    #[test]
    fn test_delete_chunk() {
        let map = ChunkMap::new();
        map.get_or_insert_with(Point2::new(0, 0), || 1);

        assert!(map.delete_chunk(Point2::new(0, 0)));
        assert!(!map.delete_chunk(Point2::new(0, 0)));
        assert!(map.is_empty());
        assert!(map.get(Point2::new(0, 0)).is_none());
    }

    #[test]
    fn test_snapshot_survives_insertion() {
        let map = ChunkMap::new();
        for x in 0..4 {
            map.get_or_insert_with(Point2::new(x, 0), || x);
        }

        let snapshot = map.snapshot();
        map.get_or_insert_with(Point2::new(9, 9), || 9);

        assert_eq!(snapshot.len(), 4);
        assert_eq!(map.len(), 5);
    }
}
