//! Persisted favourites and compare lists.
//!
//! A [`BoundedSelectionSet`] is an ordered list of unique supplier ids kept
//! as a JSON array under a fixed storage key. Every operation re-reads the
//! store and writes straight back; there is no batching and no cache.

pub mod storage;

#[cfg(feature = "test-mocks")]
pub mod mock;

pub use storage::{MemoryStorage, SelectionStorage};

pub const FAVORITES_KEY: &str = "favorites";
pub const COMPARE_KEY: &str = "compare";
pub const MAX_COMPARE_ITEMS: usize = 3;

/// Upper bound on the number of ids a set may hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capacity {
    Unbounded,
    AtMost(usize),
}

impl Capacity {
    fn admits(self, len: usize) -> bool {
        match self {
            Capacity::Unbounded => true,
            Capacity::AtMost(max) => len < max,
        }
    }
}

pub struct BoundedSelectionSet<'a, S: SelectionStorage + ?Sized> {
    storage: &'a S,
    key: &'static str,
    capacity: Capacity,
}

impl<'a, S: SelectionStorage + ?Sized> BoundedSelectionSet<'a, S> {
    pub fn new(storage: &'a S, key: &'static str, capacity: Capacity) -> Self {
        Self {
            storage,
            key,
            capacity,
        }
    }

    /// Unbounded list of favourite suppliers.
    pub fn favorites(storage: &'a S) -> Self {
        Self::new(storage, FAVORITES_KEY, Capacity::Unbounded)
    }

    /// Compare list, capped at [`MAX_COMPARE_ITEMS`].
    pub fn compare(storage: &'a S) -> Self {
        Self::new(storage, COMPARE_KEY, Capacity::AtMost(MAX_COMPARE_ITEMS))
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Persisted ids; absent or unreadable data yields an empty list.
    pub fn get(&self) -> Vec<String> {
        let Some(raw) = self.storage.load(self.key) else {
            return Vec::new();
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(ids) => ids,
            Err(err) => {
                log::warn!("Treating corrupt selection {:?} as empty: {err}", self.key);
                Vec::new()
            }
        }
    }

    fn persist(&self, ids: &[String]) {
        match serde_json::to_string(ids) {
            Ok(raw) => self.storage.save(self.key, raw),
            Err(err) => log::error!("Failed to encode selection {:?}: {err}", self.key),
        }
    }

    /// Appends `id`. Returns `false` without touching the store when the id
    /// is already present or the set is full.
    pub fn add(&self, id: &str) -> bool {
        let mut ids = self.get();
        if ids.iter().any(|existing| existing == id) {
            return false;
        }
        if !self.capacity.admits(ids.len()) {
            return false;
        }
        ids.push(id.to_string());
        self.persist(&ids);
        true
    }

    pub fn remove(&self, id: &str) {
        let mut ids = self.get();
        ids.retain(|existing| existing != id);
        self.persist(&ids);
    }

    /// Removes a present id (returning `false`) or tries to add it.
    pub fn toggle(&self, id: &str) -> bool {
        if self.has(id) {
            self.remove(id);
            false
        } else {
            self.add(id)
        }
    }

    pub fn has(&self, id: &str) -> bool {
        self.get().iter().any(|existing| existing == id)
    }

    pub fn can_add(&self) -> bool {
        self.capacity.admits(self.get().len())
    }

    pub fn len(&self) -> usize {
        self.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.storage.remove(self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_rejects_fourth_supplier() {
        let storage = MemoryStorage::new();
        let compare = BoundedSelectionSet::compare(&storage);

        assert!(compare.add("a"));
        assert!(compare.add("b"));
        assert!(compare.add("c"));
        assert!(!compare.can_add());

        assert!(!compare.add("d"));
        assert_eq!(compare.get(), vec!["a", "b", "c"]);
    }

    #[test]
    fn adding_twice_is_not_a_new_addition() {
        let storage = MemoryStorage::new();
        let favorites = BoundedSelectionSet::favorites(&storage);

        assert!(favorites.add("a"));
        assert!(!favorites.add("a"));
        assert_eq!(favorites.len(), 1);
    }

    #[test]
    fn toggle_adds_then_removes() {
        let storage = MemoryStorage::new();
        let compare = BoundedSelectionSet::compare(&storage);

        assert!(compare.toggle("a"));
        assert!(compare.has("a"));
        assert!(!compare.toggle("a"));
        assert!(!compare.has("a"));
    }

    #[test]
    fn toggle_reports_capacity_rejection() {
        let storage = MemoryStorage::new();
        let compare = BoundedSelectionSet::compare(&storage);
        for id in ["a", "b", "c"] {
            compare.add(id);
        }

        assert!(!compare.toggle("d"));
        assert!(!compare.has("d"));
        // Removing one frees a slot again.
        assert!(!compare.toggle("b"));
        assert!(compare.toggle("d"));
        assert_eq!(compare.get(), vec!["a", "c", "d"]);
    }

    #[test]
    fn corrupt_storage_reads_as_empty() {
        let storage = MemoryStorage::new().with_raw(COMPARE_KEY, "{not json");
        let compare = BoundedSelectionSet::compare(&storage);

        assert!(compare.get().is_empty());
        assert!(compare.can_add());
        assert!(compare.add("a"));
        assert_eq!(compare.get(), vec!["a"]);
    }

    #[test]
    fn favorites_have_no_cap() {
        let storage = MemoryStorage::new();
        let favorites = BoundedSelectionSet::favorites(&storage);

        for i in 0..50 {
            assert!(favorites.add(&format!("s-{i}")));
        }
        assert!(favorites.can_add());
        assert_eq!(favorites.len(), 50);
    }

    #[test]
    fn sets_do_not_share_keys() {
        let storage = MemoryStorage::new();
        let favorites = BoundedSelectionSet::favorites(&storage);
        let compare = BoundedSelectionSet::compare(&storage);

        favorites.add("a");
        assert!(!compare.has("a"));

        favorites.clear();
        assert!(favorites.is_empty());
        assert_eq!(storage.load(FAVORITES_KEY), None);
    }

    #[test]
    fn remove_of_absent_id_keeps_the_rest() {
        let storage = MemoryStorage::new();
        let favorites = BoundedSelectionSet::favorites(&storage);
        favorites.add("a");

        favorites.remove("zzz");

        assert_eq!(favorites.get(), vec!["a"]);
        assert_eq!(storage.load(FAVORITES_KEY).as_deref(), Some(r#"["a"]"#));
    }
}
