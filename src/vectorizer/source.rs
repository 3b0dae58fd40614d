use std::{fmt::Debug, hash::Hash};

use indexmap::{IndexMap, IndexSet};

/// Where a model build reads items and their tags from.
///
/// The three views must come from one consistent snapshot:
/// every tag returned by `item_tags` has to be in `tag_vocabulary`.
pub trait ItemTagSource {
    type ItemId: Clone + Eq + Hash + Debug;

    /// Distinct tag strings across the whole corpus.
    fn tag_vocabulary(&self) -> Vec<String>;
    /// Every item identifier.
    fn item_ids(&self) -> Vec<Self::ItemId>;
    /// Tag occurrences of one item. Repeats count, order does not.
    fn item_tags(&self, item: &Self::ItemId) -> Vec<String>;
}

/// Item tags held in memory, in insertion order.
#[derive(Debug, Clone)]
pub struct MemoryItemTagSource<K = u64>
where
    K: Clone + Eq + Hash,
{
    items: IndexMap<K, Vec<String>>,
}

impl<K> Default for MemoryItemTagSource<K>
where
    K: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> MemoryItemTagSource<K>
where
    K: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            items: IndexMap::new(),
        }
    }

    /// Register an item with no tags (if it is not already present).
    pub fn add_item(&mut self, item: K) -> &mut Self {
        self.items.entry(item).or_default();
        self
    }

    /// Append tag occurrences to an item, registering it if needed.
    pub fn add_tags<T>(&mut self, item: K, tags: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        self.items
            .entry(item)
            .or_default()
            .extend(tags.iter().map(|tag| tag.as_ref().to_string()));
        self
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

impl<K, T> FromIterator<(K, Vec<T>)> for MemoryItemTagSource<K>
where
    K: Clone + Eq + Hash,
    T: AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = (K, Vec<T>)>>(iter: I) -> Self {
        let mut source = Self::new();
        for (item, tags) in iter {
            source.add_tags(item, &tags);
        }
        source
    }
}

impl<K> ItemTagSource for MemoryItemTagSource<K>
where
    K: Clone + Eq + Hash + Debug,
{
    type ItemId = K;

    fn tag_vocabulary(&self) -> Vec<String> {
        let vocab: IndexSet<&str> = self
            .items
            .values()
            .flat_map(|tags| tags.iter().map(String::as_str))
            .collect();
        vocab.into_iter().map(str::to_string).collect()
    }

    fn item_ids(&self) -> Vec<K> {
        self.items.keys().cloned().collect()
    }

    fn item_tags(&self, item: &K) -> Vec<String> {
        self.items.get(item).cloned().unwrap_or_default()
    }
}
