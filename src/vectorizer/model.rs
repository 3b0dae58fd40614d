use std::hash::Hash;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    error::TfIdfError,
    utils::datastruct::vector::{SparseVec, TagId},
    vectorizer::vocab::TagVocabulary,
};

/// Built TF-IDF model: the tag id mapping and one frozen vector per item.
///
/// Read-only once built. Tags that were not in the corpus at build time are
/// simply absent from every lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    try_from = "TfIdfModelData<K>",
    bound(deserialize = "K: Deserialize<'de> + Eq + Hash")
)]
pub struct TfIdfModel<K = u64>
where
    K: Eq + Hash,
{
    vocab: TagVocabulary,
    item_vectors: IndexMap<K, SparseVec<f64>>,
}

/// Unchecked wire shape of `TfIdfModel`
#[derive(Deserialize)]
#[serde(bound(deserialize = "K: Deserialize<'de> + Eq + Hash"))]
struct TfIdfModelData<K>
where
    K: Eq + Hash,
{
    vocab: TagVocabulary,
    item_vectors: IndexMap<K, SparseVec<f64>>,
}

impl<K> TryFrom<TfIdfModelData<K>> for TfIdfModel<K>
where
    K: Eq + Hash,
{
    type Error = TfIdfError;

    fn try_from(data: TfIdfModelData<K>) -> Result<Self, Self::Error> {
        let max_id = data.vocab.len();
        let out_of_range = data
            .item_vectors
            .values()
            .flat_map(|vec| vec.keys())
            .any(|&id| id == 0 || id as usize > max_id);
        if out_of_range {
            return Err(TfIdfError::MalformedModel("item vector key outside the tag id range"));
        }
        Ok(Self::new(data.vocab, data.item_vectors))
    }
}

impl<K> TfIdfModel<K>
where
    K: Eq + Hash,
{
    pub(crate) fn new(vocab: TagVocabulary, item_vectors: IndexMap<K, SparseVec<f64>>) -> Self {
        Self { vocab, item_vectors }
    }

    #[inline]
    pub fn tag_id(&self, tag: &str) -> Option<TagId> {
        self.vocab.id(tag)
    }

    #[inline]
    pub fn tag_name(&self, id: TagId) -> Option<&str> {
        self.vocab.name(id)
    }

    /// `(tag, id)` pairs in id order.
    pub fn tags(&self) -> impl Iterator<Item = (&str, TagId)> {
        self.vocab.iter()
    }

    #[inline]
    pub fn item_vector(&self, item: &K) -> Option<&SparseVec<f64>> {
        self.item_vectors.get(item)
    }

    pub fn item_ids(&self) -> impl Iterator<Item = &K> {
        self.item_vectors.keys()
    }

    #[inline]
    pub fn num_tags(&self) -> usize {
        self.vocab.len()
    }

    #[inline]
    pub fn num_items(&self) -> usize {
        self.item_vectors.len()
    }

    pub fn vocabulary(&self) -> &TagVocabulary {
        &self.vocab
    }

    /// An item's weights keyed by tag string instead of tag id.
    /// Stable across builds, unlike the ids themselves.
    pub fn item_tag_weights(&self, item: &K) -> Option<Vec<(&str, f64)>> {
        let vec = self.item_vector(item)?;
        Some(
            vec.iter()
                .filter_map(|(id, weight)| self.vocab.name(id).map(|tag| (tag, weight)))
                .collect(),
        )
    }
}
