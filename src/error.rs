use crate::utils::datastruct::vector::TagId;

/// Errors raised while building or handling a TF-IDF model.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TfIdfError {
    /// An item carried a tag that the tag vocabulary does not know.
    /// The vocabulary and the item tags must come from the same snapshot.
    #[error("tag {tag:?} is not in the tag vocabulary")]
    VocabularyMismatch { tag: String },
    /// A sparse vector was asked to hold a key outside its key domain.
    #[error("key {0} is outside the vector key domain")]
    KeyNotInDomain(TagId),
    /// More distinct tags than tag ids can address.
    #[error("tag vocabulary of {0} entries exceeds the tag id range")]
    VocabularyOverflow(usize),
    /// Deserialized sparse vector data broke the sorted-key layout.
    #[error("malformed sparse vector: {0}")]
    MalformedVector(&'static str),
    /// Deserialized model data broke the tag id mapping.
    #[error("malformed model: {0}")]
    MalformedModel(&'static str),
}
