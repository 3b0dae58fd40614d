/// This crate builds TF-IDF item vectors from tag data for content-based recommendation.
pub mod vectorizer;
pub mod utils;
pub mod error;

/// TF-IDF Model Builder
/// The entry point of this crate. It reads items and their tags from an
/// `ItemTagSource` and computes a `TfIdfModel` in one batch.
///
/// The build runs in three stages:
/// - Tag indexing: every distinct tag gets a dense id starting at 1
/// - Frequency accumulation: per-item term frequency and corpus-wide
///   document frequency, in a single pass over the items
/// - Normalization: document frequency becomes `ln(items / df)`, and each
///   item vector is IDF-weighted and divided by its raw term-frequency norm
///
/// `build` runs on the current thread; `build_par` spreads the per-item work
/// over the rayon pool and produces the same vectors.
///
/// A tag occurrence that the vocabulary does not list aborts the build with
/// `TfIdfError::VocabularyMismatch`. No partial model is returned.
pub use vectorizer::builder::TfIdfModelBuilder;

/// TF-IDF Model
/// The immutable result of a build. It holds:
/// - The tag string to tag id mapping
/// - One frozen sparse vector per item, keyed by item id
///
/// Tag ids are only meaningful within one model; use `item_tag_weights` to
/// compare items across builds.
///
/// # Serialization
/// Supported through serde. No file format is fixed by this crate.
pub use vectorizer::model::TfIdfModel;

/// Item/Tag Source
/// The data a build reads from: the tag vocabulary, the item ids, and the tag
/// occurrences of each item. `MemoryItemTagSource` keeps all of it in memory.
pub use vectorizer::source::{ItemTagSource, MemoryItemTagSource};

/// Tag Vocabulary
/// Bijection between tag strings and dense tag ids.
pub use vectorizer::vocab::TagVocabulary;

/// Sparse Vectors
/// - `MutableSparseVec`: vector over a fixed key domain, with set/add/clear,
///   used as the accumulation buffer
/// - `SparseVec`: frozen, key-sorted vector stored in the model
pub use utils::datastruct::vector::{MutableSparseVec, SparseVec, TagId};

/// Error Type
/// Every fallible operation of this crate returns `TfIdfError`:
/// - `VocabularyMismatch`: an item tag missing from the vocabulary, which
///   aborts the build
/// - `KeyNotInDomain`: a sparse vector key outside its key domain
/// - `VocabularyOverflow`: more distinct tags than `TagId` can address
/// - `MalformedVector` / `MalformedModel`: deserialized data that breaks the
///   sorted-key layout or the tag id mapping
pub use error::TfIdfError;
