use indexmap::{IndexMap, IndexSet};
use log::{debug, error, info};
use rayon::prelude::*;

use crate::{
    error::TfIdfError,
    utils::datastruct::vector::MutableSparseVec,
    vectorizer::{
        accumulate::{term_frequency, FrequencyAccumulator},
        model::TfIdfModel,
        normalize::{inverse_document_frequency, weight_and_normalize},
        source::ItemTagSource,
        vocab::TagVocabulary,
    },
};

/// Computes a `TfIdfModel` from an item/tag source.
///
/// Every build starts from scratch: tags are indexed, term and document
/// frequencies are counted in one pass over the items, document frequency
/// becomes log-IDF, and each item vector is weighted and scaled.
/// The builder only borrows the source; the model keeps no reference to it.
#[derive(Debug)]
pub struct TfIdfModelBuilder<'a, S>
where
    S: ItemTagSource,
{
    source: &'a S,
}

impl<'a, S> TfIdfModelBuilder<'a, S>
where
    S: ItemTagSource,
{
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    fn index_tags(&self) -> Result<TagVocabulary, TfIdfError> {
        let vocab = TagVocabulary::index(self.source.tag_vocabulary())?;
        info!("indexed {} distinct tags", vocab.len());
        Ok(vocab)
    }

    /// Item universe with repeated ids collapsed, in source order.
    fn item_universe(&self) -> IndexSet<S::ItemId> {
        let items: IndexSet<S::ItemId> = self.source.item_ids().into_iter().collect();
        info!("building vectors for {} items", items.len());
        items
    }

    /// Build the model on the current thread.
    ///
    /// Fails with `VocabularyMismatch` if any item carries a tag the
    /// vocabulary does not list; no partial model is returned.
    pub fn build(&self) -> Result<TfIdfModel<S::ItemId>, TfIdfError> {
        let vocab = self.index_tags()?;
        let items = self.item_universe();

        let mut acc = FrequencyAccumulator::new(&vocab);
        let mut tf_vectors = IndexMap::with_capacity(items.len());
        for item in items {
            let tags = self.source.item_tags(&item);
            let tf = acc.add_item(&tags).map_err(|e| {
                error!("item {:?}: {}", item, e);
                e
            })?;
            debug!("item {:?}: {} distinct tags", item, tf.nnz());
            tf_vectors.insert(item, tf);
        }
        let (doc_freq, item_count) = acc.finish();

        let idf = inverse_document_frequency(doc_freq, item_count);
        let mut item_vectors = IndexMap::with_capacity(tf_vectors.len());
        for (item, tf) in tf_vectors {
            item_vectors.insert(item, weight_and_normalize(tf, &idf)?);
        }

        Ok(TfIdfModel::new(vocab, item_vectors))
    }

    /// Build the model with per-item work spread over the rayon pool.
    ///
    /// Produces the same vectors as `build`.
    pub fn build_par(&self) -> Result<TfIdfModel<S::ItemId>, TfIdfError>
    where
        S: Sync,
        S::ItemId: Send + Sync,
    {
        let vocab = self.index_tags()?;
        let items: Vec<S::ItemId> = self.item_universe().into_iter().collect();

        let tf_vectors = items
            .par_iter()
            .map(|item| {
                let tags = self.source.item_tags(item);
                let tf = term_frequency(&vocab, &tags).map_err(|e| {
                    error!("item {:?}: {}", item, e);
                    e
                })?;
                debug!("item {:?}: {} distinct tags", item, tf.nnz());
                Ok::<_, TfIdfError>(tf)
            })
            .collect::<Result<Vec<MutableSparseVec<f64>>, TfIdfError>>()?;

        let mut doc_freq = MutableSparseVec::with_domain(vocab.ids());
        for tf in &tf_vectors {
            for (tag_id, _) in tf.iter() {
                doc_freq.add(tag_id, 1.0)?;
            }
        }
        debug!("accumulated {} items over {} tags ({} tags in use)", items.len(), vocab.len(), doc_freq.nnz());

        let idf = inverse_document_frequency(doc_freq, items.len());
        let item_vectors = items
            .into_par_iter()
            .zip(tf_vectors.into_par_iter())
            .map(|(item, tf)| weight_and_normalize(tf, &idf).map(|vec| (item, vec)))
            .collect::<Result<Vec<_>, TfIdfError>>()?;

        Ok(TfIdfModel::new(vocab, item_vectors.into_iter().collect()))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::vectorizer::source::MemoryItemTagSource;

    struct Broken;

    impl ItemTagSource for Broken {
        type ItemId = u64;

        fn tag_vocabulary(&self) -> Vec<String> {
            vec!["comedy".to_string()]
        }

        fn item_ids(&self) -> Vec<u64> {
            vec![1, 2]
        }

        fn item_tags(&self, item: &u64) -> Vec<String> {
            match item {
                1 => vec!["comedy".to_string()],
                _ => vec!["comedy".to_string(), "western".to_string()],
            }
        }
    }

    #[test]
    fn mismatch_aborts_both_builds() {
        let builder = TfIdfModelBuilder::new(&Broken);
        assert_matches!(builder.build(), Err(TfIdfError::VocabularyMismatch { tag }) if tag == "western");
        assert_matches!(builder.build_par(), Err(TfIdfError::VocabularyMismatch { tag }) if tag == "western");
    }

    #[test]
    fn repeated_item_ids_count_once() {
        struct Repeats;
        impl ItemTagSource for Repeats {
            type ItemId = u64;
            fn tag_vocabulary(&self) -> Vec<String> {
                vec!["a".to_string(), "b".to_string()]
            }
            fn item_ids(&self) -> Vec<u64> {
                vec![1, 2, 1]
            }
            fn item_tags(&self, item: &u64) -> Vec<String> {
                match item {
                    1 => vec!["a".to_string()],
                    _ => vec!["a".to_string(), "b".to_string()],
                }
            }
        }

        let model = TfIdfModelBuilder::new(&Repeats).build().unwrap();
        assert_eq!(model.num_items(), 2);
        // "a" is on both distinct items, so its weight is zero
        let a = model.tag_id("a").unwrap();
        assert_eq!(model.item_vector(&1).unwrap().get(a), Some(0.0));
    }

    #[test]
    fn empty_source_builds_empty_model() {
        let source: MemoryItemTagSource = MemoryItemTagSource::new();
        let model = TfIdfModelBuilder::new(&source).build().unwrap();
        assert_eq!(model.num_tags(), 0);
        assert_eq!(model.num_items(), 0);

        let model = TfIdfModelBuilder::new(&source).build_par().unwrap();
        assert_eq!(model.num_items(), 0);
    }
}
