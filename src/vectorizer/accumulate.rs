use log::{debug, trace};

use crate::{
    error::TfIdfError,
    utils::datastruct::vector::{MutableSparseVec, TagId},
    vectorizer::vocab::TagVocabulary,
};

/// Builds term-frequency vectors item by item while counting document frequency.
///
/// One work vector over the whole vocabulary is reused for every item.
/// Document frequency counts the items carrying a tag, not its occurrences.
#[derive(Debug)]
pub struct FrequencyAccumulator<'v> {
    vocab: &'v TagVocabulary,
    doc_freq: MutableSparseVec<f64>,
    work: MutableSparseVec<f64>,
    item_count: usize,
}

impl<'v> FrequencyAccumulator<'v> {
    pub fn new(vocab: &'v TagVocabulary) -> Self {
        Self {
            vocab,
            doc_freq: MutableSparseVec::with_domain(vocab.ids()),
            work: MutableSparseVec::with_domain(vocab.ids()),
            item_count: 0,
        }
    }

    /// Count one item's tag occurrences.
    ///
    /// Returns the item's term-frequency vector, shrunk to the tags it carries.
    /// A tag missing from the vocabulary aborts with `VocabularyMismatch`;
    /// the accumulator must then be discarded.
    pub fn add_item<T>(&mut self, tags: &[T]) -> Result<MutableSparseVec<f64>, TfIdfError>
    where
        T: AsRef<str>,
    {
        self.work.clear();
        for tag in tags {
            let tag_id = self.vocab.require_id(tag.as_ref())?;
            if self.work.contains_key(tag_id) {
                self.work.add(tag_id, 1.0)?;
            } else {
                self.work.set(tag_id, 1.0)?;
                self.doc_freq.add(tag_id, 1.0)?;
            }
        }
        self.item_count += 1;
        trace!("item #{}: {} occurrences, {} distinct tags", self.item_count, tags.len(), self.work.nnz());
        Ok(self.work.shrink_domain())
    }

    /// Number of items counted so far.
    #[inline]
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Document frequency so far.
    #[inline]
    pub fn doc_freq(&self) -> &MutableSparseVec<f64> {
        &self.doc_freq
    }

    /// Hand over the document-frequency vector and the item count.
    pub fn finish(self) -> (MutableSparseVec<f64>, usize) {
        debug!(
            "accumulated {} items over {} tags ({} tags in use)",
            self.item_count,
            self.vocab.len(),
            self.doc_freq.nnz()
        );
        (self.doc_freq, self.item_count)
    }
}

/// Term-frequency vector of one item on its own, without a shared work buffer.
///
/// Equal to what `FrequencyAccumulator::add_item` returns for the same tags.
pub fn term_frequency<T>(vocab: &TagVocabulary, tags: &[T]) -> Result<MutableSparseVec<f64>, TfIdfError>
where
    T: AsRef<str>,
{
    let mut ids = tags
        .iter()
        .map(|tag| vocab.require_id(tag.as_ref()))
        .collect::<Result<Vec<TagId>, _>>()?;
    ids.sort_unstable();

    let mut inds: Vec<TagId> = Vec::new();
    let mut vals: Vec<f64> = Vec::new();
    for id in ids {
        match inds.last() {
            Some(&last) if last == id => {
                if let Some(count) = vals.last_mut() {
                    *count += 1.0;
                }
            }
            _ => {
                inds.push(id);
                vals.push(1.0);
            }
        }
    }
    Ok(MutableSparseVec::from_sorted(inds, vals))
}
