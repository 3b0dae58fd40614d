use log::trace;

use crate::{
    error::TfIdfError,
    utils::datastruct::vector::{MutableSparseVec, SparseVec},
};

/// Turn document frequency into log-IDF, `ln(item_count / df)`, in place.
///
/// Only tags seen at least once are set in `doc_freq`, so `df` is never zero.
/// A tag carried by every item gets an IDF of zero.
pub fn inverse_document_frequency(mut doc_freq: MutableSparseVec<f64>, item_count: usize) -> SparseVec<f64> {
    let n = item_count as f64;
    doc_freq.map_values(|_, df| (n / df).ln());
    doc_freq.freeze()
}

/// Weight a raw term-frequency vector by IDF and scale it.
///
/// Each entry becomes `tf * idf / L`, where `L` is the Euclidean norm of the
/// raw term frequencies before weighting. The result is only near unit length
/// when IDF is not uniform; this is the fixed model output and must not be
/// renormalized by the post-IDF norm.
///
/// An empty vector stays empty and `L` is never divided by.
pub fn weight_and_normalize(mut tf: MutableSparseVec<f64>, idf: &SparseVec<f64>) -> Result<SparseVec<f64>, TfIdfError> {
    let raw_norm = tf.norm();
    tf.try_map_values(|tag_id, count| {
        let weight = idf.get(tag_id).ok_or(TfIdfError::KeyNotInDomain(tag_id))?;
        let value = count * weight / raw_norm;
        trace!("tag {tag_id}: tf {count}, idf {weight}, raw norm {raw_norm} -> {value}");
        Ok(value)
    })?;
    Ok(tf.freeze())
}
