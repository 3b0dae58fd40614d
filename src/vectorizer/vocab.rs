use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::{error::TfIdfError, utils::datastruct::vector::TagId};

/// Bijection between tag strings and dense tag ids.
///
/// Ids are assigned in enumeration order, starting at 1,
/// so the id of a tag is its position in the set plus one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "TagVocabularyData")]
pub struct TagVocabulary {
    tags: IndexSet<Box<str>>,
}

/// Unchecked wire shape of `TagVocabulary`
#[derive(Deserialize)]
struct TagVocabularyData {
    tags: Vec<Box<str>>,
}

impl TryFrom<TagVocabularyData> for TagVocabulary {
    type Error = TfIdfError;

    fn try_from(data: TagVocabularyData) -> Result<Self, Self::Error> {
        let len = data.tags.len();
        if TagId::try_from(len).is_err() {
            return Err(TfIdfError::VocabularyOverflow(len));
        }
        let tags: IndexSet<Box<str>> = data.tags.into_iter().collect();
        // a repeat would shift the id of every later tag
        if tags.len() != len {
            return Err(TfIdfError::MalformedModel("repeated tag in vocabulary"));
        }
        Ok(Self { tags })
    }
}

impl TagVocabulary {
    /// Assign ids to the given tags. Repeated tags share one id.
    pub fn index<I, T>(tags: I) -> Result<Self, TfIdfError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let tags: IndexSet<Box<str>> = tags
            .into_iter()
            .map(|tag| Box::from(tag.as_ref()))
            .collect();
        if TagId::try_from(tags.len()).is_err() {
            return Err(TfIdfError::VocabularyOverflow(tags.len()));
        }
        Ok(Self { tags })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    #[inline]
    pub fn id(&self, tag: &str) -> Option<TagId> {
        // index() guarantees len fits in TagId
        self.tags.get_index_of(tag).map(|idx| idx as TagId + 1)
    }

    /// Like `id`, but an unknown tag is a vocabulary mismatch.
    #[inline]
    pub fn require_id(&self, tag: &str) -> Result<TagId, TfIdfError> {
        self.id(tag).ok_or_else(|| TfIdfError::VocabularyMismatch {
            tag: tag.to_string(),
        })
    }

    #[inline]
    pub fn name(&self, id: TagId) -> Option<&str> {
        let idx = (id as usize).checked_sub(1)?;
        self.tags.get_index(idx).map(|tag| tag.as_ref())
    }

    /// Every assigned id, ascending.
    pub fn ids(&self) -> impl Iterator<Item = TagId> + Clone {
        1..=self.tags.len() as TagId
    }

    /// `(tag, id)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, TagId)> {
        self.tags
            .iter()
            .enumerate()
            .map(|(idx, tag)| (tag.as_ref(), idx as TagId + 1))
    }
}
