use std::{cmp::Ordering, ops::AddAssign};

use num::{Float, Num};
use serde::{Deserialize, Serialize};

use crate::error::TfIdfError;

use super::TagId;

/// Immutable sparse vector.
///
/// Holds `inds` and `vals` side by side; `inds` is strictly ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SparseVecData<N>", bound(deserialize = "N: Deserialize<'de>"))]
pub struct SparseVec<N> {
    inds: Box<[TagId]>,
    vals: Box<[N]>,
}

/// Unchecked wire shape of `SparseVec`
#[derive(Deserialize)]
struct SparseVecData<N> {
    inds: Vec<TagId>,
    vals: Vec<N>,
}

impl<N> TryFrom<SparseVecData<N>> for SparseVec<N> {
    type Error = TfIdfError;

    fn try_from(data: SparseVecData<N>) -> Result<Self, Self::Error> {
        if data.inds.len() != data.vals.len() {
            return Err(TfIdfError::MalformedVector("inds and vals length mismatch"));
        }
        if data.inds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(TfIdfError::MalformedVector("inds must be strictly ascending"));
        }
        Ok(Self::from_sorted_unchecked(data.inds, data.vals))
    }
}

impl<N> SparseVec<N> {
    #[inline]
    pub(crate) fn from_sorted_unchecked(inds: Vec<TagId>, vals: Vec<N>) -> Self {
        Self {
            inds: inds.into_boxed_slice(),
            vals: vals.into_boxed_slice(),
        }
    }

    #[inline]
    pub fn nnz(&self) -> usize {
        self.inds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inds.is_empty()
    }

    #[inline]
    pub fn keys(&self) -> &[TagId] {
        &self.inds
    }

    #[inline]
    pub fn values(&self) -> &[N] {
        &self.vals
    }

    #[inline]
    pub fn contains_key(&self, key: TagId) -> bool {
        self.inds.binary_search(&key).is_ok()
    }
}

impl<N> SparseVec<N>
where
    N: Num + Copy,
{
    #[inline]
    pub fn get(&self, key: TagId) -> Option<N> {
        self.inds.binary_search(&key).ok().map(|pos| self.vals[pos])
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (TagId, N)> + '_ {
        self.inds.iter().copied().zip(self.vals.iter().copied())
    }

    /// Dot product by merge join over the sorted keys.
    pub fn dot(&self, other: &Self) -> N
    where
        N: AddAssign,
    {
        let mut result = N::zero();
        let (mut i, mut j) = (0, 0);
        while i < self.inds.len() && j < other.inds.len() {
            match self.inds[i].cmp(&other.inds[j]) {
                Ordering::Equal => {
                    result += self.vals[i] * other.vals[j];
                    i += 1;
                    j += 1;
                }
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
            }
        }
        result
    }
}

impl<N> SparseVec<N>
where
    N: Float,
{
    pub fn norm(&self) -> N {
        self.vals
            .iter()
            .fold(N::zero(), |acc, &val| acc + val * val)
            .sqrt()
    }
}
