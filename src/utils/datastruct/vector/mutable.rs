use num::{Float, Num};

use crate::error::TfIdfError;

use super::{SparseVec, TagId};

/// Sparse vector over a fixed key domain.
///
/// Every key of the domain is either set (it holds a value) or unset.
/// Keys outside the domain can never be set.
/// `clear` only unsets keys, so one instance can be reused as a work buffer.
#[derive(Debug, Clone)]
pub struct MutableSparseVec<N>
where
    N: Num + Copy,
{
    /// sorted, deduplicated key domain
    keys: Box<[TagId]>,
    vals: Vec<N>,
    used: Vec<bool>,
    /// positions set since the last clear
    touched: Vec<usize>,
}

impl<N> MutableSparseVec<N>
where
    N: Num + Copy,
{
    /// Create an empty vector over the given key domain.
    /// Duplicate keys collapse into one.
    pub fn with_domain<I>(domain: I) -> Self
    where
        I: IntoIterator<Item = TagId>,
    {
        let mut keys: Vec<TagId> = domain.into_iter().collect();
        keys.sort_unstable();
        keys.dedup();
        let dim = keys.len();
        Self {
            keys: keys.into_boxed_slice(),
            vals: vec![N::zero(); dim],
            used: vec![false; dim],
            touched: Vec::new(),
        }
    }

    /// Build a vector whose domain is exactly the given keys, all of them set.
    ///
    /// `inds` must be strictly ascending and as long as `vals`.
    pub(crate) fn from_sorted(inds: Vec<TagId>, vals: Vec<N>) -> Self {
        debug_assert_eq!(inds.len(), vals.len(), "inds and vals must have the same length");
        debug_assert!(inds.windows(2).all(|w| w[0] < w[1]), "inds must be strictly ascending");
        let dim = inds.len();
        Self {
            keys: inds.into_boxed_slice(),
            vals,
            used: vec![true; dim],
            touched: (0..dim).collect(),
        }
    }

    #[inline]
    fn position(&self, key: TagId) -> Option<usize> {
        self.keys.binary_search(&key).ok()
    }

    /// Number of keys in the domain.
    #[inline]
    pub fn domain_len(&self) -> usize {
        self.keys.len()
    }

    /// Number of set keys.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.touched.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.touched.is_empty()
    }

    /// Whether `key` belongs to the domain, set or not.
    #[inline]
    pub fn in_domain(&self, key: TagId) -> bool {
        self.position(key).is_some()
    }

    /// Whether `key` is set.
    #[inline]
    pub fn contains_key(&self, key: TagId) -> bool {
        self.position(key).map_or(false, |pos| self.used[pos])
    }

    #[inline]
    pub fn get(&self, key: TagId) -> Option<N> {
        let pos = self.position(key)?;
        if self.used[pos] {
            Some(self.vals[pos])
        } else {
            None
        }
    }

    /// Set `key` to `value`, marking it set.
    pub fn set(&mut self, key: TagId, value: N) -> Result<(), TfIdfError> {
        let pos = self.position(key).ok_or(TfIdfError::KeyNotInDomain(key))?;
        self.vals[pos] = value;
        self.mark_used(pos);
        Ok(())
    }

    /// Add `value` to the entry at `key`; an unset key starts from zero.
    /// Returns the updated value.
    pub fn add(&mut self, key: TagId, value: N) -> Result<N, TfIdfError> {
        let pos = self.position(key).ok_or(TfIdfError::KeyNotInDomain(key))?;
        let new_val = if self.used[pos] {
            self.vals[pos] + value
        } else {
            value
        };
        self.vals[pos] = new_val;
        self.mark_used(pos);
        Ok(new_val)
    }

    #[inline]
    fn mark_used(&mut self, pos: usize) {
        if !self.used[pos] {
            self.used[pos] = true;
            self.touched.push(pos);
        }
    }

    /// Unset every key. The domain is kept.
    pub fn clear(&mut self) {
        for pos in self.touched.drain(..) {
            self.used[pos] = false;
            self.vals[pos] = N::zero();
        }
    }

    /// Set entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (TagId, N)> + '_ {
        self.keys
            .iter()
            .zip(self.vals.iter())
            .zip(self.used.iter())
            .filter(|(_, used)| **used)
            .map(|((key, val), _)| (*key, *val))
    }

    /// Rewrite every set value in place.
    pub fn map_values<F>(&mut self, mut f: F)
    where
        F: FnMut(TagId, N) -> N,
    {
        for &pos in &self.touched {
            self.vals[pos] = f(self.keys[pos], self.vals[pos]);
        }
    }

    /// Fallible `map_values`. On error the vector may be partially rewritten.
    pub fn try_map_values<F, E>(&mut self, mut f: F) -> Result<(), E>
    where
        F: FnMut(TagId, N) -> Result<N, E>,
    {
        for &pos in &self.touched {
            self.vals[pos] = f(self.keys[pos], self.vals[pos])?;
        }
        Ok(())
    }

    /// Copy of this vector whose domain is only the set keys.
    pub fn shrink_domain(&self) -> Self {
        let mut positions = self.touched.clone();
        positions.sort_unstable();
        let inds = positions.iter().map(|&pos| self.keys[pos]).collect();
        let vals = positions.iter().map(|&pos| self.vals[pos]).collect();
        Self::from_sorted(inds, vals)
    }

    /// Turn into an immutable vector holding the set entries.
    pub fn freeze(self) -> SparseVec<N> {
        let shrunk = if self.nnz() == self.domain_len() {
            self
        } else {
            self.shrink_domain()
        };
        SparseVec::from_sorted_unchecked(shrunk.keys.into_vec(), shrunk.vals)
    }
}

impl<N> MutableSparseVec<N>
where
    N: Float,
{
    /// Euclidean length over the set values. Zero when nothing is set.
    pub fn norm(&self) -> N {
        self.iter()
            .fold(N::zero(), |acc, (_, val)| acc + val * val)
            .sqrt()
    }
}
