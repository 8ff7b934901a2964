use std::iter::{Copied, Flatten, FusedIterator};
use std::slice;

use tracing::trace;

/// Minimum number of new fingerprint bits a key must contribute before it is
/// folded into the last bucket instead of opening a new one.
pub const DEFAULT_MIN_DIFF: u32 = 2;

/// Initial capacity of a freshly allocated bucket list.
pub const DEFAULT_LIST_CAPACITY: usize = 8;

/// Tuning constants for a [`Set`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetParams {
    /// See [`DEFAULT_MIN_DIFF`].
    pub min_diff: u32,
    /// See [`DEFAULT_LIST_CAPACITY`].
    pub list_capacity: usize,
}

impl Default for SetParams {
    fn default() -> Self {
        Self {
            min_diff: DEFAULT_MIN_DIFF,
            list_capacity: DEFAULT_LIST_CAPACITY,
        }
    }
}

/// Maps a key to the word it contributes to a bucket fingerprint.
///
/// This is a plain linear congruential step (Knuth's MMIX constants on 64-bit
/// targets, Numerical Recipes' on 32-bit ones). It only needs to spread bits
/// well enough for superset tests to reject most buckets; it is not a hash.
#[inline]
pub fn scramble(key: usize) -> usize {
    #[cfg(target_pointer_width = "64")]
    {
        6364136223846793005usize
            .wrapping_mul(key)
            .wrapping_add(1442695040888963407)
    }
    #[cfg(not(target_pointer_width = "64"))]
    {
        1664525usize.wrapping_mul(key).wrapping_add(1013904223)
    }
}

/// A reusable set of machine-word keys, meant for marking nodes as visited
/// during a graph traversal where keys are usually object addresses.
///
/// Keys are kept in a list of buckets. Each bucket has a one-word fingerprint,
/// the OR of the scrambled form of every key stored in it, so a probe only
/// scans the buckets whose fingerprint covers every bit of the probe's own
/// scrambled key.
///
/// [`Set::reset`] empties the set but keeps every allocation, so a set that is
/// reset between traversals stops allocating once it has seen its largest
/// workload. The default value is ready to use and allocates nothing.
///
/// Mutating a set from several threads needs external locking, just like
/// any other `&mut` access.
///
/// Cloning keeps the capacity of every bucket list, including lists left
/// empty by a reset, so a clone reuses memory the same way the original does.
///
/// # Examples
///
/// ```
/// use visitset::Set;
///
/// let mut s = Set::new();
/// assert!(!s.contains(1));
/// assert!(s.add(1));
/// assert!(s.contains(1));
/// assert!(!s.add(1));
/// s.reset();
/// assert!(s.add(1));
/// ```
#[derive(Debug, Default)]
pub struct Set {
    // One fingerprint per live bucket.
    filters: Vec<usize>,
    // Member lists, parallel to `filters`. Lists past `filters.len()` are
    // empty and kept around from before the last reset.
    lists: Vec<Vec<usize>>,
    params: SetParams,
}

impl Set {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: SetParams) -> Self {
        Self {
            filters: Vec::new(),
            lists: Vec::new(),
            params,
        }
    }

    pub fn params(&self) -> SetParams {
        self.params
    }

    /// Adds `key` to the set. Returns `false` if it was already present.
    ///
    /// The key goes into the first bucket whose fingerprint already covers
    /// it. Only the last bucket's fingerprint ever gains bits, so once a key
    /// lands in bucket `i` no earlier bucket can start covering it later, and
    /// checking that first covering bucket is enough to rule out a duplicate.
    pub fn add(&mut self, key: usize) -> bool {
        let r = scramble(key);
        for (&filter, list) in self.filters.iter().zip(self.lists.iter_mut()) {
            if filter & r == r {
                if list.contains(&key) {
                    return false;
                }
                list.push(key);
                return true;
            }
        }

        match self.filters.len().checked_sub(1) {
            Some(last) if (r & !self.filters[last]).count_ones() >= self.params.min_diff => {
                self.filters[last] |= r;
                self.lists[last].push(key);
            }
            _ => self.open_bucket(r, key),
        }
        true
    }

    fn open_bucket(&mut self, filter: usize, key: usize) {
        let index = self.filters.len();
        self.filters.push(filter);
        match self.lists.get_mut(index) {
            Some(list) => {
                debug_assert!(list.is_empty());
                list.push(key);
            }
            None => {
                trace!(
                    bucket = index,
                    capacity = self.params.list_capacity,
                    "allocating bucket list"
                );
                let mut list = Vec::with_capacity(self.params.list_capacity);
                list.push(key);
                self.lists.push(list);
            }
        }
    }

    /// Returns `true` if `key` has been added since the last reset.
    ///
    /// Every covering bucket is scanned: a fingerprint can cover keys its
    /// bucket does not hold.
    pub fn contains(&self, key: usize) -> bool {
        let r = scramble(key);
        self.filters
            .iter()
            .zip(&self.lists)
            .any(|(&filter, list)| filter & r == r && list.contains(&key))
    }

    /// Adds the address of `value`. See [`Set::add`].
    pub fn add_addr<T: ?Sized>(&mut self, value: &T) -> bool {
        self.add(addr(value))
    }

    pub fn contains_addr<T: ?Sized>(&self, value: &T) -> bool {
        self.contains(addr(value))
    }

    /// Removes all keys. Every bucket list keeps its allocation and is handed
    /// out again, in order, as new buckets are opened.
    pub fn reset(&mut self) {
        self.filters.clear();
        for list in &mut self.lists {
            list.clear();
        }
    }

    /// Collects the keys, bucket by bucket in insertion order within each
    /// bucket. Returns `None` when the set is empty.
    pub fn keys(&self) -> Option<Vec<usize>> {
        if self.filters.is_empty() {
            return None;
        }
        Some(self.iter().collect())
    }

    pub fn iter(&self) -> Keys<'_> {
        Keys {
            inner: self.lists[..self.filters.len()].iter().flatten().copied(),
        }
    }

    /// Number of keys. Walks every bucket.
    pub fn len(&self) -> usize {
        self.lists[..self.filters.len()].iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        self.filters.len()
    }
}

impl Clone for Set {
    fn clone(&self) -> Self {
        let lists = self
            .lists
            .iter()
            .map(|list| {
                let mut copy = Vec::with_capacity(list.capacity());
                copy.extend_from_slice(list);
                copy
            })
            .collect();
        Self {
            filters: self.filters.clone(),
            lists,
            params: self.params,
        }
    }
}

#[inline]
fn addr<T: ?Sized>(value: &T) -> usize {
    (value as *const T).cast::<()>() as usize
}

impl Extend<usize> for Set {
    fn extend<I: IntoIterator<Item = usize>>(&mut self, iter: I) {
        for key in iter {
            self.add(key);
        }
    }
}

impl FromIterator<usize> for Set {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = Set::new();
        set.extend(iter);
        set
    }
}

impl<'a> IntoIterator for &'a Set {
    type Item = usize;
    type IntoIter = Keys<'a>;

    fn into_iter(self) -> Keys<'a> {
        self.iter()
    }
}

/// Iterator over the keys of a [`Set`], created by [`Set::iter`].
#[derive(Clone, Debug)]
pub struct Keys<'a> {
    inner: Copied<Flatten<slice::Iter<'a, Vec<usize>>>>,
}

impl Iterator for Keys<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl FusedIterator for Keys<'_> {}
