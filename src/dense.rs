use std::iter::FusedIterator;
use std::slice;

use num_traits::PrimInt;
use tracing::trace;

use crate::KeyError;

/// Number of keys held by one backing word.
pub const WORD_BITS: usize = usize::BITS as usize;

/// A set of small non-negative integers backed by one contiguous block of
/// words starting at key 0.
///
/// Suited to dense key ranges such as node indices `0..n`. Like
/// [`Set`](crate::Set), the default value is ready to use and
/// [`Dense::reset`] keeps the backing allocation for the next use.
///
/// # Examples
///
/// ```
/// use visitset::Dense;
///
/// let mut s = Dense::new();
/// assert!(!s.contains(1));
/// s.add(1);
/// assert!(s.contains(1));
/// s.reset();
/// assert!(!s.contains(1));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Dense {
    words: Vec<usize>,
}

fn index<K: PrimInt>(key: K) -> Result<usize, KeyError> {
    if key < K::zero() {
        return Err(KeyError::Negative);
    }
    key.to_usize().ok_or(KeyError::Overflow)
}

impl Dense {
    pub const fn new() -> Self {
        Self { words: Vec::new() }
    }

    /// Creates a set that can hold every key up to and including `max_key`
    /// without reallocating. The argument is a key, not a count.
    ///
    /// # Panics
    ///
    /// Panics if `max_key` is negative or larger than `usize::MAX`.
    pub fn with_max_key<K: PrimInt>(max_key: K) -> Self {
        let mut set = Self::new();
        set.grow(max_key);
        set
    }

    /// Adds `key` to the set.
    ///
    /// # Panics
    ///
    /// Panics if `key` is negative or larger than `usize::MAX`. Use
    /// [`Dense::try_add`] to handle those keys.
    pub fn add<K: PrimInt>(&mut self, key: K) {
        if let Err(err) = self.try_add(key) {
            panic!("{err}");
        }
    }

    /// Adds `key` to the set, or leaves the set untouched and returns an
    /// error if `key` has no slot.
    pub fn try_add<K: PrimInt>(&mut self, key: K) -> Result<(), KeyError> {
        let i = index(key)?;
        let w = i / WORD_BITS;
        if w >= self.words.len() {
            self.grow_words(w + 1);
        }
        self.words[w] |= 1usize << (i % WORD_BITS);
        Ok(())
    }

    /// Returns `true` if `key` is in the set. Never grows the set; keys that
    /// cannot be stored are never contained.
    pub fn contains<K: PrimInt>(&self, key: K) -> bool {
        let Ok(i) = index(key) else {
            return false;
        };
        self.words
            .get(i / WORD_BITS)
            .is_some_and(|&w| w & (1usize << (i % WORD_BITS)) != 0)
    }

    /// Makes room for every key up to and including `key` without setting
    /// any of them.
    ///
    /// # Panics
    ///
    /// Panics if `key` is negative or larger than `usize::MAX`.
    pub fn grow<K: PrimInt>(&mut self, key: K) {
        if let Err(err) = self.try_grow(key) {
            panic!("{err}");
        }
    }

    pub fn try_grow<K: PrimInt>(&mut self, key: K) -> Result<(), KeyError> {
        let i = index(key)?;
        self.grow_words(i / WORD_BITS + 1);
        Ok(())
    }

    // Like `grow`, but in words rather than keys.
    fn grow_words(&mut self, w: usize) {
        if w > self.words.capacity() {
            trace!(
                from = self.words.capacity(),
                to = w,
                "reallocating dense words"
            );
            let mut words = Vec::with_capacity(w);
            words.extend_from_slice(&self.words);
            words.resize(w, 0);
            self.words = words;
        } else if w > self.words.len() {
            // Words past the current length may hold bits from before a
            // reset, so they are zeroed as they are exposed.
            self.words.resize(w, 0);
        }
    }

    /// Removes all keys, keeping the backing allocation.
    pub fn reset(&mut self) {
        self.words.clear();
    }

    /// Number of keys the set can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.words.capacity() * WORD_BITS
    }

    /// Number of keys in the set.
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Iterates over the keys in ascending order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            words: self.words.iter(),
            base: 0,
            next_base: 0,
            current: 0,
        }
    }
}

// Trailing zero words only record how far the set has grown.
fn trimmed(words: &[usize]) -> &[usize] {
    let live = words.iter().rposition(|&w| w != 0).map_or(0, |i| i + 1);
    &words[..live]
}

impl PartialEq for Dense {
    fn eq(&self, other: &Self) -> bool {
        trimmed(&self.words) == trimmed(&other.words)
    }
}

impl Eq for Dense {}

impl Extend<usize> for Dense {
    fn extend<I: IntoIterator<Item = usize>>(&mut self, iter: I) {
        for key in iter {
            self.add(key);
        }
    }
}

impl FromIterator<usize> for Dense {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = Dense::new();
        set.extend(iter);
        set
    }
}

impl<'a> IntoIterator for &'a Dense {
    type Item = usize;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Iterator over the keys of a [`Dense`] set, created by [`Dense::iter`].
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    words: slice::Iter<'a, usize>,
    base: usize,
    next_base: usize,
    current: usize,
}

impl Iterator for Iter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.current == 0 {
            self.current = *self.words.next()?;
            self.base = self.next_base;
            self.next_base += WORD_BITS;
        }
        let bit = self.current.trailing_zeros() as usize;
        self.current &= self.current - 1;
        Some(self.base + bit)
    }
}

impl FusedIterator for Iter<'_> {}
