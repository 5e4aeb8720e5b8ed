//! Thread-safe set of security identifiers.

use std::collections::HashSet;

use parking_lot::Mutex;

/// A mutex-guarded set of security identifiers with set-algebra
/// operations. Two instances are kept by the adapter: the *available*
/// universe (everything the venue lists) and the *current* universe
/// (everything the strategy has subscribed to).
///
/// Operations take the internal lock for the duration of the call only;
/// the type never calls out while holding it, and operations on two
/// universes snapshot the argument before locking `self`, so at most one
/// lock is held at a time.
#[derive(Debug, Default)]
pub struct Universe {
    inner: Mutex<HashSet<String>>,
}

impl Universe {
    /// An empty universe.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of securities in the universe.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether the universe holds no securities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Whether `product_id` is in the universe.
    #[must_use]
    pub fn contains(&self, product_id: &str) -> bool {
        self.inner.lock().contains(product_id)
    }

    /// Insert one security.
    pub fn insert(&self, product_id: impl Into<String>) {
        self.inner.lock().insert(product_id.into());
    }

    /// Remove one security.
    pub fn remove(&self, product_id: &str) {
        self.inner.lock().remove(product_id);
    }

    /// Remove every security.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Replace the contents with those of `other`.
    pub fn update(&self, other: &Universe) {
        let contents = other.to_set();
        *self.inner.lock() = contents;
    }

    /// Union the contents of `other` into `self`.
    pub fn merge(&self, other: &Universe) {
        let contents = other.to_set();
        self.inner.lock().extend(contents);
    }

    /// Retain only securities also present in `other`.
    pub fn intersection(&self, other: &Universe) {
        let contents = other.to_set();
        self.inner
            .lock()
            .retain(|product_id| contents.contains(product_id));
    }

    /// A point-in-time copy of the contents. Iteration order is not
    /// observable.
    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        self.inner.lock().iter().cloned().collect()
    }

    fn to_set(&self) -> HashSet<String> {
        self.inner.lock().clone()
    }
}

impl Clone for Universe {
    fn clone(&self) -> Self {
        Self {
            inner: Mutex::new(self.to_set()),
        }
    }
}

impl<S: Into<String>> FromIterator<S> for Universe {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            inner: Mutex::new(iter.into_iter().map(Into::into).collect()),
        }
    }
}
