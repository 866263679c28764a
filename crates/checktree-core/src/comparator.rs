#![forbid(unsafe_code)]

//! Identity equality over items.
//!
//! Every membership test in the checked collection goes through a
//! [`Comparator`], never through object identity. The comparator must be an
//! equivalence relation (reflexive, symmetric, transitive); a comparator that
//! is not cannot keep the collection duplicate-free, and nothing here checks
//! for that at runtime.

use std::fmt;
use std::rc::Rc;

type EqFn<T> = dyn Fn(&T, &T) -> bool;

/// Injected equality used for all "is this item checked" lookups.
pub struct Comparator<T> {
    eq: Rc<EqFn<T>>,
}

impl<T> Clone for Comparator<T> {
    fn clone(&self) -> Self {
        Self {
            eq: Rc::clone(&self.eq),
        }
    }
}

impl<T> fmt::Debug for Comparator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comparator").finish_non_exhaustive()
    }
}

impl<T: 'static> Comparator<T> {
    /// Wrap an arbitrary equality function.
    #[must_use]
    pub fn new(eq: impl Fn(&T, &T) -> bool + 'static) -> Self {
        Self { eq: Rc::new(eq) }
    }

    /// Compare items by a derived key.
    #[must_use]
    pub fn by_key<K: PartialEq>(key: impl Fn(&T) -> K + 'static) -> Self {
        Self::new(move |a, b| key(a) == key(b))
    }
}

impl<T> Comparator<T> {
    /// Whether `a` and `b` denote the same item.
    #[inline]
    #[must_use]
    pub fn eq(&self, a: &T, b: &T) -> bool {
        (self.eq)(a, b)
    }

    /// Index of the first element of `items` equal to `item`.
    #[must_use]
    pub fn position(&self, items: &[T], item: &T) -> Option<usize> {
        items.iter().position(|candidate| self.eq(candidate, item))
    }

    /// Whether any element of `items` equals `item`.
    #[inline]
    #[must_use]
    pub fn contains(&self, items: &[T], item: &T) -> bool {
        self.position(items, item).is_some()
    }
}

impl<T: PartialEq + 'static> Comparator<T> {
    /// Deep value equality via `PartialEq`.
    #[must_use]
    pub fn by_eq() -> Self {
        Self::new(|a, b| a == b)
    }
}

impl<T: PartialEq + 'static> Default for Comparator<T> {
    fn default() -> Self {
        Self::by_eq()
    }
}

#[cfg(feature = "json")]
impl Comparator<serde_json::Value> {
    /// Compare JSON items by the value under `field`.
    ///
    /// When neither side carries the field the items are compared by deep
    /// equality; when only one does they are different items.
    #[must_use]
    pub fn json_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(move |a, b| match (a.get(field.as_str()), b.get(field.as_str())) {
            (Some(x), Some(y)) => x == y,
            (None, None) => a == b,
            _ => false,
        })
    }
}
