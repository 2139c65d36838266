//! core::lazy_set
//!
//! A set built incrementally from a single-pass source.
//!
//! # Design
//!
//! [`LazySet`] wraps an iterator that may be expensive or unbounded (for
//! example "every commit in every clone of every remote"). Elements are
//! pulled only when a query needs them and are cached, so the source is
//! consumed at most once no matter how many queries run.
//!
//! Cached elements keep the order in which they were pulled. Iteration
//! replays that order and then continues pulling from the source.
//!
//! The API takes `&mut self`; callers that need to share an instance across
//! threads must wrap it in their own lock.
//!
//! # Example
//!
//! ```
//! use git_utils::core::lazy_set::LazySet;
//!
//! let mut set = LazySet::new(1..=5);
//! assert!(set.contains(&3));
//! assert!(!set.contains(&9));
//! assert_eq!(set.len(), 5);
//! ```

use std::collections::HashSet;
use std::hash::Hash;

/// Set semantics over a lazily consumed source iterator.
pub struct LazySet<I: Iterator> {
    source: I,
    exhausted: bool,
    /// Distinct elements in pull order.
    order: Vec<I::Item>,
    seen: HashSet<I::Item>,
}

impl<I> LazySet<I>
where
    I: Iterator,
    I::Item: Eq + Hash + Clone,
{
    /// Wrap a single-use source.
    pub fn new(source: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            source: source.into_iter(),
            exhausted: false,
            order: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Check membership, pulling from the source only as far as needed.
    ///
    /// Returns `false` only after the source is exhausted.
    pub fn contains(&mut self, item: &I::Item) -> bool {
        if self.seen.contains(item) {
            return true;
        }
        while let Some(pulled) = self.pull() {
            if &pulled == item {
                return true;
            }
        }
        false
    }

    /// Iterate cached elements, then the rest of the source.
    pub fn iter(&mut self) -> Iter<'_, I> {
        Iter {
            set: self,
            position: 0,
        }
    }

    /// Number of distinct elements. Consumes the whole source.
    pub fn len(&mut self) -> usize {
        while self.pull().is_some() {}
        self.order.len()
    }

    /// Whether the set has no elements. Pulls at most one element.
    pub fn is_empty(&mut self) -> bool {
        self.order.is_empty() && self.pull().is_none()
    }

    /// Number of elements cached so far, without pulling.
    pub fn cached_len(&self) -> usize {
        self.order.len()
    }

    /// The wrapped source, for inspecting state it records while pulled.
    pub fn source(&self) -> &I {
        &self.source
    }

    /// Mutable access to the wrapped source.
    pub fn source_mut(&mut self) -> &mut I {
        &mut self.source
    }

    /// Pull the next distinct element from the source and cache it.
    fn pull(&mut self) -> Option<I::Item> {
        if self.exhausted {
            return None;
        }
        for item in self.source.by_ref() {
            if self.seen.insert(item.clone()) {
                self.order.push(item.clone());
                return Some(item);
            }
        }
        // Never poll the source again once it has returned `None`.
        self.exhausted = true;
        None
    }
}

impl<I: Iterator> std::fmt::Debug for LazySet<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazySet")
            .field("cached", &self.order.len())
            .field("exhausted", &self.exhausted)
            .finish()
    }
}

/// Borrowing iterator over a [`LazySet`].
pub struct Iter<'a, I: Iterator> {
    set: &'a mut LazySet<I>,
    position: usize,
}

impl<I> Iterator for Iter<'_, I>
where
    I: Iterator,
    I::Item: Eq + Hash + Clone,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(item) = self.set.order.get(self.position) {
            self.position += 1;
            return Some(item.clone());
        }
        let item = self.set.pull()?;
        self.position += 1;
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Yields `0..len` and panics if pulled again after that.
    struct ExhaustOnce {
        next: u32,
        len: u32,
        done: bool,
    }

    impl ExhaustOnce {
        fn new(len: u32) -> Self {
            Self {
                next: 0,
                len,
                done: false,
            }
        }
    }

    impl Iterator for ExhaustOnce {
        type Item = u32;

        fn next(&mut self) -> Option<u32> {
            assert!(!self.done, "source pulled after exhaustion");
            if self.next == self.len {
                self.done = true;
                return None;
            }
            let item = self.next;
            self.next += 1;
            Some(item)
        }
    }

    #[test]
    fn contains_pulls_each_element_once() {
        let mut set = LazySet::new(ExhaustOnce::new(3));
        assert!(set.contains(&2));
        assert_eq!(set.cached_len(), 3);
        assert!(set.contains(&1));
        assert!(set.contains(&0));
        assert_eq!(set.source().next, 3);
    }

    #[test]
    fn contains_stops_at_match() {
        let mut set = LazySet::new(ExhaustOnce::new(10));
        assert!(set.contains(&1));
        assert_eq!(set.cached_len(), 2);
    }

    #[test]
    fn missing_element_exhausts_source() {
        let mut set = LazySet::new(ExhaustOnce::new(3));
        assert!(!set.contains(&7));
        assert!(set.source().done);
        // Further misses must not touch the source again.
        assert!(!set.contains(&8));
        assert!(set.contains(&1));
    }

    #[test]
    fn iter_replays_cache_then_pulls() {
        let mut set = LazySet::new(vec!["a", "b", "c", "d"]);
        assert!(set.contains(&"b"));
        let all: Vec<_> = set.iter().collect();
        assert_eq!(all, vec!["a", "b", "c", "d"]);
        assert_eq!(set.cached_len(), 4);
    }

    #[test]
    fn partial_iteration_keeps_cache() {
        let mut set = LazySet::new(ExhaustOnce::new(5));
        let first_two: Vec<_> = set.iter().take(2).collect();
        assert_eq!(first_two, vec![0, 1]);
        assert!(set.contains(&4));
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn duplicates_are_cached_once() {
        let mut set = LazySet::new(vec![1, 1, 2, 2, 3, 1]);
        assert_eq!(set.len(), 3);
        let items: Vec<_> = set.iter().collect();
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[test]
    fn empty_source() {
        let mut set = LazySet::new(Vec::<u8>::new());
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert!(!set.contains(&0));
    }

    #[test]
    fn len_forces_consumption() {
        let mut set = LazySet::new(ExhaustOnce::new(4));
        assert_eq!(set.cached_len(), 0);
        assert_eq!(set.len(), 4);
        assert!(set.source().done);
    }
}
