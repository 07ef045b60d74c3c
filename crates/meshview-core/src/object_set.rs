//! Ordered, cyclic collection of viewable objects.

use crate::error::{MeshviewError, Result};

/// A non-empty list with a cursor on the active entry.
///
/// Stepping past either end wraps around.
#[derive(Debug, Clone)]
pub struct ObjectSet<T> {
    items: Vec<T>,
    active: usize,
}

impl<T> ObjectSet<T> {
    /// Builds a set with the first item active. Fails on an empty list.
    pub fn new(items: Vec<T>) -> Result<Self> {
        if items.is_empty() {
            return Err(MeshviewError::InvalidMesh(
                "an object set needs at least one object".to_string(),
            ));
        }
        Ok(Self { items, active: 0 })
    }

    /// Activates the following object, wrapping to the first.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> &T {
        self.active = (self.active + 1) % self.items.len();
        &self.items[self.active]
    }

    /// Activates the preceding object, wrapping to the last.
    pub fn previous(&mut self) -> &T {
        self.active = (self.active + self.items.len() - 1) % self.items.len();
        &self.items[self.active]
    }

    /// The active object.
    pub fn active(&self) -> &T {
        &self.items[self.active]
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Applies `f` to every object, keeping the cursor.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ObjectSet<U> {
        ObjectSet {
            items: self.items.into_iter().map(f).collect(),
            active: self.active,
        }
    }
}

impl<'a, T> IntoIterator for &'a ObjectSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_set_is_rejected() {
        assert!(ObjectSet::<u8>::new(Vec::new()).is_err());
    }

    #[test]
    fn test_two_objects_cycle() {
        let mut set = ObjectSet::new(vec!["a", "b"]).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(*set.active(), "a");
        assert_eq!(*set.next(), "b");
        assert_eq!(set.active_index(), 1);
        assert_eq!(*set.next(), "a");
        assert_eq!(set.active_index(), 0);
    }

    #[test]
    fn test_previous_wraps_to_last() {
        let mut set = ObjectSet::new(vec![1, 2, 3]).unwrap();
        assert_eq!(*set.previous(), 3);
        assert_eq!(*set.previous(), 2);
    }

    #[test]
    fn test_single_object_stays_put() {
        let mut set = ObjectSet::new(vec![7]).unwrap();
        assert_eq!(*set.next(), 7);
        assert_eq!(*set.previous(), 7);
        assert_eq!(set.active_index(), 0);
    }

    #[test]
    fn test_map_keeps_cursor() {
        let mut set = ObjectSet::new(vec![1, 2, 3]).unwrap();
        set.next();
        let mapped: ObjectSet<String> = set.map(|i| i.to_string());
        assert_eq!(mapped.active(), "2");
        assert_eq!(mapped.iter().count(), 3);
    }

    proptest! {
        #[test]
        fn prop_next_cycles_back(len in 1usize..50, start in 0usize..50) {
            let mut set = ObjectSet::new((0..len).collect::<Vec<_>>()).unwrap();
            for _ in 0..start % len {
                set.next();
            }
            let origin = set.active_index();
            for _ in 0..len {
                set.next();
                prop_assert!(set.active_index() < len);
            }
            prop_assert_eq!(set.active_index(), origin);
        }

        #[test]
        fn prop_previous_undoes_next(len in 1usize..50, steps in 0usize..100) {
            let mut set = ObjectSet::new((0..len).collect::<Vec<_>>()).unwrap();
            for _ in 0..steps {
                set.next();
            }
            for _ in 0..steps {
                set.previous();
            }
            prop_assert_eq!(set.active_index(), 0);
        }
    }
}
