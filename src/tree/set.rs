//! Ordered set facades over the red-black tree engine.
//!
//! Sets store bare keys in the shared engine with the [`Identity`]
//! extraction policy. `TreeSet` rejects duplicates, `TreeMultiSet` counts
//! them.

use crate::error::Result;
use std::fmt;

use super::iter::{IntoIter, Iter};
use super::rb_tree::{Identity, KeyCompare, NaturalOrder, RbTree};

/// Ordered unique-key set.
///
/// # Examples
///
/// ```rust
/// use arbora::TreeSet;
///
/// let mut set = TreeSet::new();
/// set.insert(3).unwrap();
/// set.insert(1).unwrap();
/// assert!(!set.insert(3).unwrap());
///
/// let keys: Vec<i32> = set.iter().copied().collect();
/// assert_eq!(keys, vec![1, 3]);
/// ```
pub struct TreeSet<T, C = NaturalOrder> {
    tree: RbTree<T, Identity, C>,
}

impl<T: Ord> TreeSet<T> {
    /// Create an empty set ordered by the value type's `Ord`.
    pub fn new() -> Self {
        Self {
            tree: RbTree::new(),
        }
    }
}

impl<T, C> TreeSet<T, C>
where
    C: KeyCompare<T>,
{
    /// Create an empty set ordered by `comp`.
    pub fn with_comparator(comp: C) -> Self {
        Self {
            tree: RbTree::with_comparator(comp),
        }
    }

    /// Number of values.
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Whether the set holds no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Borrow the comparator.
    #[inline]
    pub fn key_comp(&self) -> &C {
        self.tree.key_comp()
    }

    /// Insert a value; returns `false` (dropping it) when an equal value is
    /// already present.
    pub fn insert(&mut self, value: T) -> Result<bool> {
        self.tree.insert_unique(value)
    }

    /// Whether an equal value is present.
    pub fn contains(&self, value: &T) -> bool {
        self.tree.contains(value)
    }

    /// Borrow the stored value equal to `value`.
    pub fn get(&self, value: &T) -> Option<&T> {
        self.tree.find(value)
    }

    /// Remove the value equal to `value`; returns whether one was removed.
    pub fn remove(&mut self, value: &T) -> bool {
        self.tree.remove_unique(value).is_some()
    }

    /// Remove and return the stored value equal to `value`.
    pub fn take(&mut self, value: &T) -> Option<T> {
        self.tree.remove_unique(value)
    }

    /// The minimum value, in O(1).
    pub fn first(&self) -> Option<&T> {
        self.tree.first()
    }

    /// The maximum value, in O(1).
    pub fn last(&self) -> Option<&T> {
        self.tree.last()
    }

    /// Remove and return the minimum value.
    pub fn pop_first(&mut self) -> Option<T> {
        self.tree.pop_first()
    }

    /// Remove and return the maximum value.
    pub fn pop_last(&mut self) -> Option<T> {
        self.tree.pop_last()
    }

    /// Drop every value.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Exchange contents with `other` in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }

    /// In-order iterator over the values.
    pub fn iter(&self) -> Iter<'_, T> {
        self.tree.iter()
    }

    /// Values from the first one not less than `value` onward.
    pub fn lower_bound(&self, value: &T) -> Iter<'_, T> {
        self.tree.lower_bound(value)
    }

    /// Values from the first one greater than `value` onward.
    pub fn upper_bound(&self, value: &T) -> Iter<'_, T> {
        self.tree.upper_bound(value)
    }

    /// Verify the underlying tree's structural invariants; for tests and
    /// debugging.
    pub fn validate(&self) -> Result<()> {
        self.tree.validate()
    }
}

/// Ordered duplicate-key set: equal values are kept and counted.
pub struct TreeMultiSet<T, C = NaturalOrder> {
    tree: RbTree<T, Identity, C>,
}

impl<T: Ord> TreeMultiSet<T> {
    /// Create an empty multiset ordered by the value type's `Ord`.
    pub fn new() -> Self {
        Self {
            tree: RbTree::new(),
        }
    }
}

impl<T, C> TreeMultiSet<T, C>
where
    C: KeyCompare<T>,
{
    /// Create an empty multiset ordered by `comp`.
    pub fn with_comparator(comp: C) -> Self {
        Self {
            tree: RbTree::with_comparator(comp),
        }
    }

    /// Number of values, duplicates included.
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Whether the multiset holds no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Borrow the comparator.
    #[inline]
    pub fn key_comp(&self) -> &C {
        self.tree.key_comp()
    }

    /// Insert a value; equal values are always accepted.
    pub fn insert(&mut self, value: T) -> Result<()> {
        self.tree.insert_multi(value)
    }

    /// Whether an equal value is present.
    pub fn contains(&self, value: &T) -> bool {
        self.tree.contains(value)
    }

    /// Number of values equal to `value`.
    pub fn count(&self, value: &T) -> usize {
        self.tree.count_multi(value)
    }

    /// Every value equal to `value`.
    pub fn equal_range(&self, value: &T) -> Iter<'_, T> {
        self.tree.equal_range_multi(value)
    }

    /// Remove every value equal to `value`, returning the count removed.
    pub fn remove_all(&mut self, value: &T) -> usize {
        self.tree.remove_multi(value)
    }

    /// The minimum value, in O(1).
    pub fn first(&self) -> Option<&T> {
        self.tree.first()
    }

    /// The maximum value, in O(1).
    pub fn last(&self) -> Option<&T> {
        self.tree.last()
    }

    /// Remove and return the minimum value.
    pub fn pop_first(&mut self) -> Option<T> {
        self.tree.pop_first()
    }

    /// Remove and return the maximum value.
    pub fn pop_last(&mut self) -> Option<T> {
        self.tree.pop_last()
    }

    /// Drop every value.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Exchange contents with `other` in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }

    /// In-order iterator over the values.
    pub fn iter(&self) -> Iter<'_, T> {
        self.tree.iter()
    }

    /// Values from the first one not less than `value` onward.
    pub fn lower_bound(&self, value: &T) -> Iter<'_, T> {
        self.tree.lower_bound(value)
    }

    /// Values from the first one greater than `value` onward.
    pub fn upper_bound(&self, value: &T) -> Iter<'_, T> {
        self.tree.upper_bound(value)
    }

    /// Verify the underlying tree's structural invariants; for tests and
    /// debugging.
    pub fn validate(&self) -> Result<()> {
        self.tree.validate()
    }
}

macro_rules! set_common_traits {
    ($name:ident) => {
        impl<T, C> Default for $name<T, C>
        where
            C: KeyCompare<T> + Default,
        {
            fn default() -> Self {
                Self::with_comparator(C::default())
            }
        }

        impl<T, C> Clone for $name<T, C>
        where
            T: Clone,
            C: Clone,
        {
            fn clone(&self) -> Self {
                Self {
                    tree: self.tree.clone(),
                }
            }
        }

        impl<T, C> fmt::Debug for $name<T, C>
        where
            T: fmt::Debug,
            C: KeyCompare<T>,
        {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_set().entries(self.iter()).finish()
            }
        }

        impl<T, C> PartialEq for $name<T, C>
        where
            T: PartialEq,
            C: KeyCompare<T>,
        {
            fn eq(&self, other: &Self) -> bool {
                self.len() == other.len() && self.iter().eq(other.iter())
            }
        }

        impl<T, C> Eq for $name<T, C>
        where
            T: Eq,
            C: KeyCompare<T>,
        {
        }

        impl<T, C> PartialOrd for $name<T, C>
        where
            T: PartialOrd,
            C: KeyCompare<T>,
        {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                self.iter().partial_cmp(other.iter())
            }
        }

        impl<T, C> Ord for $name<T, C>
        where
            T: Ord,
            C: KeyCompare<T>,
        {
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                self.iter().cmp(other.iter())
            }
        }

        impl<T, C> IntoIterator for $name<T, C> {
            type Item = T;
            type IntoIter = IntoIter<T>;

            fn into_iter(self) -> Self::IntoIter {
                self.tree.into_iter()
            }
        }

        impl<'a, T, C> IntoIterator for &'a $name<T, C>
        where
            C: KeyCompare<T>,
        {
            type Item = &'a T;
            type IntoIter = Iter<'a, T>;

            fn into_iter(self) -> Self::IntoIter {
                self.iter()
            }
        }
    };
}

set_common_traits!(TreeSet);
set_common_traits!(TreeMultiSet);

impl<T, C> Extend<T> for TreeSet<T, C>
where
    C: KeyCompare<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.tree
            .extend_unique(iter)
            .expect("tree allocation failed");
    }
}

impl<T, C> Extend<T> for TreeMultiSet<T, C>
where
    C: KeyCompare<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.tree
            .extend_multi(iter)
            .expect("tree allocation failed");
    }
}

impl<T, C> FromIterator<T> for TreeSet<T, C>
where
    C: KeyCompare<T> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::with_comparator(C::default());
        set.extend(iter);
        set
    }
}

impl<T, C> FromIterator<T> for TreeMultiSet<T, C>
where
    C: KeyCompare<T> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::with_comparator(C::default());
        set.extend(iter);
        set
    }
}

impl<T, C, const N: usize> From<[T; N]> for TreeSet<T, C>
where
    C: KeyCompare<T> + Default,
{
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<T, C, const N: usize> From<[T; N]> for TreeMultiSet<T, C>
where
    C: KeyCompare<T> + Default,
{
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::*;
    use serde::de::{SeqAccess, Visitor};
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::marker::PhantomData;

    macro_rules! set_serde {
        ($name:ident, $expecting:literal) => {
            impl<T, C> Serialize for $name<T, C>
            where
                T: Serialize,
                C: KeyCompare<T>,
            {
                fn serialize<S: Serializer>(
                    &self,
                    serializer: S,
                ) -> std::result::Result<S::Ok, S::Error> {
                    let mut seq = serializer.serialize_seq(Some(self.len()))?;
                    for value in self.iter() {
                        seq.serialize_element(value)?;
                    }
                    seq.end()
                }
            }

            impl<'de, T, C> Deserialize<'de> for $name<T, C>
            where
                T: Deserialize<'de>,
                C: KeyCompare<T> + Default,
            {
                fn deserialize<D: Deserializer<'de>>(
                    deserializer: D,
                ) -> std::result::Result<Self, D::Error> {
                    struct SetVisitor<T, C>(PhantomData<(T, C)>);

                    impl<'de, T, C> Visitor<'de> for SetVisitor<T, C>
                    where
                        T: Deserialize<'de>,
                        C: KeyCompare<T> + Default,
                    {
                        type Value = $name<T, C>;

                        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                            f.write_str($expecting)
                        }

                        fn visit_seq<A: SeqAccess<'de>>(
                            self,
                            mut access: A,
                        ) -> std::result::Result<Self::Value, A::Error> {
                            let mut set = $name::with_comparator(C::default());
                            while let Some(value) = access.next_element()? {
                                set.insert(value).map_err(serde::de::Error::custom)?;
                            }
                            Ok(set)
                        }
                    }

                    deserializer.deserialize_seq(SetVisitor(PhantomData))
                }
            }
        };
    }

    set_serde!(TreeSet, "a sequence of unique values");
    set_serde!(TreeMultiSet, "a sequence of values");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_contains_remove() {
        let mut set = TreeSet::new();
        assert!(set.insert(2).unwrap());
        assert!(set.insert(1).unwrap());
        assert!(!set.insert(2).unwrap());
        assert_eq!(set.len(), 2);
        assert!(set.contains(&1));
        assert!(!set.contains(&3));

        assert!(set.remove(&1));
        assert!(!set.remove(&1));
        assert_eq!(set.len(), 1);
        set.validate().unwrap();
    }

    #[test]
    fn test_iter_is_sorted() {
        let set: TreeSet<i32> = [4, 1, 3, 2].into_iter().collect();
        let values: Vec<i32> = set.iter().copied().collect();
        assert_eq!(values, vec![1, 2, 3, 4]);
        let reversed: Vec<i32> = set.iter().rev().copied().collect();
        assert_eq!(reversed, vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_take_and_get() {
        let mut set: TreeSet<String> = ["b".to_string(), "a".to_string()].into_iter().collect();
        assert_eq!(set.get(&"a".to_string()), Some(&"a".to_string()));
        assert_eq!(set.take(&"a".to_string()), Some("a".to_string()));
        assert_eq!(set.take(&"a".to_string()), None);
        set.validate().unwrap();
    }

    #[test]
    fn test_extremes_and_pop() {
        let mut set: TreeSet<i32> = (1..=5).collect();
        assert_eq!(set.first(), Some(&1));
        assert_eq!(set.last(), Some(&5));
        assert_eq!(set.pop_first(), Some(1));
        assert_eq!(set.pop_last(), Some(5));
        assert_eq!(set.len(), 3);
        set.validate().unwrap();
    }

    #[test]
    fn test_bounds() {
        let set: TreeSet<i32> = [10, 20, 30].into_iter().collect();
        assert_eq!(set.lower_bound(&15).next(), Some(&20));
        assert_eq!(set.upper_bound(&20).next(), Some(&30));
        assert_eq!(set.lower_bound(&31).next(), None);
    }

    #[test]
    fn test_multiset_counts_duplicates() {
        let mut set = TreeMultiSet::new();
        for value in [2, 2, 2, 1, 3] {
            set.insert(value).unwrap();
        }
        assert_eq!(set.len(), 5);
        assert_eq!(set.count(&2), 3);
        assert_eq!(set.count(&4), 0);
        let run: Vec<i32> = set.equal_range(&2).copied().collect();
        assert_eq!(run, vec![2, 2, 2]);
        assert_eq!(set.remove_all(&2), 3);
        assert_eq!(set.len(), 2);
        set.validate().unwrap();
    }

    #[test]
    fn test_whole_set_comparisons() {
        let a: TreeSet<i32> = [1, 2].into_iter().collect();
        let b: TreeSet<i32> = [2, 1].into_iter().collect();
        let c: TreeSet<i32> = [1, 3].into_iter().collect();
        assert_eq!(a, b);
        assert!(a < c);
    }

    #[test]
    fn test_debug_formats_as_set() {
        let set: TreeSet<i32> = TreeSet::from([2, 1]);
        assert_eq!(format!("{:?}", set), "{1, 2}");
    }

    #[test]
    fn test_into_iter_sorted() {
        let set: TreeMultiSet<i32> = [3, 1, 1, 2].into_iter().collect();
        let values: Vec<i32> = set.into_iter().collect();
        assert_eq!(values, vec![1, 1, 2, 3]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip() {
        let set: TreeSet<i32> = [3, 1, 2].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, "[1,2,3]");
        let back: TreeSet<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(set, back);
    }
}
