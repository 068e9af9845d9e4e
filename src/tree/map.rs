//! Ordered map facades over the red-black tree engine.
//!
//! Both maps store `(key, payload)` pairs in the shared engine with the
//! [`FirstOfPair`] extraction policy; they contain no balancing logic of
//! their own. `TreeMap` rejects duplicate keys, `TreeMultiMap` keeps every
//! entry.

use crate::error::Result;
use std::fmt;
use std::iter::FusedIterator;
use std::ops::Index;

use super::iter::{IntoIter, Iter, IterMut};
use super::rb_tree::{FirstOfPair, KeyCompare, NaturalOrder, RbTree};

/// Ordered unique-key map.
///
/// Keys are kept in comparator order; lookups, insertions and removals are
/// O(log n). Inserting allocates and therefore returns [`Result`].
///
/// # Examples
///
/// ```rust
/// use arbora::TreeMap;
///
/// let mut map = TreeMap::new();
/// map.insert("b", 2).unwrap();
/// map.insert("a", 1).unwrap();
/// assert_eq!(map.get(&"a"), Some(&1));
///
/// let keys: Vec<&str> = map.keys().copied().collect();
/// assert_eq!(keys, vec!["a", "b"]);
/// ```
pub struct TreeMap<K, T, C = NaturalOrder> {
    tree: RbTree<(K, T), FirstOfPair, C>,
}

impl<K: Ord, T> TreeMap<K, T> {
    /// Create an empty map ordered by the key type's `Ord`.
    pub fn new() -> Self {
        Self {
            tree: RbTree::new(),
        }
    }
}

impl<K, T, C> TreeMap<K, T, C>
where
    C: KeyCompare<K>,
{
    /// Create an empty map ordered by `comp`.
    pub fn with_comparator(comp: C) -> Self {
        Self {
            tree: RbTree::with_comparator(comp),
        }
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Whether the map holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Borrow the comparator.
    #[inline]
    pub fn key_comp(&self) -> &C {
        self.tree.key_comp()
    }

    /// Insert an entry, returning the displaced payload when the key was
    /// already present.
    pub fn insert(&mut self, key: K, value: T) -> Result<Option<T>> {
        Ok(self
            .tree
            .insert_or_replace((key, value))?
            .map(|(_, old)| old))
    }

    /// Look up a payload by key.
    pub fn get(&self, key: &K) -> Option<&T> {
        self.tree.find(key).map(|entry| &entry.1)
    }

    /// Look up an entry by key.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &T)> {
        self.tree.find(key).map(|entry| (&entry.0, &entry.1))
    }

    /// Look up a payload by key, mutably.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut T> {
        self.tree.find_value_mut(key).map(|entry| &mut entry.1)
    }

    /// Whether the key is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.contains(key)
    }

    /// Remove an entry by key and return its payload.
    pub fn remove(&mut self, key: &K) -> Option<T> {
        self.tree.remove_unique(key).map(|(_, value)| value)
    }

    /// Remove an entry by key and return it whole.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, T)> {
        self.tree.remove_unique(key)
    }

    /// The entry with the smallest key, in O(1).
    pub fn first_key_value(&self) -> Option<(&K, &T)> {
        self.tree.first().map(|entry| (&entry.0, &entry.1))
    }

    /// The entry with the largest key, in O(1).
    pub fn last_key_value(&self) -> Option<(&K, &T)> {
        self.tree.last().map(|entry| (&entry.0, &entry.1))
    }

    /// Remove and return the entry with the smallest key.
    pub fn pop_first(&mut self) -> Option<(K, T)> {
        self.tree.pop_first()
    }

    /// Remove and return the entry with the largest key.
    pub fn pop_last(&mut self) -> Option<(K, T)> {
        self.tree.pop_last()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Exchange contents with `other` in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }

    /// In-order iterator over `(&key, &payload)` entries.
    pub fn iter(&self) -> MapIter<'_, K, T> {
        MapIter {
            inner: self.tree.iter(),
        }
    }

    /// In-order iterator with mutable payloads.
    pub fn iter_mut(&mut self) -> MapIterMut<'_, K, T> {
        MapIterMut {
            inner: self.tree.iter_mut(),
        }
    }

    /// In-order iterator over the keys.
    pub fn keys(&self) -> Keys<'_, K, T> {
        Keys { inner: self.iter() }
    }

    /// In-order iterator over the payloads.
    pub fn values(&self) -> Values<'_, K, T> {
        Values { inner: self.iter() }
    }

    /// In-order iterator over mutable payloads.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, T> {
        ValuesMut {
            inner: self.tree.iter_mut(),
        }
    }

    /// Entries from the first key not less than `key` onward.
    pub fn lower_bound(&self, key: &K) -> MapIter<'_, K, T> {
        MapIter {
            inner: self.tree.lower_bound(key),
        }
    }

    /// Entries from the first key greater than `key` onward.
    pub fn upper_bound(&self, key: &K) -> MapIter<'_, K, T> {
        MapIter {
            inner: self.tree.upper_bound(key),
        }
    }

    /// The entries whose key equals `key`: at most one for this map.
    pub fn equal_range(&self, key: &K) -> MapIter<'_, K, T> {
        MapIter {
            inner: self.tree.equal_range_unique(key),
        }
    }

    /// Verify the underlying tree's structural invariants; for tests and
    /// debugging.
    pub fn validate(&self) -> Result<()> {
        self.tree.validate()
    }
}

/// Ordered duplicate-key map: one key may be bound to many payloads.
///
/// Entries with equal keys are adjacent in iteration order; a new entry is
/// placed after all existing entries with the same key.
pub struct TreeMultiMap<K, T, C = NaturalOrder> {
    tree: RbTree<(K, T), FirstOfPair, C>,
}

impl<K: Ord, T> TreeMultiMap<K, T> {
    /// Create an empty multimap ordered by the key type's `Ord`.
    pub fn new() -> Self {
        Self {
            tree: RbTree::new(),
        }
    }
}

impl<K, T, C> TreeMultiMap<K, T, C>
where
    C: KeyCompare<K>,
{
    /// Create an empty multimap ordered by `comp`.
    pub fn with_comparator(comp: C) -> Self {
        Self {
            tree: RbTree::with_comparator(comp),
        }
    }

    /// Number of entries, duplicates included.
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Whether the multimap holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Borrow the comparator.
    #[inline]
    pub fn key_comp(&self) -> &C {
        self.tree.key_comp()
    }

    /// Insert an entry; equal keys are always accepted.
    pub fn insert(&mut self, key: K, value: T) -> Result<()> {
        self.tree.insert_multi((key, value))
    }

    /// First payload bound to `key`, if any.
    pub fn get(&self, key: &K) -> Option<&T> {
        self.tree.find(key).map(|entry| &entry.1)
    }

    /// Whether any entry carries `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.contains(key)
    }

    /// Number of entries carrying `key`.
    pub fn count(&self, key: &K) -> usize {
        self.tree.count_multi(key)
    }

    /// Every entry carrying `key`, in insertion-adjacent order.
    pub fn equal_range(&self, key: &K) -> MapIter<'_, K, T> {
        MapIter {
            inner: self.tree.equal_range_multi(key),
        }
    }

    /// Entries from the first key not less than `key` onward.
    pub fn lower_bound(&self, key: &K) -> MapIter<'_, K, T> {
        MapIter {
            inner: self.tree.lower_bound(key),
        }
    }

    /// Entries from the first key greater than `key` onward.
    pub fn upper_bound(&self, key: &K) -> MapIter<'_, K, T> {
        MapIter {
            inner: self.tree.upper_bound(key),
        }
    }

    /// Remove every entry carrying `key`, returning the count removed.
    pub fn remove_all(&mut self, key: &K) -> usize {
        self.tree.remove_multi(key)
    }

    /// The entry with the smallest key, in O(1).
    pub fn first_key_value(&self) -> Option<(&K, &T)> {
        self.tree.first().map(|entry| (&entry.0, &entry.1))
    }

    /// The entry with the largest key, in O(1).
    pub fn last_key_value(&self) -> Option<(&K, &T)> {
        self.tree.last().map(|entry| (&entry.0, &entry.1))
    }

    /// Remove and return the entry with the smallest key.
    pub fn pop_first(&mut self) -> Option<(K, T)> {
        self.tree.pop_first()
    }

    /// Remove and return the entry with the largest key.
    pub fn pop_last(&mut self) -> Option<(K, T)> {
        self.tree.pop_last()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Exchange contents with `other` in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }

    /// In-order iterator over `(&key, &payload)` entries.
    pub fn iter(&self) -> MapIter<'_, K, T> {
        MapIter {
            inner: self.tree.iter(),
        }
    }

    /// In-order iterator with mutable payloads.
    pub fn iter_mut(&mut self) -> MapIterMut<'_, K, T> {
        MapIterMut {
            inner: self.tree.iter_mut(),
        }
    }

    /// In-order iterator over the keys, duplicates included.
    pub fn keys(&self) -> Keys<'_, K, T> {
        Keys { inner: self.iter() }
    }

    /// In-order iterator over the payloads.
    pub fn values(&self) -> Values<'_, K, T> {
        Values { inner: self.iter() }
    }

    /// In-order iterator over mutable payloads.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, T> {
        ValuesMut {
            inner: self.tree.iter_mut(),
        }
    }

    /// Verify the underlying tree's structural invariants; for tests and
    /// debugging.
    pub fn validate(&self) -> Result<()> {
        self.tree.validate()
    }
}

/// In-order borrowing iterator over map entries.
pub struct MapIter<'a, K, T> {
    inner: Iter<'a, (K, T)>,
}

impl<K, T> Clone for MapIter<'_, K, T> {
    fn clone(&self) -> Self {
        MapIter {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, T> Iterator for MapIter<'a, K, T> {
    type Item = (&'a K, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| (&entry.0, &entry.1))
    }
}

impl<K, T> DoubleEndedIterator for MapIter<'_, K, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|entry| (&entry.0, &entry.1))
    }
}

impl<K, T> FusedIterator for MapIter<'_, K, T> {}

/// In-order iterator over map entries with mutable payloads.
pub struct MapIterMut<'a, K, T> {
    inner: IterMut<'a, (K, T)>,
}

impl<'a, K, T> Iterator for MapIterMut<'a, K, T> {
    type Item = (&'a K, &'a mut T);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| (&entry.0, &mut entry.1))
    }
}

impl<K, T> DoubleEndedIterator for MapIterMut<'_, K, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|entry| (&entry.0, &mut entry.1))
    }
}

impl<K, T> FusedIterator for MapIterMut<'_, K, T> {}

/// In-order iterator over map keys.
pub struct Keys<'a, K, T> {
    inner: MapIter<'a, K, T>,
}

impl<K, T> Clone for Keys<'_, K, T> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, T> Iterator for Keys<'a, K, T> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(key, _)| key)
    }
}

impl<K, T> DoubleEndedIterator for Keys<'_, K, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, _)| key)
    }
}

impl<K, T> FusedIterator for Keys<'_, K, T> {}

/// In-order iterator over map payloads.
pub struct Values<'a, K, T> {
    inner: MapIter<'a, K, T>,
}

impl<K, T> Clone for Values<'_, K, T> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, T> Iterator for Values<'a, K, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next().map(|(_, value)| value)
    }
}

impl<K, T> DoubleEndedIterator for Values<'_, K, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, T> FusedIterator for Values<'_, K, T> {}

/// In-order iterator over mutable map payloads.
pub struct ValuesMut<'a, K, T> {
    inner: IterMut<'a, (K, T)>,
}

impl<'a, K, T> Iterator for ValuesMut<'a, K, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        self.inner.next().map(|entry| &mut entry.1)
    }
}

impl<K, T> DoubleEndedIterator for ValuesMut<'_, K, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|entry| &mut entry.1)
    }
}

impl<K, T> FusedIterator for ValuesMut<'_, K, T> {}

macro_rules! map_common_traits {
    ($name:ident) => {
        impl<K, T, C> Default for $name<K, T, C>
        where
            C: KeyCompare<K> + Default,
        {
            fn default() -> Self {
                Self::with_comparator(C::default())
            }
        }

        impl<K, T, C> Clone for $name<K, T, C>
        where
            K: Clone,
            T: Clone,
            C: Clone,
        {
            fn clone(&self) -> Self {
                Self {
                    tree: self.tree.clone(),
                }
            }
        }

        impl<K, T, C> fmt::Debug for $name<K, T, C>
        where
            K: fmt::Debug,
            T: fmt::Debug,
            C: KeyCompare<K>,
        {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_map().entries(self.iter()).finish()
            }
        }

        impl<K, T, C> PartialEq for $name<K, T, C>
        where
            K: PartialEq,
            T: PartialEq,
            C: KeyCompare<K>,
        {
            fn eq(&self, other: &Self) -> bool {
                self.len() == other.len() && self.iter().eq(other.iter())
            }
        }

        impl<K, T, C> Eq for $name<K, T, C>
        where
            K: Eq,
            T: Eq,
            C: KeyCompare<K>,
        {
        }

        impl<K, T, C> PartialOrd for $name<K, T, C>
        where
            K: PartialOrd,
            T: PartialOrd,
            C: KeyCompare<K>,
        {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                self.iter().partial_cmp(other.iter())
            }
        }

        impl<K, T, C> Ord for $name<K, T, C>
        where
            K: Ord,
            T: Ord,
            C: KeyCompare<K>,
        {
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                self.iter().cmp(other.iter())
            }
        }

        impl<K, T, C> IntoIterator for $name<K, T, C> {
            type Item = (K, T);
            type IntoIter = IntoIter<(K, T)>;

            fn into_iter(self) -> Self::IntoIter {
                self.tree.into_iter()
            }
        }

        impl<'a, K, T, C> IntoIterator for &'a $name<K, T, C>
        where
            C: KeyCompare<K>,
        {
            type Item = (&'a K, &'a T);
            type IntoIter = MapIter<'a, K, T>;

            fn into_iter(self) -> Self::IntoIter {
                self.iter()
            }
        }

        impl<'a, K, T, C> IntoIterator for &'a mut $name<K, T, C>
        where
            C: KeyCompare<K>,
        {
            type Item = (&'a K, &'a mut T);
            type IntoIter = MapIterMut<'a, K, T>;

            fn into_iter(self) -> Self::IntoIter {
                self.iter_mut()
            }
        }
    };
}

map_common_traits!(TreeMap);
map_common_traits!(TreeMultiMap);

impl<K, T, C> Extend<(K, T)> for TreeMap<K, T, C>
where
    C: KeyCompare<K>,
{
    fn extend<I: IntoIterator<Item = (K, T)>>(&mut self, iter: I) {
        for (key, value) in iter {
            let _ = self.insert(key, value).expect("tree allocation failed");
        }
    }
}

impl<K, T, C> Extend<(K, T)> for TreeMultiMap<K, T, C>
where
    C: KeyCompare<K>,
{
    fn extend<I: IntoIterator<Item = (K, T)>>(&mut self, iter: I) {
        self.tree
            .extend_multi(iter)
            .expect("tree allocation failed");
    }
}

impl<K, T, C> FromIterator<(K, T)> for TreeMap<K, T, C>
where
    C: KeyCompare<K> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut map = Self::with_comparator(C::default());
        map.extend(iter);
        map
    }
}

impl<K, T, C> FromIterator<(K, T)> for TreeMultiMap<K, T, C>
where
    C: KeyCompare<K> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut map = Self::with_comparator(C::default());
        map.extend(iter);
        map
    }
}

impl<K, T, C, const N: usize> From<[(K, T); N]> for TreeMap<K, T, C>
where
    C: KeyCompare<K> + Default,
{
    fn from(entries: [(K, T); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<K, T, C, const N: usize> From<[(K, T); N]> for TreeMultiMap<K, T, C>
where
    C: KeyCompare<K> + Default,
{
    fn from(entries: [(K, T); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<K, T, C> Index<&K> for TreeMap<K, T, C>
where
    C: KeyCompare<K>,
{
    type Output = T;

    fn index(&self, key: &K) -> &T {
        self.get(key).expect("no entry found for key")
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::*;
    use serde::de::{MapAccess, SeqAccess, Visitor};
    use serde::ser::{SerializeMap, SerializeSeq};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::marker::PhantomData;

    impl<K, T, C> Serialize for TreeMap<K, T, C>
    where
        K: Serialize,
        T: Serialize,
        C: KeyCompare<K>,
    {
        fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.len()))?;
            for (key, value) in self.iter() {
                map.serialize_entry(key, value)?;
            }
            map.end()
        }
    }

    impl<'de, K, T, C> Deserialize<'de> for TreeMap<K, T, C>
    where
        K: Deserialize<'de>,
        T: Deserialize<'de>,
        C: KeyCompare<K> + Default,
    {
        fn deserialize<D: Deserializer<'de>>(
            deserializer: D,
        ) -> std::result::Result<Self, D::Error> {
            struct MapVisitor<K, T, C>(PhantomData<(K, T, C)>);

            impl<'de, K, T, C> Visitor<'de> for MapVisitor<K, T, C>
            where
                K: Deserialize<'de>,
                T: Deserialize<'de>,
                C: KeyCompare<K> + Default,
            {
                type Value = TreeMap<K, T, C>;

                fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str("a map")
                }

                fn visit_map<A: MapAccess<'de>>(
                    self,
                    mut access: A,
                ) -> std::result::Result<Self::Value, A::Error> {
                    let mut map = TreeMap::with_comparator(C::default());
                    while let Some((key, value)) = access.next_entry()? {
                        let _ = map.insert(key, value).map_err(serde::de::Error::custom)?;
                    }
                    Ok(map)
                }
            }

            deserializer.deserialize_map(MapVisitor(PhantomData))
        }
    }

    // A multimap round-trips as a sequence of pairs: maps with duplicate
    // keys are not representable in every serde format.
    impl<K, T, C> Serialize for TreeMultiMap<K, T, C>
    where
        K: Serialize,
        T: Serialize,
        C: KeyCompare<K>,
    {
        fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
            let mut seq = serializer.serialize_seq(Some(self.len()))?;
            for entry in self.iter() {
                seq.serialize_element(&entry)?;
            }
            seq.end()
        }
    }

    impl<'de, K, T, C> Deserialize<'de> for TreeMultiMap<K, T, C>
    where
        K: Deserialize<'de>,
        T: Deserialize<'de>,
        C: KeyCompare<K> + Default,
    {
        fn deserialize<D: Deserializer<'de>>(
            deserializer: D,
        ) -> std::result::Result<Self, D::Error> {
            struct SeqVisitor<K, T, C>(PhantomData<(K, T, C)>);

            impl<'de, K, T, C> Visitor<'de> for SeqVisitor<K, T, C>
            where
                K: Deserialize<'de>,
                T: Deserialize<'de>,
                C: KeyCompare<K> + Default,
            {
                type Value = TreeMultiMap<K, T, C>;

                fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str("a sequence of key-value pairs")
                }

                fn visit_seq<A: SeqAccess<'de>>(
                    self,
                    mut access: A,
                ) -> std::result::Result<Self::Value, A::Error> {
                    let mut map = TreeMultiMap::with_comparator(C::default());
                    while let Some((key, value)) = access.next_element::<(K, T)>()? {
                        map.insert(key, value).map_err(serde::de::Error::custom)?;
                    }
                    Ok(map)
                }
            }

            deserializer.deserialize_seq(SeqVisitor(PhantomData))
        }
    }
}
