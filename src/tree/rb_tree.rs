//! The red-black tree engine shared by every ordered container.
//!
//! `RbTree` owns the node arena and implements positioning, the unique and
//! duplicate insertion policies, hint-accelerated insertion, order queries,
//! erasure and deep cloning. It is parameterized over a key-extraction
//! policy (how to read the ordering key out of a stored value) and a
//! comparator, so the map and set facades share one balancing engine.

use crate::error::{ArboraError, Result};
use std::fmt;
use std::marker::PhantomData;
use std::mem;

use super::balance;
use super::iter::{predecessor, successor, IntoIter, Iter, IterMut};
use super::node::{NodeArena, NodeId, HEADER, MAX_CAPACITY, NIL};

/// Derives the ordering key from a stored value.
///
/// Set-like containers store bare keys and use [`Identity`]; map-like
/// containers store `(key, payload)` pairs and use [`FirstOfPair`]. The
/// engine itself never knows which case applies.
pub trait KeyExtract<V> {
    /// The key type values are ordered by.
    type Key;

    /// Borrow the ordering key out of a value.
    fn key(value: &V) -> &Self::Key;
}

/// Key extraction for set-like values: the value is its own key.
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl<V> KeyExtract<V> for Identity {
    type Key = V;

    #[inline]
    fn key(value: &V) -> &V {
        value
    }
}

/// Key extraction for map-like `(key, payload)` pairs.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstOfPair;

impl<K, T> KeyExtract<(K, T)> for FirstOfPair {
    type Key = K;

    #[inline]
    fn key(value: &(K, T)) -> &K {
        &value.0
    }
}

/// A strict weak ordering over keys.
///
/// The engine derives equality as "neither key is less than the other" and
/// assumes nothing beyond strict-weak-ordering semantics. Closures are
/// adapted through [`OrderBy`].
pub trait KeyCompare<K: ?Sized> {
    /// Whether `a` orders strictly before `b`.
    fn less(&self, a: &K, b: &K) -> bool;
}

/// The default comparator: the key type's own `Ord`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> KeyCompare<K> for NaturalOrder {
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        a < b
    }
}

/// Adapter turning a `Fn(&K, &K) -> bool` strict-weak-ordering predicate
/// into a comparator.
#[derive(Clone, Copy, Debug, Default)]
pub struct OrderBy<F>(pub F);

impl<K: ?Sized, F> KeyCompare<K> for OrderBy<F>
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        (self.0)(a, b)
    }
}

/// Outcome of a unique-policy positioning descent.
enum UniquePos {
    /// No equal key exists; link under `parent` on the given side.
    Insert { parent: NodeId, add_left: bool },
    /// A node with an equal key already exists.
    Duplicate(NodeId),
}

/// Self-balancing ordered container engine.
///
/// Point operations are O(log n); traversal is O(n). Mutating operations
/// that allocate return [`Result`] and leave the tree untouched on failure.
///
/// # Examples
///
/// ```rust
/// use arbora::tree::{Identity, NaturalOrder, RbTree};
///
/// let mut tree: RbTree<i32, Identity, NaturalOrder> = RbTree::new();
/// tree.insert_unique(3).unwrap();
/// tree.insert_unique(1).unwrap();
/// tree.insert_unique(2).unwrap();
/// let keys: Vec<i32> = tree.iter().copied().collect();
/// assert_eq!(keys, vec![1, 2, 3]);
/// ```
pub struct RbTree<V, X, C> {
    arena: NodeArena<V>,
    len: usize,
    comp: C,
    _extract: PhantomData<X>,
}

impl<V, X> RbTree<V, X, NaturalOrder>
where
    X: KeyExtract<V>,
    X::Key: Ord,
{
    /// Create an empty tree ordered by the key type's `Ord`.
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<V, X, C> RbTree<V, X, C>
where
    X: KeyExtract<V>,
    C: KeyCompare<X::Key>,
{
    /// Create an empty tree ordered by `comp`.
    pub fn with_comparator(comp: C) -> Self {
        Self {
            arena: NodeArena::new(),
            len: 0,
            comp,
            _extract: PhantomData,
        }
    }

    /// Number of stored values.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of values any tree can hold.
    #[inline]
    pub fn max_size(&self) -> usize {
        MAX_CAPACITY
    }

    /// Borrow the comparator.
    #[inline]
    pub fn key_comp(&self) -> &C {
        &self.comp
    }

    /// The minimum value, in O(1) through the leftmost cache.
    pub fn first(&self) -> Option<&V> {
        if self.len == 0 {
            None
        } else {
            Some(self.arena.value(self.arena.leftmost()))
        }
    }

    /// The maximum value, in O(1) through the rightmost cache.
    pub fn last(&self) -> Option<&V> {
        if self.len == 0 {
            None
        } else {
            Some(self.arena.value(self.arena.rightmost()))
        }
    }

    /// In-order iterator over all values.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(
            &self.arena,
            self.arena.leftmost(),
            self.arena.rightmost(),
            self.len == 0,
        )
    }

    pub(crate) fn iter_mut(&mut self) -> IterMut<'_, V> {
        let front = self.arena.leftmost();
        let back = self.arena.rightmost();
        let done = self.len == 0;
        IterMut::new(&mut self.arena, front, back, done)
    }

    #[inline]
    fn key_at(&self, id: NodeId) -> &X::Key {
        X::key(self.arena.value(id))
    }

    /// Acquire a node slot, enforcing the capacity limit first.
    fn new_node(&mut self, value: V) -> Result<NodeId> {
        if self.len >= MAX_CAPACITY {
            return Err(ArboraError::capacity_exceeded(self.len + 1, MAX_CAPACITY));
        }
        self.arena.allocate(value)
    }

    /// Link `id` below `parent`, update the extreme caches, rebalance.
    fn attach(&mut self, parent: NodeId, id: NodeId, add_left: bool) {
        let a = &mut self.arena;
        a[id].parent = parent;
        if parent == HEADER {
            a.set_root(id);
            a.set_leftmost(id);
            a.set_rightmost(id);
        } else if add_left {
            a[parent].left = id;
            if a.leftmost() == parent {
                a.set_leftmost(id);
            }
        } else {
            a[parent].right = id;
            if a.rightmost() == parent {
                a.set_rightmost(id);
            }
        }
        balance::insert_fixup(a, id);
        self.len += 1;
    }

    /// Descent for the duplicate-permitting policy: track the last node the
    /// key compared less than. Equal keys descend right, so new duplicates
    /// land after all existing equals.
    fn insert_pos_multi(&self, key: &X::Key) -> (NodeId, bool) {
        let a = &self.arena;
        let mut x = a.root();
        let mut parent = HEADER;
        let mut add_left = true;
        while x != NIL {
            parent = x;
            add_left = self.comp.less(key, self.key_at(x));
            x = if add_left { a[x].left } else { a[x].right };
        }
        (parent, add_left)
    }

    /// Descent for the duplicate-rejecting policy: the candidate slot's
    /// in-order predecessor is the only node that can carry an equal key.
    fn insert_pos_unique(&self, key: &X::Key) -> UniquePos {
        let (parent, add_left) = self.insert_pos_multi(key);
        let mut j = parent;
        if add_left {
            if parent == HEADER || parent == self.arena.leftmost() {
                return UniquePos::Insert { parent, add_left };
            }
            j = predecessor(&self.arena, j);
        }
        if self.comp.less(self.key_at(j), key) {
            UniquePos::Insert { parent, add_left }
        } else {
            UniquePos::Duplicate(j)
        }
    }

    /// Insert `value`, permitting duplicate keys.
    pub fn insert_multi(&mut self, value: V) -> Result<()> {
        let (parent, add_left) = self.insert_pos_multi(X::key(&value));
        let id = self.new_node(value)?;
        self.attach(parent, id, add_left);
        Ok(())
    }

    /// Insert `value` unless an equal key is already present.
    ///
    /// Returns `false` (dropping `value`) when a duplicate exists; the tree
    /// is left unchanged.
    pub fn insert_unique(&mut self, value: V) -> Result<bool> {
        match self.insert_pos_unique(X::key(&value)) {
            UniquePos::Insert { parent, add_left } => {
                let id = self.new_node(value)?;
                self.attach(parent, id, add_left);
                Ok(true)
            }
            UniquePos::Duplicate(_) => Ok(false),
        }
    }

    /// Insert `value`, displacing and returning any value with an equal key.
    pub fn insert_or_replace(&mut self, value: V) -> Result<Option<V>> {
        match self.insert_pos_unique(X::key(&value)) {
            UniquePos::Insert { parent, add_left } => {
                let id = self.new_node(value)?;
                self.attach(parent, id, add_left);
                Ok(None)
            }
            UniquePos::Duplicate(id) => Ok(Some(self.arena.replace_value(id, value))),
        }
    }

    /// Duplicate-permitting insertion with a position hint.
    ///
    /// `hint` is the node the new value is expected to precede (the header
    /// meaning "append"). When the hint's neighbors bracket the key the
    /// link happens without a descent; otherwise this falls back to
    /// [`insert_multi`](Self::insert_multi) and produces identical results.
    pub(crate) fn insert_multi_hinted(&mut self, hint: NodeId, value: V) -> Result<()> {
        if self.len == 0 {
            let id = self.new_node(value)?;
            self.attach(HEADER, id, true);
            return Ok(());
        }
        if hint == HEADER {
            let rightmost = self.arena.rightmost();
            if !self.comp.less(X::key(&value), self.key_at(rightmost)) {
                let id = self.new_node(value)?;
                self.attach(rightmost, id, false);
                return Ok(());
            }
        } else if hint == self.arena.leftmost() {
            if self.comp.less(X::key(&value), self.key_at(hint)) {
                let id = self.new_node(value)?;
                self.attach(hint, id, true);
                return Ok(());
            }
        } else {
            let before = predecessor(&self.arena, hint);
            if !self.comp.less(X::key(&value), self.key_at(before))
                && !self.comp.less(self.key_at(hint), X::key(&value))
            {
                // before <= value <= hint: one of the two adjacent links
                // must be open.
                if self.arena[before].right == NIL {
                    let id = self.new_node(value)?;
                    self.attach(before, id, false);
                    return Ok(());
                }
                if self.arena[hint].left == NIL {
                    let id = self.new_node(value)?;
                    self.attach(hint, id, true);
                    return Ok(());
                }
            }
        }
        self.insert_multi(value)
    }

    /// Duplicate-rejecting insertion with a position hint; see
    /// [`insert_multi_hinted`](Self::insert_multi_hinted).
    pub(crate) fn insert_unique_hinted(&mut self, hint: NodeId, value: V) -> Result<bool> {
        if self.len == 0 {
            let id = self.new_node(value)?;
            self.attach(HEADER, id, true);
            return Ok(true);
        }
        if hint == HEADER {
            let rightmost = self.arena.rightmost();
            if self.comp.less(self.key_at(rightmost), X::key(&value)) {
                let id = self.new_node(value)?;
                self.attach(rightmost, id, false);
                return Ok(true);
            }
        } else if hint == self.arena.leftmost() {
            if self.comp.less(X::key(&value), self.key_at(hint)) {
                let id = self.new_node(value)?;
                self.attach(hint, id, true);
                return Ok(true);
            }
        } else {
            let before = predecessor(&self.arena, hint);
            if self.comp.less(self.key_at(before), X::key(&value))
                && self.comp.less(X::key(&value), self.key_at(hint))
            {
                if self.arena[before].right == NIL {
                    let id = self.new_node(value)?;
                    self.attach(before, id, false);
                    return Ok(true);
                }
                if self.arena[hint].left == NIL {
                    let id = self.new_node(value)?;
                    self.attach(hint, id, true);
                    return Ok(true);
                }
            }
        }
        self.insert_unique(value)
    }

    /// Insert every value, permitting duplicates. Sorted input links in
    /// O(1) per element through the append hint.
    pub fn extend_multi<I>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
    {
        for value in values {
            self.insert_multi_hinted(HEADER, value)?;
        }
        Ok(())
    }

    /// Insert every value, skipping duplicates.
    pub fn extend_unique<I>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
    {
        for value in values {
            self.insert_unique_hinted(HEADER, value)?;
        }
        Ok(())
    }

    /// First node whose key is not less than `key`, or the header.
    fn lower_bound_node(&self, key: &X::Key) -> NodeId {
        let a = &self.arena;
        let mut x = a.root();
        let mut result = HEADER;
        while x != NIL {
            if !self.comp.less(self.key_at(x), key) {
                result = x;
                x = a[x].left;
            } else {
                x = a[x].right;
            }
        }
        result
    }

    /// First node whose key is greater than `key`, or the header.
    fn upper_bound_node(&self, key: &X::Key) -> NodeId {
        let a = &self.arena;
        let mut x = a.root();
        let mut result = HEADER;
        while x != NIL {
            if self.comp.less(key, self.key_at(x)) {
                result = x;
                x = a[x].left;
            } else {
                x = a[x].right;
            }
        }
        result
    }

    pub(crate) fn find_node(&self, key: &X::Key) -> NodeId {
        let j = self.lower_bound_node(key);
        if j == HEADER || self.comp.less(key, self.key_at(j)) {
            HEADER
        } else {
            j
        }
    }

    /// Look up a value by key. With duplicate keys this is the first of the
    /// equal run.
    pub fn find(&self, key: &X::Key) -> Option<&V> {
        let id = self.find_node(key);
        if id == HEADER {
            None
        } else {
            Some(self.arena.value(id))
        }
    }

    pub(crate) fn find_value_mut(&mut self, key: &X::Key) -> Option<&mut V> {
        let id = self.find_node(key);
        if id == HEADER {
            None
        } else {
            Some(self.arena.value_mut(id))
        }
    }

    /// Whether a value with an equal key exists.
    pub fn contains(&self, key: &X::Key) -> bool {
        self.find_node(key) != HEADER
    }

    /// Number of values with an equal key under the unique policy: 0 or 1.
    pub fn count_unique(&self, key: &X::Key) -> usize {
        usize::from(self.contains(key))
    }

    /// Number of values with an equal key.
    pub fn count_multi(&self, key: &X::Key) -> usize {
        self.equal_range_multi(key).count()
    }

    /// Iterator over a node range `[first, last)`, `HEADER` meaning end.
    fn make_iter(&self, first: NodeId, last: NodeId) -> Iter<'_, V> {
        if first == last {
            return Iter::empty(&self.arena);
        }
        let back = if last == HEADER {
            self.arena.rightmost()
        } else {
            predecessor(&self.arena, last)
        };
        Iter::new(&self.arena, first, back, false)
    }

    /// Iterator from the first value whose key is not less than `key`.
    pub fn lower_bound(&self, key: &X::Key) -> Iter<'_, V> {
        self.make_iter(self.lower_bound_node(key), HEADER)
    }

    /// Iterator from the first value whose key is greater than `key`.
    pub fn upper_bound(&self, key: &X::Key) -> Iter<'_, V> {
        self.make_iter(self.upper_bound_node(key), HEADER)
    }

    /// Iterator over every value with an equal key.
    pub fn equal_range_multi(&self, key: &X::Key) -> Iter<'_, V> {
        self.make_iter(self.lower_bound_node(key), self.upper_bound_node(key))
    }

    /// Equal-key range under the unique policy: at most one value.
    pub fn equal_range_unique(&self, key: &X::Key) -> Iter<'_, V> {
        let id = self.find_node(key);
        if id == HEADER {
            Iter::empty(&self.arena)
        } else {
            Iter::new(&self.arena, id, id, false)
        }
    }

    /// Unlink and return the value at `id`.
    pub(crate) fn erase_node(&mut self, id: NodeId) -> V {
        balance::erase_rebalance(&mut self.arena, id);
        self.len -= 1;
        self.arena.release(id)
    }

    /// Erase the node range `[first, last)`, returning the count removed.
    /// Erasing everything dispatches to [`clear`](Self::clear).
    pub(crate) fn erase_range(&mut self, first: NodeId, last: NodeId) -> usize {
        if first == self.arena.leftmost() && last == HEADER {
            let n = self.len;
            self.clear();
            return n;
        }
        let mut removed = 0;
        let mut cur = first;
        while cur != last {
            let next = successor(&self.arena, cur);
            self.erase_node(cur);
            removed += 1;
            cur = next;
        }
        removed
    }

    /// Remove at most one value with an equal key and return it.
    pub fn remove_unique(&mut self, key: &X::Key) -> Option<V> {
        let id = self.find_node(key);
        if id == HEADER {
            None
        } else {
            Some(self.erase_node(id))
        }
    }

    /// Remove every value with an equal key, returning the count removed.
    pub fn remove_multi(&mut self, key: &X::Key) -> usize {
        let first = self.lower_bound_node(key);
        let last = self.upper_bound_node(key);
        self.erase_range(first, last)
    }

    /// Remove and return the minimum value.
    pub fn pop_first(&mut self) -> Option<V> {
        if self.len == 0 {
            None
        } else {
            let id = self.arena.leftmost();
            Some(self.erase_node(id))
        }
    }

    /// Remove and return the maximum value.
    pub fn pop_last(&mut self) -> Option<V> {
        if self.len == 0 {
            None
        } else {
            let id = self.arena.rightmost();
            Some(self.erase_node(id))
        }
    }

    /// Drop every value and return to the empty state.
    pub fn clear(&mut self) {
        self.arena.reset();
        self.len = 0;
    }

    /// Exchange contents, count and comparator with `other` in O(1). No
    /// node is touched.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Verify every structural invariant: ordering, the red-parent rule,
    /// black-height equality, the extreme caches and the element count.
    ///
    /// Intended for tests and debugging; O(n).
    pub fn validate(&self) -> Result<()> {
        let a = &self.arena;
        let root = a.root();
        if root == NIL {
            if self.len != 0 {
                return Err(ArboraError::invalid_state("empty tree with nonzero len"));
            }
            if a.leftmost() != HEADER || a.rightmost() != HEADER {
                return Err(ArboraError::invalid_state(
                    "empty tree with dangling extreme caches",
                ));
            }
            return Ok(());
        }
        if a.is_red(root) {
            return Err(ArboraError::invalid_state("root is red"));
        }
        if a.leftmost() != a.minimum(root) {
            return Err(ArboraError::invalid_state("stale leftmost cache"));
        }
        if a.rightmost() != a.maximum(root) {
            return Err(ArboraError::invalid_state("stale rightmost cache"));
        }
        let mut count = 0usize;
        let mut prev = NIL;
        let mut cur = a.leftmost();
        while cur != HEADER {
            count += 1;
            if a.is_red(cur) {
                let parent = a[cur].parent;
                if parent != HEADER && a.is_red(parent) {
                    return Err(ArboraError::invalid_state("red node with red parent"));
                }
            }
            if prev != NIL && self.comp.less(self.key_at(cur), self.key_at(prev)) {
                return Err(ArboraError::invalid_state("in-order sequence out of order"));
            }
            prev = cur;
            cur = successor(a, cur);
        }
        if count != self.len {
            return Err(ArboraError::invalid_state(format!(
                "len {} disagrees with traversal count {}",
                self.len, count
            )));
        }
        self.black_height(root).map(|_| ())
    }

    fn black_height(&self, id: NodeId) -> Result<usize> {
        if id == NIL {
            return Ok(1);
        }
        let a = &self.arena;
        let left = self.black_height(a[id].left)?;
        let right = self.black_height(a[id].right)?;
        if left != right {
            return Err(ArboraError::invalid_state("unequal black-height"));
        }
        Ok(left + usize::from(!a.is_red(id)))
    }
}

impl<V, X, C> Default for RbTree<V, X, C>
where
    X: KeyExtract<V>,
    C: KeyCompare<X::Key> + Default,
{
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<V: Clone, X, C: Clone> Clone for RbTree<V, X, C> {
    /// Deep clone: new nodes, identical topology and colors. A panicking
    /// value clone releases every node cloned so far through the arena's
    /// drop glue, leaving the source untouched.
    fn clone(&self) -> Self {
        Self {
            arena: self.arena.clone(),
            len: self.len,
            comp: self.comp.clone(),
            _extract: PhantomData,
        }
    }
}

impl<V, X, C> fmt::Debug for RbTree<V, X, C>
where
    V: fmt::Debug,
    X: KeyExtract<V>,
    C: KeyCompare<X::Key>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<V, X, C> IntoIterator for RbTree<V, X, C> {
    type Item = V;
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> IntoIter<V> {
        IntoIter::new(self.arena, self.len)
    }
}

impl<'a, V, X, C> IntoIterator for &'a RbTree<V, X, C>
where
    X: KeyExtract<V>,
    C: KeyCompare<X::Key>,
{
    type Item = &'a V;
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntTree = RbTree<i32, Identity, NaturalOrder>;
    type PairTree = RbTree<(i32, u32), FirstOfPair, NaturalOrder>;

    fn scenario_a_tree() -> IntTree {
        let mut tree = IntTree::new();
        for key in [5, 3, 8, 1, 4, 7, 9] {
            assert!(tree.insert_unique(key).unwrap());
        }
        tree
    }

    #[test]
    fn test_scenario_a_queries() {
        let tree = scenario_a_tree();
        let keys: Vec<i32> = tree.iter().copied().collect();
        assert_eq!(keys, vec![1, 3, 4, 5, 7, 8, 9]);
        assert!(tree.find(&6).is_none());
        assert_eq!(tree.lower_bound(&4).next(), Some(&4));
        assert_eq!(tree.upper_bound(&4).next(), Some(&5));
        tree.validate().unwrap();
    }

    #[test]
    fn test_scenario_b_erase_keeps_invariants() {
        let mut tree = scenario_a_tree();
        assert_eq!(tree.remove_unique(&8), Some(8));
        let keys: Vec<i32> = tree.iter().copied().collect();
        assert_eq!(keys, vec![1, 3, 4, 5, 7, 9]);
        tree.validate().unwrap();
    }

    #[test]
    fn test_scenario_c_multi_equal_run() {
        let mut tree = IntTree::new();
        for key in [2, 2, 2, 1, 3] {
            tree.insert_multi(key).unwrap();
        }
        assert_eq!(tree.count_multi(&2), 3);
        let run: Vec<i32> = tree.equal_range_multi(&2).copied().collect();
        assert_eq!(run, vec![2, 2, 2]);
        assert_eq!(tree.remove_multi(&2), 3);
        assert_eq!(tree.len(), 2);
        tree.validate().unwrap();
    }

    #[test]
    fn test_unique_rejects_duplicate_unchanged() {
        let mut tree = IntTree::new();
        assert!(tree.insert_unique(5).unwrap());
        assert!(!tree.insert_unique(5).unwrap());
        assert_eq!(tree.len(), 1);
        tree.validate().unwrap();
    }

    #[test]
    fn test_insert_or_replace_returns_old_value() {
        let mut tree = PairTree::new();
        assert_eq!(tree.insert_or_replace((7, 1)).unwrap(), None);
        assert_eq!(tree.insert_or_replace((7, 2)).unwrap(), Some((7, 1)));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.find(&7), Some(&(7, 2)));
    }

    #[test]
    fn test_multi_duplicates_land_after_existing_equals() {
        // Pins the duplicate insertion position: equal keys descend right,
        // so payloads of equal keys appear in insertion order.
        let mut tree = PairTree::new();
        for (seq, key) in [2, 2, 1, 2, 3].into_iter().enumerate() {
            tree.insert_multi((key, seq as u32)).unwrap();
        }
        let values: Vec<(i32, u32)> = tree.iter().cloned().collect();
        assert_eq!(values, vec![(1, 2), (2, 0), (2, 1), (2, 3), (3, 4)]);
        tree.validate().unwrap();
    }

    #[test]
    fn test_remove_missing_key_is_noop() {
        let mut tree = scenario_a_tree();
        assert_eq!(tree.remove_unique(&42), None);
        assert_eq!(tree.remove_multi(&42), 0);
        assert_eq!(tree.len(), 7);
        tree.validate().unwrap();
    }

    #[test]
    fn test_clear_twice_is_safe() {
        let mut tree = scenario_a_tree();
        tree.clear();
        assert!(tree.is_empty());
        tree.validate().unwrap();
        tree.clear();
        assert!(tree.is_empty());
        tree.insert_unique(1).unwrap();
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_remove_multi_of_everything_dispatches_to_clear() {
        let mut tree = IntTree::new();
        for _ in 0..5 {
            tree.insert_multi(9).unwrap();
        }
        assert_eq!(tree.remove_multi(&9), 5);
        assert!(tree.is_empty());
        tree.validate().unwrap();
    }

    #[test]
    fn test_hinted_insert_matches_plain_insert() {
        let keys = [5, 1, 9, 3, 3, 7, 2, 8, 3, 0, 9];
        let mut plain = IntTree::new();
        for key in keys {
            plain.insert_multi(key).unwrap();
        }

        // Append hints, mostly wrong: the fallback descent must produce the
        // identical sequence.
        let mut hinted = IntTree::new();
        for key in keys {
            hinted.insert_multi_hinted(HEADER, key).unwrap();
        }
        assert!(plain.iter().eq(hinted.iter()));
        hinted.validate().unwrap();

        // Accurate hints: position each insert just past its key.
        let mut aimed = IntTree::new();
        for key in keys {
            let hint = aimed.upper_bound_node(&key);
            aimed.insert_multi_hinted(hint, key).unwrap();
        }
        assert!(plain.iter().eq(aimed.iter()));
        aimed.validate().unwrap();
    }

    #[test]
    fn test_hinted_unique_matches_plain_unique() {
        let keys = [4, 4, 2, 6, 2, 8, 1];
        let mut plain = IntTree::new();
        let mut hinted = IntTree::new();
        for key in keys {
            let expected = plain.insert_unique(key).unwrap();
            let hint = hinted.lower_bound_node(&key);
            assert_eq!(hinted.insert_unique_hinted(hint, key).unwrap(), expected);
        }
        assert!(plain.iter().eq(hinted.iter()));
        hinted.validate().unwrap();
    }

    #[test]
    fn test_extend_sorted_input_stays_balanced() {
        let mut tree = IntTree::new();
        tree.extend_unique(0..64).unwrap();
        assert_eq!(tree.len(), 64);
        tree.validate().unwrap();
        assert_eq!(tree.first(), Some(&0));
        assert_eq!(tree.last(), Some(&63));
    }

    #[test]
    fn test_clone_is_deep_and_valid() {
        let mut tree = scenario_a_tree();
        let copy = tree.clone();
        tree.remove_unique(&5);
        assert_eq!(copy.len(), 7);
        let keys: Vec<i32> = copy.iter().copied().collect();
        assert_eq!(keys, vec![1, 3, 4, 5, 7, 8, 9]);
        copy.validate().unwrap();
    }

    #[test]
    fn test_swap_exchanges_contents() {
        let mut a = scenario_a_tree();
        let mut b = IntTree::new();
        b.insert_unique(100).unwrap();
        a.swap(&mut b);
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 7);
        assert_eq!(a.first(), Some(&100));
        assert_eq!(b.first(), Some(&1));
    }

    #[test]
    fn test_pop_first_and_last() {
        let mut tree = scenario_a_tree();
        assert_eq!(tree.pop_first(), Some(1));
        assert_eq!(tree.pop_last(), Some(9));
        assert_eq!(tree.len(), 5);
        tree.validate().unwrap();
        tree.clear();
        assert_eq!(tree.pop_first(), None);
        assert_eq!(tree.pop_last(), None);
    }

    #[test]
    fn test_custom_comparator_reverses_order() {
        let mut tree: RbTree<i32, Identity, _> =
            RbTree::with_comparator(OrderBy(|a: &i32, b: &i32| a > b));
        tree.extend_unique([3, 1, 2]).unwrap();
        let keys: Vec<i32> = tree.iter().copied().collect();
        assert_eq!(keys, vec![3, 2, 1]);
        tree.validate().unwrap();
    }

    #[test]
    fn test_max_size_reports_limit() {
        let tree = IntTree::new();
        assert_eq!(tree.max_size(), MAX_CAPACITY);
    }

    #[test]
    fn test_erase_reuses_slots() {
        // Interleaved insert/erase churn must keep the structure valid.
        let mut tree = IntTree::new();
        for round in 0..4 {
            for key in 0..32 {
                tree.insert_multi(key * 4 + round).unwrap();
            }
            for key in 0..16 {
                tree.remove_multi(&(key * 8 + round));
            }
            tree.validate().unwrap();
        }
    }
}
