//! Ordered associative containers backed by one red-black tree engine.
//!
//! This module provides the balancing engine and the four thin facades
//! built on top of it:
//! - `RbTree`: the engine itself, generic over key extraction and comparator
//! - `TreeMap`: ordered unique-key map
//! - `TreeMultiMap`: ordered duplicate-key map
//! - `TreeSet`: ordered unique-key set
//! - `TreeMultiSet`: ordered duplicate-key set
//!
//! The facades forward every call to the engine and only choose how the
//! ordering key is read out of a stored value.

mod balance;
mod iter;
mod map;
mod node;
mod rb_tree;
mod set;

pub use iter::{IntoIter, Iter};
pub use map::{Keys, MapIter, MapIterMut, TreeMap, TreeMultiMap, Values, ValuesMut};
pub use node::MAX_CAPACITY;
pub use rb_tree::{
    FirstOfPair, Identity, KeyCompare, KeyExtract, NaturalOrder, OrderBy, RbTree,
};
pub use set::{TreeMultiSet, TreeSet};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        let mut map = TreeMap::<i32, i32>::new();
        assert_eq!(map.insert(1, 10).unwrap(), None);
        assert_eq!(map.get(&1), Some(&10));

        let mut multimap = TreeMultiMap::<i32, i32>::new();
        multimap.insert(1, 10).unwrap();
        multimap.insert(1, 11).unwrap();
        assert_eq!(multimap.count(&1), 2);

        let mut set = TreeSet::<i32>::new();
        assert!(set.insert(1).unwrap());

        let mut multiset = TreeMultiSet::<i32>::new();
        multiset.insert(1).unwrap();
        multiset.insert(1).unwrap();
        assert_eq!(multiset.count(&1), 2);

        let mut tree: RbTree<i32, Identity, NaturalOrder> = RbTree::new();
        tree.insert_unique(1).unwrap();
        assert!(tree.max_size() <= MAX_CAPACITY);
    }
}
