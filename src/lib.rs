//! # Arbora: Ordered Associative Containers
//!
//! This crate provides ordered maps and sets backed by a single red-black
//! tree engine, implemented over an index-linked node arena instead of
//! heap-allocated pointer nodes.
//!
//! ## Key Features
//!
//! - **One balancing engine**: map, multimap, set and multiset are thin
//!   facades over the same `RbTree` core
//! - **Index-linked nodes**: `u32` links in a flat arena for compact nodes
//!   and cheap slot recycling
//! - **Fallible allocation**: every inserting operation reports allocation
//!   failure instead of aborting, leaving the container untouched
//! - **Pluggable ordering**: a comparator type parameter with a zero-cost
//!   `Ord`-based default, plus closure adapters
//! - **Order queries**: `lower_bound`, `upper_bound`, `equal_range` and
//!   O(1) access to both extremes
//! - **Structural validation**: a `validate()` debugging aid that checks
//!   every red-black invariant
//!
//! ## Quick Start
//!
//! ```rust
//! use arbora::{TreeMap, TreeMultiSet, TreeSet};
//!
//! // Ordered unique-key map
//! let mut map = TreeMap::new();
//! map.insert("b", 2).unwrap();
//! map.insert("a", 1).unwrap();
//! assert_eq!(map.get(&"a"), Some(&1));
//! let keys: Vec<&str> = map.keys().copied().collect();
//! assert_eq!(keys, vec!["a", "b"]);
//!
//! // Ordered unique-key set
//! let mut set = TreeSet::new();
//! set.insert(3).unwrap();
//! assert!(!set.insert(3).unwrap());
//!
//! // Duplicates are kept and counted in the multi variants
//! let mut bag = TreeMultiSet::new();
//! bag.insert(7).unwrap();
//! bag.insert(7).unwrap();
//! assert_eq!(bag.count(&7), 2);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod error;
pub mod tree;

// Re-export core types
pub use error::{ArboraError, Result};
pub use tree::{
    FirstOfPair, Identity, KeyCompare, KeyExtract, NaturalOrder, OrderBy, RbTree, TreeMap,
    TreeMultiMap, TreeMultiSet, TreeSet, MAX_CAPACITY,
};
