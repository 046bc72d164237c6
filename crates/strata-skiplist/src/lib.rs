//! An in-memory ordered map backed by a probabilistic [skiplist]: a layered
//! set of singly-linked sorted lists giving expected `O(log n)` search,
//! insert, update, and delete without tree-rebalancing logic.
//!
//! The structure is single-threaded by design. Absence of a key is a regular
//! outcome signaled through `Option`, never an error; the only fallible
//! operation is construction with an invalid level bound.
//!
//! ```
//! use strata_skiplist::SkipList;
//!
//! let mut list = SkipList::new(8)?;
//!
//! list.update(5, "five");
//! list.update(1, "one");
//! list.update(5, "FIVE");
//!
//! assert_eq!(list.find(&5), Some(&"FIVE"));
//! assert_eq!(list.len(), 2);
//!
//! list.erase(&5);
//! assert!(!list.contains(&5));
//! # Ok::<(), strata_skiplist::ConstructError>(())
//! ```
//!
//! [skiplist]: https://en.wikipedia.org/wiki/Skip_list

mod error;
mod level_list;
mod level_rng;
mod list;
mod node;


pub use self::{error::ConstructError, list::SkipList};
