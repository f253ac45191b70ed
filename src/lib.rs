//! Ordered map and set collections backed by a plain binary search tree.
//!
//! This crate provides [`BstMap`] and [`BstSet`], ordered collections built on an
//! *unbalanced* binary search tree whose nodes carry parent back-references. The
//! parent links allow ascending iteration in constant auxiliary space, and a
//! detached [`Cursor`] supports removing entries mid-traversal with fail-fast
//! detection of any other structural change:
//!
//! - [`cursor`](BstMap::cursor) - Walk entries in key order while the map stays mutable
//! - [`remove_current`](bst_map::Cursor::remove_current) - Remove the entry the cursor just produced
//! - [`with_comparator`](BstMap::with_comparator) - Order keys by an injected comparison function
//!
//! # Example
//!
//! ```
//! use bst_tree::BstMap;
//!
//! let mut scores = BstMap::new();
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//! scores.insert("Carol", 92);
//!
//! // Standard map operations work as expected.
//! assert_eq!(scores.get(&"Bob"), Some(&85));
//! assert_eq!(scores.len(), 3);
//!
//! // Iteration is in ascending key order.
//! let names: Vec<_> = scores.keys().copied().collect();
//! assert_eq!(names, ["Alice", "Bob", "Carol"]);
//!
//! // A cursor survives mutation through itself, and detects mutation
//! // from anywhere else.
//! let mut cursor = scores.cursor();
//! cursor.next(&scores).unwrap();
//! let (name, _) = cursor.remove_current(&mut scores).unwrap();
//! assert_eq!(name, "Alice");
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Injected ordering** - An optional comparator overrides the key type's `Ord`
//! - **Constant-space iteration** - Parent-pointer threading, no stack or scratch array
//! - **Fail-fast cursors** - Structural changes made outside an active cursor surface
//!   as an error instead of corrupting the traversal
//!
//! # Implementation
//!
//! Nodes live in an arena addressed by stable handles; each node stores its key,
//! a handle to its value, and optional left/right/parent handles. The tree never
//! rebalances: every operation costs time proportional to the depth of the path
//! walked, which is logarithmic for random insertion orders and linear for sorted
//! ones. The insertion and removal algorithms sit behind a shaping-policy seam so
//! a self-adjusting variant could share the same traversal skeleton.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
// NOTE: We allow unsafe code for the raw-pointer arena projections that back
// the mutable value iterators.
// #![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;
#[cfg(test)]
extern crate std;

mod raw;

pub mod bst_map;
pub mod bst_set;

pub use bst_map::{BstMap, Cursor, CursorError};
pub use bst_set::BstSet;
