//! Sorted-search interval joins over grouped range frames.
//!
//! This crate answers interval-overlap queries between two collections of
//! half-open or closed ranges, each optionally tagged with group-key
//! columns (a chromosome, a partition id) and carrying arbitrary payload
//! columns. For every pair of ranges whose spans intersect it produces a
//! joined row; outer variants surface ranges with no counterpart.
//!
//! Instead of the naive O(n·m) pairwise comparison, both sides of every
//! group are sorted by `(start, end)` and candidate windows are located by
//! binary search, so each group costs roughly O((n+m) log n). Identical
//! input rows can be collapsed into one representative with a multiplicity
//! count so the search phase is bounded by distinct ranges.
//!
//! ## Quick Start
//!
//! ```rust
//! use spanjoin::{Column, Frame, JoinConfig, JoinHow, join, overlaps};
//!
//! let reads = Frame::new(vec![
//!     Column::ints("start", vec![0, 5, 6]),
//!     Column::ints("end", vec![6, 7, 10]),
//! ]).unwrap();
//! let peaks = Frame::new(vec![
//!     Column::ints("start", vec![1, 3, 6]),
//!     Column::ints("end", vec![2, 8, 7]),
//!     Column::strs("name", vec!["a", "b", "c"]),
//! ]).unwrap();
//!
//! let cfg = JoinConfig::default();
//! let paired = join(&reads, &peaks, &cfg, JoinHow::Inner).unwrap();
//! assert_eq!(paired.n_rows(), 6);
//!
//! // only the left side, one row per read with at least one overlap
//! let hit = overlaps(&reads, &peaks, &cfg).unwrap();
//! assert_eq!(hit.n_rows(), 3);
//! ```
//!
//! ## Pipeline
//!
//! The engine is a linear pipeline of pure stages, each producing an
//! immutable structure consumed by the next:
//!
//! 1. [`partition`] — group both inputs by key, sort by `(start, end)`,
//!    collapse duplicates.
//! 2. [`search`] — binary-search insertion points with a leftmost or
//!    rightmost tie-break.
//! 3. [`matcher`] — per-group candidate windows in both directions.
//! 4. [`expand`] — windows to a flat pair list.
//! 5. [`missing`] — rows that matched nothing, for the outer variants.
//!
//! Groups share no mutable state and are processed in parallel.

pub mod expand;
pub mod join;
pub mod matcher;
pub mod missing;
pub mod partition;
pub mod search;

// re-exports
pub use self::join::{join, nonoverlapping, overlaps};
pub use spanjoin_core::{Column, Frame, JoinConfig, JoinError, JoinHow, Value};
