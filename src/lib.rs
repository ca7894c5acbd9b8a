//! Dynamic connectivity for undirected forests using Euler tour trees.
//!
//! Every component of the forest is represented by an Euler tour: a cyclic
//! sequence of half-edges visiting each edge once per direction, stored in a
//! balanced search tree keyed by implicit position. Linking two components
//! splices their tours around a fresh half-edge pair; cutting an edge splits
//! the tour and rejoins the outside. Connectivity then reduces to comparing
//! tree roots, so `link`, `cut`, `connected`, `size` and re-rooting all run
//! in O(log n) expected time.
//!
//! ## Usage
//!
//! ```
//! use euler_forest::EulerTour;
//!
//! let mut forest = EulerTour::new();
//! for v in 0..5 {
//!     forest.create_vertex(v);
//! }
//! forest.link(0, 1);
//! forest.link(1, 2);
//! assert!(forest.connected(0, 2));
//! assert_eq!(forest.size(1), 3);
//! assert_eq!(forest.n_components(), 3);
//! forest.cut(1, 2);
//! assert!(!forest.connected(0, 2));
//! ```
//!
//! You can see example usage at `src/bin/example.rs` and run it with
//! `cargo run`.
//!
//! ## Implementation
//!
//! The tour storage is behind the [`seq::Sequence`] trait so the engine can
//! be driven by any positionally-keyed balanced tree; the provided backend
//! is a treap ([`seq::treap::Treap`]). To read the engine itself, see
//! `impl EulerForest` in `src/forest.rs`.
//!
//! ## Testing
//!
//! Run the tests using:
//!
//! ```skip
//! cargo test
//! ```
//!
//! Add `-- --ignored` to run the stress tests (which run indefinitely with
//! random data until they fail). And use `cargo bench` to see the
//! benchmarks.

pub mod forest;
pub mod seq;

mod edges;

pub use edges::HalfId;
pub use forest::{EulerForest, TourEdge};

use seq::treap::Treap;

/// Treap-backed forest, the default configuration. Plug a different
/// [`seq::Sequence`] implementation into [`EulerForest`] to swap backends.
pub type EulerTour<V> = EulerForest<V, Treap<HalfId>>;
