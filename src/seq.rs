use std::cmp::Ordering;
use std::fmt::Debug;

pub mod treap;

/// Handle of a node inside a [`Sequence`] store.
pub type Idx = usize;

/// Contract for the ordered-sequence collaborator backing the tours.
///
/// A store holds many disjoint sequences at once. Nodes are addressed by
/// stable [`Idx`] handles that survive splits and concatenations; the
/// sequences themselves are identified only through the nodes they contain
/// (two nodes are in the same sequence iff they share a [`root`]).
///
/// Implementations are expected to answer every query and perform every
/// restructuring in O(log n) expected time, except reference implementations
/// used for testing, which may be linear.
///
/// [`root`]: Sequence::root
pub trait Sequence<T>
where
    T: Debug + Clone,
    Self: Sized + Debug,
{
    /// Returned when the requested node doesn't exist.
    const EMPTY: Idx = usize::MAX;

    /// New store with room for `capacity` nodes.
    fn new(capacity: usize) -> Self;

    /// Create a new node holding `data`, alone in its own sequence.
    /// Handles count up from 0; released handles may be reused.
    fn create(&mut self, data: T) -> Idx;

    /// Release a node so its handle can be reused. Panics unless the node is
    /// alone in its sequence.
    fn release(&mut self, u: Idx);

    /// Data stored at `u`.
    fn data(&self, u: Idx) -> &T;

    /// Number of live nodes across all sequences.
    fn total_size(&self) -> usize;

    /// Canonical representative of the sequence containing `u`. All nodes of
    /// one sequence report the same root.
    fn root(&self, u: Idx) -> Idx;

    /// First node of the sequence containing `u`.
    fn first(&self, u: Idx) -> Idx;

    /// Last node of the sequence containing `u`.
    fn last(&self, u: Idx) -> Idx;

    /// Node right after `u` in its sequence, or `EMPTY` at the end.
    fn next(&self, u: Idx) -> Idx;

    /// Node right before `u` in its sequence, or `EMPTY` at the start.
    fn prev(&self, u: Idx) -> Idx;

    /// Length of the sequence containing `u`. 0 for `EMPTY`.
    fn len(&self, u: Idx) -> usize;

    /// Position of `u` in its sequence, 0-indexed.
    fn order(&self, u: Idx) -> usize;

    /// Relative order of `a` and `b`. Only meaningful when both nodes are in
    /// the same sequence.
    fn compare(&self, a: Idx, b: Idx) -> Ordering {
        self.order(a).cmp(&self.order(b))
    }

    /// Detach everything before `u` into its own sequence and return its
    /// root, or `EMPTY` if `u` was already first. `u` stays with the rest.
    fn split_before(&mut self, u: Idx) -> Idx;

    /// Detach everything after `u` into its own sequence and return its
    /// root, or `EMPTY` if `u` was already last. `u` stays with the rest.
    fn split_after(&mut self, u: Idx) -> Idx;

    /// Concatenate the sequence containing `v` after the one containing `u`.
    /// Returns the root of the combined sequence.
    fn concat(&mut self, u: Idx, v: Idx) -> Idx;

    fn is_first(&self, u: Idx) -> bool {
        self.order(u) == 0
    }

    fn is_last(&self, u: Idx) -> bool {
        self.order(u) + 1 == self.len(u)
    }

    /// Are the two nodes part of the same sequence?
    fn on_same_seq(&self, u: Idx, v: Idx) -> bool {
        self.root(u) == self.root(v)
    }

    /// Is the handle the empty sentinel?
    fn is_empty(&self, u: Idx) -> bool {
        u == Self::EMPTY
    }
}
