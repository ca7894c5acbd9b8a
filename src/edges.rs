use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::seq::Idx;

/// Handle of a half-edge in the [`EdgeIndex`] slab.
pub type HalfId = usize;

/// One directed traversal of an undirected edge. Each undirected edge is a
/// pair of cross-wired halves, exactly one of which is the forward half.
#[derive(Debug, Clone, Copy)]
pub(crate) struct HalfEdge<V> {
    pub from: V,
    pub to: V,
    /// The opposite half of the same undirected edge.
    pub inverse: HalfId,
    pub forward: bool,
    /// Sequence node this half-edge owns.
    pub node: Idx,
}

impl<V: Copy + Eq> HalfEdge<V> {
    pub fn contains(&self, v: V) -> bool {
        self.from == v || self.to == v
    }

    pub fn other(&self, v: V) -> V {
        if self.from == v {
            self.to
        } else {
            self.from
        }
    }
}

/// Owns every half-edge and indexes both directions of each undirected edge.
///
/// Vertex ids are only hashable and comparable, so the pair key cannot be
/// normalized by ordering; every lookup instead tries both orderings.
#[derive(Debug)]
pub(crate) struct EdgeIndex<V> {
    halves: Vec<HalfEdge<V>>,
    free: Vec<HalfId>,
    forward: HashMap<(V, V), HalfId>,
    backward: HashMap<(V, V), HalfId>,
}

impl<V> EdgeIndex<V>
where
    V: Copy + Eq + Hash + Debug,
{
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            halves: Vec::with_capacity(capacity),
            free: Vec::new(),
            forward: HashMap::with_capacity(capacity),
            backward: HashMap::with_capacity(capacity),
        }
    }

    pub fn half(&self, h: HalfId) -> &HalfEdge<V> {
        &self.halves[h]
    }

    /// Allocate the cross-wired halves of a new edge {u, v} and index them.
    /// Sequence nodes are not yet assigned; see [`Self::set_node`].
    pub fn alloc_pair(&mut self, u: V, v: V) -> (HalfId, HalfId) {
        assert!(
            !self.forward.contains_key(&(u, v)) && !self.forward.contains_key(&(v, u)),
            "edge between {u:?} and {v:?} already present"
        );
        let f = self.alloc(HalfEdge {
            from: u,
            to: v,
            inverse: 0,
            forward: true,
            node: usize::MAX,
        });
        let b = self.alloc(HalfEdge {
            from: v,
            to: u,
            inverse: f,
            forward: false,
            node: usize::MAX,
        });
        self.halves[f].inverse = b;
        self.forward.insert((u, v), f);
        self.backward.insert((v, u), b);
        (f, b)
    }

    fn alloc(&mut self, half: HalfEdge<V>) -> HalfId {
        if let Some(h) = self.free.pop() {
            self.halves[h] = half;
            h
        } else {
            self.halves.push(half);
            self.halves.len() - 1
        }
    }

    pub fn set_node(&mut self, h: HalfId, node: Idx) {
        self.halves[h].node = node;
    }

    pub fn forward_half(&self, u: V, v: V) -> Option<HalfId> {
        self.forward
            .get(&(u, v))
            .or_else(|| self.forward.get(&(v, u)))
            .copied()
    }

    pub fn backward_half(&self, u: V, v: V) -> Option<HalfId> {
        self.backward
            .get(&(u, v))
            .or_else(|| self.backward.get(&(v, u)))
            .copied()
    }

    pub fn has_edge(&self, u: V, v: V) -> bool {
        self.forward_half(u, v).is_some()
    }

    /// Drop the edge {u, v} from both indexes and return its freed halves
    /// (forward, backward) so the caller can release their sequence nodes.
    pub fn remove(&mut self, u: V, v: V) -> (HalfId, HalfId) {
        let f = self
            .forward
            .remove(&(u, v))
            .or_else(|| self.forward.remove(&(v, u)))
            .unwrap_or_else(|| panic!("no edge between {u:?} and {v:?}"));
        let b = self
            .backward
            .remove(&(u, v))
            .or_else(|| self.backward.remove(&(v, u)))
            .unwrap_or_else(|| panic!("no edge between {u:?} and {v:?}"));
        debug_assert_eq!(self.halves[f].inverse, b);
        debug_assert_eq!(self.halves[b].inverse, f);
        self.free.push(f);
        self.free.push(b);
        (f, b)
    }

    pub fn n_edges(&self) -> usize {
        self.forward.len()
    }

    /// Every present edge as (endpoints, forward half, backward half).
    pub fn pairs(&self) -> impl Iterator<Item = ((V, V), HalfId, HalfId)> + '_ {
        self.forward
            .iter()
            .map(|(&(u, v), &f)| ((u, v), f, self.halves[f].inverse))
    }
}
