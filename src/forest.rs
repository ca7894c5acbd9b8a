//! The tour engine: maintains one Euler tour per component of an undirected
//! forest, stored as sequences of half-edges, and answers connectivity
//! queries by comparing sequence roots.
//!
//! Each vertex keeps two anchors into its tour: the first half-edge touching
//! it (`left_out`) and the last one (`right_in`). Linking splices two tours
//! around a fresh pair of half-edges; cutting extracts the segment between
//! the two halves of the removed edge and rejoins the outside. All
//! restructuring goes through [`EulerForest::make_root`] and the split/concat
//! primitives of the sequence collaborator.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt::{self, Debug};
use std::hash::Hash;

use crate::edges::{EdgeIndex, HalfEdge, HalfId};
use crate::seq::{Idx, Sequence};

/// Per-vertex anchors into the tour sequence. Both absent iff the vertex has
/// no incident edges.
#[derive(Debug, Clone, Default)]
struct VertexRec {
    /// First half-edge touching the vertex in tour order.
    left_out: Option<HalfId>,
    /// Last half-edge touching the vertex in tour order.
    right_in: Option<HalfId>,
}

impl VertexRec {
    fn is_singleton(&self) -> bool {
        debug_assert_eq!(self.left_out.is_none(), self.right_in.is_none());
        self.left_out.is_none()
    }
}

/// One directed traversal yielded by [`EulerForest::edge_iter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TourEdge<V> {
    pub from: V,
    pub to: V,
    /// Whether this is the forward half of its undirected edge.
    pub forward: bool,
}

/// Dynamic connectivity over an undirected forest.
///
/// Vertices are opaque caller-supplied ids; edges are inserted with
/// [`link`](Self::link) and removed with [`cut`](Self::cut), both in
/// O(log n) expected time, as are the queries. Linking two vertices of the
/// same component or cutting an absent edge is a programmer error and
/// panics; lookups of unknown ids in pure queries report absence instead.
///
/// The sequence backend is pluggable through [`Sequence`]; use the
/// [`EulerTour`](crate::EulerTour) alias for the treap-backed forest.
pub struct EulerForest<V, S> {
    vertices: HashMap<V, VertexRec>,
    edges: EdgeIndex<V>,
    seq: S,
    n_components: usize,
}

impl<V, S> EulerForest<V, S>
where
    V: Copy + Eq + Hash + Debug,
    S: Sequence<HalfId>,
{
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            vertices: HashMap::with_capacity(capacity),
            edges: EdgeIndex::with_capacity(capacity),
            seq: S::new(2 * capacity),
            n_components: 0,
        }
    }

    /// Add an isolated vertex. Panics if the id is already present.
    pub fn create_vertex(&mut self, id: V) {
        let prev = self.vertices.insert(id, VertexRec::default());
        assert!(prev.is_none(), "vertex {id:?} already exists");
        self.n_components += 1;
    }

    /// Remove a vertex with no incident edges. The caller must cut any
    /// incident edges first; panics otherwise.
    pub fn remove_vertex(&mut self, id: V) {
        let rec = self
            .vertices
            .remove(&id)
            .unwrap_or_else(|| panic!("removing unknown vertex {id:?}"));
        assert!(
            rec.is_singleton(),
            "vertex {id:?} still has incident edges"
        );
        self.n_components -= 1;
    }

    pub fn contains_vertex(&self, id: V) -> bool {
        self.vertices.contains_key(&id)
    }

    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of connected components of the forest.
    pub fn n_components(&self) -> usize {
        self.n_components
    }

    /// Number of edges currently present.
    pub fn n_edges(&self) -> usize {
        self.edges.n_edges()
    }

    pub fn has_edge(&self, u: V, v: V) -> bool {
        self.edges.has_edge(u, v)
    }

    fn rec(&self, v: V) -> &VertexRec {
        self.vertices
            .get(&v)
            .unwrap_or_else(|| panic!("unknown vertex {v:?}"))
    }

    fn rec_mut(&mut self, v: V) -> &mut VertexRec {
        self.vertices
            .get_mut(&v)
            .unwrap_or_else(|| panic!("unknown vertex {v:?}"))
    }

    /// Sequence node of the vertex's first anchor, if any.
    fn out_node(&self, rec: &VertexRec) -> Option<Idx> {
        rec.left_out.map(|h| self.edges.half(h).node)
    }

    /// Are `u` and `v` in the same component? Absent ids are connected to
    /// nothing, not even themselves.
    pub fn connected(&self, u: V, v: V) -> bool {
        let (Some(ur), Some(vr)) = (self.vertices.get(&u), self.vertices.get(&v)) else {
            return false;
        };
        if u == v {
            return true;
        }
        match (self.out_node(ur), self.out_node(vr)) {
            (Some(a), Some(b)) => self.seq.on_same_seq(a, b),
            _ => false,
        }
    }

    /// The vertex at which `v`'s tour currently starts, or `None` if `v` is
    /// a singleton or absent.
    pub fn find_root(&self, v: V) -> Option<V> {
        let rec = self.vertices.get(&v)?;
        let node = self.out_node(rec)?;
        let min = self.seq.first(node);
        Some(self.edges.half(*self.seq.data(min)).from)
    }

    /// Number of vertices in `v`'s component. A tour over k vertices has
    /// 2(k-1) half-edges.
    pub fn size(&self, v: V) -> usize {
        match self.out_node(self.rec(v)) {
            None => 1,
            Some(node) => self.seq.len(node) / 2 + 1,
        }
    }

    fn half(&self, h: HalfId) -> HalfEdge<V> {
        *self.edges.half(h)
    }

    /// Rotate `v`'s tour so it starts at `v`. No-op for singletons and for
    /// two-node tours, which are valid roots either way.
    pub fn make_root(&mut self, v: V) {
        let rec = self.rec(v);
        let (Some(a), Some(b)) = (rec.left_out, rec.right_in) else {
            return;
        };
        let an = self.half(a).node;
        if self.seq.len(an) == 2 {
            debug_assert!(self.seq.on_same_seq(an, self.half(b).node));
            return;
        }
        log::trace!("make_root({v:?})");
        let bn = self.half(b).node;
        let mut f = if self.seq.compare(an, bn) == Ordering::Greater {
            b
        } else {
            a
        };
        let fh = self.half(f);
        let other = fh.other(v);
        // f precedes the closing anchor, so it has a successor.
        let next = self.seq.next(fh.node);
        let nh = self.half(*self.seq.data(next));
        let mut rotate = true;
        if !nh.contains(v) {
            // The tour must be split just before this visit of v.
            let p = self.seq.prev(fh.node);
            if p == S::EMPTY {
                rotate = false; // v is already first
            } else {
                f = *self.seq.data(p);
            }
        } else if nh.contains(other) {
            // The successor is f's inverse; when the tour continues at v
            // past the excursion, the split point moves beyond it.
            let mut nn = self.seq.next(next);
            if nn == S::EMPTY {
                nn = self.seq.prev(fh.node);
            }
            if nn != S::EMPTY && self.half(*self.seq.data(nn)).contains(v) {
                f = *self.seq.data(next);
            }
        }
        if rotate {
            let fnode = self.half(f).node;
            let right = self.seq.split_after(fnode);
            if right != S::EMPTY {
                self.seq.concat(right, fnode);
            }
        }
        // Tours spliced around a two-node tour pointing the other way can
        // leave the minimum entering v instead of leaving it; one more
        // rotation to the inverse half settles it.
        let min = self.seq.first(an);
        let mh = self.half(*self.seq.data(min));
        debug_assert!(mh.contains(v));
        if mh.from != v {
            let inv = self.half(mh.inverse).node;
            let left = self.seq.split_before(inv);
            if left != S::EMPTY {
                self.seq.concat(inv, left);
            }
        }
        debug_assert_eq!(self.find_root(v), Some(v));
    }

    /// Join the components of `u` and `v` with a new edge. Panics if the
    /// vertices coincide, are unknown, or are already connected.
    pub fn link(&mut self, u: V, v: V) {
        assert!(u != v, "cannot link {u:?} to itself");
        assert!(
            self.contains_vertex(u) && self.contains_vertex(v),
            "linking unknown vertices {u:?}, {v:?}"
        );
        assert!(
            !self.connected(u, v),
            "{u:?} and {v:?} are already connected"
        );
        log::trace!("link({u:?}, {v:?})");
        self.n_components -= 1;
        let (f, b) = self.edges.alloc_pair(u, v);
        let fnode = self.seq.create(f);
        let bnode = self.seq.create(b);
        self.edges.set_node(f, fnode);
        self.edges.set_node(b, bnode);

        self.make_root(u);
        self.make_root(v);

        // Splice into [u's tour] F [v's tour] B.
        let u_out = self.rec(u).left_out;
        let v_out = self.rec(v).left_out;
        let v_in = self.rec(v).right_in;
        let u_tour = if let Some(h) = u_out {
            let n = self.half(h).node;
            self.seq.concat(n, fnode);
            n
        } else {
            self.rec_mut(u).left_out = Some(f);
            fnode
        };
        if let Some(h) = v_out {
            let n = self.half(h).node;
            self.seq.concat(fnode, n);
        } else {
            self.rec_mut(v).left_out = Some(f);
        }
        if let Some(h) = v_in {
            let n = self.half(h).node;
            self.seq.concat(n, bnode);
        } else {
            self.rec_mut(v).right_in = Some(b);
            self.seq.concat(u_tour, bnode);
        }
        self.rec_mut(u).right_in = Some(b);

        debug_assert!(self.seq.on_same_seq(fnode, bnode));
        debug_assert!(self.connected(u, v));
    }

    fn set_anchors(&mut self, v: V, out: HalfId, inn: HalfId) {
        let rec = self.rec_mut(v);
        rec.left_out = Some(out);
        rec.right_in = Some(inn);
    }

    fn clear_anchors(&mut self, v: V) {
        let rec = self.rec_mut(v);
        rec.left_out = None;
        rec.right_in = None;
    }

    /// When exactly one outer neighbor exists, the other end of the rejoined
    /// outer tour supplies the missing one.
    fn complete_outer(&self, mut p: Idx, mut n: Idx) -> (Idx, Idx) {
        if (p == S::EMPTY) != (n == S::EMPTY) {
            if n == S::EMPTY {
                n = self.seq.first(p);
            } else {
                p = self.seq.last(n);
            }
            debug_assert_ne!(p, n);
        }
        (p, n)
    }

    /// Remove the edge {u, v}, splitting its component in two. Panics if no
    /// such edge is present.
    pub fn cut(&mut self, u: V, v: V) {
        assert!(self.connected(u, v), "{u:?} and {v:?} are not connected");
        let fid = self
            .edges
            .forward_half(u, v)
            .unwrap_or_else(|| panic!("no edge between {u:?} and {v:?}"));
        let bid = self
            .edges
            .backward_half(u, v)
            .unwrap_or_else(|| panic!("no edge between {u:?} and {v:?}"));
        debug_assert_eq!(self.half(fid).inverse, bid);
        log::trace!("cut({u:?}, {v:?})");
        self.n_components += 1;

        let from = self.half(fid).from;
        let to = self.half(fid).to;
        let fnode0 = self.half(fid).node;
        let bnode0 = self.half(bid).node;
        debug_assert!(self.seq.on_same_seq(fnode0, bnode0));
        // fnode is the half traversed first, bnode the one traversed second.
        let (fnode, bnode) = if self.seq.compare(fnode0, bnode0) == Ordering::Greater {
            (bnode0, fnode0)
        } else {
            (fnode0, bnode0)
        };

        // The four tour neighbors bracketing the removed segment.
        let p = self.seq.prev(fnode);
        let n = self.seq.next(bnode);
        let pn = self.seq.next(fnode);
        let nn = self.seq.prev(bnode);

        // Rejoin the tour outside the removed segment.
        let tree1 = self.seq.split_before(fnode);
        let tree2 = self.seq.split_after(bnode);
        if tree1 != S::EMPTY && tree2 != S::EMPTY {
            self.seq.concat(tree1, tree2);
        }

        let pn_h = *self.seq.data(pn);
        let nn_h = *self.seq.data(nn);
        let pn_half = self.half(pn_h);
        if pn_half.contains(from) && pn_half.contains(to) {
            // The halves were adjacent: the removed edge hung off a leaf, so
            // at least one endpoint becomes a singleton.
            let (p, n) = self.complete_outer(p, n);
            if n != S::EMPTY {
                let n_h = *self.seq.data(n);
                let p_h = *self.seq.data(p);
                if self.half(n_h).contains(from) {
                    debug_assert!(self.half(p_h).contains(from));
                    self.set_anchors(from, n_h, p_h);
                    self.clear_anchors(to);
                } else {
                    debug_assert!(self.half(n_h).contains(to));
                    self.set_anchors(to, n_h, p_h);
                    self.clear_anchors(from);
                }
            } else {
                self.clear_anchors(from);
                self.clear_anchors(to);
            }
        } else if pn_half.contains(from) {
            debug_assert!(self.half(nn_h).contains(from));
            self.set_anchors(from, pn_h, nn_h);
            let (p, n) = self.complete_outer(p, n);
            if n != S::EMPTY {
                let n_h = *self.seq.data(n);
                let p_h = *self.seq.data(p);
                debug_assert!(self.half(n_h).contains(to) && self.half(p_h).contains(to));
                self.set_anchors(to, n_h, p_h);
            } else {
                self.clear_anchors(to);
            }
        } else if pn_half.contains(to) {
            debug_assert!(self.half(nn_h).contains(to));
            self.set_anchors(to, pn_h, nn_h);
            let (p, n) = self.complete_outer(p, n);
            if n != S::EMPTY {
                let n_h = *self.seq.data(n);
                let p_h = *self.seq.data(p);
                debug_assert!(self.half(n_h).contains(from) && self.half(p_h).contains(from));
                self.set_anchors(from, n_h, p_h);
            } else {
                self.clear_anchors(from);
            }
        }

        // Isolate the removed halves.
        self.seq.split_after(fnode);
        self.seq.split_before(bnode);
        for w in [from, to] {
            if let Some(h) = self.rec(w).left_out {
                if self.seq.len(self.half(h).node) == 1 {
                    self.clear_anchors(w);
                }
            }
        }
        debug_assert_eq!(self.seq.len(fnode), 1);
        debug_assert_eq!(self.seq.len(bnode), 1);

        let (f2, b2) = self.edges.remove(u, v);
        debug_assert_eq!((f2, b2), (fid, bid));
        self.seq.release(fnode);
        self.seq.release(bnode);
        debug_assert!(!self.connected(u, v));
    }

    fn root_node(&self, v: V) -> Idx {
        match self.out_node(self.rec(v)) {
            Some(n) => self.seq.first(n),
            None => S::EMPTY,
        }
    }

    /// Walk the vertices of `v`'s component in tour order. The walk starts
    /// and ends at the tour's root, which therefore shows up at both ends;
    /// a singleton yields just `v`. Panics on an unknown id.
    pub fn tour_iter(&self, v: V) -> TourIter<'_, V, S> {
        TourIter {
            forest: self,
            node: self.root_node(v),
            pending: Some(v),
        }
    }

    /// Walk every half-edge of `v`'s component in tour order; each
    /// undirected edge shows up once per direction. Panics on an unknown id.
    pub fn edge_iter(&self, v: V) -> EdgeIter<'_, V, S> {
        EdgeIter {
            forest: self,
            node: self.root_node(v),
        }
    }

    /// The set of vertices reachable from `v`.
    pub fn nodes_in_component(&self, v: V) -> HashSet<V> {
        self.tour_iter(v).collect()
    }

    /// Validate every cross-structure invariant. Linear in the forest size;
    /// meant for tests and debugging.
    pub fn assert_invariants(&self) {
        // Anchors: both or neither, touching their vertex, same sequence.
        for (&v, rec) in &self.vertices {
            assert_eq!(
                rec.left_out.is_none(),
                rec.right_in.is_none(),
                "vertex {v:?} has mismatched anchors"
            );
            let (Some(a), Some(b)) = (rec.left_out, rec.right_in) else {
                continue;
            };
            assert!(self.half(a).contains(v) && self.half(b).contains(v));
            let an = self.half(a).node;
            let bn = self.half(b).node;
            assert!(
                self.seq.on_same_seq(an, bn),
                "anchors of {v:?} are in different tours"
            );
        }
        // Edges: halves cross-wired, one forward, sharing a tour with both
        // endpoints' anchors.
        for ((u, v), f, b) in self.edges.pairs() {
            let fh = self.half(f);
            let bh = self.half(b);
            assert!(fh.forward && !bh.forward, "{u:?}-{v:?} orientation");
            assert_eq!(bh.inverse, f);
            assert_eq!((fh.from, fh.to), (bh.to, bh.from));
            assert!(
                self.seq.on_same_seq(fh.node, bh.node),
                "halves of {u:?}-{v:?} are in different tours"
            );
            assert_eq!(self.seq.len(fh.node) % 2, 0);
            for w in [u, v] {
                let anchor = self
                    .rec(w)
                    .left_out
                    .expect("endpoint of an edge cannot be a singleton");
                assert!(
                    self.seq.on_same_seq(self.half(anchor).node, fh.node),
                    "anchor of {w:?} left its component's tour"
                );
            }
        }
        // Tour lengths: 2(k-1) nodes for k vertices.
        let mut roots_seen = HashSet::new();
        for (&v, rec) in &self.vertices {
            if let Some(node) = self.out_node(rec) {
                if roots_seen.insert(self.seq.root(node)) {
                    let k = self.nodes_in_component(v).len();
                    assert_eq!(
                        self.seq.len(node),
                        2 * (k - 1),
                        "tour length of component of {v:?}"
                    );
                    assert_eq!(self.size(v), k);
                }
            }
        }
        // Component count against naive reachability over the edge set.
        let mut adj: HashMap<V, Vec<V>> = HashMap::new();
        for ((u, v), _, _) in self.edges.pairs() {
            adj.entry(u).or_default().push(v);
            adj.entry(v).or_default().push(u);
        }
        let mut seen = HashSet::new();
        let mut components = 0;
        for &v in self.vertices.keys() {
            if !seen.insert(v) {
                continue;
            }
            components += 1;
            let mut stack = vec![v];
            while let Some(u) = stack.pop() {
                for &w in adj.get(&u).into_iter().flatten() {
                    if seen.insert(w) {
                        stack.push(w);
                    }
                }
            }
        }
        assert_eq!(self.n_components, components, "component count drifted");
        // A forest has exactly vertices - components edges.
        assert_eq!(
            self.edges.n_edges(),
            self.vertices.len() - self.n_components,
            "edge count drifted"
        );
    }
}

impl<V, S> Default for EulerForest<V, S>
where
    V: Copy + Eq + Hash + Debug,
    S: Sequence<HalfId>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V, S> Debug for EulerForest<V, S>
where
    V: Copy + Eq + Hash + Debug,
    S: Sequence<HalfId>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut db = f.debug_struct("EulerForest");
        db.field("n_components", &self.n_components);
        let mut singletons = Vec::new();
        let mut roots_seen = HashSet::new();
        for (&v, rec) in &self.vertices {
            let Some(node) = self.out_node(rec) else {
                singletons.push(v);
                continue;
            };
            if roots_seen.insert(self.seq.root(node)) {
                let tour: Vec<String> = self
                    .edge_iter(v)
                    .map(|e| format!("{:?}->{:?}", e.from, e.to))
                    .collect();
                db.field(&format!("tour at {v:?}"), &tour);
            }
        }
        db.field("singletons", &singletons);
        db.finish()
    }
}

/// See [`EulerForest::tour_iter`].
pub struct TourIter<'a, V, S> {
    forest: &'a EulerForest<V, S>,
    node: Idx,
    pending: Option<V>,
}

impl<V, S> Iterator for TourIter<'_, V, S>
where
    V: Copy + Eq + Hash + Debug,
    S: Sequence<HalfId>,
{
    type Item = V;

    fn next(&mut self) -> Option<V> {
        if self.node == S::EMPTY {
            return self.pending.take();
        }
        let h = self.forest.half(*self.forest.seq.data(self.node));
        self.pending = Some(h.to);
        self.node = self.forest.seq.next(self.node);
        Some(h.from)
    }
}

/// See [`EulerForest::edge_iter`].
pub struct EdgeIter<'a, V, S> {
    forest: &'a EulerForest<V, S>,
    node: Idx,
}

impl<V, S> Iterator for EdgeIter<'_, V, S>
where
    V: Copy + Eq + Hash + Debug,
    S: Sequence<HalfId>,
{
    type Item = TourEdge<V>;

    fn next(&mut self) -> Option<TourEdge<V>> {
        if self.node == S::EMPTY {
            return None;
        }
        let h = self.forest.half(*self.forest.seq.data(self.node));
        self.node = self.forest.seq.next(self.node);
        Some(TourEdge {
            from: h.from,
            to: h.to,
            forward: h.forward,
        })
    }
}
