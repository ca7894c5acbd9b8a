use std::cmp::Ordering;
use std::fmt::{Debug, Formatter};

use debug_tree::TreeBuilder;
use derivative::Derivative;
use rand::{rngs, Rng, SeedableRng};

use super::{Idx, Sequence};

fn node_fmt(u: &Idx, f: &mut Formatter) -> std::fmt::Result {
    if *u == usize::MAX {
        write!(f, "∅")
    } else {
        write!(f, "{u}")
    }
}
fn node2_fmt([u, v]: &[Idx; 2], f: &mut Formatter) -> std::fmt::Result {
    write!(f, "[")?;
    node_fmt(u, f)?;
    write!(f, ", ")?;
    node_fmt(v, f)?;
    write!(f, "]")
}

#[derive(Derivative)]
#[derivative(Debug)]
struct Node<T: Debug> {
    #[derivative(Debug(format_with = "node_fmt"))]
    parent: Idx,
    #[derivative(Debug(format_with = "node2_fmt"))]
    /// Left and right child
    child: [Idx; 2],
    /// Payload of this node
    data: T,
    #[derivative(Debug = "ignore")]
    priority: u32,
    /// Size of this node's subtree. 0 marks a released slot.
    #[derivative(Debug = "ignore")]
    size: usize,
}

impl<T: Debug + Clone> Node<T> {
    fn new(data: T, priority: u32) -> Self {
        Self {
            data,
            child: [Treap::<T>::EMPTY; 2],
            parent: Treap::<T>::EMPTY,
            size: 1,
            priority,
        }
    }
}

/// Treap keyed by implicit position, stored in an arena with parent
/// pointers. Splits are anchored at a node rather than at a rank, which is
/// what the tour engine needs; both directions cost O(log n) expected.
pub struct Treap<T: Debug> {
    nodes: Vec<Node<T>>,
    free: Vec<Idx>,
    rng: rngs::StdRng,
}

impl<T: Debug + Clone> Debug for Treap<T> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let mut builder = TreeBuilder::new();
        let _b = builder.add_branch("Treap");
        for u in &self.nodes {
            if u.parent == Self::EMPTY && u.size > 0 {
                self.tree_dbg(u, &mut builder);
            }
        }
        writeln!(f, "{}", builder.string())
    }
}

impl<T: Debug + Clone> Treap<T> {
    /// Same as [`Sequence::new`] but with a caller-chosen priority seed, for
    /// reproducing a specific tree shape.
    pub fn with_seed(capacity: usize, seed: u64) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            free: Vec::new(),
            rng: rngs::StdRng::seed_from_u64(seed),
        }
    }

    fn tree_dbg(&self, u: &Node<T>, tree: &mut TreeBuilder) {
        let _b = tree.add_branch(&format!("{u:?}"));
        if u.child == [Self::EMPTY, Self::EMPTY] {
            return;
        }
        for c in u.child {
            if c != Self::EMPTY {
                self.tree_dbg(&self.nodes[c], tree);
            } else {
                tree.add_leaf("<no child>");
            }
        }
    }

    fn n(&self, u: Idx) -> Option<&Node<T>> {
        // Even safer than just self.nodes.get(u)
        if u == Self::EMPTY {
            None
        } else {
            Some(&self.nodes[u])
        }
    }

    fn child(&self, u: Idx) -> [Idx; 2] {
        self.n(u).map_or([Self::EMPTY; 2], |n| n.child)
    }

    fn size(&self, u: Idx) -> usize {
        self.n(u).map_or(0, |n| n.size)
    }

    fn parent(&self, u: Idx) -> Idx {
        self.n(u).map_or(Self::EMPTY, |n| n.parent)
    }

    // Call when children are changed.
    fn recalc(&mut self, u: Idx) {
        let [l, r] = self.child(u);
        self.nodes[u].size = self.size(l) + 1 + self.size(r);
    }

    // Panics if u is empty. Detaching (new_c == EMPTY) clears the old
    // child's parent link, so the old child becomes a root of its own.
    fn change_child(&mut self, u: Idx, side: usize, new_c: Idx) -> Idx {
        let old_c = self.nodes[u].child[side];
        if old_c != Self::EMPTY {
            self.nodes[old_c].parent = Self::EMPTY;
        }
        self.nodes[u].child[side] = new_c;
        self.recalc(u);
        if new_c != Self::EMPTY {
            self.nodes[new_c].parent = u;
        }
        new_c
    }

    /// (First k, rest). `u` must be the root of its tree.
    fn split_k(&mut self, u: Idx, k: usize) -> (Idx, Idx) {
        if u == Self::EMPTY {
            return (Self::EMPTY, Self::EMPTY);
        }
        if k == 0 {
            return (Self::EMPTY, u);
        }
        let [l, r] = self.child(u);
        let szl = self.size(l);
        if k <= szl {
            self.change_child(u, 0, Self::EMPTY);
            let (ll, lr) = self.split_k(l, k);
            (ll, self.concat_roots(lr, u))
        } else {
            self.change_child(u, 1, Self::EMPTY);
            let (rl, rr) = self.split_k(r, k - szl - 1);
            (self.concat_roots(u, rl), rr)
        }
    }

    /// Both arguments must be roots (or EMPTY). The losing side's child is
    /// detached before recursing so parent links stay consistent.
    fn concat_roots(&mut self, u: Idx, v: Idx) -> Idx {
        if u == Self::EMPTY {
            return v;
        } else if v == Self::EMPTY {
            return u;
        }
        debug_assert!(self.parent(u) == Self::EMPTY && self.parent(v) == Self::EMPTY);
        if self.nodes[u].priority > self.nodes[v].priority {
            let old_r = self.nodes[u].child[1];
            self.change_child(u, 1, Self::EMPTY);
            let new_r = self.concat_roots(old_r, v);
            self.change_child(u, 1, new_r);
            u
        } else {
            let old_l = self.nodes[v].child[0];
            self.change_child(v, 0, Self::EMPTY);
            let new_l = self.concat_roots(u, old_l);
            self.change_child(v, 0, new_l);
            v
        }
    }

    fn subtree_first(&self, mut u: Idx) -> Idx {
        while self.child(u)[0] != Self::EMPTY {
            u = self.child(u)[0];
        }
        u
    }

    fn subtree_last(&self, mut u: Idx) -> Idx {
        while self.child(u)[1] != Self::EMPTY {
            u = self.child(u)[1];
        }
        u
    }
}

impl<T: Debug + Clone> Sequence<T> for Treap<T> {
    fn new(capacity: usize) -> Self {
        Self::with_seed(capacity, 42)
    }

    fn create(&mut self, data: T) -> Idx {
        let priority = self.rng.gen();
        if let Some(u) = self.free.pop() {
            self.nodes[u] = Node::new(data, priority);
            u
        } else {
            let u = self.nodes.len();
            self.nodes.push(Node::new(data, priority));
            u
        }
    }

    fn release(&mut self, u: Idx) {
        assert!(
            self.parent(u) == Self::EMPTY && self.child(u) == [Self::EMPTY; 2],
            "released node {u} still attached to a sequence"
        );
        self.nodes[u].size = 0;
        self.free.push(u);
    }

    fn data(&self, u: Idx) -> &T {
        &self.nodes[u].data
    }

    fn total_size(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    fn root(&self, mut u: Idx) -> Idx {
        while self.parent(u) != Self::EMPTY {
            u = self.nodes[u].parent;
        }
        u
    }

    fn first(&self, u: Idx) -> Idx {
        if u == Self::EMPTY {
            return Self::EMPTY;
        }
        self.subtree_first(self.root(u))
    }

    fn last(&self, u: Idx) -> Idx {
        if u == Self::EMPTY {
            return Self::EMPTY;
        }
        self.subtree_last(self.root(u))
    }

    fn next(&self, u: Idx) -> Idx {
        let r = self.child(u)[1];
        if r != Self::EMPTY {
            return self.subtree_first(r);
        }
        let mut u = u;
        loop {
            let p = self.parent(u);
            if p == Self::EMPTY {
                return Self::EMPTY;
            }
            if self.child(p)[0] == u {
                return p;
            }
            u = p;
        }
    }

    fn prev(&self, u: Idx) -> Idx {
        let l = self.child(u)[0];
        if l != Self::EMPTY {
            return self.subtree_last(l);
        }
        let mut u = u;
        loop {
            let p = self.parent(u);
            if p == Self::EMPTY {
                return Self::EMPTY;
            }
            if self.child(p)[1] == u {
                return p;
            }
            u = p;
        }
    }

    fn len(&self, u: Idx) -> usize {
        if u == Self::EMPTY {
            0
        } else {
            self.nodes[self.root(u)].size
        }
    }

    fn order(&self, mut u: Idx) -> usize {
        let mut ord = self.size(self.child(u)[0]);
        while self.parent(u) != Self::EMPTY {
            let prev = u;
            u = self.nodes[u].parent;
            let [l, r] = self.child(u);
            if prev == r {
                ord += self.size(l) + 1;
            }
        }
        ord
    }

    fn compare(&self, a: Idx, b: Idx) -> Ordering {
        debug_assert!(self.on_same_seq(a, b));
        self.order(a).cmp(&self.order(b))
    }

    fn split_before(&mut self, u: Idx) -> Idx {
        let k = self.order(u);
        log::trace!("split_before {u} at {k}");
        let (l, r) = self.split_k(self.root(u), k);
        debug_assert!(r == Self::EMPTY || self.subtree_first(r) == u);
        l
    }

    fn split_after(&mut self, u: Idx) -> Idx {
        let k = self.order(u) + 1;
        log::trace!("split_after {u} at {k}");
        let (l, r) = self.split_k(self.root(u), k);
        debug_assert!(l == Self::EMPTY || self.subtree_last(l) == u);
        r
    }

    fn concat(&mut self, u: Idx, v: Idx) -> Idx {
        log::trace!("concat {u} {v}");
        let (u, v) = (self.root(u), self.root(v));
        debug_assert!(u != v || u == Self::EMPTY);
        self.concat_roots(u, v)
    }
}
