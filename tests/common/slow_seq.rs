use std::fmt::Debug;

use euler_forest::seq::{Idx, Sequence};

/// Dummy implementation, most of the operations take linear time.
pub struct SlowSeq<T> {
    lists: Vec<Vec<Entry<T>>>,
    u_to_list: Vec<usize>,
    free: Vec<Idx>,
}

impl<T: Debug + Clone> Debug for SlowSeq<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SlowSeq:")?;
        for l in &self.lists {
            if !l.is_empty() {
                write!(f, " [")?;
                for e in l {
                    write!(f, "{}({:?}) ", e.idx, e.data)?;
                }
                writeln!(f, "]")?;
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
struct Entry<T> {
    idx: Idx,
    data: T,
}

impl<T: Debug + Clone> SlowSeq<T> {
    fn list(&self, u: Idx) -> &Vec<Entry<T>> {
        if u == Self::EMPTY {
            &self.lists[0]
        } else {
            &self.lists[self.u_to_list[u]]
        }
    }

    fn entry(&self, u: Idx) -> &Entry<T> {
        self.list(u).iter().find(|e| e.idx == u).unwrap()
    }

    /// All current sequences, as their handles in order.
    #[allow(dead_code)]
    pub fn lists(&self) -> Vec<Vec<Idx>> {
        self.lists
            .iter()
            .filter_map(|v| {
                if v.is_empty() {
                    None
                } else {
                    Some(v.iter().map(|e| e.idx).collect())
                }
            })
            .collect()
    }
}

impl<T: Debug + Clone> Sequence<T> for SlowSeq<T> {
    fn new(capacity: usize) -> Self {
        let mut lists = Vec::with_capacity(capacity + 1);
        // SENTINEL for EMPTY
        lists.push(vec![]);
        Self {
            lists,
            u_to_list: Vec::with_capacity(capacity),
            free: vec![],
        }
    }

    fn create(&mut self, data: T) -> Idx {
        let idx = if let Some(idx) = self.free.pop() {
            idx
        } else {
            self.u_to_list.push(usize::MAX);
            self.u_to_list.len() - 1
        };
        self.lists.push(vec![Entry { idx, data }]);
        self.u_to_list[idx] = self.lists.len() - 1;
        idx
    }

    fn release(&mut self, u: Idx) {
        let l = self.u_to_list[u];
        assert_eq!(self.lists[l].len(), 1, "released node {u} not alone");
        self.lists[l].clear();
        self.u_to_list[u] = usize::MAX;
        self.free.push(u);
    }

    fn data(&self, u: Idx) -> &T {
        &self.entry(u).data
    }

    fn total_size(&self) -> usize {
        self.u_to_list.iter().filter(|&&l| l != usize::MAX).count()
    }

    fn root(&self, u: Idx) -> Idx {
        if u == Self::EMPTY {
            return Self::EMPTY;
        }
        self.list(u)[0].idx
    }

    fn first(&self, u: Idx) -> Idx {
        self.root(u)
    }

    fn last(&self, u: Idx) -> Idx {
        if u == Self::EMPTY {
            return Self::EMPTY;
        }
        self.list(u).last().unwrap().idx
    }

    fn next(&self, u: Idx) -> Idx {
        let l = self.list(u);
        l.get(self.order(u) + 1).map_or(Self::EMPTY, |e| e.idx)
    }

    fn prev(&self, u: Idx) -> Idx {
        match self.order(u) {
            0 => Self::EMPTY,
            k => self.list(u)[k - 1].idx,
        }
    }

    fn len(&self, u: Idx) -> usize {
        if u == Self::EMPTY {
            return 0;
        }
        self.list(u).len()
    }

    fn order(&self, u: Idx) -> usize {
        if u == Self::EMPTY {
            return 0;
        }
        self.list(u).iter().position(|e| e.idx == u).unwrap()
    }

    fn split_before(&mut self, u: Idx) -> Idx {
        let k = self.order(u);
        if k == 0 {
            return Self::EMPTY;
        }
        let lu = self.u_to_list[u];
        let left: Vec<_> = self.lists[lu].drain(..k).collect();
        let il = self.lists.len();
        for e in &left {
            self.u_to_list[e.idx] = il;
        }
        let root = left[0].idx;
        self.lists.push(left);
        root
    }

    fn split_after(&mut self, u: Idx) -> Idx {
        let k = self.order(u);
        let lu = self.u_to_list[u];
        if k + 1 == self.lists[lu].len() {
            return Self::EMPTY;
        }
        let right: Vec<_> = self.lists[lu].drain(k + 1..).collect();
        let il = self.lists.len();
        for e in &right {
            self.u_to_list[e.idx] = il;
        }
        let root = right[0].idx;
        self.lists.push(right);
        root
    }

    fn concat(&mut self, u: Idx, v: Idx) -> Idx {
        if v == Self::EMPTY || (u != Self::EMPTY && self.on_same_seq(u, v)) {
            return self.root(u);
        } else if u == Self::EMPTY {
            return self.root(v);
        }
        let lu = self.u_to_list[u];
        let lv = self.u_to_list[v];
        for w in self.lists[lv].iter() {
            self.u_to_list[w.idx] = lu;
        }
        let mut nv = vec![];
        nv.append(&mut self.lists[lv]);
        self.lists[lu].append(&mut nv);
        self.root(u)
    }
}
