//! Incremental connectivity over board cells and edge terminals

use std::cmp::Ordering;

/// Union-find forest with path compression and union by rank
#[derive(Clone, Debug)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    /// Create `len` singleton sets
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Canonical representative of `a`'s set, compressing the walked path
    pub fn find(&mut self, a: usize) -> usize {
        let mut node = a;
        while self.parent[node] != node {
            // Point the node at its grandparent, halving the path
            let grandparent = self.parent[self.parent[node]];
            self.parent[node] = grandparent;
            node = grandparent;
        }
        node
    }

    /// Merge the sets containing `a` and `b`
    pub fn union(&mut self, a: usize, b: usize) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return;
        }
        match self.rank[root_a].cmp(&self.rank[root_b]) {
            Ordering::Less => self.parent[root_a] = root_b,
            Ordering::Greater => self.parent[root_b] = root_a,
            Ordering::Equal => {
                self.parent[root_b] = root_a;
                self.rank[root_a] += 1;
            }
        }
    }

    /// Whether `a` and `b` share a set; read-only so queries never mutate
    pub fn connected(&self, a: usize, b: usize) -> bool {
        self.root(a) == self.root(b)
    }

    fn root(&self, a: usize) -> usize {
        let mut node = a;
        while self.parent[node] != node {
            node = self.parent[node];
        }
        node
    }
}

/// Goal sides of the rhombus
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

/// Connectivity over the N*N cells plus four virtual edge terminals
#[derive(Clone, Debug)]
pub struct Links {
    sets: UnionFind,
    cell_count: usize,
}

impl Links {
    /// Empty connectivity for a `size` x `size` board
    pub fn new(size: usize) -> Self {
        let cell_count = size * size;
        Self {
            sets: UnionFind::new(cell_count + 4),
            cell_count,
        }
    }

    /// Slot of a terminal, past the cell ids
    fn edge_slot(&self, edge: Edge) -> usize {
        self.cell_count
            + match edge {
                Edge::Top => 0,
                Edge::Bottom => 1,
                Edge::Left => 2,
                Edge::Right => 3,
            }
    }

    /// Join two cells by id
    pub fn join_cells(&mut self, a: usize, b: usize) {
        self.sets.union(a, b);
    }

    /// Join a cell to one of its owner's terminals
    pub fn join_edge(&mut self, cell: usize, edge: Edge) {
        let slot = self.edge_slot(edge);
        self.sets.union(cell, slot);
    }

    /// Whether a cell reaches a terminal
    pub fn cell_reaches_edge(&self, cell: usize, edge: Edge) -> bool {
        self.sets.connected(cell, self.edge_slot(edge))
    }

    /// Whether two terminals ended up in one set
    pub fn edges_linked(&self, a: Edge, b: Edge) -> bool {
        self.sets.connected(self.edge_slot(a), self.edge_slot(b))
    }
}
