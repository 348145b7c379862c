//! Labeled undirected graph over caller-supplied vertex identifiers.
//!
//! Used for device coupling graphs and similar topology data. Vertices are
//! numbered in insertion order; edges live in an upper-triangular table where
//! row `i` holds the slots for `(i, i)`, `(i, i + 1)`, … `(i, n - 1)`.

use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt::{self, Write};
use std::hash::Hash;

use crate::error::{IrError, IrResult};

/// An undirected graph with vertex identifiers `V` and edge labels `E`.
#[derive(Debug, Clone)]
pub struct Graph<V, E> {
    mapping: FxHashMap<V, usize>,
    inverse: Vec<V>,
    adjacency: Vec<Vec<Option<E>>>,
    degrees: Vec<usize>,
    n_edges: usize,
}

impl<V, E> Default for Graph<V, E> {
    fn default() -> Self {
        Self {
            mapping: FxHashMap::default(),
            inverse: vec![],
            adjacency: vec![],
            degrees: vec![],
            n_edges: 0,
        }
    }
}

impl<V, E> Graph<V, E>
where
    V: Eq + Hash + Clone + fmt::Display,
{
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.inverse.len()
    }

    /// Number of edges.
    pub fn num_edges(&self) -> usize {
        self.n_edges
    }

    fn index_of(&self, v: &V) -> IrResult<usize> {
        self.mapping
            .get(v)
            .copied()
            .ok_or_else(|| IrError::VertexNotFound(v.to_string()))
    }

    fn slot(&self, i: usize, j: usize) -> &Option<E> {
        let (lo, hi) = if i <= j { (i, j) } else { (j, i) };
        &self.adjacency[lo][hi - lo]
    }

    fn slot_mut(&mut self, i: usize, j: usize) -> &mut Option<E> {
        let (lo, hi) = if i <= j { (i, j) } else { (j, i) };
        &mut self.adjacency[lo][hi - lo]
    }

    /// Add a vertex. Fails if it is already present.
    pub fn add_vertex(&mut self, v: V) -> IrResult<()> {
        if self.mapping.contains_key(&v) {
            return Err(IrError::DuplicateVertex(v.to_string()));
        }
        self.push_vertex(v);
        Ok(())
    }

    fn push_vertex(&mut self, v: V) {
        let index = self.inverse.len();
        for row in &mut self.adjacency {
            row.push(None);
        }
        self.adjacency.push(vec![None]);
        self.degrees.push(0);
        self.mapping.insert(v.clone(), index);
        self.inverse.push(v);
    }

    /// Add or relabel the edge `{u, v}`, adding missing vertices.
    pub fn add_edge(&mut self, u: V, v: V, label: E) {
        for w in [&u, &v] {
            if !self.mapping.contains_key(w) {
                self.push_vertex(w.clone());
            }
        }
        let i = self.mapping[&u];
        let j = self.mapping[&v];
        let slot = self.slot_mut(i, j);
        let was_present = slot.is_some();
        *slot = Some(label);
        if !was_present {
            self.degrees[i] += 1;
            if i != j {
                self.degrees[j] += 1;
            }
            self.n_edges += 1;
        }
    }

    /// Label of the edge `{u, v}`.
    pub fn get_edge(&self, u: &V, v: &V) -> IrResult<&E> {
        let i = self.index_of(u)?;
        let j = self.index_of(v)?;
        self.slot(i, j)
            .as_ref()
            .ok_or_else(|| IrError::EdgeNotFound(u.to_string(), v.to_string()))
    }

    /// All edges incident to `v`, as `(v, w)` pairs.
    pub fn get_adjacent_edges(&self, v: &V) -> IrResult<FxHashSet<(V, V)>> {
        let i = self.index_of(v)?;
        Ok((0..self.num_vertices())
            .filter(|&j| self.slot(i, j).is_some())
            .map(|j| (v.clone(), self.inverse[j].clone()))
            .collect())
    }

    /// All vertices adjacent to `v`.
    pub fn get_neighbours(&self, v: &V) -> IrResult<FxHashSet<V>> {
        let i = self.index_of(v)?;
        Ok((0..self.num_vertices())
            .filter(|&j| self.slot(i, j).is_some())
            .map(|j| self.inverse[j].clone())
            .collect())
    }

    /// Number of edges incident to `v`; a self-loop counts once.
    pub fn degree(&self, v: &V) -> IrResult<usize> {
        Ok(self.degrees[self.index_of(v)?])
    }

    /// Vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &V> {
        self.inverse.iter()
    }

    /// True if `u` and `v` are both known and connected.
    pub fn is_adjacent(&self, u: &V, v: &V) -> bool {
        match (self.mapping.get(u), self.mapping.get(v)) {
            (Some(&i), Some(&j)) => self.slot(i, j).is_some(),
            _ => false,
        }
    }

    /// True if the two edges share an endpoint.
    pub fn is_adjacent_edge(e: &(V, V), f: &(V, V)) -> bool {
        e.0 == f.0 || e.0 == f.1 || e.1 == f.0 || e.1 == f.1
    }

    /// Render the graph in DOT format.
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("graph {\n");
        for (i, v) in self.inverse.iter().enumerate() {
            let _ = writeln!(dot, "  {i} [label=\"{v}\"];");
        }
        for (i, row) in self.adjacency.iter().enumerate() {
            for (offset, edge) in row.iter().enumerate() {
                if edge.is_some() {
                    let _ = writeln!(dot, "  {i} -- {};", i + offset);
                }
            }
        }
        dot.push_str("}\n");
        dot
    }
}
