use std::collections::{HashMap, HashSet};

/// Vertex identifier as written in the source format. May be negative or sparse.
pub type VertexId = i64;

/// In-memory graph: insertion-ordered adjacency lists.
///
/// `order` records the sequence in which vertices were first inserted, which
/// is the discovery order every unsorted encoder reproduces. Neighbor lists
/// keep their insertion order and may contain duplicates (multi-edges).
///
/// Decoders leave the graph *complete*: every id that appears as a neighbor
/// is also a key, possibly with an empty adjacency list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    adjacency: HashMap<VertexId, Vec<VertexId>>,
    order: Vec<VertexId>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for a known vertex count.
    pub fn with_capacity(vertex_count: usize) -> Self {
        Self {
            adjacency: HashMap::with_capacity(vertex_count),
            order: Vec::with_capacity(vertex_count),
        }
    }

    /// Insert `id` with an empty adjacency list. Returns false if it already existed.
    pub fn add_vertex(&mut self, id: VertexId) -> bool {
        if self.adjacency.contains_key(&id) {
            return false;
        }
        self.adjacency.insert(id, Vec::new());
        self.order.push(id);
        true
    }

    /// Append `to` to `from`'s adjacency. Both endpoints are created if
    /// missing, `from` before `to`.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId) {
        self.add_vertex(from);
        self.add_vertex(to);
        if let Some(neighbors) = self.adjacency.get_mut(&from) {
            neighbors.push(to);
        }
    }

    /// Replace `id`'s adjacency list, inserting the vertex if needed.
    ///
    /// Neighbors are not inserted as keys; call [`Graph::complete`] once all
    /// lists are in place.
    pub fn set_neighbors(&mut self, id: VertexId, neighbors: Vec<VertexId>) {
        self.add_vertex(id);
        self.adjacency.insert(id, neighbors);
    }

    /// Insert every neighbor id that is not yet a key, with an empty
    /// adjacency, in order of first appearance scanning vertices in insertion
    /// order. Returns the ids that were added.
    pub fn complete(&mut self) -> Vec<VertexId> {
        let mut missing = Vec::new();
        let mut seen = HashSet::new();
        for id in &self.order {
            for w in &self.adjacency[id] {
                if !self.adjacency.contains_key(w) && seen.insert(*w) {
                    missing.push(*w);
                }
            }
        }
        for &w in &missing {
            self.add_vertex(w);
        }
        missing
    }

    /// True if every neighbor id is also a key.
    pub fn is_complete(&self) -> bool {
        self.adjacency
            .values()
            .flatten()
            .all(|w| self.adjacency.contains_key(w))
    }

    /// True if `w ∈ adj(v) ⇔ v ∈ adj(w)` for every pair.
    pub fn is_symmetric(&self) -> bool {
        self.iter()
            .all(|(v, neighbors)| neighbors.iter().all(|w| self.neighbors(*w).contains(&v)))
    }

    pub fn contains(&self, id: VertexId) -> bool {
        self.adjacency.contains_key(&id)
    }

    /// Adjacency of `id`, empty if the vertex is unknown.
    pub fn neighbors(&self, id: VertexId) -> &[VertexId] {
        self.adjacency.get(&id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn neighbors_mut(&mut self, id: VertexId) -> Option<&mut Vec<VertexId>> {
        self.adjacency.get_mut(&id)
    }

    /// Vertex ids in insertion order.
    pub fn vertices(&self) -> &[VertexId] {
        &self.order
    }

    /// `(id, adjacency)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, &[VertexId])> + '_ {
        self.order
            .iter()
            .map(move |id| (*id, self.adjacency[id].as_slice()))
    }

    pub fn vertex_count(&self) -> usize {
        self.order.len()
    }

    /// Total number of adjacency entries (directed edges, multi-edges counted).
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(|v| v.len()).sum()
    }

    /// Largest adjacency length, 0 for an empty graph.
    pub fn max_degree(&self) -> usize {
        self.adjacency.values().map(|v| v.len()).max().unwrap_or(0)
    }

    pub fn min_id(&self) -> Option<VertexId> {
        self.order.iter().copied().min()
    }

    pub fn max_id(&self) -> Option<VertexId> {
        self.order.iter().copied().max()
    }

    /// Approximate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        use std::mem::size_of;

        let keys = self.adjacency.len() * (size_of::<VertexId>() + size_of::<Vec<VertexId>>() + 8);
        let order = self.order.capacity() * size_of::<VertexId>();
        let edges: usize = self
            .adjacency
            .values()
            .map(|v| v.capacity() * size_of::<VertexId>())
            .sum();

        keys + order + edges
    }
}
