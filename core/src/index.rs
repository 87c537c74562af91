use std::collections::HashMap;

use crate::graph::{Graph, VertexId};

/// Dense zero-based position of a vertex in positional formats.
pub type Ordinal = usize;

/// One-to-one mapping between raw vertex ids and ordinals.
///
/// Ordinals are handed out sequentially by [`IndexMap::assign`], so calling it
/// while scanning an input yields first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexMap {
    ordinals: HashMap<VertexId, Ordinal>,
    ids: Vec<VertexId>,
}

impl IndexMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ordinals: HashMap::with_capacity(capacity),
            ids: Vec::with_capacity(capacity),
        }
    }

    /// Ordinals following the graph's insertion order.
    pub fn from_graph(graph: &Graph) -> Self {
        let mut index = Self::with_capacity(graph.vertex_count());
        index.extend_from(graph);
        index
    }

    /// Return `id`'s ordinal, assigning the next free one on first sight.
    pub fn assign(&mut self, id: VertexId) -> Ordinal {
        if let Some(&ordinal) = self.ordinals.get(&id) {
            return ordinal;
        }
        let ordinal = self.ids.len();
        self.ids.push(id);
        self.ordinals.insert(id, ordinal);
        ordinal
    }

    /// Assign ordinals to every graph vertex not yet mapped. Returns how many
    /// were added.
    pub fn extend_from(&mut self, graph: &Graph) -> usize {
        let before = self.ids.len();
        for &id in graph.vertices() {
            self.assign(id);
        }
        self.ids.len() - before
    }

    pub fn ordinal(&self, id: VertexId) -> Option<Ordinal> {
        self.ordinals.get(&id).copied()
    }

    pub fn id(&self, ordinal: Ordinal) -> Option<VertexId> {
        self.ids.get(ordinal).copied()
    }

    pub fn contains(&self, id: VertexId) -> bool {
        self.ordinals.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// `(ordinal, id)` pairs in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = (Ordinal, VertexId)> + '_ {
        self.ids.iter().copied().enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_is_sequential_and_stable() {
        let mut index = IndexMap::new();
        assert_eq!(index.assign(40), 0);
        assert_eq!(index.assign(-2), 1);
        assert_eq!(index.assign(40), 0);
        assert_eq!(index.len(), 2);
        assert_eq!(index.id(1), Some(-2));
        assert_eq!(index.ordinal(7), None);
    }

    #[test]
    fn test_extend_from_graph_keeps_existing() {
        let mut g = Graph::new();
        g.add_edge(3, 1);
        g.add_edge(1, 2);

        let mut index = IndexMap::new();
        index.assign(2);
        assert_eq!(index.extend_from(&g), 2);
        assert_eq!(index.ordinal(2), Some(0));
        assert_eq!(index.ordinal(3), Some(1));
        assert_eq!(index.ordinal(1), Some(2));
    }

    #[test]
    fn test_from_graph_follows_insertion_order() {
        let mut g = Graph::new();
        g.add_edge(9, 4);
        g.add_vertex(-1);
        let index = IndexMap::from_graph(&g);
        let pairs: Vec<_> = index.iter().collect();
        assert_eq!(pairs, vec![(0, 9), (1, 4), (2, -1)]);
    }
}
