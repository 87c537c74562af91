/// Options for one conversion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Drop one self-referencing adjacency entry per vertex.
    pub remove_self_loops: bool,
    /// Add every missing reciprocal edge.
    pub enforce_undirected: bool,
    /// Emit vertices and neighbor lists in ascending ordinal order.
    pub sort: bool,
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remove_self_loops(mut self, enabled: bool) -> Self {
        self.remove_self_loops = enabled;
        self
    }

    pub fn enforce_undirected(mut self, enabled: bool) -> Self {
        self.enforce_undirected = enabled;
        self
    }

    pub fn sort(mut self, enabled: bool) -> Self {
        self.sort = enabled;
        self
    }
}
