use crate::graph::MapDatabase;
use crate::model::Length;

/// A sequence of connected directed edges and its total length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgePath<EdgeId> {
    pub length: Length,
    pub edges: Vec<EdgeId>,
}

impl<EdgeId> Default for EdgePath<EdgeId> {
    fn default() -> Self {
        Self {
            length: Length::ZERO,
            edges: vec![],
        }
    }
}

/// Returns true only if all the edges of the path are sequentially connected
/// in the given graph and none of the turns between them is restricted.
pub fn is_path_connected<G: MapDatabase>(graph: &G, path: &[G::EdgeId]) -> bool {
    path.windows(2).all(|window| {
        let [from, to] = [window[0], window[1]];

        !graph.is_turn_restricted(from, to)
            && graph
                .exiting_edges(graph.edge_end_vertex(from))
                .any(|(edge, _)| edge == to)
    })
}
