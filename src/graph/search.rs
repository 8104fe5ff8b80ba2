use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::graph::MapDatabase;
use crate::graph::path::EdgePath;
use crate::model::{Frc, Length};

/// The deadline expired while a search was still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchAborted;

/// Bounds of a single shortest path search.
#[derive(Debug, Clone, Copy)]
pub struct SearchBounds {
    /// Edges with a less important class than this are not expanded.
    pub lowest_frc: Frc,
    /// Paths longer than this are not expanded.
    pub max_length: Length,
    /// Hard wall clock limit for the whole search.
    pub deadline: Option<Instant>,
}

impl Default for SearchBounds {
    fn default() -> Self {
        Self {
            lowest_frc: Frc::Frc7,
            max_length: Length::MAX,
            deadline: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeapElement<VertexId> {
    /// Current shortest distance from the origin to this vertex.
    distance: Length,
    vertex: VertexId,
}

// The std BinaryHeap is a max heap driven by Ord: reverse the comparison to
// make it a min heap, breaking distance ties by vertex for determinism.
impl<VertexId: Ord> Ord for HeapElement<VertexId> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .cmp(&self.distance)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

impl<VertexId: Ord> PartialOrd for HeapElement<VertexId> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra search from `origin` to `destination` over edge lengths.
///
/// Returns `Ok(None)` when no path within the bounds exists, and fails only
/// when the deadline expires before the search has finished.
pub fn shortest_path<G: MapDatabase>(
    graph: &G,
    origin: G::VertexId,
    destination: G::VertexId,
    bounds: SearchBounds,
) -> Result<Option<EdgePath<G::EdgeId>>, SearchAborted> {
    trace!("Searching shortest path {origin:?} -> {destination:?} within {bounds:?}");

    // current shortest distance from the origin to each settled vertex
    let mut shortest_distances = FxHashMap::default();
    shortest_distances.insert(origin, Length::ZERO);

    // previous (edge, vertex) on the best known path from the origin to each vertex
    let mut previous: FxHashMap<G::VertexId, (G::EdgeId, G::VertexId)> = FxHashMap::default();

    let mut frontier = BinaryHeap::from([HeapElement {
        distance: Length::ZERO,
        vertex: origin,
    }]);

    while let Some(element) = frontier.pop() {
        if bounds.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            debug!("Shortest path search deadline expired at {:?}", element.vertex);
            return Err(SearchAborted);
        }

        if element.vertex == destination {
            // walk the shortest path from the destination back to the origin
            let mut edges = vec![];
            let mut next = destination;
            while let Some(&(edge, vertex)) = previous.get(&next) {
                next = vertex;
                edges.push(edge);
            }
            edges.reverse();

            return Ok(Some(EdgePath {
                length: element.distance,
                edges,
            }));
        }

        // skip if a cheaper way to this vertex has been found in the meantime
        let shortest = *shortest_distances.get(&element.vertex).unwrap_or(&Length::MAX);
        if element.distance > shortest {
            continue;
        }

        for (edge, vertex) in graph.exiting_edges(element.vertex) {
            let distance = element.distance + graph.edge_length(edge);
            if distance > bounds.max_length {
                continue;
            }

            if graph.edge_frc(edge) > bounds.lowest_frc {
                continue;
            }

            let shortest = *shortest_distances.get(&vertex).unwrap_or(&Length::MAX);
            if distance < shortest {
                shortest_distances.insert(vertex, distance);
                previous.insert(vertex, (edge, element.vertex));
                frontier.push(HeapElement { distance, vertex });
            }
        }
    }

    Ok(None)
}
