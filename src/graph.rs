use std::fmt::Debug;
use std::hash::Hash;

use crate::model::{Bearing, Coordinate, Fow, Frc, Length};

pub mod path;
pub mod search;

/// Read-only view over a digital road network.
///
/// The network is a directed graph: roads open in both directions are expected
/// to be modeled as two edges. Implementations are responsible for indexing
/// their vertices so that [`MapDatabase::vertices_near`] is fast; everything
/// else is plain attribute and adjacency lookup.
///
/// Identifiers are totally ordered so the decoder can break ties between
/// equally rated alternatives deterministically.
pub trait MapDatabase {
    type VertexId: Debug + Copy + Eq + Ord + Hash;
    type EdgeId: Debug + Copy + Eq + Ord + Hash;

    fn vertex_coordinate(&self, vertex: Self::VertexId) -> Coordinate;

    fn edge_start_vertex(&self, edge: Self::EdgeId) -> Self::VertexId;

    fn edge_end_vertex(&self, edge: Self::EdgeId) -> Self::VertexId;

    fn edge_length(&self, edge: Self::EdgeId) -> Length;

    fn edge_frc(&self, edge: Self::EdgeId) -> Frc;

    fn edge_fow(&self, edge: Self::EdgeId) -> Fow;

    /// Bearing of the edge measured at `distance_from_start` along its geometry,
    /// looking over a segment of the given length. A negative segment length
    /// looks backwards, towards the start of the edge.
    fn edge_bearing(
        &self,
        edge: Self::EdgeId,
        distance_from_start: Length,
        segment_length: Length,
    ) -> Bearing;

    /// Edges leaving the vertex, with the vertex they lead to.
    fn exiting_edges(
        &self,
        vertex: Self::VertexId,
    ) -> impl Iterator<Item = (Self::EdgeId, Self::VertexId)>;

    /// Edges arriving into the vertex, with the vertex they come from.
    fn entering_edges(
        &self,
        vertex: Self::VertexId,
    ) -> impl Iterator<Item = (Self::EdgeId, Self::VertexId)>;

    /// Vertices within `radius` of the coordinate, with their distance from it,
    /// ordered from closest to farthest.
    fn vertices_near(
        &self,
        coordinate: Coordinate,
        radius: Length,
    ) -> impl Iterator<Item = (Self::VertexId, Length)>;

    /// Returns true if turning from the first edge into the second is forbidden.
    fn is_turn_restricted(&self, _from: Self::EdgeId, _to: Self::EdgeId) -> bool {
        false
    }
}
