use crate::error::DecodeError;
use crate::graph::MapDatabase;
use crate::graph::path::is_path_connected;
use crate::model::{
    Circle, ClosedLine, Coordinate, Grid, Length, PointAlongLine, Poi, Polygon, Rectangle,
};

/// A location reference resolved against a map.
///
/// Only line references are matched onto the road network; point and area
/// references decode into their plain records.
#[derive(Debug, Clone, PartialEq)]
pub enum Location<EdgeId> {
    Line(LineLocation<EdgeId>),
    GeoCoordinate(Coordinate),
    PointAlongLine(PointAlongLine),
    Poi(Poi),
    Circle(Circle),
    Rectangle(Rectangle),
    Grid(Grid),
    Polygon(Polygon),
    ClosedLine(ClosedLine),
}

/// A path on the road network, shortened by offsets measured in meters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineLocation<EdgeId> {
    /// Sequentially connected directed edges.
    pub path: Vec<EdgeId>,
    /// How far into the first edge the location actually starts.
    pub positive_offset: Length,
    /// How far before the end of the last edge the location actually ends.
    pub negative_offset: Length,
}

impl<EdgeId: Copy> LineLocation<EdgeId> {
    /// Drops the edges fully covered by the offsets, leaving each remaining
    /// offset strictly inside the edge it trims. Fails when the offsets cover
    /// the whole path: a location may never have a negative length.
    pub(crate) fn trim<G: MapDatabase<EdgeId = EdgeId>>(
        mut self,
        graph: &G,
    ) -> Result<Self, DecodeError> {
        let total: Length = self.path.iter().map(|&edge| graph.edge_length(edge)).sum();
        if self.positive_offset + self.negative_offset >= total {
            return Err(DecodeError::InvalidOffsets);
        }

        let mut dropped_front = 0;
        for &edge in &self.path {
            let length = graph.edge_length(edge);
            if self.positive_offset < length {
                break;
            }
            self.positive_offset = self.positive_offset - length;
            dropped_front += 1;
        }
        self.path.drain(..dropped_front);

        while let Some(&edge) = self.path.last() {
            let length = graph.edge_length(edge);
            if self.negative_offset < length {
                break;
            }
            self.negative_offset = self.negative_offset - length;
            self.path.pop();
        }

        Ok(self)
    }
}

/// Fails unless the location has at least one edge and its edges form a
/// connected path with no restricted turns.
pub fn ensure_location_is_valid<G: MapDatabase>(
    graph: &G,
    location: &LineLocation<G::EdgeId>,
) -> Result<(), DecodeError> {
    if location.path.is_empty() {
        return Err(DecodeError::EmptyLocation);
    }

    if !is_path_connected(graph, &location.path) {
        return Err(DecodeError::DisconnectedLocation);
    }

    Ok(())
}
