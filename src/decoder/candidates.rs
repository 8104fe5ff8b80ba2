use std::cmp::Reverse;

use tracing::debug;

use crate::decoder::DecoderConfig;
use crate::decoder::rating::{is_fow_incompatible, rate_candidate};
use crate::graph::MapDatabase;
use crate::model::{Length, LineAttributes, LocationReferencePoint, RatingScore};

/// A rated edge that may carry a location reference point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<EdgeId> {
    pub edge: EdgeId,
    pub score: RatingScore,
    /// Distance between the reference point coordinate and the edge vertex
    /// the candidate was found at.
    pub distance: Length,
}

/// Which end of its edges a location reference point sits at.
///
/// Every point but the last references the start of an edge leaving its
/// coordinate; the last point references the end of an edge arriving at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSide {
    Exit,
    Entry,
}

/// Finds the edges around a location reference point that could carry it.
///
/// Vertices within `radius` of the point coordinate are queried and their
/// incident edges pass three hard filters before being rated: the functional
/// road class may differ by at most `frc_tolerance` steps, the form of way
/// must not be incompatible, and the bearing may differ by at most the
/// configured maximum. Survivors are rated and returned best first, with ties
/// broken by edge identifier so results are reproducible.
pub fn find_candidates<G: MapDatabase>(
    config: &DecoderConfig,
    graph: &G,
    point: &LocationReferencePoint,
    side: MatchSide,
    radius: Length,
    frc_tolerance: u8,
) -> Vec<Candidate<G::EdgeId>> {
    let mut candidates: Vec<Candidate<G::EdgeId>> = vec![];

    for (vertex, distance) in graph.vertices_near(point.coordinate, radius) {
        let edges: Vec<_> = match side {
            MatchSide::Exit => graph.exiting_edges(vertex).collect(),
            MatchSide::Entry => graph.entering_edges(vertex).collect(),
        };

        for (edge, _) in edges {
            if point.line.frc.step_difference(graph.edge_frc(edge)) > frc_tolerance {
                continue;
            }

            if is_fow_incompatible(point.line.fow, graph.edge_fow(edge)) {
                continue;
            }

            let bearing = match side {
                MatchSide::Exit => {
                    graph.edge_bearing(edge, Length::ZERO, config.bearing_distance)
                }
                MatchSide::Entry => {
                    graph.edge_bearing(edge, graph.edge_length(edge), -config.bearing_distance)
                }
            };

            if point.line.bearing.difference(bearing) > config.max_bearing_difference.degrees() {
                continue;
            }

            let attributes = LineAttributes {
                frc: graph.edge_frc(edge),
                fow: graph.edge_fow(edge),
                bearing,
            };
            let score = rate_candidate(&point.line, &attributes, None);

            if score >= config.min_candidate_score {
                candidates.push(Candidate {
                    edge,
                    score,
                    distance,
                });
            }
        }
    }

    candidates.sort_by_key(|candidate| (Reverse(candidate.score), candidate.edge));
    debug!(
        "Found {} candidates for {point:?} on side {side:?} within {radius:?}",
        candidates.len()
    );

    candidates
}
