use std::cmp::Reverse;

use tracing::{debug, trace};

use crate::decoder::DecoderConfig;
use crate::decoder::candidates::{Candidate, MatchSide, find_candidates};
use crate::error::DecodeError;
use crate::graph::MapDatabase;
use crate::graph::path::{EdgePath, is_path_connected};
use crate::graph::search::{SearchBounds, shortest_path};
use crate::model::{Length, LocationReferencePoint, PathAttributes};

/// One rung of the segment retry ladder.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Relaxation {
    radius: Length,
    frc_tolerance: u8,
    tolerance_factor: f64,
}

/// The ordered retry ladder for one segment. Each rung only ever widens the
/// previous one, so a segment that matches at some rung would also match at
/// every later rung: first the candidate radius grows, then the FRC cutoff
/// opens up to the lowest class the encoder itself used, then the distance
/// tolerance grows. Rungs are never combined out of order.
fn relaxation_ladder(config: &DecoderConfig, lfrcnp_tolerance: u8) -> [Relaxation; 4] {
    let base = Relaxation {
        radius: config.search_radius,
        frc_tolerance: config.frc_tolerance,
        tolerance_factor: 1.0,
    };
    let wide_radius = Relaxation {
        radius: base.radius * config.radius_relaxation_factor,
        ..base
    };
    let wide_frc = Relaxation {
        frc_tolerance: base.frc_tolerance.max(lfrcnp_tolerance),
        ..wide_radius
    };
    let wide_tolerance = Relaxation {
        tolerance_factor: config.tolerance_relaxation_factor,
        ..wide_frc
    };

    [base, wide_radius, wide_frc, wide_tolerance]
}

/// Where a segment search starts from: open around the first point of the
/// segment, or pinned to the candidate the previous segment was accepted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentStart<EdgeId> {
    Open,
    Pinned(Candidate<EdgeId>),
}

/// An accepted route for one segment of a line location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentMatch<EdgeId> {
    /// Edges carrying the segment. The entry edge of the next point is left
    /// out so that consecutive segments concatenate without overlap; only the
    /// last segment of a line includes its final edge.
    pub path: EdgePath<EdgeId>,
    /// The accepted candidate of the second point, pinning the next segment.
    pub entry: Candidate<EdgeId>,
}

/// Resolves the route between two consecutive location reference points.
///
/// Candidate pairs are tried best first, each with a shortest path search
/// bounded by the encoded distance to next point plus a tolerance. If no pair
/// yields a route whose length agrees with the encoded distance, the search is
/// retried along the relaxation ladder before giving up with
/// [`DecodeError::RouteNotFound`].
#[allow(clippy::too_many_arguments)]
pub fn match_segment<G: MapDatabase>(
    config: &DecoderConfig,
    graph: &G,
    from: &LocationReferencePoint,
    to: &LocationReferencePoint,
    lrp_index: usize,
    path: PathAttributes,
    start: SegmentStart<G::EdgeId>,
    is_last_segment: bool,
) -> Result<SegmentMatch<G::EdgeId>, DecodeError> {
    let dnp = path.dnp;
    let lfrcnp_tolerance = from.line.frc.step_difference(path.lfrcnp);
    let to_side = if is_last_segment {
        MatchSide::Entry
    } else {
        MatchSide::Exit
    };

    for relaxation in relaxation_ladder(config, lfrcnp_tolerance) {
        debug!("Matching segment {lrp_index} with {relaxation:?}");

        let sources = match start {
            SegmentStart::Pinned(candidate) => vec![candidate],
            SegmentStart::Open => find_candidates(
                config,
                graph,
                from,
                MatchSide::Exit,
                relaxation.radius,
                relaxation.frc_tolerance,
            ),
        };
        let targets = find_candidates(
            config,
            graph,
            to,
            to_side,
            relaxation.radius,
            relaxation.frc_tolerance,
        );

        if sources.is_empty() || targets.is_empty() {
            continue;
        }

        // quantization of the encoded distance puts a floor under the tolerance
        let tolerance = (dnp * (config.distance_tolerance * relaxation.tolerance_factor))
            .max(Length::dnp_quantization_error());
        let bounds = SearchBounds {
            lowest_frc: path.lfrcnp.lowered(relaxation.frc_tolerance),
            max_length: dnp + tolerance,
            deadline: config.deadline,
        };

        let mut pairs: Vec<(Candidate<G::EdgeId>, Candidate<G::EdgeId>)> = sources
            .iter()
            .flat_map(|&source| targets.iter().map(move |&target| (source, target)))
            .collect();
        pairs.sort_by_key(|&(source, target)| {
            (Reverse(source.score * target.score), source.edge, target.edge)
        });
        pairs.truncate(config.max_pair_attempts);

        for (source, target) in pairs {
            let resolved =
                resolve_pair(graph, source, target, dnp, tolerance, bounds, is_last_segment)?;

            if let Some(matched) = resolved {
                debug!("Matched segment {lrp_index}: {matched:?}");
                return Ok(matched);
            }
        }
    }

    Err(DecodeError::RouteNotFound { lrp_index })
}

/// Tries to route between one pair of candidates, returning `None` when the
/// pair cannot carry the segment within the given bounds.
fn resolve_pair<G: MapDatabase>(
    graph: &G,
    source: Candidate<G::EdgeId>,
    target: Candidate<G::EdgeId>,
    dnp: Length,
    tolerance: Length,
    bounds: SearchBounds,
    is_last_segment: bool,
) -> Result<Option<SegmentMatch<G::EdgeId>>, DecodeError> {
    if source.edge == target.edge {
        // both points sit on the same edge, no routing needed
        let (length, edges) = if is_last_segment {
            (graph.edge_length(source.edge), vec![source.edge])
        } else {
            (Length::ZERO, vec![])
        };

        if (length - dnp).abs() > tolerance {
            return Ok(None);
        }

        return Ok(Some(SegmentMatch {
            path: EdgePath { length, edges },
            entry: target,
        }));
    }

    let origin = graph.edge_end_vertex(source.edge);
    let destination = graph.edge_start_vertex(target.edge);
    let interior = shortest_path(graph, origin, destination, bounds)
        .map_err(|_| DecodeError::SearchAborted)?;

    let Some(interior) = interior else {
        trace!("No route between {source:?} and {target:?} within {bounds:?}");
        return Ok(None);
    };

    // the encoded distance runs from the source point to the target point:
    // up to the start of the target edge, or its end for the last point
    let mut length = graph.edge_length(source.edge) + interior.length;
    if is_last_segment {
        length = length + graph.edge_length(target.edge);
    }

    if (length - dnp).abs() > tolerance {
        trace!("Route of {length:?} disagrees with a DNP of {dnp:?} (tolerance {tolerance:?})");
        return Ok(None);
    }

    // connectivity is checked through the target edge even when it is not part
    // of this segment: the next segment starts with it
    let mut edges = vec![source.edge];
    edges.extend(interior.edges);
    edges.push(target.edge);

    if !is_path_connected(graph, &edges) {
        trace!("Route through {edges:?} crosses a restricted turn");
        return Ok(None);
    }

    if !is_last_segment {
        edges.pop();
    }

    Ok(Some(SegmentMatch {
        path: EdgePath { length, edges },
        entry: target,
    }))
}
