use tracing::debug;

use crate::decoder::DecoderConfig;
use crate::decoder::matcher::{SegmentStart, match_segment};
use crate::error::{DecodeError, ParseError};
use crate::graph::MapDatabase;
use crate::location::{LineLocation, ensure_location_is_valid};
use crate::model::{Length, Line};

/// Matches a parsed line reference onto the road network.
///
/// Segments between consecutive points are resolved strictly in order, each
/// segment starting from the candidate its predecessor was accepted with. The
/// per-segment routes are concatenated, the fractional offsets are converted
/// into meters against the first and last segment lengths, and the result is
/// trimmed so that both offsets fall inside their edge.
pub fn decode_line<G: MapDatabase>(
    config: &DecoderConfig,
    graph: &G,
    line: &Line,
) -> Result<LineLocation<G::EdgeId>, DecodeError> {
    if line.points.len() < 2 {
        return Err(ParseError::Malformed("a line needs at least two points").into());
    }

    let mut edges = vec![];
    let mut first_segment_length = Length::ZERO;
    let mut last_segment_length = Length::ZERO;
    let mut start = SegmentStart::Open;

    for (index, window) in line.points.windows(2).enumerate() {
        let is_last_segment = index + 2 == line.points.len();
        let path = window[0].path.unwrap_or_default();

        let matched = match_segment(
            config,
            graph,
            &window[0],
            &window[1],
            index,
            path,
            start,
            is_last_segment,
        )?;

        if index == 0 {
            first_segment_length = matched.path.length;
        }
        last_segment_length = matched.path.length;

        edges.extend(matched.path.edges.iter().copied());
        start = SegmentStart::Pinned(matched.entry);
    }

    let location = LineLocation {
        path: edges,
        positive_offset: (first_segment_length * line.offsets.positive.fraction()).round(),
        negative_offset: (last_segment_length * line.offsets.negative.fraction()).round(),
    };

    debug!("Matched line location before trimming: {location:?}");
    ensure_location_is_valid(graph, &location)?;
    location.trim(graph)
}
