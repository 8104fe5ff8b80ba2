use std::time::Instant;

use tracing::info;

use crate::error::DecodeError;
use crate::format::{parse_base64, parse_binary};
use crate::graph::MapDatabase;
use crate::location::Location;
use crate::model::{Bearing, Length, LocationReference, RatingScore};

pub mod candidates;
pub mod line;
pub mod matcher;
pub mod rating;

/// Tuning knobs of the decoder. The defaults follow the decoder guidelines
/// and are a sensible starting point for most maps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecoderConfig {
    /// Radius around a location reference point within which candidate
    /// vertices are searched.
    pub search_radius: Length,
    /// How much the search radius grows when a segment has to be retried.
    pub radius_relaxation_factor: f64,
    /// Length of the edge segment over which candidate bearings are measured.
    pub bearing_distance: Length,
    /// Candidates whose bearing differs more than this are rejected outright.
    pub max_bearing_difference: Bearing,
    /// Candidates whose functional road class differs by more steps than this
    /// are rejected outright.
    pub frc_tolerance: u8,
    /// Accepted disagreement between a route length and the encoded distance
    /// to next point, as a fraction of that distance.
    pub distance_tolerance: f64,
    /// How much the distance tolerance grows on the last retry.
    pub tolerance_relaxation_factor: f64,
    /// Candidates rated below this are not worth routing through.
    pub min_candidate_score: RatingScore,
    /// How many candidate pairs are tried per segment and retry.
    pub max_pair_attempts: usize,
    /// Hard wall clock limit for the route searches of one decode call.
    pub deadline: Option<Instant>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            search_radius: Length::from_meters(100.0),
            radius_relaxation_factor: 2.0,
            bearing_distance: Length::from_meters(20.0),
            max_bearing_difference: Bearing::from_degrees(90),
            frc_tolerance: 1,
            distance_tolerance: 0.15,
            tolerance_relaxation_factor: 2.0,
            min_candidate_score: RatingScore::new(0.4),
            max_pair_attempts: 8,
            deadline: None,
        }
    }
}

impl DecoderConfig {
    /// Returns the same configuration with a decode deadline set.
    pub fn with_deadline(self, deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            ..self
        }
    }
}

/// Decodes a Base64 wrapped binary location reference against a map.
pub fn decode_base64<G: MapDatabase>(
    config: &DecoderConfig,
    graph: &G,
    reference: &str,
) -> Result<Location<G::EdgeId>, DecodeError> {
    let reference = parse_base64(reference)?;
    resolve(config, graph, reference)
}

/// Decodes a binary location reference against a map.
pub fn decode_binary<G: MapDatabase>(
    config: &DecoderConfig,
    graph: &G,
    data: &[u8],
) -> Result<Location<G::EdgeId>, DecodeError> {
    let reference = parse_binary(data)?;
    resolve(config, graph, reference)
}

fn resolve<G: MapDatabase>(
    config: &DecoderConfig,
    graph: &G,
    reference: LocationReference,
) -> Result<Location<G::EdgeId>, DecodeError> {
    info!("Decoding {reference:?}");

    match reference {
        LocationReference::Line(line) => {
            line::decode_line(config, graph, &line).map(Location::Line)
        }
        LocationReference::GeoCoordinate(coordinate) => Ok(Location::GeoCoordinate(coordinate)),
        LocationReference::PointAlongLine(point) => Ok(Location::PointAlongLine(point)),
        LocationReference::Poi(poi) => Ok(Location::Poi(poi)),
        LocationReference::Circle(circle) => Ok(Location::Circle(circle)),
        LocationReference::Rectangle(rectangle) => Ok(Location::Rectangle(rectangle)),
        LocationReference::Grid(grid) => Ok(Location::Grid(grid)),
        LocationReference::Polygon(polygon) => Ok(Location::Polygon(polygon)),
        LocationReference::ClosedLine(closed) => Ok(Location::ClosedLine(closed)),
    }
}
