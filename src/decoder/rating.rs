use tracing::trace;

use crate::model::{Fow, Frc, Length, LineAttributes, RatingScore};

// Weights of the rating factors, summing up to one. When no path length is
// available the remaining weights are renormalized so a full match still
// scores 1.0.
const BEARING_WEIGHT: f64 = 0.35;
const FRC_WEIGHT: f64 = 0.30;
const FOW_WEIGHT: f64 = 0.20;
const DISTANCE_WEIGHT: f64 = 0.15;

/// How well two forms of way can stand in for each other, in `[0, 1]`.
///
/// The table is symmetric. An exact match scores 1.0; pairs a mapping agency
/// plausibly disagrees on (motorway against multiple carriageway, multiple
/// against single carriageway, slip road against anything drivable) score 0.5;
/// an undefined form of way is compatible with everything at 0.5.
const FOW_COMPATIBILITY: [[f64; 8]; 8] = {
    const X: f64 = 1.0;
    const H: f64 = 0.5;
    const O: f64 = 0.0;
    [
        // Undefined, Motorway, Multiple, Single, Roundabout, Square, SlipRoad, Other
        [X, H, H, H, H, H, H, H], // Undefined
        [H, X, H, O, O, O, H, O], // Motorway
        [H, H, X, H, O, O, H, O], // MultipleCarriageway
        [H, O, H, X, H, H, H, H], // SingleCarriageway
        [H, O, O, H, X, H, O, O], // Roundabout
        [H, O, O, H, H, X, O, O], // TrafficSquare
        [H, H, H, H, O, O, X, O], // SlipRoad
        [H, O, O, H, O, O, O, X], // Other
    ]
};

/// Rates how well a candidate edge matches the line attributes of a location
/// reference point. All factors are normalized into `[0, 1]` and combined into
/// a weighted sum, so the result is always a finite score in `[0, 1]`.
///
/// `lengths` carries the actual path length next to the encoded distance to the
/// next point; it is `None` while rating single edges, before any route exists.
pub fn rate_candidate(
    reference: &LineAttributes,
    candidate: &LineAttributes,
    lengths: Option<(Length, Length)>,
) -> RatingScore {
    let bearing = bearing_score(reference, candidate);
    let frc = frc_score(reference.frc, candidate.frc);
    let fow = fow_score(reference.fow, candidate.fow);
    let distance = lengths.and_then(|(actual, dnp)| distance_score(actual, dnp));

    let mut score = BEARING_WEIGHT * bearing + FRC_WEIGHT * frc + FOW_WEIGHT * fow;
    let mut weight = BEARING_WEIGHT + FRC_WEIGHT + FOW_WEIGHT;

    if let Some(distance) = distance {
        score += DISTANCE_WEIGHT * distance;
        weight += DISTANCE_WEIGHT;
    }

    let score = score / weight;
    trace!(
        "Rated candidate {candidate:?} against {reference:?}: \
         bearing {bearing:.3}, frc {frc:.3}, fow {fow:.3}, distance {distance:?} -> {score:.3}"
    );

    RatingScore::new(score)
}

/// Agreement between two forms of way, looked up in the compatibility table.
pub fn fow_score(reference: Fow, candidate: Fow) -> f64 {
    FOW_COMPATIBILITY[reference as usize][candidate as usize]
}

/// Returns true if two forms of way cannot stand in for each other at all.
pub fn is_fow_incompatible(reference: Fow, candidate: Fow) -> bool {
    fow_score(reference, candidate) == 0.0
}

fn bearing_score(reference: &LineAttributes, candidate: &LineAttributes) -> f64 {
    let difference = reference.bearing.difference(candidate.bearing);
    1.0 - f64::from(difference.min(180)) / 180.0
}

fn frc_score(reference: Frc, candidate: Frc) -> f64 {
    let difference = reference.step_difference(candidate);
    1.0 - f64::from(difference.min(7)) / 7.0
}

/// Agreement between the actual path length and the encoded distance to the
/// next point. `None` when the encoded distance is zero and no meaningful
/// comparison is possible.
fn distance_score(actual: Length, dnp: Length) -> Option<f64> {
    if dnp.is_zero() {
        return None;
    }

    let error = (actual - dnp).abs().min(dnp);
    Some(1.0 - error.meters() / dnp.meters())
}
