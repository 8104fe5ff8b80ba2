#![doc = include_str!("../README.md")]

mod decoder;
mod error;
mod format;
mod graph;
mod location;
mod model;

pub use decoder::candidates::{Candidate, MatchSide, find_candidates};
pub use decoder::line::decode_line;
pub use decoder::matcher::{SegmentMatch, SegmentStart, match_segment};
pub use decoder::rating::{fow_score, rate_candidate};
pub use decoder::{DecoderConfig, decode_base64, decode_binary};
pub use error::{DecodeError, ParseError};
pub use format::{parse_base64, parse_binary};
pub use graph::MapDatabase;
pub use graph::path::{EdgePath, is_path_connected};
pub use graph::search::{SearchAborted, SearchBounds, shortest_path};
pub use location::{LineLocation, Location, ensure_location_is_valid};
pub use model::{
    Bearing, Circle, ClosedLine, Coordinate, Fow, Frc, Grid, GridSize, Length, Line,
    LineAttributes, LocationReference, LocationReferencePoint, Offset, Offsets, Orientation,
    PathAttributes, Poi, PointAlongLine, Polygon, RatingScore, Rectangle, SideOfRoad,
};
