use thiserror::Error;

/// Errors raised while parsing the physical format, before any map is consulted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input ends before the record it announces is complete.
    #[error("unexpected end of input")]
    Truncated,

    /// The header announces a physical format version this crate does not speak.
    #[error("unsupported physical format version {0}")]
    UnsupportedVersion(u8),

    /// The header location type cannot be combined with the input length.
    #[error("unsupported location type {location_type} for an input of {length} bytes")]
    UnsupportedLocationType { location_type: u8, length: usize },

    /// The input is structurally broken beyond repair.
    #[error("malformed location reference: {0}")]
    Malformed(&'static str),

    /// The Base64 wrapping of a binary reference could not be decoded.
    #[error("invalid base64 location reference: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Errors raised while resolving a parsed location reference onto a map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// No acceptable route exists between the candidates of the location reference
    /// point at `lrp_index` and its successor, even after all relaxation retries.
    #[error("no route found from location reference point {lrp_index} to its successor")]
    RouteNotFound { lrp_index: usize },

    /// The decode deadline expired while the route search was still running.
    #[error("route search aborted: decode deadline expired")]
    SearchAborted,

    /// The offsets cover the whole matched path.
    #[error("offsets are longer than the location path")]
    InvalidOffsets,

    /// The matched location has no edges.
    #[error("location path is empty")]
    EmptyLocation,

    /// The matched location edges are not sequentially connected.
    #[error("location path is not connected")]
    DisconnectedLocation,
}
