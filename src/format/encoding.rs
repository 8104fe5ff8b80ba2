//! Fixed point scale factors of the physical format.

use crate::model::{Bearing, Coordinate, Length, Offset};

/// Number of bits of an absolute coordinate value.
const COORDINATE_RESOLUTION: u32 = 24;

/// Relative coordinates are expressed in deca-micro degrees.
const DECA_MICRO_DEGREES: f64 = 100_000.0;

/// Width in meters of one distance-to-next-point interval.
const DNP_INTERVAL: f64 = 58.6;

/// Width in degrees of one bearing sector.
const BEARING_SECTOR: f64 = 11.25;

/// Number of buckets an offset fraction is quantized into.
const OFFSET_BUCKETS: f64 = 256.0;

impl Coordinate {
    /// Decodes a degree value from a 24-bit signed fixed point integer.
    pub(crate) fn degrees_from_fixed_point(value: i32) -> f64 {
        let sign = f64::from(value.signum());
        (f64::from(value) - 0.5 * sign) * 360.0 / f64::from(1u32 << COORDINATE_RESOLUTION)
    }

    /// Decodes a degree value encoded relative to a previously decoded one.
    pub(crate) fn degrees_from_relative(previous: f64, relative: i32) -> f64 {
        previous + f64::from(relative) / DECA_MICRO_DEGREES
    }
}

impl Length {
    /// Decodes a distance to next point from its interval byte.
    pub(crate) fn dnp_from_byte(byte: u8) -> Self {
        Self::from_meters(((f64::from(byte) + 0.5) * DNP_INTERVAL).round())
    }

    /// Half of a distance interval: the worst case quantization error of a DNP.
    pub(crate) fn dnp_quantization_error() -> Self {
        Self::from_meters((DNP_INTERVAL / 2.0).round())
    }
}

impl Bearing {
    /// Decodes a bearing from its 5-bit sector, mapping to the middle of the sector.
    pub(crate) fn from_sector(sector: u8) -> Self {
        let degrees = f64::from(sector) * BEARING_SECTOR + BEARING_SECTOR / 2.0;
        Self::from_degrees(degrees.round() as u16)
    }
}

impl Offset {
    /// Decodes an offset bucket byte, mapping to the middle of the bucket.
    pub(crate) fn from_byte(byte: u8) -> Self {
        Self::from_fraction((f64::from(byte) + 0.5) / OFFSET_BUCKETS)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn decodes_absolute_degrees() {
        assert_relative_eq!(
            Coordinate::degrees_from_fixed_point(285_531),
            6.126_819,
            epsilon = Coordinate::EPSILON
        );
        assert_relative_eq!(
            Coordinate::degrees_from_fixed_point(2_311_925),
            49.608_517,
            epsilon = Coordinate::EPSILON
        );
        assert_relative_eq!(Coordinate::degrees_from_fixed_point(0), 0.0);
        assert_relative_eq!(
            Coordinate::degrees_from_fixed_point(-285_531),
            -6.126_819,
            epsilon = Coordinate::EPSILON
        );
    }

    #[test]
    fn decodes_relative_degrees() {
        assert_relative_eq!(
            Coordinate::degrees_from_relative(6.126_819, 155),
            6.128_369,
            epsilon = Coordinate::EPSILON
        );
        assert_relative_eq!(
            Coordinate::degrees_from_relative(49.608_517, -453),
            49.603_987,
            epsilon = Coordinate::EPSILON
        );
    }

    #[test]
    fn decodes_distance_to_next_point() {
        assert_eq!(Length::dnp_from_byte(0), Length::from_meters(29.0));
        assert_eq!(Length::dnp_from_byte(8), Length::from_meters(498.0));
        assert_eq!(Length::dnp_from_byte(105), Length::from_meters(6182.0));
        assert_eq!(Length::dnp_from_byte(255), Length::from_meters(14972.0));
    }

    #[test]
    fn decodes_bearing_sectors() {
        assert_eq!(Bearing::from_sector(0), Bearing::from_degrees(6));
        assert_eq!(Bearing::from_sector(8), Bearing::from_degrees(96));
        assert_eq!(Bearing::from_sector(23), Bearing::from_degrees(264));
        assert_eq!(Bearing::from_sector(31), Bearing::from_degrees(354));
    }

    #[test]
    fn decodes_offset_buckets() {
        assert_relative_eq!(Offset::from_byte(0).fraction(), 0.001_953_125);
        assert_relative_eq!(Offset::from_byte(117).fraction(), 0.458_984_375);
        assert_relative_eq!(Offset::from_byte(255).fraction(), 0.998_046_875);
    }
}
