use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

use crate::error::ParseError;
use crate::format::bits::BitReader;
use crate::model::{
    Bearing, Circle, ClosedLine, Coordinate, Fow, Frc, Grid, GridSize, Length, Line,
    LineAttributes, LocationReference, LocationReferencePoint, Offset, Offsets, Orientation,
    PathAttributes, PointAlongLine, Poi, Polygon, Rectangle, SideOfRoad,
};

/// The only physical format version this crate speaks.
const PHYSICAL_FORMAT_VERSION: u8 = 3;

// Location type tags of the header byte. Some tags are shared between two
// location types and are disambiguated by the total input length.
const TYPE_CIRCLE: u8 = 0;
const TYPE_LINE: u8 = 1;
const TYPE_POLYGON: u8 = 2;
const TYPE_GEO_COORDINATE: u8 = 4;
const TYPE_POINT_ALONG_LINE: u8 = 5;
const TYPE_RECTANGLE: u8 = 8;
const TYPE_CLOSED_LINE: u8 = 11;

/// Size in bytes of the header plus a first point with path attributes.
const FIRST_POINT_SIZE: usize = 10;

/// Size in bytes of a point encoded relative to its predecessor.
const RELATIVE_POINT_SIZE: usize = 7;

/// Smallest possible line reference: header, first point, last point.
const LINE_MIN_SIZE: usize = 16;

/// Smallest possible closed line reference: header, first point, closing attributes.
const CLOSED_LINE_MIN_SIZE: usize = 12;

/// Smallest possible polygon reference: header and three corners.
const POLYGON_MIN_SIZE: usize = 15;

/// A point along line is at most 17 bytes, anything longer with the same tag is a POI.
const POINT_ALONG_LINE_MAX_SIZE: usize = 17;

/// A rectangle is at most 13 bytes, anything longer with the same tag is a grid.
const RECTANGLE_MAX_SIZE: usize = 13;

/// Rectangle and grid corners are absolute above these sizes, relative otherwise.
const RECTANGLE_ABSOLUTE_SIZE: usize = 12;
const GRID_ABSOLUTE_SIZE: usize = 16;

// Offset flags stored in place of the LFRCNP on the last point of a line.
const POSITIVE_OFFSET_FLAG: u8 = 0b010;
const NEGATIVE_OFFSET_FLAG: u8 = 0b001;

/// Parses a Base64 wrapped binary location reference.
pub fn parse_base64(reference: &str) -> Result<LocationReference, ParseError> {
    let data = STANDARD.decode(reference)?;
    parse_binary(&data)
}

/// Parses a binary location reference blob.
///
/// The version is validated before anything else: inputs carrying an unsupported
/// version fail regardless of their content. Inputs that end before the record
/// they announce is complete fail with [`ParseError::Truncated`], with one
/// format-inherent exception: the circle radius is a variable one to four byte
/// field, so a circle cut short by whole bytes parses as a circle with a
/// smaller radius.
pub fn parse_binary(data: &[u8]) -> Result<LocationReference, ParseError> {
    let mut reader = ReferenceReader::new(data);
    let location = reader.read_location()?;
    reader.finish()?;
    debug!("Parsed location reference: {location:?}");
    Ok(location)
}

struct ReferenceReader<'a> {
    bits: BitReader<'a>,
}

impl<'a> ReferenceReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            bits: BitReader::new(data),
        }
    }

    fn read_location(&mut self) -> Result<LocationReference, ParseError> {
        let location_type = self.read_header()?;
        let length = self.bits.byte_len();

        match location_type {
            TYPE_LINE => self.read_line().map(LocationReference::Line),
            TYPE_GEO_COORDINATE => self
                .read_absolute_coordinate()
                .map(LocationReference::GeoCoordinate),
            TYPE_POINT_ALONG_LINE if length <= POINT_ALONG_LINE_MAX_SIZE => self
                .read_point_along_line()
                .map(LocationReference::PointAlongLine),
            TYPE_POINT_ALONG_LINE => self.read_poi().map(LocationReference::Poi),
            TYPE_CIRCLE => self.read_circle().map(LocationReference::Circle),
            TYPE_RECTANGLE if length <= RECTANGLE_MAX_SIZE => self
                .read_rectangle(length >= RECTANGLE_ABSOLUTE_SIZE)
                .map(LocationReference::Rectangle),
            TYPE_RECTANGLE => self.read_grid().map(LocationReference::Grid),
            TYPE_POLYGON => self.read_polygon().map(LocationReference::Polygon),
            TYPE_CLOSED_LINE => self.read_closed_line().map(LocationReference::ClosedLine),
            location_type => Err(ParseError::UnsupportedLocationType {
                location_type,
                length,
            }),
        }
    }

    /// Reads the header byte and returns the location type tag.
    /// An unsupported version fails before any other byte is interpreted.
    fn read_header(&mut self) -> Result<u8, ParseError> {
        let _reserved = self.bits.read_bits(1)?;
        let location_type = self.bits.read_bits(4)? as u8;
        let version = self.bits.read_bits(3)? as u8;

        if version != PHYSICAL_FORMAT_VERSION {
            return Err(ParseError::UnsupportedVersion(version));
        }

        Ok(location_type)
    }

    /// Fails unless the whole input has been consumed.
    fn finish(&self) -> Result<(), ParseError> {
        if self.bits.remaining_bytes() > 0 {
            return Err(ParseError::Malformed("unread trailing bytes"));
        }
        Ok(())
    }

    fn read_line(&mut self) -> Result<Line, ParseError> {
        let length = self.bits.byte_len();
        if length < LINE_MIN_SIZE {
            return Err(ParseError::Truncated);
        }
        // an input that stops in the middle of a point record counts as truncated,
        // the remainder can only hold up to two offset bytes
        if (length - FIRST_POINT_SIZE + 1) % RELATIVE_POINT_SIZE > 2 {
            return Err(ParseError::Truncated);
        }

        let point_count = (length - FIRST_POINT_SIZE + 1) / RELATIVE_POINT_SIZE + 1;
        let mut points = Vec::with_capacity(point_count);
        let mut offset_flags = 0;
        let mut coordinate = Coordinate::default();

        for index in 0..point_count {
            coordinate = if index == 0 {
                self.read_absolute_coordinate()?
            } else {
                self.read_relative_coordinate(coordinate)?
            };

            let (_, line) = self.read_line_attributes()?;
            let (top_bits, bearing) = self.read_path_attributes()?;
            let line = LineAttributes { bearing, ..line };

            let path = if index + 1 < point_count {
                Some(PathAttributes {
                    lfrcnp: frc_from_bits(top_bits)?,
                    dnp: Length::dnp_from_byte(self.bits.read_byte()?),
                })
            } else {
                offset_flags = top_bits;
                None
            };

            points.push(LocationReferencePoint {
                coordinate,
                line,
                path,
            });
        }

        let offsets = self.read_offsets(offset_flags)?;
        Ok(Line { points, offsets })
    }

    fn read_closed_line(&mut self) -> Result<ClosedLine, ParseError> {
        let length = self.bits.byte_len();
        if length < CLOSED_LINE_MIN_SIZE {
            return Err(ParseError::Truncated);
        }
        if (length - CLOSED_LINE_MIN_SIZE) % RELATIVE_POINT_SIZE != 0 {
            return Err(ParseError::Truncated);
        }

        let point_count = (length - CLOSED_LINE_MIN_SIZE) / RELATIVE_POINT_SIZE + 1;
        let mut points = Vec::with_capacity(point_count);
        let mut coordinate = Coordinate::default();

        // every point of a circuit has a successor, so they all carry path attributes
        for index in 0..point_count {
            coordinate = if index == 0 {
                self.read_absolute_coordinate()?
            } else {
                self.read_relative_coordinate(coordinate)?
            };

            let (_, line) = self.read_line_attributes()?;
            let (top_bits, bearing) = self.read_path_attributes()?;

            points.push(LocationReferencePoint {
                coordinate,
                line: LineAttributes { bearing, ..line },
                path: Some(PathAttributes {
                    lfrcnp: frc_from_bits(top_bits)?,
                    dnp: Length::dnp_from_byte(self.bits.read_byte()?),
                }),
            });
        }

        let (_, line) = self.read_line_attributes()?;
        let (_, bearing) = self.read_path_attributes()?;
        let closing_line = LineAttributes { bearing, ..line };

        Ok(ClosedLine {
            points,
            closing_line,
        })
    }

    fn read_point_along_line(&mut self) -> Result<PointAlongLine, ParseError> {
        let coordinate = self.read_absolute_coordinate()?;
        let (extra_bits, line) = self.read_line_attributes()?;
        let orientation = Orientation::from_bits(extra_bits)
            .ok_or(ParseError::Malformed("invalid orientation"))?;
        let (top_bits, bearing) = self.read_path_attributes()?;

        let first = LocationReferencePoint {
            coordinate,
            line: LineAttributes { bearing, ..line },
            path: Some(PathAttributes {
                lfrcnp: frc_from_bits(top_bits)?,
                dnp: Length::dnp_from_byte(self.bits.read_byte()?),
            }),
        };

        let coordinate = self.read_relative_coordinate(coordinate)?;
        let (extra_bits, line) = self.read_line_attributes()?;
        let side_of_road = SideOfRoad::from_bits(extra_bits)
            .ok_or(ParseError::Malformed("invalid side of road"))?;
        let (offset_flags, bearing) = self.read_path_attributes()?;

        let second = LocationReferencePoint {
            coordinate,
            line: LineAttributes { bearing, ..line },
            path: None,
        };

        let offset = if offset_flags & POSITIVE_OFFSET_FLAG != 0 {
            Offset::from_byte(self.bits.read_byte()?)
        } else {
            Offset::default()
        };

        Ok(PointAlongLine {
            points: [first, second],
            orientation,
            side_of_road,
            offset,
        })
    }

    fn read_poi(&mut self) -> Result<Poi, ParseError> {
        let point = self.read_point_along_line()?;
        let poi = self.read_relative_coordinate(point.points[0].coordinate)?;
        Ok(Poi { point, poi })
    }

    fn read_circle(&mut self) -> Result<Circle, ParseError> {
        let center = self.read_absolute_coordinate()?;

        // the radius is an unsigned big-endian integer of one to four bytes
        let radius_bytes = self.bits.remaining_bytes();
        if radius_bytes == 0 {
            return Err(ParseError::Truncated);
        }
        if radius_bytes > 4 {
            return Err(ParseError::Malformed("circle radius is wider than 4 bytes"));
        }

        let radius = Length::from_meters(f64::from(self.bits.read_bits(radius_bytes * 8)?));
        Ok(Circle { center, radius })
    }

    fn read_rectangle(&mut self, absolute: bool) -> Result<Rectangle, ParseError> {
        let lower_left = self.read_absolute_coordinate()?;
        let upper_right = if absolute {
            self.read_absolute_coordinate()?
        } else {
            self.read_relative_coordinate(lower_left)?
        };

        Ok(Rectangle {
            lower_left,
            upper_right,
        })
    }

    fn read_grid(&mut self) -> Result<Grid, ParseError> {
        let rectangle = self.read_rectangle(self.bits.byte_len() >= GRID_ABSOLUTE_SIZE)?;
        let columns = self.bits.read_bits(16)? as u16;
        let rows = self.bits.read_bits(16)? as u16;

        Ok(Grid {
            rectangle,
            size: GridSize { columns, rows },
        })
    }

    fn read_polygon(&mut self) -> Result<Polygon, ParseError> {
        let length = self.bits.byte_len();
        if length < POLYGON_MIN_SIZE || (length - POLYGON_MIN_SIZE) % 4 != 0 {
            return Err(ParseError::Truncated);
        }

        let relative_corners = (length - 7) / 4;
        let mut corners = Vec::with_capacity(1 + relative_corners);

        let mut coordinate = self.read_absolute_coordinate()?;
        corners.push(coordinate);

        for _ in 0..relative_corners {
            coordinate = self.read_relative_coordinate(coordinate)?;
            corners.push(coordinate);
        }

        Ok(Polygon { corners })
    }

    fn read_absolute_coordinate(&mut self) -> Result<Coordinate, ParseError> {
        let lon = Coordinate::degrees_from_fixed_point(self.bits.read_signed(24)?);
        let lat = Coordinate::degrees_from_fixed_point(self.bits.read_signed(24)?);
        Ok(Coordinate { lon, lat })
    }

    fn read_relative_coordinate(&mut self, previous: Coordinate) -> Result<Coordinate, ParseError> {
        let lon = Coordinate::degrees_from_relative(previous.lon, self.bits.read_signed(16)?);
        let lat = Coordinate::degrees_from_relative(previous.lat, self.bits.read_signed(16)?);
        Ok(Coordinate { lon, lat })
    }

    /// First attribute byte: orientation or side of road (2), FRC (3), FOW (3).
    fn read_line_attributes(&mut self) -> Result<(u8, LineAttributes), ParseError> {
        let extra_bits = self.bits.read_bits(2)? as u8;
        let frc = frc_from_bits(self.bits.read_bits(3)? as u8)?;
        let fow = Fow::from_bits(self.bits.read_bits(3)? as u8)
            .ok_or(ParseError::Malformed("invalid form of way"))?;

        let line = LineAttributes {
            frc,
            fow,
            bearing: Bearing::default(),
        };
        Ok((extra_bits, line))
    }

    /// Second attribute byte: LFRCNP or offset flags (3), bearing sector (5).
    fn read_path_attributes(&mut self) -> Result<(u8, Bearing), ParseError> {
        let top_bits = self.bits.read_bits(3)? as u8;
        let bearing = Bearing::from_sector(self.bits.read_bits(5)? as u8);
        Ok((top_bits, bearing))
    }

    fn read_offsets(&mut self, flags: u8) -> Result<Offsets, ParseError> {
        let positive = if flags & POSITIVE_OFFSET_FLAG != 0 {
            Offset::from_byte(self.bits.read_byte()?)
        } else {
            Offset::default()
        };

        let negative = if flags & NEGATIVE_OFFSET_FLAG != 0 {
            Offset::from_byte(self.bits.read_byte()?)
        } else {
            Offset::default()
        };

        Ok(Offsets { positive, negative })
    }
}

fn frc_from_bits(bits: u8) -> Result<Frc, ParseError> {
    Frc::from_bits(bits).ok_or(ParseError::Malformed("invalid functional road class"))
}
