use std::iter::Sum;
use std::ops::{Add, Mul, Neg, Sub};

use approx::AbsDiffEq;
use ordered_float::OrderedFloat;
use strum::FromRepr;

/// Functional Road Class: road classification based on the importance of a road.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, FromRepr)]
#[repr(u8)]
pub enum Frc {
    /// Main road, highest importance.
    Frc0 = 0,
    /// First class road.
    Frc1 = 1,
    /// Second class road.
    Frc2 = 2,
    /// Third class road.
    Frc3 = 3,
    /// Fourth class road.
    Frc4 = 4,
    /// Fifth class road.
    Frc5 = 5,
    /// Sixth class road.
    Frc6 = 6,
    /// Other class road, lowest importance.
    #[default]
    Frc7 = 7,
}

impl Frc {
    pub(crate) fn from_bits(bits: u8) -> Option<Self> {
        Self::from_repr(bits)
    }

    /// Absolute difference between two classes, in classification steps.
    pub fn step_difference(self, other: Self) -> u8 {
        (self as u8).abs_diff(other as u8)
    }

    /// Returns the class lowered by the given number of steps, saturating at [`Frc::Frc7`].
    pub fn lowered(self, steps: u8) -> Self {
        Self::from_repr((self as u8).saturating_add(steps).min(Self::Frc7 as u8))
            .unwrap_or(Self::Frc7)
    }
}

/// Form Of Way: classification based on the physical road type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, FromRepr)]
#[repr(u8)]
pub enum Fow {
    /// The physical road type is unknown.
    #[default]
    Undefined = 0,
    /// A road permitted for motorized vehicles only, with physically separated
    /// carriageways and no single level-crossings.
    Motorway = 1,
    /// A road with physically separated carriageways regardless of the number of
    /// lanes, which is not a motorway.
    MultipleCarriageway = 2,
    /// A road without separate carriageways.
    SingleCarriageway = 3,
    /// A ring road on which traffic is only allowed in one direction.
    Roundabout = 4,
    /// An open area (partly) enclosed by roads which is used for non-traffic
    /// purposes and which is not a roundabout.
    TrafficSquare = 5,
    /// A road especially designed to enter or leave a line.
    SlipRoad = 6,
    /// The physical road type is known but does not fit the other categories.
    Other = 7,
}

impl Fow {
    pub(crate) fn from_bits(bits: u8) -> Option<Self> {
        Self::from_repr(bits)
    }
}

/// Bearing in degrees from true north, normalized into `[0, 360)`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bearing(u16);

impl Bearing {
    pub fn from_degrees(degrees: u16) -> Self {
        Self(degrees % 360)
    }

    pub fn degrees(self) -> u16 {
        self.0
    }

    /// Smallest angle between two bearings, in `[0, 180]` degrees.
    pub fn difference(self, other: Self) -> u16 {
        let difference = self.0.abs_diff(other.0);
        difference.min(360 - difference)
    }
}

/// Length in meters. Lengths are totally ordered so they can be used as search keys.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Length(OrderedFloat<f64>);

impl Length {
    pub const ZERO: Self = Self(OrderedFloat(0.0));
    pub const MAX: Self = Self(OrderedFloat(f64::MAX));

    pub fn from_meters(meters: f64) -> Self {
        Self(OrderedFloat(meters))
    }

    pub fn meters(self) -> f64 {
        self.0.0
    }

    pub fn is_zero(self) -> bool {
        self.0.0 == 0.0
    }

    pub fn abs(self) -> Self {
        Self(OrderedFloat(self.0.0.abs()))
    }

    pub fn round(self) -> Self {
        Self(OrderedFloat(self.0.0.round()))
    }
}

impl Add for Length {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Length {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Length {
    type Output = Self;
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Mul<f64> for Length {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self(OrderedFloat(self.0.0 * rhs))
    }
}

impl Sum for Length {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// WGS84 coordinate in decimal degrees.
#[derive(Debug, Default, Clone, Copy)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    /// Coordinates closer than this are considered equal (fifth decimal, about a meter).
    pub const EPSILON: f64 = 1e-5;
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.lon.abs_diff_eq(&other.lon, Self::EPSILON)
            && self.lat.abs_diff_eq(&other.lat, Self::EPSILON)
    }
}

/// Normalized candidate rating in `[0, 1]`, higher is better.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RatingScore(OrderedFloat<f64>);

impl RatingScore {
    pub const ZERO: Self = Self(OrderedFloat(0.0));

    pub fn new(score: f64) -> Self {
        Self(OrderedFloat(score))
    }

    pub fn value(self) -> f64 {
        self.0.0
    }
}

/// Combining the ratings of a candidate pair multiplies the individual scores.
impl Mul for RatingScore {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self(self.0 * rhs.0)
    }
}

/// Attributes of the line (road segment) a location reference point belongs to.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LineAttributes {
    pub frc: Frc,
    pub fow: Fow,
    /// Bearing of the line measured at the reference point.
    pub bearing: Bearing,
}

/// Attributes of the path between a location reference point and its successor.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PathAttributes {
    /// Lowest Functional Road Class to the Next Point: the least important road
    /// class the encoder used on the path towards the next point.
    pub lfrcnp: Frc,
    /// Distance to Next Point along the encoder's path, quantized into intervals.
    pub dnp: Length,
}

/// A point on the road network delimiting a location reference.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct LocationReferencePoint {
    pub coordinate: Coordinate,
    pub line: LineAttributes,
    /// `None` for the last point of a reference, which has no successor.
    pub path: Option<PathAttributes>,
}

/// Offset expressed as a fraction of a path length, in `[0, 1]`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Offset(f64);

impl Offset {
    pub fn from_fraction(fraction: f64) -> Self {
        Self(fraction.clamp(0.0, 1.0))
    }

    pub fn fraction(self) -> f64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

/// Offsets shortening a line location from its start and end.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Offsets {
    /// Trims the location along the path between the first two points.
    pub positive: Offset,
    /// Trims the location along the path between the last two points.
    pub negative: Offset,
}

/// Orientation of a point location with respect to the direction of its line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, FromRepr)]
#[repr(u8)]
pub enum Orientation {
    /// No orientation or unknown.
    #[default]
    Unknown = 0,
    /// In the direction from the first point to the second point.
    FirstToSecond = 1,
    /// In the direction from the second point to the first point.
    SecondToFirst = 2,
    /// In both directions.
    Both = 3,
}

impl Orientation {
    pub(crate) fn from_bits(bits: u8) -> Option<Self> {
        Self::from_repr(bits)
    }
}

/// Side of the road of a point location with respect to the direction of its line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, FromRepr)]
#[repr(u8)]
pub enum SideOfRoad {
    /// On the road or unknown.
    #[default]
    OnRoadOrUnknown = 0,
    /// Right side of the road.
    Right = 1,
    /// Left side of the road.
    Left = 2,
    /// Both sides of the road.
    Both = 3,
}

impl SideOfRoad {
    pub(crate) fn from_bits(bits: u8) -> Option<Self> {
        Self::from_repr(bits)
    }
}

/// Line location reference: an ordered sequence of at least two points describing
/// a path on the road network, optionally shortened by offsets.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Line {
    pub points: Vec<LocationReferencePoint>,
    pub offsets: Offsets,
}

/// Closed line location reference: a circuit starting and ending at the first point.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ClosedLine {
    pub points: Vec<LocationReferencePoint>,
    /// Attributes of the line closing the circuit back into the first point.
    pub closing_line: LineAttributes,
}

/// Point location bound to a line, placed at an offset along it.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PointAlongLine {
    pub points: [LocationReferencePoint; 2],
    pub orientation: Orientation,
    pub side_of_road: SideOfRoad,
    pub offset: Offset,
}

/// Point Of Interest with an access point on the road network.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Poi {
    pub point: PointAlongLine,
    /// The point of interest itself, away from the road network.
    pub poi: Coordinate,
}

/// Circular area location reference.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Coordinate,
    pub radius: Length,
}

/// Rectangular area location reference.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub lower_left: Coordinate,
    pub upper_right: Coordinate,
}

/// Number of columns and rows of a grid location reference.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    pub columns: u16,
    pub rows: u16,
}

/// Grid area location reference: a base rectangle multiplied into columns and rows.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Grid {
    pub rectangle: Rectangle,
    pub size: GridSize,
}

/// Polygonal area location reference delimited by at least three corners.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Polygon {
    pub corners: Vec<Coordinate>,
}

/// A parsed location reference, before any map resolution has happened.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationReference {
    Line(Line),
    GeoCoordinate(Coordinate),
    PointAlongLine(PointAlongLine),
    Poi(Poi),
    Circle(Circle),
    Rectangle(Rectangle),
    Grid(Grid),
    Polygon(Polygon),
    ClosedLine(ClosedLine),
}
