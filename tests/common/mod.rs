use geo::{Bearing as _, Distance, Haversine, Point};
use roadref::{Bearing, Coordinate, Fow, Frc, Length, MapDatabase};

/// In-memory road network with straight edges and haversine geometry.
pub struct TestMap {
    nodes: Vec<Coordinate>,
    edges: Vec<TestEdge>,
    restricted_turns: Vec<(usize, usize)>,
}

struct TestEdge {
    start: usize,
    end: usize,
    frc: Frc,
    fow: Fow,
    length: f64,
}

impl TestMap {
    /// Builds a network from `(lon, lat)` nodes and `(start, end, frc, fow)`
    /// edges; edge lengths come from the haversine distance of the endpoints.
    pub fn new(nodes: Vec<(f64, f64)>, edges: Vec<(usize, usize, Frc, Fow)>) -> Self {
        let nodes: Vec<Coordinate> = nodes
            .into_iter()
            .map(|(lon, lat)| Coordinate { lon, lat })
            .collect();

        let edges = edges
            .into_iter()
            .map(|(start, end, frc, fow)| TestEdge {
                start,
                end,
                frc,
                fow,
                length: Haversine.distance(point(nodes[start]), point(nodes[end])),
            })
            .collect();

        Self {
            nodes,
            edges,
            restricted_turns: vec![],
        }
    }

    pub fn with_restricted_turn(mut self, from: usize, to: usize) -> Self {
        self.restricted_turns.push((from, to));
        self
    }
}

fn point(coordinate: Coordinate) -> Point {
    Point::new(coordinate.lon, coordinate.lat)
}

fn normalize_degrees(degrees: f64) -> u16 {
    (((degrees % 360.0) + 360.0) % 360.0).round() as u16 % 360
}

impl MapDatabase for TestMap {
    type VertexId = usize;
    type EdgeId = usize;

    fn vertex_coordinate(&self, vertex: usize) -> Coordinate {
        self.nodes[vertex]
    }

    fn edge_start_vertex(&self, edge: usize) -> usize {
        self.edges[edge].start
    }

    fn edge_end_vertex(&self, edge: usize) -> usize {
        self.edges[edge].end
    }

    fn edge_length(&self, edge: usize) -> Length {
        Length::from_meters(self.edges[edge].length)
    }

    fn edge_frc(&self, edge: usize) -> Frc {
        self.edges[edge].frc
    }

    fn edge_fow(&self, edge: usize) -> Fow {
        self.edges[edge].fow
    }

    fn edge_bearing(&self, edge: usize, _from: Length, segment_length: Length) -> Bearing {
        let edge = &self.edges[edge];
        let (from, to) = if segment_length.meters() >= 0.0 {
            (edge.start, edge.end)
        } else {
            (edge.end, edge.start)
        };

        let degrees = Haversine.bearing(point(self.nodes[from]), point(self.nodes[to]));
        Bearing::from_degrees(normalize_degrees(degrees))
    }

    fn exiting_edges(&self, vertex: usize) -> impl Iterator<Item = (usize, usize)> {
        self.edges
            .iter()
            .enumerate()
            .filter(move |(_, edge)| edge.start == vertex)
            .map(|(id, edge)| (id, edge.end))
    }

    fn entering_edges(&self, vertex: usize) -> impl Iterator<Item = (usize, usize)> {
        self.edges
            .iter()
            .enumerate()
            .filter(move |(_, edge)| edge.end == vertex)
            .map(|(id, edge)| (id, edge.start))
    }

    fn vertices_near(
        &self,
        coordinate: Coordinate,
        radius: Length,
    ) -> impl Iterator<Item = (usize, Length)> {
        let mut vertices: Vec<(usize, Length)> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(id, &node)| {
                let distance = Haversine.distance(point(coordinate), point(node));
                (id, Length::from_meters(distance))
            })
            .filter(|&(_, distance)| distance <= radius)
            .collect();

        vertices.sort_by_key(|&(id, distance)| (distance, id));
        vertices.into_iter()
    }

    fn is_turn_restricted(&self, from: usize, to: usize) -> bool {
        self.restricted_turns.contains(&(from, to))
    }
}

/// A map that must never be consulted; every lookup panics.
pub struct UnusedMap;

impl MapDatabase for UnusedMap {
    type VertexId = usize;
    type EdgeId = usize;

    fn vertex_coordinate(&self, _vertex: usize) -> Coordinate {
        panic!("the map must not be consulted");
    }

    fn edge_start_vertex(&self, _edge: usize) -> usize {
        panic!("the map must not be consulted");
    }

    fn edge_end_vertex(&self, _edge: usize) -> usize {
        panic!("the map must not be consulted");
    }

    fn edge_length(&self, _edge: usize) -> Length {
        panic!("the map must not be consulted");
    }

    fn edge_frc(&self, _edge: usize) -> Frc {
        panic!("the map must not be consulted");
    }

    fn edge_fow(&self, _edge: usize) -> Fow {
        panic!("the map must not be consulted");
    }

    fn edge_bearing(&self, _edge: usize, _from: Length, _segment: Length) -> Bearing {
        panic!("the map must not be consulted");
    }

    fn exiting_edges(&self, _vertex: usize) -> impl Iterator<Item = (usize, usize)> {
        panic!("the map must not be consulted");
        #[allow(unreachable_code)]
        std::iter::empty()
    }

    fn entering_edges(&self, _vertex: usize) -> impl Iterator<Item = (usize, usize)> {
        panic!("the map must not be consulted");
        #[allow(unreachable_code)]
        std::iter::empty()
    }

    fn vertices_near(
        &self,
        _coordinate: Coordinate,
        _radius: Length,
    ) -> impl Iterator<Item = (usize, Length)> {
        panic!("the map must not be consulted");
        #[allow(unreachable_code)]
        std::iter::empty()
    }
}

/// One point of a binary line reference under construction.
#[derive(Debug, Clone, Copy)]
pub struct PointSpec {
    pub lon: f64,
    pub lat: f64,
    pub frc: Frc,
    pub fow: Fow,
    pub bearing_sector: u8,
    /// Ignored for the last point of the reference.
    pub lfrcnp: Frc,
    /// Ignored for the last point of the reference.
    pub dnp_interval: u8,
}

/// Builds a binary line reference blob out of point specifications, the
/// inverse of the arithmetic the parser applies.
pub fn line_blob(points: &[PointSpec], pos_offset: Option<u8>, neg_offset: Option<u8>) -> Vec<u8> {
    assert!(points.len() >= 2);
    let mut blob = vec![0b0000_1011]; // line location, physical format version 3

    for (index, point) in points.iter().enumerate() {
        let is_last = index + 1 == points.len();

        if index == 0 {
            blob.extend_from_slice(&fixed_point_degrees(point.lon));
            blob.extend_from_slice(&fixed_point_degrees(point.lat));
        } else {
            let previous = points[index - 1];
            blob.extend_from_slice(&relative_degrees(previous.lon, point.lon));
            blob.extend_from_slice(&relative_degrees(previous.lat, point.lat));
        }

        blob.push((point.frc as u8) << 3 | point.fow as u8);

        let top_bits = if is_last {
            u8::from(pos_offset.is_some()) << 1 | u8::from(neg_offset.is_some())
        } else {
            point.lfrcnp as u8
        };
        blob.push(top_bits << 5 | point.bearing_sector);

        if !is_last {
            blob.push(point.dnp_interval);
        }
    }

    blob.extend(pos_offset);
    blob.extend(neg_offset);
    blob
}

fn fixed_point_degrees(degrees: f64) -> [u8; 3] {
    let scaled = degrees * f64::from(1u32 << 24) / 360.0;
    let value = (scaled + 0.5 * scaled.signum()).round() as i32;
    let bytes = value.to_be_bytes();
    [bytes[1], bytes[2], bytes[3]]
}

fn relative_degrees(previous: f64, degrees: f64) -> [u8; 2] {
    let value = ((degrees - previous) * 100_000.0).round() as i16;
    value.to_be_bytes()
}
