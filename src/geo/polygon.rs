//! Point-in-polygon testing
//!
//! Polygons are stored GeoJSON style: a list of rings, each ring a list of
//! `[lon, lat]` pairs. Ring 0 is the outer boundary.

use crate::geo::Coordinates;

/// A ring of `[lon, lat]` vertices. Closing the ring is optional.
pub type Ring = Vec<[f64; 2]>;

/// Test whether a point lies inside a polygon (ray casting)
///
/// Only the outer ring is tested. Inner rings (holes) are carried by the data
/// model but do not exclude points: a point inside a hole still reports `true`.
///
/// The ring is walked cyclically, so an unclosed ring gets its wraparound edge.
/// Boundary convention: points on the top or right edges count as inside,
/// points on the bottom or left edges count as outside.
pub fn point_in_polygon(point: Coordinates, rings: &[Ring]) -> bool {
    match rings.first() {
        Some(outer) => point_in_ring(point, outer),
        None => false,
    }
}

/// Crossing-number test against a single ring
pub fn point_in_ring(point: Coordinates, ring: &[[f64; 2]]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let (x, y) = (point.lon, point.lat);
    let mut inside = false;

    for i in 0..n {
        let [x1, y1] = ring[i];
        let [x2, y2] = ring[(i + 1) % n];

        // The span test is strict on the low end, so y1 != y2 past this point
        if y > y1.min(y2) && y <= y1.max(y2) && x <= x1.max(x2) {
            let crosses = x1 == x2 || x <= (y - y1) * (x2 - x1) / (y2 - y1) + x1;
            if crosses {
                inside = !inside;
            }
        }
    }

    inside
}

/// Outer ring as a closed sequence of `(lat, lon)` points
///
/// The first point is appended again when the input ring was not closed.
pub fn closed_outer_ring(rings: &[Ring]) -> Vec<Coordinates> {
    let Some(outer) = rings.first() else {
        return Vec::new();
    };

    let mut points: Vec<Coordinates> = outer
        .iter()
        .map(|[lon, lat]| Coordinates::new(*lat, *lon))
        .collect();

    if let (Some(first), Some(last)) = (points.first().copied(), points.last()) {
        if first != *last {
            points.push(first);
        }
    }

    points
}

/// Absolute planar area of a ring in square degrees (shoelace formula)
///
/// Only used to compare rings against each other.
pub fn ring_area(ring: &[[f64; 2]]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }

    let twice_area: f64 = (0..n)
        .map(|i| {
            let [x1, y1] = ring[i];
            let [x2, y2] = ring[(i + 1) % n];
            x1 * y2 - x2 * y1
        })
        .sum();

    twice_area.abs() / 2.0
}
