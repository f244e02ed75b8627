//! Overpass QL query construction
//!
//! Two scopes are supported: an arbitrary zone polygon (`poly:`) for zone
//! lookups, and a circle around a point (`around:`) for free-text search.

use crate::geo::polygon::{closed_outer_ring, Ring};
use crate::geo::Coordinates;
use crate::poi::{PoiCategory, TagMatcher};

/// OSM element kinds every sub-query is issued for
static ELEMENT_KINDS: [&str; 3] = ["node", "way", "relation"];

/// Tag filter in Overpass syntax, e.g. `["amenity"="pub"]`
fn tag_filter(matcher: &TagMatcher) -> String {
    match matcher.value {
        Some(value) => format!("[\"{}\"=\"{}\"]", matcher.key, value),
        None => format!("[\"{}\"]", matcher.key),
    }
}

/// Polygon filter value: space-separated `lat lon` pairs of the closed outer ring
pub fn polygon_filter(rings: &[Ring]) -> String {
    closed_outer_ring(rings)
        .iter()
        .map(|p| format!("{} {}", p.lat, p.lon))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Wrap sub-queries in a union with the JSON header and centroid output
fn wrap_union(parts: &[String], timeout_secs: u64) -> String {
    format!(
        "[out:json][timeout:{}];\n(\n{}\n);\nout center meta;",
        timeout_secs,
        parts.join("\n")
    )
}

/// Build one combined query for all tag matchers of `categories` inside a zone
///
/// Returns `None` when there is nothing to ask for: no categories, or a zone
/// without an outer ring.
pub fn polygon_query(rings: &[Ring], categories: &[PoiCategory], timeout_secs: u64) -> Option<String> {
    let polygon = polygon_filter(rings);
    if polygon.is_empty() {
        return None;
    }

    let parts: Vec<String> = categories
        .iter()
        .flat_map(|category| category.matchers())
        .flat_map(|matcher| {
            let filter = tag_filter(matcher);
            let polygon = &polygon;
            ELEMENT_KINDS
                .iter()
                .map(move |kind| format!("{}{}(poly:\"{}\");", kind, filter, polygon))
        })
        .collect();

    if parts.is_empty() {
        return None;
    }

    Some(wrap_union(&parts, timeout_secs))
}

/// Build a query for one tag matcher within `radius_m` meters of `center`
pub fn around_query(matcher: &TagMatcher, center: Coordinates, radius_m: f64, timeout_secs: u64) -> String {
    let filter = tag_filter(matcher);
    let parts: Vec<String> = ELEMENT_KINDS
        .iter()
        .map(|kind| {
            format!(
                "{}{}(around:{:.0},{},{});",
                kind, filter, radius_m, center.lat, center.lon
            )
        })
        .collect();

    wrap_union(&parts, timeout_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<Ring> {
        vec![vec![[-118.36, 34.08], [-118.32, 34.08], [-118.32, 34.11]]]
    }

    #[test]
    fn test_polygon_filter_closes_ring_in_lat_lon_order() {
        let filter = polygon_filter(&triangle());
        assert_eq!(filter, "34.08 -118.36 34.08 -118.32 34.11 -118.32 34.08 -118.36");
    }

    #[test]
    fn test_polygon_filter_keeps_closed_ring() {
        let mut rings = triangle();
        rings[0].push([-118.36, 34.08]);
        assert_eq!(polygon_filter(&rings).split(' ').count(), 8);
    }

    #[test]
    fn test_polygon_query_covers_every_matcher_and_kind() {
        let query = polygon_query(&triangle(), &[PoiCategory::Bars], 25).unwrap();

        assert!(query.starts_with("[out:json][timeout:25];"));
        assert!(query.ends_with("out center meta;"));
        for kind in ELEMENT_KINDS {
            assert!(query.contains(&format!("{}[\"amenity\"=\"bar\"](poly:", kind)));
            assert!(query.contains(&format!("{}[\"amenity\"=\"pub\"](poly:", kind)));
        }
        // 2 matchers x 3 kinds
        assert_eq!(query.matches("(poly:").count(), 6);
    }

    #[test]
    fn test_polygon_query_multiple_categories() {
        let query = polygon_query(
            &triangle(),
            &[PoiCategory::Restaurants, PoiCategory::Attractions],
            25,
        )
        .unwrap();
        // (1 + 4) matchers x 3 kinds
        assert_eq!(query.matches("(poly:").count(), 15);
        assert!(query.contains("[\"historic\"=\"monument\"]"));
    }

    #[test]
    fn test_polygon_query_empty_inputs() {
        assert!(polygon_query(&triangle(), &[], 25).is_none());
        assert!(polygon_query(&[], &[PoiCategory::Bars], 25).is_none());
    }

    #[test]
    fn test_key_only_filter() {
        assert_eq!(tag_filter(&TagMatcher::has("shop")), "[\"shop\"]");
    }

    #[test]
    fn test_around_query() {
        let query = around_query(
            &TagMatcher::eq("amenity", "cafe"),
            Coordinates::new(34.05, -118.25),
            1500.4,
            25,
        );
        assert!(query.contains("node[\"amenity\"=\"cafe\"](around:1500,34.05,-118.25);"));
        assert!(query.contains("relation[\"amenity\"=\"cafe\"](around:1500,34.05,-118.25);"));
    }
}
