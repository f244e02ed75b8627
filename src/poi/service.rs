//! Zone-scoped POI lookup
//!
//! Ties the query builder, the Overpass source, the categorizer and the cache
//! together. Upstream failures are logged and answered with empty category
//! lists; only bad caller input is returned as an error.

use crate::error::Result;
use crate::geo::{distance_km, round2, Coordinates, Located};
use crate::poi::cache::PoiCache;
use crate::poi::categorize::categorize;
use crate::poi::overpass::{OverpassElement, PoiSource};
use crate::poi::query::polygon_query;
use crate::poi::{Poi, PoiCategory, PoisByCategory};
use crate::zone::ZonePolygon;
use std::sync::Arc;
use tracing::{info, warn};

/// POI lookup service
pub struct PoiService<S: PoiSource> {
    source: S,
    cache: Arc<PoiCache>,
    query_timeout_secs: u64,
}

impl<S: PoiSource> PoiService<S> {
    /// Create a service over `source`, sharing `cache` with other owners
    pub fn new(source: S, cache: Arc<PoiCache>, query_timeout_secs: u64) -> Self {
        Self {
            source,
            cache,
            query_timeout_secs,
        }
    }

    /// The cache this service reads and fills
    pub fn cache(&self) -> &Arc<PoiCache> {
        &self.cache
    }

    /// POIs inside `zone`, grouped by category
    ///
    /// `None` for `categories` means every category. The result always has one
    /// (possibly empty) list per requested category. When `user` is given each
    /// POI carries its distance in km and every list is sorted nearest first.
    pub async fn get_pois(
        &self,
        zone: &ZonePolygon,
        categories: Option<&[PoiCategory]>,
        user: Option<Coordinates>,
    ) -> Result<PoisByCategory> {
        if let Some(user) = user {
            user.validate()?;
        }

        let mut requested: Vec<PoiCategory> = match categories {
            Some(list) => list.to_vec(),
            None => PoiCategory::ALL.to_vec(),
        };
        requested.sort_unstable();
        requested.dedup();

        let mut pois = match self.cache.get(&zone.name, &requested) {
            Some(cached) => {
                info!(zone = %zone.name, "Using cached POIs");
                cached
            }
            None => self.fetch(zone, &requested).await,
        };

        if let Some(user) = user {
            annotate_distances(&mut pois, user);
        }

        Ok(pois)
    }

    /// Query upstream and cache a non-empty answer
    async fn fetch(&self, zone: &ZonePolygon, categories: &[PoiCategory]) -> PoisByCategory {
        let Some(query) = polygon_query(&zone.rings, categories, self.query_timeout_secs) else {
            return empty_payload(categories);
        };

        let elements = match self.source.fetch(&query).await {
            Ok(elements) => elements,
            Err(e) => {
                warn!(zone = %zone.name, error = %e, "POI lookup failed");
                return empty_payload(categories);
            }
        };

        let pois = group_elements(&elements, zone, categories);
        let total: usize = pois.values().map(Vec::len).sum();
        info!(zone = %zone.name, elements = elements.len(), pois = total, "Fetched POIs");

        self.cache.put(&zone.name, categories, pois.clone());
        pois
    }
}

/// One empty list per category
fn empty_payload(categories: &[PoiCategory]) -> PoisByCategory {
    categories.iter().map(|c| (*c, Vec::new())).collect()
}

/// Categorize elements and keep those inside the zone
///
/// Elements without coordinates, without a requested category, or outside
/// the zone's outer ring are dropped. Upstream order is kept.
///
/// Membership uses the same half-open rule as zone lookup: a point exactly
/// on a north or east edge is kept, one exactly on a south or west edge is
/// dropped, so a boundary point belongs to one zone only.
pub fn group_elements(
    elements: &[OverpassElement],
    zone: &ZonePolygon,
    categories: &[PoiCategory],
) -> PoisByCategory {
    let mut grouped = empty_payload(categories);

    for element in elements {
        let Some(category) = categorize(&element.tags) else {
            continue;
        };
        let Some(list) = grouped.get_mut(&category) else {
            continue;
        };
        let Some(poi) = Poi::from_element(element, category) else {
            continue;
        };
        if zone.contains(poi.coordinates()) {
            list.push(poi);
        }
    }

    grouped
}

/// Set each POI's distance from `user` and sort every list nearest first
pub fn annotate_distances(pois: &mut PoisByCategory, user: Coordinates) {
    for list in pois.values_mut() {
        for poi in list.iter_mut() {
            poi.distance = Some(round2(distance_km(user, poi.coordinates())));
        }
        list.sort_by(|a, b| {
            let a = a.distance.unwrap_or(f64::INFINITY);
            let b = b.distance.unwrap_or(f64::INFINITY);
            a.total_cmp(&b)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::poi::overpass::parse_elements;
    use crate::zone::ZoneRegistry;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory POI source that records the queries it receives
    struct FakeSource {
        body: Option<String>,
        calls: AtomicUsize,
        queries: Mutex<Vec<String>>,
    }

    impl FakeSource {
        fn returning(body: &str) -> Self {
            Self {
                body: Some(body.to_string()),
                calls: AtomicUsize::new(0),
                queries: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                body: None,
                calls: AtomicUsize::new(0),
                queries: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl PoiSource for FakeSource {
        async fn fetch(&self, query: &str) -> Result<Vec<OverpassElement>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(query.to_string());
            match &self.body {
                Some(body) => parse_elements(body),
                None => Err(Error::Upstream("connection refused".to_string())),
            }
        }
    }

    const HOLLYWOOD_BODY: &str = r#"{"elements": [
        {"type": "node", "id": 1, "lat": 34.1016, "lon": -118.3267,
         "tags": {"name": "Musso & Frank Grill", "amenity": "restaurant"}},
        {"type": "node", "id": 2, "lat": 34.0838, "lon": -118.3446,
         "tags": {"name": "Pink's Hot Dogs", "amenity": "restaurant"}},
        {"type": "node", "id": 3, "lat": 34.0522, "lon": -118.2437,
         "tags": {"name": "Downtown Diner", "amenity": "restaurant"}},
        {"type": "way", "id": 4, "center": {"lat": 34.0980, "lon": -118.3300},
         "tags": {"name": "The Frolic Room", "amenity": "bar;pub"}},
        {"type": "node", "id": 5, "lat": 34.0990, "lon": -118.3400,
         "tags": {"name": "Book Nook", "shop": "books"}}
    ]}"#;

    fn hollywood() -> ZonePolygon {
        ZoneRegistry::los_angeles().by_name("Hollywood").unwrap().clone()
    }

    fn service(source: FakeSource) -> PoiService<FakeSource> {
        PoiService::new(source, Arc::new(PoiCache::new()), 25)
    }

    #[tokio::test]
    async fn test_only_pois_inside_zone_are_returned() {
        let svc = service(FakeSource::returning(HOLLYWOOD_BODY));
        let user = Coordinates::new(34.0928, -118.3287);

        let pois = svc
            .get_pois(&hollywood(), Some(&[PoiCategory::Restaurants]), Some(user))
            .await
            .unwrap();

        assert_eq!(pois.len(), 1);
        let restaurants = &pois[&PoiCategory::Restaurants];
        assert_eq!(restaurants.len(), 2);
        assert!(restaurants.iter().all(|p| p.name != "Downtown Diner"));
        assert!(restaurants.iter().all(|p| p.distance.unwrap() >= 0.0));
        assert!(restaurants[0].distance <= restaurants[1].distance);
    }

    #[tokio::test]
    async fn test_query_is_built_for_requested_categories() {
        let svc = service(FakeSource::returning(HOLLYWOOD_BODY));
        svc.get_pois(&hollywood(), Some(&[PoiCategory::Bars]), None)
            .await
            .unwrap();

        let queries = svc.source.queries.lock().unwrap();
        assert_eq!(queries.len(), 1);
        assert!(queries[0].contains("[\"amenity\"=\"pub\"]"));
        assert!(!queries[0].contains("restaurant"));
        assert!(queries[0].contains("[timeout:25]"));
    }

    #[tokio::test]
    async fn test_all_categories_by_default() {
        let svc = service(FakeSource::returning(HOLLYWOOD_BODY));
        let pois = svc.get_pois(&hollywood(), None, None).await.unwrap();

        assert_eq!(pois.len(), 4);
        assert_eq!(pois[&PoiCategory::Restaurants].len(), 2);
        assert_eq!(pois[&PoiCategory::Bars].len(), 1);
        assert_eq!(pois[&PoiCategory::Bars][0].name, "The Frolic Room");
        assert!(pois[&PoiCategory::Attractions].is_empty());
        assert!(pois[&PoiCategory::Restaurants][0].distance.is_none());
    }

    #[tokio::test]
    async fn test_second_request_is_served_from_cache() {
        let svc = service(FakeSource::returning(HOLLYWOOD_BODY));
        let zone = hollywood();

        let first = svc
            .get_pois(&zone, Some(&[PoiCategory::Restaurants, PoiCategory::Bars]), None)
            .await
            .unwrap();
        let second = svc
            .get_pois(&zone, Some(&[PoiCategory::Bars, PoiCategory::Restaurants]), None)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(svc.source.calls(), 1);
        assert_eq!(svc.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_cached_payload_has_no_caller_distances() {
        let svc = service(FakeSource::returning(HOLLYWOOD_BODY));
        let zone = hollywood();
        let cats = [PoiCategory::Restaurants];

        svc.get_pois(&zone, Some(&cats), Some(Coordinates::new(34.10, -118.33)))
            .await
            .unwrap();
        let cached = svc.cache().get(&zone.name, &cats).unwrap();
        assert!(cached[&PoiCategory::Restaurants].iter().all(|p| p.distance.is_none()));

        let far = svc
            .get_pois(&zone, Some(&cats), Some(Coordinates::new(40.7128, -74.0060)))
            .await
            .unwrap();
        assert!(far[&PoiCategory::Restaurants][0].distance.unwrap() > 3000.0);
    }

    #[tokio::test]
    async fn test_empty_answer_is_not_cached() {
        let svc = service(FakeSource::returning(r#"{"elements": []}"#));
        let zone = hollywood();

        let pois = svc.get_pois(&zone, None, None).await.unwrap();
        assert!(pois.values().all(Vec::is_empty));
        svc.get_pois(&zone, None, None).await.unwrap();

        assert_eq!(svc.source.calls(), 2);
        assert!(svc.cache().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_failure_yields_empty_lists() {
        let svc = service(FakeSource::failing());
        let pois = svc
            .get_pois(&hollywood(), Some(&[PoiCategory::Utilities]), None)
            .await
            .unwrap();

        assert_eq!(pois.len(), 1);
        assert!(pois[&PoiCategory::Utilities].is_empty());
        assert!(svc.cache().is_empty());
    }

    #[tokio::test]
    async fn test_empty_category_list_skips_upstream() {
        let svc = service(FakeSource::returning(HOLLYWOOD_BODY));
        let pois = svc.get_pois(&hollywood(), Some(&[]), None).await.unwrap();

        assert!(pois.is_empty());
        assert_eq!(svc.source.calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_user_location_is_rejected() {
        let svc = service(FakeSource::returning(HOLLYWOOD_BODY));
        let err = svc
            .get_pois(&hollywood(), None, Some(Coordinates::new(120.0, 0.0)))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidCoordinates(_)));
        assert_eq!(svc.source.calls(), 0);
    }

    #[test]
    fn test_group_elements_edge_points_follow_zone_lookup() {
        // Hollywood spans 34.08..34.11 lat, -118.36..-118.32 lon
        let elements = parse_elements(
            r#"{"elements": [
                {"type": "node", "id": 1, "lat": 34.11, "lon": -118.34,
                 "tags": {"name": "North edge", "amenity": "restaurant"}},
                {"type": "node", "id": 2, "lat": 34.09, "lon": -118.32,
                 "tags": {"name": "East edge", "amenity": "restaurant"}},
                {"type": "node", "id": 3, "lat": 34.08, "lon": -118.34,
                 "tags": {"name": "South edge", "amenity": "restaurant"}},
                {"type": "node", "id": 4, "lat": 34.09, "lon": -118.36,
                 "tags": {"name": "West edge", "amenity": "restaurant"}}
            ]}"#,
        )
        .unwrap();
        let zone = hollywood();
        let grouped = group_elements(&elements, &zone, &[PoiCategory::Restaurants]);

        let kept: Vec<&str> = grouped[&PoiCategory::Restaurants]
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(kept, vec!["North edge", "East edge"]);

        let registry = ZoneRegistry::los_angeles();
        for poi in &grouped[&PoiCategory::Restaurants] {
            assert_eq!(
                registry.containing(poi.coordinates()).map(|z| z.name.as_str()),
                Some("Hollywood")
            );
        }
    }

    #[test]
    fn test_group_elements_skips_positionless() {
        let elements = parse_elements(
            r#"{"elements": [{"type": "way", "id": 9, "tags": {"amenity": "restaurant"}}]}"#,
        )
        .unwrap();
        let grouped = group_elements(&elements, &hollywood(), &[PoiCategory::Restaurants]);
        assert!(grouped[&PoiCategory::Restaurants].is_empty());
    }
}
