//! Points of interest
//!
//! This module handles:
//! - The fixed POI category table and its OSM tag matchers
//! - Turning raw Overpass elements into `Poi` records
//! - Zone-scoped lookup with caching (see `service`)

pub mod cache;
pub mod categorize;
pub mod overpass;
pub mod query;
pub mod service;

use crate::error::Error;
use crate::geo::{Coordinates, Located};
use overpass::OverpassElement;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw OSM tag bag
pub type Tags = BTreeMap<String, String>;

/// POIs grouped by category
pub type PoisByCategory = BTreeMap<PoiCategory, Vec<Poi>>;

/// A single OSM tag condition, e.g. `amenity=pub` or a bare `shop`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagMatcher {
    pub key: &'static str,
    pub value: Option<&'static str>,
}

impl TagMatcher {
    /// Match `key=value`, where the tag value may list alternatives with `;`
    pub const fn eq(key: &'static str, value: &'static str) -> Self {
        Self {
            key,
            value: Some(value),
        }
    }

    /// Match any element carrying `key`, whatever its value
    pub const fn has(key: &'static str) -> Self {
        Self { key, value: None }
    }

    /// Check a tag bag against this matcher
    pub fn matches(&self, tags: &Tags) -> bool {
        match (tags.get(self.key), self.value) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => actual.split(';').any(|v| v.trim() == expected),
        }
    }
}

impl std::fmt::Display for TagMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.value {
            Some(value) => write!(f, "{}={}", self.key, value),
            None => write!(f, "{}", self.key),
        }
    }
}

/// POI categories, in priority order
///
/// When a tag bag satisfies several categories the earliest variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoiCategory {
    Restaurants,
    Bars,
    Attractions,
    Utilities,
}

const RESTAURANT_TAGS: &[TagMatcher] = &[TagMatcher::eq("amenity", "restaurant")];

const BAR_TAGS: &[TagMatcher] = &[TagMatcher::eq("amenity", "bar"), TagMatcher::eq("amenity", "pub")];

const ATTRACTION_TAGS: &[TagMatcher] = &[
    TagMatcher::eq("tourism", "attraction"),
    TagMatcher::eq("tourism", "museum"),
    TagMatcher::eq("tourism", "gallery"),
    TagMatcher::eq("historic", "monument"),
];

const UTILITY_TAGS: &[TagMatcher] = &[
    TagMatcher::eq("amenity", "toilets"),
    TagMatcher::eq("amenity", "drinking_water"),
];

impl PoiCategory {
    /// Every category, in declaration (priority) order
    pub const ALL: [PoiCategory; 4] = [
        PoiCategory::Restaurants,
        PoiCategory::Bars,
        PoiCategory::Attractions,
        PoiCategory::Utilities,
    ];

    /// Key used in the API and in cache keys
    pub fn key(&self) -> &'static str {
        match self {
            Self::Restaurants => "restaurants",
            Self::Bars => "bars",
            Self::Attractions => "attractions",
            Self::Utilities => "utilities",
        }
    }

    /// OSM tag conditions that place an element in this category
    pub fn matchers(&self) -> &'static [TagMatcher] {
        match self {
            Self::Restaurants => RESTAURANT_TAGS,
            Self::Bars => BAR_TAGS,
            Self::Attractions => ATTRACTION_TAGS,
            Self::Utilities => UTILITY_TAGS,
        }
    }

    /// Marker color for map display
    pub fn color(&self) -> &'static str {
        match self {
            Self::Restaurants => "#FF6B6B",
            Self::Bars => "#4ECDC4",
            Self::Attractions => "#45B7D1",
            Self::Utilities => "#96CEB4",
        }
    }

    /// Icon hint for map display
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Restaurants => "restaurant",
            Self::Bars => "bar",
            Self::Attractions => "attraction",
            Self::Utilities => "utility",
        }
    }

    /// Parse a comma-separated category list, rejecting unknown names
    pub fn parse_list(list: &str) -> crate::error::Result<Vec<PoiCategory>> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl std::fmt::Display for PoiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for PoiCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.key() == lowered)
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

/// Category metadata for API listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub key: String,
    pub tags: Vec<String>,
    pub color: String,
    pub icon: String,
}

impl From<PoiCategory> for CategoryInfo {
    fn from(category: PoiCategory) -> Self {
        Self {
            key: category.key().to_string(),
            tags: category.matchers().iter().map(|m| m.to_string()).collect(),
            color: category.color().to_string(),
            icon: category.icon().to_string(),
        }
    }
}

/// List all categories with their display metadata
pub fn available_categories() -> Vec<CategoryInfo> {
    PoiCategory::ALL.into_iter().map(CategoryInfo::from).collect()
}

/// A point of interest inside a zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub category: PoiCategory,

    /// First of the amenity/tourism/historic tag values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amenity_type: Option<String>,

    pub description: String,
    pub address: String,

    /// Distance from the caller in km, when a location was supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
}

impl Located for Poi {
    fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }
}

/// Human-readable fields pulled from a tag bag
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceDetails {
    pub name: String,
    pub amenity_type: Option<String>,
    pub description: String,
    pub address: String,
}

impl PlaceDetails {
    /// Derive name, description and address from OSM tags
    pub fn from_tags(tags: &Tags) -> Self {
        let name = ["name", "brand", "operator"]
            .iter()
            .find_map(|k| tags.get(*k).filter(|v| !v.is_empty()).cloned())
            .unwrap_or_else(|| {
                let kind = ["amenity", "tourism", "shop"]
                    .iter()
                    .find_map(|k| tags.get(*k))
                    .map(String::as_str)
                    .unwrap_or("POI");
                format!("Unnamed ({})", kind)
            });

        let amenity_type = ["amenity", "tourism", "historic"]
            .iter()
            .find_map(|k| tags.get(*k).cloned());

        let description = [("amenity", "Amenity"), ("tourism", "Tourism"), ("historic", "Historic")]
            .iter()
            .filter_map(|(k, label)| tags.get(*k).map(|v| format!("{}: {}", label, v)))
            .collect::<Vec<_>>()
            .join(" | ");

        let address = ["addr:street", "addr:city", "addr:state"]
            .iter()
            .filter_map(|k| tags.get(*k).map(String::as_str))
            .filter(|v| !v.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            name,
            amenity_type,
            description: if description.is_empty() {
                "POI".to_string()
            } else {
                description
            },
            address,
        }
    }
}

impl Poi {
    /// Build a POI from an Overpass element
    ///
    /// Returns `None` when the element has no usable position.
    pub fn from_element(element: &OverpassElement, category: PoiCategory) -> Option<Self> {
        let position = element.position()?;
        let details = PlaceDetails::from_tags(&element.tags);

        Some(Self {
            name: details.name,
            lat: position.lat,
            lon: position.lon,
            category,
            amenity_type: details.amenity_type,
            description: details.description,
            address: details.address,
            distance: None,
            tags: Some(element.tags.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_matcher_multi_valued() {
        let pub_matcher = TagMatcher::eq("amenity", "pub");
        assert!(pub_matcher.matches(&tags(&[("amenity", "bar;pub")])));
        assert!(pub_matcher.matches(&tags(&[("amenity", "pub")])));
        assert!(!pub_matcher.matches(&tags(&[("amenity", "public_bookcase")])));
        assert!(!pub_matcher.matches(&tags(&[("shop", "pub")])));
    }

    #[test]
    fn test_matcher_key_only() {
        let shop = TagMatcher::has("shop");
        assert!(shop.matches(&tags(&[("shop", "bakery")])));
        assert!(!shop.matches(&tags(&[("amenity", "cafe")])));
        assert_eq!(shop.to_string(), "shop");
        assert_eq!(TagMatcher::eq("amenity", "bar").to_string(), "amenity=bar");
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("restaurants".parse::<PoiCategory>().unwrap(), PoiCategory::Restaurants);
        assert_eq!(" Bars ".parse::<PoiCategory>().unwrap(), PoiCategory::Bars);

        let err = "spas".parse::<PoiCategory>().unwrap_err();
        assert!(err.to_string().contains("spas"));
    }

    #[test]
    fn test_parse_list() {
        let list = PoiCategory::parse_list("bars, restaurants,,").unwrap();
        assert_eq!(list, vec![PoiCategory::Bars, PoiCategory::Restaurants]);
        assert!(PoiCategory::parse_list("bars,nightclubs").is_err());
        assert!(PoiCategory::parse_list("").unwrap().is_empty());
    }

    #[test]
    fn test_category_serializes_as_map_key() {
        let mut map = PoisByCategory::new();
        map.insert(PoiCategory::Utilities, Vec::new());
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"utilities":[]}"#);
    }

    #[test]
    fn test_available_categories() {
        let infos = available_categories();
        assert_eq!(infos.len(), 4);
        assert_eq!(infos[1].key, "bars");
        assert_eq!(infos[1].tags, vec!["amenity=bar", "amenity=pub"]);
    }

    #[test]
    fn test_place_details_named() {
        let details = PlaceDetails::from_tags(&tags(&[
            ("name", "Musso & Frank Grill"),
            ("amenity", "restaurant"),
            ("addr:street", "Hollywood Boulevard"),
            ("addr:city", "Los Angeles"),
        ]));
        assert_eq!(details.name, "Musso & Frank Grill");
        assert_eq!(details.amenity_type.as_deref(), Some("restaurant"));
        assert_eq!(details.description, "Amenity: restaurant");
        assert_eq!(details.address, "Hollywood Boulevard, Los Angeles");
    }

    #[test]
    fn test_place_details_fallbacks() {
        let branded = PlaceDetails::from_tags(&tags(&[("brand", "Starbucks"), ("amenity", "cafe")]));
        assert_eq!(branded.name, "Starbucks");

        let unnamed = PlaceDetails::from_tags(&tags(&[("amenity", "toilets")]));
        assert_eq!(unnamed.name, "Unnamed (toilets)");
        assert_eq!(unnamed.address, "");

        let bare = PlaceDetails::from_tags(&Tags::new());
        assert_eq!(bare.name, "Unnamed (POI)");
        assert_eq!(bare.description, "POI");
        assert!(bare.amenity_type.is_none());
    }

    #[test]
    fn test_place_details_multi_description() {
        let details = PlaceDetails::from_tags(&tags(&[
            ("tourism", "attraction"),
            ("historic", "monument"),
        ]));
        assert_eq!(details.description, "Tourism: attraction | Historic: monument");
        assert_eq!(details.amenity_type.as_deref(), Some("attraction"));
    }
}
