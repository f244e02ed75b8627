//! Tag-based POI categorization

use crate::poi::{PoiCategory, Tags};

/// Assign a tag bag to the first category whose matchers it satisfies
///
/// Categories are tried in declaration order, so a bag that is both a
/// restaurant and a bar is reported as a restaurant.
pub fn categorize(tags: &Tags) -> Option<PoiCategory> {
    PoiCategory::ALL
        .into_iter()
        .find(|category| category.matchers().iter().any(|m| m.matches(tags)))
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
    fn test_multi_valued_tag_matches() {
        assert_eq!(categorize(&tags(&[("amenity", "bar;pub")])), Some(PoiCategory::Bars));
        assert_eq!(categorize(&tags(&[("amenity", "cafe;pub")])), Some(PoiCategory::Bars));
    }

    #[test]
    fn test_no_matching_key() {
        assert_eq!(categorize(&tags(&[("shop", "bakery")])), None);
        assert_eq!(categorize(&Tags::new()), None);
    }

    #[test]
    fn test_matching_key_wrong_value() {
        assert_eq!(categorize(&tags(&[("amenity", "cafe")])), None);
    }

    #[test]
    fn test_each_category() {
        assert_eq!(
            categorize(&tags(&[("amenity", "restaurant")])),
            Some(PoiCategory::Restaurants)
        );
        assert_eq!(
            categorize(&tags(&[("tourism", "museum")])),
            Some(PoiCategory::Attractions)
        );
        assert_eq!(
            categorize(&tags(&[("historic", "monument")])),
            Some(PoiCategory::Attractions)
        );
        assert_eq!(
            categorize(&tags(&[("amenity", "drinking_water")])),
            Some(PoiCategory::Utilities)
        );
    }

    #[test]
    fn test_declaration_order_wins() {
        // Satisfies both restaurants and bars
        let both = tags(&[("amenity", "bar;restaurant")]);
        assert_eq!(categorize(&both), Some(PoiCategory::Restaurants));

        // Satisfies bars and attractions
        let pub_museum = tags(&[("amenity", "pub"), ("tourism", "museum")]);
        assert_eq!(categorize(&pub_museum), Some(PoiCategory::Bars));
    }
}
