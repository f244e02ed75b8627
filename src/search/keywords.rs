//! Keyword to OSM tag mapping for search queries
//!
//! A query only reaches the tag backend when one of its words names a kind of
//! place listed here.

use crate::poi::TagMatcher;

/// Keywords in priority order; the first keyword present in the query wins
const KEYWORDS: &[(&str, TagMatcher)] = &[
    ("coffee", TagMatcher::eq("amenity", "cafe")),
    ("cafe", TagMatcher::eq("amenity", "cafe")),
    ("restaurant", TagMatcher::eq("amenity", "restaurant")),
    ("food", TagMatcher::eq("amenity", "restaurant")),
    ("bar", TagMatcher::eq("amenity", "bar")),
    ("pub", TagMatcher::eq("amenity", "pub")),
    ("restroom", TagMatcher::eq("amenity", "toilets")),
    ("bathroom", TagMatcher::eq("amenity", "toilets")),
    ("toilet", TagMatcher::eq("amenity", "toilets")),
    ("water", TagMatcher::eq("amenity", "drinking_water")),
    ("fountain", TagMatcher::eq("amenity", "drinking_water")),
    ("museum", TagMatcher::eq("tourism", "museum")),
    ("park", TagMatcher::eq("leisure", "park")),
    ("pharmacy", TagMatcher::eq("amenity", "pharmacy")),
    ("parking", TagMatcher::eq("amenity", "parking")),
    ("gas", TagMatcher::eq("amenity", "fuel")),
    ("fuel", TagMatcher::eq("amenity", "fuel")),
];

/// Lowercase words of a query, with a plural `s` dropped
fn words(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| {
            if w.len() > 3 && w.ends_with('s') && !w.ends_with("ss") {
                w[..w.len() - 1].to_string()
            } else {
                w.to_string()
            }
        })
        .collect()
}

/// Tag matcher for the first known keyword in `query`, if any
pub fn keyword_matcher(query: &str) -> Option<TagMatcher> {
    let words = words(query);
    KEYWORDS
        .iter()
        .find(|(keyword, _)| words.iter().any(|w| w == keyword))
        .map(|(_, matcher)| *matcher)
}

/// All keywords the tag backend understands
pub fn known_keywords() -> Vec<&'static str> {
    KEYWORDS.iter().map(|(keyword, _)| *keyword).collect()
}
