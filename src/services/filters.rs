// src/services/filters.rs
// DOCUMENTATION: Candidate pool filter stages
// PURPOSE: Pure, deterministic predicates applied between places search and the random pick

use crate::services::google_places_client::GooglePlace;
use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;

/// Places typed like this are never suggested
pub const EXCLUDED_TYPES: &[&str] = &["bar", "night_club"];

pub const KOREAN_TYPE: &str = "korean_restaurant";

const FUSION_WORDS: &[&str] = &[
    "fusion",
    "퓨전",
    "pan asian",
    "pan-asian",
    "panasian",
    "asian bistro",
    "pan asian bistro",
];

const BUFFET_WORDS: &[&str] = &[
    "buffet",
    "뷔페",
    "all you can eat",
    "all-you-can-eat",
    "무한리필",
];

pub static FUSION_RE: Lazy<Regex> = Lazy::new(|| words_to_regex(FUSION_WORDS));

pub static BUFFET_RE: Lazy<Regex> = Lazy::new(|| words_to_regex(BUFFET_WORDS));

/// Name/address hints that a place serves Korean food
pub static KOREAN_HINT_RE: Lazy<Regex> =
    Lazy::new(|| case_insensitive("(korean|한식|bbq|삼겹|갈비|비빔밥|순두부)"));

static KOREAN_CUISINE_RE: Lazy<Regex> = Lazy::new(|| case_insensitive("korean"));

static FUSION_CUISINE_RE: Lazy<Regex> = Lazy::new(|| case_insensitive(r"(fusion|pan[-\s]?asian)"));

fn case_insensitive(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("static keyword pattern must compile")
}

/// Compile a keyword list into one case-insensitive alternation.
/// Inside a keyword, a hyphen or space matches any non-empty run of hyphens
/// and whitespace, so "all you can eat" also catches "All-You-Can-Eat".
pub fn words_to_regex(words: &[&str]) -> Regex {
    let alternatives: Vec<String> = words
        .iter()
        .map(|word| {
            word.split(|c: char| c == '-' || c.is_whitespace())
                .filter(|piece| !piece.is_empty())
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"[-\s]+")
        })
        .filter(|alt| !alt.is_empty())
        .collect();

    case_insensitive(&format!("({})", alternatives.join("|")))
}

/// Merge search result lists by place id, keeping the first occurrence
pub fn merge_unique(lists: Vec<Vec<GooglePlace>>) -> Vec<GooglePlace> {
    let mut seen = HashSet::new();
    lists
        .into_iter()
        .flatten()
        .filter(|p| !p.place_id.is_empty() && seen.insert(p.place_id.clone()))
        .collect()
}

/// Keep only places carrying `place_type`
pub fn filter_strict_type(pool: Vec<GooglePlace>, place_type: &str) -> Vec<GooglePlace> {
    pool.into_iter().filter(|p| p.has_type(place_type)).collect()
}

/// Drop bars/night clubs and buffet or fusion places
pub fn apply_exclusions(pool: Vec<GooglePlace>) -> Vec<GooglePlace> {
    pool.into_iter()
        .filter(|p| !EXCLUDED_TYPES.iter().any(|t| p.has_type(t)))
        .filter(|p| {
            let hay = p.haystack();
            !BUFFET_RE.is_match(&hay) && !FUSION_RE.is_match(&hay)
        })
        .collect()
}

/// Places worth a detail lookup, most reviewed first, at most `limit`
pub fn confirmation_candidates(pool: &[GooglePlace], limit: usize) -> Vec<&GooglePlace> {
    let mut candidates: Vec<&GooglePlace> = pool
        .iter()
        .filter(|p| p.has_type(KOREAN_TYPE) || KOREAN_HINT_RE.is_match(&p.haystack()))
        .collect();

    candidates.sort_by(|a, b| {
        b.user_ratings_total
            .unwrap_or(0)
            .cmp(&a.user_ratings_total.unwrap_or(0))
    });
    candidates.truncate(limit);
    candidates
}

/// Decide from a detail payload whether a place really is a Korean restaurant
/// DOCUMENTATION: Cuisine tags win when present (Korean and not fusion);
/// otherwise fall back to name/address hints and the place type.
pub fn confirms_korean(detail: &GooglePlace) -> bool {
    if let Some(cuisines) = detail.serves_cuisine.as_ref().filter(|c| !c.is_empty()) {
        let has_korean = cuisines.iter().any(|c| KOREAN_CUISINE_RE.is_match(c));
        let has_fusion = cuisines.iter().any(|c| FUSION_CUISINE_RE.is_match(c));
        return has_korean && !has_fusion;
    }

    let hay = detail.haystack();
    !FUSION_RE.is_match(&hay) && (KOREAN_HINT_RE.is_match(&hay) || detail.has_type(KOREAN_TYPE))
}

/// Narrow the pool to confirmed places
/// Returns the new pool and whether the type-only fallback was used.
/// When confirmation keeps fewer than min(3, pool) places the pool is
/// instead narrowed to non-fusion places typed korean_restaurant; if even
/// that is empty the pool is returned unchanged.
pub fn apply_confirmation(
    pool: Vec<GooglePlace>,
    confirmed_ids: &HashSet<String>,
) -> (Vec<GooglePlace>, bool) {
    let confirmed: Vec<GooglePlace> = pool
        .iter()
        .filter(|p| confirmed_ids.contains(&p.place_id))
        .cloned()
        .collect();

    let (after, fallback) = if confirmed.len() < pool.len().min(3) {
        let strict: Vec<GooglePlace> = pool
            .iter()
            .filter(|p| !FUSION_RE.is_match(&p.haystack()) && p.has_type(KOREAN_TYPE))
            .cloned()
            .collect();
        (strict, true)
    } else {
        (confirmed, false)
    };

    if after.is_empty() {
        (pool, fallback)
    } else {
        (after, fallback)
    }
}

/// Inclusive rating / review-count thresholds; missing values count as zero
/// Returns the thresholded pool, or the input when thresholding empties it,
/// plus whether the thresholds were relaxed.
pub fn apply_thresholds(
    pool: Vec<GooglePlace>,
    min_rating: f32,
    min_reviews: u32,
) -> (Vec<GooglePlace>, bool) {
    let filtered: Vec<GooglePlace> = pool
        .iter()
        .filter(|p| {
            p.rating.unwrap_or(0.0) >= min_rating && p.user_ratings_total.unwrap_or(0) >= min_reviews
        })
        .cloned()
        .collect();

    if filtered.is_empty() {
        (pool, true)
    } else {
        (filtered, false)
    }
}

/// Uniform random choice
pub fn pick_random<'a, R: Rng + ?Sized>(pool: &'a [GooglePlace], rng: &mut R) -> Option<&'a GooglePlace> {
    pool.choose(rng)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    pub(crate) fn place(id: &str, name: &str, types: &[&str], rating: f32, reviews: u32) -> GooglePlace {
        GooglePlace {
            place_id: id.to_string(),
            name: name.to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
            vicinity: Some("Royal Ln, Dallas".to_string()),
            rating: Some(rating),
            user_ratings_total: Some(reviews),
            ..Default::default()
        }
    }

    fn ids(pool: &[GooglePlace]) -> Vec<&str> {
        pool.iter().map(|p| p.place_id.as_str()).collect()
    }

    #[test]
    fn test_keyword_regexes() {
        assert!(BUFFET_RE.is_match("Gen Korean BBQ All-You-Can-Eat"));
        assert!(BUFFET_RE.is_match("all you  can eat sushi"));
        assert!(BUFFET_RE.is_match("명륜진사갈비 무한리필"));
        assert!(FUSION_RE.is_match("Pan-Asian Kitchen"));
        assert!(FUSION_RE.is_match("PANASIAN express"));
        assert!(FUSION_RE.is_match("Seoul 퓨전 포차"));
        assert!(!FUSION_RE.is_match("Seoul Garden"));
        assert!(!BUFFET_RE.is_match("Buf Fet"));
    }

    #[test]
    fn test_keyword_separators_are_required() {
        assert!(!FUSION_RE.is_match("AsianBistro Cafe"));
        assert!(FUSION_RE.is_match("Asian - Bistro"));
        assert!(!BUFFET_RE.is_match("allyoucaneat.com"));
    }

    #[test]
    fn test_words_are_escaped() {
        let re = words_to_regex(&["a.b", "c+"]);
        assert!(re.is_match("A.B"));
        assert!(!re.is_match("axb"));
        assert!(re.is_match("c+"));
        assert!(!re.is_match("cc"));
    }

    #[test]
    fn test_merge_unique_keeps_first() {
        let a = place("1", "First", &["thai_restaurant"], 4.0, 10);
        let b = place("2", "Second", &["thai_restaurant"], 4.0, 10);
        let dup = place("1", "First again", &["indian_restaurant"], 4.0, 10);
        let no_id = place("", "No id", &["indian_restaurant"], 4.0, 10);

        let merged = merge_unique(vec![vec![a, b], vec![dup, no_id]]);
        assert_eq!(ids(&merged), vec!["1", "2"]);
        assert_eq!(merged[0].name, "First");
    }

    #[test]
    fn test_exclusions() {
        let pool = vec![
            place("ok", "Seoul Garden", &["korean_restaurant"], 4.5, 100),
            place("bar", "Soju Bar", &["korean_restaurant", "bar"], 4.5, 100),
            place("club", "K Club", &["night_club"], 4.5, 100),
            place("buffet", "Korean Buffet", &["korean_restaurant"], 4.5, 100),
            place("fusion", "Seoul Fusion", &["korean_restaurant"], 4.5, 100),
        ];

        assert_eq!(ids(&apply_exclusions(pool)), vec!["ok"]);
    }

    #[test]
    fn test_exclusions_check_address() {
        let mut p = place("mall", "Kim's Kitchen", &["korean_restaurant"], 4.5, 100);
        p.vicinity = None;
        p.formatted_address = Some("Inside Asian Bistro Plaza".to_string());
        assert!(apply_exclusions(vec![p]).is_empty());
    }

    #[test]
    fn test_strict_type() {
        let pool = vec![
            place("1", "A", &["korean_restaurant", "restaurant"], 4.5, 100),
            place("2", "B", &["restaurant"], 4.5, 100),
        ];
        assert_eq!(ids(&filter_strict_type(pool, "korean_restaurant")), vec!["1"]);
    }

    #[test]
    fn test_confirmation_candidates_sorted_and_capped() {
        let pool = vec![
            place("low", "Kimchi House", &["restaurant"], 4.0, 10),
            place("skip", "Taco Shop", &["restaurant"], 4.0, 9999),
            place("high", "Han Il Kwan", &["korean_restaurant"], 4.0, 500),
            place("mid", "Dallas bbq", &["restaurant"], 4.0, 100),
        ];

        let candidates = confirmation_candidates(&pool, 2);
        let got: Vec<&str> = candidates.iter().map(|p| p.place_id.as_str()).collect();
        assert_eq!(got, vec!["high", "mid"]);
    }

    #[test]
    fn test_confirms_korean_with_cuisine_tags() {
        let mut d = place("1", "Anything", &["restaurant"], 0.0, 0);
        d.serves_cuisine = Some(vec!["Korean".into(), "Barbecue".into()]);
        assert!(confirms_korean(&d));

        d.serves_cuisine = Some(vec!["Korean".into(), "Pan Asian".into()]);
        assert!(!confirms_korean(&d));

        d.serves_cuisine = Some(vec!["Japanese".into()]);
        assert!(!confirms_korean(&d));
    }

    #[test]
    fn test_confirms_korean_without_cuisine_tags() {
        let typed = place("1", "Jinny's", &["korean_restaurant"], 0.0, 0);
        assert!(confirms_korean(&typed));

        let hinted = place("2", "순두부 하우스", &["restaurant"], 0.0, 0);
        assert!(confirms_korean(&hinted));

        let fusion = place("3", "Korean Fusion Tacos", &["korean_restaurant"], 0.0, 0);
        assert!(!confirms_korean(&fusion));

        let mut empty_tags = place("4", "Plain Diner", &["restaurant"], 0.0, 0);
        empty_tags.serves_cuisine = Some(vec![]);
        assert!(!confirms_korean(&empty_tags));
    }

    #[test]
    fn test_confirmation_keeps_confirmed_in_pool_order() {
        let pool = vec![
            place("a", "A", &["korean_restaurant"], 4.0, 1),
            place("b", "B", &["korean_restaurant"], 4.0, 1),
            place("c", "C", &["restaurant"], 4.0, 1),
            place("d", "D", &["korean_restaurant"], 4.0, 1),
        ];
        let confirmed: HashSet<String> = ["d", "a", "c"].iter().map(|s| s.to_string()).collect();

        let (after, fallback) = apply_confirmation(pool, &confirmed);
        assert_eq!(ids(&after), vec!["a", "c", "d"]);
        assert!(!fallback);
    }

    #[test]
    fn test_confirmation_falls_back_to_type_only() {
        let pool = vec![
            place("a", "A", &["korean_restaurant"], 4.0, 1),
            place("b", "B Fusion", &["korean_restaurant"], 4.0, 1),
            place("c", "C", &["restaurant"], 4.0, 1),
            place("d", "D", &["korean_restaurant"], 4.0, 1),
        ];
        let confirmed: HashSet<String> = ["c"].iter().map(|s| s.to_string()).collect();

        let (after, fallback) = apply_confirmation(pool, &confirmed);
        assert_eq!(ids(&after), vec!["a", "d"]);
        assert!(fallback);
    }

    #[test]
    fn test_confirmation_keeps_pool_when_everything_fails() {
        let pool = vec![
            place("a", "A", &["restaurant"], 4.0, 1),
            place("b", "B", &["restaurant"], 4.0, 1),
        ];

        let (after, fallback) = apply_confirmation(pool, &HashSet::new());
        assert_eq!(ids(&after), vec!["a", "b"]);
        assert!(fallback);
    }

    #[test]
    fn test_small_pool_needs_fewer_confirmations() {
        let pool = vec![place("a", "A", &["restaurant"], 4.0, 1)];
        let confirmed: HashSet<String> = ["a"].iter().map(|s| s.to_string()).collect();

        let (after, fallback) = apply_confirmation(pool, &confirmed);
        assert_eq!(ids(&after), vec!["a"]);
        assert!(!fallback);
    }

    #[test]
    fn test_thresholds_inclusive() {
        let mut unrated = place("none", "N", &["restaurant"], 0.0, 0);
        unrated.rating = None;
        unrated.user_ratings_total = None;

        let pool = vec![
            place("edge", "E", &["restaurant"], 4.0, 50),
            place("low", "L", &["restaurant"], 3.9, 500),
            place("few", "F", &["restaurant"], 4.8, 49),
            unrated,
        ];

        let (after, relaxed) = apply_thresholds(pool, 4.0, 50);
        assert_eq!(ids(&after), vec!["edge"]);
        assert!(!relaxed);
    }

    #[test]
    fn test_thresholds_relax_when_empty() {
        let pool = vec![place("low", "L", &["restaurant"], 3.0, 5)];
        let (after, relaxed) = apply_thresholds(pool, 4.5, 100);
        assert_eq!(ids(&after), vec!["low"]);
        assert!(relaxed);
    }

    #[test]
    fn test_pick_random() {
        let pool = vec![
            place("a", "A", &["restaurant"], 4.0, 1),
            place("b", "B", &["restaurant"], 4.0, 1),
            place("c", "C", &["restaurant"], 4.0, 1),
        ];
        let mut rng = StdRng::seed_from_u64(7);

        let mut seen = HashSet::new();
        for _ in 0..200 {
            let picked = pick_random(&pool, &mut rng).unwrap();
            seen.insert(picked.place_id.clone());
        }
        assert_eq!(seen.len(), 3);

        assert!(pick_random(&[], &mut rng).is_none());
    }
}
