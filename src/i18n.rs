// src/i18n.rs
// DOCUMENTATION: Bilingual (English/Korean) UI text
// PURPOSE: String tables, radius formatting and slider ranges per language

use serde::{Deserialize, Serialize};

/// Meters per statute mile, used for display rounding
const METERS_PER_MILE: f64 = 1609.344;

/// Slider step used for the English (miles) slider
const SLIDER_MILE_M: u32 = 1609;

/// Supported UI languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    En,
    #[default]
    Ko,
}

/// UI string table
/// DOCUMENTATION: Every user-facing text of the picker, one table per language
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiStrings {
    pub title: &'static str,
    pub placeholder: &'static str,
    pub cuisine: &'static str,
    pub min_rating: &'static str,
    pub min_reviews: &'static str,
    pub open_now: &'static str,
    pub radius: &'static str,
    pub button: &'static str,
    pub open_in_maps: &'static str,
    pub lang_toggle: &'static str,
    pub use_my_loc: &'static str,
    pub no_results: &'static str,
    pub no_match: &'static str,
    pub search_fail: &'static str,
    pub searching: &'static str,
    pub maps_fail: &'static str,
    pub theme: &'static str,
}

const EN: UiStrings = UiStrings {
    title: "Random Restaurant Picker",
    placeholder: "ZIP code or City, State (e.g. 75201 or Dallas, TX)",
    cuisine: "Cuisine",
    min_rating: "Minimum Rating",
    min_reviews: "Minimum Review Count",
    open_now: "Open now",
    radius: "Search Radius",
    button: "Get Random Recommendation",
    open_in_maps: "Open in Google Maps",
    lang_toggle: "KR",
    use_my_loc: "Use my location",
    no_results: "No results. Try a larger radius or different filters.",
    no_match: "No results matched your filters.",
    search_fail: "Search failed.",
    searching: "Searching…",
    maps_fail: "Google Maps failed to load.",
    theme: "Theme",
};

const KO: UiStrings = UiStrings {
    title: "랜덤 맛집 추천",
    placeholder: "ZIP 코드 또는 도시, 주 (예: 75201 또는 Dallas, TX)",
    cuisine: "음식 종류",
    min_rating: "최소 별점",
    min_reviews: "최소 리뷰 수",
    open_now: "영업 중",
    radius: "검색 반경",
    button: "랜덤 추천 받기",
    open_in_maps: "구글맵에서 열기",
    lang_toggle: "EN",
    use_my_loc: "현재 위치",
    no_results: "결과가 없어요. 반경을 늘리거나 조건을 바꿔보세요.",
    no_match: "조건에 맞는 곳이 없어요.",
    search_fail: "검색에 실패했어요.",
    searching: "검색 중…",
    maps_fail: "구글 맵 로드에 실패했어요. UI는 계속 쓸 수 있어요.",
    theme: "테마",
};

/// Radius slider range and tick marks, in meters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadiusSlider {
    pub min: u32,
    pub max: u32,
    pub step: u32,
    pub marks: Vec<u32>,
}

impl Lang {
    /// String table for this language
    pub fn strings(self) -> &'static UiStrings {
        match self {
            Lang::En => &EN,
            Lang::Ko => &KO,
        }
    }

    /// Human-readable radius: miles for English, kilometers for Korean
    pub fn format_radius(self, meters: u32) -> String {
        match self {
            Lang::En => format!("{} mi", (meters as f64 / METERS_PER_MILE).round()),
            Lang::Ko => format!("{} km", (meters as f64 / 1000.0).round()),
        }
    }

    pub fn radius_slider(self) -> RadiusSlider {
        match self {
            Lang::En => RadiusSlider {
                min: SLIDER_MILE_M,
                max: 12 * SLIDER_MILE_M,
                step: SLIDER_MILE_M,
                marks: [1, 3, 5, 8, 12].iter().map(|mi| mi * SLIDER_MILE_M).collect(),
            },
            Lang::Ko => RadiusSlider {
                min: 1000,
                max: 20_000,
                step: 1000,
                marks: [1, 3, 5, 10, 20].iter().map(|km| km * 1000).collect(),
            },
        }
    }
}
