// src/models/cuisine.rs
// DOCUMENTATION: Cuisine catalog
// PURPOSE: Map each selectable cuisine to its labels and places search plan

use serde::{Deserialize, Serialize};

use crate::i18n::Lang;

/// Cuisine selected by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cuisine {
    #[default]
    Korean,
    Japanese,
    Chinese,
    AsianOther,
    Western,
    Any,
}

const ASIAN_OTHER_TYPES: &[&str] = &[
    "thai_restaurant",
    "vietnamese_restaurant",
    "indian_restaurant",
    "indonesian_restaurant",
    "sushi_restaurant",
    "ramen_restaurant",
];

const WESTERN_TYPES: &[&str] = &[
    "american_restaurant",
    "italian_restaurant",
    "french_restaurant",
    "seafood_restaurant",
    "steak_house",
    "pizza_restaurant",
    "mediterranean_restaurant",
    "spanish_restaurant",
    "greek_restaurant",
];

/// How the places index is queried for a cuisine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPlan {
    /// One search with this type; results must carry it
    Strict(&'static str),
    /// One search per type, merged by place id
    Union(&'static [&'static str]),
}

impl Cuisine {
    /// All cuisines in display order
    pub const ALL: [Cuisine; 6] = [
        Cuisine::Korean,
        Cuisine::Japanese,
        Cuisine::Chinese,
        Cuisine::AsianOther,
        Cuisine::Western,
        Cuisine::Any,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Cuisine::Korean => "korean",
            Cuisine::Japanese => "japanese",
            Cuisine::Chinese => "chinese",
            Cuisine::AsianOther => "asian_other",
            Cuisine::Western => "western",
            Cuisine::Any => "any",
        }
    }

    pub fn label(self, lang: Lang) -> &'static str {
        match (self, lang) {
            (Cuisine::Korean, Lang::En) => "Korean",
            (Cuisine::Korean, Lang::Ko) => "한식",
            (Cuisine::Japanese, Lang::En) => "Japanese",
            (Cuisine::Japanese, Lang::Ko) => "일식",
            (Cuisine::Chinese, Lang::En) => "Chinese",
            (Cuisine::Chinese, Lang::Ko) => "중식",
            (Cuisine::AsianOther, Lang::En) => "Asian (Other)",
            (Cuisine::AsianOther, Lang::Ko) => "아시안(기타)",
            (Cuisine::Western, Lang::En) => "Western",
            (Cuisine::Western, Lang::Ko) => "양식",
            (Cuisine::Any, Lang::En) => "Any",
            (Cuisine::Any, Lang::Ko) => "아무거나",
        }
    }

    pub fn search_plan(self) -> SearchPlan {
        match self {
            Cuisine::Korean => SearchPlan::Strict("korean_restaurant"),
            Cuisine::Japanese => SearchPlan::Strict("japanese_restaurant"),
            Cuisine::Chinese => SearchPlan::Strict("chinese_restaurant"),
            Cuisine::AsianOther => SearchPlan::Union(ASIAN_OTHER_TYPES),
            Cuisine::Western => SearchPlan::Union(WESTERN_TYPES),
            Cuisine::Any => SearchPlan::Strict("restaurant"),
        }
    }

    /// Whether results go through the detail-lookup confirmation pass
    pub fn needs_confirmation(self) -> bool {
        matches!(self, Cuisine::Korean)
    }
}

/// Cuisine entry as listed by the options endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CuisineOption {
    pub key: &'static str,
    pub label: &'static str,
}

impl CuisineOption {
    pub fn list(lang: Lang) -> Vec<CuisineOption> {
        Cuisine::ALL
            .iter()
            .map(|c| CuisineOption {
                key: c.key(),
                label: c.label(lang),
            })
            .collect()
    }
}
