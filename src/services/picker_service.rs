// src/services/picker_service.rs
// DOCUMENTATION: Random restaurant picker
// PURPOSE: Resolve the search center, query the places index, narrow the candidate pool, pick one

use crate::config::Config;
use crate::errors::PickerError;
use crate::models::{LatLng, LocationInput, PickCriteria, PickStatus, PipelineStats, SearchPlan};
use crate::services::filters;
use crate::services::google_places_client::GooglePlace;
use crate::services::places_source::{NearbyQuery, PlacesSource};
use futures::future::join_all;
use rand::Rng;
use std::collections::HashSet;

/// Picker settings that come from configuration rather than the request
#[derive(Debug, Clone)]
pub struct PickerSettings {
    /// Center used when the request gives neither coordinates nor address
    pub default_center: LatLng,
    /// Cap on detail lookups during cuisine confirmation
    pub detail_lookup_limit: usize,
}

impl PickerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            default_center: LatLng::new(config.default_center_lat, config.default_center_lng),
            detail_lookup_limit: config.detail_lookup_limit,
        }
    }
}

/// Result of one pick
#[derive(Debug, Clone)]
pub struct PickOutcome {
    pub status: PickStatus,
    pub center: LatLng,
    pub place: Option<GooglePlace>,
    pub stats: PipelineStats,
}

pub struct PickerService;

impl PickerService {
    /// Run the whole pipeline for one request
    /// DOCUMENTATION:
    /// 1. resolve the search center
    /// 2. search (one strict type, or a union of types merged by place id)
    /// 3. strict type filter, then type/keyword exclusions
    /// 4. Korean only: confirm candidates through detail lookups
    /// 5. rating/review thresholds, relaxed if they empty the pool
    /// 6. uniform random pick
    pub async fn pick<S, R>(
        source: &S,
        criteria: &PickCriteria,
        settings: &PickerSettings,
        rng: &mut R,
    ) -> Result<PickOutcome, PickerError>
    where
        S: PlacesSource + ?Sized,
        R: Rng + ?Sized,
    {
        let center = Self::resolve_location(source, &criteria.location, settings.default_center).await?;
        let mut stats = PipelineStats::default();

        let base_query = NearbyQuery {
            location: center,
            radius: criteria.radius,
            place_type: None,
            open_now: criteria.open_now,
        };

        let plan = criteria.cuisine.search_plan();
        let results = Self::search(source, plan, &base_query).await?;
        stats.searched = results.len();

        if results.is_empty() {
            log::info!(
                "No places found for {:?} within {}m of {:?}",
                criteria.cuisine,
                criteria.radius,
                center
            );
            return Ok(PickOutcome {
                status: PickStatus::NoResults,
                center,
                place: None,
                stats,
            });
        }

        let results = match plan {
            SearchPlan::Strict(place_type) => filters::filter_strict_type(results, place_type),
            SearchPlan::Union(_) => results,
        };
        stats.after_type_filter = results.len();

        let mut pool = filters::apply_exclusions(results);
        stats.after_exclusions = pool.len();

        if criteria.cuisine.needs_confirmation() && !pool.is_empty() {
            let (confirmed, lookups, fallback) =
                Self::confirm_korean(source, pool, settings.detail_lookup_limit).await;
            pool = confirmed;
            stats.detail_lookups = lookups;
            stats.confirmation_fallback = fallback;
        }
        stats.after_confirmation = pool.len();

        let (pool, relaxed) = filters::apply_thresholds(pool, criteria.min_rating, criteria.min_reviews);
        stats.thresholds_relaxed = relaxed;
        stats.after_thresholds = if relaxed { 0 } else { pool.len() };

        log::info!(
            "Pick pipeline for {:?}: searched={} type={} exclusions={} confirmed={} thresholds={} (relaxed={})",
            criteria.cuisine,
            stats.searched,
            stats.after_type_filter,
            stats.after_exclusions,
            stats.after_confirmation,
            stats.after_thresholds,
            relaxed
        );

        let place = filters::pick_random(&pool, rng).cloned();
        let status = if place.is_some() {
            PickStatus::Picked
        } else {
            PickStatus::NoMatch
        };

        Ok(PickOutcome {
            status,
            center,
            place,
            stats,
        })
    }

    /// Coordinates win, then a geocoded address, then the default center
    pub async fn resolve_location<S: PlacesSource + ?Sized>(
        source: &S,
        location: &LocationInput,
        default_center: LatLng,
    ) -> Result<LatLng, PickerError> {
        match location {
            LocationInput::Coordinates(point) => Ok(*point),
            LocationInput::Address(address) => source.geocode(address).await,
            LocationInput::Default => Ok(default_center),
        }
    }

    /// Query the places index according to the cuisine's search plan
    /// DOCUMENTATION: A union search fails only when every sub-search fails;
    /// partial failures are logged and the surviving lists merged.
    pub async fn search<S: PlacesSource + ?Sized>(
        source: &S,
        plan: SearchPlan,
        base_query: &NearbyQuery,
    ) -> Result<Vec<GooglePlace>, PickerError> {
        match plan {
            SearchPlan::Strict(place_type) => source.nearby(&base_query.with_type(place_type)).await,
            SearchPlan::Union(types) => {
                let queries: Vec<NearbyQuery> = types.iter().map(|t| base_query.with_type(t)).collect();
                let responses = join_all(queries.iter().map(|q| source.nearby(q))).await;

                let mut lists = Vec::new();
                let mut first_error = None;
                for (query, response) in queries.iter().zip(responses) {
                    match response {
                        Ok(list) => lists.push(list),
                        Err(e) => {
                            log::warn!("Nearby search for {:?} failed: {}", query.place_type, e);
                            first_error.get_or_insert(e);
                        }
                    }
                }

                match (lists.is_empty(), first_error) {
                    (true, Some(e)) => Err(e),
                    _ => Ok(filters::merge_unique(lists)),
                }
            }
        }
    }

    /// Confirm Korean candidates with detail lookups
    /// Returns the narrowed pool, the number of lookups issued and whether
    /// the type-only fallback was applied.
    async fn confirm_korean<S: PlacesSource + ?Sized>(
        source: &S,
        pool: Vec<GooglePlace>,
        lookup_limit: usize,
    ) -> (Vec<GooglePlace>, usize, bool) {
        let candidate_ids: Vec<String> = filters::confirmation_candidates(&pool, lookup_limit)
            .into_iter()
            .map(|p| p.place_id.clone())
            .filter(|id| !id.is_empty())
            .collect();

        let details = join_all(candidate_ids.iter().map(|id| source.details(id))).await;

        let mut confirmed_ids = HashSet::new();
        for (candidate_id, detail) in candidate_ids.iter().zip(details) {
            match detail {
                Ok(detail) if filters::confirms_korean(&detail) => {
                    let id = if detail.place_id.is_empty() {
                        candidate_id.clone()
                    } else {
                        detail.place_id
                    };
                    confirmed_ids.insert(id);
                }
                Ok(_) => {}
                Err(e) => log::debug!("Detail lookup for {} failed: {}", candidate_id, e),
            }
        }

        log::debug!(
            "Korean confirmation: {} of {} lookups confirmed",
            confirmed_ids.len(),
            candidate_ids.len()
        );

        let (after, fallback) = filters::apply_confirmation(pool, &confirmed_ids);
        (after, candidate_ids.len(), fallback)
    }
}
