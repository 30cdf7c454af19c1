// src/services/maps_link.rs
// DOCUMENTATION: Google Maps deep links
// PURPOSE: Build the "Open in Google Maps" URL for a picked place

use crate::services::google_places_client::GooglePlace;

const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1";

/// Best available Google Maps link for a place
/// DOCUMENTATION: Prefers name + place id, then place id, then name,
/// then raw coordinates; "#" when nothing is known
pub fn build_maps_url(place: Option<&GooglePlace>) -> String {
    let Some(place) = place else {
        return "#".to_string();
    };

    let place_id = Some(place.place_id.trim()).filter(|id| !id.is_empty());
    let name = Some(place.name.trim()).filter(|n| !n.is_empty());

    match (place_id, name, place.location()) {
        (Some(id), Some(name), _) => format!(
            "{}&query={}&query_place_id={}",
            MAPS_SEARCH_URL,
            urlencoding::encode(name),
            id
        ),
        (Some(id), None, _) => format!("https://www.google.com/maps/place/?q=place_id:{}", id),
        (None, Some(name), _) => format!("{}&query={}", MAPS_SEARCH_URL, urlencoding::encode(name)),
        (None, None, Some(loc)) => format!("{}&query={},{}", MAPS_SEARCH_URL, loc.lat, loc.lng),
        (None, None, None) => "#".to_string(),
    }
}
