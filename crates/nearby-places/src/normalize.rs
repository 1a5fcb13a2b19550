//! Provider record → `Place`.

use crate::geo::distance_meters;
use crate::types::{Coordinate, Place, RawPlace};

/// Convert a provider record into a `Place`, measuring from `origin` when the
/// provider did not supply a distance.
///
/// Distance comes from, in order: the provider's `distanceInMeters`; the great-circle
/// distance to the record's own location; nothing.
pub fn normalize(raw: RawPlace, origin: Coordinate) -> Place {
    let distance_meters = raw.distance_in_meters.or_else(|| {
        raw.location
            .and_then(|loc| loc.coordinate())
            .map(|loc| distance_meters(origin, loc))
    });

    Place {
        name: raw
            .display_name
            .and_then(|name| name.text)
            .unwrap_or_default(),
        vicinity: raw.formatted_address.unwrap_or_default(),
        rating: raw.rating,
        distance_meters,
        place_id: raw.id.unwrap_or_default(),
    }
}
