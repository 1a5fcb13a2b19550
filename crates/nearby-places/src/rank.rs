//! Rating order and result cap.

use std::cmp::Ordering;

use crate::types::Place;

/// Maximum number of places handed back to callers.
pub const RESULT_CAP: usize = 20;

/// Order two optional ratings highest first, with `None` after every rating.
fn by_rating_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable-sort by rating descending and keep the first `RESULT_CAP` entries.
///
/// Places without a rating go last; equal ratings keep their input order.
pub fn rank(mut places: Vec<Place>) -> Vec<Place> {
    places.sort_by(|a, b| by_rating_desc(a.rating, b.rating));
    places.truncate(RESULT_CAP);
    places
}
