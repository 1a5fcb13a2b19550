//! Formatting helpers for venue cards.

/// Highlight tier for a venue card, by rating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingTier {
    Top,
    High,
    Good,
    Standard,
}

impl RatingTier {
    pub fn from_rating(rating: Option<f64>) -> Self {
        match rating {
            Some(r) if r > 4.8 => Self::Top,
            Some(r) if r >= 4.5 => Self::High,
            Some(r) if r >= 4.0 => Self::Good,
            _ => Self::Standard,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Top => "top rated",
            Self::High => "highly rated",
            Self::Good => "well rated",
            Self::Standard => "",
        }
    }
}

/// Kilometres with two decimals, or "-" when unknown.
pub fn format_distance(distance_meters: Option<f64>) -> String {
    match distance_meters {
        Some(m) => format!("{:.2} km", m / 1000.0),
        None => "-".to_string(),
    }
}

/// One decimal, or an em dash when unrated.
pub fn format_rating(rating: Option<f64>) -> String {
    match rating {
        Some(r) => format!("{:.1}", r),
        None => "\u{2014}".to_string(),
    }
}

/// Five-glyph star row: full, half or empty per position.
pub fn star_row(rating: Option<f64>) -> String {
    let rating = rating.unwrap_or(0.0);
    (1..=5)
        .map(|i| {
            let i = f64::from(i);
            if rating >= i {
                '\u{2605}'
            } else if rating >= i - 0.5 {
                '\u{00bd}'
            } else {
                '\u{2606}'
            }
        })
        .collect()
}
