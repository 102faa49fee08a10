use std::cmp::Reverse;

use crate::models::Movie;

/// Case-insensitive alphabetical order, used by the plain listing.
pub fn sort_by_title(movies: &[Movie]) -> Vec<&Movie> {
    let mut sorted: Vec<&Movie> = movies.iter().collect();
    sorted.sort_by_cached_key(|m| m.title.to_lowercase());
    sorted
}

/// Highest rating first; equal ratings fall back to case-insensitive title.
pub fn sort_by_rating(movies: &[Movie]) -> Vec<&Movie> {
    let mut sorted: Vec<&Movie> = movies.iter().collect();
    sorted.sort_by(|a, b| {
        b.rating
            .total_cmp(&a.rating)
            .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
    });
    sorted
}

/// Newest first. Movies from the same year keep their stored order.
pub fn sort_by_year(movies: &[Movie]) -> Vec<&Movie> {
    let mut sorted: Vec<&Movie> = movies.iter().collect();
    sorted.sort_by_key(|m| Reverse(m.year));
    sorted
}
