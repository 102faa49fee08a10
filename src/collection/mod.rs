//! In-memory transformations over one user's full movie list.

mod filter;
mod fuzzy;
mod search;
mod sort;
mod stats;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::Movie;

pub use filter::filter_movies;
pub use search::{search_movies, SearchOutcome};
pub use sort::{sort_by_rating, sort_by_title, sort_by_year};
pub use stats::{collection_stats, CollectionStats};

/// Uniformly picks one movie; `None` for an empty collection.
pub fn pick_random<'a, R: Rng + ?Sized>(movies: &'a [Movie], rng: &mut R) -> Option<&'a Movie> {
    movies.choose(rng)
}

#[cfg(test)]
pub(crate) fn movie(title: &str, year: i32, rating: f64) -> Movie {
    Movie {
        title: title.to_string(),
        year,
        rating,
        poster: None,
        note: None,
        imdb_id: None,
        country: None,
        soundtrack_url: None,
    }
}
