use crate::models::{Movie, MovieFilter};

/// Applies the bounds, then orders by year ascending, rating descending and
/// title ascending.
pub fn filter_movies<'a>(movies: &'a [Movie], filter: &MovieFilter) -> Vec<&'a Movie> {
    let mut filtered: Vec<&Movie> = movies.iter().filter(|m| filter.matches(m)).collect();
    filtered.sort_by(|a, b| {
        a.year
            .cmp(&b.year)
            .then_with(|| b.rating.total_cmp(&a.rating))
            .then_with(|| a.title.cmp(&b.title))
    });
    filtered
}
