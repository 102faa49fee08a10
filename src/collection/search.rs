use crate::models::Movie;

use super::fuzzy::close_matches;

pub const SUGGESTION_LIMIT: usize = 3;
pub const SUGGESTION_CUTOFF: f64 = 0.4;

#[derive(Debug, PartialEq)]
pub enum SearchOutcome<'a> {
    /// Titles containing the keyword, alphabetical.
    Matches(Vec<&'a Movie>),
    /// No title contains the keyword; these are the closest titles (may be empty).
    Suggestions(Vec<&'a str>),
}

/// Case-insensitive substring search with close-match suggestions on a miss.
pub fn search_movies<'a>(movies: &'a [Movie], keyword: &str) -> SearchOutcome<'a> {
    let keyword = keyword.trim().to_lowercase();

    let lowered: Vec<(String, &'a Movie)> = movies
        .iter()
        .map(|m| (m.title.to_lowercase(), m))
        .collect();

    let mut hits: Vec<&(String, &'a Movie)> = lowered
        .iter()
        .filter(|(title, _)| title.contains(&keyword))
        .collect();

    if !hits.is_empty() {
        hits.sort_by(|a, b| a.0.cmp(&b.0));
        return SearchOutcome::Matches(hits.into_iter().map(|(_, m)| *m).collect());
    }

    SearchOutcome::Suggestions(close_matches(
        &keyword,
        lowered.iter().map(|&(ref title, m)| (title.as_str(), m.title.as_str())),
        SUGGESTION_LIMIT,
        SUGGESTION_CUTOFF,
    ))
}
