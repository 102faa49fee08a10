/// A movie in one user's collection. Titles are unique per user.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub title: String,
    pub year: i32,
    pub rating: f64,
    pub poster: Option<String>,
    pub note: Option<String>,
    pub imdb_id: Option<String>,
    pub country: Option<String>,
    pub soundtrack_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMovie {
    pub user_id: i64,
    pub title: String,
    pub year: i32,
    pub rating: f64,
    pub poster: Option<String>,
    pub imdb_id: Option<String>,
    pub country: Option<String>,
    pub soundtrack_url: Option<String>,
}

/// Bounds for the filter command. `None` imposes no constraint; year bounds
/// are inclusive on both ends and the rating bound is inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovieFilter {
    pub min_rating: Option<f64>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
}

impl MovieFilter {
    pub fn matches(&self, movie: &Movie) -> bool {
        if self.min_rating.is_some_and(|min| movie.rating < min) {
            return false;
        }
        if self.start_year.is_some_and(|start| movie.year < start) {
            return false;
        }
        if self.end_year.is_some_and(|end| movie.year > end) {
            return false;
        }
        true
    }
}
