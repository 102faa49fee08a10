use crate::models::Movie;

#[derive(Debug, PartialEq)]
pub struct CollectionStats<'a> {
    pub average: f64,
    pub median: f64,
    /// Every movie sharing the highest rating, in stored order.
    pub best: Vec<&'a Movie>,
    /// Every movie sharing the lowest rating, in stored order.
    pub worst: Vec<&'a Movie>,
}

/// `None` for an empty collection.
pub fn collection_stats(movies: &[Movie]) -> Option<CollectionStats<'_>> {
    let ratings: Vec<f64> = movies.iter().map(|m| m.rating).collect();
    let median = median(&ratings)?;
    let average = ratings.iter().sum::<f64>() / ratings.len() as f64;

    let max = ratings.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = ratings.iter().copied().fold(f64::INFINITY, f64::min);

    Some(CollectionStats {
        average,
        median,
        best: movies.iter().filter(|m| m.rating == max).collect(),
        worst: movies.iter().filter(|m| m.rating == min).collect(),
    })
}

/// Middle value of the ascending ratings, or the mean of the two middle
/// values for an even count.
pub fn median(ratings: &[f64]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let mut sorted = ratings.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}
