//! Ratcliff/Obershelp similarity, computed the way `SequenceMatcher.ratio`
//! does it: twice the number of matched characters over the combined length.

use std::collections::HashMap;

/// Scores each `(key, item)` pair by the similarity of `key` to `word` and
/// returns up to `limit` items scoring at least `cutoff`, best first. Equal
/// scores are ordered by key descending. Items with equal keys are all kept.
pub fn close_matches<'k, T, I>(word: &str, candidates: I, limit: usize, cutoff: f64) -> Vec<T>
where
    I: IntoIterator<Item = (&'k str, T)>,
{
    if limit == 0 || !(0.0..=1.0).contains(&cutoff) {
        return Vec::new();
    }

    let mut scored: Vec<(f64, &str, T)> = candidates
        .into_iter()
        .map(|(key, item)| (similarity(key, word), key, item))
        .filter(|(score, _, _)| *score >= cutoff)
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| b.1.cmp(a.1)));
    scored.into_iter().take(limit).map(|(_, _, item)| item).collect()
}

pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = Matcher::new(&a, &b).matched_len();
    2.0 * matched as f64 / total as f64
}

struct Matcher<'s> {
    a: &'s [char],
    b: &'s [char],
    b2j: HashMap<char, Vec<usize>>,
}

impl<'s> Matcher<'s> {
    fn new(a: &'s [char], b: &'s [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, c) in b.iter().enumerate() {
            b2j.entry(*c).or_default().push(j);
        }

        // Long sequences drop characters that occur in more than 1% of b.
        let n = b.len();
        if n >= 200 {
            let threshold = n / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= threshold);
        }

        Self { a, b, b2j }
    }

    fn matched_len(&self) -> usize {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut matched = 0;

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            matched += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }

        matched
    }

    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = next;
        }

        // Grow the block over characters pruned from the index.
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        (best_i, best_j, best_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{} != {}", actual, expected);
    }

    #[test]
    fn identical_strings_score_one() {
        assert_close(similarity("heat", "heat"), 1.0);
        assert_close(similarity("", ""), 1.0);
    }

    #[test]
    fn disjoint_strings_score_zero() {
        assert_close(similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn matches_sequence_matcher_ratios() {
        // "abcd" / "bcde": one block "bcd"
        assert_close(similarity("abcd", "bcde"), 0.75);
        // transposed letters keep most of the title
        assert_close(similarity("inception", "inceptoin"), 16.0 / 18.0);
    }

    #[test]
    fn close_matches_respects_cutoff_and_limit() {
        let titles = ["inception", "interstellar", "heat", "insomnia", "memento"];

        let found = close_matches("inceptoin", titles.iter().map(|t| (*t, *t)), 3, 0.4);
        assert_eq!(found.first(), Some(&"inception"));
        assert!(found.len() <= 3);

        let none = close_matches("zzz", titles.iter().map(|t| (*t, *t)), 3, 0.4);
        assert!(none.is_empty());
    }

    #[test]
    fn ties_prefer_the_larger_candidate() {
        let found = close_matches("ab", [("ax", 1), ("ay", 2)], 2, 0.4);
        assert_eq!(found, vec![2, 1]);
    }

    #[test]
    fn equal_keys_keep_every_item() {
        let found = close_matches("heta", [("heat", "Heat"), ("heat", "HEAT")], 3, 0.4);
        assert_eq!(found, vec!["Heat", "HEAT"]);
    }
}
