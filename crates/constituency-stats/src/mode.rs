//! Most-frequent-value computation.

use std::{collections::HashMap, hash::Hash};

/// Returns the most frequent value.
///
/// Ties are broken in favour of the value encountered first in iteration
/// order. Returns `None` for an empty input.
///
/// # Examples
///
/// ```
/// use constituency_stats::mode::mode;
///
/// assert_eq!(mode([3, 1, 1, 3, 2]), Some(3));
/// assert_eq!(mode([2, 1, 1]), Some(1));
/// assert_eq!(mode(Vec::<u8>::new()), None);
/// ```
#[must_use]
pub fn mode<I, T>(values: I) -> Option<T>
where
    I: IntoIterator<Item = T>,
    T: Eq + Hash + Clone,
{
    // value -> (count, first position)
    let mut counts: HashMap<T, (usize, usize)> = HashMap::new();
    for (position, value) in values.into_iter().enumerate() {
        counts.entry(value).or_insert((0, position)).0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(value, _)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_winner() {
        assert_eq!(mode(["x", "y", "y", "z"]), Some("y"));
    }

    #[test]
    fn test_tie_prefers_first_encountered() {
        assert_eq!(mode(["London", "Wales", "Wales", "London"]), Some("London"));
        assert_eq!(mode(["Wales", "London", "London", "Wales"]), Some("Wales"));
    }

    #[test]
    fn test_all_distinct_returns_first() {
        assert_eq!(mode([5, 4, 3]), Some(5));
    }
}
