use std::collections::HashMap;

use crate::models::{AsResource, Source};

/// Drop items whose present rating is below `min_rating`.
/// Unrated items always pass; a rating of 0 is a real score.
pub fn filter_by_quality<T: AsResource>(items: Vec<T>, min_rating: f64) -> Vec<T> {
    items
        .into_iter()
        .filter(|item| match item.resource().rating {
            Some(rating) => rating >= min_rating,
            None => true,
        })
        .collect()
}

/// Keep at most `max_per_source` items per source, preserving order
pub fn diversify<T: AsResource>(items: Vec<T>, max_per_source: usize) -> Vec<T> {
    let mut counts: HashMap<Source, usize> = HashMap::new();

    items
        .into_iter()
        .filter(|item| {
            let count = counts.entry(item.resource().source).or_insert(0);
            if *count < max_per_source {
                *count += 1;
                true
            } else {
                false
            }
        })
        .collect()
}
