// Utility functions for learning-path-service

use std::f64::consts::LN_2;

/// Exponential decay: 1.0 at age zero, 0.5 after one half-life
pub fn exponential_decay(age: f64, half_life: f64) -> f64 {
    (-age.max(0.0) / half_life * LN_2).exp()
}

/// Capitalize the first letter of each whitespace-separated word
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Case-insensitive substring test; an empty needle never matches
pub fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    !needle_lower.is_empty() && haystack.to_lowercase().contains(needle_lower)
}
