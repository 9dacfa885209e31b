//! Threshold filtering with score assignment.

use std::cmp::Ordering;

use sem_core::config::FilterConfig;
use sem_core::types::Keyword;
use tracing::info;

use crate::scorer;

/// Keep keywords meeting the volume/competition/CPC thresholds, assign each
/// survivor its performance score, and return them sorted descending by
/// score. Scores are never computed for rejected keywords. An empty result
/// is a valid outcome the caller must handle.
pub fn filter_keywords(keywords: Vec<Keyword>, filters: &FilterConfig) -> Vec<Keyword> {
    let input_count = keywords.len();

    let mut passed: Vec<Keyword> = keywords
        .into_iter()
        .filter(|kw| {
            kw.monthly_searches >= filters.min_search_volume
                && kw.competition_index <= filters.max_competition_index
                && kw.high_bid <= filters.max_cpc
        })
        .collect();

    for kw in &mut passed {
        kw.performance_score = scorer::performance_score(kw);
    }

    // Stable sort keeps first-encountered order on equal scores.
    passed.sort_by(|a, b| {
        b.performance_score
            .partial_cmp(&a.performance_score)
            .unwrap_or(Ordering::Equal)
    });

    info!(
        input = input_count,
        passed = passed.len(),
        "Filtered keywords"
    );
    passed
}
