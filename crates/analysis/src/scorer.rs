//! Composite 0–100 performance score for keyword prioritization.

use sem_core::types::{round2, Keyword};

const VOLUME_WEIGHT: f64 = 0.40;
const COMPETITION_WEIGHT: f64 = 0.35;
const CPC_WEIGHT: f64 = 0.25;

/// Search volume at which the volume component saturates.
const VOLUME_CAP: f64 = 10_000.0;

/// Neutral CPC component when the bid range is unknown.
const NEUTRAL_CPC_SCORE: f64 = 50.0;

/// Weighted composite of search volume, competition, and CPC efficiency,
/// rounded to two decimals. Always lands in [0, 100]; degenerate inputs
/// (non-finite bid data) collapse to 0 rather than propagating.
pub fn performance_score(keyword: &Keyword) -> f64 {
    let volume_score = (keyword.monthly_searches as f64 / VOLUME_CAP * 100.0).min(100.0);
    let competition_score = 100.0 - keyword.competition_index.min(100) as f64;

    let avg_cpc = (keyword.low_bid + keyword.high_bid) / 2.0;
    let cpc_score = if avg_cpc > 0.0 {
        (100.0 - avg_cpc * 20.0).max(0.0)
    } else {
        NEUTRAL_CPC_SCORE
    };

    let score = round2(
        volume_score * VOLUME_WEIGHT
            + competition_score * COMPETITION_WEIGHT
            + cpc_score * CPC_WEIGHT,
    );

    if score.is_finite() {
        score.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sem_core::types::{Keyword, KeywordRecord};

    fn keyword(searches: u64, competition: u32, low: f64, high: f64) -> Keyword {
        Keyword::from_record(KeywordRecord {
            keyword: "test keyword".into(),
            avg_monthly_searches: searches,
            competition: String::new(),
            competition_index: competition,
            low_top_page_bid: low,
            high_top_page_bid: high,
            data_source: "test".into(),
        })
    }

    // 1. Reference scenario ------------------------------------------------

    #[test]
    fn test_best_crm_scenario() {
        // volume 20*0.4 + competition 70*0.35 + cpc 40*0.25 = 8 + 24.5 + 10
        let kw = keyword(2_000, 30, 2.0, 4.0);
        assert!((performance_score(&kw) - 42.5).abs() < 1e-9);
    }

    // 2. Component bounds --------------------------------------------------

    #[test]
    fn test_volume_component_caps_at_10k() {
        let capped = performance_score(&keyword(10_000, 0, 0.0, 0.0));
        let beyond = performance_score(&keyword(500_000, 0, 0.0, 0.0));
        assert!((capped - beyond).abs() < 1e-9);
    }

    #[test]
    fn test_neutral_cpc_when_bids_missing() {
        // volume 0, competition 100 -> only the neutral CPC term remains
        let kw = keyword(0, 100, 0.0, 0.0);
        assert!((performance_score(&kw) - 12.5).abs() < 1e-9);
    }

    #[test]
    fn test_expensive_cpc_floors_at_zero() {
        // avg cpc 10 -> 100 - 200 clamps to 0
        let kw = keyword(0, 100, 8.0, 12.0);
        assert!((performance_score(&kw) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_stays_in_range() {
        for (searches, competition, low, high) in [
            (0, 0, 0.0, 0.0),
            (1_000_000, 0, 0.01, 0.01),
            (0, 100, 50.0, 80.0),
            (5_000, 55, 1.2, 3.4),
        ] {
            let score = performance_score(&keyword(searches, competition, low, high));
            assert!((0.0..=100.0).contains(&score), "score {score} out of range");
        }
    }
}
