//! Bid recommendations summary report.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use sem_core::types::{round1, round2, BudgetUtilization, Keyword};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidReport {
    pub summary: BidSummary,
    pub performance_breakdown: PerformanceBreakdown,
    /// Strategy label -> keyword count, in stable label order.
    pub strategy_distribution: BTreeMap<String, usize>,
    /// Top ten keywords by performance score.
    pub top_opportunities: Vec<Keyword>,
    pub optimization_priorities: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidSummary {
    pub total_keywords: usize,
    pub total_monthly_budget: f64,
    pub average_cpc: f64,
    pub projected_monthly_clicks: f64,
    pub projected_monthly_conversions: f64,
    pub projected_average_cpa: f64,
}

/// High >= 70, medium 40–70, low < 40 performance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceBreakdown {
    pub high_performers: usize,
    pub medium_performers: usize,
    pub low_performers: usize,
}

/// Aggregate the optimized keyword collection into the report handed to the
/// report writer. An empty collection produces an all-zero summary.
pub fn recommendations_report(keywords: &[Keyword]) -> BidReport {
    let total_keywords = keywords.len();

    let mut total_budget = 0.0;
    let mut total_clicks = 0.0;
    let mut total_conversions = 0.0;
    let mut total_cpc = 0.0;
    let mut strategy_distribution: BTreeMap<String, usize> = BTreeMap::new();

    for kw in keywords {
        if let Some(bid) = kw.bid.as_ref() {
            total_budget += bid.budget_allocation;
            total_clicks += bid.projections.monthly_clicks;
            total_conversions += bid.projections.monthly_conversions;
            total_cpc += bid.optimized_cpc;
            *strategy_distribution
                .entry(bid.strategy.to_string())
                .or_insert(0) += 1;
        }
    }

    let average_cpc = if total_keywords > 0 {
        total_cpc / total_keywords as f64
    } else {
        0.0
    };
    let average_cpa = if total_conversions > 0.0 {
        total_budget / total_conversions
    } else {
        0.0
    };

    let high = keywords
        .iter()
        .filter(|kw| kw.performance_score >= 70.0)
        .count();
    let low = keywords
        .iter()
        .filter(|kw| kw.performance_score < 40.0)
        .count();

    let mut ranked: Vec<Keyword> = keywords.to_vec();
    ranked.sort_by(|a, b| {
        b.performance_score
            .partial_cmp(&a.performance_score)
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(10);

    BidReport {
        summary: BidSummary {
            total_keywords,
            total_monthly_budget: round2(total_budget),
            average_cpc: round2(average_cpc),
            projected_monthly_clicks: total_clicks.round(),
            projected_monthly_conversions: round1(total_conversions),
            projected_average_cpa: round2(average_cpa),
        },
        performance_breakdown: PerformanceBreakdown {
            high_performers: high,
            medium_performers: total_keywords - high - low,
            low_performers: low,
        },
        strategy_distribution,
        top_opportunities: ranked,
        optimization_priorities: optimization_priorities(keywords),
    }
}

fn optimization_priorities(keywords: &[Keyword]) -> Vec<String> {
    let mut priorities = Vec::new();

    let high_volume_low_perf = keywords
        .iter()
        .filter(|kw| kw.monthly_searches >= 1_000 && kw.performance_score <= 50.0)
        .count();
    if high_volume_low_perf > 0 {
        priorities.push(format!(
            "Optimize {high_volume_low_perf} high-volume, low-performing keywords"
        ));
    }

    let high_cpc = keywords
        .iter()
        .filter(|kw| kw.bid.as_ref().map_or(false, |b| b.optimized_cpc >= 5.0))
        .count();
    if high_cpc > 0 {
        priorities.push(format!("Monitor {high_cpc} high-CPC keywords for efficiency"));
    }

    let constrained = keywords
        .iter()
        .filter(|kw| {
            kw.bid
                .as_ref()
                .map_or(false, |b| b.utilization == BudgetUtilization::Constrained)
        })
        .count();
    if constrained > 0 {
        priorities.push(format!(
            "Consider budget increase for {constrained} constrained keywords"
        ));
    }

    let opportunities = keywords
        .iter()
        .filter(|kw| kw.competition_index <= 30 && kw.performance_score >= 70.0)
        .count();
    if opportunities > 0 {
        priorities.push(format!(
            "Capitalize on {opportunities} low-competition, high-performance opportunities"
        ));
    }

    priorities
}

#[cfg(test)]
mod tests {
    use super::*;
    use sem_core::types::{
        BidProjections, BidRecommendation, BidStrategy, KeywordRecord,
    };

    fn optimized_keyword(text: &str, score: f64, cpc: f64, allocation: f64) -> Keyword {
        let mut kw = Keyword::from_record(KeywordRecord {
            keyword: text.into(),
            avg_monthly_searches: 2_000,
            competition: String::new(),
            competition_index: 25,
            low_top_page_bid: 1.0,
            high_top_page_bid: 3.0,
            data_source: "test".into(),
        });
        kw.performance_score = score;
        kw.bid = Some(BidRecommendation {
            optimized_cpc: cpc,
            market_avg_cpc: 2.0,
            theoretical_max_cpc: 5.0,
            strategy: BidStrategy::Moderate,
            projections: BidProjections {
                monthly_clicks: 100.0,
                monthly_conversions: 2.0,
                monthly_cost: allocation,
                projected_cpa: 50.0,
            },
            optimization_notes: String::new(),
            budget_allocation: allocation,
            utilization: BudgetUtilization::Full,
        });
        kw
    }

    #[test]
    fn test_empty_collection_yields_zero_summary() {
        let report = recommendations_report(&[]);
        assert_eq!(report.summary.total_keywords, 0);
        assert!((report.summary.average_cpc).abs() < f64::EPSILON);
        assert!(report.top_opportunities.is_empty());
        assert!(report.optimization_priorities.is_empty());
    }

    #[test]
    fn test_summary_aggregates() {
        let keywords = vec![
            optimized_keyword("a", 80.0, 2.0, 100.0),
            optimized_keyword("b", 60.0, 4.0, 200.0),
        ];
        let report = recommendations_report(&keywords);

        assert_eq!(report.summary.total_keywords, 2);
        assert!((report.summary.total_monthly_budget - 300.0).abs() < 1e-9);
        assert!((report.summary.average_cpc - 3.0).abs() < 1e-9);
        // 300 budget / 4 conversions
        assert!((report.summary.projected_average_cpa - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_performance_breakdown_buckets() {
        let keywords = vec![
            optimized_keyword("high", 85.0, 2.0, 10.0),
            optimized_keyword("medium", 55.0, 2.0, 10.0),
            optimized_keyword("low", 20.0, 2.0, 10.0),
        ];
        let report = recommendations_report(&keywords);
        assert_eq!(report.performance_breakdown.high_performers, 1);
        assert_eq!(report.performance_breakdown.medium_performers, 1);
        assert_eq!(report.performance_breakdown.low_performers, 1);
    }

    #[test]
    fn test_top_opportunities_ranked_and_capped() {
        let keywords: Vec<Keyword> = (0..15)
            .map(|i| optimized_keyword(&format!("kw {i}"), i as f64 * 5.0, 2.0, 10.0))
            .collect();
        let report = recommendations_report(&keywords);
        assert_eq!(report.top_opportunities.len(), 10);
        assert_eq!(report.top_opportunities[0].text, "kw 14");
    }

    #[test]
    fn test_priorities_flag_low_competition_opportunities() {
        let keywords = vec![optimized_keyword("gem", 90.0, 2.0, 10.0)];
        let report = recommendations_report(&keywords);
        assert!(report
            .optimization_priorities
            .iter()
            .any(|p| p.contains("low-competition")));
    }
}
