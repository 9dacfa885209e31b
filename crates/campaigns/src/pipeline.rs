//! End-to-end planning pipeline: raw keyword records in, three campaign
//! structures plus a bid report out.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::Utc;
use sem_analysis::{filter_keywords, group_by_intent, Clusterer, IntentMatcher, RuleBasedMatcher};
use sem_bidding::{recommendations_report, BidOptimizer, BidReport};
use sem_core::config::PlannerConfig;
use sem_core::error::{PlannerError, PlannerResult};
use sem_core::types::{Keyword, KeywordRecord};
use serde::Serialize;
use tracing::info;

use crate::performance_max::{build_performance_max, generate_themes, PerformanceMaxCampaign};
use crate::search::{build_search_campaign, SearchCampaign};
use crate::shopping::{build_shopping_campaign, ShoppingCampaign};

/// The full output of one planning run.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignPlan {
    pub search: SearchCampaign,
    pub shopping: ShoppingCampaign,
    pub performance_max: PerformanceMaxCampaign,
    /// Every keyword that survived filtering, with score, intent, and bid
    /// recommendation attached, sorted by performance score descending.
    pub keywords: Vec<Keyword>,
    pub report: BidReport,
}

/// Orchestrates the analysis and assembly stages. The intent matcher and
/// clusterer are swappable; the defaults match production behavior.
pub struct CampaignPlanner {
    config: PlannerConfig,
    matcher: Box<dyn IntentMatcher>,
    clusterer: Clusterer,
}

impl CampaignPlanner {
    /// Rejects invalid configuration up front so the pipeline stages can
    /// assume sane parameters.
    pub fn new(config: PlannerConfig) -> PlannerResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            matcher: Box::new(RuleBasedMatcher::new()),
            clusterer: Clusterer::new(),
        })
    }

    pub fn with_matcher(mut self, matcher: Box<dyn IntentMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_clusterer(mut self, clusterer: Clusterer) -> Self {
        self.clusterer = clusterer;
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Run the full pipeline over raw keyword records. Duplicate keyword
    /// texts keep their first occurrence. Records that all fail the filter
    /// still produce a valid plan with empty campaigns.
    pub fn build_plan(&self, records: Vec<KeywordRecord>) -> PlannerResult<CampaignPlan> {
        if records.is_empty() {
            return Err(PlannerError::Input("no keyword records provided".into()));
        }

        let keywords = dedupe(records);
        info!(count = keywords.len(), "Normalized keyword records");

        let filtered = filter_keywords(keywords, &self.config.filters);

        let business = &self.config.business;
        let optimizer = BidOptimizer::new(business.conversion_rate, business.target_roas)?;
        let optimized = optimizer.optimize_bids(
            filtered,
            self.config.budget.total,
            business.average_order_value,
            business.profit_margin,
        );

        let buckets = group_by_intent(optimized, self.matcher.as_ref());

        let mut pool: Vec<Keyword> = buckets.values().flatten().cloned().collect();
        pool.sort_by(|a, b| {
            b.performance_score
                .partial_cmp(&a.performance_score)
                .unwrap_or(Ordering::Equal)
        });

        let ad_groups = self.clusterer.build_ad_groups(buckets.clone());
        info!(
            keywords = pool.len(),
            ad_groups = ad_groups.len(),
            "Analysis stages complete"
        );

        let stamp = Utc::now().format("%Y%m%d").to_string();
        let budget = &self.config.budget;

        let search = build_search_campaign(
            &ad_groups,
            budget.search_ads,
            business.conversion_rate,
            business.average_order_value,
            &stamp,
        );
        let shopping = build_shopping_campaign(
            &pool,
            budget.shopping_ads,
            business.conversion_rate,
            business.target_roas,
            business.average_order_value,
            &stamp,
        );
        let performance_max = build_performance_max(
            generate_themes(&buckets),
            budget.performance_max,
            business.target_roas,
            &stamp,
        );

        let report = recommendations_report(&pool);
        info!(
            search_groups = search.ad_groups.len(),
            pmax_groups = performance_max.asset_groups.len(),
            "Campaign plan assembled"
        );

        Ok(CampaignPlan {
            search,
            shopping,
            performance_max,
            keywords: pool,
            report,
        })
    }
}

/// First occurrence wins on duplicate keyword texts after normalization.
fn dedupe(records: Vec<KeywordRecord>) -> Vec<Keyword> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .map(Keyword::from_record)
        .filter(|kw| !kw.text.is_empty() && seen.insert(kw.normalized()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str, searches: u64, competition: u32, low: f64, high: f64) -> KeywordRecord {
        KeywordRecord {
            keyword: text.into(),
            avg_monthly_searches: searches,
            competition: String::new(),
            competition_index: competition,
            low_top_page_bid: low,
            high_top_page_bid: high,
            data_source: "test".into(),
        }
    }

    fn sample_records() -> Vec<KeywordRecord> {
        vec![
            record("buy crm software", 3_000, 40, 2.0, 4.0),
            record("buy crm platform", 2_500, 45, 2.0, 4.5),
            record("buy crm tools", 2_000, 35, 1.5, 3.5),
            record("what is crm software", 5_000, 20, 0.5, 1.5),
            record("what is crm platform", 4_000, 25, 0.5, 1.5),
            record("what is crm automation", 3_500, 25, 0.6, 1.4),
            record("crm near me", 800, 30, 1.0, 2.0),
        ]
    }

    // 1. Construction -------------------------------------------------------

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let mut config = PlannerConfig::default();
        config.business.conversion_rate = 0.0;
        assert!(CampaignPlanner::new(config).is_err());
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let planner = CampaignPlanner::new(PlannerConfig::default()).unwrap();
        assert!(matches!(
            planner.build_plan(Vec::new()),
            Err(PlannerError::Input(_))
        ));
    }

    // 2. Full pipeline ------------------------------------------------------

    #[test]
    fn test_plan_produces_all_three_campaigns() {
        let planner = CampaignPlanner::new(PlannerConfig::default()).unwrap();
        let plan = planner.build_plan(sample_records()).unwrap();

        assert!(!plan.keywords.is_empty());
        assert!(!plan.search.ad_groups.is_empty());
        assert!(!plan.shopping.targeting_keywords.is_empty());
        assert!(!plan.performance_max.asset_groups.is_empty());
        assert_eq!(plan.report.summary.total_keywords, plan.keywords.len());
    }

    #[test]
    fn test_keywords_sorted_by_score_and_carry_bids() {
        let planner = CampaignPlanner::new(PlannerConfig::default()).unwrap();
        let plan = planner.build_plan(sample_records()).unwrap();

        for pair in plan.keywords.windows(2) {
            assert!(pair[0].performance_score >= pair[1].performance_score);
        }
        assert!(plan.keywords.iter().all(|kw| kw.bid.is_some()));
    }

    #[test]
    fn test_duplicate_records_keep_first_occurrence() {
        let mut records = sample_records();
        records.push(record("Buy CRM Software", 9_999, 10, 9.0, 9.5));
        let planner = CampaignPlanner::new(PlannerConfig::default()).unwrap();
        let plan = planner.build_plan(records).unwrap();

        let kw = plan
            .keywords
            .iter()
            .find(|kw| kw.normalized() == "buy crm software")
            .unwrap();
        assert_eq!(kw.monthly_searches, 3_000);
    }

    #[test]
    fn test_all_filtered_out_still_yields_a_plan() {
        let mut config = PlannerConfig::default();
        config.filters.min_search_volume = 1_000_000;
        let planner = CampaignPlanner::new(config).unwrap();
        let plan = planner.build_plan(sample_records()).unwrap();

        assert!(plan.keywords.is_empty());
        assert!(plan.search.ad_groups.is_empty());
        assert!(plan.performance_max.asset_groups.is_empty());
        assert_eq!(plan.report.summary.total_keywords, 0);
    }
}
