//! Bounded CPC optimization with multiplicative step adjustments and
//! budget-constrained reallocation.

use sem_core::error::{PlannerError, PlannerResult};
use sem_core::types::{
    round1, round2, BidProjections, BidRecommendation, BidStrategy, BudgetUtilization, Keyword,
};
use tracing::{debug, info};

use crate::allocator::split_proportionally;

const MIN_BID: f64 = 0.25;

/// Assumed click-through rate for the impression-share click model.
const BASE_CTR: f64 = 0.02;

/// Ordered step tables: first row whose threshold the metric reaches wins,
/// with a floor factor below the last threshold. Kept as data so each factor
/// is auditable and testable on its own.
const PERFORMANCE_STEPS: [(f64, f64); 5] = [
    (90.0, 1.15),
    (80.0, 1.10),
    (70.0, 1.05),
    (50.0, 1.00),
    (30.0, 0.90),
];
const PERFORMANCE_FLOOR: f64 = 0.80;

/// Competition steps read upward: index at or below the threshold wins.
const COMPETITION_STEPS: [(f64, f64); 4] = [
    (20.0, 0.85),
    (40.0, 0.95),
    (60.0, 1.00),
    (80.0, 1.05),
];
const COMPETITION_CEILING: f64 = 1.10;

const VOLUME_STEPS: [(f64, f64); 4] = [
    (10_000.0, 1.05),
    (5_000.0, 1.02),
    (1_000.0, 1.00),
    (500.0, 0.98),
];
const VOLUME_FLOOR: f64 = 0.95;

/// Impression share won at a given bid-to-market ratio.
const IMPRESSION_SHARE_STEPS: [(f64, f64); 3] = [(1.2, 0.8), (1.0, 0.6), (0.8, 0.4)];
const IMPRESSION_SHARE_FLOOR: f64 = 0.2;

fn step_at_least(steps: &[(f64, f64)], floor: f64, value: f64) -> f64 {
    steps
        .iter()
        .find(|(threshold, _)| value >= *threshold)
        .map(|(_, factor)| *factor)
        .unwrap_or(floor)
}

fn step_at_most(steps: &[(f64, f64)], ceiling: f64, value: f64) -> f64 {
    steps
        .iter()
        .find(|(threshold, _)| value <= *threshold)
        .map(|(_, factor)| *factor)
        .unwrap_or(ceiling)
}

/// Computes bounded per-keyword CPC recommendations and reconciles the
/// resulting projections with the available budget.
#[derive(Debug, Clone)]
pub struct BidOptimizer {
    conversion_rate: f64,
    target_roas: f64,
}

impl BidOptimizer {
    /// Business parameters are validated here so every downstream division
    /// is safe.
    pub fn new(conversion_rate: f64, target_roas: f64) -> PlannerResult<Self> {
        if conversion_rate <= 0.0 || conversion_rate > 1.0 {
            return Err(PlannerError::Config(format!(
                "conversion_rate must be in (0, 1], got {conversion_rate}"
            )));
        }
        if target_roas <= 0.0 {
            return Err(PlannerError::Config(format!(
                "target_roas must be positive, got {target_roas}"
            )));
        }
        Ok(Self {
            conversion_rate,
            target_roas,
        })
    }

    pub fn conversion_rate(&self) -> f64 {
        self.conversion_rate
    }

    /// Target cost per acquisition from order value, margin, and ROAS goal.
    pub fn target_cpa(&self, avg_order_value: f64, profit_margin: f64) -> f64 {
        round2(avg_order_value * profit_margin * (self.target_roas / 100.0) / 100.0)
    }

    /// Highest CPC that still meets the target CPA at the expected
    /// conversion rate.
    pub fn theoretical_max_cpc(&self, target_cpa: f64) -> f64 {
        round2(target_cpa * self.conversion_rate)
    }

    pub fn performance_multiplier(score: f64) -> f64 {
        step_at_least(&PERFORMANCE_STEPS, PERFORMANCE_FLOOR, score)
    }

    pub fn competition_multiplier(index: f64) -> f64 {
        step_at_most(&COMPETITION_STEPS, COMPETITION_CEILING, index)
    }

    pub fn volume_multiplier(searches: f64) -> f64 {
        step_at_least(&VOLUME_STEPS, VOLUME_FLOOR, searches)
    }

    pub fn impression_share(bid_ratio: f64) -> f64 {
        step_at_least(&IMPRESSION_SHARE_STEPS, IMPRESSION_SHARE_FLOOR, bid_ratio)
    }

    /// Reporting-only strategy bucket from performance and competition.
    pub fn bid_strategy(score: f64, competition_index: f64) -> BidStrategy {
        if score >= 80.0 && competition_index <= 40.0 {
            BidStrategy::Aggressive
        } else if score >= 70.0 && competition_index <= 60.0 {
            BidStrategy::Moderate
        } else if score >= 50.0 {
            BidStrategy::Conservative
        } else if competition_index >= 80.0 {
            BidStrategy::Cautious
        } else {
            BidStrategy::LowPriority
        }
    }

    /// Attach a bid recommendation to every keyword, then reconcile the
    /// total projected spend with `total_budget`.
    pub fn optimize_bids(
        &self,
        mut keywords: Vec<Keyword>,
        total_budget: f64,
        avg_order_value: f64,
        profit_margin: f64,
    ) -> Vec<Keyword> {
        let target_cpa = self.target_cpa(avg_order_value, profit_margin);
        let theoretical_max = self.theoretical_max_cpc(target_cpa);
        debug!(target_cpa, theoretical_max, "Bid ceiling parameters");

        for kw in &mut keywords {
            kw.bid = Some(self.recommend(kw, theoretical_max));
        }

        self.reconcile_budget(&mut keywords, total_budget);
        keywords
    }

    fn recommend(&self, kw: &Keyword, theoretical_max: f64) -> BidRecommendation {
        let market_cpc = kw.avg_market_cpc();
        let base_bid = market_cpc.min(theoretical_max);

        let adjusted = base_bid
            * Self::performance_multiplier(kw.performance_score)
            * Self::competition_multiplier(kw.competition_index as f64)
            * Self::volume_multiplier(kw.monthly_searches as f64);

        let max_bid = if kw.high_bid > 0.0 {
            (theoretical_max * 1.2).min(kw.high_bid * 1.1)
        } else {
            theoretical_max
        };
        let optimized_cpc = round2(adjusted.min(max_bid)).max(MIN_BID);

        let projections = self.project(kw, optimized_cpc, market_cpc);
        let strategy = Self::bid_strategy(kw.performance_score, kw.competition_index as f64);
        let notes = Self::optimization_notes(
            kw.performance_score,
            kw.competition_index as f64,
            optimized_cpc,
            market_cpc,
        );

        BidRecommendation {
            optimized_cpc,
            market_avg_cpc: round2(market_cpc),
            theoretical_max_cpc: theoretical_max,
            strategy,
            projections,
            optimization_notes: notes,
            // Filled in by reconciliation.
            budget_allocation: 0.0,
            utilization: BudgetUtilization::Full,
        }
    }

    fn project(&self, kw: &Keyword, bid: f64, market_cpc: f64) -> BidProjections {
        let market_cpc = if market_cpc > 0.0 { market_cpc } else { 1.0 };
        let share = Self::impression_share(bid / market_cpc);

        let clicks = kw.monthly_searches as f64 * share * BASE_CTR;
        let conversions = clicks * self.conversion_rate;
        let cost = clicks * bid;
        let cpa = if conversions > 0.0 {
            cost / conversions
        } else {
            0.0
        };

        BidProjections {
            monthly_clicks: clicks.round(),
            monthly_conversions: round1(conversions),
            monthly_cost: round2(cost),
            projected_cpa: round2(cpa),
        }
    }

    fn optimization_notes(score: f64, competition: f64, bid: f64, market_cpc: f64) -> String {
        let mut notes = Vec::new();

        if bid > market_cpc * 1.1 {
            notes.push("Bidding above market average for competitive advantage");
        } else if bid < market_cpc * 0.9 {
            notes.push("Conservative bid to maintain profitability");
        }
        if score >= 80.0 {
            notes.push("High-performing keyword - monitor closely");
        } else if score <= 40.0 {
            notes.push("Low performance - consider for optimization or removal");
        }
        if competition >= 80.0 {
            notes.push("High competition - expect higher CPCs");
        }

        if notes.is_empty() {
            "Standard optimization applied".to_string()
        } else {
            notes.join("; ")
        }
    }

    /// Full mode: every keyword keeps its projected cost as its allocation.
    /// Constrained mode: the budget is split by performance score and only
    /// the projected volume is rescaled — bids never change here.
    fn reconcile_budget(&self, keywords: &mut [Keyword], total_budget: f64) {
        let total_cost: f64 = keywords
            .iter()
            .filter_map(|kw| kw.bid.as_ref())
            .map(|bid| bid.projections.monthly_cost)
            .sum();

        if total_cost <= total_budget {
            for kw in keywords.iter_mut() {
                if let Some(bid) = kw.bid.as_mut() {
                    bid.budget_allocation = bid.projections.monthly_cost;
                    bid.utilization = BudgetUtilization::Full;
                }
            }
            info!(
                projected_cost = round2(total_cost),
                total_budget, "Budget sufficient for projected spend"
            );
            return;
        }

        let scores: Vec<f64> = keywords.iter().map(|kw| kw.performance_score).collect();
        let allocations = split_proportionally(total_budget, &scores);

        for (kw, allocation) in keywords.iter_mut().zip(allocations) {
            if let Some(bid) = kw.bid.as_mut() {
                bid.budget_allocation = allocation;
                bid.utilization = BudgetUtilization::Constrained;

                let clicks = allocation / bid.optimized_cpc;
                let conversions = clicks * self.conversion_rate;
                bid.projections.monthly_clicks = clicks.round();
                bid.projections.monthly_conversions = round1(conversions);
                bid.projections.monthly_cost = allocation;
                bid.projections.projected_cpa = if conversions > 0.0 {
                    round2(allocation / conversions)
                } else {
                    0.0
                };
            }
        }
        info!(
            projected_cost = round2(total_cost),
            total_budget, "Budget constrained, reallocated by performance"
        );
    }
}
