use serde::{Deserialize, Serialize};

/// Raw keyword record as delivered by a keyword source. Missing numeric
/// fields default to 0 rather than failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRecord {
    pub keyword: String,
    #[serde(default)]
    pub avg_monthly_searches: u64,
    #[serde(default)]
    pub competition: String,
    #[serde(default)]
    pub competition_index: u32,
    #[serde(default)]
    pub low_top_page_bid: f64,
    #[serde(default)]
    pub high_top_page_bid: f64,
    #[serde(default)]
    pub data_source: String,
}

/// A keyword inside the planning pipeline. The ingestion fields are fixed at
/// construction; the derived fields are filled in by the pipeline stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keyword {
    pub text: String,
    pub monthly_searches: u64,
    /// Market competition on a 0–100 scale.
    pub competition_index: u32,
    pub low_bid: f64,
    pub high_bid: f64,
    /// Provenance tag, informational only.
    pub source: String,
    /// Composite 0–100 score assigned by the scorer.
    #[serde(default)]
    pub performance_score: f64,
    #[serde(default)]
    pub intent: Intent,
    /// Bid recommendation, present once the optimizer has run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bid: Option<BidRecommendation>,
}

impl Keyword {
    pub fn from_record(record: KeywordRecord) -> Self {
        Self {
            text: record.keyword.trim().to_string(),
            monthly_searches: record.avg_monthly_searches,
            competition_index: record.competition_index.min(100),
            low_bid: record.low_top_page_bid.max(0.0),
            high_bid: record.high_top_page_bid.max(0.0),
            source: record.data_source,
            performance_score: 0.0,
            intent: Intent::General,
            bid: None,
        }
    }

    /// Canonical form used for deduplication and text matching.
    pub fn normalized(&self) -> String {
        self.text.trim().to_lowercase()
    }

    /// Average of the low and high top-of-page bids, or 1.0 when either side
    /// of the range is missing.
    pub fn avg_market_cpc(&self) -> f64 {
        if self.low_bid > 0.0 && self.high_bid > 0.0 {
            (self.low_bid + self.high_bid) / 2.0
        } else {
            1.0
        }
    }
}

/// Search intent categories. The declared order doubles as the tie-break
/// order during classification.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Brand,
    Competitor,
    Commercial,
    Informational,
    Local,
    Transactional,
    #[default]
    General,
}

impl Intent {
    /// Categories with classification patterns, in tie-break order.
    pub const CLASSIFIED: [Intent; 6] = [
        Intent::Brand,
        Intent::Competitor,
        Intent::Commercial,
        Intent::Informational,
        Intent::Local,
        Intent::Transactional,
    ];
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Intent::Brand => "Brand",
            Intent::Competitor => "Competitor",
            Intent::Commercial => "Commercial",
            Intent::Informational => "Informational",
            Intent::Local => "Local",
            Intent::Transactional => "Transactional",
            Intent::General => "General",
        };
        f.write_str(name)
    }
}

/// A named cluster of same-intent, lexically similar keywords. Created once
/// by the clusterer and consumed read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdGroup {
    pub name: String,
    pub intent: Intent,
    pub keywords: Vec<Keyword>,
    pub avg_search_volume: f64,
    pub avg_competition: f64,
    /// Pre-normalization score used by the budget allocator.
    pub allocation_weight: f64,
}

/// Whether a keyword's projections fit inside the available budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetUtilization {
    Full,
    Constrained,
}

/// Reporting-only bid strategy bucket derived from performance and
/// competition. Has no control-flow effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidStrategy {
    Aggressive,
    Moderate,
    Conservative,
    Cautious,
    LowPriority,
}

impl std::fmt::Display for BidStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BidStrategy::Aggressive => "Aggressive - High performance, low competition",
            BidStrategy::Moderate => "Moderate - Good performance, medium competition",
            BidStrategy::Conservative => "Conservative - Average performance",
            BidStrategy::Cautious => "Cautious - High competition market",
            BidStrategy::LowPriority => "Low priority - Poor performance indicators",
        };
        f.write_str(label)
    }
}

/// Monthly click/conversion/cost projections for one keyword.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BidProjections {
    pub monthly_clicks: f64,
    pub monthly_conversions: f64,
    pub monthly_cost: f64,
    pub projected_cpa: f64,
}

/// Full bid recommendation attached to a keyword by the optimizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidRecommendation {
    pub optimized_cpc: f64,
    pub market_avg_cpc: f64,
    pub theoretical_max_cpc: f64,
    pub strategy: BidStrategy,
    pub projections: BidProjections,
    pub optimization_notes: String,
    pub budget_allocation: f64,
    pub utilization: BudgetUtilization,
}

/// Round to two decimals (currency amounts and scores).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to one decimal (conversion counts in reports).
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
