//! Campaign assembly — Search, Shopping, and Performance Max structures
//! built from scored, clustered, bid-optimized keywords, plus the pipeline
//! orchestrator tying all stages together.

pub mod performance_max;
pub mod pipeline;
pub mod search;
pub mod shopping;

use serde::{Deserialize, Serialize};

pub use performance_max::{build_performance_max, generate_themes, PerformanceMaxCampaign};
pub use pipeline::{CampaignPlan, CampaignPlanner};
pub use search::{build_search_campaign, SearchCampaign};
pub use shopping::{build_shopping_campaign, ShoppingCampaign};

/// The three independent campaign structures the assembler produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignType {
    Search,
    Shopping,
    PerformanceMax,
}

impl std::fmt::Display for CampaignType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CampaignType::Search => "Search",
            CampaignType::Shopping => "Shopping",
            CampaignType::PerformanceMax => "Performance Max",
        };
        f.write_str(name)
    }
}

/// Days used to derive a daily budget from a monthly one.
pub(crate) const DAYS_PER_MONTH: f64 = 30.0;

pub(crate) fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
