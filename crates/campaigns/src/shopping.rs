//! Shopping campaign structure with a blended CPC recommendation ladder.

use std::collections::HashSet;

use sem_core::types::{round1, round2, Keyword};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{title_case, CampaignType, DAYS_PER_MONTH};

/// Commercial-term allowlist for shopping keyword selection.
const SHOPPING_TERMS: [&str; 8] = [
    "buy", "purchase", "product", "shop", "price", "cost", "cheap", "deal",
];

/// Channel discount: Shopping CPCs typically run 10–20% below Search.
const SHOPPING_CPC_MODIFIER: f64 = 0.85;

/// Words too generic to suggest as product groups.
const PRODUCT_GROUP_STOPLIST: [&str; 5] = ["best", "cheap", "professional", "buy", "purchase"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingCampaign {
    pub campaign_id: Uuid,
    pub campaign_type: CampaignType,
    pub campaign_name: String,
    pub total_budget: f64,
    pub daily_budget: f64,
    pub settings: ShoppingSettings,
    pub bid_recommendations: ShoppingBids,
    pub targeting_keywords: Vec<String>,
    pub product_group_suggestions: Vec<String>,
    pub performance_projections: ShoppingProjections,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingSettings {
    pub campaign_subtype: String,
    pub priority: String,
    pub merchant_center_required: bool,
    pub product_feed_required: bool,
    pub bidding_strategy: String,
}

impl Default for ShoppingSettings {
    fn default() -> Self {
        Self {
            campaign_subtype: "Standard Shopping".into(),
            priority: "Medium".into(),
            merchant_center_required: true,
            product_feed_required: true,
            bidding_strategy: "Manual CPC".into(),
        }
    }
}

/// Starting/target/max CPC ladder around the blended target.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShoppingBids {
    pub starting_cpc: f64,
    pub target_cpc: f64,
    pub max_cpc: f64,
    pub bid_adjustment_strategy: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShoppingProjections {
    pub estimated_monthly_clicks: f64,
    pub estimated_monthly_conversions: f64,
    pub estimated_cpa: f64,
    pub target_roas: String,
    pub break_even_roas: f64,
}

/// Assemble the Shopping campaign from the optimized keyword pool. Keywords
/// matching the commercial allowlist drive the blended CPC; when none match,
/// the top 20 keywords overall stand in. An empty pool produces an empty
/// campaign with zeroed bids.
pub fn build_shopping_campaign(
    keywords: &[Keyword],
    shopping_budget: f64,
    conversion_rate: f64,
    target_roas: f64,
    average_order_value: f64,
    stamp: &str,
) -> ShoppingCampaign {
    let mut shopping_keywords: Vec<&Keyword> = keywords
        .iter()
        .filter(|kw| {
            let text = kw.normalized();
            SHOPPING_TERMS.iter().any(|term| text.contains(term))
        })
        .collect();
    if shopping_keywords.is_empty() {
        shopping_keywords = keywords.iter().take(20).collect();
    }

    let target_cpc = blended_target_cpc(&shopping_keywords);

    let estimated_clicks = if target_cpc > 0.0 {
        shopping_budget / target_cpc
    } else {
        0.0
    };
    let estimated_conversions = estimated_clicks * conversion_rate;
    let estimated_cpa = if estimated_conversions > 0.0 {
        round2(shopping_budget / estimated_conversions)
    } else {
        0.0
    };
    let break_even_roas = if average_order_value > 0.0 {
        round1((1.0 / conversion_rate) * (target_cpc / average_order_value))
    } else {
        0.0
    };

    ShoppingCampaign {
        campaign_id: Uuid::new_v4(),
        campaign_type: CampaignType::Shopping,
        campaign_name: format!("Shopping Campaign - {stamp}"),
        total_budget: shopping_budget,
        daily_budget: round2(shopping_budget / DAYS_PER_MONTH),
        settings: ShoppingSettings::default(),
        bid_recommendations: ShoppingBids {
            // Start conservative, leave headroom at the top.
            starting_cpc: round2(target_cpc * 0.8),
            target_cpc: round2(target_cpc),
            max_cpc: round2(target_cpc * 1.3),
            bid_adjustment_strategy: "Performance-based optimization".into(),
        },
        targeting_keywords: shopping_keywords
            .iter()
            .take(15)
            .map(|kw| kw.text.clone())
            .collect(),
        product_group_suggestions: product_groups(&shopping_keywords),
        performance_projections: ShoppingProjections {
            estimated_monthly_clicks: estimated_clicks.round(),
            estimated_monthly_conversions: round1(estimated_conversions),
            estimated_cpa,
            target_roas: format!("{target_roas:.0}%"),
            break_even_roas,
        },
    }
}

/// Market average CPC discounted for the Shopping channel and nudged by the
/// pool's average performance score (±10%/20% at >=80 / <=40).
fn blended_target_cpc(keywords: &[&Keyword]) -> f64 {
    if keywords.is_empty() {
        return 0.0;
    }
    let count = keywords.len() as f64;

    let avg_market_cpc: f64 = keywords
        .iter()
        .map(|kw| (kw.low_bid + kw.high_bid) / 2.0)
        .sum::<f64>()
        / count;
    let avg_score: f64 = keywords.iter().map(|kw| kw.performance_score).sum::<f64>() / count;

    let mut target_cpc = avg_market_cpc * SHOPPING_CPC_MODIFIER;
    if avg_score >= 80.0 {
        target_cpc *= 1.1;
    } else if avg_score <= 40.0 {
        target_cpc *= 0.8;
    }
    target_cpc
}

/// Product group candidates from the keyword vocabulary: first-seen order,
/// generic terms removed, capped at ten.
fn product_groups(keywords: &[&Keyword]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut groups = Vec::new();

    for kw in keywords {
        for word in kw.normalized().split_whitespace() {
            if word.len() <= 3 || PRODUCT_GROUP_STOPLIST.contains(&word) {
                continue;
            }
            if seen.insert(word.to_string()) {
                groups.push(title_case(word));
            }
            if groups.len() >= 10 {
                return groups;
            }
        }
    }
    groups
}
