//! Search campaign structure with per-ad-group budget allocation and
//! projections.

use sem_bidding::allocator::split_proportionally;
use sem_core::types::{round1, round2, AdGroup, Intent, Keyword};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{title_case, CampaignType, DAYS_PER_MONTH};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCampaign {
    pub campaign_id: Uuid,
    pub campaign_type: CampaignType,
    pub campaign_name: String,
    pub total_budget: f64,
    pub daily_budget: f64,
    pub settings: SearchSettings,
    pub ad_groups: Vec<SearchAdGroup>,
    pub performance_projections: SearchProjections,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    pub network: String,
    pub location_targeting: String,
    pub language_targeting: String,
    pub bidding_strategy: String,
    pub conversion_tracking: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            network: "Google Search".into(),
            location_targeting: "As specified in input".into(),
            language_targeting: "English".into(),
            bidding_strategy: "Manual CPC".into(),
            conversion_tracking: "Required".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchAdGroup {
    pub ad_group_name: String,
    pub intent: Intent,
    pub allocated_budget: f64,
    pub daily_budget: f64,
    pub keywords: Vec<SearchKeyword>,
    pub keyword_count: usize,
    pub avg_search_volume: f64,
    pub avg_competition: f64,
    pub recommended_ads: Vec<AdCopy>,
    pub projections: AdGroupProjections,
}

/// A keyword row in a Search ad group, carrying its suggested match types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchKeyword {
    pub keyword: String,
    pub match_types: Vec<MatchType>,
    pub monthly_searches: u64,
    pub suggested_cpc: f64,
    pub performance_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Exact,
    Phrase,
    BroadMatchModifier,
}

/// Match types widen as keywords get shorter.
pub fn suggest_match_types(keyword: &str) -> Vec<MatchType> {
    match keyword.split_whitespace().count() {
        0 | 1 => vec![MatchType::Phrase, MatchType::BroadMatchModifier],
        2 => vec![
            MatchType::Exact,
            MatchType::Phrase,
            MatchType::BroadMatchModifier,
        ],
        _ => vec![MatchType::Exact, MatchType::Phrase],
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdCopy {
    pub headline_1: String,
    pub headline_2: String,
    pub description: String,
    pub ad_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdGroupProjections {
    pub estimated_monthly_clicks: f64,
    pub estimated_monthly_conversions: f64,
    pub estimated_cpa: f64,
    pub avg_cpc: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchProjections {
    pub estimated_monthly_clicks: f64,
    pub estimated_monthly_conversions: f64,
    pub estimated_overall_cpa: f64,
    pub projected_roas: f64,
}

/// Assemble the Search campaign: budget split across groups proportional to
/// their allocation weights, per-group projections capped at 10% of group
/// search volume. An empty group list yields an empty campaign, which is a
/// valid outcome.
pub fn build_search_campaign(
    ad_groups: &[AdGroup],
    search_budget: f64,
    conversion_rate: f64,
    average_order_value: f64,
    stamp: &str,
) -> SearchCampaign {
    let weights: Vec<f64> = ad_groups.iter().map(|g| g.allocation_weight).collect();
    let allocations = split_proportionally(search_budget, &weights);

    let groups: Vec<SearchAdGroup> = ad_groups
        .iter()
        .zip(allocations)
        .map(|(group, allocated)| build_ad_group(group, allocated, conversion_rate))
        .collect();

    let total_clicks: f64 = groups
        .iter()
        .map(|g| g.projections.estimated_monthly_clicks)
        .sum();
    let total_conversions: f64 = groups
        .iter()
        .map(|g| g.projections.estimated_monthly_conversions)
        .sum();

    let overall_cpa = if total_conversions > 0.0 {
        round2(search_budget / total_conversions)
    } else {
        0.0
    };
    let projected_roas = if search_budget > 0.0 {
        round1(total_conversions * average_order_value / search_budget)
    } else {
        0.0
    };

    SearchCampaign {
        campaign_id: Uuid::new_v4(),
        campaign_type: CampaignType::Search,
        campaign_name: format!("Search Campaign - {stamp}"),
        total_budget: search_budget,
        daily_budget: round2(search_budget / DAYS_PER_MONTH),
        settings: SearchSettings::default(),
        ad_groups: groups,
        performance_projections: SearchProjections {
            estimated_monthly_clicks: total_clicks,
            estimated_monthly_conversions: round1(total_conversions),
            estimated_overall_cpa: overall_cpa,
            projected_roas,
        },
    }
}

fn build_ad_group(group: &AdGroup, allocated: f64, conversion_rate: f64) -> SearchAdGroup {
    let keywords: Vec<SearchKeyword> = group
        .keywords
        .iter()
        .map(|kw| SearchKeyword {
            keyword: kw.text.clone(),
            match_types: suggest_match_types(&kw.text),
            monthly_searches: kw.monthly_searches,
            suggested_cpc: suggested_cpc(kw),
            performance_score: kw.performance_score,
        })
        .collect();

    let avg_cpc = if keywords.is_empty() {
        0.0
    } else {
        keywords.iter().map(|kw| kw.suggested_cpc).sum::<f64>() / keywords.len() as f64
    };

    let total_volume: u64 = group.keywords.iter().map(|kw| kw.monthly_searches).sum();
    let estimated_clicks = if avg_cpc > 0.0 {
        // Cap at 10% of group search volume so a cheap CPC cannot project
        // more clicks than the market can supply.
        (allocated / avg_cpc).min(total_volume as f64 * 0.1)
    } else {
        0.0
    };
    let estimated_conversions = estimated_clicks * conversion_rate;
    let estimated_cpa = if estimated_conversions > 0.0 {
        round2(allocated / estimated_conversions)
    } else {
        0.0
    };

    SearchAdGroup {
        ad_group_name: group.name.clone(),
        intent: group.intent,
        allocated_budget: allocated,
        daily_budget: round2(allocated / DAYS_PER_MONTH),
        keyword_count: keywords.len(),
        recommended_ads: recommend_ads(group),
        keywords,
        avg_search_volume: group.avg_search_volume.round(),
        avg_competition: round1(group.avg_competition),
        projections: AdGroupProjections {
            estimated_monthly_clicks: estimated_clicks.round(),
            estimated_monthly_conversions: round1(estimated_conversions),
            estimated_cpa,
            avg_cpc: round2(avg_cpc),
        },
    }
}

fn suggested_cpc(kw: &Keyword) -> f64 {
    match kw.bid.as_ref() {
        Some(bid) => bid.optimized_cpc,
        None => round2(kw.avg_market_cpc()),
    }
}

/// Responsive search ad suggestions themed by the group's intent, built
/// around the group's top-scoring keyword.
fn recommend_ads(group: &AdGroup) -> Vec<AdCopy> {
    let top = group
        .keywords
        .iter()
        .max_by(|a, b| {
            a.performance_score
                .partial_cmp(&b.performance_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|kw| title_case(&kw.text))
        .unwrap_or_default();
    let ad_type = "Responsive Search Ad".to_string();

    match group.intent {
        Intent::Commercial => vec![
            AdCopy {
                headline_1: format!("Best {top}"),
                headline_2: "Compare Prices & Save".into(),
                description: "Find the perfect solution for your needs. Free quotes available."
                    .into(),
                ad_type: ad_type.clone(),
            },
            AdCopy {
                headline_1: format!("Professional {top}"),
                headline_2: "Get Started Today".into(),
                description: "Trusted by thousands. See why customers choose us.".into(),
                ad_type,
            },
        ],
        Intent::Informational => vec![AdCopy {
            headline_1: format!("Learn About {top}"),
            headline_2: "Free Expert Guide".into(),
            description: "Everything you need to know. Download our comprehensive guide.".into(),
            ad_type,
        }],
        Intent::Local => vec![AdCopy {
            headline_1: format!("Local {top}"),
            headline_2: "Near You".into(),
            description: "Serving your area with professional service. Call now for quote.".into(),
            ad_type,
        }],
        _ => vec![AdCopy {
            headline_1: top,
            headline_2: "Quality Service".into(),
            description: "Professional solutions tailored to your needs.".into(),
            ad_type,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sem_core::types::KeywordRecord;

    fn keyword(text: &str, searches: u64, score: f64) -> Keyword {
        let mut kw = Keyword::from_record(KeywordRecord {
            keyword: text.into(),
            avg_monthly_searches: searches,
            competition: String::new(),
            competition_index: 40,
            low_top_page_bid: 1.0,
            high_top_page_bid: 3.0,
            data_source: "test".into(),
        });
        kw.performance_score = score;
        kw
    }

    fn ad_group(name: &str, weight: f64, keywords: Vec<Keyword>) -> AdGroup {
        let count = keywords.len().max(1) as f64;
        AdGroup {
            name: name.into(),
            intent: Intent::Commercial,
            avg_search_volume: keywords.iter().map(|k| k.monthly_searches).sum::<u64>() as f64
                / count,
            avg_competition: 40.0,
            allocation_weight: weight,
            keywords,
        }
    }

    // 1. Budget conservation ------------------------------------------------

    #[test]
    fn test_group_budgets_sum_to_campaign_budget() {
        let groups = vec![
            ad_group("A", 30.0, vec![keyword("crm software", 2_000, 60.0)]),
            ad_group("B", 70.0, vec![keyword("crm pricing", 3_000, 70.0)]),
        ];
        let campaign = build_search_campaign(&groups, 1_000.0, 0.02, 100.0, "20260829");

        assert!((campaign.ad_groups[0].allocated_budget - 300.0).abs() < 1e-9);
        assert!((campaign.ad_groups[1].allocated_budget - 700.0).abs() < 1e-9);
        let sum: f64 = campaign.ad_groups.iter().map(|g| g.allocated_budget).sum();
        assert!((sum - 1_000.0).abs() < 0.01);
    }

    #[test]
    fn test_zero_weights_split_equally() {
        let groups = vec![
            ad_group("A", 0.0, vec![keyword("crm a", 1_000, 50.0)]),
            ad_group("B", 0.0, vec![keyword("crm b", 1_000, 50.0)]),
        ];
        let campaign = build_search_campaign(&groups, 500.0, 0.02, 100.0, "20260829");
        assert!((campaign.ad_groups[0].allocated_budget - 250.0).abs() < 1e-9);
    }

    // 2. Projections --------------------------------------------------------

    #[test]
    fn test_clicks_capped_at_ten_percent_of_volume() {
        // Huge budget against a small market: clicks must cap at 10% of the
        // group's search volume.
        let groups = vec![ad_group("A", 1.0, vec![keyword("crm deal", 1_000, 60.0)])];
        let campaign = build_search_campaign(&groups, 100_000.0, 0.02, 100.0, "20260829");
        assert!(
            campaign.ad_groups[0].projections.estimated_monthly_clicks <= 100.0 + f64::EPSILON
        );
    }

    #[test]
    fn test_empty_groups_yield_empty_campaign() {
        let campaign = build_search_campaign(&[], 1_000.0, 0.02, 100.0, "20260829");
        assert!(campaign.ad_groups.is_empty());
        assert!((campaign.performance_projections.estimated_monthly_clicks).abs() < 1e-9);
    }

    // 3. Match types and ad copy --------------------------------------------

    #[test]
    fn test_match_type_suggestions_by_word_count() {
        assert_eq!(
            suggest_match_types("crm"),
            vec![MatchType::Phrase, MatchType::BroadMatchModifier]
        );
        assert_eq!(suggest_match_types("crm software").len(), 3);
        assert_eq!(
            suggest_match_types("best crm software"),
            vec![MatchType::Exact, MatchType::Phrase]
        );
    }

    #[test]
    fn test_commercial_groups_get_two_ad_variants() {
        let groups = vec![ad_group(
            "A",
            1.0,
            vec![keyword("crm software", 2_000, 60.0)],
        )];
        let campaign = build_search_campaign(&groups, 1_000.0, 0.02, 100.0, "20260829");
        assert_eq!(campaign.ad_groups[0].recommended_ads.len(), 2);
        assert!(campaign.ad_groups[0].recommended_ads[0]
            .headline_1
            .contains("Crm"));
    }
}
