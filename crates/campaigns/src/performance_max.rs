//! Performance Max campaign structure built from intent-bucket asset-group
//! themes.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use sem_bidding::allocator::split_proportionally;
use sem_core::types::{round2, Intent, Keyword};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CampaignType, DAYS_PER_MONTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeType {
    ProductCategory,
    UseCase,
    Geographic,
    Brand,
}

impl std::fmt::Display for ThemeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ThemeType::ProductCategory => "Product Category",
            ThemeType::UseCase => "Use-case Based",
            ThemeType::Geographic => "Geographic",
            ThemeType::Brand => "Brand",
        };
        f.write_str(name)
    }
}

/// An asset-group theme derived from one intent bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetGroupTheme {
    pub theme_name: String,
    pub theme_type: ThemeType,
    pub keywords: Vec<String>,
    pub target_audience: String,
    pub asset_focus: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMaxCampaign {
    pub campaign_id: Uuid,
    pub campaign_type: CampaignType,
    pub campaign_name: String,
    pub total_budget: f64,
    pub daily_budget: f64,
    pub settings: PmaxSettings,
    pub asset_groups: Vec<AssetGroup>,
    pub performance_projections: PmaxProjections,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PmaxSettings {
    pub goal: String,
    pub bidding_strategy: String,
    pub target_roas: String,
    pub audience_signals_required: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetGroup {
    pub asset_group_name: String,
    pub theme_type: ThemeType,
    pub allocated_budget: f64,
    pub target_audience: String,
    pub keywords: Vec<String>,
    pub asset_requirements: AssetRequirements,
    pub asset_focus: String,
    pub audience_signals: Vec<String>,
    pub optimization_focus: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRequirements {
    pub headlines: String,
    pub descriptions: String,
    pub images: String,
    pub videos: String,
    pub final_url: String,
}

impl Default for AssetRequirements {
    fn default() -> Self {
        Self {
            headlines: "3-15 required".into(),
            descriptions: "2-5 required".into(),
            images: "Multiple sizes required".into(),
            videos: "Optional but recommended".into(),
            final_url: "Required".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PmaxProjections {
    pub estimated_reach_increase: String,
    pub cross_channel_optimization: bool,
    pub automated_bidding: bool,
}

impl Default for PmaxProjections {
    fn default() -> Self {
        Self {
            estimated_reach_increase: "15-30%".into(),
            cross_channel_optimization: true,
            automated_bidding: true,
        }
    }
}

/// One theme per intent bucket that carries keywords: commercial and
/// informational buckets contribute their top ten by performance score,
/// local and brand buckets contribute everything.
pub fn generate_themes(buckets: &BTreeMap<Intent, Vec<Keyword>>) -> Vec<AssetGroupTheme> {
    let mut themes = Vec::new();

    if let Some(commercial) = non_empty(buckets, Intent::Commercial) {
        themes.push(AssetGroupTheme {
            theme_name: "Product Category - Commercial Intent".into(),
            theme_type: ThemeType::ProductCategory,
            keywords: top_texts(commercial, 10),
            target_audience: "Ready to purchase".into(),
            asset_focus: "Product images, pricing, offers".into(),
        });
    }
    if let Some(informational) = non_empty(buckets, Intent::Informational) {
        themes.push(AssetGroupTheme {
            theme_name: "Educational Content - Informational".into(),
            theme_type: ThemeType::UseCase,
            keywords: top_texts(informational, 10),
            target_audience: "Research phase".into(),
            asset_focus: "Educational content, guides, comparisons".into(),
        });
    }
    if let Some(local) = non_empty(buckets, Intent::Local) {
        themes.push(AssetGroupTheme {
            theme_name: "Local Services".into(),
            theme_type: ThemeType::Geographic,
            keywords: local.iter().map(|kw| kw.text.clone()).collect(),
            target_audience: "Local customers".into(),
            asset_focus: "Location info, local testimonials".into(),
        });
    }
    if let Some(brand) = non_empty(buckets, Intent::Brand) {
        themes.push(AssetGroupTheme {
            theme_name: "Brand Protection".into(),
            theme_type: ThemeType::Brand,
            keywords: brand.iter().map(|kw| kw.text.clone()).collect(),
            target_audience: "Brand searchers".into(),
            asset_focus: "Brand assets, official messaging".into(),
        });
    }

    themes
}

fn non_empty(buckets: &BTreeMap<Intent, Vec<Keyword>>, intent: Intent) -> Option<&Vec<Keyword>> {
    buckets.get(&intent).filter(|bucket| !bucket.is_empty())
}

fn top_texts(keywords: &[Keyword], limit: usize) -> Vec<String> {
    let mut ranked: Vec<&Keyword> = keywords.iter().collect();
    ranked.sort_by(|a, b| {
        b.performance_score
            .partial_cmp(&a.performance_score)
            .unwrap_or(Ordering::Equal)
    });
    ranked
        .into_iter()
        .take(limit)
        .map(|kw| kw.text.clone())
        .collect()
}

/// Assemble the Performance Max campaign: budget split evenly across the
/// generated themes. No themes means an empty asset-group list.
pub fn build_performance_max(
    themes: Vec<AssetGroupTheme>,
    pmax_budget: f64,
    target_roas: f64,
    stamp: &str,
) -> PerformanceMaxCampaign {
    let allocations = split_proportionally(pmax_budget, &vec![1.0; themes.len()]);

    let asset_groups: Vec<AssetGroup> = themes
        .into_iter()
        .zip(allocations)
        .map(|(theme, allocated)| AssetGroup {
            asset_group_name: theme.theme_name,
            optimization_focus: optimization_focus(theme.theme_type),
            audience_signals: audience_signals(theme.theme_type),
            theme_type: theme.theme_type,
            allocated_budget: allocated,
            target_audience: theme.target_audience,
            keywords: theme.keywords,
            asset_requirements: AssetRequirements::default(),
            asset_focus: theme.asset_focus,
        })
        .collect();

    PerformanceMaxCampaign {
        campaign_id: Uuid::new_v4(),
        campaign_type: CampaignType::PerformanceMax,
        campaign_name: format!("Performance Max Campaign - {stamp}"),
        total_budget: pmax_budget,
        daily_budget: round2(pmax_budget / DAYS_PER_MONTH),
        settings: PmaxSettings {
            goal: "Sales/Conversions".into(),
            bidding_strategy: "Maximize Conversions".into(),
            target_roas: format!("{target_roas:.0}%"),
            audience_signals_required: true,
        },
        asset_groups,
        performance_projections: PmaxProjections::default(),
    }
}

fn audience_signals(theme_type: ThemeType) -> Vec<String> {
    let signals: &[&str] = match theme_type {
        ThemeType::ProductCategory => &[
            "Users who searched for similar products",
            "Previous website visitors",
            "Similar to your converters",
        ],
        ThemeType::UseCase => &[
            "In-market for related products",
            "Content engagement audiences",
            "Custom intent audiences",
        ],
        ThemeType::Geographic => &[
            "Local area targeting",
            "Users near business locations",
            "Local service searchers",
        ],
        ThemeType::Brand => &[
            "Website visitors",
            "Similar audiences",
            "Demographic targeting",
        ],
    };
    signals.iter().map(|s| s.to_string()).collect()
}

fn optimization_focus(theme_type: ThemeType) -> String {
    match theme_type {
        ThemeType::ProductCategory => "Conversion value optimization",
        ThemeType::UseCase => "Conversion volume optimization",
        ThemeType::Geographic => "Local action optimization",
        ThemeType::Brand => "Brand awareness and conversions",
    }
    .to_string()
}
