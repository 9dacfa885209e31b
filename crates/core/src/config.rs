use serde::Deserialize;

use crate::error::{PlannerError, PlannerResult};

/// Root planner configuration. Loaded from an optional TOML file plus
/// environment variables with the prefix `SEM_PLANNER__`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub filters: FilterConfig,
    #[serde(default)]
    pub business: BusinessConfig,
    #[serde(default)]
    pub budget: BudgetConfig,
}

/// Keyword filtering thresholds.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_min_search_volume")]
    pub min_search_volume: u64,
    #[serde(default = "default_max_competition_index")]
    pub max_competition_index: u32,
    #[serde(default = "default_max_cpc")]
    pub max_cpc: f64,
}

/// Business parameters driving bid math.
#[derive(Debug, Clone, Deserialize)]
pub struct BusinessConfig {
    /// Expected conversion rate, in (0, 1].
    #[serde(default = "default_conversion_rate")]
    pub conversion_rate: f64,
    /// Target return on ad spend, as a percentage (400 = 400%).
    #[serde(default = "default_target_roas")]
    pub target_roas: f64,
    #[serde(default = "default_average_order_value")]
    pub average_order_value: f64,
    /// Profit margin, in (0, 1].
    #[serde(default = "default_profit_margin")]
    pub profit_margin: f64,
}

/// Monthly budgets per campaign channel. Channel budgets are independent
/// but each must fit inside the overall total.
#[derive(Debug, Clone, Deserialize)]
pub struct BudgetConfig {
    #[serde(default = "default_total_budget")]
    pub total: f64,
    #[serde(default = "default_search_budget")]
    pub search_ads: f64,
    #[serde(default = "default_shopping_budget")]
    pub shopping_ads: f64,
    #[serde(default = "default_pmax_budget")]
    pub performance_max: f64,
}

// Default functions
fn default_min_search_volume() -> u64 {
    500
}
fn default_max_competition_index() -> u32 {
    80
}
fn default_max_cpc() -> f64 {
    10.0
}
fn default_conversion_rate() -> f64 {
    0.02
}
fn default_target_roas() -> f64 {
    400.0
}
fn default_average_order_value() -> f64 {
    100.0
}
fn default_profit_margin() -> f64 {
    0.3
}
fn default_total_budget() -> f64 {
    10_000.0
}
fn default_search_budget() -> f64 {
    5_000.0
}
fn default_shopping_budget() -> f64 {
    3_000.0
}
fn default_pmax_budget() -> f64 {
    2_000.0
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_search_volume: default_min_search_volume(),
            max_competition_index: default_max_competition_index(),
            max_cpc: default_max_cpc(),
        }
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            conversion_rate: default_conversion_rate(),
            target_roas: default_target_roas(),
            average_order_value: default_average_order_value(),
            profit_margin: default_profit_margin(),
        }
    }
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            total: default_total_budget(),
            search_ads: default_search_budget(),
            shopping_ads: default_shopping_budget(),
            performance_max: default_pmax_budget(),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            filters: FilterConfig::default(),
            business: BusinessConfig::default(),
            budget: BudgetConfig::default(),
        }
    }
}

impl PlannerConfig {
    /// Load configuration from an optional TOML file and environment variables.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }
        let builder = builder.add_source(
            config::Environment::with_prefix("SEM_PLANNER")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Reject configurations that would produce nonsensical bids (division by
    /// zero, budgets that cannot be honored) before any computation runs.
    pub fn validate(&self) -> PlannerResult<()> {
        let b = &self.business;
        if b.conversion_rate <= 0.0 || b.conversion_rate > 1.0 {
            return Err(PlannerError::Config(format!(
                "conversion_rate must be in (0, 1], got {}",
                b.conversion_rate
            )));
        }
        if b.target_roas <= 0.0 {
            return Err(PlannerError::Config(format!(
                "target_roas must be positive, got {}",
                b.target_roas
            )));
        }
        if b.average_order_value <= 0.0 {
            return Err(PlannerError::Config(format!(
                "average_order_value must be positive, got {}",
                b.average_order_value
            )));
        }
        if b.profit_margin <= 0.0 || b.profit_margin > 1.0 {
            return Err(PlannerError::Config(format!(
                "profit_margin must be in (0, 1], got {}",
                b.profit_margin
            )));
        }
        if self.filters.max_competition_index > 100 {
            return Err(PlannerError::Config(format!(
                "max_competition_index must be at most 100, got {}",
                self.filters.max_competition_index
            )));
        }

        let budget = &self.budget;
        if budget.total < 0.0 {
            return Err(PlannerError::Budget(format!(
                "total budget must be non-negative, got {}",
                budget.total
            )));
        }
        for (name, value) in [
            ("search_ads", budget.search_ads),
            ("shopping_ads", budget.shopping_ads),
            ("performance_max", budget.performance_max),
        ] {
            if value < 0.0 {
                return Err(PlannerError::Budget(format!(
                    "{name} budget must be non-negative, got {value}"
                )));
            }
            if value > budget.total {
                return Err(PlannerError::Budget(format!(
                    "{name} budget ({value}) exceeds total budget ({})",
                    budget.total
                )));
            }
        }

        Ok(())
    }
}
