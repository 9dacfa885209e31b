//! SEM Planner — keyword analysis, bid optimization, and campaign
//! construction for Search, Shopping, and Performance Max.

mod export;
mod source;

use clap::Parser;
use sem_campaigns::pipeline::CampaignPlanner;
use sem_core::config::PlannerConfig;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "sem-planner")]
#[command(about = "Keyword analysis and campaign construction engine")]
#[command(version)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, env = "SEM_PLANNER__CONFIG")]
    config: Option<String>,

    /// JSON file of keyword research records; omit to simulate research
    #[arg(long, env = "SEM_PLANNER__INPUT")]
    input: Option<String>,

    /// Industry for simulated keyword research
    #[arg(long, default_value = "saas")]
    industry: String,

    /// RNG seed for simulated research, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Output file for the campaign plan JSON
    #[arg(long, env = "SEM_PLANNER__OUTPUT")]
    output: Option<String>,

    /// Minimum monthly search volume (overrides config)
    #[arg(long)]
    min_volume: Option<u64>,

    /// Total monthly budget (overrides config)
    #[arg(long)]
    total_budget: Option<f64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sem_planner=info,sem_campaigns=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = PlannerConfig::load(cli.config.as_deref()).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        PlannerConfig::default()
    });

    if let Some(min_volume) = cli.min_volume {
        config.filters.min_search_volume = min_volume;
    }
    if let Some(total) = cli.total_budget {
        config.budget.total = total;
    }

    info!(
        min_volume = config.filters.min_search_volume,
        total_budget = config.budget.total,
        "SEM Planner starting"
    );

    let records = match cli.input.as_deref() {
        Some(path) => {
            let records = source::load_records(path)?;
            info!(count = records.len(), path, "Loaded keyword records");
            records
        }
        None => {
            let records = source::generate_industry_keywords(&cli.industry, cli.seed);
            info!(
                count = records.len(),
                industry = %cli.industry,
                "Simulated keyword research"
            );
            records
        }
    };

    let planner = CampaignPlanner::new(config)?;
    let plan = planner.build_plan(records)?;

    let path = export::write_plan(&plan, cli.output.as_deref())?;
    info!(path = %path, "Campaign plan exported");

    println!("Campaign plan written to {path}");
    println!(
        "  {} keywords, {} search ad groups, {} asset groups",
        plan.keywords.len(),
        plan.search.ad_groups.len(),
        plan.performance_max.asset_groups.len()
    );

    Ok(())
}
