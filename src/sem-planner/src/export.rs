//! Campaign plan export: pretty-printed JSON with a generation timestamp.

use std::fs;

use chrono::Utc;
use sem_campaigns::pipeline::CampaignPlan;
use sem_core::error::PlannerResult;
use serde::Serialize;

#[derive(Serialize)]
struct PlanExport<'a> {
    generated_at: String,
    #[serde(flatten)]
    plan: &'a CampaignPlan,
}

/// Write the plan to `path`, or to a timestamped default filename when no
/// path is given. Returns the path written.
pub fn write_plan(plan: &CampaignPlan, path: Option<&str>) -> PlannerResult<String> {
    let now = Utc::now();
    let path = match path {
        Some(path) => path.to_string(),
        None => format!("campaign_plan_{}.json", now.format("%Y%m%d_%H%M%S")),
    };

    let export = PlanExport {
        generated_at: now.to_rfc3339(),
        plan,
    };
    fs::write(&path, serde_json::to_string_pretty(&export)?)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sem_campaigns::pipeline::CampaignPlanner;
    use sem_core::config::PlannerConfig;
    use sem_core::types::KeywordRecord;

    #[test]
    fn test_written_plan_is_valid_json() {
        let records = vec![
            KeywordRecord {
                keyword: "buy crm software".into(),
                avg_monthly_searches: 2_000,
                competition: "MEDIUM".into(),
                competition_index: 40,
                low_top_page_bid: 2.0,
                high_top_page_bid: 4.0,
                data_source: "test".into(),
            },
            KeywordRecord {
                keyword: "buy crm platform".into(),
                avg_monthly_searches: 1_500,
                competition: "MEDIUM".into(),
                competition_index: 45,
                low_top_page_bid: 2.0,
                high_top_page_bid: 4.5,
                data_source: "test".into(),
            },
            KeywordRecord {
                keyword: "buy crm tools".into(),
                avg_monthly_searches: 1_000,
                competition: "LOW".into(),
                competition_index: 30,
                low_top_page_bid: 1.5,
                high_top_page_bid: 3.0,
                data_source: "test".into(),
            },
        ];
        let plan = CampaignPlanner::new(PlannerConfig::default())
            .unwrap()
            .build_plan(records)
            .unwrap();

        let path = std::env::temp_dir().join("sem_planner_export_test.json");
        let written = write_plan(&plan, path.to_str()).unwrap();

        let data = fs::read_to_string(&written).unwrap();
        let value: serde_json::Value = serde_json::from_str(&data).unwrap();
        assert!(value.get("generated_at").is_some());
        assert!(value.get("search").is_some());
        assert!(value.get("report").is_some());

        fs::remove_file(&written).ok();
    }
}
