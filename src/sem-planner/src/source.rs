//! Keyword record sources: JSON research exports, or simulated research
//! when no export is available.

use std::fs;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sem_core::error::{PlannerError, PlannerResult};
use sem_core::types::KeywordRecord;

/// Load keyword research records from a JSON file (an array of records).
pub fn load_records(path: &str) -> PlannerResult<Vec<KeywordRecord>> {
    let data = fs::read_to_string(path)?;
    let records: Vec<KeywordRecord> = serde_json::from_str(&data)?;
    if records.is_empty() {
        return Err(PlannerError::Input(format!(
            "keyword file {path} contains no records"
        )));
    }
    Ok(records)
}

const INDUSTRY_PATTERNS: [(&str, &[&str]); 3] = [
    (
        "saas",
        &[
            "software as a service",
            "cloud software",
            "saas platform",
            "subscription software",
            "cloud-based",
            "web application",
            "online software",
            "saas solution",
        ],
    ),
    (
        "analytics",
        &[
            "data analytics",
            "business intelligence",
            "data visualization",
            "reporting tool",
            "dashboard",
            "metrics",
            "kpi tracking",
            "data insights",
            "analytics platform",
        ],
    ),
    (
        "marketing",
        &[
            "marketing automation",
            "digital marketing",
            "marketing platform",
            "crm",
            "lead generation",
            "email marketing",
            "marketing software",
        ],
    ),
];

const MAX_GENERATED: usize = 50;

/// Simulate keyword research for an industry: pattern variations with
/// volume, competition, and CPC estimates driven by keyword traits. A seed
/// makes the output reproducible.
pub fn generate_industry_keywords(industry: &str, seed: Option<u64>) -> Vec<KeywordRecord> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let industry = industry.to_lowercase();

    let mut records = Vec::new();
    for (key, patterns) in INDUSTRY_PATTERNS {
        if !industry.contains(key) {
            continue;
        }
        for pattern in patterns {
            for variation in variations(pattern) {
                if records.len() >= MAX_GENERATED {
                    return records;
                }
                records.push(estimate(&variation, &industry, &mut rng));
            }
        }
    }
    records
}

fn variations(pattern: &str) -> Vec<String> {
    vec![
        pattern.to_string(),
        format!("best {pattern}"),
        format!("{pattern} software"),
        format!("{pattern} tool"),
        format!("{pattern} platform"),
        format!("enterprise {pattern}"),
        format!("{pattern} solution"),
        format!("affordable {pattern}"),
        format!("{pattern} pricing"),
        format!("{pattern} comparison"),
    ]
}

fn estimate(keyword: &str, industry: &str, rng: &mut StdRng) -> KeywordRecord {
    let competition = estimate_competition(keyword);
    let competition_index = match competition {
        "HIGH" => rng.gen_range(70..=95),
        "MEDIUM" => rng.gen_range(40..=70),
        _ => rng.gen_range(10..=40),
    };
    let cpc = estimate_cpc(keyword, industry, rng);

    KeywordRecord {
        keyword: keyword.to_string(),
        avg_monthly_searches: estimate_volume(keyword, rng),
        competition: competition.to_string(),
        competition_index,
        low_top_page_bid: round2(cpc * 0.7),
        high_top_page_bid: round2(cpc * 1.4),
        data_source: "industry_specific".to_string(),
    }
}

fn estimate_volume(keyword: &str, rng: &mut StdRng) -> u64 {
    let mut base = 1_000.0;
    if contains_any(keyword, &["best", "top", "comparison"]) {
        base *= 2.0;
    }
    if contains_any(keyword, &["enterprise", "business"]) {
        base *= 1.5;
    }
    if contains_any(keyword, &["free", "cheap", "affordable"]) {
        base *= 3.0;
    }
    if keyword.contains("pricing") {
        base *= 1.8;
    }
    rng.gen_range((base * 0.5) as u64..=(base * 2.0) as u64)
}

fn estimate_competition(keyword: &str) -> &'static str {
    if contains_any(keyword, &["enterprise", "business", "software"]) {
        "HIGH"
    } else if contains_any(keyword, &["best", "comparison", "pricing"]) {
        "MEDIUM"
    } else {
        "LOW"
    }
}

fn estimate_cpc(keyword: &str, industry: &str, rng: &mut StdRng) -> f64 {
    let base_table = [
        ("saas", 4.0),
        ("analytics", 3.5),
        ("marketing", 5.0),
        ("finance", 8.0),
        ("legal", 12.0),
    ];
    let mut base = 3.0;
    for (key, cpc) in base_table {
        if industry.contains(key) {
            base = cpc;
            break;
        }
    }

    if contains_any(keyword, &["buy", "purchase", "pricing", "cost"]) {
        base *= 1.5;
    }
    if contains_any(keyword, &["free", "how to", "what is"]) {
        base *= 0.4;
    }
    if keyword.contains("enterprise") {
        base *= 2.0;
    }

    round2(rng.gen_range(base * 0.6..base * 1.8))
}

fn contains_any(keyword: &str, words: &[&str]) -> bool {
    words.iter().any(|word| keyword.contains(word))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
