//! Rule-based search intent classification.
//!
//! Two deterministic tiers: regex pattern counting over the fixed category
//! set, then a substring fallback vocabulary for keywords no pattern
//! matched. No network or learned-model calls.

use std::collections::BTreeMap;

use regex::Regex;
use sem_core::types::{Intent, Keyword};
use tracing::debug;

/// Classification seam. A stronger (e.g. embedding-backed) matcher can
/// replace the default without touching the pipeline.
pub trait IntentMatcher: Send + Sync {
    fn classify(&self, text: &str) -> Intent;
}

/// Regex patterns per category, in tie-break order.
const INTENT_PATTERNS: [(Intent, &[&str]); 6] = [
    (Intent::Brand, &[r"(?i)\b(brand|company|official|website)\b"]),
    (
        Intent::Competitor,
        &[r"(?i)\b(vs|versus|compare|alternative|competitor)\b"],
    ),
    (
        Intent::Commercial,
        &[r"(?i)\b(buy|purchase|price|cost|cheap|discount|deal|sale)\b"],
    ),
    (
        Intent::Informational,
        &[r"(?i)\b(what|how|why|guide|tips|tutorial|learn|information)\b"],
    ),
    (
        Intent::Local,
        &[r"(?i)\b(near me|local|in|location|city|area)\b"],
    ),
    (
        Intent::Transactional,
        &[r"(?i)\b(order|book|schedule|contact|call|hire)\b"],
    ),
];

/// Substring fallback vocabulary, applied when every pattern count is zero.
const FALLBACK_RULES: [(Intent, &[&str]); 4] = [
    (
        Intent::Competitor,
        &["vs", "alternative", "competitor", "compare"],
    ),
    (
        Intent::Commercial,
        &[
            "buy", "price", "cost", "pricing", "purchase", "software", "tool", "platform",
        ],
    ),
    (
        Intent::Informational,
        &["what", "how", "why", "guide", "tutorial", "learn"],
    ),
    (Intent::Local, &["near me", "local", "location", "address"]),
];

/// Default pattern-counting matcher over the fixed category set.
pub struct RuleBasedMatcher {
    patterns: Vec<(Intent, Vec<Regex>)>,
    /// Brand vocabulary for the fallback tier, supplied by the caller since
    /// brand names are account-specific.
    brand_terms: Vec<String>,
}

impl RuleBasedMatcher {
    pub fn new() -> Self {
        Self::with_brand_terms(Vec::new())
    }

    pub fn with_brand_terms(brand_terms: Vec<String>) -> Self {
        let patterns = INTENT_PATTERNS
            .iter()
            .map(|(intent, sources)| {
                let compiled = sources
                    .iter()
                    .map(|p| Regex::new(p).expect("hard-coded intent pattern"))
                    .collect();
                (*intent, compiled)
            })
            .collect();

        Self {
            patterns,
            brand_terms: brand_terms.into_iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    fn fallback(&self, text: &str) -> Intent {
        if self.brand_terms.iter().any(|t| text.contains(t.as_str())) {
            return Intent::Brand;
        }
        for (intent, terms) in FALLBACK_RULES {
            if terms.iter().any(|t| text.contains(t)) {
                return intent;
            }
        }
        Intent::General
    }
}

impl Default for RuleBasedMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentMatcher for RuleBasedMatcher {
    fn classify(&self, text: &str) -> Intent {
        let text = text.trim().to_lowercase();

        let mut best: Option<(Intent, usize)> = None;
        for (intent, patterns) in &self.patterns {
            let count = patterns.iter().filter(|p| p.is_match(&text)).count();
            // Strict comparison keeps the first declared category on ties.
            if count > 0 && best.map_or(true, |(_, c)| count > c) {
                best = Some((*intent, count));
            }
        }

        match best {
            Some((intent, _)) => intent,
            None => self.fallback(&text),
        }
    }
}

/// Partition keywords into intent buckets, stamping each keyword with its
/// classification. Bucket iteration order follows the declared intent order.
pub fn group_by_intent(
    keywords: Vec<Keyword>,
    matcher: &dyn IntentMatcher,
) -> BTreeMap<Intent, Vec<Keyword>> {
    let mut buckets: BTreeMap<Intent, Vec<Keyword>> = BTreeMap::new();
    for mut kw in keywords {
        kw.intent = matcher.classify(&kw.normalized());
        buckets.entry(kw.intent).or_default().push(kw);
    }
    for (intent, bucket) in &buckets {
        debug!(intent = %intent, count = bucket.len(), "Intent bucket");
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use sem_core::types::KeywordRecord;

    fn classify(text: &str) -> Intent {
        RuleBasedMatcher::new().classify(text)
    }

    // 1. Pattern tier -------------------------------------------------------

    #[test]
    fn test_pattern_classification() {
        assert_eq!(classify("buy crm software cheap"), Intent::Commercial);
        assert_eq!(classify("hubspot vs salesforce"), Intent::Competitor);
        assert_eq!(classify("how to choose a crm"), Intent::Informational);
        assert_eq!(classify("crm consultants near me"), Intent::Local);
        assert_eq!(classify("schedule a crm demo"), Intent::Transactional);
        assert_eq!(classify("acme official website"), Intent::Brand);
    }

    #[test]
    fn test_case_insensitive_matching() {
        assert_eq!(classify("BUY CRM NOW"), Intent::Commercial);
    }

    #[test]
    fn test_tie_break_prefers_first_declared_category() {
        // One brand pattern hit and one commercial pattern hit: brand is
        // declared first and must win.
        assert_eq!(classify("official crm price"), Intent::Brand);
    }

    // 2. Fallback tier ------------------------------------------------------

    #[test]
    fn test_fallback_substrings() {
        // "software" only appears in the fallback vocabulary.
        assert_eq!(classify("crm software"), Intent::Commercial);
    }

    #[test]
    fn test_fallback_brand_terms() {
        let matcher = RuleBasedMatcher::with_brand_terms(vec!["acme".into()]);
        assert_eq!(matcher.classify("acme crm"), Intent::Brand);
    }

    #[test]
    fn test_general_when_nothing_matches() {
        assert_eq!(classify("zebra umbrella"), Intent::General);
    }

    // 3. Bucketing ----------------------------------------------------------

    #[test]
    fn test_group_by_intent_stamps_keywords() {
        let keywords = vec![
            Keyword::from_record(KeywordRecord {
                keyword: "buy crm".into(),
                avg_monthly_searches: 1_000,
                competition: String::new(),
                competition_index: 40,
                low_top_page_bid: 1.0,
                high_top_page_bid: 2.0,
                data_source: "test".into(),
            }),
            Keyword::from_record(KeywordRecord {
                keyword: "what is crm".into(),
                avg_monthly_searches: 2_000,
                competition: String::new(),
                competition_index: 30,
                low_top_page_bid: 0.5,
                high_top_page_bid: 1.5,
                data_source: "test".into(),
            }),
        ];

        let matcher = RuleBasedMatcher::new();
        let buckets = group_by_intent(keywords, &matcher);

        assert_eq!(buckets[&Intent::Commercial].len(), 1);
        assert_eq!(buckets[&Intent::Informational].len(), 1);
        assert_eq!(
            buckets[&Intent::Commercial][0].intent,
            Intent::Commercial
        );
    }
}
