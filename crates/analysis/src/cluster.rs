//! Greedy lexical clustering of same-intent keywords into ad groups.

use std::collections::{BTreeMap, HashSet};

use sem_core::types::{round2, AdGroup, Intent, Keyword};
use tracing::debug;

/// Lexical similarity seam for the clusterer. A stronger matcher (stemming,
/// embeddings) can replace the default token-overlap check.
pub trait Similarity: Send + Sync {
    /// Number of shared normalized word tokens between two keyword texts.
    fn shared_tokens(&self, a: &str, b: &str) -> usize;
}

/// Default similarity: count of whitespace-delimited tokens in common.
pub struct TokenOverlap;

impl Similarity for TokenOverlap {
    fn shared_tokens(&self, a: &str, b: &str) -> usize {
        let a_tokens: HashSet<&str> = a.split_whitespace().collect();
        b.split_whitespace()
            .collect::<HashSet<&str>>()
            .intersection(&a_tokens)
            .count()
    }
}

/// Forms ad groups from intent buckets: greedy seeding by highest
/// performance score, token-overlap membership, bounded cluster size.
pub struct Clusterer {
    max_group_size: usize,
    min_group_size: usize,
    similarity: Box<dyn Similarity>,
}

impl Clusterer {
    pub fn new() -> Self {
        Self::with_similarity(Box::new(TokenOverlap))
    }

    pub fn with_similarity(similarity: Box<dyn Similarity>) -> Self {
        Self {
            max_group_size: 15,
            min_group_size: 3,
            similarity,
        }
    }

    /// Build ad groups from intent buckets. Clusters smaller than the
    /// minimum size are dropped; their keywords leave the campaign entirely
    /// rather than falling into a catch-all group.
    pub fn build_ad_groups(&self, buckets: BTreeMap<Intent, Vec<Keyword>>) -> Vec<AdGroup> {
        let mut groups = Vec::new();

        for (intent, keywords) in buckets {
            let clusters = self.partition(&keywords);

            let mut group_counter = 1usize;
            let mut dropped = 0usize;
            for cluster in clusters {
                if cluster.len() < self.min_group_size {
                    dropped += cluster.len();
                    continue;
                }

                let members: Vec<Keyword> =
                    cluster.into_iter().map(|i| keywords[i].clone()).collect();
                groups.push(self.make_group(intent, group_counter, members));
                group_counter += 1;
            }

            if dropped > 0 {
                debug!(
                    intent = %intent,
                    dropped,
                    "Keywords dropped from undersized clusters"
                );
            }
        }

        groups
    }

    /// Index-based greedy partition over a consumed bitset. Seed selection
    /// is the highest-scoring unconsumed keyword with first-encountered
    /// tie-break, so the partition is fully deterministic.
    fn partition(&self, keywords: &[Keyword]) -> Vec<Vec<usize>> {
        let mut consumed = vec![false; keywords.len()];
        let mut clusters = Vec::new();

        loop {
            let mut seed: Option<usize> = None;
            for (i, kw) in keywords.iter().enumerate() {
                if consumed[i] {
                    continue;
                }
                match seed {
                    Some(s) if kw.performance_score <= keywords[s].performance_score => {}
                    _ => seed = Some(i),
                }
            }
            let Some(seed) = seed else {
                break;
            };

            consumed[seed] = true;
            let seed_text = keywords[seed].normalized();
            let mut cluster = vec![seed];

            for (i, kw) in keywords.iter().enumerate() {
                if cluster.len() >= self.max_group_size {
                    break;
                }
                if consumed[i] {
                    continue;
                }
                if self.similarity.shared_tokens(&seed_text, &kw.normalized()) >= 1 {
                    consumed[i] = true;
                    cluster.push(i);
                }
            }

            clusters.push(cluster);
        }

        clusters
    }

    fn make_group(&self, intent: Intent, index: usize, keywords: Vec<Keyword>) -> AdGroup {
        let count = keywords.len() as f64;
        let total_volume: u64 = keywords.iter().map(|kw| kw.monthly_searches).sum();
        let avg_volume = total_volume as f64 / count;
        let avg_competition =
            keywords.iter().map(|kw| kw.competition_index as f64).sum::<f64>() / count;
        let avg_score =
            keywords.iter().map(|kw| kw.performance_score).sum::<f64>() / count;

        AdGroup {
            name: format!("{intent} Group {index}"),
            intent,
            keywords,
            avg_search_volume: avg_volume,
            avg_competition,
            // Volume-dominant heuristic; documented, not learned.
            allocation_weight: round2(total_volume as f64 * 0.7 + avg_score * 0.3),
        }
    }
}

impl Default for Clusterer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sem_core::types::KeywordRecord;

    fn keyword(text: &str, score: f64) -> Keyword {
        let mut kw = Keyword::from_record(KeywordRecord {
            keyword: text.into(),
            avg_monthly_searches: 1_000,
            competition: String::new(),
            competition_index: 40,
            low_top_page_bid: 1.0,
            high_top_page_bid: 3.0,
            data_source: "test".into(),
        });
        kw.performance_score = score;
        kw
    }

    fn commercial_bucket(keywords: Vec<Keyword>) -> BTreeMap<Intent, Vec<Keyword>> {
        let mut buckets = BTreeMap::new();
        buckets.insert(Intent::Commercial, keywords);
        buckets
    }

    // 1. Token overlap ------------------------------------------------------

    #[test]
    fn test_token_overlap_counts_shared_words() {
        let sim = TokenOverlap;
        assert_eq!(sim.shared_tokens("buy crm software", "crm software demo"), 2);
        assert_eq!(sim.shared_tokens("alpha beta", "gamma delta"), 0);
    }

    // 2. Cluster formation --------------------------------------------------

    #[test]
    fn test_members_share_token_with_seed() {
        let keywords = vec![
            keyword("crm software", 90.0),
            keyword("crm pricing", 70.0),
            keyword("best crm", 60.0),
            keyword("email automation", 50.0),
        ];
        let groups = Clusterer::new().build_ad_groups(commercial_bucket(keywords));

        // "email automation" shares no token and forms an undersized
        // cluster of one, which is dropped.
        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.name, "Commercial Group 1");
        assert_eq!(group.keywords.len(), 3);
        for kw in &group.keywords {
            assert!(kw.normalized().contains("crm"));
        }
    }

    #[test]
    fn test_cluster_size_bounds() {
        let keywords: Vec<Keyword> = (0..40)
            .map(|i| keyword(&format!("crm variant {i}"), 50.0 + i as f64))
            .collect();
        let groups = Clusterer::new().build_ad_groups(commercial_bucket(keywords));

        assert!(!groups.is_empty());
        for group in &groups {
            assert!(group.keywords.len() >= 3);
            assert!(group.keywords.len() <= 15);
        }
    }

    #[test]
    fn test_undersized_clusters_are_dropped_not_reassigned() {
        let keywords = vec![
            keyword("solar panels", 80.0),
            keyword("wind turbines", 70.0),
        ];
        let groups = Clusterer::new().build_ad_groups(commercial_bucket(keywords));
        assert!(groups.is_empty());
    }

    // 3. Determinism and weights --------------------------------------------

    #[test]
    fn test_partition_is_deterministic() {
        let keywords = vec![
            keyword("crm tool", 80.0),
            keyword("crm platform", 80.0),
            keyword("crm system", 80.0),
            keyword("crm suite", 80.0),
        ];
        let a = Clusterer::new().build_ad_groups(commercial_bucket(keywords.clone()));
        let b = Clusterer::new().build_ad_groups(commercial_bucket(keywords));

        let names = |groups: &[AdGroup]| -> Vec<Vec<String>> {
            groups
                .iter()
                .map(|g| g.keywords.iter().map(|k| k.text.clone()).collect())
                .collect()
        };
        assert_eq!(names(&a), names(&b));
    }

    #[test]
    fn test_allocation_weight_heuristic() {
        let keywords = vec![
            keyword("crm a", 60.0),
            keyword("crm b", 70.0),
            keyword("crm c", 80.0),
        ];
        let groups = Clusterer::new().build_ad_groups(commercial_bucket(keywords));
        assert_eq!(groups.len(), 1);
        // 0.7 * 3000 + 0.3 * 70 = 2121
        assert!((groups[0].allocation_weight - 2_121.0).abs() < 1e-9);
    }
}
