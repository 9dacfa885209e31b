//! Keyword analysis — performance scoring, threshold filtering, intent
//! classification, and lexical clustering into ad groups.

pub mod cluster;
pub mod filter;
pub mod intent;
pub mod scorer;

pub use cluster::{Clusterer, Similarity, TokenOverlap};
pub use filter::filter_keywords;
pub use intent::{group_by_intent, IntentMatcher, RuleBasedMatcher};
pub use scorer::performance_score;
