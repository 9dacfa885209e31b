//! Budget allocation and bid optimization — bounded CPC recommendations,
//! click projections, and budget-constrained reallocation.

pub mod allocator;
pub mod optimizer;
pub mod report;

pub use allocator::split_proportionally;
pub use optimizer::BidOptimizer;
pub use report::{recommendations_report, BidReport};
