//! Fund reconciliation: pairs a pooled fund's disbursements with the
//! incoming funds its child activities recorded, then summarizes what agrees.

pub mod engine;
pub mod fund;
pub mod matcher;
pub mod report;
pub mod summary;

pub use engine::*;
pub use fund::*;
pub use matcher::GreedyMatcher;
pub use report::*;
pub use summary::summarize;
