//! # Fund Reconciliation
//!
//! Reconciles a pooled fund's outgoing transactions against the incoming
//! transactions recorded by the child activities it funds.
//!
//! ## Features
//!
//! - **Greedy matching**: amounts paired within a tolerance, closest date first
//! - **Mismatch detection**: same-period pairs whose amounts disagree are surfaced
//!   as likely data-entry errors instead of two unrelated unmatched rows
//! - **Summaries**: per-child totals and discrepancies, fund-wide percent reconciled
//! - **Pluggable matching**: swap the strategy without touching the result model
//! - **Storage abstraction**: any data source behind the `TransactionRepository` trait
//! - **Wire report**: the camelCase JSON body served to dashboards
//!
//! ## Quick Start
//!
//! ```rust
//! use fund_reconciliation::{Activity, ReconciliationConfig, ReconciliationEngine, TransactionRecord};
//!
//! let engine = ReconciliationEngine::new(ReconciliationConfig::default()).unwrap();
//! let child = Activity::child_of("child-1".into(), "Nutrition".into(), "fund-1".into());
//!
//! let result = engine
//!     .reconcile_records(
//!         &child,
//!         "fund-1",
//!         &[TransactionRecord::new(100.0, Some("2024-01-10"))],
//!         &[TransactionRecord::new(100.0, Some("2024-01-12"))],
//!     )
//!     .unwrap();
//! assert_eq!(result.matches.len(), 1);
//! ```

pub mod activity;
pub mod config;
pub mod reconciliation;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use activity::*;
pub use config::*;
pub use reconciliation::*;
pub use traits::*;
pub use types::*;
