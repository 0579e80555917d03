//! Activity transactions: construction helpers and wire records

pub mod record;
pub mod transaction;

pub use record::*;
pub use transaction::*;
