//! Utility modules

pub mod memory_repository;
pub mod validation;

pub use memory_repository::*;
pub use validation::*;
