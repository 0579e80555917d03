//! In-memory repository implementation for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::traits::*;
use crate::types::*;

/// In-memory transaction repository for testing and development.
///
/// Transactions keep their insertion order, which is the order matching
/// sees them in.
#[derive(Debug, Clone)]
pub struct MemoryRepository {
    activities: Arc<RwLock<HashMap<String, Activity>>>,
    transactions: Arc<RwLock<Vec<Transaction>>>,
}

impl MemoryRepository {
    /// Create a new memory repository instance
    pub fn new() -> Self {
        Self {
            activities: Arc::new(RwLock::new(HashMap::new())),
            transactions: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Add or replace an activity
    pub fn add_activity(&self, activity: Activity) -> ReconciliationResult<()> {
        self.activities
            .write()
            .map_err(poisoned)?
            .insert(activity.id.clone(), activity);
        Ok(())
    }

    /// Append a transaction
    pub fn add_transaction(&self, transaction: Transaction) -> ReconciliationResult<()> {
        self.transactions
            .write()
            .map_err(poisoned)?
            .push(transaction);
        Ok(())
    }

    /// Append several transactions, keeping their order
    pub fn add_transactions(
        &self,
        transactions: impl IntoIterator<Item = Transaction>,
    ) -> ReconciliationResult<()> {
        self.transactions
            .write()
            .map_err(poisoned)?
            .extend(transactions);
        Ok(())
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) -> ReconciliationResult<()> {
        self.activities.write().map_err(poisoned)?.clear();
        self.transactions.write().map_err(poisoned)?.clear();
        Ok(())
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> ReconciliationError {
    ReconciliationError::Repository("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl TransactionRepository for MemoryRepository {
    async fn get_activity(&self, activity_id: &str) -> ReconciliationResult<Option<Activity>> {
        Ok(self
            .activities
            .read()
            .map_err(poisoned)?
            .get(activity_id)
            .cloned())
    }

    async fn list_child_activities(
        &self,
        fund_activity_id: &str,
    ) -> ReconciliationResult<Vec<Activity>> {
        let activities = self.activities.read().map_err(poisoned)?;
        let mut children: Vec<Activity> = activities
            .values()
            .filter(|a| a.parent_id.as_deref() == Some(fund_activity_id))
            .cloned()
            .collect();
        children.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(children)
    }

    async fn get_transactions(
        &self,
        activity_id: &str,
        direction: Option<TransactionDirection>,
    ) -> ReconciliationResult<Vec<Transaction>> {
        let transactions = self.transactions.read().map_err(poisoned)?;
        Ok(transactions
            .iter()
            .filter(|t| t.activity_id == activity_id)
            .filter(|t| direction.is_none_or(|d| t.direction == d))
            .cloned()
            .collect())
    }
}
