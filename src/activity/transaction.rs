//! Transaction construction

use chrono::NaiveDate;

use crate::types::*;
use crate::utils::validation::validate_transaction_id;

/// Transaction builder for fund-side and child-side transactions
#[derive(Debug)]
pub struct TransactionBuilder {
    transaction: Transaction,
}

impl TransactionBuilder {
    /// Money sent by `fund_activity_id` to `child_activity_id`
    pub fn outgoing(
        id: String,
        fund_activity_id: String,
        child_activity_id: String,
        amount: Money,
    ) -> Self {
        Self {
            transaction: Transaction::new(
                id,
                fund_activity_id,
                child_activity_id,
                TransactionDirection::Outgoing,
                amount,
                None,
            ),
        }
    }

    /// Money received by `child_activity_id` from `fund_activity_id`
    pub fn incoming(
        id: String,
        child_activity_id: String,
        fund_activity_id: String,
        amount: Money,
    ) -> Self {
        Self {
            transaction: Transaction::new(
                id,
                child_activity_id,
                fund_activity_id,
                TransactionDirection::Incoming,
                amount,
                None,
            ),
        }
    }

    /// Set the value date
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.transaction.date = Some(date);
        self
    }

    /// Set the transaction type
    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction.transaction_type = Some(transaction_type);
        self
    }

    /// Set the currency code
    pub fn currency(mut self, currency: &str) -> Self {
        self.transaction.currency = Some(currency.to_uppercase());
        self
    }

    pub fn description(mut self, description: String) -> Self {
        self.transaction.description = Some(description);
        self
    }

    pub fn reference(mut self, reference: String) -> Self {
        self.transaction.reference = Some(reference);
        self
    }

    /// Attach an opaque field that is carried through reconciliation
    pub fn metadata(mut self, key: String, value: impl Into<serde_json::Value>) -> Self {
        self.transaction.metadata.insert(key, value.into());
        self
    }

    /// Build the transaction
    pub fn build(self) -> ReconciliationResult<Transaction> {
        let transaction = self.transaction;
        validate_transaction_id(&transaction.id)?;

        if transaction.activity_id == transaction.activity_ref {
            return Err(ReconciliationError::Validation(format!(
                "Transaction '{}' references its own activity '{}'",
                transaction.id, transaction.activity_id
            )));
        }

        if let Some(transaction_type) = transaction.transaction_type {
            if transaction_type.direction() != Some(transaction.direction) {
                return Err(ReconciliationError::Validation(format!(
                    "Transaction type {:?} does not describe {:?} money",
                    transaction_type, transaction.direction
                )));
            }
        }

        Ok(transaction)
    }
}

/// Common transaction patterns
pub mod patterns {
    use super::*;

    /// A fund disbursement to one of its children
    pub fn disbursement(
        id: String,
        fund_activity_id: String,
        child_activity_id: String,
        date: NaiveDate,
        amount: Money,
    ) -> ReconciliationResult<Transaction> {
        TransactionBuilder::outgoing(id, fund_activity_id, child_activity_id, amount)
            .date(date)
            .transaction_type(TransactionType::Disbursement)
            .build()
    }

    /// Incoming funds recorded by a child activity
    pub fn incoming_funds(
        id: String,
        child_activity_id: String,
        fund_activity_id: String,
        date: NaiveDate,
        amount: Money,
    ) -> ReconciliationResult<Transaction> {
        TransactionBuilder::incoming(id, child_activity_id, fund_activity_id, amount)
            .date(date)
            .transaction_type(TransactionType::IncomingFunds)
            .build()
    }
}
