//! Wire representation of transactions at the HTTP boundary

use bigdecimal::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::*;
use crate::utils::validation::{parse_amount, parse_date, validate_amount};

/// An amount as it arrives on the wire.
///
/// Decimal fields are often serialized as strings to keep their precision,
/// so both JSON numbers and numeric strings are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountValue {
    Number(f64),
    Text(String),
}

/// A transaction as exchanged with API clients: `{ amount, date }` plus
/// whatever else the source attached, which is passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub amount: AmountValue,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl TransactionRecord {
    /// A bare record with a numeric amount and optional `YYYY-MM-DD` date
    pub fn new(amount: f64, date: Option<&str>) -> Self {
        Self {
            id: None,
            amount: AmountValue::Number(amount),
            date: date.map(str::to_string),
            transaction_type: None,
            currency: None,
            description: None,
            reference: None,
            extra: BTreeMap::new(),
        }
    }

    /// Convert into a validated transaction.
    ///
    /// `position` is the record's index in its source list. Records without
    /// an id are named `{activity_id}#{position}`, which keeps repeated runs
    /// over the same input identical.
    pub fn to_transaction(
        &self,
        position: usize,
        activity_id: &str,
        activity_ref: &str,
        direction: TransactionDirection,
    ) -> ReconciliationResult<Transaction> {
        let id = self
            .id
            .clone()
            .unwrap_or_else(|| format!("{activity_id}#{position}"));

        let amount = match &self.amount {
            AmountValue::Number(value) => validate_amount(&id, *value)?,
            AmountValue::Text(value) => parse_amount(&id, value)?,
        };

        let date = match self.date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => Some(parse_date(&id, value)?),
        };

        Ok(Transaction {
            id,
            activity_id: activity_id.to_string(),
            activity_ref: activity_ref.to_string(),
            direction,
            amount,
            date,
            transaction_type: self.transaction_type,
            currency: self.currency.clone(),
            description: self.description.clone(),
            reference: self.reference.clone(),
            metadata: self.extra.clone(),
        })
    }
}

impl From<&Transaction> for TransactionRecord {
    fn from(transaction: &Transaction) -> Self {
        Self {
            id: Some(transaction.id.clone()),
            amount: AmountValue::Number(money_to_f64(&transaction.amount)),
            date: transaction
                .date
                .map(|d| d.format("%Y-%m-%d").to_string()),
            transaction_type: transaction.transaction_type,
            currency: transaction.currency.clone(),
            description: transaction.description.clone(),
            reference: transaction.reference.clone(),
            extra: transaction.metadata.clone(),
        }
    }
}

/// Nearest `f64` to a decimal amount, for JSON numbers
pub(crate) fn money_to_f64(value: &Money) -> f64 {
    value.to_f64().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;
    use std::str::FromStr;

    #[test]
    fn test_deserialize_minimal_record() {
        let record: TransactionRecord =
            serde_json::from_str(r#"{ "amount": 100, "date": null }"#).unwrap();
        assert_eq!(record.amount, AmountValue::Number(100.0));
        assert!(record.date.is_none());
        assert!(record.extra.is_empty());
    }

    #[test]
    fn test_deserialize_string_amount_and_passthrough() {
        let record: TransactionRecord = serde_json::from_str(
            r#"{
                "id": "tx-9",
                "amount": "1250.75",
                "date": "2024-03-05",
                "transactionType": "incoming_funds",
                "currency": "USD",
                "providerOrganization": "UNDP",
                "flowType": "10"
            }"#,
        )
        .unwrap();

        let transaction = record
            .to_transaction(0, "child", "fund", TransactionDirection::Incoming)
            .unwrap();

        assert_eq!(transaction.id, "tx-9");
        assert_eq!(transaction.amount, BigDecimal::from_str("1250.75").unwrap());
        assert_eq!(transaction.date, NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(
            transaction.transaction_type,
            Some(TransactionType::IncomingFunds)
        );
        assert_eq!(transaction.metadata["providerOrganization"], "UNDP");
        assert_eq!(transaction.metadata["flowType"], "10");
    }

    #[test]
    fn test_missing_id_follows_position() {
        let record = TransactionRecord::new(5.0, None);
        let transaction = record
            .to_transaction(3, "fund", "child", TransactionDirection::Outgoing)
            .unwrap();
        assert_eq!(transaction.id, "fund#3");
        assert!(transaction.date.is_none());

        let again = record
            .to_transaction(3, "fund", "child", TransactionDirection::Outgoing)
            .unwrap();
        assert_eq!(transaction, again);
    }

    #[test]
    fn test_malformed_values_rejected() {
        let nan = TransactionRecord::new(f64::NAN, None);
        assert!(matches!(
            nan.to_transaction(0, "fund", "child", TransactionDirection::Outgoing),
            Err(ReconciliationError::InvalidAmount { .. })
        ));

        let mut text = TransactionRecord::new(0.0, None);
        text.amount = AmountValue::Text("n/a".to_string());
        assert!(matches!(
            text.to_transaction(0, "fund", "child", TransactionDirection::Outgoing),
            Err(ReconciliationError::InvalidAmount { .. })
        ));

        let bad_date = TransactionRecord::new(1.0, Some("January"));
        assert!(matches!(
            bad_date.to_transaction(0, "fund", "child", TransactionDirection::Outgoing),
            Err(ReconciliationError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_serialize_from_transaction() {
        let mut transaction = TransactionRecord::new(95.5, Some("2024-01-15"))
            .to_transaction(0, "child", "fund", TransactionDirection::Incoming)
            .unwrap();
        transaction
            .metadata
            .insert("note".to_string(), serde_json::json!("late entry"));

        let value = serde_json::to_value(TransactionRecord::from(&transaction)).unwrap();
        assert_eq!(value["amount"], 95.5);
        assert_eq!(value["date"], "2024-01-15");
        assert_eq!(value["note"], "late entry");
        assert_eq!(value["id"], transaction.id.as_str());
    }
}
