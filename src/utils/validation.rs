//! Validation utilities

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate};
use std::collections::HashSet;
use std::str::FromStr;

use crate::config::ReconciliationConfig;
use crate::traits::*;
use crate::types::*;

/// Validate that a transaction ID is usable
pub fn validate_transaction_id(transaction_id: &str) -> ReconciliationResult<()> {
    if transaction_id.trim().is_empty() {
        return Err(ReconciliationError::Validation(
            "Transaction ID cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validate that no ID occurs twice in one list
pub fn validate_unique_ids(transactions: &[Transaction]) -> ReconciliationResult<()> {
    let mut seen = HashSet::new();
    for transaction in transactions {
        if !seen.insert(transaction.id.as_str()) {
            return Err(ReconciliationError::DuplicateTransaction(
                transaction.id.clone(),
            ));
        }
    }
    Ok(())
}

/// Validate a transaction's currency against the configured reporting currency
pub fn validate_currency(
    transaction: &Transaction,
    config: &ReconciliationConfig,
) -> ReconciliationResult<()> {
    match (&config.reporting_currency, &transaction.currency) {
        (Some(expected), Some(found)) if !expected.eq_ignore_ascii_case(found) => {
            tracing::warn!(
                transaction_id = %transaction.id,
                %expected,
                %found,
                "transaction not in reporting currency"
            );
            Err(ReconciliationError::CurrencyMismatch {
                transaction_id: transaction.id.clone(),
                expected: expected.clone(),
                found: found.clone(),
            })
        }
        _ => Ok(()),
    }
}

/// Convert a floating-point amount, rejecting NaN and infinities
pub fn validate_amount(transaction_id: &str, amount: f64) -> ReconciliationResult<Money> {
    if !amount.is_finite() {
        return Err(ReconciliationError::InvalidAmount {
            transaction_id: transaction_id.to_string(),
            value: amount.to_string(),
        });
    }

    // Display gives the shortest decimal that round-trips, so 95.1 stays 95.1
    parse_amount(transaction_id, &amount.to_string())
}

/// Parse a decimal amount written as text
pub fn parse_amount(transaction_id: &str, value: &str) -> ReconciliationResult<Money> {
    BigDecimal::from_str(value.trim()).map_err(|_| ReconciliationError::InvalidAmount {
        transaction_id: transaction_id.to_string(),
        value: value.to_string(),
    })
}

/// Parse a `YYYY-MM-DD` date, also accepting a full RFC 3339 timestamp
pub fn parse_date(transaction_id: &str, value: &str) -> ReconciliationResult<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .map_err(|_| ReconciliationError::InvalidDate {
            transaction_id: transaction_id.to_string(),
            value: value.to_string(),
        })
}

/// Enhanced transaction validator with detailed checks
pub struct EnhancedTransactionValidator;

impl TransactionValidator for EnhancedTransactionValidator {
    fn validate_transactions(
        &self,
        transactions: &[Transaction],
        config: &ReconciliationConfig,
    ) -> ReconciliationResult<()> {
        DefaultTransactionValidator.validate_transactions(transactions, config)?;

        for transaction in transactions {
            // The recorded type must agree with the side it is reconciled on
            if let Some(transaction_type) = transaction.transaction_type {
                if transaction_type.direction() != Some(transaction.direction) {
                    return Err(ReconciliationError::Validation(format!(
                        "Transaction '{}' of type {:?} cannot be reconciled as {:?}",
                        transaction.id, transaction_type, transaction.direction
                    )));
                }
            }

            if transaction.activity_ref.trim().is_empty() {
                return Err(ReconciliationError::Validation(format!(
                    "Transaction '{}' does not reference a counterpart activity",
                    transaction.id
                )));
            }

            if let Some(ref description) = transaction.description {
                if description.len() > 500 {
                    return Err(ReconciliationError::Validation(format!(
                        "Transaction '{}' description cannot exceed 500 characters",
                        transaction.id
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outgoing(id: &str, amount: i64) -> Transaction {
        Transaction::new(
            id.to_string(),
            "fund".to_string(),
            "child".to_string(),
            TransactionDirection::Outgoing,
            BigDecimal::from(amount),
            None,
        )
    }

    #[test]
    fn test_validate_amount() {
        assert_eq!(
            validate_amount("t1", 95.1).unwrap(),
            BigDecimal::from_str("95.1").unwrap()
        );
        assert_eq!(validate_amount("t1", -50.0).unwrap(), BigDecimal::from(-50));
        assert!(matches!(
            validate_amount("t1", f64::NAN),
            Err(ReconciliationError::InvalidAmount { .. })
        ));
        assert!(matches!(
            validate_amount("t1", f64::INFINITY),
            Err(ReconciliationError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_parse_amount_text() {
        assert_eq!(
            parse_amount("t1", " 1250.50 ").unwrap(),
            BigDecimal::from_str("1250.5").unwrap()
        );
        assert!(matches!(
            parse_amount("t1", "12,50"),
            Err(ReconciliationError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert_eq!(parse_date("t1", "2024-01-10").unwrap(), expected);
        assert_eq!(parse_date("t1", "2024-01-10T09:30:00Z").unwrap(), expected);
        assert!(matches!(
            parse_date("t1", "10/01/2024"),
            Err(ReconciliationError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_unique_ids() {
        assert!(validate_unique_ids(&[outgoing("a", 1), outgoing("b", 1)]).is_ok());
        assert!(matches!(
            validate_unique_ids(&[outgoing("a", 1), outgoing("a", 2)]),
            Err(ReconciliationError::DuplicateTransaction(id)) if id == "a"
        ));
    }

    #[test]
    fn test_currency_check() {
        let config = ReconciliationConfig::default().reporting_currency("usd");
        let mut transaction = outgoing("a", 10);
        assert!(validate_currency(&transaction, &config).is_ok());

        transaction.currency = Some("usd".to_string());
        assert!(validate_currency(&transaction, &config).is_ok());

        transaction.currency = Some("EUR".to_string());
        assert!(matches!(
            validate_currency(&transaction, &config),
            Err(ReconciliationError::CurrencyMismatch { .. })
        ));

        // No reporting currency configured: anything goes
        assert!(validate_currency(&transaction, &ReconciliationConfig::default()).is_ok());
    }

    #[test]
    fn test_enhanced_validator_checks_type_direction() {
        let config = ReconciliationConfig::default();
        let mut transaction = outgoing("a", 10);
        transaction.transaction_type = Some(TransactionType::Disbursement);
        assert!(EnhancedTransactionValidator
            .validate_transactions(&[transaction.clone()], &config)
            .is_ok());

        transaction.transaction_type = Some(TransactionType::IncomingFunds);
        assert!(matches!(
            EnhancedTransactionValidator.validate_transactions(&[transaction], &config),
            Err(ReconciliationError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_id_rejected() {
        let config = ReconciliationConfig::default();
        assert!(matches!(
            DefaultTransactionValidator.validate_transactions(&[outgoing(" ", 1)], &config),
            Err(ReconciliationError::Validation(_))
        ));
    }

    #[test]
    fn test_long_id_accepted() {
        let config = ReconciliationConfig::default();
        let id = format!("XM-DAC-41114-{}", "9".repeat(240));
        assert!(DefaultTransactionValidator
            .validate_transactions(&[outgoing(&id, 1)], &config)
            .is_ok());
    }
}
