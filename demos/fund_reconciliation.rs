//! Pooled fund reconciliation example

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use fund_reconciliation::utils::MemoryRepository;
use fund_reconciliation::{
    patterns, Activity, FundReconciler, FundReconciliationReport, ReconciliationConfig,
    TransactionBuilder, TransactionType,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("Fund Reconciliation Example\n");

    let repository = MemoryRepository::new();

    // 1. A pooled fund and the activities it finances
    repository.add_activity(Activity::new(
        "XM-DAC-41114-FUND".to_string(),
        "Multi-Donor Health Fund".to_string(),
    ))?;
    repository.add_activity(Activity::child_of(
        "XM-DAC-41114-001".to_string(),
        "Maternal Health Clinics".to_string(),
        "XM-DAC-41114-FUND".to_string(),
    ))?;
    repository.add_activity(Activity::child_of(
        "XM-DAC-41114-002".to_string(),
        "Vaccine Cold Chain".to_string(),
        "XM-DAC-41114-FUND".to_string(),
    ))?;

    // 2. Disbursements recorded by the fund
    let fund = "XM-DAC-41114-FUND".to_string();
    let clinics = "XM-DAC-41114-001".to_string();
    let cold_chain = "XM-DAC-41114-002".to_string();

    repository.add_transactions([
        patterns::disbursement(
            "FUND-D-001".to_string(),
            fund.clone(),
            clinics.clone(),
            NaiveDate::from_ymd_opt(2024, 1, 15).ok_or("invalid date")?,
            BigDecimal::from(250_000),
        )?,
        patterns::disbursement(
            "FUND-D-002".to_string(),
            fund.clone(),
            clinics.clone(),
            NaiveDate::from_ymd_opt(2024, 4, 10).ok_or("invalid date")?,
            BigDecimal::from(180_000),
        )?,
        patterns::disbursement(
            "FUND-D-003".to_string(),
            fund.clone(),
            cold_chain.clone(),
            NaiveDate::from_ymd_opt(2024, 2, 1).ok_or("invalid date")?,
            BigDecimal::from(95_000),
        )?,
    ])?;

    // 3. Incoming funds recorded by the children
    repository.add_transactions([
        patterns::incoming_funds(
            "CLN-I-01".to_string(),
            clinics.clone(),
            fund.clone(),
            NaiveDate::from_ymd_opt(2024, 1, 19).ok_or("invalid date")?,
            BigDecimal::from(250_000),
        )?,
        patterns::incoming_funds(
            "CLN-I-02".to_string(),
            clinics.clone(),
            fund.clone(),
            NaiveDate::from_ymd_opt(2024, 4, 22).ok_or("invalid date")?,
            BigDecimal::from(178_500),
        )?,
        TransactionBuilder::incoming(
            "CCH-I-01".to_string(),
            cold_chain.clone(),
            fund.clone(),
            BigDecimal::from(40_000),
        )
        .transaction_type(TransactionType::IncomingFunds)
        .description("Undated partial receipt".to_string())
        .build()?,
    ])?;

    // 4. Reconcile and print the dashboard payload
    let reconciler = FundReconciler::new(repository, ReconciliationConfig::default())?;
    let reconciliation = reconciler.reconcile_fund(&fund).await?;

    for child in &reconciliation.children {
        println!(
            "  {} - {}: {} matched, {} mismatched, {} fund-only, {} child-only, discrepancy {}",
            child.child_id,
            child.child_title,
            child.matches.len(),
            child.mismatches.len(),
            child.unmatched_fund.len(),
            child.unmatched_child.len(),
            child.discrepancy
        );
    }
    println!(
        "\n  Reconciled: {:.1}%  Total discrepancy: {}\n",
        reconciliation.summary.percent_reconciled, reconciliation.summary.total_discrepancy
    );

    let report = FundReconciliationReport::from(&reconciliation);
    println!("{}", report.to_json()?);

    Ok(())
}
