use crate::models::Transaction;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-bank slice of a summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BankBreakdown {
    pub count: u64,
    pub amount: Decimal,
}

/// Dashboard statistics, recomputed on every query and never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransactionStats {
    pub total_transactions: u64,
    pub total_amount: Decimal,
    pub verified_count: u64,
    pub by_bank: BTreeMap<String, BankBreakdown>,
}

/// Fold a batch of transactions into totals and a per-bank breakdown.
///
/// A missing amount counts as zero rather than failing the whole summary;
/// rows without a bank are grouped under the literal label "Unknown".
pub fn summarize(transactions: &[Transaction]) -> TransactionStats {
    let mut stats = TransactionStats {
        total_transactions: transactions.len() as u64,
        ..Default::default()
    };

    for tx in transactions {
        let amount = tx.amount.unwrap_or(Decimal::ZERO);
        stats.total_amount += amount;
        if tx.verified {
            stats.verified_count += 1;
        }

        let bank = tx
            .bank_name
            .clone()
            .unwrap_or_else(|| "Unknown".to_string());
        let entry = stats.by_bank.entry(bank).or_default();
        entry.count += 1;
        entry.amount += amount;
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn tx(amount: Option<&str>, bank: Option<&str>, verified: bool) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            journal_number: "RR000111".to_string(),
            amount: amount.map(|a| a.parse().unwrap()),
            bank_name: bank.map(str::to_string),
            mobile_number: None,
            transaction_date: Utc::now(),
            receipt_image_url: None,
            raw_extracted_data: None,
            verified,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_input_yields_empty_summary() {
        let stats = summarize(&[]);
        assert_eq!(stats.total_transactions, 0);
        assert_eq!(stats.total_amount, Decimal::ZERO);
        assert!(stats.by_bank.is_empty());
    }

    #[test]
    fn groups_missing_bank_under_unknown() {
        let stats = summarize(&[
            tx(Some("100.50"), Some("mBOB"), true),
            tx(Some("49.50"), None, false),
        ]);

        assert_eq!(stats.total_transactions, 2);
        assert_eq!(stats.total_amount, "150.00".parse().unwrap());
        assert_eq!(stats.verified_count, 1);

        let mbob = &stats.by_bank["mBOB"];
        assert_eq!((mbob.count, mbob.amount), (1, "100.50".parse().unwrap()));

        let unknown = &stats.by_bank["Unknown"];
        assert_eq!((unknown.count, unknown.amount), (1, "49.50".parse().unwrap()));
    }

    #[test]
    fn missing_amount_counts_as_zero() {
        let stats = summarize(&[tx(None, Some("BNB"), true), tx(Some("10"), Some("BNB"), true)]);
        assert_eq!(stats.total_amount, "10".parse().unwrap());
        assert_eq!(stats.by_bank["BNB"].count, 2);
        assert_eq!(stats.by_bank["BNB"].amount, "10".parse().unwrap());
    }

    #[test]
    fn grouping_is_insertion_order_independent() {
        let a = summarize(&[
            tx(Some("5"), Some("TPAY"), true),
            tx(Some("7"), Some("MBOB"), true),
        ]);
        let b = summarize(&[
            tx(Some("7"), Some("MBOB"), true),
            tx(Some("5"), Some("TPAY"), true),
        ]);
        assert_eq!(a.by_bank, b.by_bank);
    }
}
