use crate::models::ExtractedFields;
use rust_decimal::Decimal;
use serde::Serialize;

/// Coarse quality tier derived from the number of missing-field issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Outcome of checking extracted fields for completeness. Always recomputed,
/// never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub confidence: Confidence,
}

/// Score extracted fields for completeness.
///
/// The three rules run unconditionally and accumulate issues in a fixed
/// order: journal number, amount, bank name. Callers rely on that ordering.
pub fn verify(fields: &ExtractedFields) -> VerificationResult {
    let mut issues = Vec::new();

    if is_blank(&fields.journal_number) {
        issues.push("Journal number is missing".to_string());
    }

    let amount_ok = fields
        .amount
        .as_ref()
        .and_then(|a| a.as_decimal())
        .map(|d| d > Decimal::ZERO)
        .unwrap_or(false);
    if !amount_ok {
        issues.push("Valid amount is missing".to_string());
    }

    if is_blank(&fields.bank_name) {
        issues.push("Bank name is missing".to_string());
    }

    let confidence = match issues.len() {
        0 => Confidence::High,
        1 => Confidence::Medium,
        _ => Confidence::Low,
    };

    VerificationResult {
        is_valid: issues.is_empty(),
        issues,
        confidence,
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).unwrap_or("").is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AmountValue;

    fn complete() -> ExtractedFields {
        ExtractedFields {
            journal_number: Some("RR1".to_string()),
            amount: Some(AmountValue::Text("100".to_string())),
            bank_name: Some("mBOB".to_string()),
            transaction_date: None,
        }
    }

    #[test]
    fn empty_fields_yield_three_ordered_issues() {
        let result = verify(&ExtractedFields::default());

        assert!(!result.is_valid);
        assert_eq!(
            result.issues,
            vec![
                "Journal number is missing",
                "Valid amount is missing",
                "Bank name is missing",
            ]
        );
        assert_eq!(result.confidence, Confidence::Low);
    }

    #[test]
    fn complete_fields_are_high_confidence() {
        let result = verify(&complete());
        assert!(result.is_valid);
        assert!(result.issues.is_empty());
        assert_eq!(result.confidence, Confidence::High);
    }

    #[test]
    fn one_missing_field_is_medium_confidence() {
        let fields = ExtractedFields {
            bank_name: None,
            ..complete()
        };
        let result = verify(&fields);
        assert!(!result.is_valid);
        assert_eq!(result.issues, vec!["Bank name is missing"]);
        assert_eq!(result.confidence, Confidence::Medium);
    }

    #[test]
    fn non_positive_amount_is_flagged() {
        let fields = ExtractedFields {
            amount: Some(AmountValue::Number(0.0)),
            ..complete()
        };
        assert_eq!(verify(&fields).issues, vec!["Valid amount is missing"]);

        let fields = ExtractedFields {
            amount: Some(AmountValue::Number(-5.0)),
            ..complete()
        };
        assert_eq!(verify(&fields).issues, vec!["Valid amount is missing"]);
    }

    #[test]
    fn non_numeric_amount_is_flagged() {
        let fields = ExtractedFields {
            amount: Some(AmountValue::Text("a lot".to_string())),
            ..complete()
        };
        assert_eq!(verify(&fields).issues, vec!["Valid amount is missing"]);
    }

    #[test]
    fn whitespace_only_fields_count_as_missing() {
        let fields = ExtractedFields {
            journal_number: Some("   ".to_string()),
            ..complete()
        };
        assert_eq!(verify(&fields).issues, vec!["Journal number is missing"]);
    }

    #[test]
    fn verification_is_idempotent() {
        let fields = ExtractedFields {
            amount: None,
            ..complete()
        };
        assert_eq!(verify(&fields), verify(&fields));
    }
}
