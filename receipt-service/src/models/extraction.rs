use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Amount as the vision model reports it: sometimes a JSON number, sometimes
/// a string with separators. The raw value is kept so the verifier can flag
/// non-numeric text instead of silently dropping it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountValue {
    Number(f64),
    Text(String),
}

impl AmountValue {
    /// Best-effort decimal interpretation. Thousands separators are
    /// stripped from text values; anything else non-numeric is `None`.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            AmountValue::Number(n) => Decimal::from_f64_retain(*n),
            AmountValue::Text(s) => s.trim().replace(',', "").parse().ok(),
        }
    }
}

/// Structured fields pulled off a receipt image.
///
/// Ephemeral, request-scoped: staged for user confirmation (or auto-save)
/// and never persisted in this shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractedFields {
    pub journal_number: Option<String>,
    pub amount: Option<AmountValue>,
    pub bank_name: Option<String>,
    pub transaction_date: Option<String>,
}
