use crate::models::{AmountValue, ExtractedFields};
use regex::Regex;
use std::sync::OnceLock;

/// Payment apps recognized by the fallback line scanner. Deliberately not
/// identical to the list embedded in the model prompt; the two vocabularies
/// are maintained separately.
const BANK_KEYWORDS: [&str; 9] = [
    "mbob", "gobob", "bnb", "dk bank", "t bank", "tpay", "eteeru", "drukpay", "bdblepay",
];

static JOURNAL_RE: OnceLock<Regex> = OnceLock::new();
static AMOUNT_RE: OnceLock<Regex> = OnceLock::new();
static DATE_RE: OnceLock<Regex> = OnceLock::new();

fn journal_re() -> &'static Regex {
    JOURNAL_RE.get_or_init(|| Regex::new(r"[A-Z0-9]+").expect("valid regex"))
}

fn amount_re() -> &'static Regex {
    AMOUNT_RE.get_or_init(|| Regex::new(r"[\d,]+\.?\d*").expect("valid regex"))
}

fn date_re() -> &'static Regex {
    DATE_RE.get_or_init(|| Regex::new(r"\d{1,2}[-/]\d{1,2}[-/]\d{2,4}").expect("valid regex"))
}

/// How the model's response text was turned into fields.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// The response was valid JSON matching the expected schema.
    Structured(ExtractedFields),
    /// The response was free text; fields were recovered heuristically.
    Heuristic(ExtractedFields),
    /// The model explicitly reported it could not read the receipt.
    Failed(String),
}

/// Interpret a raw model response: strip code fences, try the strict JSON
/// shape, and fall back to the line scanner over the original text.
pub fn parse_response(raw: &str) -> ParseOutcome {
    let cleaned = strip_code_fences(raw);

    match serde_json::from_str::<serde_json::Value>(&cleaned) {
        Ok(value) => {
            if let Some(message) = value.get("error").and_then(|v| v.as_str()) {
                return ParseOutcome::Failed(message.to_string());
            }
            match serde_json::from_value::<ExtractedFields>(value) {
                Ok(fields) => ParseOutcome::Structured(fields),
                // Schema mismatch: scan the original, uncleaned text.
                Err(_) => ParseOutcome::Heuristic(parse_receipt_text(raw)),
            }
        }
        Err(_) => ParseOutcome::Heuristic(parse_receipt_text(raw)),
    }
}

/// Remove Markdown code-fence wrapping (```json ... ``` or ``` ... ```).
pub fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("```json") {
        trimmed.replace("```json", "").replace("```", "").trim().to_string()
    } else if trimmed.starts_with("```") {
        trimmed.replace("```", "").trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// Recover structured fields from unstructured receipt text. Never fails:
/// unrecognizable input yields all-null fields.
///
/// Every heuristic runs against every line; when a field matches on several
/// lines the last match wins.
pub fn parse_receipt_text(raw: &str) -> ExtractedFields {
    // The model sometimes returns valid JSON that merely failed the caller's
    // stricter decode; honor it before falling back to line scanning.
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) {
        if let Ok(fields) = serde_json::from_value::<ExtractedFields>(value) {
            return fields;
        }
    }

    let mut fields = ExtractedFields::default();

    for line in raw.lines() {
        let lower = line.to_lowercase();

        if lower.contains("journal") || lower.contains("rr number") || lower.contains("re number")
        {
            if let Some(m) = journal_re().find_iter(line).last() {
                fields.journal_number = Some(m.as_str().to_string());
            }
        }

        if lower.contains("amount") || lower.contains("nu.") || lower.contains("ngultrum") {
            if let Some(m) = amount_re().find(line) {
                if let Ok(n) = m.as_str().replace(',', "").parse::<f64>() {
                    fields.amount = Some(AmountValue::Number(n));
                }
            }
        }

        for bank in BANK_KEYWORDS {
            if lower.contains(bank) {
                fields.bank_name = Some(bank.to_uppercase());
                break;
            }
        }

        if let Some(m) = date_re().find(line) {
            fields.transaction_date = Some(m.as_str().to_string());
        }
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fences() {
        let raw = "```json\n{\"journal_number\": \"RR1\"}\n```";
        assert_eq!(strip_code_fences(raw), "{\"journal_number\": \"RR1\"}");
    }

    #[test]
    fn strips_bare_fences() {
        let raw = "```\n{\"amount\": 10}\n```";
        assert_eq!(strip_code_fences(raw), "{\"amount\": 10}");
    }

    #[test]
    fn leaves_unfenced_text_alone() {
        assert_eq!(strip_code_fences("  plain text  "), "plain text");
    }

    #[test]
    fn structured_json_wins() {
        let outcome = parse_response(r#"{"journal_number": "RR42", "amount": 10.5}"#);
        match outcome {
            ParseOutcome::Structured(fields) => {
                assert_eq!(fields.journal_number.as_deref(), Some("RR42"));
            }
            other => panic!("expected structured outcome, got {:?}", other),
        }
    }

    #[test]
    fn explicit_error_field_fails_the_parse() {
        let outcome =
            parse_response("```json\n{\"error\": \"Unable to extract data from image\"}\n```");
        assert_eq!(
            outcome,
            ParseOutcome::Failed("Unable to extract data from image".to_string())
        );
    }

    #[test]
    fn non_json_falls_back_to_heuristics() {
        let text = "Payment successful\nRR Number: RR998877\nAmount: Nu. 1,500.50\nvia mBOB app\nDate: 12/03/2025";
        let outcome = parse_response(text);
        match outcome {
            ParseOutcome::Heuristic(fields) => {
                assert_eq!(fields.journal_number.as_deref(), Some("RR998877"));
                assert_eq!(fields.amount, Some(AmountValue::Number(1500.50)));
                assert_eq!(fields.bank_name.as_deref(), Some("MBOB"));
                assert_eq!(fields.transaction_date.as_deref(), Some("12/03/2025"));
            }
            other => panic!("expected heuristic outcome, got {:?}", other),
        }
    }

    #[test]
    fn journal_takes_last_uppercase_run_on_the_line() {
        let fields = parse_receipt_text("Journal No: ABC 123 XYZ789");
        assert_eq!(fields.journal_number.as_deref(), Some("XYZ789"));
    }

    #[test]
    fn last_match_wins_per_field() {
        let fields = parse_receipt_text("RR Number: RR111\nJournal: RR222");
        assert_eq!(fields.journal_number.as_deref(), Some("RR222"));
    }

    #[test]
    fn first_bank_keyword_wins_within_a_line() {
        // "bnb" appears before "tpay" in the vocabulary.
        let fields = parse_receipt_text("paid via tpay and bnb");
        assert_eq!(fields.bank_name.as_deref(), Some("BNB"));
    }

    #[test]
    fn unrecognizable_text_yields_all_nulls() {
        let fields = parse_receipt_text("nothing to see here\njust words");
        assert_eq!(fields, ExtractedFields::default());
    }

    #[test]
    fn date_pattern_accepts_both_separators() {
        assert_eq!(
            parse_receipt_text("Dated 1-2-26").transaction_date.as_deref(),
            Some("1-2-26")
        );
        assert_eq!(
            parse_receipt_text("Dated 01/02/2026").transaction_date.as_deref(),
            Some("01/02/2026")
        );
    }

    #[test]
    fn strict_json_merges_over_null_defaults() {
        let fields = parse_receipt_text(r#"{"bank_name": "mBOB"}"#);
        assert_eq!(fields.bank_name.as_deref(), Some("mBOB"));
        assert_eq!(fields.journal_number, None);
        assert_eq!(fields.amount, None);
    }
}
