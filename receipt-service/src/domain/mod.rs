//! Pure, synchronous core: date bucketing, aggregation, extraction
//! verification and the heuristic receipt-text parser. Nothing in here
//! touches the network or the database.

pub mod aggregation;
pub mod date_range;
pub mod receipt_text;
pub mod verification;

pub use aggregation::{summarize, BankBreakdown, TransactionStats};
pub use date_range::{DateRange, FilterError, FilterType};
pub use receipt_text::{parse_receipt_text, parse_response, strip_code_fences, ParseOutcome};
pub use verification::{verify, Confidence, VerificationResult};
