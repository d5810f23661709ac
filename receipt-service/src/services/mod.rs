pub mod database;
pub mod extraction;
pub mod jwt;
pub mod metrics;
pub mod password;
pub mod providers;
pub mod storage;

pub use database::Database;
pub use extraction::{
    ExtractionError, ExtractionOutput, ExtractionSource, ReceiptExtractor, RECEIPT_PROMPT,
};
pub use jwt::{Claims, JwtService};
pub use storage::{LocalStorage, ReceiptStorage, StoredReceipt, SupabaseStorage};
