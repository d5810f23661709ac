pub mod auth;
pub mod dashboard;
pub mod receipts;

pub use auth::{AuthResponse, LoginRequest, SignupRequest, UserResponse};
pub use dashboard::{
    DateFilterQuery, ListSummary, Pagination, RecentQuery, RecentTransactionsResponse,
    StatsResponse, TransactionListQuery, TransactionListResponse,
};
pub use receipts::{
    ConfirmTransactionRequest, ConfirmTransactionResponse, ReceiptScanResponse,
    RejectedExtraction, UploadAndSaveResponse,
};
