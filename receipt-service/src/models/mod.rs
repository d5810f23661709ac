pub mod extraction;
pub mod transaction;
pub mod user;

pub use extraction::{AmountValue, ExtractedFields};
pub use transaction::{NewTransaction, Transaction};
pub use user::User;
