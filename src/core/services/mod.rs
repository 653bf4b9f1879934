pub mod bucket_service;
pub mod summary_service;
pub mod transaction_service;

pub use bucket_service::BucketService;
pub use summary_service::{ManagementSummary, Statement, SummaryService, TransactionFilter};
pub use transaction_service::TransactionService;

pub type ServiceResult<T> = crate::errors::Result<T>;
