//! Records exchanged with the persistence collaborator and the types the
//! aggregator is keyed by.

pub mod bucket;
pub mod common;
pub mod period;
pub mod transaction;
pub mod transaction_id;

pub use bucket::Bucket;
pub use common::{Displayable, NamedEntity};
pub use period::MonthSelector;
pub use transaction::{
    RawTransaction, Transaction, TransactionDraft, TransactionKind, TransactionPatch,
};
pub use transaction_id::TransactionId;
