use crate::core::services::ServiceResult;
use crate::domain::Bucket;
use crate::ledger::Ledger;

/// Append-only management of savings bucket names.
pub struct BucketService;

impl BucketService {
    /// Appends a bucket. Returns `false` when the name already exists.
    pub fn add(ledger: &mut Ledger, name: &str) -> ServiceResult<bool> {
        let bucket = Bucket::new(name)?;
        let added = ledger.add_bucket(bucket.clone());
        if !added {
            tracing::info!(bucket = %bucket, "bucket already exists; skipping");
        }
        Ok(added)
    }

    pub fn list(ledger: &Ledger) -> &[Bucket] {
        &ledger.buckets
    }
}
