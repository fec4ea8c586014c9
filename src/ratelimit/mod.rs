//! Admission control: per-client fixed-window token buckets.

mod bucket;
mod gate;
mod registry;

pub use bucket::TokenBucket;
pub use gate::AdmissionGate;
pub use registry::BucketRegistry;
