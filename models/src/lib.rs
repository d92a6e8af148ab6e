//! Domain models for the simulated Thread device driver.
//!
//! Models have no I/O - they are data passed between the command session
//! and its callers. The operational dataset is kept opaque: the hex TLV
//! string is produced elsewhere and only validated for shape here.

pub mod dataset;
pub mod error;
pub mod ipv6_prefix;

pub use common::ErrorLocation;
pub use dataset::OperationalDataset;
pub use dataset::builder::OperationalDatasetBuilder;
pub use error::model_error::ModelError;
pub use ipv6_prefix::Ipv6Prefix;

#[cfg(test)]
mod tests;
