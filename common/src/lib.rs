//! Shared plumbing for the simulated Thread device driver.
//!
//! ## Architecture
//!
//! - **common** (this crate): error location tracking used by every error enum
//! - **models**: pure data (operational dataset, IPv6 prefixes)
//! - **session-core**: the command session and device operations
//! - **ftd-ctl**: command-line front end wiring everything together

pub mod error;

pub use error::error_location::ErrorLocation;
