//! Command/response driver for a simulated Thread device (`ot-cli-ftd`).
//!
//! The device is driven over its stdin/stdout with a line protocol: one
//! command per line in, zero or more content lines out, terminated by
//! [`DONE_SENTINEL`] or a line starting with [`ERROR_PREFIX`].

pub mod config;
pub mod error;
pub mod launch;
pub mod listener;
pub mod session;
pub mod wait;

#[cfg(test)]
mod tests;

pub use session::CommandSession;

pub const DEVICE_BINARY: &str = "ot-cli-ftd";

/// Exact-match success terminator.
pub const DONE_SENTINEL: &str = "Done";

/// Prefix of a failure terminator; the rest of the line is the detail.
pub const ERROR_PREFIX: &str = "Error:";

/// Prefix of an echoed prompt line, never content.
pub const PROMPT_PREFIX: &str = "> ";
