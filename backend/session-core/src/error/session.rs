use common::ErrorLocation;

use std::io::Error as IoError;

use thiserror::Error as ThisError;

/// Failures of a command round-trip with the device.
///
/// `Protocol` is the only fatal variant: the device rejected a command or
/// answered with a malformed response, which means the caller sent something
/// wrong. The other variants describe the channel or the clock.
#[derive(Debug, ThisError)]
pub enum SessionError {
    #[error("Write Error: {message} {location}")]
    Write {
        message: String,
        location: ErrorLocation,
        #[source]
        source: IoError,
    },

    #[error("Read Error: {message} {location}")]
    Read {
        message: String,
        location: ErrorLocation,
        #[source]
        source: Option<IoError>,
    },

    #[error("Protocol Error: {message} {location}")]
    Protocol {
        message: String,
        /// The full `Error:` line when the device reported one.
        line: Option<String>,
        location: ErrorLocation,
    },

    #[error("Timeout Error: {message} {location}")]
    Timeout {
        message: String,
        location: ErrorLocation,
    },
}

impl SessionError {
    /// Whether the calling operation should abort instead of recovering.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SessionError::Protocol { .. })
    }
}
