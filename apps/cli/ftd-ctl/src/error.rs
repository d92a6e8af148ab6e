use common::ErrorLocation;

use session_core::error::config::ConfigError;
use session_core::error::launch::LaunchError;
use session_core::error::session::SessionError;

use std::panic::Location;

use thiserror::Error;

/// Errors surfaced by the `ftd-ctl` front end.
///
/// Core errors are flattened to their message here; the full chain has
/// already been logged where the error was converted.
#[derive(Debug, Error)]
pub enum CtlError {
    /// Error from this app
    #[error("Ctl Error: {message} {location}")]
    Ctl {
        message: String,
        location: ErrorLocation,
    },

    /// Error from session-core (session, launch, config)
    #[error("Core Error: {message} {location}")]
    Core {
        message: String,
        fatal: bool,
        location: ErrorLocation,
    },

    /// Bad command line
    #[error("Usage Error: {message} {location}")]
    Usage {
        message: String,
        location: ErrorLocation,
    },
}

impl CtlError {
    /// Whether the device rejected what we sent, as opposed to a channel,
    /// launch or timing failure.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CtlError::Core { fatal: true, .. })
    }
}

impl From<SessionError> for CtlError {
    #[track_caller]
    fn from(error: SessionError) -> Self {
        CtlError::Core {
            fatal: error.is_fatal(),
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<LaunchError> for CtlError {
    #[track_caller]
    fn from(error: LaunchError) -> Self {
        CtlError::Core {
            message: error.to_string(),
            fatal: false,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ConfigError> for CtlError {
    #[track_caller]
    fn from(error: ConfigError) -> Self {
        CtlError::Core {
            message: error.to_string(),
            fatal: false,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
