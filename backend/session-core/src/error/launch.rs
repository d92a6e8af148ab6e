use common::ErrorLocation;

use std::io::Error as IoError;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum LaunchError {
    #[error("Spawn Error: {message} {location}")]
    Spawn {
        message: String,
        location: ErrorLocation,
        #[source]
        source: IoError,
    },

    #[error("Pipe Error: {message} {location}")]
    Pipe {
        message: String,
        location: ErrorLocation,
    },

    #[error("Terminate Error: {message} {location}")]
    Terminate {
        message: String,
        location: ErrorLocation,
        #[source]
        source: IoError,
    },
}
