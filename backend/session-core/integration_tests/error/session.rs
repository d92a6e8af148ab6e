use session_core::error::CoreError;
use session_core::error::session::SessionError;

use common::ErrorLocation;

use std::error::Error;
use std::io::{Error as IoError, ErrorKind};
use std::panic::Location;

/// **VALUE**: Verifies that every session error renders its kind, message and location.
///
/// **WHY THIS MATTERS**: Device logs are the only trace of a failed simulation run; an error
/// without its location cannot be traced back to the step that failed.
///
/// **BUG THIS CATCHES**: Would catch a variant's `#[error]` format losing `{location}`.
#[test]
fn given_each_session_error_when_formatted_then_includes_kind_and_location() {
    // GIVEN: One error per variant
    let location = ErrorLocation::from(Location::caller());
    let errors = [
        (
            SessionError::Write {
                message: "write failed".to_string(),
                location,
                source: IoError::new(ErrorKind::BrokenPipe, "pipe"),
            },
            "Write Error",
        ),
        (
            SessionError::Read {
                message: "read failed".to_string(),
                location,
                source: None,
            },
            "Read Error",
        ),
        (
            SessionError::Protocol {
                message: "device said no".to_string(),
                line: Some("Error: 7: InvalidArgs".to_string()),
                location,
            },
            "Protocol Error",
        ),
        (
            SessionError::Timeout {
                message: "too slow".to_string(),
                location,
            },
            "Timeout Error",
        ),
    ];

    for (err, kind) in errors {
        // WHEN
        let text = err.to_string();

        // THEN
        assert!(text.starts_with(kind), "{text}");
        assert!(text.contains("session.rs"), "{text}");
    }
}

/// **VALUE**: Verifies that only protocol errors are fatal.
///
/// **WHY THIS MATTERS**: Callers decide between aborting and recovering on this flag;
/// a timeout must stay recoverable (e.g. by factory reset and retry).
///
/// **BUG THIS CATCHES**: Would catch `is_fatal()` widening to other variants.
#[test]
fn given_timeout_and_protocol_errors_when_checking_fatal_then_only_protocol_is_fatal() {
    // GIVEN
    let location = ErrorLocation::from(Location::caller());
    let timeout = SessionError::Timeout {
        message: "t".to_string(),
        location,
    };
    let protocol = SessionError::Protocol {
        message: "p".to_string(),
        line: None,
        location,
    };

    // THEN
    assert!(!timeout.is_fatal());
    assert!(protocol.is_fatal());
}

/// **VALUE**: Verifies that the I/O cause is preserved as the error source and through
/// `CoreError`.
///
/// **BUG THIS CATCHES**: Would catch `#[source]` being dropped from `Write`, or `CoreError`
/// hiding the inner message.
#[test]
fn given_write_error_when_wrapped_in_core_error_then_source_chain_survives() {
    // GIVEN
    let err = SessionError::Write {
        message: "Failed to write the command state to ot-cli-ftd".to_string(),
        location: ErrorLocation::from(Location::caller()),
        source: IoError::new(ErrorKind::BrokenPipe, "pipe closed"),
    };

    // WHEN
    let core: CoreError = err.into();

    // THEN: Transparent display, source reachable
    assert!(core.to_string().contains("Failed to write the command state"));
    let source = core.source().expect("session error keeps its io source");
    assert_eq!(source.to_string(), "pipe closed");
}
