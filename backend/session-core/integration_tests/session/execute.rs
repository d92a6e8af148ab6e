use super::helpers::{BrokenPipe, FlushRecorder, scripted, written};

use session_core::CommandSession;
use session_core::error::session::SessionError;

use std::io::Cursor;

/// **VALUE**: Verifies that a bare `Done` is an empty success.
///
/// **WHY THIS MATTERS**: Most configuration commands (`ifconfig up`, `thread start`) answer
/// with nothing but `Done`. Treating that as an error would break every join.
///
/// **BUG THIS CATCHES**: Would catch an "at least one line" check leaking into the read loop.
#[test]
fn given_done_only_response_when_executing_then_returns_empty_lines() {
    // GIVEN: A device that only acknowledges
    let mut session = scripted("Done\n");

    // WHEN: Executing a command
    let lines = session.execute_command("ifconfig up").unwrap();

    // THEN: Empty, and the command went out with a newline
    assert!(lines.is_empty());
    assert_eq!(written(session), "ifconfig up\n");
}

/// **VALUE**: Verifies that prompt echoes interleaved with content are dropped while the
/// content keeps its order.
///
/// **WHY THIS MATTERS**: The CLI echoes its prompt at unpredictable points. Callers index
/// into the result (`state` takes the first line) so order and filtering both matter.
///
/// **BUG THIS CATCHES**: Would catch prompt lines leaking into results or content being
/// reordered.
#[test]
fn given_prompts_interleaved_with_content_when_executing_then_returns_content_in_order() {
    // GIVEN: Prompts before, between and after content lines
    let output = "> ipaddr\nfd00:1234::1\n> \nfe80::1\n> ipaddr\n> x\n2001:db8::5\n> \nDone\n";
    let mut session = scripted(output);

    // WHEN: Executing
    let lines = session.execute_command("ipaddr").unwrap();

    // THEN: Only content, original order
    assert_eq!(lines, vec!["fd00:1234::1", "fe80::1", "2001:db8::5"]);
}

/// **VALUE**: Verifies that each call consumes exactly one response.
///
/// **WHY THIS MATTERS**: Back-to-back commands share one stream; leaking a line from one
/// response into the next would shift every later answer.
///
/// **BUG THIS CATCHES**: Would catch reading past `Done` (e.g. buffering ahead).
#[test]
fn given_two_responses_when_executing_twice_then_each_gets_its_own() {
    // GIVEN: Two responses queued
    let mut session = scripted("leader\nDone\n> ipaddr\nfe80::1\nDone\n");

    // WHEN: Two commands
    let first = session.execute_command("state").unwrap();
    let second = session.execute_command("ipaddr").unwrap();

    // THEN: Each response separate
    assert_eq!(first, vec!["leader"]);
    assert_eq!(second, vec!["fe80::1"]);
    assert_eq!(written(session), "state\nipaddr\n");
}

/// **VALUE**: Verifies that a device error is a fatal protocol error carrying the full line.
///
/// **WHY THIS MATTERS**: An `Error:` answer means the caller sent something invalid; it
/// must stop the calling operation rather than be retried.
///
/// **BUG THIS CATCHES**: Would catch the detail being trimmed to the part after the prefix,
/// or the error being classified as recoverable.
#[test]
fn given_error_response_when_executing_then_returns_fatal_protocol_error() {
    // GIVEN: A rejecting device
    let mut session = scripted("Error: 7: InvalidArgs\n");

    // WHEN: Executing
    let err = session.execute_command("dataset set active zz").unwrap_err();

    // THEN: Fatal, with the whole line
    assert!(err.is_fatal());
    match err {
        SessionError::Protocol { line, message, .. } => {
            assert_eq!(line.as_deref(), Some("Error: 7: InvalidArgs"));
            assert!(message.contains("Error: 7: InvalidArgs"));
        }
        other => panic!("Expected protocol error, got {other:?}"),
    }
}

/// **VALUE**: Verifies that a closed stream without terminator is a non-fatal read failure.
///
/// **BUG THIS CATCHES**: Would catch EOF being returned as an empty success.
#[test]
fn given_closed_stream_when_executing_then_returns_read_error() {
    // GIVEN: A device that died
    let mut session = scripted("");

    // WHEN
    let err = session.execute_command("state").unwrap_err();

    // THEN
    assert!(matches!(err, SessionError::Read { .. }));
    assert!(!err.is_fatal());
}

/// **VALUE**: Verifies that a rejected write surfaces as a write error and no read happens.
///
/// **WHY THIS MATTERS**: With the device's stdin gone there is no response to wait for;
/// a read attempt against a live stdout would hang.
///
/// **BUG THIS CATCHES**: Would catch write errors being ignored before the read loop.
#[test]
fn given_broken_pipe_when_executing_then_returns_write_error() {
    // GIVEN: A session whose writer fails, with a response queued
    let mut session = CommandSession::new(Cursor::new(b"leader\nDone\n".to_vec()), BrokenPipe);

    // WHEN
    let err = session.execute_command("state").unwrap_err();

    // THEN: Write error naming the command
    match &err {
        SessionError::Write { message, .. } => assert!(message.contains("state")),
        other => panic!("Expected write error, got {other:?}"),
    }
    assert!(!err.is_fatal());

    // AND: The queued response is untouched
    let (reader, _) = session.into_parts();
    assert_eq!(reader.position(), 0);
}

/// **VALUE**: Verifies that the command is flushed in full before the response is read.
///
/// **WHY THIS MATTERS**: A buffered-but-unflushed command never reaches the device, which
/// then never answers, and the session blocks forever.
///
/// **BUG THIS CATCHES**: Would catch the flush being dropped or moved after the read.
#[test]
fn given_buffering_writer_when_executing_then_flushes_whole_command() {
    // GIVEN: A writer recording flush points
    let mut session = CommandSession::new(
        Cursor::new(b"leader\nDone\n".to_vec()),
        FlushRecorder::default(),
    );

    // WHEN
    session.execute_command("state").unwrap();

    // THEN: Flushed exactly once, after the full "state\n"
    let (_, writer) = session.into_parts();
    assert_eq!(writer.data, b"state\n");
    assert_eq!(writer.flushed_at, vec![6]);
}

/// **VALUE**: Verifies that multi-line commands are refused before anything is written.
///
/// **WHY THIS MATTERS**: An embedded newline sends two commands and desynchronizes the
/// response stream for the rest of the session.
///
/// **BUG THIS CATCHES**: Would catch the precondition check being removed.
#[test]
fn given_command_with_newline_when_executing_then_returns_protocol_error_without_writing() {
    // GIVEN
    let mut session = scripted("Done\nDone\n");

    // WHEN
    let err = session.execute_command("ifconfig up\nthread start").unwrap_err();

    // THEN
    assert!(matches!(err, SessionError::Protocol { line: None, .. }));
    assert!(written(session).is_empty());
}
