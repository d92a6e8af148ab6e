use crate::CommandSession;
use crate::error::session::SessionError;
use crate::session::response::{ResponseLine, classify, read_response};

use std::io::{BufRead, Cursor};

/// **VALUE**: Verifies the four-way classification of response lines.
///
/// **WHY THIS MATTERS**: The read loop's whole behavior hangs on this match. A
/// mis-ordered check (e.g. prompt before error) would turn device errors into noise.
///
/// **BUG THIS CATCHES**: Would catch `Done` being matched as a prefix instead of exactly,
/// or `Error:` lines being returned as content.
#[test]
fn given_protocol_lines_when_classified_then_maps_each_kind() {
    // GIVEN / WHEN / THEN
    assert_eq!(classify("Done"), ResponseLine::Done);
    assert_eq!(
        classify("Error: 7: InvalidArgs"),
        ResponseLine::Error("Error: 7: InvalidArgs")
    );
    assert_eq!(classify("> state"), ResponseLine::Prompt);
    assert_eq!(classify("leader"), ResponseLine::Content("leader"));

    // AND: Near misses are content
    assert_eq!(classify("Done!"), ResponseLine::Content("Done!"));
    assert_eq!(classify(" Done"), ResponseLine::Content(" Done"));
    assert_eq!(classify(">state"), ResponseLine::Content(">state"));
    assert_eq!(classify(""), ResponseLine::Content(""));
}

/// **VALUE**: Verifies that CRLF line endings from the device are stripped.
///
/// **WHY THIS MATTERS**: The simulated CLI may terminate lines with `\r\n`. Without
/// stripping, `"Done\r"` never equals the sentinel and the read loop runs to EOF.
///
/// **BUG THIS CATCHES**: Would catch trimming only `\n`.
#[test]
fn given_crlf_terminated_response_when_read_then_strips_line_endings() {
    // GIVEN: A CRLF response
    let mut reader = Cursor::new(b"leader\r\nDone\r\n".to_vec());

    // WHEN: Reading the response
    let lines = read_response(&mut reader, "state").unwrap();

    // THEN: Content line without the carriage return
    assert_eq!(lines, vec!["leader".to_string()]);
}

/// **VALUE**: Verifies that reading stops at the `Error:` line and leaves later lines unread.
///
/// **WHY THIS MATTERS**: Whatever follows the error belongs to a later exchange. Consuming
/// it here would desynchronize every subsequent command.
///
/// **BUG THIS CATCHES**: Would catch the loop continuing past an error to look for `Done`.
#[test]
fn given_error_line_followed_by_more_output_when_read_then_stops_at_error() {
    // GIVEN: An error line with trailing output
    let mut reader = Cursor::new(b"> ifconfig up\nError: 13: InvalidState\nleftover\nDone\n".to_vec());

    // WHEN: Reading the response
    let result = read_response(&mut reader, "ifconfig up");

    // THEN: Protocol error carrying the whole line
    match result {
        Err(SessionError::Protocol { line, .. }) => {
            assert_eq!(line.as_deref(), Some("Error: 13: InvalidState"));
        }
        other => panic!("Expected protocol error, got {other:?}"),
    }

    // AND: The trailing lines are still in the stream
    let mut rest = String::new();
    reader.read_line(&mut rest).unwrap();
    assert_eq!(rest, "leftover\n");
}

/// **VALUE**: Verifies that a stream ending mid-response is a read failure.
///
/// **WHY THIS MATTERS**: A device that crashes mid-response must not look like a
/// command that succeeded with partial output.
///
/// **BUG THIS CATCHES**: Would catch EOF being treated as an implicit `Done`.
#[test]
fn given_stream_ending_without_terminator_when_read_then_returns_truncated_read_error() {
    // GIVEN: Content but no terminator
    let mut reader = Cursor::new(b"fe80::1\nfd00::1\n".to_vec());

    // WHEN: Reading the response
    let result = read_response(&mut reader, "ipaddr");

    // THEN: Read error without an I/O source
    match result {
        Err(SessionError::Read { message, source, .. }) => {
            assert!(source.is_none(), "Truncation has no underlying I/O error");
            assert!(message.contains("Truncated"), "Message was: {message}");
            assert!(message.contains("ipaddr"), "Message was: {message}");
        }
        other => panic!("Expected read error, got {other:?}"),
    }
}

/// **VALUE**: Verifies that a line with invalid UTF-8 is returned as lossy content and
/// the read still runs to the terminator.
///
/// **WHY THIS MATTERS**: Failing mid-response would leave the rest of it, including its
/// `Done`, in the reader for the next command to pick up.
///
/// **BUG THIS CATCHES**: Would catch decoding with `read_line`, which errors out on the
/// first bad byte.
#[test]
fn given_invalid_utf8_line_when_read_then_returns_lossy_content_and_consumes_done() {
    // GIVEN: A garbled line followed by the terminator and a later response
    let mut reader = Cursor::new(b"\xffrouter\r\nDone\nleftover\n".to_vec());

    // WHEN: Reading the response
    let lines = read_response(&mut reader, "state").unwrap();

    // THEN: The bad byte is replaced and the terminator is consumed
    assert_eq!(lines, vec!["\u{FFFD}router".to_string()]);
    let mut rest = String::new();
    reader.read_line(&mut rest).unwrap();
    assert_eq!(rest, "leftover\n");
}

/// **VALUE**: Verifies that a garbled response does not shift the following command's
/// output by one exchange.
///
/// **BUG THIS CATCHES**: Would catch `ipaddr` returning an empty list because it read the
/// `Done` left over from `state`.
#[test]
fn given_invalid_utf8_in_first_response_when_second_command_executes_then_gets_own_lines() {
    // GIVEN: A session whose first response carries a non-UTF-8 byte
    let mut session = CommandSession::new(
        Cursor::new(b"\xffrouter\nDone\nfe80::1\n2001:db8::5\nDone\n".to_vec()),
        Vec::new(),
    );

    // WHEN: Running two commands back to back
    let state = session.execute_command("state").unwrap();
    let addresses = session.execute_command("ipaddr").unwrap();

    // THEN: Each command sees only its own response
    assert_eq!(state, vec!["\u{FFFD}router".to_string()]);
    assert_eq!(
        addresses,
        vec!["fe80::1".to_string(), "2001:db8::5".to_string()]
    );
}
