// Unit tests for the session module, including crate-private response parsing
// Integration tests for the public API are in integration_tests/session/

mod device;
mod response;

use crate::CommandSession;

use std::io::Cursor;

pub(super) type ScriptedSession = CommandSession<Cursor<Vec<u8>>, Vec<u8>>;

/// Session whose device "prints" `output` and records everything written to it.
pub(super) fn scripted(output: &str) -> ScriptedSession {
    CommandSession::new(Cursor::new(output.as_bytes().to_vec()), Vec::new())
}

/// Lines the session wrote, split on the line terminator.
pub(super) fn written_lines(session: ScriptedSession) -> Vec<String> {
    let (_, writer) = session.into_parts();
    String::from_utf8(writer)
        .unwrap()
        .split_terminator('\n')
        .map(str::to_string)
        .collect()
}
