use crate::error::session::SessionError;
use crate::{DEVICE_BINARY, DONE_SENTINEL, ERROR_PREFIX, PROMPT_PREFIX};

use common::ErrorLocation;

use std::io::BufRead;
use std::panic::Location;

use log::{trace, warn};

/// How a single line read from the device is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResponseLine<'a> {
    Done,
    Error(&'a str),
    Prompt,
    Content(&'a str),
}

pub(crate) fn classify(line: &str) -> ResponseLine<'_> {
    if line == DONE_SENTINEL {
        ResponseLine::Done
    } else if line.starts_with(ERROR_PREFIX) {
        ResponseLine::Error(line)
    } else if line.starts_with(PROMPT_PREFIX) {
        ResponseLine::Prompt
    } else {
        ResponseLine::Content(line)
    }
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n".as_slice()).unwrap_or(line);
    line.strip_suffix(b"\r".as_slice()).unwrap_or(line)
}

/// Read lines until a terminator and return the content lines in arrival order.
///
/// Stops at the `Error:` line itself, so anything the device printed after it
/// stays unread in `reader`. Bytes that are not UTF-8 are replaced rather than
/// rejected so the terminator of the current response is always consumed.
#[track_caller]
pub(crate) fn read_response<R: BufRead>(
    reader: &mut R,
    command: &str,
) -> Result<Vec<String>, SessionError> {
    let mut lines = Vec::new();
    let mut buffer = Vec::new();

    loop {
        buffer.clear();

        let read = reader
            .read_until(b'\n', &mut buffer)
            .map_err(|e| SessionError::Read {
                message: format!("Failed to read the {DEVICE_BINARY} output of command: {command}"),
                location: ErrorLocation::from(Location::caller()),
                source: Some(e),
            })?;

        if read == 0 {
            return Err(SessionError::Read {
                message: format!(
                    "Truncated response to command '{command}': stream ended after {} line(s) without '{DONE_SENTINEL}'",
                    lines.len()
                ),
                location: ErrorLocation::from(Location::caller()),
                source: None,
            });
        }

        let decoded = String::from_utf8_lossy(trim_line_ending(&buffer));
        let line = decoded.as_ref();
        trace!("{DEVICE_BINARY} << {line}");

        match classify(line) {
            ResponseLine::Done => return Ok(lines),
            ResponseLine::Error(line) => {
                warn!("{DEVICE_BINARY} rejected command '{command}': {line}");
                return Err(SessionError::Protocol {
                    message: format!("{DEVICE_BINARY} reported an error: {line}"),
                    line: Some(line.to_string()),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            ResponseLine::Prompt => trace!("Discarding prompt echo: {line}"),
            ResponseLine::Content(line) => lines.push(line.to_string()),
        }
    }
}
