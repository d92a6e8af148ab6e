//! The command session: one write channel, one read channel, one device.
//!
//! Not internally synchronized. A session is owned by a single caller for
//! its whole lifetime; share it across threads only behind external
//! serialization.

pub mod device;
pub(crate) mod response;

use crate::error::session::SessionError;
use crate::session::response::read_response;
use crate::wait::{DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL};
use crate::DEVICE_BINARY;

use common::ErrorLocation;
use models::OperationalDataset;

use std::io::{BufRead, Write};
use std::panic::Location;
use std::time::Duration;

use log::debug;

pub struct CommandSession<R, W> {
    reader: R,
    writer: W,
    active_dataset: Option<OperationalDataset>,
    poll_interval: Duration,
}

impl<R: BufRead, W: Write> CommandSession<R, W> {
    /// Bind a session to already-open channels. The session never closes them.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            active_dataset: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// The dataset of the most recent join attempt, if any.
    pub fn active_dataset(&self) -> Option<&OperationalDataset> {
        self.active_dataset.as_ref()
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Delay between predicate checks in [`Self::wait_for_state_any_of`].
    /// Values below [`MIN_POLL_INTERVAL`] are raised to it.
    pub fn set_poll_interval(&mut self, interval: Duration) {
        self.poll_interval = interval.max(MIN_POLL_INTERVAL);
    }

    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }

    /// Send one command and read its response.
    ///
    /// # Returns
    ///
    /// * `Ok(lines)` - Content lines before `Done`, prompt echoes removed
    /// * `Err(SessionError::Write)` - The command could not be written or flushed
    /// * `Err(SessionError::Read)` - The stream failed or ended before a terminator
    /// * `Err(SessionError::Protocol)` - The device answered with an `Error:` line,
    ///   or the command itself contained a line break
    #[track_caller]
    pub fn execute_command(&mut self, command: &str) -> Result<Vec<String>, SessionError> {
        if command.contains(['\n', '\r']) {
            return Err(SessionError::Protocol {
                message: format!("Command must be a single line: {command:?}"),
                line: None,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        debug!("{DEVICE_BINARY} >> {command}");

        self.write_line(command)?;
        self.flush(command)?;

        read_response(&mut self.reader, command)
    }

    #[track_caller]
    fn write_line(&mut self, line: &str) -> Result<(), SessionError> {
        self.writer
            .write_all(line.as_bytes())
            .and_then(|()| self.writer.write_all(b"\n"))
            .map_err(|e| SessionError::Write {
                message: format!("Failed to write the command {line} to {DEVICE_BINARY}"),
                location: ErrorLocation::from(Location::caller()),
                source: e,
            })
    }

    #[track_caller]
    fn flush(&mut self, command: &str) -> Result<(), SessionError> {
        self.writer.flush().map_err(|e| SessionError::Write {
            message: format!("Failed to flush the command {command} to {DEVICE_BINARY}"),
            location: ErrorLocation::from(Location::caller()),
            source: e,
        })
    }
}
