//! Test doubles standing in for the device's stdio.

use session_core::CommandSession;

use std::io::{Cursor, Error as IoError, ErrorKind, Result as IoResult, Write};

pub type ScriptedSession = CommandSession<Cursor<Vec<u8>>, Vec<u8>>;

/// Session whose device "prints" `output`.
pub fn scripted(output: &str) -> ScriptedSession {
    CommandSession::new(Cursor::new(output.as_bytes().to_vec()), Vec::new())
}

/// Everything the session wrote, as text.
pub fn written(session: ScriptedSession) -> String {
    let (_, writer) = session.into_parts();
    String::from_utf8(writer).expect("session writes UTF-8")
}

/// A device whose stdin has gone away.
pub struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> IoResult<usize> {
        Err(IoError::new(ErrorKind::BrokenPipe, "device stdin closed"))
    }

    fn flush(&mut self) -> IoResult<()> {
        Err(IoError::new(ErrorKind::BrokenPipe, "device stdin closed"))
    }
}

/// Records how much of the written data had been flushed at each flush.
#[derive(Default)]
pub struct FlushRecorder {
    pub data: Vec<u8>,
    pub flushed_at: Vec<usize>,
}

impl Write for FlushRecorder {
    fn write(&mut self, buf: &[u8]) -> IoResult<usize> {
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        self.flushed_at.push(self.data.len());
        Ok(())
    }
}
