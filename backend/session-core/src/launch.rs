//! Launching a simulated device and binding a session to its stdio.

use crate::error::launch::LaunchError;
use crate::session::CommandSession;

use common::ErrorLocation;

use std::io::{BufRead, BufReader, BufWriter};
use std::panic::Location;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::thread::Builder as ThreadBuilder;

use log::{debug, info, trace, warn};

/// Session bound to a launched device's stdout and stdin.
pub type DeviceSession = CommandSession<BufReader<ChildStdout>, BufWriter<ChildStdin>>;

pub(crate) fn build_launch_command(binary: &str, node_id: u32) -> Command {
    let mut cmd = Command::new(binary);
    cmd.arg(node_id.to_string())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

/// A running device process and the session that drives it.
///
/// Dropping it leaves the process running; call [`DeviceProcess::terminate`]
/// to stop it.
pub struct DeviceProcess {
    child: Child,
    node_id: u32,
    session: DeviceSession,
}

impl DeviceProcess {
    /// Spawn `<binary> <node_id>` and bind a session to its stdio.
    ///
    /// The node id selects the simulated radio; two live processes must not
    /// share one.
    ///
    /// # Returns
    ///
    /// * `Ok(DeviceProcess)` - Process running, session ready
    /// * `Err(LaunchError)` - The binary could not be spawned or a pipe was missing
    #[track_caller]
    pub fn launch(binary: &str, node_id: u32) -> Result<Self, LaunchError> {
        debug!("Attempting to spawn {binary} for node {node_id}");

        let mut child =
            build_launch_command(binary, node_id)
                .spawn()
                .map_err(|e| LaunchError::Spawn {
                    message: format!("Failed to start {binary} (id={node_id}): {e}"),
                    location: ErrorLocation::from(Location::caller()),
                    source: e,
                })?;

        let stdin = child.stdin.take().ok_or_else(|| LaunchError::Pipe {
            message: "Child process has no stdin".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let stdout = child.stdout.take().ok_or_else(|| LaunchError::Pipe {
            message: "Child process has no stdout".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        // Drain stderr so a chatty device never blocks on a full pipe
        if let Some(stderr) = child.stderr.take() {
            let drained = ThreadBuilder::new()
                .name(format!("node-{node_id}-stderr"))
                .spawn(move || {
                    for line in BufReader::new(stderr).lines() {
                        match line {
                            Ok(line) => trace!("Node {node_id} stderr: {line}"),
                            Err(_) => break,
                        }
                    }
                });

            if let Err(e) = drained {
                warn!("Failed to start stderr reader for node {node_id}: {e}");
            }
        }

        info!("Launched {binary} for node {node_id} (PID: {})", child.id());

        Ok(Self {
            child,
            node_id,
            session: CommandSession::new(BufReader::new(stdout), BufWriter::new(stdin)),
        })
    }

    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    pub fn node_id(&self) -> u32 {
        self.node_id
    }

    pub fn session(&mut self) -> &mut DeviceSession {
        &mut self.session
    }

    /// Kill the process (if still running) and reap it.
    #[track_caller]
    pub fn terminate(mut self) -> Result<(), LaunchError> {
        let pid = self.child.id();

        match self.child.try_wait() {
            Ok(Some(status)) => {
                debug!("Node {} (PID: {pid}) already exited: {status}", self.node_id);
                return Ok(());
            }
            Ok(None) => {}
            Err(e) => {
                return Err(LaunchError::Terminate {
                    message: format!("Failed to query node {} (PID: {pid}): {e}", self.node_id),
                    location: ErrorLocation::from(Location::caller()),
                    source: e,
                });
            }
        }

        self.child.kill().map_err(|e| LaunchError::Terminate {
            message: format!("Failed to kill node {} (PID: {pid}): {e}", self.node_id),
            location: ErrorLocation::from(Location::caller()),
            source: e,
        })?;

        let status = self.child.wait().map_err(|e| LaunchError::Terminate {
            message: format!("Failed to reap node {} (PID: {pid}): {e}", self.node_id),
            location: ErrorLocation::from(Location::caller()),
            source: e,
        })?;

        info!("Node {} (PID: {pid}) terminated: {status}", self.node_id);
        Ok(())
    }
}
