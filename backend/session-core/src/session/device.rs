//! Device operations layered on [`CommandSession::execute_command`].
//!
//! Multi-command operations are fail-fast: the first failing command aborts
//! the sequence and nothing is rolled back. Recovering from a half-applied
//! join is the caller's job (usually via [`CommandSession::factory_reset`]).

use crate::error::session::SessionError;
use crate::session::CommandSession;
use crate::wait::wait_for_with_interval;
use crate::DEVICE_BINARY;

use common::ErrorLocation;
use models::OperationalDataset;

use std::io::{BufRead, Write};
use std::net::Ipv6Addr;
use std::panic::Location;
use std::time::Duration;

use const_format::concatcp;
use log::{debug, info, trace, warn};

const STATE: &str = "state";
const IPADDR: &str = "ipaddr";
const DATASET_SET_ACTIVE: &str = "dataset set active";
const IFCONFIG: &str = "ifconfig";
const IFCONFIG_UP: &str = concatcp!(IFCONFIG, " up");
const IFCONFIG_DOWN: &str = concatcp!(IFCONFIG, " down");
const THREAD: &str = "thread";
const THREAD_START: &str = concatcp!(THREAD, " start");
const THREAD_STOP: &str = concatcp!(THREAD, " stop");
const FACTORY_RESET: &str = "factoryreset";

/// Blank lines written after `factoryreset` so the restarting device does not
/// swallow the start of the next command.
pub const FACTORY_RESET_FLUSH_LINES: usize = 1000;

/// Every state token `state` can answer with.
pub const DEVICE_STATES: [&str; 5] = ["disabled", "detached", "child", "router", "leader"];

/// States in which the device is attached to a network.
pub const ATTACHED_STATES: [&str; 3] = ["child", "router", "leader"];

impl<R: BufRead, W: Write> CommandSession<R, W> {
    /// Current device state, e.g. `"leader"`, exactly as the device printed it.
    #[track_caller]
    pub fn get_state(&mut self) -> Result<String, SessionError> {
        self.execute_command(STATE)?
            .into_iter()
            .next()
            .ok_or_else(|| SessionError::Protocol {
                message: format!("{DEVICE_BINARY} returned no lines for '{STATE}'"),
                line: None,
                location: ErrorLocation::from(Location::caller()),
            })
    }

    /// Poll [`Self::get_state`] until it reports one of `states`.
    ///
    /// A failing `state` command ends the wait with that error, not a timeout.
    #[track_caller]
    pub fn wait_for_state_any_of(
        &mut self,
        states: &[&str],
        timeout: Duration,
    ) -> Result<(), SessionError> {
        debug!("Waiting up to {timeout:?} for state in {states:?}");

        let interval = self.poll_interval;
        wait_for_with_interval(
            || {
                let state = self.get_state()?;
                trace!("Device state: {state}");
                Ok(states.contains(&state.as_str()))
            },
            timeout,
            interval,
        )
    }

    /// Join the network described by `dataset`.
    ///
    /// The dataset becomes the active dataset before any command is sent, so a
    /// join that fails halfway still classifies addresses against it.
    pub fn join_network(&mut self, dataset: OperationalDataset) -> Result<(), SessionError> {
        let set_active = format!("{DATASET_SET_ACTIVE} {}", dataset.tlvs_hex());
        self.active_dataset = Some(dataset);

        self.execute_command(&set_active)?;
        self.execute_command(IFCONFIG_UP)?;
        self.execute_command(THREAD_START)?;

        info!("{DEVICE_BINARY} started joining the network");
        Ok(())
    }

    /// Stop the Thread radio and bring the interface down.
    pub fn stop_radio(&mut self) -> Result<(), SessionError> {
        self.execute_command(THREAD_STOP)?;
        self.execute_command(IFCONFIG_DOWN)?;
        Ok(())
    }

    /// First unicast address that is neither link-local nor mesh-local.
    ///
    /// Addresses are checked in the order the device lists them. Returns
    /// `Ok(None)` without querying the device when no dataset has been joined,
    /// since there is no mesh-local prefix to compare against.
    #[track_caller]
    pub fn get_routable_address(&mut self) -> Result<Option<Ipv6Addr>, SessionError> {
        let Some(mesh_local_prefix) = self.active_dataset.as_ref().map(|d| *d.mesh_local_prefix())
        else {
            warn!("No active dataset, cannot classify mesh-local addresses");
            return Ok(None);
        };

        for address in self.execute_command(IPADDR)? {
            let parsed = address.parse::<Ipv6Addr>().map_err(|e| SessionError::Protocol {
                message: format!("Invalid address '{address}' in '{IPADDR}' output: {e}"),
                line: None,
                location: ErrorLocation::from(Location::caller()),
            })?;

            if parsed.is_unicast_link_local() {
                trace!("Skipping link-local address {parsed}");
                continue;
            }

            if mesh_local_prefix.contains(&parsed) {
                trace!("Skipping mesh-local address {parsed}");
                continue;
            }

            return Ok(Some(parsed));
        }

        debug!("No routable address among the device's unicast addresses");
        Ok(None)
    }

    /// Issue `factoryreset` without reading a response.
    ///
    /// The device restarts instead of printing `Done`, so waiting for one would
    /// block forever. The blank lines realign its input buffer for whatever
    /// command comes next.
    #[track_caller]
    pub fn factory_reset(&mut self) -> Result<(), SessionError> {
        debug!("{DEVICE_BINARY} >> {FACTORY_RESET}");

        self.write_line(FACTORY_RESET)?;
        self.flush(FACTORY_RESET)?;

        for _ in 0..FACTORY_RESET_FLUSH_LINES {
            self.write_line("")?;
        }
        self.flush(FACTORY_RESET)?;

        info!("{DEVICE_BINARY} factory reset issued");
        Ok(())
    }
}
