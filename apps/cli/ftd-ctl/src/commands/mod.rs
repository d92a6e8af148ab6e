//! Command-line actions and their dispatch onto a device session.

pub mod device;

use crate::error::CtlError;

use common::ErrorLocation;
use session_core::CommandSession;
use session_core::config::DeviceConfig;
use session_core::session::device::DEVICE_STATES;

use std::io::{BufRead, Write};
use std::panic::Location;

pub const USAGE: &str = "\
ftd-ctl - drive a simulated Thread device (ot-cli-ftd)

USAGE:
  ftd-ctl <action> [<action>...]

Actions run in order against one device process, e.g. `ftd-ctl join omr`.

ACTIONS:
  state              Print the device state
  join               Join the network configured under \"network\" and wait to attach
  stop               Stop the Thread radio and bring the interface down
  reset              Factory reset the device
  omr                Print the first routable (off-mesh) address
  wait <state>...    Wait until the device reaches one of the given states
  help               Show this help
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    State,
    Join,
    Stop,
    Reset,
    Omr,
    Wait(Vec<String>),
    Help,
}

impl Action {
    /// Parse the arguments after the program name into actions run in order.
    ///
    /// `wait` takes every following argument that names a device state.
    /// No arguments means `help`.
    #[track_caller]
    pub fn parse_all(args: &[String]) -> Result<Vec<Self>, CtlError> {
        if args.is_empty() {
            return Ok(vec![Action::Help]);
        }

        let mut actions = Vec::new();
        let mut remaining = args;

        while let Some((name, rest)) = remaining.split_first() {
            remaining = rest;

            let action = match name.as_str() {
                "state" => Action::State,
                "join" => Action::Join,
                "stop" => Action::Stop,
                "reset" => Action::Reset,
                "omr" => Action::Omr,
                "help" | "-h" | "--help" => Action::Help,
                "wait" => {
                    let count = rest
                        .iter()
                        .take_while(|s| DEVICE_STATES.contains(&s.as_str()))
                        .count();

                    if count == 0 {
                        return Err(CtlError::Usage {
                            message: format!(
                                "wait needs at least one state (one of {})",
                                DEVICE_STATES.join(", ")
                            ),
                            location: ErrorLocation::from(Location::caller()),
                        });
                    }

                    let (states, rest) = rest.split_at(count);
                    remaining = rest;
                    Action::Wait(states.to_vec())
                }
                other => {
                    return Err(CtlError::Usage {
                        message: format!("Unknown action '{other}'"),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
            };

            actions.push(action);
        }

        Ok(actions)
    }

    /// Whether the action needs a running device.
    pub fn needs_device(&self) -> bool {
        !matches!(self, Action::Help)
    }

    /// Run the action and return the text to print.
    pub fn run<R: BufRead, W: Write>(
        &self,
        session: &mut CommandSession<R, W>,
        config: &DeviceConfig,
    ) -> Result<String, CtlError> {
        match self {
            Action::State => device::query_state(session),
            Action::Join => device::join(session, config),
            Action::Stop => device::stop(session),
            Action::Reset => device::reset(session),
            Action::Omr => device::routable_address(session),
            Action::Wait(states) => device::wait_for_states(session, states, config),
            Action::Help => Ok(USAGE.to_string()),
        }
    }
}
