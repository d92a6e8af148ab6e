use crate::error::CtlError;

use common::ErrorLocation;
use session_core::CommandSession;
use session_core::config::DeviceConfig;
use session_core::session::device::ATTACHED_STATES;

use std::io::{BufRead, Write};
use std::panic::Location;

use log::{debug, error, info};

/// Print the device state.
pub fn query_state<R: BufRead, W: Write>(
    session: &mut CommandSession<R, W>,
) -> Result<String, CtlError> {
    debug!("Querying device state");

    let state = session.get_state().inspect_err(|e| {
        error!("Failed to query state: {e}");
    })?;

    Ok(state)
}

/// Join the configured network and wait until the device attaches.
///
/// # Returns
///
/// * `Ok(state)` - The attached state the device reached
/// * `Err(CtlError::Ctl)` - No network dataset configured
/// * `Err(CtlError::Core)` - A join command failed or the device never attached
pub fn join<R: BufRead, W: Write>(
    session: &mut CommandSession<R, W>,
    config: &DeviceConfig,
) -> Result<String, CtlError> {
    let dataset = config.network.clone().ok_or_else(|| CtlError::Ctl {
        message: "No network dataset configured (set \"network\" in ftd-ctl.json)".to_string(),
        location: ErrorLocation::from(Location::caller()),
    })?;

    info!(
        "Joining network {}",
        dataset.network_name().unwrap_or("<unnamed>")
    );

    session.join_network(dataset).inspect_err(|e| {
        error!("Join failed, device may be partially configured: {e}");
    })?;

    session
        .wait_for_state_any_of(&ATTACHED_STATES, config.timing.state_timeout())
        .inspect_err(|e| {
            error!("Device did not attach: {e}");
        })?;

    let state = session.get_state()?;
    info!("Device attached as {state}");
    Ok(state)
}

/// Stop the radio.
pub fn stop<R: BufRead, W: Write>(session: &mut CommandSession<R, W>) -> Result<String, CtlError> {
    session.stop_radio().inspect_err(|e| {
        error!("Failed to stop radio: {e}");
    })?;

    Ok("stopped".to_string())
}

/// Factory reset the device. Nothing is read back.
pub fn reset<R: BufRead, W: Write>(session: &mut CommandSession<R, W>) -> Result<String, CtlError> {
    session.factory_reset().inspect_err(|e| {
        error!("Failed to factory reset: {e}");
    })?;

    Ok("reset issued".to_string())
}

/// Print the first routable address, or `none`.
///
/// Only meaningful after a join in the same session, since the mesh-local
/// prefix comes from the joined dataset.
pub fn routable_address<R: BufRead, W: Write>(
    session: &mut CommandSession<R, W>,
) -> Result<String, CtlError> {
    let address = session.get_routable_address().inspect_err(|e| {
        error!("Failed to look up routable address: {e}");
    })?;

    Ok(address.map_or_else(|| "none".to_string(), |a| a.to_string()))
}

/// Wait for any of `states`, bounded by the configured state timeout.
pub fn wait_for_states<R: BufRead, W: Write>(
    session: &mut CommandSession<R, W>,
    states: &[String],
    config: &DeviceConfig,
) -> Result<String, CtlError> {
    let wanted: Vec<&str> = states.iter().map(String::as_str).collect();

    session
        .wait_for_state_any_of(&wanted, config.timing.state_timeout())
        .inspect_err(|e| {
            error!("Wait for {wanted:?} failed: {e}");
        })?;

    Ok(session.get_state()?)
}
