//! Bounded waiting for a condition on the device.

use crate::error::session::SessionError;

use common::ErrorLocation;

use std::panic::Location;
use std::thread::sleep;
use std::time::{Duration, Instant};

use backoff::backoff::{Backoff, Constant};
use log::{debug, trace, warn};

/// Delay between predicate checks when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Shortest delay between predicate checks; smaller intervals are raised to it.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Poll `predicate` every [`DEFAULT_POLL_INTERVAL`] until it holds or `timeout` elapses.
#[track_caller]
pub fn wait_for<F>(predicate: F, timeout: Duration) -> Result<(), SessionError>
where
    F: FnMut() -> Result<bool, SessionError>,
{
    wait_for_with_interval(predicate, timeout, DEFAULT_POLL_INTERVAL)
}

/// Poll `predicate` until it returns `true` or `timeout` elapses.
///
/// The predicate is always evaluated at least once. Sleeps are clamped to
/// the time left, so a timeout is reported no earlier than `timeout` and at
/// most one predicate evaluation later. `interval` is raised to
/// [`MIN_POLL_INTERVAL`] so a zero interval cannot spin.
///
/// # Returns
///
/// * `Ok(())` - The predicate returned `true`
/// * `Err(SessionError::Timeout)` - The predicate never held within `timeout`
/// * `Err(e)` - The predicate itself failed; returned as-is
#[track_caller]
pub fn wait_for_with_interval<F>(
    mut predicate: F,
    timeout: Duration,
    interval: Duration,
) -> Result<(), SessionError>
where
    F: FnMut() -> Result<bool, SessionError>,
{
    let interval = interval.max(MIN_POLL_INTERVAL);
    let started = Instant::now();
    let mut backoff = Constant::new(interval);
    let mut checks: u32 = 0;

    loop {
        checks += 1;

        if predicate()? {
            debug!(
                "Condition met after {checks} check(s) in {:?}",
                started.elapsed()
            );
            return Ok(());
        }

        let elapsed = started.elapsed();
        if elapsed >= timeout {
            warn!("Condition not met after {checks} check(s) within {timeout:?}");
            return Err(SessionError::Timeout {
                message: format!(
                    "Condition not met within {timeout:?} ({checks} checks, {elapsed:?} elapsed)"
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let delay = backoff
            .next_backoff()
            .unwrap_or(interval)
            .min(timeout - elapsed);

        trace!("Condition not met, re-checking after {delay:?}");
        sleep(delay);
    }
}
