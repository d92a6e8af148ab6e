use super::helpers::{scripted, written};

use session_core::error::session::SessionError;
use session_core::session::device::{ATTACHED_STATES, DEVICE_STATES};

use models::OperationalDatasetBuilder;

use std::net::Ipv6Addr;
use std::time::{Duration, Instant};

/// **VALUE**: Verifies the routable-address example end to end through the public API.
///
/// **WHY THIS MATTERS**: This is how callers find the address to reach a device from off
/// the mesh after it joins.
///
/// **BUG THIS CATCHES**: Would catch the mesh-local prefix being taken from anywhere other
/// than the joined dataset.
#[test]
fn given_joined_device_when_getting_routable_address_then_skips_link_and_mesh_local() {
    // GIVEN: A device that accepts the join and lists three addresses
    let mut session = scripted(
        "Done\nDone\nDone\n> ipaddr\nfe80::1\nfd00:1234::1\n2001:db8::5\nDone\n",
    );
    let dataset = OperationalDatasetBuilder::default()
        .with_tlvs_hex("0e080000000000010000")
        .with_mesh_local_prefix("fd00:1234::/64".parse().unwrap())
        .build()
        .unwrap();
    session.join_network(dataset).unwrap();

    // WHEN
    let address = session.get_routable_address().unwrap();

    // THEN
    assert_eq!(address, Some("2001:db8::5".parse::<Ipv6Addr>().unwrap()));
}

/// **VALUE**: Verifies that waiting for an attached state polls until the device attaches.
///
/// **WHY THIS MATTERS**: This is the standard "join then wait" flow; the device reports
/// `detached` for a while before becoming `leader`.
///
/// **BUG THIS CATCHES**: Would catch the wait returning on the first answer or issuing
/// anything other than `state`.
#[test]
fn given_device_attaching_after_two_polls_when_waiting_then_returns_ok() {
    // GIVEN: detached, detached, leader
    let mut session = scripted("detached\nDone\n> state\ndetached\nDone\nleader\nDone\n");
    session.set_poll_interval(Duration::from_millis(5));

    // WHEN
    let result = session.wait_for_state_any_of(&ATTACHED_STATES, Duration::from_secs(5));

    // THEN: Three state queries
    assert!(result.is_ok(), "{result:?}");
    assert_eq!(written(session), "state\nstate\nstate\n");
}

/// **VALUE**: Verifies that a device stuck outside the wanted states times out.
///
/// **BUG THIS CATCHES**: Would catch waits that return early or never return.
#[test]
fn given_device_stuck_detached_when_waiting_then_returns_timeout() {
    // GIVEN: Far more "detached" answers than polls within the timeout
    let mut session = scripted(&"detached\nDone\n".repeat(500));
    session.set_poll_interval(Duration::from_millis(5));
    let timeout = Duration::from_millis(100);

    // WHEN
    let started = Instant::now();
    let result = session.wait_for_state_any_of(&["leader"], timeout);

    // THEN
    assert!(matches!(result, Err(SessionError::Timeout { .. })));
    assert!(started.elapsed() >= timeout);
}

/// **VALUE**: Verifies that a device error during the wait ends it with that error.
///
/// **BUG THIS CATCHES**: Would catch protocol errors being retried until timeout.
#[test]
fn given_device_rejecting_state_when_waiting_then_returns_protocol_error() {
    // GIVEN
    let mut session = scripted("Error: 13: InvalidState\n");

    // WHEN
    let result = session.wait_for_state_any_of(&DEVICE_STATES, Duration::from_secs(5));

    // THEN
    assert!(matches!(result, Err(SessionError::Protocol { .. })));
}

/// **VALUE**: Verifies that factory reset succeeds against a device that never answers,
/// and that the session is still usable afterwards.
///
/// **WHY THIS MATTERS**: After a reset, tests immediately re-join the network on the same
/// session.
///
/// **BUG THIS CATCHES**: Would catch factory reset consuming the next command's response.
#[test]
fn given_reset_then_state_when_executing_then_state_reads_its_own_response() {
    // GIVEN: Only a response for the state query after the reset
    let mut session = scripted("disabled\nDone\n");

    // WHEN
    session.factory_reset().unwrap();
    let state = session.get_state().unwrap();

    // THEN
    assert_eq!(state, "disabled");
    let text = written(session);
    assert!(text.starts_with("factoryreset\n\n"));
    assert!(text.ends_with("\n\nstate\n"));
}
