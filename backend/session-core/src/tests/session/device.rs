use super::{scripted, written_lines};
use crate::error::session::SessionError;
use crate::session::device::FACTORY_RESET_FLUSH_LINES;
use crate::wait::MIN_POLL_INTERVAL;

use models::{OperationalDataset, OperationalDatasetBuilder};

use std::net::Ipv6Addr;
use std::time::Duration;

fn dataset() -> OperationalDataset {
    OperationalDatasetBuilder::default()
        .with_tlvs_hex("0e080000000000010000")
        .with_mesh_local_prefix("fd00:1234::/64".parse().unwrap())
        .build()
        .unwrap()
}

/// **VALUE**: Verifies that factory reset writes the command, then the flush lines, and
/// never reads.
///
/// **WHY THIS MATTERS**: The device restarts instead of printing `Done`. Any attempt to
/// read here would block forever against a real process.
///
/// **BUG THIS CATCHES**: Would catch someone "fixing" factory reset to use
/// `execute_command`. With an empty scripted stream that would fail as truncated.
#[test]
fn given_silent_device_when_factory_reset_then_writes_reset_and_blank_lines_only() {
    // GIVEN: A device that prints nothing at all
    let mut session = scripted("");

    // WHEN: Factory resetting
    let result = session.factory_reset();

    // THEN: Succeeds without a response
    assert!(result.is_ok(), "Factory reset must not wait for Done: {result:?}");

    // AND: Exactly one reset line followed by the blank flush lines
    let lines = written_lines(session);
    assert_eq!(lines.len(), 1 + FACTORY_RESET_FLUSH_LINES);
    assert_eq!(lines[0], "factoryreset");
    assert!(lines[1..].iter().all(String::is_empty));
    assert!(FACTORY_RESET_FLUSH_LINES >= 1000);
}

/// **VALUE**: Verifies the join sequence order: dataset, interface up, thread start.
///
/// **WHY THIS MATTERS**: `thread start` before `ifconfig up` is rejected by the device,
/// and starting before the dataset is set joins the wrong network.
///
/// **BUG THIS CATCHES**: Would catch reordered or missing join steps.
#[test]
fn given_accepting_device_when_joining_then_sends_three_commands_in_order() {
    // GIVEN: A device acknowledging three commands
    let mut session = scripted("Done\nDone\nDone\n");

    // WHEN: Joining
    session.join_network(dataset()).unwrap();

    // THEN: Active dataset recorded
    assert_eq!(session.active_dataset(), Some(&dataset()));

    // AND: Commands in order
    assert_eq!(
        written_lines(session),
        vec![
            "dataset set active 0e080000000000010000",
            "ifconfig up",
            "thread start"
        ]
    );
}

/// **VALUE**: Verifies fail-fast join: a rejected `ifconfig up` stops the sequence, and the
/// attempted dataset stays active.
///
/// **WHY THIS MATTERS**: Partial state is recovered by the caller. Issuing `thread start`
/// after a failure would pile a second error on the first. Keeping the dataset lets the
/// caller still classify addresses.
///
/// **BUG THIS CATCHES**: Would catch errors being swallowed between steps, or the dataset
/// being recorded only after success.
#[test]
fn given_interface_up_rejected_when_joining_then_stops_and_keeps_dataset() {
    // GIVEN: Dataset accepted, interface up rejected
    let mut session = scripted("Done\nError: 13: InvalidState\n");

    // WHEN: Joining
    let result = session.join_network(dataset());

    // THEN: Fatal protocol error
    let err = result.unwrap_err();
    assert!(err.is_fatal());

    // AND: Dataset recorded despite failure
    assert_eq!(session.active_dataset(), Some(&dataset()));

    // AND: thread start never sent
    assert_eq!(
        written_lines(session),
        vec!["dataset set active 0e080000000000010000", "ifconfig up"]
    );
}

/// **VALUE**: Verifies stop radio order and fail-fast behavior.
///
/// **BUG THIS CATCHES**: Would catch `ifconfig down` being sent after `thread stop` failed.
#[test]
fn given_thread_stop_rejected_when_stopping_radio_then_skips_interface_down() {
    // GIVEN: A device rejecting thread stop
    let mut session = scripted("Error: 13: InvalidState\n");

    // WHEN: Stopping the radio
    let result = session.stop_radio();

    // THEN: Error, and only one command written
    assert!(result.is_err());
    assert_eq!(written_lines(session), vec!["thread stop"]);
}

/// **VALUE**: Verifies the happy path of stop radio.
#[test]
fn given_accepting_device_when_stopping_radio_then_sends_stop_then_down() {
    // GIVEN
    let mut session = scripted("Done\nDone\n");

    // WHEN
    session.stop_radio().unwrap();

    // THEN
    assert_eq!(written_lines(session), vec!["thread stop", "ifconfig down"]);
}

/// **VALUE**: Verifies that an empty `state` response is a protocol violation.
///
/// **WHY THIS MATTERS**: Callers compare the state token against a set; an empty response
/// silently treated as "" would make waits time out with no hint why.
///
/// **BUG THIS CATCHES**: Would catch indexing into an empty response or defaulting it.
#[test]
fn given_empty_state_response_when_getting_state_then_returns_protocol_error() {
    // GIVEN: Done with no content
    let mut session = scripted("> state\nDone\n");

    // WHEN: Querying state
    let result = session.get_state();

    // THEN: Structural protocol error without an error line
    match result {
        Err(SessionError::Protocol { line, .. }) => assert!(line.is_none()),
        other => panic!("Expected protocol error, got {other:?}"),
    }
}

/// **VALUE**: Verifies that only the first state line is returned verbatim.
#[test]
fn given_state_response_when_getting_state_then_returns_first_line() {
    // GIVEN
    let mut session = scripted("> state\nrouter\nDone\n");

    // WHEN
    let state = session.get_state().unwrap();

    // THEN
    assert_eq!(state, "router");
}

/// **VALUE**: Verifies routable-address selection skips link-local and mesh-local addresses.
///
/// **WHY THIS MATTERS**: Tests that ping across the border router need the OMR address;
/// picking the mesh-local EID would only reach nodes inside the mesh.
///
/// **BUG THIS CATCHES**: Would catch either filter being dropped or applied to the wrong prefix.
#[test]
fn given_mixed_addresses_when_getting_routable_address_then_returns_first_routable() {
    // GIVEN: A joined session listing link-local, mesh-local and routable addresses
    let mut session = scripted("Done\nDone\nDone\nfe80::1\nfd00:1234::1\n2001:db8::5\n2001:db8::6\nDone\n");
    session.join_network(dataset()).unwrap();

    // WHEN: Looking up the routable address
    let address = session.get_routable_address().unwrap();

    // THEN: The first address outside both prefixes
    assert_eq!(address, Some("2001:db8::5".parse::<Ipv6Addr>().unwrap()));
}

/// **VALUE**: Verifies that "none found" is an empty result, not an error.
#[test]
fn given_only_local_addresses_when_getting_routable_address_then_returns_none() {
    // GIVEN
    let mut session = scripted("Done\nDone\nDone\nfe80::1\nfd00:1234::ff:fe00:fc00\nDone\n");
    session.join_network(dataset()).unwrap();

    // WHEN
    let address = session.get_routable_address().unwrap();

    // THEN
    assert_eq!(address, None);
}

/// **VALUE**: Verifies that without an active dataset no query is made and nothing is found.
///
/// **WHY THIS MATTERS**: Without a mesh-local prefix every ULA would look routable.
///
/// **BUG THIS CATCHES**: Would catch the lookup proceeding with no prefix to compare against.
#[test]
fn given_no_active_dataset_when_getting_routable_address_then_returns_none_without_query() {
    // GIVEN: A fresh session
    let mut session = scripted("2001:db8::5\nDone\n");

    // WHEN
    let address = session.get_routable_address().unwrap();

    // THEN: Nothing found, nothing written
    assert_eq!(address, None);
    assert!(written_lines(session).is_empty());
}

/// **VALUE**: Verifies that a non-address line in `ipaddr` output is a protocol error.
///
/// **BUG THIS CATCHES**: Would catch unparseable lines being skipped or treated as routable.
#[test]
fn given_garbage_address_when_getting_routable_address_then_returns_protocol_error() {
    // GIVEN
    let mut session = scripted("Done\nDone\nDone\nnot-an-address\nDone\n");
    session.join_network(dataset()).unwrap();

    // WHEN
    let result = session.get_routable_address();

    // THEN
    assert!(matches!(result, Err(SessionError::Protocol { .. })));
}

/// **VALUE**: Verifies that the session never stores a poll interval below the floor.
///
/// **BUG THIS CATCHES**: Would catch a library caller setting `Duration::ZERO` and turning
/// `wait_for_state_any_of` into a busy loop.
#[test]
fn given_zero_poll_interval_when_set_then_raised_to_minimum() {
    // GIVEN: A fresh session
    let mut session = scripted("");

    // WHEN: Setting a zero interval, then a normal one
    session.set_poll_interval(Duration::ZERO);
    let clamped = session.poll_interval();
    session.set_poll_interval(Duration::from_millis(25));

    // THEN: Zero is raised; other values are kept
    assert_eq!(clamped, MIN_POLL_INTERVAL);
    assert_eq!(session.poll_interval(), Duration::from_millis(25));
}
