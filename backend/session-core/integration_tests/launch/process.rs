use session_core::error::launch::LaunchError;
use session_core::error::session::SessionError;
use session_core::launch::DeviceProcess;
use session_core::session::device::ATTACHED_STATES;

use models::OperationalDatasetBuilder;

use std::net::Ipv6Addr;
use std::time::Duration;

/// Minimal stand-in for `ot-cli-ftd`: answers the commands the session issues.
#[cfg(unix)]
const FAKE_DEVICE_SCRIPT: &str = r#"#!/bin/sh
state=disabled
while IFS= read -r line; do
  case "$line" in
    "") ;;
    state) echo "> state"; echo "$state"; echo Done ;;
    "dataset set active "*) echo Done ;;
    "ifconfig up") state=detached; echo Done ;;
    "thread start") state=leader; echo Done ;;
    "thread stop") state=disabled; echo Done ;;
    "ifconfig down") echo Done ;;
    ipaddr) echo fe80::1; echo fd00:1234::1; echo 2001:db8::5; echo Done ;;
    *) echo "Error: 35: InvalidCommand" ;;
  esac
done
"#;

#[cfg(unix)]
fn install_fake_device(dir: &std::path::Path) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-ot-cli-ftd");
    std::fs::write(&path, FAKE_DEVICE_SCRIPT).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// **VALUE**: Drives a real child process through launch, join, wait, address lookup,
/// a rejected command, and termination.
///
/// **WHY THIS MATTERS**: Scripted in-memory streams cannot catch buffering bugs on real
/// pipes: a missing flush leaves the child waiting and the session blocked on its read.
///
/// **BUG THIS CATCHES**: Would catch the session's writer not being flushed through the
/// `BufWriter<ChildStdin>`, or stdout not being wired to the session.
#[cfg(unix)]
#[test]
fn given_fake_device_when_driven_through_process_then_full_flow_succeeds() {
    // GIVEN: A fake device binary
    let dir = tempfile::TempDir::new().unwrap();
    let binary = install_fake_device(dir.path());
    let dataset = OperationalDatasetBuilder::default()
        .with_tlvs_hex("0e080000000000010000")
        .with_mesh_local_prefix("fd00:1234::/64".parse().unwrap())
        .build()
        .unwrap();

    // WHEN: Launching it as node 2
    let mut device = DeviceProcess::launch(binary.to_str().unwrap(), 2).unwrap();
    assert_eq!(device.node_id(), 2);
    assert!(device.pid() > 0);

    let session = device.session();
    session.set_poll_interval(Duration::from_millis(10));

    // THEN: The device starts disabled
    assert_eq!(session.get_state().unwrap(), "disabled");

    // AND: Joins and reaches leader
    session.join_network(dataset).unwrap();
    session
        .wait_for_state_any_of(&ATTACHED_STATES, Duration::from_secs(5))
        .unwrap();

    // AND: Reports its routable address
    assert_eq!(
        session.get_routable_address().unwrap(),
        Some("2001:db8::5".parse::<Ipv6Addr>().unwrap())
    );

    // AND: Unknown commands are fatal protocol errors
    let err = session.execute_command("bogus").unwrap_err();
    assert!(matches!(err, SessionError::Protocol { .. }));

    // AND: The session is still in sync after the error
    session.stop_radio().unwrap();
    assert_eq!(session.get_state().unwrap(), "disabled");

    // AND: Terminates cleanly
    device.terminate().unwrap();
}

/// **VALUE**: Verifies that a missing binary is reported as a spawn error naming it.
///
/// **WHY THIS MATTERS**: `ot-cli-ftd` is only present on machines with the simulator
/// built; the message has to say what was missing.
///
/// **BUG THIS CATCHES**: Would catch launch panicking or hiding the binary name.
#[test]
fn given_missing_binary_when_launching_then_returns_spawn_error() {
    // GIVEN: A binary that does not exist
    let binary = "/nonexistent/ot-cli-ftd-missing";

    // WHEN
    let result = DeviceProcess::launch(binary, 1);

    // THEN
    match result {
        Err(LaunchError::Spawn { message, .. }) => {
            assert!(message.contains(binary), "{message}");
            assert!(message.contains("id=1"), "{message}");
        }
        Err(other) => panic!("Expected spawn error, got {other:?}"),
        Ok(_) => panic!("Launch of a missing binary should fail"),
    }
}
