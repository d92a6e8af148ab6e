use crate::{Ipv6Prefix, ModelError, OperationalDatasetBuilder};

fn mesh_local() -> Ipv6Prefix {
    "fd00:1234::/64".parse().unwrap()
}

/// **VALUE**: Verifies that a well-formed dataset builds and its TLVs are lowercased.
///
/// **WHY THIS MATTERS**: The TLV hex goes straight into `dataset set active <hex>`.
/// Normalizing case keeps the command stable whatever encoder produced it.
///
/// **BUG THIS CATCHES**: Would catch the lowercasing step being dropped.
#[test]
fn given_valid_fields_when_building_dataset_then_succeeds() {
    // GIVEN: A builder with all fields set
    let builder = OperationalDatasetBuilder::default()
        .with_tlvs_hex("0E080000000000010000")
        .with_mesh_local_prefix(mesh_local())
        .with_network_name("OpenThread-1");

    // WHEN: Building
    let dataset = builder.build().unwrap();

    // THEN: Fields are exposed as given, TLVs lowercased
    assert_eq!(dataset.tlvs_hex(), "0e080000000000010000");
    assert_eq!(dataset.mesh_local_prefix(), &mesh_local());
    assert_eq!(dataset.network_name(), Some("OpenThread-1"));
}

/// **VALUE**: Verifies that non-hex or odd-length TLV strings are rejected.
///
/// **WHY THIS MATTERS**: The device answers a bad dataset with `Error:`, which the
/// session treats as fatal. Catching it at build time gives a clearer message.
///
/// **BUG THIS CATCHES**: Would catch the hex regex losing its anchors or pairing.
#[test]
fn given_malformed_tlvs_when_building_then_returns_validation_error() {
    // GIVEN: Invalid TLV strings
    let cases = ["", "0e0", "zz00", "0e 08"];

    for tlvs in cases {
        // WHEN: Building
        let result = OperationalDatasetBuilder::default()
            .with_tlvs_hex(tlvs)
            .with_mesh_local_prefix(mesh_local())
            .build();

        // THEN: Validation error
        assert!(
            matches!(result, Err(ModelError::Validation { .. })),
            "Should reject TLVs: {tlvs:?}"
        );
    }
}

/// **VALUE**: Verifies that a mesh-local prefix other than /64 is rejected.
///
/// **BUG THIS CATCHES**: Would catch a /48 slipping through and widening the set of
/// addresses treated as mesh-local.
#[test]
fn given_non_64_mesh_local_prefix_when_building_then_returns_validation_error() {
    // GIVEN: A /48 prefix
    let prefix: Ipv6Prefix = "fd00:1234::/48".parse().unwrap();

    // WHEN: Building
    let result = OperationalDatasetBuilder::default()
        .with_tlvs_hex("0e08")
        .with_mesh_local_prefix(prefix)
        .build();

    // THEN: Validation error naming the prefix
    match result {
        Err(ModelError::Validation { message, .. }) => {
            assert!(message.contains("/64"), "Message was: {message}");
        }
        other => panic!("Expected validation error, got {other:?}"),
    }
}

/// **VALUE**: Verifies that required fields are enforced.
///
/// **BUG THIS CATCHES**: Would catch a builder that defaults the mesh-local prefix,
/// which would make routable-address lookup classify against a made-up prefix.
#[test]
fn given_missing_mesh_local_prefix_when_building_then_returns_validation_error() {
    // GIVEN: No prefix
    let builder = OperationalDatasetBuilder::default().with_tlvs_hex("0e08");

    // WHEN: Building
    let result = builder.build();

    // THEN: Validation error
    match result {
        Err(ModelError::Validation { message, .. }) => {
            assert_eq!(message, "Mesh-local prefix is required");
        }
        other => panic!("Expected validation error, got {other:?}"),
    }
}

/// **VALUE**: Verifies that deserializing a dataset applies the builder's checks.
///
/// **WHY THIS MATTERS**: Datasets loaded from the config file never call `build()`
/// directly. An odd-length TLV string would otherwise reach `dataset set active`.
///
/// **BUG THIS CATCHES**: Would catch serde filling the fields without validation.
#[test]
fn given_invalid_dataset_json_when_deserialized_then_returns_error() {
    // GIVEN: JSON with an odd-length TLV string
    let json = r#"{"tlvs":"0e0","mesh_local_prefix":"fd00:1234::/64"}"#;

    // WHEN: Deserializing
    let result = serde_json::from_str::<crate::OperationalDataset>(json);

    // THEN: Rejected with the builder's message
    let message = result.unwrap_err().to_string();
    assert!(message.contains("even-length hex"), "Message was: {message}");
}

/// **VALUE**: Verifies that deserialized TLVs are lowercased like built ones.
///
/// **BUG THIS CATCHES**: Would catch uppercase TLVs from a hand-edited file being
/// sent to the device unchanged.
#[test]
fn given_uppercase_tlvs_when_deserialized_then_matches_built_dataset() {
    // GIVEN: The same dataset as JSON with uppercase TLVs and from the builder
    let json = r#"{"tlvs":"0E08ABCD","mesh_local_prefix":"fd00:1234::/64","network_name":"Home"}"#;
    let built = OperationalDatasetBuilder::default()
        .with_tlvs_hex("0e08abcd")
        .with_mesh_local_prefix(mesh_local())
        .with_network_name("Home")
        .build()
        .unwrap();

    // WHEN: Deserializing
    let loaded: crate::OperationalDataset = serde_json::from_str(json).unwrap();

    // THEN: Identical to the built dataset
    assert_eq!(loaded, built);
    assert_eq!(loaded.tlvs_hex(), "0e08abcd");
}

/// **VALUE**: Verifies network name bounds.
///
/// **BUG THIS CATCHES**: Would catch names longer than the 16-byte Thread limit.
#[test]
fn given_overlong_network_name_when_building_then_returns_validation_error() {
    // GIVEN: A 17-byte name
    let result = OperationalDatasetBuilder::default()
        .with_tlvs_hex("0e08")
        .with_mesh_local_prefix(mesh_local())
        .with_network_name("x".repeat(17))
        .build();

    // THEN: Rejected
    assert!(matches!(result, Err(ModelError::Validation { .. })));
}
