use crate::error::model_error::ModelError;
use crate::{ErrorLocation, Ipv6Prefix, OperationalDataset};

use std::panic::Location;
use std::sync::OnceLock;

use regex::Regex;

/// Thread mesh-local prefixes are always a /64.
pub const MESH_LOCAL_PREFIX_LENGTH: u8 = 64;

/// Thread network names are at most 16 bytes of UTF-8.
const MAX_NETWORK_NAME_BYTES: usize = 16;

const TLV_HEX_PATTERN: &str = r"^(?:[0-9a-fA-F]{2})+$";

static TLV_HEX_REGEX: OnceLock<Regex> = OnceLock::new();

pub(crate) fn get_tlv_hex_regex() -> &'static Regex {
    TLV_HEX_REGEX.get_or_init(|| Regex::new(TLV_HEX_PATTERN).expect("valid regex pattern"))
}

/// Builder for creating validated OperationalDataset instances.
#[derive(Debug, Default)]
pub struct OperationalDatasetBuilder {
    tlvs: Option<String>,
    mesh_local_prefix: Option<Ipv6Prefix>,
    network_name: Option<String>,
}

impl OperationalDatasetBuilder {
    pub fn with_tlvs_hex(mut self, tlvs: impl Into<String>) -> Self {
        self.tlvs = Some(tlvs.into());
        self
    }

    pub fn with_mesh_local_prefix(mut self, prefix: Ipv6Prefix) -> Self {
        self.mesh_local_prefix = Some(prefix);
        self
    }

    pub fn with_network_name(mut self, name: impl Into<String>) -> Self {
        self.network_name = Some(name.into());
        self
    }

    /// Build the OperationalDataset with validation.
    ///
    /// The TLV string is lowercased so the command sent to the device is
    /// stable regardless of how the caller encoded it.
    #[track_caller]
    pub fn build(self) -> Result<OperationalDataset, ModelError> {
        let tlvs = self.tlvs.ok_or_else(|| ModelError::Validation {
            message: String::from("Dataset TLVs are required"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if tlvs.is_empty() {
            return Err(ModelError::Validation {
                message: String::from("Dataset TLVs cannot be empty"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if !get_tlv_hex_regex().is_match(&tlvs) {
            return Err(ModelError::Validation {
                message: String::from("Dataset TLVs must be an even-length hex string"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let mesh_local_prefix = self.mesh_local_prefix.ok_or_else(|| ModelError::Validation {
            message: String::from("Mesh-local prefix is required"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if mesh_local_prefix.length() != MESH_LOCAL_PREFIX_LENGTH {
            return Err(ModelError::Validation {
                message: format!(
                    "Mesh-local prefix must be /{MESH_LOCAL_PREFIX_LENGTH}, got {mesh_local_prefix}"
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if let Some(name) = &self.network_name
            && (name.is_empty() || name.len() > MAX_NETWORK_NAME_BYTES)
        {
            return Err(ModelError::Validation {
                message: format!(
                    "Network name must be 1-{MAX_NETWORK_NAME_BYTES} bytes, got {}",
                    name.len()
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(OperationalDataset {
            tlvs: tlvs.to_ascii_lowercase(),
            mesh_local_prefix,
            network_name: self.network_name,
        })
    }
}
