pub mod builder;

use crate::{Ipv6Prefix, ModelError, OperationalDatasetBuilder};

use serde::{Deserialize, Serialize};

/// Thread Active Operational Dataset as the device consumes it.
///
/// `tlvs` is the lowercase hex encoding of the dataset TLVs and is passed
/// verbatim to `dataset set active`. The mesh-local prefix is kept alongside
/// so unicast addresses reported by the device can be classified without
/// decoding the TLVs. Deserializing goes through the builder, so a dataset
/// read from disk is validated and normalized the same way as a built one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawOperationalDataset")]
pub struct OperationalDataset {
    pub(crate) tlvs: String,
    pub(crate) mesh_local_prefix: Ipv6Prefix,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) network_name: Option<String>,
}

#[derive(Deserialize)]
struct RawOperationalDataset {
    tlvs: String,
    mesh_local_prefix: Ipv6Prefix,
    #[serde(default)]
    network_name: Option<String>,
}

impl TryFrom<RawOperationalDataset> for OperationalDataset {
    type Error = ModelError;

    fn try_from(raw: RawOperationalDataset) -> Result<Self, Self::Error> {
        let mut builder = OperationalDatasetBuilder::default()
            .with_tlvs_hex(raw.tlvs)
            .with_mesh_local_prefix(raw.mesh_local_prefix);

        if let Some(name) = raw.network_name {
            builder = builder.with_network_name(name);
        }

        builder.build()
    }
}

impl OperationalDataset {
    pub fn tlvs_hex(&self) -> &str {
        &self.tlvs
    }

    pub fn mesh_local_prefix(&self) -> &Ipv6Prefix {
        &self.mesh_local_prefix
    }

    pub fn network_name(&self) -> Option<&str> {
        self.network_name.as_deref()
    }
}
