use crate::{ErrorLocation, ModelError};

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::net::Ipv6Addr;
use std::panic::Location;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const MAX_PREFIX_LENGTH: u8 = 128;

/// An IPv6 network prefix such as `fd00:1234::/64`.
///
/// Host bits below the prefix length are cleared on construction, so two
/// prefixes naming the same network compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ipv6Prefix {
    network: Ipv6Addr,
    length: u8,
}

impl Ipv6Prefix {
    #[track_caller]
    pub fn new(address: Ipv6Addr, length: u8) -> Result<Self, ModelError> {
        if length > MAX_PREFIX_LENGTH {
            return Err(ModelError::Validation {
                message: format!("Prefix length {length} exceeds {MAX_PREFIX_LENGTH}"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let network = Ipv6Addr::from(u128::from(address) & mask(length));
        Ok(Self { network, length })
    }

    pub fn network(&self) -> Ipv6Addr {
        self.network
    }

    pub fn length(&self) -> u8 {
        self.length
    }

    /// Whether `address` falls inside this prefix.
    pub fn contains(&self, address: &Ipv6Addr) -> bool {
        u128::from(*address) & mask(self.length) == u128::from(self.network)
    }
}

fn mask(length: u8) -> u128 {
    match length {
        0 => 0,
        n => u128::MAX << (MAX_PREFIX_LENGTH - n),
    }
}

impl Display for Ipv6Prefix {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        write!(formatter, "{}/{}", self.network, self.length)
    }
}

impl FromStr for Ipv6Prefix {
    type Err = ModelError;

    #[track_caller]
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (address, length) = value.split_once('/').ok_or_else(|| ModelError::Parse {
            message: format!("Missing '/' in IPv6 prefix: {value}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let address = address.parse::<Ipv6Addr>().map_err(|e| ModelError::Parse {
            message: format!("Invalid IPv6 address '{address}': {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let length = length.parse::<u8>().map_err(|e| ModelError::Parse {
            message: format!("Invalid prefix length '{length}': {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Self::new(address, length)
    }
}

impl TryFrom<String> for Ipv6Prefix {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Ipv6Prefix> for String {
    fn from(prefix: Ipv6Prefix) -> Self {
        prefix.to_string()
    }
}
