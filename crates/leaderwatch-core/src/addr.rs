//! Leader address wire format
//!
//! The leader publishes its address at the tracked path as plain UTF-8 text
//! of the form `host:port` — no framing, no version tag. The format is fixed
//! by the broader system and round-trips bit-for-bit through
//! [`LeaderAddr::decode`] and [`LeaderAddr::encode`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Network address of the current cluster leader
///
/// Decoded from the tracked node's payload on every read; never cached.
/// Present-but-malformed payload is a decode error, not absence — it
/// indicates a protocol mismatch or external corruption.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeaderAddr {
    /// Hostname or IP literal
    pub host: String,
    /// TCP port
    pub port: u16,
}

impl LeaderAddr {
    /// Create an address from its parts
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Decode an address from the tracked node's raw payload
    pub fn decode(raw: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(raw)
            .map_err(|_| Error::decode("payload is not valid UTF-8"))?;
        text.parse()
    }

    /// Encode the address to the on-wire payload
    pub fn encode(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

impl FromStr for LeaderAddr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        // split on the last ':' so IPv6 literals in the host part survive
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| Error::decode(format!("expected host:port, got '{s}'")))?;

        if host.is_empty() {
            return Err(Error::decode(format!("empty host in '{s}'")));
        }

        let port: u16 = port
            .parse()
            .map_err(|_| Error::decode(format!("invalid port in '{s}'")))?;

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl fmt::Display for LeaderAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
