//! # Bind Address Model
//!
//! Parses the `ip:port` bind address a service is configured with.
//!
//! The accepted shape is literal: four dot-separated digit groups, a colon and
//! a digit group (e.g. `10.0.0.1:9090`). There is no support for hostnames,
//! IPv6 or surrounding whitespace. Octets are **not** range-checked during
//! parsing, so `999.0.0.1:80` is accepted; use [`Address::ipv4`] when a real
//! [`Ipv4Addr`] is required.

use std::fmt;
use std::net::Ipv4Addr;
use std::num::ParseIntError;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Host part of a wildcard bind address.
pub const UNSPECIFIED_HOST: &str = "0.0.0.0";

// ASCII digits only, `\d` would also accept other Unicode decimal digits.
static ADDRESS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)\.([0-9]+)\.([0-9]+)\.([0-9]+):([0-9]+)$")
        .expect("Invalid address pattern")
});

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// The input does not have the `a.b.c.d:port` shape.
    #[error("malformed address '{input}', expected <a.b.c.d>:<port>")]
    Malformed { input: String },
    /// The port digits do not fit into a `u16`.
    #[error("invalid port in address '{input}': {source}")]
    PortOutOfRange {
        input: String,
        source: ParseIntError,
    },
    /// An octet is larger than 255. Only returned by [`Address::ipv4`].
    #[error("octet '{octet}' of host '{host}' is out of range")]
    OctetOutOfRange { host: String, octet: String },
}

/// A parsed `ip:port` pair.
///
/// The original input is kept verbatim, so formatting an `Address` gives back
/// exactly the string it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    literal: String,
    host_len: usize,
    port: u16,
}

impl Address {
    /// Parses `input`. Either the whole address is valid or an error is
    /// returned, there is no partial result.
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let malformed = || AddressError::Malformed {
            input: input.to_string(),
        };

        let captures = ADDRESS_PATTERN.captures(input).ok_or_else(malformed)?;
        let port_digits = captures.get(5).ok_or_else(malformed)?;

        let port = port_digits
            .as_str()
            .parse::<u16>()
            .map_err(|source| AddressError::PortOutOfRange {
                input: input.to_string(),
                source,
            })?;

        Ok(Self {
            literal: input.to_string(),
            // the colon sits right before the port group
            host_len: port_digits.start() - 1,
            port,
        })
    }

    /// The four octets joined with dots, exactly as written.
    pub fn host(&self) -> &str {
        &self.literal[..self.host_len]
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// The port digits as written, leading zeros included.
    pub fn port_str(&self) -> &str {
        &self.literal[self.host_len + 1..]
    }

    pub fn as_str(&self) -> &str {
        &self.literal
    }

    /// True for the wildcard host `0.0.0.0`.
    ///
    /// This is a literal comparison: `00.0.0.0` is not treated as unspecified.
    pub fn is_unspecified(&self) -> bool {
        self.host() == UNSPECIFIED_HOST
    }

    /// Converts the host into an [`Ipv4Addr`], rejecting octets above 255.
    pub fn ipv4(&self) -> Result<Ipv4Addr, AddressError> {
        let mut octets = [0u8; 4];
        for (slot, octet) in octets.iter_mut().zip(self.host().split('.')) {
            *slot = octet
                .parse::<u8>()
                .map_err(|_| AddressError::OctetOutOfRange {
                    host: self.host().to_string(),
                    octet: octet.to_string(),
                })?;
        }
        Ok(Ipv4Addr::from(octets))
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.literal)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
