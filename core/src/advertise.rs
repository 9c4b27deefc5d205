//! Decides which `ip:port` a service advertises to the registry.

use std::fmt;
use std::net::Ipv4Addr;

use anyhow::Context;
use regshim_common::network::address::Address;
use regshim_common::network::interface::{LocalIpv4Resolver, ResolveError};

/// The address registered for this service instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAddress {
    pub ip: String,
    pub port: u16,
}

impl fmt::Display for ServiceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ip, self.port)
    }
}

/// Parses `bind` and, if it names the wildcard host `0.0.0.0`, replaces the
/// host with the address detected by `resolver`.
pub fn advertised_address(bind: &str, resolver: &LocalIpv4Resolver) -> anyhow::Result<ServiceAddress> {
    advertised_address_with(bind, || resolver.resolve())
}

/// Like [`advertised_address`], with the local address lookup supplied by
/// the caller. `detect` is only invoked for wildcard binds.
pub fn advertised_address_with<F>(bind: &str, detect: F) -> anyhow::Result<ServiceAddress>
where
    F: FnOnce() -> Result<Ipv4Addr, ResolveError>,
{
    let address = Address::parse(bind).context("invalid service bind address")?;

    let ip = if address.is_unspecified() {
        detect()
            .context("failed to detect a local IPv4 address for the wildcard bind address")?
            .to_string()
    } else {
        address.host().to_string()
    };

    Ok(ServiceAddress {
        ip,
        port: address.port(),
    })
}
