//! # Local IPv4 Detection
//!
//! Finds the address this host should advertise when it was configured to
//! bind the wildcard address.
//!
//! Only interfaces whose name is on an [`AllowList`] are considered, which
//! keeps addresses of container bridges, VPN tunnels and other virtual
//! interfaces from being picked up.

use std::collections::BTreeSet;
use std::io;
use std::net::Ipv4Addr;

use thiserror::Error;

use crate::utils::interface::{HostInterface, InterfaceSource, SystemInterfaces};

/// Interface names trusted for self-IP detection by default.
pub const DEFAULT_ALLOWED_INTERFACES: [&str; 4] = [
    "en0",    // macOS Ethernet / Wi-Fi
    "eth0",   // Linux Ethernet
    "ens224", // VMware virtual NIC
    "ens5",   // AWS EC2
];

/// Why an interface was not considered for self-IP detection.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Rejection {
    /// The interface is administratively down.
    IsDown,
    /// The interface is a loopback interface.
    IsLoopback,
    /// The interface name is not on the allow-list.
    NotAllowed,
}

/// Reading the addresses of a single interface failed.
#[derive(Debug, Error)]
#[error("unable to get addresses on {name}: {source}")]
pub struct InterfaceQueryError {
    pub name: String,
    pub source: io::Error,
}

#[derive(Debug, Error)]
pub enum ResolveError {
    /// The interface list itself could not be read.
    #[error("failed to enumerate network interfaces: {0}")]
    EnumerationFailed(#[source] io::Error),
    /// No address was found and at least one interface could not be queried.
    #[error("{}", join_failures(.0))]
    QueryFailed(Vec<InterfaceQueryError>),
    /// The scan completed but no interface passed the filters.
    #[error("no IPv4 address found on allowed network interfaces")]
    NoAddressFound,
}

fn join_failures(failures: &[InterfaceQueryError]) -> String {
    failures
        .iter()
        .map(|failure| failure.to_string())
        .collect::<Vec<String>>()
        .join("; ")
}

/// Set of interface names trusted for self-IP detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    names: BTreeSet<String>,
}

impl AllowList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_INTERFACES)
    }
}

impl<S: Into<String>> FromIterator<S> for AllowList {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter)
    }
}

/// Outcome of evaluating one interface, see [`LocalIpv4Resolver::inspect`].
#[derive(Debug)]
pub enum Verdict {
    /// The interface would yield this address.
    Candidate(Ipv4Addr),
    Rejected(Rejection),
    /// The interface passed the filters but has no usable IPv4 address.
    NoUsableIpv4,
    QueryFailed(io::Error),
}

#[derive(Debug)]
pub struct InterfaceReport {
    pub name: String,
    pub verdict: Verdict,
}

/// Picks the first usable IPv4 address from allow-listed interfaces.
#[derive(Debug, Clone, Default)]
pub struct LocalIpv4Resolver {
    allowed: AllowList,
}

impl LocalIpv4Resolver {
    pub fn new(allowed: AllowList) -> Self {
        Self { allowed }
    }

    pub fn allowed(&self) -> &AllowList {
        &self.allowed
    }

    /// Resolves against the interfaces of the running host.
    pub fn resolve(&self) -> Result<Ipv4Addr, ResolveError> {
        self.resolve_from(&SystemInterfaces)
    }

    pub fn resolve_from<S: InterfaceSource>(&self, source: &S) -> Result<Ipv4Addr, ResolveError> {
        let interfaces = source
            .interfaces()
            .map_err(ResolveError::EnumerationFailed)?;
        self.select(&interfaces)
    }

    /// Walks `interfaces` in the given order and returns the first non-loopback
    /// IPv4 address of an interface that is up, not loopback and allow-listed.
    ///
    /// An interface whose addresses cannot be read does not stop the scan; the
    /// failures are only reported when nothing else matched.
    pub fn select<I: HostInterface>(&self, interfaces: &[I]) -> Result<Ipv4Addr, ResolveError> {
        let mut failures: Vec<InterfaceQueryError> = Vec::new();

        for interface in interfaces {
            if self.check(interface).is_err() {
                continue;
            }

            match interface.first_usable_ipv4() {
                Ok(Some(ip)) => return Ok(ip),
                Ok(None) => {}
                Err(source) => failures.push(InterfaceQueryError {
                    name: interface.name().to_string(),
                    source,
                }),
            }
        }

        if failures.is_empty() {
            Err(ResolveError::NoAddressFound)
        } else {
            Err(ResolveError::QueryFailed(failures))
        }
    }

    /// Applies the interface filters, in order: up, not loopback, allow-listed.
    pub fn check<I: HostInterface + ?Sized>(&self, interface: &I) -> Result<(), Rejection> {
        if !interface.is_up() {
            return Err(Rejection::IsDown);
        }
        if interface.is_loopback() {
            return Err(Rejection::IsLoopback);
        }
        if !self.allowed.contains(interface.name()) {
            return Err(Rejection::NotAllowed);
        }
        Ok(())
    }

    /// Evaluates every interface without short-circuiting.
    pub fn inspect<I: HostInterface>(&self, interfaces: &[I]) -> Vec<InterfaceReport> {
        interfaces
            .iter()
            .map(|interface| {
                let verdict = match self.check(interface) {
                    Err(rejection) => Verdict::Rejected(rejection),
                    Ok(()) => match interface.first_usable_ipv4() {
                        Ok(Some(ip)) => Verdict::Candidate(ip),
                        Ok(None) => Verdict::NoUsableIpv4,
                        Err(e) => Verdict::QueryFailed(e),
                    },
                };
                InterfaceReport {
                    name: interface.name().to_string(),
                    verdict,
                }
            })
            .collect()
    }
}

/// Detects this host's IPv4 address using the default allow-list.
pub fn local_ipv4() -> Result<Ipv4Addr, ResolveError> {
    LocalIpv4Resolver::default().resolve()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
