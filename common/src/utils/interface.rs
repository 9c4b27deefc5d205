use std::io;
use std::net::Ipv4Addr;

use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::{IpNetwork, Ipv4Network};

/// What the self-IP detection needs to know about a network interface.
///
/// Implemented for [`pnet`]'s [`NetworkInterface`]. Tests implement it for
/// synthetic interfaces, including ones whose address query fails.
pub trait HostInterface {
    fn name(&self) -> &str;
    fn is_up(&self) -> bool;
    fn is_loopback(&self) -> bool;

    /// Reads the addresses currently bound to the interface.
    fn addresses(&self) -> io::Result<Vec<IpNetwork>>;

    fn ipv4_nets(&self) -> io::Result<Vec<Ipv4Network>> {
        Ok(self
            .addresses()?
            .into_iter()
            .filter_map(|ip| {
                if let IpNetwork::V4(ipv4) = ip {
                    Some(ipv4)
                } else {
                    None
                }
            })
            .collect())
    }

    /// First bound IPv4 address that is not a loopback address, in the
    /// order the OS reported them.
    fn first_usable_ipv4(&self) -> io::Result<Option<Ipv4Addr>> {
        Ok(self
            .ipv4_nets()?
            .into_iter()
            .map(|net| net.ip())
            .find(|ip| !ip.is_loopback()))
    }
}

impl HostInterface for NetworkInterface {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_up(&self) -> bool {
        NetworkInterface::is_up(self)
    }

    fn is_loopback(&self) -> bool {
        NetworkInterface::is_loopback(self)
    }

    fn addresses(&self) -> io::Result<Vec<IpNetwork>> {
        // pnet reads addresses together with the interface list
        Ok(self.ips.clone())
    }
}

/// A provider of the host's interfaces, in enumeration order.
pub trait InterfaceSource {
    type Interface: HostInterface;

    fn interfaces(&self) -> io::Result<Vec<Self::Interface>>;
}

/// The interfaces of the running host, as reported by the OS.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemInterfaces;

impl InterfaceSource for SystemInterfaces {
    type Interface = NetworkInterface;

    fn interfaces(&self) -> io::Result<Vec<NetworkInterface>> {
        Ok(datalink::interfaces())
    }
}
