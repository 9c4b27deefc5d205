use colored::*;
use regshim_common::network::address::Address;
use regshim_common::network::interface::LocalIpv4Resolver;
use regshim_core::advertise;

use crate::terminal::{colors, print};

pub fn advertise(address: &Address, resolver: &LocalIpv4Resolver) -> anyhow::Result<()> {
    let service = advertise::advertised_address(address.as_str(), resolver)?;

    print::aligned_line("Bind", address.as_str().color(colors::TEXT_DEFAULT));
    print::aligned_line("Advertised", service.to_string().color(colors::IPV4_ADDR));
    Ok(())
}
