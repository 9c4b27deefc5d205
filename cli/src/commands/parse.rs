use colored::*;
use regshim_common::network::address::Address;

use crate::terminal::{colors, print};

pub fn parse(address: &Address) -> anyhow::Result<()> {
    print::aligned_line("Host", address.host().color(colors::IPV4_ADDR));
    print::aligned_line("Port", address.port().to_string().color(colors::PORT));

    let ipv4 = match address.ipv4() {
        Ok(ip) => ip.to_string().green(),
        Err(e) => e.to_string().yellow(),
    };
    print::aligned_line("IPv4", ipv4);

    if address.is_unspecified() {
        print::print_status("Wildcard host, the registry client will detect a local address");
    }
    Ok(())
}
