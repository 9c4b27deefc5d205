use colored::*;
use regshim_common::network::interface::LocalIpv4Resolver;
use tracing::debug;

use crate::terminal::{colors, print};

pub fn detect(resolver: &LocalIpv4Resolver) -> anyhow::Result<()> {
    let allowed: Vec<&str> = resolver.allowed().iter().collect();
    debug!("Allowed interfaces: {}", allowed.join(", "));

    let ip = resolver.resolve()?;
    print::aligned_line("IPv4", ip.to_string().color(colors::IPV4_ADDR));
    Ok(())
}
