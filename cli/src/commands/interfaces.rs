use colored::*;
use regshim_common::network::interface::{LocalIpv4Resolver, Rejection, Verdict};
use regshim_common::utils::interface::{InterfaceSource, SystemInterfaces};

use crate::terminal::{colors, network_fmt, print};

pub fn interfaces(resolver: LocalIpv4Resolver) -> anyhow::Result<()> {
    let interfaces = SystemInterfaces.interfaces()?;
    let reports = resolver.inspect(&interfaces);

    let mut selected = false;
    for (idx, (interface, report)) in interfaces.iter().zip(reports).enumerate() {
        print::tree_head(idx, &report.name);

        let mut details = network_fmt::to_key_value_pair_net(&interface.ips);
        let verdict = match report.verdict {
            Verdict::Candidate(ip) if !selected => {
                selected = true;
                format!("selected ({ip})").green().bold()
            }
            Verdict::Candidate(ip) => format!("eligible ({ip})").green(),
            Verdict::Rejected(rejection) => rejection_text(rejection).color(colors::SEPARATOR),
            Verdict::NoUsableIpv4 => "no usable IPv4".yellow(),
            Verdict::QueryFailed(e) => format!("query failed: {e}").red(),
        };
        details.push(("Status".to_string(), verdict));

        print::as_tree_one_level(details);
    }

    if !selected {
        print::print_status("No interface qualifies for self-IP detection".yellow().to_string());
    }
    Ok(())
}

fn rejection_text(rejection: Rejection) -> &'static str {
    match rejection {
        Rejection::IsDown => "down",
        Rejection::IsLoopback => "loopback",
        Rejection::NotAllowed => "not allow-listed",
    }
}
