pub mod advertise;
pub mod detect;
pub mod interfaces;
pub mod parse;

use clap::{ArgAction, Parser, Subcommand};
use regshim_common::network::address::Address;
use regshim_common::network::interface::{AllowList, LocalIpv4Resolver};

#[derive(Parser)]
#[command(name = "regshim")]
#[command(about = "Inspect the address a service would advertise to its registry.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print results and warnings
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse an ip:port bind address
    #[command(alias = "p")]
    Parse { address: Address },
    /// List network interfaces and whether they qualify for self-IP detection
    #[command(alias = "i")]
    Interfaces {
        /// Interface names to trust instead of the defaults
        #[arg(long, value_delimiter = ',')]
        allow: Vec<String>,
    },
    /// Detect this host's IPv4 address
    #[command(alias = "d")]
    Detect {
        /// Interface names to trust instead of the defaults
        #[arg(long, value_delimiter = ',')]
        allow: Vec<String>,
    },
    /// Show the address registered for a bind address
    #[command(alias = "a")]
    Advertise {
        address: Address,
        /// Interface names to trust instead of the defaults
        #[arg(long, value_delimiter = ',')]
        allow: Vec<String>,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Builds a resolver from `--allow`, falling back to the default allow-list.
pub fn resolver(allow: Vec<String>) -> LocalIpv4Resolver {
    if allow.is_empty() {
        LocalIpv4Resolver::default()
    } else {
        LocalIpv4Resolver::new(AllowList::new(allow))
    }
}
