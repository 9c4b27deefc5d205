mod commands;
mod terminal;

use commands::{CommandLine, Commands, advertise, detect, interfaces, parse};
use terminal::{logging, print};

fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose, commands.quiet);
    let quiet = commands.quiet;

    match commands.command {
        Commands::Parse { address } => {
            print::header("bind address", quiet);
            parse::parse(&address)
        }
        Commands::Interfaces { allow } => {
            print::header("network interfaces", quiet);
            interfaces::interfaces(commands::resolver(allow))
        }
        Commands::Detect { allow } => {
            print::header("local ipv4 detection", quiet);
            detect::detect(&commands::resolver(allow))
        }
        Commands::Advertise { address, allow } => {
            print::header("advertised address", quiet);
            advertise::advertise(&address, &commands::resolver(allow))
        }
    }
}
