mod adapters;
mod cli;
mod config;
mod core;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let args = Cli::parse();
    cli::output::init(args.verbose, args.quiet);

    let result = cli::context::load_config(&args).and_then(|config| match &args.command {
        None | Some(Commands::Run) => cli::commands::run::execute(&config),
        Some(Commands::Keys) => cli::commands::keys::execute(&config),
        Some(Commands::Harden) => cli::commands::harden::execute(&config),
        Some(Commands::Sources { probe }) => cli::commands::sources::execute(&config, *probe),
        Some(Commands::Merge { keys_file, target }) => {
            cli::commands::merge::execute(keys_file, target)
        }
    });

    if let Err(e) = result {
        cli::output::error(&format!("Error: {e}"));
        std::process::exit(1);
    }
}
