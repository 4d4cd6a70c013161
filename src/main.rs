//! artifactor - content artifact bundler
//!
//! A command line tool that flattens a hierarchically-organized content
//! repository (Scripts, Integrations, Playbooks, TestPlaybooks, Packs, ...)
//! into a deployable content bundle and a test bundle.

use clap::Parser;

mod bundle;
mod cli;
mod commands;
mod content;
mod creator;
mod error;
mod normalize;
mod progress;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Create(args) => commands::create::run(args, cli.verbose),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
