//! Command line entry point.

mod cli;
mod error;

use clap::Parser;

fn main() {
    env_logger::init();

    if let Err(error) = cli::run(cli::Cli::parse()) {
        log::error!("{}", error);
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
