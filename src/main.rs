use clap::Parser;
use tradescore::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
