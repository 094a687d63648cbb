use clap::Parser;
use swingwatch::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
