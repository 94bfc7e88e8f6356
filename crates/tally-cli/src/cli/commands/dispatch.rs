use crate::cli::args::{Cli, Command};

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Process(args) => super::process::run(args),
        Command::Manifest(args) => super::manifest::run(args),
    }
}
