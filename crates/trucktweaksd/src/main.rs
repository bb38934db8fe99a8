mod app;
mod cli;
mod commands;
mod error;
mod logging;
mod runner;

use std::process::ExitCode;

use clap::Parser;

use trucktweaks_settings::ConfigDir;

use crate::cli::{Cli, Command};
use crate::error::Error;

fn run_command(cli: &Cli) -> Result<(), Error> {
    let dir = ConfigDir::new(cli.settings.as_deref())?;
    log::debug!("settings file - {}", dir.settings_path().display());

    match &cli.command {
        Command::Devices => commands::devices(&dir),
        Command::Bindings => commands::bindings(&dir),
        Command::Capture { action, device } => {
            commands::capture(&dir, *action, device.as_deref())
        }
        Command::Clear { action } => commands::clear(&dir, *action),
        Command::Run => commands::run(&dir),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if logging::setup(cli.verbose, cli.no_color).is_err() {
        return ExitCode::FAILURE;
    }

    match run_command(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
