use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

use trucktweaks_settings::Action;

#[derive(Debug, Subcommand, PartialEq)]
pub(crate) enum Command {
    /// List attached game controllers.
    Devices,
    /// Show the configured bindings.
    Bindings,
    /// Capture the next controller input for an action and save it.
    Capture {
        /// The action to bind, e.g. mouse_left_click
        action: Action,
        /// Device id to capture from; it becomes the configured device
        #[clap(short, long)]
        device: Option<String>,
    },
    /// Unbind an action.
    Clear {
        /// The action to unbind
        action: Action,
    },
    /// Run the mouse simulation in the foreground.
    Run,
}

/// Controller driven mouse and keyboard input for truck simulators in VR.
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub(crate) struct Cli {
    /// Turn debugging information on
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// The directory containing settings.yaml
    #[arg(short, long, global = true)]
    pub settings: Option<PathBuf>,

    /// The command to run
    #[clap(subcommand)]
    pub command: Command,
}
