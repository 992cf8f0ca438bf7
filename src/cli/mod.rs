//! [Command-line interface](Cli) (CLI) of the main binary.

use crate::run::{ConfigArgs, RenderArgs, StatusArgs};
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

// ----------------------------------------------------------------------------
// CLI Entry Point
// ----------------------------------------------------------------------------

/// The command-line interface (CLI).
/// ---
/// The CLI is intended for parsing user input from the command-line in the main function. This is achieved with the `parse` function, which parses the command line arguments from [`std::env::args`](https://doc.rust-lang.org/std/env/fn.args.html).
/// ```no_run
/// use clap::Parser;
/// let args = dalliance::Cli::parse();
/// ```
/// The command-line arguments can also be supplied manually:
/// ```rust
/// use clap::Parser;
/// use dalliance::{cli::Command, Cli};
///
/// let input = ["dalliance", "render", "--output", "view.html", "--inline"];
/// let args = Cli::parse_from(input);
/// assert!(matches!(args.command, Command::Render(_)));
/// serde_json::to_string_pretty(&args)?;
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
#[derive(Debug, Deserialize, Parser, Serialize)]
#[clap(name = "dalliance", author, version)]
#[clap(about = "dalliance loads the Biodalliance genome browser script and renders its view.")]
pub struct Cli {
    #[clap(subcommand)]
    /// Pass CLI arguments to a particular [Command].
    #[clap(help = "Set the command.")]
    pub command: Command,

    /// Set the output [Verbosity] level.
    #[clap(short = 'v', long)]
    #[clap(value_enum, default_value_t = Verbosity::default())]
    #[clap(hide_possible_values = false)]
    #[clap(global = true)]
    #[clap(help = "Set the output verbosity level.")]
    pub verbosity: Verbosity,
}

/// CLI [commands](#variants). Used to decide which runtime [Command](#variants) the CLI arguments should be passed to.
#[derive(Debug, Deserialize, Serialize, Subcommand)]
pub enum Command {
    /// Pass CLI arguments to the [status](crate::run::status) method.
    /// ## Examples
    /// ```rust
    /// use dalliance::{Cli, cli::Command};
    /// use clap::Parser;
    /// let input = ["dalliance", "status", "--script", "https://example.org/lib.js"];
    /// let args = Cli::parse_from(input);
    /// assert!(matches!(args.command, Command::Status(_)));
    /// ```
    #[clap(about = "Load scripts and report their status.")]
    Status(StatusArgs),
    /// Pass CLI arguments to the [render](crate::run::render) method.
    #[clap(about = "Load the browser script and render the view once it is ready.")]
    Render(RenderArgs),
    /// Pass CLI arguments to the [config](crate::run::config) method.
    #[clap(about = "Write the default view configuration.")]
    #[clap(arg_required_else_help = true)]
    Config(ConfigArgs),
}

// -----------------------------------------------------------------------------
// Verbosity
// -----------------------------------------------------------------------------

/// The output verbosity level, exported as `RUST_LOG` before `env_logger` starts.
///
/// ```rust
/// use dalliance::cli::Verbosity;
/// assert_eq!(Verbosity::Debug.to_string(), "debug");
/// assert_eq!(Verbosity::default().to_string(), "info");
/// ```
#[derive(Clone, Debug, Default, Deserialize, Serialize, ValueEnum)]
pub enum Verbosity {
    #[default]
    Info,
    Warn,
    Debug,
    Error,
}

impl Display for Verbosity {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let level = match self {
            Verbosity::Info => "info",
            Verbosity::Warn => "warn",
            Verbosity::Debug => "debug",
            Verbosity::Error => "error",
        };
        f.write_str(level)
    }
}
