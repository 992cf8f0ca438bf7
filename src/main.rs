use clap::Parser;
use color_eyre::eyre::{Report, Result};
use dalliance::{cli::Command, run, Cli};

#[tokio::main]
async fn main() -> Result<(), Report> {
    // ------------------------------------------------------------------------
    // CLI Setup

    // Parse CLI parameters
    let args = Cli::parse();

    // initialize color_eyre crate for colorized logs
    color_eyre::install()?;

    // Set logging/verbosity level via RUST_LOG
    std::env::set_var("RUST_LOG", args.verbosity.to_string());

    // initialize env_logger crate for logging/verbosity level
    env_logger::init();

    // check which CLI command we're running (status, render, config)
    match args.command {
        // Load scripts and print their status as table
        Command::Status(args) => println!("{}", run::status(&args).await?),
        // Render the view once the browser script is ready
        Command::Render(args) => run::render(&args).await?,
        // Write the default view config
        Command::Config(args) => run::config(&args)?,
    }

    Ok(())
}
