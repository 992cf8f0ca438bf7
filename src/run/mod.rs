//! Run the CLI [commands](crate::cli::Command).

use crate::view::{render_page, TrustedFragment, ViewConfig};
use crate::{HttpHost, LoadStatus, Registry, ScriptLoader};
use clap::Parser;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use color_eyre::Help;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::rc::Rc;
use tabled::Table;

// ----------------------------------------------------------------------------
// Args
// ----------------------------------------------------------------------------

/// Load scripts and report their status.
#[derive(Clone, Debug, Default, Deserialize, Parser, Serialize)]
#[clap(verbatim_doc_comment)]
pub struct StatusArgs {
    /// View config (JSON), its script is checked when no --script is given.
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Script locator(s) to load.
    ///
    /// Repeat to load several scripts through one shared registry.
    #[clap(short = 's', long)]
    pub script: Vec<String>,
}

/// Load the browser script and render the view once it is ready.
#[derive(Clone, Debug, Default, Deserialize, Parser, Serialize)]
#[clap(verbatim_doc_comment)]
pub struct RenderArgs {
    /// View config (JSON), defaults to the built-in hg19 view.
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Override the script locator of the view config.
    #[clap(short = 's', long)]
    pub script: Option<String>,

    /// Output HTML file, stdout if not given.
    #[clap(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Embed the fetched script in the page instead of referencing it.
    #[clap(long)]
    pub inline: bool,
}

/// Write the default view configuration.
#[derive(Clone, Debug, Default, Deserialize, Parser, Serialize)]
#[clap(verbatim_doc_comment)]
pub struct ConfigArgs {
    /// Output JSON file.
    #[clap(short = 'o', long, required = true)]
    pub output: PathBuf,
}

// ----------------------------------------------------------------------------
// Commands
// ----------------------------------------------------------------------------

/// Returns the [`ViewConfig`] from a file, or the default one.
fn view_config(path: &Option<PathBuf>) -> Result<ViewConfig, Report> {
    match path {
        Some(path) => {
            info!("Reading view config: {path:?}");
            ViewConfig::read(path)
        }
        None => Ok(ViewConfig::default()),
    }
}

/// Load every script through one shared [`Registry`] and tabulate the outcome.
///
/// ## Returns
///
/// A [`Table`] with one row per distinct locator.
pub async fn status(args: &StatusArgs) -> Result<Table, Report> {
    status_with(args, Rc::new(HttpHost::new())).await
}

async fn status_with(args: &StatusArgs, host: Rc<HttpHost>) -> Result<Table, Report> {
    let locators = match args.script.is_empty() {
        true => vec![view_config(&args.config)?.script],
        false => args.script.clone(),
    };

    let registry = Registry::new();

    // Keep every loader alive until the loads settle.
    let loaders = locators
        .iter()
        .map(|locator| {
            let mut loader = ScriptLoader::new(&registry, host.clone());
            loader.observe(Some(locator.as_str()));
            loader
        })
        .collect::<Vec<_>>();
    info!("Loading {} script(s) for {} observer(s).", registry.len(), loaders.len());

    let settled = host.settle().await;
    debug!("Settled {settled} load(s).");

    let mut builder = tabled::builder::Builder::default();
    builder.push_record(["Locator", "Status", "Observers"]);
    registry.snapshot().into_iter().for_each(|(locator, status)| {
        let observers = registry.observer_count(&locator).to_string();
        builder.push_record([locator, status.to_string(), observers]);
    });

    Ok(builder.build())
}

/// Load the browser script and render the view page.
///
/// Fails unless the script becomes [`LoadStatus::Ready`].
pub async fn render(args: &RenderArgs) -> Result<(), Report> {
    render_with(args, Rc::new(HttpHost::new())).await
}

async fn render_with(args: &RenderArgs, host: Rc<HttpHost>) -> Result<(), Report> {
    let mut config = view_config(&args.config)?;
    if let Some(script) = &args.script {
        config.script = script.clone();
        config.validate()?;
    }
    let fragment = TrustedFragment::browser(&config)?;

    let registry = Registry::new();
    let mut loader = ScriptLoader::new(&registry, host.clone());

    loader.observe(Some(config.script.as_str()));
    host.settle().await;

    let status = loader.status();
    if status != LoadStatus::Ready {
        return Err(eyre!("Script {:?} status: {status}", config.script))
            .suggestion("Check the script locator and your network connection.");
    }

    let source = match args.inline {
        true => host.script(&config.script),
        false => None,
    };
    let page = render_page(status, &config.script, &fragment, source.as_deref());

    match &args.output {
        Some(path) => {
            info!("Writing view: {path:?}");
            std::fs::write(path, page).wrap_err(eyre!("Failed to write view: {path:?}"))?;
        }
        None => print!("{page}"),
    }

    info!("Done.");
    Ok(())
}

/// Write the default [`ViewConfig`].
///
/// ```rust
/// use dalliance::run::{config, ConfigArgs};
/// use dalliance::view::ViewConfig;
///
/// let dir = tempfile::tempdir()?;
/// let args = ConfigArgs { output: dir.path().join("view.json") };
/// config(&args)?;
/// assert_eq!(ViewConfig::read(&args.output)?, ViewConfig::default());
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn config(args: &ConfigArgs) -> Result<(), Report> {
    info!("Writing default view config: {:?}", args.output);
    ViewConfig::default().write(&args.output)
}

#[cfg(test)]
mod tests;
