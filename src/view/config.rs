//! Configuration of the Biodalliance genome browser view.
//!
//! The [`BrowserConfig`] is the payload handed to the script's `new Browser({...})`
//! entry point. Its keys keep the spelling Biodalliance expects, and it is
//! otherwise never interpreted here.

use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use color_eyre::Help;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::io::Write;
use std::path::Path;

/// Release of the compiled Biodalliance script.
pub const DALLIANCE_SCRIPT: &str = "http://www.biodalliance.org/release-0.13/dalliance-compiled.js";

/// Element id Biodalliance renders into when no `pageName` is given.
pub const DEFAULT_MOUNT: &str = "svgHolder";

// ----------------------------------------------------------------------------
// View Config
// ----------------------------------------------------------------------------

/// A script locator together with the [`BrowserConfig`] it is started with.
///
/// ## Examples
///
/// ```rust
/// use dalliance::view::{ViewConfig, DALLIANCE_SCRIPT};
///
/// let config = ViewConfig::default();
/// assert_eq!(config.script, DALLIANCE_SCRIPT);
/// config.validate()?;
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ViewConfig {
    /// Locator of the visualization script.
    pub script: String,
    /// Browser payload.
    pub browser: BrowserConfig,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig { script: DALLIANCE_SCRIPT.to_string(), browser: BrowserConfig::default() }
    }
}

impl ViewConfig {
    /// Read a [`ViewConfig`] from a JSON file.
    ///
    /// ```rust
    /// use dalliance::view::ViewConfig;
    ///
    /// let config_out = ViewConfig::default();
    /// let file = tempfile::NamedTempFile::new()?;
    /// config_out.write(file.path())?;
    ///
    /// let config_in = ViewConfig::read(file.path())?;
    /// # assert_eq!(config_in, config_out);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn read<P>(path: P) -> Result<ViewConfig, Report>
    where
        P: AsRef<Path> + Debug,
    {
        debug!("Reading view config: {path:?}");
        let file =
            std::fs::File::open(&path).wrap_err(eyre!("Failed to open view config: {path:?}."))?;
        let reader = std::io::BufReader::new(file);
        let config: ViewConfig = serde_json::from_reader(reader)
            .wrap_err(eyre!("Failed to deserialize view config: {path:?}."))?;
        config.validate().wrap_err(eyre!("Invalid view config: {path:?}."))?;
        Ok(config)
    }

    /// Write a [`ViewConfig`] to a JSON file.
    pub fn write<P>(&self, path: P) -> Result<(), Report>
    where
        P: AsRef<Path> + Debug,
    {
        let mut file = std::fs::File::create(&path)
            .wrap_err(eyre!("Failed to create view config: {path:?}"))?;
        let output = serde_json::to_string_pretty(self)
            .wrap_err(eyre!("Failed to serialize view config: {self:?}"))?;
        file.write_all(format!("{}\n", output).as_bytes())
            .wrap_err(eyre!("Failed to write view config: {path:?}"))?;
        Ok(())
    }

    /// Check the script locator and the [`BrowserConfig`].
    pub fn validate(&self) -> Result<(), Report> {
        if self.script.trim().is_empty() {
            return Err(eyre!("Script locator is empty.")
                .suggestion(format!("Use the Biodalliance release: {DALLIANCE_SCRIPT}")));
        }
        self.browser.validate()
    }
}

// ----------------------------------------------------------------------------
// Browser Config
// ----------------------------------------------------------------------------

/// Arguments of the Biodalliance `Browser` constructor.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct BrowserConfig {
    /// Chromosome shown on start.
    pub chr: String,
    #[serde(rename = "viewStart")]
    pub view_start: u64,
    #[serde(rename = "viewEnd")]
    pub view_end: u64,
    /// Element id to render into, Biodalliance defaults to [`DEFAULT_MOUNT`].
    #[serde(rename = "pageName", default, skip_serializing_if = "Option::is_none")]
    pub page_name: Option<String>,
    #[serde(rename = "coordSystem")]
    pub coord_system: CoordSystem,
    /// Tracks, top to bottom.
    pub sources: Vec<Source>,
}

/// Genome assembly the coordinates refer to.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CoordSystem {
    #[serde(rename = "speciesName")]
    pub species_name: String,
    /// NCBI taxonomy id.
    pub taxon: u32,
    pub auth: String,
    pub version: String,
    #[serde(rename = "ucscName")]
    pub ucsc_name: String,
}

/// One track of the browser.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Source {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    /// 2bit sequence file.
    #[serde(rename = "twoBitURI", default, skip_serializing_if = "Option::is_none")]
    pub two_bit_uri: Option<String>,
    /// bigWig or bigBed file.
    #[serde(rename = "bwgURI", default, skip_serializing_if = "Option::is_none")]
    pub bwg_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stylesheet_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier_type: Option<String>,
    #[serde(rename = "collapseSuperGroups", default, skip_serializing_if = "Option::is_none")]
    pub collapse_super_groups: Option<bool>,
    /// Search index for feature names.
    #[serde(rename = "trixURI", default, skip_serializing_if = "Option::is_none")]
    pub trix_uri: Option<String>,
    #[serde(rename = "noDownsample", default, skip_serializing_if = "Option::is_none")]
    pub no_downsample: Option<bool>,
}

impl Default for BrowserConfig {
    /// Human GRCh37, chr22:30,700,000-30,900,000, with sequence, GENCODE genes,
    /// repeats and conservation tracks.
    fn default() -> Self {
        let datasets = "//www.biodalliance.org/datasets";
        let stylesheets = "//www.biodalliance.org/stylesheets";
        BrowserConfig {
            chr: "22".to_string(),
            view_start: 30_700_000,
            view_end: 30_900_000,
            page_name: None,
            coord_system: CoordSystem {
                species_name: "Human".to_string(),
                taxon: 9606,
                auth: "GRCh".to_string(),
                version: "37".to_string(),
                ucsc_name: "hg19".to_string(),
            },
            sources: vec![
                Source {
                    name: "Genome".to_string(),
                    two_bit_uri: Some(format!("{datasets}/hg19.2bit")),
                    tier_type: Some("sequence".to_string()),
                    ..Default::default()
                },
                Source {
                    name: "Genes".to_string(),
                    desc: Some("Gene structures from GENCODE 19".to_string()),
                    bwg_uri: Some(format!("{datasets}/gencode.bb")),
                    stylesheet_uri: Some(format!("{stylesheets}/gencode.xml")),
                    collapse_super_groups: Some(true),
                    trix_uri: Some(format!("{datasets}/geneIndex.ix")),
                    ..Default::default()
                },
                Source {
                    name: "Repeats".to_string(),
                    desc: Some("Repeat annotation from Ensembl".to_string()),
                    bwg_uri: Some(format!("{datasets}/repeats.bb")),
                    stylesheet_uri: Some(format!("{stylesheets}/bb-repeats.xml")),
                    ..Default::default()
                },
                Source {
                    name: "Conservation".to_string(),
                    desc: Some("Conservation".to_string()),
                    bwg_uri: Some(format!("{datasets}/phastCons46way.bw")),
                    no_downsample: Some(true),
                    ..Default::default()
                },
            ],
        }
    }
}

impl BrowserConfig {
    /// Id of the element the browser renders into.
    ///
    /// ```rust
    /// use dalliance::view::BrowserConfig;
    ///
    /// let mut config = BrowserConfig::default();
    /// assert_eq!(config.mount_id(), "svgHolder");
    /// config.page_name = Some("genome".to_string());
    /// assert_eq!(config.mount_id(), "genome");
    /// ```
    pub fn mount_id(&self) -> &str {
        self.page_name.as_deref().unwrap_or(DEFAULT_MOUNT)
    }

    /// Check the view window and every [`Source`].
    ///
    /// ```rust
    /// use dalliance::view::BrowserConfig;
    ///
    /// let mut config = BrowserConfig::default();
    /// config.view_end = config.view_start;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), Report> {
        if self.chr.trim().is_empty() {
            return Err(eyre!("Chromosome is empty.").suggestion("Set 'chr', for example \"22\"."));
        }
        if self.view_start >= self.view_end {
            return Err(eyre!(
                "View start ({}) must be less than view end ({}).",
                self.view_start,
                self.view_end
            ))
            .suggestion("Check 'viewStart' and 'viewEnd'.");
        }
        if let Some(page_name) = &self.page_name {
            if page_name.trim().is_empty() || page_name.contains(|c: char| c.is_whitespace() || c == '"') {
                return Err(eyre!("Invalid element id for 'pageName': {page_name:?}"));
            }
        }
        self.sources.iter().try_for_each(Source::validate)
    }
}

impl Source {
    /// Every track needs a name and something to display.
    pub fn validate(&self) -> Result<(), Report> {
        if self.name.trim().is_empty() {
            return Err(eyre!("Source has no name: {self:?}"));
        }
        if self.two_bit_uri.is_none() && self.bwg_uri.is_none() {
            return Err(eyre!("Source {:?} has no data URI.", self.name)
                .suggestion("Set 'twoBitURI' or 'bwgURI'."));
        }
        Ok(())
    }
}
