//! `dalliance` loads the [Biodalliance](http://www.biodalliance.org) genome
//! browser script and renders the view that depends on it.
//!
//! The script is loaded at most once per locator for the whole process. Any
//! number of [`ScriptLoader`]s share a [`Registry`] and observe the
//! [`LoadStatus`] of the locator they are interested in:
//!
//! ```text
//! idle ──▶ loading ──▶ ready
//!                 └──▶ error
//! ```
//!
//! The browser markup is only rendered once the status is
//! [`ready`](LoadStatus::Ready), see [`view::gate`].
//!
//! ## Examples
//!
//! ```rust
//! use dalliance::{view, LoadStatus, ManualHost, Registry, ScriptLoader};
//! use std::rc::Rc;
//!
//! let config = view::ViewConfig::default();
//! let fragment = view::TrustedFragment::browser(&config)?;
//!
//! let registry = Registry::new();
//! let host = Rc::new(ManualHost::new());
//! let mut loader = ScriptLoader::new(&registry, host.clone());
//!
//! loader.observe(Some(config.script.as_str()));
//! assert!(loader.content(&fragment).is_none());
//!
//! host.succeed(&config.script)?;
//! assert!(loader.content(&fragment).is_some());
//! # Ok::<(), color_eyre::eyre::Report>(())
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod loader;
#[cfg(feature = "cli")]
pub mod run;
pub mod view;

#[doc(inline)]
#[cfg(feature = "cli")]
pub use crate::cli::Cli;
#[doc(inline)]
#[cfg(feature = "download")]
pub use crate::loader::HttpHost;
#[doc(inline)]
pub use crate::loader::{LoadFailure, LoadStatus, ManualHost, Registry, ScriptHost, ScriptLoader};
