//! Environments that perform script loads.

use crate::loader::{LoadCompletion, LoadFailure};
use color_eyre::eyre::{eyre, Report, Result};
use color_eyre::Help;
use log::debug;
use std::cell::RefCell;
use std::collections::BTreeMap;

// ----------------------------------------------------------------------------
// Script Host
// ----------------------------------------------------------------------------

/// The environment a script is attached to.
///
/// [`attach`](ScriptHost::attach) is called once per distinct locator, by the
/// [`Registry`](crate::Registry). The host starts the load and later settles
/// `completion` with the outcome. It must not block waiting for the load.
pub trait ScriptHost {
    /// Start loading `locator`, settling `completion` when the load finishes.
    fn attach(&self, locator: &str, completion: LoadCompletion);
}

// ----------------------------------------------------------------------------
// Manual Host
// ----------------------------------------------------------------------------

/// A [`ScriptHost`] whose load events are fired by hand.
///
/// ## Examples
///
/// ```rust
/// use dalliance::{LoadStatus, ManualHost, Registry};
///
/// let registry = Registry::new();
/// let host = ManualHost::new();
/// let (_observation, _) = registry.observe(&host, "lib.js", |_| ());
///
/// assert_eq!(host.pending(), ["lib.js"]);
/// host.fail("lib.js", "connection refused")?;
/// assert_eq!(registry.status("lib.js"), Some(LoadStatus::Error));
/// assert!(host.pending().is_empty());
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
#[derive(Debug, Default)]
pub struct ManualHost {
    attached: RefCell<Vec<String>>,
    pending: RefCell<BTreeMap<String, LoadCompletion>>,
}

impl ManualHost {
    /// Returns a host with nothing attached.
    pub fn new() -> Self {
        ManualHost::default()
    }

    /// Returns every locator ever attached, in attach order.
    pub fn attached(&self) -> Vec<String> {
        self.attached.borrow().clone()
    }

    /// Returns the locators whose load has not fired yet.
    pub fn pending(&self) -> Vec<String> {
        self.pending.borrow().keys().cloned().collect()
    }

    /// Fire the success event of a pending load.
    pub fn succeed(&self, locator: &str) -> Result<(), Report> {
        self.take(locator)?.succeed();
        Ok(())
    }

    /// Fire the failure event of a pending load.
    pub fn fail(&self, locator: &str, reason: &str) -> Result<(), Report> {
        self.take(locator)?.fail(LoadFailure::new(locator, reason));
        Ok(())
    }

    fn take(&self, locator: &str) -> Result<LoadCompletion, Report> {
        // Release the borrow before settling, observers may attach new scripts.
        let completion = self.pending.borrow_mut().remove(locator);
        completion.ok_or_else(|| {
            eyre!("No pending load for script: {locator:?}")
                .suggestion(format!("Pending loads: {:?}", self.pending()))
        })
    }
}

impl ScriptHost for ManualHost {
    fn attach(&self, locator: &str, completion: LoadCompletion) {
        debug!("Attaching script: {locator:?}");
        self.attached.borrow_mut().push(locator.to_string());
        self.pending.borrow_mut().insert(locator.to_string(), completion);
    }
}
