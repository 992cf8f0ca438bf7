use crate::loader::{LoadStatus, Observation, Registry, ScriptHost};
use crate::view::{gate, TrustedFragment};
use log::debug;
use std::cell::Cell;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

// ----------------------------------------------------------------------------
// Script Loader
// ----------------------------------------------------------------------------

/// Status shared between a [`ScriptLoader`] and its registered callback.
struct Tracker {
    status: Cell<LoadStatus>,
    listener: Option<Box<dyn Fn(LoadStatus)>>,
}

impl Tracker {
    fn update(&self, status: LoadStatus) {
        if self.status.replace(status) != status {
            if let Some(listener) = &self.listener {
                listener(status);
            }
        }
    }
}

/// One consumer's view of an external script's [`LoadStatus`].
///
/// A [`ScriptLoader`] observes at most one locator at a time through a shared
/// [`Registry`]. Observing a new locator stops observing the previous one,
/// and dropping the loader stops observing altogether. Neither cancels a
/// load already in flight.
///
/// ## Examples
///
/// ```rust
/// use dalliance::{LoadStatus, ManualHost, Registry, ScriptLoader};
/// use std::rc::Rc;
///
/// let registry = Registry::new();
/// let host = Rc::new(ManualHost::new());
///
/// let mut loader = ScriptLoader::new(&registry, host.clone());
/// assert_eq!(loader.status(), LoadStatus::Idle);
///
/// assert_eq!(loader.observe(Some("https://example.org/lib.js")), LoadStatus::Loading);
/// host.succeed("https://example.org/lib.js")?;
/// assert_eq!(loader.status(), LoadStatus::Ready);
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub struct ScriptLoader {
    registry: Registry,
    host: Rc<dyn ScriptHost>,
    locator: Option<String>,
    tracker: Rc<Tracker>,
    observation: Option<Observation>,
}

impl Debug for ScriptLoader {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.debug_struct("ScriptLoader")
            .field("locator", &self.locator)
            .field("status", &self.status())
            .field("observation", &self.observation)
            .finish()
    }
}

impl ScriptLoader {
    /// Returns an idle [`ScriptLoader`] sharing `registry`, loading through `host`.
    pub fn new(registry: &Registry, host: Rc<dyn ScriptHost>) -> Self {
        ScriptLoader::build(registry, host, None)
    }

    /// Returns an idle [`ScriptLoader`] that calls `listener` on every status change.
    ///
    /// ```rust
    /// use dalliance::{LoadStatus, ManualHost, Registry, ScriptLoader};
    /// use std::{cell::RefCell, rc::Rc};
    ///
    /// let registry = Registry::new();
    /// let host = Rc::new(ManualHost::new());
    /// let seen = Rc::new(RefCell::new(Vec::new()));
    ///
    /// let log = seen.clone();
    /// let mut loader = ScriptLoader::with_listener(&registry, host.clone(), move |s| log.borrow_mut().push(s));
    /// loader.observe(Some("lib.js"));
    /// host.fail("lib.js", "timeout")?;
    ///
    /// assert_eq!(*seen.borrow(), [LoadStatus::Loading, LoadStatus::Error]);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn with_listener<F>(registry: &Registry, host: Rc<dyn ScriptHost>, listener: F) -> Self
    where
        F: Fn(LoadStatus) + 'static,
    {
        ScriptLoader::build(registry, host, Some(Box::new(listener)))
    }

    fn build(
        registry: &Registry,
        host: Rc<dyn ScriptHost>,
        listener: Option<Box<dyn Fn(LoadStatus)>>,
    ) -> Self {
        ScriptLoader {
            registry: registry.clone(),
            host,
            locator: None,
            tracker: Rc::new(Tracker { status: Cell::new(LoadStatus::Idle), listener }),
            observation: None,
        }
    }

    /// Current status of the observed locator.
    pub fn status(&self) -> LoadStatus {
        self.tracker.status.get()
    }

    /// The observed locator, [`None`] while idle.
    pub fn locator(&self) -> Option<&str> {
        self.locator.as_deref()
    }

    /// Observe a locator, or stop observing with [`None`] or an empty string.
    ///
    /// Observing the locator already observed changes nothing: no new load
    /// attempt and no second callback.
    ///
    /// ## Returns
    ///
    /// The status right after the call.
    pub fn observe(&mut self, locator: Option<&str>) -> LoadStatus {
        let locator = locator.filter(|l| !l.is_empty());
        if locator == self.locator.as_deref() {
            return self.status();
        }

        // Deregister from the previous locator before anything else.
        self.observation = None;
        self.locator = locator.map(String::from);

        let Some(locator) = locator else {
            debug!("Script loader is idle");
            self.tracker.update(LoadStatus::Idle);
            return self.status();
        };

        let tracker = self.tracker.clone();
        let (observation, status) =
            self.registry.observe(self.host.as_ref(), locator, move |status| tracker.update(status));
        self.observation = Some(observation);
        self.tracker.update(status);
        self.status()
    }

    /// Stop observing, returning to [`LoadStatus::Idle`].
    pub fn clear(&mut self) {
        self.observe(None);
    }

    /// The dependent content, only once the script is [`LoadStatus::Ready`].
    pub fn content<'f>(&self, fragment: &'f TrustedFragment) -> Option<&'f TrustedFragment> {
        gate(self.status(), fragment)
    }
}
