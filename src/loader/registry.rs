//! Process-wide [`Registry`] of script registrations.
//!
//! A [`Registry`] is a cheap, clonable handle onto one shared map of
//! locator → registration. It is passed explicitly to every
//! [`ScriptLoader`](crate::ScriptLoader) that should share load state, there
//! is no global instance.
//!
//! Each registration holds the load status of one locator plus the callbacks
//! of every live [`Observation`] of that locator. Callbacks are invoked in
//! registration order, synchronously, when the owning [`LoadCompletion`]
//! settles.

use crate::loader::{LoadFailure, LoadStatus, ScriptHost};
use log::{debug, info, warn};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::rc::{Rc, Weak};

/// A status callback registered by one observer.
pub type Callback = Rc<dyn Fn(LoadStatus)>;

// ----------------------------------------------------------------------------
// Registration
// ----------------------------------------------------------------------------

/// Shared load state of one locator.
struct Registration {
    status: LoadStatus,
    failure: Option<LoadFailure>,
    observers: BTreeMap<ObserverId, Callback>,
}

impl Registration {
    fn new() -> Self {
        Registration { status: LoadStatus::Loading, failure: None, observers: BTreeMap::new() }
    }
}

/// Identifies one observer within a [`Registry`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ObserverId(u64);

#[derive(Default)]
struct Inner {
    registrations: BTreeMap<String, Registration>,
    next_id: u64,
    attempts: usize,
}

// ----------------------------------------------------------------------------
// Registry
// ----------------------------------------------------------------------------

/// Shared map of locator → load status and observer callbacks.
///
/// ## Examples
///
/// ```rust
/// use dalliance::{LoadStatus, ManualHost, Registry};
///
/// let registry = Registry::new();
/// let host = ManualHost::new();
///
/// let (_first, status) = registry.observe(&host, "https://example.org/lib.js", |_| ());
/// assert_eq!(status, LoadStatus::Loading);
///
/// // A second observer adopts the registration, no new load is attempted.
/// let (_second, status) = registry.observe(&host, "https://example.org/lib.js", |_| ());
/// assert_eq!(status, LoadStatus::Loading);
/// assert_eq!(registry.attempts(), 1);
///
/// host.succeed("https://example.org/lib.js")?;
/// assert_eq!(registry.status("https://example.org/lib.js"), Some(LoadStatus::Ready));
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
#[derive(Clone, Default)]
pub struct Registry {
    inner: Rc<RefCell<Inner>>,
}

impl Debug for Registry {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.debug_map().entries(self.snapshot()).finish()
    }
}

impl Registry {
    /// Returns a new, empty [`Registry`].
    pub fn new() -> Self {
        Registry::default()
    }

    /// Returns the status of a locator's registration, or [`None`] if no observer ever requested it.
    pub fn status(&self, locator: &str) -> Option<LoadStatus> {
        self.inner.borrow().registrations.get(locator).map(|r| r.status)
    }

    /// Returns the failure that moved a registration to [`LoadStatus::Error`].
    pub fn failure(&self, locator: &str) -> Option<LoadFailure> {
        self.inner.borrow().registrations.get(locator).and_then(|r| r.failure.clone())
    }

    /// Returns the number of live observers of a locator.
    pub fn observer_count(&self, locator: &str) -> usize {
        self.inner.borrow().registrations.get(locator).map(|r| r.observers.len()).unwrap_or(0)
    }

    /// Returns the total number of load attempts initiated through this registry.
    pub fn attempts(&self) -> usize {
        self.inner.borrow().attempts
    }

    /// Returns the number of registered locators.
    pub fn len(&self) -> usize {
        self.inner.borrow().registrations.len()
    }

    /// Returns true if no locator was ever requested.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().registrations.is_empty()
    }

    /// Returns every registered locator with its status, sorted by locator.
    pub fn snapshot(&self) -> Vec<(String, LoadStatus)> {
        self.inner
            .borrow()
            .registrations
            .iter()
            .map(|(locator, registration)| (locator.clone(), registration.status))
            .collect()
    }

    /// Begin observing a locator.
    ///
    /// The first observation of a locator creates its registration in
    /// [`LoadStatus::Loading`] and hands a [`LoadCompletion`] to `host`, which
    /// is the one and only load attempt for that locator. Later observations
    /// adopt the registration's current status.
    ///
    /// `callback` is invoked when the registration settles. It stays
    /// registered until the returned [`Observation`] is dropped.
    ///
    /// ## Arguments
    ///
    /// - `host` - Environment that performs the load.
    /// - `locator` - Script locator. An empty locator is never registered.
    /// - `callback` - Invoked with the terminal status.
    ///
    /// ## Returns
    ///
    /// The [`Observation`] handle and the status at the time of the call,
    /// [`LoadStatus::Idle`] with an inert handle for an empty locator.
    pub fn observe<H, F>(&self, host: &H, locator: &str, callback: F) -> (Observation, LoadStatus)
    where
        H: ScriptHost + ?Sized,
        F: Fn(LoadStatus) + 'static,
    {
        let (id, initiate) = {
            let mut inner = self.inner.borrow_mut();
            let id = ObserverId(inner.next_id);
            inner.next_id += 1;

            if locator.is_empty() {
                debug!("Nothing to load for an empty locator.");
                let observation = Observation { registry: Weak::new(), locator: String::new(), id };
                return (observation, LoadStatus::Idle);
            }

            let initiate = !inner.registrations.contains_key(locator);
            if initiate {
                inner.attempts += 1;
            }
            let registration =
                inner.registrations.entry(locator.to_string()).or_insert_with(Registration::new);
            registration.observers.insert(id, Rc::new(callback));
            (id, initiate)
        };

        // The handle exists before the host runs, so an unwinding host still deregisters.
        let observation =
            Observation { registry: Rc::downgrade(&self.inner), locator: locator.to_string(), id };

        if initiate {
            info!("Loading script: {locator:?}");
            host.attach(locator, LoadCompletion { registry: self.clone(), locator: locator.to_string() });
        } else {
            debug!("Adopting existing registration: {locator:?}");
        }

        // A host may settle synchronously inside attach.
        let status = self.status(locator).unwrap_or(LoadStatus::Loading);
        (observation, status)
    }

    /// Move a registration out of [`LoadStatus::Loading`] and notify its observers.
    fn settle(&self, locator: &str, result: Result<(), LoadFailure>) {
        let next = match result {
            Ok(()) => LoadStatus::Ready,
            Err(_) => LoadStatus::Error,
        };

        let callbacks: Vec<Callback> = {
            let mut inner = self.inner.borrow_mut();
            let Some(registration) = inner.registrations.get_mut(locator) else {
                warn!("Ignoring completion for unregistered script: {locator:?}");
                return;
            };
            if !registration.status.can_transition_to(next) {
                warn!("Ignoring {next} for script {locator:?}, already {}", registration.status);
                return;
            }
            registration.status = next;
            if let Err(failure) = result {
                warn!("{failure}");
                registration.failure = Some(failure);
            } else {
                info!("Script ready: {locator:?}");
            }
            registration.observers.values().cloned().collect()
        };

        debug!("Notifying {} observer(s) of {locator:?}: {next}", callbacks.len());
        // No borrow is held here, callbacks may observe or drop freely.
        callbacks.iter().for_each(|callback| callback(next));
    }

    fn deregister(inner: &Weak<RefCell<Inner>>, locator: &str, id: ObserverId) {
        let Some(inner) = inner.upgrade() else { return };
        let mut borrowed = inner.borrow_mut();
        let Some(registration) = borrowed.registrations.get_mut(locator) else { return };
        let callback = registration.observers.remove(&id);
        debug!("Stopped observing {locator:?} ({} observer(s) left)", registration.observers.len());

        // The callback may own other observations, release the borrow before it drops.
        drop(borrowed);
        drop(callback);
    }
}

// ----------------------------------------------------------------------------
// Observation
// ----------------------------------------------------------------------------

/// One observer's live interest in one locator.
///
/// Dropping the [`Observation`] removes its callback from the registration.
/// The registration itself, and every other observer, is left untouched.
///
/// ```rust
/// use dalliance::{ManualHost, Registry};
///
/// let registry = Registry::new();
/// let host = ManualHost::new();
///
/// let (observation, _) = registry.observe(&host, "lib.js", |_| ());
/// assert_eq!(registry.observer_count("lib.js"), 1);
/// drop(observation);
/// assert_eq!(registry.observer_count("lib.js"), 0);
/// assert_eq!(registry.len(), 1);
/// ```
#[must_use = "dropping an Observation stops observing immediately"]
pub struct Observation {
    registry: Weak<RefCell<Inner>>,
    locator: String,
    id: ObserverId,
}

impl Observation {
    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn id(&self) -> ObserverId {
        self.id
    }
}

impl Debug for Observation {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.debug_struct("Observation").field("locator", &self.locator).field("id", &self.id).finish()
    }
}

impl Drop for Observation {
    fn drop(&mut self) {
        Registry::deregister(&self.registry, &self.locator, self.id);
    }
}

// ----------------------------------------------------------------------------
// Load Completion
// ----------------------------------------------------------------------------

/// The right to settle one locator's load attempt.
///
/// Exactly one [`LoadCompletion`] exists per registration, and settling
/// consumes it, so a registration leaves [`LoadStatus::Loading`] at most
/// once. Dropping it unsettled leaves the registration loading.
#[must_use = "an unsettled LoadCompletion leaves its script loading forever"]
pub struct LoadCompletion {
    registry: Registry,
    locator: String,
}

impl LoadCompletion {
    /// Locator of the script being loaded.
    pub fn locator(&self) -> &str {
        &self.locator
    }

    /// The script loaded successfully.
    pub fn succeed(self) {
        self.settle(Ok(()))
    }

    /// The script failed to load or execute.
    pub fn fail(self, failure: LoadFailure) {
        self.settle(Err(failure))
    }

    pub fn settle(self, result: Result<(), LoadFailure>) {
        self.registry.settle(&self.locator, result)
    }
}

impl Debug for LoadCompletion {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.debug_struct("LoadCompletion").field("locator", &self.locator).finish()
    }
}
