use std::fmt::{Display, Formatter};

// ----------------------------------------------------------------------------
// Load Failure
// ----------------------------------------------------------------------------

/// A script failed to load or execute.
///
/// This is the only failure of the load lifecycle. It is captured by the
/// [`Registry`](crate::Registry) and turned into
/// [`LoadStatus::Error`](crate::LoadStatus::Error), it never reaches the caller
/// as an `Err`.
///
/// ```rust
/// use dalliance::LoadFailure;
///
/// let failure = LoadFailure::new("https://example.org/lib.js", "status code 404");
/// assert_eq!(failure.to_string(), "Failed to load script \"https://example.org/lib.js\": status code 404");
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoadFailure {
    /// Locator of the script that failed.
    pub locator: String,
    /// Human-readable cause (network error, bad status, execution error).
    pub reason: String,
}

impl LoadFailure {
    pub fn new(locator: impl Into<String>, reason: impl Into<String>) -> Self {
        LoadFailure { locator: locator.into(), reason: reason.into() }
    }
}

impl Display for LoadFailure {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Failed to load script {:?}: {}", self.locator, self.reason)
    }
}

impl std::error::Error for LoadFailure {}
