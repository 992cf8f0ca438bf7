//! The load [`LoadStatus`] of an external script.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

// ----------------------------------------------------------------------------
// Load Status
// ----------------------------------------------------------------------------

/// The load status of an external script.
///
/// A status only moves forward: [`Idle`](LoadStatus::Idle) →
/// [`Loading`](LoadStatus::Loading) → [`Ready`](LoadStatus::Ready) or
/// [`Error`](LoadStatus::Error).
///
/// ## Examples
///
/// ```rust
/// use dalliance::LoadStatus;
/// use std::str::FromStr;
///
/// assert_eq!(LoadStatus::default(), LoadStatus::Idle);
/// assert_eq!(LoadStatus::Ready.to_string(), "ready");
/// assert_eq!(LoadStatus::from_str("error")?, LoadStatus::Error);
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Display, EnumIter, EnumString, Eq, Hash, PartialEq, Serialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LoadStatus {
    /// No locator supplied yet, or the locator was cleared.
    #[default]
    Idle,
    /// A load attempt is in flight.
    Loading,
    /// The script loaded successfully.
    Ready,
    /// The load attempt failed.
    Error,
}

impl LoadStatus {
    /// Returns true if no further transition can occur ([`Ready`](LoadStatus::Ready) or [`Error`](LoadStatus::Error)).
    ///
    /// ```rust
    /// use dalliance::LoadStatus;
    ///
    /// assert!(LoadStatus::Ready.is_terminal());
    /// assert!(LoadStatus::Error.is_terminal());
    /// assert!(!LoadStatus::Loading.is_terminal());
    /// ```
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoadStatus::Ready | LoadStatus::Error)
    }

    /// Returns true if a registration may move from `self` to `next`.
    ///
    /// Only an in-flight load may settle, and it settles exactly once.
    ///
    /// ```rust
    /// use dalliance::LoadStatus::*;
    ///
    /// assert!(Idle.can_transition_to(Loading));
    /// assert!(Loading.can_transition_to(Ready));
    /// assert!(Loading.can_transition_to(Error));
    /// assert!(!Idle.can_transition_to(Ready));
    /// assert!(!Ready.can_transition_to(Error));
    /// ```
    pub fn can_transition_to(&self, next: LoadStatus) -> bool {
        matches!(
            (self, next),
            (LoadStatus::Idle, LoadStatus::Loading)
                | (LoadStatus::Loading, LoadStatus::Ready)
                | (LoadStatus::Loading, LoadStatus::Error)
        )
    }
}
