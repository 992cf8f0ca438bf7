//! Load-once tracking of external scripts.
//!
//! A [`Registry`] records, per locator, the one load attempt ever made for it
//! and its [`LoadStatus`]. A [`ScriptLoader`] is one consumer's view of a
//! locator's status, and a [`ScriptHost`] is the environment that performs the
//! loads.

mod failure;
mod host;
#[cfg(feature = "download")]
mod http;
mod observer;
mod registry;
mod status;

#[doc(inline)]
pub use failure::LoadFailure;
#[doc(inline)]
pub use host::{ManualHost, ScriptHost};
#[doc(inline)]
#[cfg(feature = "download")]
pub use http::HttpHost;
#[doc(inline)]
pub use observer::ScriptLoader;
#[doc(inline)]
pub use registry::{Callback, LoadCompletion, Observation, ObserverId, Registry};
#[doc(inline)]
pub use status::LoadStatus;

#[cfg(all(test, feature = "download"))]
pub(crate) use http::tests::{closed_url, local_host, serve};
