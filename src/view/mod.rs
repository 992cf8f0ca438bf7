//! The genome browser view: its [configuration](ViewConfig) and the
//! [gated](gate) markup that depends on the loaded script.

mod config;
mod render;

#[doc(inline)]
pub use config::*;
#[doc(inline)]
pub use render::*;

#[cfg(test)]
mod tests;
