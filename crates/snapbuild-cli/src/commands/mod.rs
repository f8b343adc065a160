//! Command implementations.
//!
//! - [`build`] - bundle the Snap once
//! - [`watch`] - bundle and rebuild on change

pub mod build;
pub(crate) mod utils;
pub mod watch;

pub use build::execute as build_execute;
pub use watch::execute as watch_execute;
