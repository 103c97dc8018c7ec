//! Ambient plumbing shared by the library and the binary: error types,
//! the JSON config file and log setup.

pub mod config;
pub mod error;
pub mod logging;
