//! Create isolated, versioned Python environments with micromamba.
//!
//! [`env_spec`] derives names and paths, [`creator`] runs micromamba,
//! [`worker`] does that on a background thread, and [`controller`] holds the
//! validation the command line and the window share.

pub mod config;
pub mod controller;
pub mod creator;
pub mod env_spec;
pub mod error;
pub mod gui;
pub mod logging;
pub mod micromamba;
pub mod worker;

pub use env_spec::EnvironmentSpec;
pub use error::{ConfigError, CreateError, RequestError};
