//! I/O adapters for the resolver: config, filesystem, and child processes.

pub mod commands;
pub mod config;
pub mod layout;
pub mod process;
pub mod resilient;
pub mod validation;
pub mod versions;
