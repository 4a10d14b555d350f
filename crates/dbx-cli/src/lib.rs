//! # dbx-cli
//!
//! Administration tool that removes the blanket `account users` grant
//! from every app in a workspace.
//!
//! This crate provides:
//! - OAuth client-credentials authentication
//! - App listing and per-app access-control list reads
//! - The strip workflow that writes reduced lists back
//! - Configuration file management

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::Cli;
pub use config::{CliConfig, Credentials};
pub use error::{CliError, CliResult};
