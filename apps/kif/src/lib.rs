//! # kif
//!
//! Library half of the `kif` binary.
//!
//! - `cli`: clap command definitions and their implementations
//! - `config`: the optional `kif.toml` configuration
//!
//! The binary only parses arguments, installs the tracing subscriber and
//! hands over to [`cli::execute`]. Everything else lives here so the
//! integration tests can drive it directly.

pub mod cli;
pub mod config;
