//! Lattice CLI - validate module dependencies against an architecture policy.
//!
//! The binary reads one or more JSON input manifests describing projects and
//! their references, a `lattice.toml` policy, and reports every violation.
//!
//! # Architecture
//!
//! - [`cli`] - clap argument definitions
//! - [`commands`] - `check`, `arch` and `path`
//! - [`loader`] - replays input manifests into a [`GraphBuilder`](lattice_graph::GraphBuilder)
//! - [`report`] - text and JSON renderings of an analysis
//! - [`error`] - fatal error types and their miette rendering
//! - [`logger`] / [`ui`] - tracing setup and status lines on stderr
//!
//! # Exit codes
//!
//! `0` when no error-severity violation was found, otherwise the number of
//! error violations capped at 254. Fatal errors exit with 255.

pub mod cli;
pub mod commands;
pub mod error;
pub mod loader;
pub mod logger;
pub mod report;
pub mod ui;

pub use error::{CliError, Result};
