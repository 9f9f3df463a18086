//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`providers`] - List providers and install status
//! - [`setup`] - Download and extract provider datasets
//! - [`distance`] - Nearest land to a single point
//! - [`batch`] - Nearest land for a list of points
//! - [`common`] - Shared context, query options and output formatting

pub mod batch;
pub mod common;
pub mod distance;
pub mod providers;
pub mod setup;
