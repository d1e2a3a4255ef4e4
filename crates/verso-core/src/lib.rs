//! Core library for the verso local version-control engine.
//!
//! verso tracks files in a working directory, snapshots them into
//! **versions** grouped under named **groups**, keeps their content in a
//! compressed, content-addressed object store, and diffs any two recorded
//! snapshots of a file.

pub mod compress;
pub mod config;
pub mod diff;
pub mod error;
pub mod fsutil;
pub mod hash;
pub mod history;
pub mod object;
pub mod repo;
pub mod tracker;
pub mod walk;

pub use config::Config;
pub use error::{ErrorKind, VersoError, VersoResult};
pub use repo::Repository;
