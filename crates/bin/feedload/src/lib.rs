//! # feedload
//!
//! Composition root shared by the four binaries:
//!
//! | Binary | Purpose |
//! |--------|---------|
//! | `feedload` | steady-rate comment and like write load |
//! | `feedload-schema` | create the keyspace and tables |
//! | `feedload-seed` | write synthetic users, posts, comments and likes |
//! | `feedload-analyze` | print a report of what was written |
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

pub mod cli;
pub mod config;
pub mod logging;
pub mod signal;
