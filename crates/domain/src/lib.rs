//! # feedload-domain
//!
//! Pure domain model for the feedload write-load harness.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **user references** (identifiers plus the denormalized fields
//!   copied into activity rows)
//! - Define **activity events** (comments and likes)
//! - Define **projections** (the table rows an event is written to) and the
//!   **writes** that carry them (LOGGED batches, counter increments)
//! - Define **fixtures** (full user and post records written by the seeder)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod activity;
pub mod fixture;
pub mod projection;
pub mod user;
