//! Pure view derivation over catalog and membership data.
//!
//! # Responsibility
//! - Derive the Browse view (filtered flat list) from the catalog.
//! - Derive the Agenda view (date-grouped, time-sorted list) from entries.
//!
//! # Invariants
//! - Every function here is pure: same inputs, same output, no I/O.
//! - Neither view contains the same attraction id twice.

pub mod agenda;
pub mod browse;
