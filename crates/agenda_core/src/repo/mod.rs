//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the catalog/membership data contract consumed by services.
//! - Isolate SQLite query details from view derivation and toggling.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `Conflict`) in
//!   addition to storage transport errors.

pub mod attraction_repo;
