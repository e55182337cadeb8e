//! Conference domain model.
//!
//! # Responsibility
//! - Define the attraction catalog record and the per-user membership link.
//! - Provide the explicit join record used by agenda derivation.
//!
//! # Invariants
//! - Attractions are read-only for core logic; only memberships are written.
//! - Every domain object is identified by a stable opaque id.

pub mod attraction;
pub mod membership;
pub mod user;
