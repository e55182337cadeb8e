//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into agenda use-cases.
//! - Turn repository failures into logged notifications and typed errors.
//! - Keep presentation decoupled from storage details.

pub mod catalog_service;
pub mod membership_service;
