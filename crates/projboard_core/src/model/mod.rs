//! Board domain model.
//!
//! # Responsibility
//! - Define the canonical project record shared by both list projections.
//!
//! # Invariants
//! - Every project is identified by a stable `ProjectId`.
//! - Projects are never removed; only their status changes.

pub mod project;
