//! Canonical in-memory board state.
//!
//! # Responsibility
//! - Own the project collection and its change notification fan-out.
//!
//! # Invariants
//! - Only `ProjectStore` methods mutate the collection.
//! - Listeners only ever see copies of the collection.

pub mod project_store;
