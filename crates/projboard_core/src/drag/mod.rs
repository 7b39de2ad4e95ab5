//! Drag-and-drop protocol between project cards and list views.
//!
//! # Responsibility
//! - Define the drag-source and drop-target handler contracts.
//! - Provide the per-card and per-list state machines views embed.
//!
//! # Invariants
//! - A drag source always returns to `Idle` on drag-end, dropped or not.
//! - A drop target only becomes `Hovering` for a project-move payload, and
//!   only takes a drop while `Hovering`.
//! - Status changes from a drop go through `ProjectStore::move_project`.

pub mod payload;
pub mod source;
pub mod target;

use crate::state::project_store::MoveOutcome;
pub use payload::DragEvent;

/// Handlers a draggable card exposes to the event loop.
pub trait Draggable {
    /// Attaches the card's payload to the event.
    fn drag_start_handler(&self, event: &mut DragEvent);
    /// Ends the drag sequence; fires whether or not a drop happened.
    fn drag_end_handler(&self, event: &mut DragEvent);
}

/// Handlers a list view exposes to the event loop.
pub trait DragTarget {
    /// Returns `true` when the list accepted the hover as a valid target.
    fn drag_over_handler(&self, event: &mut DragEvent) -> bool;
    /// Applies the dropped payload; `None` when it was unusable or no
    /// accepted hover preceded the drop.
    fn drop_handler(&self, event: &mut DragEvent) -> Option<MoveOutcome>;
    fn drag_leave_handler(&self, event: &mut DragEvent);
}
