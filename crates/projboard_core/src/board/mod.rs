//! Board components and their controller.
//!
//! # Responsibility
//! - Render the input form, the two project lists and their cards through a
//!   `RenderSink`.
//! - Route form submits and drag events to `ProjectStore` operations.
//!
//! # Invariants
//! - Views never mutate store-owned data; they keep filtered copies.
//! - Every list re-renders from scratch on each store notification.
//! - Handlers hold `Weak` references to their component, so dropping the
//!   controller releases every view.

pub mod controller;
pub mod project_input;
pub mod project_item;
pub mod project_list;

pub use controller::BoardController;
pub use project_input::{ProjectInput, SubmitError, SubmitResult};
pub use project_item::ProjectItem;
pub use project_list::ProjectList;
