//! Core logic for the project board.
//! This crate owns the project store, the drag-and-drop protocol and the
//! view components; UI backends plug in through `RenderSink` and `InputSource`.

pub mod board;
pub mod config;
pub mod drag;
pub mod input;
pub mod logging;
pub mod model;
pub mod render;
pub mod state;
pub mod validation;

pub use board::{BoardController, ProjectInput, ProjectItem, ProjectList, SubmitError};
pub use config::{BoardConfig, ConfigError, FormRules};
pub use drag::payload::{DataTransfer, DragEvent, DragPayload, PayloadError, PROJECT_MOVE_FORMAT};
pub use drag::target::DropError;
pub use drag::{DragTarget, Draggable};
pub use input::{FormValues, InputSource, MemoryForm};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::project::{Project, ProjectId, ProjectStatus};
pub use render::memory::{ElementSnapshot, APP_ROOT_ID};
pub use render::{
    Component, DragEventKind, ElementHandle, MemoryRenderSink, RenderError, RenderSink,
};
pub use state::project_store::{MoveOutcome, ProjectStore};
pub use validation::{validate, Constraints, FieldValue, Validatable};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
