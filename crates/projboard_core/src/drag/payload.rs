//! Drag event and transfer payload types.
//!
//! # Responsibility
//! - Model the platform drag event and its data-transfer channel.
//! - Encode/decode the tagged project-move payload carried by that channel.
//!
//! # Invariants
//! - A project-move payload is always stored under `PROJECT_MOVE_FORMAT`.
//! - Decoding validates format, `kind` tag and id before yielding a payload.

use crate::model::project::ProjectId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Transfer format under which project-move payloads are stored.
pub const PROJECT_MOVE_FORMAT: &str = "application/x-projboard-move";

/// Operations a drag source allows the drop target to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropEffect {
    #[default]
    None,
    Move,
}

/// Ordered format/data entries attached to one drag sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTransfer {
    entries: Vec<(String, String)>,
    pub effect_allowed: DropEffect,
}

impl DataTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `data` under `format`, replacing any previous value for it.
    pub fn set_data(&mut self, format: &str, data: impl Into<String>) {
        let data = data.into();
        if let Some(entry) = self.entries.iter_mut().find(|(existing, _)| existing == format) {
            entry.1 = data;
        } else {
            self.entries.push((format.to_string(), data));
        }
    }

    pub fn get_data(&self, format: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == format)
            .map(|(_, data)| data.as_str())
    }

    /// Declared formats in insertion order.
    pub fn types(&self) -> Vec<&str> {
        self.entries.iter().map(|(format, _)| format.as_str()).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// One drag event as delivered to a source or target handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragEvent {
    pub data_transfer: Option<DataTransfer>,
    default_prevented: bool,
}

impl DragEvent {
    /// Event carrying an empty transfer channel, as at drag start.
    pub fn new() -> Self {
        Self {
            data_transfer: Some(DataTransfer::new()),
            default_prevented: false,
        }
    }

    /// Event with no transfer channel at all.
    pub fn without_transfer() -> Self {
        Self::default()
    }

    pub fn with_transfer(data_transfer: DataTransfer) -> Self {
        Self {
            data_transfer: Some(data_transfer),
            default_prevented: false,
        }
    }

    /// Marks the platform default as suppressed; for drag-over this is what
    /// turns the receiver into a valid drop target.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Clears the per-dispatch flag so one event value can be redelivered
    /// for the next step of the drag sequence.
    pub fn reset_default(&mut self) {
        self.default_prevented = false;
    }
}

/// Tagged payload moved through the transfer channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DragPayload {
    ProjectMove { project_id: ProjectId },
}

impl DragPayload {
    pub fn project_move(project_id: ProjectId) -> Self {
        Self::ProjectMove { project_id }
    }

    pub fn project_id(&self) -> ProjectId {
        match self {
            Self::ProjectMove { project_id } => *project_id,
        }
    }

    /// Writes this payload into `transfer` and allows a move.
    pub fn write_to(&self, transfer: &mut DataTransfer) -> Result<(), PayloadError> {
        let encoded = serde_json::to_string(self).map_err(PayloadError::Encode)?;
        transfer.set_data(PROJECT_MOVE_FORMAT, encoded);
        transfer.effect_allowed = DropEffect::Move;
        Ok(())
    }

    /// Reads a payload from `transfer`, validating it at the boundary.
    pub fn read_from(transfer: &DataTransfer) -> Result<Self, PayloadError> {
        let raw = transfer
            .get_data(PROJECT_MOVE_FORMAT)
            .ok_or(PayloadError::MissingFormat)?;
        serde_json::from_str(raw).map_err(PayloadError::Malformed)
    }
}

/// Whether `transfer` announces a project-move payload as its first format.
pub fn accepts_project_move(transfer: Option<&DataTransfer>) -> bool {
    transfer
        .and_then(|transfer| transfer.types().first().copied())
        .is_some_and(|format| format == PROJECT_MOVE_FORMAT)
}

/// Payload encode/decode failures.
#[derive(Debug)]
pub enum PayloadError {
    /// Event has no transfer channel.
    MissingTransfer,
    /// Transfer channel has no project-move entry.
    MissingFormat,
    /// Entry exists but is not a valid tagged payload.
    Malformed(serde_json::Error),
    Encode(serde_json::Error),
}

impl Display for PayloadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTransfer => write!(f, "drag event has no data transfer"),
            Self::MissingFormat => write!(f, "no `{PROJECT_MOVE_FORMAT}` entry in data transfer"),
            Self::Malformed(err) => write!(f, "malformed drag payload: {err}"),
            Self::Encode(err) => write!(f, "failed to encode drag payload: {err}"),
        }
    }
}

impl Error for PayloadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(err) | Self::Encode(err) => Some(err),
            Self::MissingTransfer | Self::MissingFormat => None,
        }
    }
}
