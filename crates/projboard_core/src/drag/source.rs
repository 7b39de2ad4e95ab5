//! Drag-source state machine embedded in each project card.

use crate::drag::payload::{DragEvent, DragPayload, PayloadError};
use crate::model::project::ProjectId;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragSourceState {
    #[default]
    Idle,
    Dragging,
}

/// Tracks one card's participation in a drag sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSource {
    project_id: ProjectId,
    state: DragSourceState,
}

impl DragSource {
    pub fn new(project_id: ProjectId) -> Self {
        Self {
            project_id,
            state: DragSourceState::Idle,
        }
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    pub fn state(&self) -> DragSourceState {
        self.state
    }

    /// Idle -> Dragging. Writes the project-move payload as the event's
    /// transferred data, tagged as a move.
    pub fn start(&mut self, event: &mut DragEvent) -> Result<(), PayloadError> {
        let transfer = event
            .data_transfer
            .as_mut()
            .ok_or(PayloadError::MissingTransfer)?;
        transfer.clear();
        DragPayload::project_move(self.project_id).write_to(transfer)?;
        self.state = DragSourceState::Dragging;
        debug!(
            "event=drag_start module=drag status=ok project_id={}",
            self.project_id
        );
        Ok(())
    }

    /// Any state -> Idle.
    pub fn end(&mut self) {
        if self.state == DragSourceState::Dragging {
            debug!(
                "event=drag_end module=drag status=ok project_id={}",
                self.project_id
            );
        }
        self.state = DragSourceState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::{DragSource, DragSourceState};
    use crate::drag::payload::{DragEvent, DragPayload, PayloadError};
    use crate::model::project::ProjectId;

    #[test]
    fn start_writes_payload_and_end_returns_to_idle() {
        let id = ProjectId::generate();
        let mut source = DragSource::new(id);
        let mut event = DragEvent::new();

        source.start(&mut event).expect("drag start");
        assert_eq!(source.state(), DragSourceState::Dragging);
        let transfer = event.data_transfer.as_ref().expect("transfer");
        let payload = DragPayload::read_from(transfer).expect("payload");
        assert_eq!(payload.project_id(), id);
        assert_eq!(transfer.types().len(), 1);

        source.end();
        assert_eq!(source.state(), DragSourceState::Idle);
    }

    #[test]
    fn start_without_transfer_stays_idle() {
        let mut source = DragSource::new(ProjectId::generate());
        let mut event = DragEvent::without_transfer();
        let err = source.start(&mut event).expect_err("no transfer channel");
        assert!(matches!(err, PayloadError::MissingTransfer));
        assert_eq!(source.state(), DragSourceState::Idle);
    }

    #[test]
    fn end_is_unconditional() {
        let mut source = DragSource::new(ProjectId::generate());
        source.end();
        assert_eq!(source.state(), DragSourceState::Idle);
    }
}
