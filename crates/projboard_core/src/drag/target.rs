//! Drop-target state machine embedded in each list view.

use crate::drag::payload::{accepts_project_move, DragEvent, DragPayload, PayloadError};
use crate::model::project::ProjectStatus;
use crate::state::project_store::{MoveOutcome, ProjectStore};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropTargetState {
    #[default]
    NotHovering,
    Hovering,
}

/// Drop handling for one list; dropped projects take the list's `kind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropZone {
    kind: ProjectStatus,
    state: DropTargetState,
}

impl DropZone {
    pub fn new(kind: ProjectStatus) -> Self {
        Self {
            kind,
            state: DropTargetState::NotHovering,
        }
    }

    pub fn kind(&self) -> ProjectStatus {
        self.kind
    }

    pub fn state(&self) -> DropTargetState {
        self.state
    }

    /// NotHovering -> Hovering when the first declared format is the
    /// project-move format; suppresses the platform default in that case.
    /// Other payloads leave the event and the state untouched.
    pub fn over(&mut self, event: &mut DragEvent) -> bool {
        if !accepts_project_move(event.data_transfer.as_ref()) {
            return false;
        }
        event.prevent_default();
        self.state = DropTargetState::Hovering;
        true
    }

    /// Hovering -> NotHovering. Returns whether the zone was hovering.
    pub fn leave(&mut self) -> bool {
        let was_hovering = self.state == DropTargetState::Hovering;
        self.state = DropTargetState::NotHovering;
        was_hovering
    }

    /// Reads the dropped id and moves that project to this zone's kind.
    ///
    /// Only a zone left `Hovering` by an accepted drag-over takes the drop.
    /// Same-list drops still reach the store, which treats them as no-ops.
    pub fn drop(
        &mut self,
        event: &mut DragEvent,
        store: &ProjectStore,
    ) -> Result<MoveOutcome, DropError> {
        let was_hovering = self.state == DropTargetState::Hovering;
        self.state = DropTargetState::NotHovering;
        if !was_hovering {
            return Err(DropError::NotHovering);
        }
        event.prevent_default();
        let transfer = event
            .data_transfer
            .as_ref()
            .ok_or(PayloadError::MissingTransfer)?;
        let payload = DragPayload::read_from(transfer)?;
        let outcome = store.move_project(payload.project_id(), self.kind);
        debug!(
            "event=drop module=drag status=ok kind={} project_id={} outcome={outcome:?}",
            self.kind,
            payload.project_id()
        );
        Ok(outcome)
    }
}

#[derive(Debug)]
pub enum DropError {
    /// No accepted drag-over preceded the drop.
    NotHovering,
    Payload(PayloadError),
}

impl Display for DropError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotHovering => write!(f, "drop without an accepted drag-over"),
            Self::Payload(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DropError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotHovering => None,
            Self::Payload(err) => Some(err),
        }
    }
}

impl From<PayloadError> for DropError {
    fn from(err: PayloadError) -> Self {
        Self::Payload(err)
    }
}

#[cfg(test)]
mod tests {
    use super::{DropError, DropTargetState, DropZone};
    use crate::drag::payload::{
        DataTransfer, DragEvent, DragPayload, PayloadError, PROJECT_MOVE_FORMAT,
    };
    use crate::model::project::ProjectStatus;
    use crate::state::project_store::{MoveOutcome, ProjectStore};

    fn payload_event(project_id: crate::model::project::ProjectId) -> DragEvent {
        let mut transfer = DataTransfer::new();
        DragPayload::project_move(project_id)
            .write_to(&mut transfer)
            .expect("encode");
        DragEvent::with_transfer(transfer)
    }

    #[test]
    fn over_accepts_project_move_payload() {
        let store = ProjectStore::new();
        let id = store.add_project("Build API", "Write REST endpoints", 3);
        let mut zone = DropZone::new(ProjectStatus::Finished);
        let mut event = payload_event(id);

        assert!(zone.over(&mut event));
        assert!(event.default_prevented());
        assert_eq!(zone.state(), DropTargetState::Hovering);

        assert!(zone.leave());
        assert_eq!(zone.state(), DropTargetState::NotHovering);
        assert!(!zone.leave());
    }

    #[test]
    fn over_ignores_foreign_payload() {
        let mut zone = DropZone::new(ProjectStatus::Finished);
        let mut transfer = DataTransfer::new();
        transfer.set_data("text/html", "<b>hi</b>");
        let mut event = DragEvent::with_transfer(transfer);

        assert!(!zone.over(&mut event));
        assert!(!event.default_prevented());
        assert_eq!(zone.state(), DropTargetState::NotHovering);

        let mut bare = DragEvent::without_transfer();
        assert!(!zone.over(&mut bare));
    }

    #[test]
    fn drop_moves_project_to_zone_kind() {
        let store = ProjectStore::new();
        let id = store.add_project("Build API", "Write REST endpoints", 3);
        let mut zone = DropZone::new(ProjectStatus::Finished);
        let mut event = payload_event(id);

        zone.over(&mut event);
        let outcome = zone.drop(&mut event, &store).expect("drop");
        assert_eq!(outcome, MoveOutcome::Moved);
        assert_eq!(zone.state(), DropTargetState::NotHovering);
        assert_eq!(store.get(id).expect("project").status, ProjectStatus::Finished);
    }

    #[test]
    fn drop_on_own_list_is_a_store_no_op() {
        let store = ProjectStore::new();
        let id = store.add_project("Build API", "Write REST endpoints", 3);
        let mut zone = DropZone::new(ProjectStatus::Active);
        let mut event = payload_event(id);
        zone.over(&mut event);
        let outcome = zone.drop(&mut event, &store).expect("drop");
        assert_eq!(outcome, MoveOutcome::Unchanged);
    }

    #[test]
    fn drop_without_accepted_hover_is_refused() {
        let store = ProjectStore::new();
        let id = store.add_project("Build API", "Write REST endpoints", 3);
        let mut zone = DropZone::new(ProjectStatus::Finished);
        let mut event = payload_event(id);

        let err = zone.drop(&mut event, &store).expect_err("no hover");
        assert!(matches!(err, DropError::NotHovering));
        assert!(!event.default_prevented());
        assert_eq!(store.get(id).expect("project").status, ProjectStatus::Active);

        zone.over(&mut event);
        zone.leave();
        assert!(matches!(
            zone.drop(&mut event, &store),
            Err(DropError::NotHovering)
        ));
    }

    #[test]
    fn drop_with_malformed_payload_is_rejected() {
        let store = ProjectStore::new();
        let mut zone = DropZone::new(ProjectStatus::Active);
        let mut transfer = DataTransfer::new();
        transfer.set_data(PROJECT_MOVE_FORMAT, "{}");
        let mut event = DragEvent::with_transfer(transfer);

        assert!(zone.over(&mut event));
        let err = zone.drop(&mut event, &store).expect_err("bad payload");
        assert!(matches!(err, DropError::Payload(PayloadError::Malformed(_))));
        assert_eq!(zone.state(), DropTargetState::NotHovering);
    }
}
