//! One status list ("Active" or "Finished"); the drop target of the board.
//!
//! # Invariants
//! - `assigned` always equals the store's projects whose status is `kind`,
//!   in store order, as of the latest notification.
//! - Cards are rebuilt wholesale from `assigned`; none survive a rebuild.

use crate::board::project_item::ProjectItem;
use crate::drag::payload::DragEvent;
use crate::drag::target::{DropTargetState, DropZone};
use crate::drag::DragTarget;
use crate::model::project::{Project, ProjectId, ProjectStatus};
use crate::render::memory::APP_ROOT_ID;
use crate::render::{
    attach, Component, DragEventKind, ElementHandle, EventHandler, InsertPosition, Mount,
    RenderResult, RenderSink,
};
use crate::state::project_store::{MoveOutcome, ProjectStore};
use log::{debug, warn};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub const LIST_TEMPLATE_ID: &str = "project-list";
/// Class marking a list as a valid drop target while hovered.
pub const DROPPABLE_CLASS: &str = "droppable";

pub struct ProjectList {
    kind: ProjectStatus,
    store: Rc<ProjectStore>,
    sink: Rc<dyn RenderSink>,
    element: ElementHandle,
    assigned: RefCell<Vec<Project>>,
    items: RefCell<Vec<Rc<ProjectItem>>>,
    zone: RefCell<DropZone>,
    this: Weak<ProjectList>,
}

impl ProjectList {
    /// Appends the list section for `kind` to the app root and subscribes it
    /// to `store`.
    pub fn mount(
        kind: ProjectStatus,
        store: Rc<ProjectStore>,
        sink: Rc<dyn RenderSink>,
    ) -> RenderResult<Rc<Self>> {
        let element_id = format!("{}-projects", kind.as_str());
        let element = attach(
            sink.as_ref(),
            &Mount {
                template_id: LIST_TEMPLATE_ID,
                host_id: APP_ROOT_ID,
                position: InsertPosition::Append,
                element_id: Some(element_id.as_str()),
            },
        )?;

        let list = Rc::new_cyclic(|this| Self {
            kind,
            store,
            sink,
            element,
            assigned: RefCell::new(Vec::new()),
            items: RefCell::new(Vec::new()),
            zone: RefCell::new(DropZone::new(kind)),
            this: this.clone(),
        });
        list.configure()?;
        list.render_content()?;
        Ok(list)
    }

    pub fn kind(&self) -> ProjectStatus {
        self.kind
    }

    /// Id of the list section, e.g. `active-projects`.
    pub fn element_id(&self) -> String {
        format!("{}-projects", self.kind.as_str())
    }

    /// Id of the inner card container, e.g. `active-projects-list`.
    pub fn list_id(&self) -> String {
        format!("{}-projects-list", self.kind.as_str())
    }

    /// Copy of the filtered cache.
    pub fn assigned_projects(&self) -> Vec<Project> {
        self.assigned.borrow().clone()
    }

    pub fn card(&self, project_id: ProjectId) -> Option<Rc<ProjectItem>> {
        self.items
            .borrow()
            .iter()
            .find(|item| item.project().id == project_id)
            .cloned()
    }

    pub fn drop_state(&self) -> DropTargetState {
        self.zone.borrow().state()
    }

    /// Replaces the cache with this list's subset of `projects` and rebuilds
    /// every card.
    pub fn apply_snapshot(&self, projects: Vec<Project>) -> RenderResult<()> {
        let relevant: Vec<Project> = projects
            .into_iter()
            .filter(|project| project.status == self.kind)
            .collect();
        *self.assigned.borrow_mut() = relevant;
        self.render_projects()
    }

    fn render_projects(&self) -> RenderResult<()> {
        let list_id = self.list_id();
        self.items.borrow_mut().clear();
        self.sink.clear_children(&list_id)?;

        let assigned = self.assigned_projects();
        let mut items = Vec::with_capacity(assigned.len());
        for project in assigned {
            items.push(ProjectItem::mount(Rc::clone(&self.sink), &list_id, project)?);
        }
        debug!(
            "event=list_rendered module=board status=ok kind={} cards={}",
            self.kind,
            items.len()
        );
        *self.items.borrow_mut() = items;
        Ok(())
    }

    fn set_marker(&self, on: bool) {
        let result = if on {
            self.sink.add_class(self.element, "ul", DROPPABLE_CLASS)
        } else {
            self.sink.remove_class(self.element, "ul", DROPPABLE_CLASS)
        };
        if let Err(err) = result {
            warn!(
                "event=drop_marker module=board status=error kind={} error={err}",
                self.kind
            );
        }
    }

    fn register(
        &self,
        kind: DragEventKind,
        handler: fn(&ProjectList, &mut DragEvent),
    ) -> RenderResult<()> {
        let this = self.this.clone();
        self.sink.add_event_listener(
            self.element,
            EventHandler::drag(kind, move |event| {
                if let Some(list) = this.upgrade() {
                    handler(&list, event);
                }
            }),
        )
    }
}

impl Component for ProjectList {
    fn configure(&self) -> RenderResult<()> {
        self.register(DragEventKind::Over, |list, event| {
            list.drag_over_handler(event);
        })?;
        self.register(DragEventKind::Leave, |list, event| {
            list.drag_leave_handler(event);
        })?;
        self.register(DragEventKind::Drop, |list, event| {
            list.drop_handler(event);
        })?;

        let this = self.this.clone();
        self.store.subscribe(move |projects| {
            let Some(list) = this.upgrade() else {
                return;
            };
            if let Err(err) = list.apply_snapshot(projects) {
                warn!(
                    "event=list_rendered module=board status=error kind={} error={err}",
                    list.kind
                );
            }
        });
        Ok(())
    }

    fn render_content(&self) -> RenderResult<()> {
        self.sink.set_child_id(self.element, "ul", &self.list_id())?;
        self.sink.set_text(
            self.element,
            "h2",
            &format!("{} PROJECTS", self.kind.as_str().to_uppercase()),
        )
    }
}

impl DragTarget for ProjectList {
    fn drag_over_handler(&self, event: &mut DragEvent) -> bool {
        let accepted = self.zone.borrow_mut().over(event);
        if accepted {
            self.set_marker(true);
        }
        accepted
    }

    fn drop_handler(&self, event: &mut DragEvent) -> Option<MoveOutcome> {
        let result = self.zone.borrow_mut().drop(event, &self.store);
        self.set_marker(false);
        match result {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                debug!(
                    "event=drop module=board status=skip kind={} reason={err}",
                    self.kind
                );
                None
            }
        }
    }

    fn drag_leave_handler(&self, _event: &mut DragEvent) {
        self.zone.borrow_mut().leave();
        self.set_marker(false);
    }
}
