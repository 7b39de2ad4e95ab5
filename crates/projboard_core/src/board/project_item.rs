//! One project card; the drag source of the board.

use crate::drag::payload::DragEvent;
use crate::drag::source::{DragSource, DragSourceState};
use crate::drag::Draggable;
use crate::model::project::Project;
use crate::render::{
    attach, Component, DragEventKind, ElementHandle, EventHandler, InsertPosition, Mount,
    RenderResult, RenderSink,
};
use log::debug;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub const CARD_TEMPLATE_ID: &str = "single-project";

pub struct ProjectItem {
    project: Project,
    sink: Rc<dyn RenderSink>,
    element: ElementHandle,
    drag: RefCell<DragSource>,
    this: Weak<ProjectItem>,
}

impl ProjectItem {
    /// Appends a card for `project` to the element with id `host_id`.
    pub fn mount(
        sink: Rc<dyn RenderSink>,
        host_id: &str,
        project: Project,
    ) -> RenderResult<Rc<Self>> {
        let element_id = project.id.to_string();
        let element = attach(
            sink.as_ref(),
            &Mount {
                template_id: CARD_TEMPLATE_ID,
                host_id,
                position: InsertPosition::Append,
                element_id: Some(element_id.as_str()),
            },
        )?;

        let item = Rc::new_cyclic(|this| Self {
            drag: RefCell::new(DragSource::new(project.id)),
            project,
            sink,
            element,
            this: this.clone(),
        });
        item.configure()?;
        item.render_content()?;
        Ok(item)
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn element(&self) -> ElementHandle {
        self.element
    }

    pub fn drag_state(&self) -> DragSourceState {
        self.drag.borrow().state()
    }
}

impl Component for ProjectItem {
    fn configure(&self) -> RenderResult<()> {
        let this = self.this.clone();
        self.sink.add_event_listener(
            self.element,
            EventHandler::drag(DragEventKind::Start, move |event| {
                if let Some(item) = this.upgrade() {
                    item.drag_start_handler(event);
                }
            }),
        )?;
        let this = self.this.clone();
        self.sink.add_event_listener(
            self.element,
            EventHandler::drag(DragEventKind::End, move |event| {
                if let Some(item) = this.upgrade() {
                    item.drag_end_handler(event);
                }
            }),
        )
    }

    fn render_content(&self) -> RenderResult<()> {
        self.sink.set_text(self.element, "h2", &self.project.title)?;
        self.sink.set_text(
            self.element,
            "h3",
            &format!("{} assigned", self.project.people_label()),
        )?;
        self.sink
            .set_text(self.element, "p", &self.project.description)
    }
}

impl Draggable for ProjectItem {
    fn drag_start_handler(&self, event: &mut DragEvent) {
        if let Err(err) = self.drag.borrow_mut().start(event) {
            debug!(
                "event=drag_start module=board status=skip project_id={} reason={err}",
                self.project.id
            );
        }
    }

    fn drag_end_handler(&self, _event: &mut DragEvent) {
        self.drag.borrow_mut().end();
    }
}
