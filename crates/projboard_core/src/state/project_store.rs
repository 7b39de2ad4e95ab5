//! Project store with synchronous listener notification.
//!
//! # Responsibility
//! - Append new projects and change project status by id.
//! - Notify every registered listener after each accepted mutation.
//!
//! # Invariants
//! - Insertion order of projects and registration order of listeners are kept.
//! - A `move_project` that changes nothing never notifies.
//! - Each listener receives its own copy of the full project sequence.
//! - Notification runs on the caller's stack before the mutator returns.

use crate::model::project::{Project, ProjectId, ProjectStatus};
use log::{debug, info};
use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// Callback registered by a view; receives a snapshot per mutation.
pub type Listener = Rc<dyn Fn(Vec<Project>)>;

/// Result of a status change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Status changed and listeners were notified.
    Moved,
    /// Project already had the requested status.
    Unchanged,
    /// No project with the given id.
    NotFound,
}

/// Single owner of the board's projects.
///
/// Constructed once by the application root and shared with views through
/// `Rc<ProjectStore>`. All methods take `&self`; borrows never outlive a
/// method call, so listeners may call back into the store.
#[derive(Default)]
pub struct ProjectStore {
    projects: RefCell<Vec<Project>>,
    listeners: RefCell<Vec<Listener>>,
}

impl ProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener. Existing state is not replayed and duplicate
    /// registrations are kept.
    pub fn subscribe(&self, listener: impl Fn(Vec<Project>) + 'static) {
        let mut listeners = self.listeners.borrow_mut();
        listeners.push(Rc::new(listener));
        debug!(
            "event=listener_subscribed module=store status=ok listeners={}",
            listeners.len()
        );
    }

    /// Appends a new `Active` project and notifies listeners.
    ///
    /// Callers validate input beforehand; this never fails.
    pub fn add_project(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
        people_count: u32,
    ) -> ProjectId {
        let id = {
            let mut projects = self.projects.borrow_mut();
            let mut id = ProjectId::generate();
            while projects.iter().any(|project| project.id == id) {
                id = ProjectId::generate();
            }
            projects.push(Project::with_id(id, title, description, people_count));
            id
        };
        info!("event=project_added module=store status=ok project_id={id}");
        self.notify();
        id
    }

    /// Sets the status of the project with `project_id`.
    ///
    /// Unknown ids and same-status requests are silent no-ops.
    pub fn move_project(&self, project_id: ProjectId, new_status: ProjectStatus) -> MoveOutcome {
        let outcome = {
            let mut projects = self.projects.borrow_mut();
            match projects.iter_mut().find(|project| project.id == project_id) {
                None => MoveOutcome::NotFound,
                Some(project) if project.status == new_status => MoveOutcome::Unchanged,
                Some(project) => {
                    project.status = new_status;
                    MoveOutcome::Moved
                }
            }
        };

        match outcome {
            MoveOutcome::Moved => {
                info!(
                    "event=project_moved module=store status=ok project_id={project_id} to={new_status}"
                );
                self.notify();
            }
            MoveOutcome::Unchanged => debug!(
                "event=project_moved module=store status=skip reason=same_status project_id={project_id}"
            ),
            MoveOutcome::NotFound => debug!(
                "event=project_moved module=store status=skip reason=not_found project_id={project_id}"
            ),
        }
        outcome
    }

    /// Returns a copy of all projects in insertion order.
    pub fn snapshot(&self) -> Vec<Project> {
        self.projects.borrow().clone()
    }

    pub fn get(&self, project_id: ProjectId) -> Option<Project> {
        self.projects
            .borrow()
            .iter()
            .find(|project| project.id == project_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.projects.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.borrow().is_empty()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn notify(&self) {
        // Listeners may subscribe or mutate while being notified.
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        for listener in listeners {
            let copy = self.snapshot();
            listener(copy);
        }
    }
}

impl Debug for ProjectStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectStore")
            .field("projects", &self.projects.borrow().len())
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}
