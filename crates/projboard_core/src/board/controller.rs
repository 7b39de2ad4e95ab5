//! Board controller: owns the form and the two status lists.
//!
//! # Responsibility
//! - Mount the form and both lists against an injected store and sink.
//! - Give the event loop typed access to every mounted component.
//!
//! # Invariants
//! - The store is the one passed in; the controller never creates its own.
//! - Mount order is form (prepended), Active list, Finished list.

use crate::board::project_input::ProjectInput;
use crate::board::project_item::ProjectItem;
use crate::board::project_list::ProjectList;
use crate::config::FormRules;
use crate::input::InputSource;
use crate::model::project::{ProjectId, ProjectStatus};
use crate::render::{RenderResult, RenderSink};
use crate::state::project_store::ProjectStore;
use log::info;
use std::rc::Rc;

pub struct BoardController {
    store: Rc<ProjectStore>,
    form: Rc<ProjectInput>,
    active: Rc<ProjectList>,
    finished: Rc<ProjectList>,
}

impl BoardController {
    pub fn mount(
        store: Rc<ProjectStore>,
        sink: Rc<dyn RenderSink>,
        input: Rc<dyn InputSource>,
        rules: FormRules,
    ) -> RenderResult<Self> {
        let form = ProjectInput::mount(Rc::clone(&store), Rc::clone(&sink), input, rules)?;
        let active = ProjectList::mount(ProjectStatus::Active, Rc::clone(&store), Rc::clone(&sink))?;
        let finished = ProjectList::mount(ProjectStatus::Finished, Rc::clone(&store), sink)?;

        // Lists subscribe at mount; render whatever the store already holds.
        let existing = store.snapshot();
        if !existing.is_empty() {
            active.apply_snapshot(existing.clone())?;
            finished.apply_snapshot(existing)?;
        }

        info!(
            "event=board_mounted module=board status=ok projects={} listeners={}",
            store.len(),
            store.listener_count()
        );
        Ok(Self {
            store,
            form,
            active,
            finished,
        })
    }

    pub fn store(&self) -> &Rc<ProjectStore> {
        &self.store
    }

    pub fn form(&self) -> &Rc<ProjectInput> {
        &self.form
    }

    pub fn list(&self, kind: ProjectStatus) -> &Rc<ProjectList> {
        match kind {
            ProjectStatus::Active => &self.active,
            ProjectStatus::Finished => &self.finished,
        }
    }

    /// Card currently rendered for `project_id`, in whichever list holds it.
    pub fn card(&self, project_id: ProjectId) -> Option<Rc<ProjectItem>> {
        self.active
            .card(project_id)
            .or_else(|| self.finished.card(project_id))
    }

    /// Resolves a full id or a unique id prefix against the store.
    pub fn resolve_id(&self, needle: &str) -> Option<ProjectId> {
        if let Ok(id) = needle.parse::<ProjectId>() {
            return Some(id);
        }
        let needle = needle.trim();
        if needle.is_empty() {
            return None;
        }
        let mut matches = self
            .store
            .snapshot()
            .into_iter()
            .filter(|project| project.id.to_string().starts_with(needle));
        match (matches.next(), matches.next()) {
            (Some(project), None) => Some(project.id),
            _ => None,
        }
    }
}
