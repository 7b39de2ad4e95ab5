//! Project input form.
//!
//! # Responsibility
//! - Read the three form fields on submit and validate them.
//! - Add a project for valid input; alert and keep the fields otherwise.
//!
//! # Invariants
//! - Invalid input never reaches `ProjectStore::add_project`.
//! - Fields are cleared only after a successful add.

use crate::config::FormRules;
use crate::input::{FormValues, InputSource};
use crate::model::project::ProjectId;
use crate::render::memory::APP_ROOT_ID;
use crate::render::{
    attach, Component, ElementHandle, EventHandler, InsertPosition, Mount, RenderResult,
    RenderSink,
};
use crate::state::project_store::ProjectStore;
use crate::validation::{validate_all, Validatable};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::{Rc, Weak};

pub const FORM_TEMPLATE_ID: &str = "project-input";
pub const FORM_ELEMENT_ID: &str = "user-input";
/// Alert shown for any rejected submit.
pub const INVALID_INPUT_ALERT: &str = "Invalid input";

pub type SubmitResult<T> = Result<T, SubmitError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// Named fields failed their constraints.
    InvalidInput { fields: Vec<&'static str> },
}

impl Display for SubmitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { fields } => {
                write!(f, "{INVALID_INPUT_ALERT}: {}", fields.join(", "))
            }
        }
    }
}

impl Error for SubmitError {}

/// Validated submit payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub people_count: u32,
}

pub struct ProjectInput {
    store: Rc<ProjectStore>,
    sink: Rc<dyn RenderSink>,
    input: Rc<dyn InputSource>,
    rules: FormRules,
    element: ElementHandle,
    this: Weak<ProjectInput>,
}

impl ProjectInput {
    /// Prepends the form to the app root and wires its submit handler.
    pub fn mount(
        store: Rc<ProjectStore>,
        sink: Rc<dyn RenderSink>,
        input: Rc<dyn InputSource>,
        rules: FormRules,
    ) -> RenderResult<Rc<Self>> {
        let element = attach(
            sink.as_ref(),
            &Mount {
                template_id: FORM_TEMPLATE_ID,
                host_id: APP_ROOT_ID,
                position: InsertPosition::Prepend,
                element_id: Some(FORM_ELEMENT_ID),
            },
        )?;

        let form = Rc::new_cyclic(|this| Self {
            store,
            sink,
            input,
            rules,
            element,
            this: this.clone(),
        });
        form.configure()?;
        form.render_content()?;
        Ok(form)
    }

    /// Handles one submit: validate, add, clear.
    pub fn submit_handler(&self) -> SubmitResult<ProjectId> {
        let values = self.input.read_fields();
        let project = match self.gather_user_input(&values) {
            Ok(project) => project,
            Err(err) => {
                debug!("event=submit module=board status=rejected reason={err}");
                self.input.alert(INVALID_INPUT_ALERT);
                return Err(err);
            }
        };

        let id = self
            .store
            .add_project(project.title, project.description, project.people_count);
        self.input.clear_fields();
        info!("event=submit module=board status=ok project_id={id}");
        Ok(id)
    }

    /// Validates raw values against the configured rules.
    pub fn gather_user_input(&self, values: &FormValues) -> SubmitResult<NewProject> {
        let entries = [
            Validatable::new("title", values.title.as_str(), self.rules.title.clone()),
            Validatable::new(
                "description",
                values.description.as_str(),
                self.rules.description.clone(),
            ),
            Validatable::new("people", values.people.as_str(), self.rules.people.clone()),
        ];
        let mut failed = validate_all(&entries);

        // Headcount is stored as a whole number; "2.5" passes the range rule
        // but is still rejected here.
        let people_count = values.people.trim().parse::<u32>().ok();
        if people_count.is_none() && !failed.contains(&"people") {
            failed.push("people");
        }

        match people_count {
            Some(people_count) if failed.is_empty() => Ok(NewProject {
                title: values.title.clone(),
                description: values.description.clone(),
                people_count,
            }),
            _ => Err(SubmitError::InvalidInput { fields: failed }),
        }
    }
}

impl Component for ProjectInput {
    fn configure(&self) -> RenderResult<()> {
        let this = self.this.clone();
        self.sink.add_event_listener(
            self.element,
            EventHandler::submit(move || {
                if let Some(form) = this.upgrade() {
                    // Rejections were already alerted and logged.
                    form.submit_handler().ok();
                }
            }),
        )
    }

    fn render_content(&self) -> RenderResult<()> {
        Ok(())
    }
}
