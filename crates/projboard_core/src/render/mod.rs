//! Render-sink contract and component composition.
//!
//! # Responsibility
//! - Define the operations the core needs from a template-based UI.
//! - Provide the shared `attach` step used by every component.
//!
//! # Invariants
//! - The core never builds markup itself; it only clones named templates and
//!   edits the clone's children by selector.
//! - Sink failures surface as `RenderError`, never as panics.

pub mod memory;

use crate::drag::payload::DragEvent;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

pub use memory::MemoryRenderSink;

pub type RenderResult<T> = Result<T, RenderError>;

/// Where a cloned template lands inside its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    /// First child of the host.
    Prepend,
    /// Last child of the host.
    Append,
}

/// Token a sink issues for one rendered fragment root.
///
/// `generation` tells apart successive elements stored in the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle {
    pub slot: usize,
    pub generation: u32,
}

impl Display for ElementHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}v{}", self.slot, self.generation)
    }
}

/// Drag phases a handler can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragEventKind {
    Start,
    End,
    Over,
    Leave,
    Drop,
}

/// Handler bound to an element; closures capture their owning component.
#[derive(Clone)]
pub enum EventHandler {
    Submit(Rc<dyn Fn()>),
    Drag(DragEventKind, Rc<dyn Fn(&mut DragEvent)>),
}

impl EventHandler {
    pub fn submit(handler: impl Fn() + 'static) -> Self {
        Self::Submit(Rc::new(handler))
    }

    pub fn drag(kind: DragEventKind, handler: impl Fn(&mut DragEvent) + 'static) -> Self {
        Self::Drag(kind, Rc::new(handler))
    }
}

impl Debug for EventHandler {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Submit(_) => f.write_str("EventHandler::Submit"),
            Self::Drag(kind, _) => write!(f, "EventHandler::Drag({kind:?})"),
        }
    }
}

/// Template/host/position triple consumed by `attach`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mount<'a> {
    pub template_id: &'a str,
    pub host_id: &'a str,
    pub position: InsertPosition,
    /// Id assigned to the fragment root after cloning.
    pub element_id: Option<&'a str>,
}

/// Operations a UI backend performs on behalf of the core.
///
/// Selectors are either `#id` or a tag name and match the first descendant
/// of the given element, depth first.
pub trait RenderSink {
    /// Clones template `template_id` into the element with id `host_id`.
    fn clone_template(
        &self,
        template_id: &str,
        host_id: &str,
        position: InsertPosition,
    ) -> RenderResult<ElementHandle>;

    fn set_element_id(&self, element: ElementHandle, id: &str) -> RenderResult<()>;

    fn set_text(&self, element: ElementHandle, selector: &str, text: &str) -> RenderResult<()>;

    fn set_child_id(&self, element: ElementHandle, selector: &str, id: &str) -> RenderResult<()>;

    fn add_class(&self, element: ElementHandle, selector: &str, class: &str) -> RenderResult<()>;

    fn remove_class(&self, element: ElementHandle, selector: &str, class: &str)
        -> RenderResult<()>;

    /// Removes every child of the element with id `element_id`.
    fn clear_children(&self, element_id: &str) -> RenderResult<()>;

    /// Registers `handler` on the fragment root; it lives as long as the element.
    fn add_event_listener(&self, element: ElementHandle, handler: EventHandler)
        -> RenderResult<()>;
}

/// Two-phase view contract: wire handlers, then fill static content.
pub trait Component {
    fn configure(&self) -> RenderResult<()>;
    fn render_content(&self) -> RenderResult<()>;
}

/// Clones the mount's template into its host and applies the element id.
pub fn attach(sink: &dyn RenderSink, mount: &Mount<'_>) -> RenderResult<ElementHandle> {
    let element = sink.clone_template(mount.template_id, mount.host_id, mount.position)?;
    if let Some(element_id) = mount.element_id {
        sink.set_element_id(element, element_id)?;
    }
    Ok(element)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    UnknownTemplate(String),
    UnknownHost(String),
    /// Handle no longer refers to an attached element.
    StaleElement(ElementHandle),
    NoMatch { selector: String },
}

impl Display for RenderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownTemplate(id) => write!(f, "template not found: {id}"),
            Self::UnknownHost(id) => write!(f, "host element not found: {id}"),
            Self::StaleElement(handle) => write!(f, "element handle is stale: {handle}"),
            Self::NoMatch { selector } => write!(f, "no element matches selector `{selector}`"),
        }
    }
}

impl Error for RenderError {}
