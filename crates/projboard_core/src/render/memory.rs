//! In-memory render sink.
//!
//! # Responsibility
//! - Keep a minimal element tree (tag, id, text, classes, children).
//! - Clone registered templates into it and answer read queries for
//!   front ends and tests.
//!
//! # Invariants
//! - Detached elements are unreachable from the root and their handles
//!   report `RenderError::StaleElement`, even after their slot is reused.
//! - Id lookups only consider attached elements.
//! - Dispatch bubbles from the target element up to the root, running
//!   matching handlers nearest first.
//! - Drag-end reaches the handlers that saw the last drag-start, even when
//!   that element was detached in between.

use crate::drag::payload::DragEvent;
use crate::render::{
    DragEventKind, ElementHandle, EventHandler, InsertPosition, RenderError, RenderResult,
    RenderSink,
};
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

/// Id of the root element every component is mounted into.
pub const APP_ROOT_ID: &str = "app";

/// Static template description; cloned on every `clone_template`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateNode {
    pub tag: String,
    pub id: Option<String>,
    pub children: Vec<TemplateNode>,
}

impl TemplateNode {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            id: None,
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn child(mut self, child: TemplateNode) -> Self {
        self.children.push(child);
        self
    }
}

/// Read-only view of one attached element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSnapshot {
    pub tag: String,
    pub id: Option<String>,
    pub text: String,
    pub classes: BTreeSet<String>,
    pub children: Vec<ElementSnapshot>,
}

impl ElementSnapshot {
    /// First descendant matching `selector`, depth first.
    pub fn find(&self, selector: &str) -> Option<&ElementSnapshot> {
        self.children.iter().find_map(|child| {
            if matches_selector(&child.tag, child.id.as_deref(), selector) {
                Some(child)
            } else {
                child.find(selector)
            }
        })
    }
}

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    id: Option<String>,
    text: String,
    classes: BTreeSet<String>,
    children: Vec<usize>,
    parent: Option<usize>,
    handlers: Vec<EventHandler>,
}

impl Node {
    fn new(tag: &str, id: Option<String>, parent: Option<usize>) -> Self {
        Self {
            tag: tag.to_string(),
            id,
            text: String::new(),
            classes: BTreeSet::new(),
            children: Vec::new(),
            parent,
            handlers: Vec::new(),
        }
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Debug)]
struct Tree {
    slots: Vec<Slot>,
    free: Vec<usize>,
    templates: HashMap<String, TemplateNode>,
}

const ROOT: usize = 0;

impl Tree {
    fn node(&self, index: usize) -> Option<&Node> {
        self.slots.get(index).and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.slots.get_mut(index).and_then(|slot| slot.node.as_mut())
    }

    fn handle(&self, index: usize) -> ElementHandle {
        let generation = self.slots.get(index).map_or(0, |slot| slot.generation);
        ElementHandle {
            slot: index,
            generation,
        }
    }

    fn allocate(&mut self, node: Node) -> usize {
        match self.free.pop() {
            Some(index) => {
                if let Some(slot) = self.slots.get_mut(index) {
                    slot.node = Some(node);
                }
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                self.slots.len() - 1
            }
        }
    }

    fn is_attached(&self, index: usize) -> bool {
        let mut current = index;
        loop {
            if current == ROOT {
                return self.node(ROOT).is_some();
            }
            match self.node(current).and_then(|node| node.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn resolve(&self, handle: ElementHandle) -> RenderResult<usize> {
        let current = self
            .slots
            .get(handle.slot)
            .is_some_and(|slot| slot.generation == handle.generation);
        if current && self.is_attached(handle.slot) {
            Ok(handle.slot)
        } else {
            Err(RenderError::StaleElement(handle))
        }
    }

    fn find_by_id(&self, id: &str) -> Option<usize> {
        self.find_descendant(ROOT, &format!("#{id}"))
            .or_else(|| {
                self.node(ROOT)
                    .filter(|root| root.id.as_deref() == Some(id))
                    .map(|_| ROOT)
            })
    }

    fn find_descendant(&self, index: usize, selector: &str) -> Option<usize> {
        let node = self.node(index)?;
        for &child in &node.children {
            let Some(child_node) = self.node(child) else {
                continue;
            };
            if matches_selector(&child_node.tag, child_node.id.as_deref(), selector) {
                return Some(child);
            }
            if let Some(found) = self.find_descendant(child, selector) {
                return Some(found);
            }
        }
        None
    }

    fn select(&self, handle: ElementHandle, selector: &str) -> RenderResult<usize> {
        let index = self.resolve(handle)?;
        self.find_descendant(index, selector)
            .ok_or_else(|| RenderError::NoMatch {
                selector: selector.to_string(),
            })
    }

    fn instantiate(&mut self, template: &TemplateNode, parent: usize) -> usize {
        let index = self.allocate(Node::new(&template.tag, template.id.clone(), Some(parent)));
        for child in &template.children {
            let child_index = self.instantiate(child, index);
            if let Some(node) = self.node_mut(index) {
                node.children.push(child_index);
            }
        }
        index
    }

    fn release(&mut self, index: usize) {
        let children = self
            .node(index)
            .map(|node| node.children.clone())
            .unwrap_or_default();
        for child in children {
            self.release(child);
        }
        if let Some(slot) = self.slots.get_mut(index) {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index);
            }
        }
    }

    /// Handlers on the target and its ancestors, nearest first.
    fn bubble_path(&self, target: usize) -> Vec<EventHandler> {
        let mut handlers = Vec::new();
        let mut current = Some(target);
        while let Some(index) = current {
            let Some(node) = self.node(index) else {
                break;
            };
            handlers.extend(node.handlers.iter().cloned());
            current = node.parent;
        }
        handlers
    }

    fn snapshot(&self, index: usize) -> Option<ElementSnapshot> {
        let node = self.node(index)?;
        Some(ElementSnapshot {
            tag: node.tag.clone(),
            id: node.id.clone(),
            text: node.text.clone(),
            classes: node.classes.clone(),
            children: node
                .children
                .iter()
                .filter_map(|&child| self.snapshot(child))
                .collect(),
        })
    }
}

fn matches_selector(tag: &str, id: Option<&str>, selector: &str) -> bool {
    match selector.strip_prefix('#') {
        Some(wanted) => id == Some(wanted),
        None => tag == selector,
    }
}

/// Template-cloning sink over an in-memory element tree.
#[derive(Debug)]
pub struct MemoryRenderSink {
    tree: RefCell<Tree>,
    /// Handlers captured at the last drag-start, held until drag-end.
    drag_source: RefCell<Option<Vec<EventHandler>>>,
}

impl Default for MemoryRenderSink {
    fn default() -> Self {
        Self::with_board_templates()
    }
}

impl MemoryRenderSink {
    /// Empty tree with only the `#app` root and no templates.
    pub fn empty() -> Self {
        Self {
            tree: RefCell::new(Tree {
                slots: vec![Slot {
                    generation: 0,
                    node: Some(Node::new("div", Some(APP_ROOT_ID.to_string()), None)),
                }],
                free: Vec::new(),
                templates: HashMap::new(),
            }),
            drag_source: RefCell::new(None),
        }
    }

    /// Tree with the board's three templates registered.
    pub fn with_board_templates() -> Self {
        let sink = Self::empty();
        sink.register_template(
            "project-input",
            TemplateNode::new("form")
                .child(TemplateNode::new("input").with_id("title"))
                .child(TemplateNode::new("textarea").with_id("description"))
                .child(TemplateNode::new("input").with_id("people"))
                .child(TemplateNode::new("button")),
        );
        sink.register_template(
            "project-list",
            TemplateNode::new("section")
                .child(TemplateNode::new("header").child(TemplateNode::new("h2")))
                .child(TemplateNode::new("ul")),
        );
        sink.register_template(
            "single-project",
            TemplateNode::new("li")
                .child(TemplateNode::new("h2"))
                .child(TemplateNode::new("h3"))
                .child(TemplateNode::new("p")),
        );
        sink
    }

    pub fn register_template(&self, template_id: &str, template: TemplateNode) {
        self.tree
            .borrow_mut()
            .templates
            .insert(template_id.to_string(), template);
    }

    /// Snapshot of the attached element with `id`.
    pub fn element_by_id(&self, id: &str) -> Option<ElementSnapshot> {
        let tree = self.tree.borrow();
        let index = tree.find_by_id(id)?;
        tree.snapshot(index)
    }

    /// Snapshot of the whole attached tree.
    pub fn root(&self) -> Option<ElementSnapshot> {
        self.tree.borrow().snapshot(ROOT)
    }

    /// Fires a submit event at the element with `element_id`.
    ///
    /// Returns whether any handler ran.
    pub fn dispatch_submit(&self, element_id: &str) -> RenderResult<bool> {
        let handlers = self.handlers_for(element_id)?;
        let mut handled = false;
        for handler in handlers {
            if let EventHandler::Submit(callback) = handler {
                callback();
                handled = true;
            }
        }
        Ok(handled)
    }

    /// Fires a drag event of `kind` at the element with `element_id`.
    ///
    /// Drag-start records the target's handlers; the next drag-end goes to
    /// them instead of `element_id`, so a source removed by a re-render
    /// still finishes its drag. Returns whether any handler ran.
    pub fn dispatch_drag(
        &self,
        element_id: &str,
        kind: DragEventKind,
        event: &mut DragEvent,
    ) -> RenderResult<bool> {
        let source = match kind {
            DragEventKind::End => self.drag_source.borrow_mut().take(),
            _ => None,
        };
        let handlers = match source {
            Some(handlers) => handlers,
            None => self.handlers_for(element_id)?,
        };
        if kind == DragEventKind::Start {
            *self.drag_source.borrow_mut() = Some(handlers.clone());
        }
        let mut handled = false;
        for handler in handlers {
            if let EventHandler::Drag(registered, callback) = handler {
                if registered == kind {
                    callback(event);
                    handled = true;
                }
            }
        }
        Ok(handled)
    }

    // Handlers are cloned out so they can re-enter the sink.
    fn handlers_for(&self, element_id: &str) -> RenderResult<Vec<EventHandler>> {
        let tree = self.tree.borrow();
        let target = tree
            .find_by_id(element_id)
            .ok_or_else(|| RenderError::UnknownHost(element_id.to_string()))?;
        Ok(tree.bubble_path(target))
    }

    /// Number of live elements, root included.
    pub fn live_elements(&self) -> usize {
        self.tree
            .borrow()
            .slots
            .iter()
            .filter(|slot| slot.node.is_some())
            .count()
    }

    /// Element slots ever allocated; released slots are reused.
    pub fn allocated_slots(&self) -> usize {
        self.tree.borrow().slots.len()
    }
}

impl RenderSink for MemoryRenderSink {
    fn clone_template(
        &self,
        template_id: &str,
        host_id: &str,
        position: InsertPosition,
    ) -> RenderResult<ElementHandle> {
        let mut tree = self.tree.borrow_mut();
        let template = tree
            .templates
            .get(template_id)
            .cloned()
            .ok_or_else(|| RenderError::UnknownTemplate(template_id.to_string()))?;
        let host = tree
            .find_by_id(host_id)
            .ok_or_else(|| RenderError::UnknownHost(host_id.to_string()))?;

        let index = tree.instantiate(&template, host);
        if let Some(host_node) = tree.node_mut(host) {
            match position {
                InsertPosition::Prepend => host_node.children.insert(0, index),
                InsertPosition::Append => host_node.children.push(index),
            }
        }
        Ok(tree.handle(index))
    }

    fn set_element_id(&self, element: ElementHandle, id: &str) -> RenderResult<()> {
        let mut tree = self.tree.borrow_mut();
        let index = tree.resolve(element)?;
        if let Some(node) = tree.node_mut(index) {
            node.id = Some(id.to_string());
        }
        Ok(())
    }

    fn set_text(&self, element: ElementHandle, selector: &str, text: &str) -> RenderResult<()> {
        let mut tree = self.tree.borrow_mut();
        let index = tree.select(element, selector)?;
        if let Some(node) = tree.node_mut(index) {
            node.text = text.to_string();
        }
        Ok(())
    }

    fn set_child_id(&self, element: ElementHandle, selector: &str, id: &str) -> RenderResult<()> {
        let mut tree = self.tree.borrow_mut();
        let index = tree.select(element, selector)?;
        if let Some(node) = tree.node_mut(index) {
            node.id = Some(id.to_string());
        }
        Ok(())
    }

    fn add_class(&self, element: ElementHandle, selector: &str, class: &str) -> RenderResult<()> {
        let mut tree = self.tree.borrow_mut();
        let index = tree.select(element, selector)?;
        if let Some(node) = tree.node_mut(index) {
            node.classes.insert(class.to_string());
        }
        Ok(())
    }

    fn remove_class(
        &self,
        element: ElementHandle,
        selector: &str,
        class: &str,
    ) -> RenderResult<()> {
        let mut tree = self.tree.borrow_mut();
        let index = tree.select(element, selector)?;
        if let Some(node) = tree.node_mut(index) {
            node.classes.remove(class);
        }
        Ok(())
    }

    fn clear_children(&self, element_id: &str) -> RenderResult<()> {
        let mut tree = self.tree.borrow_mut();
        let index = tree
            .find_by_id(element_id)
            .ok_or_else(|| RenderError::UnknownHost(element_id.to_string()))?;
        let children = tree
            .node_mut(index)
            .map(|node| std::mem::take(&mut node.children))
            .unwrap_or_default();
        for child in children {
            tree.release(child);
        }
        Ok(())
    }

    fn add_event_listener(
        &self,
        element: ElementHandle,
        handler: EventHandler,
    ) -> RenderResult<()> {
        let mut tree = self.tree.borrow_mut();
        let index = tree.resolve(element)?;
        if let Some(node) = tree.node_mut(index) {
            node.handlers.push(handler);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryRenderSink, APP_ROOT_ID};
    use crate::drag::payload::DragEvent;
    use crate::render::{
        attach, DragEventKind, EventHandler, InsertPosition, Mount, RenderError, RenderSink,
    };
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn attach_places_fragment_by_position_and_id() {
        let sink = MemoryRenderSink::with_board_templates();
        attach(
            &sink,
            &Mount {
                template_id: "project-list",
                host_id: APP_ROOT_ID,
                position: InsertPosition::Append,
                element_id: Some("active-projects"),
            },
        )
        .expect("attach list");
        attach(
            &sink,
            &Mount {
                template_id: "project-input",
                host_id: APP_ROOT_ID,
                position: InsertPosition::Prepend,
                element_id: Some("user-input"),
            },
        )
        .expect("attach form");

        let root = sink.root().expect("root");
        let ids: Vec<_> = root
            .children
            .iter()
            .map(|child| child.id.clone().unwrap_or_default())
            .collect();
        assert_eq!(ids, vec!["user-input", "active-projects"]);
    }

    #[test]
    fn selectors_match_tag_or_id() {
        let sink = MemoryRenderSink::with_board_templates();
        let form = sink
            .clone_template("project-input", APP_ROOT_ID, InsertPosition::Append)
            .expect("clone");
        sink.set_text(form, "#people", "3").expect("by id");
        sink.set_text(form, "button", "ADD PROJECT").expect("by tag");

        let snapshot = sink.root().expect("root");
        assert_eq!(snapshot.find("#people").expect("people").text, "3");
        assert_eq!(snapshot.find("button").expect("button").text, "ADD PROJECT");

        let err = sink.set_text(form, "h1", "nope").expect_err("no h1");
        assert_eq!(
            err,
            RenderError::NoMatch {
                selector: "h1".to_string()
            }
        );
    }

    #[test]
    fn clear_children_releases_elements_and_stales_handles() {
        let sink = MemoryRenderSink::with_board_templates();
        let list = sink
            .clone_template("project-list", APP_ROOT_ID, InsertPosition::Append)
            .expect("clone list");
        sink.set_child_id(list, "ul", "active-projects-list")
            .expect("ul id");
        let before = sink.live_elements();
        let card = sink
            .clone_template("single-project", "active-projects-list", InsertPosition::Append)
            .expect("clone card");
        assert_eq!(sink.live_elements(), before + 4);

        sink.clear_children("active-projects-list").expect("clear");
        assert_eq!(sink.live_elements(), before);
        assert_eq!(
            sink.set_text(card, "h2", "gone"),
            Err(RenderError::StaleElement(card))
        );
    }

    #[test]
    fn released_slots_are_reused_without_reviving_old_handles() {
        let sink = MemoryRenderSink::with_board_templates();
        let list = sink
            .clone_template("project-list", APP_ROOT_ID, InsertPosition::Append)
            .expect("clone list");
        sink.set_child_id(list, "ul", "active-projects-list")
            .expect("ul id");
        let first = sink
            .clone_template("single-project", "active-projects-list", InsertPosition::Append)
            .expect("clone card");
        let slots = sink.allocated_slots();

        for _ in 0..20 {
            sink.clear_children("active-projects-list").expect("clear");
            sink.clone_template("single-project", "active-projects-list", InsertPosition::Append)
                .expect("clone card");
        }
        assert_eq!(sink.allocated_slots(), slots);

        let latest = sink
            .root()
            .expect("root")
            .find("ul")
            .map(|ul| ul.children.len());
        assert_eq!(latest, Some(1));
        assert_eq!(
            sink.set_text(first, "h2", "old"),
            Err(RenderError::StaleElement(first))
        );
    }

    #[test]
    fn drag_end_reaches_a_source_detached_after_start() {
        let sink = MemoryRenderSink::with_board_templates();
        let list = sink
            .clone_template("project-list", APP_ROOT_ID, InsertPosition::Append)
            .expect("clone list");
        sink.set_child_id(list, "ul", "active-projects-list")
            .expect("ul id");
        let card = sink
            .clone_template("single-project", "active-projects-list", InsertPosition::Append)
            .expect("clone card");
        sink.set_element_id(card, "card-1").expect("card id");

        let ended = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&ended);
        sink.add_event_listener(
            card,
            EventHandler::drag(DragEventKind::End, move |_| *counter.borrow_mut() += 1),
        )
        .expect("listener");

        let mut event = DragEvent::new();
        sink.dispatch_drag("card-1", DragEventKind::Start, &mut event)
            .expect("start");
        sink.clear_children("active-projects-list").expect("clear");
        assert!(sink.element_by_id("card-1").is_none());

        assert!(sink
            .dispatch_drag("card-1", DragEventKind::End, &mut event)
            .expect("end"));
        assert_eq!(*ended.borrow(), 1);

        // The recorded source is consumed by that drag-end.
        assert_eq!(
            sink.dispatch_drag("card-1", DragEventKind::End, &mut event),
            Err(RenderError::UnknownHost("card-1".to_string()))
        );
    }

    #[test]
    fn unknown_template_and_host_are_reported() {
        let sink = MemoryRenderSink::with_board_templates();
        assert_eq!(
            sink.clone_template("missing", APP_ROOT_ID, InsertPosition::Append),
            Err(RenderError::UnknownTemplate("missing".to_string()))
        );
        assert_eq!(
            sink.clone_template("single-project", "nowhere", InsertPosition::Append),
            Err(RenderError::UnknownHost("nowhere".to_string()))
        );
    }

    #[test]
    fn classes_toggle() {
        let sink = MemoryRenderSink::with_board_templates();
        let list = sink
            .clone_template("project-list", APP_ROOT_ID, InsertPosition::Append)
            .expect("clone");
        sink.add_class(list, "ul", "droppable").expect("add");
        let ul = sink.root().expect("root").find("ul").cloned().expect("ul");
        assert!(ul.classes.contains("droppable"));

        sink.remove_class(list, "ul", "droppable").expect("remove");
        let ul = sink.root().expect("root").find("ul").cloned().expect("ul");
        assert!(ul.classes.is_empty());
    }

    #[test]
    fn drag_events_bubble_from_card_to_list() {
        let sink = MemoryRenderSink::with_board_templates();
        let list = sink
            .clone_template("project-list", APP_ROOT_ID, InsertPosition::Append)
            .expect("clone list");
        sink.set_element_id(list, "finished-projects").expect("id");
        sink.set_child_id(list, "ul", "finished-projects-list")
            .expect("ul id");
        let card = sink
            .clone_template("single-project", "finished-projects-list", InsertPosition::Append)
            .expect("clone card");
        sink.set_element_id(card, "card-1").expect("card id");

        let seen = Rc::new(RefCell::new(Vec::new()));
        for (element, tag) in [(card, "card"), (list, "list")] {
            let seen = Rc::clone(&seen);
            sink.add_event_listener(
                element,
                EventHandler::drag(DragEventKind::Over, move |_| seen.borrow_mut().push(tag)),
            )
            .expect("listener");
        }

        let mut event = DragEvent::new();
        assert!(sink
            .dispatch_drag("card-1", DragEventKind::Over, &mut event)
            .expect("dispatch"));
        assert_eq!(*seen.borrow(), vec!["card", "list"]);

        assert!(!sink
            .dispatch_drag("card-1", DragEventKind::Drop, &mut event)
            .expect("dispatch"));
        assert!(!sink.dispatch_submit("card-1").expect("dispatch"));
    }

    #[test]
    fn handlers_may_reenter_the_sink() {
        let sink = Rc::new(MemoryRenderSink::with_board_templates());
        let form = sink
            .clone_template("project-input", APP_ROOT_ID, InsertPosition::Prepend)
            .expect("clone form");
        sink.set_element_id(form, "user-input").expect("id");
        let weak = Rc::downgrade(&sink);
        sink.add_event_listener(
            form,
            EventHandler::submit(move || {
                if let Some(sink) = weak.upgrade() {
                    sink.set_text(form, "button", "sent").expect("re-entrant write");
                }
            }),
        )
        .expect("listener");

        assert!(sink.dispatch_submit("user-input").expect("dispatch"));
        let button = sink.element_by_id("user-input").expect("form");
        assert_eq!(button.find("button").expect("button").text, "sent");
    }
}
