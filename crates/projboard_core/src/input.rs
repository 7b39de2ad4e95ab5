//! Input-source contract for the project form.
//!
//! # Responsibility
//! - Give the core synchronous read access to the three form fields.
//! - Let the core clear the fields and raise a user-visible alert.

use std::cell::RefCell;

/// Raw field values as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub title: String,
    pub description: String,
    /// Numeric text; parsed only after validation.
    pub people: String,
}

impl FormValues {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        people: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            people: people.into(),
        }
    }
}

/// Form backend the input component reads from.
pub trait InputSource {
    fn read_fields(&self) -> FormValues;
    fn clear_fields(&self);
    fn alert(&self, message: &str);
}

/// Form state held in memory; records alerts for later inspection.
#[derive(Debug, Default)]
pub struct MemoryForm {
    values: RefCell<FormValues>,
    alerts: RefCell<Vec<String>>,
}

impl MemoryForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces all three field values, as if typed by the user.
    pub fn fill(&self, values: FormValues) {
        *self.values.borrow_mut() = values;
    }

    pub fn values(&self) -> FormValues {
        self.values.borrow().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }

    /// Removes and returns alerts raised since the last call.
    pub fn take_alerts(&self) -> Vec<String> {
        std::mem::take(&mut *self.alerts.borrow_mut())
    }
}

impl InputSource for MemoryForm {
    fn read_fields(&self) -> FormValues {
        self.values()
    }

    fn clear_fields(&self) {
        *self.values.borrow_mut() = FormValues::default();
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }
}
