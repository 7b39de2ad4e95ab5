//! Declarative field validation.
//!
//! # Responsibility
//! - Check one form value against a set of optional constraints.
//!
//! # Invariants
//! - Validation is pure and never panics.
//! - Every present constraint is applied, including zero-valued bounds.
//! - Length bounds always apply to the value's string form.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Raw value of one form field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    /// String form used by `required` and length checks.
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Number(value) => value.to_string(),
        }
    }

    /// Numeric form used by `min`/`max` checks.
    ///
    /// Blank text reads as `0`; text that is not a number yields `None`,
    /// which fails any numeric bound.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) if value.is_nan() => None,
            Self::Number(value) => Some(*value),
            Self::Text(value) => {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Some(0.0);
                }
                trimmed.parse::<f64>().ok().filter(|parsed| !parsed.is_nan())
            }
        }
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

/// Optional constraints for one field. Absent options impose nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Constraints {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Constraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, value: usize) -> Self {
        self.min_length = Some(value);
        self
    }

    pub fn max_length(mut self, value: usize) -> Self {
        self.max_length = Some(value);
        self
    }

    pub fn min(mut self, value: f64) -> Self {
        self.min = Some(value);
        self
    }

    pub fn max(mut self, value: f64) -> Self {
        self.max = Some(value);
        self
    }
}

/// A named value paired with its constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct Validatable {
    pub field: &'static str,
    pub value: FieldValue,
    pub constraints: Constraints,
}

impl Validatable {
    pub fn new(field: &'static str, value: impl Into<FieldValue>, constraints: Constraints) -> Self {
        Self {
            field,
            value: value.into(),
            constraints,
        }
    }

    pub fn is_valid(&self) -> bool {
        validate(&self.value, &self.constraints)
    }
}

/// Returns whether `value` satisfies every present constraint.
pub fn validate(value: &FieldValue, constraints: &Constraints) -> bool {
    let text = value.as_text();
    let length = text.chars().count();

    if constraints.required && text.trim().is_empty() {
        return false;
    }
    if let Some(min_length) = constraints.min_length {
        if length < min_length {
            return false;
        }
    }
    if let Some(max_length) = constraints.max_length {
        if length > max_length {
            return false;
        }
    }

    if constraints.min.is_none() && constraints.max.is_none() {
        return true;
    }
    let Some(number) = value.as_number() else {
        return false;
    };
    if let Some(min) = constraints.min {
        if number < min {
            return false;
        }
    }
    if let Some(max) = constraints.max {
        if number > max {
            return false;
        }
    }
    true
}

/// Validates every entry and returns the names of the fields that failed,
/// in input order. An empty result means all fields passed.
pub fn validate_all(entries: &[Validatable]) -> Vec<&'static str> {
    entries
        .iter()
        .filter(|entry| !entry.is_valid())
        .map(|entry| entry.field)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{validate, validate_all, Constraints, FieldValue, Validatable};

    #[test]
    fn min_one_rejects_zero_and_accepts_one() {
        let rules = Constraints::new().min(1.0);
        assert!(!validate(&FieldValue::Number(0.0), &rules));
        assert!(validate(&FieldValue::Number(1.0), &rules));
    }

    #[test]
    fn zero_valued_bounds_are_applied() {
        assert!(!validate(&FieldValue::Number(-1.0), &Constraints::new().min(0.0)));
        assert!(!validate(&FieldValue::Number(1.0), &Constraints::new().max(0.0)));
        assert!(!validate(&"a".into(), &Constraints::new().max_length(0)));
        assert!(validate(&"".into(), &Constraints::new().min_length(0)));
        assert!(validate(&"".into(), &Constraints::new().max_length(0)));
    }

    #[test]
    fn required_uses_trimmed_text() {
        let rules = Constraints::new().required();
        assert!(!validate(&"   ".into(), &rules));
        assert!(!validate(&"".into(), &rules));
        assert!(validate(&" x ".into(), &rules));
    }

    #[test]
    fn length_bounds_count_characters_of_the_string_form() {
        let rules = Constraints::new().min_length(5);
        assert!(!validate(&"four".into(), &rules));
        assert!(validate(&"fives".into(), &rules));
        assert!(validate(&"héllo".into(), &rules));

        assert!(!validate(&FieldValue::Number(1234.0), &rules));
        assert!(validate(&FieldValue::Number(12345.0), &rules));
    }

    #[test]
    fn numeric_bounds_parse_text_values() {
        let rules = Constraints::new().required().min(1.0).max(5.0);
        assert!(validate(&"3".into(), &rules));
        assert!(validate(&" 5 ".into(), &rules));
        assert!(!validate(&"6".into(), &rules));
        assert!(!validate(&"0".into(), &rules));
        assert!(!validate(&"three".into(), &rules));
    }

    #[test]
    fn blank_text_reads_as_zero_for_numeric_bounds() {
        assert!(validate(&"".into(), &Constraints::new().max(5.0)));
        assert!(!validate(&"".into(), &Constraints::new().min(1.0)));
    }

    #[test]
    fn absent_constraints_accept_anything() {
        let rules = Constraints::new();
        assert!(validate(&"".into(), &rules));
        assert!(validate(&"not a number".into(), &rules));
        assert!(validate(&FieldValue::Number(f64::NAN), &rules));
    }

    #[test]
    fn nan_fails_numeric_bounds() {
        assert!(!validate(&FieldValue::Number(f64::NAN), &Constraints::new().max(5.0)));
    }

    #[test]
    fn validate_all_reports_failed_fields_in_order() {
        let entries = vec![
            Validatable::new("title", "", Constraints::new().required()),
            Validatable::new("description", "long enough", Constraints::new().min_length(5)),
            Validatable::new("people", "9", Constraints::new().min(1.0).max(5.0)),
        ];
        assert_eq!(validate_all(&entries), vec!["title", "people"]);
    }

    #[test]
    fn constraints_deserialize_with_camel_case_keys() {
        let rules: Constraints =
            serde_json::from_str(r#"{"required":true,"minLength":5,"max":0}"#)
                .expect("constraints json");
        assert!(rules.required);
        assert_eq!(rules.min_length, Some(5));
        assert_eq!(rules.max, Some(0.0));
        assert_eq!(rules.min, None);
    }
}
