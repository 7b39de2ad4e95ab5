//! Project domain model.
//!
//! # Responsibility
//! - Define the record rendered as one card on the board.
//! - Provide the headcount display label used by cards.
//!
//! # Invariants
//! - `id` is generated once and never reused for another project.
//! - `status` is always `Active` or `Finished`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier for one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(Uuid);

impl ProjectId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for ProjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for ProjectId {
    type Err = ProjectIdParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Uuid::parse_str(trimmed)
            .map(Self)
            .map_err(|_| ProjectIdParseError(trimmed.to_string()))
    }
}

/// Raised when a string is not a valid project id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectIdParseError(pub String);

impl Display for ProjectIdParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid project id `{}`", self.0)
    }
}

impl Error for ProjectIdParseError {}

/// Lifecycle status; also the `kind` of the list a project is shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    Finished,
}

impl ProjectStatus {
    /// Lowercase name used in element ids and CLI arguments.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Finished => "finished",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "finished" => Some(Self::Finished),
            _ => None,
        }
    }
}

impl Display for ProjectStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of work on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    pub people_count: u32,
    pub status: ProjectStatus,
}

impl Project {
    /// Creates an `Active` project with a freshly generated id.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        people_count: u32,
    ) -> Self {
        Self::with_id(ProjectId::generate(), title, description, people_count)
    }

    /// Creates an `Active` project with a caller-provided id.
    pub fn with_id(
        id: ProjectId,
        title: impl Into<String>,
        description: impl Into<String>,
        people_count: u32,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            people_count,
            status: ProjectStatus::Active,
        }
    }

    /// Headcount label: "1 person" or "<N> people".
    pub fn people_label(&self) -> String {
        if self.people_count == 1 {
            "1 person".to_string()
        } else {
            format!("{} people", self.people_count)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Project, ProjectId, ProjectStatus};

    #[test]
    fn people_label_is_singular_only_for_one() {
        let mut project = Project::new("Build API", "Write REST endpoints", 1);
        assert_eq!(project.people_label(), "1 person");

        project.people_count = 3;
        assert_eq!(project.people_label(), "3 people");

        project.people_count = 0;
        assert_eq!(project.people_label(), "0 people");
    }

    #[test]
    fn project_id_round_trips_through_display() {
        let id = ProjectId::generate();
        let parsed: ProjectId = id.to_string().parse().expect("display form should parse");
        assert_eq!(parsed, id);
    }

    #[test]
    fn project_id_rejects_garbage() {
        let err = "0.4213".parse::<ProjectId>().expect_err("non-uuid must fail");
        assert!(err.to_string().contains("0.4213"));
    }

    #[test]
    fn status_parse_is_case_insensitive() {
        assert_eq!(ProjectStatus::parse(" Finished "), Some(ProjectStatus::Finished));
        assert_eq!(ProjectStatus::parse("ACTIVE"), Some(ProjectStatus::Active));
        assert_eq!(ProjectStatus::parse("done"), None);
    }
}
