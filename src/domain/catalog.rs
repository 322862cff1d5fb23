use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::Displayable;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
}

impl Subject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

impl Displayable for Subject {
    fn display_label(&self) -> String {
        self.name.clone()
    }
}

/// Offers a subject at a school stage (e.g. "Primary", "Secondary").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageSubject {
    pub stage: String,
    pub subject_id: Uuid,
}

/// Subjects plus their stage assignments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub assignments: Vec<StageSubject>,
}

impl Catalog {
    pub fn subject(&self, id: Uuid) -> Option<&Subject> {
        self.subjects.iter().find(|subject| subject.id == id)
    }

    pub fn subject_mut(&mut self, id: Uuid) -> Option<&mut Subject> {
        self.subjects.iter_mut().find(|subject| subject.id == id)
    }

    pub fn subjects_for_stage<'a>(&'a self, stage: &'a str) -> impl Iterator<Item = &'a Subject> + 'a {
        self.assignments
            .iter()
            .filter(move |assignment| assignment.stage == stage)
            .filter_map(move |assignment| self.subject(assignment.subject_id))
    }
}
