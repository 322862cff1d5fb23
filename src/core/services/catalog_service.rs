use tracing::info;
use uuid::Uuid;

use crate::core::validation::{fields, ValidationErrors, ValidationIssue};
use crate::domain::{Catalog, StageSubject, Subject};
use crate::errors::{CoreError, CoreResult};

pub struct CatalogService;

impl CatalogService {
    pub fn add_subject(catalog: &mut Catalog, name: &str) -> CoreResult<Uuid> {
        let name = Self::validate_name(catalog, None, name)?;
        let subject = Subject::new(name);
        let id = subject.id;
        catalog.subjects.push(subject);
        info!(subject = %id, "subject added");
        Ok(id)
    }

    pub fn rename_subject(catalog: &mut Catalog, id: Uuid, name: &str) -> CoreResult<()> {
        let name = Self::validate_name(catalog, Some(id), name)?;
        let subject = catalog
            .subject_mut(id)
            .ok_or(CoreError::SubjectNotFound(id))?;
        subject.name = name;
        Ok(())
    }

    pub fn remove_subject(catalog: &mut Catalog, id: Uuid) -> CoreResult<Subject> {
        if catalog
            .assignments
            .iter()
            .any(|assignment| assignment.subject_id == id)
        {
            return Err(CoreError::InvalidOperation(
                "Subject is assigned to a stage".into(),
            ));
        }
        let position = catalog
            .subjects
            .iter()
            .position(|subject| subject.id == id)
            .ok_or(CoreError::SubjectNotFound(id))?;
        Ok(catalog.subjects.remove(position))
    }

    /// Offers `subject_id` at `stage`; each (stage, subject) pair may exist once.
    pub fn assign(catalog: &mut Catalog, stage: &str, subject_id: Uuid) -> CoreResult<()> {
        let stage = stage.trim();
        if stage.is_empty() {
            return Err(
                ValidationErrors::single(fields::STAGE, ValidationIssue::MissingRequiredField)
                    .into(),
            );
        }
        let subject = catalog
            .subject(subject_id)
            .ok_or(CoreError::SubjectNotFound(subject_id))?;
        if catalog
            .assignments
            .iter()
            .any(|a| a.subject_id == subject_id && a.stage.eq_ignore_ascii_case(stage))
        {
            return Err(ValidationErrors::single(
                fields::STAGE,
                ValidationIssue::DuplicateKey {
                    key: format!("{stage}/{}", subject.name),
                },
            )
            .into());
        }
        catalog.assignments.push(StageSubject {
            stage: stage.to_string(),
            subject_id,
        });
        Ok(())
    }

    pub fn unassign(catalog: &mut Catalog, stage: &str, subject_id: Uuid) -> CoreResult<()> {
        let before = catalog.assignments.len();
        catalog
            .assignments
            .retain(|a| !(a.subject_id == subject_id && a.stage.eq_ignore_ascii_case(stage.trim())));
        if catalog.assignments.len() == before {
            return Err(CoreError::InvalidOperation(format!(
                "Subject {subject_id} is not assigned to `{stage}`"
            )));
        }
        Ok(())
    }

    fn validate_name(catalog: &Catalog, current: Option<Uuid>, name: &str) -> CoreResult<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(
                ValidationErrors::single(fields::NAME, ValidationIssue::MissingRequiredField)
                    .into(),
            );
        }
        let taken = catalog.subjects.iter().any(|subject| {
            Some(subject.id) != current && subject.name.trim().eq_ignore_ascii_case(trimmed)
        });
        if taken {
            return Err(ValidationErrors::single(
                fields::NAME,
                ValidationIssue::DuplicateKey {
                    key: trimmed.to_string(),
                },
            )
            .into());
        }
        Ok(trimmed.to_string())
    }
}
