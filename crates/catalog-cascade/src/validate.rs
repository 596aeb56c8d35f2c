//! Subject/class grade-level consistency.
//!
//! A learning unit's subject, when scoped, must belong to the same grade level
//! as its class. The subject and class pickers are filtered independently, so
//! an inconsistent pair can still be put together; this check catches it.
//!
//! Results are plain values. A mismatch is never recorded as resolver error.

use serde::Serialize;

use crate::ids::EntityId;
use crate::state::CascadeState;
use crate::types::{Class, LearningUnit, Subject};

/// Outcome of a consistency check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Consistency {
    Valid,
    Invalid {
        message: String,
        subject_grade_level: EntityId,
        class_grade_level: EntityId,
    },
}

impl Consistency {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Valid => None,
            Self::Invalid { message, .. } => Some(message),
        }
    }
}

/// Check a subject/class pair.
///
/// - either side missing => valid (the other picker is still open)
/// - global subject => valid
/// - otherwise the grade levels must match
pub fn validate_consistency(subject: Option<&Subject>, class: Option<&Class>) -> Consistency {
    let (Some(subject), Some(class)) = (subject, class) else {
        return Consistency::Valid;
    };
    let Some(subject_grade_level) = &subject.grade_level_id else {
        return Consistency::Valid;
    };

    if subject_grade_level == &class.grade_level_id {
        Consistency::Valid
    } else {
        Consistency::Invalid {
            message: format!(
                "subject {} belongs to grade level {} but class {} belongs to grade level {}",
                subject.name, subject_grade_level, class.name, class.grade_level_id
            ),
            subject_grade_level: subject_grade_level.clone(),
            class_grade_level: class.grade_level_id.clone(),
        }
    }
}

/// Check a subject/class pair given by id.
///
/// Ids that are not in the loaded collections count as missing, which makes
/// the pair valid.
pub fn validate_ids(
    state: &CascadeState,
    subject_id: Option<&EntityId>,
    class_id: Option<&EntityId>,
) -> Consistency {
    let subject = subject_id.and_then(|id| state.subject(id));
    let class = class_id.and_then(|id| state.class(id));
    validate_consistency(subject, class)
}

/// Check the currently selected subject and class.
pub fn validate_selection(state: &CascadeState) -> Consistency {
    validate_ids(
        state,
        state.selected_subject.id(),
        state.selected_class.id(),
    )
}

/// Check a proposed learning unit before it is submitted.
pub fn validate_learning_unit(state: &CascadeState, unit: &LearningUnit) -> Consistency {
    validate_ids(state, Some(&unit.subject_id), Some(&unit.class_id))
}
