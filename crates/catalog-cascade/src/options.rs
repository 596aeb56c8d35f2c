//! Option lists derived from the cascade state.
//!
//! Every function here is pure: the same state and filters always give the
//! same list. Each entity type has exactly one mapping into [`OptionItem`].

use serde::Serialize;

use crate::ids::EntityId;
use crate::state::CascadeState;
use crate::types::{Class, ClassKind, EntityKind, GradeLevel, LearningUnit, Subject};

/// Badge shown on subjects that apply to every grade level.
pub const GLOBAL_BADGE: &str = "Global";

/// One selectable entry for a picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionItem<T> {
    pub value: EntityId,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    pub entity: T,
}

/// Parent filters for option derivation. `None` fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentFilters {
    pub grade_level_id: Option<EntityId>,
    pub subject_id: Option<EntityId>,
    pub class_id: Option<EntityId>,
}

impl ParentFilters {
    pub fn grade_level(id: EntityId) -> Self {
        Self {
            grade_level_id: Some(id),
            ..Self::default()
        }
    }

    pub fn with_subject(mut self, id: EntityId) -> Self {
        self.subject_id = Some(id);
        self
    }

    pub fn with_class(mut self, id: EntityId) -> Self {
        self.class_id = Some(id);
        self
    }

    /// Filters taken from the current selections.
    pub fn from_selection(state: &CascadeState) -> Self {
        Self {
            grade_level_id: state.selected_grade_level.id().cloned(),
            subject_id: state.selected_subject.id().cloned(),
            class_id: state.selected_class.id().cloned(),
        }
    }
}

/// Options for one entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "entity", content = "options", rename_all = "snake_case")]
pub enum OptionList {
    GradeLevels(Vec<OptionItem<GradeLevel>>),
    Subjects(Vec<OptionItem<Subject>>),
    Classes(Vec<OptionItem<Class>>),
    LearningUnits(Vec<OptionItem<LearningUnit>>),
}

impl OptionList {
    pub fn len(&self) -> usize {
        match self {
            Self::GradeLevels(o) => o.len(),
            Self::Subjects(o) => o.len(),
            Self::Classes(o) => o.len(),
            Self::LearningUnits(o) => o.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Option values in list order.
    pub fn values(&self) -> Vec<&EntityId> {
        match self {
            Self::GradeLevels(o) => o.iter().map(|i| &i.value).collect(),
            Self::Subjects(o) => o.iter().map(|i| &i.value).collect(),
            Self::Classes(o) => o.iter().map(|i| &i.value).collect(),
            Self::LearningUnits(o) => o.iter().map(|i| &i.value).collect(),
        }
    }
}

pub fn grade_level_option(level: &GradeLevel) -> OptionItem<GradeLevel> {
    OptionItem {
        value: level.id.clone(),
        label: level.name.clone(),
        subtitle: Some(level.code.clone()),
        badge: (!level.active).then(|| "Inactive".to_string()),
        entity: level.clone(),
    }
}

pub fn subject_option(subject: &Subject, state: &CascadeState) -> OptionItem<Subject> {
    let badge = match &subject.grade_level_id {
        None => Some(GLOBAL_BADGE.to_string()),
        Some(id) => state.grade_level(id).map(|g| g.code.clone()),
    };
    let subtitle = [subject.code.as_str(), subject.category.as_str()]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" · ");

    OptionItem {
        value: subject.id.clone(),
        label: subject.name.clone(),
        subtitle: (!subtitle.is_empty()).then_some(subtitle),
        badge,
        entity: subject.clone(),
    }
}

pub fn class_option(class: &Class, state: &CascadeState) -> OptionItem<Class> {
    let badge = match (class.kind, class.level) {
        (ClassKind::Custom, _) => Some("Custom".to_string()),
        (ClassKind::Standard, Some(level)) => Some(format!("Level {}", level)),
        (ClassKind::Standard, None) => None,
    };

    OptionItem {
        value: class.id.clone(),
        label: class.name.clone(),
        subtitle: state.grade_level(&class.grade_level_id).map(|g| g.name.clone()),
        badge,
        entity: class.clone(),
    }
}

pub fn learning_unit_option(unit: &LearningUnit, state: &CascadeState) -> OptionItem<LearningUnit> {
    let subject = state.subject(&unit.subject_id).map(|s| s.name.as_str());
    let class = state.class(&unit.class_id).map(|c| c.name.as_str());
    let subtitle = match (subject, class) {
        (Some(s), Some(c)) => Some(format!("{} · {}", s, c)),
        (Some(s), None) => Some(s.to_string()),
        (None, Some(c)) => Some(c.to_string()),
        (None, None) => None,
    };

    OptionItem {
        value: unit.id.clone(),
        label: unit.name.clone(),
        subtitle,
        badge: None,
        entity: unit.clone(),
    }
}

/// All grade levels, by display order.
pub fn grade_level_options(state: &CascadeState) -> Vec<OptionItem<GradeLevel>> {
    let mut levels: Vec<&GradeLevel> = state.grade_levels.iter().collect();
    levels.sort_by_key(|g| g.order);
    levels.into_iter().map(grade_level_option).collect()
}

/// Subjects usable with `grade_level_id`: global subjects plus the ones
/// scoped to it. Without a grade level every subject is offered.
pub fn subject_options(
    state: &CascadeState,
    grade_level_id: Option<&EntityId>,
) -> Vec<OptionItem<Subject>> {
    state
        .subjects
        .iter()
        .filter(|s| grade_level_id.map_or(true, |g| s.applies_to(g)))
        .map(|s| subject_option(s, state))
        .collect()
}

/// Classes of `grade_level_id`, by display order then name. There are no
/// global classes. Without a grade level every class is offered.
pub fn class_options(
    state: &CascadeState,
    grade_level_id: Option<&EntityId>,
) -> Vec<OptionItem<Class>> {
    let mut classes: Vec<&Class> = state
        .classes
        .iter()
        .filter(|c| grade_level_id.map_or(true, |g| &c.grade_level_id == g))
        .collect();
    classes.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
    classes.into_iter().map(|c| class_option(c, state)).collect()
}

/// Learning units matching every provided filter field.
///
/// The grade-level filter goes through the unit's class; a unit whose class
/// is not loaded does not match a grade-level filter.
pub fn learning_unit_options(
    state: &CascadeState,
    filters: &ParentFilters,
) -> Vec<OptionItem<LearningUnit>> {
    state
        .learning_units
        .iter()
        .filter(|u| filters.subject_id.as_ref().map_or(true, |s| &u.subject_id == s))
        .filter(|u| filters.class_id.as_ref().map_or(true, |c| &u.class_id == c))
        .filter(|u| {
            filters.grade_level_id.as_ref().map_or(true, |g| {
                state
                    .class(&u.class_id)
                    .is_some_and(|c| &c.grade_level_id == g)
            })
        })
        .map(|u| learning_unit_option(u, state))
        .collect()
}

/// Options for `kind` under `filters`.
pub fn get_options(state: &CascadeState, kind: EntityKind, filters: &ParentFilters) -> OptionList {
    let grade_level = filters.grade_level_id.as_ref();
    match kind {
        EntityKind::GradeLevel => OptionList::GradeLevels(grade_level_options(state)),
        EntityKind::Subject => OptionList::Subjects(subject_options(state, grade_level)),
        EntityKind::Class => OptionList::Classes(class_options(state, grade_level)),
        EntityKind::LearningUnit => {
            OptionList::LearningUnits(learning_unit_options(state, filters))
        }
    }
}
