//! Cascade state: collections, loading flags, last error and selections.
//!
//! All transitions here are synchronous. The resolver owns one `CascadeState`
//! behind its lock and drives it; consumers get cloned snapshots.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ids::EntityId;
use crate::types::{Catalog, Class, EntityKind, GradeLevel, LearningUnit, Subject};

/// A selection slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "id", rename_all = "snake_case")]
pub enum Selection {
    #[default]
    Unselected,
    Selected(EntityId),
}

impl Selection {
    pub fn id(&self) -> Option<&EntityId> {
        match self {
            Self::Unselected => None,
            Self::Selected(id) => Some(id),
        }
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, Self::Selected(_))
    }
}

impl From<Option<EntityId>> for Selection {
    fn from(id: Option<EntityId>) -> Self {
        match id {
            Some(id) => Self::Selected(id),
            None => Self::Unselected,
        }
    }
}

/// Per-type loading flags for UI feedback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadingFlags {
    pub grade_levels: bool,
    pub subjects: bool,
    pub classes: bool,
    pub learning_units: bool,
}

impl LoadingFlags {
    pub fn get(&self, kind: EntityKind) -> bool {
        match kind {
            EntityKind::GradeLevel => self.grade_levels,
            EntityKind::Subject => self.subjects,
            EntityKind::Class => self.classes,
            EntityKind::LearningUnit => self.learning_units,
        }
    }

    fn set(&mut self, kind: EntityKind, loading: bool) {
        match kind {
            EntityKind::GradeLevel => self.grade_levels = loading,
            EntityKind::Subject => self.subjects = loading,
            EntityKind::Class => self.classes = loading,
            EntityKind::LearningUnit => self.learning_units = loading,
        }
    }

    pub fn any(&self) -> bool {
        self.grade_levels || self.subjects || self.classes || self.learning_units
    }
}

/// Last fetch failure, kept until the same type reloads successfully,
/// `clear_error` is called, or the resolver is reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolverError {
    pub entity: EntityKind,
    pub message: String,
}

impl fmt::Display for ResolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to load {}: {}", self.entity, self.message)
    }
}

/// Snapshot of everything the resolver holds, minus the cache.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CascadeState {
    pub grade_levels: Vec<GradeLevel>,
    pub subjects: Vec<Subject>,
    pub classes: Vec<Class>,
    pub learning_units: Vec<LearningUnit>,

    pub loading: LoadingFlags,
    pub error: Option<ResolverError>,

    pub selected_grade_level: Selection,
    pub selected_subject: Selection,
    pub selected_class: Selection,

    /// When the data in each collection was fetched from the gateway. A
    /// cache hit keeps the time of the original fetch.
    pub loaded_at: BTreeMap<EntityKind, DateTime<Utc>>,

    #[serde(skip)]
    sequences: BTreeMap<EntityKind, u64>,
}

impl CascadeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace one collection wholesale with freshly fetched data.
    ///
    /// Clears the last error if it belonged to the same entity type.
    pub fn apply(&mut self, catalog: Catalog) {
        self.apply_fetched_at(catalog, Utc::now());
    }

    /// Replace one collection with data fetched at `fetched_at`.
    pub fn apply_fetched_at(&mut self, catalog: Catalog, fetched_at: DateTime<Utc>) {
        let kind = catalog.kind();
        match catalog {
            Catalog::GradeLevels(items) => self.grade_levels = items,
            Catalog::Subjects(items) => self.subjects = items,
            Catalog::Classes(items) => self.classes = items,
            Catalog::LearningUnits(items) => self.learning_units = items,
        }
        self.loaded_at.insert(kind, fetched_at);
        if self.error.as_ref().is_some_and(|e| e.entity == kind) {
            self.error = None;
        }
    }

    /// Record a fetch failure. Collections are left as they are.
    pub fn record_failure(&mut self, entity: EntityKind, message: impl Into<String>) {
        self.error = Some(ResolverError {
            entity,
            message: message.into(),
        });
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Set the grade level and unselect subject and class.
    ///
    /// The subject/class reset is unconditional, even when the grade level
    /// does not change.
    pub fn select_grade_level(&mut self, id: Option<EntityId>) {
        self.selected_grade_level = id.into();
        self.selected_subject = Selection::Unselected;
        self.selected_class = Selection::Unselected;
    }

    pub fn select_subject(&mut self, id: Option<EntityId>) {
        self.selected_subject = id.into();
    }

    pub fn select_class(&mut self, id: Option<EntityId>) {
        self.selected_class = id.into();
    }

    /// Start a reload of `kind`: bump its sequence number and raise the
    /// loading flag. Returns the sequence the response must present.
    pub(crate) fn begin_reload(&mut self, kind: EntityKind) -> u64 {
        let seq = self.sequences.entry(kind).or_insert(0);
        *seq += 1;
        self.loading.set(kind, true);
        *seq
    }

    /// Whether `seq` is still the newest reload issued for `kind`.
    pub(crate) fn is_latest(&self, kind: EntityKind, seq: u64) -> bool {
        self.sequences.get(&kind).copied().unwrap_or(0) == seq
    }

    /// Finish the newest reload of `kind` and drop its loading flag.
    pub(crate) fn finish_reload(&mut self, kind: EntityKind) {
        self.loading.set(kind, false);
    }

    /// Empty every collection and selection.
    ///
    /// Sequence numbers survive so that responses to reloads issued before
    /// the reset are recognised as stale.
    pub fn clear(&mut self) {
        let sequences = std::mem::take(&mut self.sequences);
        *self = Self {
            sequences,
            ..Self::default()
        };
        for seq in self.sequences.values_mut() {
            *seq += 1;
        }
    }

    pub fn collection_len(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::GradeLevel => self.grade_levels.len(),
            EntityKind::Subject => self.subjects.len(),
            EntityKind::Class => self.classes.len(),
            EntityKind::LearningUnit => self.learning_units.len(),
        }
    }

    pub fn grade_level(&self, id: &EntityId) -> Option<&GradeLevel> {
        self.grade_levels.iter().find(|g| &g.id == id)
    }

    pub fn subject(&self, id: &EntityId) -> Option<&Subject> {
        self.subjects.iter().find(|s| &s.id == id)
    }

    pub fn class(&self, id: &EntityId) -> Option<&Class> {
        self.classes.iter().find(|c| &c.id == id)
    }

    pub fn learning_unit(&self, id: &EntityId) -> Option<&LearningUnit> {
        self.learning_units.iter().find(|u| &u.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(id: u64, grade_level: u64) -> Class {
        Class {
            id: EntityId::from(id),
            name: format!("Kelas {}", id),
            kind: Default::default(),
            level: None,
            order: 0,
            grade_level_id: EntityId::from(grade_level),
        }
    }

    #[test]
    fn test_select_grade_level_resets_leaf_parents() {
        let mut state = CascadeState::new();
        state.select_subject(Some(EntityId::from(10)));
        state.select_class(Some(EntityId::from(100)));

        state.select_grade_level(Some(EntityId::from(1)));

        assert_eq!(state.selected_grade_level, Selection::Selected(EntityId::from(1)));
        assert_eq!(state.selected_subject, Selection::Unselected);
        assert_eq!(state.selected_class, Selection::Unselected);
    }

    #[test]
    fn test_subject_and_class_are_siblings() {
        let mut state = CascadeState::new();
        state.select_class(Some(EntityId::from(100)));
        state.select_subject(Some(EntityId::from(10)));
        state.select_subject(None);

        assert_eq!(state.selected_class, Selection::Selected(EntityId::from(100)));
        assert_eq!(state.selected_subject, Selection::Unselected);
    }

    #[test]
    fn test_failure_keeps_collection() {
        let mut state = CascadeState::new();
        state.apply(Catalog::Classes(vec![class(100, 1)]));

        state.record_failure(EntityKind::Class, "HTTP 500");

        assert_eq!(state.classes.len(), 1);
        assert_eq!(
            state.error.as_ref().map(|e| e.to_string()),
            Some("failed to load class: HTTP 500".to_string())
        );
    }

    #[test]
    fn test_apply_clears_own_error_only() {
        let mut state = CascadeState::new();
        state.record_failure(EntityKind::Subject, "down");

        state.apply(Catalog::Classes(vec![class(1, 1)]));
        assert!(state.error.is_some());

        state.apply(Catalog::Subjects(vec![]));
        assert!(state.error.is_none());
        assert!(state.loaded_at.contains_key(&EntityKind::Subject));
    }

    #[test]
    fn test_reload_sequences() {
        let mut state = CascadeState::new();
        let first = state.begin_reload(EntityKind::Class);
        let second = state.begin_reload(EntityKind::Class);

        assert!(state.loading.get(EntityKind::Class));
        assert!(!state.is_latest(EntityKind::Class, first));
        assert!(state.is_latest(EntityKind::Class, second));

        state.finish_reload(EntityKind::Class);
        assert!(!state.loading.any());
    }

    #[test]
    fn test_clear_invalidates_outstanding_reloads() {
        let mut state = CascadeState::new();
        let seq = state.begin_reload(EntityKind::Subject);
        state.apply(Catalog::Classes(vec![class(1, 1)]));
        state.select_grade_level(Some(EntityId::from(1)));

        state.clear();

        assert!(state.classes.is_empty());
        assert!(!state.selected_grade_level.is_selected());
        assert!(!state.loading.any());
        assert!(!state.is_latest(EntityKind::Subject, seq));
    }
}
