//! Catalog entity types.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::ids::EntityId;

/// Grade level (Jenjang). Root of the cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeLevel {
    pub id: EntityId,

    /// Short code (e.g., "SD", "SMP").
    pub code: String,

    pub name: String,

    /// Display order.
    #[serde(default)]
    pub order: i32,

    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Subject (Mata Pelajaran).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: EntityId,

    pub name: String,

    #[serde(default)]
    pub code: String,

    #[serde(default)]
    pub category: String,

    /// Owning grade level. `None` means the subject is global and applies to
    /// every grade level.
    #[serde(default)]
    pub grade_level_id: Option<EntityId>,
}

impl Subject {
    /// Whether the subject applies to all grade levels.
    pub fn is_global(&self) -> bool {
        self.grade_level_id.is_none()
    }

    /// Whether the subject may be used together with classes of `grade_level_id`.
    pub fn applies_to(&self, grade_level_id: &EntityId) -> bool {
        match &self.grade_level_id {
            None => true,
            Some(own) => own == grade_level_id,
        }
    }
}

/// Kind of class grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    /// Numbered class (level 1..=12).
    #[default]
    Standard,

    /// Custom-named group.
    Custom,
}

/// Class (Kelas). Always belongs to exactly one grade level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: EntityId,

    pub name: String,

    #[serde(default)]
    pub kind: ClassKind,

    /// Numbered level, 1..=12.
    #[serde(default, deserialize_with = "deserialize_level")]
    pub level: Option<u8>,

    #[serde(default)]
    pub order: i32,

    pub grade_level_id: EntityId,
}

/// Lowest and highest numbered class level.
pub const CLASS_LEVEL_RANGE: std::ops::RangeInclusive<u8> = 1..=12;

fn deserialize_level<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let level = Option::<u8>::deserialize(deserializer)?;
    match level {
        Some(l) if !CLASS_LEVEL_RANGE.contains(&l) => Err(serde::de::Error::custom(format!(
            "class level {} outside {}..={}",
            l,
            CLASS_LEVEL_RANGE.start(),
            CLASS_LEVEL_RANGE.end()
        ))),
        other => Ok(other),
    }
}

/// Learning unit (Materi). Leaf of the cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningUnit {
    pub id: EntityId,

    pub name: String,

    pub subject_id: EntityId,

    /// The unit's effective grade level is the grade level of this class.
    pub class_id: EntityId,
}

/// The four catalog entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    GradeLevel,
    Subject,
    Class,
    LearningUnit,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::GradeLevel,
        EntityKind::Subject,
        EntityKind::Class,
        EntityKind::LearningUnit,
    ];

    /// Stable name used in cache keys and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GradeLevel => "grade_level",
            Self::Subject => "subject",
            Self::Class => "class",
            Self::LearningUnit => "learning_unit",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A complete list of one entity type, as fetched from the gateway.
///
/// Collections are always replaced with a whole `Catalog`; there is no
/// incremental merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Catalog {
    GradeLevels(Vec<GradeLevel>),
    Subjects(Vec<Subject>),
    Classes(Vec<Class>),
    LearningUnits(Vec<LearningUnit>),
}

impl Catalog {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::GradeLevels(_) => EntityKind::GradeLevel,
            Self::Subjects(_) => EntityKind::Subject,
            Self::Classes(_) => EntityKind::Class,
            Self::LearningUnits(_) => EntityKind::LearningUnit,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::GradeLevels(items) => items.len(),
            Self::Subjects(items) => items.len(),
            Self::Classes(items) => items.len(),
            Self::LearningUnits(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_without_grade_level_is_global() {
        let subject: Subject =
            serde_json::from_str(r#"{"id": 10, "name": "Agama", "gradeLevelId": null}"#).unwrap();
        assert!(subject.is_global());
        assert!(subject.applies_to(&EntityId::from(1)));
        assert!(subject.applies_to(&EntityId::from(2)));
    }

    #[test]
    fn test_scoped_subject_applies_only_to_its_grade_level() {
        let subject: Subject = serde_json::from_str(
            r#"{"id": "20", "name": "Fisika", "code": "FIS", "category": "IPA", "gradeLevelId": 2}"#,
        )
        .unwrap();
        assert!(!subject.is_global());
        assert!(subject.applies_to(&EntityId::from(2)));
        assert!(!subject.applies_to(&EntityId::from(1)));
    }

    #[test]
    fn test_class_requires_grade_level() {
        let err = serde_json::from_str::<Class>(r#"{"id": 1, "name": "1A"}"#).unwrap_err();
        assert!(err.to_string().contains("gradeLevelId"));
    }

    #[test]
    fn test_class_level_range() {
        let class: Class = serde_json::from_str(
            r#"{"id": 1, "name": "Kelas 7", "kind": "standard", "level": 7, "gradeLevelId": 2}"#,
        )
        .unwrap();
        assert_eq!(class.level, Some(7));
        assert_eq!(class.kind, ClassKind::Standard);

        let err = serde_json::from_str::<Class>(
            r#"{"id": 1, "name": "Kelas 13", "level": 13, "gradeLevelId": 2}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("outside 1..=12"));
    }

    #[test]
    fn test_custom_class_without_level() {
        let class: Class = serde_json::from_str(
            r#"{"id": 5, "name": "Tahfidz", "kind": "custom", "gradeLevelId": 1}"#,
        )
        .unwrap();
        assert_eq!(class.kind, ClassKind::Custom);
        assert_eq!(class.level, None);
    }

    #[test]
    fn test_grade_level_defaults() {
        let level: GradeLevel =
            serde_json::from_str(r#"{"id": 1, "code": "SD", "name": "Sekolah Dasar"}"#).unwrap();
        assert!(level.active);
        assert_eq!(level.order, 0);
    }
}
