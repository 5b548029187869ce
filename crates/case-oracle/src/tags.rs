//! Tag index over the registry
//!
//! Tags only group routines. They never influence how a case is evaluated.

use std::str::FromStr;

use derive_more::{
    AsRef,
    Deref,
    Display,
};
use indexmap::{
    IndexMap,
    IndexSet,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    error::SpecError,
    registry::CaseRegistry,
    routine::RoutineId,
};

/// Short grouping label such as `STRING`, `LOOP` or `CALL`.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    Deref,
    AsRef,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
#[as_ref(forward)]
pub struct Tag(String);

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Tag {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl FromStr for Tag {
    type Err = SpecError;

    /// Accepts plain identifiers; a qualified `Tag.TagType.LOOP` keeps its last segment.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let name = text.trim().rsplit('.').next().unwrap_or_default();
        let valid = name
            .chars()
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_')
            && name.chars().all(|c| c.is_alphanumeric() || c == '_');
        if valid {
            Ok(Self::new(name))
        } else {
            Err(SpecError::BadTag(text.trim().to_string()))
        }
    }
}

impl CaseRegistry {
    /// Tags of a routine; empty for unknown routines.
    pub fn tags_of(
        &self,
        id: &RoutineId,
    ) -> IndexSet<Tag> {
        self.lookup(id)
            .map(|entry| entry.tags.clone())
            .unwrap_or_default()
    }

    /// Routines carrying `tag`, in registration order.
    pub fn routines_with_tag(
        &self,
        tag: &Tag,
    ) -> Vec<&RoutineId> {
        self.all_routines()
            .filter(|entry| entry.has_tag(tag))
            .map(|entry| &entry.id)
            .collect()
    }

    /// Every tag in use with the number of routines carrying it, in first-seen order.
    pub fn tag_counts(&self) -> IndexMap<&Tag, usize> {
        let mut counts = IndexMap::new();
        for tag in self.all_routines().flat_map(|entry| &entry.tags) {
            *counts.entry(tag).or_insert(0) += 1;
        }
        counts
    }
}
