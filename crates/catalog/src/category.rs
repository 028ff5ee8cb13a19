use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use factory_core::{DomainResult, Entity, RecordId, Timestamps};

use crate::fields::{nullable, optional_text, required_text};

/// Category identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub RecordId);

impl CategoryId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl core::str::FromStr for CategoryId {
    type Err = factory_core::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> CategoryId {
        self.id
    }
}

/// Full representation accepted by `create` and `update`.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial representation accepted by `partial_update`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
}

impl Category {
    pub fn create(id: CategoryId, input: CategoryInput, now: DateTime<Utc>) -> DomainResult<Self> {
        Ok(Self {
            id,
            name: required_text("name", &input.name)?,
            description: optional_text(input.description),
            timestamps: Timestamps::at(now),
        })
    }

    /// Replace every writable field.
    pub fn replace(&mut self, input: CategoryInput, now: DateTime<Utc>) -> DomainResult<()> {
        let name = required_text("name", &input.name)?;
        self.name = name;
        self.description = optional_text(input.description);
        self.timestamps.touch(now);
        Ok(())
    }

    /// Apply only the fields present in `patch`.
    pub fn patch(&mut self, patch: CategoryPatch, now: DateTime<Utc>) -> DomainResult<()> {
        let name = patch
            .name
            .map(|n| required_text("name", &n))
            .transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = optional_text(description);
        }
        self.timestamps.touch(now);
        Ok(())
    }
}
