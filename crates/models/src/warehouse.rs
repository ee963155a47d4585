//! `Warehouse` model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderapp_core::{FieldType, Model, ModelField, ModelId, ModelRef, ModelSchema, QueryField};

/// A warehouse. Identified by its id alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    id: ModelId,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl Warehouse {
    pub const ID: QueryField = QueryField::new("Warehouse", "id");

    pub fn builder() -> BuildStep {
        BuildStep::blank()
    }

    /// Reference an existing warehouse by id. Not usable for creating records.
    pub fn just_id(id: impl Into<ModelId>) -> ModelRef<Warehouse> {
        ModelRef::new(id)
    }

    /// A builder pre-populated with this record's values.
    pub fn copy_of_builder(&self) -> BuildStep {
        BuildStep {
            id: Some(self.id.clone()),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn id(&self) -> &ModelId {
        &self.id
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Model for Warehouse {
    const SCHEMA: ModelSchema = ModelSchema {
        name: "Warehouse",
        plural_name: "Warehouses",
        fields: &[
            ModelField::required("id", FieldType::Id),
            ModelField::read_only("createdAt"),
            ModelField::read_only("updatedAt"),
        ],
    };

    fn id(&self) -> &ModelId {
        &self.id
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// Final builder step: optional fields, overrides and `build()`.
#[derive(Debug, Clone)]
#[must_use]
pub struct BuildStep {
    id: Option<ModelId>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl BuildStep {
    fn blank() -> Self {
        Self {
            id: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Use an explicit id instead of a generated one.
    pub fn id(mut self, id: impl Into<ModelId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn build(self) -> Warehouse {
        Warehouse {
            id: self.id.unwrap_or_else(ModelId::random),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
