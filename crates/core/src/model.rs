//! The `Model` trait: identity, schema metadata and store-managed timestamps.

use core::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::error::{ModelError, ModelResult};
use crate::id::ModelId;

/// Scalar type of a model field, as declared in the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Id,
    String,
    Int,
    AwsTime,
    AwsDateTime,
}

/// Static description of one model field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelField {
    /// Serialized (camelCase) field name.
    pub name: &'static str,
    pub target_type: FieldType,
    pub required: bool,
    /// Assigned by the store, never by the record.
    pub read_only: bool,
}

impl ModelField {
    pub const fn required(name: &'static str, target_type: FieldType) -> Self {
        Self {
            name,
            target_type,
            required: true,
            read_only: false,
        }
    }

    pub const fn optional(name: &'static str, target_type: FieldType) -> Self {
        Self {
            name,
            target_type,
            required: false,
            read_only: false,
        }
    }

    pub const fn read_only(name: &'static str) -> Self {
        Self {
            name,
            target_type: FieldType::AwsDateTime,
            required: false,
            read_only: true,
        }
    }
}

/// Static description of a model type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSchema {
    pub name: &'static str,
    pub plural_name: &'static str,
    pub fields: &'static [ModelField],
}

impl ModelSchema {
    pub fn field(&self, name: &str) -> Option<&ModelField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &ModelField> {
        self.fields.iter().filter(|f| f.required)
    }
}

/// An immutable, serializable record that a data store can persist.
///
/// Equality is structural over every field, timestamps included. Records are
/// never mutated in place: updates go through `copy_of_builder()` on the
/// concrete type, which produces a new record.
pub trait Model:
    Clone + core::fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const SCHEMA: ModelSchema;

    fn id(&self) -> &ModelId;

    /// When the store first persisted this record.
    fn created_at(&self) -> Option<DateTime<Utc>>;

    /// When the store last persisted this record.
    fn updated_at(&self) -> Option<DateTime<Utc>>;

    /// A reference-only handle to this record.
    fn reference(&self) -> ModelRef<Self> {
        ModelRef::new(self.id().clone())
    }
}

/// Serialize a record into its JSON object form.
pub fn to_json<M: Model>(model: &M) -> ModelResult<JsonValue> {
    serde_json::to_value(model).map_err(|e| ModelError::malformed(M::SCHEMA.name, e.to_string()))
}

/// Decode a record from its JSON object form.
///
/// Fails when a required field is absent or has the wrong type.
pub fn from_json<M: Model>(value: JsonValue) -> ModelResult<M> {
    serde_json::from_value(value).map_err(|e| ModelError::malformed(M::SCHEMA.name, e.to_string()))
}

/// Reference-only form of a record: just its identifier.
///
/// Use it to delete an existing record or to point at one from another
/// record. It is a distinct type from `M`, so it can never be handed to a
/// store's `save`.
pub struct ModelRef<M> {
    id: ModelId,
    _model: PhantomData<fn() -> M>,
}

impl<M> ModelRef<M> {
    pub fn new(id: impl Into<ModelId>) -> Self {
        Self {
            id: id.into(),
            _model: PhantomData,
        }
    }

    pub fn id(&self) -> &ModelId {
        &self.id
    }

    pub fn into_id(self) -> ModelId {
        self.id
    }
}

impl<M: Model> ModelRef<M> {
    pub fn model_name(&self) -> &'static str {
        M::SCHEMA.name
    }
}

impl<M> Clone for ModelRef<M> {
    fn clone(&self) -> Self {
        Self::new(self.id.clone())
    }
}

impl<M> PartialEq for ModelRef<M> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<M> Eq for ModelRef<M> {}

impl<M> core::fmt::Debug for ModelRef<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ModelRef")
            .field("model", &core::any::type_name::<M>())
            .field("id", &self.id)
            .finish()
    }
}

impl<M: Model> From<&M> for ModelRef<M> {
    fn from(model: &M) -> Self {
        model.reference()
    }
}
