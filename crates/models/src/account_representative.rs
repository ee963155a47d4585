//! `AccountRepresentative` model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderapp_core::{FieldType, Model, ModelField, ModelId, ModelRef, ModelSchema, QueryField};

/// A sales account representative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRepresentative {
    id: ModelId,
    #[serde(default)]
    order_total: Option<i32>,
    #[serde(default)]
    sales_period: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl AccountRepresentative {
    pub const ID: QueryField = QueryField::new("AccountRepresentative", "id");
    pub const ORDER_TOTAL: QueryField = QueryField::new("AccountRepresentative", "orderTotal");
    pub const SALES_PERIOD: QueryField = QueryField::new("AccountRepresentative", "salesPeriod");

    pub fn builder() -> BuildStep {
        BuildStep::blank()
    }

    /// Reference an existing account representative by id. Not usable for creating records.
    pub fn just_id(id: impl Into<ModelId>) -> ModelRef<AccountRepresentative> {
        ModelRef::new(id)
    }

    /// A builder pre-populated with this record's values.
    pub fn copy_of_builder(&self) -> BuildStep {
        BuildStep {
            id: Some(self.id.clone()),
            order_total: self.order_total,
            sales_period: self.sales_period.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn id(&self) -> &ModelId {
        &self.id
    }

    pub fn order_total(&self) -> Option<i32> {
        self.order_total
    }

    pub fn sales_period(&self) -> Option<&str> {
        self.sales_period.as_deref()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Model for AccountRepresentative {
    const SCHEMA: ModelSchema = ModelSchema {
        name: "AccountRepresentative",
        plural_name: "AccountRepresentatives",
        fields: &[
            ModelField::required("id", FieldType::Id),
            ModelField::optional("orderTotal", FieldType::Int),
            ModelField::optional("salesPeriod", FieldType::String),
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
    order_total: Option<i32>,
    sales_period: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl BuildStep {
    fn blank() -> Self {
        Self {
            id: None,
            order_total: None,
            sales_period: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Use an explicit id instead of a generated one.
    pub fn id(mut self, id: impl Into<ModelId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn order_total(mut self, order_total: impl Into<Option<i32>>) -> Self {
        self.order_total = order_total.into();
        self
    }

    pub fn sales_period(mut self, sales_period: impl Into<String>) -> Self {
        self.sales_period = Some(sales_period.into());
        self
    }

    pub fn build(self) -> AccountRepresentative {
        AccountRepresentative {
            id: self.id.unwrap_or_else(ModelId::random),
            order_total: self.order_total,
            sales_period: self.sales_period,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
