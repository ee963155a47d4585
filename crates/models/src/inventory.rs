//! `Inventory` model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderapp_core::{FieldType, Model, ModelField, ModelId, ModelRef, ModelSchema, QueryField};

/// Stock of one product held in one warehouse.
///
/// ```
/// use orderapp_models::Inventory;
///
/// let stock = Inventory::builder()
///     .product_id("P3001")
///     .warehouse_id("WareHouse3001")
///     .inventory_amount(100)
///     .build();
/// assert_eq!(stock.inventory_amount(), 100);
/// ```
///
/// ```compile_fail
/// use orderapp_models::Inventory;
///
/// let stock = Inventory::builder().product_id("P3001").warehouse_id("WareHouse3001").build();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    id: ModelId,
    product_id: String,
    warehouse_id: String,
    inventory_amount: i32,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl Inventory {
    pub const ID: QueryField = QueryField::new("Inventory", "id");
    pub const PRODUCT_ID: QueryField = QueryField::new("Inventory", "productId");
    pub const WAREHOUSE_ID: QueryField = QueryField::new("Inventory", "warehouseId");
    pub const INVENTORY_AMOUNT: QueryField = QueryField::new("Inventory", "inventoryAmount");

    pub fn builder() -> ProductIdStep {
        ProductIdStep(BuildStep::blank())
    }

    /// Reference an existing inventory by id. Not usable for creating records.
    pub fn just_id(id: impl Into<ModelId>) -> ModelRef<Inventory> {
        ModelRef::new(id)
    }

    /// A builder pre-populated with this record's values.
    pub fn copy_of_builder(&self) -> BuildStep {
        BuildStep {
            id: Some(self.id.clone()),
            product_id: self.product_id.clone(),
            warehouse_id: self.warehouse_id.clone(),
            inventory_amount: self.inventory_amount,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn id(&self) -> &ModelId {
        &self.id
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn warehouse_id(&self) -> &str {
        &self.warehouse_id
    }

    pub fn inventory_amount(&self) -> i32 {
        self.inventory_amount
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Model for Inventory {
    const SCHEMA: ModelSchema = ModelSchema {
        name: "Inventory",
        plural_name: "Inventories",
        fields: &[
            ModelField::required("id", FieldType::Id),
            ModelField::required("productId", FieldType::String),
            ModelField::required("warehouseId", FieldType::String),
            ModelField::required("inventoryAmount", FieldType::Int),
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

/// Builder step: `product_id`.
#[derive(Debug)]
#[must_use]
pub struct ProductIdStep(BuildStep);

impl ProductIdStep {
    pub fn product_id(self, product_id: impl Into<String>) -> WarehouseIdStep {
        WarehouseIdStep(BuildStep {
            product_id: product_id.into(),
            ..self.0
        })
    }
}

/// Builder step: `warehouse_id`.
#[derive(Debug)]
#[must_use]
pub struct WarehouseIdStep(BuildStep);

impl WarehouseIdStep {
    pub fn warehouse_id(self, warehouse_id: impl Into<String>) -> InventoryAmountStep {
        InventoryAmountStep(BuildStep {
            warehouse_id: warehouse_id.into(),
            ..self.0
        })
    }
}

/// Builder step: `inventory_amount`.
#[derive(Debug)]
#[must_use]
pub struct InventoryAmountStep(BuildStep);

impl InventoryAmountStep {
    pub fn inventory_amount(self, inventory_amount: i32) -> BuildStep {
        BuildStep {
            inventory_amount,
            ..self.0
        }
    }
}

/// Final builder step: optional fields, overrides and `build()`.
#[derive(Debug, Clone)]
#[must_use]
pub struct BuildStep {
    id: Option<ModelId>,
    product_id: String,
    warehouse_id: String,
    inventory_amount: i32,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl BuildStep {
    fn blank() -> Self {
        Self {
            id: None,
            product_id: String::new(),
            warehouse_id: String::new(),
            inventory_amount: 0,
            created_at: None,
            updated_at: None,
        }
    }

    /// Use an explicit id instead of a generated one.
    pub fn id(mut self, id: impl Into<ModelId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = product_id.into();
        self
    }

    pub fn warehouse_id(mut self, warehouse_id: impl Into<String>) -> Self {
        self.warehouse_id = warehouse_id.into();
        self
    }

    pub fn inventory_amount(mut self, inventory_amount: i32) -> Self {
        self.inventory_amount = inventory_amount;
        self
    }

    pub fn build(self) -> Inventory {
        Inventory {
            id: self.id.unwrap_or_else(ModelId::random),
            product_id: self.product_id,
            warehouse_id: self.warehouse_id,
            inventory_amount: self.inventory_amount,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
