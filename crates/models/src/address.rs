//! `Address` model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderapp_core::{FieldType, Model, ModelField, ModelId, ModelRef, ModelSchema, QueryField};

/// A postal address belonging to a customer.
///
/// ```
/// use orderapp_models::Address;
///
/// let address = Address::builder()
///     .address("123 Street")
///     .city("city")
///     .state("State")
///     .customer_id("c3001")
///     .build();
/// assert_eq!(address.customer_id(), "c3001");
/// ```
///
/// Every field but the id is required; stopping early leaves no `build()`:
///
/// ```compile_fail
/// use orderapp_models::Address;
///
/// let address = Address::builder().address("123 Street").city("city").state("State").build();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    id: ModelId,
    address: String,
    city: String,
    state: String,
    customer_id: String,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl Address {
    pub const ID: QueryField = QueryField::new("Address", "id");
    pub const ADDRESS: QueryField = QueryField::new("Address", "address");
    pub const CITY: QueryField = QueryField::new("Address", "city");
    pub const STATE: QueryField = QueryField::new("Address", "state");
    pub const CUSTOMER_ID: QueryField = QueryField::new("Address", "customerId");

    pub fn builder() -> AddressStep {
        AddressStep(BuildStep::blank())
    }

    /// Reference an existing address by id. Not usable for creating records.
    pub fn just_id(id: impl Into<ModelId>) -> ModelRef<Address> {
        ModelRef::new(id)
    }

    /// A builder pre-populated with this record's values.
    pub fn copy_of_builder(&self) -> BuildStep {
        BuildStep {
            id: Some(self.id.clone()),
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            customer_id: self.customer_id.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn id(&self) -> &ModelId {
        &self.id
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Model for Address {
    const SCHEMA: ModelSchema = ModelSchema {
        name: "Address",
        plural_name: "Addresses",
        fields: &[
            ModelField::required("id", FieldType::Id),
            ModelField::required("address", FieldType::String),
            ModelField::required("city", FieldType::String),
            ModelField::required("state", FieldType::String),
            ModelField::required("customerId", FieldType::String),
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

/// Builder step: `address`.
#[derive(Debug)]
#[must_use]
pub struct AddressStep(BuildStep);

impl AddressStep {
    pub fn address(self, address: impl Into<String>) -> CityStep {
        CityStep(BuildStep {
            address: address.into(),
            ..self.0
        })
    }
}

/// Builder step: `city`.
#[derive(Debug)]
#[must_use]
pub struct CityStep(BuildStep);

impl CityStep {
    pub fn city(self, city: impl Into<String>) -> StateStep {
        StateStep(BuildStep {
            city: city.into(),
            ..self.0
        })
    }
}

/// Builder step: `state`.
#[derive(Debug)]
#[must_use]
pub struct StateStep(BuildStep);

impl StateStep {
    pub fn state(self, state: impl Into<String>) -> CustomerIdStep {
        CustomerIdStep(BuildStep {
            state: state.into(),
            ..self.0
        })
    }
}

/// Builder step: `customer_id`.
#[derive(Debug)]
#[must_use]
pub struct CustomerIdStep(BuildStep);

impl CustomerIdStep {
    pub fn customer_id(self, customer_id: impl Into<String>) -> BuildStep {
        BuildStep {
            customer_id: customer_id.into(),
            ..self.0
        }
    }
}

/// Final builder step: optional fields, overrides and `build()`.
#[derive(Debug, Clone)]
#[must_use]
pub struct BuildStep {
    id: Option<ModelId>,
    address: String,
    city: String,
    state: String,
    customer_id: String,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl BuildStep {
    fn blank() -> Self {
        Self {
            id: None,
            address: String::new(),
            city: String::new(),
            state: String::new(),
            customer_id: String::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Use an explicit id instead of a generated one.
    pub fn id(mut self, id: impl Into<ModelId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    pub fn customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = customer_id.into();
        self
    }

    pub fn build(self) -> Address {
        Address {
            id: self.id.unwrap_or_else(ModelId::random),
            address: self.address,
            city: self.city,
            state: self.state,
            customer_id: self.customer_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
