//! `Customer` model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderapp_core::{FieldType, Model, ModelField, ModelId, ModelRef, ModelSchema, QueryField};

/// A customer, owned by an account representative.
///
/// ```compile_fail
/// use orderapp_models::Customer;
///
/// // `account_representative_id` is required.
/// let customer = Customer::builder().name("Customer 3001").build();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    id: ModelId,
    name: String,
    account_representative_id: String,
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl Customer {
    pub const ID: QueryField = QueryField::new("Customer", "id");
    pub const NAME: QueryField = QueryField::new("Customer", "name");
    pub const ACCOUNT_REPRESENTATIVE_ID: QueryField = QueryField::new("Customer", "accountRepresentativeId");
    pub const PHONE_NUMBER: QueryField = QueryField::new("Customer", "phoneNumber");

    pub fn builder() -> NameStep {
        NameStep(BuildStep::blank())
    }

    /// Reference an existing customer by id. Not usable for creating records.
    pub fn just_id(id: impl Into<ModelId>) -> ModelRef<Customer> {
        ModelRef::new(id)
    }

    /// A builder pre-populated with this record's values.
    pub fn copy_of_builder(&self) -> BuildStep {
        BuildStep {
            id: Some(self.id.clone()),
            name: self.name.clone(),
            account_representative_id: self.account_representative_id.clone(),
            phone_number: self.phone_number.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn id(&self) -> &ModelId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn account_representative_id(&self) -> &str {
        &self.account_representative_id
    }

    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Model for Customer {
    const SCHEMA: ModelSchema = ModelSchema {
        name: "Customer",
        plural_name: "Customers",
        fields: &[
            ModelField::required("id", FieldType::Id),
            ModelField::required("name", FieldType::String),
            ModelField::required("accountRepresentativeId", FieldType::String),
            ModelField::optional("phoneNumber", FieldType::String),
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

/// Builder step: `name`.
#[derive(Debug)]
#[must_use]
pub struct NameStep(BuildStep);

impl NameStep {
    pub fn name(self, name: impl Into<String>) -> AccountRepresentativeIdStep {
        AccountRepresentativeIdStep(BuildStep {
            name: name.into(),
            ..self.0
        })
    }
}

/// Builder step: `account_representative_id`.
#[derive(Debug)]
#[must_use]
pub struct AccountRepresentativeIdStep(BuildStep);

impl AccountRepresentativeIdStep {
    pub fn account_representative_id(self, account_representative_id: impl Into<String>) -> BuildStep {
        BuildStep {
            account_representative_id: account_representative_id.into(),
            ..self.0
        }
    }
}

/// Final builder step: optional fields, overrides and `build()`.
#[derive(Debug, Clone)]
#[must_use]
pub struct BuildStep {
    id: Option<ModelId>,
    name: String,
    account_representative_id: String,
    phone_number: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl BuildStep {
    fn blank() -> Self {
        Self {
            id: None,
            name: String::new(),
            account_representative_id: String::new(),
            phone_number: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Use an explicit id instead of a generated one.
    pub fn id(mut self, id: impl Into<ModelId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn account_representative_id(mut self, account_representative_id: impl Into<String>) -> Self {
        self.account_representative_id = account_representative_id.into();
        self
    }

    pub fn phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    pub fn build(self) -> Customer {
        Customer {
            id: self.id.unwrap_or_else(ModelId::random),
            name: self.name,
            account_representative_id: self.account_representative_id,
            phone_number: self.phone_number,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{at, stamped};
    use orderapp_core::model::{from_json, to_json};

    fn sample() -> Customer {
        Customer::builder()
            .name("Customer 3001")
            .account_representative_id("AR3001")
            .build()
    }

    #[test]
    fn build_generates_distinct_uuids() {
        let (a, b) = (sample(), sample());
        assert!(a.id().is_uuid());
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
    }

    #[test]
    fn phone_number_is_optional() {
        let customer = sample().copy_of_builder().id("c3001").build();
        assert_eq!(customer.phone_number(), None);

        let with_phone = customer.copy_of_builder().phone_number("123-456-7890").build();
        assert_eq!(with_phone.phone_number(), Some("123-456-7890"));
        assert_eq!(with_phone.name(), "Customer 3001");
        assert_eq!(with_phone.account_representative_id(), "AR3001");
        assert_eq!(with_phone.id(), customer.id());
        assert_ne!(with_phone, customer);
    }

    #[test]
    fn copy_of_builder_keeps_timestamps() {
        let customer = stamped(&sample(), at(10), at(20));
        let copy = customer.copy_of_builder().build();
        assert_eq!(copy, customer);
        assert_eq!(copy.created_at(), Some(at(10)));
        assert_eq!(copy.updated_at(), Some(at(20)));
    }

    #[test]
    fn just_id_carries_only_the_id() {
        let r = Customer::just_id("c3001");
        assert_eq!(r.id().as_str(), "c3001");
        assert_eq!(r.model_name(), "Customer");
        assert_eq!(sample().copy_of_builder().id("c3001").build().reference(), r);
    }

    #[test]
    fn missing_account_representative_is_rejected_on_decode() {
        let mut json = to_json(&sample()).unwrap();
        json.as_object_mut().unwrap().remove("accountRepresentativeId");
        let err = from_json::<Customer>(json).unwrap_err();
        assert!(err.to_string().contains("Customer"));
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Equal inputs give equal records; another representative or a
            /// different `createdAt` does not.
            #[test]
            fn equality_is_structural(
                name in "[A-Za-z][A-Za-z0-9 ]{0,30}",
                rep in "AR[0-9]{1,5}",
                other in "AR[0-9]{1,5}",
                created in 0i64..2_000_000_000,
                earlier in 1i64..1_000_000,
            ) {
                let build = || {
                    Customer::builder()
                        .name(name.clone())
                        .account_representative_id(rep.clone())
                        .id("c1")
                        .build()
                };
                prop_assert_eq!(build(), build());

                let moved = build().copy_of_builder().account_representative_id(other.clone()).build();
                prop_assert_eq!(moved == build(), other == rep);
                prop_assert_eq!(moved.name(), name.as_str());

                let saved = stamped(&build(), at(created), at(created));
                prop_assert_eq!(saved.copy_of_builder().build(), saved.clone());
                prop_assert_ne!(stamped(&build(), at(created - earlier), at(created)), saved);
            }
        }
    }
}
