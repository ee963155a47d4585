//! `Product` model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderapp_core::{FieldType, Model, ModelField, ModelId, ModelRef, ModelSchema, QueryField};

/// A catalog product.
///
/// ```compile_fail
/// use orderapp_models::Product;
///
/// let product = Product::builder().id("P3001").build();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    id: ModelId,
    name: String,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl Product {
    pub const ID: QueryField = QueryField::new("Product", "id");
    pub const NAME: QueryField = QueryField::new("Product", "name");

    pub fn builder() -> NameStep {
        NameStep(BuildStep::blank())
    }

    /// Reference an existing product by id. Not usable for creating records.
    pub fn just_id(id: impl Into<ModelId>) -> ModelRef<Product> {
        ModelRef::new(id)
    }

    /// A builder pre-populated with this record's values.
    pub fn copy_of_builder(&self) -> BuildStep {
        BuildStep {
            id: Some(self.id.clone()),
            name: self.name.clone(),
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

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Model for Product {
    const SCHEMA: ModelSchema = ModelSchema {
        name: "Product",
        plural_name: "Products",
        fields: &[
            ModelField::required("id", FieldType::Id),
            ModelField::required("name", FieldType::String),
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
    pub fn name(self, name: impl Into<String>) -> BuildStep {
        BuildStep {
            name: name.into(),
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
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl BuildStep {
    fn blank() -> Self {
        Self {
            id: None,
            name: String::new(),
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

    pub fn build(self) -> Product {
        Product {
            id: self.id.unwrap_or_else(ModelId::random),
            name: self.name,
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

    #[test]
    fn builds_with_natural_key() {
        let product = Product::builder().name("Product3001").id("P3001").build();
        assert_eq!(product.id().as_str(), "P3001");
        assert_eq!(product.name(), "Product3001");
    }

    #[test]
    fn build_generates_distinct_uuids() {
        let a = Product::builder().name("Product3001").build();
        let b = Product::builder().name("Product3001").build();
        assert!(a.id().is_uuid());
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
    }

    #[test]
    fn copy_of_builder_overrides_single_field() {
        let product = stamped(&Product::builder().name("Product3001").build(), at(1), at(2));
        assert_eq!(product.copy_of_builder().build(), product);

        let renamed = product.copy_of_builder().name("Product3002").build();
        assert_eq!(renamed.name(), "Product3002");
        assert_eq!(renamed.id(), product.id());
        assert_eq!(renamed.created_at(), product.created_at());
        assert_eq!(renamed.updated_at(), product.updated_at());
        assert_ne!(renamed, product);
    }

    #[test]
    fn just_id_carries_only_the_id() {
        let r = Product::just_id("P3001");
        assert_eq!(r.id().as_str(), "P3001");
        assert_eq!(r.model_name(), "Product");
        assert_eq!(Product::builder().name("Product3001").id("P3001").build().reference(), r);
    }

    #[test]
    fn decoding_without_name_fails() {
        let mut json = to_json(&Product::builder().name("Product1").build()).unwrap();
        json.as_object_mut().unwrap().remove("name");
        let err = from_json::<Product>(json).unwrap_err();
        assert!(err.to_string().contains("Product"));
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn equality_is_structural(
                name in "[A-Za-z][A-Za-z0-9]{0,20}",
                other in "[A-Za-z][A-Za-z0-9]{0,20}",
                created in 0i64..2_000_000_000,
                later in 1i64..1_000_000,
            ) {
                let build = || Product::builder().name(name.clone()).id("P1").build();
                prop_assert_eq!(build(), build());

                let renamed = build().copy_of_builder().name(other.clone()).build();
                prop_assert_eq!(renamed == build(), other == name);

                let saved = stamped(&build(), at(created), at(created));
                prop_assert_eq!(saved.copy_of_builder().build(), saved.clone());
                prop_assert_ne!(stamped(&build(), at(created), at(created + later)), saved);
            }
        }
    }
}
