//! `Blog` model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderapp_core::{FieldType, Model, ModelField, ModelId, ModelRef, ModelSchema, QueryField, Time};

/// A blog entry.
///
/// ```
/// use orderapp_models::Blog;
///
/// let blog = Blog::builder().name("new blog 7").build();
/// assert!(blog.id().is_uuid());
/// assert_eq!(blog.aws_time_value(), None);
/// ```
///
/// `name` is required, so a builder without it has no `build()`:
///
/// ```compile_fail
/// use orderapp_models::Blog;
///
/// let blog = Blog::builder().build();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    id: ModelId,
    name: String,
    #[serde(default)]
    aws_time_value: Option<Time>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl Blog {
    pub const ID: QueryField = QueryField::new("Blog", "id");
    pub const NAME: QueryField = QueryField::new("Blog", "name");
    pub const AWS_TIME_VALUE: QueryField = QueryField::new("Blog", "awsTimeValue");

    pub fn builder() -> NameStep {
        NameStep(BuildStep::blank())
    }

    /// Reference an existing blog by id.
    ///
    /// Not a substitute for a full record: the result can be deleted or used
    /// as a foreign key, but not saved.
    pub fn just_id(id: impl Into<ModelId>) -> ModelRef<Blog> {
        ModelRef::new(id)
    }

    /// A builder pre-populated with this record's values.
    pub fn copy_of_builder(&self) -> BuildStep {
        BuildStep {
            id: Some(self.id.clone()),
            name: self.name.clone(),
            aws_time_value: self.aws_time_value,
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

    pub fn aws_time_value(&self) -> Option<Time> {
        self.aws_time_value
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Model for Blog {
    const SCHEMA: ModelSchema = ModelSchema {
        name: "Blog",
        plural_name: "Blogs",
        fields: &[
            ModelField::required("id", FieldType::Id),
            ModelField::required("name", FieldType::String),
            ModelField::optional("awsTimeValue", FieldType::AwsTime),
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

/// First builder step: `name`.
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

/// Final builder step: optional fields and `build()`.
#[derive(Debug, Clone)]
#[must_use]
pub struct BuildStep {
    id: Option<ModelId>,
    name: String,
    aws_time_value: Option<Time>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl BuildStep {
    fn blank() -> Self {
        Self {
            id: None,
            name: String::new(),
            aws_time_value: None,
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

    pub fn aws_time_value(mut self, aws_time_value: impl Into<Option<Time>>) -> Self {
        self.aws_time_value = aws_time_value.into();
        self
    }

    pub fn build(self) -> Blog {
        Blog {
            id: self.id.unwrap_or_else(ModelId::random),
            name: self.name,
            aws_time_value: self.aws_time_value,
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

    fn sample_time() -> Time {
        "21:37:56.955359000".parse().unwrap()
    }

    #[test]
    fn build_generates_distinct_uuids() {
        let a = Blog::builder().name("blog1").build();
        let b = Blog::builder().name("blog1").build();
        assert!(a.id().is_uuid());
        assert!(b.id().is_uuid());
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
    }

    #[test]
    fn explicit_id_is_kept() {
        let blog = Blog::builder().name("blog1").id("35011").build();
        assert_eq!(blog.id().as_str(), "35011");
        assert_eq!(blog.created_at(), None);
        assert_eq!(blog.updated_at(), None);
    }

    #[test]
    fn copy_of_builder_without_overrides_is_equal() {
        let blog = stamped(
            &Blog::builder().name("blog1").aws_time_value(sample_time()).build(),
            at(1_650_000_000),
            at(1_650_000_060),
        );

        let copy = blog.copy_of_builder().build();
        assert_eq!(copy, blog);
        assert_eq!(copy.created_at(), blog.created_at());
    }

    #[test]
    fn copy_of_builder_overrides_single_field() {
        let blog = Blog::builder().name("blog1").aws_time_value(sample_time()).build();
        let renamed = blog.copy_of_builder().name("blog2").build();

        assert_eq!(renamed.name(), "blog2");
        assert_eq!(renamed.id(), blog.id());
        assert_eq!(renamed.aws_time_value(), blog.aws_time_value());
        assert_ne!(renamed, blog);

        let cleared = blog.copy_of_builder().aws_time_value(None).build();
        assert_eq!(cleared.aws_time_value(), None);
        assert_eq!(cleared.name(), "blog1");
    }

    #[test]
    fn just_id_carries_only_the_id() {
        let r = Blog::just_id("35012");
        assert_eq!(r.id().as_str(), "35012");
        assert_eq!(r.model_name(), "Blog");
        assert_eq!(Blog::builder().name("x").id("35012").build().reference(), r);
    }

    #[test]
    fn json_form_uses_camel_case() {
        let blog = Blog::builder()
            .name("blog1")
            .id("b1")
            .aws_time_value(sample_time())
            .build();
        let json = to_json(&blog).unwrap();
        assert_eq!(json["awsTimeValue"], "21:37:56.955359");
        assert_eq!(json["name"], "blog1");
        assert_eq!(from_json::<Blog>(json).unwrap(), blog);
    }

    #[test]
    fn decoding_without_required_name_fails() {
        let err = from_json::<Blog>(serde_json::json!({ "id": "b1" })).unwrap_err();
        assert!(err.to_string().contains("Blog"));
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Identical inputs build equal records; changing the name or a
            /// timestamp breaks equality.
            #[test]
            fn equality_is_structural(
                id in "[a-z0-9]{1,12}",
                name in "[A-Za-z][A-Za-z0-9 ]{0,40}",
                other in "[A-Za-z][A-Za-z0-9 ]{0,40}",
                created in 0i64..2_000_000_000,
                later in 1i64..1_000_000,
            ) {
                let a = Blog::builder().name(name.clone()).id(id.clone()).build();
                let b = Blog::builder().name(name.clone()).id(id.clone()).build();
                prop_assert_eq!(&a, &b);

                let c = a.copy_of_builder().name(other.clone()).build();
                prop_assert_eq!(c == a, other == name);

                let saved = stamped(&a, at(created), at(created));
                prop_assert_eq!(saved.copy_of_builder().build(), saved.clone());
                prop_assert_ne!(&saved, &a);
                prop_assert_ne!(stamped(&a, at(created), at(created + later)), saved);
            }
        }
    }
}
