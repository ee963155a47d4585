//! `Employee` model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderapp_core::{FieldType, Model, ModelField, ModelId, ModelRef, ModelSchema, QueryField};

/// A warehouse employee.
///
/// ```compile_fail
/// use orderapp_models::Employee;
///
/// let employee = Employee::builder()
///     .name("Employee3001")
///     .start_date("2022-01-20")
///     .phone_number("123-456-7890")
///     .warehouse_id("WareHouse3001")
///     .job_title("Helper")
///     .build();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    id: ModelId,
    name: String,
    start_date: String,
    phone_number: String,
    warehouse_id: String,
    job_title: String,
    new_hire: String,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl Employee {
    pub const ID: QueryField = QueryField::new("Employee", "id");
    pub const NAME: QueryField = QueryField::new("Employee", "name");
    pub const START_DATE: QueryField = QueryField::new("Employee", "startDate");
    pub const PHONE_NUMBER: QueryField = QueryField::new("Employee", "phoneNumber");
    pub const WAREHOUSE_ID: QueryField = QueryField::new("Employee", "warehouseId");
    pub const JOB_TITLE: QueryField = QueryField::new("Employee", "jobTitle");
    pub const NEW_HIRE: QueryField = QueryField::new("Employee", "newHire");

    pub fn builder() -> NameStep {
        NameStep(BuildStep::blank())
    }

    /// Reference an existing employee by id. Not usable for creating records.
    pub fn just_id(id: impl Into<ModelId>) -> ModelRef<Employee> {
        ModelRef::new(id)
    }

    /// A builder pre-populated with this record's values.
    pub fn copy_of_builder(&self) -> BuildStep {
        BuildStep {
            id: Some(self.id.clone()),
            name: self.name.clone(),
            start_date: self.start_date.clone(),
            phone_number: self.phone_number.clone(),
            warehouse_id: self.warehouse_id.clone(),
            job_title: self.job_title.clone(),
            new_hire: self.new_hire.clone(),
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

    pub fn start_date(&self) -> &str {
        &self.start_date
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn warehouse_id(&self) -> &str {
        &self.warehouse_id
    }

    pub fn job_title(&self) -> &str {
        &self.job_title
    }

    pub fn new_hire(&self) -> &str {
        &self.new_hire
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Model for Employee {
    const SCHEMA: ModelSchema = ModelSchema {
        name: "Employee",
        plural_name: "Employees",
        fields: &[
            ModelField::required("id", FieldType::Id),
            ModelField::required("name", FieldType::String),
            ModelField::required("startDate", FieldType::String),
            ModelField::required("phoneNumber", FieldType::String),
            ModelField::required("warehouseId", FieldType::String),
            ModelField::required("jobTitle", FieldType::String),
            ModelField::required("newHire", FieldType::String),
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
    pub fn name(self, name: impl Into<String>) -> StartDateStep {
        StartDateStep(BuildStep {
            name: name.into(),
            ..self.0
        })
    }
}

/// Builder step: `start_date`.
#[derive(Debug)]
#[must_use]
pub struct StartDateStep(BuildStep);

impl StartDateStep {
    pub fn start_date(self, start_date: impl Into<String>) -> PhoneNumberStep {
        PhoneNumberStep(BuildStep {
            start_date: start_date.into(),
            ..self.0
        })
    }
}

/// Builder step: `phone_number`.
#[derive(Debug)]
#[must_use]
pub struct PhoneNumberStep(BuildStep);

impl PhoneNumberStep {
    pub fn phone_number(self, phone_number: impl Into<String>) -> WarehouseIdStep {
        WarehouseIdStep(BuildStep {
            phone_number: phone_number.into(),
            ..self.0
        })
    }
}

/// Builder step: `warehouse_id`.
#[derive(Debug)]
#[must_use]
pub struct WarehouseIdStep(BuildStep);

impl WarehouseIdStep {
    pub fn warehouse_id(self, warehouse_id: impl Into<String>) -> JobTitleStep {
        JobTitleStep(BuildStep {
            warehouse_id: warehouse_id.into(),
            ..self.0
        })
    }
}

/// Builder step: `job_title`.
#[derive(Debug)]
#[must_use]
pub struct JobTitleStep(BuildStep);

impl JobTitleStep {
    pub fn job_title(self, job_title: impl Into<String>) -> NewHireStep {
        NewHireStep(BuildStep {
            job_title: job_title.into(),
            ..self.0
        })
    }
}

/// Builder step: `new_hire`.
#[derive(Debug)]
#[must_use]
pub struct NewHireStep(BuildStep);

impl NewHireStep {
    pub fn new_hire(self, new_hire: impl Into<String>) -> BuildStep {
        BuildStep {
            new_hire: new_hire.into(),
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
    start_date: String,
    phone_number: String,
    warehouse_id: String,
    job_title: String,
    new_hire: String,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl BuildStep {
    fn blank() -> Self {
        Self {
            id: None,
            name: String::new(),
            start_date: String::new(),
            phone_number: String::new(),
            warehouse_id: String::new(),
            job_title: String::new(),
            new_hire: String::new(),
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

    pub fn start_date(mut self, start_date: impl Into<String>) -> Self {
        self.start_date = start_date.into();
        self
    }

    pub fn phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = phone_number.into();
        self
    }

    pub fn warehouse_id(mut self, warehouse_id: impl Into<String>) -> Self {
        self.warehouse_id = warehouse_id.into();
        self
    }

    pub fn job_title(mut self, job_title: impl Into<String>) -> Self {
        self.job_title = job_title.into();
        self
    }

    pub fn new_hire(mut self, new_hire: impl Into<String>) -> Self {
        self.new_hire = new_hire.into();
        self
    }

    pub fn build(self) -> Employee {
        Employee {
            id: self.id.unwrap_or_else(ModelId::random),
            name: self.name,
            start_date: self.start_date,
            phone_number: self.phone_number,
            warehouse_id: self.warehouse_id,
            job_title: self.job_title,
            new_hire: self.new_hire,
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

    fn sample() -> Employee {
        Employee::builder()
            .name("Employee3001")
            .start_date("2022-01-20")
            .phone_number("123-456-7890")
            .warehouse_id("WareHouse3001")
            .job_title("Helper")
            .new_hire("no")
            .build()
    }

    #[test]
    fn six_required_steps() {
        let employee = sample().copy_of_builder().id("3001").build();

        assert_eq!(employee.id().as_str(), "3001");
        assert_eq!(employee.job_title(), "Helper");
        assert_eq!(employee.new_hire(), "no");
        assert_eq!(employee.warehouse_id(), "WareHouse3001");

        let json = to_json(&employee).unwrap();
        assert_eq!(json["startDate"], "2022-01-20");
        assert_eq!(json["newHire"], "no");
    }

    #[test]
    fn build_generates_distinct_uuids() {
        let (a, b) = (sample(), sample());
        assert!(a.id().is_uuid());
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
    }

    #[test]
    fn copy_of_builder_overrides_single_field() {
        let employee = stamped(&sample(), at(1), at(2));
        assert_eq!(employee.copy_of_builder().build(), employee);

        let promoted = employee.copy_of_builder().job_title("Lead").build();
        assert_eq!(promoted.job_title(), "Lead");
        assert_eq!(promoted.id(), employee.id());
        assert_eq!(promoted.name(), employee.name());
        assert_eq!(promoted.start_date(), employee.start_date());
        assert_eq!(promoted.phone_number(), employee.phone_number());
        assert_eq!(promoted.warehouse_id(), employee.warehouse_id());
        assert_eq!(promoted.new_hire(), employee.new_hire());
        assert_eq!(promoted.created_at(), employee.created_at());
        assert_ne!(promoted, employee);
    }

    #[test]
    fn just_id_carries_only_the_id() {
        let r = Employee::just_id("3001");
        assert_eq!(r.id().as_str(), "3001");
        assert_eq!(r.model_name(), "Employee");
        assert_eq!(sample().copy_of_builder().id("3001").build().reference(), r);
    }

    #[test]
    fn decoding_without_job_title_fails() {
        let mut json = to_json(&sample()).unwrap();
        json.as_object_mut().unwrap().remove("jobTitle");
        let err = from_json::<Employee>(json).unwrap_err();
        assert!(err.to_string().contains("Employee"));
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn equality_is_structural(
                title in "[A-Za-z]{1,16}",
                other in "[A-Za-z]{1,16}",
                created in 0i64..2_000_000_000,
                later in 1i64..1_000_000,
            ) {
                let build = || sample().copy_of_builder().id("3001").job_title(title.clone()).build();
                prop_assert_eq!(build(), build());

                let moved = build().copy_of_builder().job_title(other.clone()).build();
                prop_assert_eq!(moved == build(), other == title);

                let saved = stamped(&build(), at(created), at(created));
                prop_assert_eq!(saved.copy_of_builder().build(), saved.clone());
                prop_assert_ne!(stamped(&build(), at(created), at(created + later)), saved);
            }
        }
    }
}
