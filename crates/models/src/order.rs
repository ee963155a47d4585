//! `Order` model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderapp_core::{FieldType, Model, ModelField, ModelId, ModelRef, ModelSchema, QueryField, Time};

/// A customer order.
///
/// Required fields are set in this order: `customer_id`, `account_representative_id`,
/// `product_id`, `status`, `amount`, `date`.
///
/// ```
/// use orderapp_models::Order;
///
/// let order = Order::builder()
///     .customer_id("c1")
///     .account_representative_id("AR1")
///     .product_id("P1")
///     .status("InProcess")
///     .amount(10)
///     .date("2022-01-20")
///     .id("35011")
///     .build();
/// assert_eq!(order.amount(), 10);
/// ```
///
/// Skipping a required step leaves no way to reach `build()`:
///
/// ```compile_fail
/// use orderapp_models::Order;
///
/// let order = Order::builder()
///     .customer_id("c1")
///     .account_representative_id("AR1")
///     .product_id("P1")
///     .status("InProcess")
///     .amount(10)
///     .build();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    id: ModelId,
    customer_id: String,
    account_representative_id: String,
    product_id: String,
    status: String,
    amount: i32,
    date: String,
    #[serde(default)]
    aws_time_value: Option<Time>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl Order {
    pub const ID: QueryField = QueryField::new("Order", "id");
    pub const CUSTOMER_ID: QueryField = QueryField::new("Order", "customerId");
    pub const ACCOUNT_REPRESENTATIVE_ID: QueryField = QueryField::new("Order", "accountRepresentativeId");
    pub const PRODUCT_ID: QueryField = QueryField::new("Order", "productId");
    pub const STATUS: QueryField = QueryField::new("Order", "status");
    pub const AMOUNT: QueryField = QueryField::new("Order", "amount");
    pub const DATE: QueryField = QueryField::new("Order", "date");
    pub const AWS_TIME_VALUE: QueryField = QueryField::new("Order", "awsTimeValue");

    pub fn builder() -> CustomerIdStep {
        CustomerIdStep(BuildStep::blank())
    }

    /// Reference an existing order by id. Not usable for creating records.
    pub fn just_id(id: impl Into<ModelId>) -> ModelRef<Order> {
        ModelRef::new(id)
    }

    /// A builder pre-populated with this record's values.
    pub fn copy_of_builder(&self) -> BuildStep {
        BuildStep {
            id: Some(self.id.clone()),
            customer_id: self.customer_id.clone(),
            account_representative_id: self.account_representative_id.clone(),
            product_id: self.product_id.clone(),
            status: self.status.clone(),
            amount: self.amount,
            date: self.date.clone(),
            aws_time_value: self.aws_time_value,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn id(&self) -> &ModelId {
        &self.id
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn account_representative_id(&self) -> &str {
        &self.account_representative_id
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn amount(&self) -> i32 {
        self.amount
    }

    pub fn date(&self) -> &str {
        &self.date
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

impl Model for Order {
    const SCHEMA: ModelSchema = ModelSchema {
        name: "Order",
        plural_name: "Orders",
        fields: &[
            ModelField::required("id", FieldType::Id),
            ModelField::required("customerId", FieldType::String),
            ModelField::required("accountRepresentativeId", FieldType::String),
            ModelField::required("productId", FieldType::String),
            ModelField::required("status", FieldType::String),
            ModelField::required("amount", FieldType::Int),
            ModelField::required("date", FieldType::String),
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

/// Builder step: `customer_id`.
#[derive(Debug)]
#[must_use]
pub struct CustomerIdStep(BuildStep);

impl CustomerIdStep {
    pub fn customer_id(self, customer_id: impl Into<String>) -> AccountRepresentativeIdStep {
        AccountRepresentativeIdStep(BuildStep {
            customer_id: customer_id.into(),
            ..self.0
        })
    }
}

/// Builder step: `account_representative_id`.
#[derive(Debug)]
#[must_use]
pub struct AccountRepresentativeIdStep(BuildStep);

impl AccountRepresentativeIdStep {
    pub fn account_representative_id(self, account_representative_id: impl Into<String>) -> ProductIdStep {
        ProductIdStep(BuildStep {
            account_representative_id: account_representative_id.into(),
            ..self.0
        })
    }
}

/// Builder step: `product_id`.
#[derive(Debug)]
#[must_use]
pub struct ProductIdStep(BuildStep);

impl ProductIdStep {
    pub fn product_id(self, product_id: impl Into<String>) -> StatusStep {
        StatusStep(BuildStep {
            product_id: product_id.into(),
            ..self.0
        })
    }
}

/// Builder step: `status`.
#[derive(Debug)]
#[must_use]
pub struct StatusStep(BuildStep);

impl StatusStep {
    pub fn status(self, status: impl Into<String>) -> AmountStep {
        AmountStep(BuildStep {
            status: status.into(),
            ..self.0
        })
    }
}

/// Builder step: `amount`.
#[derive(Debug)]
#[must_use]
pub struct AmountStep(BuildStep);

impl AmountStep {
    pub fn amount(self, amount: i32) -> DateStep {
        DateStep(BuildStep {
            amount,
            ..self.0
        })
    }
}

/// Builder step: `date`.
#[derive(Debug)]
#[must_use]
pub struct DateStep(BuildStep);

impl DateStep {
    pub fn date(self, date: impl Into<String>) -> BuildStep {
        BuildStep {
            date: date.into(),
            ..self.0
        }
    }
}

/// Final builder step: optional fields, overrides and `build()`.
#[derive(Debug, Clone)]
#[must_use]
pub struct BuildStep {
    id: Option<ModelId>,
    customer_id: String,
    account_representative_id: String,
    product_id: String,
    status: String,
    amount: i32,
    date: String,
    aws_time_value: Option<Time>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl BuildStep {
    fn blank() -> Self {
        Self {
            id: None,
            customer_id: String::new(),
            account_representative_id: String::new(),
            product_id: String::new(),
            status: String::new(),
            amount: 0,
            date: String::new(),
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

    pub fn customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = customer_id.into();
        self
    }

    pub fn account_representative_id(mut self, account_representative_id: impl Into<String>) -> Self {
        self.account_representative_id = account_representative_id.into();
        self
    }

    pub fn product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = product_id.into();
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn amount(mut self, amount: i32) -> Self {
        self.amount = amount;
        self
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    pub fn aws_time_value(mut self, aws_time_value: impl Into<Option<Time>>) -> Self {
        self.aws_time_value = aws_time_value.into();
        self
    }

    pub fn build(self) -> Order {
        Order {
            id: self.id.unwrap_or_else(ModelId::random),
            customer_id: self.customer_id,
            account_representative_id: self.account_representative_id,
            product_id: self.product_id,
            status: self.status,
            amount: self.amount,
            date: self.date,
            aws_time_value: self.aws_time_value,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
