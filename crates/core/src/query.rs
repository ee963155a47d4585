//! Query vocabulary: typed fields, predicates, sorting and pagination.
//!
//! Predicates are evaluated against the JSON object form of a record, so the
//! same predicate works for every store that keeps records as documents.
//!
//! ```
//! use orderapp_core::{QueryField, QueryOptions};
//!
//! const NAME: QueryField = QueryField::new("Blog", "name");
//! let options = QueryOptions::matching(NAME.begins_with("new blog")).sorted_by(NAME.ascending());
//! assert_eq!(options.sort.len(), 1);
//! ```

use core::cmp::Ordering;

use serde_json::Value as JsonValue;

/// A reference to one field of one model, usable to build predicates.
#[derive(Debug, Clone, Copy)]
pub struct QueryField {
    model: &'static str,
    field: &'static str,
}

impl QueryField {
    pub const fn new(model: &'static str, field: &'static str) -> Self {
        Self { model, field }
    }

    pub fn model_name(&self) -> &'static str {
        self.model
    }

    pub fn name(&self) -> &'static str {
        self.field
    }

    pub fn eq(self, value: impl Into<JsonValue>) -> QueryPredicate {
        self.op(Operator::Eq(value.into()))
    }

    pub fn ne(self, value: impl Into<JsonValue>) -> QueryPredicate {
        self.op(Operator::Ne(value.into()))
    }

    pub fn gt(self, value: impl Into<JsonValue>) -> QueryPredicate {
        self.op(Operator::Gt(value.into()))
    }

    pub fn ge(self, value: impl Into<JsonValue>) -> QueryPredicate {
        self.op(Operator::Ge(value.into()))
    }

    pub fn lt(self, value: impl Into<JsonValue>) -> QueryPredicate {
        self.op(Operator::Lt(value.into()))
    }

    pub fn le(self, value: impl Into<JsonValue>) -> QueryPredicate {
        self.op(Operator::Le(value.into()))
    }

    pub fn contains(self, needle: impl Into<String>) -> QueryPredicate {
        self.op(Operator::Contains(needle.into()))
    }

    pub fn begins_with(self, prefix: impl Into<String>) -> QueryPredicate {
        self.op(Operator::BeginsWith(prefix.into()))
    }

    /// Inclusive range.
    pub fn between(self, low: impl Into<JsonValue>, high: impl Into<JsonValue>) -> QueryPredicate {
        self.op(Operator::Between(low.into(), high.into()))
    }

    pub fn ascending(self) -> QuerySortBy {
        QuerySortBy {
            field: self,
            order: SortOrder::Ascending,
        }
    }

    pub fn descending(self) -> QuerySortBy {
        QuerySortBy {
            field: self,
            order: SortOrder::Descending,
        }
    }

    fn op(self, operator: Operator) -> QueryPredicate {
        QueryPredicate::Operation {
            field: self,
            operator,
        }
    }
}

/// Comparison applied to a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    Eq(JsonValue),
    Ne(JsonValue),
    Gt(JsonValue),
    Ge(JsonValue),
    Lt(JsonValue),
    Le(JsonValue),
    Contains(String),
    BeginsWith(String),
    Between(JsonValue, JsonValue),
}

impl Operator {
    /// Evaluate against a field value. A missing field is `Null`, which only
    /// equals `Null` and orders against nothing.
    fn evaluate(&self, actual: &JsonValue) -> bool {
        match self {
            Operator::Eq(expected) => values_equal(actual, expected),
            Operator::Ne(expected) => !values_equal(actual, expected),
            Operator::Gt(bound) => compare(actual, bound) == Some(Ordering::Greater),
            Operator::Ge(bound) => matches!(
                compare(actual, bound),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Operator::Lt(bound) => compare(actual, bound) == Some(Ordering::Less),
            Operator::Le(bound) => {
                matches!(compare(actual, bound), Some(Ordering::Less | Ordering::Equal))
            }
            Operator::Contains(needle) => actual
                .as_str()
                .is_some_and(|s| s.contains(needle.as_str())),
            Operator::BeginsWith(prefix) => actual
                .as_str()
                .is_some_and(|s| s.starts_with(prefix.as_str())),
            Operator::Between(low, high) => {
                matches!(compare(actual, low), Some(Ordering::Greater | Ordering::Equal))
                    && matches!(compare(actual, high), Some(Ordering::Less | Ordering::Equal))
            }
        }
    }
}

/// Boolean condition over a record's fields.
#[derive(Debug, Clone, Default)]
pub enum QueryPredicate {
    /// Matches every record.
    #[default]
    All,
    Operation {
        field: QueryField,
        operator: Operator,
    },
    And(Vec<QueryPredicate>),
    Or(Vec<QueryPredicate>),
    Not(Box<QueryPredicate>),
}

impl QueryPredicate {
    pub fn all() -> Self {
        Self::All
    }

    pub fn and(self, other: QueryPredicate) -> Self {
        match self {
            QueryPredicate::And(mut preds) => {
                preds.push(other);
                QueryPredicate::And(preds)
            }
            lhs => QueryPredicate::And(vec![lhs, other]),
        }
    }

    pub fn or(self, other: QueryPredicate) -> Self {
        match self {
            QueryPredicate::Or(mut preds) => {
                preds.push(other);
                QueryPredicate::Or(preds)
            }
            lhs => QueryPredicate::Or(vec![lhs, other]),
        }
    }

    /// Evaluate against the JSON object form of a record.
    pub fn evaluate(&self, record: &JsonValue) -> bool {
        match self {
            QueryPredicate::All => true,
            QueryPredicate::Operation { field, operator } => {
                operator.evaluate(record.get(field.name()).unwrap_or(&JsonValue::Null))
            }
            QueryPredicate::And(preds) => preds.iter().all(|p| p.evaluate(record)),
            QueryPredicate::Or(preds) => preds.iter().any(|p| p.evaluate(record)),
            QueryPredicate::Not(inner) => !inner.evaluate(record),
        }
    }

    /// Every field referenced by this predicate, depth-first.
    pub fn fields(&self) -> Vec<QueryField> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields(&self, out: &mut Vec<QueryField>) {
        match self {
            QueryPredicate::All => {}
            QueryPredicate::Operation { field, .. } => out.push(*field),
            QueryPredicate::And(preds) | QueryPredicate::Or(preds) => {
                for p in preds {
                    p.collect_fields(out);
                }
            }
            QueryPredicate::Not(inner) => inner.collect_fields(out),
        }
    }
}

impl core::ops::Not for QueryPredicate {
    type Output = QueryPredicate;

    fn not(self) -> Self::Output {
        QueryPredicate::Not(Box::new(self))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Sort key: one field and a direction.
#[derive(Debug, Clone, Copy)]
pub struct QuerySortBy {
    pub field: QueryField,
    pub order: SortOrder,
}

/// Stable multi-key sort of JSON records. Missing values sort first in
/// ascending order; values of incomparable types keep their relative order.
pub fn sort_records(records: &mut [JsonValue], sort: &[QuerySortBy]) {
    if sort.is_empty() {
        return;
    }
    records.sort_by(|a, b| {
        for key in sort {
            let lhs = a.get(key.field.name()).unwrap_or(&JsonValue::Null);
            let rhs = b.get(key.field.name()).unwrap_or(&JsonValue::Null);
            let ord = match (lhs.is_null(), rhs.is_null()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                (false, false) => compare(lhs, rhs).unwrap_or(Ordering::Equal),
            };
            let ord = match key.order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
}

/// Pagination parameters for queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Maximum number of records to return.
    pub limit: u32,
    /// Zero-based page index.
    pub index: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: 100,
            index: 0,
        }
    }
}

impl Page {
    pub fn new(limit: Option<u32>, index: Option<u32>) -> Self {
        Self {
            limit: limit.unwrap_or(100).clamp(1, 1000),
            index: index.unwrap_or(0),
        }
    }

    pub fn first(limit: u32) -> Self {
        Self::new(Some(limit), None)
    }

    pub fn offset(&self) -> usize {
        self.index as usize * self.limit as usize
    }
}

/// Options for a one-shot query.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub predicate: QueryPredicate,
    pub sort: Vec<QuerySortBy>,
    pub page: Option<Page>,
}

impl QueryOptions {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matching(predicate: QueryPredicate) -> Self {
        Self {
            predicate,
            ..Self::default()
        }
    }

    pub fn sorted_by(mut self, sort: QuerySortBy) -> Self {
        self.sort.push(sort);
        self
    }

    pub fn paginated(mut self, page: Page) -> Self {
        self.page = Some(page);
        self
    }
}

/// Options for a live query subscription.
#[derive(Debug, Clone, Default)]
pub struct ObserveQueryOptions {
    pub predicate: QueryPredicate,
    pub sort: Vec<QuerySortBy>,
}

impl ObserveQueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn matching(predicate: QueryPredicate) -> Self {
        Self {
            predicate,
            sort: Vec::new(),
        }
    }

    pub fn sorted_by(mut self, sort: QuerySortBy) -> Self {
        self.sort.push(sort);
        self
    }
}

fn values_equal(a: &JsonValue, b: &JsonValue) -> bool {
    match (a, b) {
        (JsonValue::Number(_), JsonValue::Number(_)) => compare(a, b) == Some(Ordering::Equal),
        _ => a == b,
    }
}

fn compare(a: &JsonValue, b: &JsonValue) -> Option<Ordering> {
    match (a, b) {
        (JsonValue::Number(x), JsonValue::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => x.as_f64()?.partial_cmp(&y.as_f64()?),
        },
        (JsonValue::String(x), JsonValue::String(y)) => Some(x.cmp(y)),
        (JsonValue::Bool(x), JsonValue::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NAME: QueryField = QueryField::new("Blog", "name");
    const AMOUNT: QueryField = QueryField::new("Order", "amount");
    const TIME: QueryField = QueryField::new("Blog", "awsTimeValue");

    #[test]
    fn equality_and_inequality() {
        let rec = json!({"name": "new blog 6", "amount": 10});
        assert!(NAME.eq("new blog 6").evaluate(&rec));
        assert!(!NAME.eq("new blog 7").evaluate(&rec));
        assert!(NAME.ne("new blog 7").evaluate(&rec));
        assert!(AMOUNT.eq(10.0).evaluate(&rec));
    }

    #[test]
    fn missing_fields_only_match_not_equal() {
        let rec = json!({"name": "blog1", "awsTimeValue": null});
        assert!(!TIME.eq("21:37:56").evaluate(&rec));
        assert!(TIME.ne("21:37:56").evaluate(&rec));
        assert!(!TIME.gt("00:00:00").evaluate(&rec));
        assert!(!AMOUNT.lt(5).evaluate(&rec));
    }

    #[test]
    fn ranges_are_inclusive() {
        let pred = AMOUNT.between(10, 20);
        assert!(pred.evaluate(&json!({"amount": 10})));
        assert!(pred.evaluate(&json!({"amount": 20})));
        assert!(!pred.evaluate(&json!({"amount": 21})));
        assert!(AMOUNT.ge(10).evaluate(&json!({"amount": 10})));
        assert!(!AMOUNT.gt(10).evaluate(&json!({"amount": 10})));
    }

    #[test]
    fn string_operators() {
        let rec = json!({"name": "Customer 3001"});
        assert!(NAME.begins_with("Customer").evaluate(&rec));
        assert!(NAME.contains("300").evaluate(&rec));
        assert!(!NAME.contains("blog").evaluate(&rec));
    }

    #[test]
    fn composition() {
        let rec = json!({"name": "blog1", "amount": 3});
        let pred = NAME.eq("blog1").and(AMOUNT.lt(5));
        assert!(pred.evaluate(&rec));
        assert!(!(!pred.clone()).evaluate(&rec));
        assert!(NAME.eq("x").or(AMOUNT.eq(3)).evaluate(&rec));
        assert_eq!(pred.fields().len(), 2);
        assert!(QueryPredicate::all().evaluate(&rec));
    }

    #[test]
    fn sorts_by_multiple_keys_with_missing_first() {
        let mut recs = vec![
            json!({"name": "b", "amount": 1}),
            json!({"name": "a", "amount": 2}),
            json!({"name": null, "amount": 9}),
            json!({"name": "a", "amount": 1}),
        ];
        sort_records(&mut recs, &[NAME.ascending(), AMOUNT.descending()]);
        let names: Vec<_> = recs.iter().map(|r| (r["name"].clone(), r["amount"].clone())).collect();
        assert_eq!(
            names,
            vec![
                (json!(null), json!(9)),
                (json!("a"), json!(2)),
                (json!("a"), json!(1)),
                (json!("b"), json!(1)),
            ]
        );
    }

    #[test]
    fn page_clamps_limit() {
        assert_eq!(Page::new(Some(0), None).limit, 1);
        assert_eq!(Page::new(Some(5000), None).limit, 1000);
        assert_eq!(Page::new(Some(10), Some(3)).offset(), 30);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// `ne` is always the complement of `eq`.
            #[test]
            fn ne_is_complement_of_eq(actual in "[a-z]{0,6}", probe in "[a-z]{0,6}") {
                let rec = json!({"name": actual});
                prop_assert_eq!(NAME.ne(probe.clone()).evaluate(&rec), !NAME.eq(probe).evaluate(&rec));
            }

            /// Ascending sort leaves integer fields in non-decreasing order.
            #[test]
            fn ascending_sort_is_ordered(amounts in proptest::collection::vec(-1000i64..1000, 0..40)) {
                let mut recs: Vec<JsonValue> = amounts.iter().map(|a| json!({"amount": a})).collect();
                sort_records(&mut recs, &[AMOUNT.ascending()]);
                for pair in recs.windows(2) {
                    prop_assert!(pair[0]["amount"].as_i64() <= pair[1]["amount"].as_i64());
                }
            }
        }
    }
}
