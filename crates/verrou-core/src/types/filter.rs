//! Structured filters for dynamic query building.
//!
//! Column names are `&'static str` so that only columns spelled out in
//! code can reach a SQL string; values are always bound as parameters.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Filter comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// Exact equality.
    Eq,
    /// Greater than or equal.
    Gte,
    /// Membership in a list (`= ANY($n)`).
    In,
}

impl FilterOp {
    /// SQL fragment placed between the column and the bound value.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Eq => " = ",
            Self::Gte => " >= ",
            Self::In => " = ANY(",
        }
    }
}

/// A filter value bound as a query parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// A UUID value.
    Uuid(Uuid),
    /// A string value.
    String(String),
    /// A boolean value.
    Boolean(bool),
    /// A timestamp value.
    Timestamp(DateTime<Utc>),
    /// A list of string values (for [`FilterOp::In`]).
    StringList(Vec<String>),
}

/// A single filter condition on a column expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Column expression, e.g. `a.user_id` or `a.status::text`.
    pub column: &'static str,
    /// The comparison operator.
    pub op: FilterOp,
    /// The value to compare against.
    pub value: FilterValue,
}

/// A conjunction of conditions (the structured `WHERE` clause).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    /// An empty filter matching every row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality condition.
    pub fn eq(mut self, column: &'static str, value: FilterValue) -> Self {
        self.conditions.push(Condition {
            column,
            op: FilterOp::Eq,
            value,
        });
        self
    }

    /// Add a lower-bound condition.
    pub fn gte(mut self, column: &'static str, value: FilterValue) -> Self {
        self.conditions.push(Condition {
            column,
            op: FilterOp::Gte,
            value,
        });
        self
    }

    /// Add a list-membership condition.
    pub fn any_of(mut self, column: &'static str, values: Vec<String>) -> Self {
        self.conditions.push(Condition {
            column,
            op: FilterOp::In,
            value: FilterValue::StringList(values),
        });
        self
    }

    /// Add an equality condition only when `value` is present.
    pub fn eq_opt(self, column: &'static str, value: Option<FilterValue>) -> Self {
        match value {
            Some(v) => self.eq(column, v),
            None => self,
        }
    }

    /// The accumulated conditions.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Whether the filter has no conditions.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}
