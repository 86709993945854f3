//! Request shapes for the generic row store.
//!
//! These mirror what the back-office screens send: a query type, optional
//! column list, a flat list of filters combined with AND, and an ordering.

use crate::errors::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Kind of row operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    /// Read rows
    Select,
    /// Add rows
    Insert,
    /// Change matched rows
    Update,
    /// Remove matched rows
    Delete,
}

impl QueryKind {
    /// Whether the operation changes stored rows.
    #[must_use]
    pub const fn is_write(self) -> bool {
        !matches!(self, Self::Select)
    }
}

/// Comparison applied by a [`Filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// `column = value` (`IS NULL` for null)
    Eq,
    /// `column <> value` (`IS NOT NULL` for null)
    Neq,
    /// `column > value`
    Gt,
    /// `column < value`
    Lt,
    /// `IS NOT NULL` for null, otherwise `column <> value OR column IS NULL`
    Not,
    /// `column = v1 OR column = v2 ...`
    Or,
}

/// One filter clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// Column name
    pub column: String,
    /// Comparison
    pub operator: Operator,
    /// Operand; an array or comma-separated string for `or`
    #[serde(default)]
    pub value: JsonValue,
}

impl Filter {
    /// Equality filter.
    #[must_use]
    pub fn equals(column: impl Into<String>, value: JsonValue) -> Self {
        Self {
            column: column.into(),
            operator: Operator::Eq,
            value,
        }
    }
}

/// Ordering clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    /// Column name
    pub column: String,
    /// Defaults to ascending
    #[serde(default = "default_ascending")]
    pub ascending: bool,
}

const fn default_ascending() -> bool {
    true
}

/// Full request for `POST /api/data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowQuery {
    /// Operation
    #[serde(rename = "type")]
    pub kind: QueryKind,
    /// Comma-separated column list; absent or `*` selects everything
    #[serde(default)]
    pub columns: Option<String>,
    /// Filters combined with AND
    #[serde(default)]
    pub filters: Vec<Filter>,
    /// One ordering or a list
    #[serde(default, deserialize_with = "one_or_many")]
    pub order: Vec<OrderBy>,
    /// Row object, or array of row objects for insert; values for update
    #[serde(default)]
    pub data: Option<JsonValue>,
    /// Equality match for update and delete
    #[serde(default, rename = "match")]
    pub matcher: Option<Map<String, JsonValue>>,
}

impl RowQuery {
    /// Filters that select the rows an update or delete touches: the `match`
    /// object as equality filters followed by any explicit filters.
    #[must_use]
    pub fn target_filters(&self) -> Vec<Filter> {
        let mut filters = self
            .matcher
            .as_ref()
            .map(equality_filters)
            .unwrap_or_default();
        filters.extend(self.filters.iter().cloned());
        filters
    }
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<OrderBy>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(OrderBy),
        Many(Vec<OrderBy>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(order)) => vec![order],
        Some(OneOrMany::Many(orders)) => orders,
    })
}

/// Turns a `{column: value}` object into equality filters.
#[must_use]
pub fn equality_filters(map: &Map<String, JsonValue>) -> Vec<Filter> {
    map.iter()
        .map(|(column, value)| Filter::equals(column.clone(), value.clone()))
        .collect()
}

/// Accepts SQL identifiers of the form `[A-Za-z_][A-Za-z0-9_]*`.
///
/// # Errors
/// Returns [`Error::InvalidQuery`] for anything else.
pub fn validate_identifier(name: &str) -> Result<&str> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if valid_start && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(name)
    } else {
        Err(Error::InvalidQuery {
            message: format!("invalid identifier: {name:?}"),
        })
    }
}

/// Parses a column list. `None`, empty and `*` mean all columns (empty vec).
///
/// # Errors
/// Returns [`Error::InvalidQuery`] when a column name is not an identifier.
pub fn parse_columns(columns: Option<&str>) -> Result<Vec<String>> {
    let Some(columns) = columns.map(str::trim) else {
        return Ok(Vec::new());
    };
    if columns.is_empty() || columns == "*" {
        return Ok(Vec::new());
    }
    columns
        .split(',')
        .map(|c| validate_identifier(c.trim()).map(str::to_string))
        .collect()
}

/// Candidate values of an `or` filter: a JSON array, or a comma-separated string.
///
/// Tokens of a comma-separated string that parse as numbers are bound as
/// numbers so they compare against numeric columns.
///
/// # Errors
/// Returns [`Error::InvalidQuery`] when no candidate values are given.
pub fn or_values(value: &JsonValue) -> Result<Vec<JsonValue>> {
    let values = match value {
        JsonValue::Array(items) => items.clone(),
        JsonValue::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(or_token)
            .collect(),
        JsonValue::Null => Vec::new(),
        other => vec![other.clone()],
    };
    if values.is_empty() {
        return Err(Error::InvalidQuery {
            message: "or filter needs at least one value".to_string(),
        });
    }
    Ok(values)
}

fn or_token(token: &str) -> JsonValue {
    if let Ok(n) = token.parse::<i64>() {
        return JsonValue::from(n);
    }
    token
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map_or_else(|| JsonValue::String(token.to_string()), JsonValue::from)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_select_query() {
        let query: RowQuery = serde_json::from_value(json!({
            "type": "select",
            "columns": "id, store_id, total_amount",
            "filters": [
                {"column": "store_id", "operator": "eq", "value": 1001},
                {"column": "store_id", "operator": "or", "value": [1001, 1003]}
            ],
            "order": {"column": "sales_date", "ascending": false}
        }))
        .unwrap();

        assert_eq!(query.kind, QueryKind::Select);
        assert_eq!(query.filters.len(), 2);
        assert_eq!(query.filters[1].operator, Operator::Or);
        assert_eq!(
            query.order,
            vec![OrderBy {
                column: "sales_date".to_string(),
                ascending: false
            }]
        );
    }

    #[test]
    fn test_deserialize_order_list_and_defaults() {
        let query: RowQuery = serde_json::from_value(json!({
            "type": "select",
            "order": [{"column": "year"}, {"column": "month", "ascending": false}]
        }))
        .unwrap();
        assert_eq!(query.order.len(), 2);
        assert!(query.order[0].ascending);
        assert!(!query.order[1].ascending);
        assert!(query.filters.is_empty());
    }

    #[test]
    fn test_unknown_operator_rejected() {
        let result: std::result::Result<RowQuery, _> = serde_json::from_value(json!({
            "type": "select",
            "filters": [{"column": "id", "operator": "like", "value": "%"}]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_target_filters_combines_match_and_filters() {
        let query: RowQuery = serde_json::from_value(json!({
            "type": "update",
            "data": {"amount": 10},
            "match": {"id": 3},
            "filters": [{"column": "store_id", "operator": "eq", "value": 1001}]
        }))
        .unwrap();

        let filters = query.target_filters();
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0], Filter::equals("id", json!(3)));
    }

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("store_id").is_ok());
        assert!(validate_identifier("_x1").is_ok());
        assert!(validate_identifier("1abc").is_err());
        assert!(validate_identifier("id; DROP TABLE sales").is_err());
        assert!(validate_identifier("").is_err());
    }

    #[test]
    fn test_parse_columns() {
        assert!(parse_columns(None).unwrap().is_empty());
        assert!(parse_columns(Some(" * ")).unwrap().is_empty());
        assert_eq!(
            parse_columns(Some("id, store_name")).unwrap(),
            vec!["id", "store_name"]
        );
        assert!(parse_columns(Some("id, vendor(vendor_name)")).is_err());
    }

    #[test]
    fn test_or_values() {
        assert_eq!(
            or_values(&json!([1, 2])).unwrap(),
            vec![json!(1), json!(2)]
        );
        assert_eq!(
            or_values(&json!("a, b")).unwrap(),
            vec![json!("a"), json!("b")]
        );
        assert_eq!(
            or_values(&json!("1001, 1003")).unwrap(),
            vec![json!(1001), json!(1003)]
        );
        assert_eq!(
            or_values(&json!("2024-02-05,12.5,inf")).unwrap(),
            vec![json!("2024-02-05"), json!(12.5), json!("inf")]
        );
        assert_eq!(or_values(&json!(7)).unwrap(), vec![json!(7)]);
        assert!(or_values(&json!([])).is_err());
        assert!(or_values(&JsonValue::Null).is_err());
    }
}
