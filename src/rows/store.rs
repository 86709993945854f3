//! Generic row store - runs [`RowQuery`] operations against allow-listed tables.
//!
//! Statements are built with `sea_query` from validated identifiers and bound
//! values, executed through the shared `SeaORM` connection, and every row comes
//! back as a JSON object. Writes use `RETURNING` so callers see the stored rows.

use crate::{
    errors::{Error, Result},
    rows::query::{
        Filter, Operator, OrderBy, QueryKind, RowQuery, or_values, parse_columns,
        validate_identifier,
    },
};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, FromQueryResult, StatementBuilder,
    sea_query::{Alias, Asterisk, Condition, Expr, Order, Query, SimpleExpr, Value},
};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeSet;
use tracing::debug;

/// Set of table names a surface may touch.
#[derive(Debug, Clone, Default)]
pub struct TableAllowList {
    tables: BTreeSet<String>,
}

impl TableAllowList {
    /// Builds the list from table names.
    pub fn new<I, S>(tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tables: tables.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `table` is listed.
    #[must_use]
    pub fn allows(&self, table: &str) -> bool {
        self.tables.contains(table)
    }

    /// Rejects unlisted tables.
    ///
    /// # Errors
    /// Returns [`Error::TableNotAllowed`] when `table` is not listed.
    pub fn check(&self, table: &str) -> Result<()> {
        if self.allows(table) {
            Ok(())
        } else {
            Err(Error::TableNotAllowed {
                table: table.to_string(),
            })
        }
    }
}

/// Row operations over one allow-list.
#[derive(Debug, Clone)]
pub struct RowStore {
    db: DatabaseConnection,
    tables: TableAllowList,
}

impl RowStore {
    /// Store limited to `tables`.
    #[must_use]
    pub const fn new(db: DatabaseConnection, tables: TableAllowList) -> Self {
        Self { db, tables }
    }

    /// Tables this store may touch.
    #[must_use]
    pub const fn tables(&self) -> &TableAllowList {
        &self.tables
    }

    /// Dispatches a full [`RowQuery`].
    ///
    /// # Errors
    /// [`Error::TableNotAllowed`], [`Error::InvalidQuery`] for malformed
    /// requests, or [`Error::Database`] when the statement fails.
    pub async fn execute(&self, table: &str, query: &RowQuery) -> Result<Vec<JsonValue>> {
        match query.kind {
            QueryKind::Select => {
                self.select(table, query.columns.as_deref(), &query.filters, &query.order)
                    .await
            }
            QueryKind::Insert => {
                let data = query.data.as_ref().ok_or_else(|| missing("data"))?;
                self.insert(table, data).await
            }
            QueryKind::Update => {
                let data = query
                    .data
                    .as_ref()
                    .and_then(JsonValue::as_object)
                    .ok_or_else(|| missing("data"))?;
                self.update(table, data, &query.target_filters()).await
            }
            QueryKind::Delete => self.delete(table, &query.target_filters()).await,
        }
    }

    /// Selects rows matching every filter.
    pub async fn select(
        &self,
        table: &str,
        columns: Option<&str>,
        filters: &[Filter],
        order: &[OrderBy],
    ) -> Result<Vec<JsonValue>> {
        let table = self.checked_table(table)?;
        let columns = parse_columns(columns)?;

        let mut statement = Query::select();
        statement.from(Alias::new(table));
        if columns.is_empty() {
            statement.column(Asterisk);
        } else {
            statement.columns(columns.into_iter().map(Alias::new));
        }
        if !filters.is_empty() {
            statement.cond_where(where_clause(filters)?);
        }
        for clause in order {
            let direction = if clause.ascending {
                Order::Asc
            } else {
                Order::Desc
            };
            statement.order_by(Alias::new(validate_identifier(&clause.column)?), direction);
        }

        self.fetch(&statement).await
    }

    /// Inserts one row object or an array of row objects.
    ///
    /// Columns come from the first row; later rows missing a column insert NULL.
    pub async fn insert(&self, table: &str, data: &JsonValue) -> Result<Vec<JsonValue>> {
        let table = self.checked_table(table)?;
        let rows = row_objects(data)?;
        let columns: Vec<String> = rows
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default();
        if columns.is_empty() {
            return Err(missing("data"));
        }
        for column in &columns {
            validate_identifier(column)?;
        }

        let mut statement = Query::insert();
        statement
            .into_table(Alias::new(table))
            .columns(columns.iter().map(|c| Alias::new(c.as_str())));
        for row in rows {
            let values = columns
                .iter()
                .map(|c| sql_value(row.get(c).unwrap_or(&JsonValue::Null)));
            statement
                .values(values)
                .map_err(|e| Error::InvalidQuery {
                    message: e.to_string(),
                })?;
        }
        statement.returning_all();

        self.fetch(&statement).await
    }

    /// Sets `values` on rows matching `matcher`.
    pub async fn update(
        &self,
        table: &str,
        values: &Map<String, JsonValue>,
        matcher: &[Filter],
    ) -> Result<Vec<JsonValue>> {
        let table = self.checked_table(table)?;
        if values.is_empty() {
            return Err(missing("data"));
        }
        if matcher.is_empty() {
            return Err(missing("match"));
        }

        let assignments = values
            .iter()
            .map(|(column, value)| {
                validate_identifier(column).map(|c| (Alias::new(c), sql_value(value)))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut statement = Query::update();
        statement
            .table(Alias::new(table))
            .values(assignments)
            .cond_where(where_clause(matcher)?)
            .returning_all();

        self.fetch(&statement).await
    }

    /// Deletes rows matching `matcher`.
    pub async fn delete(&self, table: &str, matcher: &[Filter]) -> Result<Vec<JsonValue>> {
        let table = self.checked_table(table)?;
        if matcher.is_empty() {
            return Err(missing("match"));
        }

        let mut statement = Query::delete();
        statement
            .from_table(Alias::new(table))
            .cond_where(where_clause(matcher)?)
            .returning_all();

        self.fetch(&statement).await
    }

    fn checked_table<'t>(&self, table: &'t str) -> Result<&'t str> {
        self.tables.check(table)?;
        validate_identifier(table)
    }

    async fn fetch<S: StatementBuilder>(&self, statement: &S) -> Result<Vec<JsonValue>> {
        let statement = self.db.get_database_backend().build(statement);
        debug!(sql = %statement.sql, "Executing row statement");
        JsonValue::find_by_statement(statement)
            .all(&self.db)
            .await
            .map_err(Into::into)
    }
}

fn missing(field: &str) -> Error {
    Error::InvalidQuery {
        message: format!("{field} is required"),
    }
}

fn row_objects(data: &JsonValue) -> Result<Vec<&Map<String, JsonValue>>> {
    match data {
        JsonValue::Object(row) => Ok(vec![row]),
        JsonValue::Array(items) => items
            .iter()
            .map(|item| item.as_object().ok_or_else(|| missing("row object")))
            .collect(),
        _ => Err(missing("row object")),
    }
}

fn sql_value(value: &JsonValue) -> SimpleExpr {
    match value {
        JsonValue::Null => Expr::cust("NULL"),
        JsonValue::Bool(b) => Value::from(*b).into(),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Value::from(i).into(),
            None => Value::from(n.as_f64().unwrap_or_default()).into(),
        },
        JsonValue::String(s) => Value::from(s.clone()).into(),
        // Nested values are stored as JSON text
        other => Value::from(other.to_string()).into(),
    }
}

fn filter_expr(filter: &Filter) -> Result<SimpleExpr> {
    let name = validate_identifier(&filter.column)?;
    let col = || Expr::col(Alias::new(name));
    let value = &filter.value;

    Ok(match filter.operator {
        Operator::Eq if value.is_null() => col().is_null(),
        Operator::Eq => col().eq(sql_value(value)),
        Operator::Neq | Operator::Not if value.is_null() => col().is_not_null(),
        Operator::Neq => col().ne(sql_value(value)),
        Operator::Not => col().ne(sql_value(value)).or(col().is_null()),
        Operator::Gt => col().gt(sql_value(value)),
        Operator::Lt => col().lt(sql_value(value)),
        Operator::Or => or_values(value)?
            .iter()
            .map(|candidate| col().eq(sql_value(candidate)))
            .reduce(SimpleExpr::or)
            .ok_or_else(|| missing("or value"))?,
    })
}

fn where_clause(filters: &[Filter]) -> Result<Condition> {
    filters
        .iter()
        .try_fold(Condition::all(), |condition, filter| {
            filter_expr(filter).map(|expr| condition.add(expr))
        })
}
