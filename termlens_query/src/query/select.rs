//! SELECT query operations
//!
//! Renders BigQuery Standard SQL. User-supplied values enter the statement
//! only as named `@param` placeholders; the back-ticked FROM identifier is
//! the single interpolated piece and is checked by [`validate_identifier`].

use crate::backend::{Operator, Projection, QueryParam, SqlValue};
use crate::error::{QueryError, Result};
use crate::query::spec::AnalyticalQuerySpec;
use tracing::instrument;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectStatement {
    pub(crate) table: Option<String>,
    pub(crate) selected_fields: Vec<Projection>,
    pub(crate) conditions: Vec<(String, Operator, SqlValue)>,
    pub(crate) group_by: Vec<String>,
    pub(crate) order_by: Vec<(String, bool)>,
    pub(crate) limit: Option<usize>,
    pub(crate) parameters: Vec<QueryParam>,
}

impl SelectStatement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the FROM target to `` `dataset.table` ``
    pub fn from_table(mut self, dataset: &str, table: &str) -> Result<Self> {
        validate_identifier(dataset)?;
        validate_identifier(table)?;
        self.table = Some(format!("`{}.{}`", dataset, table));
        Ok(self)
    }

    /// Select a field, optionally with an alias
    #[instrument(skip(self))]
    pub fn field(mut self, expr: &str, alias: Option<&str>) -> Self {
        if let Some(alias) = alias {
            self.selected_fields
                .push(Projection::FieldAs(expr.to_string(), alias.to_string()));
        } else {
            self.selected_fields.push(Projection::Field(expr.to_string()));
        }
        self
    }

    /// Select multiple fields
    pub fn fields(mut self, fields: &[&str]) -> Self {
        for expr in fields.iter() {
            self.selected_fields.push(Projection::Field(expr.to_string()));
        }
        self
    }

    /// Add a WHERE condition comparing `field` against a bound parameter
    #[instrument(skip(self, param), fields(param = %param.name))]
    pub fn where_param(mut self, field: &str, op: Operator, param: QueryParam) -> Self {
        self.conditions
            .push((field.to_string(), op, SqlValue::Param(param.name.clone())));
        self.parameters.push(param);
        self
    }

    /// Add `field BETWEEN @low AND @high`
    #[instrument(skip_all, fields(field = field))]
    pub fn where_between(mut self, field: &str, low: QueryParam, high: QueryParam) -> Self {
        self.conditions.push((
            field.to_string(),
            Operator::Between,
            SqlValue::Between(low.name.clone(), high.name.clone()),
        ));
        self.parameters.push(low);
        self.parameters.push(high);
        self
    }

    /// Add a WHERE condition against a fixed integer literal
    pub fn where_literal(mut self, field: &str, op: Operator, literal: i64) -> Self {
        self.conditions
            .push((field.to_string(), op, SqlValue::Literal(literal)));
        self
    }

    /// Add GROUP BY clause
    pub fn group_by(mut self, field: &str) -> Self {
        self.group_by.push(field.to_string());
        self
    }

    /// Add ORDER BY clause
    pub fn order_by_field(mut self, field: &str, ascending: bool) -> Self {
        self.order_by.push((field.to_string(), ascending));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn params(&self) -> &[QueryParam] {
        &self.parameters
    }

    /// Render the statement text
    pub fn to_sql(&self) -> Result<String> {
        let table = self.table.as_ref().ok_or(QueryError::MissingTable)?;

        let mut query = String::from("SELECT ");
        if self.selected_fields.is_empty() {
            query.push('*');
        } else {
            let field_strs: Vec<String> = self
                .selected_fields
                .iter()
                .map(|proj| proj.to_string())
                .collect();
            query.push_str(&field_strs.join(", "));
        }

        query.push_str(" FROM ");
        query.push_str(table);

        if !self.conditions.is_empty() {
            query.push_str(" WHERE ");
            let conditions: Vec<String> = self
                .conditions
                .iter()
                .map(|(field, op, value)| format!("{} {} {}", field, String::from(*op), value))
                .collect();
            query.push_str(&conditions.join(" AND "));
        }

        if !self.group_by.is_empty() {
            query.push_str(" GROUP BY ");
            query.push_str(&self.group_by.join(", "));
        }

        if !self.order_by.is_empty() {
            query.push_str(" ORDER BY ");
            let orders: Vec<String> = self
                .order_by
                .iter()
                .map(|(field, asc)| format!("{} {}", field, if *asc { "ASC" } else { "DESC" }))
                .collect();
            query.push_str(&orders.join(", "));
        }

        if let Some(limit) = self.limit {
            query.push_str(&format!(" LIMIT {}", limit));
        }

        Ok(query)
    }

    /// Render and check the statement, producing a spec for the executor
    pub fn build(&self) -> Result<AnalyticalQuerySpec> {
        AnalyticalQuerySpec::new(self.to_sql()?, self.parameters.clone())
    }
}

/// Table and dataset identifiers may contain letters, digits, `_`, `-` and `.`.
pub fn validate_identifier(ident: &str) -> Result<()> {
    let valid = !ident.is_empty()
        && ident
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(QueryError::InvalidIdentifier(ident.to_string()))
    }
}
