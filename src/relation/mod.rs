//! In-memory relations and the relational operators the engine composes
//!
//! Every operator is pure: it borrows its inputs and returns a new relation.

use std::collections::HashMap;

use itertools::Itertools;
use serde::Serialize;
use tracing::trace;

use crate::error::{EngineError, Result};

pub mod aggregate;
pub mod expr;
pub mod pivot;
pub mod schema;
pub mod value;

pub use aggregate::Aggregate;
pub use expr::{col, lit, BinaryOp, BoundExpr, Expr};
pub use schema::{Field, Schema};
pub use value::{DataType, Value};

pub type Row = Vec<Value>;

/// Direction of one sort key. Nulls sort last either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Schema-bearing set of rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relation {
    schema: Schema,
    rows: Vec<Row>,
}

impl Relation {
    /// Build a relation, checking row width and cell types
    pub fn new(schema: Schema, rows: Vec<Row>) -> Result<Self> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != schema.len() {
                return Err(EngineError::RowArity {
                    row: i,
                    expected: schema.len(),
                    found: row.len(),
                });
            }
            for (field, value) in schema.fields().iter().zip(row) {
                field.accepts(value)?;
            }
        }
        Ok(Self { schema, rows })
    }

    pub fn from_rows(fields: Vec<Field>, rows: Vec<Row>) -> Result<Self> {
        Self::new(Schema::new(fields)?, rows)
    }

    pub fn empty(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.schema.names()
    }

    /// All values of one column, in row order
    pub fn column(&self, name: &str) -> Result<Vec<&Value>> {
        let idx = self.schema.index_of(name)?;
        Ok(self.rows.iter().map(|r| &r[idx]).collect())
    }

    /// Distinct non-null values of a column, ascending
    pub fn distinct_values(&self, name: &str) -> Result<Vec<Value>> {
        Ok(self
            .column(name)?
            .into_iter()
            .filter(|v| !v.is_null())
            .sorted()
            .dedup()
            .cloned()
            .collect())
    }

    /// Keep rows for which `predicate` evaluates to true
    pub fn filter(&self, predicate: &Expr) -> Result<Relation> {
        let bound = predicate.bind(&self.schema)?;
        let mut rows = Vec::new();
        for row in &self.rows {
            if bound.matches(row)? {
                rows.push(row.clone());
            }
        }
        trace!(input = self.rows.len(), output = rows.len(), "filter");
        Ok(Relation {
            schema: self.schema.clone(),
            rows,
        })
    }

    /// Project onto `columns`, in the given order
    pub fn select(&self, columns: &[&str]) -> Result<Relation> {
        let indices = columns
            .iter()
            .map(|c| self.schema.index_of(c))
            .collect::<Result<Vec<_>>>()?;
        let fields = indices
            .iter()
            .map(|&i| self.schema.fields()[i].clone())
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|r| indices.iter().map(|&i| r[i].clone()).collect())
            .collect();
        Ok(Relation {
            schema: Schema::new(fields)?,
            rows,
        })
    }

    /// Project away `columns`
    pub fn drop_columns(&self, columns: &[&str]) -> Result<Relation> {
        for c in columns {
            self.schema.index_of(c)?;
        }
        let keep: Vec<&str> = self
            .schema
            .names()
            .into_iter()
            .filter(|n| !columns.contains(n))
            .collect();
        self.select(&keep)
    }

    pub fn rename(&self, from: &str, to: &str) -> Result<Relation> {
        let idx = self.schema.index_of(from)?;
        let mut fields = self.schema.fields().to_vec();
        fields[idx].name = to.to_string();
        Ok(Relation {
            schema: Schema::new(fields)?,
            rows: self.rows.clone(),
        })
    }

    /// Append a column computed row by row
    pub fn with_column_fn<F>(&self, field: Field, mut f: F) -> Result<Relation>
    where
        F: FnMut(&[Value]) -> Result<Value>,
    {
        let mut fields = self.schema.fields().to_vec();
        fields.push(field.clone());
        let schema = Schema::new(fields)?;
        let mut rows = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let value = f(row)?;
            field.accepts(&value)?;
            let mut out = row.clone();
            out.push(value);
            rows.push(out);
        }
        Ok(Relation { schema, rows })
    }

    /// Inner equi-join on columns that carry the same name on both sides.
    ///
    /// Output columns are the left columns followed by the right non-key
    /// columns. Null keys never match. A row on one side matching several
    /// rows on the other fans out.
    pub fn inner_join(&self, right: &Relation, on: &[&str]) -> Result<Relation> {
        let left_keys = on
            .iter()
            .map(|k| self.schema.index_of(k))
            .collect::<Result<Vec<_>>>()?;
        let right_keys = on
            .iter()
            .map(|k| right.schema.index_of(k))
            .collect::<Result<Vec<_>>>()?;
        let right_carry: Vec<usize> = (0..right.schema.len())
            .filter(|i| !right_keys.contains(i))
            .collect();

        let mut fields = self.schema.fields().to_vec();
        fields.extend(right_carry.iter().map(|&i| right.schema.fields()[i].clone()));
        let schema = Schema::new(fields)?;

        let mut index: HashMap<Vec<&Value>, Vec<usize>> = HashMap::new();
        for (i, row) in right.rows.iter().enumerate() {
            let key: Vec<&Value> = right_keys.iter().map(|&k| &row[k]).collect();
            if key.iter().any(|v| v.is_null()) {
                continue;
            }
            index.entry(key).or_default().push(i);
        }

        let mut rows = Vec::new();
        for row in &self.rows {
            let key: Vec<&Value> = left_keys.iter().map(|&k| &row[k]).collect();
            let Some(matches) = index.get(&key) else {
                continue;
            };
            for &m in matches {
                let mut out = row.clone();
                out.extend(right_carry.iter().map(|&i| right.rows[m][i].clone()));
                rows.push(out);
            }
        }
        trace!(
            left = self.rows.len(),
            right = right.rows.len(),
            output = rows.len(),
            "inner join"
        );
        Ok(Relation { schema, rows })
    }

    /// Concatenate two relations with identical schemas (bag union, no dedup)
    pub fn union_all(&self, other: &Relation) -> Result<Relation> {
        if self.schema != other.schema {
            return Err(EngineError::SchemaMismatch(format!(
                "cannot union [{}] with [{}]",
                describe(&self.schema),
                describe(&other.schema)
            )));
        }
        let mut rows = self.rows.clone();
        rows.extend(other.rows.iter().cloned());
        Ok(Relation {
            schema: self.schema.clone(),
            rows,
        })
    }

    /// Stable ascending sort by the given columns, nulls last
    pub fn sort_by(&self, columns: &[&str]) -> Result<Relation> {
        let keys: Vec<(&str, SortOrder)> = columns.iter().map(|c| (*c, SortOrder::Ascending)).collect();
        self.sort(&keys)
    }

    /// Stable sort by `(column, order)` keys, nulls last in either order
    pub fn sort(&self, keys: &[(&str, SortOrder)]) -> Result<Relation> {
        let keys = keys
            .iter()
            .map(|(c, order)| Ok((self.schema.index_of(c)?, *order)))
            .collect::<Result<Vec<_>>>()?;
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| {
            keys.iter()
                .map(|&(k, order)| match (order, a[k].is_null() || b[k].is_null()) {
                    (SortOrder::Descending, false) => b[k].cmp(&a[k]),
                    _ => a[k].cmp(&b[k]),
                })
                .find(|o| o.is_ne())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(Relation {
            schema: self.schema.clone(),
            rows,
        })
    }
}

fn describe(schema: &Schema) -> String {
    schema
        .fields()
        .iter()
        .map(|f| format!("{}: {}", f.name, f.data_type))
        .collect::<Vec<_>>()
        .join(", ")
}
