//! Long/wide reshaping

use std::collections::HashMap;

use super::{DataType, Field, Relation, Row, Schema, Value};
use crate::error::{EngineError, Result};

impl Relation {
    /// Reshape long to wide: one output column per value of `on`, each cell
    /// the sum of `value` over the rows sharing the remaining columns.
    ///
    /// When `columns` is given, exactly those pivot values become columns
    /// (in that order) and rows carrying other values are ignored. Otherwise
    /// every distinct value of `on` gets a column, ascending, with a trailing
    /// `NULL` column when some rows carry no pivot value. Cells with no
    /// contributing non-null value are null, never zero.
    ///
    /// Pivot columns are named after their value. A name that clashes with a
    /// remaining key column is prefixed with `on`, so a `geography` sector
    /// becomes `sector_geography`.
    pub fn pivot(&self, on: &str, value: &str, columns: Option<&[Value]>) -> Result<Relation> {
        let on_idx = self.schema.index_of(on)?;
        let value_idx = self.schema.index_of(value)?;
        let value_field = &self.schema.fields()[value_idx];
        if !matches!(value_field.data_type, DataType::Int64 | DataType::Float64) {
            return Err(EngineError::TypeMismatch {
                column: value.to_string(),
                expected: DataType::Float64,
                found: value_field.data_type.to_string(),
            });
        }

        let pivot_values = match columns {
            Some(cols) => cols.to_vec(),
            None => {
                let mut values = self.distinct_values(on)?;
                if self.rows.iter().any(|r| r[on_idx].is_null()) {
                    values.push(Value::Null);
                }
                values
            }
        };
        let slot: HashMap<&Value, usize> = pivot_values
            .iter()
            .enumerate()
            .map(|(i, v)| (v, i))
            .collect();

        let group_idx: Vec<usize> = (0..self.schema.len())
            .filter(|&i| i != on_idx && i != value_idx)
            .collect();
        let mut fields: Vec<Field> = group_idx
            .iter()
            .map(|&i| self.schema.fields()[i].clone())
            .collect();
        let pivot_fields: Vec<Field> = pivot_values
            .iter()
            .map(|v| {
                let name = v.to_string();
                if fields.iter().any(|f| f.name == name) {
                    Field::new(format!("{on}_{name}"), DataType::Float64)
                } else {
                    Field::new(name, DataType::Float64)
                }
            })
            .collect();
        fields.extend(pivot_fields);
        let schema = Schema::new(fields)?;

        let mut groups: HashMap<Vec<&Value>, usize> = HashMap::new();
        let mut keys: Vec<Vec<&Value>> = Vec::new();
        let mut sums: Vec<Vec<Option<f64>>> = Vec::new();
        for row in &self.rows {
            let Some(&s) = slot.get(&row[on_idx]) else {
                continue;
            };
            let key: Vec<&Value> = group_idx.iter().map(|&i| &row[i]).collect();
            let g = *groups.entry(key.clone()).or_insert_with(|| {
                keys.push(key);
                sums.push(vec![None; pivot_values.len()]);
                sums.len() - 1
            });
            if let Some(x) = row[value_idx].as_f64() {
                let cell = &mut sums[g][s];
                *cell = Some(cell.unwrap_or(0.0) + x);
            }
        }

        let rows = keys
            .into_iter()
            .zip(sums)
            .map(|(key, cells)| {
                let mut out: Row = key.into_iter().cloned().collect();
                out.extend(cells.into_iter().map(Value::from));
                out
            })
            .collect();
        Ok(Relation { schema, rows })
    }

    /// Reshape wide to long: every listed column becomes one row with its
    /// name in `name_column` and its cell in `value_column`. Null cells
    /// produce no row.
    pub fn unpivot(&self, columns: &[&str], name_column: &str, value_column: &str) -> Result<Relation> {
        let idx = columns
            .iter()
            .map(|c| self.schema.index_of(c))
            .collect::<Result<Vec<_>>>()?;
        let value_type = idx
            .first()
            .map(|&i| self.schema.fields()[i].data_type)
            .unwrap_or(DataType::Float64);
        for &i in &idx {
            let field = &self.schema.fields()[i];
            if field.data_type != value_type {
                return Err(EngineError::TypeMismatch {
                    column: field.name.clone(),
                    expected: value_type,
                    found: field.data_type.to_string(),
                });
            }
        }

        let keep: Vec<usize> = (0..self.schema.len()).filter(|i| !idx.contains(i)).collect();
        let mut fields: Vec<Field> = keep.iter().map(|&i| self.schema.fields()[i].clone()).collect();
        fields.push(Field::new(name_column, DataType::Utf8));
        fields.push(Field::new(value_column, value_type));
        let schema = Schema::new(fields)?;

        let mut rows = Vec::new();
        for row in &self.rows {
            for (&i, name) in idx.iter().zip(columns) {
                if row[i].is_null() {
                    continue;
                }
                let mut out: Row = keep.iter().map(|&k| row[k].clone()).collect();
                out.push(Value::from(*name));
                out.push(row[i].clone());
                rows.push(out);
            }
        }
        Ok(Relation { schema, rows })
    }
}
