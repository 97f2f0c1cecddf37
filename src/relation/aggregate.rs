//! Grouped aggregation

use std::collections::HashMap;

use super::{DataType, Field, Relation, Row, Schema, Value};
use crate::error::{EngineError, Result};

/// Reduction applied to the value column of each group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Sum,
    Max,
}

impl Aggregate {
    fn fold(&self, acc: Option<f64>, x: f64) -> f64 {
        match (self, acc) {
            (_, None) => x,
            (Aggregate::Sum, Some(a)) => a + x,
            (Aggregate::Max, Some(a)) => a.max(x),
        }
    }
}

impl Relation {
    /// Group by `group_by` and reduce `value` with `func`.
    ///
    /// Output columns are the group columns followed by `value` as a float.
    /// Groups appear in order of first occurrence. Null values are skipped;
    /// a group with none left is null.
    pub fn aggregate(&self, group_by: &[&str], value: &str, func: Aggregate) -> Result<Relation> {
        let group_idx = group_by
            .iter()
            .map(|c| self.schema.index_of(c))
            .collect::<Result<Vec<_>>>()?;
        let value_idx = self.schema.index_of(value)?;
        let value_field = &self.schema.fields()[value_idx];
        if !matches!(value_field.data_type, DataType::Int64 | DataType::Float64) {
            return Err(EngineError::TypeMismatch {
                column: value.to_string(),
                expected: DataType::Float64,
                found: value_field.data_type.to_string(),
            });
        }

        let mut fields: Vec<Field> = group_idx
            .iter()
            .map(|&i| self.schema.fields()[i].clone())
            .collect();
        fields.push(Field::new(value, DataType::Float64));
        let schema = Schema::new(fields)?;

        let mut groups: HashMap<Vec<&Value>, usize> = HashMap::new();
        let mut keys: Vec<Vec<&Value>> = Vec::new();
        let mut accs: Vec<Option<f64>> = Vec::new();
        for row in &self.rows {
            let key: Vec<&Value> = group_idx.iter().map(|&i| &row[i]).collect();
            let g = *groups.entry(key.clone()).or_insert_with(|| {
                keys.push(key);
                accs.push(None);
                accs.len() - 1
            });
            if let Some(x) = row[value_idx].as_f64() {
                accs[g] = Some(func.fold(accs[g], x));
            }
        }

        let rows = keys
            .into_iter()
            .zip(accs)
            .map(|(key, acc)| {
                let mut out: Row = key.into_iter().cloned().collect();
                out.push(Value::from(acc));
                out
            })
            .collect();
        Ok(Relation { schema, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn hourly() -> Relation {
        Relation::from_rows(
            vec![
                Field::new("year", DataType::Int64),
                Field::new("hour", DataType::Int64),
                Field::new("value", DataType::Float64),
            ],
            vec![
                vec![2030.into(), 0.into(), 1.0.into()],
                vec![2025.into(), 0.into(), 2.0.into()],
                vec![2030.into(), 1.into(), 4.0.into()],
                vec![2030.into(), 1.into(), Value::Null],
                vec![2025.into(), 1.into(), Value::Null],
            ],
        )
        .unwrap()
    }

    #[rstest]
    #[case(Aggregate::Sum, 5.0, 2.0)]
    #[case(Aggregate::Max, 4.0, 2.0)]
    fn test_aggregate_by_year(#[case] func: Aggregate, #[case] y2030: f64, #[case] y2025: f64) {
        let rel = hourly().aggregate(&["year"], "value", func).unwrap();
        assert_eq!(rel.column_names(), vec!["year", "value"]);
        assert_eq!(
            rel.rows(),
            &[
                vec![Value::from(2030), Value::from(y2030)],
                vec![Value::from(2025), Value::from(y2025)],
            ]
        );
    }

    #[test]
    fn test_all_null_group_is_null() {
        let rel = hourly()
            .aggregate(&["year", "hour"], "value", Aggregate::Sum)
            .unwrap();
        assert_eq!(rel.num_rows(), 4);
        assert_eq!(rel.rows()[3], vec![Value::from(2025), Value::from(1), Value::Null]);
    }

    #[test]
    fn test_aggregate_requires_numeric_value() {
        let text = Relation::from_rows(
            vec![Field::new("sector", DataType::Utf8)],
            vec![vec!["commercial".into()]],
        )
        .unwrap();
        assert!(matches!(
            text.aggregate(&[], "sector", Aggregate::Max),
            Err(EngineError::TypeMismatch { .. })
        ));
    }
}
