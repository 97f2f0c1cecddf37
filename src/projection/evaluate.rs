use std::collections::BTreeSet;

use tracing::warn;

use crate::domain::{columns, Coefficients, ModelType, SectorGroup, UnknownModelPolicy};
use crate::error::{EngineError, Result};
use crate::relation::{DataType, Field, Relation, Value};

use super::ProjectionContext;

/// Output columns shared by both sector pipelines, in order
pub fn output_columns(geography_column: &str) -> [&str; 5] {
    [
        columns::HOUR,
        columns::YEAR,
        geography_column,
        columns::SECTOR,
        columns::VALUE,
    ]
}

/// Evaluate the intensity model on every joined row and project to the
/// output shape. `drivers` are multiplied together with the profile weight.
///
/// Missing coefficients or driver values yield a null demand. Unknown model
/// types follow the configured policy.
pub(crate) fn evaluate_demand(
    joined: &Relation,
    ctx: &ProjectionContext<'_>,
    group: SectorGroup,
    drivers: &[&str],
) -> Result<Relation> {
    let schema = joined.schema();
    let model_idx = schema.index_of(columns::MODEL_TYPE)?;
    let intercept_idx = schema.index_of(columns::INTERCEPT)?;
    let slope_idx = schema.index_of(columns::SLOPE)?;
    let sector_idx = schema.index_of(columns::SECTOR)?;
    let scale_idx = drivers
        .iter()
        .chain(std::iter::once(&columns::PROFILE_VALUE))
        .map(|c| schema.index_of(c))
        .collect::<Result<Vec<_>>>()?;

    let mut unknown: BTreeSet<String> = BTreeSet::new();
    let evaluated = joined.with_column_fn(Field::new(columns::VALUE, DataType::Float64), |row| {
        let model = match row[model_idx].as_str().map(str::parse::<ModelType>) {
            Some(Ok(model)) => model,
            _ => {
                let raw = row[model_idx].to_string();
                if ctx.unknown_model_type == UnknownModelPolicy::Error {
                    return Err(EngineError::UnknownModelType {
                        geography: ctx.geography.to_string(),
                        sector: row[sector_idx].to_string(),
                        model_type: raw,
                    });
                }
                unknown.insert(raw);
                return Ok(Value::Null);
            }
        };
        let Some(coefficients) = Coefficients::from_values(&row[intercept_idx], &row[slope_idx]) else {
            return Ok(Value::Null);
        };
        let scale = scale_idx
            .iter()
            .map(|&i| row[i].as_f64())
            .try_fold(1.0, |acc, v| v.map(|x| acc * x));
        Ok(Value::from(scale.map(|s| model.evaluate(coefficients, s))))
    })?;

    if !unknown.is_empty() {
        warn!(
            group = %group,
            geography = ctx.geography,
            model_types = ?unknown,
            "unrecognized model types produce null demand"
        );
    }

    evaluated.select(&output_columns(ctx.geography_column))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(model_type: &str, slope: Option<f64>) -> Relation {
        Relation::from_rows(
            vec![
                Field::new("geography", DataType::Utf8),
                Field::new("sector", DataType::Utf8),
                Field::new("model_type", DataType::Utf8),
                Field::new("intercept", DataType::Float64),
                Field::new("slope", DataType::Float64),
                Field::new("year", DataType::Int64),
                Field::new("gdp_value", DataType::Float64),
                Field::new("hour", DataType::Int64),
                Field::new("profile_value", DataType::Float64),
            ],
            vec![vec![
                "c1".into(),
                "industrial".into(),
                model_type.into(),
                0.1.into(),
                slope.into(),
                2030.into(),
                1000.0.into(),
                3.into(),
                0.5.into(),
            ]],
        )
        .unwrap()
    }

    #[test]
    fn test_output_shape_and_value() {
        let ctx = ProjectionContext::new("geography", "c1");
        let out = evaluate_demand(&joined("lin", Some(0.2)), &ctx, SectorGroup::Economic, &["gdp_value"]).unwrap();
        assert_eq!(out.column_names(), vec!["hour", "year", "geography", "sector", "value"]);
        let v = out.rows()[0][4].as_f64().unwrap();
        assert!((v - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_coefficient_is_null() {
        let ctx = ProjectionContext::new("geography", "c1");
        let out = evaluate_demand(&joined("exp", None), &ctx, SectorGroup::Economic, &["gdp_value"]).unwrap();
        assert_eq!(out.rows()[0][4], Value::Null);
    }

    #[test]
    fn test_unknown_model_type_policy() {
        let rel = joined("cubic", Some(0.2));
        let ctx = ProjectionContext::new("geography", "c1");
        let out = evaluate_demand(&rel, &ctx, SectorGroup::Economic, &["gdp_value"]).unwrap();
        assert_eq!(out.rows()[0][4], Value::Null);

        let strict = ctx.with_unknown_model_type(UnknownModelPolicy::Error);
        let err = evaluate_demand(&rel, &strict, SectorGroup::Economic, &["gdp_value"]).unwrap_err();
        assert!(matches!(err, EngineError::UnknownModelType { model_type, .. } if model_type == "cubic"));
    }
}
