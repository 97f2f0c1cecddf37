use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::relation::Value;

/// Functional form combining intensity coefficients with the drivers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ModelType {
    /// `exp(intercept + slope) * drivers`
    Exp,
    /// `(intercept + slope) * drivers`
    Lin,
}

impl ModelType {
    /// Demand for one row. `scale` is the product of the driver values and
    /// the hourly profile weight.
    pub fn evaluate(&self, coefficients: Coefficients, scale: f64) -> f64 {
        let combined = coefficients.intercept + coefficients.slope;
        match self {
            ModelType::Exp => combined.exp() * scale,
            ModelType::Lin => combined * scale,
        }
    }
}

/// Long-format intensity parameters; each becomes a column after pivoting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IntensityParameter {
    Intercept,
    Slope,
}

impl IntensityParameter {
    pub const ALL: [IntensityParameter; 2] = [IntensityParameter::Intercept, IntensityParameter::Slope];

    pub fn values() -> Vec<Value> {
        Self::ALL.iter().map(|p| Value::from(p.as_ref())).collect()
    }
}

/// Regression coefficients of one (geography, sector, model type) group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub intercept: f64,
    pub slope: f64,
}

impl Coefficients {
    /// Both coefficients, or `None` when either is missing
    pub fn from_values(intercept: &Value, slope: &Value) -> Option<Self> {
        Some(Self {
            intercept: intercept.as_f64()?,
            slope: slope.as_f64()?,
        })
    }
}

/// What to do with a `model_type` outside the known set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownModelPolicy {
    /// Emit a null demand for the row and log a warning
    #[default]
    Null,
    /// Fail the projection
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ModelType::Exp, 0.3_f64.exp() * 1000.0 * 0.05)]
    #[case(ModelType::Lin, 15.0)]
    fn test_evaluate(#[case] model: ModelType, #[case] expected: f64) {
        let coefficients = Coefficients {
            intercept: 0.1,
            slope: 0.2,
        };
        let v = model.evaluate(coefficients, 1000.0 * 0.05);
        assert!((v - expected).abs() < 1e-9, "{model}: {v} != {expected}");
    }

    #[test]
    fn test_exp_reference_value() {
        let v = ModelType::Exp.evaluate(Coefficients { intercept: 0.1, slope: 0.2 }, 50.0);
        assert!((v - 67.49).abs() < 0.01);
    }

    #[rstest]
    #[case("exp", Some(ModelType::Exp))]
    #[case("lin", Some(ModelType::Lin))]
    #[case("log", None)]
    #[case("EXP", None)]
    fn test_parse_model_type(#[case] raw: &str, #[case] expected: Option<ModelType>) {
        assert_eq!(raw.parse::<ModelType>().ok(), expected);
    }

    #[test]
    fn test_missing_coefficient() {
        assert!(Coefficients::from_values(&Value::from(0.1), &Value::Null).is_none());
        assert_eq!(
            Coefficients::from_values(&Value::from(0.1), &Value::from(0.2)),
            Some(Coefficients { intercept: 0.1, slope: 0.2 })
        );
    }

    #[test]
    fn test_policy_deserializes_lowercase() {
        let p: UnknownModelPolicy = serde_json::from_str(r#""error""#).unwrap();
        assert_eq!(p, UnknownModelPolicy::Error);
        assert_eq!(UnknownModelPolicy::default(), UnknownModelPolicy::Null);
    }
}
