//! Structured expressions over relation rows
//!
//! Row predicates are built as expression trees and bound
//! against a schema before evaluation, so column references are checked once
//! up front and no query text is ever assembled from strings.

use std::cmp::Ordering;

use ordered_float::OrderedFloat;

use super::schema::Schema;
use super::value::Value;
use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Lt,
    Gt,
    And,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Column(String),
    Literal(Value),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    InList {
        expr: Box<Expr>,
        list: Vec<Value>,
    },
}

/// Reference a column by name
pub fn col(name: impl Into<String>) -> Expr {
    Expr::Column(name.into())
}

/// Literal value
pub fn lit(value: impl Into<Value>) -> Expr {
    Expr::Literal(value.into())
}

impl Expr {
    fn binary(self, op: BinaryOp, right: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(self),
            right: Box::new(right),
        }
    }

    pub fn eq(self, right: Expr) -> Expr {
        self.binary(BinaryOp::Eq, right)
    }

    pub fn lt(self, right: Expr) -> Expr {
        self.binary(BinaryOp::Lt, right)
    }

    pub fn gt(self, right: Expr) -> Expr {
        self.binary(BinaryOp::Gt, right)
    }

    pub fn and(self, right: Expr) -> Expr {
        self.binary(BinaryOp::And, right)
    }

    pub fn is_in<I, V>(self, values: I) -> Expr
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Expr::InList {
            expr: Box::new(self),
            list: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Resolve column references against `schema`
    pub fn bind(&self, schema: &Schema) -> Result<BoundExpr> {
        Ok(match self {
            Expr::Column(name) => BoundExpr::Column(schema.index_of(name)?),
            Expr::Literal(v) => BoundExpr::Literal(v.clone()),
            Expr::Binary { op, left, right } => BoundExpr::Binary {
                op: *op,
                left: Box::new(left.bind(schema)?),
                right: Box::new(right.bind(schema)?),
            },
            Expr::InList { expr, list } => BoundExpr::InList {
                expr: Box::new(expr.bind(schema)?),
                list: list.clone(),
            },
        })
    }
}

/// Expression with column references resolved to row positions
#[derive(Debug, Clone)]
pub enum BoundExpr {
    Column(usize),
    Literal(Value),
    Binary {
        op: BinaryOp,
        left: Box<BoundExpr>,
        right: Box<BoundExpr>,
    },
    InList {
        expr: Box<BoundExpr>,
        list: Vec<Value>,
    },
}

impl BoundExpr {
    /// Evaluate against one row. A null operand makes a comparison null;
    /// AND follows three-valued logic.
    pub fn eval(&self, row: &[Value]) -> Result<Value> {
        match self {
            BoundExpr::Column(i) => Ok(row[*i].clone()),
            BoundExpr::Literal(v) => Ok(v.clone()),
            BoundExpr::InList { expr, list } => {
                let v = expr.eval(row)?;
                if v.is_null() {
                    return Ok(Value::Null);
                }
                Ok(Value::Boolean(
                    list.iter().any(|item| compare(&v, item) == Ordering::Equal),
                ))
            }
            BoundExpr::Binary { op: BinaryOp::And, left, right } => {
                and(left.eval(row)?, || right.eval(row))
            }
            BoundExpr::Binary { op, left, right } => {
                let l = left.eval(row)?;
                let r = right.eval(row)?;
                if l.is_null() || r.is_null() {
                    return Ok(Value::Null);
                }
                let ord = compare(&l, &r);
                Ok(Value::Boolean(match op {
                    BinaryOp::Lt => ord == Ordering::Less,
                    BinaryOp::Gt => ord == Ordering::Greater,
                    _ => ord == Ordering::Equal,
                }))
            }
        }
    }

    /// Evaluate as a filter predicate: only `true` keeps the row
    pub fn matches(&self, row: &[Value]) -> Result<bool> {
        Ok(matches!(self.eval(row)?, Value::Boolean(true)))
    }
}

fn operand_error(op: &str, value: &Value) -> EngineError {
    EngineError::InvalidOperand {
        op: op.to_string(),
        found: value
            .data_type()
            .map_or_else(|| "null".to_string(), |dt| dt.to_string()),
    }
}

/// Compare two non-null values; numbers compare by magnitude across types
fn compare(l: &Value, r: &Value) -> Ordering {
    match (l.as_f64(), r.as_f64()) {
        (Some(a), Some(b)) => OrderedFloat(a).cmp(&OrderedFloat(b)),
        _ => l.cmp(r),
    }
}

/// Three-valued AND; the right side is skipped once the left is false
fn and(left: Value, right: impl FnOnce() -> Result<Value>) -> Result<Value> {
    let l = match left {
        Value::Boolean(false) => return Ok(Value::Boolean(false)),
        Value::Boolean(true) => true,
        Value::Null => false,
        other => return Err(operand_error("AND", &other)),
    };
    match right()? {
        Value::Boolean(false) => Ok(Value::Boolean(false)),
        Value::Boolean(true) if l => Ok(Value::Boolean(true)),
        Value::Boolean(true) | Value::Null => Ok(Value::Null),
        other => Err(operand_error("AND", &other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::{DataType, Field};

    fn schema() -> Schema {
        Schema::new(vec![
            Field::new("sector", DataType::Utf8),
            Field::new("a", DataType::Float64),
            Field::new("b", DataType::Float64),
        ])
        .unwrap()
    }

    #[test]
    fn test_unknown_column_fails_at_bind() {
        let err = col("missing").eq(lit(1)).bind(&schema()).unwrap_err();
        assert!(matches!(err, EngineError::ColumnNotFound(c) if c == "missing"));
    }

    #[test]
    fn test_is_in_predicate() {
        let pred = col("sector")
            .is_in(["commercial", "industrial"])
            .bind(&schema())
            .unwrap();
        let row = vec![Value::from("industrial"), Value::from(1.0), Value::from(2.0)];
        assert!(pred.matches(&row).unwrap());
        let row = vec![Value::from("residential"), Value::from(1.0), Value::from(2.0)];
        assert!(!pred.matches(&row).unwrap());
    }

    #[test]
    fn test_null_comparison_never_matches() {
        let pred = col("a").lt(lit(1.0)).bind(&schema()).unwrap();
        let row = vec![Value::from("x"), Value::Null, Value::from(0.5)];
        assert_eq!(pred.eval(&row).unwrap(), Value::Null);
        assert!(!pred.matches(&row).unwrap());
    }

    #[test]
    fn test_three_valued_and() {
        let s = schema();
        let null_cmp = col("a").gt(lit(0.0));
        let false_cmp = col("sector").eq(lit("nope"));
        let true_cmp = col("b").gt(lit(0.0));
        let row = vec![Value::from("x"), Value::Null, Value::from(1.0)];

        let and = null_cmp.clone().and(false_cmp).bind(&s).unwrap();
        assert_eq!(and.eval(&row).unwrap(), Value::Boolean(false));

        let and = null_cmp.and(true_cmp.clone()).bind(&s).unwrap();
        assert_eq!(and.eval(&row).unwrap(), Value::Null);
        assert!(!and.matches(&row).unwrap());

        let and = true_cmp.clone().and(true_cmp).bind(&s).unwrap();
        assert!(and.matches(&row).unwrap());
    }

    #[test]
    fn test_non_boolean_and_operand_rejected() {
        let pred = col("sector").and(col("b").gt(lit(0.0))).bind(&schema()).unwrap();
        let row = vec![Value::from("x"), Value::from(1.0), Value::from(1.0)];
        assert!(matches!(
            pred.eval(&row),
            Err(EngineError::InvalidOperand { op, found }) if op == "AND" && found == "utf8"
        ));
    }

    #[test]
    fn test_integer_and_float_equality() {
        let s = Schema::new(vec![Field::new("year", DataType::Int64)]).unwrap();
        let pred = col("year").eq(lit(2030.0)).bind(&s).unwrap();
        assert!(pred.matches(&[Value::from(2030)]).unwrap());
    }
}
