use serde::{Deserialize, Serialize};

use super::value::{DataType, Value};
use crate::error::{EngineError, Result};

/// Named, typed column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }

    /// Check that a value may be stored in this column
    pub fn accepts(&self, value: &Value) -> Result<()> {
        match value.data_type() {
            None => Ok(()),
            Some(dt) if dt == self.data_type => Ok(()),
            Some(dt) => Err(EngineError::TypeMismatch {
                column: self.name.clone(),
                expected: self.data_type,
                found: dt.to_string(),
            }),
        }
    }
}

/// Ordered list of uniquely named fields
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Result<Self> {
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].iter().any(|f| f.name == field.name) {
                return Err(EngineError::DuplicateColumn(field.name.clone()));
            }
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.fields
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| EngineError::ColumnNotFound(name.to_string()))
    }

    pub fn field(&self, name: &str) -> Result<&Field> {
        self.index_of(name).map(|i| &self.fields[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_columns_rejected() {
        let result = Schema::new(vec![
            Field::new("value", DataType::Float64),
            Field::new("value", DataType::Float64),
        ]);
        assert!(matches!(result, Err(EngineError::DuplicateColumn(c)) if c == "value"));
    }

    #[test]
    fn test_field_accepts_null_and_matching_type() {
        let field = Field::new("year", DataType::Int64);
        assert!(field.accepts(&Value::Null).is_ok());
        assert!(field.accepts(&Value::from(2030)).is_ok());
        assert!(field.accepts(&Value::from("2030")).is_err());
    }
}
