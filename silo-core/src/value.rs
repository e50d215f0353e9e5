use crate::{Error, Result};

/// A scalar crossing the row boundary in either direction.
///
/// The catalog is deliberately small: these are the only shapes the
/// repository layer knows how to move between a table column and an entity
/// field. Booleans are transport-encoded as integer 0/1 by every supported
/// backend, so an inbound boolean may arrive as [`Value::Integer`].
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Integer(i64),
    Float32(f32),
    Float64(f64),
    Boolean(bool),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Conversion between an entity field and a [`Value`].
///
/// `as_value` renders the field for statement embedding, `try_from_value`
/// applies the type-specific reader when materializing a row. Readers are
/// forgiving across numeric widths the way the original result-set getters
/// were; anything else is a [`Error::Mapping`] fault.
pub trait AsValue: Sized {
    fn as_value(&self) -> Value;
    fn try_from_value(value: &Value) -> Result<Self>;
}

fn mapping(value: &Value, target: &'static str) -> Error {
    Error::Mapping {
        value: value.clone(),
        target,
    }
}

impl AsValue for i64 {
    fn as_value(&self) -> Value {
        Value::Integer(*self)
    }
    fn try_from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Integer(v) => Ok(*v),
            _ => Err(mapping(value, "i64")),
        }
    }
}

impl AsValue for i32 {
    fn as_value(&self) -> Value {
        Value::Integer(*self as i64)
    }
    fn try_from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Integer(v) => i32::try_from(*v).map_err(|_| mapping(value, "i32")),
            _ => Err(mapping(value, "i32")),
        }
    }
}

impl AsValue for f64 {
    fn as_value(&self) -> Value {
        Value::Float64(*self)
    }
    fn try_from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Float64(v) => Ok(*v),
            Value::Float32(v) => Ok(*v as f64),
            Value::Integer(v) => Ok(*v as f64),
            _ => Err(mapping(value, "f64")),
        }
    }
}

impl AsValue for f32 {
    fn as_value(&self) -> Value {
        Value::Float32(*self)
    }
    fn try_from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Float32(v) => Ok(*v),
            Value::Float64(v) => Ok(*v as f32),
            Value::Integer(v) => Ok(*v as f32),
            _ => Err(mapping(value, "f32")),
        }
    }
}

impl AsValue for bool {
    fn as_value(&self) -> Value {
        Value::Boolean(*self)
    }
    fn try_from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Boolean(v) => Ok(*v),
            // Integer reader compared against 1, the 0/1 transport encoding.
            Value::Integer(v) => Ok(*v == 1),
            _ => Err(mapping(value, "bool")),
        }
    }
}

impl AsValue for String {
    fn as_value(&self) -> Value {
        Value::Text(self.clone())
    }
    fn try_from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Text(v) => Ok(v.clone()),
            _ => Err(mapping(value, "String")),
        }
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_value(&self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => Value::Null,
        }
    }
    fn try_from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            _ => Ok(Some(T::try_from_value(value)?)),
        }
    }
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}
