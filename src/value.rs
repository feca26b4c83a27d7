use crate::error::{Result, ZgoubiError};
use crate::units::Quantity;

/// A dynamically typed field value, used for bulk configuration of commands.
///
/// `Nil` stands for a declared field that currently holds no value.
///
/// # Examples
///
/// ```rust
/// use zgoubidoo::value::Value;
/// let n = Value::Number(3.14);
/// assert_eq!(n.type_name(), "Number");
/// let nil = Value::default();
/// assert!(nil.is_nil());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Nil,
    Number(f64),
    Integer(i64),
    String(String),
    Bool(bool),
    Quantity(Quantity),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "Nil",
            Value::Number(_) => "Number",
            Value::Integer(_) => "Integer",
            Value::String(_) => "String",
            Value::Bool(_) => "Bool",
            Value::Quantity(_) => "Quantity",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Returns the value as a float; integers are widened.
    ///
    /// ```rust
    /// use zgoubidoo::value::Value;
    /// assert_eq!(Value::Integer(2).as_number(), Some(2.0));
    /// assert_eq!(Value::String("nope".into()).as_number(), None);
    /// ```
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Number(n) if n.fract() == 0.0 => Some(*n as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_quantity(&self) -> Option<&Quantity> {
        match self {
            Value::Quantity(q) => Some(q),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Quantity> for Value {
    fn from(q: Quantity) -> Self {
        Value::Quantity(q)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Nil)
    }
}

/// Conversion between a typed command field and a [`Value`].
pub trait FieldValue: Sized {
    const EXPECTED: &'static str;

    fn to_value(&self) -> Value;

    /// Converts `value` back into the field type; `None` when the types do not fit.
    fn from_value(value: &Value) -> Option<Self>;

    fn from_value_for(value: Value, keyword: &str, field: &str) -> Result<Self> {
        Self::from_value(&value).ok_or_else(|| ZgoubiError::Field {
            keyword: keyword.to_string(),
            field: field.to_string(),
            expected: Self::EXPECTED.to_string(),
            actual: value.type_name().to_string(),
        })
    }
}

impl FieldValue for f64 {
    const EXPECTED: &'static str = "Number";

    fn to_value(&self) -> Value {
        Value::Number(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_number()
    }
}

impl FieldValue for i64 {
    const EXPECTED: &'static str = "Integer";

    fn to_value(&self) -> Value {
        Value::Integer(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_integer()
    }
}

impl FieldValue for usize {
    const EXPECTED: &'static str = "non-negative Integer";

    fn to_value(&self) -> Value {
        Value::Integer(*self as i64)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_integer().and_then(|i| usize::try_from(i).ok())
    }
}

impl FieldValue for Quantity {
    const EXPECTED: &'static str = "Quantity";

    fn to_value(&self) -> Value {
        Value::Quantity(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Quantity(q) => Some(q.clone()),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn to_value(&self) -> Value {
        self.as_ref().map(FieldValue::to_value).unwrap_or(Value::Nil)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Nil => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl FieldValue for String {
    const EXPECTED: &'static str = "String";

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

/// Assigns `value` to a typed field slot, reporting a field error on mismatch.
pub fn assign_field<T: FieldValue>(
    slot: &mut T,
    value: Value,
    keyword: &str,
    field: &str,
) -> Result<()> {
    *slot = T::from_value_for(value, keyword, field)?;
    Ok(())
}
