use std::fmt;

/// Runtime value representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Bool(bool),
}

impl Value {
    /// Truthiness for conditions and the logical operators: nonzero
    /// integers and `true` are truthy.
    pub fn truthy(self) -> bool {
        match self {
            Value::Int(n) => n != 0,
            Value::Bool(b) => b,
        }
    }

    /// Numeric view used by arithmetic and comparisons; booleans coerce
    /// to 0/1.
    pub fn as_int(self) -> i64 {
        match self {
            Value::Int(n) => n,
            Value::Bool(b) => b as i64,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}
