use std::{collections::HashMap, fmt};

/// A dynamically typed value used throughout jsonql.
///
/// The same type carries literals, evaluation results and the decoded document
/// an expression is evaluated against.
///
/// # Absence
///
/// There is exactly one way to say "no value here": [`Value::Absent`]. JSON
/// `null`, the `null` keyword and a failed field or index lookup all produce it,
/// and nothing in the engine tells them apart.
///
/// # Type Preservation
///
/// Integers and floats are kept apart (unlike JSON, which only has "number"):
/// - `1` is an integer, `1.0` is a float
/// - integer arithmetic stays integral, except `/` which always yields a float
/// - mixing an integer with a float promotes both to float
///
/// # Examples
///
/// ```
/// use jsonql::Value;
/// use std::collections::HashMap;
///
/// let absent = Value::Absent;
/// let integer = Value::Int(42);
/// let float = Value::Float(3.5);
/// let string = Value::String("hello".to_string());
///
/// let mut obj = HashMap::new();
/// obj.insert("key".to_string(), Value::Bool(true));
/// let object = Value::Object(obj);
///
/// assert!(absent.is_absent());
/// assert_eq!(integer.to_string(), "42");
/// assert_eq!(float.to_string(), "3.5");
/// assert_eq!(string.to_string(), "hello");
/// assert!(!object.is_absent());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// JSON null or a missing field/index
    Absent,

    /// Boolean (true/false)
    Bool(bool),

    /// 64-bit signed integer
    Int(i64),

    /// 64-bit floating-point number
    Float(f64),

    /// UTF-8 string
    String(String),

    /// Ordered sequence of values
    Array(Vec<Value>),

    /// Record with string keys
    Object(HashMap<String, Value>),
}

impl Value {
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// `true` only for `Bool(true)`; absence and every other value count as false.
    pub fn is_true(&self) -> bool {
        matches!(self, Value::Bool(true))
    }

    /// Get as float, promoting integers
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as a sequence position.
    ///
    /// Floats qualify only when they hold a whole number.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Value::Int(n) => usize::try_from(*n).ok(),
            Value::Float(n) if n.fract() == 0.0 && *n >= 0.0 && *n <= usize::MAX as f64 => {
                Some(*n as usize)
            }
            _ => None,
        }
    }

    /// Field lookup; `None` for a missing key or a value that is not an object.
    pub fn get_field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(name),
            _ => None,
        }
    }

    /// Bracketed lookup.
    ///
    /// Numeric indexes address arrays; a string index addresses an object
    /// field. Anything else, or an index out of range, gives `None`.
    pub fn get_index(&self, index: &Value) -> Option<&Value> {
        match (self, index) {
            (Value::Array(items), index) => index.as_index().and_then(|i| items.get(i)),
            (Value::Object(map), Value::String(key)) => map.get(key),
            _ => None,
        }
    }

    /// Returns a human-readable type name
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Absent => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

/// Canonical text form.
///
/// Strings render without quotes and numbers in their shortest decimal form
/// (`22`, `22.1`); this is the text a regex is matched against. Arrays and
/// objects render as compact JSON.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Array(_) | Value::Object(_) => {
                write!(f, "{}", crate::convert::value_to_json(self.clone()))
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
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
