/// A runtime value produced by evaluating a filter expression.
///
/// The variant set is closed: no operator introduces anything outside it.
/// `Missing` stands for an absent or undefined field and is distinct from
/// `false`, `0` and the empty string; it propagates through arithmetic and
/// makes most comparisons false instead of erroring.
///
/// # Examples
///
/// ```
/// use varsift::Value;
///
/// let depth = Value::Int(42);
/// let af = Value::Float(0.05);
/// let filter = Value::Str("PASS".to_string());
/// let per_sample = Value::List(vec![Value::Int(10), Value::Int(3)]);
/// let absent = Value::Missing;
///
/// assert!(depth.as_bool());
/// assert!(!absent.as_bool());
/// assert!(per_sample.as_bool());
/// # let _ = (af, filter);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent or undefined field
    Missing,

    /// Boolean
    Bool(bool),

    /// Integer (preserved separately from floats)
    Int(i64),

    /// Floating-point number
    Float(f64),

    /// UTF-8 string
    Str(String),

    /// Ordered list of values; per-sample and per-annotation fields resolve
    /// to one of these. May nest when the source field itself nests.
    List(Vec<Value>),
}

impl Value {
    /// Truthiness used by conditions, logic operators and filter decisions.
    /// Missing is falsy by design, so a filter over absent annotations
    /// simply rejects rather than erroring.
    pub fn as_bool(&self) -> bool {
        use Value::*;
        match self {
            Missing => false,
            Bool(b) => *b,
            Int(n) => *n != 0,
            Float(n) => *n != 0.0,
            Str(s) => !s.is_empty(),
            List(items) => !items.is_empty(),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Numeric view, promoting Int to Float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Text view used by the match operators: scalars render to their
    /// literal form, lists and Missing do not coerce.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Str(s) => Some(s.clone()),
            Value::Int(n) => Some(n.to_string()),
            Value::Float(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Missing | Value::List(_) => None,
        }
    }

    /// Human-readable type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Missing => "missing",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
        }
    }

    /// Non-erroring equality used by set membership and `has`: numeric kinds
    /// compare promoted, mismatched kinds are simply unequal, and Missing is
    /// never equal to anything, itself included.
    pub fn loose_eq(&self, other: &Value) -> bool {
        use Value::*;
        match (self, other) {
            (Missing, _) | (_, Missing) => false,
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Int(a), Float(b)) | (Float(b), Int(a)) => (*a as f64) == *b,
            (Str(a), Str(b)) => a == b,
            (List(a), List(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.loose_eq(y))
            }
            _ => false,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Missing => write!(f, "."),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}
