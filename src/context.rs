use crate::value::Value;

/// Record-specific lookup capability consulted by the evaluator.
///
/// One context instance represents one variant record. The evaluator borrows
/// it for the duration of a single `run` call and never mutates it; the
/// caller swaps in a fresh context per record. Implementations shared across
/// threads must be safe for concurrent read-only access.
///
/// `resolve` answers bare names (`DP`, `FILTER`, `ANN.EFFECT`); an unknown
/// name must yield [`Value::Missing`], not an error: absent annotations are
/// routine and must not abort filtering. Multi-valued fields (one element per
/// sample or per annotation) resolve to [`Value::List`]; `resolve_indexed`
/// answers a dotted composite name (`"GEN.DP"`) for one element of such a
/// field.
pub trait FieldContext {
    fn resolve(&self, name: &str) -> Value;

    fn resolve_indexed(&self, name: &str, index: usize) -> Value;

    fn is_present(&self, name: &str) -> bool {
        !self.resolve(name).is_missing()
    }
}

/// A context with no fields at all; every lookup is Missing.
///
/// Useful as the degenerate record: any compiled expression must evaluate
/// against it without raising purely from absent fields.
pub struct EmptyContext;

impl FieldContext for EmptyContext {
    fn resolve(&self, _name: &str) -> Value {
        Value::Missing
    }

    fn resolve_indexed(&self, _name: &str, _index: usize) -> Value {
        Value::Missing
    }
}

/// A record backed by a JSON object.
///
/// This is the bridge the CLI shell and the test suites use; a VCF-backed
/// context lives with the record-ingestion layer, not here.
///
/// Dotted names navigate nested objects (after trying the whole name as a
/// single key, so dotted annotation field names still win). JSON arrays
/// become Lists, `null` becomes Missing. For `resolve_indexed`, the first
/// name segment must be an array; the index selects its element and the rest
/// of the name navigates inside that element.
///
/// ```
/// use varsift::{FieldContext, JsonRecord, Value};
///
/// let record = JsonRecord::new(serde_json::json!({
///     "DP": 42,
///     "GEN": [{"DP": 10}, {"DP": 3}],
/// }));
/// assert_eq!(record.resolve("DP"), Value::Int(42));
/// assert_eq!(record.resolve_indexed("GEN.DP", 1), Value::Int(3));
/// assert_eq!(record.resolve("AF"), Value::Missing);
/// ```
pub struct JsonRecord {
    root: serde_json::Value,
}

impl JsonRecord {
    pub fn new(root: serde_json::Value) -> Self {
        JsonRecord { root }
    }

    fn lookup<'a>(node: &'a serde_json::Value, name: &str) -> Option<&'a serde_json::Value> {
        if let Some(v) = node.get(name) {
            return Some(v);
        }
        // Fall back to dotted navigation: "ANN.EFFECT" as ["ANN"]["EFFECT"].
        if name.contains('.') {
            let mut current = node;
            for segment in name.split('.') {
                current = current.get(segment)?;
            }
            return Some(current);
        }
        None
    }
}

impl FieldContext for JsonRecord {
    fn resolve(&self, name: &str) -> Value {
        match Self::lookup(&self.root, name) {
            Some(v) => json_to_value(v),
            None => Value::Missing,
        }
    }

    fn resolve_indexed(&self, name: &str, index: usize) -> Value {
        let (head, rest) = match name.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (name, None),
        };
        let Some(serde_json::Value::Array(items)) = self.root.get(head) else {
            return Value::Missing;
        };
        let Some(element) = items.get(index) else {
            return Value::Missing;
        };
        match rest {
            Some(rest) => match Self::lookup(element, rest) {
                Some(v) => json_to_value(v),
                None => Value::Missing,
            },
            None => json_to_value(element),
        }
    }
}

fn json_to_value(v: &serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Missing,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => Value::Str(s.clone()),
        serde_json::Value::Array(items) => Value::List(items.iter().map(json_to_value).collect()),
        // Objects are containers navigated by name, not values; an element
        // that is an object still contributes to list length and presence.
        serde_json::Value::Object(_) => Value::Missing,
    }
}
