use rust_decimal::{Decimal, prelude::FromPrimitive, prelude::ToPrimitive};

use crate::{
    ast::{
        Expr, PathIndex, Quantifier,
        operators::{ArithOp, CmpOp, LogicOp, UnaryOp},
    },
    context::FieldContext,
    value::Value,
};

/// Errors that abort evaluation of one record.
///
/// Missing-value propagation is not represented here: an absent field flows
/// through as [`Value::Missing`] by design. These variants cover the type
/// mismatches the value model leaves undefined.
#[derive(Debug, Clone)]
pub enum EvalError {
    /// Operation applied to value kinds it is not defined for
    TypeError(String),

    /// Integer division or modulo by zero
    DivisionByZero,

    /// Right operand of `=~` / `!~` is not a valid regular expression
    InvalidRegex(String),

    /// Call to a function the engine does not provide
    UnknownFunction(String),

    /// A wildcard index evaluated with no enclosing predicate to reduce over
    UnboundWildcard,
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::TypeError(msg) => write!(f, "Type error: {}", msg),
            EvalError::DivisionByZero => write!(f, "Division by zero"),
            EvalError::InvalidRegex(msg) => write!(f, "Invalid regex: {}", msg),
            EvalError::UnknownFunction(name) => write!(f, "Unknown function: {}()", name),
            EvalError::UnboundWildcard => {
                write!(f, "Wildcard index used outside an enclosing predicate")
            }
        }
    }
}

impl std::error::Error for EvalError {}

/// Per-call evaluation state threaded down the recursive walk.
///
/// `prefix` pins the element a field path selected: while it is set, bare
/// field references resolve through `resolve_indexed` with the composed
/// dotted name. `bindings` maps quantified access nodes (by address; the
/// AST is pinned for the duration of a call) to the element index the
/// current fold iteration assigns them.
#[derive(Clone, Default)]
struct Scope {
    prefix: Option<(String, usize)>,
    bindings: Vec<(usize, usize)>,
}

impl Scope {
    fn binding(&self, node: &Expr) -> Option<usize> {
        let key = node as *const Expr as usize;
        self.bindings
            .iter()
            .rev()
            .find(|(k, _)| *k == key)
            .map(|(_, i)| *i)
    }

    fn bind(&self, node: &Expr, index: usize) -> Scope {
        let mut next = self.clone();
        next.bindings.push((node as *const Expr as usize, index));
        next
    }
}

/// An unbound wildcard access found in a subtree: the node to bind, the
/// reduction it requests, the expression its element list comes from, and
/// the field-path prefix that list must be resolved under.
struct QuantSite<'e> {
    node: &'e Expr,
    quant: Quantifier,
    base: &'e Expr,
    prefix: Option<(String, usize)>,
}

/// The expression evaluator: a single recursive walk over the AST against
/// one borrowed record context. Stateless between calls; a compiled
/// expression may be evaluated concurrently against independent contexts.
pub struct Evaluator<'a> {
    ctx: &'a dyn FieldContext,
}

impl<'a> Evaluator<'a> {
    pub fn new(ctx: &'a dyn FieldContext) -> Self {
        Evaluator { ctx }
    }

    pub fn eval(&self, expr: &Expr) -> Result<Value, EvalError> {
        self.eval_scoped(expr, &Scope::default())
    }

    /// Entry point for predicate boundaries: the whole expression, each
    /// operand of a logic node, and the pieces of a conditional. A wildcard
    /// with no enclosing comparison of its own is reduced here, over the
    /// smallest expression that contains it.
    fn eval_scoped(&self, expr: &Expr, scope: &Scope) -> Result<Value, EvalError> {
        if matches!(expr, Expr::Cmp { .. } | Expr::Logic { .. } | Expr::Exists { .. }) {
            // these reduce their own wildcards
            return self.eval_expr(expr, scope);
        }
        match self.find_wildcard(expr, scope)? {
            Some(site) => self.fold_wildcard(expr, site, scope),
            None => self.eval_expr(expr, scope),
        }
    }

    /// Evaluate `expr` once per element of the wildcard's list and reduce:
    /// OR with short-circuit on the first true for ANY (false over an empty
    /// or absent list), AND with short-circuit on the first false for ALL
    /// (true over an empty or absent list). Remaining wildcards in the
    /// subtree fold recursively, so nested quantifiers compose with the
    /// base-most one outermost.
    fn fold_wildcard(
        &self,
        expr: &Expr,
        site: QuantSite<'_>,
        scope: &Scope,
    ) -> Result<Value, EvalError> {
        let base_scope = Scope {
            prefix: site.prefix.clone(),
            bindings: scope.bindings.clone(),
        };
        let len = match self.eval_expr(site.base, &base_scope)? {
            Value::List(items) => items.len(),
            Value::Missing => 0,
            other => {
                return Err(EvalError::TypeError(format!(
                    "cannot quantify over {} value (a list-valued field is required)",
                    other.type_name()
                )));
            }
        };
        match site.quant {
            Quantifier::Any => {
                for i in 0..len {
                    if self.eval_scoped(expr, &scope.bind(site.node, i))?.as_bool() {
                        return Ok(Value::Bool(true));
                    }
                }
                Ok(Value::Bool(false))
            }
            Quantifier::All => {
                for i in 0..len {
                    if !self.eval_scoped(expr, &scope.bind(site.node, i))?.as_bool() {
                        return Ok(Value::Bool(false));
                    }
                }
                Ok(Value::Bool(true))
            }
        }
    }

    fn find_wildcard<'e>(
        &self,
        expr: &'e Expr,
        scope: &Scope,
    ) -> Result<Option<QuantSite<'e>>, EvalError> {
        self.find_wildcard_in(expr, scope, &scope.prefix)
    }

    /// Scan a subtree for the first unbound wildcard access, in base-first
    /// order so a wildcard whose list depends on another element binding is
    /// never reached before that binding exists. Descent stops at nested
    /// comparison/logic/existence nodes (they reduce their own wildcards)
    /// and tracks the field-path prefix the wildcard's list must be
    /// resolved under. Concrete path indexes are evaluated along the way;
    /// lookups are side-effect free, so this is only repeated work.
    fn find_wildcard_in<'e>(
        &self,
        expr: &'e Expr,
        scope: &Scope,
        prefix: &Option<(String, usize)>,
    ) -> Result<Option<QuantSite<'e>>, EvalError> {
        match expr {
            Expr::Cmp { .. } | Expr::Logic { .. } | Expr::Exists { .. } => Ok(None),
            Expr::Index { base, index } => {
                if let Some(site) = self.find_wildcard_in(base, scope, prefix)? {
                    return Ok(Some(site));
                }
                if let Expr::IndexLiteral(q) = index.as_ref() {
                    if scope.binding(expr).is_none() {
                        return Ok(Some(QuantSite {
                            node: expr,
                            quant: *q,
                            base,
                            prefix: prefix.clone(),
                        }));
                    }
                    Ok(None)
                } else {
                    self.find_wildcard_in(index, scope, prefix)
                }
            }
            Expr::FieldPath { base, index, path } => {
                if let Some(site) = self.find_wildcard_in(base, scope, prefix)? {
                    return Ok(Some(site));
                }
                if prefix.is_some() {
                    // nested field paths error at evaluation; nothing to bind
                    return Ok(None);
                }
                let element = match index {
                    PathIndex::Quant(q) => match scope.binding(expr) {
                        None => {
                            return Ok(Some(QuantSite {
                                node: expr,
                                quant: *q,
                                base,
                                prefix: prefix.clone(),
                            }));
                        }
                        Some(i) => i,
                    },
                    PathIndex::At(e) => {
                        if let Some(site) = self.find_wildcard_in(e, scope, prefix)? {
                            return Ok(Some(site));
                        }
                        match self.eval_expr(e, scope)? {
                            Value::Int(n) if n >= 0 => n as usize,
                            // the access resolves to Missing before its path
                            // is ever evaluated, so no wildcard binds here
                            _ => return Ok(None),
                        }
                    }
                };
                match field_name(base) {
                    Some(name) => self.find_wildcard_in(path, scope, &Some((name, element))),
                    None => Ok(None),
                }
            }
            Expr::Unary { operand, .. } => self.find_wildcard_in(operand, scope, prefix),
            Expr::Arith { left, right, .. } => {
                if let Some(site) = self.find_wildcard_in(left, scope, prefix)? {
                    return Ok(Some(site));
                }
                self.find_wildcard_in(right, scope, prefix)
            }
            Expr::Cond {
                cond,
                then_branch,
                else_branch,
            } => {
                if let Some(site) = self.find_wildcard_in(cond, scope, prefix)? {
                    return Ok(Some(site));
                }
                if let Some(site) = self.find_wildcard_in(then_branch, scope, prefix)? {
                    return Ok(Some(site));
                }
                self.find_wildcard_in(else_branch, scope, prefix)
            }
            Expr::Call { args, .. } => {
                for arg in args {
                    if let Some(site) = self.find_wildcard_in(arg, scope, prefix)? {
                        return Ok(Some(site));
                    }
                }
                Ok(None)
            }
            Expr::InSet { value, elements } => {
                if let Some(site) = self.find_wildcard_in(value, scope, prefix)? {
                    return Ok(Some(site));
                }
                for element in elements {
                    if let Some(site) = self.find_wildcard_in(element, scope, prefix)? {
                        return Ok(Some(site));
                    }
                }
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn eval_expr(&self, expr: &Expr, scope: &Scope) -> Result<Value, EvalError> {
        match expr {
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Int(n) => Ok(Value::Int(*n)),
            Expr::Float(n) => Ok(Value::Float(*n)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::IndexLiteral(_) => Err(EvalError::TypeError(
                "wildcard index is only meaningful inside a bracketed access".to_string(),
            )),
            Expr::Field(name) => Ok(self.resolve_field(name, scope)),
            Expr::Call { name, args } => self.eval_call(name, args, scope),
            Expr::Unary { op, operand } => {
                let v = self.eval_expr(operand, scope)?;
                self.apply_unary(*op, v)
            }
            Expr::Arith { op, left, right } => {
                let l = self.eval_expr(left, scope)?;
                let r = self.eval_expr(right, scope)?;
                if l.is_missing() || r.is_missing() {
                    return Ok(Value::Missing);
                }
                apply_arith(*op, &l, &r)
            }
            Expr::Cmp { op, left, right } => {
                let site = match self.find_wildcard(left, scope)? {
                    Some(site) => Some(site),
                    None => self.find_wildcard(right, scope)?,
                };
                if let Some(site) = site {
                    return self.fold_wildcard(expr, site, scope);
                }
                let l = self.eval_expr(left, scope)?;
                let r = self.eval_expr(right, scope)?;
                self.apply_cmp(*op, &l, &r)
            }
            Expr::Logic { op, left, right } => match op {
                LogicOp::AndAnd => {
                    if !self.eval_scoped(left, scope)?.as_bool() {
                        return Ok(Value::Bool(false));
                    }
                    Ok(Value::Bool(self.eval_scoped(right, scope)?.as_bool()))
                }
                LogicOp::OrOr => {
                    if self.eval_scoped(left, scope)?.as_bool() {
                        return Ok(Value::Bool(true));
                    }
                    Ok(Value::Bool(self.eval_scoped(right, scope)?.as_bool()))
                }
                // strict family: both operands always evaluated
                LogicOp::And | LogicOp::Or | LogicOp::Xor => {
                    let l = self.eval_scoped(left, scope)?.as_bool();
                    let r = self.eval_scoped(right, scope)?.as_bool();
                    let out = match op {
                        LogicOp::And => l && r,
                        LogicOp::Or => l || r,
                        _ => l ^ r,
                    };
                    Ok(Value::Bool(out))
                }
            },
            Expr::Cond {
                cond,
                then_branch,
                else_branch,
            } => {
                // exactly one branch is evaluated; the untaken branch never
                // touches the context
                if self.eval_scoped(cond, scope)?.as_bool() {
                    self.eval_scoped(then_branch, scope)
                } else {
                    self.eval_scoped(else_branch, scope)
                }
            }
            Expr::Exists { negated, operand } => {
                if let Some(site) = self.find_wildcard(operand, scope)? {
                    return self.fold_wildcard(expr, site, scope);
                }
                if let Expr::Field(name) = operand.as_ref()
                    && scope.prefix.is_none()
                    && !self.ctx.is_present(name)
                {
                    return Ok(Value::Bool(*negated));
                }
                let present = match self.eval_expr(operand, scope)? {
                    Value::Missing => false,
                    Value::List(items) => !items.is_empty(),
                    _ => true,
                };
                Ok(Value::Bool(present != *negated))
            }
            Expr::Index { base, index } => self.eval_index(expr, base, index, scope),
            Expr::FieldPath { base, index, path } => {
                self.eval_field_path(expr, base, index, path, scope)
            }
            Expr::InSet { value, elements } => {
                let v = self.eval_expr(value, scope)?;
                if v.is_missing() {
                    return Ok(Value::Bool(false));
                }
                for element in elements {
                    if v.loose_eq(&self.eval_expr(element, scope)?) {
                        return Ok(Value::Bool(true));
                    }
                }
                Ok(Value::Bool(false))
            }
        }
    }

    /// Bare field reference. Inside a field path the name composes with the
    /// pinned element; otherwise it resolves record-wide. Unknown names are
    /// Missing either way.
    fn resolve_field(&self, name: &str, scope: &Scope) -> Value {
        match &scope.prefix {
            Some((outer, index)) => self
                .ctx
                .resolve_indexed(&format!("{}.{}", outer, name), *index),
            None => self.ctx.resolve(name),
        }
    }

    fn eval_index(
        &self,
        node: &Expr,
        base: &Expr,
        index: &Expr,
        scope: &Scope,
    ) -> Result<Value, EvalError> {
        // wildcard index: the element position comes from the enclosing fold
        if matches!(index, Expr::IndexLiteral(_)) {
            let i = scope.binding(node).ok_or(EvalError::UnboundWildcard)?;
            return match self.eval_expr(base, scope)? {
                Value::Missing => Ok(Value::Missing),
                Value::List(items) => Ok(items.get(i).cloned().unwrap_or(Value::Missing)),
                other => Err(EvalError::TypeError(format!(
                    "cannot index into {} value",
                    other.type_name()
                ))),
            };
        }
        match self.eval_expr(base, scope)? {
            Value::Missing => Ok(Value::Missing),
            Value::List(items) => match self.eval_expr(index, scope)? {
                Value::Missing => Ok(Value::Missing),
                Value::Int(n) => {
                    if n < 0 {
                        return Ok(Value::Missing);
                    }
                    Ok(items.get(n as usize).cloned().unwrap_or(Value::Missing))
                }
                other => Err(EvalError::TypeError(format!(
                    "index must be an integer, got {}",
                    other.type_name()
                ))),
            },
            other => Err(EvalError::TypeError(format!(
                "cannot index into {} value",
                other.type_name()
            ))),
        }
    }

    fn eval_field_path(
        &self,
        node: &Expr,
        base: &Expr,
        index: &PathIndex,
        path: &Expr,
        scope: &Scope,
    ) -> Result<Value, EvalError> {
        if scope.prefix.is_some() {
            return Err(EvalError::TypeError(
                "nested field paths are not supported inside a field path".to_string(),
            ));
        }
        let Some(name) = field_name(base) else {
            return Err(EvalError::TypeError(
                "the base of a field path must be a named field".to_string(),
            ));
        };
        let element = match index {
            PathIndex::Quant(_) => scope.binding(node).ok_or(EvalError::UnboundWildcard)?,
            PathIndex::At(e) => match self.eval_expr(e, scope)? {
                Value::Missing => return Ok(Value::Missing),
                Value::Int(n) if n >= 0 => n as usize,
                Value::Int(_) => return Ok(Value::Missing),
                other => {
                    return Err(EvalError::TypeError(format!(
                        "index must be an integer, got {}",
                        other.type_name()
                    )));
                }
            },
        };
        match self.resolve_field(&name, scope) {
            Value::Missing => return Ok(Value::Missing),
            Value::List(items) => {
                if element >= items.len() {
                    return Ok(Value::Missing);
                }
            }
            other => {
                return Err(EvalError::TypeError(format!(
                    "field '{}' is {}; indexed access needs a list-valued field",
                    name,
                    other.type_name()
                )));
            }
        }
        let inner = Scope {
            prefix: Some((name, element)),
            bindings: scope.bindings.clone(),
        };
        self.eval_expr(path, &inner)
    }

    fn apply_unary(&self, op: UnaryOp, v: Value) -> Result<Value, EvalError> {
        match op {
            UnaryOp::Not => Ok(Value::Bool(!v.as_bool())),
            UnaryOp::Neg => match v {
                Value::Missing => Ok(Value::Missing),
                Value::Int(n) => Ok(Value::Int(-n)),
                Value::Float(n) => Ok(Value::Float(-n)),
                other => Err(EvalError::TypeError(format!(
                    "cannot negate {} value",
                    other.type_name()
                ))),
            },
            UnaryOp::Plus => match v {
                Value::Missing | Value::Int(_) | Value::Float(_) => Ok(v),
                other => Err(EvalError::TypeError(format!(
                    "unary '+' needs a number, got {}",
                    other.type_name()
                ))),
            },
        }
    }

    fn apply_cmp(&self, op: CmpOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
        match op {
            CmpOp::Match | CmpOp::NotMatch => self.apply_match(op, left, right),
            CmpOp::Has => self.apply_has(left, right),
            CmpOp::Eq | CmpOp::Ne => {
                // Missing compares false against everything, inequality included
                if left.is_missing() || right.is_missing() {
                    return Ok(Value::Bool(false));
                }
                let eq = value_eq(left, right)?;
                Ok(Value::Bool(if op == CmpOp::Ne { !eq } else { eq }))
            }
            _ => {
                if left.is_missing() || right.is_missing() {
                    return Ok(Value::Bool(false));
                }
                let out = match value_cmp(left, right)? {
                    None => false,
                    Some(ord) => match op {
                        CmpOp::Lt => ord.is_lt(),
                        CmpOp::Le => ord.is_le(),
                        CmpOp::Gt => ord.is_gt(),
                        CmpOp::Ge => ord.is_ge(),
                        _ => unreachable!(),
                    },
                };
                Ok(Value::Bool(out))
            }
        }
    }

    fn apply_match(&self, op: CmpOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
        if left.is_missing() || right.is_missing() {
            return Ok(Value::Bool(false));
        }
        let Value::Str(pattern) = right else {
            return Err(EvalError::TypeError(format!(
                "match pattern must be a string, got {}",
                right.type_name()
            )));
        };
        let Some(text) = left.as_text() else {
            return Err(EvalError::TypeError(format!(
                "cannot match a {} value against a pattern",
                left.type_name()
            )));
        };
        let re = regex::Regex::new(pattern).map_err(|e| EvalError::InvalidRegex(e.to_string()))?;
        let found = re.is_match(&text);
        Ok(Value::Bool(if op == CmpOp::NotMatch {
            !found
        } else {
            found
        }))
    }

    fn apply_has(&self, left: &Value, right: &Value) -> Result<Value, EvalError> {
        match (left, right) {
            (Value::Missing, _) | (_, Value::Missing) => Ok(Value::Bool(false)),
            (Value::Str(haystack), needle) => {
                let Some(needle) = needle.as_text() else {
                    return Err(EvalError::TypeError(format!(
                        "'has' needs a scalar on the right, got {}",
                        needle.type_name()
                    )));
                };
                Ok(Value::Bool(haystack.contains(&needle)))
            }
            (Value::List(items), needle) => {
                Ok(Value::Bool(items.iter().any(|item| item.loose_eq(needle))))
            }
            (other, _) => Err(EvalError::TypeError(format!(
                "'has' needs a string or list on the left, got {}",
                other.type_name()
            ))),
        }
    }

    fn eval_call(&self, name: &str, args: &[Expr], scope: &Scope) -> Result<Value, EvalError> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_expr(arg, scope)?);
        }
        match name {
            "size" => {
                let v = one_arg(name, &values)?;
                match v {
                    Value::Missing => Ok(Value::Missing),
                    Value::List(items) => Ok(Value::Int(items.len() as i64)),
                    Value::Str(s) => Ok(Value::Int(s.chars().count() as i64)),
                    other => Err(EvalError::TypeError(format!(
                        "size() needs a list or string, got {}",
                        other.type_name()
                    ))),
                }
            }
            "abs" => {
                let v = one_arg(name, &values)?;
                match v {
                    Value::Missing => Ok(Value::Missing),
                    Value::Int(n) => Ok(Value::Int(n.abs())),
                    Value::Float(n) => Ok(Value::Float(n.abs())),
                    other => Err(EvalError::TypeError(format!(
                        "abs() needs a number, got {}",
                        other.type_name()
                    ))),
                }
            }
            "min" | "max" => {
                let v = one_arg(name, &values)?;
                let items = match v {
                    Value::Missing => return Ok(Value::Missing),
                    Value::List(items) => items,
                    other => {
                        return Err(EvalError::TypeError(format!(
                            "{}() needs a list, got {}",
                            name,
                            other.type_name()
                        )));
                    }
                };
                let mut best: Option<&Value> = None;
                for item in items {
                    if item.is_missing() {
                        continue;
                    }
                    let Some(candidate) = item.as_float() else {
                        return Err(EvalError::TypeError(format!(
                            "{}() needs numeric elements, got {}",
                            name,
                            item.type_name()
                        )));
                    };
                    let replace = match best.and_then(|b| b.as_float()) {
                        None => true,
                        Some(current) => {
                            if name == "min" {
                                candidate < current
                            } else {
                                candidate > current
                            }
                        }
                    };
                    if replace {
                        best = Some(item);
                    }
                }
                Ok(best.cloned().unwrap_or(Value::Missing))
            }
            "upper" | "lower" => {
                let v = one_arg(name, &values)?;
                match v {
                    Value::Missing => Ok(Value::Missing),
                    Value::Str(s) => Ok(Value::Str(if name == "upper" {
                        s.to_uppercase()
                    } else {
                        s.to_lowercase()
                    })),
                    other => Err(EvalError::TypeError(format!(
                        "{}() needs a string, got {}",
                        name,
                        other.type_name()
                    ))),
                }
            }
            "str" => {
                let v = one_arg(name, &values)?;
                match v {
                    Value::Missing => Ok(Value::Missing),
                    other => match other.as_text() {
                        Some(s) => Ok(Value::Str(s)),
                        None => Err(EvalError::TypeError(format!(
                            "str() needs a scalar, got {}",
                            other.type_name()
                        ))),
                    },
                }
            }
            _ => Err(EvalError::UnknownFunction(name.to_string())),
        }
    }
}

fn field_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Field(name) => Some(name.clone()),
        _ => None,
    }
}

fn one_arg<'v>(name: &str, values: &'v [Value]) -> Result<&'v Value, EvalError> {
    match values {
        [v] => Ok(v),
        _ => Err(EvalError::TypeError(format!(
            "{}() takes exactly one argument, got {}",
            name,
            values.len()
        ))),
    }
}

/// Strict equality for `==` / `!=`: numeric kinds compare promoted,
/// otherwise both sides must be the same kind.
fn value_eq(left: &Value, right: &Value) -> Result<bool, EvalError> {
    use Value::*;
    match (left, right) {
        (Bool(a), Bool(b)) => Ok(a == b),
        (Int(a), Int(b)) => Ok(a == b),
        (Float(a), Float(b)) => Ok(a == b),
        (Int(a), Float(b)) | (Float(b), Int(a)) => Ok((*a as f64) == *b),
        (Str(a), Str(b)) => Ok(a == b),
        (List(_), List(_)) => Ok(left.loose_eq(right)),
        (a, b) => Err(EvalError::TypeError(format!(
            "cannot compare {} and {}",
            a.type_name(),
            b.type_name()
        ))),
    }
}

/// Ordering for `< <= > >=`: numeric (promoted) or lexicographic on strings.
/// Booleans only compare for equality. `None` covers NaN.
fn value_cmp(left: &Value, right: &Value) -> Result<Option<std::cmp::Ordering>, EvalError> {
    use Value::*;
    match (left, right) {
        (Int(a), Int(b)) => Ok(Some(a.cmp(b))),
        (Str(a), Str(b)) => Ok(Some(a.cmp(b))),
        (Bool(_), _) | (_, Bool(_)) => Err(EvalError::TypeError(
            "booleans only compare for equality".to_string(),
        )),
        _ => match (left.as_float(), right.as_float()) {
            (Some(a), Some(b)) => Ok(a.partial_cmp(&b)),
            _ => Err(EvalError::TypeError(format!(
                "cannot order {} and {}",
                left.type_name(),
                right.type_name()
            ))),
        },
    }
}

fn apply_arith(op: ArithOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    use Value::*;
    match (left, right) {
        (Int(a), Int(b)) => int_arith(op, *a, *b),
        (Float(a), Float(b)) => Ok(Float(float_arith(op, *a, *b))),
        (Int(a), Float(b)) => Ok(mixed_arith(
            op,
            Decimal::from_i64(*a),
            Decimal::from_f64(*b),
            *a as f64,
            *b,
        )),
        (Float(a), Int(b)) => Ok(mixed_arith(
            op,
            Decimal::from_f64(*a),
            Decimal::from_i64(*b),
            *a,
            *b as f64,
        )),
        (a, b) => Err(EvalError::TypeError(format!(
            "cannot apply '{}' to {} and {}",
            op,
            a.type_name(),
            b.type_name()
        ))),
    }
}

fn int_arith(op: ArithOp, a: i64, b: i64) -> Result<Value, EvalError> {
    match op {
        ArithOp::Add => Ok(Value::Int(a + b)),
        ArithOp::Sub => Ok(Value::Int(a - b)),
        ArithOp::Mul => Ok(Value::Int(a * b)),
        ArithOp::Div => {
            if b == 0 {
                Err(EvalError::DivisionByZero)
            } else if a % b == 0 {
                Ok(Value::Int(a / b))
            } else {
                Ok(Value::Float(a as f64 / b as f64))
            }
        }
        ArithOp::Mod => {
            if b == 0 {
                Err(EvalError::DivisionByZero)
            } else {
                Ok(Value::Int(a % b))
            }
        }
    }
}

fn float_arith(op: ArithOp, a: f64, b: f64) -> f64 {
    match op {
        ArithOp::Add => a + b,
        ArithOp::Sub => a - b,
        ArithOp::Mul => a * b,
        ArithOp::Div => a / b,
        ArithOp::Mod => a % b,
    }
}

// Mixed Int/Float arithmetic goes through Decimal so results that are
// mathematically whole come back as Int instead of picking up float error.
fn mixed_arith(op: ArithOp, da: Option<Decimal>, db: Option<Decimal>, fa: f64, fb: f64) -> Value {
    if let Some(a) = da
        && let Some(b) = db
        && !(b.is_zero() && matches!(op, ArithOp::Div | ArithOp::Mod))
    {
        let rd = match op {
            ArithOp::Add => a + b,
            ArithOp::Sub => a - b,
            ArithOp::Mul => a * b,
            ArithOp::Div => a / b,
            ArithOp::Mod => a % b,
        };
        if rd.is_integer()
            && let Some(r) = rd.to_i64()
        {
            return Value::Int(r);
        } else if let Some(r) = rd.to_f64() {
            return Value::Float(r);
        }
    }
    Value::Float(float_arith(op, fa, fb))
}
