//! A filter expression engine for genomic variant records.
//!
//! An expression is compiled once and then evaluated against a stream of
//! records, one [`FieldContext`] per record:
//!
//! ```
//! use varsift::{JsonRecord, Value, compile, run};
//!
//! let expr = compile("(DP > 10) && (FILTER = 'PASS')").unwrap();
//!
//! let record = JsonRecord::new(serde_json::json!({
//!     "DP": 42,
//!     "FILTER": "PASS",
//! }));
//! assert_eq!(run(&expr, &record).unwrap(), Value::Bool(true));
//! ```
//!
//! Per-sample and per-annotation fields are lists; `GEN[ANY].DP > 10` holds
//! when any sample passes, `GEN[ALL].DP > 10` when every sample does. Absent
//! fields evaluate to [`Value::Missing`] and flow through comparisons as
//! `false` rather than aborting the run.
pub mod ast;
pub mod context;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod value;

pub use ast::{Expr, Quantifier};
pub use context::{EmptyContext, FieldContext, JsonRecord};
pub use evaluator::{EvalError, Evaluator};
pub use lexer::{LexError, Lexer};
pub use parser::{ParseError, Parser, SyntaxError};
pub use value::Value;

/// A parsed, immutable filter expression.
///
/// Compiling is pure computation over the source text; the result can be
/// reused across a whole record stream and shared between threads, with each
/// evaluation borrowing its own per-record context.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpression {
    root: Expr,
    source: String,
}

impl CompiledExpression {
    pub fn root(&self) -> &Expr {
        &self.root
    }

    /// The original expression text.
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl std::fmt::Display for CompiledExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.root)
    }
}

/// Compile an expression string into its executable form.
pub fn compile(source: &str) -> Result<CompiledExpression, ParseError> {
    let lexer = Lexer::new(source);
    let mut parser = Parser::new(lexer)?;
    let root = parser.parse()?;
    Ok(CompiledExpression {
        root,
        source: source.to_string(),
    })
}

/// Evaluate a compiled expression against one record.
pub fn run(compiled: &CompiledExpression, context: &dyn FieldContext) -> Result<Value, EvalError> {
    Evaluator::new(context).eval(&compiled.root)
}
