use std::fmt;

use crate::ast::operators::{ArithOp, CmpOp, LogicOp, UnaryOp};

/// Wildcard index kind: decides how the enclosing predicate is reduced over
/// the elements of a multi-valued field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Quantifier {
    /// `ANY` / `*` - OR reduction, false over an empty list
    Any,
    /// `ALL` / `?` - AND reduction, true over an empty list
    All,
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantifier::Any => write!(f, "ANY"),
            Quantifier::All => write!(f, "ALL"),
        }
    }
}

/// The index position of a field-path access: either a wildcard or a
/// concrete expression evaluating to an element position.
#[derive(Debug, Clone, PartialEq)]
pub enum PathIndex {
    Quant(Quantifier),
    At(Box<Expr>),
}

/// Abstract Syntax Tree node representing a parsed filter expression.
///
/// Built once by the parser, read-only during evaluation. Every node owns its
/// children exclusively; there is no sharing between subtrees.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // Literals
    /// Boolean literal
    Bool(bool),

    /// Integer literal
    Int(i64),

    /// Floating-point literal
    Float(f64),

    /// String literal
    ///
    /// # Example
    /// ```text
    /// 'PASS'
    /// ```
    Str(String),

    /// A wildcard token (`ANY`, `*`, `ALL`, `?`) in primary position.
    ///
    /// Only meaningful as the index of a bracketed access; anywhere else it
    /// is an evaluation error.
    IndexLiteral(Quantifier),

    /// Record field reference
    ///
    /// # Examples
    /// ```text
    /// DP
    /// ANN.EFFECT
    /// ```
    Field(String),

    /// Builtin function call
    ///
    /// # Example
    /// ```text
    /// size(AC)
    /// ```
    Call { name: String, args: Vec<Expr> },

    /// Prefix operation (`!`, `-`, `+`)
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// Binary arithmetic
    Arith {
        op: ArithOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Comparison or match
    Cmp {
        op: CmpOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Logic combination
    Logic {
        op: LogicOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Conditional (`cond ? then : else`); exactly one branch is evaluated
    Cond {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },

    /// Presence test (`exists e`) or its negation (`na e`)
    Exists { negated: bool, operand: Box<Expr> },

    /// Simple index access into a list-valued field
    ///
    /// # Example
    /// ```text
    /// AC[0]
    /// ```
    Index { base: Box<Expr>, index: Box<Expr> },

    /// Field-path access: select one element of a multi-valued field (or
    /// quantify over all of them) and resolve a field against it
    ///
    /// # Examples
    /// ```text
    /// GEN[0].DP
    /// ANN[ANY].EFFECT
    /// GEN[1].AD[0]
    /// ```
    FieldPath {
        base: Box<Expr>,
        index: PathIndex,
        path: Box<Expr>,
    },

    /// Set membership test
    ///
    /// # Example
    /// ```text
    /// CHROM in SET['chr1', 'chrX']
    /// ```
    InSet { value: Box<Expr>, elements: Vec<Expr> },
}

// Canonical rendering: fully parenthesized so that re-parsing the output
// always reproduces the original grouping, whatever precedence the source
// relied on.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Bool(b) => write!(f, "{}", b),
            Expr::Int(n) => write!(f, "{}", n),
            Expr::Float(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    write!(f, "{:.1}", n)
                } else {
                    write!(f, "{}", n)
                }
            }
            Expr::Str(s) => write!(f, "'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
            Expr::IndexLiteral(q) => write!(f, "{}", q),
            Expr::Field(name) => write!(f, "{}", name),
            Expr::Call { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Expr::Unary { op, operand } => write!(f, "{}({})", op, operand),
            Expr::Arith { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Expr::Cmp { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Expr::Logic { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Expr::Cond {
                cond,
                then_branch,
                else_branch,
            } => write!(f, "({} ? {} : {})", cond, then_branch, else_branch),
            Expr::Exists { negated, operand } => {
                write!(f, "{} ({})", if *negated { "na" } else { "exists" }, operand)
            }
            Expr::Index { base, index } => write!(f, "{}[{}]", base, index),
            Expr::FieldPath { base, index, path } => match index {
                PathIndex::Quant(q) => write!(f, "{}[{}].{}", base, q, path),
                PathIndex::At(e) => write!(f, "{}[{}].{}", base, e, path),
            },
            Expr::InSet { value, elements } => {
                write!(f, "({} in SET[", value)?;
                for (i, e) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", e)?;
                }
                write!(f, "])")
            }
        }
    }
}
