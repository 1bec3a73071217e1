use crate::ast::TokenKind;

// Precedence levels, loosest binding first. The parser threads the minimum
// acceptable level through each recursive call; an infix construct is taken
// while its level is >= the minimum in force. Left associativity comes from
// re-entering the right operand one level tighter.
pub const PREC_TERNARY: u8 = 1;
pub const PREC_SET: u8 = 3;
pub const PREC_EXISTS: u8 = 4;
pub const PREC_LOGIC: u8 = 5;
pub const PREC_UNARY: u8 = 6;
pub const PREC_COMPARE: u8 = 7;
pub const PREC_ADD: u8 = 8;
pub const PREC_MUL: u8 = 9;
pub const PREC_QUANT_PATH: u8 = 10;
pub const PREC_INDEX_PATH: u8 = 11;
pub const PREC_INDEX: u8 = 12;

/// Arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArithOp {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Modulo (`%`)
    Mod,
}

/// Comparison and match operators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CmpOp {
    /// Equal (`==`, or the `=` synonym)
    Eq,
    /// Not equal (`!=`)
    Ne,
    /// Less than (`<`)
    Lt,
    /// Less than or equal (`<=`)
    Le,
    /// Greater than (`>`)
    Gt,
    /// Greater than or equal (`>=`)
    Ge,
    /// Regex match (`=~`)
    Match,
    /// Regex non-match (`!~`)
    NotMatch,
    /// Substring or element containment (`has`)
    Has,
}

/// Logic operators. The double spellings short-circuit; the single spellings
/// always evaluate both operands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogicOp {
    /// Strict AND (`&`)
    And,
    /// Short-circuit AND (`&&`)
    AndAnd,
    /// Strict OR (`|`)
    Or,
    /// Short-circuit OR (`||`)
    OrOr,
    /// Strict XOR (`^`)
    Xor,
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOp {
    /// Logical negation (`!`)
    Not,
    /// Numeric negation (`-`)
    Neg,
    /// Numeric identity (`+`)
    Plus,
}

/// The kind of binary operator an infix token denotes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinOp {
    Arith(ArithOp),
    Cmp(CmpOp),
    Logic(LogicOp),
}

/// Static token-to-operator table: binding level and operator kind for every
/// infix token. Returns `None` for tokens that are not binary operators.
/// Right operands re-enter at `level + 1` (all binary families here are
/// left-associative).
pub fn binary_op(token: &TokenKind) -> Option<(BinOp, u8)> {
    let entry = match token {
        TokenKind::Amp => (BinOp::Logic(LogicOp::And), PREC_LOGIC),
        TokenKind::AmpAmp => (BinOp::Logic(LogicOp::AndAnd), PREC_LOGIC),
        TokenKind::Pipe => (BinOp::Logic(LogicOp::Or), PREC_LOGIC),
        TokenKind::PipePipe => (BinOp::Logic(LogicOp::OrOr), PREC_LOGIC),
        TokenKind::Caret => (BinOp::Logic(LogicOp::Xor), PREC_LOGIC),

        TokenKind::Assign | TokenKind::EqEq => (BinOp::Cmp(CmpOp::Eq), PREC_COMPARE),
        TokenKind::NotEq => (BinOp::Cmp(CmpOp::Ne), PREC_COMPARE),
        TokenKind::Lt => (BinOp::Cmp(CmpOp::Lt), PREC_COMPARE),
        TokenKind::LtEq => (BinOp::Cmp(CmpOp::Le), PREC_COMPARE),
        TokenKind::Gt => (BinOp::Cmp(CmpOp::Gt), PREC_COMPARE),
        TokenKind::GtEq => (BinOp::Cmp(CmpOp::Ge), PREC_COMPARE),
        TokenKind::Match => (BinOp::Cmp(CmpOp::Match), PREC_COMPARE),
        TokenKind::NotMatch => (BinOp::Cmp(CmpOp::NotMatch), PREC_COMPARE),
        TokenKind::Has => (BinOp::Cmp(CmpOp::Has), PREC_COMPARE),

        TokenKind::Plus => (BinOp::Arith(ArithOp::Add), PREC_ADD),
        TokenKind::Minus => (BinOp::Arith(ArithOp::Sub), PREC_ADD),
        TokenKind::Star => (BinOp::Arith(ArithOp::Mul), PREC_MUL),
        TokenKind::Slash => (BinOp::Arith(ArithOp::Div), PREC_MUL),
        TokenKind::Percent => (BinOp::Arith(ArithOp::Mod), PREC_MUL),

        _ => return None,
    };
    Some(entry)
}

impl std::fmt::Display for ArithOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Mod => "%",
        };
        write!(f, "{}", s)
    }
}

impl std::fmt::Display for CmpOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
            CmpOp::Match => "=~",
            CmpOp::NotMatch => "!~",
            CmpOp::Has => "has",
        };
        write!(f, "{}", s)
    }
}

impl std::fmt::Display for LogicOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LogicOp::And => "&",
            LogicOp::AndAnd => "&&",
            LogicOp::Or => "|",
            LogicOp::OrOr => "||",
            LogicOp::Xor => "^",
        };
        write!(f, "{}", s)
    }
}

impl std::fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
        };
        write!(f, "{}", s)
    }
}
