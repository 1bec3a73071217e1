use crate::{
    ast::{
        Expr, PathIndex, Quantifier, Token, TokenKind,
        operators::{
            self, BinOp, PREC_EXISTS, PREC_INDEX, PREC_INDEX_PATH, PREC_QUANT_PATH, PREC_SET,
            PREC_TERNARY, PREC_UNARY, UnaryOp,
        },
    },
    lexer::{LexError, Lexer},
};

/// A token the grammar cannot accept at its position.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub offset: usize,
    pub expected: String,
    pub found: String,
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Syntax error at position {}: expected {}, found {}",
            self.offset, self.expected, self.found
        )
    }
}

impl std::error::Error for SyntaxError {}

/// Errors that abort compilation of an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    Lex(LexError),
    Syntax(SyntaxError),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Lex(e) => write!(f, "{}", e),
            ParseError::Syntax(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(e: LexError) -> Self {
        ParseError::Lex(e)
    }
}

impl From<SyntaxError> for ParseError {
    fn from(e: SyntaxError) -> Self {
        ParseError::Syntax(e)
    }
}

pub struct Parser {
    lexer: Lexer,
    current: Token,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let current = lexer.next_token()?;
        Ok(Parser { lexer, current })
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<(), ParseError> {
        if !self.check(&kind) {
            return Err(self.error(expected));
        }
        self.advance()
    }

    fn error(&self, expected: &str) -> ParseError {
        ParseError::Syntax(SyntaxError {
            offset: self.current.offset,
            expected: expected.to_string(),
            found: self.current.kind.to_string(),
        })
    }

    /// Parse one complete expression; trailing tokens are a syntax error.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expr(PREC_TERNARY)?;
        if self.current.kind != TokenKind::Eof {
            return Err(self.error("end of input"));
        }
        Ok(expr)
    }

    /// Precedence climbing: parse one prefix atom, then keep consuming infix
    /// and postfix constructs while their level is at least `min`.
    fn parse_expr(&mut self, min: u8) -> Result<Expr, ParseError> {
        let lhs = self.parse_prefix()?;
        self.parse_infix(lhs, min)
    }

    fn parse_infix(&mut self, mut lhs: Expr, min: u8) -> Result<Expr, ParseError> {
        loop {
            match &self.current.kind {
                TokenKind::LBracket => {
                    lhs = self.parse_bracket_suffix(lhs, min)?;
                }
                TokenKind::In if min <= PREC_SET => {
                    self.advance()?;
                    self.expect(TokenKind::Set, "'SET'")?;
                    self.expect(TokenKind::LBracket, "'['")?;
                    let mut elements = vec![];
                    if !self.check(&TokenKind::RBracket) {
                        loop {
                            elements.push(self.parse_expr(PREC_TERNARY)?);
                            if self.check(&TokenKind::Comma) {
                                self.advance()?;
                            } else {
                                break;
                            }
                        }
                    }
                    self.expect(TokenKind::RBracket, "']'")?;
                    lhs = Expr::InSet {
                        value: Box::new(lhs),
                        elements,
                    };
                }
                TokenKind::Question if min <= PREC_TERNARY => {
                    self.advance()?;
                    let then_branch = self.parse_expr(PREC_TERNARY)?;
                    self.expect(TokenKind::Colon, "':'")?;
                    // The else branch re-enters one level tighter, exactly as
                    // the original grammar does.
                    let else_branch = self.parse_expr(PREC_TERNARY + 1)?;
                    lhs = Expr::Cond {
                        cond: Box::new(lhs),
                        then_branch: Box::new(then_branch),
                        else_branch: Box::new(else_branch),
                    };
                }
                kind => {
                    let Some((op, prec)) = operators::binary_op(kind) else {
                        break;
                    };
                    if prec < min {
                        break;
                    }
                    self.advance()?;
                    let rhs = self.parse_expr(prec + 1)?;
                    lhs = match op {
                        BinOp::Arith(op) => Expr::Arith {
                            op,
                            left: Box::new(lhs),
                            right: Box::new(rhs),
                        },
                        BinOp::Cmp(op) => Expr::Cmp {
                            op,
                            left: Box::new(lhs),
                            right: Box::new(rhs),
                        },
                        BinOp::Logic(op) => Expr::Logic {
                            op,
                            left: Box::new(lhs),
                            right: Box::new(rhs),
                        },
                    };
                }
            }
        }
        Ok(lhs)
    }

    /// Everything that starts with `[`: simple index (level 12),
    /// expression-indexed field path (11), quantified field path (10).
    /// Which one it is only becomes clear at the closing `]` or `].`.
    fn parse_bracket_suffix(&mut self, base: Expr, min: u8) -> Result<Expr, ParseError> {
        self.advance()?; // consume '['

        let quant = match self.current.kind {
            TokenKind::Any | TokenKind::Star => Some(Quantifier::Any),
            TokenKind::All | TokenKind::Question => Some(Quantifier::All),
            _ => None,
        };

        if let Some(q) = quant {
            self.advance()?;
            match self.current.kind {
                TokenKind::RBracketDot => {
                    if min > PREC_QUANT_PATH {
                        return Err(self.error("']'"));
                    }
                    self.advance()?;
                    let path = self.parse_expr(PREC_INDEX_PATH)?;
                    return Ok(Expr::FieldPath {
                        base: Box::new(base),
                        index: PathIndex::Quant(q),
                        path: Box::new(path),
                    });
                }
                TokenKind::RBracket => {
                    self.advance()?;
                    return Ok(Expr::Index {
                        base: Box::new(base),
                        index: Box::new(Expr::IndexLiteral(q)),
                    });
                }
                _ => {
                    // The wildcard token starts a longer index expression.
                    let index = self.parse_infix(Expr::IndexLiteral(q), PREC_TERNARY)?;
                    return self.finish_bracket(base, index, min);
                }
            }
        }

        let index = self.parse_expr(PREC_TERNARY)?;
        self.finish_bracket(base, index, min)
    }

    fn finish_bracket(&mut self, base: Expr, index: Expr, min: u8) -> Result<Expr, ParseError> {
        match self.current.kind {
            TokenKind::RBracketDot => {
                if min > PREC_INDEX_PATH {
                    return Err(self.error("']'"));
                }
                self.advance()?;
                let path = self.parse_expr(PREC_INDEX)?;
                Ok(Expr::FieldPath {
                    base: Box::new(base),
                    index: PathIndex::At(Box::new(index)),
                    path: Box::new(path),
                })
            }
            TokenKind::RBracket => {
                self.advance()?;
                Ok(Expr::Index {
                    base: Box::new(base),
                    index: Box::new(index),
                })
            }
            _ => Err(self.error("']' or '].'")),
        }
    }

    /// Parse primary expressions and prefix operators: literals, wildcard
    /// tokens, field references, function calls, parenthesized groups,
    /// `! - +` and `exists` / `na`.
    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        match self.current.kind.clone() {
            TokenKind::Bool(b) => {
                self.advance()?;
                Ok(Expr::Bool(b))
            }
            TokenKind::Int(n) => {
                self.advance()?;
                Ok(Expr::Int(n))
            }
            TokenKind::Float(n) => {
                self.advance()?;
                Ok(Expr::Float(n))
            }
            TokenKind::Str(s) => {
                self.advance()?;
                Ok(Expr::Str(s))
            }
            TokenKind::Any | TokenKind::Star => {
                self.advance()?;
                Ok(Expr::IndexLiteral(Quantifier::Any))
            }
            TokenKind::All | TokenKind::Question => {
                self.advance()?;
                Ok(Expr::IndexLiteral(Quantifier::All))
            }
            TokenKind::Ident(name) => {
                self.advance()?;
                if self.check(&TokenKind::LParen) {
                    self.advance()?;
                    let mut args = vec![];
                    if !self.check(&TokenKind::RParen) {
                        loop {
                            args.push(self.parse_expr(PREC_TERNARY)?);
                            if self.check(&TokenKind::Comma) {
                                self.advance()?;
                            } else {
                                break;
                            }
                        }
                    }
                    self.expect(TokenKind::RParen, "')'")?;
                    Ok(Expr::Call { name, args })
                } else {
                    Ok(Expr::Field(name))
                }
            }
            TokenKind::Not => self.parse_unary(UnaryOp::Not),
            TokenKind::Minus => self.parse_unary(UnaryOp::Neg),
            TokenKind::Plus => self.parse_unary(UnaryOp::Plus),
            TokenKind::Exists => self.parse_exists(false),
            TokenKind::Na => self.parse_exists(true),
            TokenKind::LParen => {
                self.advance()?;
                let expr = self.parse_expr(PREC_TERNARY)?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(expr)
            }
            _ => Err(self.error("expression")),
        }
    }

    // The operand level deliberately undercuts the comparison family: the
    // original grammar reads `!A = B` as `!(A = B)` and `-2 + 3` as `-(2 + 3)`.
    fn parse_unary(&mut self, op: UnaryOp) -> Result<Expr, ParseError> {
        self.advance()?;
        let operand = self.parse_expr(PREC_UNARY)?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    // `exists` and `na` absorb the logic family but stop short of the
    // membership and ternary levels.
    fn parse_exists(&mut self, negated: bool) -> Result<Expr, ParseError> {
        self.advance()?;
        let operand = self.parse_expr(PREC_EXISTS)?;
        Ok(Expr::Exists {
            negated,
            operand: Box::new(operand),
        })
    }
}
