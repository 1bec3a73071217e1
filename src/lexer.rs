use crate::ast::{Token, TokenKind};

/// Error raised while tokenizing an expression, pointing at the offending
/// character position.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub offset: usize,
    pub kind: LexErrorKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LexErrorKind {
    /// A character no token can start with
    IllegalCharacter(char),
    /// A string literal with no closing quote before end of input
    UnterminatedString,
    /// A backslash escape the string syntax does not define
    InvalidEscape(char),
    /// A numeric literal that does not parse as i64/f64
    MalformedNumber,
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            LexErrorKind::IllegalCharacter(ch) => {
                write!(f, "Unexpected character '{}' at position {}", ch, self.offset)
            }
            LexErrorKind::UnterminatedString => {
                write!(f, "Unterminated string starting at position {}", self.offset)
            }
            LexErrorKind::InvalidEscape(ch) => {
                write!(f, "Invalid escape sequence '\\{}' at position {}", ch, self.offset)
            }
            LexErrorKind::MalformedNumber => {
                write!(f, "Malformed number at position {}", self.offset)
            }
        }
    }
}

impl std::error::Error for LexError {}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    /// Whitespace and line comments (`//` and `#`) produce no tokens.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.current_char() {
                Some(ch) if ch.is_whitespace() => self.advance(),
                Some('#') => self.skip_line(),
                Some('/') if self.peek_char(1) == Some('/') => self.skip_line(),
                _ => break,
            }
        }
    }

    fn skip_line(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' || ch == '.' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_string(&mut self, quote: char) -> Result<String, LexError> {
        let start = self.position;
        let mut result = String::new();
        self.advance(); // consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    let escape_at = self.position;
                    self.advance();
                    match self.current_char() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        Some('\\') => result.push('\\'),
                        Some(c) if c == quote => result.push(c),
                        Some(c) => {
                            return Err(LexError {
                                offset: escape_at,
                                kind: LexErrorKind::InvalidEscape(c),
                            });
                        }
                        None => {
                            return Err(LexError {
                                offset: start,
                                kind: LexErrorKind::UnterminatedString,
                            });
                        }
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError {
            offset: start,
            kind: LexErrorKind::UnterminatedString,
        })
    }

    fn read_number(&mut self) -> Result<TokenKind, LexError> {
        let start = self.position;
        let mut number = String::new();
        let mut is_float = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.'
                && !is_float
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_float = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        // Exponent suffix makes the literal a float even without a dot.
        if let Some(e) = self.current_char()
            && (e == 'e' || e == 'E')
        {
            let digits_at = if matches!(self.peek_char(1), Some('+') | Some('-')) { 2 } else { 1 };
            if self.peek_char(digits_at).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                number.push(e);
                self.advance();
                if let Some(sign) = self.current_char()
                    && (sign == '+' || sign == '-')
                {
                    number.push(sign);
                    self.advance();
                }
                while let Some(d) = self.current_char() {
                    if d.is_ascii_digit() {
                        number.push(d);
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
        }

        let malformed = LexError {
            offset: start,
            kind: LexErrorKind::MalformedNumber,
        };
        if is_float {
            number.parse::<f64>().map(TokenKind::Float).map_err(|_| malformed)
        } else {
            number.parse::<i64>().map(TokenKind::Int).map_err(|_| malformed)
        }
    }

    /// Produce the next token. The stream is consumed once, in order;
    /// re-tokenizing requires a fresh `Lexer` over the original text.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments();

        let offset = self.position;
        let kind = match self.current_char() {
            None => TokenKind::Eof,
            Some('+') => {
                self.advance();
                TokenKind::Plus
            }
            Some('-') => {
                self.advance();
                TokenKind::Minus
            }
            Some('*') => {
                self.advance();
                TokenKind::Star
            }
            Some('/') => {
                self.advance();
                TokenKind::Slash
            }
            Some('%') => {
                self.advance();
                TokenKind::Percent
            }
            Some('?') => {
                self.advance();
                TokenKind::Question
            }
            Some(':') => {
                self.advance();
                TokenKind::Colon
            }
            Some(',') => {
                self.advance();
                TokenKind::Comma
            }
            Some('^') => {
                self.advance();
                TokenKind::Caret
            }
            Some('(') => {
                self.advance();
                TokenKind::LParen
            }
            Some(')') => {
                self.advance();
                TokenKind::RParen
            }
            Some('[') => {
                self.advance();
                TokenKind::LBracket
            }
            Some(']') => {
                // ']' immediately followed by '.' closes an index and opens
                // a field path; it is one token in the grammar.
                if self.peek_char(1) == Some('.') {
                    self.advance();
                    self.advance();
                    TokenKind::RBracketDot
                } else {
                    self.advance();
                    TokenKind::RBracket
                }
            }
            Some('&') => {
                if self.peek_char(1) == Some('&') {
                    self.advance();
                    self.advance();
                    TokenKind::AmpAmp
                } else {
                    self.advance();
                    TokenKind::Amp
                }
            }
            Some('|') => {
                if self.peek_char(1) == Some('|') {
                    self.advance();
                    self.advance();
                    TokenKind::PipePipe
                } else {
                    self.advance();
                    TokenKind::Pipe
                }
            }
            Some('=') => match self.peek_char(1) {
                Some('=') => {
                    self.advance();
                    self.advance();
                    TokenKind::EqEq
                }
                Some('~') => {
                    self.advance();
                    self.advance();
                    TokenKind::Match
                }
                _ => {
                    self.advance();
                    TokenKind::Assign
                }
            },
            Some('!') => match self.peek_char(1) {
                Some('=') => {
                    self.advance();
                    self.advance();
                    TokenKind::NotEq
                }
                Some('~') => {
                    self.advance();
                    self.advance();
                    TokenKind::NotMatch
                }
                _ => {
                    self.advance();
                    TokenKind::Not
                }
            },
            Some('>') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    TokenKind::GtEq
                } else {
                    self.advance();
                    TokenKind::Gt
                }
            }
            Some('<') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    TokenKind::LtEq
                } else {
                    self.advance();
                    TokenKind::Lt
                }
            }
            Some('\'') => TokenKind::Str(self.read_string('\'')?),
            Some('"') => TokenKind::Str(self.read_string('"')?),
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();

                match ident.as_str() {
                    "ANY" => TokenKind::Any,
                    "ALL" => TokenKind::All,
                    "exists" => TokenKind::Exists,
                    "na" => TokenKind::Na,
                    "has" => TokenKind::Has,
                    "in" => TokenKind::In,
                    "SET" => TokenKind::Set,
                    "true" => TokenKind::Bool(true),
                    "false" => TokenKind::Bool(false),
                    _ => TokenKind::Ident(ident),
                }
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number()?,
            Some(ch) => {
                return Err(LexError {
                    offset,
                    kind: LexErrorKind::IllegalCharacter(ch),
                });
            }
        };

        Ok(Token::new(kind, offset))
    }
}
