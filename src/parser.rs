use crate::{
    ast::{BinOp, Expr, LogicalOp, PathStep, Token, UnaryOp},
    lexer::{LexError, Lexer, Position, Spanned},
    value::Value,
};
use std::{mem, str::FromStr};

/// Default limit on how deeply an expression may nest. Unary operators,
/// parentheses and every operator in a `^`, `*`, `+`, `&&` or `||` chain
/// each count as one level.
pub const MAX_DEPTH: usize = 128;

/// A syntax error, carrying the position of the offending token.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected {found} at {position}; expected {expected}")]
    Unexpected {
        found: String,
        expected: String,
        position: Position,
    },

    #[error("{error}: `{text}` at {position}")]
    Invalid {
        error: LexError,
        text: String,
        position: Position,
    },

    #[error("expression nested too deeply at {position}")]
    TooDeep { position: Position },
}

impl ParseError {
    pub fn position(&self) -> Position {
        match self {
            ParseError::Unexpected { position, .. }
            | ParseError::Invalid { position, .. }
            | ParseError::TooDeep { position } => *position,
        }
    }
}

pub struct Parser {
    lexer: Lexer,
    current: Spanned,
    depth: usize,
    max_depth: usize,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Self {
        let current = lexer.next_token();
        Parser {
            lexer,
            current,
            depth: 0,
            max_depth: MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current.token) == mem::discriminant(token)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match &self.current.token {
            Token::Invalid(error) => ParseError::Invalid {
                error: error.clone(),
                text: self.current.text.clone(),
                position: self.current.position,
            },
            token => ParseError::Unexpected {
                found: token.describe(),
                expected: expected.to_string(),
                position: self.current.position,
            },
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        if !self.check(&expected) {
            return Err(self.unexpected(&expected.describe()));
        }
        self.advance();
        Ok(())
    }

    /// Parse primary expressions (atoms): literals, paths and parenthesised groups
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let literal = match &self.current.token {
            Token::Integer(n) => Value::Int(*n),
            Token::Float(n) => Value::Float(*n),
            Token::True => Value::Bool(true),
            Token::False => Value::Bool(false),
            Token::Null => Value::Absent,
            Token::String(_) => match mem::replace(&mut self.current.token, Token::Eof) {
                Token::String(s) => Value::String(s),
                _ => unreachable!(),
            },
            Token::Identifier(_) => {
                let name = match mem::replace(&mut self.current.token, Token::Eof) {
                    Token::Identifier(name) => name,
                    _ => unreachable!(),
                };
                self.advance();
                return self.parse_path(vec![PathStep::Field(name)]);
            }
            Token::LBracket => {
                // Index into the context itself, e.g. `[0].name`
                let index = self.parse_index()?;
                return self.parse_path(vec![index]);
            }
            Token::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(Token::RParen)?;
                return Ok(expr);
            }
            _ => return Err(self.unexpected("an expression")),
        };
        self.advance();
        Ok(Expr::Literal(literal))
    }

    /// Parse `[expr]`
    fn parse_index(&mut self) -> Result<PathStep, ParseError> {
        self.expect(Token::LBracket)?;
        let index = self.parse_expression()?;
        self.expect(Token::RBracket)?;
        Ok(PathStep::Index(Box::new(index)))
    }

    /// Parse the trailing `.field` and `[expr]` steps of a path
    fn parse_path(&mut self, mut steps: Vec<PathStep>) -> Result<Expr, ParseError> {
        loop {
            if self.check(&Token::Dot) {
                self.advance(); // consume '.'

                // `skills.[1]` is the same as `skills[1]`
                if self.check(&Token::LBracket) {
                    steps.push(self.parse_index()?);
                    continue;
                }

                let name = match mem::replace(&mut self.current.token, Token::Eof) {
                    Token::Identifier(name) => name,
                    other => {
                        self.current.token = other;
                        return Err(self.unexpected("a field name or `[` after `.`"));
                    }
                };
                self.advance();
                steps.push(PathStep::Field(name));
            } else if self.check(&Token::LBracket) {
                steps.push(self.parse_index()?);
            } else {
                break;
            }
        }
        Ok(Expr::Path(steps))
    }

    /// Claims one nesting level; callers give it back by restoring `depth`.
    fn enter(&mut self) -> Result<(), ParseError> {
        if self.depth >= self.max_depth {
            return Err(ParseError::TooDeep {
                position: self.current.position,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        self.enter()?;

        let op = match &self.current.token {
            Token::Bang => Some(UnaryOp::Not),
            Token::Minus => Some(UnaryOp::Negate),
            _ => None,
        };
        let expr = match op {
            Some(op) => {
                self.advance();
                let operand = self.parse_unary()?;
                Expr::Unary {
                    op,
                    operand: Box::new(operand),
                }
            }
            None => self.parse_primary()?,
        };

        self.depth -= 1;
        Ok(expr)
    }

    /// `^` binds tighter than `*` and associates to the right
    fn parse_power(&mut self) -> Result<Expr, ParseError> {
        let base = self.parse_unary()?;

        if self.check(&Token::Caret) {
            self.advance();
            self.enter()?;
            let exponent = self.parse_power()?;
            self.depth -= 1;
            return Ok(Expr::Binary {
                op: BinOp::Power,
                left: Box::new(base),
                right: Box::new(exponent),
            });
        }
        Ok(base)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_power()?;
        let depth = self.depth;

        loop {
            let op = match &self.current.token {
                Token::Star => BinOp::Multiply,
                Token::Slash => BinOp::Divide,
                Token::Percent => BinOp::Modulo,
                _ => break,
            };

            self.advance();
            self.enter()?;
            let right = self.parse_power()?;

            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        self.depth = depth;
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;
        let depth = self.depth;

        loop {
            let op = match &self.current.token {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Subtract,
                _ => break,
            };

            self.advance();
            self.enter()?;
            let right = self.parse_multiplicative()?;

            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        self.depth = depth;
        Ok(left)
    }

    /// Comparisons do not chain: `1 < 2 < 3` leaves `< 3` unconsumed.
    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_additive()?;

        let op = match &self.current.token {
            Token::Eq => BinOp::Equal,
            Token::NotEq => BinOp::NotEqual,
            Token::Lt => BinOp::LessThan,
            Token::Gt => BinOp::GreaterThan,
            Token::LtEq => BinOp::LessEqual,
            Token::GtEq => BinOp::GreaterEqual,
            Token::Match => BinOp::Match,
            Token::NotMatch => BinOp::NotMatch,
            Token::Is | Token::IsNot => return self.parse_is_check(left),
            _ => return Ok(left),
        };

        self.advance();
        let right = self.parse_additive()?;

        Ok(Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// `is [not] defined`, `isnot defined`, `is [not] null`, `isnot null`
    fn parse_is_check(&mut self, operand: Expr) -> Result<Expr, ParseError> {
        let negated = if self.check(&Token::IsNot) {
            self.advance();
            true
        } else {
            self.advance(); // consume 'is'
            if self.check(&Token::Not) {
                self.advance();
                true
            } else {
                false
            }
        };

        let operand = Box::new(operand);
        let expr = match &self.current.token {
            Token::Defined => Expr::DefinedCheck { operand, negated },
            Token::Null => Expr::NullCheck { operand, negated },
            _ => return Err(self.unexpected("`defined` or `null`")),
        };
        self.advance();
        Ok(expr)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_comparison()?;
        let depth = self.depth;

        while self.check(&Token::AndAnd) {
            self.advance();
            self.enter()?;
            let right = self.parse_comparison()?;

            left = Expr::Logical {
                op: LogicalOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        self.depth = depth;
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        let depth = self.depth;

        while self.check(&Token::OrOr) {
            self.advance();
            self.enter()?;
            let right = self.parse_and()?;

            left = Expr::Logical {
                op: LogicalOp::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        self.depth = depth;
        Ok(left)
    }

    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_or()
    }

    /// Parse a complete expression; the whole input must be consumed.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        self.expect(Token::Eof)?;
        Ok(expr)
    }
}

/// Parse an expression from source text.
///
/// # Examples
///
/// ```
/// use jsonql::{parse, Value};
///
/// let expr = parse("2^10").unwrap();
/// assert_eq!(expr.evaluate(&Value::Absent).unwrap(), Value::Int(1024));
///
/// let err = parse("1 +").unwrap_err();
/// assert_eq!(err.position().column, 4);
/// ```
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    let expr = Parser::new(Lexer::new(source)).parse()?;
    log::debug!("parsed expression {:?}", source);
    Ok(expr)
}

impl FromStr for Expr {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}
