use crate::lexer::LexError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Integer literal, in decimal, octal or hexadecimal form
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 010    // 8
    /// 0xa    // 10
    /// ```
    Integer(i64),

    /// Floating-point literal
    ///
    /// # Examples
    /// ```text
    /// 1.25
    /// .5
    /// 125e-2
    /// ```
    Float(f64),

    /// String literal enclosed in double or single quotes
    ///
    /// # Examples
    /// ```text
    /// "hello"
    /// 'peace \x26 war'
    /// ```
    String(String),

    /// Field name
    ///
    /// Must start with an ASCII letter or underscore, followed by letters,
    /// digits, or underscores.
    ///
    /// # Examples
    /// ```text
    /// name
    /// hello_world
    /// _internal
    /// ```
    Identifier(String),

    // Keywords
    Null,
    True,
    False,
    Is,
    Not,
    IsNot,
    Defined,

    // Punctuation
    Dot,
    LBracket,
    RBracket,
    LParen,
    RParen,

    // Operators
    /// Logical not (`!`)
    Bang,
    Minus,
    Plus,
    Star,
    Slash,
    Percent,
    /// Exponent (`^`)
    Caret,

    // Comparison
    /// Equality (`=`)
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    /// Regex match (`~=`)
    Match,
    /// Regex non-match (`!~=`)
    NotMatch,

    // Logical
    AndAnd,
    OrOr,

    /// A character sequence that does not form a token
    Invalid(LexError),

    /// End of input
    Eof,
}

impl Token {
    /// Human-readable name used in syntax error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Integer(n) => format!("integer {}", n),
            Token::Float(n) => format!("float {}", n),
            Token::String(s) => format!("string {:?}", s),
            Token::Identifier(name) => format!("identifier `{}`", name),
            Token::Null => "`null`".into(),
            Token::True => "`true`".into(),
            Token::False => "`false`".into(),
            Token::Is => "`is`".into(),
            Token::Not => "`not`".into(),
            Token::IsNot => "`isnot`".into(),
            Token::Defined => "`defined`".into(),
            Token::Dot => "`.`".into(),
            Token::LBracket => "`[`".into(),
            Token::RBracket => "`]`".into(),
            Token::LParen => "`(`".into(),
            Token::RParen => "`)`".into(),
            Token::Bang => "`!`".into(),
            Token::Minus => "`-`".into(),
            Token::Plus => "`+`".into(),
            Token::Star => "`*`".into(),
            Token::Slash => "`/`".into(),
            Token::Percent => "`%`".into(),
            Token::Caret => "`^`".into(),
            Token::Eq => "`=`".into(),
            Token::NotEq => "`!=`".into(),
            Token::Lt => "`<`".into(),
            Token::Gt => "`>`".into(),
            Token::LtEq => "`<=`".into(),
            Token::GtEq => "`>=`".into(),
            Token::Match => "`~=`".into(),
            Token::NotMatch => "`!~=`".into(),
            Token::AndAnd => "`&&`".into(),
            Token::OrOr => "`||`".into(),
            Token::Invalid(e) => format!("invalid token ({})", e),
            Token::Eof => "end of input".into(),
        }
    }
}
