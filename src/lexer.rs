use std::fmt;

use crate::ast::Token;

/// Location of a token in the source text.
///
/// `offset` is a byte offset; `line` and `column` start at 1. A tab advances
/// the column by four.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Default for Position {
    fn default() -> Self {
        Position {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {} (offset {})", self.line, self.column, self.offset)
    }
}

/// Reasons a character sequence fails to form a token.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexError {
    #[error("unexpected character `{0}`")]
    UnexpectedChar(char),
    #[error("unterminated string; missing closing quote")]
    UnterminatedString,
    #[error("invalid escape sequence `\\{0}`")]
    BadEscape(String),
    #[error("malformed number `{0}`")]
    MalformedNumber(String),
    #[error("string literal is not valid UTF-8")]
    InvalidUtf8,
}

/// A token together with its raw source text and where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub text: String,
    pub position: Position,
}

pub struct Lexer {
    source: String,
    input: Vec<(usize, char)>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            source: input.to_string(),
            input: input.char_indices().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.peek_char(0)
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).map(|&(_, c)| c)
    }

    fn offset(&self) -> usize {
        self.input
            .get(self.position)
            .map(|&(i, _)| i)
            .unwrap_or(self.source.len())
    }

    fn location(&self) -> Position {
        Position {
            offset: self.offset(),
            line: self.line,
            column: self.column,
        }
    }

    fn advance(&mut self) {
        match self.current_char() {
            Some('\n') => {
                self.line += 1;
                self.column = 1;
            }
            Some('\r') => self.column = 1,
            Some('\t') => self.column += 4,
            Some(_) => self.column += 1,
            None => return,
        }
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if is_blank(ch) {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if is_ident_char(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_digits(&mut self, radix: u32, buffer: &mut String) {
        while let Some(ch) = self.current_char() {
            if ch.is_digit(radix) {
                buffer.push(ch);
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Swallows the rest of a bad literal so the reported text covers all of it.
    fn malformed_number(&mut self, start: usize) -> Token {
        while self.current_char().is_some_and(|c| is_ident_char(c) || c == '.') {
            self.advance();
        }
        let text = self.source[start..self.offset()].to_string();
        Token::Invalid(LexError::MalformedNumber(text))
    }

    fn read_number(&mut self) -> Token {
        let start = self.offset();

        if self.current_char() == Some('0') && matches!(self.peek_char(1), Some('x' | 'X')) {
            self.advance();
            self.advance();
            let mut digits = String::new();
            self.read_digits(16, &mut digits);
            if digits.is_empty() || self.current_char().is_some_and(is_ident_char) {
                return self.malformed_number(start);
            }
            return match i64::from_str_radix(&digits, 16) {
                Ok(n) => Token::Integer(n),
                Err(_) => self.malformed_number(start),
            };
        }

        let mut number = String::new();
        let mut is_float = false;
        self.read_digits(10, &mut number);

        if self.current_char() == Some('.') {
            is_float = true;
            number.push('.');
            self.advance();
            let before = number.len();
            self.read_digits(10, &mut number);
            if number.len() == before {
                number.push('0');
            }
        }

        if matches!(self.current_char(), Some('e' | 'E')) {
            let signed = matches!(self.peek_char(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if !self.peek_char(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                return self.malformed_number(start);
            }
            is_float = true;
            number.push('e');
            self.advance();
            if signed {
                number.extend(self.current_char());
                self.advance();
            }
            self.read_digits(10, &mut number);
        }

        if self.current_char().is_some_and(is_ident_char) {
            return self.malformed_number(start);
        }

        if is_float {
            return match number.parse::<f64>() {
                Ok(n) => Token::Float(n),
                Err(_) => self.malformed_number(start),
            };
        }

        // A leading zero means octal
        let parsed = if number.len() > 1 && number.starts_with('0') {
            i64::from_str_radix(&number[1..], 8)
        } else {
            number.parse::<i64>()
        };
        match parsed {
            Ok(n) => Token::Integer(n),
            Err(_) => self.malformed_number(start),
        }
    }

    fn read_hex_escape(&mut self, marker: char, width: usize) -> Result<u32, LexError> {
        let mut digits = String::new();
        for _ in 0..width {
            match self.current_char() {
                Some(c) if c.is_ascii_hexdigit() => {
                    digits.push(c);
                    self.advance();
                }
                _ => return Err(LexError::BadEscape(format!("{}{}", marker, digits))),
            }
        }
        u32::from_str_radix(&digits, 16)
            .map_err(|_| LexError::BadEscape(format!("{}{}", marker, digits)))
    }

    fn read_string(&mut self, quote: char) -> Result<String, LexError> {
        let mut bytes = Vec::new();
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return String::from_utf8(bytes).map_err(|_| LexError::InvalidUtf8);
                }
                '\\' => {
                    self.advance(); // Consume backslash
                    let escaped = self.current_char().ok_or(LexError::UnterminatedString)?;
                    self.advance();
                    match escaped {
                        '"' | '\'' | '\\' => bytes.push(escaped as u8),
                        'b' => bytes.push(0x08),
                        'f' => bytes.push(0x0c),
                        'n' => bytes.push(b'\n'),
                        'r' => bytes.push(b'\r'),
                        't' => bytes.push(b'\t'),
                        'v' => bytes.push(0x0b),
                        'x' => {
                            let byte = self.read_hex_escape('x', 2)?;
                            bytes.push(byte as u8);
                        }
                        'u' => {
                            let code = self.read_hex_escape('u', 4)?;
                            let c = char::from_u32(code)
                                .ok_or_else(|| LexError::BadEscape(format!("u{:04x}", code)))?;
                            let mut buf = [0u8; 4];
                            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                        }
                        other => return Err(LexError::BadEscape(other.to_string())),
                    }
                }
                _ => {
                    let mut buf = [0u8; 4];
                    bytes.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                    self.advance();
                }
            }
        }

        Err(LexError::UnterminatedString)
    }

    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    fn double(&mut self, token: Token) -> Token {
        self.advance();
        self.advance();
        token
    }

    fn scan_token(&mut self) -> Token {
        match self.current_char() {
            None => Token::Eof,
            Some('.') if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.read_number()
            }
            Some('.') => self.single(Token::Dot),
            Some('[') => self.single(Token::LBracket),
            Some(']') => self.single(Token::RBracket),
            Some('(') => self.single(Token::LParen),
            Some(')') => self.single(Token::RParen),
            Some('+') => self.single(Token::Plus),
            Some('-') => self.single(Token::Minus),
            Some('*') => self.single(Token::Star),
            Some('/') => self.single(Token::Slash),
            Some('%') => self.single(Token::Percent),
            Some('^') => self.single(Token::Caret),
            Some('=') => self.single(Token::Eq),
            Some('!') => match (self.peek_char(1), self.peek_char(2)) {
                (Some('='), _) => self.double(Token::NotEq),
                (Some('~'), Some('=')) => {
                    self.advance();
                    self.double(Token::NotMatch)
                }
                _ => self.single(Token::Bang),
            },
            Some('~') if self.peek_char(1) == Some('=') => self.double(Token::Match),
            Some('<') if self.peek_char(1) == Some('=') => self.double(Token::LtEq),
            Some('<') => self.single(Token::Lt),
            Some('>') if self.peek_char(1) == Some('=') => self.double(Token::GtEq),
            Some('>') => self.single(Token::Gt),
            Some('&') if self.peek_char(1) == Some('&') => self.double(Token::AndAnd),
            Some('|') if self.peek_char(1) == Some('|') => self.double(Token::OrOr),
            Some(q @ ('"' | '\'')) => match self.read_string(q) {
                Ok(s) => Token::String(s),
                Err(e) => Token::Invalid(e),
            },
            Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();

                match ident.as_str() {
                    "null" => Token::Null,
                    "true" => Token::True,
                    "false" => Token::False,
                    "is" => Token::Is,
                    "not" => Token::Not,
                    "isnot" => Token::IsNot,
                    "defined" => Token::Defined,
                    _ => Token::Identifier(ident),
                }
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number(),
            Some(ch) => {
                self.advance();
                Token::Invalid(LexError::UnexpectedChar(ch))
            }
        }
    }

    /// Scans the next token. Once the input is exhausted every call yields `Eof`.
    pub fn next_token(&mut self) -> Spanned {
        self.skip_whitespace();
        let position = self.location();
        let token = self.scan_token();
        let text = self.source[position.offset..self.offset()].to_string();
        Spanned {
            token,
            text,
            position,
        }
    }
}

/// Scans a whole source string; the result always ends with an `Eof` token.
pub fn scan(source: &str) -> Vec<Spanned> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let spanned = lexer.next_token();
        let done = spanned.token == Token::Eof;
        tokens.push(spanned);
        if done {
            return tokens;
        }
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

fn is_blank(ch: char) -> bool {
    matches!(
        ch,
        ' ' | '\t'
            | '\n'
            | '\r'
            | '\u{0b}'
            | '\u{0c}'
            | '\u{a0}'
            | '\u{2000}'..='\u{200a}'
            | '\u{202f}'
            | '\u{205f}'
            | '\u{3000}'
            | '\u{feff}'
    )
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("null true false is not isnot defined");
    assert_eq!(lexer.next_token().token, Token::Null);
    assert_eq!(lexer.next_token().token, Token::True);
    assert_eq!(lexer.next_token().token, Token::False);
    assert_eq!(lexer.next_token().token, Token::Is);
    assert_eq!(lexer.next_token().token, Token::Not);
    assert_eq!(lexer.next_token().token, Token::IsNot);
    assert_eq!(lexer.next_token().token, Token::Defined);
    assert_eq!(lexer.next_token().token, Token::Eof);
}

#[test]
fn test_filter_expression() {
    let mut lexer = Lexer::new("skills.[1]!~='^S'");
    assert_eq!(lexer.next_token().token, Token::Identifier("skills".to_string()));
    assert_eq!(lexer.next_token().token, Token::Dot);
    assert_eq!(lexer.next_token().token, Token::LBracket);
    assert_eq!(lexer.next_token().token, Token::Integer(1));
    assert_eq!(lexer.next_token().token, Token::RBracket);
    assert_eq!(lexer.next_token().token, Token::NotMatch);
    assert_eq!(lexer.next_token().token, Token::String("^S".to_string()));
    assert_eq!(lexer.next_token().token, Token::Eof);
}

#[test]
fn test_positions_track_lines_and_tabs() {
    let mut lexer = Lexer::new("a\n\tb");
    let a = lexer.next_token();
    assert_eq!(a.position, Position { offset: 0, line: 1, column: 1 });
    let b = lexer.next_token();
    assert_eq!(b.position, Position { offset: 3, line: 2, column: 5 });
    assert_eq!(b.text, "b");
}
