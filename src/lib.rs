//! # jsonql
//!
//! A small embeddable expression language for extracting values from and
//! filtering JSON documents.
//!
//! ```
//! use jsonql::{parse, Value};
//!
//! let expr = parse(r#"field ~= "fo*b" && (blah = "baz" || blah = "bar")"#).unwrap();
//! let record = Value::from(serde_json::json!({"field": "fob", "blah": "bar"}));
//! assert_eq!(expr.evaluate(&record).unwrap(), Value::Bool(true));
//! ```
pub mod ast;
#[cfg(feature = "cli")]
pub mod cli;
pub mod convert;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod query;
pub mod value;

pub use ast::{BinOp, Expr, LogicalOp, PathStep, Token, UnaryOp};
pub use convert::{json_to_value, value_to_json};
pub use evaluator::{EvalError, Evaluator};
pub use lexer::{LexError, Lexer, Position, Spanned, scan};
pub use parser::{ParseError, Parser, parse};
pub use query::{DecodeError, FilterQuery, PathQuery, QueryError};
pub use value::Value;
