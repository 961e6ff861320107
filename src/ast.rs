//! # jsonql - Abstract Syntax Tree
//!
//! This module defines the tokens and the Abstract Syntax Tree (AST) for the
//! jsonql expression language, a small language for extracting values from and
//! filtering JSON documents.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Expression nodes (literals, paths, operations)
//! - **[operators]** - Unary, binary and logical operators
//!
//! ## Quick Start
//!
//! ```text
//! gender = 'f' && skills[0] ~= "^Go"
//! ```
//!
//! Evaluated once per record, this keeps records whose `gender` field is `"f"`
//! and whose first skill starts with `Go`.
//!
//! ## Core Concepts
//!
//! ### Paths
//!
//! A bare identifier looks up a field of the evaluation context. Fields are
//! chained with `.` and sequences are indexed with `[expr]`:
//!
//! ```text
//! message.body
//! skills[1]
//! skills.[1]      // same as skills[1]
//! [0].name        // index the context itself
//! foo[bar]        // `bar` is looked up in the context, not in `foo`
//! ```
//!
//! ### Absence
//!
//! JSON `null`, the `null` keyword and any lookup that fails all produce the
//! same absent value. Absence flows through arithmetic, comparison, regex and
//! unary operators, so `missing.field = 1` evaluates to absent rather than
//! `false`. Use `is defined` / `is null` to test for it.
//!
//! ### Precedence
//!
//! From loosest to tightest: `||`, `&&`, comparisons (`= != < > <= >= ~= !~=`
//! and the `is` checks), `+ -`, `* / %`, `^` (right-associative), unary `! -`.
pub mod expressions;
pub mod operators;
pub mod tokens;

pub use expressions::{Expr, PathStep};
pub use operators::{BinOp, LogicalOp, UnaryOp};
pub use tokens::Token;
