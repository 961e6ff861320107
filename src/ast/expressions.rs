use crate::{
    ast::{BinOp, LogicalOp, UnaryOp},
    value::Value,
};

/// Abstract Syntax Tree node representing a parsed expression.
///
/// The AST is produced once by the parser and is never mutated afterwards, so a
/// single tree can be evaluated against any number of contexts, from any number
/// of threads.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 1.25e2
    /// "hello"
    /// true
    /// null
    /// ```
    Literal(Value),

    /// Path lookup against the evaluation context.
    ///
    /// The first step is applied to the context itself; each following step
    /// is applied to the result of the previous one. Never empty.
    ///
    /// # Examples
    /// ```text
    /// name                // [Field("name")]
    /// message.body        // [Field("message"), Field("body")]
    /// foo[bar]            // [Field("foo"), Index(Path([Field("bar")]))]
    /// [0].name            // [Index(Literal(0)), Field("name")]
    /// ```
    Path(Vec<PathStep>),

    /// Prefix operation (`!x`, `-x`)
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// Arithmetic, comparison or regex operation
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Short-circuiting `&&` / `||`
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// `is defined`, `is not defined`, `isnot defined`
    DefinedCheck { operand: Box<Expr>, negated: bool },

    /// `is null`, `is not null`, `isnot null`
    NullCheck { operand: Box<Expr>, negated: bool },
}

/// A single navigation step of an [`Expr::Path`].
#[derive(Debug, Clone, PartialEq)]
pub enum PathStep {
    /// `.name` (or the leading identifier of a path)
    Field(String),

    /// `[expr]`
    ///
    /// The index expression is evaluated against the same context as the
    /// path root, not against the value reached so far.
    Index(Box<Expr>),
}
