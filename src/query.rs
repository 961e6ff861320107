//! Query façades over a decoded JSON document.
//!
//! - [`PathQuery`] evaluates an expression against the whole document and
//!   returns the resulting value.
//! - [`FilterQuery`] evaluates an expression once per record of a JSON array
//!   and keeps the records for which it is `true`.
//!
//! Both own their document, never mutate it, and can be shared between
//! threads; each call builds its own evaluator.

use crate::{
    Value,
    ast::Expr,
    convert::json_to_value,
    evaluator::{EvalError, Evaluator},
    parser::{ParseError, parse},
};

/// Errors raised while building a façade from document text.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Filter queries need a JSON array of records, got {0}")]
    NotAnArray(&'static str),
}

/// Errors raised by a single query call. The façade stays usable afterwards.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("Syntax error: {0}")]
    Syntax(#[from] ParseError),

    #[error("Evaluation error: {0}")]
    Eval(#[from] EvalError),
}

/// Path-extraction mode.
///
/// # Examples
///
/// ```
/// use jsonql::{PathQuery, Value};
///
/// let query = PathQuery::from_json(r#"[{"name": "elgs"}, {"name": "enny"}]"#).unwrap();
/// assert_eq!(query.query("[1].name").unwrap(), Value::String("enny".into()));
/// assert_eq!(query.query("[5].name").unwrap(), Value::Absent);
/// ```
#[derive(Debug, Clone)]
pub struct PathQuery {
    root: Value,
}

impl PathQuery {
    pub fn new(root: Value) -> Self {
        PathQuery { root }
    }

    /// Decodes `json` and wraps it as the query root.
    pub fn from_json(json: &str) -> Result<Self, DecodeError> {
        let document: serde_json::Value = serde_json::from_str(json)?;
        Ok(PathQuery::new(json_to_value(document)))
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Parses `expression` and evaluates it against the root document.
    pub fn query(&self, expression: &str) -> Result<Value, QueryError> {
        let expr = parse(expression)?;
        Ok(self.evaluate(&expr)?)
    }

    /// Evaluates an already parsed expression against the root document.
    pub fn evaluate(&self, expr: &Expr) -> Result<Value, EvalError> {
        Evaluator::new().evaluate(expr, &self.root)
    }
}

/// Filter mode.
///
/// # Examples
///
/// ```
/// use jsonql::FilterQuery;
///
/// let query = FilterQuery::from_json(r#"[
///     {"name": "elgs", "gender": "m"},
///     {"name": "enny", "gender": "f"},
///     {"name": "sam"}
/// ]"#).unwrap();
///
/// let matches = query.query("gender = 'f'").unwrap();
/// assert_eq!(matches.len(), 1);
/// assert_eq!(matches[0].get_field("name").unwrap().to_string(), "enny");
/// ```
#[derive(Debug, Clone)]
pub struct FilterQuery {
    records: Vec<Value>,
}

impl FilterQuery {
    pub fn new(records: Vec<Value>) -> Self {
        FilterQuery { records }
    }

    /// Decodes `json`, which must be an array.
    ///
    /// Elements are normally objects; any other element simply never matches
    /// a field path.
    pub fn from_json(json: &str) -> Result<Self, DecodeError> {
        let document: serde_json::Value = serde_json::from_str(json)?;
        match json_to_value(document) {
            Value::Array(records) => Ok(FilterQuery::new(records)),
            other => Err(DecodeError::NotAnArray(other.type_name())),
        }
    }

    pub fn records(&self) -> &[Value] {
        &self.records
    }

    /// Parses `expression` once and returns, in source order, copies of the
    /// records for which it evaluates to `true`. `false` and absent both
    /// exclude a record.
    pub fn query(&self, expression: &str) -> Result<Vec<Value>, QueryError> {
        let expr = parse(expression)?;
        Ok(self.filter(&expr)?)
    }

    /// Filters with an already parsed expression.
    pub fn filter(&self, expr: &Expr) -> Result<Vec<Value>, EvalError> {
        let mut evaluator = Evaluator::new();
        let mut result = Vec::new();

        for (index, record) in self.records.iter().enumerate() {
            let keep = evaluator.evaluate(expr, record)?;
            log::trace!("record {} evaluated to {:?}", index, keep);

            if keep.is_true() {
                result.push(record.clone());
            }
        }

        log::debug!("filter kept {} of {} records", result.len(), self.records.len());
        Ok(result)
    }
}
