use std::{
    cmp::Ordering,
    collections::{HashMap, hash_map::Entry},
};

use regex::Regex;

use crate::{
    ast::{BinOp, Expr, LogicalOp, PathStep, UnaryOp},
    value::Value,
};

/// Errors that can occur during expression evaluation.
///
/// Missing fields and out-of-range indexes are not errors; they evaluate to
/// [`Value::Absent`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    /// Operation not supported for the given operand types
    #[error("Type error: {0}")]
    TypeError(String),

    /// Integer remainder by zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Integer result does not fit in 64 bits
    #[error("Integer overflow: {0}")]
    Overflow(String),

    /// Right operand of `~=` / `!~=` is not a valid regular expression
    #[error("Invalid regex {pattern:?}: {message}")]
    InvalidRegex { pattern: String, message: String },
}

/// The expression evaluator.
///
/// An evaluator holds only transient state: compiled regular expressions,
/// keyed by pattern, so that evaluating one expression against many records
/// compiles each pattern once. Create one per caller; it is not meant to be
/// shared between threads.
#[derive(Default)]
pub struct Evaluator {
    regexes: HashMap<String, Regex>,
}

impl Evaluator {
    /// Creates a new evaluator with an empty regex cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluates an expression against a context value.
    ///
    /// The context is typically a decoded JSON object; paths look their
    /// first field up in it. Any other context makes every field path absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonql::{parse, Evaluator, Value};
    ///
    /// let expr = parse("foo[bar]").unwrap();
    /// let context = Value::from(serde_json::json!({
    ///     "foo": ["one", "two", "three"],
    ///     "bar": 1
    /// }));
    ///
    /// let mut evaluator = Evaluator::new();
    /// let result = evaluator.evaluate(&expr, &context).unwrap();
    /// assert_eq!(result, Value::String("two".into()));
    /// ```
    pub fn evaluate(&mut self, expr: &Expr, context: &Value) -> Result<Value, EvalError> {
        self.eval_expr(expr, context)
    }

    fn eval_expr(&mut self, expr: &Expr, context: &Value) -> Result<Value, EvalError> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Path(steps) => self.eval_path(steps, context),
            Expr::Unary { op, operand } => {
                let value = self.eval_expr(operand, context)?;
                apply_unary(*op, value)
            }
            Expr::Binary { op, left, right } => {
                let left_val = self.eval_expr(left, context)?;
                let right_val = self.eval_expr(right, context)?;
                if left_val.is_absent() || right_val.is_absent() {
                    return Ok(Value::Absent);
                }
                self.apply_binop(*op, &left_val, &right_val)
            }
            Expr::Logical { op, left, right } => {
                let left_val = self.eval_expr(left, context)?;
                match op {
                    LogicalOp::And if left_val.is_true() => self.eval_expr(right, context),
                    LogicalOp::And => Ok(Value::Bool(false)),
                    LogicalOp::Or if left_val.is_true() => Ok(Value::Bool(true)),
                    LogicalOp::Or => self.eval_expr(right, context),
                }
            }
            Expr::DefinedCheck { operand, negated } => {
                let defined = !self.eval_expr(operand, context)?.is_absent();
                Ok(Value::Bool(defined != *negated))
            }
            Expr::NullCheck { operand, negated } => {
                let null = self.eval_expr(operand, context)?.is_absent();
                Ok(Value::Bool(null != *negated))
            }
        }
    }

    /// Walks the path by reference; the first failed step makes the whole path absent.
    fn eval_path(&mut self, steps: &[PathStep], context: &Value) -> Result<Value, EvalError> {
        let mut current = context;

        for step in steps {
            let next = match step {
                PathStep::Field(name) => current.get_field(name),
                PathStep::Index(index) => {
                    // Indexes see the original context, so `foo[bar]` reads the sibling `bar`
                    let index = self.eval_expr(index, context)?;
                    current.get_index(&index)
                }
            };
            match next {
                Some(value) => current = value,
                None => return Ok(Value::Absent),
            }
        }

        Ok(current.clone())
    }

    fn apply_binop(&mut self, op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
        match op {
            BinOp::Add
            | BinOp::Subtract
            | BinOp::Multiply
            | BinOp::Divide
            | BinOp::Modulo
            | BinOp::Power => apply_arithmetic(op, left, right),
            BinOp::Equal
            | BinOp::NotEqual
            | BinOp::LessThan
            | BinOp::GreaterThan
            | BinOp::LessEqual
            | BinOp::GreaterEqual => apply_comparison(op, left, right),
            BinOp::Match | BinOp::NotMatch => self.apply_regex(op, left, right),
        }
    }

    fn apply_regex(&mut self, op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
        let text = match left {
            Value::String(s) => s.clone(),
            Value::Int(_) | Value::Float(_) | Value::Bool(_) => left.to_string(),
            other => {
                return Err(EvalError::TypeError(format!(
                    "Cannot match {} against a regex",
                    other.type_name()
                )));
            }
        };
        let pattern = match right {
            Value::String(p) => p,
            other => {
                return Err(EvalError::TypeError(format!(
                    "Regex pattern must be a string, got {}",
                    other.type_name()
                )));
            }
        };

        let found = self.regex(pattern)?.is_match(&text);
        Ok(Value::Bool(if op == BinOp::Match { found } else { !found }))
    }

    fn regex(&mut self, pattern: &str) -> Result<&Regex, EvalError> {
        match self.regexes.entry(pattern.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let compiled = Regex::new(pattern).map_err(|e| EvalError::InvalidRegex {
                    pattern: pattern.to_string(),
                    message: e.to_string(),
                })?;
                log::trace!("compiled regex {:?}", pattern);
                Ok(entry.insert(compiled))
            }
        }
    }
}

fn apply_unary(op: UnaryOp, value: Value) -> Result<Value, EvalError> {
    match (op, value) {
        (_, Value::Absent) => Ok(Value::Absent),
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOp::Not, Value::Int(n)) => Ok(Value::Bool(n == 0)),
        (UnaryOp::Not, Value::Float(n)) => Ok(Value::Bool(n == 0.0)),
        (UnaryOp::Negate, Value::Int(n)) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| EvalError::Overflow(format!("-({})", n))),
        (UnaryOp::Negate, Value::Float(n)) => Ok(Value::Float(-n)),
        (UnaryOp::Not, v) => Err(EvalError::TypeError(format!(
            "Cannot apply `!` to {}",
            v.type_name()
        ))),
        (UnaryOp::Negate, v) => Err(EvalError::TypeError(format!(
            "Cannot negate {}",
            v.type_name()
        ))),
    }
}

fn apply_arithmetic(op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => integer_arithmetic(op, *a, *b),
        (Value::String(a), Value::String(b)) if op == BinOp::Add => {
            Ok(Value::String(format!("{}{}", a, b)))
        }
        _ => match (left.as_float(), right.as_float()) {
            (Some(a), Some(b)) => Ok(Value::Float(float_arithmetic(op, a, b))),
            _ => Err(EvalError::TypeError(format!(
                "Cannot apply `{}` to {} and {}",
                op.symbol(),
                left.type_name(),
                right.type_name()
            ))),
        },
    }
}

fn integer_arithmetic(op: BinOp, a: i64, b: i64) -> Result<Value, EvalError> {
    let overflow = || EvalError::Overflow(format!("{} {} {}", a, op.symbol(), b));

    match op {
        BinOp::Add => a.checked_add(b).map(Value::Int).ok_or_else(overflow),
        BinOp::Subtract => a.checked_sub(b).map(Value::Int).ok_or_else(overflow),
        BinOp::Multiply => a.checked_mul(b).map(Value::Int).ok_or_else(overflow),
        BinOp::Divide => Ok(Value::Float(a as f64 / b as f64)),
        BinOp::Modulo if b == 0 => Err(EvalError::DivisionByZero),
        BinOp::Modulo => Ok(Value::Int(a.wrapping_rem(b))),
        BinOp::Power if b < 0 => Ok(Value::Float((a as f64).powf(b as f64))),
        BinOp::Power => match (a, b) {
            (_, 0) => Ok(Value::Int(1)),
            // Exponents past u32::MAX only overflow when |a| > 1
            (0 | 1, _) => Ok(Value::Int(a)),
            (-1, _) => Ok(Value::Int(if b % 2 == 0 { 1 } else { -1 })),
            _ => u32::try_from(b)
                .ok()
                .and_then(|exp| a.checked_pow(exp))
                .map(Value::Int)
                .ok_or_else(overflow),
        },
        _ => unreachable!("{:?} is not an arithmetic operator", op),
    }
}

fn float_arithmetic(op: BinOp, a: f64, b: f64) -> f64 {
    match op {
        BinOp::Add => a + b,
        BinOp::Subtract => a - b,
        BinOp::Multiply => a * b,
        BinOp::Divide => a / b,
        BinOp::Modulo => a % b,
        BinOp::Power => a.powf(b),
        _ => unreachable!("{:?} is not an arithmetic operator", op),
    }
}

fn apply_comparison(op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let ordering = match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => match (left.as_float(), right.as_float()) {
            // NaN compares unordered, so only `!=` holds
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => return compare_other(op, left, right),
        },
    };

    let result = match op {
        BinOp::Equal => ordering == Some(Ordering::Equal),
        BinOp::NotEqual => ordering != Some(Ordering::Equal),
        BinOp::LessThan => ordering == Some(Ordering::Less),
        BinOp::GreaterThan => ordering == Some(Ordering::Greater),
        BinOp::LessEqual => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        BinOp::GreaterEqual => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        _ => unreachable!("{:?} is not a comparison operator", op),
    };
    Ok(Value::Bool(result))
}

/// Booleans, mixed kinds and compound values support only `=` and `!=`.
fn compare_other(op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    match op {
        BinOp::Equal => Ok(Value::Bool(values_equal(left, right))),
        BinOp::NotEqual => Ok(Value::Bool(!values_equal(left, right))),
        _ => Err(EvalError::TypeError(format!(
            "Cannot compare {} and {} with `{}`",
            left.type_name(),
            right.type_name(),
            op.symbol()
        ))),
    }
}

/// Structural equality that promotes numbers at every level, so `[1] = [1.0]`.
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            left.as_float() == right.as_float()
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| values_equal(x, y)))
        }
        _ => left == right,
    }
}

impl Expr {
    /// Evaluates this expression against `context` with a fresh [`Evaluator`].
    ///
    /// To evaluate one expression against many contexts, reuse an evaluator
    /// instead so compiled regexes are shared.
    pub fn evaluate(&self, context: &Value) -> Result<Value, EvalError> {
        Evaluator::new().evaluate(self, context)
    }
}
