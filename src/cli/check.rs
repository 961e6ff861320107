//! Execute jsonql expressions against JSON input

use super::CliError;
use crate::{FilterQuery, PathQuery, parse, value_to_json};

/// How the expression is applied to the input document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Evaluate against the whole document
    #[default]
    Path,
    /// Keep the records of a top-level array for which the expression is true
    Filter,
    /// Only validate syntax, don't execute
    SyntaxOnly,
}

/// Options for a single run
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The expression to execute
    pub expression: String,
    /// JSON input string
    pub input: Option<String>,
    pub mode: Mode,
}

/// Result of a run
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Expression executed successfully with JSON output
    Success(serde_json::Value),
}

/// Execute a jsonql run
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    if options.mode == Mode::SyntaxOnly {
        parse(&options.expression)?;
        return Ok(CheckResult::SyntaxValid);
    }

    let json = options.input.as_deref().ok_or(CliError::NoInput)?;

    let output = match options.mode {
        Mode::Filter => {
            let records = FilterQuery::from_json(json)?.query(&options.expression)?;
            serde_json::Value::Array(records.into_iter().map(value_to_json).collect())
        }
        _ => value_to_json(PathQuery::from_json(json)?.query(&options.expression)?),
    };

    Ok(CheckResult::Success(output))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(expression: &str, input: Option<&str>, mode: Mode) -> CheckOptions {
        CheckOptions {
            expression: expression.to_string(),
            input: input.map(str::to_string),
            mode,
        }
    }

    #[test]
    fn test_syntax_only_skips_input() {
        let result = execute_check(&options("a.b = 1", None, Mode::SyntaxOnly)).unwrap();
        assert!(matches!(result, CheckResult::SyntaxValid));
    }

    #[test]
    fn test_syntax_error_reported() {
        let err = execute_check(&options("a ==", None, Mode::SyntaxOnly)).unwrap_err();
        assert!(matches!(err, CliError::Parse(_)));
    }

    #[test]
    fn test_path_mode() {
        let result = execute_check(&options("a.b", Some(r#"{"a": {"b": [1, 2]}}"#), Mode::Path));
        match result.unwrap() {
            CheckResult::Success(v) => assert_eq!(v, serde_json::json!([1, 2])),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_filter_mode() {
        let input = r#"[{"n": 1}, {"n": 2}, {"n": 3}]"#;
        match execute_check(&options("n >= 2", Some(input), Mode::Filter)).unwrap() {
            CheckResult::Success(v) => assert_eq!(v, serde_json::json!([{"n": 2}, {"n": 3}])),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_missing_input() {
        let err = execute_check(&options("n", None, Mode::Path)).unwrap_err();
        assert!(matches!(err, CliError::NoInput));
    }
}
