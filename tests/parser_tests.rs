use jsonql::{
    ast::{BinOp, Expr, LogicalOp, PathStep, UnaryOp},
    lexer::{LexError, Lexer, Position},
    parser::{ParseError, Parser, parse},
    value::Value,
};

fn int(n: i64) -> Expr {
    Expr::Literal(Value::Int(n))
}

fn string(s: &str) -> Expr {
    Expr::Literal(Value::String(s.to_string()))
}

fn field(name: &str) -> PathStep {
    PathStep::Field(name.to_string())
}

fn path(names: &[&str]) -> Expr {
    Expr::Path(names.iter().map(|n| field(n)).collect())
}

fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn logical(op: LogicalOp, left: Expr, right: Expr) -> Expr {
    Expr::Logical {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn unary(op: UnaryOp, operand: Expr) -> Expr {
    Expr::Unary {
        op,
        operand: Box::new(operand),
    }
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_parse_literals() {
    let cases = vec![
        ("null", Value::Absent),
        ("true", Value::Bool(true)),
        ("false", Value::Bool(false)),
        ("1", Value::Int(1)),
        ("010", Value::Int(8)),
        ("0xa", Value::Int(10)),
        ("1.25e2", Value::Float(125.0)),
        (".5", Value::Float(0.5)),
        ("'foo'", Value::String("foo".into())),
    ];

    for (input, expected) in cases {
        assert_eq!(parse(input).unwrap(), Expr::Literal(expected), "Failed for input: {}", input);
    }
}

// ============================================================================
// Paths
// ============================================================================

#[test]
fn test_parse_bare_identifier() {
    assert_eq!(parse("blah").unwrap(), path(&["blah"]));
}

#[test]
fn test_parse_dotted_path() {
    assert_eq!(parse("foo.bar.baz").unwrap(), path(&["foo", "bar", "baz"]));
}

#[test]
fn test_parse_index_steps() {
    let expected = Expr::Path(vec![field("skills"), PathStep::Index(Box::new(int(1)))]);
    assert_eq!(parse("skills[1]").unwrap(), expected);
    assert_eq!(parse("skills.[1]").unwrap(), expected);
}

#[test]
fn test_parse_dynamic_index() {
    assert_eq!(
        parse("foo[bar]").unwrap(),
        Expr::Path(vec![field("foo"), PathStep::Index(Box::new(path(&["bar"])))])
    );
    assert_eq!(
        parse("foo[i + 1].name").unwrap(),
        Expr::Path(vec![
            field("foo"),
            PathStep::Index(Box::new(binary(BinOp::Add, path(&["i"]), int(1)))),
            field("name"),
        ])
    );
}

#[test]
fn test_parse_root_index() {
    assert_eq!(
        parse("[0].name").unwrap(),
        Expr::Path(vec![PathStep::Index(Box::new(int(0))), field("name")])
    );
    assert_eq!(
        parse("[2].skills.[1]").unwrap(),
        Expr::Path(vec![
            PathStep::Index(Box::new(int(2))),
            field("skills"),
            PathStep::Index(Box::new(int(1))),
        ])
    );
}

// ============================================================================
// Precedence and Associativity
// ============================================================================

#[test]
fn test_multiplication_binds_tighter() {
    assert_eq!(
        parse("10-2*4").unwrap(),
        binary(BinOp::Subtract, int(10), binary(BinOp::Multiply, int(2), int(4)))
    );
}

#[test]
fn test_subtraction_is_left_associative() {
    assert_eq!(
        parse("10-2-4").unwrap(),
        binary(BinOp::Subtract, binary(BinOp::Subtract, int(10), int(2)), int(4))
    );
}

#[test]
fn test_power_is_right_associative() {
    assert_eq!(
        parse("2^3^2").unwrap(),
        binary(BinOp::Power, int(2), binary(BinOp::Power, int(3), int(2)))
    );
}

#[test]
fn test_power_binds_tighter_than_multiply() {
    assert_eq!(
        parse("2^2*4").unwrap(),
        binary(BinOp::Multiply, binary(BinOp::Power, int(2), int(2)), int(4))
    );
}

#[test]
fn test_negative_exponent() {
    assert_eq!(
        parse("2^-2").unwrap(),
        binary(BinOp::Power, int(2), unary(UnaryOp::Negate, int(2)))
    );
}

#[test]
fn test_parentheses_leave_no_node() {
    assert_eq!(
        parse("(10-2)*4").unwrap(),
        binary(BinOp::Multiply, binary(BinOp::Subtract, int(10), int(2)), int(4))
    );
    assert_eq!(parse("((1))").unwrap(), int(1));
}

#[test]
fn test_and_binds_tighter_than_or() {
    assert_eq!(
        parse("a && b || c").unwrap(),
        logical(
            LogicalOp::Or,
            logical(LogicalOp::And, path(&["a"]), path(&["b"])),
            path(&["c"])
        )
    );
    assert_eq!(
        parse("a || b && c").unwrap(),
        logical(
            LogicalOp::Or,
            path(&["a"]),
            logical(LogicalOp::And, path(&["b"]), path(&["c"]))
        )
    );
}

#[test]
fn test_comparison_below_arithmetic() {
    assert_eq!(
        parse("a + 1 >= b * 2").unwrap(),
        binary(
            BinOp::GreaterEqual,
            binary(BinOp::Add, path(&["a"]), int(1)),
            binary(BinOp::Multiply, path(&["b"]), int(2))
        )
    );
}

#[test]
fn test_comparison_operators() {
    let cases = vec![
        ("a = 'x'", BinOp::Equal),
        ("a != 'x'", BinOp::NotEqual),
        ("a < 'x'", BinOp::LessThan),
        ("a > 'x'", BinOp::GreaterThan),
        ("a <= 'x'", BinOp::LessEqual),
        ("a >= 'x'", BinOp::GreaterEqual),
        ("a ~= 'x'", BinOp::Match),
        ("a !~= 'x'", BinOp::NotMatch),
    ];

    for (input, op) in cases {
        assert_eq!(
            parse(input).unwrap(),
            binary(op, path(&["a"]), string("x")),
            "Failed for input: {}",
            input
        );
    }
}

// ============================================================================
// Unary
// ============================================================================

#[test]
fn test_nested_unary() {
    assert_eq!(
        parse("!!blah").unwrap(),
        unary(UnaryOp::Not, unary(UnaryOp::Not, path(&["blah"])))
    );
    assert_eq!(parse("-1").unwrap(), unary(UnaryOp::Negate, int(1)));
}

#[test]
fn test_unary_binds_tighter_than_power() {
    assert_eq!(
        parse("-2^2").unwrap(),
        binary(BinOp::Power, unary(UnaryOp::Negate, int(2)), int(2))
    );
}

// ============================================================================
// Defined / Null Checks
// ============================================================================

#[test]
fn test_defined_and_null_spellings() {
    let op = || Box::new(path(&["a", "b"]));
    let cases = vec![
        ("a.b is defined", Expr::DefinedCheck { operand: op(), negated: false }),
        ("a.b is not defined", Expr::DefinedCheck { operand: op(), negated: true }),
        ("a.b isnot defined", Expr::DefinedCheck { operand: op(), negated: true }),
        ("a.b is null", Expr::NullCheck { operand: op(), negated: false }),
        ("a.b is not null", Expr::NullCheck { operand: op(), negated: true }),
        ("a.b isnot null", Expr::NullCheck { operand: op(), negated: true }),
    ];

    for (input, expected) in cases {
        assert_eq!(parse(input).unwrap(), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_defined_check_inside_logic() {
    assert_eq!(
        parse("a is defined && a > 1").unwrap(),
        logical(
            LogicalOp::And,
            Expr::DefinedCheck {
                operand: Box::new(path(&["a"])),
                negated: false
            },
            binary(BinOp::GreaterThan, path(&["a"]), int(1))
        )
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_error_position_of_unexpected_token() {
    let err = parse("a = = 1").unwrap_err();
    assert!(matches!(err, ParseError::Unexpected { .. }));
    assert_eq!(err.position(), Position { offset: 4, line: 1, column: 5 });
}

#[test]
fn test_error_at_end_of_input() {
    let err = parse("(1 + 2").unwrap_err();
    match err {
        ParseError::Unexpected { found, position, .. } => {
            assert_eq!(found, "end of input");
            assert_eq!(position.offset, 6);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_trailing_tokens_rejected() {
    assert!(parse("1 2").is_err());
    assert!(parse("a b").is_err());
    assert!(parse("1 < 2 < 3").is_err());
}

#[test]
fn test_incomplete_is_check() {
    let err = parse("a is not").unwrap_err();
    match err {
        ParseError::Unexpected { expected, .. } => assert_eq!(expected, "`defined` or `null`"),
        other => panic!("unexpected error {:?}", other),
    }
    assert!(parse("a isnot true").is_err());
}

#[test]
fn test_dot_requires_field_or_bracket() {
    assert!(parse("a.").is_err());
    assert!(parse("a.1").is_err());
    assert!(parse("a..b").is_err());
}

#[test]
fn test_invalid_token_reports_text() {
    let err = parse("name = 'elgs").unwrap_err();
    match err {
        ParseError::Invalid {
            error,
            text,
            position,
        } => {
            assert_eq!(error, LexError::UnterminatedString);
            assert_eq!(text, "'elgs");
            assert_eq!(position.column, 8);
        }
        other => panic!("unexpected error {:?}", other),
    }

    let err = parse("a # b").unwrap_err();
    assert!(matches!(
        err,
        ParseError::Invalid {
            error: LexError::UnexpectedChar('#'),
            ..
        }
    ));
}

#[test]
fn test_malformed_number_is_syntax_error() {
    let err = parse("x = 09").unwrap_err();
    match err {
        ParseError::Invalid { error, text, .. } => {
            assert_eq!(error, LexError::MalformedNumber("09".into()));
            assert_eq!(text, "09");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_error_display_mentions_position() {
    let err = parse("\n  )").unwrap_err();
    assert_eq!(err.position().line, 2);
    assert!(err.to_string().contains("line 2, column 3"), "{}", err);
}

#[test]
fn test_depth_limit() {
    let deep = format!("{}1{}", "(".repeat(20), ")".repeat(20));
    let err = Parser::new(Lexer::new(&deep)).with_max_depth(10).parse().unwrap_err();
    assert!(matches!(err, ParseError::TooDeep { .. }));

    assert!(Parser::new(Lexer::new(&deep)).parse().is_ok());

    let bangs = format!("{}true", "!".repeat(1000));
    assert!(matches!(parse(&bangs), Err(ParseError::TooDeep { .. })));
}

#[test]
fn test_power_chain_depth_limit() {
    let chain = format!("{}2", "2^".repeat(200));
    assert!(matches!(parse(&chain), Err(ParseError::TooDeep { .. })));

    let chain = format!("{}2", "2^".repeat(200_000));
    assert!(matches!(parse(&chain), Err(ParseError::TooDeep { .. })));

    let short = format!("{}2", "2^".repeat(5));
    assert!(Parser::new(Lexer::new(&short)).with_max_depth(10).parse().is_ok());
}

#[test]
fn test_long_operator_chains_hit_depth_limit() {
    for op in ["+", "-", "*", "%", "&&", "||"] {
        let chain = vec!["1"; 300_000].join(op);
        assert!(
            matches!(parse(&chain), Err(ParseError::TooDeep { .. })),
            "Failed for operator: {}",
            op
        );
    }
}

#[test]
fn test_moderate_chains_parse_and_evaluate() {
    let chain = vec!["1"; 100].join(" + ");
    assert_eq!(parse(&chain).unwrap().evaluate(&Value::Absent).unwrap(), Value::Int(100));

    // Each parenthesised group gives its levels back once closed
    let groups = vec!["(1 + 1 + 1)"; 100].join(" * 1 + ");
    assert!(parse(&groups).is_ok());
}

#[test]
fn test_from_str() {
    let expr: Expr = "gender = 'f'".parse().unwrap();
    assert_eq!(expr, binary(BinOp::Equal, path(&["gender"]), string("f")));
}
