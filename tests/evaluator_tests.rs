use pasmm::errors::{ErrorKind, PascalError, PascalResult};
use pasmm::frontend::lexer::scan;
use pasmm::frontend::token::{Token, TokenKind};
use pasmm::runtime::{evaluate, format_number, to_postfix};
use pasmm::semantic::{SymbolTable, Value};
use pasmm::LineNumber;

fn tokens(source: &str) -> PascalResult<Vec<Token>> {
    let mut state = LineNumber::default();
    let mut tokens = scan(&mut state, source)?;
    // Drop the end-of-file marker; expressions are token runs from a statement.
    tokens.retain(|t| t.kind != TokenKind::EndOfFile);
    Ok(tokens)
}

fn eval(source: &str) -> PascalResult<f64> {
    eval_with(source, &SymbolTable::new())
}

fn eval_with(source: &str, table: &SymbolTable) -> PascalResult<f64> {
    evaluate(&tokens(source)?, table)
}

fn postfix(source: &str) -> PascalResult<String> {
    let out = to_postfix(&tokens(source)?)?;
    Ok(out.iter().map(|t| t.text.as_str()).collect::<Vec<_>>().join(" "))
}

#[test]
fn test_precedence() -> PascalResult<()> {
    assert_eq!(eval("1 + 2 * 3")?, 7.0);
    assert_eq!(eval("(1 + 2) * 3")?, 6.0);
    assert_eq!(eval("5 > 3")?, 1.0);
    assert_eq!(eval("5 < 3")?, 0.0);
    Ok(())
}

#[test]
fn test_postfix_order() -> PascalResult<()> {
    assert_eq!(postfix("1 + 2 * 3")?, "1 2 3 * +");
    assert_eq!(postfix("(1 + 2) * 3")?, "1 2 + 3 *");
    assert_eq!(postfix("a - b - c")?, "a b - c -");
    assert_eq!(postfix("a < b or c = d and e")?, "a b < c d = e and or");
    assert_eq!(postfix("-a * b")?, "a u- b *");
    Ok(())
}

#[test]
fn test_left_associativity() -> PascalResult<()> {
    assert_eq!(eval("10 - 4 - 3")?, 3.0);
    assert_eq!(eval("100 / 10 / 5")?, 2.0);
    Ok(())
}

#[test]
fn test_arithmetic_operators() -> PascalResult<()> {
    assert_eq!(eval("7 / 2")?, 3.5);
    assert_eq!(eval("7 div 2")?, 3.0);
    assert_eq!(eval("-7 div 2")?, -4.0);
    assert_eq!(eval("7 mod 3")?, 1.0);
    assert_eq!(eval("7.5 mod 2")?, 1.5);
    Ok(())
}

#[test]
fn test_comparisons_and_logic() -> PascalResult<()> {
    assert_eq!(eval("2 = 2")?, 1.0);
    assert_eq!(eval("2 <> 2")?, 0.0);
    assert_eq!(eval("2 <= 2")?, 1.0);
    assert_eq!(eval("3 >= 4")?, 0.0);
    assert_eq!(eval("1 < 2 and 3 < 4")?, 1.0);
    assert_eq!(eval("1 > 2 or 3 > 4")?, 0.0);
    assert_eq!(eval("not 0")?, 1.0);
    assert_eq!(eval("not (1 = 1)")?, 0.0);
    Ok(())
}

#[test]
fn test_unary_signs() -> PascalResult<()> {
    assert_eq!(eval("-3 + 5")?, 2.0);
    assert_eq!(eval("2 * -3")?, -6.0);
    assert_eq!(eval("4 - -1")?, 5.0);
    assert_eq!(eval("+2")?, 2.0);
    assert_eq!(eval("-(1 + 2)")?, -3.0);
    Ok(())
}

#[test]
fn test_identifiers_resolve_through_table() -> PascalResult<()> {
    let mut table = SymbolTable::new();
    table.declare("n", Value::Int(4), false)?;
    table.declare("half", Value::Double(0.5), true)?;
    assert_eq!(eval_with("n * half + 1", &table)?, 3.0);
    Ok(())
}

#[test]
fn test_undeclared_identifier() {
    let err = eval("y + 1").expect_err("undeclared");
    assert!(matches!(err, PascalError::UndefinedSymbol { ref name } if name == "y"));
    assert_eq!(err.kind(), ErrorKind::NameResolution);
}

#[test]
fn test_division_by_zero() -> PascalResult<()> {
    let mut table = SymbolTable::new();
    table.declare("a", Value::Int(6), false)?;
    table.declare("b", Value::Int(0), false)?;
    for source in ["a / b", "a div b", "a mod b"] {
        let err = eval_with(source, &table).expect_err("division by zero");
        assert!(matches!(err, PascalError::DivisionByZero { .. }), "{}", source);
        assert_eq!(err.kind(), ErrorKind::Arithmetic);
    }
    Ok(())
}

#[test]
fn test_mismatched_parentheses() {
    assert!(matches!(eval("(1 + 2"), Err(PascalError::MismatchedParenthesis)));
    assert!(matches!(eval("1 + 2)"), Err(PascalError::MismatchedParenthesis)));
}

#[test]
fn test_missing_operands() {
    assert!(matches!(eval("1 +"), Err(PascalError::MissingOperand { .. })));
    assert!(matches!(eval("* 2"), Err(PascalError::MissingOperand { .. })));
    assert!(matches!(eval("-"), Err(PascalError::MissingOperand { .. })));
}

#[test]
fn test_malformed_expressions() {
    assert!(matches!(eval(""), Err(PascalError::ExpressionError { .. })));
    assert!(matches!(eval("1 2"), Err(PascalError::ExpressionError { .. })));
    assert!(matches!(eval("1 := 2"), Err(PascalError::ExpressionError { .. })));
    assert!(matches!(eval("\"text\""), Err(PascalError::ExpressionError { .. })));
    assert!(matches!(eval("1 # 2"), Err(PascalError::ExpressionError { .. })));
}

#[test]
fn test_trailing_semicolon_ignored() -> PascalResult<()> {
    assert_eq!(eval("2 * 21;")?, 42.0);
    Ok(())
}

#[test]
fn test_format_number() {
    assert_eq!(format_number(5.0), "5");
    assert_eq!(format_number(-12.0), "-12");
    assert_eq!(format_number(3.14), "3.14");
    assert_eq!(format_number(0.5), "0.5");
    assert_eq!(format_number(0.0), "0");
    assert_eq!(format_number(-0.0), "-0");
}

#[test]
fn test_format_number_six_significant_digits() {
    assert_eq!(format_number(1.0 / 3.0), "0.333333");
    assert_eq!(format_number(200.0 / 3.0), "66.6667");
    assert_eq!(format_number(-2.0 / 3.0), "-0.666667");
    assert_eq!(format_number(123456.0), "123456");
    assert_eq!(format_number(0.0001), "0.0001");
}

#[test]
fn test_format_number_exponent_form() {
    assert_eq!(format_number(10_000_000.0), "1e+07");
    assert_eq!(format_number(1234567.0), "1.23457e+06");
    assert_eq!(format_number(999999.5), "1e+06");
    assert_eq!(format_number(0.00001234), "1.234e-05");
    assert_eq!(format_number(-2.5e100), "-2.5e+100");
}
