use crate::config::evaluator::{is_unary, precedence, UNARY_MINUS, UNARY_PLUS};
use crate::errors::{PascalError, PascalResult};
use crate::frontend::token::{Token, TokenKind};
use crate::semantic::SymbolTable;
use log::trace;

/// Converts an infix token run to postfix order (shunting-yard).
///
/// Binary operators are left-associative. A `+`/`-` with no operand to its
/// left is rewritten as a prefix sign operator. Trailing `;` tokens are ignored.
pub fn to_postfix(tokens: &[Token]) -> PascalResult<Vec<Token>> {
    let mut end = tokens.len();
    while end > 0 && tokens[end - 1].is_separator(";") {
        end -= 1;
    }

    let mut output = Vec::with_capacity(end);
    let mut operators: Vec<Token> = Vec::new();
    let mut after_operand = false;

    for token in &tokens[..end] {
        match token.kind {
            TokenKind::Number | TokenKind::Identifier => {
                output.push(token.clone());
                after_operand = true;
            }
            TokenKind::Separator if token.text == "(" => {
                operators.push(token.clone());
                after_operand = false;
            }
            TokenKind::Separator if token.text == ")" => {
                loop {
                    match operators.pop() {
                        Some(op) if op.is_separator("(") => break,
                        Some(op) => output.push(op),
                        None => return Err(PascalError::MismatchedParenthesis),
                    }
                }
                after_operand = true;
            }
            TokenKind::Operator if token.text == ":=" => {
                return Err(PascalError::expression_error("assignment ':=' inside an expression"));
            }
            TokenKind::Operator if !after_operand && (token.text == "-" || token.text == "+") => {
                let sign = if token.text == "-" { UNARY_MINUS } else { UNARY_PLUS };
                operators.push(Token::new(TokenKind::Operator, sign, token.line));
            }
            TokenKind::Operator if token.text == "not" => {
                if after_operand {
                    return Err(PascalError::expression_error("'not' cannot follow an operand"));
                }
                operators.push(token.clone());
            }
            TokenKind::Operator => {
                let incoming = precedence(&token.text).ok_or_else(|| PascalError::UnknownOperator {
                    operator: token.text.clone(),
                })?;
                while let Some(top) = operators.last() {
                    if top.is_separator("(") {
                        break;
                    }
                    match precedence(&top.text) {
                        Some(stacked) if stacked >= incoming => {
                            if let Some(op) = operators.pop() {
                                output.push(op);
                            }
                        }
                        _ => break,
                    }
                }
                operators.push(token.clone());
                after_operand = false;
            }
            _ => {
                return Err(PascalError::expression_error(format!(
                    "unexpected '{}' at line {}",
                    token, token.line
                )));
            }
        }
    }

    while let Some(op) = operators.pop() {
        if op.is_separator("(") {
            return Err(PascalError::MismatchedParenthesis);
        }
        output.push(op);
    }
    Ok(output)
}

/// Evaluates a postfix run on a single `f64` stack.
///
/// Comparisons and logical operators yield `1.0` or `0.0`.
pub fn evaluate_postfix(postfix: &[Token], table: &SymbolTable) -> PascalResult<f64> {
    let mut stack: Vec<f64> = Vec::new();

    for token in postfix {
        match token.kind {
            TokenKind::Number => {
                let value = token.text.parse::<f64>().map_err(|_| {
                    PascalError::expression_error(format!("invalid number '{}'", token.text))
                })?;
                stack.push(value);
            }
            TokenKind::Identifier => stack.push(table.lookup(&token.text)?),
            TokenKind::Operator if token.text == ":=" => {
                return Err(PascalError::expression_error("assignment ':=' inside an expression"));
            }
            TokenKind::Operator if is_unary(&token.text) => {
                let operand = stack.pop().ok_or_else(|| missing_operand(token))?;
                stack.push(apply_unary(&token.text, operand)?);
            }
            TokenKind::Operator => {
                let (rhs, lhs) = match (stack.pop(), stack.pop()) {
                    (Some(rhs), Some(lhs)) => (rhs, lhs),
                    _ => return Err(missing_operand(token)),
                };
                stack.push(apply_binary(&token.text, lhs, rhs)?);
            }
            _ => {
                return Err(PascalError::expression_error(format!("unexpected '{}' in postfix", token)));
            }
        }
    }

    match stack.as_slice() {
        [result] => Ok(*result),
        [] => Err(PascalError::expression_error("empty expression")),
        _ => Err(PascalError::expression_error("operands without an operator")),
    }
}

/// Precedence-parses and evaluates one expression against `table`.
pub fn evaluate(tokens: &[Token], table: &SymbolTable) -> PascalResult<f64> {
    let postfix = to_postfix(tokens)?;
    trace!(
        "postfix: {}",
        postfix.iter().map(|t| t.text.as_str()).collect::<Vec<_>>().join(" ")
    );
    evaluate_postfix(&postfix, table)
}

fn missing_operand(token: &Token) -> PascalError {
    PascalError::MissingOperand {
        operator: token.text.clone(),
    }
}

fn truth(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

fn apply_unary(op: &str, operand: f64) -> PascalResult<f64> {
    match op {
        UNARY_MINUS => Ok(-operand),
        UNARY_PLUS => Ok(operand),
        "not" => Ok(truth(operand == 0.0)),
        _ => Err(PascalError::UnknownOperator {
            operator: op.to_string(),
        }),
    }
}

fn apply_binary(op: &str, lhs: f64, rhs: f64) -> PascalResult<f64> {
    let result = match op {
        "+" => lhs + rhs,
        "-" => lhs - rhs,
        "*" => lhs * rhs,
        "/" | "div" | "mod" if rhs == 0.0 => {
            return Err(PascalError::DivisionByZero {
                operator: op.to_string(),
            });
        }
        "/" => lhs / rhs,
        "div" => (lhs / rhs).floor(),
        "mod" => lhs % rhs,
        "=" => truth(lhs == rhs),
        "<>" => truth(lhs != rhs),
        "<" => truth(lhs < rhs),
        ">" => truth(lhs > rhs),
        "<=" => truth(lhs <= rhs),
        ">=" => truth(lhs >= rhs),
        "and" => truth(lhs != 0.0 && rhs != 0.0),
        "or" => truth(lhs != 0.0 || rhs != 0.0),
        _ => {
            return Err(PascalError::UnknownOperator {
                operator: op.to_string(),
            });
        }
    };
    Ok(result)
}
