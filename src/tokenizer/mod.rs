//! Tokenizer module - converts infix strings to RPN token sequences
mod implicit_mul;
mod lexer;
mod shunting_yard;
mod tokens;

pub use tokens::{
    Function, Operator, PRECEDENCE_ADDITION, PRECEDENCE_DIVISION, PRECEDENCE_MODULO,
    PRECEDENCE_MULTIPLICATION, PRECEDENCE_POWER, PRECEDENCE_SUBTRACTION, PRECEDENCE_UNARY_MINUS,
    PRECEDENCE_UNARY_PLUS, Token, builtin_function, builtin_operator, is_allowed_operator_char,
};

use crate::SyntaxError;
use rustc_hash::{FxHashMap, FxHashSet};

/// Convert an infix expression into a linear sequence of tokens in RPN order
///
/// # Arguments
/// * `expression` - The formula to convert (e.g., "2x^2 + y")
/// * `functions` - Custom functions by name, in addition to the built-in ones
/// * `operators` - Custom operators by symbol, in addition to the built-in ones
/// * `variables` - Every identifier that should lex as a variable
/// * `implicit_multiplication` - Whether adjacent operands multiply (`2x`)
///
/// # Errors
/// Returns `SyntaxError` if:
/// - The input contains an unknown character, identifier or operator
/// - A number literal is malformed
/// - Parentheses or argument separators are unbalanced
/// - An operator or function lacks operands, or operands are left over
pub fn convert_to_rpn(
    expression: &str,
    functions: &FxHashMap<String, Function>,
    operators: &FxHashMap<String, Operator>,
    variables: &FxHashSet<String>,
    implicit_multiplication: bool,
) -> Result<Vec<Token>, SyntaxError> {
    // Pipeline: lex -> implicit_mul -> shunting-yard -> validate
    let tokens = lexer::lex(expression, functions, operators, variables)?;

    let tokens = if implicit_multiplication {
        implicit_mul::insert_implicit_multiplication(tokens)
    } else {
        tokens
    };

    let rpn = shunting_yard::to_rpn(tokens)?;
    shunting_yard::validate(&rpn)?;

    tracing::trace!(expression, tokens = rpn.len(), "converted expression to RPN");
    Ok(rpn)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rpn(expression: &str, vars: &[&str], implicit: bool) -> Result<String, SyntaxError> {
        let variables: FxHashSet<String> = vars.iter().map(|v| v.to_string()).collect();
        let tokens = convert_to_rpn(
            expression,
            &FxHashMap::default(),
            &FxHashMap::default(),
            &variables,
            implicit,
        )?;
        Ok(tokens
            .iter()
            .map(Token::to_user_string)
            .collect::<Vec<_>>()
            .join(" "))
    }

    #[test]
    fn test_implicit_multiplication() {
        assert_eq!(rpn("2x^2 + y", &["x", "y"], true).unwrap(), "2 x 2 ^ * y +");
    }

    #[test]
    fn test_implicit_multiplication_disabled() {
        let err = rpn("2x", &["x"], false).unwrap_err();
        assert_eq!(err, SyntaxError::TooManyOperands { count: 2 });
        assert_eq!(rpn("2*x", &["x"], false).unwrap(), "2 x *");
    }

    #[test]
    fn test_parentheses_are_resolved() {
        assert_eq!(rpn("(a + b) * c", &["a", "b", "c"], true).unwrap(), "a b + c *");
    }

    #[test]
    fn test_functions() {
        assert_eq!(rpn("sin(x)cos(x)", &["x"], true).unwrap(), "x sin x cos *");
    }

    #[test]
    fn test_malformed_input_is_rejected() {
        assert_eq!(
            rpn("(x, y)*", &["x", "y"], true),
            Err(SyntaxError::MisplacedSeparator)
        );
        for implicit in [true, false] {
            let err = rpn("* x y", &["x", "y"], implicit).unwrap_err();
            assert!(matches!(err, SyntaxError::UnknownOperator { ref symbol, .. } if symbol == "*"));
        }
        assert!(rpn("x^*2", &["x"], true).is_err());
        assert_eq!(rpn("x*-2", &["x"], true).unwrap(), "x 2 - *");
    }

    #[test]
    fn test_empty_parentheses() {
        assert_eq!(rpn("()", &[], true), Err(SyntaxError::Empty));
    }

    #[test]
    fn test_missing_argument() {
        let err = rpn("sin()", &[], true).unwrap_err();
        assert_eq!(err, SyntaxError::MissingOperands { token: "sin".into() });
    }

    #[test]
    fn test_custom_operator() {
        let mut operators = FxHashMap::default();
        operators.insert(
            "<>".to_string(),
            Operator::new("<>", 2, true, PRECEDENCE_ADDITION),
        );
        let variables: FxHashSet<String> = ["a", "b"].iter().map(|v| v.to_string()).collect();
        let tokens =
            convert_to_rpn("a <> b", &FxHashMap::default(), &operators, &variables, true).unwrap();
        assert!(matches!(&tokens[2], Token::Operator(op) if op.symbol() == "<>"));

        let err = convert_to_rpn("<> a", &FxHashMap::default(), &operators, &variables, true)
            .unwrap_err();
        assert!(matches!(err, SyntaxError::UnknownOperator { ref symbol, .. } if symbol == "<>"));
    }
}
