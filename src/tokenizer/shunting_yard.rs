use super::tokens::Token;
use crate::SyntaxError;

/// Convert infix tokens to RPN using the shunting-yard algorithm.
///
/// Parentheses and separators are consumed here and never reach the output.
pub(crate) fn to_rpn(tokens: Vec<Token>) -> Result<Vec<Token>, SyntaxError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();

    for token in tokens {
        match token {
            Token::Number(_) | Token::Variable(_) => output.push(token),

            Token::Function(_) | Token::ParenOpen => stack.push(token),

            // Separators only split the arguments of a function call
            Token::Separator => loop {
                match stack.pop() {
                    Some(Token::ParenOpen) => {
                        if !matches!(stack.last(), Some(Token::Function(_))) {
                            return Err(SyntaxError::MisplacedSeparator);
                        }
                        stack.push(Token::ParenOpen);
                        break;
                    }
                    Some(top) => output.push(top),
                    None => return Err(SyntaxError::MisplacedSeparator),
                }
            },

            Token::Operator(ref o1) => {
                while let Some(Token::Operator(o2)) = stack.last() {
                    // A prefix operator never pops a pending binary operator
                    if o1.is_unary() && !o2.is_unary() {
                        break;
                    }
                    let pops = (o1.is_left_associative() && o1.precedence() <= o2.precedence())
                        || o1.precedence() < o2.precedence();
                    if !pops {
                        break;
                    }
                    if let Some(top) = stack.pop() {
                        output.push(top);
                    }
                }
                stack.push(token);
            }

            Token::ParenClose => {
                loop {
                    match stack.pop() {
                        Some(Token::ParenOpen) => break,
                        Some(top) => output.push(top),
                        None => return Err(SyntaxError::MismatchedParentheses),
                    }
                }
                if matches!(stack.last(), Some(Token::Function(_)))
                    && let Some(func) = stack.pop()
                {
                    output.push(func);
                }
            }
        }
    }

    while let Some(token) = stack.pop() {
        if matches!(token, Token::ParenOpen | Token::ParenClose) {
            return Err(SyntaxError::MismatchedParentheses);
        }
        output.push(token);
    }

    Ok(output)
}

/// Check that an RPN sequence reduces to exactly one value
pub(crate) fn validate(rpn: &[Token]) -> Result<(), SyntaxError> {
    if rpn.is_empty() {
        return Err(SyntaxError::Empty);
    }

    let mut count = 0usize;
    for token in rpn {
        let needed = token.consumes();
        if count < needed {
            return Err(SyntaxError::MissingOperands {
                token: token.to_user_string(),
            });
        }
        count = count - needed + 1;
    }

    if count > 1 {
        return Err(SyntaxError::TooManyOperands { count });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::{Function, builtin_operator};

    fn op(symbol: char, operands: usize) -> Token {
        Token::Operator(builtin_operator(symbol, operands).unwrap())
    }

    fn var(name: &str) -> Token {
        Token::Variable(name.to_string())
    }

    fn render(rpn: &[Token]) -> String {
        rpn.iter()
            .map(Token::to_user_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_precedence() {
        // x + 2 * 3 -> x 2 3 * +
        let rpn = to_rpn(vec![
            var("x"),
            op('+', 2),
            Token::Number(2.0),
            op('*', 2),
            Token::Number(3.0),
        ])
        .unwrap();
        assert_eq!(render(&rpn), "x 2 3 * +");
    }

    #[test]
    fn test_left_associative_subtraction() {
        // a - b - c -> a b - c -
        let rpn = to_rpn(vec![var("a"), op('-', 2), var("b"), op('-', 2), var("c")]).unwrap();
        assert_eq!(render(&rpn), "a b - c -");
    }

    #[test]
    fn test_right_associative_power() {
        // a ^ b ^ c -> a b c ^ ^
        let rpn = to_rpn(vec![var("a"), op('^', 2), var("b"), op('^', 2), var("c")]).unwrap();
        assert_eq!(render(&rpn), "a b c ^ ^");
    }

    #[test]
    fn test_unary_minus_binds_looser_than_power() {
        // -x ^ 2 -> x 2 ^ -
        let rpn = to_rpn(vec![op('-', 1), var("x"), op('^', 2), Token::Number(2.0)]).unwrap();
        assert_eq!(render(&rpn), "x 2 ^ -");
        assert!(matches!(&rpn[3], Token::Operator(o) if o.is_unary()));
    }

    #[test]
    fn test_function_call_with_arguments() {
        // logb(x, 2) + 1 -> x 2 logb 1 +
        let rpn = to_rpn(vec![
            Token::Function(Function::new("logb", 2)),
            Token::ParenOpen,
            var("x"),
            Token::Separator,
            Token::Number(2.0),
            Token::ParenClose,
            op('+', 2),
            Token::Number(1.0),
        ])
        .unwrap();
        assert_eq!(render(&rpn), "x 2 logb 1 +");
        validate(&rpn).unwrap();
    }

    #[test]
    fn test_mismatched_parentheses() {
        let err = to_rpn(vec![Token::ParenOpen, var("x")]).unwrap_err();
        assert_eq!(err, SyntaxError::MismatchedParentheses);

        let err = to_rpn(vec![var("x"), Token::ParenClose]).unwrap_err();
        assert_eq!(err, SyntaxError::MismatchedParentheses);
    }

    #[test]
    fn test_misplaced_separator() {
        let err = to_rpn(vec![var("x"), Token::Separator, var("y")]).unwrap_err();
        assert_eq!(err, SyntaxError::MisplacedSeparator);
    }

    #[test]
    fn test_separator_in_bare_group() {
        // (x, y) * -> not a function call
        let err = to_rpn(vec![
            Token::ParenOpen,
            var("x"),
            Token::Separator,
            var("y"),
            Token::ParenClose,
            op('*', 2),
        ])
        .unwrap_err();
        assert_eq!(err, SyntaxError::MisplacedSeparator);

        // logb((x, 2)) -> the inner group is not the call's argument list
        let err = to_rpn(vec![
            Token::Function(Function::new("logb", 2)),
            Token::ParenOpen,
            Token::ParenOpen,
            var("x"),
            Token::Separator,
            Token::Number(2.0),
            Token::ParenClose,
            Token::ParenClose,
        ])
        .unwrap_err();
        assert_eq!(err, SyntaxError::MisplacedSeparator);
    }

    #[test]
    fn test_validate() {
        assert_eq!(validate(&[]), Err(SyntaxError::Empty));
        assert_eq!(
            validate(&[var("x"), op('+', 2)]),
            Err(SyntaxError::MissingOperands { token: "+".into() })
        );
        assert_eq!(
            validate(&[var("x"), var("y")]),
            Err(SyntaxError::TooManyOperands { count: 2 })
        );
        assert_eq!(validate(&[var("x"), var("y"), op('*', 2)]), Ok(()));
    }
}
