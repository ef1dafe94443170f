//! Lexer - turns an expression string into infix tokens
//!
//! Identifiers are resolved against the declared variable names and the
//! known functions using the longest matching prefix, so `xy` lexes as
//! `x`, `y` when both are declared and `xy` is not.

use rustc_hash::{FxHashMap, FxHashSet};

use super::tokens::{Function, Operator, Token, builtin_function, builtin_operator};
use crate::tokenizer::is_allowed_operator_char;
use crate::{Span, SyntaxError};

struct Lexer<'a> {
    chars: Vec<char>,
    pos: usize,
    functions: &'a FxHashMap<String, Function>,
    operators: &'a FxHashMap<String, Operator>,
    variables: &'a FxHashSet<String>,
    tokens: Vec<Token>,
}

/// Split `input` into tokens in infix order
pub(crate) fn lex(
    input: &str,
    functions: &FxHashMap<String, Function>,
    operators: &FxHashMap<String, Operator>,
    variables: &FxHashSet<String>,
) -> Result<Vec<Token>, SyntaxError> {
    let chars: Vec<char> = input.chars().collect();
    let mut lexer = Lexer {
        tokens: Vec::with_capacity(chars.len()),
        chars,
        pos: 0,
        functions,
        operators,
        variables,
    };
    lexer.run()?;
    Ok(lexer.tokens)
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn is_identifier_part(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn is_prefix(op: &Operator) -> bool {
    op.is_unary() && !op.is_left_associative()
}

impl Lexer<'_> {
    fn peek_at(&self, pos: usize) -> Option<char> {
        self.chars.get(pos).copied()
    }

    fn run(&mut self) -> Result<(), SyntaxError> {
        while let Some(ch) = self.peek_at(self.pos) {
            if ch.is_whitespace() {
                self.pos += 1;
            } else if ch.is_ascii_digit() || ch == '.' {
                self.lex_number()?;
            } else if ch == '(' {
                self.tokens.push(Token::ParenOpen);
                self.pos += 1;
            } else if ch == ')' {
                self.tokens.push(Token::ParenClose);
                self.pos += 1;
            } else if ch == ',' {
                self.tokens.push(Token::Separator);
                self.pos += 1;
            } else if is_identifier_start(ch) {
                self.lex_identifier()?;
            } else if is_allowed_operator_char(ch) {
                self.lex_operator()?;
            } else {
                return Err(SyntaxError::UnexpectedChar {
                    ch,
                    span: Span::at(self.pos),
                });
            }
        }
        Ok(())
    }

    fn lex_number(&mut self) -> Result<(), SyntaxError> {
        let start = self.pos;
        while let Some(ch) = self.peek_at(self.pos) {
            if ch.is_ascii_digit() || ch == '.' {
                self.pos += 1;
            } else {
                break;
            }
        }

        // The exponent marker only belongs to the number when digits follow,
        // otherwise `2e` is `2 * e`.
        if let Some('e' | 'E') = self.peek_at(self.pos) {
            let digits_at = match self.peek_at(self.pos + 1) {
                Some('+' | '-') => self.pos + 2,
                _ => self.pos + 1,
            };
            if self.peek_at(digits_at).is_some_and(|c| c.is_ascii_digit()) {
                self.pos = digits_at;
                while self.peek_at(self.pos).is_some_and(|c| c.is_ascii_digit()) {
                    self.pos += 1;
                }
            }
        }

        let text: String = self.chars[start..self.pos].iter().collect();
        let value = text.parse::<f64>().map_err(|_| SyntaxError::InvalidNumber {
            value: text.clone(),
            span: Span::new(start, self.pos),
        })?;
        self.tokens.push(Token::Number(value));
        Ok(())
    }

    fn lex_identifier(&mut self) -> Result<(), SyntaxError> {
        let start = self.pos;
        let mut end = start;
        while self.peek_at(end).is_some_and(is_identifier_part) {
            end += 1;
        }

        // Longest known prefix wins
        for len in (1..=end - start).rev() {
            let candidate: String = self.chars[start..start + len].iter().collect();
            if self.variables.contains(&candidate) {
                self.pos = start + len;
                self.tokens.push(Token::Variable(candidate));
                return Ok(());
            }
            if let Some(func) = self.lookup_function(&candidate) {
                self.pos = start + len;
                self.expect_call(func.name(), start)?;
                self.tokens.push(Token::Function(func));
                return Ok(());
            }
        }

        Err(SyntaxError::UnknownIdentifier {
            name: self.chars[start..end].iter().collect(),
            span: Span::new(start, end),
        })
    }

    fn lookup_function(&self, name: &str) -> Option<Function> {
        self.functions
            .get(name)
            .or_else(|| builtin_function(name))
            .cloned()
    }

    /// A function name must be followed by its argument list
    fn expect_call(&self, name: &str, start: usize) -> Result<(), SyntaxError> {
        let mut pos = self.pos;
        while self.peek_at(pos).is_some_and(char::is_whitespace) {
            pos += 1;
        }
        match self.peek_at(pos) {
            Some('(') => Ok(()),
            _ => Err(SyntaxError::MissingCall {
                name: name.to_string(),
                span: Span::new(start, self.pos),
            }),
        }
    }

    /// Whether an operator at the current position is in prefix position
    fn expects_operand(&self) -> bool {
        match self.tokens.last() {
            None | Some(Token::ParenOpen | Token::Separator | Token::Function(_)) => true,
            // A left-associative unary operator is postfix and ends an operand
            Some(Token::Operator(op)) => !(op.is_unary() && op.is_left_associative()),
            Some(_) => false,
        }
    }

    fn lex_operator(&mut self) -> Result<(), SyntaxError> {
        let start = self.pos;
        let mut end = start;
        while self.peek_at(end).is_some_and(is_allowed_operator_char) {
            end += 1;
        }

        let unary = self.expects_operand();
        for len in (1..=end - start).rev() {
            let symbol: String = self.chars[start..start + len].iter().collect();
            if let Some(op) = self.lookup_operator(&symbol, unary) {
                self.pos = start + len;
                self.tokens.push(Token::Operator(op));
                return Ok(());
            }
        }

        Err(SyntaxError::UnknownOperator {
            symbol: self.chars[start..end].iter().collect(),
            span: Span::new(start, end),
        })
    }

    /// Resolve `symbol` to an operator that fits the current position.
    ///
    /// Only prefix operators may appear where an operand is expected, and
    /// only binary or postfix operators may follow an operand.
    fn lookup_operator(&self, symbol: &str, unary: bool) -> Option<Operator> {
        if let Some(op) = self.operators.get(symbol)
            && is_prefix(op) == unary
        {
            return Some(op.clone());
        }
        let mut chars = symbol.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => builtin_operator(ch, if unary { 1 } else { 2 }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::{PRECEDENCE_ADDITION, PRECEDENCE_UNARY_MINUS};

    fn lex_with(input: &str, vars: &[&str]) -> Result<Vec<Token>, SyntaxError> {
        let variables: FxHashSet<String> = vars.iter().map(|v| v.to_string()).collect();
        lex(input, &FxHashMap::default(), &FxHashMap::default(), &variables)
    }

    #[test]
    fn test_numbers() {
        let tokens = lex_with("3.25 1e3 2.5E-2 .5", &[]).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Number(3.25),
                Token::Number(1000.0),
                Token::Number(0.025),
                Token::Number(0.5),
            ]
        );
    }

    #[test]
    fn test_exponent_needs_digits() {
        let tokens = lex_with("2e", &["e"]).unwrap();
        assert_eq!(tokens, vec![Token::Number(2.0), Token::Variable("e".into())]);
    }

    #[test]
    fn test_invalid_number() {
        let err = lex_with("1.2.3", &[]).unwrap_err();
        assert!(matches!(err, SyntaxError::InvalidNumber { ref value, .. } if value == "1.2.3"));
    }

    #[test]
    fn test_identifier_splitting() {
        let tokens = lex_with("xy", &["x", "y"]).unwrap();
        assert_eq!(
            tokens,
            vec![Token::Variable("x".into()), Token::Variable("y".into())]
        );

        let tokens = lex_with("xy", &["x", "y", "xy"]).unwrap();
        assert_eq!(tokens, vec![Token::Variable("xy".into())]);
    }

    #[test]
    fn test_function_then_paren() {
        let tokens = lex_with("sin(x)", &["x"]).unwrap();
        assert!(matches!(&tokens[0], Token::Function(f) if f.name() == "sin"));
        assert_eq!(tokens[1], Token::ParenOpen);
    }

    #[test]
    fn test_function_without_call() {
        let err = lex_with("sin x", &["x"]).unwrap_err();
        assert!(matches!(err, SyntaxError::MissingCall { ref name, .. } if name == "sin"));
    }

    #[test]
    fn test_unknown_identifier() {
        let err = lex_with("x + foo", &["x"]).unwrap_err();
        assert_eq!(
            err,
            SyntaxError::UnknownIdentifier {
                name: "foo".into(),
                span: Span::new(4, 7),
            }
        );
    }

    #[test]
    fn test_unary_detection() {
        let tokens = lex_with("-x - (-2)", &["x"]).unwrap();
        let arities: Vec<usize> = tokens
            .iter()
            .filter_map(|t| match t {
                Token::Operator(op) => Some(op.operands()),
                _ => None,
            })
            .collect();
        assert_eq!(arities, vec![1, 2, 1]);
    }

    fn lex_with_operators(
        input: &str,
        vars: &[&str],
        ops: &[Operator],
    ) -> Result<Vec<Token>, SyntaxError> {
        let variables: FxHashSet<String> = vars.iter().map(|v| v.to_string()).collect();
        let operators: FxHashMap<String, Operator> = ops
            .iter()
            .map(|op| (op.symbol().to_string(), op.clone()))
            .collect();
        lex(input, &FxHashMap::default(), &operators, &variables)
    }

    #[test]
    fn test_binary_operator_in_prefix_position() {
        let err = lex_with("* x y", &["x", "y"]).unwrap_err();
        assert_eq!(
            err,
            SyntaxError::UnknownOperator {
                symbol: "*".into(),
                span: Span::at(0),
            }
        );

        let err = lex_with("x + (/ y)", &["x", "y"]).unwrap_err();
        assert!(matches!(err, SyntaxError::UnknownOperator { ref symbol, .. } if symbol == "/"));
    }

    #[test]
    fn test_custom_operator_position() {
        let mean = Operator::new("<>", 2, true, PRECEDENCE_ADDITION);
        let bang = Operator::new("!", 1, true, 10001);
        let tilde = Operator::new("~", 1, false, PRECEDENCE_UNARY_MINUS);
        let ops = [mean, bang, tilde];

        assert!(lex_with_operators("a <> b", &["a", "b"], &ops).is_ok());
        assert!(lex_with_operators("a! <> ~b", &["a", "b"], &ops).is_ok());

        for input in ["<> a", "(<> a)", "!a", "a ~ b"] {
            let err = lex_with_operators(input, &["a", "b"], &ops).unwrap_err();
            assert!(
                matches!(err, SyntaxError::UnknownOperator { .. }),
                "{input}: {err:?}"
            );
        }
    }

    #[test]
    fn test_unexpected_char() {
        let err = lex_with("x @ 2", &["x"]).unwrap_err();
        assert_eq!(
            err,
            SyntaxError::UnexpectedChar {
                ch: '@',
                span: Span::at(2),
            }
        );
    }

    #[test]
    fn test_unicode_constants() {
        let tokens = lex_with("2π", &["π"]).unwrap();
        assert_eq!(tokens, vec![Token::Number(2.0), Token::Variable("π".into())]);
    }
}
