//! Implicit multiplication insertion for natural notation
//!
//! Inserts `*` operators between tokens where multiplication is implied, e.g. `2x` → `2 * x`.

use super::tokens::{Token, builtin_operator};

/// Whether `token` can end an operand
fn ends_operand(token: &Token) -> bool {
    match token {
        Token::Number(_) | Token::Variable(_) | Token::ParenClose => true,
        // Postfix operators such as a custom `!`
        Token::Operator(op) => op.is_unary() && op.is_left_associative(),
        _ => false,
    }
}

/// Check if implicit multiplication should be inserted between two tokens
fn should_insert_mul(current: &Token, next: &Token) -> bool {
    if !ends_operand(current) {
        return false;
    }
    match next {
        // 2x, xy, )x, 2 sin(x), x(y), 2(x), )(
        Token::Variable(_) | Token::Function(_) | Token::ParenOpen => true,
        // x2, )2 but never 2 3
        Token::Number(_) => !matches!(current, Token::Number(_)),
        _ => false,
    }
}

/// Insert implicit multiplication operators between appropriate tokens
///
/// Rules:
/// - Number * Identifier: `2 x` → `2 * x`
/// - Identifier * Identifier: `a x` → `a * x`
/// - Identifier * Function: `x sin(y)` → `x * sin(y)`
/// - ) * Identifier/Number/(: `(a) x` → `(a) * x`
/// - Identifier/Number * (: `x (y)` → `x * (y)`
///
/// Exception: Number followed by Number is left alone so the shunting-yard
/// validation reports it.
pub(crate) fn insert_implicit_multiplication(tokens: Vec<Token>) -> Vec<Token> {
    if tokens.is_empty() {
        return tokens;
    }

    let needs_insertion = tokens
        .windows(2)
        .any(|w| should_insert_mul(&w[0], &w[1]));

    if !needs_insertion {
        return tokens;
    }

    let Some(mul) = builtin_operator('*', 2) else {
        return tokens;
    };

    let mut result = Vec::with_capacity(tokens.len() * 3 / 2);
    let mut it = tokens.into_iter().peekable();

    while let Some(current) = it.next() {
        let needs_mul = it
            .peek()
            .is_some_and(|next| should_insert_mul(&current, next));

        result.push(current);
        if needs_mul {
            result.push(Token::Operator(mul.clone()));
        }
    }

    result
}
