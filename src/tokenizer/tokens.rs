//! Token and descriptor types shared by the lexer, the shunting-yard engine
//! and the tree builder.

use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::OnceLock;

/// Precedence of binary `+` and `-`
pub const PRECEDENCE_ADDITION: i32 = 500;
/// Precedence of binary `-`
pub const PRECEDENCE_SUBTRACTION: i32 = PRECEDENCE_ADDITION;
/// Precedence of `*`
pub const PRECEDENCE_MULTIPLICATION: i32 = 1000;
/// Precedence of `/`
pub const PRECEDENCE_DIVISION: i32 = PRECEDENCE_MULTIPLICATION;
/// Precedence of `%`
pub const PRECEDENCE_MODULO: i32 = PRECEDENCE_DIVISION;
/// Precedence of `^`
pub const PRECEDENCE_POWER: i32 = 10000;
/// Precedence of unary `-`
pub const PRECEDENCE_UNARY_MINUS: i32 = 5000;
/// Precedence of unary `+`
pub const PRECEDENCE_UNARY_PLUS: i32 = PRECEDENCE_UNARY_MINUS;

/// Characters an operator symbol may be built from
const ALLOWED_OPERATOR_CHARS: &[char] = &[
    '+', '-', '*', '/', '^', '%', '!', '#', '§', '$', '&', ';', ':', '~', '<', '>', '|', '=',
];

/// Check whether `ch` may appear in an operator symbol
pub fn is_allowed_operator_char(ch: char) -> bool {
    ALLOWED_OPERATOR_CHARS.contains(&ch)
}

/// Descriptor of a prefix/infix operator known to the tokenizer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Operator {
    symbol: String,
    operands: usize,
    left_associative: bool,
    precedence: i32,
}

impl Operator {
    /// Create an operator descriptor.
    ///
    /// `operands` is 1 for prefix operators and 2 for infix operators.
    pub fn new(
        symbol: impl Into<String>,
        operands: usize,
        left_associative: bool,
        precedence: i32,
    ) -> Self {
        Operator {
            symbol: symbol.into(),
            operands,
            left_associative,
            precedence,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn operands(&self) -> usize {
        self.operands
    }

    pub fn is_left_associative(&self) -> bool {
        self.left_associative
    }

    pub fn precedence(&self) -> i32 {
        self.precedence
    }

    pub fn is_unary(&self) -> bool {
        self.operands == 1
    }
}

/// Descriptor of a named function known to the tokenizer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Function {
    name: String,
    arity: usize,
}

impl Function {
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        Function {
            name: name.into(),
            arity,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }
}

/// A lexical token. After shunting-yard conversion tokens are in RPN order.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Variable(String),
    Operator(Operator),
    Function(Function),
    ParenOpen,
    ParenClose,
    /// Argument separator `,`
    Separator,
}

impl Token {
    /// How many values this token consumes from an RPN evaluation stack
    pub(crate) fn consumes(&self) -> usize {
        match self {
            Token::Operator(op) => op.operands(),
            Token::Function(func) => func.arity(),
            _ => 0,
        }
    }

    /// Human-readable form used in error messages
    pub fn to_user_string(&self) -> String {
        match self {
            Token::Number(n) => n.to_string(),
            Token::Variable(name) => name.clone(),
            Token::Operator(op) => op.symbol().to_string(),
            Token::Function(func) => func.name().to_string(),
            Token::ParenOpen => "(".to_string(),
            Token::ParenClose => ")".to_string(),
            Token::Separator => ",".to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_user_string())
    }
}

/// Look up one of the built-in operators by symbol and operand count
pub fn builtin_operator(symbol: char, operands: usize) -> Option<Operator> {
    let op = match (symbol, operands) {
        ('+', 2) => Operator::new("+", 2, true, PRECEDENCE_ADDITION),
        ('-', 2) => Operator::new("-", 2, true, PRECEDENCE_SUBTRACTION),
        ('*', 2) => Operator::new("*", 2, true, PRECEDENCE_MULTIPLICATION),
        ('/', 2) => Operator::new("/", 2, true, PRECEDENCE_DIVISION),
        ('%', 2) => Operator::new("%", 2, true, PRECEDENCE_MODULO),
        ('^', 2) => Operator::new("^", 2, false, PRECEDENCE_POWER),
        ('-', 1) => Operator::new("-", 1, false, PRECEDENCE_UNARY_MINUS),
        ('+', 1) => Operator::new("+", 1, false, PRECEDENCE_UNARY_PLUS),
        _ => return None,
    };
    Some(op)
}

/// Names and arities of the functions the tokenizer always recognizes
const BUILTIN_FUNCTIONS: &[(&str, usize)] = &[
    ("sin", 1),
    ("cos", 1),
    ("tan", 1),
    ("cot", 1),
    ("log", 1),
    ("log2", 1),
    ("log10", 1),
    ("log1p", 1),
    ("abs", 1),
    ("acos", 1),
    ("asin", 1),
    ("atan", 1),
    ("cbrt", 1),
    ("floor", 1),
    ("sinh", 1),
    ("sqrt", 1),
    ("cosh", 1),
    ("tanh", 1),
    ("ceil", 1),
    ("pow", 2),
    ("exp", 1),
    ("expm1", 1),
    ("signum", 1),
    ("csc", 1),
    ("sec", 1),
    ("csch", 1),
    ("sech", 1),
    ("coth", 1),
    ("logb", 2),
    ("toradian", 1),
    ("todegree", 1),
];

static BUILTINS: OnceLock<FxHashMap<&'static str, Function>> = OnceLock::new();

fn init_builtins() -> FxHashMap<&'static str, Function> {
    BUILTIN_FUNCTIONS
        .iter()
        .map(|&(name, arity)| (name, Function::new(name, arity)))
        .collect()
}

/// Get a built-in function descriptor by name - O(1) HashMap lookup
pub fn builtin_function(name: &str) -> Option<&'static Function> {
    BUILTINS.get_or_init(init_builtins).get(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_operator_chars() {
        for ch in "+-*/^%!#§$&;:~<>|=".chars() {
            assert!(is_allowed_operator_char(ch), "{ch} should be allowed");
        }
        for ch in ['a', '1', '(', ')', ',', '.', ' ', '@'] {
            assert!(!is_allowed_operator_char(ch), "{ch} should be rejected");
        }
    }

    #[test]
    fn test_builtin_operator_shapes() {
        let pow = builtin_operator('^', 2).unwrap();
        assert!(!pow.is_left_associative());
        assert!(pow.precedence() > PRECEDENCE_UNARY_MINUS);

        let neg = builtin_operator('-', 1).unwrap();
        assert!(neg.is_unary());
        assert!(neg.precedence() > PRECEDENCE_MULTIPLICATION);

        assert!(builtin_operator('*', 1).is_none());
        assert!(builtin_operator('!', 2).is_none());
    }

    #[test]
    fn test_builtin_function_lookup() {
        assert_eq!(builtin_function("sin").map(Function::arity), Some(1));
        assert_eq!(builtin_function("logb").map(Function::arity), Some(2));
        assert!(builtin_function("x").is_none());
        assert!(builtin_function("pi").is_none());
    }

    #[test]
    fn test_consumes() {
        assert_eq!(Token::Number(1.0).consumes(), 0);
        assert_eq!(Token::Operator(builtin_operator('+', 2).unwrap()).consumes(), 2);
        assert_eq!(Token::Function(Function::new("f", 3)).consumes(), 3);
    }
}
