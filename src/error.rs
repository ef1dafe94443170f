use thiserror::Error;

/// Source location span for error reporting
/// Represents a range of characters in the input string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start position (0-indexed char offset)
    pub start: usize,
    /// End position (exclusive, 0-indexed char offset)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Create a span for a single position
    pub fn at(pos: usize) -> Self {
        Span {
            start: pos,
            end: pos + 1,
        }
    }

    /// Check if this span has valid location info
    pub fn is_valid(&self) -> bool {
        self.end > self.start
    }

    /// Format the span for display (1-indexed for users)
    pub fn display(&self) -> String {
        if !self.is_valid() {
            String::new()
        } else if self.end - self.start == 1 {
            format!(" at position {}", self.start + 1)
        } else {
            format!(" at positions {}-{}", self.start + 1, self.end)
        }
    }
}

/// Syntax failures reported by the tokenizer and shunting-yard engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyntaxError {
    #[error("Unable to parse character '{ch}'{}", .span.display())]
    UnexpectedChar { ch: char, span: Span },

    #[error("Invalid number format: '{value}'{}", .span.display())]
    InvalidNumber { value: String, span: Span },

    #[error("Unknown function or variable '{name}'{}", .span.display())]
    UnknownIdentifier { name: String, span: Span },

    #[error("Unknown operator '{symbol}'{}", .span.display())]
    UnknownOperator { symbol: String, span: Span },

    #[error("Function '{name}' must be followed by '('{}", .span.display())]
    MissingCall { name: String, span: Span },

    #[error("Mismatched parentheses detected")]
    MismatchedParentheses,

    #[error("Misplaced function separator ',' or mismatched parentheses")]
    MisplacedSeparator,

    #[error("Invalid number of operands available for '{token}'")]
    MissingOperands { token: String },

    #[error("Too many operands: the expression leaves {count} values")]
    TooManyOperands { count: usize },

    #[error("Expression contains no tokens")]
    Empty,
}

/// Which compilation stage produced a [`CompileError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Configuration,
    Tokenization,
    TreeBuilding,
}

/// Errors that can occur while turning a formula into a differentiable tree
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    // Configuration errors
    #[error("Expression can not be empty")]
    InvalidExpression,

    #[error("The operator symbol '{symbol}' is invalid")]
    InvalidOperatorSymbol { symbol: String },

    #[error("A variable can not have the same name as a function or constant [{name}]")]
    NameCollision { name: String },

    // Syntax errors from the shunting-yard engine
    #[error("Invalid syntax: {0}")]
    Tokenization(#[from] SyntaxError),

    // Tree building errors
    #[error("{0}")]
    Tokenizer(String),

    #[error("Unsupported function: {name}")]
    UnsupportedFunction { name: String },

    #[error("Unsupported operator '{symbol}'")]
    UnsupportedOperator { symbol: String },

    #[error("Unknown variable '{name}'")]
    UnknownVariable { name: String },

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Literal {literal} is not representable by the scalar type")]
    LiteralConversion { literal: f64 },

    #[error("Expression nesting depth exceeds maximum limit")]
    MaxDepthExceeded,
}

impl CompileError {
    /// Create a builder-level structural error
    pub fn tokenizer(msg: impl Into<String>) -> Self {
        CompileError::Tokenizer(msg.into())
    }

    /// The stage that raised this error
    pub fn stage(&self) -> Stage {
        match self {
            CompileError::InvalidExpression
            | CompileError::InvalidOperatorSymbol { .. }
            | CompileError::NameCollision { .. } => Stage::Configuration,
            CompileError::Tokenization(_) => Stage::Tokenization,
            CompileError::Tokenizer(_)
            | CompileError::UnsupportedFunction { .. }
            | CompileError::UnsupportedOperator { .. }
            | CompileError::UnknownVariable { .. }
            | CompileError::UnsupportedOperation(_)
            | CompileError::LiteralConversion { .. }
            | CompileError::MaxDepthExceeded => Stage::TreeBuilding,
        }
    }
}
