//! Expression configuration - declares the names an expression may use and
//! produces its RPN token sequence.
//!
//! # Example
//! ```
//! use rpn_autodiff::ExpressionParser;
//!
//! let tokens = ExpressionParser::new("2x^2 + y")?
//!     .variable("x")
//!     .variable("y")
//!     .compile()?;
//! assert_eq!(tokens.len(), 7);
//! # Ok::<(), rpn_autodiff::CompileError>(())
//! ```

use rustc_hash::{FxHashMap, FxHashSet};

use crate::tokenizer::{self, Function, Operator, Token};
use crate::{CompileError, DEFAULT_IMPLICIT_MULTIPLICATION};

/// Constant names every expression may reference
pub const RESERVED_CONSTANTS: [&str; 4] = ["pi", "π", "e", "φ"];

/// Check whether `name` is one of the reserved constant names
pub fn is_reserved_constant(name: &str) -> bool {
    RESERVED_CONSTANTS.contains(&name)
}

/// Builder collecting everything the tokenizer needs to know about an expression
#[derive(Debug, Clone)]
pub struct ExpressionParser {
    expression: String,
    functions: FxHashMap<String, Function>,
    operators: FxHashMap<String, Operator>,
    names: FxHashSet<String>,
    implicit: bool,
}

impl ExpressionParser {
    /// Start configuring `expression`.
    ///
    /// # Errors
    /// `InvalidExpression` when the expression is empty or only whitespace.
    pub fn new(expression: impl Into<String>) -> Result<Self, CompileError> {
        let expression = expression.into();
        if expression.trim().is_empty() {
            return Err(CompileError::InvalidExpression);
        }
        Ok(ExpressionParser {
            expression,
            functions: FxHashMap::default(),
            operators: FxHashMap::default(),
            names: FxHashSet::default(),
            implicit: DEFAULT_IMPLICIT_MULTIPLICATION,
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Declare a variable name used in the expression
    pub fn variable(mut self, name: impl Into<String>) -> Self {
        self.names.insert(name.into());
        self
    }

    /// Declare multiple variable names
    pub fn variables<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Add a custom function available for use in the expression
    pub fn function(mut self, function: Function) -> Self {
        self.functions.insert(function.name().to_string(), function);
        self
    }

    /// Add multiple custom functions
    pub fn functions<I>(mut self, functions: I) -> Self
    where
        I: IntoIterator<Item = Function>,
    {
        for function in functions {
            self.functions.insert(function.name().to_string(), function);
        }
        self
    }

    /// Add a custom operator available for use in the expression
    ///
    /// # Errors
    /// `InvalidOperatorSymbol` when the symbol is empty or uses a character
    /// operators may not contain.
    pub fn operator(mut self, operator: Operator) -> Result<Self, CompileError> {
        check_operator_symbol(&operator)?;
        self.operators.insert(operator.symbol().to_string(), operator);
        Ok(self)
    }

    /// Add multiple custom operators
    pub fn operators<I>(self, operators: I) -> Result<Self, CompileError>
    where
        I: IntoIterator<Item = Operator>,
    {
        operators
            .into_iter()
            .try_fold(self, |parser, operator| parser.operator(operator))
    }

    /// Enable or disable implicit multiplication (`2x` meaning `2 * x`)
    pub fn implicit_multiplication(mut self, enabled: bool) -> Self {
        self.implicit = enabled;
        self
    }

    /// Produce the RPN token sequence for the configured expression.
    ///
    /// The reserved constant names are added to the declared variables on
    /// every call; the configuration itself is left untouched.
    ///
    /// # Errors
    /// - `NameCollision` when a declared name is a reserved constant, or any
    ///   variable name is also a built-in or custom function name
    /// - `Tokenization` when the expression is not well formed
    pub fn compile(&self) -> Result<Vec<Token>, CompileError> {
        if let Some(name) = self.names.iter().find(|name| is_reserved_constant(name)) {
            return Err(CompileError::NameCollision { name: name.clone() });
        }

        let mut names = self.names.clone();
        names.extend(RESERVED_CONSTANTS.iter().map(|name| name.to_string()));

        let mut collisions: Vec<&String> = names
            .iter()
            .filter(|name| {
                tokenizer::builtin_function(name).is_some() || self.functions.contains_key(*name)
            })
            .collect();
        collisions.sort();
        if let Some(name) = collisions.first() {
            return Err(CompileError::NameCollision {
                name: (*name).clone(),
            });
        }

        let tokens = tokenizer::convert_to_rpn(
            &self.expression,
            &self.functions,
            &self.operators,
            &names,
            self.implicit,
        )?;

        tracing::debug!(
            expression = %self.expression,
            tokens = tokens.len(),
            "compiled expression to RPN"
        );
        Ok(tokens)
    }
}

fn check_operator_symbol(operator: &Operator) -> Result<(), CompileError> {
    let symbol = operator.symbol();
    if symbol.is_empty() || !symbol.chars().all(tokenizer::is_allowed_operator_char) {
        return Err(CompileError::InvalidOperatorSymbol {
            symbol: symbol.to_string(),
        });
    }
    Ok(())
}
