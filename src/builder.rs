//! RPN-to-tree builder
//!
//! Consumes the token sequence produced by [`ExpressionParser`] and asks a
//! [`NodeFactory`] for one node per token. Tokens are stored reversed so the
//! last RPN token (the root) is read first; every operator therefore builds
//! its RIGHT operand before its left one.
//!
//! # Example
//! ```
//! use rpn_autodiff::TreeBuilder;
//! use rpn_autodiff::autodiff::RealFactory;
//!
//! let factory = RealFactory::<f64>::new();
//! let x = factory.var("x", 10.0);
//! let y = factory.var("y", 5.5);
//!
//! let mut builder = TreeBuilder::new("2x^2 + y", factory, vec![x.clone(), y])?;
//! let f = builder.build_tree()?;
//! assert_eq!(f.value(), 205.5);
//! assert_eq!(f.diff(&x).value(), 40.0);
//! # Ok::<(), rpn_autodiff::CompileError>(())
//! ```

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::autodiff::{DiffNode, NodeFactory, VariableLeaf};
use crate::parser::{ExpressionParser, is_reserved_constant};
use crate::tokenizer::{Function, Operator, Token};
use crate::traits::MathScalar;
use crate::CompileError;

/// Tree expansion for a custom function or operator.
/// Takes: operand nodes in source order -> the node replacing the call
pub type ExpansionFn<N> = Arc<dyn Fn(&[N]) -> N + Send + Sync>;

/// A custom function together with the subtree it expands to
pub struct CustomFunction<N> {
    pub function: Function,
    pub expand: ExpansionFn<N>,
}

/// A custom operator together with the subtree it expands to
pub struct CustomOperator<N> {
    pub operator: Operator,
    pub expand: ExpansionFn<N>,
}

impl<N> Clone for CustomFunction<N> {
    fn clone(&self) -> Self {
        CustomFunction {
            function: self.function.clone(),
            expand: Arc::clone(&self.expand),
        }
    }
}

impl<N> Clone for CustomOperator<N> {
    fn clone(&self) -> Self {
        CustomOperator {
            operator: self.operator.clone(),
            expand: Arc::clone(&self.expand),
        }
    }
}

/// Custom functions and operators the builder may expand, keyed by name/symbol
pub struct Extensions<N> {
    functions: FxHashMap<String, CustomFunction<N>>,
    operators: FxHashMap<String, CustomOperator<N>>,
}

impl<N> Extensions<N> {
    pub fn new() -> Self {
        Extensions {
            functions: FxHashMap::default(),
            operators: FxHashMap::default(),
        }
    }

    /// Register a function expansion
    ///
    /// # Example
    /// ```
    /// use rpn_autodiff::builder::Extensions;
    /// use rpn_autodiff::autodiff::Node;
    /// use rpn_autodiff::tokenizer::Function;
    ///
    /// let ext = Extensions::<Node<f64>>::new()
    ///     .function(Function::new("sq", 1), |args| args[0].clone() * args[0].clone());
    /// assert_eq!(ext.function_defs().count(), 1);
    /// ```
    pub fn function<E>(mut self, function: Function, expand: E) -> Self
    where
        E: Fn(&[N]) -> N + Send + Sync + 'static,
    {
        self.functions.insert(
            function.name().to_string(),
            CustomFunction {
                function,
                expand: Arc::new(expand),
            },
        );
        self
    }

    /// Register an operator expansion
    pub fn operator<E>(mut self, operator: Operator, expand: E) -> Self
    where
        E: Fn(&[N]) -> N + Send + Sync + 'static,
    {
        self.operators.insert(
            operator.symbol().to_string(),
            CustomOperator {
                operator,
                expand: Arc::new(expand),
            },
        );
        self
    }

    /// Token definitions of the registered functions
    pub fn function_defs(&self) -> impl Iterator<Item = &Function> {
        self.functions.values().map(|custom| &custom.function)
    }

    /// Token definitions of the registered operators
    pub fn operator_defs(&self) -> impl Iterator<Item = &Operator> {
        self.operators.values().map(|custom| &custom.operator)
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.operators.is_empty()
    }
}

impl<N> Default for Extensions<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Clone for Extensions<N> {
    fn clone(&self) -> Self {
        Extensions {
            functions: self.functions.clone(),
            operators: self.operators.clone(),
        }
    }
}

impl<N> fmt::Debug for Extensions<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extensions")
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .field("operators", &self.operators.keys().collect::<Vec<_>>())
            .finish()
    }
}

type UnaryBuilder<F> = fn(&F, <F as NodeFactory>::Node) -> <F as NodeFactory>::Node;

fn builtin_unary<F: NodeFactory>(name: &str) -> Option<UnaryBuilder<F>> {
    let build: UnaryBuilder<F> = match name {
        "acos" => F::acos,
        "asin" => F::asin,
        "atan" => F::atan,
        "log" => F::log,
        "cos" => F::cos,
        "sin" => F::sin,
        "sqrt" => F::sqrt,
        "tan" => F::tan,
        "exp" => F::exp,
        _ => return None,
    };
    Some(build)
}

/// Builds a differentiable tree from a compiled expression
pub struct TreeBuilder<F: NodeFactory> {
    factory: F,
    /// RPN tokens, last token first
    tokens: Vec<Token>,
    cursor: usize,
    variables: Vec<F::Variable>,
    extensions: Extensions<F::Node>,
    max_depth: Option<usize>,
}

impl<F: NodeFactory> TreeBuilder<F> {
    /// Compile `expression` with every variable's name declared.
    ///
    /// # Errors
    /// Any configuration or tokenization failure of [`ExpressionParser`].
    pub fn new(
        expression: &str,
        factory: F,
        variables: Vec<F::Variable>,
    ) -> Result<Self, CompileError> {
        Self::from_parser(ExpressionParser::new(expression)?, factory, variables)
    }

    /// Compile a pre-configured parser; the variables' names are added to it.
    pub fn from_parser(
        parser: ExpressionParser,
        factory: F,
        variables: Vec<F::Variable>,
    ) -> Result<Self, CompileError> {
        let parser = parser.variables(variables.iter().map(|v| v.name().to_string()));
        let rpn = parser.compile()?;
        Ok(Self::from_tokens(rpn, factory, variables))
    }

    /// Build from an already produced RPN sequence
    pub fn from_tokens(rpn: Vec<Token>, factory: F, variables: Vec<F::Variable>) -> Self {
        let mut tokens = rpn;
        tokens.reverse();
        TreeBuilder {
            factory,
            tokens,
            cursor: 0,
            variables,
            extensions: Extensions::new(),
            max_depth: None,
        }
    }

    /// Expansions used for custom functions and operators
    pub fn with_extensions(mut self, extensions: Extensions<F::Node>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Limit the nesting depth of the built tree
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Build the tree. Each call starts over from the root token.
    ///
    /// # Errors
    /// - `UnknownVariable` for a name that was not bound to a variable
    /// - `UnsupportedFunction`/`UnsupportedOperator` for names the factory
    ///   and the extensions cannot build
    /// - `UnsupportedOperation` for a power with a non-constant exponent
    /// - `LiteralConversion` when a literal does not fit the scalar type
    /// - `Tokenizer` when the token stream is malformed
    /// - `MaxDepthExceeded` when the depth limit is hit
    pub fn build_tree(&mut self) -> Result<F::Node, CompileError> {
        self.cursor = 0;
        let root = self.build_node(1)?;
        if self.cursor < self.tokens.len() {
            return Err(CompileError::tokenizer("Unexpected trailing tokens"));
        }
        Ok(root)
    }

    fn next_token(&mut self) -> Result<Token, CompileError> {
        let token = self
            .tokens
            .get(self.cursor)
            .cloned()
            .ok_or_else(|| CompileError::tokenizer("Unexpected end of expression"))?;
        self.cursor += 1;
        tracing::trace!(%token, cursor = self.cursor, "consumed token");
        Ok(token)
    }

    fn build_node(&mut self, depth: usize) -> Result<F::Node, CompileError> {
        if let Some(max) = self.max_depth
            && depth > max
        {
            return Err(CompileError::MaxDepthExceeded);
        }

        match self.next_token()? {
            Token::Number(literal) => Ok(self.factory.val(F::Scalar::from_literal(literal)?)),
            Token::Variable(name) => self.variable(&name),
            Token::Function(function) => self.function(&function, depth),
            Token::Operator(operator) => self.operator(&operator, depth),
            // Grouping is already encoded in the token order
            Token::ParenOpen | Token::ParenClose => self.build_node(depth),
            Token::Separator => Err(CompileError::tokenizer("Invalid expression")),
        }
    }

    fn variable(&self, name: &str) -> Result<F::Node, CompileError> {
        if let Some(var) = self.variables.iter().find(|v| v.name() == name) {
            return Ok(var.to_node());
        }
        if is_reserved_constant(name) {
            return Ok(self.factory.val(reserved_value::<F::Scalar>(name)));
        }
        Err(CompileError::UnknownVariable {
            name: name.to_string(),
        })
    }

    /// Custom expansions take precedence over the builtins they shadow
    fn function(&mut self, function: &Function, depth: usize) -> Result<F::Node, CompileError> {
        if let Some(custom) = self.extensions.functions.get(function.name()) {
            let expand = Arc::clone(&custom.expand);
            let args = self.operands(function.arity(), depth)?;
            return Ok(expand(&args));
        }

        let build = builtin_unary::<F>(function.name()).ok_or_else(|| {
            CompileError::UnsupportedFunction {
                name: function.name().to_string(),
            }
        })?;
        let arg = self.build_node(depth + 1)?;
        Ok(build(&self.factory, arg))
    }

    fn operator(&mut self, operator: &Operator, depth: usize) -> Result<F::Node, CompileError> {
        if let Some(custom) = self.extensions.operators.get(operator.symbol())
            && custom.operator.operands() == operator.operands()
        {
            let expand = Arc::clone(&custom.expand);
            let args = self.operands(operator.operands(), depth)?;
            return Ok(expand(&args));
        }

        match (operator.symbol(), operator.operands()) {
            ("-", 1) => {
                let arg = self.build_node(depth + 1)?;
                Ok(self.factory.neg(arg))
            }
            ("+", 1) => self.build_node(depth + 1),
            (symbol @ ("+" | "-" | "*" | "/" | "^"), 2) => {
                let right = self.build_node(depth + 1)?;
                let left = self.build_node(depth + 1)?;
                match symbol {
                    "+" => Ok(self.factory.add(left, right)),
                    "-" => Ok(self.factory.sub(left, right)),
                    "*" => Ok(self.factory.mul(left, right)),
                    "/" => Ok(self.factory.div(left, right)),
                    _ => self.power(left, right),
                }
            }
            (symbol, _) => Err(CompileError::UnsupportedOperator {
                symbol: symbol.to_string(),
            }),
        }
    }

    /// Operands are popped right to left and returned in source order
    fn operands(&mut self, count: usize, depth: usize) -> Result<Vec<F::Node>, CompileError> {
        let mut args = Vec::with_capacity(count);
        for _ in 0..count {
            args.push(self.build_node(depth + 1)?);
        }
        args.reverse();
        Ok(args)
    }

    fn power(&self, base: F::Node, exponent: F::Node) -> Result<F::Node, CompileError> {
        if !exponent.is_constant() {
            return Err(CompileError::UnsupportedOperation(
                "Pow argument was expected to be a constant".to_string(),
            ));
        }
        let exponent = self.factory.val(exponent.value());
        Ok(self.factory.pow(base, exponent))
    }
}

fn reserved_value<T: MathScalar>(name: &str) -> T {
    match name {
        "e" => T::E(),
        "φ" => T::golden_ratio(),
        _ => T::PI(),
    }
}
