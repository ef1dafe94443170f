//! Top-level entry point wiring configuration, tokenization and tree building
//!
//! # Example
//! ```
//! use rpn_autodiff::Compiler;
//! use rpn_autodiff::autodiff::{Node, RealFactory};
//! use rpn_autodiff::tokenizer::Function;
//!
//! let factory = RealFactory::<f64>::new();
//! let x = factory.var("x", 3.0);
//!
//! let compiler = Compiler::new(factory)
//!     .variable(x.clone())
//!     .function(Function::new("sq", 1), |args: &[Node<f64>]| {
//!         args[0].clone() * args[0].clone()
//!     });
//!
//! let f = compiler.compile("sq(x) + 1")?;
//! assert_eq!(f.value(), 10.0);
//! assert_eq!(f.diff(&x).value(), 6.0);
//! # Ok::<(), rpn_autodiff::CompileError>(())
//! ```

use crate::autodiff::{Node, NodeFactory, RealFactory, Variable, VariableLeaf};
use crate::builder::{Extensions, TreeBuilder};
use crate::parser::ExpressionParser;
use crate::tokenizer::{Function, Operator};
use crate::traits::MathScalar;
use crate::{CompileError, DEFAULT_IMPLICIT_MULTIPLICATION};

/// Builder for compiling expressions into differentiable trees
pub struct Compiler<F: NodeFactory> {
    factory: F,
    variables: Vec<F::Variable>,
    extensions: Extensions<F::Node>,
    implicit_multiplication: bool,
    max_depth: Option<usize>,
}

impl<F> Compiler<F>
where
    F: NodeFactory + Clone,
    F::Variable: Clone,
{
    /// Create a compiler with default settings
    pub fn new(factory: F) -> Self {
        Compiler {
            factory,
            variables: Vec::new(),
            extensions: Extensions::new(),
            implicit_multiplication: DEFAULT_IMPLICIT_MULTIPLICATION,
            max_depth: None,
        }
    }

    /// Bind a variable the expressions may reference
    pub fn variable(mut self, variable: F::Variable) -> Self {
        self.variables.push(variable);
        self
    }

    /// Bind multiple variables
    pub fn variables<I>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = F::Variable>,
    {
        self.variables.extend(variables);
        self
    }

    /// Add a custom function and the subtree a call expands to.
    /// The expansion receives the arguments in source order.
    pub fn function<E>(mut self, function: Function, expand: E) -> Self
    where
        E: Fn(&[F::Node]) -> F::Node + Send + Sync + 'static,
    {
        self.extensions = self.extensions.function(function, expand);
        self
    }

    /// Add a custom operator and the subtree it expands to.
    /// The symbol is validated when an expression is compiled.
    pub fn operator<E>(mut self, operator: Operator, expand: E) -> Self
    where
        E: Fn(&[F::Node]) -> F::Node + Send + Sync + 'static,
    {
        self.extensions = self.extensions.operator(operator, expand);
        self
    }

    /// Enable or disable implicit multiplication (`2x` meaning `2 * x`)
    pub fn implicit_multiplication(mut self, enabled: bool) -> Self {
        self.implicit_multiplication = enabled;
        self
    }

    /// Set maximum nesting depth of compiled trees
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn bound_variables(&self) -> &[F::Variable] {
        &self.variables
    }

    /// Compile `expression` into a differentiable tree.
    ///
    /// # Errors
    /// Any [`CompileError`]; [`CompileError::stage`] tells which stage failed.
    pub fn compile(&self, expression: &str) -> Result<F::Node, CompileError> {
        let parser = ExpressionParser::new(expression)?
            .implicit_multiplication(self.implicit_multiplication)
            .functions(self.extensions.function_defs().cloned())
            .operators(self.extensions.operator_defs().cloned())?;

        let mut builder =
            TreeBuilder::from_parser(parser, self.factory.clone(), self.variables.clone())?
                .with_extensions(self.extensions.clone());
        if let Some(depth) = self.max_depth {
            builder = builder.max_depth(depth);
        }

        let tree = builder.build_tree()?;
        tracing::debug!(
            expression,
            variables = self.variables.len(),
            tree = %tree,
            "built differentiable tree"
        );
        Ok(tree)
    }
}

impl<F> Clone for Compiler<F>
where
    F: NodeFactory + Clone,
    F::Variable: Clone,
{
    fn clone(&self) -> Self {
        Compiler {
            factory: self.factory.clone(),
            variables: self.variables.clone(),
            extensions: self.extensions.clone(),
            implicit_multiplication: self.implicit_multiplication,
            max_depth: self.max_depth,
        }
    }
}

impl<F> std::fmt::Debug for Compiler<F>
where
    F: NodeFactory + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compiler")
            .field("factory", &self.factory)
            .field(
                "variables",
                &self.variables.iter().map(|v| v.name()).collect::<Vec<_>>(),
            )
            .field("extensions", &self.extensions)
            .field("implicit_multiplication", &self.implicit_multiplication)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

/// Compile `expression` over `variables` with the default settings
///
/// # Example
/// ```
/// use rpn_autodiff::{autodiff::Variable, compile};
///
/// let a = Variable::new("a", 10.0);
/// let b = Variable::new("b", 3.0);
/// let f = compile("a - b", &[a, b])?;
/// assert_eq!(f.value(), 7.0);
/// # Ok::<(), rpn_autodiff::CompileError>(())
/// ```
pub fn compile<T: MathScalar>(
    expression: &str,
    variables: &[Variable<T>],
) -> Result<Node<T>, CompileError> {
    Compiler::new(RealFactory::new())
        .variables(variables.iter().cloned())
        .compile(expression)
}
