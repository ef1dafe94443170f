//! Multi-variable differentiation helpers
//!
//! Gradient and hessian computation over compiled trees, plus a one-shot
//! string evaluator.

use crate::autodiff::{Node, Variable};
use crate::traits::MathScalar;
use crate::{CompileError, compile};

/// Compute the gradient of a tree with respect to multiple variables
/// Returns a vector of partial derivatives [∂f/∂x₁, ∂f/∂x₂, ...]
///
/// # Example
/// ```
/// use rpn_autodiff::{autodiff::Variable, compile, gradient};
///
/// let x = Variable::new("x", 10.0);
/// let y = Variable::new("y", 5.5);
/// let f = compile("2x^2 + y", &[x.clone(), y.clone()])?;
/// let grad = gradient(&f, &[x, y]);
/// assert_eq!(grad[0].value(), 40.0);
/// assert_eq!(grad[1].value(), 1.0);
/// # Ok::<(), rpn_autodiff::CompileError>(())
/// ```
pub fn gradient<T: MathScalar>(node: &Node<T>, variables: &[Variable<T>]) -> Vec<Node<T>> {
    variables.iter().map(|var| node.diff(var)).collect()
}

/// Compute the hessian matrix of a tree
/// Returns a 2D vector where `hessian[i][j]` = ∂²f/∂xᵢ∂xⱼ
pub fn hessian<T: MathScalar>(node: &Node<T>, variables: &[Variable<T>]) -> Vec<Vec<Node<T>>> {
    gradient(node, variables)
        .iter()
        .map(|partial| gradient(partial, variables))
        .collect()
}

/// Compile and evaluate `expression` once with the given name/value bindings
///
/// # Example
/// ```
/// use rpn_autodiff::evaluate_str;
///
/// let value = evaluate_str("x * y + 1", &[("x", 2.0), ("y", 3.0)])?;
/// assert_eq!(value, 7.0);
/// # Ok::<(), rpn_autodiff::CompileError>(())
/// ```
pub fn evaluate_str(expression: &str, bindings: &[(&str, f64)]) -> Result<f64, CompileError> {
    let variables: Vec<Variable<f64>> = bindings
        .iter()
        .map(|(name, value)| Variable::new(name, *value))
        .collect();
    Ok(compile(expression, &variables)?.value())
}
