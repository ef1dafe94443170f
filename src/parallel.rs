//! Parallel batch compilation using Rayon
//!
//! Every expression gets its own tree builder, so compilations share nothing
//! but the compiler configuration and the bound variables.
//!
//! Enable with the `parallel` feature:
//! ```toml
//! rpn_autodiff = { version = "0.1", features = ["parallel"] }
//! ```

use rayon::prelude::*;

use crate::autodiff::NodeFactory;
use crate::{CompileError, Compiler};

/// Compile many expressions with the same configuration.
///
/// Results are returned in input order; one failing expression does not
/// affect the others.
///
/// # Example
/// ```
/// use rpn_autodiff::Compiler;
/// use rpn_autodiff::autodiff::{RealFactory, Variable};
/// use rpn_autodiff::parallel::compile_batch;
///
/// let x = Variable::new("x", 2.0);
/// let compiler = Compiler::new(RealFactory::new()).variable(x);
/// let trees = compile_batch(&compiler, &["x^2", "sin(x)", "x +"]);
/// assert_eq!(trees[0].as_ref().map(|t| t.value()), Ok(4.0));
/// assert!(trees[2].is_err());
/// ```
pub fn compile_batch<F>(
    compiler: &Compiler<F>,
    expressions: &[&str],
) -> Vec<Result<F::Node, CompileError>>
where
    F: NodeFactory + Clone + Sync,
    F::Variable: Clone + Sync,
    F::Node: Send,
{
    expressions
        .par_iter()
        .map(|expression| compiler.compile(expression))
        .collect()
}
