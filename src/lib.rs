//! Expression compiler producing differentiable trees
//!
//! Turns a formula such as `"2x^2 + y"` into a tree of nodes that can be
//! evaluated with the current values of its variables and differentiated
//! symbolically with respect to any of them.
//!
//! Compilation happens in two stages:
//! 1. [`ExpressionParser`] declares the names an expression may use and
//!    converts it to reverse polish notation (see [`tokenizer`]).
//! 2. [`TreeBuilder`] walks the RPN tokens and asks a
//!    [`NodeFactory`](autodiff::NodeFactory) for the nodes.
//!
//! [`Compiler`] wires both stages together.
//!
//! # Features
//! - Implicit multiplication (`2x`, `3(x + 1)`)
//! - Built-in `acos asin atan log cos sin sqrt tan exp`
//! - Reserved constants `pi`, `π`, `e`, `φ`
//! - Custom functions and operators expanding to subtrees
//! - **Generic scalars** through [`MathScalar`](traits::MathScalar)
//!
//! # Usage
//! ```
//! use rpn_autodiff::{autodiff::Variable, compile};
//!
//! let x = Variable::new("x", 10.0);
//! let y = Variable::new("y", 5.5);
//! let f = compile("2x^2 + y", &[x.clone(), y.clone()])?;
//!
//! assert_eq!(f.value(), 205.5);
//! assert_eq!(f.diff(&x).value(), 40.0);
//! assert_eq!(f.diff(&y).value(), 1.0);
//!
//! x.set(1.0);
//! assert_eq!(f.value(), 7.5);
//! # Ok::<(), rpn_autodiff::CompileError>(())
//! ```

pub mod autodiff;
pub mod builder;
mod compiler;
mod error;
mod helpers;
pub mod parser;
pub mod tokenizer;
pub mod traits;

#[cfg(feature = "parallel")]
pub mod parallel;


// Re-export key types for easier usage
pub use builder::{Extensions, TreeBuilder};
pub use compiler::{Compiler, compile};
pub use error::{CompileError, Span, Stage, SyntaxError};
pub use helpers::{evaluate_str, gradient, hessian};
pub use parser::ExpressionParser;

/// Whether adjacent operands multiply unless configured otherwise
pub const DEFAULT_IMPLICIT_MULTIPLICATION: bool = true;
