//! Differentiable node runtime
//!
//! The tree builder only talks to the traits defined here: a factory that
//! constructs nodes, the nodes' own capabilities (value, constness,
//! derivative) and named variable leaves. [`RealFactory`] is the bundled
//! implementation, generic over any [`MathScalar`].
//!
//! # Example
//! ```
//! use rpn_autodiff::autodiff::{NodeFactory, RealFactory};
//!
//! let df = RealFactory::<f64>::new();
//! let x = df.var("x", 3.0);
//! let f = df.mul(x.to_node(), df.sin(x.to_node()));
//! let dfdx = f.diff(&x);
//! assert!((dfdx.value() - (3.0_f64.sin() + 3.0 * 3.0_f64.cos())).abs() < 1e-12);
//! ```

mod derivative;
mod display;
mod factory;
mod node;

pub use factory::RealFactory;
pub use node::{BinaryOp, Node, NodeKind, UnaryOp, Variable};

use crate::traits::MathScalar;
use std::fmt;

/// Capabilities of a node in a differentiable tree
pub trait DiffNode<T>: Clone + fmt::Display {
    /// Evaluate the node with the current variable values
    fn value(&self) -> T;

    /// Whether the node's value depends on no variable
    fn is_constant(&self) -> bool;

    /// Differentiate with respect to the variable named `wrt`
    fn derivative(&self, wrt: &str) -> Self;
}

/// A caller-owned leaf bound to a name
pub trait VariableLeaf {
    type Node;

    fn name(&self) -> &str;

    fn to_node(&self) -> Self::Node;
}

/// Constructors for differentiable nodes
pub trait NodeFactory {
    type Scalar: MathScalar;
    type Node: DiffNode<Self::Scalar>;
    type Variable: VariableLeaf<Node = Self::Node>;

    /// Constant node wrapping `value`
    fn val(&self, value: Self::Scalar) -> Self::Node;

    fn acos(&self, arg: Self::Node) -> Self::Node;
    fn asin(&self, arg: Self::Node) -> Self::Node;
    fn atan(&self, arg: Self::Node) -> Self::Node;
    /// Natural logarithm
    fn log(&self, arg: Self::Node) -> Self::Node;
    fn cos(&self, arg: Self::Node) -> Self::Node;
    fn sin(&self, arg: Self::Node) -> Self::Node;
    fn sqrt(&self, arg: Self::Node) -> Self::Node;
    fn tan(&self, arg: Self::Node) -> Self::Node;
    fn exp(&self, arg: Self::Node) -> Self::Node;
    fn neg(&self, arg: Self::Node) -> Self::Node;

    fn add(&self, left: Self::Node, right: Self::Node) -> Self::Node;
    fn sub(&self, left: Self::Node, right: Self::Node) -> Self::Node;
    fn mul(&self, left: Self::Node, right: Self::Node) -> Self::Node;
    fn div(&self, left: Self::Node, right: Self::Node) -> Self::Node;

    /// `base` raised to a constant `exponent` produced by [`NodeFactory::val`]
    fn pow(&self, base: Self::Node, exponent: Self::Node) -> Self::Node;
}
