use std::fmt;
use std::marker::PhantomData;

use super::node::{BinaryOp, Node, UnaryOp, Variable};
use super::{DiffNode, NodeFactory, VariableLeaf};
use crate::traits::MathScalar;

/// Factory producing [`Node`] trees over the scalar type `T`
pub struct RealFactory<T: MathScalar> {
    _scalar: PhantomData<fn() -> T>,
}

impl<T: MathScalar> RealFactory<T> {
    pub fn new() -> Self {
        RealFactory {
            _scalar: PhantomData,
        }
    }

    /// Create a variable bound to `name` with an initial value
    pub fn var(&self, name: impl AsRef<str>, value: T) -> Variable<T> {
        Variable::new(name, value)
    }
}

impl<T: MathScalar> Default for RealFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: MathScalar> Clone for RealFactory<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: MathScalar> Copy for RealFactory<T> {}

impl<T: MathScalar> fmt::Debug for RealFactory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RealFactory<{}>", std::any::type_name::<T>())
    }
}

impl<T: MathScalar> DiffNode<T> for Node<T> {
    fn value(&self) -> T {
        Node::value(self)
    }

    fn is_constant(&self) -> bool {
        Node::is_constant(self)
    }

    fn derivative(&self, wrt: &str) -> Self {
        Node::derivative(self, wrt)
    }
}

impl<T: MathScalar> VariableLeaf for Variable<T> {
    type Node = Node<T>;

    fn name(&self) -> &str {
        Variable::name(self)
    }

    fn to_node(&self) -> Node<T> {
        Variable::to_node(self)
    }
}

impl<T: MathScalar> NodeFactory for RealFactory<T> {
    type Scalar = T;
    type Node = Node<T>;
    type Variable = Variable<T>;

    fn val(&self, value: T) -> Node<T> {
        Node::constant(value)
    }

    fn acos(&self, arg: Node<T>) -> Node<T> {
        Node::unary(UnaryOp::Acos, arg)
    }

    fn asin(&self, arg: Node<T>) -> Node<T> {
        Node::unary(UnaryOp::Asin, arg)
    }

    fn atan(&self, arg: Node<T>) -> Node<T> {
        Node::unary(UnaryOp::Atan, arg)
    }

    fn log(&self, arg: Node<T>) -> Node<T> {
        Node::unary(UnaryOp::Log, arg)
    }

    fn cos(&self, arg: Node<T>) -> Node<T> {
        Node::unary(UnaryOp::Cos, arg)
    }

    fn sin(&self, arg: Node<T>) -> Node<T> {
        Node::unary(UnaryOp::Sin, arg)
    }

    fn sqrt(&self, arg: Node<T>) -> Node<T> {
        Node::unary(UnaryOp::Sqrt, arg)
    }

    fn tan(&self, arg: Node<T>) -> Node<T> {
        Node::unary(UnaryOp::Tan, arg)
    }

    fn exp(&self, arg: Node<T>) -> Node<T> {
        Node::unary(UnaryOp::Exp, arg)
    }

    fn neg(&self, arg: Node<T>) -> Node<T> {
        Node::unary(UnaryOp::Neg, arg)
    }

    fn add(&self, left: Node<T>, right: Node<T>) -> Node<T> {
        Node::binary(BinaryOp::Add, left, right)
    }

    fn sub(&self, left: Node<T>, right: Node<T>) -> Node<T> {
        Node::binary(BinaryOp::Sub, left, right)
    }

    fn mul(&self, left: Node<T>, right: Node<T>) -> Node<T> {
        Node::binary(BinaryOp::Mul, left, right)
    }

    fn div(&self, left: Node<T>, right: Node<T>) -> Node<T> {
        Node::binary(BinaryOp::Div, left, right)
    }

    fn pow(&self, base: Node<T>, exponent: Node<T>) -> Node<T> {
        Node::pow(base, exponent)
    }
}
