//! Differentiable expression tree nodes

use std::fmt;
use std::ops::{Add, Deref, Div, Mul, Neg, Sub};
use std::sync::{Arc, RwLock};

use crate::traits::MathScalar;

/// A named leaf whose current value can be changed between evaluations.
///
/// Clones share the same value cell, so setting the value through any clone
/// is visible to every tree the variable was compiled into.
#[derive(Clone)]
pub struct Variable<T: MathScalar> {
    name: Arc<str>,
    value: Arc<RwLock<T>>,
}

impl<T: MathScalar> Variable<T> {
    pub fn new(name: impl AsRef<str>, value: T) -> Self {
        Variable {
            name: Arc::from(name.as_ref()),
            value: Arc::new(RwLock::new(value)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current value of the variable
    pub fn get(&self) -> T {
        match self.value.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Replace the current value of the variable
    pub fn set(&self, value: T) {
        match self.value.write() {
            Ok(mut guard) => *guard = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
    }

    /// Wrap this variable into a tree leaf
    pub fn to_node(&self) -> Node<T> {
        Node::new(NodeKind::Variable(self.clone()))
    }
}

impl<T: MathScalar> fmt::Debug for Variable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variable")
            .field("name", &self.name)
            .field("value", &self.get())
            .finish()
    }
}

/// Single-argument operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Acos,
    Asin,
    Atan,
    /// Natural logarithm
    Log,
    Cos,
    Sin,
    Sqrt,
    Tan,
    Exp,
}

impl UnaryOp {
    /// Name used when rendering the node
    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Acos => "acos",
            UnaryOp::Asin => "asin",
            UnaryOp::Atan => "atan",
            UnaryOp::Log => "log",
            UnaryOp::Cos => "cos",
            UnaryOp::Sin => "sin",
            UnaryOp::Sqrt => "sqrt",
            UnaryOp::Tan => "tan",
            UnaryOp::Exp => "exp",
        }
    }

    pub(crate) fn apply<T: MathScalar>(self, x: T) -> T {
        match self {
            UnaryOp::Neg => -x,
            UnaryOp::Acos => x.acos(),
            UnaryOp::Asin => x.asin(),
            UnaryOp::Atan => x.atan(),
            UnaryOp::Log => x.ln(),
            UnaryOp::Cos => x.cos(),
            UnaryOp::Sin => x.sin(),
            UnaryOp::Sqrt => x.sqrt(),
            UnaryOp::Tan => x.tan(),
            UnaryOp::Exp => x.exp(),
        }
    }
}

/// Two-argument arithmetic operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }

    pub(crate) fn apply<T: MathScalar>(self, a: T, b: T) -> T {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => a / b,
        }
    }
}

#[derive(Debug)]
pub enum NodeKind<T: MathScalar> {
    /// Constant number (e.g., 3.14, 1e10)
    Constant(T),

    /// Reference to a caller-owned variable
    Variable(Variable<T>),

    /// Function application or negation
    Unary(UnaryOp, Node<T>),

    /// Addition, subtraction, multiplication or division
    Binary(BinaryOp, Node<T>, Node<T>),

    /// Exponentiation with a constant-valued exponent
    Pow(Node<T>, Node<T>),
}

/// A node of a differentiable expression tree.
///
/// Nodes are immutable and cheap to clone; subtrees are shared.
#[derive(Debug, Clone)]
pub struct Node<T: MathScalar> {
    kind: Arc<NodeKind<T>>,
}

impl<T: MathScalar> Deref for Node<T> {
    type Target = NodeKind<T>;

    fn deref(&self) -> &Self::Target {
        &self.kind
    }
}

impl<T: MathScalar> Node<T> {
    pub fn new(kind: NodeKind<T>) -> Self {
        Node {
            kind: Arc::new(kind),
        }
    }

    pub fn kind(&self) -> &NodeKind<T> {
        &self.kind
    }

    // Convenience constructors

    /// Create a constant node
    pub fn constant(value: T) -> Self {
        Node::new(NodeKind::Constant(value))
    }

    /// Create a function application node
    pub fn unary(op: UnaryOp, arg: Node<T>) -> Self {
        Node::new(NodeKind::Unary(op, arg))
    }

    /// Create a binary arithmetic node
    pub fn binary(op: BinaryOp, left: Node<T>, right: Node<T>) -> Self {
        Node::new(NodeKind::Binary(op, left, right))
    }

    /// Create a power node. The exponent is expected to be constant-valued.
    pub fn pow(base: Node<T>, exponent: Node<T>) -> Self {
        Node::new(NodeKind::Pow(base, exponent))
    }

    /// Raise this node to a constant power
    pub fn powf(self, exponent: T) -> Self {
        Node::pow(self, Node::constant(exponent))
    }

    // Accessor methods

    /// Return the value if this node is a literal constant
    pub fn as_constant(&self) -> Option<T> {
        match self.kind() {
            NodeKind::Constant(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn is_zero_const(&self) -> bool {
        self.as_constant() == Some(T::zero())
    }

    #[inline]
    pub(crate) fn is_one_const(&self) -> bool {
        self.as_constant() == Some(T::one())
    }

    /// Evaluate the tree with the variables' current values
    pub fn value(&self) -> T {
        match self.kind() {
            NodeKind::Constant(n) => *n,
            NodeKind::Variable(v) => v.get(),
            NodeKind::Unary(op, arg) => op.apply(arg.value()),
            NodeKind::Binary(op, l, r) => op.apply(l.value(), r.value()),
            // 0^0 evaluates to 1 following IEEE 754 powf behavior
            NodeKind::Pow(base, exponent) => base.value().powf(exponent.value()),
        }
    }

    /// Whether the value of this node depends on no variable
    pub fn is_constant(&self) -> bool {
        match self.kind() {
            NodeKind::Constant(_) => true,
            NodeKind::Variable(_) => false,
            NodeKind::Unary(_, arg) => arg.is_constant(),
            NodeKind::Binary(_, l, r) | NodeKind::Pow(l, r) => l.is_constant() && r.is_constant(),
        }
    }

    /// Differentiate with respect to a declared variable
    pub fn diff(&self, var: &Variable<T>) -> Node<T> {
        self.derivative(var.name())
    }

    // Analysis methods

    /// Count the total number of nodes in the tree
    pub fn node_count(&self) -> usize {
        match self.kind() {
            NodeKind::Constant(_) | NodeKind::Variable(_) => 1,
            NodeKind::Unary(_, arg) => 1 + arg.node_count(),
            NodeKind::Binary(_, l, r) | NodeKind::Pow(l, r) => 1 + l.node_count() + r.node_count(),
        }
    }

    /// Get the maximum nesting depth of the tree
    pub fn max_depth(&self) -> usize {
        match self.kind() {
            NodeKind::Constant(_) | NodeKind::Variable(_) => 1,
            NodeKind::Unary(_, arg) => 1 + arg.max_depth(),
            NodeKind::Binary(_, l, r) | NodeKind::Pow(l, r) => 1 + l.max_depth().max(r.max_depth()),
        }
    }

    /// Check if the tree references a specific variable
    pub fn contains_var(&self, name: &str) -> bool {
        match self.kind() {
            NodeKind::Constant(_) => false,
            NodeKind::Variable(v) => v.name() == name,
            NodeKind::Unary(_, arg) => arg.contains_var(name),
            NodeKind::Binary(_, l, r) | NodeKind::Pow(l, r) => {
                l.contains_var(name) || r.contains_var(name)
            }
        }
    }
}

impl<T: MathScalar> From<&Variable<T>> for Node<T> {
    fn from(var: &Variable<T>) -> Self {
        var.to_node()
    }
}

// Operator overloading for building trees by hand

impl<T: MathScalar> Add for Node<T> {
    type Output = Node<T>;
    fn add(self, rhs: Node<T>) -> Node<T> {
        Node::binary(BinaryOp::Add, self, rhs)
    }
}

impl<T: MathScalar> Sub for Node<T> {
    type Output = Node<T>;
    fn sub(self, rhs: Node<T>) -> Node<T> {
        Node::binary(BinaryOp::Sub, self, rhs)
    }
}

impl<T: MathScalar> Mul for Node<T> {
    type Output = Node<T>;
    fn mul(self, rhs: Node<T>) -> Node<T> {
        Node::binary(BinaryOp::Mul, self, rhs)
    }
}

impl<T: MathScalar> Div for Node<T> {
    type Output = Node<T>;
    fn div(self, rhs: Node<T>) -> Node<T> {
        Node::binary(BinaryOp::Div, self, rhs)
    }
}

impl<T: MathScalar> Neg for Node<T> {
    type Output = Node<T>;
    fn neg(self) -> Node<T> {
        Node::unary(UnaryOp::Neg, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value() {
        let x = Variable::new("x", 3.0);
        let expr = Node::constant(2.0) * x.to_node().powf(2.0) + Node::constant(1.0);
        assert_eq!(expr.value(), 19.0);

        x.set(-1.0);
        assert_eq!(expr.value(), 3.0);
    }

    #[test]
    fn test_is_constant() {
        let x = Variable::new("x", 1.0);
        assert!(Node::constant(2.0).is_constant());
        assert!(!x.to_node().is_constant());
        assert!((Node::constant(2.0) + Node::constant(3.0)).is_constant());
        assert!(!(Node::constant(2.0) * x.to_node()).is_constant());
        assert!(Node::unary(UnaryOp::Sin, Node::constant(1.0)).is_constant());
    }

    #[test]
    fn test_variable_clones_share_value() {
        let x = Variable::new("x", 1.0);
        let node = x.to_node();
        let alias = x.clone();
        alias.set(4.0);
        assert_eq!(node.value(), 4.0);
        assert_eq!(x.get(), 4.0);
    }

    #[test]
    fn test_node_count_and_depth() {
        let x = Variable::new("x", 0.0);
        assert_eq!(x.to_node().node_count(), 1);
        assert_eq!(x.to_node().max_depth(), 1);

        let expr = Node::unary(UnaryOp::Sin, x.to_node() + Node::constant(1.0));
        assert_eq!(expr.node_count(), 4);
        assert_eq!(expr.max_depth(), 3);
    }

    #[test]
    fn test_contains_var() {
        let x = Variable::new("x", 0.0);
        let y = Variable::new("y", 0.0);
        let expr = x.to_node() * y.to_node() + Node::constant(1.0);
        assert!(expr.contains_var("x"));
        assert!(expr.contains_var("y"));
        assert!(!expr.contains_var("z"));
    }

    #[test]
    fn test_unary_ops() {
        let half = Node::constant(0.5_f64);
        let cases = [
            (UnaryOp::Neg, -0.5),
            (UnaryOp::Acos, 0.5_f64.acos()),
            (UnaryOp::Asin, 0.5_f64.asin()),
            (UnaryOp::Atan, 0.5_f64.atan()),
            (UnaryOp::Log, 0.5_f64.ln()),
            (UnaryOp::Cos, 0.5_f64.cos()),
            (UnaryOp::Sin, 0.5_f64.sin()),
            (UnaryOp::Sqrt, 0.5_f64.sqrt()),
            (UnaryOp::Tan, 0.5_f64.tan()),
            (UnaryOp::Exp, 0.5_f64.exp()),
        ];
        for (op, expected) in cases {
            let value = Node::unary(op, half.clone()).value();
            assert!((value - expected).abs() < 1e-12, "{}", op.name());
        }
    }
}
