// Differentiation rules for the node runtime
//
// The helpers below fold the trivial cases (0 + u, 1 * u, u^1) while the
// derivative is being produced, so differentiating sin(x^5) does not build a
// tree full of multiplications by one. Only exact zeros and ones fold. Trees
// handed in by callers are never rewritten.

use super::node::{BinaryOp, Node, NodeKind, UnaryOp};
use crate::traits::MathScalar;

fn two<T: MathScalar>() -> T {
    T::one() + T::one()
}

fn add_opt<T: MathScalar>(u: Node<T>, v: Node<T>) -> Node<T> {
    if u.is_zero_const() {
        v
    } else if v.is_zero_const() {
        u
    } else {
        Node::binary(BinaryOp::Add, u, v)
    }
}

fn sub_opt<T: MathScalar>(u: Node<T>, v: Node<T>) -> Node<T> {
    if v.is_zero_const() {
        u
    } else if u.is_zero_const() {
        neg_opt(v)
    } else {
        Node::binary(BinaryOp::Sub, u, v)
    }
}

fn mul_opt<T: MathScalar>(u: Node<T>, v: Node<T>) -> Node<T> {
    if u.is_zero_const() || v.is_zero_const() {
        Node::constant(T::zero())
    } else if u.is_one_const() {
        v
    } else if v.is_one_const() {
        u
    } else {
        Node::binary(BinaryOp::Mul, u, v)
    }
}

fn div_opt<T: MathScalar>(u: Node<T>, v: Node<T>) -> Node<T> {
    if u.is_zero_const() {
        Node::constant(T::zero())
    } else if v.is_one_const() {
        u
    } else {
        Node::binary(BinaryOp::Div, u, v)
    }
}

fn neg_opt<T: MathScalar>(u: Node<T>) -> Node<T> {
    match u.as_constant() {
        Some(n) => Node::constant(-n),
        None => Node::unary(UnaryOp::Neg, u),
    }
}

fn pow_opt<T: MathScalar>(base: Node<T>, exponent: T) -> Node<T> {
    if exponent == T::zero() {
        Node::constant(T::one())
    } else if exponent == T::one() {
        base
    } else {
        Node::pow(base, Node::constant(exponent))
    }
}

/// sqrt(1 - u^2), shared by the asin/acos rules
fn sqrt_one_minus_square<T: MathScalar>(u: &Node<T>) -> Node<T> {
    Node::unary(
        UnaryOp::Sqrt,
        Node::binary(
            BinaryOp::Sub,
            Node::constant(T::one()),
            pow_opt(u.clone(), two()),
        ),
    )
}

impl<T: MathScalar> Node<T> {
    /// Differentiate this tree with respect to the variable named `wrt`
    pub fn derivative(&self, wrt: &str) -> Node<T> {
        match self.kind() {
            // Base cases
            NodeKind::Constant(_) => Node::constant(T::zero()),

            NodeKind::Variable(v) => {
                if v.name() == wrt {
                    Node::constant(T::one())
                } else {
                    Node::constant(T::zero())
                }
            }

            NodeKind::Unary(op, u) => {
                let u_prime = u.derivative(wrt);
                if u_prime.is_zero_const() {
                    return Node::constant(T::zero());
                }
                let u = u.clone();
                match op {
                    UnaryOp::Neg => neg_opt(u_prime),
                    // d/dx sin(u) = cos(u) * u'
                    UnaryOp::Sin => mul_opt(Node::unary(UnaryOp::Cos, u), u_prime),
                    // d/dx cos(u) = -sin(u) * u'
                    UnaryOp::Cos => mul_opt(neg_opt(Node::unary(UnaryOp::Sin, u)), u_prime),
                    // d/dx tan(u) = u' / cos^2(u)
                    UnaryOp::Tan => div_opt(u_prime, pow_opt(Node::unary(UnaryOp::Cos, u), two())),
                    // d/dx asin(u) = u' / sqrt(1 - u^2)
                    UnaryOp::Asin => div_opt(u_prime, sqrt_one_minus_square(&u)),
                    // d/dx acos(u) = -u' / sqrt(1 - u^2)
                    UnaryOp::Acos => neg_opt(div_opt(u_prime, sqrt_one_minus_square(&u))),
                    // d/dx atan(u) = u' / (1 + u^2)
                    UnaryOp::Atan => div_opt(
                        u_prime,
                        Node::binary(BinaryOp::Add, Node::constant(T::one()), pow_opt(u, two())),
                    ),
                    // d/dx ln(u) = u' / u
                    UnaryOp::Log => div_opt(u_prime, u),
                    // d/dx sqrt(u) = u' / (2 sqrt(u))
                    UnaryOp::Sqrt => div_opt(
                        u_prime,
                        mul_opt(Node::constant(two()), Node::unary(UnaryOp::Sqrt, u)),
                    ),
                    // d/dx exp(u) = exp(u) * u'
                    UnaryOp::Exp => mul_opt(Node::unary(UnaryOp::Exp, u), u_prime),
                }
            }

            NodeKind::Binary(op, u, v) => {
                let u_prime = u.derivative(wrt);
                let v_prime = v.derivative(wrt);
                match op {
                    // Sum rule: (u + v)' = u' + v'
                    BinaryOp::Add => add_opt(u_prime, v_prime),
                    // (u - v)' = u' - v'
                    BinaryOp::Sub => sub_opt(u_prime, v_prime),
                    // Product rule: (u * v)' = u' * v + u * v'
                    BinaryOp::Mul => add_opt(
                        mul_opt(u_prime, v.clone()),
                        mul_opt(u.clone(), v_prime),
                    ),
                    // Quotient rule: (u / v)' = (u' * v - u * v') / v^2
                    BinaryOp::Div => div_opt(
                        sub_opt(mul_opt(u_prime, v.clone()), mul_opt(u.clone(), v_prime)),
                        pow_opt(v.clone(), two()),
                    ),
                }
            }

            // Power rule with constant exponent: (u^n)' = n * u^(n-1) * u'
            NodeKind::Pow(u, exponent) => {
                let u_prime = u.derivative(wrt);
                if u_prime.is_zero_const() {
                    return Node::constant(T::zero());
                }
                let n = exponent.value();
                mul_opt(
                    mul_opt(Node::constant(n), pow_opt(u.clone(), n - T::one())),
                    u_prime,
                )
            }
        }
    }
}
