// Display formatting for differentiable trees
use super::node::{BinaryOp, Node, NodeKind};
use crate::traits::MathScalar;
use std::fmt;

/// Binding strength used to decide where parentheses are required
fn precedence<T: MathScalar>(node: &Node<T>) -> u8 {
    match node.kind() {
        NodeKind::Binary(BinaryOp::Add | BinaryOp::Sub, _, _) => 1,
        NodeKind::Binary(BinaryOp::Mul | BinaryOp::Div, _, _) => 2,
        NodeKind::Unary(super::UnaryOp::Neg, _) => 3,
        NodeKind::Pow(_, _) => 4,
        NodeKind::Constant(n) if *n < T::zero() => 3,
        NodeKind::Constant(_) | NodeKind::Variable(_) | NodeKind::Unary(_, _) => 5,
    }
}

fn write_operand<T: MathScalar>(
    f: &mut fmt::Formatter<'_>,
    node: &Node<T>,
    needs_parens: bool,
) -> fmt::Result {
    if needs_parens {
        write!(f, "({})", node)
    } else {
        write!(f, "{}", node)
    }
}

fn write_number<T: MathScalar>(f: &mut fmt::Formatter<'_>, n: T) -> fmt::Result {
    if n.is_nan() {
        write!(f, "NaN")
    } else if n.is_infinite() {
        if n > T::zero() {
            write!(f, "Infinity")
        } else {
            write!(f, "-Infinity")
        }
    } else if let Some(v) = n.to_f64()
        && v.fract() == 0.0
        && v.abs() < 1e10
    {
        // Display as integer if no fractional part
        write!(f, "{}", v as i64)
    } else {
        write!(f, "{}", n)
    }
}

impl<T: MathScalar> fmt::Display for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let own = precedence(self);
        match self.kind() {
            NodeKind::Constant(n) => write_number(f, *n),

            NodeKind::Variable(v) => write!(f, "{}", v.name()),

            NodeKind::Unary(super::UnaryOp::Neg, arg) => {
                write!(f, "-")?;
                write_operand(f, arg, precedence(arg) <= own)
            }

            NodeKind::Unary(op, arg) => write!(f, "{}({})", op.name(), arg),

            NodeKind::Binary(op, l, r) => {
                write_operand(f, l, precedence(l) < own)?;
                write!(f, " {} ", op.symbol())?;
                // Right operand of - and / keeps its grouping: a - (b + c)
                let strict = matches!(op, BinaryOp::Sub | BinaryOp::Div);
                let rp = precedence(r);
                write_operand(f, r, rp < own || (strict && rp == own))
            }

            NodeKind::Pow(base, exponent) => {
                write_operand(f, base, precedence(base) <= own)?;
                write!(f, "^")?;
                write_operand(f, exponent, precedence(exponent) < own)
            }
        }
    }
}
