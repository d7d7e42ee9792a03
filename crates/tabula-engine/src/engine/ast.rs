//! Arithmetic expression tree.
//!
//! Produced by the parser, walked by [`Formula`](super::Formula) for evaluation,
//! reference collection and canonical printing.

use std::fmt;

use super::format::format_number;
use super::position::Position;
use super::value::FormulaError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 1,
            BinaryOp::Mul | BinaryOp::Div => 2,
        }
    }

    fn apply(self, lhs: f64, rhs: f64) -> Result<f64, FormulaError> {
        let result = match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => {
                if rhs == 0.0 {
                    return Err(FormulaError::Div0);
                }
                lhs / rhs
            }
        };
        if result.is_finite() {
            Ok(result)
        } else {
            Err(FormulaError::Div0)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

impl UnaryOp {
    fn symbol(self) -> char {
        match self {
            UnaryOp::Plus => '+',
            UnaryOp::Minus => '-',
        }
    }
}

const UNARY_PRECEDENCE: u8 = 3;
const ATOM_PRECEDENCE: u8 = 4;

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    /// A cell reference. May hold an invalid position (e.g. `XFE1`), which
    /// evaluates to `#REF!`.
    Cell(Position),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    fn precedence(&self) -> u8 {
        match self {
            Expr::Number(_) | Expr::Cell(_) => ATOM_PRECEDENCE,
            Expr::Unary { .. } => UNARY_PRECEDENCE,
            Expr::Binary { op, .. } => op.precedence(),
        }
    }

    /// Evaluate the tree, resolving references through `lookup`.
    ///
    /// The first error encountered short-circuits the walk.
    pub fn eval(
        &self,
        lookup: &dyn Fn(Position) -> Result<f64, FormulaError>,
    ) -> Result<f64, FormulaError> {
        match self {
            Expr::Number(n) => Ok(*n),
            Expr::Cell(pos) => {
                if !pos.is_valid() {
                    return Err(FormulaError::Ref);
                }
                lookup(*pos)
            }
            Expr::Unary { op, operand } => {
                let n = operand.eval(lookup)?;
                Ok(match op {
                    UnaryOp::Plus => n,
                    UnaryOp::Minus => -n,
                })
            }
            Expr::Binary { op, left, right } => {
                let lhs = left.eval(lookup)?;
                let rhs = right.eval(lookup)?;
                op.apply(lhs, rhs)
            }
        }
    }

    /// Push every cell reference in the tree onto `out`, in source order.
    pub fn collect_cells(&self, out: &mut Vec<Position>) {
        match self {
            Expr::Number(_) => {}
            Expr::Cell(pos) => out.push(*pos),
            Expr::Unary { operand, .. } => operand.collect_cells(out),
            Expr::Binary { left, right, .. } => {
                left.collect_cells(out);
                right.collect_cells(out);
            }
        }
    }
}

fn write_child(f: &mut fmt::Formatter<'_>, child: &Expr, parens: bool) -> fmt::Result {
    if parens {
        write!(f, "({})", child)
    } else {
        write!(f, "{}", child)
    }
}

/// Prints the expression with only the parentheses the tree shape requires.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => f.write_str(&format_number(*n)),
            Expr::Cell(pos) => write!(f, "{}", pos),
            Expr::Unary { op, operand } => {
                write!(f, "{}", op.symbol())?;
                write_child(f, operand, operand.precedence() < UNARY_PRECEDENCE)
            }
            Expr::Binary { op, left, right } => {
                let prec = op.precedence();
                write_child(f, left, left.precedence() < prec)?;
                write!(f, "{}", op.symbol())?;
                // Operators are left-associative, so an equal-precedence right
                // operand only keeps its grouping with explicit parens.
                write_child(f, right, right.precedence() <= prec)
            }
        }
    }
}
