//! Arithmetic operators shared by the operation generators

use std::fmt;
use std::str::FromStr;

/// One of the four basic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    /// ASCII symbol used in the wire format
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
        }
    }

    /// Typeset glyph for drawings
    pub fn glyph(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "\u{2212}",
            Operator::Mul => "\u{00d7}",
            Operator::Div => "\u{00f7}",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operator::Add => "sum",
            Operator::Sub => "subtraction",
            Operator::Mul => "multiplication",
            Operator::Div => "division",
        }
    }

    /// `a op b`, or `None` on overflow, a negative difference or an inexact
    /// division
    pub fn apply(self, a: i64, b: i64) -> Option<i64> {
        match self {
            Operator::Add => a.checked_add(b),
            Operator::Sub => a.checked_sub(b).filter(|r| *r >= 0),
            Operator::Mul => a.checked_mul(b),
            Operator::Div => {
                if b == 0 || a % b != 0 {
                    None
                } else {
                    Some(a / b)
                }
            }
        }
    }

    /// Left fold of `apply` over all operands
    pub fn fold(self, operands: &[i64]) -> Option<i64> {
        let (first, rest) = operands.split_first()?;
        rest.iter().try_fold(*first, |acc, &x| self.apply(acc, x))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" => Ok(Operator::Add),
            "-" | "\u{2212}" => Ok(Operator::Sub),
            "*" | "x" | "X" | "\u{00d7}" => Ok(Operator::Mul),
            "/" | ":" | "\u{00f7}" => Ok(Operator::Div),
            _ => Err(()),
        }
    }
}
