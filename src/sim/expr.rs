//! Expression evaluation
//!
//! Strictly left to right: `a op1 b op2 c` is `(a op1 b) op2 c` whatever the
//! operators are.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{QuizError, StoreError};

/// Arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub const ALL: [Operator; 4] = [Operator::Add, Operator::Sub, Operator::Mul, Operator::Div];

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
        }
    }

    /// Apply to `(lhs, rhs)`. Division truncates toward zero.
    pub fn apply(self, lhs: i64, rhs: i64) -> Result<i64, QuizError> {
        let result = match self {
            Operator::Add => lhs.checked_add(rhs),
            Operator::Sub => lhs.checked_sub(rhs),
            Operator::Mul => lhs.checked_mul(rhs),
            Operator::Div => lhs.checked_div(rhs),
        };
        result.ok_or(QuizError::InvalidOperand {
            lhs,
            op: self.symbol(),
            rhs,
        })
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Operator {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Sub),
            "*" => Ok(Operator::Mul),
            "/" => Ok(Operator::Div),
            other => Err(StoreError::UnknownOperator(other.to_string())),
        }
    }
}

/// Evaluate `a op1 b`, then `(result) op2 c` when a tail is given.
pub fn evaluate(
    a: i64,
    op1: Operator,
    b: i64,
    tail: Option<(Operator, i64)>,
) -> Result<i64, QuizError> {
    let head = op1.apply(a, b)?;
    match tail {
        Some((op2, c)) => op2.apply(head, c),
        None => Ok(head),
    }
}
