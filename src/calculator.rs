//! Two-operand calculator
//!
//! Operands arrive as text and are validated before evaluation.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("both operands are required")]
    EmptyField,
    #[error("not a number: {0:?}")]
    InvalidNumber(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("unknown operation: {0:?}")]
    UnknownOperation(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "×",
            Operation::Divide => "÷",
        }
    }

    pub fn apply(&self, a: f64, b: f64) -> f64 {
        match self {
            Operation::Add => a + b,
            Operation::Subtract => a - b,
            Operation::Multiply => a * b,
            Operation::Divide => a / b,
        }
    }
}

impl FromStr for Operation {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "+" | "add" | "plus" => Ok(Operation::Add),
            "-" | "sub" | "minus" => Ok(Operation::Subtract),
            "*" | "x" | "×" | "mul" | "times" => Ok(Operation::Multiply),
            "/" | "÷" | "div" => Ok(Operation::Divide),
            other => Err(CalcError::UnknownOperation(other.to_string())),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A validated calculation and its result
#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    pub first: f64,
    pub second: f64,
    pub operation: Operation,
    pub result: f64,
}

impl fmt::Display for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} = {}",
            format_number(self.first),
            self.operation,
            format_number(self.second),
            format_number(self.result)
        )
    }
}

fn parse_operand(text: &str) -> Result<f64, CalcError> {
    let text = text.trim();
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CalcError::InvalidNumber(text.to_string()))
}

/// Validate both operands and evaluate.
///
/// Checks run in order: blanks, then number syntax, then a zero divisor.
pub fn calculate(first: &str, second: &str, operation: Operation) -> Result<Calculation, CalcError> {
    if first.trim().is_empty() || second.trim().is_empty() {
        return Err(CalcError::EmptyField);
    }
    let a = parse_operand(first)?;
    let b = parse_operand(second)?;
    if operation == Operation::Divide && b == 0.0 {
        return Err(CalcError::DivisionByZero);
    }
    Ok(Calculation {
        first: a,
        second: b,
        operation,
        result: operation.apply(a, b),
    })
}

/// Render a number without a trailing ".0" or trailing fractional zeros
pub fn format_number(value: f64) -> String {
    let text = value.to_string();
    if text.contains('.') && !text.contains('e') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_operations() {
        assert_eq!(calculate("6", "3", Operation::Add).unwrap().result, 9.0);
        assert_eq!(calculate("6", "3", Operation::Subtract).unwrap().result, 3.0);
        assert_eq!(calculate("6", "3", Operation::Multiply).unwrap().result, 18.0);
        assert_eq!(calculate("6", "3", Operation::Divide).unwrap().result, 2.0);
    }

    #[test]
    fn test_validation_order() {
        assert_eq!(calculate(" ", "abc", Operation::Add), Err(CalcError::EmptyField));
        assert_eq!(
            calculate("1.2.3", "0", Operation::Divide),
            Err(CalcError::InvalidNumber("1.2.3".to_string()))
        );
        assert_eq!(calculate("5", "0", Operation::Divide), Err(CalcError::DivisionByZero));
        assert!(calculate("5", "0", Operation::Multiply).is_ok());
        assert!(matches!(
            calculate("inf", "1", Operation::Add),
            Err(CalcError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_parse_operation() {
        assert_eq!("+".parse::<Operation>(), Ok(Operation::Add));
        assert_eq!("×".parse::<Operation>(), Ok(Operation::Multiply));
        assert_eq!(" DIV ".parse::<Operation>(), Ok(Operation::Divide));
        assert!(matches!("%".parse::<Operation>(), Err(CalcError::UnknownOperation(_))));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(4.0), "4");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-0.125), "-0.125");
        assert_eq!(format_number(100.0), "100");
    }

    #[test]
    fn test_display() {
        let calc = calculate("7", "2", Operation::Divide).unwrap();
        assert_eq!(calc.to_string(), "7 ÷ 2 = 3.5");
    }
}
