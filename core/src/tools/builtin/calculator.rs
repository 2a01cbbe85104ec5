//! Arithmetic tool

use crate::error::Result;
use crate::router::CALCULATOR;
use crate::tools::{Tool, ToolExample};
use async_trait::async_trait;
use regex::Regex;

/// Evaluates the first `<integer> <op> <integer>` pair found in a query
///
/// Only that pair is evaluated, so `2 + 3 * 4` yields `2+3 = 5`.
pub struct CalculatorTool {
    pattern: Regex,
}

impl CalculatorTool {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"[0-9]+\s*[+\-*/]\s*[0-9]+").unwrap(),
        }
    }

    fn calculate(&self, query: &str) -> String {
        let Some(found) = self.pattern.find(query) else {
            return "오류: 수학 표현식을 찾을 수 없습니다. 예: 2 + 3, 10 * 5".to_string();
        };

        // Only spaces are stripped; tabs and newlines are rejected below
        let expression = found.as_str().replace(' ', "");
        if !expression.chars().all(|c| "0123456789+-*/.() ".contains(c)) {
            return "오류: 허용되지 않는 문자가 포함되어 있습니다.".to_string();
        }

        match evaluate(&expression) {
            Ok(value) => format!("계산 결과: {} = {}", expression, value),
            Err(message) => format!("계산 오류: {}", message),
        }
    }
}

impl Default for CalculatorTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        CALCULATOR
    }

    fn description(&self) -> &str {
        "수학 계산을 수행합니다. 예: 2 + 3, 10 * 5, sqrt(16)"
    }

    async fn run(&self, query: &str) -> Result<String> {
        Ok(self.calculate(query))
    }

    fn examples(&self) -> Vec<ToolExample> {
        vec![
            ToolExample::new("Addition", "2 + 3 계산해줘", "계산 결과: 2+3 = 5"),
            ToolExample::new("Division", "10 / 4", "계산 결과: 10/4 = 2.5"),
        ]
    }
}

/// Evaluate a whitespace-free `<int><op><int>` expression
fn evaluate(expression: &str) -> std::result::Result<String, &'static str> {
    let op_index = expression
        .char_indices()
        .skip(1)
        .find(|(_, c)| matches!(c, '+' | '-' | '*' | '/'))
        .map(|(i, _)| i)
        .ok_or("invalid expression")?;

    let (lhs, rest) = expression.split_at(op_index);
    let op = &rest[..1];
    let rhs = &rest[1..];

    let lhs: i128 = lhs.parse().map_err(|_| "integer overflow")?;
    let rhs: i128 = rhs.parse().map_err(|_| "integer overflow")?;

    let value = match op {
        "+" => lhs.checked_add(rhs).ok_or("integer overflow")?.to_string(),
        "-" => lhs.checked_sub(rhs).ok_or("integer overflow")?.to_string(),
        "*" => lhs.checked_mul(rhs).ok_or("integer overflow")?.to_string(),
        _ => {
            if rhs == 0 {
                return Err("division by zero");
            }
            format_float(lhs as f64 / rhs as f64)
        }
    };

    Ok(value)
}

/// Shortest round-trip float text: always a fractional part or an exponent
/// with an explicit sign and two digits (`4.0`, `2.5`, `1e-05`, `1e+16`)
fn format_float(value: f64) -> String {
    let text = format!("{:?}", value);
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => text,
    }
}
