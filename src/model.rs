//! Candidate models evaluated over time.
//!
//! The residual analyzer only needs `evaluate(t)`. Closures, fixed-coefficient
//! lines and exponentials, and user formulas all provide it.

use evalexpr::{ContextWithMutableVariables, HashMapContext, Node, Value};
use tracing::warn;

use crate::error::ModelError;

/// A scalar function of time.
pub trait Model {
    fn evaluate(&self, t: f64) -> f64;
}

impl<F: Fn(f64) -> f64> Model for F {
    fn evaluate(&self, t: f64) -> f64 {
        self(t)
    }
}

/// `slope * t + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub slope: f64,
    pub intercept: f64,
}

impl Affine {
    pub fn new(slope: f64, intercept: f64) -> Self {
        Affine { slope, intercept }
    }
}

impl Model for Affine {
    fn evaluate(&self, t: f64) -> f64 {
        self.slope * t + self.intercept
    }
}

/// `amplitude * e^(rate * t) + offset`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exponential {
    pub amplitude: f64,
    pub rate: f64,
    pub offset: f64,
}

impl Exponential {
    pub fn new(amplitude: f64, rate: f64, offset: f64) -> Self {
        Exponential {
            amplitude,
            rate,
            offset,
        }
    }

    /// Builds from the `[A, B, C]` triple as given on the command line.
    pub fn from_triple([amplitude, rate, offset]: [f64; 3]) -> Self {
        Self::new(amplitude, rate, offset)
    }

    /// The same curve in log space, `ln A + B t`.
    ///
    /// Only a pure exponential (positive amplitude, no offset) is a line there.
    pub fn log_line(&self) -> Option<Affine> {
        (self.amplitude > 0.0 && self.offset == 0.0)
            .then(|| Affine::new(self.rate, self.amplitude.ln()))
    }
}

impl Model for Exponential {
    fn evaluate(&self, t: f64) -> f64 {
        self.amplitude * (self.rate * t).exp() + self.offset
    }
}

/// A user formula in `x` (or `t`), e.g. `0.0033335*x + 2.8`.
///
/// Uses evalexpr syntax: `^` for powers, `math::exp(x)`, `math::ln(x)`.
/// Integer literals are read as floats, so `1/300` is a fraction, not zero.
#[derive(Debug, Clone)]
pub struct Expression {
    source: String,
    node: Node,
}

const PROBE_AT: f64 = 1.0;

impl Expression {
    pub fn parse(source: &str) -> Result<Self, ModelError> {
        let node =
            evalexpr::build_operator_tree(&float_literals(source)).map_err(|e| {
                ModelError::Parse {
                    source_text: source.to_string(),
                    source: e,
                }
            })?;

        let expr = Expression {
            source: source.to_string(),
            node,
        };

        // Unknown identifiers and non-numeric results only surface on evaluation.
        expr.try_evaluate(PROBE_AT)
            .map_err(|e| ModelError::Evaluate {
                source_text: source.to_string(),
                at: PROBE_AT,
                source: e,
            })?;

        Ok(expr)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn try_evaluate(&self, t: f64) -> Result<f64, evalexpr::EvalexprError> {
        let mut context = HashMapContext::new();
        context.set_value("x".into(), Value::Float(t))?;
        context.set_value("t".into(), Value::Float(t))?;
        self.node.eval_number_with_context(&context)
    }
}

/// Rewrites integer literals as float literals (`300` becomes `300.0`).
///
/// Digits inside identifiers such as `x2` are left alone.
fn float_literals(source: &str) -> String {
    let mut out = String::with_capacity(source.len() + 8);
    let mut chars = source.chars().peekable();
    let mut prev: Option<char> = None;

    while let Some(c) = chars.next() {
        out.push(c);
        let in_identifier = prev.is_some_and(|p| p.is_alphanumeric() || p == '_' || p == '.');
        if !c.is_ascii_digit() || in_identifier {
            prev = Some(c);
            continue;
        }

        let mut is_float = false;
        let mut last = c;
        while let Some(&n) = chars.peek() {
            let exponent_sign = (n == '+' || n == '-') && matches!(last, 'e' | 'E');
            if n == '.' || n == 'e' || n == 'E' {
                is_float = true;
            } else if !n.is_ascii_digit() && !exponent_sign {
                break;
            }
            out.push(n);
            last = n;
            chars.next();
        }

        let glued = chars.peek().is_some_and(|n| n.is_alphabetic() || *n == '_');
        if !is_float && !glued {
            out.push_str(".0");
            last = '0';
        }
        prev = Some(last);
    }

    out
}

impl Model for Expression {
    fn evaluate(&self, t: f64) -> f64 {
        match self.try_evaluate(t) {
            Ok(y) => y,
            Err(e) => {
                warn!(expression = %self.source, t, error = %e, "expression evaluation failed");
                f64::NAN
            }
        }
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::fmt::Display for Affine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}*x + {}", self.slope, self.intercept)
    }
}

impl std::fmt::Display for Exponential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} * e^({} x) + {}",
            self.amplitude, self.rate, self.offset
        )
    }
}
