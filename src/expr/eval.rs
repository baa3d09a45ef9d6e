use crate::expr::ast::*;
use crate::expr::error::{EvalFailure, EvalResult};
use crate::expr::lexer::Lexer;
use crate::expr::parser::Parser;

/// Name of the variable every expression is evaluated over.
pub const VARIABLE: &str = "x";

/// A compiled expression over the variable `x`.
///
/// Compilation validates the whole grammar up front, so a successfully
/// compiled expression can only fail per sample with
/// [`EvalErrorKind::NonFinite`](crate::expr::error::EvalErrorKind::NonFinite).
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    root: Expr,
}

impl Expression {
    pub fn compile(source: &str) -> EvalResult<Self> {
        let tokens = Lexer::new(source).tokenize()?;
        let root = Parser::new(tokens, VARIABLE).parse()?;
        Ok(Self {
            source: source.trim().to_string(),
            root,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// True when the expression never reads `x`.
    pub fn is_constant(&self) -> bool {
        !self.root.references_var()
    }

    pub fn evaluate(&self, x: f64) -> EvalResult<f64> {
        eval_node(&self.root, x)
    }
}

/// Compile `source` and evaluate it at `x` in one step.
pub fn evaluate(source: &str, x: f64) -> EvalResult<f64> {
    Expression::compile(source)?.evaluate(x)
}

fn eval_node(expr: &Expr, x: f64) -> EvalResult<f64> {
    let value = match expr {
        Expr::Number(n, _) => *n,
        Expr::Var(_) => x,
        Expr::Const(c, _) => c.value(),
        Expr::Neg { operand, .. } => -eval_node(operand, x)?,
        Expr::Call { func, arg, span } => {
            let v = eval_node(arg, x)?;
            let out = func.apply(v);
            if !out.is_finite() {
                return Err(EvalFailure::non_finite(format!(
                    "{}({}) is not finite",
                    func.name(),
                    v
                ))
                .with_span(*span));
            }
            out
        }
        Expr::BinOp { op, lhs, rhs, span } => {
            let l = eval_node(lhs, x)?;
            let r = eval_node(rhs, x)?;
            match op {
                BinOpKind::Add => l + r,
                BinOpKind::Sub => l - r,
                BinOpKind::Mul => l * r,
                BinOpKind::Div => {
                    if r == 0.0 {
                        return Err(EvalFailure::non_finite("division by zero").with_span(*span));
                    }
                    l / r
                }
                BinOpKind::Pow => l.powf(r),
            }
        }
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalFailure::non_finite(format!("result {} at x = {}", value, x)).with_span(expr.span()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::error::EvalErrorKind;
    use approx::assert_relative_eq;

    fn eval(input: &str, x: f64) -> f64 {
        evaluate(input, x).unwrap()
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval("1 + 2 * 3", 0.0), 7.0);
        assert_eq!(eval("(1 + 2) * 3", 0.0), 9.0);
        assert_eq!(eval("2^3^2", 0.0), 512.0);
    }

    #[test]
    fn test_variable() {
        assert_eq!(eval("x^2 + 2x + 1", 3.0), 16.0);
        assert_eq!(eval("-x^2", 3.0), -9.0);
    }

    #[test]
    fn test_functions() {
        assert_relative_eq!(eval("sin(x)", std::f64::consts::FRAC_PI_2), 1.0);
        assert_relative_eq!(eval("exp(log(x))", 5.0), 5.0, epsilon = 1e-12);
        assert_eq!(eval("abs(x) + |x|", -2.0), 4.0);
        assert_eq!(eval("sqrt(x)", 16.0), 4.0);
    }

    #[test]
    fn test_constants() {
        assert_relative_eq!(eval("2pi", 0.0), std::f64::consts::TAU);
        assert_relative_eq!(eval("e^x", 1.0), std::f64::consts::E);
    }

    #[test]
    fn test_division_by_zero_is_non_finite() {
        let err = evaluate("1/(x)", 0.0).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::NonFinite);
    }

    #[test]
    fn test_log_of_non_positive_is_non_finite() {
        assert!(evaluate("log(x)", 0.0).unwrap_err().is_non_finite());
        assert!(evaluate("log(x)", -1.0).unwrap_err().is_non_finite());
        assert!(evaluate("sqrt(x)", -1.0).unwrap_err().is_non_finite());
    }

    #[test]
    fn test_overflow_is_non_finite() {
        assert!(evaluate("exp(x)", 1000.0).unwrap_err().is_non_finite());
    }

    #[test]
    fn test_syntax_error_at_compile_time() {
        let err = Expression::compile("2 ** x").unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::SyntaxError);
        let err = Expression::compile("system(x)").unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::SyntaxError);
    }

    #[test]
    fn test_compiled_expression_is_reusable() {
        let expr = Expression::compile("3x - 1").unwrap();
        let ys: Vec<f64> = [0.0, 1.0, 2.0]
            .iter()
            .map(|&x| expr.evaluate(x).unwrap())
            .collect();
        assert_eq!(ys, vec![-1.0, 2.0, 5.0]);
    }

    #[test]
    fn test_is_constant() {
        assert!(Expression::compile("2*pi").unwrap().is_constant());
        assert!(!Expression::compile("2*x").unwrap().is_constant());
    }
}
