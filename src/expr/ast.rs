use crate::expr::token::Span;

/// Expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal: `42`, `3.14`, `1e-3`
    Number(f64, Span),

    /// The bound variable.
    Var(Span),

    /// Named constant: `pi`, `e`
    Const(MathConst, Span),

    /// Binary operation: `a + b`, `x^2`
    BinOp {
        op: BinOpKind,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        span: Span,
    },

    /// Unary negation: `-x`
    Neg { operand: Box<Expr>, span: Span },

    /// Allow-listed function call: `sin(x)`, `|x|`
    Call {
        func: MathFn,
        arg: Box<Expr>,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Number(_, s) => *s,
            Expr::Var(s) => *s,
            Expr::Const(_, s) => *s,
            Expr::BinOp { span, .. } => *span,
            Expr::Neg { span, .. } => *span,
            Expr::Call { span, .. } => *span,
        }
    }

    /// Whether the bound variable appears anywhere in the tree.
    pub fn references_var(&self) -> bool {
        match self {
            Expr::Var(_) => true,
            Expr::Number(..) | Expr::Const(..) => false,
            Expr::BinOp { lhs, rhs, .. } => lhs.references_var() || rhs.references_var(),
            Expr::Neg { operand, .. } => operand.references_var(),
            Expr::Call { arg, .. } => arg.references_var(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathConst {
    Pi,
    E,
}

impl MathConst {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pi" => Some(MathConst::Pi),
            "e" => Some(MathConst::E),
            _ => None,
        }
    }

    pub fn value(self) -> f64 {
        match self {
            MathConst::Pi => std::f64::consts::PI,
            MathConst::E => std::f64::consts::E,
        }
    }
}

/// The unary functions an expression may call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathFn {
    Sin,
    Cos,
    Tan,
    Sqrt,
    /// Natural logarithm (`log` and `ln`).
    Log,
    Exp,
    Abs,
}

impl MathFn {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sin" => Some(MathFn::Sin),
            "cos" => Some(MathFn::Cos),
            "tan" => Some(MathFn::Tan),
            "sqrt" => Some(MathFn::Sqrt),
            "log" | "ln" => Some(MathFn::Log),
            "exp" => Some(MathFn::Exp),
            "abs" => Some(MathFn::Abs),
            _ => None,
        }
    }

    pub fn apply(self, v: f64) -> f64 {
        match self {
            MathFn::Sin => v.sin(),
            MathFn::Cos => v.cos(),
            MathFn::Tan => v.tan(),
            MathFn::Sqrt => v.sqrt(),
            MathFn::Log => v.ln(),
            MathFn::Exp => v.exp(),
            MathFn::Abs => v.abs(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MathFn::Sin => "sin",
            MathFn::Cos => "cos",
            MathFn::Tan => "tan",
            MathFn::Sqrt => "sqrt",
            MathFn::Log => "log",
            MathFn::Exp => "exp",
            MathFn::Abs => "abs",
        }
    }
}
