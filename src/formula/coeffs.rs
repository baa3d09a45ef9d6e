use lazy_static::lazy_static;
use regex::Regex;

use crate::formula::error::{ParseFailure, ParseResult};

lazy_static! {
    static ref X2_TERM: Regex = term_regex(r"x\^2");
    static ref X_TERM: Regex = term_regex("x");
    static ref Y_TERM: Regex = term_regex("y");
    static ref CONST_TERM: Regex =
        Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$").unwrap();
}

/// `<sign><optional coefficient><optional *><symbol>`, anchored.
fn term_regex(symbol: &str) -> Regex {
    Regex::new(&format!(
        r"^(?P<sign>[+-]?)(?P<coef>(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)?\*?{}$",
        symbol
    ))
    .unwrap()
}

/// Coefficients of `a·x² + b·x + c`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticCoefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

/// Sums of like terms in a polynomial of degree ≤ 2 in `x`, plus a `y` term.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct PolyTerms {
    pub x2: f64,
    pub x: f64,
    pub y: f64,
    pub constant: f64,
}

impl PolyTerms {
    fn minus(self, other: PolyTerms) -> PolyTerms {
        PolyTerms {
            x2: self.x2 - other.x2,
            x: self.x - other.x,
            y: self.y - other.y,
            constant: self.constant - other.constant,
        }
    }
}

/// Why a term scan stopped.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TermError {
    Empty,
    Unknown(String),
}

impl TermError {
    pub fn describe(&self) -> String {
        match self {
            TermError::Empty => "empty expression".to_string(),
            TermError::Unknown(term) => format!("unsupported term '{}'", term),
        }
    }
}

/// Strip whitespace and collapse doubled signs (`+-` → `-`, `--` → `+`).
pub fn normalize(expr: &str) -> String {
    let mut out: String = expr.chars().filter(|c| !c.is_whitespace()).collect();
    loop {
        let next = out
            .replace("+-", "-")
            .replace("-+", "-")
            .replace("--", "+")
            .replace("++", "+");
        if next == out {
            return out;
        }
        out = next;
    }
}

/// Split a normalized expression into signed top-level terms.
fn split_terms(expr: &str) -> Vec<String> {
    let chars: Vec<char> = expr.chars().collect();
    let mut terms = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;

    for (i, &ch) in chars.iter().enumerate() {
        match ch {
            '(' => depth += 1,
            ')' => depth -= 1,
            '+' | '-' if depth == 0 && !current.is_empty() => {
                let prev = chars[i - 1];
                let in_exponent = matches!(prev, 'e' | 'E')
                    && i >= 2
                    && chars[i - 2].is_ascii_digit()
                    && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit());
                if !matches!(prev, '^' | '*' | '/') && !in_exponent {
                    terms.push(std::mem::take(&mut current));
                }
            }
            _ => {}
        }
        current.push(ch);
    }
    if !current.is_empty() {
        terms.push(current);
    }
    terms
}

fn coefficient(caps: &regex::Captures<'_>) -> f64 {
    let magnitude = caps
        .name("coef")
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(1.0);
    match caps.name("sign").map(|m| m.as_str()) {
        Some("-") => -magnitude,
        _ => magnitude,
    }
}

/// Sum like terms. Order of terms in the source does not matter.
pub(crate) fn collect_terms(expr: &str) -> Result<PolyTerms, TermError> {
    let normalized = normalize(expr);
    let terms = split_terms(&normalized);
    if terms.is_empty() {
        return Err(TermError::Empty);
    }

    let mut sums = PolyTerms::default();
    for term in &terms {
        if let Some(caps) = X2_TERM.captures(term) {
            sums.x2 += coefficient(&caps);
        } else if let Some(caps) = X_TERM.captures(term) {
            sums.x += coefficient(&caps);
        } else if let Some(caps) = Y_TERM.captures(term) {
            sums.y += coefficient(&caps);
        } else if CONST_TERM.is_match(term) {
            sums.constant += term
                .parse::<f64>()
                .map_err(|_| TermError::Unknown(term.clone()))?;
        } else {
            return Err(TermError::Unknown(term.clone()));
        }
    }
    Ok(sums)
}

/// Read `a`, `b`, `c` from an explicit quadratic such as `3x^2 - x + 2`.
///
/// An elided coefficient is 1 and a lone sign is ±1; every remaining numeric
/// term is summed into `c`.
pub fn extract_quadratic_coefficients(expr: &str) -> ParseResult<QuadraticCoefficients> {
    let terms = collect_terms(expr).map_err(|e| ParseFailure::syntax(expr, e.describe()))?;
    if terms.y != 0.0 {
        return Err(ParseFailure::syntax(expr, "unexpected y term"));
    }
    Ok(QuadraticCoefficients {
        a: terms.x2,
        b: terms.x,
        c: terms.constant,
    })
}

/// Solve `lhs = rhs` for `y`, where both sides are at most quadratic in `x`
/// and linear in `y`.
pub(crate) fn solve_implicit(lhs: &str, rhs: &str) -> Result<QuadraticCoefficients, String> {
    let left = collect_terms(lhs).map_err(|e| format!("left side: {}", e.describe()))?;
    let right = collect_terms(rhs).map_err(|e| format!("right side: {}", e.describe()))?;
    let diff = left.minus(right);

    if diff.y == 0.0 {
        return Err("equation has no y term to solve for".to_string());
    }

    // `+ 0.0` folds -0.0 into 0.0
    Ok(QuadraticCoefficients {
        a: -diff.x2 / diff.y + 0.0,
        b: -diff.x / diff.y + 0.0,
        c: -diff.constant / diff.y + 0.0,
    })
}
