use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;

use crate::expr::Expression;
use crate::formula::spec::Domain;

/// The closed set of function families a formula can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormulaFamily {
    Quadratic,
    Linear,
    Sine,
    Cosine,
    Polar,
    Exponential,
    Logarithmic,
    GenericExpression,
}

/// Key → family table for the `key:params` grammar. Keys are lower-case.
const FAMILY_KEYS: &[(&str, FormulaFamily)] = &[
    ("quad", FormulaFamily::Quadratic),
    ("quadratic", FormulaFamily::Quadratic),
    ("linear", FormulaFamily::Linear),
    ("sine", FormulaFamily::Sine),
    ("sin", FormulaFamily::Sine),
    ("cosine", FormulaFamily::Cosine),
    ("cos", FormulaFamily::Cosine),
    ("polar", FormulaFamily::Polar),
    ("exponential", FormulaFamily::Exponential),
    ("exp", FormulaFamily::Exponential),
    ("log", FormulaFamily::Logarithmic),
    ("ln", FormulaFamily::Logarithmic),
    ("expr", FormulaFamily::GenericExpression),
    ("expression", FormulaFamily::GenericExpression),
    ("f", FormulaFamily::GenericExpression),
];

impl FormulaFamily {
    /// Look up a family by its (already lower-cased) prefix key.
    pub fn from_key(key: &str) -> Option<Self> {
        FAMILY_KEYS
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, family)| *family)
    }

    pub fn name(self) -> &'static str {
        match self {
            FormulaFamily::Quadratic => "quadratic",
            FormulaFamily::Linear => "linear",
            FormulaFamily::Sine => "sine",
            FormulaFamily::Cosine => "cosine",
            FormulaFamily::Polar => "polar",
            FormulaFamily::Exponential => "exponential",
            FormulaFamily::Logarithmic => "logarithmic",
            FormulaFamily::GenericExpression => "expression",
        }
    }

    /// Number of leading positional values that are family parameters
    /// (the rest of a colon list is `xMin, xMax, step`).
    pub fn param_count(self) -> usize {
        match self {
            FormulaFamily::Quadratic | FormulaFamily::Sine | FormulaFamily::Cosine => 3,
            FormulaFamily::Linear
            | FormulaFamily::Polar
            | FormulaFamily::Exponential
            | FormulaFamily::Logarithmic => 2,
            FormulaFamily::GenericExpression => 0,
        }
    }

    /// The domain used when a formula gives no range.
    pub fn default_domain(self) -> Domain {
        match self {
            FormulaFamily::Sine | FormulaFamily::Cosine => Domain::new(-TAU, TAU, 0.1),
            FormulaFamily::Polar => Domain::new(0.0, 360.0, 1.0),
            FormulaFamily::Logarithmic => Domain::new(0.0, 10.0, 1.0),
            FormulaFamily::GenericExpression => Domain::new(-10.0, 10.0, 0.1),
            FormulaFamily::Quadratic | FormulaFamily::Linear | FormulaFamily::Exponential => {
                Domain::new(-10.0, 10.0, 1.0)
            }
        }
    }

    /// Half-width used to widen a domain whose bounds coincide.
    pub fn degenerate_pad(self) -> f64 {
        match self {
            FormulaFamily::Sine | FormulaFamily::Cosine => 1.0,
            _ => 10.0,
        }
    }

    /// Polar domains are angles, not x values.
    pub fn is_angular(self) -> bool {
        self == FormulaFamily::Polar
    }
}

impl fmt::Display for FormulaFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Typed parameters for each family.
#[derive(Debug, Clone, PartialEq)]
pub enum FamilyParams {
    /// `y = a·x² + b·x + c`
    Quadratic { a: f64, b: f64, c: f64 },
    /// `y = m·x + b`
    Linear { m: f64, b: f64 },
    /// `y = amplitude·sin(frequency·x + phase)`
    Sine {
        amplitude: f64,
        frequency: f64,
        phase: f64,
    },
    /// `y = amplitude·cos(frequency·x + phase)`
    Cosine {
        amplitude: f64,
        frequency: f64,
        phase: f64,
    },
    /// `r = scale·|sin(multiplier·θ)|`
    Polar { scale: f64, multiplier: f64 },
    /// `y = a·e^(b·x)`
    Exponential { a: f64, b: f64 },
    /// `y = a·ln(x) + b`
    Logarithmic { a: f64, b: f64 },
    GenericExpression { expression: Expression },
}

impl FamilyParams {
    pub fn family(&self) -> FormulaFamily {
        match self {
            FamilyParams::Quadratic { .. } => FormulaFamily::Quadratic,
            FamilyParams::Linear { .. } => FormulaFamily::Linear,
            FamilyParams::Sine { .. } => FormulaFamily::Sine,
            FamilyParams::Cosine { .. } => FormulaFamily::Cosine,
            FamilyParams::Polar { .. } => FormulaFamily::Polar,
            FamilyParams::Exponential { .. } => FormulaFamily::Exponential,
            FamilyParams::Logarithmic { .. } => FormulaFamily::Logarithmic,
            FamilyParams::GenericExpression { .. } => FormulaFamily::GenericExpression,
        }
    }

    /// Build closed-form parameters from positional values, substituting the
    /// family default for every missing slot. Returns `None` for
    /// [`FormulaFamily::GenericExpression`], which has no numeric parameters.
    pub fn from_positional(family: FormulaFamily, values: &[Option<f64>]) -> Option<Self> {
        let at = |i: usize, default: f64| values.get(i).copied().flatten().unwrap_or(default);
        let params = match family {
            FormulaFamily::Quadratic => FamilyParams::Quadratic {
                a: at(0, 1.0),
                b: at(1, 0.0),
                c: at(2, 0.0),
            },
            FormulaFamily::Linear => FamilyParams::Linear {
                m: at(0, 1.0),
                b: at(1, 0.0),
            },
            FormulaFamily::Sine => FamilyParams::Sine {
                amplitude: at(0, 1.0),
                frequency: at(1, 1.0),
                phase: at(2, 0.0),
            },
            FormulaFamily::Cosine => FamilyParams::Cosine {
                amplitude: at(0, 1.0),
                frequency: at(1, 1.0),
                phase: at(2, 0.0),
            },
            FormulaFamily::Polar => FamilyParams::Polar {
                scale: at(0, 1.0),
                multiplier: at(1, 1.0),
            },
            FormulaFamily::Exponential => FamilyParams::Exponential {
                a: at(0, 1.0),
                b: at(1, 1.0),
            },
            FormulaFamily::Logarithmic => FamilyParams::Logarithmic {
                a: at(0, 1.0),
                b: at(1, 0.0),
            },
            FormulaFamily::GenericExpression => return None,
        };
        Some(params)
    }
}
