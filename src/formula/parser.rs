use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::expr::Expression;
use crate::formula::coeffs::{collect_terms, normalize, solve_implicit, TermError};
use crate::formula::config::{ParserConfig, RangeOverride};
use crate::formula::error::{ParseFailure, ParseResult};
use crate::formula::family::{FamilyParams, FormulaFamily};
use crate::formula::numeric::parse_list;
use crate::formula::spec::PlotSpec;

lazy_static! {
    /// `<a>*` in front of `e^`; the whole prefix may be empty.
    static ref EXP_PREFIX: Regex =
        Regex::new(r"^(?P<sign>[+-]?)(?P<coef>(?:\d+\.?\d*|\.\d+))?\*?$").unwrap();
    /// `<b>x` or `<b>*x` as the exponent.
    static ref EXP_POWER: Regex =
        Regex::new(r"^(?P<sign>[+-]?)(?P<coef>(?:\d+\.?\d*|\.\d+))?\*?x$").unwrap();
    /// `<a>*log(<args>)<+b>`
    static ref LOG_CALL: Regex = Regex::new(
        r"^(?P<sign>[+-]?)(?P<coef>(?:\d+\.?\d*|\.\d+))?\*?log\((?P<args>[^()]*)\)(?P<offset>[+-](?:\d+\.?\d*|\.\d+))?$"
    )
    .unwrap();
}

/// A formula string after one split on `:` or `=`, before any per-family
/// parsing.
#[derive(Debug, Clone, PartialEq)]
enum FormulaShape<'a> {
    /// `key:params[:range]` with a recognized key.
    Keyed { family: FormulaFamily, body: &'a str },
    /// `word:...` where `word` names no family.
    UnknownKey(String),
    /// `y=<rhs>[:range]`, whitespace removed.
    Explicit { rhs: String, range: Option<String> },
    /// `<lhs>=<rhs>[:range]` without a leading `y=`.
    Implicit {
        equation: String,
        range: Option<String>,
    },
    Unrecognized,
}

fn classify(formula: &str) -> FormulaShape<'_> {
    let trimmed = formula.trim();
    // ASCII lowering keeps byte offsets aligned with `trimmed`
    let sniff = trimmed.to_ascii_lowercase();

    if let Some(idx) = sniff.find(':') {
        let head = sniff[..idx].trim();
        if let Some(family) = FormulaFamily::from_key(head) {
            return FormulaShape::Keyed {
                family,
                body: &trimmed[idx + 1..],
            };
        }
        let is_word = !head.is_empty() && head.chars().all(|c| c.is_ascii_alphabetic() || c == '_');
        if is_word {
            return FormulaShape::UnknownKey(head.to_string());
        }
    }

    let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
    let (body, range) = match compact.split_once(':') {
        Some((body, range)) => (body.to_string(), Some(range.to_string())),
        None => (compact.clone(), None),
    };

    if body.to_ascii_lowercase().starts_with("y=") {
        return FormulaShape::Explicit {
            rhs: normalize(&body[2..]),
            range,
        };
    }
    if body.contains('=') {
        return FormulaShape::Implicit {
            equation: body,
            range,
        };
    }
    FormulaShape::Unrecognized
}

/// Parses formula strings into [`PlotSpec`]s under a fixed [`ParserConfig`].
#[derive(Debug, Clone, Default)]
pub struct FormulaParser {
    config: ParserConfig,
}

impl FormulaParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn parse(&self, formula: &str) -> ParseResult<PlotSpec> {
        let shape = classify(formula);
        debug!("formula '{}' classified as {:?}", formula, shape);

        match shape {
            FormulaShape::Keyed { family, body } => self.parse_keyed(formula, family, body),
            FormulaShape::UnknownKey(key) => Err(ParseFailure::invalid_key(formula, &key)),
            FormulaShape::Explicit { rhs, range } => {
                let ranges = self.range_list(range.as_deref());
                self.parse_explicit(formula, &rhs, &ranges)
            }
            FormulaShape::Implicit { equation, range } => {
                let ranges = self.range_list(range.as_deref());
                let params = parse_implicit(formula, &equation)?;
                Ok(self.finish(formula, params, &ranges, None))
            }
            FormulaShape::Unrecognized => Err(ParseFailure::unrecognized(formula)),
        }
    }

    /// `key:p1,p2,...[:xMin,xMax,step]`
    fn parse_keyed(&self, formula: &str, family: FormulaFamily, body: &str) -> ParseResult<PlotSpec> {
        let (first, second) = match body.split_once(':') {
            Some((first, second)) => (first, Some(second)),
            None => (body, None),
        };

        if family == FormulaFamily::GenericExpression {
            let source = first.trim();
            if source.is_empty() {
                return Err(ParseFailure::syntax(formula, "missing expression"));
            }
            let ranges = self.range_list(second);
            return self.expression_spec(formula, source, &ranges);
        }

        let values = parse_list(first, &self.config);
        let split = family.param_count().min(values.len());
        let (param_values, range_values) = values.split_at(split);

        let params = FamilyParams::from_positional(family, param_values)
            .ok_or_else(|| ParseFailure::syntax(formula, "family takes no numeric parameters"))?;

        let mut ranges = vec![RangeOverride::from_values(range_values)];
        ranges.extend(self.range_list(second));
        Ok(self.finish(formula, params, &ranges, None))
    }

    fn parse_explicit(&self, formula: &str, rhs: &str, ranges: &[RangeOverride]) -> ParseResult<PlotSpec> {
        let sniff = rhs.to_ascii_lowercase();

        if sniff.contains("e^") {
            let params = parse_exponential(formula, rhs)?;
            return Ok(self.finish(formula, params, ranges, None));
        }
        if sniff.contains("log(") {
            let params = self.parse_logarithmic(formula, rhs)?;
            return Ok(self.finish(formula, params, ranges, None));
        }

        let params = if !rhs.contains("x^2") {
            match collect_terms(rhs) {
                Ok(terms) if terms.y == 0.0 && terms.x2 == 0.0 => FamilyParams::Linear {
                    m: terms.x,
                    b: terms.constant,
                },
                Ok(terms) if terms.x2 == 0.0 => {
                    let q = solve_implicit("y", rhs).map_err(|m| ParseFailure::syntax(formula, m))?;
                    FamilyParams::Linear { m: q.b, b: q.c }
                }
                Ok(_) | Err(TermError::Unknown(_)) => {
                    return self.expression_spec(formula, rhs, ranges)
                }
                Err(e) => return Err(ParseFailure::syntax(formula, e.describe())),
            }
        } else if rhs.contains('y') {
            let q = solve_implicit("y", rhs).map_err(|m| ParseFailure::syntax(formula, m))?;
            FamilyParams::Quadratic {
                a: q.a,
                b: q.b,
                c: q.c,
            }
        } else {
            match collect_terms(rhs) {
                Ok(terms) => FamilyParams::Quadratic {
                    a: terms.x2,
                    b: terms.x,
                    c: terms.constant,
                },
                Err(TermError::Unknown(_)) => return self.expression_spec(formula, rhs, ranges),
                Err(e) => return Err(ParseFailure::syntax(formula, e.describe())),
            }
        };
        Ok(self.finish(formula, params, ranges, None))
    }

    /// `y=<a>*log(x)<+b>` or `y=log(<a>,<b>)`.
    fn parse_logarithmic(&self, formula: &str, rhs: &str) -> ParseResult<FamilyParams> {
        let caps = LOG_CALL
            .captures(rhs)
            .ok_or_else(|| ParseFailure::syntax(formula, "expected <a>*log(x)+<b> or log(<a>,<b>)"))?;
        let args = caps.name("args").map_or("", |m| m.as_str()).trim();

        if args == "x" {
            let a = signed_coefficient(&caps);
            let b = caps
                .name("offset")
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .unwrap_or(0.0);
            return Ok(FamilyParams::Logarithmic { a, b });
        }

        let decorated = ["sign", "coef", "offset"]
            .iter()
            .any(|name| caps.name(name).is_some_and(|m| !m.as_str().is_empty()));
        if decorated {
            return Err(ParseFailure::syntax(
                formula,
                "outer coefficients are only allowed around log(x)",
            ));
        }
        let values = parse_list(args, &self.config);
        FamilyParams::from_positional(FormulaFamily::Logarithmic, &values)
            .ok_or_else(|| ParseFailure::syntax(formula, "bad logarithm parameters"))
    }

    fn expression_spec(&self, formula: &str, source: &str, ranges: &[RangeOverride]) -> ParseResult<PlotSpec> {
        let expression =
            Expression::compile(source).map_err(|e| ParseFailure::from_eval(formula, e))?;
        let raw = expression.source().to_string();
        Ok(self.finish(
            formula,
            FamilyParams::GenericExpression { expression },
            ranges,
            Some(raw),
        ))
    }

    fn range_list(&self, range: Option<&str>) -> Vec<RangeOverride> {
        range
            .map(|text| vec![RangeOverride::from_values(&parse_list(text, &self.config))])
            .unwrap_or_default()
    }

    /// Apply config and positional ranges to the family default domain, then
    /// normalize it.
    fn finish(
        &self,
        formula: &str,
        params: FamilyParams,
        ranges: &[RangeOverride],
        raw_expression: Option<String>,
    ) -> PlotSpec {
        let family = params.family();
        let mut domain = family.default_domain();
        if let (Some(range), false) = (&self.config.default_range, family.is_angular()) {
            domain = domain.overridden(range);
        }
        for range in ranges {
            domain = domain.overridden(range);
        }

        PlotSpec {
            params,
            domain: domain.normalized(family, self.config.max_samples),
            raw_expression,
            source: formula.trim().to_string(),
        }
    }
}

/// Parse with [`ParserConfig::default`].
pub fn parse(formula: &str) -> ParseResult<PlotSpec> {
    FormulaParser::default().parse(formula)
}

fn signed_coefficient(caps: &regex::Captures<'_>) -> f64 {
    let magnitude = caps
        .name("coef")
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(1.0);
    match caps.name("sign").map(|m| m.as_str()) {
        Some("-") => -magnitude,
        _ => magnitude,
    }
}

/// `<a>*e^(<b>x)`; the parentheses around the exponent are optional.
fn parse_exponential(formula: &str, rhs: &str) -> ParseResult<FamilyParams> {
    let malformed = || ParseFailure::syntax(formula, "expected <a>*e^(<b>x)");

    // ASCII lowering keeps byte offsets aligned with `rhs`
    let at = rhs.to_ascii_lowercase().find("e^").ok_or_else(malformed)?;
    let (prefix, power) = (&rhs[..at], &rhs[at + 2..]);
    let power = match power.strip_prefix('(') {
        Some(inner) => inner.strip_suffix(')').ok_or_else(malformed)?,
        None => power,
    };

    let a = EXP_PREFIX
        .captures(prefix)
        .map(|caps| signed_coefficient(&caps))
        .ok_or_else(malformed)?;
    let b = EXP_POWER
        .captures(power)
        .map(|caps| signed_coefficient(&caps))
        .ok_or_else(malformed)?;
    Ok(FamilyParams::Exponential { a, b })
}

/// `<lhs>=<rhs>` solved for `y` as a quadratic in `x`.
fn parse_implicit(formula: &str, equation: &str) -> ParseResult<FamilyParams> {
    let sides: Vec<&str> = equation.split('=').collect();
    if sides.len() != 2 {
        return Err(ParseFailure::syntax(formula, "expected exactly one '='"));
    }
    let q = solve_implicit(sides[0], sides[1]).map_err(|m| ParseFailure::syntax(formula, m))?;
    Ok(FamilyParams::Quadratic {
        a: q.a,
        b: q.b,
        c: q.c,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::error::ParseErrorKind;
    use crate::formula::spec::Domain;
    use std::f64::consts::TAU;

    fn ok(formula: &str) -> PlotSpec {
        parse(formula).unwrap_or_else(|e| panic!("{} failed: {}", formula, e))
    }

    fn kind(formula: &str) -> ParseErrorKind {
        parse(formula).unwrap_err().kind
    }

    #[test]
    fn test_quad_colon_grammar() {
        let spec = ok("quad:1,2,3,-5,5,0.5");
        assert_eq!(
            spec.params,
            FamilyParams::Quadratic {
                a: 1.0,
                b: 2.0,
                c: 3.0
            }
        );
        assert_eq!(spec.domain, Domain::new(-5.0, 5.0, 0.5));
    }

    #[test]
    fn test_short_list_keeps_defaults() {
        let spec = ok("quadratic:2");
        assert_eq!(
            spec.params,
            FamilyParams::Quadratic {
                a: 2.0,
                b: 0.0,
                c: 0.0
            }
        );
        assert_eq!(spec.domain, Domain::new(-10.0, 10.0, 1.0));
    }

    #[test]
    fn test_key_is_case_insensitive() {
        assert_eq!(ok("SINE:2,1,0").family(), FormulaFamily::Sine);
        assert_eq!(ok("Cos:").family(), FormulaFamily::Cosine);
    }

    #[test]
    fn test_trig_defaults() {
        let spec = ok("sine:");
        assert_eq!(spec.domain, Domain::new(-TAU, TAU, 0.1));
    }

    #[test]
    fn test_second_colon_overrides_range() {
        let spec = ok("linear:2,3:-1,1");
        assert_eq!(spec.params, FamilyParams::Linear { m: 2.0, b: 3.0 });
        assert_eq!(spec.domain, Domain::new(-1.0, 1.0, 1.0));
    }

    #[test]
    fn test_non_numeric_parameters_fall_back() {
        let spec = ok("exp:abc,2");
        assert_eq!(spec.params, FamilyParams::Exponential { a: 1.0, b: 2.0 });
    }

    #[test]
    fn test_polar_uses_degrees() {
        let spec = ok("polar:2,3");
        assert_eq!(
            spec.params,
            FamilyParams::Polar {
                scale: 2.0,
                multiplier: 3.0
            }
        );
        assert_eq!(spec.domain, Domain::new(0.0, 360.0, 1.0));
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(kind("cubic:1,2,3,4"), ParseErrorKind::InvalidFamilyKey);
    }

    #[test]
    fn test_unrecognized() {
        assert_eq!(kind("hello world"), ParseErrorKind::UnrecognizedFormat);
        assert_eq!(kind(""), ParseErrorKind::UnrecognizedFormat);
    }

    #[test]
    fn test_explicit_linear() {
        let spec = ok("y = 2x + 3 : -10, 10, 1");
        assert_eq!(spec.params, FamilyParams::Linear { m: 2.0, b: 3.0 });
        assert_eq!(spec.domain, Domain::new(-10.0, 10.0, 1.0));

        assert_eq!(ok("y=x").params, FamilyParams::Linear { m: 1.0, b: 0.0 });
        assert_eq!(ok("y=3-x").params, FamilyParams::Linear { m: -1.0, b: 3.0 });
    }

    #[test]
    fn test_explicit_linear_with_y_on_right() {
        // y = 2x - y  =>  2y = 2x
        assert_eq!(ok("y=2x-y").params, FamilyParams::Linear { m: 1.0, b: 0.0 });
        assert_eq!(ok("y=4x+2-3y").params, FamilyParams::Linear { m: 1.0, b: 0.5 });
        assert_eq!(kind("y=2x+y"), ParseErrorKind::SyntaxError);
    }

    #[test]
    fn test_explicit_quadratic_matches_keyed() {
        let keyed = ok("quad:1,0,0,-10,10,1");
        let algebraic = ok("y=x^2:-10,10,1");
        assert_eq!(keyed.params, algebraic.params);
        assert_eq!(keyed.domain, algebraic.domain);
    }

    #[test]
    fn test_explicit_quadratic_with_y_on_right() {
        // y = x^2 + 2 - y  =>  2y = x^2 + 2
        let spec = ok("y=x^2+2-y");
        assert_eq!(
            spec.params,
            FamilyParams::Quadratic {
                a: 0.5,
                b: 0.0,
                c: 1.0
            }
        );
    }

    #[test]
    fn test_explicit_exponential() {
        let spec = ok("y=2*e^(0.5x):-4,4,4");
        assert_eq!(spec.params, FamilyParams::Exponential { a: 2.0, b: 0.5 });
        assert_eq!(spec.domain, Domain::new(-4.0, 4.0, 4.0));

        assert_eq!(ok("y=e^x").params, FamilyParams::Exponential { a: 1.0, b: 1.0 });
        assert_eq!(ok("y=-e^(-x)").params, FamilyParams::Exponential { a: -1.0, b: -1.0 });
    }

    #[test]
    fn test_exponential_base_is_case_insensitive() {
        assert_eq!(ok("y=2*E^(x)").params, FamilyParams::Exponential { a: 2.0, b: 1.0 });
        assert_eq!(ok("Y=E^(0.5x)").params, FamilyParams::Exponential { a: 1.0, b: 0.5 });
    }

    #[test]
    fn test_malformed_exponential() {
        assert_eq!(kind("y=2*e^(x^2)"), ParseErrorKind::SyntaxError);
        assert_eq!(kind("y=e^(2x"), ParseErrorKind::SyntaxError);
    }

    #[test]
    fn test_explicit_logarithmic() {
        assert_eq!(ok("y=log(x)").params, FamilyParams::Logarithmic { a: 1.0, b: 0.0 });
        assert_eq!(
            ok("y=3*log(x)-2").params,
            FamilyParams::Logarithmic { a: 3.0, b: -2.0 }
        );
        let spec = ok("y=log(2,5):1,100,1");
        assert_eq!(spec.params, FamilyParams::Logarithmic { a: 2.0, b: 5.0 });
        assert_eq!(spec.domain, Domain::new(1.0, 100.0, 1.0));
        assert_eq!(kind("y=2*log(3,4)"), ParseErrorKind::SyntaxError);
    }

    #[test]
    fn test_unclassifiable_terms_become_expressions() {
        let spec = ok("y=sin(x)/x");
        assert_eq!(spec.family(), FormulaFamily::GenericExpression);
        assert_eq!(spec.raw_expression.as_deref(), Some("sin(x)/x"));
        assert_eq!(ok("y=x^3-x").family(), FormulaFamily::GenericExpression);
    }

    #[test]
    fn test_bad_expression_is_syntax_error() {
        assert_eq!(kind("y=foo(x)"), ParseErrorKind::SyntaxError);
        assert_eq!(kind("expr:"), ParseErrorKind::SyntaxError);
    }

    #[test]
    fn test_keyed_expression() {
        let spec = ok("expr: sqrt(x) * 2 : 0, 4, 1");
        assert_eq!(spec.family(), FormulaFamily::GenericExpression);
        assert_eq!(spec.raw_expression.as_deref(), Some("sqrt(x) * 2"));
        assert_eq!(spec.domain, Domain::new(0.0, 4.0, 1.0));
    }

    #[test]
    fn test_implicit_equation() {
        let spec = ok("x^2 + 2y - 4 = 0");
        assert_eq!(
            spec.params,
            FamilyParams::Quadratic {
                a: -0.5,
                b: 0.0,
                c: 2.0
            }
        );
    }

    #[test]
    fn test_implicit_without_y_is_error() {
        assert_eq!(kind("x^2 + 1 = 0"), ParseErrorKind::SyntaxError);
        assert_eq!(kind("y = 1 = 2"), ParseErrorKind::SyntaxError);
    }

    #[test]
    fn test_degenerate_range_widened() {
        let spec = ok("linear:1,0,5,5,1");
        assert_eq!(spec.domain, Domain::new(-5.0, 15.0, 1.0));
    }

    #[test]
    fn test_config_default_range() {
        let cfg = ParserConfig::default().with_default_range(RangeOverride {
            min: Some(0.0),
            max: Some(2.0),
            step: None,
        });
        let parser = FormulaParser::new(cfg);
        let spec = parser.parse("linear:1,0").unwrap();
        assert_eq!(spec.domain, Domain::new(0.0, 2.0, 1.0));
        // positional values still win
        let spec = parser.parse("linear:1,0,-1").unwrap();
        assert_eq!(spec.domain, Domain::new(-1.0, 2.0, 1.0));
        // polar keeps its degree domain
        let spec = parser.parse("polar:1,1").unwrap();
        assert_eq!(spec.domain, Domain::new(0.0, 360.0, 1.0));
    }
}
