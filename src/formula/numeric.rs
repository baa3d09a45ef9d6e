use crate::expr::Expression;
use crate::formula::config::ParserConfig;

/// Parse one positional value. Empty tokens, NaN aliases, non-finite values
/// and anything that is not a constant expression come back as `None`, which
/// callers treat as "use the default".
pub fn parse_number(token: &str, config: &ParserConfig) -> Option<f64> {
    let token = token.trim();
    if token.is_empty() || config.is_nan_alias(token) {
        return None;
    }

    let cleaned: String = match config.thousands_separator {
        Some(sep) => token.chars().filter(|c| *c != sep).collect(),
        None => token.to_string(),
    };

    if let Ok(value) = cleaned.parse::<f64>() {
        return value.is_finite().then_some(value);
    }

    // `2pi`, `-pi/2`, `1/3`
    let expr = Expression::compile(&cleaned).ok()?;
    if !expr.is_constant() {
        return None;
    }
    expr.evaluate(0.0).ok()
}

/// Parse a comma-separated positional list. Never fails; bad entries are `None`.
pub fn parse_list(text: &str, config: &ParserConfig) -> Vec<Option<f64>> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    text.split(',').map(|t| parse_number(t, config)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_plain_numbers() {
        let cfg = ParserConfig::default();
        assert_eq!(parse_list("1, -2.5,3e2", &cfg), vec![Some(1.0), Some(-2.5), Some(300.0)]);
    }

    #[test]
    fn test_missing_and_aliases() {
        let cfg = ParserConfig::default();
        assert_eq!(parse_list("1,,NaN,null", &cfg), vec![Some(1.0), None, None, None]);
        assert_eq!(parse_list("", &cfg), Vec::<Option<f64>>::new());
    }

    #[test]
    fn test_non_finite_is_missing() {
        let cfg = ParserConfig::default();
        assert_eq!(parse_number("inf", &cfg), None);
        assert_eq!(parse_number("1/0", &cfg), None);
    }

    #[test]
    fn test_constant_expressions() {
        let cfg = ParserConfig::default();
        assert_relative_eq!(parse_number("2pi", &cfg).unwrap(), std::f64::consts::TAU);
        assert_relative_eq!(parse_number("-pi/2", &cfg).unwrap(), -std::f64::consts::FRAC_PI_2);
        assert_eq!(parse_number("x", &cfg), None);
        assert_eq!(parse_number("abc", &cfg), None);
    }

    #[test]
    fn test_thousands_separator() {
        let cfg = ParserConfig::default().with_thousands_separator('_');
        assert_eq!(parse_number("1_000", &cfg), Some(1000.0));
        let plain = ParserConfig::default();
        assert_eq!(parse_number("1'000", &plain), None);
    }

    #[test]
    fn test_custom_nan_alias() {
        let cfg = ParserConfig {
            nan_aliases: vec!["-".to_string()],
            ..ParserConfig::default()
        };
        assert_eq!(parse_list("2,-,3", &cfg), vec![Some(2.0), None, Some(3.0)]);
    }
}
