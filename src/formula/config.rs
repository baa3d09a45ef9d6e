use serde::{Deserialize, Serialize};

/// Default upper bound on samples generated for a single formula.
pub const DEFAULT_MAX_SAMPLES: usize = 100_000;

/// Explicit, immutable parser settings.
///
/// Everything that would otherwise come from ambient process state lives
/// here, so parsing stays a pure function of `(config, formula)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Tokens that mark a positional value as missing (case-insensitive).
    pub nan_aliases: Vec<String>,
    /// Digit-group separator stripped from numeric tokens, e.g. `_` or `'`.
    pub thousands_separator: Option<char>,
    /// Upper bound on samples per formula; larger requests get a wider step.
    pub max_samples: usize,
    /// Range applied to every Cartesian family before positional overrides.
    pub default_range: Option<RangeOverride>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            nan_aliases: ["nan", "null", "none", "undefined"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            thousands_separator: None,
            max_samples: DEFAULT_MAX_SAMPLES,
            default_range: None,
        }
    }
}

impl ParserConfig {
    pub fn with_default_range(mut self, range: RangeOverride) -> Self {
        self.default_range = Some(range);
        self
    }

    pub fn with_thousands_separator(mut self, separator: char) -> Self {
        self.thousands_separator = Some(separator);
        self
    }

    pub fn is_nan_alias(&self, token: &str) -> bool {
        self.nan_aliases
            .iter()
            .any(|alias| alias.eq_ignore_ascii_case(token))
    }

    /// Stable textual key used by the series cache.
    pub fn cache_key(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Partial `xMin, xMax, step` triple; `None` keeps whatever came before.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeOverride {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
}

impl RangeOverride {
    pub fn from_values(values: &[Option<f64>]) -> Self {
        Self {
            min: values.first().copied().flatten(),
            max: values.get(1).copied().flatten(),
            step: values.get(2).copied().flatten(),
        }
    }
}
