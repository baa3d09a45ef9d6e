use log::{debug, warn};
use std::sync::Arc;

use crate::formula::{FormulaFamily, FormulaParser, ParseFailure, ParserConfig, PlotSpec};
use crate::mapping::{CoordinateMapper, MappingResult};
use crate::plot::cache::SeriesCache;
use crate::plot::types::*;
use crate::sample::{generate, Series};

/// Parse every formula, keeping input order. Failures stay in place.
pub fn parse_formulas<S: AsRef<str>>(formulas: &[S], config: &ParserConfig) -> Vec<ParsedFormula> {
    let parser = FormulaParser::new(config.clone());
    formulas
        .iter()
        .map(|f| {
            let source: &str = f.as_ref();
            ParsedFormula {
                source: source.to_string(),
                result: parser.parse(source),
            }
        })
        .collect()
}

/// Sample every spec, group the series by family in order of first
/// appearance and map each group against its own extents.
pub fn sample_and_map(specs: &[PlotSpec], options: &PlotOptions) -> MappingResult<Vec<FamilyGroup>> {
    map_groups(specs.iter().map(generate).collect(), options)
}

fn map_groups(series: Vec<Series>, options: &PlotOptions) -> MappingResult<Vec<FamilyGroup>> {
    let mapper = CoordinateMapper::new(options.rect(), options.scales())?;

    // A handful of families at most; a linear scan keeps first-seen order.
    let mut buckets: Vec<(FormulaFamily, Vec<Series>)> = Vec::new();
    for s in series {
        match buckets.iter_mut().find(|(family, _)| *family == s.family) {
            Some((_, members)) => members.push(s),
            None => buckets.push((s.family, vec![s])),
        }
    }

    buckets
        .into_iter()
        .map(|(family, series)| {
            let mapping = mapper.map(&series)?;
            debug!(
                "{}: {} series, x {:?}, y {:?}",
                family,
                series.len(),
                (mapping.x_extent.min, mapping.x_extent.max),
                (mapping.y_extent.min, mapping.y_extent.max)
            );
            Ok(FamilyGroup {
                family,
                series,
                mapping,
            })
        })
        .collect()
}

/// Batch driver: parse, report failures, sample and map the rest.
pub struct PlotAggregator {
    parser: FormulaParser,
    options: PlotOptions,
    cache: Option<Arc<SeriesCache>>,
}

impl PlotAggregator {
    pub fn new(config: ParserConfig, options: PlotOptions) -> Self {
        Self {
            parser: FormulaParser::new(config),
            options,
            cache: None,
        }
    }

    /// Memoize per-formula sampling in `cache`. The cache may be shared with
    /// other aggregators.
    pub fn with_cache(mut self, cache: Arc<SeriesCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn options(&self) -> &PlotOptions {
        &self.options
    }

    /// Plot `formulas`. A formula that fails to parse becomes a
    /// [`Diagnostic`] and never aborts the batch; only the drawing rectangle
    /// or an unrecoverable extent can fail the whole run.
    pub fn run<S: AsRef<str>>(&self, formulas: &[S]) -> MappingResult<PlotReport> {
        let mut series = Vec::with_capacity(formulas.len());
        let mut diagnostics = Vec::new();

        for formula in formulas {
            let formula: &str = formula.as_ref();
            match self.sample(formula) {
                Ok(s) => series.push(s),
                Err(e) => {
                    warn!("skipping '{}': {}", formula, e.message);
                    diagnostics.push(Diagnostic {
                        formula: formula.to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        let groups = map_groups(series, &self.options)?;
        Ok(PlotReport {
            groups,
            diagnostics,
        })
    }

    fn sample(&self, formula: &str) -> Result<Series, ParseFailure> {
        let compute = || self.parser.parse(formula).map(|spec| generate(&spec));
        match &self.cache {
            Some(cache) => cache
                .get_or_compute(formula, self.parser.config(), compute)
                .map(|s| Series::clone(&s)),
            None => compute(),
        }
    }
}
