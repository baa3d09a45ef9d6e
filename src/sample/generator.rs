use crate::formula::{FamilyParams, PlotSpec};
use crate::sample::types::{Sample, Series};

/// Sample `spec` over its domain.
///
/// Points where the function is undefined or not finite are left out; the
/// result may be empty.
pub fn generate(spec: &PlotSpec) -> Series {
    let domain = &spec.domain;

    let samples: Vec<Sample> = match &spec.params {
        FamilyParams::Quadratic { a, b, c } => closed_form(spec, |x| a * x * x + b * x + c),
        FamilyParams::Linear { m, b } => closed_form(spec, |x| m * x + b),
        FamilyParams::Sine {
            amplitude,
            frequency,
            phase,
        } => closed_form(spec, |x| amplitude * (frequency * x + phase).sin()),
        FamilyParams::Cosine {
            amplitude,
            frequency,
            phase,
        } => closed_form(spec, |x| amplitude * (frequency * x + phase).cos()),
        FamilyParams::Exponential { a, b } => closed_form(spec, |x| a * (b * x).exp()),
        FamilyParams::Logarithmic { a, b } => domain
            .points()
            .filter(|&x| x > 0.0)
            .filter_map(|x| Sample::finite(x, a * x.ln() + b))
            .collect(),
        FamilyParams::Polar { scale, multiplier } => domain
            .points()
            .filter_map(|degrees| {
                let theta = degrees.to_radians();
                let r = scale * (multiplier * theta).sin().abs();
                Sample::finite(r * theta.cos(), r * theta.sin())
            })
            .collect(),
        FamilyParams::GenericExpression { expression } => domain
            .points()
            .filter_map(|x| expression.evaluate(x).ok().and_then(|y| Sample::finite(x, y)))
            .collect(),
    };

    Series {
        label: spec.source.clone(),
        family: spec.family(),
        samples,
    }
}

fn closed_form(spec: &PlotSpec, f: impl Fn(f64) -> f64) -> Vec<Sample> {
    spec.domain
        .points()
        .filter_map(|x| Sample::finite(x, f(x)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{parse, FormulaFamily};
    use approx::assert_relative_eq;

    const CLOSED_FORMS: &[FormulaFamily] = &[
        FormulaFamily::Quadratic,
        FormulaFamily::Linear,
        FormulaFamily::Sine,
        FormulaFamily::Cosine,
        FormulaFamily::Polar,
        FormulaFamily::Exponential,
        FormulaFamily::Logarithmic,
    ];

    #[test]
    fn test_default_specs_sample_full_grid() {
        for &family in CLOSED_FORMS {
            let spec = PlotSpec::default_for(family).unwrap();
            let d = spec.domain;
            let grid = ((d.max - d.min) / d.step).floor() as usize + 1;
            let excluded = if family == FormulaFamily::Logarithmic {
                d.points().filter(|&x| x <= 0.0).count()
            } else {
                0
            };
            let series = generate(&spec);
            assert!(!series.is_empty(), "{} produced no samples", family);
            assert_eq!(series.len(), grid - excluded, "{}", family);
        }
    }

    #[test]
    fn test_linear_end_to_end() {
        let series = generate(&parse("linear:2,3,-1,1,1").unwrap());
        assert_eq!(
            series.samples,
            vec![Sample::new(-1.0, 1.0), Sample::new(0.0, 3.0), Sample::new(1.0, 5.0)]
        );
        assert_eq!(series.label, "linear:2,3,-1,1,1");
    }

    #[test]
    fn test_exponential_end_to_end() {
        let series = generate(&parse("y=2*e^(0.5x):-4,4,4").unwrap());
        let xs: Vec<f64> = series.samples.iter().map(|s| s.x).collect();
        assert_eq!(xs, vec![-4.0, 0.0, 4.0]);
        assert_relative_eq!(series.samples[0].y, 2.0 * (-2.0f64).exp());
        assert_relative_eq!(series.samples[1].y, 2.0);
        assert_relative_eq!(series.samples[2].y, 2.0 * 2.0f64.exp());
    }

    #[test]
    fn test_logarithmic_skips_non_positive() {
        let series = generate(&parse("log:1,0,-2,2,1").unwrap());
        let xs: Vec<f64> = series.samples.iter().map(|s| s.x).collect();
        assert_eq!(xs, vec![1.0, 2.0]);
    }

    #[test]
    fn test_polar_is_cartesian() {
        let series = generate(&parse("polar:2,1,90,90,1").unwrap());
        // degenerate 90..90 widens to 80..100 degrees
        let top = series
            .samples
            .iter()
            .find(|s| s.x.abs() < 1e-9)
            .expect("sample at 90 degrees");
        assert_relative_eq!(top.y, 2.0);
        for s in &series.samples {
            assert!(s.x.hypot(s.y) <= 2.0 + 1e-12);
        }
    }

    #[test]
    fn test_expression_drops_failed_samples() {
        let series = generate(&parse("expr:1/x:-2,2,1").unwrap());
        let xs: Vec<f64> = series.samples.iter().map(|s| s.x).collect();
        assert_eq!(xs, vec![-2.0, -1.0, 1.0, 2.0]);
    }

    #[test]
    fn test_expression_may_be_empty() {
        let series = generate(&parse("expr:sqrt(x):-5,-1,1").unwrap());
        assert!(series.is_empty());
    }

    #[test]
    fn test_exponential_overflow_dropped() {
        let series = generate(&parse("exp:1,1,700,720,10").unwrap());
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_deterministic() {
        let spec = parse("sine:2,3,0.5").unwrap();
        assert_eq!(generate(&spec), generate(&spec));
    }
}
