use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use log::{debug, LevelFilter};
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

use formplot::formula::numeric::parse_list;
use formplot::formula::RangeOverride;
use formplot::mapping::AxisScale;
use formplot::persistence::config::{load_config, AppConfig};
use formplot::plot::{render_png, render_svg, to_csv, to_json, PlotAggregator, RenderStyle, SeriesCache};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Png,
    Svg,
    Csv,
    Json,
}

/// Sample and map formula strings, then render or export the curves.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Formula to plot, e.g. "y=x^2" or "sine:2,1,0" (repeatable)
    #[arg(short, long = "expression", value_name = "FORMULA")]
    expressions: Vec<String>,

    /// File with one formula per line ("-" reads stdin); blank lines and
    /// lines starting with '#' are skipped
    #[arg(short, long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Default x range for formulas that give none, as MIN,MAX,STEP
    #[arg(long, value_name = "MIN,MAX,STEP", allow_hyphen_values = true)]
    range: Option<String>,

    /// Base-10 logarithmic x axis
    #[arg(long)]
    logscale_x: bool,

    /// Base-10 logarithmic y axis
    #[arg(long)]
    logscale_y: bool,

    /// Draw a grid behind the curves
    #[arg(long)]
    grid: bool,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    #[arg(long)]
    margin: Option<u32>,

    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Output path; stdout when omitted (required for png)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Config file (default: <config dir>/formplot/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Debug-level logging
    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug { LevelFilter::Debug } else { LevelFilter::Warn };
    CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )])?;

    let mut config = load_config(cli.config.as_deref());
    apply_overrides(&cli, &mut config)?;
    debug!("effective config: {:?}", config);

    let formulas = collect_formulas(&cli)?;
    if formulas.is_empty() {
        bail!("no formulas given; use -e/--expression or -f/--file");
    }

    let mut aggregator = PlotAggregator::new(config.parser.clone(), config.plot);
    if config.cache_capacity > 0 {
        aggregator = aggregator.with_cache(Arc::new(SeriesCache::new(config.cache_capacity)));
    }
    let report = aggregator.run(&formulas)?;

    for diagnostic in &report.diagnostics {
        eprintln!("skipped {}: {}", diagnostic.formula, diagnostic.message);
    }

    let style = RenderStyle {
        grid: config.grid,
        frame: true,
    };
    match cli.format {
        Format::Png => {
            let Some(path) = &cli.output else {
                bail!("--format png needs --output <PATH>");
            };
            let png = render_png(&report.groups, &config.plot, &style).map_err(anyhow::Error::msg)?;
            std::fs::write(path, png).with_context(|| format!("writing {}", path.display()))?;
        }
        Format::Svg => {
            let svg = render_svg(&report.groups, &config.plot, &style).map_err(anyhow::Error::msg)?;
            write_text(cli.output.as_ref(), &svg)?;
        }
        Format::Csv => write_text(cli.output.as_ref(), &to_csv(&report.groups)?)?,
        Format::Json => write_text(cli.output.as_ref(), &to_json(&report.groups)?)?,
    }

    Ok(())
}

/// Command-line flags win over the config file.
fn apply_overrides(cli: &Cli, config: &mut AppConfig) -> anyhow::Result<()> {
    if let Some(range) = &cli.range {
        let values = parse_list(range, &config.parser);
        if values.len() != 3 || values.iter().all(Option::is_none) {
            bail!("--range expects MIN,MAX,STEP, got '{}'", range);
        }
        config.parser.default_range = Some(RangeOverride::from_values(&values));
    }
    if cli.logscale_x {
        config.plot.axis_scale_x = AxisScale::Log;
    }
    if cli.logscale_y {
        config.plot.axis_scale_y = AxisScale::Log;
    }
    if cli.grid {
        config.grid = true;
    }
    if let Some(width) = cli.width {
        config.plot.draw_width = width;
    }
    if let Some(height) = cli.height {
        config.plot.draw_height = height;
    }
    if let Some(margin) = cli.margin {
        config.plot.margin = margin;
    }
    Ok(())
}

fn collect_formulas(cli: &Cli) -> anyhow::Result<Vec<String>> {
    let mut formulas = cli.expressions.clone();
    if let Some(path) = &cli.file {
        let text = if path.as_os_str() == "-" {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            buf
        } else {
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
        };
        formulas.extend(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_string),
        );
    }
    Ok(formulas)
}

fn write_text(path: Option<&PathBuf>, text: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => std::fs::write(path, text).with_context(|| format!("writing {}", path.display())),
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}
