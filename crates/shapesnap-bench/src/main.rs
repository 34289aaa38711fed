//! shapesnap-bench: CLI tool for recognizer threshold tuning and diagnostics.
//!
//! Loads recorded strokes from a JSON file, classifies each one with
//! configurable thresholds, and prints a per-stroke diagnostics report.
//! Useful for:
//!
//! - Seeing which rule decided each verdict and which features drove it
//! - Tuning line/closure/ratio thresholds against a corpus of real strokes
//! - Rendering the images an external shape oracle would receive
//!
//! The input file is a JSON array of strokes, each an array of
//! `{"x": .., "y": ..}` points in drawing order.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin shapesnap-bench -- [OPTIONS] <STROKES_PATH>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use shapesnap_engine::diagnostics::verdict_name;
use shapesnap_engine::oracle::render_stroke_png;
use shapesnap_engine::{
    ClassificationDiagnostics, OracleOptions, RecognizerConfig, Stroke, WebClock,
    classify_with_diagnostics,
};

/// Recognizer threshold tuning and diagnostics for shapesnap.
///
/// Classifies every stroke in a JSON file and prints the deciding rule,
/// intermediate features, and per-stage timings.
#[derive(Parser)]
#[command(name = "shapesnap-bench", version)]
struct Cli {
    /// Path to a JSON array of strokes.
    strokes_path: PathBuf,

    /// Strokes with fewer points are never classified.
    #[arg(long, default_value_t = RecognizerConfig::DEFAULT_MIN_POINTS)]
    min_points: usize,

    /// Endpoint gap / path length above which a stroke is a line.
    #[arg(long, default_value_t = RecognizerConfig::DEFAULT_LINE_RATIO)]
    line_ratio: f64,

    /// Endpoint gap / path length above which a stroke is too open.
    #[arg(long, default_value_t = RecognizerConfig::DEFAULT_CLOSURE_RATIO)]
    closure_ratio: f64,

    /// Minimum resampling spacing.
    #[arg(long, default_value_t = RecognizerConfig::DEFAULT_MIN_SPACING)]
    min_spacing: f64,

    /// Resampling spacing is the bounding-box diagonal divided by this.
    #[arg(long, default_value_t = RecognizerConfig::DEFAULT_SPACING_DIVISOR)]
    spacing_divisor: f64,

    /// Straw half-window, in resampled steps.
    #[arg(long, default_value_t = RecognizerConfig::DEFAULT_STRAW_WINDOW, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    straw_window: usize,

    /// Straw threshold as a fraction of the straight-line window span.
    #[arg(long, default_value_t = RecognizerConfig::DEFAULT_STRAW_RATIO)]
    straw_ratio: f64,

    /// Corners fewer than this many resampled steps apart are merged.
    #[arg(long, default_value_t = RecognizerConfig::DEFAULT_CORNER_MERGE_GAP)]
    corner_merge_gap: usize,

    /// A last corner this close to the first across the seam is dropped.
    #[arg(long, default_value_t = RecognizerConfig::DEFAULT_WRAPAROUND_GAP)]
    wraparound_gap: usize,

    /// Radius ratio below which a corner-free stroke is a circle.
    #[arg(long, default_value_t = RecognizerConfig::DEFAULT_SMOOTH_CIRCLE_RADIUS_RATIO)]
    smooth_circle_radius_ratio: f64,

    /// Radius ratio below which any fallback stroke is a circle.
    #[arg(long, default_value_t = RecognizerConfig::DEFAULT_CIRCLE_RADIUS_RATIO)]
    circle_radius_ratio: f64,

    /// Area ratio above which a fallback stroke is a rectangle.
    #[arg(long, default_value_t = RecognizerConfig::DEFAULT_RECTANGLE_AREA_RATIO)]
    rectangle_area_ratio: f64,

    /// Area ratio below which a fallback stroke is a triangle.
    #[arg(long, default_value_t = RecognizerConfig::DEFAULT_TRIANGLE_AREA_RATIO)]
    triangle_area_ratio: f64,

    /// Full recognizer config as a JSON string.
    ///
    /// When provided, all other threshold flags are ignored. Missing
    /// fields take their default values.
    #[arg(long)]
    config_json: Option<String>,

    /// Write each stroke's oracle request image into this directory.
    #[arg(long)]
    render_dir: Option<PathBuf>,

    /// Output diagnostics as JSON instead of human-readable reports.
    #[arg(long)]
    json: bool,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(short, long)]
    verbose: bool,
}

/// Build a [`RecognizerConfig`] from CLI arguments and validate it.
///
/// If `--config-json` is provided, the JSON is parsed directly and all
/// individual threshold flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<RecognizerConfig, String> {
    let config = if let Some(ref json) = cli.config_json {
        serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"))?
    } else {
        RecognizerConfig {
            min_points: cli.min_points,
            line_ratio: cli.line_ratio,
            closure_ratio: cli.closure_ratio,
            min_spacing: cli.min_spacing,
            spacing_divisor: cli.spacing_divisor,
            straw_window: cli.straw_window,
            straw_ratio: cli.straw_ratio,
            corner_merge_gap: cli.corner_merge_gap,
            wraparound_gap: cli.wraparound_gap,
            smooth_circle_radius_ratio: cli.smooth_circle_radius_ratio,
            circle_radius_ratio: cli.circle_radius_ratio,
            rectangle_area_ratio: cli.rectangle_area_ratio,
            triangle_area_ratio: cli.triangle_area_ratio,
        }
    };
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn load_strokes(path: &Path) -> Result<Vec<Stroke>, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading {}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("Error parsing {}: {e}", path.display()))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let strokes = match load_strokes(&cli.strokes_path) {
        Ok(s) => s,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    eprintln!(
        "Strokes: {} ({} loaded)",
        cli.strokes_path.display(),
        strokes.len(),
    );
    eprintln!("Config: {config:#?}");
    eprintln!();

    if let Some(ref dir) = cli.render_dir
        && let Err(e) = std::fs::create_dir_all(dir)
    {
        eprintln!("Error creating {}: {e}", dir.display());
        return ExitCode::FAILURE;
    }

    let mut all_diagnostics = Vec::with_capacity(strokes.len());

    for (index, stroke) in strokes.iter().enumerate() {
        let (_, diagnostics) = classify_with_diagnostics(stroke.points(), &config, &WebClock);

        if cli.json {
            match serde_json::to_string_pretty(&diagnostics) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("Error serializing diagnostics: {e}");
                    return ExitCode::FAILURE;
                }
            }
        } else {
            println!("Stroke {index}");
            println!("{}", diagnostics.report());
            println!();
        }

        if let Some(ref dir) = cli.render_dir {
            write_render(dir, index, stroke);
        }

        all_diagnostics.push(diagnostics);
    }

    if !cli.json && !all_diagnostics.is_empty() {
        print_summary(&all_diagnostics);
    }

    ExitCode::SUCCESS
}

/// Write the oracle request image for one stroke. Failures are reported
/// and skipped; a stroke too short to render is not an error for the run.
fn write_render(dir: &Path, index: usize, stroke: &Stroke) {
    let options = OracleOptions::default();
    let png = match render_stroke_png(stroke.points(), options.size, options.line_width) {
        Ok(png) => png,
        Err(e) => {
            log::warn!("stroke {index}: {e}");
            return;
        }
    };
    let path = dir.join(format!("stroke-{index:04}.png"));
    match std::fs::write(&path, &png) {
        Ok(()) => eprintln!("PNG written to {} ({} bytes)", path.display(), png.len()),
        Err(e) => eprintln!("Error writing PNG to {}: {e}", path.display()),
    }
}

/// Print verdict and rule counts plus timing across all strokes.
#[allow(clippy::cast_precision_loss)]
fn print_summary(all_diagnostics: &[ClassificationDiagnostics]) {
    println!("Summary ({} strokes)\n{}", all_diagnostics.len(), "=".repeat(60));

    let durations: Vec<f64> = all_diagnostics
        .iter()
        .map(|d| d.total_duration.as_secs_f64() * 1000.0)
        .collect();
    let min = durations.iter().copied().reduce(f64::min).unwrap_or(0.0);
    let max = durations.iter().copied().reduce(f64::max).unwrap_or(0.0);
    let mean = durations.iter().sum::<f64>() / durations.len().max(1) as f64;
    println!("Duration: min={min:.3}ms  mean={mean:.3}ms  max={max:.3}ms");

    let mut verdicts: BTreeMap<String, usize> = BTreeMap::new();
    let mut rules: BTreeMap<&'static str, usize> = BTreeMap::new();
    for d in all_diagnostics {
        *verdicts.entry(verdict_name(&d.verdict)).or_default() += 1;
        *rules.entry(d.rule.describe()).or_default() += 1;
    }

    println!();
    println!("{:<40} {:>8}", "Verdict", "Count");
    println!("{}", "-".repeat(50));
    for (name, count) in &verdicts {
        println!("{name:<40} {count:>8}");
    }

    println!();
    println!("{:<40} {:>8}", "Rule", "Count");
    println!("{}", "-".repeat(50));
    for (rule, count) in &rules {
        println!("{rule:<40} {count:>8}");
    }
}
