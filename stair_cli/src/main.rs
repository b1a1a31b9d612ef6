//! # Stairwise CLI
//!
//! Terminal front end for the stair geometry engine. Problems are read as
//! JSON (from a file or `-` for stdin) and results are printed either as a
//! human-readable report or, with `--json`, as JSON for other tools.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum, ValueHint};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use stair_core::calculations::layout::{self, LayoutInput, LayoutResult};
use stair_core::calculations::stringer::{self, StringerCutInput, StringerCutResult};
use stair_core::calculations::{CalculationItem, CalculationOutput};
use stair_core::optimizer::{solve, SolverResult};
use stair_core::profile::StairProfile;
use stair_core::units::{Inches, Millimeters};
use stair_core::{StairError, StairParams, StairProblem};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Stair geometry optimizer and stringer cut calculator",
    long_about = None
)]
struct Cli {
    /// Print results as JSON instead of a report
    #[arg(long, global = true)]
    json: bool,

    /// Show inch equivalents next to millimetres
    #[arg(long, global = true)]
    imperial: bool,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Optimize step count, overhang and pitch for a problem file
    Optimize {
        /// Problem JSON (`-` for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,

        /// Also print stringer cut values
        #[arg(long)]
        cuts: bool,

        /// Also print side-view outline coordinates
        #[arg(long)]
        profile: bool,
    },
    /// Lay out a flight from a known rise, run and step count
    Layout {
        /// Total rise (mm)
        #[arg(long)]
        rise: f64,

        /// Total run (mm)
        #[arg(long)]
        run: f64,

        /// Number of steps
        #[arg(long)]
        steps: u32,

        /// Nosing overhang (mm)
        #[arg(long, default_value_t = 0.0)]
        overhang: f64,
    },
    /// Run a tagged calculation document ({"type": "Optimize" | "Layout" | "Stringer", ...})
    Run {
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
    },
    /// Print an example input document
    Template {
        #[arg(value_enum, default_value_t = TemplateKind::Optimize)]
        kind: TemplateKind,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TemplateKind {
    Optimize,
    Layout,
    Stringer,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match dispatch(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            if cli.json {
                if let Some(stair_err) = err.downcast_ref::<StairError>() {
                    if let Ok(json) = serde_json::to_string_pretty(stair_err) {
                        eprintln!("{json}");
                    }
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cli: &Cli) -> Result<()> {
    let out = Output {
        json: cli.json,
        imperial: cli.imperial,
    };
    match &cli.command {
        Command::Optimize {
            input,
            cuts,
            profile,
        } => handle_optimize(&out, input, *cuts, *profile),
        Command::Layout {
            rise,
            run,
            steps,
            overhang,
        } => {
            let input = LayoutInput {
                label: String::new(),
                total_rise: *rise,
                total_run: *run,
                number_of_steps: *steps,
                overhang: *overhang,
            };
            let result = layout::calculate(&input)?;
            if out.json {
                return print_json(&result);
            }
            print_layout(&out, &result);
            Ok(())
        }
        Command::Run { input } => handle_run(&out, input),
        Command::Template { kind } => print_template(*kind),
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read problem from stdin")?;
        return Ok(buf);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn handle_optimize(out: &Output, path: &Path, with_cuts: bool, with_profile: bool) -> Result<()> {
    let text = read_input(path)?;
    let problem = StairProblem::from_json(&text)
        .with_context(|| format!("invalid problem file {}", path.display()))?;
    debug!(label = %problem.label, "problem loaded");

    let solution = solve(&problem)?;
    let cuts = if with_cuts {
        let input = StringerCutInput::from_solution(&problem.label, &solution, &problem.constants);
        Some(stringer::calculate(&input)?)
    } else {
        None
    };
    let profile = if with_profile {
        Some(StairProfile::new(solution.params.number_of_steps, &solution.derived)?)
    } else {
        None
    };

    if out.json {
        #[derive(Serialize)]
        struct Report<'a> {
            solution: &'a SolverResult,
            #[serde(skip_serializing_if = "Option::is_none")]
            cuts: Option<&'a StringerCutResult>,
            #[serde(skip_serializing_if = "Option::is_none")]
            profile: Option<&'a StairProfile>,
        }
        return print_json(&Report {
            solution: &solution,
            cuts: cuts.as_ref(),
            profile: profile.as_ref(),
        });
    }

    print_solution(out, &problem, &solution);
    if let Some(cuts) = &cuts {
        print_cuts(out, cuts, problem.bounds.min_stringer_thickness);
    }
    if let Some(profile) = &profile {
        print_profile(profile);
    }
    Ok(())
}

fn handle_run(out: &Output, path: &Path) -> Result<()> {
    let text = read_input(path)?;
    let item: CalculationItem = serde_json::from_str(&text)
        .with_context(|| format!("invalid calculation document {}", path.display()))?;
    debug!(kind = item.calc_type(), label = item.label(), "running calculation");

    let output = item.run()?;
    if out.json {
        return print_json(&output);
    }
    match (&item, &output) {
        (CalculationItem::Optimize(problem), CalculationOutput::Optimize { solution, cuts }) => {
            print_solution(out, problem, solution);
            print_cuts(out, cuts, problem.bounds.min_stringer_thickness);
        }
        (_, CalculationOutput::Layout(result)) => print_layout(out, result),
        (_, CalculationOutput::Stringer(cuts)) => print_cuts(out, cuts, 0.0),
        _ => unreachable!("calculation output always matches its item"),
    }
    Ok(())
}

fn print_template(kind: TemplateKind) -> Result<()> {
    let problem = StairProblem::example();
    match kind {
        TemplateKind::Optimize => print_json(&problem),
        TemplateKind::Layout => print_json(&CalculationItem::Layout(LayoutInput {
            label: "Hall stair".to_string(),
            total_rise: 2720.0,
            total_run: 4480.0,
            number_of_steps: 16,
            overhang: 0.0,
        })),
        TemplateKind::Stringer => {
            let input = StringerCutInput::from_params(
                "S-1",
                &StairParams::new(8, 10.0, 40.0),
                &problem.constants,
            )?;
            print_json(&CalculationItem::Stringer(input))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}

// ============================================================================
// Human-readable reports
// ============================================================================

struct Output {
    json: bool,
    imperial: bool,
}

impl Output {
    fn length(&self, mm: f64) -> String {
        if self.imperial {
            let inches: Inches = Millimeters(mm).into();
            format!("{mm:.1} mm ({:.2}\")", inches.0)
        } else {
            format!("{mm:.1} mm")
        }
    }
}

const RULE: &str = "═══════════════════════════════════════";

fn print_solution(out: &Output, problem: &StairProblem, result: &SolverResult) {
    println!("{RULE}");
    if problem.label.is_empty() {
        println!("  STAIR SOLUTION");
    } else {
        println!("  STAIR SOLUTION - {}", problem.label);
    }
    println!("{RULE}");
    println!();
    println!("Design:");
    println!("  Steps:       {}", result.params.number_of_steps);
    println!("  Overhang:    {}", out.length(result.params.overhang));
    println!("  Pitch:       {:.2}°", result.params.inclination_angle);
    println!();
    println!("Geometry:");
    println!("  Step height: {}", out.length(result.derived.step_height));
    println!("  Notch cut:   {}", out.length(result.derived.step_cut_depth));
    println!("  Tread depth: {}", out.length(result.derived.tread_depth));
    println!("  Total rise:  {}", out.length(result.derived.total_rise));
    println!(
        "  Total run:   {} (limit {})",
        out.length(result.derived.total_run),
        out.length(problem.bounds.max_run)
    );
    println!();
    println!(
        "Cost: {:.3} ({} evaluations, {}/{} step counts feasible)",
        result.cost,
        result.stats.evaluations,
        result.stats.step_counts_feasible,
        result.stats.step_counts_tried,
    );
    for candidate in &result.candidates {
        let chosen = candidate.number_of_steps == result.params.number_of_steps;
        let marker = if chosen { "*" } else { " " };
        let note = if candidate.converged { "" } else { "  (iteration limit)" };
        println!(
            "  {marker} {:>3} steps  cost {:>10.3}{note}",
            candidate.number_of_steps, candidate.cost,
        );
    }
    println!();
}

fn print_cuts(out: &Output, cuts: &StringerCutResult, min_thickness: f64) {
    println!("{RULE}");
    println!("  STRINGER CUTS");
    println!("{RULE}");
    println!();
    println!("  Rise cut:        {}", out.length(cuts.rise_cut));
    println!("  Run cut:         {}", out.length(cuts.run_cut));
    println!("  First rise cut:  {}", out.length(cuts.first_rise_cut));
    println!("  Step-off:        {}", out.length(cuts.notch_hypotenuse));
    println!("  Notch depth:     {}", out.length(cuts.notch_depth));
    println!(
        "  Throat:          {} {}",
        out.length(cuts.throat),
        status_icon(cuts.passes(min_thickness))
    );
    println!(
        "  Level cut:       {:.2}°   Plumb cut: {:.2}°",
        cuts.level_cut_angle, cuts.plumb_cut_angle
    );
    println!("  Edge length:     {}", out.length(cuts.edge_length));
    println!("  Board length:    {}", out.length(cuts.board_length));
    println!("  Visible nosing:  {}", out.length(cuts.visible_nosing));
    println!();
    println!("  Step  Riser offset    Seat height     Along edge");
    for mark in &cuts.marks {
        println!(
            "  {:>4}  {:>12.1}  {:>13.1}  {:>13.1}",
            mark.step, mark.riser_offset, mark.seat_height, mark.along_edge
        );
    }
    println!();
}

fn print_layout(out: &Output, result: &LayoutResult) {
    println!("{RULE}");
    println!("  STAIR LAYOUT");
    println!("{RULE}");
    println!();
    println!("  Steps:        {}", result.params.number_of_steps);
    println!("  Step height:  {}", out.length(result.derived.step_height));
    println!("  Going:        {}", out.length(result.derived.step_cut_depth));
    println!("  Tread depth:  {}", out.length(result.derived.tread_depth));
    println!("  Pitch:        {:.2}°", result.params.inclination_angle);
    println!();
    println!("  2h + g = {:.0} mm {}", result.step_formula, status_icon(result.step_formula_ok));
    println!("  h + g  = {:.0} mm {}", result.safety_rule, status_icon(result.safety_rule_ok));
    println!();
}

fn print_profile(profile: &StairProfile) {
    let (min, max) = profile.bounds();
    println!(
        "Profile (x, y) mm, {:.1} wide x {:.1} high:",
        max.x - min.x,
        max.y - min.y
    );
    for p in &profile.outline {
        println!("  {:>9.1} {:>9.1}", p.x, p.y);
    }
    println!();
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}
