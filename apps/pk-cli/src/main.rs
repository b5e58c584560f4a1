use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use pk_app::{
    AppError, AppResult, RunOptions, RunProgressEvent, RunRequest, RunStage, query, run_service,
    scenario_service,
};
use pk_results::RunStatus;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "pk-cli")]
#[command(about = "pointkin CLI - coupled point-kinetics and lumped thermal transients", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a scenario file
    Validate {
        /// Path to the scenario YAML (or JSON) file
        scenario_path: PathBuf,
    },
    /// Run a scenario
    Run {
        /// Path to the scenario YAML (or JSON) file
        scenario_path: PathBuf,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
    },
    /// List cached runs for a scenario
    Runs {
        /// Path to the scenario file
        scenario_path: PathBuf,
    },
    /// Show details of a cached run
    ShowRun {
        /// Path to the scenario file
        scenario_path: PathBuf,
        /// Run ID to display
        run_id: String,
    },
    /// Export one time series of a run as CSV
    ExportSeries {
        /// Path to the scenario file
        scenario_path: PathBuf,
        /// Run ID
        run_id: String,
        /// Series name: power, reactivity, thermal_power, T:<component>,
        /// precursor:<group> or decay_heat:<group>
        series: String,
        /// Output CSV file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print collapsed kinetics constants
    Kinetics {
        /// Fissile isotope (u235, pu239, u233, u238)
        isotope: String,
        /// Neutron spectrum (thermal, fast)
        spectrum: String,
        /// Delayed neutron precursor groups (0-6)
        #[arg(long, default_value_t = 6)]
        precursor_groups: usize,
        /// Decay heat groups (0-11)
        #[arg(long, default_value_t = 0)]
        decay_heat_groups: usize,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Run {
            scenario_path,
            no_cache,
        } => cmd_run(&scenario_path, !no_cache),
        Commands::Runs { scenario_path } => cmd_runs(&scenario_path),
        Commands::ShowRun {
            scenario_path,
            run_id,
        } => cmd_show_run(&scenario_path, &run_id),
        Commands::ExportSeries {
            scenario_path,
            run_id,
            series,
            output,
        } => cmd_export_series(&scenario_path, &run_id, &series, output.as_deref()),
        Commands::Kinetics {
            isotope,
            spectrum,
            precursor_groups,
            decay_heat_groups,
        } => cmd_kinetics(&isotope, &spectrum, precursor_groups, decay_heat_groups),
    }
}

fn cmd_validate(scenario_path: &Path) -> AppResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = scenario_service::load_scenario(scenario_path)?;
    let summary = scenario_service::summarize(&scenario);
    debug!(scenario = %summary.name, components = summary.component_count, "scenario validated");
    println!("✓ Scenario '{}' is valid", summary.name);
    println!(
        "  {} / {}: {} precursor groups, {} decay heat groups",
        summary.isotope, summary.spectrum, summary.precursor_groups, summary.decay_heat_groups
    );
    println!(
        "  {} components, {} links, {} time points",
        summary.component_count, summary.link_count, summary.steps
    );
    Ok(())
}

fn cmd_run(scenario_path: &Path, use_cache: bool) -> AppResult<()> {
    println!("Running scenario: {}", scenario_path.display());

    let request = RunRequest {
        scenario_path,
        options: RunOptions {
            use_cache,
            ..RunOptions::default()
        },
    };

    let mut last_emit = Instant::now();
    let mut last_fraction = -1.0f64;
    let response = run_service::ensure_run_with_progress(
        &request,
        Some(&mut |event| {
            let fraction = event
                .transient
                .as_ref()
                .map(|t| t.fraction_complete)
                .unwrap_or(-1.0);
            let emit_now = (fraction >= 0.0 && (fraction - last_fraction).abs() >= 0.005)
                || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                if fraction >= 0.0 {
                    last_fraction = fraction;
                }
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();
    info!(
        run_id = %response.run_id,
        cached = response.loaded_from_cache,
        records = response.manifest.records,
        "run ready"
    );

    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", response.run_id);
    } else {
        println!("✓ Run stored: {}", response.run_id);
    }

    print_timing_summary(&response.timing);

    let (manifest, records) = run_service::load_run(scenario_path, &response.run_id)?;
    print_run_summary(&records)?;

    match manifest.status {
        RunStatus::Completed => Ok(()),
        RunStatus::Failed { message } => Err(AppError::Simulation(message)),
    }
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(120));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    match (event.stage, &event.transient) {
        (RunStage::RunningTransient, Some(t)) => {
            let width = 28usize;
            let filled = ((t.fraction_complete * width as f64).round() as usize).min(width);
            let bar = format!(
                "{}{}",
                "#".repeat(filled),
                "-".repeat(width.saturating_sub(filled))
            );
            print!(
                "\r[{}] {:>6.2}%  t={:.4}/{:.4}s  step={}  p={:.4e}  substeps={}  elapsed={:.1}s",
                bar,
                t.fraction_complete * 100.0,
                t.sim_time_s,
                t.t_end_s,
                t.step,
                t.power,
                t.substeps,
                event.elapsed_wall_s
            );
        }
        _ => {
            let spinner = ['|', '/', '-', '\\'];
            let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
            let mut line = format!(
                "\r{} {}  elapsed={:.2}s",
                spinner[spin_idx],
                event.stage.label(),
                event.elapsed_wall_s
            );
            if let Some(msg) = &event.message {
                line.push_str(&format!("  {}", msg));
            }
            print!("{}", line);
        }
    }
    let _ = io::stdout().flush();
}

fn print_timing_summary(timing: &pk_app::RunTimingSummary) {
    let total = timing.total_time_s.max(1.0e-12);

    println!("\nTiming summary:");
    println!(
        "  Compile:  {:.3}s ({:.1}%)",
        timing.compile_time_s,
        100.0 * timing.compile_time_s / total
    );
    println!(
        "  Simulate: {:.3}s ({:.1}%)",
        timing.simulate_time_s,
        100.0 * timing.simulate_time_s / total
    );
    println!(
        "  Save:     {:.3}s ({:.1}%)",
        timing.save_time_s,
        100.0 * timing.save_time_s / total
    );
    if timing.load_cache_time_s > 0.0 {
        println!("  Cache load: {:.3}s", timing.load_cache_time_s);
    }
    println!("  Total:    {:.3}s", timing.total_time_s);
    println!("  Steps:    {}", timing.steps);
}

fn print_run_summary(records: &[pk_results::TimeseriesRecord]) -> AppResult<()> {
    let summary = query::get_run_summary(records)?;
    println!("  Time points: {}", summary.record_count);
    println!(
        "  Time range:  {:.4} - {:.4} s",
        summary.time_range.0, summary.time_range.1
    );
    println!(
        "  Peak power:  {:.6e} at {:.4} s",
        summary.peak_power, summary.peak_power_time_s
    );
    println!("  Final power: {:.6e}", summary.final_power);
    println!("  Components:  {}", summary.component_count);
    Ok(())
}

fn cmd_runs(scenario_path: &Path) -> AppResult<()> {
    let runs = run_service::list_runs(scenario_path)?;

    if runs.is_empty() {
        println!("No cached runs found for {}", scenario_path.display());
    } else {
        println!("Cached runs for '{}':", runs[0].scenario_name);
        for manifest in runs {
            let status = match &manifest.status {
                RunStatus::Completed => "completed".to_string(),
                RunStatus::Failed { message } => format!("failed: {}", message),
            };
            println!("  {} ({}) {}", manifest.run_id, manifest.timestamp, status);
        }
    }
    Ok(())
}

fn cmd_show_run(scenario_path: &Path, run_id: &str) -> AppResult<()> {
    println!("Loading run: {}", run_id);

    let (manifest, records) = run_service::load_run(scenario_path, run_id)?;

    println!("\nRun Summary:");
    println!("  Scenario: {}", manifest.scenario_name);
    println!("  Solver version: {}", manifest.solver_version);
    println!("  Stored: {}", manifest.timestamp);
    if let RunStatus::Failed { message } = &manifest.status {
        println!("  FAILED: {}", message);
    }
    println!(
        "  Groups: {} precursor, {} decay heat",
        manifest.precursor_groups, manifest.decay_heat_groups
    );
    print_run_summary(&records)?;

    println!("\nComponents:");
    for name in query::list_component_names(&records) {
        println!("  {}", name);
    }

    Ok(())
}

fn cmd_export_series(
    scenario_path: &Path,
    run_id: &str,
    series: &str,
    output: Option<&Path>,
) -> AppResult<()> {
    let (_manifest, records) = run_service::load_run(scenario_path, run_id)?;
    let data = query::extract_series(&records, series)?;
    info!(run_id, series, points = data.len(), "exporting series");

    if let Some(path) = output {
        let mut file = io::BufWriter::new(std::fs::File::create(path)?);
        query::write_series_csv(&mut file, series, &data)?;
        file.flush()?;
        println!("✓ Exported {} data points to {}", data.len(), path.display());
    } else {
        let stdout = io::stdout();
        query::write_series_csv(&mut stdout.lock(), series, &data)?;
    }

    Ok(())
}

fn cmd_kinetics(
    isotope: &str,
    spectrum: &str,
    precursor_groups: usize,
    decay_heat_groups: usize,
) -> AppResult<()> {
    let table = query::kinetics_table(isotope, spectrum, precursor_groups, decay_heat_groups)?;

    println!("{} / {}", table.isotope, table.spectrum);
    println!("  generation time: {:.3e} s", table.generation_time_s);
    println!(
        "  beta total:      {:.6e} ({:.1} pcm)",
        table.beta_total,
        table.beta_total * 1e5
    );

    println!("\nDelayed neutron precursors:");
    println!("  {:>5}  {:>12}  {:>12}", "group", "beta_i", "lambda_i [1/s]");
    for (i, (b, l)) in table
        .precursors
        .yields
        .iter()
        .zip(&table.precursors.lambdas)
        .enumerate()
    {
        println!("  {:>5}  {:>12.5e}  {:>12.5e}", i + 1, b, l);
    }

    if !table.decay_heat.is_empty() {
        println!("\nDecay heat:");
        println!("  {:>5}  {:>12}  {:>12}", "group", "kappa_k", "lambda_k [1/s]");
        for (i, (k, l)) in table
            .decay_heat
            .yields
            .iter()
            .zip(&table.decay_heat.lambdas)
            .enumerate()
        {
            println!("  {:>5}  {:>12.5e}  {:>12.5e}", i + 1, k, l);
        }
    }

    Ok(())
}
