//! Solstice CLI
//!
//! Headless driver for the sun/moon theme toggle:
//! - `sample` prints the morphed body path at a given progress
//! - `run` executes a JSON scenario and reports the resulting state
//! - `svg` renders a single icon frame
//! - `config` prints the effective configuration

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use solstice_cli::{run_scenario, RunOptions, RunReport, Scenario};
use solstice_toggle::{
    render_svg, ClipCircle, DecorationAnimator, DecorationTable, IconState, PathMorpher, PoseKey,
    ToggleConfig, ToggleFrame,
};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "solstice")]
#[command(author, version, about = "Sun/moon theme toggle, headless", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Toggle configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the interpolated body path
    Sample {
        /// Morph progress, 0 = sun and 1 = moon
        #[arg(short, long, default_value = "0.5")]
        progress: f32,
    },

    /// Run a JSON scenario against a headless toggle
    Run {
        /// Scenario file
        scenario: PathBuf,

        /// Frames per second used to pace ticks
        #[arg(long, default_value = "60")]
        fps: u32,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render one icon frame as an SVG document
    Svg {
        /// Morph progress, 0 = sun and 1 = moon
        #[arg(short, long, default_value = "0")]
        progress: f32,

        /// Decoration pose (sun, sun-hover, moon, moon-hover)
        #[arg(long)]
        pose: Option<PoseKey>,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Sample { progress } => cmd_sample(&config, progress),
        Commands::Run { scenario, fps, json } => cmd_run(&config, &scenario, fps, json),
        Commands::Svg {
            progress,
            pose,
            output,
        } => cmd_svg(&config, progress, pose, output.as_deref()),
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "solstice=debug" } else { "solstice=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ToggleConfig> {
    match path {
        Some(path) => {
            info!("Loading config from {}", path.display());
            ToggleConfig::load(path).with_context(|| format!("Invalid config {}", path.display()))
        }
        None => Ok(ToggleConfig::default()),
    }
}

fn morpher(config: &ToggleConfig) -> Result<PathMorpher> {
    PathMorpher::new(
        &config.path.sun,
        &config.path.moon,
        config.path.max_segment_length,
        config.morph_options(),
        IconState::Sun,
    )
    .context("Failed to build body morph")
}

fn cmd_sample(config: &ToggleConfig, progress: f32) -> Result<()> {
    let morph = morpher(config)?;
    let t = progress.clamp(0.0, 1.0);
    info!(
        "Sampling {} points at progress {}",
        morph.interpolator().point_count(),
        t
    );
    println!("{}", morph.interpolator().at(t));
    Ok(())
}

fn cmd_run(config: &ToggleConfig, path: &Path, fps: u32, json: bool) -> Result<()> {
    let scenario = Scenario::from_path(path)?;
    info!(
        "Running {} ({} steps at {} fps)",
        path.display(),
        scenario.steps.len(),
        fps
    );

    let report = run_scenario(&scenario, config.clone(), RunOptions::from_fps(fps))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &RunReport) {
    println!(
        "{} frames, {:.0} ms simulated",
        report.frames, report.elapsed_ms
    );
    for step in &report.steps {
        let plan = step
            .plan
            .map(|plan| format!(" plan={:?}", plan))
            .unwrap_or_default();
        println!(
            "  [{:>3}] {:>8.0} ms  {:<13} icon={:?} complete={} resolved={}{}",
            step.index,
            step.elapsed_ms,
            step.step,
            step.icon,
            step.animation_complete,
            step.resolved,
            plan
        );
    }
    println!();
    println!("Icon:      {:?} ({})", report.icon, report.pose);
    println!("Complete:  {}", report.animation_complete);
    println!("Progress:  {:.3}", report.progress);
    println!("Theme:     {} (resolved {})", report.theme, report.resolved);
    if let Some(reveal) = report.last_reveal {
        let clip = ClipCircle {
            center: solstice_core::Point::new(reveal.center[0], reveal.center[1]),
            radius: reveal.max_radius,
        };
        println!("Reveal:    {}", clip.to_css());
    }
    println!(
        "Reveals:   {} requested, {} started, {} finished, {} skipped, {} aborted",
        report.stats.reveals_requested,
        report.stats.reveals_started,
        report.stats.reveals_finished,
        report.stats.reveals_skipped,
        report.stats.reveals_aborted
    );
}

fn cmd_svg(
    config: &ToggleConfig,
    progress: f32,
    pose: Option<PoseKey>,
    output: Option<&Path>,
) -> Result<()> {
    let morph = morpher(config)?;
    let t = progress.clamp(0.0, 1.0);
    let icon = if t < 0.5 { IconState::Sun } else { IconState::Moon };
    let pose = pose.unwrap_or(PoseKey::rest(icon));

    let decoration = DecorationAnimator::new(
        DecorationTable::with_ray_stagger(config.decoration.ray_stagger_ms),
        pose,
    );
    let frame = ToggleFrame {
        icon,
        animation_complete: true,
        pose,
        progress: t,
        body_path: morph.interpolator().at(t),
        elements: decoration.geometries(),
        clip: None,
    };
    let svg = render_svg(&frame);

    match output {
        Some(path) => {
            std::fs::write(path, svg)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", svg),
    }
    Ok(())
}
