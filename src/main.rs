//! Headless reel planner and simulator.
//!
//! `reel plan` prints the clone plan for a container and item widths,
//! `reel simulate` runs a reel on an in-memory track and prints one JSON
//! line per frame, `reel schema` prints the options JSON Schema and
//! `reel defaults` the default options as TOML.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use reel::animation::Timeline;
use reel::fill::{compute_fill_plan, FillPolicy};
use reel::host::MemoryHost;
use reel::{PluginRegistry, ReelError, ReelOptions, Reeller};

#[derive(Parser)]
#[command(name = "reel")]
#[command(version, about = "Plan and simulate seamless marquee tracks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the clone plan as JSON
    Plan {
        /// Container width in pixels
        #[arg(short = 'w', long)]
        container_width: f64,
        /// Item widths, margins included (comma separated)
        #[arg(short, long, value_delimiter = ',', required = true)]
        items: Vec<f64>,
        /// Clones alone must cover the container
        #[arg(long)]
        overflow: bool,
        /// Round the clone count up to a whole cycle
        #[arg(long)]
        finish: bool,
        /// Minimum number of clones
        #[arg(long, default_value_t = 0)]
        min: usize,
    },
    /// Run a reel on an in-memory track, one JSON line per frame
    Simulate {
        /// Options file (TOML); defaults when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Container width in pixels
        #[arg(short = 'w', long)]
        container_width: f64,
        /// Item widths, margins included (comma separated)
        #[arg(short, long, value_delimiter = ',', required = true)]
        items: Vec<f64>,
        /// Number of frames
        #[arg(short, long, default_value_t = 60)]
        frames: usize,
        /// Seconds per frame
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f64,
        /// Page scroll position per frame (comma separated); the last value
        /// holds for the remaining frames
        #[arg(long, value_delimiter = ',')]
        scroll: Vec<f64>,
    },
    /// Print the options JSON Schema
    Schema,
    /// Print the default options as TOML
    Defaults,
}

#[derive(Serialize)]
struct FrameRecord {
    frame: usize,
    offset: Option<f64>,
    time_scale: f64,
    progress: f64,
    paused: bool,
}

fn simulate(
    config: Option<&Path>,
    container_width: f64,
    items: &[f64],
    frames: usize,
    dt: f64,
    scroll: &[f64],
) -> Result<(), ReelError> {
    let mut options = match config {
        Some(path) => ReelOptions::load(path)?,
        None => ReelOptions::default(),
    };
    let container = options.container.get_or_insert_with(|| "#reel".to_owned()).clone();
    let mut host = MemoryHost::new(&container, container_width).with_items(items);
    if let Some(wrapper) = &options.wrapper {
        host = host.with_wrapper(wrapper);
    }
    if let Some(&first) = scroll.first() {
        host.set_scroll_position(first);
    }

    let mut reel = Reeller::new(host, options, &PluginRegistry::with_builtins())?;
    for err in reel.plugin_errors() {
        log::warn!("{err}");
    }
    log::info!(
        "{} items, {} clones",
        reel.filler().item_count(),
        reel.filler().clones_count()
    );
    // The in-memory container is always on screen.
    let _ = reel.on_visibility(true);

    for frame in 0..frames {
        if let Some(&y) = scroll.get(frame).or_else(|| scroll.last()) {
            reel.host_mut().set_scroll_position(y);
        }
        let offset = reel.tick(dt);
        let record = FrameRecord {
            frame,
            offset,
            time_scale: reel.timeline().time_scale(),
            progress: reel.timeline().progress(),
            paused: reel.is_paused(),
        };
        let line = serde_json::to_string(&record)
            .map_err(|e| ReelError::OptionsParse(e.to_string()))?;
        println!("{line}");
    }
    reel.destroy(false, false);
    Ok(())
}

fn run(cli: Cli) -> Result<(), ReelError> {
    match cli.command {
        Command::Plan {
            container_width,
            items,
            overflow,
            finish,
            min,
        } => {
            let plan = compute_fill_plan(
                container_width,
                &items,
                FillPolicy {
                    overflow,
                    finish_cycle: finish,
                    minimum_clones: min,
                },
            );
            let json = serde_json::to_string_pretty(&plan)
                .map_err(|e| ReelError::OptionsParse(e.to_string()))?;
            println!("{json}");
        }
        Command::Simulate {
            config,
            container_width,
            items,
            frames,
            dt,
            scroll,
        } => simulate(
            config.as_deref(),
            container_width,
            &items,
            frames,
            dt,
            &scroll,
        )?,
        Command::Schema => {
            let json = serde_json::to_string_pretty(&ReelOptions::json_schema())
                .map_err(|e| ReelError::OptionsParse(e.to_string()))?;
            println!("{json}");
        }
        Command::Defaults => {
            let text = toml::to_string_pretty(&ReelOptions::default())
                .map_err(|e| ReelError::OptionsParse(e.to_string()))?;
            println!("{text}");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
