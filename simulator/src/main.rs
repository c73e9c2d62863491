use anyhow::Context;
use cellcore::prelude::OperatingMode;
use clap::Parser;
use export::{open_output, render_dashboard, render_series, write_series, write_snapshot};
use gui_bridge::bridge::{GuiBridge, DEFAULT_PORT};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::{default_cells, WorkflowConfig};
use workflow::runner::{Metric, Runner};
use workflow::tasks::TaskKind;

mod export;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Synthetic battery cell telemetry driver")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Cell types to simulate, comma separated (e.g. lfp,nmc,nca)
    #[arg(long, value_delimiter = ',')]
    cells: Option<Vec<String>>,
    /// Operating mode: idle, charging or discharging
    #[arg(long)]
    mode: Option<OperatingMode>,
    /// Seed the generator for repeatable output
    #[arg(long)]
    seed: Option<u64>,
    /// Drop repeated cell types, keeping the first of each
    #[arg(long, default_value_t = false)]
    dedupe: bool,
    /// Generate a single dashboard snapshot
    #[arg(long, default_value_t = false)]
    dashboard: bool,
    /// Stream dashboard frames on the configured interval
    #[arg(long, default_value_t = false)]
    realtime: bool,
    /// Sample aggregates across modes for the performance view
    #[arg(long, default_value_t = false)]
    performance: bool,
    /// Metric printed for the performance view
    #[arg(long, default_value = "Avg Voltage")]
    metric: Metric,
    /// Schedule and execute a pack task
    #[arg(long, value_enum)]
    task: Option<TaskKind>,
    /// Task duration in minutes (1-120)
    #[arg(long, default_value_t = 30)]
    task_minutes: u32,
    /// Write the dashboard snapshot as CSV ("-" for stdout)
    #[arg(long)]
    export: Option<PathBuf>,
    /// Write the performance series as CSV ("-" for stdout)
    #[arg(long)]
    series_export: Option<PathBuf>,
    /// Keep the GUI bridge alive for front-end requests
    #[arg(long, default_value_t = false)]
    serve: bool,
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,
}

fn build_config(args: &Args) -> anyhow::Result<WorkflowConfig> {
    let mut config = match &args.workflow {
        Some(path) => {
            let mut loaded = WorkflowConfig::load(path)?;
            if let Some(cells) = &args.cells {
                loaded.cells = cells.clone();
            }
            if let Some(mode) = args.mode {
                loaded.mode = mode;
            }
            loaded
        }
        None => WorkflowConfig::from_args(
            args.cells.clone().unwrap_or_else(default_cells),
            args.mode.unwrap_or_default(),
        ),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.dedupe {
        config.dedupe = true;
    }
    if args.export.is_some() {
        config.export = args.export.clone();
    }
    if args.series_export.is_some() {
        config.series_export = args.series_export.clone();
    }
    config.validate().context("validating workflow config")?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = build_config(&args)?;
    let runner = Arc::new(Runner::new(workflow_config.clone()));
    let gui_bridge = GuiBridge::new(runner.clone());
    let mut rng = workflow_config.rng();

    if args.serve {
        gui_bridge.serve(args.port);
    }

    let any_flow = args.dashboard || args.realtime || args.performance || args.task.is_some();
    if args.dashboard || (!any_flow && !args.serve) {
        let result = runner.run_dashboard(&mut rng)?;
        print!("{}", render_dashboard(&result));
        gui_bridge.publish(&result);

        if let Some(path) = &workflow_config.export {
            let writer = open_output(path)?;
            write_snapshot(writer, &result.snapshot, true)
                .with_context(|| format!("exporting snapshot to {}", path.display()))?;
            gui_bridge.publish_status(&format!("Snapshot exported to {}", path.display()));
        }
        gui_bridge.publish_status("Dashboard generated successfully!");
    }

    if args.realtime {
        let total = workflow_config.realtime.iterations;
        runner.run_realtime(&mut rng, |iteration, frame| {
            println!("--- frame {}/{} ---", iteration + 1, total);
            print!("{}", render_dashboard(frame));
            gui_bridge.publish(frame);
            Ok(())
        })?;
        gui_bridge.publish_status("Real-time monitoring session completed.");
    }

    if args.performance {
        let result = runner.run_performance(&mut rng)?;
        print!("{}", render_series(&result, args.metric));
        gui_bridge.publish_series(&result);

        if let Some(path) = &workflow_config.series_export {
            let writer = open_output(path)?;
            write_series(writer, &result.records)
                .with_context(|| format!("exporting series to {}", path.display()))?;
            gui_bridge.publish_status(&format!("Series exported to {}", path.display()));
        }
    }

    if let Some(kind) = args.task {
        let outcome = runner.run_task(kind, args.task_minutes)?;
        gui_bridge.publish_status(&outcome.message);
        if let Some(mode) = outcome.mode {
            gui_bridge.publish_status(&format!(
                "{} task left the pack {}",
                outcome.task.kind, mode
            ));
        }
    }

    if args.serve {
        gui_bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
