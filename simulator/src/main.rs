use anyhow::Context;
use clap::Parser;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Offline driver for the AoA evaluation core")]
struct Args {
    /// Run an offline capture batch and report per-frame estimates
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Target azimuth in degrees
    #[arg(long, default_value_t = 30.0)]
    azimuth: f32,
    /// Target elevation in degrees
    #[arg(long, default_value_t = 10.0)]
    elevation: f32,
    /// Number of frames to synthesize
    #[arg(long, default_value_t = 8)]
    frames: usize,
    /// Emit the run summary as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.azimuth, args.elevation, args.frames)
    };

    let runner = Runner::new(workflow_config.clone());

    if args.offline {
        let summary = runner.execute()?;

        if args.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!(
                "Offline run @ {} MHz -> {} frames, {} errors",
                summary.frequency_mhz, summary.processed, summary.errors
            );
            for record in &summary.records {
                println!(
                    "frame {:>3}: raw ({:7.2}, {:7.2})  filtered ({:7.2}, {:7.2})",
                    record.frame,
                    record.raw.azimuth,
                    record.raw.elevation,
                    record.filtered.azimuth,
                    record.filtered.elevation
                );
            }
        }

        let report = format!(
            "target=({:.1},{:.1}) frames={} errors={} last_duration_us={}\n",
            workflow_config.azimuth,
            workflow_config.elevation,
            summary.processed,
            summary.errors,
            summary.last_duration_us
        );
        let report_path = PathBuf::from("tools/data/offline_estimates.log");
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(report_path)
            .context("opening offline report log")?;
        file.write_all(report.as_bytes())?;
    }

    Ok(())
}
