use anyhow::Context;
use clap::Parser;
use generator::profile::{build_reference, build_stream_payload_from_config, GeneratorConfig};
use gui_bridge::bridge::DetectionBridge;
use gui_bridge::model::DetectionViewModel;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Rust-facing preamble detection driver")]
struct Args {
    /// Run a single offline stream and emit a baseline summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, default_value_t = 63)]
    pn_length: usize,
    #[arg(long, default_value_t = 60)]
    window: usize,
    #[arg(long, default_value_t = 5)]
    hypotheses: usize,
    #[arg(long, default_value_t = 20.0)]
    threshold: f32,
    #[arg(long, default_value_t = 7)]
    seed: u64,
    /// Keep the HTTP bridge alive for incoming real-time streams
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(
            args.pn_length,
            args.window,
            args.hypotheses,
            args.threshold,
            args.seed,
        )
    };

    let reference = build_reference(workflow_config.pn_length, workflow_config.seed);
    let runner = Runner::new(workflow_config.clone(), reference.clone());
    let bridge = DetectionBridge::new(Arc::new(runner.clone()));
    let generator_config = GeneratorConfig {
        pn_length: workflow_config.pn_length,
        seed: workflow_config.seed,
        ..Default::default()
    };
    let payload = build_stream_payload_from_config(&generator_config, &reference)?;

    if args.offline {
        let summary = runner.execute(&payload)?;

        println!(
            "Offline run -> frames {}, best score {:.2} (lane {}, offset {:+.5}), first latch {:?}",
            summary.frame_count,
            summary.best_score,
            summary.best_lane,
            summary.best_offset,
            summary.first_latch_chip
        );

        let model = DetectionViewModel {
            max_score_trace: summary.max_score_trace.clone(),
            frame_count: summary.frame_count,
            best_score: summary.best_score,
            best_lane: summary.best_lane,
            best_offset: summary.best_offset,
            notes: Vec::new(),
        };

        bridge.publish(&model)?;
        bridge.publish_status("Offline detection results ready.");

        let report = format!(
            "frames={} best_score={:.3} best_lane={} best_offset={:.6} first_latch={:?} rms={:.4}\n",
            summary.frame_count,
            summary.best_score,
            summary.best_lane,
            summary.best_offset,
            summary.first_latch_chip,
            summary.input_rms
        );
        let report_path = PathBuf::from("tools/data/offline_detection.log");
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(report_path)?;
        file.write_all(report.as_bytes())?;
    }
    if args.serve {
        bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
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
