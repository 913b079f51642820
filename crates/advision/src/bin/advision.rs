use std::path::PathBuf;
use std::process::ExitCode;

use advision::batch::run_rectify_config;
use advision::core::{overlay_pose, place_anchor, Pose, PoseColumns};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "advision")]
#[command(about = "Rectify detected banners and place AR anchors")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Rectify every observation listed in a JSON config
    Rectify {
        /// Path to the rectify config (JSON)
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Compute the pose of an anchor in front of the camera
    Place {
        /// Distance along the camera's forward axis, in meters
        #[arg(short, long, allow_negative_numbers = true)]
        distance: f32,

        /// Camera pose as JSON: four columns of four numbers
        #[arg(short, long)]
        pose: Option<String>,

        /// Also print the pose of an overlay plane laid on the anchor
        #[arg(long)]
        overlay: bool,
    },
}

fn init_logging(verbose: u8) {
    // RUST_LOG drives the filter when tracing is on.
    #[cfg(feature = "tracing")]
    {
        let _ = verbose;
        let _ = tracing_log::LogTracer::init();
        advision::core::init_tracing(false);
    }
    #[cfg(not(feature = "tracing"))]
    {
        let level = advision::core::level_from_verbosity(verbose);
        let _ = advision::core::init_with_level(level);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Rectify { config } => {
            let report = run_rectify_config(&config)?;
            println!(
                "rectified {} of {} observations",
                report.succeeded(),
                report.entries.len()
            );
            for entry in &report.entries {
                match (&entry.output_path, &entry.error) {
                    (Some(path), _) => println!("  [{}] {}", entry.index, path),
                    (None, Some(err)) => println!("  [{}] dropped: {}", entry.index, err),
                    (None, None) => {}
                }
            }
        }
        Commands::Place {
            distance,
            pose,
            overlay,
        } => {
            let camera = match pose {
                Some(raw) => Pose::from_columns(serde_json::from_str::<PoseColumns>(&raw)?),
                None => Pose::identity(),
            };
            let anchor = place_anchor(distance, &camera);
            let mut out = serde_json::json!({ "anchor": anchor.to_columns() });
            if overlay {
                out["overlay"] = serde_json::json!(overlay_pose(&anchor).to_columns());
            }
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
