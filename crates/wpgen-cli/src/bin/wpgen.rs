//! wpgen: plan INAV waypoint missions between two coordinates.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use wpgen_cli::{plan, render, run_interactive, PlanInput};
use wpgen_core::{
    completion_replies, mission_file_name, DialogueLimits, DistanceModel, PipelineOptions,
};

/// Waypoint generator producing INAV mission files
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Calculate a route from flags and write the mission file
    Plan {
        /// Start point as "lat, lon"
        #[arg(long)]
        from: String,

        /// End point as "lat, lon"
        #[arg(long)]
        to: String,

        /// Number of equal segments
        #[arg(long)]
        segments: String,

        /// One altitude or three comma-separated altitudes in meters
        #[arg(long)]
        altitude: String,

        /// Output path (default: INAV_<user-id>.mission)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Id used in the default file name
        #[arg(long, default_value_t = 0)]
        user_id: i64,

        /// Largest accepted segment count
        #[arg(long, default_value_t = 1000)]
        max_segments: u32,

        /// Use great-circle distances instead of the WGS84 ellipsoid
        #[arg(long)]
        spherical: bool,

        /// Print the full calculation as JSON instead of the report
        #[arg(long)]
        json: bool,
    },
    /// Answer the dialogue prompts on stdin
    Interactive {
        /// Directory for mission files
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Id used in the mission file name
        #[arg(long, default_value_t = 0)]
        user_id: i64,

        /// Use great-circle distances instead of the WGS84 ellipsoid
        #[arg(long)]
        spherical: bool,
    },
}

fn distance_model(spherical: bool) -> DistanceModel {
    if spherical {
        DistanceModel::Spherical
    } else {
        DistanceModel::Ellipsoidal
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Plan {
            from,
            to,
            segments,
            altitude,
            out,
            user_id,
            max_segments,
            spherical,
            json,
        } => {
            let calculation = plan(&PlanInput {
                from,
                to,
                segments,
                altitude,
                max_segments,
                distance_model: distance_model(spherical),
            })?;

            let path = out.unwrap_or_else(|| PathBuf::from(mission_file_name(user_id)));
            std::fs::write(&path, &calculation.mission_xml)
                .with_context(|| format!("failed to write {}", path.display()))?;

            let stdout = io::stdout();
            let mut stdout = stdout.lock();
            if json {
                serde_json::to_writer_pretty(&mut stdout, &calculation)?;
                writeln!(stdout)?;
            } else {
                for reply in completion_replies(&calculation) {
                    writeln!(stdout, "{}", render::reply(&reply))?;
                }
                writeln!(stdout, "Mission file: {}", path.display())?;
            }
        }
        Commands::Interactive {
            out_dir,
            user_id,
            spherical,
        } => {
            let limits = DialogueLimits {
                pipeline: PipelineOptions {
                    distance_model: distance_model(spherical),
                    ..Default::default()
                },
                ..Default::default()
            };
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            let written = run_interactive(stdin.lock(), &mut stdout, &out_dir, user_id, &limits)?;
            eprintln!("{} mission file(s) written", written.len());
        }
    }

    Ok(())
}
