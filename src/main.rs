//! polyshade CLI: interactive viewer, headless renders, scene files

use std::path::PathBuf;
use clap::{Parser, Subcommand};
use env_logger::Env;

mod commands;
mod viewer;

const DEFAULT_LOGGING_LEVEL: &str = "info";

#[derive(Parser)]
#[command(name = "polyshade")]
#[command(version, about = "Software-rasterized polyhedron lighting viewer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive viewer.
    View {
        /// Scene file (RON). Defaults to the stock cone.
        #[arg(short, long)]
        scene: Option<PathBuf>,
    },

    /// Render a single frame to a PNG.
    Render {
        #[arg(short, long)]
        scene: Option<PathBuf>,

        /// Output PNG path.
        #[arg(short, long, default_value = "frame.png")]
        output: PathBuf,
    },

    /// Render frames while spinning the mesh about the y axis.
    Turntable {
        #[arg(short, long)]
        scene: Option<PathBuf>,

        /// Number of frames.
        #[arg(short, long, default_value_t = 36)]
        frames: usize,

        /// Degrees of rotation between frames.
        #[arg(long, default_value_t = 10.0)]
        step: f32,

        /// Directory for frame_NNNN.png files.
        #[arg(short, long, default_value = "turntable")]
        output_dir: PathBuf,
    },

    /// Plot a parametric ellipse to a PNG.
    Curve {
        /// Sample count.
        #[arg(short, long, default_value_t = 64)]
        n: usize,

        /// Semi-axis along x.
        #[arg(short, long, default_value_t = 200.0)]
        a: f32,

        /// Semi-axis along y.
        #[arg(short, long, default_value_t = 120.0)]
        b: f32,

        /// Rotation in degrees.
        #[arg(short, long, default_value_t = 0.0)]
        rotation: f32,

        #[arg(short, long, default_value = "curve.png")]
        output: PathBuf,
    },

    /// Write the default scene as RON.
    DumpConfig {
        /// Output path. Prints to stdout if omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or(DEFAULT_LOGGING_LEVEL)).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::View { scene } => commands::view(scene.as_deref()),
        Commands::Render { scene, output } => commands::render(scene.as_deref(), &output),
        Commands::Turntable { scene, frames, step, output_dir } => {
            commands::turntable(scene.as_deref(), frames, step, &output_dir)
        }
        Commands::Curve { n, a, b, rotation, output } => commands::curve(n, a, b, rotation, &output),
        Commands::DumpConfig { output } => commands::dump_config(output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
