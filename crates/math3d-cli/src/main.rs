//! math3d CLI
//!
//! Evaluates a single kernel operation on a fresh stack instance and prints
//! every value it pushed.

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use math3d_core::{BoxStack, DepthRange, StackConfig};

mod commands;

#[derive(Parser)]
#[command(name = "math3d")]
#[command(version, about = "Evaluate math3d kernel operations")]
struct Cli {
    /// Log degenerate inputs and arena activity.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Build projections with clip-space Z in [-1, 1] instead of [0, 1].
    #[arg(long, global = true)]
    homogeneous_depth: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Vectors, quaternions and matrices are comma-separated floats;
/// quaternions are x,y,z,w and matrices are 16 column-major values.
#[derive(Subcommand)]
enum Commands {
    /// Compose a matrix from scale, rotation and translation.
    Srt {
        #[arg(short, long, default_value = "1,1,1", allow_hyphen_values = true)]
        scale: String,
        #[arg(short, long, default_value = "0,0,0,1", allow_hyphen_values = true)]
        rotation: String,
        #[arg(short, long, default_value = "0,0,0", allow_hyphen_values = true)]
        translation: String,
    },

    /// Split a matrix into scale, rotation and translation.
    Decompose {
        #[arg(allow_hyphen_values = true)]
        matrix: String,
    },

    /// General 4x4 inverse.
    Inverse {
        #[arg(allow_hyphen_values = true)]
        matrix: String,
    },

    Transpose {
        #[arg(allow_hyphen_values = true)]
        matrix: String,
    },

    QuatToMatrix {
        #[arg(allow_hyphen_values = true)]
        quat: String,
    },

    MatrixToQuat {
        #[arg(allow_hyphen_values = true)]
        matrix: String,
    },

    /// Quaternion from Euler angles in radians.
    Euler {
        #[arg(allow_hyphen_values = true)]
        x: f32,
        #[arg(allow_hyphen_values = true)]
        y: f32,
        #[arg(allow_hyphen_values = true)]
        z: f32,
    },

    /// Quaternion rotating `radians` about `axis`.
    Axis {
        #[arg(allow_hyphen_values = true)]
        axis: String,
        #[arg(allow_hyphen_values = true)]
        radians: f32,
    },

    Cross {
        #[arg(allow_hyphen_values = true)]
        a: String,
        #[arg(allow_hyphen_values = true)]
        b: String,
    },

    Dot {
        #[arg(allow_hyphen_values = true)]
        a: String,
        #[arg(allow_hyphen_values = true)]
        b: String,
    },

    /// Normalize a 3- or 4-component vector.
    Normalize {
        #[arg(allow_hyphen_values = true)]
        vector: String,
    },

    /// Transform a 4-vector and divide by w.
    MulH {
        #[arg(allow_hyphen_values = true)]
        matrix: String,
        #[arg(allow_hyphen_values = true)]
        vector: String,
    },

    /// Left-handed view matrix.
    Lookat {
        #[arg(allow_hyphen_values = true)]
        eye: String,
        /// Target point, or view direction with --direction.
        #[arg(allow_hyphen_values = true)]
        at: String,
        #[arg(long, allow_hyphen_values = true)]
        up: Option<String>,
        #[arg(long)]
        direction: bool,
    },

    /// Left-handed perspective projection.
    Frustum {
        #[command(flatten)]
        volume: commands::VolumeArgs,
    },

    /// Left-handed orthographic projection.
    Ortho {
        #[command(flatten)]
        volume: commands::VolumeArgs,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::TRACE } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: logging unavailable: {e}");
    }

    let config = StackConfig::new()
        .with_depth_range(DepthRange::from_homogeneous(cli.homogeneous_depth));
    let mut bs = BoxStack::new(config);

    let result = match cli.command {
        Commands::Srt { scale, rotation, translation } => {
            commands::srt(&mut bs, &scale, &rotation, &translation)
        }
        Commands::Decompose { matrix } => commands::decompose(&mut bs, &matrix),
        Commands::Inverse { matrix } => commands::inverse(&mut bs, &matrix),
        Commands::Transpose { matrix } => commands::transpose(&mut bs, &matrix),
        Commands::QuatToMatrix { quat } => commands::quat_to_matrix(&mut bs, &quat),
        Commands::MatrixToQuat { matrix } => commands::matrix_to_quat(&mut bs, &matrix),
        Commands::Euler { x, y, z } => commands::euler(&mut bs, x, y, z),
        Commands::Axis { axis, radians } => commands::axis(&mut bs, &axis, radians),
        Commands::Cross { a, b } => commands::cross(&mut bs, &a, &b),
        Commands::Dot { a, b } => commands::dot(&a, &b),
        Commands::Normalize { vector } => commands::normalize(&mut bs, &vector),
        Commands::MulH { matrix, vector } => commands::mul_h(&mut bs, &matrix, &vector),
        Commands::Lookat { eye, at, up, direction } => {
            commands::lookat(&mut bs, &eye, &at, up.as_deref(), direction)
        }
        Commands::Frustum { volume } => commands::frustum(&mut bs, &volume),
        Commands::Ortho { volume } => commands::ortho(&mut bs, &volume),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    commands::print_stack(&bs);
}
