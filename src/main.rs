//! Command line front end: forward kinematics, inverse kinematics and export of DH tables.
//!
//! ```text
//! rs-dh-kinematics forward --preset ur5 --joints "0;-pi/2;0;0;0;0"
//! rs-dh-kinematics solve --preset ur5 --target "0,3;0,1;0,4;pi;0;0" --method IK_LM --limits
//! rs-dh-kinematics export --preset puma560 --output puma.csv
//! ```
//!
//! Values are separated by `;` so that decimal commas can be used. Set `RUST_LOG=debug`
//! to trace solver iterations.

use std::path::PathBuf;
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rs_dh_kinematics::chain::Chain;
use rs_dh_kinematics::expression::parse_input;
use rs_dh_kinematics::kinematic_traits::Kinematics;
use rs_dh_kinematics::parameters_robots::dh_kinematics::Preset;
use rs_dh_kinematics::pose::pose_from_xyzabc;
use rs_dh_kinematics::solver::{IkMethod, Solver, SolverConfig};
use rs_dh_kinematics::utils::{dump_result, format_joints, format_pose};

/// Forward and inverse kinematics of DH chains.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RobotArgs {
    /// Built-in robot: Puma560, UR3, UR5 or UR10.
    #[arg(short, long, conflicts_with = "chain", required_unless_present = "chain")]
    preset: Option<String>,

    /// CSV file with the DH table.
    #[arg(short, long)]
    chain: Option<PathBuf>,
}

impl RobotArgs {
    fn load(&self) -> Result<Chain> {
        if let Some(path) = &self.chain {
            return Chain::from_csv_file(path)
                .with_context(|| format!("reading DH table from {}", path.display()));
        }
        match &self.preset {
            Some(name) => Ok(name.parse::<Preset>()?.chain()),
            None => bail!("either --preset or --chain is required"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Pose of the end effector for the given joint values.
    Forward {
        #[command(flatten)]
        robot: RobotArgs,

        /// Joint values, by default the values configured in the DH table.
        #[arg(short, long)]
        joints: Option<String>,

        /// Also print the pose of every joint frame.
        #[arg(long)]
        frames: bool,
    },

    /// Joint values that reach the target pose.
    Solve {
        #[command(flatten)]
        robot: RobotArgs,

        /// Target as X;Y;Z;A;B;C (meters, intrinsic X-Y-Z angles in radians).
        #[arg(short, long)]
        target: String,

        /// Initial guess, by default the values configured in the DH table.
        #[arg(short, long)]
        start: Option<String>,

        /// IK_LM, IK_GN or IK_NR.
        #[arg(short, long, default_value = "IK_LM")]
        method: String,

        /// Keep joints within their limits.
        #[arg(short, long)]
        limits: bool,

        /// Maximum solver iterations.
        #[arg(long)]
        max_iterations: Option<usize>,

        /// Acceptable norm of the pose error.
        #[arg(long)]
        tolerance: Option<f64>,
    },

    /// Write the DH table as CSV.
    Export {
        #[command(flatten)]
        robot: RobotArgs,

        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Parses `;` separated values, each may be an expression. Blank text is no values.
fn parse_values(text: &str) -> Result<Vec<f64>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    text.split(';')
        .map(|part| parse_input(part).map_err(anyhow::Error::from))
        .collect()
}

fn joints_or_configured(chain: &Chain, text: &Option<String>) -> Result<Vec<f64>> {
    match text {
        Some(text) => parse_values(text),
        None => Ok(chain.configured_joints()),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Forward { robot, joints, frames } => {
            let chain = robot.load()?;
            let qs = joints_or_configured(&chain, &joints)?;
            if frames {
                for (i, pose) in chain.forward_with_joint_poses(&qs)?.iter().enumerate() {
                    println!("Frame {}: {}", i + 1, format_pose(pose));
                }
            }
            println!("{}", format_pose(&chain.forward(&qs)?));
        }

        Commands::Solve { robot, target, start, method, limits, max_iterations, tolerance } => {
            let chain = robot.load()?;
            let method: IkMethod = method.parse()?;
            let values = parse_values(&target)?;
            let [x, y, z, a, b, c] = <[f64; 6]>::try_from(values.as_slice())
                .map_err(|_| anyhow::anyhow!("target needs 6 values, found {}", values.len()))?;
            let start = joints_or_configured(&chain, &start)?;

            let defaults = SolverConfig::default();
            let solver = Solver::new(SolverConfig {
                max_iterations: max_iterations.unwrap_or(defaults.max_iterations),
                tolerance: tolerance.unwrap_or(defaults.tolerance),
                ..defaults
            });
            info!("Solving with {} from {}", method, format_joints(&chain, &start));
            let result = solver.solve(&chain, &pose_from_xyzabc(x, y, z, a, b, c), &start, method, limits)?;
            dump_result(&chain, &result);
            if !result.success {
                std::process::exit(1);
            }
        }

        Commands::Export { robot, output } => {
            let chain = robot.load()?;
            chain.to_csv_file(&output)?;
            println!("{} joints written to {}", chain.effective_length(), output.display());
        }
    }
    Ok(())
}
