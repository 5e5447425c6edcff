use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use drake_joint_conversions::bounds::{JointLimits, Quantity};
use drake_joint_conversions::config::BoundDefaults;
use drake_joint_conversions::conversions::{to_piecewise_polynomial, to_robot_trajectory};
use drake_joint_conversions::joint_limits::apply_joint_limits_file;
use drake_joint_conversions::joint_model::RobotModel;
use drake_joint_conversions::model_traits::Trajectory;
use drake_joint_conversions::multibody_plant::MultibodyPlant;
use drake_joint_conversions::srdf::add_groups_from_srdf_file;
use drake_joint_conversions::trajectory_file::{read_trajectory_file, write_trajectory, write_trajectory_file};
use drake_joint_conversions::urdf::{from_urdf_file, rewrite_mesh_references};
use drake_joint_conversions::utils::{dump_bounds, dump_trajectory, replace_stl_with_obj};

#[derive(Parser)]
#[command(version, about = "Convert joint-space data between a URDF robot model and a multibody plant")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct ModelArgs {
    /// URDF file of the robot
    #[arg(long)]
    urdf: PathBuf,

    /// SRDF file defining the joint groups
    #[arg(long)]
    srdf: PathBuf,

    /// Optional joint_limits.yaml with velocity, acceleration and jerk limits
    #[arg(long)]
    limits: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the dense position, velocity, acceleration and jerk bounds of a group
    Bounds {
        #[command(flatten)]
        model: ModelArgs,

        /// Joint group
        #[arg(long)]
        group: String,

        /// YAML file overriding the default velocity, acceleration and jerk bounds
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Interpolate a waypoint trajectory and resample it at a fixed time step
    Resample {
        #[command(flatten)]
        model: ModelArgs,

        /// Waypoint trajectory (YAML)
        #[arg(long)]
        input: PathBuf,

        /// Resampling step in seconds
        #[arg(long)]
        delta_t: f64,

        /// Output file, printed to stdout if not given
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the waypoints of a trajectory file: time, then position/velocity per joint
    Show {
        #[command(flatten)]
        model: ModelArgs,

        /// Waypoint trajectory (YAML)
        #[arg(long)]
        input: PathBuf,
    },
    /// Print a mesh path with STL extensions replaced by OBJ
    MeshPath {
        path: String,
    },
    /// Print a URDF file with all mesh references pointing to OBJ instead of STL
    ObjMeshes {
        urdf: PathBuf,
    },
}

fn load_model(args: &ModelArgs) -> Result<Arc<RobotModel>> {
    let mut model = from_urdf_file(&args.urdf)?;
    let groups = add_groups_from_srdf_file(&mut model, &args.srdf)?;
    info!("Loaded {} with groups {:?}", model.name(), groups);
    if let Some(limits) = &args.limits {
        let updated = apply_joint_limits_file(&mut model, limits)?;
        info!("Applied limits of {} joints", updated);
    }
    Ok(Arc::new(model))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Bounds { model, group, config } => {
            let model = load_model(&model)?;
            let plant = MultibodyPlant::from_robot_model(&model);
            let defaults = match config {
                Some(path) => BoundDefaults::from_yaml_file(&path)
                    .with_context(|| format!("Failed to read bound defaults {}", path.display()))?,
                None => BoundDefaults::default(),
            };
            let group = model.joint_model_group(&group)?;
            let limits = JointLimits::extract(group, &plant, &defaults)?;
            for quantity in Quantity::ALL {
                dump_bounds(quantity, limits.get(quantity));
            }
        }
        Command::Resample { model, input, delta_t, output } => {
            let model = load_model(&model)?;
            let plant = MultibodyPlant::from_robot_model(&model);
            let waypoints = read_trajectory_file(model.clone(), &input)?;
            let continuous = to_piecewise_polynomial(&waypoints, waypoints.group(), &plant)?;
            info!("Continuous trajectory of {:.3} s", continuous.end_time());

            let resampled = to_robot_trajectory(&continuous, delta_t, &plant, &model, waypoints.group_name())?;
            match output {
                Some(path) => write_trajectory_file(&resampled, &path)?,
                None => print!("{}", write_trajectory(&resampled)?),
            }
        }
        Command::Show { model, input } => {
            let model = load_model(&model)?;
            let waypoints = read_trajectory_file(model, &input)?;
            dump_trajectory(&waypoints);
        }
        Command::MeshPath { path } => {
            println!("{}", replace_stl_with_obj(&path));
        }
        Command::ObjMeshes { urdf } => {
            let xml_content = std::fs::read_to_string(&urdf)
                .with_context(|| format!("Failed to read urdf file {}", urdf.display()))?;
            print!("{}", rewrite_mesh_references(&xml_content)?);
        }
    }
    Ok(())
}
