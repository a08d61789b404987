//! HERB Task Space Region command-line tool.
//!
//! Provides three modes of operation:
//! - `list`: Print every registered (robot, object, task) factory key
//! - `info`: Print workspace crate versions and default constants
//! - `build`: Load a scene file, run one factory, print the chains as JSON

mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use herb_core::config::{SceneConfig, TsrConfig};
use herb_core::error::{ConfigError, HerbError, ManipulatorError};
use herb_core::pose::pose_from_xyz_rpy;
use herb_core::robot::Robot;
use herb_core::scene::Scene;
use herb_tsr::factories::DEFAULT_LIFT_DISTANCE;
use herb_tsr::{Chain, TaskKind, TaskRequest, TsrContext, TsrRegistry};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Build Task Space Region chains for HERB manipulation tasks.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered factories.
    List,

    /// Print crate information and default constants.
    Info,

    /// Run a factory against a scene file.
    Build {
        /// Scene file (TOML).
        #[arg(short, long)]
        scene: PathBuf,

        /// Name of the target object in the scene.
        #[arg(short, long)]
        object: String,

        /// Manipulator to use instead of the scene's active one.
        #[arg(short, long)]
        manip: Option<String>,

        #[command(subcommand)]
        task: TaskArgs,
    },
}

#[derive(Subcommand)]
enum TaskArgs {
    /// Lift the object (or tray, with both arms) straight up.
    Lift {
        #[arg(short, long, default_value_t = DEFAULT_LIFT_DISTANCE)]
        distance: f64,
    },

    /// Side grasp with the palm touching the object.
    Grasp,

    /// Side grasp from a stand-off, for pushing into the object.
    PushGrasp {
        /// Stand-off in metres; defaults to the object's configured value.
        #[arg(short, long)]
        push_distance: Option<f64>,
    },

    /// Put the held object down somewhere on another object's surface.
    Place {
        /// Surface object in the scene.
        #[arg(long)]
        onto: String,

        /// Minimum distance from the surface edges.
        #[arg(short, long, default_value_t = 0.0)]
        padding: f64,
    },

    /// Carry the held object without tipping it.
    Transport {
        #[arg(long)]
        roll: Option<f64>,
        #[arg(long)]
        pitch: Option<f64>,
        #[arg(long)]
        yaw: Option<f64>,
    },

    /// Any pose on the object's surface.
    PointOn {
        #[arg(short, long, default_value_t = 0.0)]
        padding: f64,
    },

    /// A specific pose on the object's surface, free in yaw.
    GivenPointOn {
        /// Position in the surface frame.
        #[arg(long, num_args = 3, allow_negative_numbers = true, default_values_t = [0.0, 0.0, 0.0])]
        xyz: Vec<f64>,

        /// Roll, pitch, yaw in the surface frame (radians).
        #[arg(long, num_args = 3, allow_negative_numbers = true, default_values_t = [0.0, 0.0, 0.0])]
        rpy: Vec<f64>,
    },

    /// Grasp a tray handle.
    HandleGrasp {
        /// `closest` for the handle nearest the hand, otherwise both.
        #[arg(long, default_value = "all")]
        handles: String,
    },
}

// ---------------------------------------------------------------------------
// Task requests
// ---------------------------------------------------------------------------

fn triple(values: &[f64]) -> [f64; 3] {
    let mut out = [0.0; 3];
    for (slot, v) in out.iter_mut().zip(values) {
        *slot = *v;
    }
    out
}

/// Turn CLI task arguments into a request. `place` needs a chain of
/// placement poses, which `surface_chain` builds from the named surface.
fn task_request(
    task: &TaskArgs,
    surface_chain: impl FnOnce(&str, f64) -> Result<Chain, HerbError>,
) -> Result<TaskRequest, HerbError> {
    Ok(match task {
        TaskArgs::Lift { distance } => TaskRequest::Lift {
            distance: *distance,
        },
        TaskArgs::Grasp => TaskRequest::Grasp,
        TaskArgs::PushGrasp { push_distance } => TaskRequest::PushGrasp {
            push_distance: *push_distance,
        },
        TaskArgs::Place { onto, padding } => TaskRequest::Place {
            pose_chain: surface_chain(onto, *padding)?,
        },
        TaskArgs::Transport { roll, pitch, yaw } => TaskRequest::Transport {
            roll: *roll,
            pitch: *pitch,
            yaw: *yaw,
        },
        TaskArgs::PointOn { padding } => TaskRequest::PointOn { padding: *padding },
        TaskArgs::GivenPointOn { xyz, rpy } => TaskRequest::GivenPointOn {
            point: pose_from_xyz_rpy(triple(xyz), triple(rpy)),
        },
        TaskArgs::HandleGrasp { handles } => TaskRequest::HandleGrasp {
            selector: handles.parse().unwrap_or_default(),
        },
    })
}

// ---------------------------------------------------------------------------
// Mode implementations
// ---------------------------------------------------------------------------

fn run_list(registry: &TsrRegistry) {
    for key in registry.keys() {
        println!("{:<6} {:<18} {}", key.robot, key.object, key.task);
    }
}

fn run_info() {
    let config = TsrConfig::default();
    println!("herb-tsr v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("crates:");
    println!("  herb-core  {}", env!("CARGO_PKG_VERSION"));
    println!("  herb-tsr   {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("tasks:");
    for task in TaskKind::ALL {
        println!("  {task}");
    }
    println!();
    println!("defaults:");
    println!("  lift_epsilon        {}", config.lift_epsilon);
    println!("  grasp_vertical      {}", config.grasp_vertical_slack);
    println!("  release_height      {}", config.place.release_height);
    println!("  transport_epsilon   {}", config.transport.epsilon);
    println!("  tray_handle_offset  {}", config.tray_handles.offset);
}

fn run_build(
    registry: &TsrRegistry,
    scene: Scene,
    object: &str,
    manip: Option<&str>,
    task: &TaskArgs,
) -> Result<Vec<Chain>, HerbError> {
    let Scene {
        mut robot,
        objects,
        tsr,
    } = scene;
    let find = |name: &str| {
        objects
            .iter()
            .find(|o| o.name == name)
            .ok_or_else(|| ConfigError::UnknownObject(name.to_owned()))
    };
    let target = find(object)?;

    let manipulator = match manip {
        Some(name) => robot.manipulator_index(name)?,
        None => match robot.active_manipulator() {
            Some(index) => index,
            None => {
                tracing::warn!("scene has no active manipulator and --manip was not given");
                return Err(ManipulatorError::NoneActive.into());
            }
        },
    };
    tracing::info!(
        object = %target.name,
        manipulator = robot.manipulator_name(manipulator)?,
        "building chains"
    );

    let request = task_request(task, |onto, padding| {
        let surface = find(onto)?;
        let ctx = TsrContext::new(&robot, surface, &tsr).with_manipulator(manipulator)?;
        let surface_chains = registry.build(&ctx, &TaskRequest::PointOn { padding })?;
        if surface_chains.len() > 1 {
            tracing::warn!(
                surface = %surface.name,
                count = surface_chains.len(),
                "surface produced several chains; placing on the first"
            );
        }
        surface_chains
            .into_iter()
            .next()
            .ok_or_else(|| ConfigError::EmptyChain.into())
    })?;

    registry.build_as(&mut robot, manipulator, target, &tsr, &request)
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let registry = TsrRegistry::herb();

    match cli.command {
        Commands::List => run_list(&registry),
        Commands::Info => run_info(),
        Commands::Build {
            scene,
            object,
            manip,
            task,
        } => {
            let result = SceneConfig::from_file(&scene)
                .and_then(SceneConfig::into_scene)
                .map_err(HerbError::from)
                .and_then(|s| run_build(&registry, s, &object, manip.as_deref(), &task));
            let chains = match result {
                Ok(chains) => chains,
                Err(e) => {
                    eprintln!("error: {e}");
                    return ExitCode::FAILURE;
                }
            };
            match serde_json::to_string_pretty(&report::chains_report(&chains)) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("error: failed to serialize chains: {e}");
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    ExitCode::SUCCESS
}
