//! BoothForge CLI - Bridge interface for the stage planner
//!
//! Commands: devices, analyze, cable, arrange, route, patch
//! Outputs JSON to stdout, logs to stderr
//! Returns 2 when analyze finds the booth incomplete

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use boothforge_core::{equipment_list, patch_sheet, BoothSession, Face, PlacedItem, ReadinessStatus};

#[derive(Parser)]
#[command(name = "boothforge-cli")]
#[command(about = "BoothForge CLI - Booth Compiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Engine config file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory of extra device catalog files
    #[arg(long)]
    catalog_dir: Option<PathBuf>,

    /// Panel facing the viewer
    #[arg(long, value_enum, default_value_t = FaceArg::Front)]
    face: FaceArg,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum FaceArg {
    Front,
    Back,
}

impl From<FaceArg> for Face {
    fn from(arg: FaceArg) -> Self {
        match arg {
            FaceArg::Front => Face::Front,
            FaceArg::Back => Face::Back,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog devices
    Devices,

    /// Readiness report for a booth
    Analyze {
        /// JSON payload (list of placed items)
        #[arg(short, long)]
        payload: String,
    },

    /// Infer cables and the manifest
    Cable {
        #[arg(short, long)]
        payload: String,
    },

    /// Auto-arrange items into zones
    Arrange {
        #[arg(short, long)]
        payload: String,
    },

    /// Infer cables and route them for the chosen face
    Route {
        #[arg(short, long)]
        payload: String,
    },

    /// Sound-check patch sheet and equipment list
    Patch {
        #[arg(short, long)]
        payload: String,
    },
}

fn emit<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("{}", serde_json::json!({ "success": false, "error": e.to_string() }));
            ExitCode::FAILURE
        }
    }
}

fn fail(message: String) -> ExitCode {
    println!("{}", serde_json::json!({ "success": false, "error": message }));
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut session = match BoothSession::open(cli.config.as_deref(), cli.catalog_dir.as_deref()) {
        Ok(s) => s,
        Err(e) => return fail(format!("Failed to open session: {}", e)),
    };
    session.set_face(cli.face.into());

    let payload = match &cli.command {
        Commands::Devices => None,
        Commands::Analyze { payload }
        | Commands::Cable { payload }
        | Commands::Arrange { payload }
        | Commands::Route { payload }
        | Commands::Patch { payload } => Some(payload),
    };
    if let Some(payload) = payload {
        match serde_json::from_str::<Vec<PlacedItem>>(payload) {
            Ok(items) => session.load_items(items),
            Err(e) => return fail(format!("Invalid payload: {}", e)),
        }
    }

    match cli.command {
        Commands::Devices => {
            let devices: Vec<_> = session
                .catalog()
                .list()
                .iter()
                .map(|d| {
                    serde_json::json!({
                        "id": d.id,
                        "model": d.model,
                        "manufacturer": d.manufacturer,
                        "category": d.category,
                    })
                })
                .collect();
            emit(&devices)
        }

        Commands::Analyze { .. } => {
            let readiness = session.readiness().clone();
            let code = emit(&readiness);
            if readiness.status == ReadinessStatus::Incomplete {
                ExitCode::from(2)
            } else {
                code
            }
        }

        Commands::Cable { .. } => match session.generate_cables() {
            Ok(report) => emit(&serde_json::json!({ "success": true, "report": report })),
            Err(e) => fail(e.to_string()),
        },

        Commands::Arrange { .. } => emit(&session.auto_arrange()),

        Commands::Route { .. } => match session.generate_cables() {
            Ok(report) => emit(&serde_json::json!({
                "success": true,
                "omissions": report.omissions,
                "routes": session.route(),
            })),
            Err(e) => fail(e.to_string()),
        },

        Commands::Patch { .. } => {
            if let Err(e) = session.generate_cables() {
                return fail(e.to_string());
            }
            emit(&serde_json::json!({
                "patch": patch_sheet(session.items(), session.cables(), session.catalog()),
                "equipment": equipment_list(session.items(), session.catalog()),
            }))
        }
    }
}
