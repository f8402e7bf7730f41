use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;
use thiserror::Error;

use orbiter::config::{Config, ConfigError};
use orbiter::constellation::{ConstellationPlan, PlanError};
use orbiter::elements::{ElementsError, OrbitalElementBuilder, Satellite};
use orbiter::rpc::{RpcError, RpcSession};

#[derive(Parser)]
#[command(name = "orbiter")]
#[command(about = "Populate a remote orbital simulator with satellites")]
struct Cli {
    /// YAML configuration file
    #[arg(long, short)]
    config: Option<String>,
    /// Simulator host, overrides the config file
    #[arg(long, env = "ORBITER_HOST")]
    host: Option<String>,
    /// Simulator port, overrides the config file
    #[arg(long, env = "ORBITER_PORT")]
    port: Option<u16>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a single satellite
    Add(AddArgs),
    /// Create every satellite of a constellation plan in one batch
    Constellation {
        plan: String,
        /// Print the satellites instead of sending them
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a constellation plan file
    Validate { plan: String },
}

#[derive(Args)]
struct AddArgs {
    #[arg(long)]
    id: String,
    /// Apogee in km from the Earth's centre
    #[arg(long)]
    apogee: f64,
    /// Perigee in km from the Earth's centre
    #[arg(long)]
    perigee: f64,
    /// Read apogee and perigee as altitudes above the mean Earth radius
    #[arg(long)]
    altitude: bool,
    #[arg(long, default_value_t = 0.0)]
    inclination_deg: f64,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    raan_deg: f64,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    argument_of_periapsis_deg: f64,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    mean_anomaly_deg: f64,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("plan: {0}")]
    Plan(#[from] PlanError),
    #[error("{0}")]
    Elements(#[from] ElementsError),
    #[error("{0}")]
    Rpc(#[from] RpcError),
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = load_config(&cli).and_then(|config| match cli.command {
        Commands::Add(args) => add(&config, args),
        Commands::Constellation { plan, dry_run } => constellation(&config, &plan, dry_run),
        Commands::Validate { plan } => validate(&plan),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config, CliError> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(host) = &cli.host {
        config.simulator.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.simulator.port = port;
    }
    Ok(config)
}

fn add(config: &Config, args: AddArgs) -> Result<(), CliError> {
    let mut builder = OrbitalElementBuilder::new();
    if args.altitude {
        builder.set_apogee_perigee_altitudes(args.apogee, args.perigee)?;
    } else {
        builder.set_apogee_perigee(args.apogee, args.perigee)?;
    }
    builder
        .set_inclination(args.inclination_deg.to_radians())?
        .set_longitude_of_ascending_node(args.raan_deg.to_radians())?
        .set_argument_of_periapsis(args.argument_of_periapsis_deg.to_radians())?
        .set_mean_anomaly(args.mean_anomaly_deg.to_radians())?
        .set_id(args.id);
    let satellite = builder.build()?;

    let ack = RpcSession::scoped(config.transport()?, config.session_options(), |session| {
        session.add_satellite(&satellite)
    })?;
    println!("{}: {}", satellite.id, ack);
    Ok(())
}

fn constellation(config: &Config, path: &str, dry_run: bool) -> Result<(), CliError> {
    let satellites = ConstellationPlan::from_file(path)?.satellites()?;

    if dry_run {
        for satellite in &satellites {
            print_satellite(satellite);
        }
        println!("{} satellites (not sent)", satellites.len());
        return Ok(());
    }

    let ack = RpcSession::scoped(config.transport()?, config.session_options(), |session| {
        session.add_satellites(&satellites)
    })?;
    println!("Sent {} satellites: {}", satellites.len(), ack);
    Ok(())
}

fn validate(path: &str) -> Result<(), CliError> {
    let plan = ConstellationPlan::from_file(path)?;
    let satellites = plan.satellites()?;
    println!(
        "Plan is valid ({} planes x {} = {} satellites)",
        plan.planes,
        plan.satellites_per_plane,
        satellites.len()
    );
    Ok(())
}

fn print_satellite(satellite: &Satellite) {
    let e = &satellite.elements;
    println!(
        "  {}: n={:.6e} rad/s e={:.4} i={:.2} raan={:.2} w={:.2} M={:.2} (deg)",
        satellite.id,
        e.mean_motion,
        e.eccentricity,
        e.inclination.to_degrees(),
        e.longitude_of_ascending_node.to_degrees(),
        e.argument_of_periapsis.to_degrees(),
        e.mean_anomaly.to_degrees()
    );
}
