//! mosviz command-line interface.
//!
//! Loads a device description from JSON, derives its physical parameters,
//! and exposes the DC model and the carrier simulation as subcommands.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use mosviz_core::{DeviceDescription, OperatingPoint, SimConfig};
use mosviz_physics::{derive_parameters, evaluate, sweep_surface};
use mosviz_sim::Session;

#[derive(Parser)]
#[command(name = "mosviz")]
#[command(about = "MOSFET device-physics model and carrier-flow simulator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the derived device parameters
    Report {
        /// Path to the device description JSON
        device: PathBuf,
    },

    /// Evaluate the DC operating point at one bias
    Op {
        /// Path to the device description JSON
        device: PathBuf,

        /// Gate-source bias (V)
        #[arg(long, default_value = "0")]
        vgs: f64,

        /// Drain-source bias (V)
        #[arg(long, default_value = "0")]
        vds: f64,
    },

    /// Tabulate the I-V surface over the configured bias ranges
    Sweep {
        /// Path to the device description JSON
        device: PathBuf,

        /// Mesh points per bias axis
        #[arg(long, default_value = "11")]
        steps: usize,
    },

    /// Run the carrier simulation for a number of ticks
    Run {
        /// Path to the device description JSON
        device: PathBuf,

        /// Gate-source bias (V)
        #[arg(long, default_value = "3")]
        vgs: f64,

        /// Drain-source bias (V)
        #[arg(long, default_value = "0.5")]
        vds: f64,

        /// Number of 42 ms simulation ticks
        #[arg(long, default_value = "100")]
        ticks: usize,

        /// RNG seed for reproducible carrier injection
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Report { device } => cmd_report(&device),
        Commands::Op { device, vgs, vds } => cmd_op(&device, vgs, vds),
        Commands::Sweep { device, steps } => cmd_sweep(&device, steps),
        Commands::Run {
            device,
            vgs,
            vds,
            ticks,
            seed,
        } => cmd_run(&device, vgs, vds, ticks, seed),
    }
}

fn load_device(path: &PathBuf) -> Result<DeviceDescription> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading device file {}", path.display()))?;
    DeviceDescription::from_json_str(&content)
        .with_context(|| format!("parsing device file {}", path.display()))
}

fn cmd_report(path: &PathBuf) -> Result<()> {
    let desc = load_device(path)?;
    let params = derive_parameters(&desc, &SimConfig::default())?;
    print!("{}", params.report());
    Ok(())
}

fn print_op(op: &OperatingPoint) {
    println!("Vgs:    {:.3} V", op.vgs);
    println!("Vds:    {:.3} V", op.vds);
    println!("Vdsat:  {:.3} V", op.vdsat);
    println!("Region: {} - {}", op.region.code(), op.region);
    println!("Id:     {:.3} uA", op.idrain_ua);
    println!("gm:     {:.3} uS", op.gm_us);
    println!("gds:    {:.3} uS", op.gds_us);
    println!("lambda: {:.3} /V", op.lambda);
    match op.gm_over_id() {
        Some(ratio) => println!("gm/Id:  {:.3} /V", ratio),
        None => println!("gm/Id:  undef"),
    }
}

fn cmd_op(path: &PathBuf, vgs: f64, vds: f64) -> Result<()> {
    let desc = load_device(path)?;
    let config = SimConfig::default();
    let params = derive_parameters(&desc, &config)?;
    let op = evaluate(config.clamp_vgs(vgs), config.clamp_vds(vds), &params, &config);
    println!("DC Operating Point");
    println!("==================");
    print_op(&op);
    Ok(())
}

fn cmd_sweep(path: &PathBuf, steps: usize) -> Result<()> {
    anyhow::ensure!(steps >= 2, "sweep needs at least 2 steps per axis");
    let desc = load_device(path)?;
    let config = SimConfig::default();
    let params = derive_parameters(&desc, &config)?;

    println!(
        "{:>8} {:>8} {:>14} {:>10} {:>10} {:>10}",
        "Vgs (V)", "Vds (V)", "Region", "Id (uA)", "gm (uS)", "gds (uS)"
    );
    for op in sweep_surface(&params, &config, steps) {
        println!(
            "{:>8.3} {:>8.3} {:>14} {:>10.3} {:>10.3} {:>10.3}",
            op.vgs,
            op.vds,
            op.region.name(),
            op.idrain_ua,
            op.gm_us,
            op.gds_us
        );
    }
    Ok(())
}

fn cmd_run(path: &PathBuf, vgs: f64, vds: f64, ticks: usize, seed: Option<u64>) -> Result<()> {
    let desc = load_device(path)?;
    let config = SimConfig::default();
    let mut session = match seed {
        Some(seed) => Session::with_seed(&desc, config, seed)?,
        None => Session::new(&desc, config)?,
    };

    session.set_bias(vgs, vds);
    let op = *session.operating_point();
    println!(
        "Bias Vgs={:.3} V Vds={:.3} V: {} region, Id={:.3} uA",
        op.vgs, op.vds, op.region, op.idrain_ua
    );
    println!("Grid: {:?} cells over {:?} um", session.grid().dims(), session.volume().extents());

    let mut peak = 0;
    for tick in 1..=ticks {
        session.tick();
        peak = peak.max(session.kinetics().len());
        if tick % 25 == 0 || tick == ticks {
            println!(
                "tick {:>5}: {:>3} carriers in flight",
                tick,
                session.kinetics().len()
            );
        }
    }
    println!(
        "Done: {} ticks ({:.1} s simulated), peak population {} of {}",
        ticks,
        ticks as f64 * session.config().tick_interval_s(),
        peak,
        session.config().max_carriers
    );
    Ok(())
}
