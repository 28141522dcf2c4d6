use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use sitnikov_portrait::config::{Config, DEFAULT_SAMPLE_FILE};
use sitnikov_portrait::sitnikov::{self, SitnikovParams, Solution};

#[derive(Parser)]
#[command(name = "generate-portrait")]
#[command(version)]
#[command(about = "Integrate the Sitnikov problem and write `t z z_dot` samples")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ./config.yaml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output sample file
    #[arg(short, long, global = true, default_value = DEFAULT_SAMPLE_FILE)]
    output: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Poincaré section over the `poincare_portrait` grid, one sample per period
    Portrait {
        /// Override the grid eccentricity
        #[arg(long)]
        eccentricity: Option<f64>,

        /// Override the number of periods per initial condition
        #[arg(long)]
        periods: Option<f64>,
    },

    /// One trajectory from `initial_values`, every `skip_n_outs`-th step
    Trajectory {
        #[arg(long, allow_negative_numbers = true)]
        z_start: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        z_dot_start: Option<f64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut config = Config::resolve(cli.config.as_deref())?;

    let (header, solutions): (Vec<String>, Vec<Solution>) = match cli.command {
        Commands::Portrait {
            eccentricity,
            periods,
        } => {
            let grid = &mut config.poincare_portrait;
            if let Some(e) = eccentricity {
                grid.eccentricity = e;
            }
            if let Some(p) = periods {
                grid.periods = p;
            }
            let header = vec![
                "Poincaré section of the Sitnikov problem".to_string(),
                format!(
                    "eccentricity={} periods={} z=[{}, {}) step {} z_dot=[{}, {}) step {}",
                    grid.eccentricity,
                    grid.periods,
                    grid.z_min,
                    grid.z_max,
                    grid.z_step,
                    grid.z_dot_min,
                    grid.z_dot_max,
                    grid.z_dot_step
                ),
                "t z z_dot".to_string(),
            ];
            (header, sitnikov::poincare_section(grid, &config.solver_params)?)
        }
        Commands::Trajectory {
            z_start,
            z_dot_start,
        } => {
            let mut params =
                SitnikovParams::from_config(&config.initial_values, &config.solver_params);
            if let Some(z) = z_start {
                params.z_start = z;
            }
            if let Some(z_dot) = z_dot_start {
                params.z_dot_start = z_dot;
            }
            let header = vec![
                "Sitnikov trajectory".to_string(),
                format!(
                    "eccentricity={} z_start={} z_dot_start={} periods={} time_delta={} skip_n_outs={}",
                    params.eccentricity,
                    params.z_start,
                    params.z_dot_start,
                    params.periods,
                    params.time_delta,
                    config.solver_params.skip_n_outs
                ),
                "t z z_dot".to_string(),
            ];
            let traj = sitnikov::trajectory(params, config.solver_params.skip_n_outs)?;
            (header, traj)
        }
    };

    let file = File::create(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;
    sitnikov::write_solutions(BufWriter::new(file), &header, &solutions)
        .with_context(|| format!("writing {}", cli.output.display()))?;

    log::info!("Wrote {} samples to {}", solutions.len(), cli.output.display());
    Ok(())
}
