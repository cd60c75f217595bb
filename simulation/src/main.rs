//! Epinet - SIR epidemic simulation on scale-free networks
//!
//! Grows a Barabási–Albert contact network, seeds one infection and prints
//! the resulting S/I/R curves, optionally exporting them for plotting.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use epinet_logging::{EpinetSubscriberBuilder, LogConfig};
use tracing::info;

use epinet_simulation::{
    ConfigError, RandomSource, Scenario, SimConfig, SimConfigFile, Simulation, report, topology,
};

#[derive(Parser)]
#[command(
    name = "epinet",
    about = "SIR epidemic simulation on Barabási–Albert scale-free networks",
    version
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines instead of human-readable text
    #[arg(long, global = true)]
    log_json: bool,

    /// Also write JSONL logs to daily-rotated files in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation with the given parameters
    Run(RunArgs),

    /// Run one of the pre-built scenarios
    Scenario {
        /// Which scenario to run
        #[arg(value_enum)]
        name: Scenario,

        /// Seed for the random source
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Generate a network and print its degree statistics
    Topology {
        /// Number of nodes
        #[arg(short, long, default_value = "1000")]
        population: usize,

        /// Edges brought by each new node
        #[arg(short = 'm', long, default_value = "3")]
        attachment_degree: usize,

        /// Seed for the random source
        #[arg(short, long)]
        seed: Option<u64>,

        /// Number of adjacency lists to print
        #[arg(long, default_value = "20")]
        show: usize,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Load parameters from a JSON file (flags below are then ignored,
    /// except --seed)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of people (nodes)
    #[arg(short, long, default_value = "1000", allow_negative_numbers = true)]
    population: i64,

    /// Edges brought by each new node (m)
    #[arg(short = 'm', long, default_value = "3", allow_negative_numbers = true)]
    attachment_degree: i64,

    /// Per-contact daily transmission probability (beta)
    #[arg(short = 'b', long, default_value = "0.3", allow_negative_numbers = true)]
    infection_rate: f64,

    /// Daily recovery probability (gamma)
    #[arg(short = 'g', long, default_value = "0.05", allow_negative_numbers = true)]
    recovery_rate: f64,

    /// Number of simulated days
    #[arg(short = 't', long, default_value = "50", allow_negative_numbers = true)]
    steps: i64,

    /// Seed for the random source
    #[arg(short, long, allow_negative_numbers = true)]
    seed: Option<i64>,

    /// Write the daily history as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the full run report as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write a JSON sample of the network with terminal statuses
    #[arg(long)]
    network: Option<PathBuf>,

    /// Number of nodes in the network sample
    #[arg(long, default_value = "100")]
    sample: usize,

    /// Skip the terminal chart
    #[arg(long)]
    quiet_chart: bool,
}

impl RunArgs {
    fn sim_config(&self) -> Result<SimConfig, ConfigError> {
        let Some(path) = &self.config else {
            return SimConfig::try_from(SimConfigFile {
                population: self.population,
                attachment_degree: self.attachment_degree,
                infection_rate: self.infection_rate,
                recovery_rate: self.recovery_rate,
                steps: self.steps,
                seed: self.seed,
            });
        };

        let mut config = SimConfig::load(path)?;
        if let Some(seed) = self.seed {
            config.seed = Some(u64::try_from(seed).map_err(|_| ConfigError::Seed(seed))?);
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing
    let mut log_config = if cli.verbose {
        LogConfig::development()
    } else {
        LogConfig::default()
    }
    .with_json_console(cli.log_json);
    if let Some(directory) = cli.log_dir.clone() {
        log_config = log_config.with_log_dir(directory);
    }
    let _guard = EpinetSubscriberBuilder::new().with_config(log_config).init();

    match cli.command {
        Commands::Run(args) => run(args)?,
        Commands::Scenario { name, seed } => {
            name.run(seed)?;
        }
        Commands::Topology {
            population,
            attachment_degree,
            seed,
            show,
        } => {
            let mut rng = RandomSource::new(seed);
            let graph = topology::generate(population, attachment_degree, &mut rng)?;
            let degrees = graph.degree_summary();

            println!("{}", graph.visualize(show));
            println!("Seed: {}", rng.seed());
            println!(
                "Degree: min {}, mean {:.2}, max {}",
                degrees.min, degrees.mean, degrees.max
            );
            println!("  degree  nodes");
            for (degree, count) in degrees.histogram.iter().enumerate() {
                if *count > 0 {
                    println!("  {:>6}  {}", degree, count);
                }
            }
        }
    }

    Ok(())
}

fn run(args: RunArgs) -> anyhow::Result<()> {
    let config = args.sim_config()?;
    info!(?config, "Starting simulation");

    let outcome = Simulation::new(config)?.run();

    if !args.quiet_chart {
        println!("{}", report::render_chart(&outcome.history, 72, 16));
    }
    print!("{}", report::summary(&outcome));

    if let Some(path) = &args.csv {
        report::save_csv(&outcome.history, path)?;
        println!("History saved to {}", path.display());
    }
    if let Some(path) = &args.json {
        report::save_json(&outcome, path)?;
        println!("Report saved to {}", path.display());
    }
    if let Some(path) = &args.network {
        report::save_network_sample(&outcome, args.sample, path)?;
        println!("Network sample saved to {}", path.display());
    }

    Ok(())
}
