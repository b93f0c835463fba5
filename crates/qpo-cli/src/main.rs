use anyhow::Result;
use clap::{Args, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "qpo")]
#[command(about = "Quantum-inspired portfolio optimizer CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> overlay...)
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Run the layered evolution and print the best valid selection
    Optimize(RunArgs),

    /// Brute-force the best valid selection (reference answer)
    Exhaustive {
        /// Layered config paths in merge order
        #[arg(long = "config", required = true)]
        config_paths: Vec<String>,

        /// Override optimizer.risk_aversion
        #[arg(long)]
        risk_aversion: Option<f64>,

        /// Fail (instead of warn) on config keys this mode does not read
        #[arg(long, default_value_t = false)]
        strict_config: bool,
    },

    /// Optimize, brute-force, and report the difference
    Compare(RunArgs),

    /// Optimize + compare once per risk aversion
    Sweep {
        /// Layered config paths in merge order
        #[arg(long = "config", required = true)]
        config_paths: Vec<String>,

        /// Risk aversions to evaluate, in order
        #[arg(long = "risk-aversion", required = true, num_args = 1..)]
        risk_aversions: Vec<f64>,

        /// Override the layer count
        #[arg(long)]
        layers: Option<usize>,

        /// Fail (instead of warn) on config keys this mode does not read
        #[arg(long, default_value_t = false)]
        strict_config: bool,
    },
}

#[derive(Args)]
pub struct RunArgs {
    /// Layered config paths in merge order
    #[arg(long = "config", required = true)]
    pub config_paths: Vec<String>,

    /// Override optimizer.risk_aversion
    #[arg(long)]
    pub risk_aversion: Option<f64>,

    /// Override the layer count
    #[arg(long)]
    pub layers: Option<usize>,

    /// Root directory for exports/<run_id>/
    #[arg(long, default_value = "exports")]
    pub exports_root: String,

    /// Skip writing run artifacts
    #[arg(long, default_value_t = false)]
    pub no_artifacts: bool,

    /// Fail (instead of warn) on config keys this mode does not read
    #[arg(long, default_value_t = false)]
    pub strict_config: bool,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.cmd {
        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = qpo_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }

        Commands::Optimize(args) => commands::optimize::run_optimize(args, false)?,

        Commands::Compare(args) => commands::optimize::run_optimize(args, true)?,

        Commands::Exhaustive {
            config_paths,
            risk_aversion,
            strict_config,
        } => commands::exhaustive::run_exhaustive(config_paths, risk_aversion, strict_config)?,

        Commands::Sweep {
            config_paths,
            risk_aversions,
            layers,
            strict_config,
        } => commands::sweep::run_sweep(config_paths, risk_aversions, layers, strict_config)?,
    }

    Ok(())
}
