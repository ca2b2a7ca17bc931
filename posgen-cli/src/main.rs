//! posgen CLI — replay price files through the position generator.
//!
//! Commands:
//! - `run` — feed a price file to the generator one day at a time, print positions
//! - `synth` — write a seeded random-walk price file
//! - `config` — print the default configuration as TOML

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use posgen_core::data::{load_price_file, write_price_file};
use posgen_core::synthetic::random_walk;
use posgen_core::{
    BlendParams, GeneratorConfig, PolicyConfig, PositionGenerator, TrendReversionParams,
};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "posgen",
    about = "posgen CLI — daily target positions from historical prices"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyKind {
    /// Priority blend of breakout, momentum and mean-reversion signals.
    Blend,
    /// Trend-gated mean reversion with a holding period.
    TrendReversion,
}

impl PolicyKind {
    fn default_config(self) -> PolicyConfig {
        match self {
            PolicyKind::Blend => PolicyConfig::Blend(BlendParams::default()),
            PolicyKind::TrendReversion => {
                PolicyConfig::TrendReversion(TrendReversionParams::default())
            }
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a price file day by day and print the positions for each day.
    Run {
        /// Day-major price file (whitespace-separated, or .csv).
        #[arg(long)]
        prices: PathBuf,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Use this policy with default parameters (ignored with --config).
        #[arg(long, value_enum)]
        policy: Option<PolicyKind>,

        /// Output file. Defaults to stdout.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Emit one JSON report per day, with the decision behind each position.
        #[arg(long, default_value_t = false)]
        explain: bool,
    },
    /// Write a seeded random-walk price file.
    Synth {
        #[arg(long, default_value_t = 50)]
        instruments: usize,

        #[arg(long, default_value_t = 500)]
        days: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        #[arg(long)]
        output: PathBuf,
    },
    /// Print a default configuration as TOML.
    Config {
        #[arg(long, value_enum, default_value = "blend")]
        policy: PolicyKind,
    },
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            prices,
            config,
            policy,
            output,
            explain,
        } => run_cmd(&prices, config.as_deref(), policy, output.as_deref(), explain),
        Commands::Synth {
            instruments,
            days,
            seed,
            output,
        } => synth_cmd(instruments, days, seed, &output),
        Commands::Config { policy } => {
            let config = GeneratorConfig::with_policy(policy.default_config());
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .init()
}

fn run_cmd(
    prices: &Path,
    config_path: Option<&Path>,
    policy: Option<PolicyKind>,
    output: Option<&Path>,
    explain: bool,
) -> Result<()> {
    let history = load_price_file(prices)
        .with_context(|| format!("loading prices from {}", prices.display()))?;

    let mut config = match (config_path, policy) {
        (Some(path), _) => GeneratorConfig::load(path)?,
        (None, Some(kind)) => GeneratorConfig::with_policy(kind.default_config()),
        (None, None) => GeneratorConfig::default(),
    };
    if config.num_instruments != history.num_instruments() {
        if config_path.is_some() {
            bail!(
                "config expects {} instruments but {} has {}",
                config.num_instruments,
                prices.display(),
                history.num_instruments()
            );
        }
        config.num_instruments = history.num_instruments();
    }

    info!(
        policy = config.policy.name(),
        instruments = history.num_instruments(),
        days = history.num_days(),
        fingerprint = %config.fingerprint()?,
        "replaying price history"
    );

    let mut generator = PositionGenerator::from_config(&config)?;
    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut sink = BufWriter::new(sink);

    if explain {
        for days in 1..=history.num_days() {
            let report = generator.step_detailed(&history.prefix(days)?)?;
            serde_json::to_writer(&mut sink, &report)?;
            writeln!(sink)?;
        }
        sink.flush()?;
    } else {
        let mut writer = csv::Writer::from_writer(sink);
        let mut header = vec!["day".to_string()];
        header.extend((0..history.num_instruments()).map(|i| format!("pos_{i}")));
        writer.write_record(&header)?;
        for days in 1..=history.num_days() {
            let positions = generator.step(&history.prefix(days)?)?;
            let mut row = vec![(days - 1).to_string()];
            row.extend(positions.iter().map(i64::to_string));
            writer.write_record(&row)?;
        }
        writer.flush()?;
    }

    info!(
        open = generator.state().open_count(),
        "final positions: {:?}",
        generator.current_positions()
    );
    Ok(())
}

fn synth_cmd(instruments: usize, days: usize, seed: u64, output: &Path) -> Result<()> {
    let history = random_walk(instruments, days, seed)?;
    write_price_file(output, &history)?;
    info!(instruments, days, seed, path = %output.display(), "wrote synthetic prices");
    Ok(())
}
