//! Selector Collider CLI
//!
//! A command-line tool for finding EVM function selector collisions.
//!
//! # Commands
//!
//! - `search` - Brute-force a signature colliding with the target (multi-threaded)
//! - `selector` - Print the selectors of signatures
//! - `verify` - Re-hash two signatures and check whether they collide
//! - `space` - Show the candidate space per length
//! - `config` - Show or save the effective configuration
//! - `benchmark` - Run a selector hashrate benchmark

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

use collider::config::{default_config_path, Config};
use collider::engine::{space_size, Alphabet};
use collider::report::{print_outcome, ConsoleReporter, Report};
use collider::{selector, Searcher};

#[derive(Parser)]
#[command(name = "collider")]
#[command(author = "Cyberia")]
#[command(version = "0.1.0")]
#[command(about = "Brute-force search for EVM function selector collisions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path (default: <config dir>/selector-collider/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

/// Overrides for the search space, shared by `search` and `space`
#[derive(Args)]
struct SpaceArgs {
    /// Ordered candidate symbols
    #[arg(long)]
    alphabet: Option<String>,

    /// Shortest candidate body
    #[arg(long)]
    min_length: Option<usize>,

    /// Longest candidate body
    #[arg(long)]
    max_length: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for a signature colliding with the target
    Search {
        #[command(flatten)]
        space: SpaceArgs,

        /// Target signature (default: solve())
        #[arg(long)]
        target: Option<String>,

        /// Raw target selector in hex, e.g. 0x890d6908
        #[arg(long)]
        target_selector: Option<String>,

        /// Text placed before every candidate
        #[arg(long)]
        prefix: Option<String>,

        /// Text placed after every candidate (default: "()")
        #[arg(long)]
        suffix: Option<String>,

        /// Number of threads to use (default: number of CPU cores)
        #[arg(short, long)]
        threads: Option<usize>,

        /// Seconds between progress lines, 0 to disable
        #[arg(long)]
        progress: Option<u64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the selector of each signature
    Selector {
        /// Signatures such as "transfer(address,uint256)"
        #[arg(required = true)]
        signatures: Vec<String>,
    },

    /// Re-hash two signatures and report whether they collide
    Verify {
        first: String,
        second: String,
    },

    /// Show the number of candidates per length
    Space {
        #[command(flatten)]
        space: SpaceArgs,

        /// Print the length and index of this candidate body
        #[arg(long)]
        locate: Option<String>,
    },

    /// Show the effective configuration
    Config {
        /// Save it to the config file
        #[arg(long)]
        write: bool,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of selectors to compute
        #[arg(short, long, default_value = "1000000")]
        count: u32,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Search {
            space,
            target,
            target_selector,
            prefix,
            suffix,
            threads,
            progress,
            json,
        } => load_config(cli.config.as_ref(), &space).and_then(|mut config| {
            if let Some(target) = target {
                config.target = target;
            }
            if target_selector.is_some() {
                config.target_selector = target_selector;
            }
            if let Some(prefix) = prefix {
                config.prefix = prefix;
            }
            if let Some(suffix) = suffix {
                config.suffix = suffix;
            }
            if threads.is_some() {
                config.threads = threads;
            }
            if let Some(secs) = progress {
                config.progress_secs = secs;
            }
            cmd_search(&config, json)
        }),
        Commands::Selector { signatures } => cmd_selector(&signatures),
        Commands::Verify { first, second } => cmd_verify(&first, &second),
        Commands::Space { space, locate } => load_config(cli.config.as_ref(), &space)
            .and_then(|config| cmd_space(&config, locate.as_deref())),
        Commands::Config { write } => cmd_config(cli.config, write),
        Commands::Benchmark { count } => cmd_benchmark(count),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Send `log` records to stderr; RUST_LOG takes precedence over -v
fn init_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the config file and apply the search space overrides
fn load_config(path: Option<&PathBuf>, space: &SpaceArgs) -> anyhow::Result<Config> {
    let mut config = Config::load(path.map(PathBuf::as_path))?;
    if let Some(alphabet) = &space.alphabet {
        config.alphabet = alphabet.clone();
    }
    if let Some(min) = space.min_length {
        config.min_length = min;
    }
    if let Some(max) = space.max_length {
        config.max_length = max;
    }
    Ok(config)
}

fn cmd_search(config: &Config, json: bool) -> anyhow::Result<()> {
    let params = config.to_params()?;
    let target = params.target().clone();
    let searcher = Searcher::new(params)?;

    let mut reporter = ConsoleReporter::new(json);
    let outcome = searcher.run(&mut reporter)?;

    if json {
        println!("{}", Report::new(&outcome, &target).to_json()?);
    } else {
        print_outcome(&outcome, &target);
    }

    Ok(())
}

fn cmd_selector(signatures: &[String]) -> anyhow::Result<()> {
    for signature in signatures {
        println!("0x{}  {}", selector(signature.as_bytes()), signature);
    }
    Ok(())
}

fn cmd_verify(first: &str, second: &str) -> anyhow::Result<()> {
    let a = selector(first.as_bytes());
    let b = selector(second.as_bytes());

    println!("{} -> 0x{}", first, a);
    println!("{} -> 0x{}", second, b);

    if first == second {
        println!("\nSame signature, not a collision.");
    } else if a == b {
        println!("\nCollision confirmed!");
    } else {
        println!("\nNo collision.");
    }

    Ok(())
}

fn cmd_space(config: &Config, locate: Option<&str>) -> anyhow::Result<()> {
    let alphabet = Alphabet::new(&config.alphabet)?;

    println!("Alphabet: {} ({} symbols)", alphabet.as_str(), alphabet.len());

    let mut cumulative: u128 = 0;
    for length in config.min_length..=config.max_length {
        let total = space_size(alphabet.len(), length)?;
        cumulative = cumulative.saturating_add(total);
        println!(
            "  length {:>2}: {:>40} candidates ({} cumulative)",
            length, total, cumulative
        );
    }

    if let Some(body) = locate {
        match alphabet.decode(body) {
            Some(index) => println!("\n{:?}: length {}, index {}", body, body.len(), index),
            None => anyhow::bail!("{:?} is not made of alphabet symbols", body),
        }
    }

    Ok(())
}

fn cmd_config(path: Option<PathBuf>, write: bool) -> anyhow::Result<()> {
    let config = Config::load(path.as_deref())?;
    config.to_params()?;

    println!("{}", serde_json::to_string_pretty(&config)?);

    if write {
        let path = path
            .or_else(default_config_path)
            .ok_or_else(|| anyhow::anyhow!("No config directory on this platform; pass --config"))?;
        config.save_to_file(&path)?;
        println!("\nSaved to: {}", path.display());
    }

    Ok(())
}

fn cmd_benchmark(count: u32) -> anyhow::Result<()> {
    println!("Running benchmark with {} selectors...", count);

    let start = Instant::now();

    let mut sink = 0u8;
    for i in 0..count {
        let signature = format!("benchmark_{}()", i);
        sink ^= selector(signature.as_bytes()).as_bytes()[0];
    }

    let elapsed = start.elapsed();
    let hashrate = count as f64 / elapsed.as_secs_f64();

    println!("\nResults:");
    println!("  Total selectors: {}", count);
    println!("  Time elapsed: {:.2}s", elapsed.as_secs_f64());
    println!("  Hashrate: {:.2} H/s (single thread)", hashrate);
    println!("  Checksum: {:02x}", sink);

    let threads = num_cpus::get();
    println!("\nEstimated with {} threads: {:.2} H/s", threads, hashrate * threads as f64);

    Ok(())
}
