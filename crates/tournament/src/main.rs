//! Tournament CLI
//!
//! Build divisions from a scenario file, enter results and report standings.

use anyhow::{bail, Context, Result};
use bracket_core::seed_order;
use std::env;
use std::path::Path;
use tournament::{DivisionRunner, RunConfig, Scenario, TournamentResults};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Largest bracket the `seed` command will print
const MAX_SEED_ROUNDS: u32 = 10;

fn print_usage() {
    println!("dojo-tournament runner");
    println!();
    println!("Usage:");
    println!("  tournament seed <rounds>");
    println!("  tournament run <scenario.toml> [--out results.json] [--shuffle] [--seed N]");
    println!("  tournament report <results.json>");
    println!();
    println!("Examples:");
    println!("  tournament seed 3");
    println!("  tournament run scenarios/spring_open.toml --out spring.json");
    println!("  tournament report spring.json");
}

fn print_seeds(args: &[String]) -> Result<()> {
    let Some(arg) = args.first() else {
        bail!("seed requires a number of rounds");
    };
    let rounds: u32 = arg
        .parse()
        .with_context(|| format!("Invalid number of rounds: {}", arg))?;
    if rounds > MAX_SEED_ROUNDS {
        bail!("at most {} rounds supported, got {}", MAX_SEED_ROUNDS, rounds);
    }

    let order = seed_order(rounds)?;
    let seeds: Vec<String> = order.iter().map(|seed| (seed + 1).to_string()).collect();
    println!("{}", seeds.join(" "));
    Ok(())
}

fn run_scenario(args: &[String]) -> Result<()> {
    let Some(scenario_path) = args.first() else {
        bail!("run requires a scenario file");
    };

    // Parse optional arguments
    let mut out = None;
    let mut cli = RunConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--out" | "-o" => {
                let Some(path) = args.get(i + 1) else {
                    bail!("--out requires a path");
                };
                out = Some(path.clone());
                i += 1;
            }
            "--seed" | "-s" => {
                let Some(seed) = args.get(i + 1) else {
                    bail!("--seed requires a number");
                };
                cli.seed = Some(seed.parse().with_context(|| format!("Invalid seed: {}", seed))?);
                i += 1;
            }
            "--shuffle" => cli.shuffle = true,
            other => bail!("Unknown option: {}", other),
        }
        i += 1;
    }

    let scenario = Scenario::load(Path::new(scenario_path))?;
    let config = cli.merged(&scenario);
    info!(
        scenario = %scenario_path,
        divisions = scenario.divisions.len(),
        shuffle = config.shuffle,
        "running scenario"
    );

    let results = DivisionRunner::new(config).run(&scenario)?;
    results.print_report();

    if let Some(out) = out {
        results.save(Path::new(&out))?;
        info!(path = %out, "results saved");
    }
    Ok(())
}

fn show_report(args: &[String]) -> Result<()> {
    let Some(path) = args.first() else {
        bail!("report requires a results file");
    };
    TournamentResults::load(Path::new(path))?.print_report();
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let outcome = match args[1].as_str() {
        "seed" => print_seeds(&args[2..]),
        "run" => run_scenario(&args[2..]),
        "report" => show_report(&args[2..]),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            print_usage();
            std::process::exit(2);
        }
    };

    if let Err(e) = outcome {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
