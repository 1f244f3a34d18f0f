//! `cypher-synth` — the CLI entry point (spec §6 "CLI surface").
//!
//! Loads an Example directory, constructs an executor, invokes
//! synthesis, prints the winning query on success, and exits non-zero
//! on `SearchExhausted` or any other error. This binary is a thin shell
//! over the `cypher_pbe` library; all synthesis logic lives there.

mod cli;

use clap::Parser;
use cli::Cli;
use cypher_pbe::config::{Config, ExecutorConfig, SearchConfig};
use cypher_pbe::example::parse_example_dir;
use cypher_pbe::executor::{Executor, InMemoryExecutor, Table};
use cypher_pbe::symtab::SymbolTable;
use cypher_pbe::synthesizer::Synthesizer;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(&path.to_string_lossy()),
        None => Config::load(),
    };
    if let Ok(cfg) = &mut config {
        if let Some(level) = &cli.log_level {
            cfg.logging.level = level.clone();
        }
        if let Some(limit) = cli.max_dequeues {
            cfg.search.max_sketch_dequeues = limit;
        }
        if let Some(uri) = &cli.bolt_uri {
            cfg.executor = cypher_pbe::config::ExecutorConfig::Bolt {
                uri: uri.clone(),
                user: cli.bolt_user.clone().unwrap_or_default(),
                password: cli.bolt_password.clone().unwrap_or_default(),
            };
        }
    }
    let config = match config {
        Ok(config) => config,
        Err(err) => {
            eprintln!("failed to load configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.logging.level);

    match run(&cli, &config) {
        Ok(cypher) => {
            println!("{cypher}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(cli: &Cli, config: &Config) -> anyhow::Result<String> {
    let example = parse_example_dir(&cli.example)?;
    let symtab = SymbolTable::build(&example)?;
    let target = Table {
        columns: example.output_columns.clone(),
        rows: example.output_rows.iter().map(|row| row.values.clone()).collect(),
    };

    match &config.executor {
        ExecutorConfig::InMemory => {
            let mut executor = InMemoryExecutor::new(example);
            let result = synthesize_with(&symtab, &mut executor, target, &config.search);
            // Release the executor on every exit path (success, search
            // exhaustion, executor failure), per the resource policy.
            executor.close();
            result
        }
        #[cfg(feature = "bolt")]
        ExecutorConfig::Bolt { uri, user, password } => {
            let mut executor = cypher_pbe::executor::bolt::BoltExecutor::connect(uri, user, password)?;
            let result = synthesize_with(&symtab, &mut executor, target, &config.search);
            executor.close();
            result
        }
        #[cfg(not(feature = "bolt"))]
        ExecutorConfig::Bolt { .. } => {
            anyhow::bail!("executor.kind = \"bolt\" requires the `bolt` feature")
        }
    }
}

fn synthesize_with<E: Executor>(
    symtab: &SymbolTable,
    executor: &mut E,
    target: Table,
    search: &SearchConfig,
) -> anyhow::Result<String> {
    let mut synthesizer = Synthesizer::with_max_return_columns(
        symtab,
        executor,
        target,
        search.max_sketch_dequeues,
        search.max_return_columns,
    );
    Ok(synthesizer.synthesize()?)
}
