//! Command-line surface (spec §6 "CLI surface"): load an Example
//! directory, construct an executor, invoke synthesis, print the
//! winning query, and exit non-zero on `SearchExhausted`. Everything
//! else in this crate is a library usable without this binary.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "cypher-synth", bin_name = "cypher-synth")]
#[command(about = "Synthesize a Cypher query from a single input/output example")]
#[command(after_help = r#"EXAMPLES:
  cypher-synth --example examples/person_name
  cypher-synth --example examples/person_name --config cypher_pbe.toml
  cypher-synth --example examples/person_city --max-dequeues 20
  cypher-synth --example examples/person_city --bolt-uri bolt://localhost:7687 --bolt-user neo4j --bolt-password secret"#)]
pub struct Cli {
    /// Path to the example directory (spec §6 "Example directory").
    #[arg(long)]
    pub example: PathBuf,

    /// Path to a TOML config file, layered over the built-in defaults
    /// and `cypher_pbe.toml`/`cypher_pbe.local.toml` if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override `search.max_sketch_dequeues` from the config file.
    #[arg(long)]
    pub max_dequeues: Option<usize>,

    /// Override `logging.level` (a `tracing_subscriber::EnvFilter`
    /// directive, e.g. "info" or "cypher_pbe=debug,warn").
    #[arg(long)]
    pub log_level: Option<String>,

    /// Bolt connection URI. Selects the `bolt` executor for this run
    /// (requires the crate's `bolt` feature); must be paired with
    /// `--bolt-user` and `--bolt-password`.
    #[arg(long, requires_all = ["bolt_user", "bolt_password"])]
    pub bolt_uri: Option<String>,

    /// Bolt username, paired with `--bolt-uri`.
    #[arg(long)]
    pub bolt_user: Option<String>,

    /// Bolt password, paired with `--bolt-uri`.
    #[arg(long)]
    pub bolt_password: Option<String>,
}
