//! Configuration System
//!
//! Provides hierarchical configuration loading from:
//! - `cypher_pbe.toml` (base configuration, if present)
//! - `cypher_pbe.local.toml` (git-ignored local overrides, if present)
//! - Environment variables (`CYPHER_PBE_*` prefix)
//!
//! ## Example
//!
//! ```toml
//! # cypher_pbe.toml
//! [search]
//! max_sketch_dequeues = 10
//!
//! [executor]
//! kind = "in_memory"
//! ```
//!
//! Environment variable overrides:
//! ```bash
//! CYPHER_PBE_SEARCH__MAX_SKETCH_DEQUEUES=20
//! CYPHER_PBE_EXECUTOR__KIND=bolt
//! ```

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Top-level configuration for a synthesis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub search: SearchConfig,
    #[serde(default)]
    pub executor: ExecutorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Bounds on the sketch-queue search described in spec §4.3.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of sketches dequeued before giving up with
    /// `Error::SearchExhausted`.
    #[serde(default = "default_max_sketch_dequeues")]
    pub max_sketch_dequeues: usize,

    /// Optional cap on the output table's return arity: the
    /// `SketchCompleter` rejects a sketch with `Error::MalformedSketch`
    /// before attempting its Return-level k-fold environment product if
    /// `fixed_return.len()` exceeds this. `None` means uncapped. Not a
    /// spec invariant, just a guard against a degenerate example with a
    /// very wide output table.
    #[serde(default)]
    pub max_return_columns: Option<usize>,
}

fn default_max_sketch_dequeues() -> usize {
    10
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_sketch_dequeues: default_max_sketch_dequeues(),
            max_return_columns: None,
        }
    }
}

/// Which `Executor` implementation the CLI should construct.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ExecutorConfig {
    /// Evaluate the restricted Cypher fragment directly against the
    /// parsed example, no network dependency.
    InMemory,
    /// Talk to a real Neo4j instance over Bolt. Only available when
    /// this crate is built with the `bolt` feature.
    Bolt {
        uri: String,
        user: String,
        password: String,
    },
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        ExecutorConfig::InMemory
    }
}

/// Logging configuration, consumed once at process start by `main`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. "info" or
    /// "cypher_pbe=debug,warn".
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON-formatted log lines instead of the default pretty text.
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            search: SearchConfig::default(),
            executor: ExecutorConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default locations: built-in defaults,
    /// then `cypher_pbe.toml`, then `cypher_pbe.local.toml`, then
    /// `CYPHER_PBE_*` environment variables, each layer overriding the
    /// previous one where it sets a value.
    pub fn load() -> Result<Self, figment::Error> {
        Figment::from(figment::providers::Serialized::defaults(Config::default()))
            .merge(Toml::file("cypher_pbe.toml"))
            .merge(Toml::file("cypher_pbe.local.toml"))
            .merge(Env::prefixed("CYPHER_PBE_").split("__"))
            .extract()
    }

    /// Load configuration from a specific file path, still subject to
    /// environment variable overrides.
    pub fn from_file(path: &str) -> Result<Self, figment::Error> {
        Figment::from(figment::providers::Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("CYPHER_PBE_").split("__"))
            .extract()
    }
}
