//! # cypher_pbe — Cypher query synthesis by example
//!
//! Synthesizes a graph-pattern query, in the Cypher language, from a
//! single input/output example: given a concrete property graph and a
//! target result table, this crate enumerates candidate programs in a
//! small intermediate DSL, prunes and executes them, and returns the
//! first one whose result matches the target table exactly.
//!
//! ## Pipeline
//!
//! ```text
//! Example (directory)
//!     ↓ [example::parse_example_dir]
//! Example
//!     ↓ [symtab::SymbolTable::build]
//! Symbol Table ──────────────────────────────┐
//!     ↓                                       │
//! [sketch::SketchQueue]  (sketch frontier)    │
//!     ↓ dequeue one sketch                    │
//! [completer::SketchCompleter::complete] ◄────┘
//!     ↓ stream of ground IDL programs
//! [transpiler::Transpiler::transpile]
//!     ↓ Cypher text
//! [executor::Executor::execute]
//!     ↓ result table
//! [validator::Validator::validate]
//!     ↓ match? return the program : try the next one, or expand the sketch
//! ```
//!
//! [`synthesizer::Synthesizer`] drives the whole loop. Everything above
//! it (`example`, `symtab`, `idl`, `sketch`, `completer`, `transpiler`,
//! `executor`, `validator`) is usable standalone for testing or for an
//! embedder that wants to drive the pipeline by hand.
//!
//! ## Module organization
//!
//! | Module | Responsibility |
//! |---|---|
//! | [`example`] | The input data model and its directory file format |
//! | [`symtab`] | Derives labels, variables, and the fixed `Return` shape |
//! | [`idl`] | The typed AST candidate programs are built from |
//! | [`sketch`] | The FIFO frontier of program templates |
//! | [`completer`] | Expands a sketch into its ground programs |
//! | [`transpiler`] | Renders a ground program to Cypher text |
//! | [`executor`] | Runs Cypher text and returns a result table |
//! | [`validator`] | Decides whether a result table matches the target |
//! | [`synthesizer`] | Orchestrates the above into one search loop |
//! | [`config`] | Hierarchical runtime configuration |
//! | [`error`] | The crate's stable error kinds |

pub mod completer;
pub mod config;
pub mod error;
pub mod example;
pub mod executor;
pub mod idl;
pub mod sketch;
pub mod symtab;
pub mod synthesizer;
pub mod transpiler;
pub mod validator;

pub use error::{Error, Result};
pub use example::Example;
pub use executor::{Executor, InMemoryExecutor, Row, Table};
pub use symtab::SymbolTable;
pub use synthesizer::Synthesizer;
