//! # Synthesizer
//!
//! Top-level orchestration of the pipeline described in spec §2's data
//! flow diagram: `Example + Symbol Table -> Sketch Queue -> Sketch
//! Completer -> Transpiler -> Executor -> Validator`, looping until a
//! winning program is found or the sketch-dequeue limit is reached.

use crate::completer::SketchCompleter;
use crate::error::{Error, Result};
use crate::executor::{Executor, Table};
use crate::sketch::SketchQueue;
use crate::symtab::SymbolTable;
use crate::transpiler::Transpiler;
use crate::validator::Validator;

/// Drives enumerative search to a winning Cypher query, or fails with
/// `Error::SearchExhausted` once the configured sketch-dequeue limit is
/// hit (spec §4.3 "Termination").
pub struct Synthesizer<'a, E: Executor> {
    symtab: &'a SymbolTable,
    executor: &'a mut E,
    target: Table,
    max_sketch_dequeues: usize,
    max_return_columns: Option<usize>,
}

impl<'a, E: Executor> Synthesizer<'a, E> {
    pub fn new(symtab: &'a SymbolTable, executor: &'a mut E, target: Table, max_sketch_dequeues: usize) -> Self {
        Synthesizer::with_max_return_columns(symtab, executor, target, max_sketch_dequeues, None)
    }

    /// As [`Synthesizer::new`], additionally capping the Return level's
    /// k-fold Cartesian product at `max_return_columns` (`Config::search`'s
    /// guard against a degenerately wide output table).
    pub fn with_max_return_columns(
        symtab: &'a SymbolTable,
        executor: &'a mut E,
        target: Table,
        max_sketch_dequeues: usize,
        max_return_columns: Option<usize>,
    ) -> Self {
        Synthesizer { symtab, executor, target, max_sketch_dequeues, max_return_columns }
    }

    /// Run synthesis to completion.
    ///
    /// Dequeues sketches in FIFO order; for each, completes it into its
    /// stream of ground programs and validates each one in turn against
    /// `self.target`, short-circuiting on the first match. A sketch
    /// that produces no winner is expanded into its two successors
    /// (spec §4.3) and exploration continues with the next dequeue,
    /// until either a program wins or `max_sketch_dequeues` sketches
    /// have been dequeued.
    pub fn synthesize(&mut self) -> Result<String> {
        let mut queue = SketchQueue::new();
        let mut last_sketch_len = 0;

        while queue.dequeue_count() < self.max_sketch_dequeues {
            let Some(sketch) = queue.dequeue() else {
                break;
            };
            last_sketch_len = sketch.len();

            let candidates = SketchCompleter::complete(&sketch, self.symtab, self.max_return_columns)?;
            for program in candidates {
                let cypher = Transpiler::transpile(&program);
                match self.executor.execute(&cypher) {
                    Ok(table) => {
                        if Validator::validate(&table, &self.target) {
                            tracing::info!(sketch_len = sketch.len(), "synthesis succeeded");
                            return Ok(cypher);
                        }
                    }
                    Err(err) => {
                        // Non-fatal: the candidate is rejected, search
                        // continues (spec §4.5 "Error policy").
                        tracing::debug!(%err, cypher = %cypher, "candidate rejected by executor");
                    }
                }
            }

            queue.expand(&sketch);
        }

        Err(Error::SearchExhausted { last_program_size: last_sketch_len })
    }
}
