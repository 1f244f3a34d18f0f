//! # Sketch Completer
//!
//! Expands one [`Sketch`](crate::sketch::Sketch) into the stream of ground
//! [`Program`]s it admits (spec §4.4), by constructing partial programs
//! level by level and tracking the variable environment each one induces.
//!
//! The final `Return` level is the combinatorial hot spot (an environment
//! to the power of the output arity), so it is generated through a pulled
//! iterator rather than materialized up front: the caller — the
//! synthesizer — can stop drawing from it the moment a candidate wins
//! (spec §9 "Combinatorial growth").

use crate::error::{Error, Result};
use crate::idl::{Condition, Match, Node, Program, Relation, Return, Statement};
use crate::sketch::{Sketch, StatementKind};
use crate::symtab::SymbolTable;
use itertools::Itertools;
use std::collections::BTreeSet;

/// A program under construction, paired with the set of variables its
/// `Match` statements have bound so far.
#[derive(Debug, Clone, Default)]
struct PartialProgram {
    statements: Vec<Statement>,
    environment: BTreeSet<String>,
}

/// Expands sketches into ground programs against a fixed [`SymbolTable`].
pub struct SketchCompleter;

impl SketchCompleter {
    /// `complete(sketch, symtab) -> iterable<Program>` (spec §4.4).
    ///
    /// Fails with `MalformedSketch` if `sketch` does not begin with
    /// `Match`, does not end with `Return`, contains a `Return`
    /// anywhere but the final position, or — when `max_return_columns`
    /// is `Some` — the Example's return arity exceeds it (a guard
    /// against the Return level's k-fold Cartesian product blowing up
    /// on a degenerately wide output table; see `Config::search`).
    pub fn complete<'a>(
        sketch: &Sketch,
        symtab: &'a SymbolTable,
        max_return_columns: Option<usize>,
    ) -> Result<Box<dyn Iterator<Item = Program> + 'a>> {
        let (&last_kind, init_kinds) = sketch.split_last().ok_or_else(|| {
            Error::MalformedSketch("sketch is empty".to_string())
        })?;
        if init_kinds.first() != Some(&StatementKind::Match) {
            return Err(Error::MalformedSketch(
                "sketch does not begin with Match".to_string(),
            ));
        }
        if last_kind != StatementKind::Return {
            return Err(Error::MalformedSketch(
                "sketch does not end with Return".to_string(),
            ));
        }
        if init_kinds.contains(&StatementKind::Return) {
            return Err(Error::MalformedSketch(
                "Return may only appear as the sketch's final statement".to_string(),
            ));
        }
        if let Some(max) = max_return_columns {
            if symtab.fixed_return.len() > max {
                return Err(Error::MalformedSketch(format!(
                    "return arity {} exceeds configured max_return_columns {max}",
                    symtab.fixed_return.len()
                )));
            }
        }

        let mut partials = vec![PartialProgram::default()];
        for kind in init_kinds {
            let mut next_level = Vec::new();
            for partial in &partials {
                match kind {
                    StatementKind::Match => next_level.extend(expand_match(partial, symtab)),
                    StatementKind::Require => next_level.extend(expand_require(partial, symtab)),
                    StatementKind::Return => unreachable!("checked above"),
                }
            }
            partials = next_level;
        }

        let return_properties = symtab.fixed_return.clone();
        let arity = return_properties.len();
        let iter = partials.into_iter().flat_map(move |partial| {
            let statements = partial.statements;
            let environment: Vec<String> = partial.environment.into_iter().collect();
            let return_properties = return_properties.clone();
            std::iter::repeat(environment)
                .take(arity)
                .multi_cartesian_product()
                .map(move |chosen_tuple| {
                    let mut full = statements.clone();
                    full.push(Statement::Return(Return {
                        properties: return_properties.clone(),
                        variables: chosen_tuple,
                    }));
                    Program::new(full)
                })
        });
        Ok(Box::new(iter))
    }
}

fn expand_match(partial: &PartialProgram, symtab: &SymbolTable) -> Vec<PartialProgram> {
    let mut extensions = Vec::new();

    // Single-node branch, in Symbol Table order, precedes the triple
    // branch for determinism (spec §4.4).
    for node in &symtab.dsl_nodes {
        let mut statements = partial.statements.clone();
        statements.push(Statement::Match(Match::Node(Node {
            variable: node.variable.clone(),
            label: node.label.clone(),
        })));
        let mut environment = partial.environment.clone();
        environment.insert(node.variable.clone());
        extensions.push(PartialProgram { statements, environment });
    }

    // Triple branch: lexicographic over (label index, relation-label
    // index, label index), i.e. ordinary nested iteration in that order.
    for n1 in &symtab.dsl_nodes {
        for r in &symtab.dsl_relations {
            for n2 in &symtab.dsl_nodes {
                let mut statements = partial.statements.clone();
                statements.push(Statement::Match(Match::Triple(
                    Node { variable: n1.variable.clone(), label: n1.label.clone() },
                    Relation { variable: r.variable.clone(), label: r.label.clone() },
                    Node { variable: n2.variable.clone(), label: n2.label.clone() },
                )));
                let mut environment = partial.environment.clone();
                environment.insert(n1.variable.clone());
                environment.insert(r.variable.clone());
                environment.insert(n2.variable.clone());
                extensions.push(PartialProgram { statements, environment });
            }
        }
    }

    extensions
}

fn expand_require(partial: &PartialProgram, symtab: &SymbolTable) -> Vec<PartialProgram> {
    let mut extensions = Vec::new();
    for variable in &partial.environment {
        for property in symtab.properties_of_variable(variable) {
            for constant in &symtab.constants {
                let mut statements = partial.statements.clone();
                statements.push(Statement::Require(Condition::EqualTo {
                    variable: variable.clone(),
                    property: property.clone(),
                    constant: constant.clone(),
                }));
                extensions.push(PartialProgram {
                    statements,
                    environment: partial.environment.clone(),
                });
            }
        }
    }
    extensions
}
