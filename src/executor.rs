//! # Executor
//!
//! The external collaborator the rest of the pipeline treats as an
//! opaque oracle (spec §1, §4.5): given Cypher text, run it and hand
//! back a result table. Two implementations live here:
//!
//! - [`InMemoryExecutor`] evaluates this crate's own restricted Cypher
//!   fragment directly against a parsed [`Example`], with no database
//!   dependency. This is the default and the one exercised in tests.
//! - [`bolt::BoltExecutor`] (behind the `bolt` feature) talks to a real
//!   Neo4j instance over the Bolt protocol via `neo4rs`, for running a
//!   synthesized query against the production database it was derived
//!   from.

use crate::example::Example;
use std::collections::HashMap;

/// A result table: column names plus rows of string-valued cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

/// One row of a [`Table`]: an ordered tuple of projected values.
pub type Row = Vec<String>;

/// Anything that can run Cypher text and return a table (spec §4.5).
pub trait Executor {
    /// Execute `cypher` and return its result table. Implementations
    /// should return `Err` (wrapped as `Error::ExecutorError`) rather
    /// than panicking on a query their backend cannot run; the search
    /// treats such a failure as a non-match for the candidate, not a
    /// fatal error (spec §4.5 "Error policy").
    fn execute(&mut self, cypher: &str) -> anyhow::Result<Table>;

    /// Release any resources held by the executor (connections,
    /// temporary state). Consumes `self` since no further calls are
    /// valid afterward.
    fn close(self)
    where
        Self: Sized;
}

/// Evaluates the restricted Cypher fragment this synthesizer emits
/// directly against an in-memory [`Example`], with no external
/// dependency. This is necessarily narrower than a real Cypher engine:
/// it understands exactly the statement shapes the [`Transpiler`](crate::transpiler::Transpiler)
/// produces (one or more `MATCH` clauses, an optional fused `WHERE`
/// block, a final null-guarded `RETURN`), nothing more.
pub struct InMemoryExecutor {
    example: Example,
}

impl InMemoryExecutor {
    pub fn new(example: Example) -> Self {
        InMemoryExecutor { example }
    }
}

impl Executor for InMemoryExecutor {
    fn execute(&mut self, cypher: &str) -> anyhow::Result<Table> {
        in_memory::run(&self.example, cypher)
    }

    fn close(self) {}
}

/// One variable binding produced while evaluating `MATCH` clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound<'a> {
    Node { label: &'a str, id: i64 },
    Relation { label: &'a str, id: i64 },
}

type Binding<'a> = HashMap<String, Bound<'a>>;

mod in_memory {
    use super::*;
    use anyhow::{anyhow, bail, Context};

    pub fn run(example: &Example, cypher: &str) -> anyhow::Result<Table> {
        let mut bindings: Vec<Binding> = vec![HashMap::new()];
        let mut columns = Vec::new();

        for line in cypher.lines() {
            if let Some(pattern) = line.strip_prefix("MATCH ") {
                bindings = apply_match(example, &bindings, pattern)?;
            } else if let Some(clause) = line.strip_prefix("WHERE ") {
                bindings = apply_where(example, &bindings, clause)?;
            } else if let Some(projection) = line.strip_prefix("RETURN ") {
                columns = projection.split(", ").map(str::to_string).collect();
            }
            // "WITH *" carries no filtering semantics of its own here.
        }

        if columns.is_empty() {
            bail!("query has no RETURN clause");
        }

        let mut rows = Vec::with_capacity(bindings.len());
        for binding in &bindings {
            let mut row = Vec::with_capacity(columns.len());
            for projection in &columns {
                let (variable, property) = projection
                    .split_once('.')
                    .with_context(|| format!("malformed projection '{projection}'"))?;
                let value = lookup_property(example, binding, variable, property)?;
                row.push(value);
            }
            rows.push(row);
        }

        Ok(Table { columns, rows })
    }

    fn apply_match<'a>(
        example: &'a Example,
        bindings: &[Binding<'a>],
        pattern: &str,
    ) -> anyhow::Result<Vec<Binding<'a>>> {
        if let Some(idx) = pattern.find("-[") {
            let (src, rest) = pattern.split_at(idx);
            let rest = rest.strip_prefix("-[").context("malformed relation pattern")?;
            let (rel_body, dst) = rest
                .split_once("]->")
                .context("malformed relation pattern, expected ']->'")?;
            let (src_var, src_label) = parse_node_pattern(src)?;
            let (rel_var, rel_label) = parse_bare_pair(rel_body)?;
            let (dst_var, dst_label) = parse_node_pattern(dst)?;

            let relations = example.relations.get(rel_label).map(Vec::as_slice).unwrap_or(&[]);
            let mut extended = Vec::new();
            for binding in bindings {
                for rel in relations {
                    if rel.src_label != src_label || rel.dst_label != dst_label {
                        continue;
                    }
                    let mut next = binding.clone();
                    let src_bound = Bound::Node { label: src_label, id: rel.src_id };
                    let rel_bound = Bound::Relation { label: rel_label, id: rel.id };
                    let dst_bound = Bound::Node { label: dst_label, id: rel.dst_id };
                    // A variable already bound by an earlier clause (or
                    // reused at both ends of this same triple, as in a
                    // self-joining pattern) constrains rather than
                    // rebinds: reject the extension if the reused
                    // variable disagrees with what this relation offers.
                    if try_bind(&mut next, src_var, src_bound)
                        && try_bind(&mut next, rel_var, rel_bound)
                        && try_bind(&mut next, dst_var, dst_bound)
                    {
                        extended.push(next);
                    }
                }
            }
            Ok(extended)
        } else {
            let (var, label) = parse_node_pattern(pattern)?;
            let nodes = example.nodes.get(label).map(Vec::as_slice).unwrap_or(&[]);
            let mut extended = Vec::new();
            for binding in bindings {
                for node in nodes {
                    let mut next = binding.clone();
                    if try_bind(&mut next, var, Bound::Node { label, id: node.id }) {
                        extended.push(next);
                    }
                }
            }
            Ok(extended)
        }
    }

    /// Binds `var` to `bound` in `binding`, unless `var` is already bound
    /// to something else — in which case the clause that reuses a
    /// variable constrains the match rather than rebinding it, so the
    /// caller should drop this extension instead of overwriting it.
    fn try_bind<'a>(binding: &mut Binding<'a>, var: &str, bound: Bound<'a>) -> bool {
        match binding.get(var) {
            Some(existing) if *existing != bound => false,
            _ => {
                binding.insert(var.to_string(), bound);
                true
            }
        }
    }

    fn apply_where<'a>(
        example: &Example,
        bindings: &[Binding<'a>],
        clause: &str,
    ) -> anyhow::Result<Vec<Binding<'a>>> {
        let predicates: Vec<&str> = clause.split(" AND ").collect();
        let mut surviving = Vec::new();
        'binding: for binding in bindings {
            for predicate in &predicates {
                if !evaluate_predicate(example, binding, predicate)? {
                    continue 'binding;
                }
            }
            surviving.push(binding.clone());
        }
        Ok(surviving)
    }

    fn evaluate_predicate(example: &Example, binding: &Binding, predicate: &str) -> anyhow::Result<bool> {
        if let Some(projection) = predicate.strip_suffix(" IS NOT NULL") {
            let (variable, property) = projection
                .split_once('.')
                .with_context(|| format!("malformed predicate '{predicate}'"))?;
            return Ok(property_value_owned(example, binding, variable, property)?.is_some());
        }
        let (lhs, rhs) = predicate
            .split_once(" = ")
            .with_context(|| format!("malformed predicate '{predicate}'"))?;
        let (variable, property) = lhs
            .split_once('.')
            .with_context(|| format!("malformed predicate '{predicate}'"))?;
        let expected = unescape_constant(rhs.trim_matches('"'));
        let actual = property_value_owned(example, binding, variable, property)?;
        Ok(actual.as_deref() == Some(expected.as_str()))
    }

    fn lookup_property(
        example: &Example,
        binding: &Binding,
        variable: &str,
        property: &str,
    ) -> anyhow::Result<String> {
        property_value_owned(example, binding, variable, property)?
            .ok_or_else(|| anyhow!("variable '{variable}' has no property '{property}'"))
    }

    fn property_value_owned(
        example: &Example,
        binding: &Binding,
        variable: &str,
        property: &str,
    ) -> anyhow::Result<Option<String>> {
        let bound = binding
            .get(variable)
            .ok_or_else(|| anyhow!("unbound variable '{variable}'"))?;
        Ok(match bound {
            Bound::Node { label, id } => example
                .find_node(label, *id)
                .and_then(|n| n.property(property))
                .map(str::to_string),
            Bound::Relation { label, id } => example
                .relations
                .get(*label)
                .and_then(|family| family.iter().find(|r| r.id == *id))
                .and_then(|r| r.property(property))
                .map(str::to_string),
        })
    }

    fn parse_node_pattern(text: &str) -> anyhow::Result<(&str, &str)> {
        let inner = text
            .trim()
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .with_context(|| format!("malformed node pattern '{text}'"))?;
        parse_bare_pair(inner)
    }

    fn parse_bare_pair(text: &str) -> anyhow::Result<(&str, &str)> {
        text.split_once(':')
            .with_context(|| format!("malformed 'variable:label' pair '{text}'"))
    }

    fn unescape_constant(escaped: &str) -> String {
        let mut out = String::with_capacity(escaped.len());
        let mut chars = escaped.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                if let Some(next) = chars.next() {
                    out.push(next);
                    continue;
                }
            }
            out.push(c);
        }
        out
    }
}

#[cfg(feature = "bolt")]
pub mod bolt {
    //! A real Neo4j backend over the Bolt protocol. Feature-gated since
    //! most development and every test run against [`super::InMemoryExecutor`]
    //! instead.

    use super::{Executor, Row, Table};
    use anyhow::Context;
    use neo4rs::Graph;

    /// Runs candidate Cypher against a live Neo4j instance. Bridges
    /// `neo4rs`'s async API to the synchronous `Executor` trait with a
    /// small current-thread Tokio runtime, since the rest of the search
    /// is single-threaded and synchronous (spec §5).
    pub struct BoltExecutor {
        graph: Graph,
        runtime: tokio::runtime::Runtime,
    }

    impl BoltExecutor {
        pub fn connect(uri: &str, user: &str, password: &str) -> anyhow::Result<Self> {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("failed to start Bolt runtime")?;
            let graph = runtime
                .block_on(Graph::new(uri, user, password))
                .context("failed to connect to Neo4j over Bolt")?;
            Ok(BoltExecutor { graph, runtime })
        }
    }

    impl Executor for BoltExecutor {
        fn execute(&mut self, cypher: &str) -> anyhow::Result<Table> {
            let graph = self.graph.clone();
            let query = neo4rs::query(cypher);
            self.runtime.block_on(async move {
                let mut stream = graph.execute(query).await.context("bolt query failed")?;
                let mut columns: Vec<String> = Vec::new();
                let mut rows: Vec<Row> = Vec::new();
                while let Some(row) = stream.next().await.context("bolt row fetch failed")? {
                    if columns.is_empty() {
                        columns = row.keys().into_iter().map(str::to_string).collect();
                    }
                    let mut values = Vec::with_capacity(columns.len());
                    for column in &columns {
                        let value: String = row.get(column).unwrap_or_default();
                        values.push(value);
                    }
                    rows.push(values);
                }
                Ok(Table { columns, rows })
            })
        }

        fn close(self) {
            drop(self.graph);
        }
    }
}
