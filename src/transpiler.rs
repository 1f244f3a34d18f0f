//! # Transpiler
//!
//! Renders a ground [`Program`] to the Cypher text described in spec
//! §4.2's rendering table. Walks the program once, fusing every
//! consecutive run of `Require` statements into a single `WITH *\nWHERE`
//! block, and always emitting the `Return` block — itself prefixed with
//! its own null-guard `WITH *\nWHERE` — last.

use crate::idl::{Condition, Match, Program, Statement};

/// Stateless Cypher renderer for ground IDL programs.
pub struct Transpiler;

impl Transpiler {
    /// Render `program` to Cypher text. `program` is assumed
    /// well-formed (`Program::is_well_formed`); the sketch completer is
    /// the only producer of `Program` values and already guarantees
    /// this.
    pub fn transpile(program: &Program) -> String {
        let mut lines: Vec<String> = Vec::new();
        let mut conditions: Vec<String> = Vec::new();

        let flush_conditions = |lines: &mut Vec<String>, conditions: &mut Vec<String>| {
            if conditions.is_empty() {
                return;
            }
            lines.push("WITH *".to_string());
            lines.push(format!("WHERE {}", conditions.join(" AND ")));
            conditions.clear();
        };

        for statement in &program.statements {
            match statement {
                Statement::Match(m) => {
                    flush_conditions(&mut lines, &mut conditions);
                    lines.push(render_match(m));
                }
                Statement::Require(condition) => {
                    conditions.push(render_condition(condition));
                }
                Statement::Return(ret) => {
                    flush_conditions(&mut lines, &mut conditions);
                    let null_guard = ret
                        .variables
                        .iter()
                        .zip(ret.properties.iter())
                        .map(|(v, p)| format!("{v}.{p} IS NOT NULL"))
                        .collect::<Vec<_>>()
                        .join(" AND ");
                    lines.push("WITH *".to_string());
                    lines.push(format!("WHERE {null_guard}"));
                    let projections = ret
                        .variables
                        .iter()
                        .zip(ret.properties.iter())
                        .map(|(v, p)| format!("{v}.{p}"))
                        .collect::<Vec<_>>()
                        .join(", ");
                    lines.push(format!("RETURN {projections}"));
                }
            }
        }

        lines.join("\n")
    }
}

fn render_match(m: &Match) -> String {
    match m {
        Match::Node(n) => format!("MATCH ({}:{})", n.variable, n.label),
        Match::Triple(n1, r, n2) => format!(
            "MATCH ({}:{})-[{}:{}]->({}:{})",
            n1.variable, n1.label, r.variable, r.label, n2.variable, n2.label
        ),
    }
}

fn render_condition(condition: &Condition) -> String {
    match condition {
        Condition::EqualTo { variable, property, constant } => {
            format!("{variable}.{property} = \"{}\"", escape_constant(constant))
        }
    }
}

/// Escapes `"` and `\` per Cypher string literal rules (spec §9 "open
/// question" resolution: raw newlines are rejected earlier, at Example
/// parse time, so they never reach this function).
fn escape_constant(constant: &str) -> String {
    constant.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idl::builders::ProgramBuilder;

    #[test]
    fn renders_single_node_match_with_no_property_block() {
        let program = ProgramBuilder::new()
            .match_node("node0", "Person")
            .return_column("name", "node0")
            .build();
        let cypher = Transpiler::transpile(&program);
        assert_eq!(
            cypher,
            "MATCH (node0:Person)\nWITH *\nWHERE node0.name IS NOT NULL\nRETURN node0.name"
        );
    }

    #[test]
    fn renders_triple_match() {
        let program = ProgramBuilder::new()
            .match_triple("node0", "Person", "rel0", "LIVES_IN", "node1", "City")
            .return_column("name", "node1")
            .build();
        let cypher = Transpiler::transpile(&program);
        assert!(cypher.starts_with("MATCH (node0:Person)-[rel0:LIVES_IN]->(node1:City)\n"));
    }

    #[test]
    fn fuses_consecutive_requires_into_one_where_block() {
        let program = ProgramBuilder::new()
            .match_node("node0", "Person")
            .require_equal_to("node0", "name", "Ada")
            .require_equal_to("node0", "age", "36")
            .return_column("name", "node0")
            .build();
        let cypher = Transpiler::transpile(&program);
        assert_eq!(
            cypher,
            "MATCH (node0:Person)\nWITH *\nWHERE node0.name = \"Ada\" AND node0.age = \"36\"\nWITH *\nWHERE node0.name IS NOT NULL\nRETURN node0.name"
        );
    }

    #[test]
    fn escapes_quotes_and_backslashes_in_constants() {
        let program = ProgramBuilder::new()
            .match_node("node0", "Person")
            .require_equal_to("node0", "name", "Ada \"Lovelace\" \\")
            .return_column("name", "node0")
            .build();
        let cypher = Transpiler::transpile(&program);
        assert!(cypher.contains(r#"node0.name = "Ada \"Lovelace\" \\""#));
    }
}
