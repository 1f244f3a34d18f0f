//! Fluent builders for IDL programs, useful for tests and for the
//! `SketchCompleter`'s own internal assembly.
//!
//! ```rust
//! use cypher_pbe::idl::builders::ProgramBuilder;
//!
//! // MATCH (node0:Person) WITH * WHERE node0.name = "Ada" RETURN node0.name
//! let program = ProgramBuilder::new()
//!     .match_node("node0", "Person")
//!     .require_equal_to("node0", "name", "Ada")
//!     .return_column("name", "node0")
//!     .build();
//! ```

use super::{Condition, Match, Node, Program, Relation, Return, Statement};

/// Builder for a single [`Program`].
#[derive(Debug, Clone, Default)]
pub struct ProgramBuilder {
    statements: Vec<Statement>,
    return_properties: Vec<String>,
    return_variables: Vec<String>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        ProgramBuilder::default()
    }

    pub fn match_node(mut self, variable: &str, label: &str) -> Self {
        self.statements.push(Statement::Match(Match::Node(Node {
            variable: variable.to_string(),
            label: label.to_string(),
        })));
        self
    }

    pub fn match_triple(
        mut self,
        src_variable: &str,
        src_label: &str,
        rel_variable: &str,
        rel_label: &str,
        dst_variable: &str,
        dst_label: &str,
    ) -> Self {
        self.statements.push(Statement::Match(Match::Triple(
            Node { variable: src_variable.to_string(), label: src_label.to_string() },
            Relation { variable: rel_variable.to_string(), label: rel_label.to_string() },
            Node { variable: dst_variable.to_string(), label: dst_label.to_string() },
        )));
        self
    }

    pub fn require_equal_to(mut self, variable: &str, property: &str, constant: &str) -> Self {
        self.statements.push(Statement::Require(Condition::EqualTo {
            variable: variable.to_string(),
            property: property.to_string(),
            constant: constant.to_string(),
        }));
        self
    }

    pub fn return_column(mut self, property: &str, variable: &str) -> Self {
        self.return_properties.push(property.to_string());
        self.return_variables.push(variable.to_string());
        self
    }

    /// Appends the accumulated `Return` and produces the finished program.
    pub fn build(mut self) -> Program {
        self.statements.push(Statement::Return(Return {
            properties: self.return_properties,
            variables: self.return_variables,
        }));
        Program::new(self.statements)
    }
}
