//! # IDL — the intermediate DSL programs are synthesized in
//!
//! A closed set of statement variants with pattern-matched transpilation
//! (spec §3 "IDL", §9 "Class hierarchies become sum types"). There is no
//! open inheritance here: adding a new `Condition` variant is the only
//! place this AST is meant to grow, and the transpiler's `match` on
//! `Condition` is where that growth would need a new arm.

pub mod builders;

use serde::{Deserialize, Serialize};

/// A single node pattern: `Node(var, label)` -> Cypher `(var:label)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub variable: String,
    pub label: String,
}

/// A single directed-edge pattern: `Relation(var, label)` -> Cypher
/// `-[var:label]->`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub variable: String,
    pub label: String,
}

/// A `Match` statement: either a single node or a directed triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Match {
    Node(Node),
    Triple(Node, Relation, Node),
}

impl Match {
    /// Every variable this Match binds, in pattern order.
    pub fn bound_variables(&self) -> Vec<&str> {
        match self {
            Match::Node(n) => vec![n.variable.as_str()],
            Match::Triple(n1, r, n2) => vec![n1.variable.as_str(), r.variable.as_str(), n2.variable.as_str()],
        }
    }
}

/// A predicate usable in a `Require` statement. Currently a singleton
/// variant by spec design (spec §9): kept as an enum so a future
/// `NotEqual`/`InSet` kind only needs a new variant plus a new arm in
/// the transpiler, not a redesign of `Require`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    /// `variable.property = "constant"`.
    EqualTo {
        variable: String,
        property: String,
        constant: String,
    },
}

impl Condition {
    pub fn variable(&self) -> &str {
        match self {
            Condition::EqualTo { variable, .. } => variable,
        }
    }
}

/// A `Return` statement: parallel `properties`/`variables` sequences of
/// equal length, each binding one output column to a `variable.property`
/// projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Return {
    pub properties: Vec<String>,
    pub variables: Vec<String>,
}

/// One statement in an IDL program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statement {
    Match(Match),
    Require(Condition),
    Return(Return),
}

/// A sequence of statements. Validity (spec §3 "IDL"):
/// 1. at least one `Match` at the head,
/// 2. zero or more `Require` after the Matches,
/// 3. exactly one `Return` at the tail.
///
/// `Program` itself does not enforce this — the `SketchCompleter` is the
/// only place that constructs one, and it does so by construction from
/// an already-validated `Sketch`. See `Program::is_well_formed` for the
/// checkable version of the invariant, used by tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new(statements: Vec<Statement>) -> Self {
        Program { statements }
    }

    /// Checks the shape invariant from spec §3: Matches first, then
    /// Requires, then exactly one trailing Return.
    pub fn is_well_formed(&self) -> bool {
        let Some((last, rest)) = self.statements.split_last() else {
            return false;
        };
        if !matches!(last, Statement::Return(_)) {
            return false;
        }
        let mut seen_require = false;
        for stmt in rest {
            match stmt {
                Statement::Match(_) if !seen_require => {}
                Statement::Require(_) => seen_require = true,
                _ => return false,
            }
        }
        // At least one Match before the first Require/Return.
        rest.iter().any(|s| matches!(s, Statement::Match(_)))
    }

    /// Every variable referenced by a `Require` or `Return`, in
    /// statement order (spec §8 "Variable closure" checks these are all
    /// bound by a preceding `Match`).
    pub fn referenced_variables(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for stmt in &self.statements {
            match stmt {
                Statement::Require(cond) => out.push(cond.variable()),
                Statement::Return(ret) => out.extend(ret.variables.iter().map(String::as_str)),
                Statement::Match(_) => {}
            }
        }
        out
    }

    /// Every variable bound by some `Match` in the program.
    pub fn bound_variables(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for stmt in &self.statements {
            if let Statement::Match(m) = stmt {
                out.extend(m.bound_variables());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(v: &str, l: &str) -> Node {
        Node { variable: v.into(), label: l.into() }
    }

    #[test]
    fn well_formed_single_node_program() {
        let program = Program::new(vec![
            Statement::Match(Match::Node(node("node0", "Person"))),
            Statement::Return(Return {
                properties: vec!["name".into()],
                variables: vec!["node0".into()],
            }),
        ]);
        assert!(program.is_well_formed());
    }

    #[test]
    fn rejects_program_without_leading_match() {
        let program = Program::new(vec![Statement::Return(Return {
            properties: vec!["name".into()],
            variables: vec!["node0".into()],
        })]);
        assert!(!program.is_well_formed());
    }

    #[test]
    fn rejects_program_without_trailing_return() {
        let program = Program::new(vec![Statement::Match(Match::Node(node("node0", "Person")))]);
        assert!(!program.is_well_formed());
    }

    #[test]
    fn referenced_and_bound_variables() {
        let program = Program::new(vec![
            Statement::Match(Match::Node(node("node0", "Person"))),
            Statement::Require(Condition::EqualTo {
                variable: "node0".into(),
                property: "name".into(),
                constant: "Ada".into(),
            }),
            Statement::Return(Return {
                properties: vec!["name".into()],
                variables: vec!["node0".into()],
            }),
        ]);
        assert_eq!(program.bound_variables(), vec!["node0"]);
        assert_eq!(program.referenced_variables(), vec!["node0", "node0"]);
    }
}
