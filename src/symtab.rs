//! # Symbol Table
//!
//! Derives the fixed vocabulary used by the rest of the pipeline from a
//! single [`Example`]: labels, canonical property sets, generated IDL
//! variable names, and the fixed (but as-yet variable-less) `Return`
//! shape.
//!
//! ```text
//! Example -> [Symbol Table] -> SketchQueue / SketchCompleter
//! ```
//!
//! Built once, read-only for the rest of synthesis (spec §3 "Lifecycle").

use crate::error::{Error, Result};
use crate::example::Example;
use crate::idl::{Node as IdlNode, Relation as IdlRelation};
use std::collections::HashMap;

/// The symbol table built from an [`Example`] (spec §4.1).
#[derive(Debug, Clone)]
pub struct SymbolTable {
    /// Distinct node labels, in Example iteration order.
    pub node_labels: Vec<String>,
    /// Distinct relation labels, in Example iteration order.
    pub relation_labels: Vec<String>,
    /// Canonical property names per label (node or relation), taken
    /// from the first entity observed under that label.
    pub properties_of_label: HashMap<String, Vec<String>>,
    /// One IDL `Node` per node label, variable `node{k}`.
    pub dsl_nodes: Vec<IdlNode>,
    /// One IDL `Relation` per relation label, variable `rel{k}`.
    pub dsl_relations: Vec<IdlRelation>,
    /// Inverse index: IDL variable name -> the label it denotes.
    pub variable_to_label: HashMap<String, String>,
    /// Output column names, variables not yet assigned.
    pub fixed_return: Vec<String>,
    /// Permitted RHS constants for equality predicates.
    pub constants: Vec<String>,
}

impl SymbolTable {
    /// Build a symbol table from `example` (spec §4.1 `build`).
    ///
    /// Fails with `ExampleUnderspecified` if any family is empty or the
    /// output table has zero columns; the `Example` parser already
    /// enforces both, so this is mostly a defensive re-check for symbol
    /// tables built from a hand-constructed `Example` (e.g. in tests).
    pub fn build(example: &Example) -> Result<SymbolTable> {
        if example.node_label_order.is_empty() {
            return Err(Error::ExampleUnderspecified(
                "example declares no node families".to_string(),
            ));
        }
        if example.output_columns.is_empty() {
            return Err(Error::ExampleUnderspecified(
                "output table has zero columns".to_string(),
            ));
        }

        let mut properties_of_label = HashMap::new();
        let mut dsl_nodes = Vec::new();
        let mut variable_to_label = HashMap::new();

        for label in &example.node_label_order {
            let family = example.nodes.get(label).ok_or_else(|| {
                Error::ExampleUnderspecified(format!("node label '{label}' has no family"))
            })?;
            let first = family.first().ok_or_else(|| {
                Error::ExampleUnderspecified(format!("node label '{label}' has an empty family"))
            })?;
            let properties: Vec<String> = first.properties.iter().map(|(k, _)| k.clone()).collect();
            properties_of_label.insert(label.clone(), properties);

            let variable = format!("node{}", dsl_nodes.len());
            variable_to_label.insert(variable.clone(), label.clone());
            dsl_nodes.push(IdlNode {
                variable,
                label: label.clone(),
            });
        }

        let mut dsl_relations = Vec::new();
        for label in &example.relation_label_order {
            let family = example.relations.get(label).ok_or_else(|| {
                Error::ExampleUnderspecified(format!("relation label '{label}' has no family"))
            })?;
            let first = family.first().ok_or_else(|| {
                Error::ExampleUnderspecified(format!(
                    "relation label '{label}' has an empty family"
                ))
            })?;
            let properties: Vec<String> = first.properties.iter().map(|(k, _)| k.clone()).collect();
            properties_of_label.insert(label.clone(), properties);

            let variable = format!("rel{}", dsl_relations.len());
            variable_to_label.insert(variable.clone(), label.clone());
            dsl_relations.push(IdlRelation {
                variable,
                label: label.clone(),
            });
        }

        Ok(SymbolTable {
            node_labels: example.node_label_order.clone(),
            relation_labels: example.relation_label_order.clone(),
            properties_of_label,
            dsl_nodes,
            dsl_relations,
            variable_to_label,
            fixed_return: example.output_columns.clone(),
            constants: example.constants.clone(),
        })
    }

    /// Properties available on `variable`, looked up via its label.
    pub fn properties_of_variable(&self, variable: &str) -> &[String] {
        self.variable_to_label
            .get(variable)
            .and_then(|label| self.properties_of_label.get(label))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
