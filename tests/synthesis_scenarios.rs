//! End-to-end scenarios (spec §8) and cross-cutting testable properties,
//! run against the in-memory `Executor` so the whole suite has no
//! network dependency (spec §1 excludes "driving the backing Cypher
//! execution engine" from the core's scope; `InMemoryExecutor` is the
//! crate's own stand-in oracle for exactly that reason).

use cypher_pbe::completer::SketchCompleter;
use cypher_pbe::example::{parse_example_dir, Example, Node as ExampleNode, OutputRow};
use cypher_pbe::executor::{InMemoryExecutor, Table};
use cypher_pbe::sketch::StatementKind;
use cypher_pbe::symtab::SymbolTable;
use cypher_pbe::synthesizer::Synthesizer;
use cypher_pbe::Error;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn target_table(example: &Example) -> Table {
    Table {
        columns: example.output_columns.clone(),
        rows: example.output_rows.iter().map(|row| row.values.clone()).collect(),
    }
}

/// S1 — single-node projection, loaded from an on-disk example
/// directory, exercising the parser + symbol table + search loop
/// together.
#[test]
fn s1_single_node_projection_from_directory() {
    let example = parse_example_dir(&fixture("s1_person_name")).unwrap();
    let symtab = SymbolTable::build(&example).unwrap();
    let target = target_table(&example);
    let mut executor = InMemoryExecutor::new(example);

    let mut synth = Synthesizer::new(&symtab, &mut executor, target, 10);
    let cypher = synth.synthesize().unwrap();
    assert_eq!(
        cypher,
        "MATCH (node0:Person)\nWITH *\nWHERE node0.name IS NOT NULL\nRETURN node0.name"
    );
}

/// S3 — relation projection across a `LIVES_IN` edge, loaded from an
/// on-disk example directory.
#[test]
fn s3_relation_projection_from_directory() {
    let example = parse_example_dir(&fixture("s3_person_city")).unwrap();
    let symtab = SymbolTable::build(&example).unwrap();
    let target = target_table(&example);
    let mut executor = InMemoryExecutor::new(example);

    let mut synth = Synthesizer::new(&symtab, &mut executor, target, 10);
    let cypher = synth.synthesize().unwrap();
    assert_eq!(
        cypher,
        "MATCH (node0:Person)-[rel0:LIVES_IN]->(node1:City)\nWITH *\nWHERE node0.name IS NOT NULL AND node1.name IS NOT NULL\nRETURN node0.name, node1.name"
    );
}

/// S4 — exhaustion: a target value that appears nowhere in the graph
/// and is not offered as a constant can never be matched.
#[test]
fn s4_search_exhausted_when_no_program_can_match() {
    let mut example = Example::default();
    example.node_label_order.push("Person".to_string());
    example.nodes.insert(
        "Person".to_string(),
        vec![ExampleNode { label: "Person".into(), id: 0, properties: vec![("name".into(), "Ada".into())] }],
    );
    example.output_columns = vec!["name".to_string()];
    example.output_rows = vec![OutputRow { values: vec!["Nobody".to_string()] }];

    let symtab = SymbolTable::build(&example).unwrap();
    let target = target_table(&example);
    let mut executor = InMemoryExecutor::new(example);

    let mut synth = Synthesizer::new(&symtab, &mut executor, target, 4);
    let err = synth.synthesize().unwrap_err();
    match err {
        Error::SearchExhausted { last_program_size } => assert!(last_program_size > 0),
        other => panic!("expected SearchExhausted, got {other:?}"),
    }
}

/// S6 — a node missing the projected property must not count as a
/// spurious row: the null-guard the Transpiler always emits ahead of
/// `RETURN` filters it out before the Validator ever sees it.
#[test]
fn s6_rows_with_missing_properties_are_filtered_before_validation() {
    let mut example = Example::default();
    example.node_label_order.push("Person".to_string());
    example.nodes.insert(
        "Person".to_string(),
        vec![
            ExampleNode { label: "Person".into(), id: 0, properties: vec![("name".into(), "Ada".into())] },
            // No "name" property at all on this row: property() returns
            // None for it, so the `IS NOT NULL` guard drops it.
            ExampleNode { label: "Person".into(), id: 1, properties: vec![("nickname".into(), "Grace".into())] },
        ],
    );
    example.output_columns = vec!["name".to_string()];
    example.output_rows = vec![OutputRow { values: vec!["Ada".to_string()] }];

    let symtab = SymbolTable::build(&example).unwrap();
    let target = target_table(&example);
    let mut executor = InMemoryExecutor::new(example);

    let mut synth = Synthesizer::new(&symtab, &mut executor, target, 10);
    let cypher = synth.synthesize().unwrap();
    assert_eq!(
        cypher,
        "MATCH (node0:Person)\nWITH *\nWHERE node0.name IS NOT NULL\nRETURN node0.name"
    );
}

fn two_label_example() -> Example {
    let mut example = Example::default();
    example.node_label_order.push("Person".to_string());
    example.node_label_order.push("City".to_string());
    example.nodes.insert(
        "Person".to_string(),
        vec![ExampleNode { label: "Person".into(), id: 0, properties: vec![("name".into(), "Ada".into())] }],
    );
    example.nodes.insert(
        "City".to_string(),
        vec![ExampleNode { label: "City".into(), id: 0, properties: vec![("name".into(), "Boston".into())] }],
    );
    example.output_columns = vec!["name".to_string()];
    example.output_rows = vec![OutputRow { values: vec!["Ada".to_string()] }];
    example
}

/// Testable property 1 (spec §8): two builds of the Symbol Table from
/// the same Example yield identical derived vocabulary, in identical
/// order.
#[test]
fn property_symbol_table_build_is_stable() {
    let example = two_label_example();
    let first = SymbolTable::build(&example).unwrap();
    let second = SymbolTable::build(&example).unwrap();
    assert_eq!(first.dsl_nodes, second.dsl_nodes);
    assert_eq!(first.dsl_relations, second.dsl_relations);
    assert_eq!(first.fixed_return, second.fixed_return);
}

/// Testable property 2 (spec §8): every sketch the queue ever dequeues
/// begins with `Match` and ends with `Return`.
#[test]
fn property_every_dequeued_sketch_obeys_shape() {
    use cypher_pbe::sketch::SketchQueue;

    let mut queue = SketchQueue::new();
    let mut dequeued = Vec::new();
    for _ in 0..6 {
        let Some(sketch) = queue.dequeue() else { break };
        dequeued.push(sketch.clone());
        queue.expand(&sketch);
    }

    assert!(!dequeued.is_empty());
    for sketch in &dequeued {
        assert_eq!(sketch.first(), Some(&StatementKind::Match));
        assert_eq!(sketch.last(), Some(&StatementKind::Return));
        for kind in &sketch[1..sketch.len() - 1] {
            assert!(matches!(kind, StatementKind::Match | StatementKind::Require));
        }
    }
}

/// Testable property 3 (spec §8): every ground program the completer
/// emits only references variables bound by a preceding `Match`.
#[test]
fn property_ground_programs_have_closed_variable_references() {
    let mut example = two_label_example();
    example.relation_label_order.push("LIVES_IN".to_string());
    example.relations.insert(
        "LIVES_IN".to_string(),
        vec![cypher_pbe::example::Relation {
            label: "LIVES_IN".into(),
            id: 0,
            src_label: "Person".into(),
            src_id: 0,
            dst_label: "City".into(),
            dst_id: 0,
            properties: vec![],
        }],
    );
    example.constants = vec!["Ada".to_string()];

    let symtab = SymbolTable::build(&example).unwrap();
    for sketch in [
        vec![StatementKind::Match, StatementKind::Return],
        vec![StatementKind::Match, StatementKind::Require, StatementKind::Return],
        vec![StatementKind::Match, StatementKind::Match, StatementKind::Return],
    ] {
        let programs: Vec<_> = SketchCompleter::complete(&sketch, &symtab, None).unwrap().collect();
        assert!(!programs.is_empty());
        for program in programs {
            assert!(program.is_well_formed());
            let bound: std::collections::HashSet<&str> = program.bound_variables().into_iter().collect();
            for referenced in program.referenced_variables() {
                assert!(bound.contains(referenced), "'{referenced}' is not bound by any preceding Match");
            }
        }
    }
}

/// Testable property 6 (spec §8): re-running synthesis against the
/// same Example and the same executor responses yields the same
/// first-accepted program, since both the sketch queue and the
/// completer are fully deterministic (spec §5 "Ordering guarantees").
#[test]
fn property_synthesis_is_deterministic() {
    let example = two_label_example();
    let symtab = SymbolTable::build(&example).unwrap();
    let target = target_table(&example);

    let mut executor_a = InMemoryExecutor::new(example.clone());
    let mut synth_a = Synthesizer::new(&symtab, &mut executor_a, target.clone(), 10);
    let first = synth_a.synthesize().unwrap();

    let mut executor_b = InMemoryExecutor::new(example);
    let mut synth_b = Synthesizer::new(&symtab, &mut executor_b, target, 10);
    let second = synth_b.synthesize().unwrap();

    assert_eq!(first, second);
}
