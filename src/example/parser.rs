//! Parses an example directory into an [`Example`].
//!
//! File format (spec §6):
//!
//! ```text
//! output
//! <col1>,<col2>,...
//! <val1>,<val2>,...
//!
//! node,<label>
//! <prop1>,<prop2>,...
//! <id>,<val1>,<val2>,...
//!
//! rel,<label>
//! id,<src_label>,<dst_label>[,<prop1>,...]
//! <rel_id>,<src_id>,<dst_id>[,<val1>,...]
//!
//! constant
//! <literal 1>
//! <literal 2>
//! ```
//!
//! Node files are parsed before relation files regardless of directory
//! order, since a relation references its endpoints by label + id.

use super::{Example, Node, OutputRow, Relation};
use crate::error::{Error, Result};
use std::path::Path;

const KIND_OUTPUT: &str = "output";
const KIND_NODE: &str = "node";
const KIND_RELATION: &str = "rel";
const KIND_CONSTANT: &str = "constant";

/// Parse every file in `dir` into an [`Example`].
pub fn parse_example_dir(dir: &Path) -> Result<Example> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| Error::ExampleUnderspecified(format!("cannot read {}: {e}", dir.display())))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .collect();
    // Directory iteration order is not guaranteed by the OS; sort by
    // file name so `Example::node_label_order`/`relation_label_order`
    // (and everything the Symbol Table derives from them) is stable
    // across repeated builds, per spec §8 "Symbol stability".
    entries.sort_by_key(|e| e.file_name());

    let mut example = Example::default();
    let mut relation_files = Vec::new();

    for entry in &entries {
        let text = std::fs::read_to_string(entry.path())
            .map_err(|e| Error::ExampleUnderspecified(format!("{}: {e}", entry.path().display())))?;
        let mut lines = text.lines();
        let header = lines.next().unwrap_or_default();
        let mut header_parts = header.split(',');
        let kind = header_parts.next().unwrap_or_default();
        let rest: Vec<&str> = lines.collect();

        match kind {
            KIND_OUTPUT => parse_output(&mut example, &rest)?,
            KIND_NODE => {
                let label = header_parts.next().ok_or_else(|| {
                    Error::ExampleUnderspecified(format!(
                        "{}: node file missing label",
                        entry.path().display()
                    ))
                })?;
                parse_nodes(&mut example, label, &rest)?;
            }
            KIND_RELATION => {
                // Deferred: relations reference nodes by id and must be
                // parsed after every node file has been read.
                relation_files.push((entry.path(), rest));
            }
            KIND_CONSTANT => {
                for constant in rest {
                    if constant.is_empty() {
                        continue;
                    }
                    if constant.contains('\n') || constant.contains('\r') {
                        return Err(Error::ExampleUnderspecified(
                            "constant contains a raw newline".to_string(),
                        ));
                    }
                    example.constants.push(constant.to_string());
                }
            }
            other => {
                return Err(Error::UnknownExampleKind(format!(
                    "{} (in {})",
                    other,
                    entry.path().display()
                )))
            }
        }
    }

    for (path, rest) in relation_files {
        let text = std::fs::read_to_string(&path)
            .map_err(|e| Error::ExampleUnderspecified(format!("{}: {e}", path.display())))?;
        let header = text.lines().next().unwrap_or_default();
        let label = header
            .split(',')
            .nth(1)
            .ok_or_else(|| Error::ExampleUnderspecified(format!("{}: rel file missing label", path.display())))?;
        parse_relations(&mut example, label, &rest)?;
    }

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

    Ok(example)
}

fn parse_nodes(example: &mut Example, label: &str, lines: &[&str]) -> Result<()> {
    let mut iter = lines.iter();
    let header = iter.next().ok_or_else(|| {
        Error::ExampleUnderspecified(format!("node,{label}: missing property header"))
    })?;
    let property_names: Vec<&str> = header.split(',').collect();

    let mut nodes = Vec::new();
    for line in iter {
        if line.is_empty() {
            continue;
        }
        let values: Vec<&str> = line.split(',').collect();
        let id: i64 = values[0].parse().map_err(|_| {
            Error::ExampleUnderspecified(format!("node,{label}: non-integer id '{}'", values[0]))
        })?;
        let properties = property_names
            .iter()
            .skip(1)
            .zip(values.iter().skip(1))
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        nodes.push(Node {
            label: label.to_string(),
            id,
            properties,
        });
    }

    if !example.nodes.contains_key(label) {
        example.node_label_order.push(label.to_string());
    }
    example.nodes.entry(label.to_string()).or_default().extend(nodes);
    Ok(())
}

fn parse_relations(example: &mut Example, label: &str, lines: &[&str]) -> Result<()> {
    let mut iter = lines.iter();
    let header = iter.next().ok_or_else(|| {
        Error::ExampleUnderspecified(format!("rel,{label}: missing header"))
    })?;
    let header_parts: Vec<&str> = header.split(',').collect();
    if header_parts.len() < 3 {
        return Err(Error::ExampleUnderspecified(format!(
            "rel,{label}: header must be id,<src_label>,<dst_label>[,props...]"
        )));
    }
    let src_label = header_parts[1];
    let dst_label = header_parts[2];
    let property_names = &header_parts[3..];

    let mut relations = Vec::new();
    for line in iter {
        if line.is_empty() {
            continue;
        }
        let values: Vec<&str> = line.split(',').collect();
        if values.len() < 3 {
            return Err(Error::ExampleUnderspecified(format!(
                "rel,{label}: data line must be <id>,<src_id>,<dst_id>[,props...], got '{line}'"
            )));
        }
        let rel_id: i64 = values[0].parse().map_err(|_| {
            Error::ExampleUnderspecified(format!("rel,{label}: non-integer id '{}'", values[0]))
        })?;
        let src_id: i64 = values[1].parse().map_err(|_| {
            Error::ExampleUnderspecified(format!("rel,{label}: non-integer src id '{}'", values[1]))
        })?;
        let dst_id: i64 = values[2].parse().map_err(|_| {
            Error::ExampleUnderspecified(format!("rel,{label}: non-integer dst id '{}'", values[2]))
        })?;

        if example.find_node(src_label, src_id).is_none() {
            return Err(Error::ExampleUnderspecified(format!(
                "rel,{label}: src node {src_label}#{src_id} does not exist"
            )));
        }
        if example.find_node(dst_label, dst_id).is_none() {
            return Err(Error::ExampleUnderspecified(format!(
                "rel,{label}: dst node {dst_label}#{dst_id} does not exist"
            )));
        }

        let properties = property_names
            .iter()
            .zip(values.iter().skip(3))
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        relations.push(Relation {
            label: label.to_string(),
            id: rel_id,
            src_label: src_label.to_string(),
            src_id,
            dst_label: dst_label.to_string(),
            dst_id,
            properties,
        });
    }

    if !example.relations.contains_key(label) {
        example.relation_label_order.push(label.to_string());
    }
    example
        .relations
        .entry(label.to_string())
        .or_default()
        .extend(relations);
    Ok(())
}

fn parse_output(example: &mut Example, lines: &[&str]) -> Result<()> {
    let mut iter = lines.iter();
    let header = iter
        .next()
        .ok_or_else(|| Error::ExampleUnderspecified("output: missing header".to_string()))?;
    example.output_columns = header.split(',').map(str::to_string).collect();

    for line in iter {
        if line.is_empty() {
            continue;
        }
        example.output_rows.push(OutputRow {
            values: line.split(',').map(str::to_string).collect(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn parses_s1_single_node_example() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "person.txt", "node,Person\nid,name\n0,Ada\n1,Grace\n");
        write(tmp.path(), "out.txt", "output\nname\nAda\nGrace\n");

        let example = parse_example_dir(tmp.path()).unwrap();
        assert_eq!(example.node_label_order, vec!["Person"]);
        assert_eq!(example.nodes["Person"].len(), 2);
        assert_eq!(example.output_columns, vec!["name"]);
        assert_eq!(example.output_rows.len(), 2);
    }

    #[test]
    fn relation_references_existing_nodes() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a_person.txt", "node,Person\nid,name\n0,Ada\n");
        write(tmp.path(), "b_city.txt", "node,City\nid,name\n0,Boston\n");
        write(
            tmp.path(),
            "c_lives.txt",
            "rel,LIVES_IN\nid,Person,City\n0,0,0\n",
        );
        write(tmp.path(), "out.txt", "output\nname\nAda\n");

        let example = parse_example_dir(tmp.path()).unwrap();
        assert_eq!(example.relations["LIVES_IN"].len(), 1);
        let rel = &example.relations["LIVES_IN"][0];
        assert_eq!(rel.src_label, "Person");
        assert_eq!(rel.dst_label, "City");
    }

    #[test]
    fn relation_data_line_with_too_few_fields_is_underspecified() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a_person.txt", "node,Person\nid,name\n0,Ada\n");
        write(tmp.path(), "b_city.txt", "node,City\nid,name\n0,Boston\n");
        // Missing the dst id field entirely.
        write(tmp.path(), "c_lives.txt", "rel,LIVES_IN\nid,Person,City\n5,3\n");
        write(tmp.path(), "out.txt", "output\nname\nAda\n");

        let err = parse_example_dir(tmp.path()).unwrap_err();
        assert!(matches!(err, Error::ExampleUnderspecified(_)));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "weird.txt", "bogus\nfoo\n");
        let err = parse_example_dir(tmp.path()).unwrap_err();
        assert!(matches!(err, Error::UnknownExampleKind(_)));
    }

    #[test]
    fn missing_output_header_is_underspecified() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.txt", "node,Person\nid,name\n0,Ada\n");
        write(tmp.path(), "out.txt", "output\n");
        let err = parse_example_dir(tmp.path()).unwrap_err();
        assert!(matches!(err, Error::ExampleUnderspecified(_)));
    }
}
