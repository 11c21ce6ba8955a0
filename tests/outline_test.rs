//! Integration tests for outline reading, rendering and inspection.

use std::fs;
use std::path::Path;

use arbor::application::{ApplicationError, OutlineReader, TraversalOrder, TreeStats};
use arbor::util::testing;
use arbor::{Forest, OutlineStyle};
use rstest::{fixture, rstest};
use tempfile::tempdir;

#[fixture]
fn reader() -> OutlineReader {
    testing::init_test_setup();
    OutlineReader::default()
}

#[rstest]
fn given_forest_when_rendering_default_outline_then_two_space_levels() {
    let mut forest = Forest::new();
    let [a, b, c, d] = ["a", "b", "c", "d"].map(|v| forest.new_node(v));
    forest.add(a, b).unwrap();
    forest.add(a, c).unwrap();
    forest.add(b, d).unwrap();

    let text = forest.node(a).unwrap().to_string();

    assert_eq!(text, "+- a\n  +- b\n    +- d\n  +- c\n");
}

#[rstest]
fn given_sample_file_when_reading_then_two_trees(reader: OutlineReader) {
    let parsed = reader
        .read_file(Path::new("./tests/resources/outlines/sample.txt"))
        .unwrap();

    assert_eq!(parsed.roots.len(), 2);
    assert_eq!(parsed.forest.len(), 7);
    assert_eq!(
        parsed.walk(TraversalOrder::BreadthFirst),
        vec![vec!["a", "b", "c", "d", "e"], vec!["x", "y"]]
    );
}

#[rstest]
fn given_sample_file_when_rendering_then_reproduces_text_without_blank_lines(
    reader: OutlineReader,
) {
    let text = fs::read_to_string("./tests/resources/outlines/sample.txt").unwrap();
    let parsed = reader.parse(&text).unwrap();

    let rendered = parsed.render_outline(&OutlineStyle::default());

    assert_eq!(rendered, text.replace("\n\n", "\n"));
    assert_eq!(reader.parse(&rendered).unwrap().walk(TraversalOrder::Preorder), parsed.walk(TraversalOrder::Preorder));
}

#[rstest]
fn given_custom_style_when_reading_then_uses_its_indent_and_prefix() {
    let style = OutlineStyle {
        indent: 4,
        prefix: "- ".to_string(),
    };
    let reader = OutlineReader::new(style.clone());

    let parsed = reader
        .read_file(Path::new("./tests/resources/outlines/dashed.txt"))
        .unwrap();

    assert_eq!(
        parsed.stats(),
        vec![TreeStats {
            root: "root".to_string(),
            nodes: 4,
            depth: 2,
            leaves: 2,
        }]
    );
    assert_eq!(
        parsed.render_outline(&style),
        fs::read_to_string("./tests/resources/outlines/dashed.txt").unwrap()
    );
}

#[rstest]
fn given_level_jump_when_reading_then_outline_error_with_line(reader: OutlineReader) {
    let err = reader
        .read_file(Path::new("./tests/resources/outlines/jump.txt"))
        .unwrap_err();

    assert!(
        matches!(err, ApplicationError::Outline { line: 2, .. }),
        "unexpected error: {err}"
    );
}

#[rstest]
fn given_missing_file_when_reading_then_operation_failed(reader: OutlineReader) {
    let dir = tempdir().unwrap();
    let err = reader.read_file(&dir.path().join("absent.txt")).unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
    assert!(err.to_string().contains("absent.txt"), "{err}");
}

#[rstest]
fn given_sample_when_resolving_path_then_values_from_ancestor_down(reader: OutlineReader) {
    let text = fs::read_to_string("./tests/resources/outlines/sample.txt").unwrap();
    let parsed = reader.parse(&text).unwrap();

    assert_eq!(parsed.path("a", "e").unwrap(), vec!["a", "b", "e"]);
    assert_eq!(parsed.path("y", "y").unwrap(), vec!["y"]);
}

#[rstest]
fn given_sample_when_rendering_tree_then_box_drawing_per_root(reader: OutlineReader) {
    let parsed = reader.parse("+- x\n  +- y\n  +- z\n").unwrap();

    assert_eq!(parsed.render_tree(), "x\n├── y\n└── z\n");
}

#[rstest]
fn given_empty_text_when_parsing_then_empty_forest(reader: OutlineReader) {
    let parsed = reader.parse("\n\n").unwrap();

    assert!(parsed.roots.is_empty());
    assert!(parsed.forest.is_empty());
    assert!(parsed.walk(TraversalOrder::Postorder).is_empty());
}

#[rstest]
fn given_values_with_trailing_whitespace_when_rendered_and_read_then_values_kept(
    reader: OutlineReader,
) {
    let mut forest = Forest::new();
    let root = forest.new_node("padded  ".to_string());
    let child = forest.new_node("tab\t".to_string());
    forest.add(root, child).unwrap();
    let rendered = forest.node(root).unwrap().to_string();

    let parsed = reader.parse(&rendered).unwrap();

    assert_eq!(
        parsed.walk(TraversalOrder::Preorder),
        vec![vec!["padded  ".to_string(), "tab\t".to_string()]]
    );
    assert_eq!(parsed.render_outline(&OutlineStyle::default()), rendered);
}
