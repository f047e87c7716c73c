use rstest::rstest;
use xpath_tester::{selection_path, Document, TrackingMode};

const XML: &str = r#"<root xmlns:p="urn:p"><child><p:grandchild n="1"/></child></root>"#;

fn nested() -> (Document, Vec<xpath_tester::Node>) {
    let doc = Document::parse(XML).unwrap();
    let root = doc.document_element().unwrap();
    let mut nodes = vec![doc.root(), root];
    nodes.extend(doc.descendants(root));
    (doc, nodes)
}

#[rstest]
#[case(TrackingMode::None, None)]
#[case(TrackingMode::NodeName, Some(""))]
#[case(TrackingMode::Positional, Some("root/child/p:grandchild"))]
#[case(TrackingMode::AttributeDifferentiator, Some("root/child/p:grandchild"))]
fn test_nested_element(#[case] mode: TrackingMode, #[case] expected: Option<&str>) {
    let (doc, nodes) = nested();
    let grandchild = nodes
        .into_iter()
        .find(|node| doc.node_name(*node) == "p:grandchild")
        .unwrap();
    assert_eq!(selection_path(&doc, grandchild, mode).as_deref(), expected);
}

#[rstest]
#[case(TrackingMode::NodeName)]
#[case(TrackingMode::Positional)]
#[case(TrackingMode::AttributeDifferentiator)]
fn test_document_root_is_empty(#[case] mode: TrackingMode) {
    let (doc, _) = nested();
    assert_eq!(selection_path(&doc, doc.root(), mode).as_deref(), Some(""));
}

#[test]
fn test_path_selects_node() {
    let (doc, nodes) = nested();
    let namespaces = xpath_tester::harvest_namespaces(&doc);
    let grandchild = nodes[3];
    let path = selection_path(&doc, grandchild, TrackingMode::Positional).unwrap();
    let selected = xpath_tester::XPath::compile(&path)
        .unwrap()
        .select(&doc, &namespaces)
        .unwrap();
    assert_eq!(selected, vec![grandchild]);
}

#[rstest]
#[case(0, "none")]
#[case(1, "name")]
#[case(2, "positional")]
#[case(3, "attribute")]
fn test_mode_indices(#[case] index: usize, #[case] label: &str) {
    let mode = TrackingMode::from_index(index).unwrap();
    assert_eq!(mode.index(), index);
    assert_eq!(mode.to_string(), label);
    assert_eq!(label.parse::<TrackingMode>().unwrap(), mode);
}

#[test]
fn test_default_mode() {
    assert_eq!(TrackingMode::default(), TrackingMode::None);
}
