use xpath_tester::{selection_path, Document, Outline, TrackingMode};

const XML: &str = r#"<root><child a="1"><grandchild/>text</child><!--c--><other/></root>"#;

fn texts(outline: &Outline) -> Vec<(usize, String)> {
    outline
        .items()
        .into_iter()
        .map(|(depth, id)| (depth, outline.item(id).unwrap().text().to_string()))
        .collect()
}

#[test]
fn test_expand_everything() {
    let doc = Document::parse(XML).unwrap();
    let mut outline = Outline::new(&doc);
    let mut pending = vec![outline.root().unwrap()];
    while let Some(id) = pending.pop() {
        outline.materialize_children(&doc, id);
        pending.extend(outline.children(id));
    }
    assert_eq!(
        texts(&outline),
        vec![
            (0, "root".to_string()),
            (1, "child".to_string()),
            (2, "grandchild".to_string()),
            (2, "#text".to_string()),
            (1, "#comment".to_string()),
            (1, "other".to_string()),
        ]
    );
}

#[test]
fn test_children_attached_once() {
    let doc = Document::parse(XML).unwrap();
    let mut outline = Outline::new(&doc);
    let root = outline.root().unwrap();
    outline.materialize_children(&doc, root);
    let len = outline.len();
    outline.materialize_children(&doc, root);
    assert_eq!(outline.len(), len);
    assert_eq!(outline.children(root).len(), 3);
}

#[test]
fn test_items_point_at_nodes() {
    let doc = Document::parse(XML).unwrap();
    let mut outline = Outline::new(&doc);
    let root = outline.root().unwrap();
    outline.materialize_children(&doc, root);
    let child = outline.children(root)[0];
    outline.materialize_children(&doc, child);
    let grandchild = outline.children(child)[0];
    let node = outline.item(grandchild).unwrap().node();
    assert_eq!(
        selection_path(&doc, node, TrackingMode::Positional).as_deref(),
        Some("root/child/grandchild")
    );
    assert_eq!(outline.parent(grandchild), Some(child));
    assert_eq!(outline.parent(root), None);
}

#[test]
fn test_empty_outline() {
    let outline = Outline::default();
    assert!(outline.is_empty());
    assert!(outline.root().is_none());
    assert!(outline.items().is_empty());
}
