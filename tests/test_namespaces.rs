use rstest::rstest;
use xpath_tester::{harvest_namespaces, Document, DEFAULT_PREFIX, XMLNS_NAMESPACE};

fn harvest(xml: &str) -> Vec<(String, String)> {
    let doc = Document::parse(xml).unwrap();
    harvest_namespaces(&doc)
        .iter()
        .map(|(prefix, uri)| (prefix.to_string(), uri.to_string()))
        .collect()
}

fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
    expected
        .iter()
        .map(|(prefix, uri)| (prefix.to_string(), uri.to_string()))
        .collect()
}

#[test]
fn test_default_namespace() {
    let doc = Document::parse(r#"<a xmlns="urn:u"><b/></a>"#).unwrap();
    let namespaces = harvest_namespaces(&doc);
    assert_eq!(namespaces.get(DEFAULT_PREFIX), Some("urn:u"));
}

#[test]
fn test_first_binding_wins() {
    let doc = Document::parse(r#"<p:a xmlns:p="urn:u"><p:b xmlns:p="urn:v"/></p:a>"#).unwrap();
    let namespaces = harvest_namespaces(&doc);
    assert_eq!(namespaces.get("p"), Some("urn:u"));
    assert_eq!(namespaces.len(), 1);
}

#[rstest]
#[case(r#"<a/>"#, &[])]
#[case(r#"<a xmlns:p="urn:p"/>"#, &[("p", "urn:p")])]
#[case(
    r#"<a xmlns="urn:d"><b xmlns:q="urn:q" q:x="1"/></a>"#,
    &[("ns", "urn:d"), ("q", "urn:q")]
)]
#[case(r#"<a xml:lang="en"/>"#, &[("xml", "http://www.w3.org/XML/1998/namespace")])]
#[case(
    r#"<a><b xmlns="urn:late"/><c xmlns="urn:later"/></a>"#,
    &[("ns", "urn:late")]
)]
fn test_harvest(#[case] xml: &str, #[case] expected: &[(&str, &str)]) {
    assert_eq!(harvest(xml), pairs(expected));
}

#[test]
fn test_default_declaration_binds_declaration_namespace() {
    // an unprefixed declaration is an unprefixed name in the xmlns namespace
    let doc = Document::parse(r#"<p:a xmlns:p="urn:p" xmlns="urn:d"/>"#).unwrap();
    let namespaces = harvest_namespaces(&doc);
    assert_eq!(namespaces.get("p"), Some("urn:p"));
    assert_eq!(namespaces.get(DEFAULT_PREFIX), Some(XMLNS_NAMESPACE));
}

#[test]
fn test_display_and_query() {
    let doc = Document::parse(r#"<a xmlns="urn:d" xmlns:p="urn:p"/>"#).unwrap();
    let namespaces = harvest_namespaces(&doc);
    assert_eq!(namespaces.display_lines(), vec!["ns\turn:d", "p\turn:p"]);
    assert_eq!(namespaces.query_for(1).as_deref(), Some("//p:*"));
    assert_eq!(namespaces.query_for(2), None);
}

#[test]
fn test_insert_if_absent() {
    let mut namespaces = xpath_tester::NamespaceMap::new();
    assert!(namespaces.insert_if_absent("p", "urn:a"));
    assert!(!namespaces.insert_if_absent("p", "urn:b"));
    assert_eq!(namespaces.get("p"), Some("urn:a"));
    assert!(namespaces.contains_key("p"));
    namespaces.clear();
    assert!(namespaces.is_empty());
}
