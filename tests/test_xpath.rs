use rstest::{fixture, rstest};
use xpath_tester::{
    harvest_namespaces, Document, NamespaceMap, Report, XPath, XPathError, XPathValue,
};

const LIBRARY: &str = r#"<library xmlns:b="urn:books">
  <b:book id="1" lang="en"><title>Rust</title><price>30</price></b:book>
  <b:book id="2"><title>XML</title><price>20</price></b:book>
  <magazine><title>Monthly</title></magazine>
</library>"#;

#[fixture]
fn library() -> (Document, NamespaceMap) {
    let doc = Document::parse(LIBRARY).unwrap();
    let namespaces = harvest_namespaces(&doc);
    (doc, namespaces)
}

fn select(doc: &Document, namespaces: &NamespaceMap, expression: &str) -> Vec<String> {
    XPath::compile(expression)
        .unwrap()
        .select(doc, namespaces)
        .unwrap()
        .into_iter()
        .map(|node| doc.node_name(node))
        .collect()
}

#[rstest]
#[case("//*", 9)]
#[case("//b:book", 2)]
#[case("//title", 3)]
#[case("/library/b:book[price > 25]/title", 1)]
#[case("//b:book[@lang]", 1)]
#[case("//b:book[last()]", 1)]
#[case("//title[. = 'XML']", 1)]
#[case("//@id", 2)]
#[case("//b:book/@*", 3)]
#[case("//title | //price", 5)]
#[case("//b:book[1]/following-sibling::*", 2)]
#[case("//magazine/preceding-sibling::b:book", 2)]
#[case("//title/ancestor::*", 4)]
#[case("//text()", 5)]
#[case("/", 1)]
#[case("//*[count(*) = 2]", 2)]
#[case("//*[starts-with(name(), 'b:')]", 2)]
#[case("//*[local-name() = 'book']", 2)]
#[case("//comment()", 0)]
#[case("//b:book[price = 20]/@id", 1)]
#[case("id('1')", 0)]
#[case("//b:book[@id = '2']/preceding::title", 1)]
#[case("//title/following::price", 2)]
#[case("//b:book[1]//text()", 2)]
#[case("//book", 0)]
fn test_select_count(library: (Document, NamespaceMap), #[case] expression: &str, #[case] count: usize) {
    let (doc, namespaces) = library;
    assert_eq!(select(&doc, &namespaces, expression).len(), count);
}

#[rstest]
fn test_document_order(library: (Document, NamespaceMap)) {
    let (doc, namespaces) = library;
    assert_eq!(
        select(&doc, &namespaces, "//price | //b:book | /library"),
        vec!["library", "b:book", "price", "b:book", "price"]
    );
}

#[rstest]
fn test_evaluate_values(library: (Document, NamespaceMap)) {
    let (doc, namespaces) = library;
    let evaluate = |expression: &str| {
        XPath::compile(expression)
            .unwrap()
            .evaluate(&doc, &namespaces, doc.root())
            .unwrap()
    };
    assert_eq!(evaluate("sum(//price)"), XPathValue::Number(50.0));
    assert_eq!(evaluate("count(//b:book) > 1"), XPathValue::Boolean(true));
    assert_eq!(
        evaluate("concat(//title, '/', string(//b:book[2]/@id))"),
        XPathValue::String("Rust/2".to_string())
    );
}

#[rstest]
#[case("//", "'//' is an invalid expression.")]
#[case("", "'' is an invalid expression.")]
#[case("'abc", "This is an unclosed string.")]
#[case("a # b", "'a # b' has an invalid token.")]
#[case("//x:a", "Namespace prefix 'x' is not defined.")]
#[case("count(//a)", "Expression must evaluate to a node-set.")]
#[case(
    "foo()",
    "Namespace Manager or XsltContext needed. This query has a prefix, variable, or user-defined function."
)]
#[case(
    "$v",
    "Namespace Manager or XsltContext needed. This query has a prefix, variable, or user-defined function."
)]
#[case(
    "count()",
    "Function 'count()' in 'count()' has an invalid number of arguments."
)]
fn test_error_messages(library: (Document, NamespaceMap), #[case] expression: &str, #[case] message: &str) {
    let (doc, namespaces) = library;
    let err = XPath::compile(expression)
        .and_then(|xpath| xpath.select(&doc, &namespaces))
        .unwrap_err();
    assert_eq!(err.to_string(), message);
}

#[test]
fn test_namespace_axis_rejected() {
    assert_eq!(
        XPath::compile("//*/namespace::*").unwrap_err(),
        XPathError::NamespaceAxis
    );
}

#[test]
fn test_default_namespace_needs_prefix() {
    let doc = Document::parse(r#"<a xmlns="urn:d"><b/></a>"#).unwrap();
    let namespaces = harvest_namespaces(&doc);
    assert!(select(&doc, &namespaces, "//b").is_empty());
    assert_eq!(select(&doc, &namespaces, "//ns:b"), vec!["b"]);
}

#[test]
fn test_xml_prefix_is_implicit() {
    let doc = Document::parse(r#"<a xml:lang="en"><b/></a>"#).unwrap();
    let namespaces = NamespaceMap::new();
    assert_eq!(select(&doc, &namespaces, "//@xml:lang"), vec!["xml:lang"]);
}

#[test]
fn test_source() {
    let xpath = XPath::compile("//a").unwrap();
    assert_eq!(xpath.source(), "//a");
}

#[rstest]
#[case("/a/text()", 2)]
#[case("/a/node()", 3)]
#[case("//text()", 2)]
#[case("/a/b/following-sibling::text()", 1)]
#[case("/a/b/preceding::text()", 1)]
#[case("/a/text()[2]", 1)]
fn test_adjacent_text_is_one_node(#[case] expression: &str, #[case] count: usize) {
    let doc = Document::parse("<a>x<![CDATA[y]]>z<b/>w</a>").unwrap();
    let namespaces = NamespaceMap::new();
    assert_eq!(select(&doc, &namespaces, expression).len(), count);
}

#[test]
fn test_text_run_value() {
    let doc = Document::parse("<a>x<![CDATA[y]]>z</a>").unwrap();
    let namespaces = NamespaceMap::new();
    let evaluate = |expression: &str| {
        XPath::compile(expression)
            .unwrap()
            .evaluate(&doc, &namespaces, doc.root())
            .unwrap()
    };
    assert_eq!(evaluate("count(/a/text())"), XPathValue::Number(1.0));
    assert_eq!(evaluate("string(/a/text())"), XPathValue::String("xyz".to_string()));
    assert_eq!(evaluate("/a/text() = 'xyz'"), XPathValue::Boolean(true));
    assert_eq!(
        Report::evaluate(Some(&doc), &namespaces, "/a/text()[1]").to_string(),
        "Count: [1]\n[1] - xyz\n"
    );
}
