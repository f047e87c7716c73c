use xpath_tester::{Document, Indentation, SerializeOptions};

fn roundtrip(xml: &str) -> String {
    let doc = Document::parse(xml).unwrap();
    doc.serialize(doc.root(), &SerializeOptions::default())
}

#[test]
fn test_roundtrip() {
    let xml = r#"<root><a>1</a><b>2</b></root>"#;
    assert_eq!(roundtrip(xml), xml);
}

#[test]
fn test_roundtrip_ns() {
    let xml =
        r#"<foo:root xmlns:foo="http://example.com"><foo:a>1</foo:a><foo:b>2</foo:b></foo:root>"#;
    assert_eq!(roundtrip(xml), xml);
}

#[test]
fn test_roundtrip_default_ns() {
    let xml = r#"<root xmlns="http://example.com"><a>1</a></root>"#;
    assert_eq!(roundtrip(xml), xml);
}

#[test]
fn test_empty_element() {
    assert_eq!(roundtrip("<root><a></a></root>"), "<root><a /></root>");
}

#[test]
fn test_escape_text() {
    assert_eq!(roundtrip("<a>&lt;&amp;&gt;\"'</a>"), "<a>&lt;&amp;&gt;\"'</a>");
}

#[test]
fn test_escape_attribute() {
    assert_eq!(
        roundtrip(r#"<a b="&lt;&quot;&amp;'"/>"#),
        r#"<a b="&lt;&quot;&amp;'" />"#
    );
}

#[test]
fn test_declaration() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><a/>"#;
    assert_eq!(
        roundtrip(xml),
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><a />"#
    );
    let doc = Document::parse(xml).unwrap();
    let options = SerializeOptions {
        declaration: false,
        ..Default::default()
    };
    assert_eq!(doc.serialize(doc.root(), &options), "<a />");
}

#[test]
fn test_outer_markup_redeclares_namespaces() {
    let doc = Document::parse(r#"<doc xmlns="urn:d"><a><b/></a></doc>"#).unwrap();
    let a = doc.first_child(doc.document_element().unwrap()).unwrap();
    assert_eq!(doc.outer_markup(a), "<a xmlns=\"urn:d\">\n  <b />\n</a>");
}

#[test]
fn test_outer_markup_mixed_content() {
    let doc = Document::parse(r#"<a>text<b><c/></b>more</a>"#).unwrap();
    let a = doc.document_element().unwrap();
    assert_eq!(doc.outer_markup(a), "<a>text<b><c /></b>more</a>");
}

#[test]
fn test_outer_markup_space_preserve() {
    let doc = Document::parse(r#"<a><b xml:space="preserve"><c/> <d/></b></a>"#).unwrap();
    let a = doc.document_element().unwrap();
    assert_eq!(
        doc.outer_markup(a),
        "<a>\n  <b xml:space=\"preserve\"><c /> <d /></b>\n</a>"
    );
}

#[test]
fn test_reformat() {
    let doc = Document::parse(
        r#"<?xml version="1.0"?><config xmlns:x="urn:x" version="2"><x:item name="a" value="1"/><!--note--><text>hello</text></config>"#,
    )
    .unwrap();
    assert_eq!(
        doc.reformat(),
        [
            "<?xml version=\"1.0\"?>",
            "<config",
            "\txmlns:x=\"urn:x\"",
            "\tversion=\"2\">",
            "\t<x:item",
            "\t\tname=\"a\"",
            "\t\tvalue=\"1\" />",
            "\t<!--note-->",
            "\t<text>hello</text>",
            "</config>",
        ]
        .join("\r\n")
    );
}

#[test]
fn test_custom_indentation() {
    let doc = Document::parse(r#"<a><b><c/></b></a>"#).unwrap();
    let options = SerializeOptions {
        indentation: Some(Indentation {
            indent: "    ".to_string(),
            attributes_on_new_line: false,
        }),
        ..Default::default()
    };
    assert_eq!(
        doc.serialize(doc.root(), &options),
        "<a>\n    <b>\n        <c />\n    </b>\n</a>"
    );
}

#[test]
fn test_shallow_markup() {
    let doc = Document::parse(r#"<a xmlns:p="urn:p"><p:b x="1"><c/></p:b></a>"#).unwrap();
    let b = doc.first_child(doc.document_element().unwrap()).unwrap();
    assert_eq!(doc.shallow_markup(b), r#"<p:b xmlns:p="urn:p" x="1" />"#);
}

#[test]
fn test_shallow_markup_declares_used_prefixes_only() {
    let doc = Document::parse(
        r#"<a xmlns:p="urn:p" xmlns:q="urn:q" xmlns="urn:d"><p:b x="1" q:y="2"/><p:c/><d/></a>"#,
    )
    .unwrap();
    let a = doc.document_element().unwrap();
    let children: Vec<_> = doc.children(a).collect();
    assert_eq!(
        doc.shallow_markup(children[0]),
        r#"<p:b xmlns:p="urn:p" xmlns:q="urn:q" x="1" q:y="2" />"#
    );
    assert_eq!(doc.shallow_markup(children[1]), r#"<p:c xmlns:p="urn:p" />"#);
    assert_eq!(doc.shallow_markup(children[2]), r#"<d xmlns="urn:d" />"#);
    // outer markup still carries every namespace in scope
    assert_eq!(
        doc.outer_markup(children[1]),
        r#"<p:c xmlns:p="urn:p" xmlns:q="urn:q" xmlns="urn:d" />"#
    );
}
