use std::path::{Path, PathBuf};

use xpath_tester::{Report, SaveOutcome, Session, TrackingMode};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "xpath-tester-{}-{}.xml",
        name,
        std::process::id()
    ))
}

#[test]
fn test_missing_file() {
    let mut session = Session::new();
    let content = session.load_file(Path::new("does/not/exist.xml"));
    assert_eq!(content, "File doesn't exist");
    assert!(session.document().is_none());
    assert!(session.path().is_none());
}

#[test]
fn test_load_file_reformats() {
    let path = temp_path("load");
    std::fs::write(&path, r#"<a x="1"><b>t</b></a>"#).unwrap();
    let mut session = Session::new();
    let content = session.load_file(&path);
    std::fs::remove_file(&path).unwrap();
    assert_eq!(content, "<a\r\n\tx=\"1\">\r\n\t<b>t</b>\r\n</a>");
    assert_eq!(session.path(), Some(path.as_path()));
    assert_eq!(session.outline().len(), 1);
}

#[test]
fn test_malformed_file_keeps_previous_document() {
    let path = temp_path("malformed");
    std::fs::write(&path, "<a><b></a>").unwrap();
    let mut session = Session::new();
    session.load_text("<keep/>");
    let content = session.load_file(&path);
    std::fs::remove_file(&path).unwrap();
    assert!(content.contains("does not match"));
    assert_eq!(session.reformat(), "<keep />");
}

#[test]
fn test_no_document_report() {
    let mut session = Session::new();
    assert_eq!(session.set_expression("//*"), Report::NoDocument);
    assert_eq!(session.reformat(), "");
}

#[test]
fn test_pasted_text() {
    let mut session = Session::new();
    session.set_expression("//*");
    let report = session.load_text("<a><b/><c/></a>");
    assert_eq!(
        report.to_string(),
        "Count: [3]\n[1] - <a>\n  <b />\n  <c />\n</a>\n[2] - <b />\n[3] - <c />\n"
    );
}

#[test]
fn test_pasted_text_failure() {
    let mut session = Session::new();
    let report = session.load_text("not xml");
    let text = report.to_string();
    assert!(text.starts_with("Message=["));
    assert!(text.ends_with(']'));
    assert!(session.document().is_none());
}

#[test]
fn test_zero_matches() {
    let mut session = Session::new();
    session.load_text("<a/>");
    assert_eq!(session.set_expression("//b").to_string(), "Count: [0]\n");
}

#[test]
fn test_invalid_expression() {
    let mut session = Session::new();
    session.load_text("<a/>");
    let report = session.set_expression("//a[");
    assert!(report.is_failure());
    assert_eq!(report.to_string(), "'//a[' is an invalid expression.");
}

#[test]
fn test_node_name_tracking_clears_expression() {
    let mut session = Session::new();
    session.load_text("<root><child/></root>");
    session.set_expression("//child");
    session.set_tracking(TrackingMode::NodeName);
    let root = session.outline().root().unwrap();
    let selection = session.select(root).unwrap();
    assert_eq!(session.expression(), "");
    assert_eq!(
        selection.report.map(|r| r.to_string()).as_deref(),
        Some("'' is an invalid expression.")
    );
}

#[test]
fn test_tracking_follows_selection() {
    let mut session = Session::new();
    session.load_text("<root><child><grandchild/></child></root>");
    let root = session.outline().root().unwrap();
    session.select(root).unwrap();
    let child = session.outline().children(root)[0];
    session.select(child).unwrap();
    let grandchild = session.outline().children(child)[0];
    session.select(grandchild).unwrap();
    assert_eq!(session.expression(), "");

    let report = session.set_tracking(TrackingMode::AttributeDifferentiator).unwrap();
    assert_eq!(session.expression(), "root/child/grandchild");
    assert_eq!(report.count(), 1);
    assert_eq!(session.selection(), Some(grandchild));
}

#[test]
fn test_save_and_overwrite() {
    let path = temp_path("save");
    let _ = std::fs::remove_file(&path);
    let mut session = Session::new();
    session.load_text(r#"<?xml version="1.0" encoding="iso-8859-1"?><a>é</a>"#);

    let outcome = session.save(Some(&path), |_| panic!("no prompt expected")).unwrap();
    assert_eq!(outcome, SaveOutcome::Written(path.clone()));
    let data = std::fs::read(&path).unwrap();
    assert!(data.ends_with(&[b'<', b'a', b'>', 0xE9, b'<', b'/', b'a', b'>']));

    let mut asked = None;
    let outcome = session
        .save(None, |prompt| {
            asked = Some(prompt.to_string());
            false
        })
        .unwrap();
    assert_eq!(outcome, SaveOutcome::Declined);
    let name = path.file_name().unwrap().to_string_lossy();
    assert_eq!(
        asked,
        Some(format!("File [{}] already exists, do you want to overwrite?", name))
    );

    let outcome = session.save(None, |_| true).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(outcome, SaveOutcome::Written(path));
}

#[test]
fn test_save_without_path() {
    let mut session = Session::new();
    session.load_text("<a/>");
    assert_eq!(session.save(None, |_| true).unwrap(), SaveOutcome::Skipped);
}

#[test]
fn test_save_utf16_loads_again() {
    let path = temp_path("utf16");
    let _ = std::fs::remove_file(&path);
    let mut session = Session::new();
    session.load_text(r#"<?xml version="1.0" encoding="UTF-16"?><a>é</a>"#);
    session.save(Some(&path), |_| true).unwrap();
    let data = std::fs::read(&path).unwrap();
    assert_eq!(&data[..4], &[0xFF, 0xFE, b'<', 0x00]);

    let mut reloaded = Session::new();
    let content = reloaded.load_file(&path);
    std::fs::remove_file(&path).unwrap();
    assert_eq!(content, "<?xml version=\"1.0\" encoding=\"UTF-16\"?>\r\n<a>é</a>");
    let doc = reloaded.document().unwrap();
    assert_eq!(doc.string_value(doc.root()), "é");
}

#[test]
fn test_match_markup_leaves_out_declaration() {
    let mut session = Session::new();
    session.load_text(r#"<?xml version="1.0"?><a/>"#);
    let report = session.set_expression("/");
    assert_eq!(report.to_string(), "Count: [1]\n[1] - <a />\n");
}
