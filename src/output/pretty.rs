use crate::document::{Document, Node};
use crate::output::Output;
use crate::xmlvalue::Value;

/// What goes in front of a rendered token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Layout {
    Inline,
    Space,
    /// A newline followed by this many indentation steps.
    Break(usize),
}

// we need to track where we are in xml:space, so that we can know when to
// insert newlines and indentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Space {
    Empty,
    Default,
    Preserve,
}

// The stack keeps track of where we are, and the xml space state. We are
// either in a mixed element (with text and subcontent) (in which case we don't
// do any indentation anymore, including for its descendants), or in an element
// without text, in which case we can potentially indent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StackEntry {
    Unmixed(Space),
    Mixed,
}

pub(crate) struct Pretty<'a> {
    doc: &'a Document,
    attributes_on_new_line: bool,
    stack: Vec<StackEntry>,
}

impl<'a> Pretty<'a> {
    pub(crate) fn new(doc: &'a Document, attributes_on_new_line: bool) -> Self {
        Pretty {
            doc,
            attributes_on_new_line,
            stack: Vec::new(),
        }
    }

    fn in_mixed(&self) -> bool {
        self.stack.iter().any(|e| *e == StackEntry::Mixed)
    }

    fn in_space_preserve(&self) -> bool {
        for entry in self.stack.iter().rev() {
            match entry {
                StackEntry::Unmixed(Space::Preserve) => return true,
                StackEntry::Unmixed(Space::Default) => return false,
                StackEntry::Unmixed(Space::Empty) => (),
                StackEntry::Mixed => return false,
            }
        }
        false
    }

    fn can_break(&self) -> bool {
        !self.in_mixed() && !self.in_space_preserve()
    }

    fn level(&self) -> usize {
        self.stack.len()
    }

    fn has_text_child(&self, node: Node) -> bool {
        self.doc
            .children(node)
            .any(|child| matches!(self.doc.value(child), Value::Text(_)))
    }

    fn element_space(&self, node: Node) -> Space {
        match self.doc.xml_space(node) {
            Some("preserve") => Space::Preserve,
            Some("default") => Space::Default,
            _ => Space::Empty,
        }
    }

    fn break_or(&self, otherwise: Layout) -> Layout {
        if self.can_break() {
            Layout::Break(self.level())
        } else {
            otherwise
        }
    }

    pub(crate) fn prettify(&mut self, node: Node, output: &Output) -> Layout {
        use Output::*;
        match output {
            Declaration(_) | Text(..) => Layout::Inline,
            StartTagOpen(_) | Comment(_) | ProcessingInstruction(..) => {
                self.break_or(Layout::Inline)
            }
            Prefix(..) | Attribute(..) => {
                if self.attributes_on_new_line && self.can_break() {
                    Layout::Break(self.level() + 1)
                } else {
                    Layout::Space
                }
            }
            StartTagClose { empty } => {
                if !empty {
                    if self.has_text_child(node) {
                        self.stack.push(StackEntry::Mixed);
                    } else {
                        let space = self.element_space(node);
                        self.stack.push(StackEntry::Unmixed(space));
                    }
                }
                Layout::Inline
            }
            EndTag { empty, .. } => {
                if *empty {
                    return Layout::Inline;
                }
                // the end tag goes on its own line only if the content did
                let content_broken = self.can_break();
                self.stack.pop();
                if content_broken {
                    Layout::Break(self.level())
                } else {
                    Layout::Inline
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use rstest::rstest;

    use crate::output::{Indentation, SerializeOptions};
    use crate::Document;

    #[rstest]
    #[case("elements", r#"<doc><a><b/></a></doc>"#, "<doc>\n  <a>\n    <b />\n  </a>\n</doc>")]
    #[case("text", r#"<doc><a>text</a><a>text 2</a></doc>"#, "<doc>\n  <a>text</a>\n  <a>text 2</a>\n</doc>")]
    #[case("mixed", r#"<doc><p>Hello <em>world</em>!</p></doc>"#, "<doc>\n  <p>Hello <em>world</em>!</p>\n</doc>")]
    // the embedded content could in principle be pretty printed, we don't
    #[case("mixed, embedded", r#"<doc><p>Hello <nested><stuff>a</stuff><stuff>b</stuff></nested></p></doc>"#, "<doc>\n  <p>Hello <nested><stuff>a</stuff><stuff>b</stuff></nested></p>\n</doc>")]
    #[case("comment", r#"<doc><a><!--hello--><!--world--></a></doc>"#, "<doc>\n  <a>\n    <!--hello-->\n    <!--world-->\n  </a>\n</doc>")]
    #[case("mixed, comment", r#"<doc><p>Hello <!--world-->!</p></doc>"#, "<doc>\n  <p>Hello <!--world-->!</p>\n</doc>")]
    #[case("pi", r#"<doc><a><?pi?><?pi data?></a></doc>"#, "<doc>\n  <a>\n    <?pi?>\n    <?pi data?>\n  </a>\n</doc>")]
    #[case("preserve", r#"<doc xml:space="preserve"><p>Hello</p></doc>"#, r#"<doc xml:space="preserve"><p>Hello</p></doc>"#)]
    #[case("preserve back to default", r#"<doc xml:space="preserve"><p xml:space="default"><foo><bar/></foo></p></doc>"#, "<doc xml:space=\"preserve\"><p xml:space=\"default\">\n    <foo>\n      <bar />\n    </foo>\n  </p></doc>")]
    fn pretty(#[case] name: &str, #[case] xml: &str, #[case] expected: &str) {
        let doc = Document::parse(xml).unwrap();
        let options = SerializeOptions {
            indentation: Some(Indentation {
                indent: "  ".to_string(),
                attributes_on_new_line: false,
            }),
            newline: "\n".to_string(),
            declaration: true,
        };
        assert_eq!(doc.serialize(doc.root(), &options), expected, "{}", name);
    }

    #[test]
    fn pretty_attributes_on_new_line() {
        let doc = Document::parse(r#"<doc a="1" b="2"><p c="3">text</p><q/></doc>"#).unwrap();
        let options = SerializeOptions {
            indentation: Some(Indentation {
                indent: "  ".to_string(),
                attributes_on_new_line: true,
            }),
            newline: "\n".to_string(),
            declaration: true,
        };
        assert_snapshot!(doc.serialize(doc.root(), &options), @r###"
        <doc
          a="1"
          b="2">
          <p
            c="3">text</p>
          <q />
        </doc>
        "###);
    }
}
