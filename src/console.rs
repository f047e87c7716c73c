//! A line-oriented front-end over a [`Session`].
//!
//! Lines starting with `:` are commands, anything else replaces the
//! current expression and shows the new report.
use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::outline::ItemId;
use crate::path::{TrackingMode, UnknownTrackingMode};
use crate::session::{SaveOutcome, Session};

const HELP: &str = "\
:open <path>      load a file
:paste            read XML lines up to a line with a single '.'
:format           show the reformatted document
:save [path]      write the reformatted document
:ns [index]       list namespaces, or query everything in one
:tree             show the outline
:select <id>      select an outline item
:track <mode>     none, name, positional or attribute
:help             show this text
:quit             leave
anything else is evaluated as an XPath expression
";

/// One line of console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(PathBuf),
    Paste,
    Format,
    Save(Option<PathBuf>),
    Namespaces(Option<usize>),
    Tree,
    Select(usize),
    Track(TrackingMode),
    Help,
    Quit,
    Expression(String),
}

/// A line that looked like a command but wasn't one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandError(String);

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for CommandError {}

fn index_argument(argument: &str) -> Result<usize, CommandError> {
    argument
        .parse()
        .map_err(|_| CommandError(format!("'{}' is not an index", argument)))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CommandError("Empty line".to_string()));
        }
        if !line.starts_with(':') {
            return Ok(Command::Expression(line.to_string()));
        }
        let (name, argument) = match line.split_once(char::is_whitespace) {
            Some((name, argument)) => (name, argument.trim()),
            None => (line, ""),
        };
        let command = match (name, argument) {
            (":open", "") => return Err(CommandError(":open needs a path".to_string())),
            (":open", path) => Command::Open(PathBuf::from(path)),
            (":paste", "") => Command::Paste,
            (":format", "") => Command::Format,
            (":save", "") => Command::Save(None),
            (":save", path) => Command::Save(Some(PathBuf::from(path))),
            (":ns", "") => Command::Namespaces(None),
            (":ns", index) => Command::Namespaces(Some(index_argument(index)?)),
            (":tree", "") => Command::Tree,
            (":select", id) => Command::Select(index_argument(id)?),
            (":track", mode) => Command::Track(
                mode.parse()
                    .map_err(|e: UnknownTrackingMode| CommandError(e.to_string()))?,
            ),
            (":help", "") => Command::Help,
            (":quit", "") | (":q", "") => Command::Quit,
            _ => return Err(CommandError(format!("Unknown command '{}', try :help", line))),
        };
        Ok(command)
    }
}

/// Reads commands from `input` and writes everything to `output`.
pub struct Console<R, W> {
    input: R,
    output: W,
    session: Session,
}

// reports and messages don't always end in a newline
fn write_block<W: Write>(output: &mut W, text: &str) -> io::Result<()> {
    output.write_all(text.as_bytes())?;
    if !text.is_empty() && !text.ends_with('\n') {
        writeln!(output)?;
    }
    Ok(())
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Console {
            input,
            output,
            session: Session::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    /// Load a file and show its content, or why it couldn't be loaded.
    pub fn open(&mut self, path: &Path) -> io::Result<()> {
        let content = self.session.load_file(path);
        write_block(&mut self.output, &content)
    }

    /// Process lines until `:quit` or the end of the input.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(command) => self.execute(command)?,
                Err(e) => writeln!(self.output, "{}", e)?,
            }
        }
        self.output.flush()
    }

    pub fn execute(&mut self, command: Command) -> io::Result<()> {
        match command {
            Command::Open(path) => self.open(&path)?,
            Command::Paste => {
                let text = self.read_paste()?;
                let report = self.session.load_text(&text);
                write_block(&mut self.output, &report.to_string())?;
            }
            Command::Format => {
                let content = self.session.reformat();
                write_block(&mut self.output, &content)?;
            }
            Command::Save(path) => self.save(path.as_deref())?,
            Command::Namespaces(None) => {
                for (index, line) in self.session.namespace_lines().iter().enumerate() {
                    writeln!(self.output, "{}: {}", index, line)?;
                }
            }
            Command::Namespaces(Some(index)) => match self.session.pick_namespace(index) {
                Some(report) => write_block(&mut self.output, &report.to_string())?,
                None => writeln!(self.output, "No namespace at {}", index)?,
            },
            Command::Tree => self.tree()?,
            Command::Select(id) => match self.session.select(ItemId::from(id)) {
                Some(selection) => {
                    write_block(&mut self.output, &selection.markup)?;
                    if let Some(report) = selection.report {
                        write_block(&mut self.output, &report.to_string())?;
                    }
                }
                None => writeln!(self.output, "No item {}", id)?,
            },
            Command::Track(mode) => {
                if let Some(report) = self.session.set_tracking(mode) {
                    write_block(&mut self.output, &report.to_string())?;
                }
            }
            Command::Help => self.output.write_all(HELP.as_bytes())?,
            Command::Quit => {}
            Command::Expression(expression) => {
                let report = self.session.set_expression(&expression);
                write_block(&mut self.output, &report.to_string())?;
            }
        }
        Ok(())
    }

    fn read_paste(&mut self) -> io::Result<String> {
        let mut lines = Vec::new();
        loop {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            let line = line.trim_end_matches(&['\r', '\n'][..]);
            if line == "." {
                break;
            }
            lines.push(line.to_string());
        }
        Ok(lines.join("\n"))
    }

    fn tree(&mut self) -> io::Result<()> {
        let outline = self.session.outline();
        let selected = self.session.selection();
        for (depth, id) in outline.items() {
            let text = outline.item(id).map(|item| item.text()).unwrap_or_default();
            let marker = if Some(id) == selected { "*" } else { " " };
            writeln!(
                self.output,
                "{}{}[{}] {}",
                "  ".repeat(depth),
                marker,
                id.index(),
                text
            )?;
        }
        Ok(())
    }

    fn save(&mut self, path: Option<&Path>) -> io::Result<()> {
        let Console {
            input,
            output,
            session,
        } = self;
        let outcome = session.save(path, |prompt| {
            if write!(output, "{} [y/n] ", prompt)
                .and_then(|_| output.flush())
                .is_err()
            {
                return false;
            }
            let mut answer = String::new();
            match input.read_line(&mut answer) {
                Ok(_) => answer.trim().eq_ignore_ascii_case("y"),
                Err(_) => false,
            }
        });
        match outcome {
            Ok(SaveOutcome::Written(path)) => writeln!(output, "Saved {}", path.display()),
            Ok(SaveOutcome::Declined) => Ok(()),
            Ok(SaveOutcome::Skipped) => writeln!(output, "Nothing to save"),
            Err(e) => writeln!(output, "{}", e),
        }
    }
}
