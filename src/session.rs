use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::document::Document;
use crate::encoding::encode;
use crate::error::Error;
use crate::namespace::{harvest_namespaces, NamespaceMap};
use crate::outline::{ItemId, Outline};
use crate::path::{selection_path, TrackingMode};
use crate::report::Report;

/// What selecting an outline item produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// The selected node without its descendants.
    pub markup: String,
    /// The new report, when tracking rewrote the expression.
    pub report: Option<Report>,
}

/// The result of [`Session::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Written(PathBuf),
    /// The file exists and overwriting it wasn't confirmed.
    Declined,
    /// No document, or no file to save to.
    Skipped,
}

/// Everything the tool keeps between user actions.
///
/// The namespace map and the outline always belong to the current
/// document: they are rebuilt from scratch whenever a document is loaded
/// or pasted, and a failed load leaves all three as they were.
#[derive(Debug, Default)]
pub struct Session {
    document: Option<Document>,
    namespaces: NamespaceMap,
    outline: Outline,
    expression: String,
    tracking: TrackingMode,
    selection: Option<ItemId>,
    path: Option<PathBuf>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn namespaces(&self) -> &NamespaceMap {
        &self.namespaces
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn tracking(&self) -> TrackingMode {
        self.tracking
    }

    pub fn selection(&self) -> Option<ItemId> {
        self.selection
    }

    /// The file last loaded or saved.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn install(&mut self, document: Document) {
        self.namespaces = harvest_namespaces(&document);
        self.outline = Outline::new(&document);
        self.selection = None;
        self.document = Some(document);
    }

    /// Load a file and return its reformatted content.
    pub fn try_load_file(&mut self, path: &Path) -> Result<String, Error> {
        let document = Document::load(path)?;
        info!(path = %path.display(), nodes = document.len(), "loaded document");
        self.install(document);
        self.path = Some(path.to_path_buf());
        Ok(self.reformat())
    }

    /// Load a file; the content to show is the reformatted document, or
    /// the error message if loading failed.
    pub fn load_file(&mut self, path: &Path) -> String {
        self.try_load_file(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "load failed");
            e.to_string()
        })
    }

    /// Take pasted XML text as the new document and re-evaluate the
    /// current expression against it.
    pub fn load_text(&mut self, text: &str) -> Report {
        match Document::parse(text) {
            Ok(document) => {
                info!(nodes = document.len(), "parsed pasted document");
                self.install(document);
                self.evaluate()
            }
            Err(e) => {
                warn!(error = %e, "pasted text is not well-formed");
                Report::Failure(format!("Message=[{}]", e))
            }
        }
    }

    /// Replace the expression and evaluate it.
    pub fn set_expression(&mut self, expression: &str) -> Report {
        self.expression = expression.to_string();
        self.evaluate()
    }

    /// Evaluate the current expression against the current document.
    pub fn evaluate(&self) -> Report {
        let report = Report::evaluate(self.document.as_ref(), &self.namespaces, &self.expression);
        debug!(expression = %self.expression, count = report.count(), "evaluated expression");
        report
    }

    /// The current document, reformatted; empty without a document.
    pub fn reformat(&self) -> String {
        self.document
            .as_ref()
            .map(|document| document.reformat())
            .unwrap_or_default()
    }

    /// The namespace list: one `prefix<TAB>uri` line per binding.
    pub fn namespace_lines(&self) -> Vec<String> {
        self.namespaces.display_lines()
    }

    /// Query everything in the namespace of list entry `index`.
    pub fn pick_namespace(&mut self, index: usize) -> Option<Report> {
        let query = self.namespaces.query_for(index)?;
        Some(self.set_expression(&query))
    }

    /// Materialize the children of an outline item.
    pub fn expand(&mut self, item: ItemId) -> bool {
        match &self.document {
            Some(document) => self.outline.materialize_children(document, item),
            None => false,
        }
    }

    /// Select an outline item: its children are materialized, its shallow
    /// markup returned and, when tracking, the expression is replaced by
    /// the item's path and evaluated.
    pub fn select(&mut self, item: ItemId) -> Option<Selection> {
        let document = self.document.as_ref()?;
        let node = self.outline.item(item)?.node();
        self.outline.materialize_children(document, item);
        let markup = document.shallow_markup(node);
        let path = selection_path(document, node, self.tracking);
        self.selection = Some(item);
        let report = path.map(|path| self.set_expression(&path));
        Some(Selection { markup, report })
    }

    /// Change the tracking mode. With a selection and a mode other than
    /// [`TrackingMode::None`] the expression follows right away.
    pub fn set_tracking(&mut self, mode: TrackingMode) -> Option<Report> {
        self.tracking = mode;
        let item = self.selection?;
        let document = self.document.as_ref()?;
        let node = self.outline.item(item)?.node();
        let path = selection_path(document, node, mode)?;
        Some(self.set_expression(&path))
    }

    /// Write the reformatted document to `path`, or to the file it was
    /// loaded from. `confirm` is asked before replacing an existing file.
    pub fn save<F>(&mut self, path: Option<&Path>, confirm: F) -> Result<SaveOutcome, Error>
    where
        F: FnOnce(&str) -> bool,
    {
        let target = match path.map(Path::to_path_buf).or_else(|| self.path.clone()) {
            Some(target) => target,
            None => return Ok(SaveOutcome::Skipped),
        };
        let document = match &self.document {
            Some(document) => document,
            None => return Ok(SaveOutcome::Skipped),
        };
        if target.exists() {
            let name = target
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| target.display().to_string());
            let prompt = format!("File [{}] already exists, do you want to overwrite?", name);
            if !confirm(&prompt) {
                info!(path = %target.display(), "overwrite declined");
                return Ok(SaveOutcome::Declined);
            }
        }
        let label = document.declaration().and_then(|d| d.encoding());
        let data = encode(&document.reformat(), label);
        std::fs::write(&target, data)?;
        info!(path = %target.display(), "saved document");
        self.path = Some(target.clone());
        Ok(SaveOutcome::Written(target))
    }
}
