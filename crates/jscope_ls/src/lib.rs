//! jscope_ls: Language service.
//!
//! Tracks open documents, keeps an analyzed snapshot per document version,
//! and answers marker, occurrence, rename and reference queries against it.
//! Editors (or the CLI) address documents by URI and positions by byte
//! offset or line/column.

mod query;

pub use query::{
    cursor_context, references, rename_positions, CursorContext, Reference, ReferenceKind,
    RenamePositions, RowColumn, RENAME_VARIABLE,
};

use jscope_ast::{Ast, NodeId};
use jscope_binder::{analyze, Analysis};
use jscope_core::collections::FxMap;
use jscope_core::text::TextPos;
use jscope_diagnostics::Marker;
use jscope_options::Features;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors returned by [`LanguageService`] operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The URI does not name an open document.
    #[error("unknown document '{0}'")]
    UnknownDocument(String),

    /// A source file could not be read.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// One analyzed version of a document.
#[derive(Debug)]
pub struct Snapshot {
    pub version: i32,
    pub text: String,
    pub ast: Ast,
    pub analysis: Analysis,
    /// Syntax errors, sorted by position.
    pub parse_markers: Vec<Marker>,
}

impl Snapshot {
    /// Parse and analyze `text`.
    pub fn analyze(text: String, version: i32, features: &Features) -> Self {
        let parsed = jscope_parser::parse(&text);
        let analysis = analyze(&parsed.ast, features);
        Self {
            version,
            text,
            ast: parsed.ast,
            analysis,
            parse_markers: parsed.markers,
        }
    }

    /// Parse errors followed by analysis markers.
    pub fn markers(&self) -> Vec<Marker> {
        self.parse_markers
            .iter()
            .chain(self.analysis.markers())
            .cloned()
            .collect()
    }

    /// The node under the cursor at `offset`.
    pub fn node_at(&self, offset: TextPos) -> Option<NodeId> {
        self.ast.node_at(offset)
    }

    /// Convert a 0-based line and byte column to an offset.
    pub fn offset_of(&self, line: u32, column: u32) -> Option<TextPos> {
        self.ast.line_map().offset_of(line, column)
    }

    pub fn cursor_context(&self, offset: TextPos, features: &Features) -> CursorContext {
        match self.node_at(offset) {
            Some(node) => cursor_context(&self.ast, &self.analysis, node, features),
            None => CursorContext::default(),
        }
    }

    pub fn rename_positions(&self, offset: TextPos) -> Option<RenamePositions> {
        let node = self.node_at(offset)?;
        rename_positions(&self.ast, &self.analysis, node)
    }

    pub fn references(&self, offset: TextPos) -> Vec<Reference> {
        match self.node_at(offset) {
            Some(node) => references(&self.ast, &self.analysis, node),
            None => Vec::new(),
        }
    }
}

/// Language service providing analysis results for open documents.
pub struct LanguageService {
    /// Open documents tracked by URI.
    documents: FxMap<String, Arc<Snapshot>>,
    features: Features,
}

impl LanguageService {
    pub fn new() -> Self {
        Self::with_features(Features::default())
    }

    pub fn with_features(features: Features) -> Self {
        Self {
            documents: FxMap::default(),
            features,
        }
    }

    pub fn features(&self) -> &Features {
        &self.features
    }

    /// Replace the feature set and re-analyze every open document.
    pub fn set_features(&mut self, features: Features) {
        if features == self.features {
            return;
        }
        self.features = features;
        for (uri, snapshot) in self.documents.iter_mut() {
            debug!(uri = uri.as_str(), "re-analyzing after feature change");
            *snapshot = Arc::new(Snapshot::analyze(
                snapshot.text.clone(),
                snapshot.version,
                &self.features,
            ));
        }
    }

    /// Open (or replace) a document.
    pub fn open_document(&mut self, uri: impl Into<String>, text: String, version: i32) {
        let uri = uri.into();
        let snapshot = self.analyze(&uri, text, version);
        self.documents.insert(uri, snapshot);
    }

    /// Read a file from disk and open it under its path.
    pub fn open_file(&mut self, path: &Path) -> ServiceResult<String> {
        let text = std::fs::read_to_string(path).map_err(|source| ServiceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let uri = path.display().to_string();
        self.open_document(uri.clone(), text, 0);
        Ok(uri)
    }

    /// Update a document's content. Re-analysis happens only when the version
    /// changes.
    pub fn update_document(&mut self, uri: &str, text: String, version: i32) -> ServiceResult<()> {
        let current = self
            .documents
            .get(uri)
            .ok_or_else(|| ServiceError::UnknownDocument(uri.to_string()))?;
        if current.version == version {
            return Ok(());
        }
        let snapshot = self.analyze(uri, text, version);
        self.documents.insert(uri.to_string(), snapshot);
        Ok(())
    }

    /// Close a document. Returns whether it was open.
    pub fn close_document(&mut self, uri: &str) -> bool {
        self.documents.remove(uri).is_some()
    }

    /// The current snapshot of a document. Later edits never mutate it.
    pub fn snapshot(&self, uri: &str) -> ServiceResult<Arc<Snapshot>> {
        self.documents
            .get(uri)
            .cloned()
            .ok_or_else(|| ServiceError::UnknownDocument(uri.to_string()))
    }

    /// Get the current text of a document.
    pub fn get_document_text(&self, uri: &str) -> Option<&str> {
        self.documents.get(uri).map(|s| s.text.as_str())
    }

    /// Parse errors followed by analysis markers.
    pub fn get_markers(&self, uri: &str) -> ServiceResult<Vec<Marker>> {
        Ok(self.snapshot(uri)?.markers())
    }

    pub fn get_cursor_context(&self, uri: &str, offset: TextPos) -> ServiceResult<CursorContext> {
        Ok(self.snapshot(uri)?.cursor_context(offset, &self.features))
    }

    pub fn get_rename_positions(&self, uri: &str, offset: TextPos) -> ServiceResult<Option<RenamePositions>> {
        Ok(self.snapshot(uri)?.rename_positions(offset))
    }

    pub fn get_references(&self, uri: &str, offset: TextPos) -> ServiceResult<Vec<Reference>> {
        Ok(self.snapshot(uri)?.references(offset))
    }

    /// Convert a 0-based line and byte column in a document to an offset.
    pub fn offset_of(&self, uri: &str, line: u32, column: u32) -> ServiceResult<Option<TextPos>> {
        Ok(self.snapshot(uri)?.offset_of(line, column))
    }

    fn analyze(&self, uri: &str, text: String, version: i32) -> Arc<Snapshot> {
        let snapshot = Snapshot::analyze(text, version, &self.features);
        debug!(
            uri,
            version,
            parse_errors = snapshot.parse_markers.len(),
            markers = snapshot.analysis.markers().len(),
            "analyzed document"
        );
        Arc::new(snapshot)
    }
}

impl Default for LanguageService {
    fn default() -> Self {
        Self::new()
    }
}
