//! phpoutline: a PHP language server focused on symbols.
//!
//! The server parses PHP files with mago_syntax, classifies the
//! resulting syntax nodes into LSP symbol descriptors, and answers
//! `textDocument/documentSymbol` and `workspace/symbol` requests from a
//! per-URI symbol map. Workspace files are discovered with cooperative,
//! cancellable enumeration so indexing never starves other requests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;
use tower_lsp::Client;
use tower_lsp::lsp_types::{MessageType, SymbolInformation, Url};

pub mod discovery;
pub mod docblock;
pub mod location;
mod parser;
mod server;
pub mod symbol;
pub mod types;

pub use discovery::{DiscoveryError, FileSystemFilesFinder};
pub use location::{LineIndex, LocationBuilder};
pub use symbol::{CLASSIFICATION_ORDER, ClassificationRule, SymbolBuilder, classify, container_name};
pub use types::{AssignmentTarget, DocTag, NameChild, NodeShape, NodeVariant, SourceNode};

pub struct Backend {
    name: String,
    version: String,
    /// Current text of every open document, keyed by URI.
    open_files: Arc<Mutex<HashMap<String, String>>>,
    /// Symbols extracted per file URI, for open documents and files
    /// found by the initial workspace scan.
    symbol_map: Arc<Mutex<HashMap<String, Vec<SymbolInformation>>>>,
    workspace_root: Arc<Mutex<Option<PathBuf>>>,
    /// Cancels the in-flight workspace scan; cancellation is observed at
    /// the scan's next checkpoint and discards any partial result.
    scan_cancel: CancellationToken,
    client: Option<Client>,
}

impl Backend {
    pub fn new(client: Client) -> Self {
        Self {
            name: "phpoutline".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            open_files: Arc::new(Mutex::new(HashMap::new())),
            symbol_map: Arc::new(Mutex::new(HashMap::new())),
            workspace_root: Arc::new(Mutex::new(None)),
            scan_cancel: CancellationToken::new(),
            client: Some(client),
        }
    }

    pub fn new_test() -> Self {
        Self {
            name: "phpoutline".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            open_files: Arc::new(Mutex::new(HashMap::new())),
            symbol_map: Arc::new(Mutex::new(HashMap::new())),
            workspace_root: Arc::new(Mutex::new(None)),
            scan_cancel: CancellationToken::new(),
            client: None,
        }
    }

    /// Re-extract the symbol list for a file and store it in the map.
    pub(crate) fn update_symbols(&self, uri: &str, content: &str) {
        let Ok(url) = Url::parse(uri) else {
            tracing::warn!("ignoring document with unparsable URI: {}", uri);
            return;
        };

        let extracted = parser::parse_symbols(&url, content);
        let builder = SymbolBuilder::new(content);

        let mut symbols: Vec<SymbolInformation> = extracted
            .nodes
            .iter()
            .filter_map(|(node, fqn)| builder.build(node, fqn.as_deref()))
            .collect();

        for member in &extracted.virtual_members {
            let (start, end) = member.doc_span;
            let range = builder.locations().range_for(start, end - start);
            symbols.push(builder.from_doc_tag(&member.tag, range, &member.fqn, &member.owner));
        }

        if let Ok(mut map) = self.symbol_map.lock() {
            map.insert(uri.to_string(), symbols);
        }
    }

    /// Public helper for tests: the stored symbols for a given URI.
    pub fn get_symbols_for_uri(&self, uri: &str) -> Option<Vec<SymbolInformation>> {
        if let Ok(map) = self.symbol_map.lock() {
            map.get(uri).cloned()
        } else {
            None
        }
    }

    /// Discover every `*.php` file under the workspace root and index it.
    ///
    /// Returns the number of files indexed. Aborts on the first
    /// discovery error; an already-cancelled scan indexes nothing.
    pub(crate) async fn index_workspace(&self, root: &Path) -> Result<usize, DiscoveryError> {
        let finder = FileSystemFilesFinder::new(root);
        let uris = finder
            .find_by_pattern("**/*.php", &self.scan_cancel)
            .await?;

        let mut indexed = 0;
        for uri in uris {
            let Ok(path) = uri.to_file_path() else {
                continue;
            };
            match std::fs::read_to_string(&path) {
                Ok(content) => {
                    self.update_symbols(uri.as_ref(), &content);
                    indexed += 1;
                }
                Err(err) => {
                    tracing::warn!("skipping unreadable file {}: {}", path.display(), err);
                }
            }
            tokio::task::yield_now().await;
        }
        Ok(indexed)
    }

    pub(crate) async fn log(&self, typ: MessageType, message: String) {
        if let Some(client) = &self.client {
            client.log_message(typ, message).await;
        }
    }
}
