//! LSP server trait implementation.
//!
//! This module contains the `impl LanguageServer for Backend` block,
//! which handles all LSP protocol messages (initialize, didOpen,
//! didChange, didClose, documentSymbol, workspace symbol).

use tower_lsp::LanguageServer;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;

use crate::Backend;

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        // Extract and store the workspace root path
        let workspace_root = params
            .root_uri
            .as_ref()
            .and_then(|uri| uri.to_file_path().ok());

        if let Some(root) = workspace_root
            && let Ok(mut wr) = self.workspace_root.lock()
        {
            *wr = Some(root);
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                document_symbol_provider: Some(OneOf::Left(true)),
                workspace_symbol_provider: Some(OneOf::Left(true)),
                ..ServerCapabilities::default()
            },
            server_info: Some(ServerInfo {
                name: self.name.clone(),
                version: Some(self.version.clone()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        let workspace_root = self
            .workspace_root
            .lock()
            .ok()
            .and_then(|guard| guard.clone());

        if let Some(root) = workspace_root {
            match self.index_workspace(&root).await {
                Ok(count) => {
                    self.log(
                        MessageType::INFO,
                        format!("phpoutline initialized! Indexed {} PHP file(s)", count),
                    )
                    .await;
                }
                Err(err) => {
                    tracing::error!("workspace scan aborted: {}", err);
                    self.log(
                        MessageType::WARNING,
                        format!("phpoutline workspace scan aborted: {}", err),
                    )
                    .await;
                }
            }
        } else {
            self.log(MessageType::INFO, "phpoutline initialized!".to_string())
                .await;
        }
    }

    async fn shutdown(&self) -> Result<()> {
        self.scan_cancel.cancel();
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        let uri = doc.uri.to_string();
        let text = doc.text;

        if let Ok(mut files) = self.open_files.lock() {
            files.insert(uri.clone(), text.clone());
        }

        self.update_symbols(&uri, &text);

        self.log(MessageType::INFO, format!("Opened file: {}", uri))
            .await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri.to_string();

        if let Some(change) = params.content_changes.first() {
            let text = &change.text;

            if let Ok(mut files) = self.open_files.lock() {
                files.insert(uri.clone(), text.clone());
            }

            self.update_symbols(&uri, text);
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri.to_string();

        if let Ok(mut files) = self.open_files.lock() {
            files.remove(&uri);
        }

        if let Ok(mut map) = self.symbol_map.lock() {
            map.remove(&uri);
        }

        self.log(MessageType::INFO, format!("Closed file: {}", uri))
            .await;
    }

    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> Result<Option<DocumentSymbolResponse>> {
        let uri = params.text_document.uri.to_string();

        let symbols = self.get_symbols_for_uri(&uri);
        Ok(symbols.map(DocumentSymbolResponse::Flat))
    }

    async fn symbol(
        &self,
        params: WorkspaceSymbolParams,
    ) -> Result<Option<Vec<SymbolInformation>>> {
        let query = params.query.to_lowercase();

        let matches = if let Ok(map) = self.symbol_map.lock() {
            map.values()
                .flatten()
                .filter(|symbol| query.is_empty() || symbol.name.to_lowercase().contains(&query))
                .cloned()
                .collect()
        } else {
            Vec::new()
        };

        Ok(Some(matches))
    }
}
