//! Server lifecycle: capabilities, workspace scanning, shutdown.

use std::fs;

use phpoutline_lsp::Backend;
use tower_lsp::LanguageServer;
use tower_lsp::lsp_types::*;

fn create_test_backend() -> Backend {
    Backend::new_test()
}

#[tokio::test]
async fn initialize_reports_server_info() {
    let backend = create_test_backend();
    let result = backend.initialize(InitializeParams::default()).await.unwrap();

    let server_info = result.server_info.expect("server_info should be present");
    assert_eq!(server_info.name, "phpoutline");
    assert!(server_info.version.is_some());
}

#[tokio::test]
async fn initialize_advertises_symbol_capabilities() {
    let backend = create_test_backend();
    let result = backend.initialize(InitializeParams::default()).await.unwrap();

    let caps = result.capabilities;
    assert!(
        matches!(caps.document_symbol_provider, Some(OneOf::Left(true))),
        "documentSymbol should be enabled"
    );
    assert!(
        matches!(caps.workspace_symbol_provider, Some(OneOf::Left(true))),
        "workspace/symbol should be enabled"
    );
    assert!(matches!(
        caps.text_document_sync,
        Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL))
    ));
}

#[tokio::test]
async fn initialized_indexes_php_files_under_the_root() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::write(
        dir.path().join("src/User.php"),
        "<?php\nnamespace App;\nclass User { public function save(): bool { return true; } }\n",
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), "not php").unwrap();

    let backend = create_test_backend();
    let init_params = InitializeParams {
        root_uri: Some(Url::from_file_path(dir.path()).unwrap()),
        capabilities: ClientCapabilities::default(),
        ..InitializeParams::default()
    };
    backend.initialize(init_params).await.unwrap();
    backend.initialized(InitializedParams {}).await;

    let matches = backend
        .symbol(WorkspaceSymbolParams {
            query: "save".to_string(),
            work_done_progress_params: Default::default(),
            partial_result_params: Default::default(),
        })
        .await
        .unwrap()
        .unwrap();

    assert!(
        matches.iter().any(|s| s.name == "save"
            && s.kind == SymbolKind::METHOD
            && s.container_name.as_deref() == Some("App\\User")),
        "workspace scan should have indexed src/User.php, got {:?}",
        matches
    );
}

#[tokio::test]
async fn shutdown_succeeds() {
    let backend = create_test_backend();
    assert!(backend.shutdown().await.is_ok());
}
