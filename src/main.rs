use clap::Parser;
use tower_lsp::{LspService, Server};

use phpoutline_lsp::Backend;

/// PHP language server providing document outline and workspace symbol
/// search over stdio.
#[derive(Parser)]
#[command(name = "phpoutline_lsp", version, about)]
struct Cli {
    /// Log filter directive, e.g. "info" or "phpoutline_lsp=debug".
    #[arg(long, default_value = "info")]
    log: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // stdout carries the protocol, so logs must go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&cli.log))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let (service, socket) = LspService::new(Backend::new);
    Server::new(tokio::io::stdin(), tokio::io::stdout(), socket)
        .serve(service)
        .await;
}
