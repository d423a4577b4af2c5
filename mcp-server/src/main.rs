use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use mcp_server::delegate::ToolServerDelegate;
use mcp_server::logging;
use mcp_server::sandbox::WorkspaceRoot;
use mcp_server::validator::ValidatorTable;

/// A sandboxed JSON-RPC file-tool server, speaking line-delimited JSON-RPC
/// 2.0 over its own stdin/stdout.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Directory every tool call is sandboxed to. Defaults to the current
    /// working directory.
    #[arg(long, value_name = "PATH")]
    root_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let root_dir = cli
        .root_dir
        .unwrap_or_else(|| std::env::current_dir().expect("failed to read current directory"));

    let root = match WorkspaceRoot::new(&root_dir) {
        Ok(root) => root,
        Err(e) => {
            eprintln!("mcp-server: failed to resolve --root-dir {}: {e}", root_dir.display());
            std::process::exit(1);
        }
    };

    let _log_guard = match logging::init(root.path()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("mcp-server: failed to start logging under {}: {e}", root.path().display());
            std::process::exit(1);
        }
    };

    let validators = match ValidatorTable::embedded() {
        Ok(validators) => validators,
        Err(e) => {
            tracing::error!("failed to load validator table: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(root = %root.path().display(), "starting tool-server runtime");
    let delegate = Arc::new(ToolServerDelegate::new(root, validators));

    match mcp_server::run(delegate).await {
        Ok(()) => {
            tracing::info!("clean shutdown on stdin EOF");
            std::process::exit(0);
        }
        Err(e) => {
            tracing::error!("run loop failed: {e}");
            std::process::exit(1);
        }
    }
}
