//! MCP server implementation for Omnisearch.
//!
//! This module provides the MCP protocol server that exposes unified search
//! and root indexing to AI assistants through the Model Context Protocol.

pub mod handlers;

pub use handlers::OmnisearchMcpServer;

use anyhow::Result;
use rmcp::transport::io::stdio;
use rmcp::ServiceExt;

/// Run the Omnisearch MCP server with stdio transport.
///
/// Communicates over stdin/stdout and returns once the client disconnects.
pub async fn run_server(server: OmnisearchMcpServer) -> Result<()> {
    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}
