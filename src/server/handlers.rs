//! MCP tool handlers for the Omnisearch server.
//!
//! This module implements all the MCP tools using the rmcp SDK's tool_router pattern.

use crate::error::SearchError;
use crate::indexing::IndexOutcome;
use crate::models::{CommandEntry, QuerySource};
use crate::services::{IndexService, SearchService};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::Deserialize;
use std::borrow::Cow;
use std::sync::Arc;

/// The Omnisearch MCP server exposing unified search and root indexing.
#[derive(Clone)]
pub struct OmnisearchMcpServer {
    search_service: Arc<dyn SearchService>,
    index_service: Arc<dyn IndexService>,
    tool_router: ToolRouter<Self>,
}

#[tool_handler]
impl ServerHandler for OmnisearchMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities {
                tools: Some(Default::default()),
                ..Default::default()
            },
            server_info: Implementation {
                name: "omnisearch-mcp-server".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some("On-device unified search - fuzzy search across installed apps, contacts, indexed files and user commands, plus management of indexed directory roots.".into()),
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SearchToolParams {
    query: String,
    /// USER_INPUT, SHORTCUT or PROGRAMMATIC
    #[serde(default)]
    source: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ResultIdParams {
    result_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct IndexRootParams {
    #[serde(default)]
    root_id: Option<String>,
    #[serde(default)]
    root_uri: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct RootIdParams {
    root_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ScanStatusParams {
    #[serde(default)]
    root_id: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ProviderToggleParams {
    provider_id: String,
    enabled: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct AddCommandParams {
    id: String,
    name: String,
    path: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct CommandIdParams {
    command_id: String,
}

// Helper function to convert errors to MCP errors
fn to_mcp_error(e: impl std::fmt::Display) -> McpError {
    McpError {
        code: ErrorCode::INTERNAL_ERROR,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

fn invalid_params(e: impl std::fmt::Display) -> McpError {
    McpError {
        code: ErrorCode::INVALID_PARAMS,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

fn parse_source(source: Option<&str>) -> Result<QuerySource, McpError> {
    match source.map(|s| s.trim().to_ascii_uppercase()).as_deref() {
        None | Some("") | Some("USER_INPUT") => Ok(QuerySource::UserInput),
        Some("SHORTCUT") => Ok(QuerySource::Shortcut),
        Some("PROGRAMMATIC") => Ok(QuerySource::Programmatic),
        Some(other) => Err(invalid_params(format!("Unknown query source: {}", other))),
    }
}

fn outcome_json(outcome: Option<IndexOutcome>) -> serde_json::Value {
    match outcome {
        None => serde_json::json!({ "status": "not_running" }),
        Some(IndexOutcome::Success { indexed_count }) => {
            serde_json::json!({ "status": "success", "indexed_count": indexed_count })
        }
        Some(IndexOutcome::Failure) => serde_json::json!({ "status": "failure" }),
        Some(IndexOutcome::Cancelled) => serde_json::json!({ "status": "cancelled" }),
    }
}

fn json_text(value: &serde_json::Value) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(value).map_err(to_mcp_error)?,
    )]))
}

// Tool router implementation
#[tool_router]
impl OmnisearchMcpServer {
    /// Create a new Omnisearch MCP server.
    pub fn new(
        search_service: Arc<dyn SearchService>,
        index_service: Arc<dyn IndexService>,
    ) -> Self {
        Self {
            search_service,
            index_service,
            tool_router: Self::tool_router(),
        }
    }

    /// Search every provider and return the merged ranking.
    #[tool(
        description = "Fuzzy search across installed applications, contacts, indexed files and user commands. Returns one ranked list with matched character offsets for highlighting. A newer search supersedes one still running."
    )]
    async fn search(
        &self,
        params: Parameters<SearchToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let source = parse_source(params.source.as_deref())?;

        let results = match self
            .search_service
            .search(params.query.clone(), source)
            .await
        {
            Ok(results) => results,
            Err(SearchError::Superseded) => {
                return json_text(&serde_json::json!({
                    "query": params.query,
                    "superseded": true,
                    "results": [],
                }));
            }
            Err(SearchError::InvalidParameters(msg)) => return Err(invalid_params(msg)),
            Err(e) => return Err(to_mcp_error(e)),
        };

        json_text(&serde_json::json!({
            "query": params.query,
            "result_count": results.len(),
            "results": results,
        }))
    }

    /// Run the action of a result from the latest search.
    #[tool(
        description = "Open a result from the most recent search by its id (open the file, launch the app, call or mail the contact, run the command). Launch failures are reported as a notification."
    )]
    async fn open_result(
        &self,
        params: Parameters<ResultIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let report = self
            .search_service
            .open_result(&params.0.result_id)
            .await
            .map_err(to_mcp_error)?;

        json_text(&serde_json::to_value(&report).map_err(to_mcp_error)?)
    }

    /// Register a directory root and index it in the background.
    #[tool(
        description = "Register a directory root (plain path or file:// URI) and start indexing it in the background. Re-indexing a root replaces its previous documents. Use scan_status to follow progress."
    )]
    async fn index_root(
        &self,
        params: Parameters<IndexRootParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let root_id = self
            .index_service
            .index_root(params.root_id, params.root_uri, params.display_name)
            .await
            .map_err(invalid_params)?;

        json_text(&serde_json::json!({
            "root_id": root_id,
            "status": "started",
        }))
    }

    /// Cancel a root's running indexing pass.
    #[tool(description = "Cancel the indexing pass running over a root and wait for it to stop.")]
    async fn cancel_indexing(
        &self,
        params: Parameters<RootIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = self.index_service.cancel_indexing(&params.0.root_id).await;
        json_text(&outcome_json(outcome))
    }

    /// Forget a root and delete its documents.
    #[tool(
        description = "Remove a root: stop any indexing pass, delete every document indexed under it and drop its scan status."
    )]
    async fn remove_root(
        &self,
        params: Parameters<RootIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let root_id = params.0.root_id;
        let removed = self
            .index_service
            .remove_root(&root_id)
            .await
            .map_err(to_mcp_error)?;

        json_text(&serde_json::json!({
            "root_id": root_id,
            "documents_removed": removed,
        }))
    }

    /// Report scan state of one root or all roots.
    #[tool(
        description = "Show indexing state (IDLE, INDEXING, SUCCESS, ERROR), item count, last update time and error message for one root or every root."
    )]
    async fn scan_status(
        &self,
        params: Parameters<ScanStatusParams>,
    ) -> Result<CallToolResult, McpError> {
        let status = self.index_service.scan_status(params.0.root_id.as_deref());
        json_text(&serde_json::to_value(&status).map_err(to_mcp_error)?)
    }

    /// Enable or disable a search provider.
    #[tool(
        description = "Enable or disable a search provider (apps, contacts, files, commands). Providers are enabled unless turned off."
    )]
    async fn set_provider_enabled(
        &self,
        params: Parameters<ProviderToggleParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        self.index_service
            .set_provider_enabled(&params.provider_id, params.enabled)
            .await
            .map_err(invalid_params)?;

        json_text(&serde_json::json!({
            "provider_id": params.provider_id,
            "enabled": params.enabled,
        }))
    }

    /// Add or replace a user-defined command.
    #[tool(
        description = "Add a user-defined command (id, display name, executable path) to the commands provider. An existing command with the same id is replaced."
    )]
    async fn add_command(
        &self,
        params: Parameters<AddCommandParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let commands = self
            .index_service
            .add_command(CommandEntry {
                id: params.id,
                name: params.name,
                path: params.path,
            })
            .await
            .map_err(invalid_params)?;

        json_text(&serde_json::json!({ "commands": commands }))
    }

    /// Remove a user-defined command.
    #[tool(description = "Remove a user-defined command by id.")]
    async fn remove_command(
        &self,
        params: Parameters<CommandIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let command_id = params.0.command_id;
        let removed = self
            .index_service
            .remove_command(&command_id)
            .await
            .map_err(to_mcp_error)?;

        json_text(&serde_json::json!({
            "command_id": command_id,
            "removed": removed,
        }))
    }
}
