//! MCP server handler backed by the WatchBase dispatcher.

use rmcp::model::{
    CallToolRequestParams, CallToolResult, ErrorData, JsonObject, ListToolsResult,
    PaginatedRequestParams, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler};
use serde_json::Value;
use watchbase_tools::Dispatcher;

const INSTRUCTIONS: &str = "Structured and standardized querying of watch-related metadata such as \
brands, families and reference details from WatchBase.com. Start with search or list_brands, then \
drill down with list_families, list_watches and get_watch_details.";

#[derive(Clone)]
pub struct WatchbaseServer {
    dispatcher: Dispatcher,
}

impl WatchbaseServer {
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    #[must_use]
    pub fn tools(&self) -> Vec<Tool> {
        self.dispatcher.list_tools()
    }

    /// Run one `tools/call`.
    ///
    /// Unknown tools and invalid arguments become JSON-RPC errors; upstream failures come back as
    /// an error-flagged `CallToolResult`.
    pub async fn call(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, ErrorData> {
        let arguments = arguments.map_or(Value::Null, Value::Object);
        let envelope = self.dispatcher.call(name, &arguments).await?;
        Ok(envelope.into())
    }
}

impl ServerHandler for WatchbaseServer {
    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo::default();
        info.capabilities = ServerCapabilities::builder().enable_tools().build();
        info.server_info.name = "watchbase-mcp".to_string();
        info.server_info.version = env!("CARGO_PKG_VERSION").to_string();
        info.instructions = Some(INSTRUCTIONS.to_string());
        info
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            tools: self.tools(),
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        self.call(&request.name, request.arguments).await
    }
}
