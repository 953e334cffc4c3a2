//! MCP server over stdio
//!
//! [`MongoMcpServer`] implements the `rmcp` server handler by hand. Tool calls
//! go to the [`OperationRouter`], resource reads to the [`ResourceReader`],
//! and every [`OperationError`] is mapped to a JSON-RPC error:
//!
//! | kind | code |
//! |---|---|
//! | `InvalidArgument` | -32602 |
//! | `NotFound` | -32002 |
//! | `MethodNotFound` | -32601 |
//! | `InternalError` | -32603 |

pub mod catalog;

use std::sync::Arc;

use rmcp::model::{
    AnnotateAble, CallToolRequestParams, CallToolResult, Content, ErrorCode, ErrorData,
    Implementation, ListResourceTemplatesResult, ListResourcesResult, ListToolsResult,
    PaginatedRequestParams, RawResourceTemplate, ReadResourceRequestParams, ReadResourceResult,
    ResourceContents, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler, ServiceExt};
use serde_json::json;
use tracing::{debug, info};

use crate::error::{ErrorKind, McpServerError, OperationError, Result};
use crate::executor::OperationRouter;
use crate::resource::{self, ResourceReader};

/// Map a caller-facing error to its JSON-RPC representation
pub fn to_error_data(error: OperationError) -> ErrorData {
    let code = match error.kind {
        ErrorKind::InvalidArgument => ErrorCode::INVALID_PARAMS,
        ErrorKind::NotFound => ErrorCode::RESOURCE_NOT_FOUND,
        ErrorKind::MethodNotFound => ErrorCode::METHOD_NOT_FOUND,
        ErrorKind::InternalError => ErrorCode::INTERNAL_ERROR,
    };
    ErrorData::new(code, error.message, None)
}

/// MCP handler exposing MongoDB operations and collection resources
#[derive(Clone)]
pub struct MongoMcpServer {
    router: Arc<OperationRouter>,
    resources: Arc<ResourceReader>,
}

impl MongoMcpServer {
    pub fn new(router: Arc<OperationRouter>, resources: Arc<ResourceReader>) -> Self {
        Self { router, resources }
    }

    /// Serve requests on stdin/stdout until the client disconnects
    pub async fn serve_stdio(self) -> Result<()> {
        info!("Serving MCP over stdio");
        let service = self
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| McpServerError::Generic(format!("MCP initialization failed: {e}")))?;

        let reason = service
            .waiting()
            .await
            .map_err(|e| McpServerError::Generic(format!("MCP service terminated: {e}")))?;
        info!("MCP session ended: {:?}", reason);
        Ok(())
    }
}

impl ServerHandler for MongoMcpServer {
    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo::default();
        info.capabilities = ServerCapabilities::builder()
            .enable_tools()
            .enable_resources()
            .build();
        info.server_info = Implementation::from_build_env();
        info.instructions = Some(
            "Query MongoDB collections with aggregation pipelines, export results to \
             spreadsheets, and read whole collections as mongodb://{database}/{collection}."
                .to_string(),
        );
        info
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(catalog::tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        debug!("tools/call {}", request.name);
        let outcome = self
            .router
            .route(&request.name, request.arguments.as_ref())
            .await
            .map_err(to_error_data)?;
        Ok(CallToolResult::success(vec![Content::text(outcome.text())]))
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListResourcesResult, ErrorData> {
        Ok(ListResourcesResult::with_all_items(Vec::new()))
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListResourceTemplatesResult, ErrorData> {
        let template: RawResourceTemplate = serde_json::from_value(json!({
            "uriTemplate": resource::URI_TEMPLATE,
            "name": "collection",
            "description": "All documents of a MongoDB collection",
            "mimeType": resource::MIME_TYPE,
        }))
        .map_err(|e| ErrorData::new(ErrorCode::INTERNAL_ERROR, e.to_string(), None))?;

        Ok(ListResourceTemplatesResult::with_all_items(vec![
            template.no_annotation(),
        ]))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ReadResourceResult, ErrorData> {
        debug!("resources/read {}", request.uri);
        let text = self
            .resources
            .read_text(&request.uri)
            .await
            .map_err(to_error_data)?;

        let mut contents = ResourceContents::text(text, request.uri.clone());
        if let ResourceContents::TextResourceContents { mime_type, .. } = &mut contents {
            *mime_type = Some(resource::MIME_TYPE.to_string());
        }
        Ok(ReadResourceResult::new(vec![contents]))
    }
}
