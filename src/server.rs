use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use serde::Serialize;

use crate::models::{
    CreateIssueRequest, GetFileContentsRequest, GetIssueRequest, GetPRRequest, ListIssuesRequest,
    ListPRsRequest, ListRepoFilesRequest, UpdateIssueRequest,
};
use crate::service::GithubToolService;

#[derive(Clone)]
pub struct McpGithubToolsServer {
    service: GithubToolService,
    tool_router: ToolRouter<Self>,
}

impl McpGithubToolsServer {
    pub fn new(service: GithubToolService) -> Self {
        Self {
            service,
            tool_router: Self::tool_router(),
        }
    }
}

/// Render a service outcome as pretty-printed JSON tool output.
fn respond<T: Serialize>(outcome: crate::error::Result<T>) -> std::result::Result<CallToolResult, ErrorData> {
    let response = outcome.map_err(|e| e.to_mcp_error())?;
    let text = serde_json::to_string_pretty(&response)
        .map_err(|e| ErrorData::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

// -- MCP tool handlers (thin wrappers over GithubToolService) --

#[tool_router]
impl McpGithubToolsServer {
    #[tool(
        name = "list_issues",
        description = "List issues in a repository, filtered by state, labels and assignee"
    )]
    async fn list_issues(
        &self,
        Parameters(request): Parameters<ListIssuesRequest>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        respond(self.service.list_issues(&request).await)
    }

    #[tool(
        name = "create_issue",
        description = "Create a new issue with optional labels and assignees"
    )]
    async fn create_issue(
        &self,
        Parameters(request): Parameters<CreateIssueRequest>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        respond(self.service.create_issue(&request).await)
    }

    #[tool(name = "get_issue", description = "Get a single issue by number")]
    async fn get_issue(
        &self,
        Parameters(request): Parameters<GetIssueRequest>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        respond(self.service.get_issue(&request).await)
    }

    #[tool(
        name = "update_issue",
        description = "Update the title, body or state of an issue; omitted fields are left unchanged"
    )]
    async fn update_issue(
        &self,
        Parameters(request): Parameters<UpdateIssueRequest>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        respond(self.service.update_issue(&request).await)
    }

    #[tool(
        name = "list_prs",
        description = "List pull requests in a repository, filtered by state"
    )]
    async fn list_prs(
        &self,
        Parameters(request): Parameters<ListPRsRequest>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        respond(self.service.list_prs(&request).await)
    }

    #[tool(name = "get_pr", description = "Get a single pull request by number")]
    async fn get_pr(
        &self,
        Parameters(request): Parameters<GetPRRequest>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        respond(self.service.get_pr(&request).await)
    }

    #[tool(
        name = "get_file_contents",
        description = "Read a text file from a repository at a git ref (default: main)"
    )]
    async fn get_file_contents(
        &self,
        Parameters(request): Parameters<GetFileContentsRequest>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        respond(self.service.get_file_contents(&request).await)
    }

    #[tool(
        name = "list_repo_files",
        description = "List the files and directories at a path in a repository (default: root of main)"
    )]
    async fn list_repo_files(
        &self,
        Parameters(request): Parameters<ListRepoFilesRequest>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        respond(self.service.list_repo_files(&request).await)
    }
}

#[tool_handler]
impl ServerHandler for McpGithubToolsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "mcp-github-tools".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                "GitHub tools server. Repositories are named owner/name. \
                 Use list_issues/get_issue for issues, create_issue and update_issue to change them, \
                 list_prs/get_pr for pull requests, list_repo_files to browse a directory \
                 and get_file_contents to read a text file."
                    .to_string(),
            ),
        }
    }
}
