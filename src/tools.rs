//! Tool catalog and name-based dispatch for adapters that do not bind to the
//! typed service methods directly.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{GithubToolError, Result};
use crate::models::{
    CreateIssueRequest, GetFileContentsRequest, GetIssueRequest, GetPRRequest, ListIssuesRequest,
    ListPRsRequest, ListRepoFilesRequest, ToolCallRequest, ToolCallResponse, ToolDefinition,
    ToolParameter, ToolRequest, UpdateIssueRequest, DEFAULT_REF,
};
use crate::service::GithubToolService;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    ListIssues,
    CreateIssue,
    GetIssue,
    UpdateIssue,
    ListPrs,
    GetPr,
    GetFileContents,
    ListRepoFiles,
}

impl ToolName {
    pub const ALL: [ToolName; 8] = [
        ToolName::ListIssues,
        ToolName::CreateIssue,
        ToolName::GetIssue,
        ToolName::UpdateIssue,
        ToolName::ListPrs,
        ToolName::GetPr,
        ToolName::GetFileContents,
        ToolName::ListRepoFiles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::ListIssues => "list_issues",
            ToolName::CreateIssue => "create_issue",
            ToolName::GetIssue => "get_issue",
            ToolName::UpdateIssue => "update_issue",
            ToolName::ListPrs => "list_prs",
            ToolName::GetPr => "get_pr",
            ToolName::GetFileContents => "get_file_contents",
            ToolName::ListRepoFiles => "list_repo_files",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolName::ListIssues => "List issues in a repository, filtered by state, labels and assignee",
            ToolName::CreateIssue => "Create a new issue with optional labels and assignees",
            ToolName::GetIssue => "Get a single issue by number",
            ToolName::UpdateIssue => "Update the title, body or state of an issue; omitted fields are left unchanged",
            ToolName::ListPrs => "List pull requests in a repository, filtered by state",
            ToolName::GetPr => "Get a single pull request by number",
            ToolName::GetFileContents => "Read a text file from a repository at a git ref",
            ToolName::ListRepoFiles => "List the files and directories at a path in a repository",
        }
    }

    fn parameters(&self) -> Vec<ToolParameter> {
        let repo = ToolParameter::required("repo", "string", "Repository in owner/name format");
        let state_filter = |noun: &str| {
            ToolParameter::optional("state", "string", &format!("{} state filter", noun))
                .with_enum(&["open", "closed", "all"])
                .with_default("open")
        };
        let git_ref = ToolParameter::optional("ref", "string", "Git ref (branch, tag, or SHA)")
            .with_default(DEFAULT_REF);

        match self {
            ToolName::ListIssues => vec![
                repo,
                state_filter("Issue"),
                ToolParameter::optional("labels", "array", "Only issues carrying all of these labels"),
                ToolParameter::optional("assignee", "string", "Only issues assigned to this user"),
            ],
            ToolName::CreateIssue => vec![
                repo,
                ToolParameter::required("title", "string", "Issue title"),
                ToolParameter::required("body", "string", "Issue body in markdown"),
                ToolParameter::optional("labels", "array", "Labels to apply"),
                ToolParameter::optional("assignees", "array", "Users to assign"),
            ],
            ToolName::GetIssue => vec![
                repo,
                ToolParameter::required("issue_number", "integer", "Issue number"),
            ],
            ToolName::UpdateIssue => vec![
                repo,
                ToolParameter::required("issue_number", "integer", "Issue number"),
                ToolParameter::optional("title", "string", "New title"),
                ToolParameter::optional("body", "string", "New body"),
                ToolParameter::optional("state", "string", "New state").with_enum(&["open", "closed"]),
            ],
            ToolName::ListPrs => vec![repo, state_filter("Pull request")],
            ToolName::GetPr => vec![
                repo,
                ToolParameter::required("pr_number", "integer", "Pull request number"),
            ],
            ToolName::GetFileContents => vec![
                repo,
                ToolParameter::required("path", "string", "File path within the repository"),
                git_ref,
            ],
            ToolName::ListRepoFiles => vec![
                repo,
                ToolParameter::optional("path", "string", "Directory path (root when empty)")
                    .with_default(""),
                git_ref,
            ],
        }
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.as_str().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = GithubToolError;

    fn from_str(s: &str) -> Result<Self> {
        ToolName::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| GithubToolError::validation(format!("Unknown tool: {}", s)))
    }
}

/// Discovery metadata for every tool.
pub fn definitions() -> Vec<ToolDefinition> {
    ToolName::ALL.iter().map(ToolName::definition).collect()
}

fn to_result<T: Serialize>(response: &T) -> Result<Value> {
    serde_json::to_value(response).map_err(|e| GithubToolError::Service(e.to_string()))
}

impl GithubToolService {
    /// Run a tool by name. Failures are reported in the envelope, never raised.
    pub async fn call_tool(&self, request: ToolCallRequest) -> ToolCallResponse {
        let tool = match request.tool.parse::<ToolName>() {
            Ok(tool) => tool,
            Err(e) => {
                tracing::warn!(tool = %request.tool, "Unknown tool requested");
                return ToolCallResponse::failure(e.to_string(), "UNKNOWN_TOOL");
            }
        };

        match self.dispatch(tool, request.parameters).await {
            Ok((result, warning)) => ToolCallResponse::ok(result).with_warning(warning),
            Err(e) => {
                tracing::debug!(tool = %tool, error = %e, "Tool call failed");
                e.into()
            }
        }
    }

    async fn dispatch(&self, tool: ToolName, params: Map<String, Value>) -> Result<(Value, Option<String>)> {
        match tool {
            ToolName::ListIssues => {
                let response = self
                    .list_issues(&ListIssuesRequest::from_parameters(params)?)
                    .await?;
                Ok((to_result(&response)?, self.page_warning(response.total_count())))
            }
            ToolName::CreateIssue => {
                let response = self
                    .create_issue(&CreateIssueRequest::from_parameters(params)?)
                    .await?;
                Ok((to_result(&response)?, None))
            }
            ToolName::GetIssue => {
                let response = self
                    .get_issue(&GetIssueRequest::from_parameters(params)?)
                    .await?;
                Ok((to_result(&response)?, None))
            }
            ToolName::UpdateIssue => {
                let response = self
                    .update_issue(&UpdateIssueRequest::from_parameters(params)?)
                    .await?;
                Ok((to_result(&response)?, None))
            }
            ToolName::ListPrs => {
                let response = self
                    .list_prs(&ListPRsRequest::from_parameters(params)?)
                    .await?;
                Ok((to_result(&response)?, self.page_warning(response.total_count())))
            }
            ToolName::GetPr => {
                let response = self.get_pr(&GetPRRequest::from_parameters(params)?).await?;
                Ok((to_result(&response)?, None))
            }
            ToolName::GetFileContents => {
                let response = self
                    .get_file_contents(&GetFileContentsRequest::from_parameters(params)?)
                    .await?;
                Ok((to_result(&response)?, None))
            }
            ToolName::ListRepoFiles => {
                let response = self
                    .list_repo_files(&ListRepoFilesRequest::from_parameters(params)?)
                    .await?;
                Ok((to_result(&response)?, None))
            }
        }
    }

    /// A full page means GitHub may hold more results than were returned.
    fn page_warning(&self, count: usize) -> Option<String> {
        (count >= self.per_page() as usize).then(|| {
            format!(
                "Results limited to {} items; more may exist",
                self.per_page()
            )
        })
    }
}
