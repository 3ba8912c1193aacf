//! Request, response and entity types shared by the service and its adapters.

mod entities;
mod envelope;
mod requests;
mod responses;

pub use entities::{FileData, FileType, IssueData, IssueState, PRData};
pub use envelope::{ToolCallRequest, ToolCallResponse, ToolDefinition, ToolParameter};
pub use requests::{
    CreateIssueRequest, GetFileContentsRequest, GetIssueRequest, GetPRRequest, ListIssuesRequest,
    ListPRsRequest, ListRepoFilesRequest, RepoRef, StateFilter, ToolRequest, UpdateIssueRequest,
    DEFAULT_REF,
};
pub use responses::{
    CreateIssueResponse, GetFileContentsResponse, GetIssueResponse, GetPRResponse,
    ListIssuesResponse, ListPRsResponse, ListRepoFilesResponse, UpdateIssueResponse,
};

use serde::{de, Deserialize, Deserializer};

/// Deserialize a GitHub issue or pull request number, rejecting zero.
pub(crate) fn positive_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let n = u64::deserialize(deserializer)?;
    if n == 0 {
        return Err(de::Error::custom("number must be a positive integer"));
    }
    Ok(n)
}
