use std::fmt;
use std::sync::Arc;

use octocrab::service::middleware::retry::RetryConfig;
use octocrab::{Octocrab, OctocrabBuilder};

use crate::config::ServiceConfig;
use crate::error::{GithubToolError, ResourceKind, Result};
use crate::github::{
    self, IssueListQuery, IssuePatch, NewIssue, PullListQuery, RefQuery, WireContents, WireIssue,
    WirePull,
};
use crate::models::{
    CreateIssueRequest, CreateIssueResponse, FileData, GetFileContentsRequest,
    GetFileContentsResponse, GetIssueRequest, GetIssueResponse, GetPRRequest, GetPRResponse,
    IssueData, ListIssuesRequest, ListIssuesResponse, ListPRsRequest, ListPRsResponse,
    ListRepoFilesRequest, ListRepoFilesResponse, PRData, RepoRef, ToolRequest,
    UpdateIssueRequest, UpdateIssueResponse,
};

/// Façade over the GitHub REST API exposing one method per tool.
///
/// Every method validates its request, issues a single API call and maps the
/// payload into domain entities. Cloning is cheap; the client is shared
/// between clones of the same service only.
#[derive(Clone)]
pub struct GithubToolService {
    token: String,
    github: Arc<Octocrab>,
    per_page: u8,
}

impl fmt::Debug for GithubToolService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubToolService")
            .field("token", &"<redacted>")
            .field("per_page", &self.per_page)
            .finish()
    }
}

/// Turn a client failure into a domain error. A 404 always means the lookup
/// target is missing; anything else stays a GitHub API error.
///
/// octocrab only keeps the status for error responses with a JSON body. A
/// 404 with any other body (some proxies in front of GitHub Enterprise send
/// HTML) arrives as a decode error and is reported as a service error.
fn translate(err: octocrab::Error, kind: ResourceKind, id: impl FnOnce() -> String) -> GithubToolError {
    match &err {
        octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404 => {
            GithubToolError::not_found(kind, id())
        }
        _ => GithubToolError::GitHub(err),
    }
}

impl GithubToolService {
    /// Build a service against api.github.com with default settings.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::from_config(&ServiceConfig::new(token))
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let token = config
            .token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| GithubToolError::Configuration("GitHub token is required".to_string()))?;

        let mut builder = OctocrabBuilder::new()
            .personal_token(token.clone())
            .add_retry_config(RetryConfig::None);
        if let Some(ref api_url) = config.api_url {
            builder = builder.base_uri(api_url.as_str()).map_err(|e| {
                GithubToolError::Configuration(format!("Invalid GitHub API URL '{}': {}", api_url, e))
            })?;
        }
        let github = builder.build().map_err(|e| {
            GithubToolError::Configuration(format!("Failed to create GitHub client: {}", e))
        })?;

        Ok(Self {
            token,
            github: Arc::new(github),
            per_page: config.per_page(),
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Page size used by list operations; longer result sets are truncated.
    pub fn per_page(&self) -> u8 {
        self.per_page
    }

    pub async fn list_issues(&self, request: &ListIssuesRequest) -> Result<ListIssuesResponse> {
        request.validate()?;
        let repo = &request.repo;
        tracing::debug!(repo = %repo, state = %request.state, "Listing issues");

        let query = IssueListQuery {
            state: request.state.as_str(),
            labels: request.labels.as_ref().map(|labels| labels.join(",")),
            assignee: request.assignee.as_deref(),
            per_page: self.per_page,
        };
        let issues: Vec<WireIssue> = self
            .github
            .get(github::issues_route(repo), Some(&query))
            .await
            .map_err(|e| translate(e, ResourceKind::Repository, || repo.to_string()))?;

        Ok(ListIssuesResponse::new(
            issues.into_iter().map(IssueData::from).collect(),
        ))
    }

    pub async fn create_issue(&self, request: &CreateIssueRequest) -> Result<CreateIssueResponse> {
        request.validate()?;
        let repo = &request.repo;
        tracing::debug!(repo = %repo, title = %request.title, "Creating issue");

        let body = NewIssue {
            title: &request.title,
            body: &request.body,
            labels: request.labels.as_deref(),
            assignees: request.assignees.as_deref(),
        };
        let issue: WireIssue = self
            .github
            .post(github::issues_route(repo), Some(&body))
            .await
            .map_err(|e| translate(e, ResourceKind::Repository, || repo.to_string()))?;

        tracing::info!(repo = %repo, number = issue.number, "Created issue");
        Ok(CreateIssueResponse {
            issue: issue.into(),
        })
    }

    pub async fn get_issue(&self, request: &GetIssueRequest) -> Result<GetIssueResponse> {
        request.validate()?;
        tracing::debug!(repo = %request.repo, number = request.issue_number, "Fetching issue");

        let issue = self.fetch_issue(&request.repo, request.issue_number).await?;
        Ok(GetIssueResponse { issue })
    }

    /// Apply only the fields present in the request. An update naming no
    /// field re-reads the issue instead of writing.
    pub async fn update_issue(&self, request: &UpdateIssueRequest) -> Result<UpdateIssueResponse> {
        request.validate()?;
        let repo = &request.repo;
        let number = request.issue_number;

        if request.is_noop() {
            tracing::debug!(repo = %repo, number, "Update names no fields, re-reading issue");
            let issue = self.fetch_issue(repo, number).await?;
            return Ok(UpdateIssueResponse { issue });
        }

        tracing::debug!(repo = %repo, number, "Updating issue");
        let patch = IssuePatch {
            title: request.title.as_deref(),
            body: request.body.as_deref(),
            state: request.state,
        };
        let issue: WireIssue = self
            .github
            .patch(github::issue_route(repo, number), Some(&patch))
            .await
            .map_err(|e| translate(e, ResourceKind::Issue, || format!("{}#{}", repo, number)))?;

        Ok(UpdateIssueResponse {
            issue: issue.into(),
        })
    }

    pub async fn list_prs(&self, request: &ListPRsRequest) -> Result<ListPRsResponse> {
        request.validate()?;
        let repo = &request.repo;
        tracing::debug!(repo = %repo, state = %request.state, "Listing pull requests");

        let query = PullListQuery {
            state: request.state.as_str(),
            per_page: self.per_page,
        };
        let pulls: Vec<WirePull> = self
            .github
            .get(github::pulls_route(repo), Some(&query))
            .await
            .map_err(|e| translate(e, ResourceKind::Repository, || repo.to_string()))?;

        Ok(ListPRsResponse::new(
            pulls.into_iter().map(PRData::from).collect(),
        ))
    }

    pub async fn get_pr(&self, request: &GetPRRequest) -> Result<GetPRResponse> {
        request.validate()?;
        let repo = &request.repo;
        let number = request.pr_number;
        tracing::debug!(repo = %repo, number, "Fetching pull request");

        let pull: WirePull = self
            .github
            .get(github::pull_route(repo, number), None::<&()>)
            .await
            .map_err(|e| {
                translate(e, ResourceKind::PullRequest, || format!("{}#{}", repo, number))
            })?;

        Ok(GetPRResponse {
            pull_request: pull.into(),
        })
    }

    pub async fn get_file_contents(
        &self,
        request: &GetFileContentsRequest,
    ) -> Result<GetFileContentsResponse> {
        request.validate()?;
        let repo = &request.repo;
        tracing::debug!(repo = %repo, path = %request.path, git_ref = %request.git_ref, "Fetching file contents");

        let contents = self
            .fetch_contents(repo, &request.path, &request.git_ref)
            .await?;
        github::decode_file(contents)
    }

    pub async fn list_repo_files(
        &self,
        request: &ListRepoFilesRequest,
    ) -> Result<ListRepoFilesResponse> {
        request.validate()?;
        let repo = &request.repo;
        tracing::debug!(repo = %repo, path = %request.path, git_ref = %request.git_ref, "Listing repository files");

        let contents = self
            .fetch_contents(repo, &request.path, &request.git_ref)
            .await?;
        let files = contents
            .into_entries()
            .into_iter()
            .map(FileData::from)
            .collect();

        Ok(ListRepoFilesResponse::new(request.path.clone(), files))
    }

    async fn fetch_issue(&self, repo: &RepoRef, number: u64) -> Result<IssueData> {
        let issue: WireIssue = self
            .github
            .get(github::issue_route(repo, number), None::<&()>)
            .await
            .map_err(|e| translate(e, ResourceKind::Issue, || format!("{}#{}", repo, number)))?;
        Ok(issue.into())
    }

    async fn fetch_contents(&self, repo: &RepoRef, path: &str, git_ref: &str) -> Result<WireContents> {
        let query = RefQuery { git_ref };
        self.github
            .get(github::contents_route(repo, path), Some(&query))
            .await
            .map_err(|e| {
                translate(e, ResourceKind::Path, || {
                    format!("{}:{}@{}", repo, path.trim_matches('/'), git_ref)
                })
            })
    }
}
