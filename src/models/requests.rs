use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::entities::IssueState;
use super::positive_number;
use crate::error::{GithubToolError, Result};

/// Git ref used when a request does not name one.
pub const DEFAULT_REF: &str = "main";

fn default_ref() -> String {
    DEFAULT_REF.to_string()
}

/// A typed tool request that can be decoded from loosely-typed parameters.
pub trait ToolRequest: DeserializeOwned {
    /// Check the constraints serde cannot express. Never touches the network.
    fn validate(&self) -> Result<()>;

    fn from_parameters(parameters: Map<String, Value>) -> Result<Self> {
        let request: Self = serde_json::from_value(Value::Object(parameters))
            .map_err(|e| GithubToolError::validation(e.to_string()))?;
        request.validate()?;
        Ok(request)
    }
}

/// Validate that a GitHub owner/repo name doesn't contain characters that
/// could be used for URL injection in API routes.
fn sanitize_github_name(name: &str, field: &str) -> Result<()> {
    if name.is_empty() {
        return Err(GithubToolError::validation(format!(
            "{} must not be empty",
            field
        )));
    }
    for ch in ['/', '?', '#', '%', '\0', ' ', '\n', '\t'] {
        if name.contains(ch) {
            return Err(GithubToolError::validation(format!(
                "{} contains invalid character '{}'",
                field,
                ch.escape_default()
            )));
        }
    }
    Ok(())
}

/// Validate a value for use in query params. Unlike `sanitize_github_name`,
/// this allows slashes (for branch names like `feature/foo`).
fn sanitize_url_value(value: &str, field: &str) -> Result<()> {
    if value.is_empty() {
        return Err(GithubToolError::validation(format!(
            "{} must not be empty",
            field
        )));
    }
    for ch in ['?', '#', '&', '\0', '\n', '\r', '\t'] {
        if value.contains(ch) {
            return Err(GithubToolError::validation(format!(
                "{} contains invalid character",
                field
            )));
        }
    }
    Ok(())
}

/// Validate a repository path. Segments are percent-encoded when the route
/// is built, so only control characters and relative segments are refused.
fn sanitize_repo_path(path: &str, field: &str) -> Result<()> {
    if path.is_empty() {
        return Err(GithubToolError::validation(format!(
            "{} must not be empty",
            field
        )));
    }
    if path.chars().any(char::is_control) {
        return Err(GithubToolError::validation(format!(
            "{} contains invalid character",
            field
        )));
    }
    if path.split('/').any(|segment| matches!(segment, "" | "." | "..")) {
        return Err(GithubToolError::validation(format!(
            "{} must not contain empty, '.' or '..' segments",
            field
        )));
    }
    Ok(())
}

fn require_positive(n: u64, field: &str) -> Result<()> {
    if n == 0 {
        return Err(GithubToolError::validation(format!(
            "{} must be a positive integer",
            field
        )));
    }
    Ok(())
}

/// A repository in `owner/name` form. Only constructible through parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct RepoRef {
    owner: String,
    name: String,
}

impl RepoRef {
    pub fn parse(value: &str) -> Result<Self> {
        let (owner, name) = value.split_once('/').ok_or_else(|| {
            GithubToolError::validation(format!(
                "repo must be in owner/name format, got '{}'",
                value
            ))
        })?;
        sanitize_github_name(owner, "repo owner")?;
        sanitize_github_name(name, "repo name")?;
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoRef {
    type Err = GithubToolError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RepoRef {
    type Error = GithubToolError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

/// State filter for list operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum StateFilter {
    #[default]
    Open,
    Closed,
    All,
}

impl StateFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateFilter::Open => "open",
            StateFilter::Closed => "closed",
            StateFilter::All => "all",
        }
    }
}

impl fmt::Display for StateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StateFilter {
    type Err = GithubToolError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "open" => Ok(StateFilter::Open),
            "closed" => Ok(StateFilter::Closed),
            "all" => Ok(StateFilter::All),
            other => Err(GithubToolError::validation(format!(
                "state must be one of open, closed, all; got '{}'",
                other
            ))),
        }
    }
}

// -- list_issues --

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct ListIssuesRequest {
    #[schemars(with = "String", description = "Repository in owner/name format")]
    pub repo: RepoRef,

    #[schemars(description = "Filter by state: open, closed, or all (default: open)")]
    #[serde(default)]
    pub state: StateFilter,

    #[schemars(description = "Only return issues carrying all of these labels")]
    #[serde(default)]
    pub labels: Option<Vec<String>>,

    #[schemars(description = "Only return issues assigned to this user")]
    #[serde(default)]
    pub assignee: Option<String>,
}

impl ListIssuesRequest {
    pub fn new(repo: &str) -> Result<Self> {
        Ok(Self {
            repo: RepoRef::parse(repo)?,
            state: StateFilter::default(),
            labels: None,
            assignee: None,
        })
    }

    pub fn with_state(mut self, state: StateFilter) -> Self {
        self.state = state;
        self
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }
}

impl ToolRequest for ListIssuesRequest {
    fn validate(&self) -> Result<()> {
        if let Some(labels) = &self.labels {
            for label in labels {
                sanitize_url_value(label, "label")?;
                // Labels are sent comma-joined in a single filter
                if label.contains(',') {
                    return Err(GithubToolError::validation(format!(
                        "label '{}' must not contain a comma",
                        label
                    )));
                }
            }
        }
        if let Some(assignee) = &self.assignee {
            sanitize_github_name(assignee, "assignee")?;
        }
        Ok(())
    }
}

// -- create_issue --

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct CreateIssueRequest {
    #[schemars(with = "String", description = "Repository in owner/name format")]
    pub repo: RepoRef,

    #[schemars(description = "Issue title")]
    pub title: String,

    #[schemars(description = "Issue body in markdown")]
    pub body: String,

    #[schemars(description = "Labels to apply")]
    #[serde(default)]
    pub labels: Option<Vec<String>>,

    #[schemars(description = "Users to assign")]
    #[serde(default)]
    pub assignees: Option<Vec<String>>,
}

impl CreateIssueRequest {
    pub fn new(repo: &str, title: impl Into<String>, body: impl Into<String>) -> Result<Self> {
        let request = Self {
            repo: RepoRef::parse(repo)?,
            title: title.into(),
            body: body.into(),
            labels: None,
            assignees: None,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_assignees<I, S>(mut self, assignees: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assignees = Some(assignees.into_iter().map(Into::into).collect());
        self
    }
}

impl ToolRequest for CreateIssueRequest {
    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(GithubToolError::validation("title must not be empty"));
        }
        Ok(())
    }
}

// -- get_issue --

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct GetIssueRequest {
    #[schemars(with = "String", description = "Repository in owner/name format")]
    pub repo: RepoRef,

    #[schemars(with = "u64", description = "Issue number")]
    #[serde(deserialize_with = "positive_number")]
    pub issue_number: u64,
}

impl GetIssueRequest {
    pub fn new(repo: &str, issue_number: u64) -> Result<Self> {
        let request = Self {
            repo: RepoRef::parse(repo)?,
            issue_number,
        };
        request.validate()?;
        Ok(request)
    }
}

impl ToolRequest for GetIssueRequest {
    fn validate(&self) -> Result<()> {
        require_positive(self.issue_number, "issue_number")
    }
}

// -- update_issue --

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct UpdateIssueRequest {
    #[schemars(with = "String", description = "Repository in owner/name format")]
    pub repo: RepoRef,

    #[schemars(with = "u64", description = "Issue number")]
    #[serde(deserialize_with = "positive_number")]
    pub issue_number: u64,

    #[schemars(description = "New title (unchanged when omitted)")]
    #[serde(default)]
    pub title: Option<String>,

    #[schemars(description = "New body (unchanged when omitted)")]
    #[serde(default)]
    pub body: Option<String>,

    #[schemars(description = "New state: open or closed (unchanged when omitted)")]
    #[serde(default)]
    pub state: Option<IssueState>,
}

impl UpdateIssueRequest {
    pub fn new(repo: &str, issue_number: u64) -> Result<Self> {
        let request = Self {
            repo: RepoRef::parse(repo)?,
            issue_number,
            title: None,
            body: None,
            state: None,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_state(mut self, state: IssueState) -> Self {
        self.state = Some(state);
        self
    }

    /// True when no field would be changed.
    pub fn is_noop(&self) -> bool {
        self.title.is_none() && self.body.is_none() && self.state.is_none()
    }
}

impl ToolRequest for UpdateIssueRequest {
    fn validate(&self) -> Result<()> {
        require_positive(self.issue_number, "issue_number")?;
        if matches!(&self.title, Some(title) if title.trim().is_empty()) {
            return Err(GithubToolError::validation("title must not be empty"));
        }
        Ok(())
    }
}

// -- list_prs --

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct ListPRsRequest {
    #[schemars(with = "String", description = "Repository in owner/name format")]
    pub repo: RepoRef,

    #[schemars(description = "Filter by state: open, closed, or all (default: open)")]
    #[serde(default)]
    pub state: StateFilter,
}

impl ListPRsRequest {
    pub fn new(repo: &str) -> Result<Self> {
        Ok(Self {
            repo: RepoRef::parse(repo)?,
            state: StateFilter::default(),
        })
    }

    pub fn with_state(mut self, state: StateFilter) -> Self {
        self.state = state;
        self
    }
}

impl ToolRequest for ListPRsRequest {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

// -- get_pr --

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct GetPRRequest {
    #[schemars(with = "String", description = "Repository in owner/name format")]
    pub repo: RepoRef,

    #[schemars(with = "u64", description = "Pull request number")]
    #[serde(deserialize_with = "positive_number")]
    pub pr_number: u64,
}

impl GetPRRequest {
    pub fn new(repo: &str, pr_number: u64) -> Result<Self> {
        let request = Self {
            repo: RepoRef::parse(repo)?,
            pr_number,
        };
        request.validate()?;
        Ok(request)
    }
}

impl ToolRequest for GetPRRequest {
    fn validate(&self) -> Result<()> {
        require_positive(self.pr_number, "pr_number")
    }
}

// -- get_file_contents --

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct GetFileContentsRequest {
    #[schemars(with = "String", description = "Repository in owner/name format")]
    pub repo: RepoRef,

    #[schemars(description = "File path within the repository")]
    pub path: String,

    #[schemars(description = "Git ref (branch, tag, or SHA). Defaults to main")]
    #[serde(rename = "ref", default = "default_ref")]
    pub git_ref: String,
}

impl GetFileContentsRequest {
    pub fn new(repo: &str, path: impl Into<String>) -> Result<Self> {
        let request = Self {
            repo: RepoRef::parse(repo)?,
            path: path.into(),
            git_ref: default_ref(),
        };
        request.validate()?;
        Ok(request)
    }

    pub fn with_ref(mut self, git_ref: impl Into<String>) -> Self {
        self.git_ref = git_ref.into();
        self
    }
}

impl ToolRequest for GetFileContentsRequest {
    fn validate(&self) -> Result<()> {
        sanitize_repo_path(self.path.trim_matches('/'), "path")?;
        sanitize_url_value(&self.git_ref, "ref")
    }
}

// -- list_repo_files --

#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct ListRepoFilesRequest {
    #[schemars(with = "String", description = "Repository in owner/name format")]
    pub repo: RepoRef,

    #[schemars(description = "Directory path within the repository (default: root)")]
    #[serde(default)]
    pub path: String,

    #[schemars(description = "Git ref (branch, tag, or SHA). Defaults to main")]
    #[serde(rename = "ref", default = "default_ref")]
    pub git_ref: String,
}

impl ListRepoFilesRequest {
    pub fn new(repo: &str) -> Result<Self> {
        Ok(Self {
            repo: RepoRef::parse(repo)?,
            path: String::new(),
            git_ref: default_ref(),
        })
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_ref(mut self, git_ref: impl Into<String>) -> Self {
        self.git_ref = git_ref.into();
        self
    }
}

impl ToolRequest for ListRepoFilesRequest {
    fn validate(&self) -> Result<()> {
        let path = self.path.trim_matches('/');
        if !path.is_empty() {
            sanitize_repo_path(path, "path")?;
        }
        sanitize_url_value(&self.git_ref, "ref")
    }
}
