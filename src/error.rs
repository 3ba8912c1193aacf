use std::fmt;

use rmcp::model::ErrorData;

/// What a failed lookup was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Repository,
    Issue,
    PullRequest,
    Path,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceKind::Repository => "Repository",
            ResourceKind::Issue => "Issue",
            ResourceKind::PullRequest => "Pull request",
            ResourceKind::Path => "Path",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GithubToolError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: ResourceKind, id: String },

    #[error("GitHub API error: {0}")]
    GitHub(octocrab::Error),

    #[error("{0}")]
    Service(String),
}

pub type Result<T> = std::result::Result<T, GithubToolError>;

impl GithubToolError {
    pub fn validation(msg: impl Into<String>) -> Self {
        GithubToolError::Validation(msg.into())
    }

    pub fn not_found(kind: ResourceKind, id: impl Into<String>) -> Self {
        GithubToolError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Stable code used in `ToolCallResponse::error_code`.
    pub fn error_code(&self) -> &'static str {
        match self {
            GithubToolError::Configuration(_) => "CONFIGURATION_ERROR",
            GithubToolError::Validation(_) => "VALIDATION_ERROR",
            GithubToolError::NotFound { .. } => "NOT_FOUND",
            GithubToolError::GitHub(_) | GithubToolError::Service(_) => "SERVICE_ERROR",
        }
    }

    pub fn to_mcp_error(&self) -> ErrorData {
        match self {
            GithubToolError::Validation(_) | GithubToolError::NotFound { .. } => {
                ErrorData::invalid_params(self.to_string(), None)
            }
            GithubToolError::Configuration(_) => {
                ErrorData::invalid_params(self.to_string(), None)
            }
            GithubToolError::GitHub(_) | GithubToolError::Service(_) => {
                ErrorData::internal_error(self.to_string(), None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_target() {
        let err = GithubToolError::not_found(ResourceKind::Issue, "owner/repo#999");
        assert_eq!(err.to_string(), "Issue not found: owner/repo#999");
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            GithubToolError::Configuration("x".into()).error_code(),
            "CONFIGURATION_ERROR"
        );
        assert_eq!(GithubToolError::validation("x").error_code(), "VALIDATION_ERROR");
        assert_eq!(GithubToolError::Service("x".into()).error_code(), "SERVICE_ERROR");
    }

    #[test]
    fn test_pull_request_kind_display() {
        let err = GithubToolError::not_found(ResourceKind::PullRequest, "o/r#3");
        assert_eq!(err.to_string(), "Pull request not found: o/r#3");
    }
}
