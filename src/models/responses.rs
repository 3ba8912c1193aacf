//! Tool responses. List responses only expose a constructor taking the
//! entity sequence, so `total_count` always matches it.

use serde::Serialize;

use super::entities::{FileData, IssueData, PRData};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListIssuesResponse {
    issues: Vec<IssueData>,
    total_count: usize,
}

impl ListIssuesResponse {
    pub fn new(issues: Vec<IssueData>) -> Self {
        let total_count = issues.len();
        Self {
            issues,
            total_count,
        }
    }

    pub fn issues(&self) -> &[IssueData] {
        &self.issues
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateIssueResponse {
    pub issue: IssueData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GetIssueResponse {
    pub issue: IssueData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateIssueResponse {
    pub issue: IssueData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListPRsResponse {
    pull_requests: Vec<PRData>,
    total_count: usize,
}

impl ListPRsResponse {
    pub fn new(pull_requests: Vec<PRData>) -> Self {
        let total_count = pull_requests.len();
        Self {
            pull_requests,
            total_count,
        }
    }

    pub fn pull_requests(&self) -> &[PRData] {
        &self.pull_requests
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GetPRResponse {
    pub pull_request: PRData,
}

/// Decoded text of a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetFileContentsResponse {
    pub path: String,
    pub content: String,
    pub size: u64,
    pub sha: Option<String>,
    pub encoding: String,
}

impl GetFileContentsResponse {
    pub const ENCODING: &'static str = "utf-8";

    pub fn new(path: String, content: String, size: u64, sha: Option<String>) -> Self {
        Self {
            path,
            content,
            size,
            sha,
            encoding: Self::ENCODING.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListRepoFilesResponse {
    files: Vec<FileData>,
    path: String,
    total_count: usize,
}

impl ListRepoFilesResponse {
    pub fn new(path: impl Into<String>, files: Vec<FileData>) -> Self {
        let total_count = files.len();
        Self {
            files,
            path: path.into(),
            total_count,
        }
    }

    pub fn files(&self) -> &[FileData] {
        &self.files
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FileType, IssueState};
    use chrono::Utc;

    fn issue(number: u64) -> IssueData {
        IssueData {
            number,
            title: format!("Test Issue {}", number),
            state: IssueState::Open,
            url: format!("https://github.com/owner/repo/issues/{}", number),
            created_at: Utc::now(),
            updated_at: None,
            body: None,
            labels: vec!["bug".into()],
            assignees: vec![],
            author: None,
        }
    }

    #[test]
    fn test_list_issues_response_counts_entities() {
        let response = ListIssuesResponse::new(vec![issue(1), issue(2), issue(3)]);
        assert_eq!(response.total_count(), 3);
        assert_eq!(response.issues()[0].number, 1);

        let empty = ListIssuesResponse::new(vec![]);
        assert_eq!(empty.total_count(), 0);
        assert!(empty.issues().is_empty());
    }

    #[test]
    fn test_list_issues_response_serializes_count() {
        let value = serde_json::to_value(ListIssuesResponse::new(vec![issue(1)])).unwrap();
        assert_eq!(value["total_count"], 1);
        assert_eq!(value["issues"][0]["title"], "Test Issue 1");
        assert_eq!(value["issues"][0]["state"], "open");
    }

    #[test]
    fn test_list_repo_files_response() {
        let response = ListRepoFilesResponse::new(
            "",
            vec![
                FileData {
                    name: "README.md".into(),
                    path: "README.md".into(),
                    file_type: FileType::File,
                    size: 1024,
                    sha: None,
                },
                FileData {
                    name: "src".into(),
                    path: "src".into(),
                    file_type: FileType::Dir,
                    size: 0,
                    sha: None,
                },
            ],
        );
        assert_eq!(response.total_count(), 2);
        assert_eq!(response.path(), "");
        assert_eq!(response.files()[1].file_type, FileType::Dir);
    }

    #[test]
    fn test_file_contents_response_encoding() {
        let response = GetFileContentsResponse::new(
            "README.md".into(),
            "# Test Repository\n\nThis is a test.".into(),
            35,
            None,
        );
        assert_eq!(response.encoding, "utf-8");
        assert!(response.content.contains("Test Repository"));
    }
}
