//! REST payload shapes read from the GitHub API and their mapping into
//! the domain entities. Only the fields the tools expose are declared.

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GithubToolError, Result};
use crate::models::{
    FileData, FileType, GetFileContentsResponse, IssueData, IssueState, PRData, RepoRef,
};

#[derive(Debug, Deserialize)]
pub(crate) struct WireUser {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireLabel {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireIssue {
    pub number: u64,
    pub title: String,
    pub state: IssueState,
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub labels: Vec<WireLabel>,
    #[serde(default)]
    pub assignees: Vec<WireUser>,
    #[serde(default)]
    pub user: Option<WireUser>,
}

impl From<WireIssue> for IssueData {
    fn from(wire: WireIssue) -> Self {
        IssueData {
            number: wire.number,
            title: wire.title,
            state: wire.state,
            url: wire.html_url,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
            body: wire.body,
            labels: wire.labels.into_iter().map(|l| l.name).collect(),
            assignees: wire.assignees.into_iter().map(|u| u.login).collect(),
            author: wire.user.map(|u| u.login),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireBranchRef {
    #[serde(rename = "ref")]
    pub ref_field: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WirePull {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    pub state: IssueState,
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    pub head: WireBranchRef,
    pub base: WireBranchRef,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub user: Option<WireUser>,
    #[serde(default)]
    pub mergeable: Option<bool>,
    #[serde(default)]
    pub merged: Option<bool>,
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
}

impl From<WirePull> for PRData {
    fn from(wire: WirePull) -> Self {
        // The list endpoint omits `merged`; `merged_at` is always present.
        let merged = wire.merged.unwrap_or(wire.merged_at.is_some());
        PRData {
            number: wire.number,
            title: wire.title,
            state: wire.state,
            url: wire.html_url,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
            head_ref: wire.head.ref_field,
            base_ref: wire.base.ref_field,
            body: wire.body,
            author: wire.user.map(|u| u.login),
            mergeable: wire.mergeable,
            merged,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireContentEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

impl WireContentEntry {
    fn is_dir(&self) -> bool {
        self.kind == "dir"
    }
}

impl From<WireContentEntry> for FileData {
    fn from(wire: WireContentEntry) -> Self {
        let file_type = if wire.is_dir() {
            FileType::Dir
        } else {
            FileType::File
        };
        FileData {
            name: wire.name,
            path: wire.path,
            file_type,
            size: wire.size,
            sha: wire.sha,
        }
    }
}

/// The contents endpoint answers with an array for directories and a
/// single object for files.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum WireContents {
    Listing(Vec<WireContentEntry>),
    Single(Box<WireContentEntry>),
}

impl WireContents {
    pub fn into_entries(self) -> Vec<WireContentEntry> {
        match self {
            WireContents::Listing(entries) => entries,
            WireContents::Single(entry) => vec![*entry],
        }
    }
}

/// Decode a file entry into UTF-8 text.
pub(crate) fn decode_file(contents: WireContents) -> Result<GetFileContentsResponse> {
    let entry = match contents {
        WireContents::Single(entry) => *entry,
        WireContents::Listing(_) => {
            return Err(GithubToolError::Service(
                "path is a directory; use list_repo_files".to_string(),
            ))
        }
    };
    if entry.is_dir() {
        return Err(GithubToolError::Service(format!(
            "{} is a directory; use list_repo_files",
            entry.path
        )));
    }
    let raw = match (entry.content.as_deref(), entry.encoding.as_deref()) {
        (Some(content), Some("base64") | None) => content,
        (_, encoding) => {
            return Err(GithubToolError::Service(format!(
                "{} has no inline content (encoding: {})",
                entry.path,
                encoding.unwrap_or("none")
            )))
        }
    };

    // GitHub returns base64 with embedded newlines
    let cleaned: String = raw.chars().filter(|ch| !ch.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(cleaned.as_bytes())
        .map_err(|e| {
            GithubToolError::Service(format!("{}: invalid base64 content: {}", entry.path, e))
        })?;
    let content = String::from_utf8(bytes).map_err(|e| {
        GithubToolError::Service(format!("{} is not valid UTF-8 text: {}", entry.path, e))
    })?;

    Ok(GetFileContentsResponse::new(
        entry.path,
        content,
        entry.size,
        entry.sha,
    ))
}

// -- Request bodies and query strings --

#[derive(Debug, Serialize)]
pub(crate) struct IssueListQuery<'a> {
    pub state: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<&'a str>,
    pub per_page: u8,
}

#[derive(Debug, Serialize)]
pub(crate) struct PullListQuery<'a> {
    pub state: &'a str,
    pub per_page: u8,
}

#[derive(Debug, Serialize)]
pub(crate) struct RefQuery<'a> {
    #[serde(rename = "ref")]
    pub git_ref: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewIssue<'a> {
    pub title: &'a str,
    pub body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<&'a [String]>,
}

/// Only the supplied fields are sent, leaving the rest of the issue alone.
#[derive(Debug, Serialize)]
pub(crate) struct IssuePatch<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<IssueState>,
}

// -- Routes --

pub(crate) fn issues_route(repo: &RepoRef) -> String {
    format!("/repos/{}/issues", repo)
}

pub(crate) fn issue_route(repo: &RepoRef, number: u64) -> String {
    format!("/repos/{}/issues/{}", repo, number)
}

pub(crate) fn pulls_route(repo: &RepoRef) -> String {
    format!("/repos/{}/pulls", repo)
}

pub(crate) fn pull_route(repo: &RepoRef, number: u64) -> String {
    format!("/repos/{}/pulls/{}", repo, number)
}

/// Each path segment is percent-encoded; the separators are kept.
pub(crate) fn contents_route(repo: &RepoRef, path: &str) -> String {
    let path = path.trim_matches('/');
    if path.is_empty() {
        return format!("/repos/{}/contents", repo);
    }
    let encoded = path
        .split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/");
    format!("/repos/{}/contents/{}", repo, encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wire_issue(value: serde_json::Value) -> WireIssue {
        serde_json::from_value(value).unwrap()
    }

    fn encode(text: &[u8]) -> String {
        base64::engine::general_purpose::STANDARD.encode(text)
    }

    #[test]
    fn test_issue_mapping_preserves_label_and_assignee_order() {
        let issue: IssueData = wire_issue(json!({
            "number": 48,
            "title": "Test",
            "state": "open",
            "html_url": "https://github.com/owner/repo/issues/48",
            "created_at": "2025-11-13T00:00:00Z",
            "updated_at": "2025-11-13T00:00:00Z",
            "body": "Body",
            "labels": [{"name": "urgent", "color": "f00"}, {"name": "bug"}],
            "assignees": [{"login": "zed"}, {"login": "alice"}],
            "user": {"login": "testuser", "id": 7},
        }))
        .into();
        assert_eq!(issue.labels, vec!["urgent", "bug"]);
        assert_eq!(issue.assignees, vec!["zed", "alice"]);
        assert_eq!(issue.author.as_deref(), Some("testuser"));
        assert_eq!(issue.url, "https://github.com/owner/repo/issues/48");
    }

    #[test]
    fn test_issue_mapping_missing_updated_at_stays_absent() {
        let issue: IssueData = wire_issue(json!({
            "number": 47,
            "title": "Test Issue",
            "state": "open",
            "html_url": "https://github.com/owner/repo/issues/47",
            "created_at": "2025-11-13T00:00:00Z",
            "updated_at": null,
            "user": null,
        }))
        .into();
        assert!(issue.updated_at.is_none());
        assert!(issue.author.is_none());
        assert!(issue.body.is_none());
    }

    #[test]
    fn test_pull_mapping_merged_falls_back_to_merged_at() {
        let base = json!({
            "number": 10,
            "title": "Test PR",
            "state": "closed",
            "html_url": "https://github.com/owner/repo/pull/10",
            "created_at": "2025-11-13T00:00:00Z",
            "head": {"ref": "feature-branch", "sha": "abc"},
            "base": {"ref": "main"},
            "merged_at": "2025-11-14T00:00:00Z",
        });
        let pr: PRData = serde_json::from_value::<WirePull>(base).unwrap().into();
        assert!(pr.merged);
        assert_eq!(pr.head_ref, "feature-branch");
        assert_eq!(pr.base_ref, "main");
        assert!(pr.mergeable.is_none());
    }

    #[test]
    fn test_pull_mapping_explicit_merged_wins() {
        let pr: PRData = serde_json::from_value::<WirePull>(json!({
            "number": 10,
            "title": "Test PR",
            "state": "open",
            "html_url": "u",
            "created_at": "2025-11-13T00:00:00Z",
            "head": {"ref": "feature"},
            "base": {"ref": "main"},
            "mergeable": true,
            "merged": false,
        }))
        .unwrap()
        .into();
        assert!(!pr.merged);
        assert_eq!(pr.mergeable, Some(true));
    }

    #[test]
    fn test_contents_listing_and_single() {
        let listing: WireContents = serde_json::from_value(json!([
            {"name": "README.md", "path": "README.md", "type": "file", "size": 1024, "sha": "abc123"},
            {"name": "src", "path": "src", "type": "dir", "size": 0, "sha": "def456"},
            {"name": "link", "path": "link", "type": "symlink", "size": 4},
        ]))
        .unwrap();
        let files: Vec<FileData> = listing.into_entries().into_iter().map(Into::into).collect();
        assert_eq!(files.len(), 3);
        assert_eq!(files[0].file_type, FileType::File);
        assert_eq!(files[1].file_type, FileType::Dir);
        assert_eq!(files[2].file_type, FileType::File);
        assert!(files[2].sha.is_none());

        let single: WireContents = serde_json::from_value(json!(
            {"name": "a.txt", "path": "docs/a.txt", "type": "file", "size": 3}
        ))
        .unwrap();
        assert_eq!(single.into_entries().len(), 1);
    }

    #[test]
    fn test_decode_file_utf8() {
        let contents: WireContents = serde_json::from_value(json!({
            "name": "README.md",
            "path": "README.md",
            "type": "file",
            "size": 8,
            "sha": "abc123",
            "encoding": "base64",
            "content": format!("{}\n", encode(b"# Hello\n")),
        }))
        .unwrap();
        let response = decode_file(contents).unwrap();
        assert_eq!(response.content, "# Hello\n");
        assert_eq!(response.size, 8);
        assert_eq!(response.encoding, "utf-8");
        assert_eq!(response.sha.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_decode_file_rejects_binary() {
        let contents: WireContents = serde_json::from_value(json!({
            "name": "logo.png",
            "path": "logo.png",
            "type": "file",
            "size": 3,
            "encoding": "base64",
            "content": encode(&[0xff, 0xfe, 0x00]),
        }))
        .unwrap();
        let err = decode_file(contents).unwrap_err();
        assert_eq!(err.error_code(), "SERVICE_ERROR");
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn test_decode_file_rejects_directory_and_missing_content() {
        let listing: WireContents = serde_json::from_value(json!([])).unwrap();
        assert!(decode_file(listing).is_err());

        let large: WireContents = serde_json::from_value(json!({
            "name": "big.bin",
            "path": "big.bin",
            "type": "file",
            "size": 5_000_000,
            "encoding": "none",
            "content": "",
        }))
        .unwrap();
        let err = decode_file(large).unwrap_err();
        assert!(err.to_string().contains("no inline content"));
    }

    #[test]
    fn test_contents_route() {
        let repo = RepoRef::parse("owner/repo").unwrap();
        assert_eq!(contents_route(&repo, ""), "/repos/owner/repo/contents");
        assert_eq!(contents_route(&repo, "/src/"), "/repos/owner/repo/contents/src");
        assert_eq!(
            contents_route(&repo, "src/lib/utils.rs"),
            "/repos/owner/repo/contents/src/lib/utils.rs"
        );
    }

    #[test]
    fn test_contents_route_encodes_segments() {
        let repo = RepoRef::parse("owner/repo").unwrap();
        assert_eq!(
            contents_route(&repo, "docs/My File.md"),
            "/repos/owner/repo/contents/docs/My%20File.md"
        );
        assert_eq!(
            contents_route(&repo, "notes/100%?#.txt"),
            "/repos/owner/repo/contents/notes/100%25%3F%23.txt"
        );
        assert_eq!(
            contents_route(&repo, "docs/caf\u{e9}.md"),
            "/repos/owner/repo/contents/docs/caf%C3%A9.md"
        );
    }

    #[test]
    fn test_issue_patch_skips_unset_fields() {
        let patch = IssuePatch {
            title: Some("New Title"),
            body: None,
            state: None,
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"title": "New Title"}));
    }
}
