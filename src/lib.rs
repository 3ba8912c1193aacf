//! Typed GitHub repository tools: issues, pull requests and file contents.
//!
//! [`service::GithubToolService`] maps each tool onto one GitHub REST call and
//! translates failures into [`error::GithubToolError`]. The MCP server and
//! the CLI are thin adapters over the same service.

pub mod config;
pub mod error;
mod github;
pub mod models;
pub mod server;
pub mod service;
pub mod tools;
