use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mcp_github_tools::config::{self, ServiceConfig, DEFAULT_MAX_RESULTS};
use mcp_github_tools::models::ToolCallRequest;
use mcp_github_tools::server::McpGithubToolsServer;
use mcp_github_tools::service::GithubToolService;
use mcp_github_tools::tools;
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::EnvFilter;

/// Typed GitHub tools for issues, pull requests and repository files
#[derive(Parser)]
#[command(name = "mcp-github-tools", version, about)]
struct Cli {
    /// GitHub personal access token.
    /// Can also be set via GITHUB_TOKEN environment variable.
    #[arg(long, global = true)]
    token: Option<String>,

    /// Read GitHub token from an environment variable.
    /// Default: GITHUB_TOKEN
    #[arg(long = "token-env", global = true)]
    token_env: Option<String>,

    /// GitHub REST API base URL (default: GITHUB_API_URL or https://api.github.com)
    #[arg(long = "api-url", global = true)]
    api_url: Option<String>,

    /// Maximum results per list call, capped at 100
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_RESULTS)]
    max_results: u32,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the tools over MCP on stdio (default)
    Serve,
    /// Print the tool catalog as JSON
    Tools,
    /// Invoke one tool and print the JSON envelope
    Call {
        /// Tool name, e.g. list_issues
        tool: String,
        /// Tool parameters as a JSON object
        #[arg(long, default_value = "{}")]
        params: String,
    },
}

fn service_config(cli: &Cli) -> ServiceConfig {
    let token = config::resolve_token(cli.token.clone(), cli.token_env.as_deref(), |name| {
        std::env::var(name).ok()
    });
    if token.is_none() {
        tracing::warn!("No GitHub token provided");
    }
    let api_url = cli
        .api_url
        .clone()
        .or_else(|| std::env::var("GITHUB_API_URL").ok().filter(|u| !u.is_empty()));

    ServiceConfig {
        token,
        api_url,
        max_results: Some(cli.max_results),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Command::Tools) => {
            println!("{}", serde_json::to_string_pretty(&tools::definitions())?);
        }
        Some(Command::Call { ref tool, ref params }) => {
            let parameters = serde_json::from_str(params).context("--params must be a JSON object")?;
            let service = GithubToolService::from_config(&service_config(&cli))?;
            let response = service
                .call_tool(ToolCallRequest::new(tool.clone(), parameters))
                .await;
            println!("{}", serde_json::to_string_pretty(&response)?);
            if !response.success {
                std::process::exit(1);
            }
        }
        Some(Command::Serve) | None => {
            let config = service_config(&cli);
            let service = GithubToolService::from_config(&config)?;

            tracing::info!(
                api_url = config.api_url.as_deref().unwrap_or("default"),
                per_page = service.per_page(),
                "Starting mcp-github-tools server"
            );

            let server = McpGithubToolsServer::new(service);
            let running = server.serve(stdio()).await?;
            running.waiting().await?;
        }
    }

    Ok(())
}
