/// Default number of results requested per list call.
pub const DEFAULT_MAX_RESULTS: u32 = 30;

/// GitHub caps `per_page` at 100.
const GITHUB_MAX_PER_PAGE: u32 = 100;

/// Settings used to build a [`GithubToolService`](crate::service::GithubToolService).
#[derive(Clone, Default)]
pub struct ServiceConfig {
    pub token: Option<String>,
    /// Base URL of the REST API, for GitHub Enterprise or test servers.
    pub api_url: Option<String>,
    pub max_results: Option<u32>,
}

impl ServiceConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::default()
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// Cap per_page to 100 (GitHub API maximum) and safely cast to u8.
    pub fn per_page(&self) -> u8 {
        self.max_results
            .unwrap_or(DEFAULT_MAX_RESULTS)
            .clamp(1, GITHUB_MAX_PER_PAGE) as u8
    }
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .field("max_results", &self.max_results)
            .finish()
    }
}

/// Resolve a token: explicit value > named environment variable > GITHUB_TOKEN.
///
/// `lookup` abstracts the environment so the precedence can be tested.
pub fn resolve_token<F>(explicit: Option<String>, token_env: Option<&str>, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(t) = explicit {
        return Some(t);
    }
    let env_name = token_env.unwrap_or("GITHUB_TOKEN");
    match lookup(env_name) {
        Some(t) if !t.is_empty() => {
            tracing::info!(env = env_name, "Read GitHub token from environment variable");
            Some(t)
        }
        _ => None,
    }
}
