//! Configuration for the GitHub GraphQL connection.
use secrecy::SecretString;

/// Default page size for paginated commit queries
pub const DEFAULT_PAGE_SIZE: u8 = 100;
/// Largest page GitHub accepts for connection queries
pub const MAX_PAGE_SIZE: u8 = 100;
/// Git expression resolving to the repository's default branch.
pub const DEFAULT_BRANCH: &str = "HEAD";
/// Repository used when neither the cli nor the config file names one.
pub const DEFAULT_REPO_URL: &str = "https://github.com/osquery/osquery";

/// Remote repository connection configuration used by the query client and
/// for building links in the rendered changelog.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Remote forge host (e.g., "github.com").
    pub host: String,
    /// Remote forge port for self-hosted instances.
    pub port: Option<u16>,
    /// URL scheme (http or https).
    pub scheme: String,
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Access token for authentication.
    pub token: SecretString,
    /// Branch expression whose history is walked.
    pub branch: String,
    /// Number of commits requested per history page.
    pub page_size: u8,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: "github.com".to_string(),
            port: None,
            scheme: "https".to_string(),
            owner: "".to_string(),
            repo: "".to_string(),
            token: SecretString::from("".to_string()),
            branch: DEFAULT_BRANCH.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl RemoteConfig {
    fn authority(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{port}", self.host),
            None => self.host.clone(),
        }
    }

    /// Web URL of the repository, e.g. https://github.com/osquery/osquery
    pub fn repo_url(&self) -> String {
        format!(
            "{}://{}/{}/{}",
            self.scheme,
            self.authority(),
            self.owner,
            self.repo
        )
    }

    /// Prefix shared by every pull request link of the repository.
    pub fn pull_url_base(&self) -> String {
        format!("{}/pull", self.repo_url())
    }

    /// Base URI of the API. The GraphQL endpoint lives at `<base>/graphql`.
    pub fn api_base_uri(&self) -> String {
        format!("{}://api.{}", self.scheme, self.authority())
    }

    /// Repository in `owner/name` form.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}
