//! GitHub GraphQL client for resolving release references and walking branch
//! history.
use async_trait::async_trait;
use futures_util::{Stream, TryStreamExt, stream};
use log::*;
use octocrab::Octocrab;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

pub mod graphql;

pub use graphql::{
    AuthorNode, AuthorUser, CommitNode, Connection, LabelNode, PageInfo,
    PullRequestNode,
};

use crate::{
    error::{ReleaseNotesError, Result},
    forge::{
        config::RemoteConfig,
        github::graphql::{
            GraphqlResponse, HISTORY_QUERY, HistoryData, HistoryVariables,
            REF_TIMESTAMP_QUERY, RefTimestampData, RefTimestampVariables,
        },
        traits::{GraphqlRequest, GraphqlTransport},
    },
};

/// One page of branch history as returned by the API.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPage {
    /// `owner/name` reported by the API. Only kept for the first page.
    pub repository: Option<String>,
    pub page_info: PageInfo,
    pub nodes: Vec<CommitNode>,
}

/// Position of the next history request.
#[derive(Debug, Clone)]
struct PageCursor {
    after: Option<String>,
    number: usize,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self {
            after: None,
            number: 1,
        }
    }
}

/// Production transport posting to the GraphQL endpoint through octocrab
/// with personal token (bearer) authentication.
pub struct OctocrabTransport {
    instance: Octocrab,
}

impl OctocrabTransport {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let instance = Octocrab::builder()
            .personal_token(config.token.clone())
            .base_uri(config.api_base_uri())?
            .build()?;

        Ok(Self { instance })
    }
}

#[async_trait]
impl GraphqlTransport for OctocrabTransport {
    async fn execute(&self, request: GraphqlRequest) -> Result<Value> {
        let response: Value = self.instance.graphql(&request).await?;
        Ok(response)
    }
}

/// GitHub query client. Every request is awaited before the next one is
/// issued.
pub struct Github {
    config: RemoteConfig,
    transport: Box<dyn GraphqlTransport>,
}

impl Github {
    /// Create GitHub client with personal access token authentication and API
    /// base URL configuration.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let transport = OctocrabTransport::new(&config)?;
        Ok(Self::with_transport(config, Box::new(transport)))
    }

    pub fn with_transport(
        config: RemoteConfig,
        transport: Box<dyn GraphqlTransport>,
    ) -> Self {
        Self { config, transport }
    }

    pub fn remote_config(&self) -> &RemoteConfig {
        &self.config
    }

    /// Returns the committed date of the commit `reference` (tag, branch or
    /// sha) points at. Annotated tags are peeled to their commit.
    pub async fn resolve_baseline_timestamp(
        &self,
        reference: &str,
    ) -> Result<String> {
        info!("resolving commit timestamp for reference: {reference}");

        let vars = RefTimestampVariables {
            owner: self.config.owner.clone(),
            repo: self.config.repo.clone(),
            reference: reference.to_string(),
        };

        let data: RefTimestampData =
            self.query(REF_TIMESTAMP_QUERY, vars).await?;

        let object = data
            .repository
            .ok_or_else(|| {
                ReleaseNotesError::not_found(format!(
                    "repository {}",
                    self.config.full_name()
                ))
            })?
            .object
            .ok_or_else(|| ReleaseNotesError::not_found(reference))?;

        let (oid, timestamp) = object.commit().ok_or_else(|| {
            ReleaseNotesError::not_found(format!(
                "{reference} does not point to a commit"
            ))
        })?;

        debug!("{reference} resolved to {oid} committed at {timestamp}");

        Ok(timestamp.to_string())
    }

    /// Lazily walks the configured branch's history since `since`, one page
    /// per request. The stream ends after the page reporting no further
    /// pages and yields an error (then ends) if any request fails.
    pub fn history_pages<'a>(
        &'a self,
        since: &'a str,
    ) -> impl Stream<Item = Result<HistoryPage>> + 'a {
        stream::try_unfold(Some(PageCursor::default()), move |cursor| {
            self.next_page(since, cursor)
        })
    }

    /// Fetches every history page since `since`. A failure on any page
    /// aborts the whole fetch.
    pub async fn fetch_history(&self, since: &str) -> Result<Vec<HistoryPage>> {
        let pages: Vec<HistoryPage> =
            self.history_pages(since).try_collect().await?;

        let total: usize = pages.iter().map(|p| p.nodes.len()).sum();
        info!("fetched {total} commits across {} pages", pages.len());

        Ok(pages)
    }

    async fn next_page(
        &self,
        since: &str,
        cursor: Option<PageCursor>,
    ) -> Result<Option<(HistoryPage, Option<PageCursor>)>> {
        let Some(cursor) = cursor else {
            return Ok(None);
        };

        let page = self.fetch_page(since, &cursor).await?;

        if !page.page_info.has_next_page {
            return Ok(Some((page, None)));
        }

        let after = page.page_info.end_cursor.clone().ok_or_else(|| {
            ReleaseNotesError::graph_api(format!(
                "history page {} reported more pages without an end cursor",
                cursor.number
            ))
        })?;

        let next = PageCursor {
            after: Some(after),
            number: cursor.number + 1,
        };

        Ok(Some((page, Some(next))))
    }

    async fn fetch_page(
        &self,
        since: &str,
        cursor: &PageCursor,
    ) -> Result<HistoryPage> {
        debug!(
            "requesting history page {} (after: {:?})",
            cursor.number, cursor.after
        );

        let vars = HistoryVariables {
            owner: self.config.owner.clone(),
            repo: self.config.repo.clone(),
            branch: self.config.branch.clone(),
            since: since.to_string(),
            page_size: self.config.page_size,
            cursor: cursor.after.clone(),
        };

        let data: HistoryData = self.query(HISTORY_QUERY, vars).await?;

        let repository = data.repository.ok_or_else(|| {
            ReleaseNotesError::not_found(format!(
                "repository {}",
                self.config.full_name()
            ))
        })?;

        let history = repository
            .object
            .and_then(|o| o.history)
            .ok_or_else(|| {
                ReleaseNotesError::not_found(self.config.branch.clone())
            })?;

        // only the first page's metadata is worth keeping
        let repository = if cursor.number == 1 {
            debug!("walking history of {}", repository.name_with_owner);
            Some(repository.name_with_owner)
        } else {
            None
        };

        debug!(
            "history page {} returned {} commits",
            cursor.number,
            history.nodes.len()
        );

        Ok(HistoryPage {
            repository,
            page_info: history.page_info,
            nodes: history.nodes,
        })
    }

    /// Sends one query and unwraps the response envelope. The first reported
    /// API error is surfaced; the rest are dropped.
    async fn query<V, T>(&self, query: &str, variables: V) -> Result<T>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let request = GraphqlRequest {
            query: query.to_string(),
            variables: serde_json::to_value(variables)?,
        };

        let raw = self.transport.execute(request).await?;
        let response: GraphqlResponse<Value> = serde_json::from_value(raw)?;

        if let Some(first) = response.errors.first() {
            if response.errors.len() > 1 {
                debug!(
                    "dropping {} additional api errors",
                    response.errors.len() - 1
                );
            }

            return Err(match first.kind.as_deref() {
                Some("NOT_FOUND") => {
                    ReleaseNotesError::not_found(first.message.clone())
                }
                _ => ReleaseNotesError::graph_api(first.message.clone()),
            });
        }

        let data = response.data.ok_or_else(|| {
            ReleaseNotesError::graph_api("response contained no data")
        })?;

        Ok(serde_json::from_value(data)?)
    }
}

#[cfg(test)]
#[path = "./github_tests.rs"]
mod tests;
