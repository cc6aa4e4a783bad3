use serde::{Deserialize, Deserializer, Serialize};

/// Standard GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphqlError {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PageInfo {
    #[serde(rename = "endCursor")]
    pub end_cursor: Option<String>,
    #[serde(rename = "hasNextPage")]
    pub has_next_page: bool,
}

pub const REF_TIMESTAMP_QUERY: &str = r#"
query GetRefTimestamp($owner: String!, $repo: String!, $reference: String!) {
  repository(owner: $owner, name: $repo) {
    object(expression: $reference) {
      __typename
      ... on Commit {
        oid
        committedDate
      }
      ... on Tag {
        target {
          ... on Commit {
            oid
            committedDate
          }
        }
      }
    }
  }
}"#;

#[derive(Debug, Serialize)]
pub struct RefTimestampVariables {
    pub owner: String,
    pub repo: String,
    pub reference: String,
}

#[derive(Debug, Deserialize)]
pub struct RefTarget {
    pub oid: Option<String>,
    #[serde(rename = "committedDate")]
    pub committed_date: Option<String>,
}

/// A resolved reference is either a commit or an annotated tag pointing at
/// one. Anything else comes back without a committed date.
#[derive(Debug, Deserialize)]
pub struct RefObject {
    pub oid: Option<String>,
    #[serde(rename = "committedDate")]
    pub committed_date: Option<String>,
    pub target: Option<RefTarget>,
}

impl RefObject {
    pub fn commit(&self) -> Option<(&str, &str)> {
        if let (Some(oid), Some(date)) = (&self.oid, &self.committed_date) {
            return Some((oid.as_str(), date.as_str()));
        }

        self.target.as_ref().and_then(|t| {
            match (&t.oid, &t.committed_date) {
                (Some(oid), Some(date)) => Some((oid.as_str(), date.as_str())),
                _ => None,
            }
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RefTimestampRepository {
    pub object: Option<RefObject>,
}

#[derive(Debug, Deserialize)]
pub struct RefTimestampData {
    pub repository: Option<RefTimestampRepository>,
}

pub const HISTORY_QUERY: &str = r#"
query GetHistory(
    $owner: String!
    $repo: String!
    $branch: String!
    $since: GitTimestamp!
    $pageSize: Int!
    $cursor: String
) {
  repository(owner: $owner, name: $repo) {
    nameWithOwner
    object(expression: $branch) {
      ... on Commit {
        history(first: $pageSize, after: $cursor, since: $since) {
          pageInfo {
            endCursor
            hasNextPage
          }
          nodes {
            oid
            messageHeadline
            committedDate
            authors(first: 100) {
              nodes {
                user {
                  login
                }
                name
                email
              }
            }
            associatedPullRequests(first: 10) {
              nodes {
                number
                title
                labels(first: 10) {
                  nodes {
                    name
                  }
                }
              }
            }
          }
        }
      }
    }
  }
}"#;

#[derive(Debug, Serialize)]
pub struct HistoryVariables {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub since: String,
    #[serde(rename = "pageSize")]
    pub page_size: u8,
    // omitted on the first request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// GraphQL connections wrap their items in `nodes`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Connection<T> {
    #[serde(
        default = "Vec::new",
        deserialize_with = "null_as_default",
        bound(deserialize = "T: Deserialize<'de>")
    )]
    pub nodes: Vec<T>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { nodes: vec![] }
    }
}

// GitHub returns `null` for connections it cannot resolve
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthorUser {
    pub login: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthorNode {
    pub user: Option<AuthorUser>,
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LabelNode {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PullRequestNode {
    pub number: u64,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: Connection<LabelNode>,
}

/// One raw commit of the branch history.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommitNode {
    pub oid: String,
    #[serde(rename = "messageHeadline")]
    pub message_headline: String,
    #[serde(rename = "committedDate")]
    pub committed_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub authors: Connection<AuthorNode>,
    #[serde(
        rename = "associatedPullRequests",
        default,
        deserialize_with = "null_as_default"
    )]
    pub associated_pull_requests: Connection<PullRequestNode>,
}

#[derive(Debug, Deserialize)]
pub struct History {
    #[serde(rename = "pageInfo")]
    pub page_info: PageInfo,
    pub nodes: Vec<CommitNode>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryObject {
    pub history: Option<History>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryRepository {
    #[serde(rename = "nameWithOwner")]
    pub name_with_owner: String,
    pub object: Option<HistoryObject>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryData {
    pub repository: Option<HistoryRepository>,
}
