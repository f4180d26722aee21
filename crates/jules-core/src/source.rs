//! Sources: the repositories a session can be created against.

use serde::{Deserialize, Serialize};

/// A selectable origin for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    /// Resource name, e.g. `sources/github/owner/repo`.
    pub name: String,
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_repo: Option<GithubRepo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubRepo {
    pub owner: String,
    pub repo: String,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<GithubBranch>,
    #[serde(default)]
    pub branches: Vec<GithubBranch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubBranch {
    pub display_name: String,
}

impl Source {
    /// Creates a source that only carries its resource name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: String::new(),
            github_repo: None,
        }
    }

    /// Human-readable label: `owner/repo` for GitHub sources, else the resource name.
    pub fn display_name(&self) -> String {
        match &self.github_repo {
            Some(repo) => format!("{}/{}", repo.owner, repo.repo),
            None => self.name.clone(),
        }
    }

    /// Browsable URL for the source.
    pub fn display_url(&self) -> String {
        match &self.github_repo {
            Some(repo) => format!("https://github.com/{}/{}", repo.owner, repo.repo),
            None => self.name.clone(),
        }
    }

    /// Default starting branch, if the server reported one.
    pub fn default_branch(&self) -> Option<&str> {
        self.github_repo
            .as_ref()
            .and_then(|repo| repo.default_branch.as_ref())
            .map(|branch| branch.display_name.as_str())
    }

    /// Builds the context used when creating a session against this source.
    pub fn to_context(&self) -> SourceContext {
        SourceContext {
            source: self.name.clone(),
            github_repo_context: self.default_branch().map(|branch| GithubRepoContext {
                starting_branch: branch.to_string(),
            }),
        }
    }
}

/// Variant-specific reference to a source, sent with `createSession`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceContext {
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_repo_context: Option<GithubRepoContext>,
}

impl SourceContext {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            github_repo_context: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubRepoContext {
    pub starting_branch: String,
}

/// One page of `listSources`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSourcesResponse {
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

impl ListSourcesResponse {
    /// The continuation token, treating an empty string as "no more pages".
    pub fn continuation(&self) -> Option<&str> {
        self.next_page_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }
}
