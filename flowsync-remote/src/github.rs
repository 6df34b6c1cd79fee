//! GitHub git-data API transport.
//!
//! Uses a blocking `ureq` agent; each request runs on tokio's blocking pool so
//! the fetcher's await chain never blocks the runtime thread.

use std::time::Duration;

use serde::de::DeserializeOwned;

use flowsync_core::{CommitSha, Config, RepoId, TreeSha};

use crate::error::TransportError;
use crate::transport::{CommitObject, TreeListing, TreeTransport};

const ACCEPT: &str = "application/vnd.github+json";

/// [`TreeTransport`] backed by `GET /repos/{repo}/git/{commits,trees}/{sha}`.
#[derive(Clone)]
pub struct GithubTransport {
    agent: ureq::Agent,
    api_base: String,
    token: Option<String>,
}

impl GithubTransport {
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build();
        Self {
            agent,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    pub fn commit_url(&self, repo: &RepoId, sha: &CommitSha) -> String {
        format!("{}/repos/{repo}/git/commits/{sha}", self.api_base)
    }

    pub fn tree_url(&self, repo: &RepoId, sha: &TreeSha) -> String {
        format!("{}/repos/{repo}/git/trees/{sha}", self.api_base)
    }

    async fn get<T>(&self, url: String) -> Result<T, TransportError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let agent = self.agent.clone();
        let token = self.token.clone();
        tokio::task::spawn_blocking(move || get_json(&agent, &url, token.as_deref()))
            .await
            .map_err(|e| TransportError::Join(e.to_string()))?
    }
}

impl TreeTransport for GithubTransport {
    async fn get_commit(
        &self,
        repo: &RepoId,
        sha: &CommitSha,
    ) -> Result<Option<CommitObject>, TransportError> {
        match self.get(self.commit_url(repo, sha)).await {
            Ok(commit) => Ok(Some(commit)),
            // 422 is returned for malformed or unknown SHAs.
            Err(TransportError::Status { status: 404 | 422, .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn get_tree(&self, repo: &RepoId, sha: &TreeSha) -> Result<TreeListing, TransportError> {
        let listing: TreeListing = self.get(self.tree_url(repo, sha)).await?;
        if listing.truncated {
            tracing::warn!(%repo, tree = %sha, "tree listing truncated by host");
        }
        Ok(listing)
    }
}

fn get_json<T: DeserializeOwned>(
    agent: &ureq::Agent,
    url: &str,
    token: Option<&str>,
) -> Result<T, TransportError> {
    let mut request = agent.get(url).set("Accept", ACCEPT);
    if let Some(token) = token {
        request = request.set("Authorization", &format!("token {token}"));
    }
    tracing::debug!(url, "GET");
    let response = request.call().map_err(|err| match err {
        ureq::Error::Status(status, _) => TransportError::Status {
            status,
            url: url.to_string(),
        },
        ureq::Error::Transport(transport) => TransportError::Network {
            url: url.to_string(),
            message: transport.to_string(),
        },
    })?;
    response.into_json::<T>().map_err(|e| TransportError::Decode {
        url: url.to_string(),
        source: e,
    })
}
