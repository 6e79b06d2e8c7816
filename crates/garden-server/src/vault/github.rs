//! Vault hosted in a GitHub repository.

use reqwest::StatusCode;
use serde::Deserialize;

use super::{FetchError, VaultSource};
use crate::config::VaultConfig;

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Lists files through the git trees API and reads them from the raw host.
pub struct GithubSource {
    client: reqwest::Client,
    api_base: String,
    raw_base: String,
    owner: String,
    repo: String,
    branch: String,
}

impl GithubSource {
    pub fn new(config: &VaultConfig) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            raw_base: config.raw_base.trim_end_matches('/').to_string(),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            branch: config.branch.clone(),
        })
    }

    fn tree_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.api_base, self.owner, self.repo, self.branch
        )
    }

    fn raw_url(&self, path: &str) -> String {
        let encoded = path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!(
            "{}/{}/{}/{}/{}",
            self.raw_base, self.owner, self.repo, self.branch, encoded
        )
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        self.client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })
    }
}

#[async_trait::async_trait]
impl VaultSource for GithubSource {
    async fn list_files(&self) -> Result<Vec<String>, FetchError> {
        let url = self.tree_url();
        let response = self.get(&url).await?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                url,
                status: response.status().as_u16(),
            });
        }

        let body: TreeResponse = response.json().await.map_err(|source| FetchError::Http {
            url: url.clone(),
            source,
        })?;
        if body.truncated {
            tracing::warn!("Tree listing for {}/{} was truncated", self.owner, self.repo);
        }

        Ok(body
            .tree
            .into_iter()
            .filter(|entry| entry.kind == "blob")
            .map(|entry| entry.path)
            .collect())
    }

    async fn fetch_note(&self, path: &str) -> Result<String, FetchError> {
        let url = self.raw_url(path);
        let response = self.get(&url).await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(FetchError::NotFound(path.to_string())),
            status if !status.is_success() => Err(FetchError::Status {
                url,
                status: status.as_u16(),
            }),
            _ => response
                .text()
                .await
                .map_err(|source| FetchError::Http { url, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source(server: &MockServer) -> GithubSource {
        let config = VaultConfig {
            owner: "me".to_string(),
            repo: "notes".to_string(),
            api_base: server.uri(),
            raw_base: format!("{}/raw", server.uri()),
            user_agent: "garden-test".to_string(),
            ..Default::default()
        };
        GithubSource::new(&config).unwrap()
    }

    #[tokio::test]
    async fn list_files_keeps_blobs_only() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/me/notes/git/trees/main"))
            .and(query_param("recursive", "1"))
            .and(header("user-agent", "garden-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sha": "abc",
                "tree": [
                    { "path": "Projects", "type": "tree" },
                    { "path": "Projects/Garden.md", "type": "blob" },
                    { "path": "Index.md", "type": "blob" }
                ],
                "truncated": false
            })))
            .mount(&server)
            .await;

        let files = source(&server).list_files().await.unwrap();
        assert_eq!(files, vec!["Projects/Garden.md", "Index.md"]);
    }

    #[tokio::test]
    async fn list_files_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let err = source(&server).list_files().await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 403, .. }));
    }

    #[tokio::test]
    async fn fetch_note_encodes_path_segments() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/raw/me/notes/main/Projects/Garden%20Design.md"))
            .respond_with(ResponseTemplate::new(200).set_body_string("# Garden Design"))
            .mount(&server)
            .await;

        let content = source(&server)
            .fetch_note("Projects/Garden Design.md")
            .await
            .unwrap();
        assert_eq!(content, "# Garden Design");
    }

    #[tokio::test]
    async fn fetch_note_maps_404_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = source(&server).fetch_note("Gone.md").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn raw_url_escapes_reserved_characters() {
        let config = VaultConfig {
            owner: "me".to_string(),
            repo: "notes".to_string(),
            ..Default::default()
        };
        let source = GithubSource::new(&config).unwrap();
        assert_eq!(
            source.raw_url("Q&A/What? #1.md"),
            "https://raw.githubusercontent.com/me/notes/main/Q%26A/What%3F%20%231.md"
        );
    }
}
