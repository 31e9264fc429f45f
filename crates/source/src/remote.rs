//! Documents stored in a GitHub repository as `<root>/<category>/<id>/README.md`.

use crate::config::RemoteConfig;
use crate::document::Document;
use crate::error::SourceError;
use crate::id::DocumentId;
use crate::source::DocumentSource;
use crate::transport::{Transport, UreqTransport};
use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Body some backends return with a success status for missing files.
const NOT_FOUND_BODY: &str = "404: Not Found";

const RAW_ACCEPT: &str = "application/vnd.github.v3.raw";
const JSON_ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";

#[derive(Debug, Deserialize)]
struct RepoTree {
    tree: Vec<TreeEntry>,
}

#[derive(Debug, Deserialize)]
struct TreeEntry {
    path: String,
}

/// Documents of one category, in tree order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDocuments {
    /// Category name.
    pub category: String,
    /// Documents that resolved; failed fetches are left out.
    pub documents: Vec<Document>,
}

/// Remote store read through the contents and git-tree endpoints.
pub struct RemoteSource {
    config: RemoteConfig,
    token: Option<String>,
    transport: Arc<dyn Transport>,
    path_pattern: Regex,
}

impl std::fmt::Debug for RemoteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSource")
            .field("config", &self.config)
            .field("authenticated", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

impl RemoteSource {
    /// Creates a source using `ureq` for HTTP and the configured token.
    pub fn from_config(config: RemoteConfig) -> Result<Self, SourceError> {
        let token = config.resolve_token();
        Self::with_transport(config, token, Arc::new(UreqTransport::default()))
    }

    /// Creates a source over an explicit transport and token.
    pub fn with_transport(
        config: RemoteConfig,
        token: Option<String>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, SourceError> {
        config.validate()?;
        if token.is_none() {
            log::debug!("No token configured; remote requests are unauthenticated");
        }
        let path_pattern = Regex::new(&format!(
            r"^{}/([^/]+)/([^/]+)/README\.md$",
            regex::escape(&config.root)
        ))
        .map_err(|e| SourceError::Config(e.to_string()))?;
        Ok(Self {
            config,
            token,
            transport,
            path_pattern,
        })
    }

    fn repo_url(&self) -> String {
        format!(
            "{}/repos/{}/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.owner,
            self.config.repo
        )
    }

    /// Contents endpoint for a repository path.
    pub fn contents_url(&self, path: &str) -> String {
        format!("{}/contents/{path}", self.repo_url())
    }

    /// Recursive tree endpoint for the configured branch.
    pub fn tree_url(&self) -> String {
        format!(
            "{}/git/trees/{}?recursive=1",
            self.repo_url(),
            self.config.branch
        )
    }

    /// Repository path of a document in `category`.
    pub fn document_path(&self, category: &str, slug: &str) -> String {
        format!("{}/{category}/{slug}/README.md", self.config.root)
    }

    /// Identifier for a tree path. Paths outside the document layout fall
    /// back to the path minus its `.md`/`.mdx` extension.
    pub fn id_from_path(&self, path: &str) -> DocumentId {
        match self.path_pattern.captures(path) {
            Some(caps) => DocumentId::in_category(&caps[1], &caps[2]),
            None => {
                let slug = path
                    .strip_suffix(".mdx")
                    .or_else(|| path.strip_suffix(".md"))
                    .unwrap_or(path);
                DocumentId::new(slug)
            }
        }
    }

    fn bearer(&self) -> Option<String> {
        self.token.as_ref().map(|token| format!("Bearer {token}"))
    }

    /// Fetches raw file text. Any failure is logged and reported as `None`.
    pub fn fetch_raw(&self, path: &str) -> Option<String> {
        let url = self.contents_url(path);
        let bearer = self.bearer();
        let mut headers = vec![("Accept", RAW_ACCEPT)];
        if let Some(bearer) = bearer.as_deref() {
            headers.push(("Authorization", bearer));
        }

        match self.transport.get(&url, &headers) {
            Ok(response) if response.is_success() => {
                if response.body.trim() == NOT_FOUND_BODY {
                    log::debug!("{path} reported as not found");
                    return None;
                }
                Some(response.body)
            }
            Ok(response) => {
                log::warn!(
                    "Failed to fetch {path}: {} {}",
                    response.status,
                    response.status_text
                );
                None
            }
            Err(err) => {
                log::warn!("Failed to fetch {path}: {err}");
                None
            }
        }
    }

    /// Fetches the recursive file tree as a list of paths.
    ///
    /// `None` means the listing is unavailable (upstream failure or an
    /// unexpected payload).
    pub fn fetch_tree(&self) -> Option<Vec<String>> {
        let url = self.tree_url();
        let bearer = self.bearer();
        let mut headers = vec![("Accept", JSON_ACCEPT), ("X-GitHub-Api-Version", API_VERSION)];
        if let Some(bearer) = bearer.as_deref() {
            headers.push(("Authorization", bearer));
        }

        let response = match self.transport.get(&url, &headers) {
            Ok(response) if response.is_success() => response,
            Ok(response) => {
                log::warn!(
                    "Failed to fetch file tree: {} {}",
                    response.status,
                    response.status_text
                );
                return None;
            }
            Err(err) => {
                log::warn!("Failed to fetch file tree: {err}");
                return None;
            }
        };

        match serde_json::from_str::<RepoTree>(&response.body) {
            Ok(tree) => Some(tree.tree.into_iter().map(|entry| entry.path).collect()),
            Err(err) => {
                log::warn!("Unexpected file tree payload: {err}");
                None
            }
        }
    }

    /// Paths in `tree` belonging to `category`, in tree order.
    pub fn category_paths<'a>(&self, tree: &'a [String], category: &str) -> Vec<&'a str> {
        tree.iter()
            .map(String::as_str)
            .filter(|path| {
                self.path_pattern
                    .captures(path)
                    .is_some_and(|caps| &caps[1] == category)
            })
            .collect()
    }

    fn fetch_paths(&self, paths: &[&str]) -> Vec<Document> {
        paths
            .par_iter()
            .filter_map(|path| {
                let raw = self.fetch_raw(path)?;
                Some(Document::from_source(self.id_from_path(path), &raw))
            })
            .collect()
    }

    /// Fetches every document of one category. Failed fetches are dropped.
    pub fn fetch_category(&self, category: &str) -> Option<Vec<Document>> {
        let tree = self.fetch_tree()?;
        Some(self.fetch_paths(&self.category_paths(&tree, category)))
    }

    /// Fetches every configured category from a single tree listing.
    ///
    /// Every configured category comes back, in configured order, even
    /// when it holds no documents.
    pub fn fetch_all(&self) -> Option<Vec<CategoryDocuments>> {
        let tree = self.fetch_tree()?;
        let groups = self
            .config
            .categories
            .par_iter()
            .map(|category| CategoryDocuments {
                category: category.clone(),
                documents: self.fetch_paths(&self.category_paths(&tree, category)),
            })
            .collect();
        Some(groups)
    }

    fn candidate_categories<'a>(&'a self, id: &'a DocumentId) -> Vec<&'a str> {
        match id.category.as_deref() {
            Some(category) => vec![category],
            None => self.config.categories.iter().map(String::as_str).collect(),
        }
    }
}

impl DocumentSource for RemoteSource {
    fn resolve(&self, id: &DocumentId) -> Result<Option<Document>, SourceError> {
        for category in self.candidate_categories(id) {
            let path = self.document_path(category, &id.slug);
            if let Some(raw) = self.fetch_raw(&path) {
                return Ok(Some(Document::from_source(self.id_from_path(&path), &raw)));
            }
        }
        Ok(None)
    }

    fn list(&self) -> Result<Option<Vec<DocumentId>>, SourceError> {
        let Some(tree) = self.fetch_tree() else {
            return Ok(None);
        };
        let ids = self
            .config
            .categories
            .iter()
            .flat_map(|category| self.category_paths(&tree, category))
            .map(|path| self.id_from_path(path))
            .collect();
        Ok(Some(ids))
    }
}
